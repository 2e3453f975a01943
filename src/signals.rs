//! Pin names, signal vectors and sampled outputs of the `mem_32` DUT.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::simulator::SimulationError;

/// One of the two independent read channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReadPort {
    One,
    Two,
}

impl ReadPort {
    pub const ALL: [ReadPort; 2] = [ReadPort::One, ReadPort::Two];
}

/// Width of a single access, encoded on the size pins as a byte count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessSize {
    #[default]
    Byte,
    Half,
    Word,
}

impl AccessSize {
    pub fn bytes(self) -> u64 {
        match self {
            AccessSize::Byte => 1,
            AccessSize::Half => 2,
            AccessSize::Word => 4,
        }
    }

    pub fn bits(self) -> u32 {
        (self.bytes() * 8) as u32
    }

    /// Keep only the low `bits()` bits of `value`.
    pub fn truncate(self, value: u64) -> u64 {
        value & mask(self.bits())
    }

    /// Sign-extend a truncated value to the 32-bit data bus.
    pub fn sign_extend(self, value: u64) -> u64 {
        let value = self.truncate(value);
        let sign_bit = 1u64 << (self.bits() - 1);
        if value & sign_bit != 0 {
            (value | !mask(self.bits())) & mask(DATA_BITS)
        } else {
            value
        }
    }
}

/// Width of the address and data buses.
pub const DATA_BITS: u32 = 32;

pub(crate) fn mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputPin {
    WriteEnable,
    WriteSize,
    WriteAddr,
    WriteData,
    ReadEnable(ReadPort),
    ReadSign(ReadPort),
    ReadAddr(ReadPort),
    ReadSize(ReadPort),
}

impl InputPin {
    pub const ALL: [InputPin; 12] = [
        InputPin::WriteEnable,
        InputPin::WriteSize,
        InputPin::WriteAddr,
        InputPin::WriteData,
        InputPin::ReadEnable(ReadPort::One),
        InputPin::ReadSign(ReadPort::One),
        InputPin::ReadAddr(ReadPort::One),
        InputPin::ReadSize(ReadPort::One),
        InputPin::ReadEnable(ReadPort::Two),
        InputPin::ReadSign(ReadPort::Two),
        InputPin::ReadAddr(ReadPort::Two),
        InputPin::ReadSize(ReadPort::Two),
    ];

    /// Port name in `rtl/mem_32.sv`.
    pub fn name(self) -> &'static str {
        use ReadPort::*;
        match self {
            InputPin::WriteEnable => "wren_i",
            InputPin::WriteSize => "write_size_i",
            InputPin::WriteAddr => "write_addr_i",
            InputPin::WriteData => "write_data_i",
            InputPin::ReadEnable(One) => "read_one_i",
            InputPin::ReadSign(One) => "read_sign_one_i",
            InputPin::ReadAddr(One) => "read_addr_one_i",
            InputPin::ReadSize(One) => "read_size_one_i",
            InputPin::ReadEnable(Two) => "read_two_i",
            InputPin::ReadSign(Two) => "read_sign_two_i",
            InputPin::ReadAddr(Two) => "read_addr_two_i",
            InputPin::ReadSize(Two) => "read_size_two_i",
        }
    }

    pub fn width(self) -> u32 {
        match self {
            InputPin::WriteEnable | InputPin::ReadEnable(_) | InputPin::ReadSign(_) => 1,
            InputPin::WriteSize | InputPin::ReadSize(_) => 3,
            InputPin::WriteAddr | InputPin::WriteData | InputPin::ReadAddr(_) => DATA_BITS,
        }
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|pin| *pin == self)
            .unwrap_or_default()
    }

    /// Reject values that do not fit the pin.
    pub fn check(self, value: u64) -> Result<u64, SimulationError> {
        if value > mask(self.width()) {
            return Err(SimulationError::ValueOutOfRange {
                pin: self.name(),
                value,
                width: self.width(),
            });
        }
        Ok(value)
    }
}

impl fmt::Display for InputPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InputPin {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|pin| pin.name() == s)
            .ok_or_else(|| SimulationError::UnknownPin(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutputPin {
    WriteValid,
    WriteAddr,
    ReadValid(ReadPort),
    ReadAddr(ReadPort),
    ReadData(ReadPort),
}

impl OutputPin {
    pub const ALL: [OutputPin; 8] = [
        OutputPin::WriteValid,
        OutputPin::WriteAddr,
        OutputPin::ReadValid(ReadPort::One),
        OutputPin::ReadAddr(ReadPort::One),
        OutputPin::ReadData(ReadPort::One),
        OutputPin::ReadValid(ReadPort::Two),
        OutputPin::ReadAddr(ReadPort::Two),
        OutputPin::ReadData(ReadPort::Two),
    ];

    /// Port name in `rtl/mem_32.sv`.
    pub fn name(self) -> &'static str {
        use ReadPort::*;
        match self {
            OutputPin::WriteValid => "write_valid_o",
            OutputPin::WriteAddr => "write_addr_o",
            OutputPin::ReadValid(One) => "read_valid_one_o",
            OutputPin::ReadAddr(One) => "read_addr_one_o",
            OutputPin::ReadData(One) => "read_data_one_o",
            OutputPin::ReadValid(Two) => "read_valid_two_o",
            OutputPin::ReadAddr(Two) => "read_addr_two_o",
            OutputPin::ReadData(Two) => "read_data_two_o",
        }
    }

    pub fn width(self) -> u32 {
        match self {
            OutputPin::WriteValid | OutputPin::ReadValid(_) => 1,
            OutputPin::WriteAddr | OutputPin::ReadAddr(_) | OutputPin::ReadData(_) => DATA_BITS,
        }
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|pin| *pin == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for OutputPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputPin {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|pin| pin.name() == s)
            .ok_or_else(|| SimulationError::UnknownPin(s.to_string()))
    }
}

/// Values for every input pin, applied together before a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalVector {
    values: [u64; InputPin::ALL.len()],
}

impl SignalVector {
    /// All controls de-asserted, sizes set to a single byte.
    pub fn idle() -> Self {
        let mut vector = Self {
            values: [0; InputPin::ALL.len()],
        };
        vector[InputPin::WriteSize] = AccessSize::Byte.bytes();
        for port in ReadPort::ALL {
            vector[InputPin::ReadSize(port)] = AccessSize::Byte.bytes();
        }
        vector
    }

    pub fn with(mut self, pin: InputPin, value: u64) -> Self {
        self[pin] = value;
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (InputPin, u64)> + '_ {
        InputPin::ALL.into_iter().map(move |pin| (pin, self[pin]))
    }
}

impl Default for SignalVector {
    fn default() -> Self {
        Self::idle()
    }
}

impl Index<InputPin> for SignalVector {
    type Output = u64;

    fn index(&self, pin: InputPin) -> &u64 {
        &self.values[pin.index()]
    }
}

impl IndexMut<InputPin> for SignalVector {
    fn index_mut(&mut self, pin: InputPin) -> &mut u64 {
        &mut self.values[pin.index()]
    }
}

/// Output pin values sampled after a tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedOutputs {
    values: [u64; OutputPin::ALL.len()],
}

impl ObservedOutputs {
    pub fn with(mut self, pin: OutputPin, value: u64) -> Self {
        self[pin] = value;
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (OutputPin, u64)> + '_ {
        OutputPin::ALL.into_iter().map(move |pin| (pin, self[pin]))
    }
}

impl Index<OutputPin> for ObservedOutputs {
    type Output = u64;

    fn index(&self, pin: OutputPin) -> &u64 {
        &self.values[pin.index()]
    }
}

impl IndexMut<OutputPin> for ObservedOutputs {
    fn index_mut(&mut self, pin: OutputPin) -> &mut u64 {
        &mut self.values[pin.index()]
    }
}

impl fmt::Display for ObservedOutputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (pin, value) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{pin}={value:#x}")?;
        }
        Ok(())
    }
}
