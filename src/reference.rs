//! Behavioral model of `rtl/mem_32.sv`.
//!
//! Cycle-for-cycle equivalent at the port level: reads and writes are
//! registered on the tick that samples them, and reads observe the array as it
//! was before the write of the same tick.

use log::trace;

use crate::signals::{
    mask, AccessSize, InputPin, ObservedOutputs, OutputPin, ReadPort, SignalVector, DATA_BITS,
};
use crate::simulator::{SimulationError, Simulator};
use crate::stimulus::MAX_LOG_SIZE;

#[derive(Debug, Clone)]
pub struct ReferenceMemory {
    log_size: u32,
    bytes: Vec<u8>,
    inputs: SignalVector,
    outputs: ObservedOutputs,
    ticks: u64,
}

impl ReferenceMemory {
    /// # Panics
    ///
    /// If `log_size` exceeds [`MAX_LOG_SIZE`].
    pub fn new(log_size: u32) -> Self {
        assert!(
            log_size <= MAX_LOG_SIZE,
            "log size {log_size} exceeds {MAX_LOG_SIZE}"
        );
        Self {
            log_size,
            bytes: vec![0; 1usize << log_size],
            inputs: SignalVector::idle(),
            outputs: ObservedOutputs::default(),
            ticks: 0,
        }
    }

    pub fn depth(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn log_size(&self) -> u32 {
        self.log_size
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Direct view of one byte of the array.
    pub fn peek(&self, address: u64) -> u8 {
        self.bytes[self.wrap(address, 0)]
    }

    fn wrap(&self, address: u64, offset: u64) -> usize {
        (address.wrapping_add(offset) & (self.depth() - 1)) as usize
    }

    /// Read width for an encoded read size; anything but 1 or 2 loads a word,
    /// as the RTL `case` default does.
    fn load_size(encoded: u64) -> AccessSize {
        match encoded {
            1 => AccessSize::Byte,
            2 => AccessSize::Half,
            _ => AccessSize::Word,
        }
    }

    fn load(&self, address: u64, size: AccessSize, signed: bool) -> u64 {
        let raw = (0..4).rev().fold(0u64, |acc, offset| {
            (acc << 8) | u64::from(self.bytes[self.wrap(address, offset)])
        });
        if signed {
            size.sign_extend(raw)
        } else {
            size.truncate(raw)
        }
    }

    /// Bytes written for an encoded write size: byte 0 always, byte 1 from
    /// size 2, bytes 2 and 3 from size 4. Matches the `>=` tests in the RTL.
    fn store_width(encoded: u64) -> u64 {
        match encoded {
            0..=1 => 1,
            2..=3 => 2,
            _ => 4,
        }
    }

    fn store(&mut self, address: u64, encoded_size: u64, data: u64) {
        for offset in 0..Self::store_width(encoded_size) {
            let index = self.wrap(address, offset);
            self.bytes[index] = ((data >> (offset * 8)) & 0xff) as u8;
        }
    }
}

impl Simulator for ReferenceMemory {
    fn set(&mut self, pin: InputPin, value: u64) -> Result<(), SimulationError> {
        self.inputs[pin] = pin.check(value)?;
        Ok(())
    }

    fn tick(&mut self) -> Result<(), SimulationError> {
        let inputs = &self.inputs;
        let mut next = self.outputs.clone();

        for port in ReadPort::ALL {
            let enabled = inputs[InputPin::ReadEnable(port)] != 0;
            next[OutputPin::ReadValid(port)] = u64::from(enabled);
            if enabled {
                let address = inputs[InputPin::ReadAddr(port)];
                let size = Self::load_size(inputs[InputPin::ReadSize(port)]);
                let signed = inputs[InputPin::ReadSign(port)] != 0;
                next[OutputPin::ReadAddr(port)] = address;
                next[OutputPin::ReadData(port)] = self.load(address, size, signed) & mask(DATA_BITS);
            }
        }

        let write = inputs[InputPin::WriteEnable] != 0;
        next[OutputPin::WriteValid] = u64::from(write);
        if write {
            let address = inputs[InputPin::WriteAddr];
            let encoded_size = inputs[InputPin::WriteSize];
            let data = inputs[InputPin::WriteData];
            next[OutputPin::WriteAddr] = address;
            self.store(address, encoded_size, data);
        }

        self.outputs = next;
        self.ticks += 1;
        trace!("reference tick {}: {}", self.ticks, self.outputs);
        Ok(())
    }

    fn get(&self, pin: OutputPin) -> Result<u64, SimulationError> {
        Ok(self.outputs[pin])
    }
}
