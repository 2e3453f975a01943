//! Comparison of sampled outputs against what the sweep wrote.

use std::fmt;

use crate::signals::{ObservedOutputs, OutputPin, ReadPort};
use crate::stimulus::ExpectedRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Valid,
    AddressEcho,
    Data,
    /// Both read ports were given the same request and must agree.
    PortSymmetry,
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Check::Valid => "valid",
            Check::AddressEcho => "address echo",
            Check::Data => "data",
            Check::PortSymmetry => "port symmetry",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub check: Check,
    pub pin: OutputPin,
    pub expected: u64,
    pub actual: u64,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): expected {:#x}, got {:#x}",
            self.pin, self.check, self.expected, self.actual
        )
    }
}

fn expect(out: &mut Vec<Mismatch>, check: Check, pin: OutputPin, expected: u64, actual: u64) {
    if expected != actual {
        out.push(Mismatch {
            check,
            pin,
            expected,
            actual,
        });
    }
}

/// Outputs after the write tick of `address`.
pub fn check_write(address: u64, observed: &ObservedOutputs) -> Vec<Mismatch> {
    let mut mismatches = Vec::new();
    expect(
        &mut mismatches,
        Check::Valid,
        OutputPin::WriteValid,
        1,
        observed[OutputPin::WriteValid],
    );
    expect(
        &mut mismatches,
        Check::AddressEcho,
        OutputPin::WriteAddr,
        address,
        observed[OutputPin::WriteAddr],
    );
    mismatches
}

/// Outputs after the read tick; both ports were asked for `expected.address`.
pub fn check_read(expected: &ExpectedRead, observed: &ObservedOutputs) -> Vec<Mismatch> {
    let mut mismatches = Vec::new();
    for port in ReadPort::ALL {
        let valid = OutputPin::ReadValid(port);
        let addr = OutputPin::ReadAddr(port);
        let data = OutputPin::ReadData(port);
        expect(&mut mismatches, Check::Valid, valid, 1, observed[valid]);
        expect(&mut mismatches, Check::AddressEcho, addr, expected.address, observed[addr]);
        expect(&mut mismatches, Check::Data, data, expected.data, observed[data]);
    }
    let two = OutputPin::ReadData(ReadPort::Two);
    expect(
        &mut mismatches,
        Check::PortSymmetry,
        two,
        observed[OutputPin::ReadData(ReadPort::One)],
        observed[two],
    );
    mismatches
}
