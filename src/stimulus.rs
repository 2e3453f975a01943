//! Address-sweep stimulus: write each location, then read it back on both ports.

use crate::signals::{mask, AccessSize, InputPin, ReadPort, SignalVector, DATA_BITS};

/// Largest sweep range, `2^20` bytes.
pub const MAX_LOG_SIZE: u32 = 20;

/// What a read of `address` should return on both ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedRead {
    pub address: u64,
    pub data: u64,
}

/// One write-tick / read-tick pair of the sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iteration {
    pub index: u64,
    pub address: u64,
    pub value: u64,
    pub write: SignalVector,
    pub read: SignalVector,
    pub expected: ExpectedRead,
}

fn check_log_size(log_size: u32) {
    assert!(
        log_size <= MAX_LOG_SIZE,
        "log size {log_size} exceeds {MAX_LOG_SIZE}"
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sweep {
    pub log_size: u32,
    pub size: AccessSize,
    pub signed: bool,
}

impl Sweep {
    /// # Panics
    ///
    /// If `log_size` exceeds [`MAX_LOG_SIZE`].
    pub fn new(log_size: u32) -> Self {
        check_log_size(log_size);
        Self {
            log_size,
            size: AccessSize::Byte,
            signed: false,
        }
    }

    pub fn size(mut self, size: AccessSize) -> Self {
        self.size = size;
        self
    }

    pub fn signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }

    /// Bytes in the swept range, `2^log_size`.
    pub fn depth(&self) -> u64 {
        check_log_size(self.log_size);
        1u64 << self.log_size
    }

    pub fn len(&self) -> u64 {
        self.depth() / self.size.bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iteration(&self, index: u64) -> Iteration {
        let address = index * self.size.bytes();
        let value = address & mask(DATA_BITS);

        let write = SignalVector::idle()
            .with(InputPin::WriteEnable, 1)
            .with(InputPin::WriteSize, self.size.bytes())
            .with(InputPin::WriteAddr, address)
            .with(InputPin::WriteData, value);

        let mut read = SignalVector::idle();
        for port in ReadPort::ALL {
            read[InputPin::ReadEnable(port)] = 1;
            read[InputPin::ReadAddr(port)] = address;
            read[InputPin::ReadSize(port)] = self.size.bytes();
            read[InputPin::ReadSign(port)] = u64::from(self.signed);
        }

        let data = if self.signed {
            self.size.sign_extend(value)
        } else {
            self.size.truncate(value)
        };

        Iteration {
            index,
            address,
            value,
            write,
            read,
            expected: ExpectedRead { address, data },
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Iteration> + '_ {
        (0..self.len()).map(move |index| self.iteration(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_byte_sweep_addresses() {
        let sweep = Sweep::new(4);
        let addresses: Vec<u64> = sweep.iter().map(|it| it.address).collect();
        assert_eq!(addresses, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_write_and_read_vectors() {
        let it = Sweep::new(4).iteration(5);
        assert_eq!(it.write[InputPin::WriteEnable], 1);
        assert_eq!(it.write[InputPin::WriteAddr], 5);
        assert_eq!(it.write[InputPin::WriteData], 5);
        assert_eq!(it.write[InputPin::WriteSize], 1);
        assert_eq!(it.write[InputPin::ReadEnable(ReadPort::One)], 0);

        assert_eq!(it.read[InputPin::WriteEnable], 0);
        for port in ReadPort::ALL {
            assert_eq!(it.read[InputPin::ReadEnable(port)], 1);
            assert_eq!(it.read[InputPin::ReadAddr(port)], 5);
        }
        assert_eq!(it.expected, ExpectedRead { address: 5, data: 5 });
    }

    #[test]
    fn test_word_sweep_covers_bytes_once() {
        let sweep = Sweep::new(6).size(AccessSize::Word);
        assert_eq!(sweep.len(), 16);
        let mut touched = BTreeSet::new();
        for it in sweep.iter() {
            for offset in 0..4 {
                assert!(touched.insert(it.address + offset));
            }
        }
        assert_eq!(touched.len() as u64, sweep.depth());
    }

    #[test]
    fn test_byte_values_truncate() {
        let sweep = Sweep::new(10);
        assert_eq!(sweep.iteration(0x1ff).expected.data, 0xff);
        let signed = sweep.signed(true);
        assert_eq!(signed.iteration(0x1ff).expected.data, 0xffff_ffff);
        assert_eq!(signed.iteration(0x17f).expected.data, 0x7f);
    }

    #[test]
    fn test_zero_log_size_is_one_address() {
        let sweep = Sweep::new(0);
        assert_eq!(sweep.len(), 1);
        assert!(Sweep::new(0).size(AccessSize::Half).is_empty());
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn test_log_size_bound() {
        Sweep::new(64);
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn test_log_size_bound_on_public_field() {
        let sweep = Sweep {
            log_size: 64,
            ..Sweep::new(4)
        };
        sweep.len();
    }

    #[test]
    fn test_range_edges() {
        let sweep = Sweep::new(4);
        let first = sweep.iter().next().unwrap();
        let last = sweep.iter().last().unwrap();
        assert_eq!(first.address, 0);
        assert_eq!(last.address, 15);
        assert_eq!(last.expected.data, 15);
    }
}
