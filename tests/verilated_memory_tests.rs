//! Runs against the real RTL. Tests that need a `verilator` binary are ignored
//! by default; run them with `cargo test -- --ignored`.

use camino::Utf8PathBuf;
use mem32_verif::{
    verilator, with_verilated_memory, AccessSize, Harness, InputPin, OutputPin, ReadPort,
    ReferenceMemory, SignalVector, SimulationError, Simulator, Sweep, VerilatorConfig,
};

fn config(artifacts: &str) -> VerilatorConfig {
    VerilatorConfig {
        artifacts: Utf8PathBuf::from(format!("artifacts/{}", artifacts)),
        ..Default::default()
    }
}

/// Write `0x11223344` at address 0 with the raw `encoded` size, then read the
/// word back.
fn write_then_read_word<S: Simulator>(sim: &mut S, encoded: u64) -> Result<u64, SimulationError> {
    sim.step(&SignalVector::idle().with(InputPin::WriteEnable, 1).with(InputPin::WriteSize, 4))?;
    let write = SignalVector::idle()
        .with(InputPin::WriteEnable, 1)
        .with(InputPin::WriteSize, encoded)
        .with(InputPin::WriteData, 0x1122_3344);
    sim.step(&write)?;
    let read = SignalVector::idle()
        .with(InputPin::ReadEnable(ReadPort::One), 1)
        .with(InputPin::ReadSize(ReadPort::One), 4);
    Ok(sim.step(&read)?[OutputPin::ReadData(ReadPort::One)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_source_fails_to_build() {
        let config = VerilatorConfig {
            source: Utf8PathBuf::from("rtl/does_not_exist.sv"),
            ..config("missing")
        };
        let err = with_verilated_memory(&config, |_| ()).unwrap_err();
        assert!(matches!(err, SimulationError::Build { .. }));
    }

    #[test]
    #[ignore = "requires verilator"]
    fn test_write_five_read_five() -> Result<(), Box<dyn std::error::Error>> {
        let observed = with_verilated_memory(&config("scenario"), |memory| {
            let it = Sweep::new(4).iteration(5);
            memory.step(&SignalVector::idle())?;
            memory.step(&it.write)?;
            memory.step(&it.read)
        })??;

        for port in ReadPort::ALL {
            assert_eq!(observed[OutputPin::ReadValid(port)], 1);
            assert_eq!(observed[OutputPin::ReadAddr(port)], 5);
            assert_eq!(observed[OutputPin::ReadData(port)], 5);
        }
        Ok(())
    }

    #[test]
    #[ignore = "requires verilator"]
    fn test_byte_sweep() -> Result<(), Box<dyn std::error::Error>> {
        let report = with_verilated_memory(&config("byte_sweep"), |memory| {
            Harness::new(memory, Sweep::new(verilator::RTL_LOG_SIZE)).run()
        })??;
        assert!(report.passed(), "{}", report);
        assert!(report.covers_each_address_once(1 << verilator::RTL_LOG_SIZE, 1));
        Ok(())
    }

    #[test]
    #[ignore = "requires verilator"]
    fn test_signed_word_and_half_sweeps() -> Result<(), Box<dyn std::error::Error>> {
        let reports = with_verilated_memory(&config("wide_sweeps"), |memory| {
            let word = Harness::new(&mut *memory, Sweep::new(6).size(AccessSize::Word)).run()?;
            let half = Harness::new(&mut *memory, Sweep::new(6).size(AccessSize::Half).signed(true)).run()?;
            Ok::<_, SimulationError>((word, half))
        })??;
        assert!(reports.0.passed(), "{}", reports.0);
        assert!(reports.1.passed(), "{}", reports.1);
        Ok(())
    }

    #[test]
    #[ignore = "requires verilator"]
    fn test_non_canonical_sizes_match_reference() -> Result<(), Box<dyn std::error::Error>> {
        let rtl = with_verilated_memory(&config("raw_sizes"), |memory| {
            (0..8)
                .map(|encoded| write_then_read_word(&mut *memory, encoded))
                .collect::<Result<Vec<_>, _>>()
        })??;

        let mut reference = ReferenceMemory::new(verilator::RTL_LOG_SIZE);
        let expected = (0..8)
            .map(|encoded| write_then_read_word(&mut reference, encoded))
            .collect::<Result<Vec<_>, _>>()?;

        assert_eq!(rtl, expected);
        Ok(())
    }
}
