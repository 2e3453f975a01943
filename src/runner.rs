//! Configuration in, sweep verdict out. The binary is a thin shell over this.

use log::info;
use thiserror::Error;

use crate::config::{Backend, ConfigError, HarnessConfig};
use crate::harness::{Harness, SweepReport};
use crate::reference::ReferenceMemory;
use crate::simulator::SimulationError;
use crate::verilator::with_verilated_memory;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("sweep failed: {0}")]
    Failed(SweepReport),
}

/// Validate `config` and sweep the selected backend. A report with failing
/// cases is still `Ok`; see [`verdict`].
pub fn run(config: &HarnessConfig) -> Result<SweepReport, RunError> {
    config.validate()?;
    let sweep = config.sweep();
    info!("running {} backend", config.backend.name());

    let report = match config.backend {
        Backend::Reference => Harness::new(ReferenceMemory::new(config.log_size), sweep).run()?,
        Backend::Verilator => with_verilated_memory(&config.verilator, |memory| {
            Harness::new(memory, sweep).run()
        })??,
    };
    Ok(report)
}

/// Turn a report with any mismatch into an error.
pub fn verdict(report: SweepReport) -> Result<SweepReport, RunError> {
    if report.passed() {
        Ok(report)
    } else {
        Err(RunError::Failed(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{Check, Mismatch};
    use crate::config::VerilatorConfig;
    use crate::harness::CaseResult;
    use crate::signals::{OutputPin, ReadPort};
    use camino::Utf8PathBuf;

    #[test]
    fn test_reference_run_passes() {
        let config = HarnessConfig {
            backend: Backend::Reference,
            ..Default::default()
        };
        let report = verdict(run(&config).unwrap()).unwrap();
        assert_eq!(report.cases.len(), 1024);
        assert!(report.covers_each_address_once(1024, 1));
    }

    #[test]
    fn test_invalid_config_is_rejected_before_running() {
        let config = HarnessConfig {
            log_size: 11,
            ..Default::default()
        };
        assert!(matches!(
            run(&config),
            Err(RunError::Config(ConfigError::LogSizeTooLarge { .. }))
        ));
    }

    #[test]
    fn test_foreign_source_is_a_build_error() {
        let config = HarnessConfig {
            verilator: VerilatorConfig {
                source: Utf8PathBuf::from("rtl/other.sv"),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = run(&config).unwrap_err();
        assert!(matches!(
            err,
            RunError::Simulation(SimulationError::Build { .. })
        ));
        let message = err.to_string();
        assert!(message.contains("rtl/other.sv"), "{message}");
        assert!(message.contains("rtl/mem_32.sv"), "{message}");
    }

    #[test]
    fn test_mismatch_fails_the_verdict() {
        let report = SweepReport {
            cases: vec![CaseResult {
                index: 0,
                address: 0,
                mismatches: vec![Mismatch {
                    check: Check::Data,
                    pin: OutputPin::ReadData(ReadPort::One),
                    expected: 0,
                    actual: 1,
                }],
            }],
        };
        let err = verdict(report).unwrap_err();
        assert_eq!(
            err.to_string(),
            "sweep failed: 1 cases, 0 passed, 1 failed (1 mismatches)"
        );
    }
}
