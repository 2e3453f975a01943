use camino::Utf8PathBuf;
use thiserror::Error;

use crate::signals::AccessSize;
use crate::stimulus::{Sweep, MAX_LOG_SIZE};
use crate::verilator::{MEM32_SOURCE, RTL_LOG_SIZE};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("log size {log_size} exceeds the {backend} limit of {max}")]
    LogSizeTooLarge {
        log_size: u32,
        max: u32,
        backend: &'static str,
    },

    #[error("{size:?} accesses need a range of at least {bytes} bytes")]
    RangeTooSmall { size: AccessSize, bytes: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Verilator,
    Reference,
}

impl Backend {
    pub fn name(self) -> &'static str {
        match self {
            Backend::Verilator => "verilator",
            Backend::Reference => "reference",
        }
    }

    pub fn max_log_size(self) -> u32 {
        match self {
            Backend::Verilator => RTL_LOG_SIZE,
            Backend::Reference => MAX_LOG_SIZE,
        }
    }

    /// Both backends sweep the whole RTL array unless told otherwise.
    pub fn default_log_size(self) -> u32 {
        RTL_LOG_SIZE
    }
}

/// Inputs to the Verilator build of `mem_32`.
///
/// `source` must name the file the `Mem32` model was generated from; marlin
/// refuses to instantiate the model from any other source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerilatorConfig {
    pub source: Utf8PathBuf,
    pub include_dirs: Vec<Utf8PathBuf>,
    pub artifacts: Utf8PathBuf,
}

impl Default for VerilatorConfig {
    fn default() -> Self {
        Self {
            source: Utf8PathBuf::from(MEM32_SOURCE),
            include_dirs: vec![Utf8PathBuf::from("rtl")],
            artifacts: Utf8PathBuf::from("artifacts"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub backend: Backend,
    pub log_size: u32,
    pub size: AccessSize,
    pub signed: bool,
    pub verilator: VerilatorConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            log_size: Backend::default().default_log_size(),
            size: AccessSize::Byte,
            signed: false,
            verilator: VerilatorConfig::default(),
        }
    }
}

impl HarnessConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max = self.backend.max_log_size();
        if self.log_size > max {
            return Err(ConfigError::LogSizeTooLarge {
                log_size: self.log_size,
                max,
                backend: self.backend.name(),
            });
        }
        if (1u64 << self.log_size) < self.size.bytes() {
            return Err(ConfigError::RangeTooSmall {
                size: self.size,
                bytes: self.size.bytes(),
            });
        }
        Ok(())
    }

    pub fn sweep(&self) -> Sweep {
        Sweep::new(self.log_size).size(self.size).signed(self.signed)
    }
}
