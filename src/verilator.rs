//! Verilator backend: `rtl/mem_32.sv` compiled and driven through marlin.

use std::process::Command;

use camino::Utf8Path;
use log::{debug, info};
use marlin::{
    verilator::{VerilatorRuntime, VerilatorRuntimeOptions},
    verilog::prelude::*,
};

use crate::config::VerilatorConfig;
use crate::signals::{InputPin, OutputPin, ReadPort};
use crate::simulator::{SimulationError, Simulator};

/// `LOG_SIZE` localparam of `rtl/mem_32.sv`.
pub const RTL_LOG_SIZE: u32 = 10;

/// Source the `Mem32` model is generated from. Keep in sync with the attribute
/// below.
pub const MEM32_SOURCE: &str = "rtl/mem_32.sv";

#[verilog(src = "rtl/mem_32.sv", name = "mem_32")]
pub struct Mem32;

/// Whether a `verilator` executable can be found on `PATH`.
pub fn is_available() -> bool {
    Command::new("verilator")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

pub fn create_mem32_runtime(config: &VerilatorConfig) -> Result<VerilatorRuntime, SimulationError> {
    let build_error = |reason: String| SimulationError::Build {
        source_path: config.source.to_string(),
        reason,
    };

    if config.source.as_path() != Utf8Path::new(MEM32_SOURCE) {
        return Err(build_error(format!(
            "the mem_32 model is generated from {}, not this file",
            MEM32_SOURCE
        )));
    }
    if !config.source.is_file() {
        return Err(build_error("source file not found".to_string()));
    }
    if !is_available() {
        return Err(build_error("verilator was not found on PATH".to_string()));
    }

    let src_files = [config.source.as_path()];
    let include_paths: Vec<&Utf8Path> = config.include_dirs.iter().map(|dir| dir.as_path()).collect();

    info!("building {} into {}", config.source, config.artifacts);
    VerilatorRuntime::new(
        config.artifacts.as_path(),
        &src_files,
        &include_paths,
        [],
        VerilatorRuntimeOptions::default_logging(),
    )
    .map_err(|e| build_error(format!("failed to create runtime: {}", e)))
}

/// A live `mem_32` model, borrowed from its runtime.
pub struct VerilatedMemory<'ctx> {
    model: Mem32<'ctx>,
    ticks: u64,
}

impl<'ctx> VerilatedMemory<'ctx> {
    pub fn new(runtime: &'ctx VerilatorRuntime) -> Result<Self, SimulationError> {
        let mut model = runtime
            .create_model_simple::<Mem32>()
            .map_err(|e| SimulationError::Model(format!("failed to create model: {:?}", e)))?;

        // Settle with the clock low so the first tick sees a rising edge.
        model.clk_i = 0;
        model.eval();

        Ok(Self { model, ticks: 0 })
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

fn narrow<T: TryFrom<u64>>(pin: InputPin, value: u64) -> Result<T, SimulationError> {
    let value = pin.check(value)?;
    T::try_from(value).map_err(|_| SimulationError::ValueOutOfRange {
        pin: pin.name(),
        value,
        width: pin.width(),
    })
}

impl Simulator for VerilatedMemory<'_> {
    fn set(&mut self, pin: InputPin, value: u64) -> Result<(), SimulationError> {
        use ReadPort::*;
        let model = &mut self.model;
        match pin {
            InputPin::WriteEnable => model.wren_i = narrow(pin, value)?,
            InputPin::WriteSize => model.write_size_i = narrow(pin, value)?,
            InputPin::WriteAddr => model.write_addr_i = narrow(pin, value)?,
            InputPin::WriteData => model.write_data_i = narrow(pin, value)?,
            InputPin::ReadEnable(One) => model.read_one_i = narrow(pin, value)?,
            InputPin::ReadSign(One) => model.read_sign_one_i = narrow(pin, value)?,
            InputPin::ReadAddr(One) => model.read_addr_one_i = narrow(pin, value)?,
            InputPin::ReadSize(One) => model.read_size_one_i = narrow(pin, value)?,
            InputPin::ReadEnable(Two) => model.read_two_i = narrow(pin, value)?,
            InputPin::ReadSign(Two) => model.read_sign_two_i = narrow(pin, value)?,
            InputPin::ReadAddr(Two) => model.read_addr_two_i = narrow(pin, value)?,
            InputPin::ReadSize(Two) => model.read_size_two_i = narrow(pin, value)?,
        }
        Ok(())
    }

    fn tick(&mut self) -> Result<(), SimulationError> {
        // Rising edge
        self.model.clk_i = 1;
        self.model.eval();

        // Falling edge
        self.model.clk_i = 0;
        self.model.eval();

        self.ticks += 1;
        Ok(())
    }

    fn get(&self, pin: OutputPin) -> Result<u64, SimulationError> {
        use ReadPort::*;
        let model = &self.model;
        let value = match pin {
            OutputPin::WriteValid => u64::from(model.write_valid_o),
            OutputPin::WriteAddr => u64::from(model.write_addr_o),
            OutputPin::ReadValid(One) => u64::from(model.read_valid_one_o),
            OutputPin::ReadAddr(One) => u64::from(model.read_addr_one_o),
            OutputPin::ReadData(One) => u64::from(model.read_data_one_o),
            OutputPin::ReadValid(Two) => u64::from(model.read_valid_two_o),
            OutputPin::ReadAddr(Two) => u64::from(model.read_addr_two_o),
            OutputPin::ReadData(Two) => u64::from(model.read_data_two_o),
        };
        Ok(value)
    }
}

/// Build the runtime, instantiate `mem_32`, and hand it to `f`.
///
/// The model is dropped before its runtime whether `f` returns normally or the
/// build fails partway.
pub fn with_verilated_memory<R>(
    config: &VerilatorConfig,
    f: impl FnOnce(&mut VerilatedMemory<'_>) -> R,
) -> Result<R, SimulationError> {
    let runtime = create_mem32_runtime(config)?;
    let mut memory = VerilatedMemory::new(&runtime)?;
    let result = f(&mut memory);
    debug!("releasing mem_32 model after {} ticks", memory.ticks());
    Ok(result)
}
