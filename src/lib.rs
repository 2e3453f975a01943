pub mod checker;
pub mod config;
pub mod harness;
pub mod reference;
pub mod runner;
pub mod signals;
pub mod simulator;
pub mod stimulus;
pub mod verilator;

pub use checker::{check_read, check_write, Check, Mismatch};
pub use config::{Backend, ConfigError, HarnessConfig, VerilatorConfig};
pub use harness::{CaseResult, Harness, SweepReport};
pub use reference::ReferenceMemory;
pub use runner::{run, verdict, RunError};
pub use signals::{AccessSize, InputPin, ObservedOutputs, OutputPin, ReadPort, SignalVector};
pub use simulator::{SimulationError, Simulator};
pub use stimulus::{ExpectedRead, Iteration, Sweep};
pub use verilator::{with_verilated_memory, Mem32, VerilatedMemory, MEM32_SOURCE};
