use thiserror::Error;

use crate::signals::{InputPin, ObservedOutputs, OutputPin, SignalVector};

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("failed to build simulator from {source_path}: {reason}")]
    Build { source_path: String, reason: String },

    #[error("unknown pin `{0}`")]
    UnknownPin(String),

    #[error("value {value:#x} does not fit {width}-bit pin {pin}")]
    ValueOutOfRange {
        pin: &'static str,
        value: u64,
        width: u32,
    },

    #[error("simulator model error: {0}")]
    Model(String),
}

/// The simulate-and-sample boundary of a memory DUT.
///
/// Inputs set between ticks are held until the next `tick`; outputs read with
/// `get` reflect the state after the most recent tick.
pub trait Simulator {
    fn set(&mut self, pin: InputPin, value: u64) -> Result<(), SimulationError>;

    /// Advance the clock by one rising edge.
    fn tick(&mut self) -> Result<(), SimulationError>;

    fn get(&self, pin: OutputPin) -> Result<u64, SimulationError>;

    fn set_by_name(&mut self, name: &str, value: u64) -> Result<(), SimulationError> {
        self.set(name.parse()?, value)
    }

    fn get_by_name(&self, name: &str) -> Result<u64, SimulationError> {
        self.get(name.parse()?)
    }

    fn apply(&mut self, vector: &SignalVector) -> Result<(), SimulationError> {
        for (pin, value) in vector.iter() {
            self.set(pin, value)?;
        }
        Ok(())
    }

    fn sample(&self) -> Result<ObservedOutputs, SimulationError> {
        let mut outputs = ObservedOutputs::default();
        for pin in OutputPin::ALL {
            outputs[pin] = self.get(pin)?;
        }
        Ok(outputs)
    }

    /// Apply `vector`, tick once and sample the outputs.
    fn step(&mut self, vector: &SignalVector) -> Result<ObservedOutputs, SimulationError> {
        self.apply(vector)?;
        self.tick()?;
        self.sample()
    }
}

impl<S: Simulator + ?Sized> Simulator for &mut S {
    fn set(&mut self, pin: InputPin, value: u64) -> Result<(), SimulationError> {
        (**self).set(pin, value)
    }

    fn tick(&mut self) -> Result<(), SimulationError> {
        (**self).tick()
    }

    fn get(&self, pin: OutputPin) -> Result<u64, SimulationError> {
        (**self).get(pin)
    }
}
