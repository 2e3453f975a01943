//! Drives a [`Simulator`] through a [`Sweep`] and collects per-case results.

use std::collections::BTreeSet;
use std::fmt;

use log::{debug, error, info};

use crate::checker::{check_read, check_write, Mismatch};
use crate::signals::SignalVector;
use crate::simulator::{SimulationError, Simulator};
use crate::stimulus::Sweep;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
    pub index: u64,
    pub address: u64,
    pub mismatches: Vec<Mismatch>,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub cases: Vec<CaseResult>,
}

impl SweepReport {
    pub fn passed(&self) -> bool {
        self.cases.iter().all(CaseResult::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.cases.iter().filter(|case| !case.passed())
    }

    pub fn mismatch_count(&self) -> usize {
        self.cases.iter().map(|case| case.mismatches.len()).sum()
    }

    pub fn addresses(&self) -> impl Iterator<Item = u64> + '_ {
        self.cases.iter().map(|case| case.address)
    }

    /// True when the cases start at every `stride`-aligned address below
    /// `depth` exactly once. A zero stride covers nothing.
    pub fn covers_each_address_once(&self, depth: u64, stride: u64) -> bool {
        if stride == 0 {
            return false;
        }
        let mut seen = BTreeSet::new();
        for address in self.addresses() {
            if address >= depth || address % stride != 0 || !seen.insert(address) {
                return false;
            }
        }
        seen.len() as u64 == depth / stride
    }
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failed = self.failures().count();
        write!(
            f,
            "{} cases, {} passed, {} failed ({} mismatches)",
            self.cases.len(),
            self.cases.len() - failed,
            failed,
            self.mismatch_count()
        )
    }
}

pub struct Harness<S> {
    sim: S,
    sweep: Sweep,
}

impl<S: Simulator> Harness<S> {
    pub fn new(sim: S, sweep: Sweep) -> Self {
        Self { sim, sweep }
    }

    pub fn sweep(&self) -> &Sweep {
        &self.sweep
    }

    pub fn simulator(&self) -> &S {
        &self.sim
    }

    pub fn into_inner(self) -> S {
        self.sim
    }

    /// De-assert every control and clock once so registered outputs settle.
    pub fn reset(&mut self) -> Result<(), SimulationError> {
        self.sim.step(&SignalVector::idle())?;
        Ok(())
    }

    /// Run the full sweep. Mismatches are collected per case and never stop
    /// the sweep; simulator errors do.
    pub fn run(&mut self) -> Result<SweepReport, SimulationError> {
        info!(
            "sweeping {} addresses ({:?}, signed={})",
            self.sweep.len(),
            self.sweep.size,
            self.sweep.signed
        );
        self.reset()?;

        let mut report = SweepReport::default();
        for it in self.sweep.iter() {
            let mut mismatches = Vec::new();

            let observed = self.sim.step(&it.write)?;
            debug!("write {:#x} <- {:#x}: {}", it.address, it.value, observed);
            mismatches.extend(check_write(it.address, &observed));

            let observed = self.sim.step(&it.read)?;
            debug!("read {:#x}: {}", it.address, observed);
            mismatches.extend(check_read(&it.expected, &observed));

            for mismatch in &mismatches {
                error!("case {} @ {:#x}: {}", it.index, it.address, mismatch);
            }
            report.cases.push(CaseResult {
                index: it.index,
                address: it.address,
                mismatches,
            });
        }

        self.sim.step(&SignalVector::idle())?;
        info!("{report}");
        Ok(report)
    }
}
