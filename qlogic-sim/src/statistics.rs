//! Run statistics tracking

use crate::cache::CacheStatistics;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Statistics for one `analyze`/`simulate` call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Subcircuits resolved
    pub subcircuits: usize,

    /// Subcircuits that had at least one quantum source
    pub quantum_subcircuits: usize,

    /// Layers applied across all statevector runs
    pub layers_applied: usize,

    /// Layer applications answered by the result cache
    pub layers_reused: usize,

    /// Statevector runs (forced and unforced)
    pub statevector_runs: usize,

    /// Forced assignments enumerated across all groups
    pub assignments_enumerated: usize,

    /// Largest register simulated
    pub max_qubits: usize,

    /// Layer unitary cache, cumulative over the simulator's lifetime
    pub unitary_cache: CacheStatistics,

    /// Layer result cache, cumulative over the simulator's lifetime
    pub result_cache: CacheStatistics,

    /// Total time spent in the call
    pub total_time: Duration,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of layer applications served from the result cache
    pub fn reuse_ratio(&self) -> f64 {
        if self.layers_applied == 0 {
            0.0
        } else {
            self.layers_reused as f64 / self.layers_applied as f64
        }
    }
}

impl std::fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Run Statistics:")?;
        writeln!(f, "  Total time: {:?}", self.total_time)?;
        writeln!(
            f,
            "  Subcircuits: {} ({} quantum, up to {} qubits)",
            self.subcircuits, self.quantum_subcircuits, self.max_qubits
        )?;

        writeln!(f, "\n  Statevector:")?;
        writeln!(f, "    Runs: {}", self.statevector_runs)?;
        writeln!(f, "    Assignments: {}", self.assignments_enumerated)?;
        writeln!(
            f,
            "    Layers: {} ({:.1}% reused)",
            self.layers_applied,
            self.reuse_ratio() * 100.0
        )?;

        writeln!(f, "\n  Caches:")?;
        writeln!(f, "    Unitaries: {}", self.unitary_cache)?;
        writeln!(f, "    Results: {}", self.result_cache)?;

        Ok(())
    }
}
