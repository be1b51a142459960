//! Simulator configuration

use qlogic_core::PhaseModel;
use serde::{Deserialize, Serialize};

/// How the layerizer treats quantum components it cannot schedule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopologyMode {
    /// Unschedulable components and unindexed sockets abort the run
    #[default]
    Strict,
    /// They are logged and left out, so half-wired edits still simulate
    Lenient,
}

/// Configuration for the circuit simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Entries per LRU map (layer unitaries and layer results each)
    ///
    /// Default: 200
    pub cache_capacity: usize,

    /// Enable the layer caches
    ///
    /// Default: true
    pub enable_cache: bool,

    /// Strict or lenient handling of malformed quantum wiring
    ///
    /// Default: Strict
    pub topology_mode: TopologyMode,

    /// Real-valued placeholder phases or true complex phases
    ///
    /// Default: RealParity
    pub phase_model: PhaseModel,

    /// Largest register a single subcircuit may need
    ///
    /// Each layer builds a dense `2^Q × 2^Q` operator, so memory grows as
    /// `4^Q`.
    ///
    /// Default: 10
    pub max_qubits: usize,

    /// Largest measurement group to enumerate (`2^n` runs per group)
    ///
    /// Default: 10
    pub max_group_size: usize,

    /// Collect run statistics into the report
    ///
    /// Default: false
    pub collect_statistics: bool,

    /// Probabilities at or below this are treated as zero when collapsing
    ///
    /// Default: 1e-10
    pub tolerance: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 200,
            enable_cache: true,
            topology_mode: TopologyMode::Strict,
            phase_model: PhaseModel::RealParity,
            max_qubits: 10,
            max_group_size: 10,
            collect_statistics: false,
            tolerance: 1e-10,
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, failing fast on malformed wiring
    pub fn strict() -> Self {
        Self::default()
    }

    /// Configuration for a live editor
    ///
    /// - Lenient topology handling
    /// - Statistics collection enabled
    pub fn lenient() -> Self {
        Self {
            topology_mode: TopologyMode::Lenient,
            collect_statistics: true,
            ..Default::default()
        }
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Enable or disable the layer caches
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.enable_cache = enabled;
        self
    }

    pub fn with_topology_mode(mut self, mode: TopologyMode) -> Self {
        self.topology_mode = mode;
        self
    }

    pub fn with_phase_model(mut self, model: PhaseModel) -> Self {
        self.phase_model = model;
        self
    }

    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    pub fn with_max_group_size(mut self, size: usize) -> Self {
        self.max_group_size = size;
        self
    }

    /// Enable statistics collection
    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.collect_statistics = enabled;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.enable_cache && self.cache_capacity == 0 {
            return Err("cache_capacity must be > 0 when the cache is enabled".to_string());
        }

        if self.max_qubits == 0 || self.max_qubits > qlogic_state::MAX_QUBITS {
            return Err(format!(
                "max_qubits must be in 1..={}, got {}",
                qlogic_state::MAX_QUBITS,
                self.max_qubits
            ));
        }

        if self.max_group_size == 0 || self.max_group_size >= usize::BITS as usize {
            return Err(format!("max_group_size out of range: {}", self.max_group_size));
        }

        if !(self.tolerance >= 0.0 && self.tolerance < 1.0) {
            return Err(format!("tolerance must be in [0,1), got {}", self.tolerance));
        }

        Ok(())
    }

    pub(crate) fn is_strict(&self) -> bool {
        self.topology_mode == TopologyMode::Strict
    }
}
