//! Error types for the simulator

use qlogic_core::{CircuitError, ComponentId, MeasureGroup, QubitId, SocketAddr};
use qlogic_state::StateError;
use thiserror::Error;

/// Result type for simulator operations
pub type Result<T> = std::result::Result<T, SimulatorError>;

/// Errors that abort a simulation run
///
/// No results are published when `simulate` returns one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulatorError {
    /// Two components claimed the same qubit in one layer
    #[error("Qubit {qubit} reserved twice in layer {layer} (components {first} and {second})")]
    SlotConflict {
        layer: usize,
        qubit: QubitId,
        first: ComponentId,
        second: ComponentId,
    },

    /// Following a qubit's wires led back to a component it already passed
    #[error("Cyclic quantum wiring: qubit {qubit} re-enters component {component}")]
    QubitCycle { qubit: QubitId, component: ComponentId },

    /// Layerizer stalled with eligible components left over
    #[error("{} quantum components could not be scheduled: {:?}", .components.len(), .components)]
    UnplacedComponents { components: Vec<ComponentId> },

    /// A quantum socket of a schedulable component carries no qubit
    #[error("Quantum socket {socket} is not reached by any quantum source")]
    UnindexedSocket { socket: SocketAddr },

    /// Subcircuit register larger than the configured limit
    #[error("Too many qubits: subcircuit has {num_qubits}, max supported is {max_qubits}")]
    TooManyQubits { num_qubits: usize, max_qubits: usize },

    /// Measurement group larger than the configured limit
    #[error("Measurement {group} has {size} members, max supported is {max}")]
    GroupTooLarge {
        group: MeasureGroup,
        size: usize,
        max: usize,
    },

    /// The progress observer asked to stop
    #[error("Simulation cancelled")]
    Cancelled,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A component rejected a capability request
    #[error(transparent)]
    Circuit(#[from] CircuitError),

    /// Statevector operation failed
    #[error(transparent)]
    State(#[from] StateError),
}

impl SimulatorError {
    /// Whether the error stems from how the quantum part is wired
    pub fn is_topology_error(&self) -> bool {
        matches!(
            self,
            SimulatorError::SlotConflict { .. }
                | SimulatorError::QubitCycle { .. }
                | SimulatorError::UnplacedComponents { .. }
                | SimulatorError::UnindexedSocket { .. }
        )
    }

    /// Everything except a requested cancellation
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SimulatorError::Cancelled)
    }
}
