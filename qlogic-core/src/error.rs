//! Error types for the circuit graph model

use crate::{ComponentId, QubitId, SocketAddr};
use thiserror::Error;

/// Errors that can occur while editing or querying a circuit graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircuitError {
    /// No component with this id exists in the circuit
    #[error("Unknown component {0}")]
    UnknownComponent(ComponentId),

    /// A component with this id is already present
    #[error("Component id {0} is already in use")]
    DuplicateComponent(ComponentId),

    /// Socket index beyond the component's socket list
    #[error("Socket {socket} does not exist (component has {available} sockets in that direction)")]
    SocketOutOfRange { socket: SocketAddr, available: usize },

    /// Wire endpoints carry different signal kinds
    #[error("Cannot wire {from} to {to}: socket kinds differ")]
    KindMismatch { from: SocketAddr, to: SocketAddr },

    /// Wire endpoints are both inputs or both outputs
    #[error("Cannot wire {from} to {to}: a wire joins one output to one input")]
    DirectionMismatch { from: SocketAddr, to: SocketAddr },

    /// Wire would join two sockets of the same component
    #[error("Cannot wire component {0} to itself")]
    SelfWire(ComponentId),

    /// Capability requested from a component that does not provide it
    #[error("Component '{component}' does not provide {capability}")]
    NotApplicable {
        component: String,
        capability: &'static str,
    },

    /// Component was asked for an operator on the wrong number of qubits
    #[error("Component '{component}' acts on {expected} qubits, but {actual} were assigned")]
    InvalidQubitCount {
        component: String,
        expected: usize,
        actual: usize,
    },

    /// Same qubit assigned to two sockets of one component
    #[error("Duplicate qubit {0} in component operator")]
    DuplicateQubit(QubitId),

    /// Qubit index outside the simulated register
    #[error("Invalid qubit index {0}: register has only {1} qubits")]
    InvalidQubit(usize, usize),
}

impl CircuitError {
    /// Create a "not applicable" error for a missing capability
    pub fn not_applicable(component: impl Into<String>, capability: &'static str) -> Self {
        Self::NotApplicable {
            component: component.into(),
            capability,
        }
    }

    /// Create an invalid qubit count error
    pub fn invalid_qubit_count(component: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::InvalidQubitCount {
            component: component.into(),
            expected,
            actual,
        }
    }
}
