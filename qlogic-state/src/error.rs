//! Error types for statevector operations

use thiserror::Error;

/// Errors that can occur during statevector operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// Invalid qubit index
    #[error("Invalid qubit index {index} for {num_qubits}-qubit state")]
    InvalidQubitIndex { index: usize, num_qubits: usize },

    /// Register too large to hold as a dense vector
    #[error("Cannot allocate a {num_qubits}-qubit state (maximum {max})")]
    TooManyQubits { num_qubits: usize, max: usize },

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Projection onto an outcome the state cannot produce
    #[error("Cannot collapse qubit {qubit} onto outcome {outcome}: probability {probability}")]
    ImpossibleOutcome {
        qubit: usize,
        outcome: u8,
        probability: f64,
    },

    /// State has no weight left to normalise
    #[error("State vector has zero norm")]
    ZeroNorm,
}

/// Result type for statevector operations
pub type Result<T> = std::result::Result<T, StateError>;
