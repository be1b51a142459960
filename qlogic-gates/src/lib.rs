//! Gate matrices and component catalogue for qlogic circuits
//!
//! This crate supplies everything the simulator asks of a component:
//!
//! - [`matrices`]: local 2×2 / 4×4 gate matrices and controlled forms
//! - [`matrix_ops`]: tensor padding and embedding onto arbitrary qubits
//! - [`classical`] and [`quantum`]: the editor's component types
//! - [`catalog`]: type ids and a factory keyed by them
//!
//! # Example
//!
//! ```
//! use qlogic_core::{Component, PhaseModel, QubitId, UnitaryRequest};
//! use qlogic_gates::catalog::{create_component, type_ids};
//! use qlogic_gates::matrix_ops::is_unitary;
//!
//! let h = create_component(type_ids::H).unwrap();
//! let qubits = [QubitId::new(1)];
//! let operator = h
//!     .unitary(&UnitaryRequest {
//!         classical_inputs: &[],
//!         total_qubits: 2,
//!         qubits: &qubits,
//!         phase_model: PhaseModel::RealParity,
//!     })
//!     .unwrap();
//! assert_eq!(operator.len(), 16);
//! assert!(is_unitary(&operator, 1e-10));
//! ```

pub mod catalog;
pub mod classical;
pub mod matrices;
pub mod matrix_ops;
pub mod quantum;

pub use catalog::{create_component, type_ids};
pub use classical::{
    Annotation, ClassicalMeasure, ClassicalPipe, ClassicalSink, ClassicalSource, LogicGate, LogicOp,
};
pub use quantum::{
    ControlledGate, GateKind, Passthrough, PhaseRotation, QuantumMeasure, QuantumSource,
    SingleQubitGate, Swap, Toffoli,
};
