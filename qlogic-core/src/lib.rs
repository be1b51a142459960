//! Core types and traits for qlogic hybrid circuits
//!
//! This crate provides the graph model the simulator consumes:
//! - [`ComponentId`] and [`QubitId`]: Type-safe addressing
//! - [`Component`]: The capability contract every placed component fulfils
//! - [`Circuit`]: Components plus the wires joining their sockets
//!
//! # Example
//! ```
//! use qlogic_core::{Circuit, Direction, SocketAddr};
//!
//! let circuit = Circuit::new();
//! assert!(circuit.is_empty());
//! let socket = SocketAddr::output(0.into(), 0);
//! assert_eq!(socket.direction, Direction::Output);
//! ```

pub mod circuit;
pub mod component;
pub mod error;
pub mod qubit;

// Re-exports for convenience
pub use circuit::{Circuit, Wire};
pub use component::{
    Component, ComponentId, ComponentRole, ComponentTypeId, Direction, MeasureGroup, PhaseModel,
    SocketAddr, SocketKind, UnitaryRequest,
};
pub use error::CircuitError;
pub use num_complex::Complex64;
pub use qubit::QubitId;

/// Type alias for results in qlogic
pub type Result<T> = std::result::Result<T, CircuitError>;
