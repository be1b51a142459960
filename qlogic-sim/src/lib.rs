//! Hybrid classical/quantum circuit simulator
//!
//! This crate turns a [`qlogic_core::Circuit`] into the values an editor
//! displays: resolved classical signals, live measurement probabilities,
//! and joint-outcome histograms for up to three measurement groups.
//!
//! # Pipeline
//!
//! For every weakly connected subcircuit:
//!
//! 1. [`ClassicalEvaluator`] resolves the purely classical components to a
//!    fixpoint
//! 2. [`QubitIndexAssigner`] threads one qubit per quantum source through
//!    the gates it feeds
//! 3. [`GateLayerizer`] packs quantum components into dependency-ordered
//!    layers
//! 4. [`MeasurementGroupEnumerator`] drives one [`StatevectorEngine`] run
//!    per forced outcome of each group, then a free run records the live
//!    one rates
//!
//! Layer unitaries and layer transitions are memoised in LRU caches owned
//! by the [`Simulator`] and kept across calls.
//!
//! # Example
//!
//! ```
//! use qlogic_core::{Circuit, SocketAddr};
//! use qlogic_gates::{ClassicalMeasure, ClassicalSource, LogicGate, LogicOp};
//! use qlogic_sim::Simulator;
//!
//! let mut circuit = Circuit::new();
//! let on = circuit.add_component(Box::new(ClassicalSource::new(true)));
//! let off = circuit.add_component(Box::new(ClassicalSource::new(false)));
//! let and = circuit.add_component(Box::new(LogicGate::new(LogicOp::And)));
//! let measure = circuit.add_component(Box::new(ClassicalMeasure::new()));
//! circuit.connect(SocketAddr::output(on, 0), SocketAddr::input(and, 0)).unwrap();
//! circuit.connect(SocketAddr::output(off, 0), SocketAddr::input(and, 1)).unwrap();
//! circuit.connect(SocketAddr::output(and, 0), SocketAddr::input(measure, 0)).unwrap();
//!
//! let report = Simulator::default().simulate(&mut circuit).unwrap();
//! assert_eq!(report.classical_result(measure), Some(false));
//! ```

pub mod cache;
pub mod classical;
pub mod config;
pub mod engine;
pub mod error;
pub mod layers;
pub mod measurement_groups;
pub mod profile;
pub mod progress;
pub mod qubit_index;
pub mod report;
pub mod simulator;
pub mod statistics;
pub mod subcircuit;

pub use cache::{CacheStatistics, LayerCache, LayerKey, LruCache};
pub use classical::{ClassicalEvaluator, ClassicalValues};
pub use config::{SimulatorConfig, TopologyMode};
pub use engine::{ForcedAssignment, RunContext, RunOutcome, StatevectorEngine};
pub use error::{Result, SimulatorError};
pub use layers::{GateLayerizer, Layer, LayerPlan};
pub use measurement_groups::{GroupHistogram, MeasurementGroupEnumerator};
pub use profile::{ComponentProfile, ProfileTable};
pub use progress::{CancelFlag, NoProgress, ProgressObserver};
pub use qubit_index::{QubitIndexAssigner, QubitIndexMap};
pub use report::{ComponentStatus, MeasurementReport, SimulationReport, SubcircuitSummary};
pub use simulator::Simulator;
pub use statistics::RunStatistics;
pub use subcircuit::{Subcircuit, SubcircuitResolver};
