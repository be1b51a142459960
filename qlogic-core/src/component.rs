//! Component capability contract and socket addressing

use crate::{CircuitError, QubitId, Result};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalogue type of a component (e.g. 14 for H, 5 for AND)
pub type ComponentTypeId = u32;

/// Instance id of a component, unique within one circuit
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct ComponentId(u32);

impl ComponentId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ComponentId {
    #[inline]
    fn from(id: u32) -> Self {
        Self::new(id)
    }
}

/// Kind of signal a socket carries
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SocketKind {
    Quantum,
    Classical,
}

impl SocketKind {
    #[inline]
    pub fn is_quantum(self) -> bool {
        matches!(self, SocketKind::Quantum)
    }
}

/// Whether a socket consumes or produces a signal
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    /// The other direction
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Input => Direction::Output,
            Direction::Output => Direction::Input,
        }
    }
}

/// Address of one socket: owning component, direction, and position in
/// that direction's socket list
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct SocketAddr {
    pub component: ComponentId,
    pub direction: Direction,
    pub index: usize,
}

impl SocketAddr {
    pub const fn new(component: ComponentId, direction: Direction, index: usize) -> Self {
        Self {
            component,
            direction,
            index,
        }
    }

    pub const fn input(component: ComponentId, index: usize) -> Self {
        Self::new(component, Direction::Input, index)
    }

    pub const fn output(component: ComponentId, index: usize) -> Self {
        Self::new(component, Direction::Output, index)
    }

    /// Socket at the same position in the opposite-direction list
    #[inline]
    pub fn mirrored(&self) -> Self {
        Self::new(self.component, self.direction.opposite(), self.index)
    }
}

impl fmt::Display for SocketAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.direction {
            Direction::Input => "in",
            Direction::Output => "out",
        };
        write!(f, "{}.{}{}", self.component, dir, self.index)
    }
}

/// User-assigned histogram group of a quantum measurement
///
/// Group 0 is ignored by histogram enumeration; groups 1 through 3 each
/// produce one joint-outcome histogram.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct MeasureGroup(u8);

impl MeasureGroup {
    /// Not part of any histogram
    pub const UNGROUPED: MeasureGroup = MeasureGroup(0);

    /// Highest group number the editor offers
    pub const MAX: u8 = 3;

    /// Create a group tag, returning `None` above [`MeasureGroup::MAX`]
    pub fn new(group: u8) -> Option<Self> {
        (group <= Self::MAX).then_some(Self(group))
    }

    /// All groups that produce histograms, in processing order
    pub fn histogram_groups() -> impl Iterator<Item = MeasureGroup> {
        (1..=Self::MAX).map(MeasureGroup)
    }

    #[inline]
    pub fn number(&self) -> u8 {
        self.0
    }

    #[inline]
    pub fn is_grouped(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for MeasureGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group {}", self.0)
    }
}

/// Role a component plays for the simulator, resolved once per run
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ComponentRole {
    /// Introduces one qubit into the register
    QuantumSource,
    /// Observes one qubit; reports live probabilities and histogram buckets
    QuantumMeasure(MeasureGroup),
    /// Records a resolved classical value
    ClassicalMeasure,
    /// Any other gate, sink, pipe, or source
    Gate,
}

/// How gate matrices treat complex phase factors
///
/// `RealParity` keeps the editor's real-valued placeholders (Y with real
/// signs, S/T/R as identity). `Complex` uses the true phases.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PhaseModel {
    #[default]
    RealParity,
    Complex,
}

/// Arguments to [`Component::unitary`]
#[derive(Clone, Debug)]
pub struct UnitaryRequest<'a> {
    /// Resolved values on the component's classical inputs, in socket order
    pub classical_inputs: &'a [bool],
    /// Size of the register the operator must act on
    pub total_qubits: usize,
    /// Qubit carried by each quantum socket the component acts on, in
    /// socket order (input sockets, or the output socket of a source)
    pub qubits: &'a [QubitId],
    pub phase_model: PhaseModel,
}

impl UnitaryRequest<'_> {
    /// Dimension of the full operator (`2^total_qubits`)
    #[inline]
    pub fn dimension(&self) -> usize {
        1 << self.total_qubits
    }

    /// Check that exactly `expected` distinct, in-range qubits were assigned
    pub fn expect_qubits(&self, component: &str, expected: usize) -> Result<()> {
        if self.qubits.len() != expected {
            return Err(CircuitError::invalid_qubit_count(
                component,
                expected,
                self.qubits.len(),
            ));
        }
        for (i, q) in self.qubits.iter().enumerate() {
            if q.index() >= self.total_qubits {
                return Err(CircuitError::InvalidQubit(q.index(), self.total_qubits));
            }
            if self.qubits[..i].contains(q) {
                return Err(CircuitError::DuplicateQubit(*q));
            }
        }
        Ok(())
    }
}

/// Capability contract every component placed in a [`crate::Circuit`] fulfils
///
/// Components describe their sockets and supply either a boolean function
/// (classical) or an operator on the full register (quantum). Output sinks
/// (`set_*`) default to no-ops; measurement components override them to keep
/// the values the editor displays.
pub trait Component: fmt::Debug + Send {
    /// Catalogue type id
    fn component_type(&self) -> ComponentTypeId;

    /// Display name (e.g. "H", "AND")
    fn name(&self) -> &str;

    /// Kinds of the input sockets, in socket order
    fn inputs(&self) -> &[SocketKind];

    /// Kinds of the output sockets, in socket order
    fn outputs(&self) -> &[SocketKind];

    fn role(&self) -> ComponentRole {
        ComponentRole::Gate
    }

    /// Whether this instance's operator depends on per-instance settings
    /// (parameters, preparations) rather than only on its type
    fn has_instance_matrix(&self) -> bool {
        false
    }

    /// Whether an unwired input at `index` blocks classical evaluation
    ///
    /// When this returns `false` the unwired input reads as `false`.
    fn input_required(&self, _index: usize) -> bool {
        true
    }

    /// Operator on the full `2^total_qubits` space, already expanded to
    /// act on the assigned qubits
    fn unitary(&self, _request: &UnitaryRequest<'_>) -> Result<Vec<Complex64>> {
        Err(CircuitError::not_applicable(self.name(), "a unitary"))
    }

    /// Output bits as a pure function of the ordered input bits
    fn classical_output(&self, _inputs: &[bool]) -> Result<Vec<bool>> {
        Err(CircuitError::not_applicable(self.name(), "a classical output"))
    }

    /// Display flag: `true` while the component's value is unresolved
    fn set_pending(&mut self, _pending: bool) {}

    /// Joint-outcome histogram of the component's measurement group
    fn set_buckets(&mut self, _buckets: &[f64]) {}

    /// Live probability of observing 1
    fn set_one_rate(&mut self, _probability: f64) {}

    /// Resolved classical result
    fn set_result(&mut self, _result: bool) {}

    fn socket_kinds(&self, direction: Direction) -> &[SocketKind] {
        match direction {
            Direction::Input => self.inputs(),
            Direction::Output => self.outputs(),
        }
    }

    /// Number of sockets in both directions
    fn socket_count(&self) -> usize {
        self.inputs().len() + self.outputs().len()
    }

    /// Whether any socket carries a quantum signal
    fn is_quantum(&self) -> bool {
        self.inputs()
            .iter()
            .chain(self.outputs())
            .any(|k| k.is_quantum())
    }
}
