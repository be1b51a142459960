//! Quantum components: sources, sinks, measures, and unitary gates
//!
//! Every component builds its local operator, then expands it onto the
//! qubits its sockets were assigned with [`embed_operator`]. Multi-qubit
//! gates list their sockets control-first, so `request.qubits[0]` is the
//! most significant qubit of the local operator.

use crate::catalog::type_ids;
use crate::matrices::{
    self, flatten, multi_controlled, preparation, Matrix2, HADAMARD, IDENTITY, PAULI_X, PAULI_Y,
    PAULI_Y_PARITY, PAULI_Z, SWAP, S_GATE, T_GATE,
};
use crate::matrix_ops::embed_operator;
use num_complex::Complex64;
use qlogic_core::{
    Component, ComponentRole, ComponentTypeId, MeasureGroup, PhaseModel, Result, SocketKind,
    UnitaryRequest,
};
use std::f64::consts::PI;

const Q: SocketKind = SocketKind::Quantum;

fn expand(local: &[Complex64], request: &UnitaryRequest<'_>, name: &str, arity: usize) -> Result<Vec<Complex64>> {
    request.expect_qubits(name, arity)?;
    Ok(embed_operator(local, request.total_qubits, request.qubits))
}

/// Introduces one qubit prepared as `alpha|0⟩ + beta|1⟩`
#[derive(Debug, Clone)]
pub struct QuantumSource {
    alpha: f64,
    beta: f64,
}

impl QuantumSource {
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }

    /// Source in |1⟩
    pub fn one() -> Self {
        Self::new(0.0, 1.0)
    }

    pub fn amplitudes(&self) -> (f64, f64) {
        (self.alpha, self.beta)
    }

    pub fn set_amplitudes(&mut self, alpha: f64, beta: f64) {
        self.alpha = alpha;
        self.beta = beta;
    }
}

impl Default for QuantumSource {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

impl Component for QuantumSource {
    fn component_type(&self) -> ComponentTypeId {
        type_ids::QUANTUM_SOURCE
    }

    fn name(&self) -> &str {
        "Source (quantum)"
    }

    fn inputs(&self) -> &[SocketKind] {
        &[]
    }

    fn outputs(&self) -> &[SocketKind] {
        &[Q]
    }

    fn role(&self) -> ComponentRole {
        ComponentRole::QuantumSource
    }

    fn has_instance_matrix(&self) -> bool {
        true
    }

    fn unitary(&self, request: &UnitaryRequest<'_>) -> Result<Vec<Complex64>> {
        let local = flatten(&preparation(self.alpha, self.beta));
        expand(&local, request, self.name(), 1)
    }
}

/// Identity on one qubit; used for sinks and pipes
#[derive(Debug, Clone)]
pub struct Passthrough {
    type_id: ComponentTypeId,
    with_output: bool,
}

impl Passthrough {
    pub fn sink() -> Self {
        Self {
            type_id: type_ids::QUANTUM_SINK,
            with_output: false,
        }
    }

    pub fn pipe() -> Self {
        Self {
            type_id: type_ids::QUANTUM_PIPE,
            with_output: true,
        }
    }
}

impl Component for Passthrough {
    fn component_type(&self) -> ComponentTypeId {
        self.type_id
    }

    fn name(&self) -> &str {
        if self.with_output {
            "Pipe (quantum)"
        } else {
            "Sink (quantum)"
        }
    }

    fn inputs(&self) -> &[SocketKind] {
        &[Q]
    }

    fn outputs(&self) -> &[SocketKind] {
        if self.with_output {
            &[Q]
        } else {
            &[]
        }
    }

    fn unitary(&self, request: &UnitaryRequest<'_>) -> Result<Vec<Complex64>> {
        expand(&flatten(&IDENTITY), request, self.name(), 1)
    }
}

/// Observes one qubit without disturbing it
///
/// The simulator reports the live probability of 1 and, for grouped
/// measures, the joint histogram of the whole group.
#[derive(Debug, Clone, Default)]
pub struct QuantumMeasure {
    group: MeasureGroup,
    one_rate: f64,
    buckets: Vec<f64>,
    pending: bool,
}

impl QuantumMeasure {
    pub fn new(group: MeasureGroup) -> Self {
        Self {
            group,
            ..Self::default()
        }
    }

    pub fn group(&self) -> MeasureGroup {
        self.group
    }

    pub fn set_group(&mut self, group: MeasureGroup) {
        self.group = group;
    }

    pub fn one_rate(&self) -> f64 {
        self.one_rate
    }

    pub fn buckets(&self) -> &[f64] {
        &self.buckets
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

impl Component for QuantumMeasure {
    fn component_type(&self) -> ComponentTypeId {
        type_ids::QUANTUM_MEASURE
    }

    fn name(&self) -> &str {
        "Measure (quantum)"
    }

    fn inputs(&self) -> &[SocketKind] {
        &[Q]
    }

    fn outputs(&self) -> &[SocketKind] {
        &[Q]
    }

    fn role(&self) -> ComponentRole {
        ComponentRole::QuantumMeasure(self.group)
    }

    fn unitary(&self, request: &UnitaryRequest<'_>) -> Result<Vec<Complex64>> {
        expand(&flatten(&IDENTITY), request, self.name(), 1)
    }

    fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }

    fn set_buckets(&mut self, buckets: &[f64]) {
        self.buckets = buckets.to_vec();
    }

    fn set_one_rate(&mut self, probability: f64) {
        self.one_rate = probability;
    }
}

/// Fixed single-qubit gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    X,
    Y,
    Z,
    H,
    S,
    T,
}

impl GateKind {
    pub const ALL: [GateKind; 6] = [
        GateKind::X,
        GateKind::Y,
        GateKind::Z,
        GateKind::H,
        GateKind::S,
        GateKind::T,
    ];

    /// 2×2 matrix under the given phase model
    pub fn matrix(self, model: PhaseModel) -> Matrix2 {
        match (self, model) {
            (GateKind::X, _) => PAULI_X,
            (GateKind::Y, PhaseModel::RealParity) => PAULI_Y_PARITY,
            (GateKind::Y, PhaseModel::Complex) => PAULI_Y,
            (GateKind::Z, _) => PAULI_Z,
            (GateKind::H, _) => HADAMARD,
            (GateKind::S, PhaseModel::RealParity) => IDENTITY,
            (GateKind::S, PhaseModel::Complex) => S_GATE,
            (GateKind::T, PhaseModel::RealParity) => IDENTITY,
            (GateKind::T, PhaseModel::Complex) => T_GATE,
        }
    }

    fn offset(self) -> ComponentTypeId {
        match self {
            GateKind::X => 0,
            GateKind::Y => 1,
            GateKind::Z => 2,
            GateKind::H => 3,
            GateKind::S => 4,
            GateKind::T => 5,
        }
    }

    fn name(self, controlled: bool) -> &'static str {
        match (self, controlled) {
            (GateKind::X, false) => "X",
            (GateKind::Y, false) => "Y",
            (GateKind::Z, false) => "Z",
            (GateKind::H, false) => "H",
            (GateKind::S, false) => "S",
            (GateKind::T, false) => "T",
            (GateKind::X, true) => "CX",
            (GateKind::Y, true) => "CY",
            (GateKind::Z, true) => "CZ",
            (GateKind::H, true) => "CH",
            (GateKind::S, true) => "CS",
            (GateKind::T, true) => "CT",
        }
    }
}

/// X, Y, Z, H, S or T on one qubit
#[derive(Debug, Clone)]
pub struct SingleQubitGate {
    kind: GateKind,
}

impl SingleQubitGate {
    pub fn new(kind: GateKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> GateKind {
        self.kind
    }
}

impl Component for SingleQubitGate {
    fn component_type(&self) -> ComponentTypeId {
        type_ids::X + self.kind.offset()
    }

    fn name(&self) -> &str {
        self.kind.name(false)
    }

    fn inputs(&self) -> &[SocketKind] {
        &[Q]
    }

    fn outputs(&self) -> &[SocketKind] {
        &[Q]
    }

    fn unitary(&self, request: &UnitaryRequest<'_>) -> Result<Vec<Complex64>> {
        let local = flatten(&self.kind.matrix(request.phase_model));
        expand(&local, request, self.name(), 1)
    }
}

/// Single-qubit gate applied when the control qubit is 1
///
/// Sockets are (control, target) on both sides.
#[derive(Debug, Clone)]
pub struct ControlledGate {
    kind: GateKind,
}

impl ControlledGate {
    pub fn new(kind: GateKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> GateKind {
        self.kind
    }
}

impl Component for ControlledGate {
    fn component_type(&self) -> ComponentTypeId {
        type_ids::CONTROLLED_X + self.kind.offset()
    }

    fn name(&self) -> &str {
        self.kind.name(true)
    }

    fn inputs(&self) -> &[SocketKind] {
        &[Q, Q]
    }

    fn outputs(&self) -> &[SocketKind] {
        &[Q, Q]
    }

    fn unitary(&self, request: &UnitaryRequest<'_>) -> Result<Vec<Complex64>> {
        let local = multi_controlled(&self.kind.matrix(request.phase_model), 1);
        expand(&local, request, self.name(), 2)
    }
}

/// Phase rotation by θ = pi_coefficient·π + constant, optionally controlled
#[derive(Debug, Clone, Default)]
pub struct PhaseRotation {
    pi_coefficient: f64,
    constant: f64,
    controlled: bool,
}

impl PhaseRotation {
    pub fn new(pi_coefficient: f64, constant: f64) -> Self {
        Self {
            pi_coefficient,
            constant,
            controlled: false,
        }
    }

    pub fn controlled(pi_coefficient: f64, constant: f64) -> Self {
        Self {
            controlled: true,
            ..Self::new(pi_coefficient, constant)
        }
    }

    pub fn pi_coefficient(&self) -> f64 {
        self.pi_coefficient
    }

    pub fn set_pi_coefficient(&mut self, value: f64) {
        self.pi_coefficient = value;
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn set_constant(&mut self, value: f64) {
        self.constant = value;
    }

    pub fn angle(&self) -> f64 {
        self.pi_coefficient * PI + self.constant
    }

    fn local_matrix(&self, model: PhaseModel) -> Matrix2 {
        match model {
            PhaseModel::RealParity => IDENTITY,
            PhaseModel::Complex => matrices::phase(self.angle()),
        }
    }
}

impl Component for PhaseRotation {
    fn component_type(&self) -> ComponentTypeId {
        if self.controlled {
            type_ids::CONTROLLED_R
        } else {
            type_ids::R
        }
    }

    fn name(&self) -> &str {
        if self.controlled {
            "CR"
        } else {
            "R"
        }
    }

    fn inputs(&self) -> &[SocketKind] {
        if self.controlled {
            &[Q, Q]
        } else {
            &[Q]
        }
    }

    fn outputs(&self) -> &[SocketKind] {
        self.inputs()
    }

    fn has_instance_matrix(&self) -> bool {
        true
    }

    fn unitary(&self, request: &UnitaryRequest<'_>) -> Result<Vec<Complex64>> {
        let u = self.local_matrix(request.phase_model);
        if self.controlled {
            expand(&multi_controlled(&u, 1), request, self.name(), 2)
        } else {
            expand(&flatten(&u), request, self.name(), 1)
        }
    }
}

/// Exchanges two qubits
#[derive(Debug, Clone, Default)]
pub struct Swap;

impl Component for Swap {
    fn component_type(&self) -> ComponentTypeId {
        type_ids::SWAP
    }

    fn name(&self) -> &str {
        "SWAP"
    }

    fn inputs(&self) -> &[SocketKind] {
        &[Q, Q]
    }

    fn outputs(&self) -> &[SocketKind] {
        &[Q, Q]
    }

    fn unitary(&self, request: &UnitaryRequest<'_>) -> Result<Vec<Complex64>> {
        let local: Vec<Complex64> = SWAP.iter().flatten().copied().collect();
        expand(&local, request, self.name(), 2)
    }
}

/// Toffoli gate; sockets are (control, control, target)
#[derive(Debug, Clone, Default)]
pub struct Toffoli;

impl Component for Toffoli {
    fn component_type(&self) -> ComponentTypeId {
        type_ids::CCNOT
    }

    fn name(&self) -> &str {
        "CCNOT"
    }

    fn inputs(&self) -> &[SocketKind] {
        &[Q, Q, Q]
    }

    fn outputs(&self) -> &[SocketKind] {
        &[Q, Q, Q]
    }

    fn unitary(&self, request: &UnitaryRequest<'_>) -> Result<Vec<Complex64>> {
        expand(&multi_controlled(&PAULI_X, 2), request, self.name(), 3)
    }
}
