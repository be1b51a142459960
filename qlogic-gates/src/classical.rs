//! Purely classical components: sources, sinks, logic gates, measures

use crate::catalog::type_ids;
use qlogic_core::{CircuitError, Component, ComponentRole, ComponentTypeId, Result, SocketKind};

const C: SocketKind = SocketKind::Classical;

/// Constant boolean source
#[derive(Debug, Clone, Default)]
pub struct ClassicalSource {
    on: bool,
}

impl ClassicalSource {
    pub fn new(on: bool) -> Self {
        Self { on }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn set_on(&mut self, on: bool) {
        self.on = on;
    }
}

impl Component for ClassicalSource {
    fn component_type(&self) -> ComponentTypeId {
        type_ids::CLASSICAL_SOURCE
    }

    fn name(&self) -> &str {
        "Source (classical)"
    }

    fn inputs(&self) -> &[SocketKind] {
        &[]
    }

    fn outputs(&self) -> &[SocketKind] {
        &[C]
    }

    fn classical_output(&self, _inputs: &[bool]) -> Result<Vec<bool>> {
        Ok(vec![self.on])
    }
}

/// Terminates a classical wire
#[derive(Debug, Clone, Default)]
pub struct ClassicalSink;

impl Component for ClassicalSink {
    fn component_type(&self) -> ComponentTypeId {
        type_ids::CLASSICAL_SINK
    }

    fn name(&self) -> &str {
        "Sink (classical)"
    }

    fn inputs(&self) -> &[SocketKind] {
        &[C]
    }

    fn outputs(&self) -> &[SocketKind] {
        &[]
    }

    fn classical_output(&self, _inputs: &[bool]) -> Result<Vec<bool>> {
        Ok(Vec::new())
    }
}

/// Passes a classical signal through unchanged
#[derive(Debug, Clone, Default)]
pub struct ClassicalPipe;

impl Component for ClassicalPipe {
    fn component_type(&self) -> ComponentTypeId {
        type_ids::CLASSICAL_PIPE
    }

    fn name(&self) -> &str {
        "Pipe (classical)"
    }

    fn inputs(&self) -> &[SocketKind] {
        &[C]
    }

    fn outputs(&self) -> &[SocketKind] {
        &[C]
    }

    fn classical_output(&self, inputs: &[bool]) -> Result<Vec<bool>> {
        Ok(inputs.to_vec())
    }
}

/// Boolean function of a logic gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicOp {
    Not,
    And,
    Or,
    Nand,
    Nor,
    Xor,
    Xnor,
}

impl LogicOp {
    pub fn arity(self) -> usize {
        match self {
            LogicOp::Not => 1,
            _ => 2,
        }
    }

    pub fn type_id(self) -> ComponentTypeId {
        match self {
            LogicOp::Not => type_ids::NOT,
            LogicOp::And => type_ids::AND,
            LogicOp::Or => type_ids::OR,
            LogicOp::Nand => type_ids::NAND,
            LogicOp::Nor => type_ids::NOR,
            LogicOp::Xor => type_ids::XOR,
            LogicOp::Xnor => type_ids::XNOR,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LogicOp::Not => "NOT",
            LogicOp::And => "AND",
            LogicOp::Or => "OR",
            LogicOp::Nand => "NAND",
            LogicOp::Nor => "NOR",
            LogicOp::Xor => "XOR",
            LogicOp::Xnor => "XNOR",
        }
    }

    pub fn apply(self, inputs: &[bool]) -> bool {
        let a = inputs.first().copied().unwrap_or(false);
        let b = inputs.get(1).copied().unwrap_or(false);
        match self {
            LogicOp::Not => !a,
            LogicOp::And => a && b,
            LogicOp::Or => a || b,
            LogicOp::Nand => !(a && b),
            LogicOp::Nor => !(a || b),
            LogicOp::Xor => a ^ b,
            LogicOp::Xnor => !(a ^ b),
        }
    }
}

/// Single-output logic gate
#[derive(Debug, Clone)]
pub struct LogicGate {
    op: LogicOp,
}

impl LogicGate {
    pub fn new(op: LogicOp) -> Self {
        Self { op }
    }

    pub fn op(&self) -> LogicOp {
        self.op
    }
}

impl Component for LogicGate {
    fn component_type(&self) -> ComponentTypeId {
        self.op.type_id()
    }

    fn name(&self) -> &str {
        self.op.name()
    }

    fn inputs(&self) -> &[SocketKind] {
        match self.op {
            LogicOp::Not => &[C],
            _ => &[C, C],
        }
    }

    fn outputs(&self) -> &[SocketKind] {
        &[C]
    }

    fn classical_output(&self, inputs: &[bool]) -> Result<Vec<bool>> {
        if inputs.len() != self.op.arity() {
            return Err(CircuitError::not_applicable(
                self.op.name(),
                "an output for this many inputs",
            ));
        }
        Ok(vec![self.op.apply(inputs)])
    }
}

/// Displays a resolved classical value and forwards it
#[derive(Debug, Clone, Default)]
pub struct ClassicalMeasure {
    result: bool,
    pending: bool,
}

impl ClassicalMeasure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn result(&self) -> bool {
        self.result
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

impl Component for ClassicalMeasure {
    fn component_type(&self) -> ComponentTypeId {
        type_ids::CLASSICAL_MEASURE
    }

    fn name(&self) -> &str {
        "Measure (classical)"
    }

    fn inputs(&self) -> &[SocketKind] {
        &[C]
    }

    fn outputs(&self) -> &[SocketKind] {
        &[C]
    }

    fn role(&self) -> ComponentRole {
        ComponentRole::ClassicalMeasure
    }

    fn classical_output(&self, inputs: &[bool]) -> Result<Vec<bool>> {
        Ok(vec![inputs.first().copied().unwrap_or(false)])
    }

    fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }

    fn set_result(&mut self, result: bool) {
        self.result = result;
    }
}

/// Socket-less decoration (text labels, shaded areas)
#[derive(Debug, Clone)]
pub struct Annotation {
    type_id: ComponentTypeId,
    text: String,
}

impl Annotation {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            type_id: type_ids::TEXT,
            text: text.into(),
        }
    }

    pub fn area() -> Self {
        Self {
            type_id: type_ids::AREA,
            text: String::new(),
        }
    }

    pub fn content(&self) -> &str {
        &self.text
    }
}

impl Component for Annotation {
    fn component_type(&self) -> ComponentTypeId {
        self.type_id
    }

    fn name(&self) -> &str {
        if self.type_id == type_ids::TEXT {
            "Text"
        } else {
            "Area"
        }
    }

    fn inputs(&self) -> &[SocketKind] {
        &[]
    }

    fn outputs(&self) -> &[SocketKind] {
        &[]
    }
}
