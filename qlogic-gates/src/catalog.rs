//! Type-id catalogue and component factory

use crate::classical::{Annotation, ClassicalMeasure, ClassicalPipe, ClassicalSink, ClassicalSource, LogicGate, LogicOp};
use crate::quantum::{
    ControlledGate, GateKind, Passthrough, PhaseRotation, QuantumMeasure, QuantumSource,
    SingleQubitGate, Swap, Toffoli,
};
use qlogic_core::{Component, ComponentTypeId, MeasureGroup};

/// Editor type ids
pub mod type_ids {
    use qlogic_core::ComponentTypeId;

    pub const CLASSICAL_SOURCE: ComponentTypeId = 0;
    pub const QUANTUM_SOURCE: ComponentTypeId = 1;
    pub const CLASSICAL_SINK: ComponentTypeId = 2;
    pub const QUANTUM_SINK: ComponentTypeId = 3;
    pub const NOT: ComponentTypeId = 4;
    pub const AND: ComponentTypeId = 5;
    pub const OR: ComponentTypeId = 6;
    pub const NAND: ComponentTypeId = 7;
    pub const NOR: ComponentTypeId = 8;
    pub const XOR: ComponentTypeId = 9;
    pub const XNOR: ComponentTypeId = 10;
    pub const X: ComponentTypeId = 11;
    pub const Y: ComponentTypeId = 12;
    pub const Z: ComponentTypeId = 13;
    pub const H: ComponentTypeId = 14;
    pub const S: ComponentTypeId = 15;
    pub const T: ComponentTypeId = 16;
    pub const CLASSICAL_MEASURE: ComponentTypeId = 17;
    pub const QUANTUM_MEASURE: ComponentTypeId = 18;
    pub const CONTROLLED_X: ComponentTypeId = 19;
    pub const CONTROLLED_Y: ComponentTypeId = 20;
    pub const CONTROLLED_Z: ComponentTypeId = 21;
    pub const CONTROLLED_H: ComponentTypeId = 22;
    pub const CONTROLLED_S: ComponentTypeId = 23;
    pub const CONTROLLED_T: ComponentTypeId = 24;
    pub const R: ComponentTypeId = 25;
    pub const CONTROLLED_R: ComponentTypeId = 26;
    pub const SWAP: ComponentTypeId = 28;
    pub const TEXT: ComponentTypeId = 29;
    pub const AREA: ComponentTypeId = 30;
    pub const CLASSICAL_PIPE: ComponentTypeId = 31;
    pub const QUANTUM_PIPE: ComponentTypeId = 32;
    pub const CCNOT: ComponentTypeId = 33;
}

const LOGIC_OPS: [LogicOp; 7] = [
    LogicOp::Not,
    LogicOp::And,
    LogicOp::Or,
    LogicOp::Nand,
    LogicOp::Nor,
    LogicOp::Xor,
    LogicOp::Xnor,
];

/// Create a component of the given type in its default configuration
///
/// Returns `None` for ids the catalogue does not define (e.g. 27).
pub fn create_component(type_id: ComponentTypeId) -> Option<Box<dyn Component>> {
    use type_ids::*;

    let component: Box<dyn Component> = match type_id {
        CLASSICAL_SOURCE => Box::new(ClassicalSource::new(true)),
        QUANTUM_SOURCE => Box::new(QuantumSource::default()),
        CLASSICAL_SINK => Box::new(ClassicalSink),
        QUANTUM_SINK => Box::new(Passthrough::sink()),
        NOT..=XNOR => Box::new(LogicGate::new(LOGIC_OPS[(type_id - NOT) as usize])),
        X..=T => Box::new(SingleQubitGate::new(GateKind::ALL[(type_id - X) as usize])),
        CLASSICAL_MEASURE => Box::new(ClassicalMeasure::new()),
        QUANTUM_MEASURE => Box::new(QuantumMeasure::new(MeasureGroup::UNGROUPED)),
        CONTROLLED_X..=CONTROLLED_T => Box::new(ControlledGate::new(
            GateKind::ALL[(type_id - CONTROLLED_X) as usize],
        )),
        R => Box::new(PhaseRotation::new(0.0, 0.0)),
        CONTROLLED_R => Box::new(PhaseRotation::controlled(0.0, 0.0)),
        SWAP => Box::new(Swap),
        TEXT => Box::new(Annotation::text("")),
        AREA => Box::new(Annotation::area()),
        CLASSICAL_PIPE => Box::new(ClassicalPipe),
        QUANTUM_PIPE => Box::new(Passthrough::pipe()),
        CCNOT => Box::new(Toffoli),
        _ => return None,
    };
    Some(component)
}

/// Every type id [`create_component`] accepts, ascending
pub fn known_type_ids() -> impl Iterator<Item = ComponentTypeId> {
    (type_ids::CLASSICAL_SOURCE..=type_ids::CCNOT).filter(|&id| id != 27)
}
