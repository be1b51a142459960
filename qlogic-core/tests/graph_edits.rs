//! Editor-style edits on a circuit graph

use qlogic_core::{
    Circuit, CircuitError, Component, ComponentId, ComponentTypeId, SocketAddr, SocketKind,
    Wire,
};

const Q: SocketKind = SocketKind::Quantum;
const C: SocketKind = SocketKind::Classical;

#[derive(Debug)]
struct Part {
    type_id: ComponentTypeId,
    inputs: &'static [SocketKind],
    outputs: &'static [SocketKind],
}

impl Part {
    fn boxed(inputs: &'static [SocketKind], outputs: &'static [SocketKind]) -> Box<dyn Component> {
        Box::new(Part {
            type_id: 99,
            inputs,
            outputs,
        })
    }
}

impl Component for Part {
    fn component_type(&self) -> ComponentTypeId {
        self.type_id
    }

    fn name(&self) -> &str {
        "Part"
    }

    fn inputs(&self) -> &[SocketKind] {
        self.inputs
    }

    fn outputs(&self) -> &[SocketKind] {
        self.outputs
    }
}

#[test]
fn test_erasing_a_component_drops_its_wires() {
    let mut circuit = Circuit::new();
    let a = circuit.add_component(Part::boxed(&[], &[Q]));
    let b = circuit.add_component(Part::boxed(&[Q], &[Q]));
    let c = circuit.add_component(Part::boxed(&[Q], &[]));
    circuit.connect(SocketAddr::output(a, 0), SocketAddr::input(b, 0)).unwrap();
    circuit.connect(SocketAddr::output(b, 0), SocketAddr::input(c, 0)).unwrap();
    assert_eq!(circuit.wires().len(), 2);

    assert!(circuit.remove_component(b).is_some());
    assert!(circuit.wires().is_empty());
    assert!(!circuit.is_wired(SocketAddr::output(a, 0)));
    assert_eq!(circuit.position(c), Some(1));
    assert!(circuit.neighbors(a).is_empty());
}

#[test]
fn test_rewiring_replaces_the_old_wire() {
    let mut circuit = Circuit::new();
    let a = circuit.add_component(Part::boxed(&[], &[C]));
    let b = circuit.add_component(Part::boxed(&[], &[C]));
    let sink = circuit.add_component(Part::boxed(&[C], &[]));

    circuit.connect(SocketAddr::output(a, 0), SocketAddr::input(sink, 0)).unwrap();
    // Endpoints given input first
    let wire = circuit
        .connect(SocketAddr::input(sink, 0), SocketAddr::output(b, 0))
        .unwrap();

    assert_eq!(
        wire,
        Wire {
            start: SocketAddr::output(b, 0),
            end: SocketAddr::input(sink, 0)
        }
    );
    assert_eq!(circuit.wires(), vec![wire]);
    assert_eq!(circuit.neighbors(a), Vec::<ComponentId>::new());
}

#[test]
fn test_rejected_wires() {
    let mut circuit = Circuit::new();
    let quantum = circuit.add_component(Part::boxed(&[Q], &[Q]));
    let classical = circuit.add_component(Part::boxed(&[C], &[C]));

    let kind = circuit
        .connect(SocketAddr::output(quantum, 0), SocketAddr::input(classical, 0))
        .unwrap_err();
    assert!(matches!(kind, CircuitError::KindMismatch { .. }));

    let same_direction = circuit
        .connect(SocketAddr::output(quantum, 0), SocketAddr::output(classical, 0))
        .unwrap_err();
    assert!(matches!(same_direction, CircuitError::DirectionMismatch { .. }));

    let loopback = circuit
        .connect(SocketAddr::output(quantum, 0), SocketAddr::input(quantum, 0))
        .unwrap_err();
    assert_eq!(loopback, CircuitError::SelfWire(quantum));

    let missing = circuit
        .connect(SocketAddr::output(quantum, 3), SocketAddr::input(classical, 0))
        .unwrap_err();
    assert!(matches!(missing, CircuitError::SocketOutOfRange { available: 1, .. }));
}

#[test]
fn test_reconstructed_ids_do_not_collide() {
    let mut circuit = Circuit::new();
    circuit
        .insert_component_with_id(ComponentId::new(5), Part::boxed(&[], &[Q]))
        .unwrap();
    let err = circuit
        .insert_component_with_id(ComponentId::new(5), Part::boxed(&[], &[Q]))
        .unwrap_err();
    assert_eq!(err, CircuitError::DuplicateComponent(ComponentId::new(5)));

    let next = circuit.add_component(Part::boxed(&[Q], &[]));
    assert_eq!(next, ComponentId::new(6));
    assert_eq!(circuit.ids(), vec![ComponentId::new(5), next]);
}

#[test]
fn test_corresponding_socket_requires_matching_kind() {
    let mut circuit = Circuit::new();
    let gate = circuit.add_component(Part::boxed(&[Q, C], &[Q, Q]));

    let lane = SocketAddr::input(gate, 0);
    assert_eq!(circuit.corresponding(lane), Some(SocketAddr::output(gate, 0)));
    assert_eq!(circuit.corresponding(SocketAddr::input(gate, 1)), None);
    assert_eq!(circuit.corresponding(SocketAddr::output(gate, 1)), None);
}
