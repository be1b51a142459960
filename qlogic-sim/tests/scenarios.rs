//! End-to-end simulation of small editor circuits

use approx::assert_abs_diff_eq;
use qlogic_core::{
    Circuit, Component, ComponentId, ComponentRole, ComponentTypeId, MeasureGroup, PhaseModel,
    SocketAddr, SocketKind, UnitaryRequest,
};
use qlogic_gates::{
    ClassicalMeasure, ClassicalSource, ControlledGate, GateKind, LogicGate, LogicOp, Passthrough,
    QuantumMeasure, QuantumSource, SingleQubitGate,
};
use qlogic_sim::{
    CancelFlag, ComponentStatus, Simulator, SimulatorConfig, SimulatorError, TopologyMode,
};
use std::sync::{Arc, Mutex};

type Result<T> = std::result::Result<T, qlogic_core::CircuitError>;

fn group(n: u8) -> MeasureGroup {
    MeasureGroup::new(n).unwrap()
}

fn wire(circuit: &mut Circuit, from: ComponentId, out: usize, to: ComponentId, input: usize) {
    circuit
        .connect(SocketAddr::output(from, out), SocketAddr::input(to, input))
        .unwrap();
}

/// Values a [`Probe`] received through the output sinks
#[derive(Debug, Default)]
struct Seen {
    one_rate: Option<f64>,
    buckets: Option<Vec<f64>>,
    pending: Option<bool>,
}

/// Quantum measurement that records what the simulator publishes
#[derive(Debug)]
struct Probe {
    inner: QuantumMeasure,
    seen: Arc<Mutex<Seen>>,
}

impl Probe {
    fn new(group: MeasureGroup) -> (Self, Arc<Mutex<Seen>>) {
        let seen = Arc::new(Mutex::new(Seen::default()));
        let probe = Self {
            inner: QuantumMeasure::new(group),
            seen: Arc::clone(&seen),
        };
        (probe, seen)
    }
}

impl Component for Probe {
    fn component_type(&self) -> ComponentTypeId {
        self.inner.component_type()
    }

    fn name(&self) -> &str {
        "Probe"
    }

    fn inputs(&self) -> &[SocketKind] {
        self.inner.inputs()
    }

    fn outputs(&self) -> &[SocketKind] {
        self.inner.outputs()
    }

    fn role(&self) -> ComponentRole {
        self.inner.role()
    }

    fn unitary(&self, request: &UnitaryRequest<'_>) -> Result<Vec<qlogic_core::Complex64>> {
        self.inner.unitary(request)
    }

    fn set_pending(&mut self, pending: bool) {
        self.seen.lock().unwrap().pending = Some(pending);
    }

    fn set_buckets(&mut self, buckets: &[f64]) {
        self.seen.lock().unwrap().buckets = Some(buckets.to_vec());
    }

    fn set_one_rate(&mut self, probability: f64) {
        self.seen.lock().unwrap().one_rate = Some(probability);
    }
}

/// source -> gates... -> measure in `group`
fn single_qubit_line(gates: &[GateKind], group: MeasureGroup) -> (Circuit, ComponentId) {
    let mut circuit = Circuit::new();
    let mut tail = circuit.add_component(Box::new(QuantumSource::default()));
    for &kind in gates {
        let gate = circuit.add_component(Box::new(SingleQubitGate::new(kind)));
        wire(&mut circuit, tail, 0, gate, 0);
        tail = gate;
    }
    let measure = circuit.add_component(Box::new(QuantumMeasure::new(group)));
    wire(&mut circuit, tail, 0, measure, 0);
    (circuit, measure)
}

#[test]
fn test_source_into_sink_has_no_buckets() {
    let mut circuit = Circuit::new();
    let source = circuit.add_component(Box::new(QuantumSource::default()));
    let sink = circuit.add_component(Box::new(Passthrough::sink()));
    wire(&mut circuit, source, 0, sink, 0);

    let report = Simulator::default().simulate(&mut circuit).unwrap();
    assert!(report.histograms.is_empty());
    assert!(report.measurements.is_empty());
    assert_eq!(report.subcircuits.len(), 1);
    assert_eq!(report.subcircuits[0].num_qubits, 1);
    assert_eq!(report.status(sink), Some(ComponentStatus::Resolved));
}

#[test]
fn test_x_then_measure() {
    let (mut circuit, measure) = single_qubit_line(&[GateKind::X], group(1));
    let report = Simulator::default().simulate(&mut circuit).unwrap();

    let buckets = report.buckets(measure).unwrap();
    assert_eq!(buckets.len(), 2);
    assert_abs_diff_eq!(buckets[0], 0.0, epsilon = 1e-10);
    assert_abs_diff_eq!(buckets[1], 1.0, epsilon = 1e-10);
    assert_abs_diff_eq!(report.one_rate(measure).unwrap(), 1.0, epsilon = 1e-10);
}

#[test]
fn test_hadamard_then_measure() {
    let (mut circuit, measure) = single_qubit_line(&[GateKind::H], group(1));
    let report = Simulator::default().simulate(&mut circuit).unwrap();

    let buckets = report.buckets(measure).unwrap();
    assert_abs_diff_eq!(buckets[0], 0.5, epsilon = 1e-10);
    assert_abs_diff_eq!(buckets[1], 0.5, epsilon = 1e-10);
}

#[test]
fn test_and_of_on_and_off() {
    let mut circuit = Circuit::new();
    let on = circuit.add_component(Box::new(ClassicalSource::new(true)));
    let off = circuit.add_component(Box::new(ClassicalSource::new(false)));
    let and = circuit.add_component(Box::new(LogicGate::new(LogicOp::And)));
    let measure = circuit.add_component(Box::new(ClassicalMeasure::new()));
    wire(&mut circuit, on, 0, and, 0);
    wire(&mut circuit, off, 0, and, 1);
    wire(&mut circuit, and, 0, measure, 0);

    let report = Simulator::default().simulate(&mut circuit).unwrap();
    assert_eq!(report.classical_result(measure), Some(false));
    assert_eq!(report.classical_outputs[&and], vec![false]);
    assert!(report.measurements.is_empty());
}

#[test]
fn test_cnot_with_control_set() {
    let mut circuit = Circuit::new();
    let control = circuit.add_component(Box::new(QuantumSource::one()));
    let target = circuit.add_component(Box::new(QuantumSource::default()));
    let cx = circuit.add_component(Box::new(ControlledGate::new(GateKind::X)));
    let m_control = circuit.add_component(Box::new(QuantumMeasure::new(group(1))));
    let m_target = circuit.add_component(Box::new(QuantumMeasure::new(group(1))));
    wire(&mut circuit, control, 0, cx, 0);
    wire(&mut circuit, target, 0, cx, 1);
    wire(&mut circuit, cx, 0, m_control, 0);
    wire(&mut circuit, cx, 1, m_target, 0);

    let report = Simulator::default().simulate(&mut circuit).unwrap();
    let buckets = report.buckets(m_control).unwrap();
    assert_eq!(buckets.len(), 4);
    assert_abs_diff_eq!(buckets[3], 1.0, epsilon = 1e-10);
    for &b in &buckets[..3] {
        assert_abs_diff_eq!(b, 0.0, epsilon = 1e-10);
    }
    assert_eq!(report.buckets(m_target), Some(buckets));
}

#[test]
fn test_bell_pair_is_correlated() {
    let mut circuit = Circuit::new();
    let a = circuit.add_component(Box::new(QuantumSource::default()));
    let b = circuit.add_component(Box::new(QuantumSource::default()));
    let h = circuit.add_component(Box::new(SingleQubitGate::new(GateKind::H)));
    let cx = circuit.add_component(Box::new(ControlledGate::new(GateKind::X)));
    let ma = circuit.add_component(Box::new(QuantumMeasure::new(group(2))));
    let mb = circuit.add_component(Box::new(QuantumMeasure::new(group(2))));
    wire(&mut circuit, a, 0, h, 0);
    wire(&mut circuit, h, 0, cx, 0);
    wire(&mut circuit, b, 0, cx, 1);
    wire(&mut circuit, cx, 0, ma, 0);
    wire(&mut circuit, cx, 1, mb, 0);

    let report = Simulator::default().simulate(&mut circuit).unwrap();
    let buckets = report.buckets(ma).unwrap();
    assert_abs_diff_eq!(buckets[0], 0.5, epsilon = 1e-10);
    assert_abs_diff_eq!(buckets[1], 0.0, epsilon = 1e-10);
    assert_abs_diff_eq!(buckets[2], 0.0, epsilon = 1e-10);
    assert_abs_diff_eq!(buckets[3], 0.5, epsilon = 1e-10);
    assert_abs_diff_eq!(report.one_rate(mb).unwrap(), 0.5, epsilon = 1e-10);
}

#[test]
fn test_groups_are_independent_histograms() {
    // One measurement in group 1 and one in group 3 on the same register
    let mut circuit = Circuit::new();
    let a = circuit.add_component(Box::new(QuantumSource::one()));
    let b = circuit.add_component(Box::new(QuantumSource::default()));
    let cz = circuit.add_component(Box::new(ControlledGate::new(GateKind::Z)));
    let ma = circuit.add_component(Box::new(QuantumMeasure::new(group(1))));
    let mb = circuit.add_component(Box::new(QuantumMeasure::new(group(3))));
    wire(&mut circuit, a, 0, cz, 0);
    wire(&mut circuit, b, 0, cz, 1);
    wire(&mut circuit, cz, 0, ma, 0);
    wire(&mut circuit, cz, 1, mb, 0);

    let report = Simulator::default().simulate(&mut circuit).unwrap();
    assert_eq!(report.histograms.len(), 2);
    assert_eq!(report.histograms[0].group, group(1));
    assert_eq!(report.histograms[1].group, group(3));
    assert_abs_diff_eq!(report.buckets(ma).unwrap()[1], 1.0, epsilon = 1e-10);
    assert_abs_diff_eq!(report.buckets(mb).unwrap()[0], 1.0, epsilon = 1e-10);
}

#[test]
fn test_ungrouped_measure_only_gets_one_rate() {
    let (mut circuit, measure) = single_qubit_line(&[GateKind::H], MeasureGroup::UNGROUPED);
    let report = Simulator::default().simulate(&mut circuit).unwrap();
    assert!(report.histograms.is_empty());
    assert_eq!(report.buckets(measure), None);
    assert_abs_diff_eq!(report.one_rate(measure).unwrap(), 0.5, epsilon = 1e-10);
}

#[test]
fn test_results_are_published() {
    let mut circuit = Circuit::new();
    let source = circuit.add_component(Box::new(QuantumSource::default()));
    let h = circuit.add_component(Box::new(SingleQubitGate::new(GateKind::H)));
    let (probe, seen) = Probe::new(group(1));
    let probe = circuit.add_component(Box::new(probe));
    wire(&mut circuit, source, 0, h, 0);
    wire(&mut circuit, h, 0, probe, 0);

    Simulator::default().simulate(&mut circuit).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.pending, Some(false));
    assert_abs_diff_eq!(seen.one_rate.unwrap(), 0.5, epsilon = 1e-10);
    let buckets = seen.buckets.as_ref().unwrap();
    assert_abs_diff_eq!(buckets[0], 0.5, epsilon = 1e-10);
}

#[test]
fn test_unreached_measure_is_pending() {
    let mut circuit = Circuit::new();
    let (probe, seen) = Probe::new(group(1));
    let probe = circuit.add_component(Box::new(probe));
    let pipe = circuit.add_component(Box::new(Passthrough::pipe()));
    wire(&mut circuit, pipe, 0, probe, 0);

    let report = Simulator::default().simulate(&mut circuit).unwrap();
    assert_eq!(report.status(probe), Some(ComponentStatus::Pending));
    assert_eq!(report.subcircuits[0].num_qubits, 0);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.pending, Some(true));
    assert_eq!(seen.one_rate, None);
    assert_eq!(seen.buckets, None);
}

#[test]
fn test_unwired_classical_input_is_pending() {
    let mut circuit = Circuit::new();
    let on = circuit.add_component(Box::new(ClassicalSource::new(true)));
    let or = circuit.add_component(Box::new(LogicGate::new(LogicOp::Or)));
    let measure = circuit.add_component(Box::new(ClassicalMeasure::new()));
    wire(&mut circuit, on, 0, or, 0);
    wire(&mut circuit, or, 0, measure, 0);

    let report = Simulator::default().simulate(&mut circuit).unwrap();
    assert!(report.is_pending(or));
    assert!(report.is_pending(measure));
    assert_eq!(report.classical_result(measure), None);
    assert_eq!(report.status(on), Some(ComponentStatus::Resolved));
}

#[test]
fn test_cyclic_wiring_is_fatal_and_publishes_nothing() {
    let mut circuit = Circuit::new();
    let source = circuit.add_component(Box::new(QuantumSource::default()));
    let cx = circuit.add_component(Box::new(ControlledGate::new(GateKind::X)));
    let x = circuit.add_component(Box::new(SingleQubitGate::new(GateKind::X)));
    let (probe, seen) = Probe::new(group(1));
    let probe = circuit.add_component(Box::new(probe));
    wire(&mut circuit, source, 0, cx, 0);
    wire(&mut circuit, cx, 0, x, 0);
    wire(&mut circuit, x, 0, cx, 1);
    wire(&mut circuit, cx, 1, probe, 0);

    let err = Simulator::default().simulate(&mut circuit).unwrap_err();
    assert!(matches!(err, SimulatorError::QubitCycle { .. }));
    assert!(err.is_topology_error());
    assert_eq!(seen.lock().unwrap().pending, None);
}

#[test]
fn test_strict_and_lenient_topology() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("qlogic_sim=debug")
        .with_test_writer()
        .try_init();

    // The CX target is unwired, so the measurement behind it can never run
    let mut circuit = Circuit::new();
    let source = circuit.add_component(Box::new(QuantumSource::default()));
    let cx = circuit.add_component(Box::new(ControlledGate::new(GateKind::X)));
    let measure = circuit.add_component(Box::new(QuantumMeasure::new(group(1))));
    wire(&mut circuit, source, 0, cx, 0);
    wire(&mut circuit, cx, 0, measure, 0);

    let err = Simulator::default().simulate(&mut circuit).unwrap_err();
    assert_eq!(err, SimulatorError::UnplacedComponents { components: vec![measure] });

    let config = SimulatorConfig::default().with_topology_mode(TopologyMode::Lenient);
    let report = Simulator::new(config).unwrap().simulate(&mut circuit).unwrap();
    assert_eq!(report.subcircuits[0].dropped, vec![measure]);
    assert!(report.is_pending(cx));
    assert!(report.is_pending(measure));
    assert!(report.histograms.is_empty());
}

#[test]
fn test_cancellation() {
    let (mut circuit, _) = single_qubit_line(&[GateKind::H, GateKind::X], group(1));
    let flag = CancelFlag::new();
    let mut simulator = Simulator::default().with_observer(flag.clone());

    flag.cancel();
    let err = simulator.simulate(&mut circuit).unwrap_err();
    assert_eq!(err, SimulatorError::Cancelled);
    assert!(!err.is_fatal());

    flag.clear();
    assert!(simulator.simulate(&mut circuit).is_ok());
}

#[test]
fn test_complex_phase_model_diverges_from_parity() {
    // H S S H = H Z H = X with true phases; S is the identity placeholder
    // in the real parity model
    let gates = [GateKind::H, GateKind::S, GateKind::S, GateKind::H];
    let (mut circuit, measure) = single_qubit_line(&gates, group(1));

    let parity = Simulator::default().simulate(&mut circuit).unwrap();
    assert_abs_diff_eq!(parity.buckets(measure).unwrap()[0], 1.0, epsilon = 1e-10);

    let config = SimulatorConfig::default().with_phase_model(PhaseModel::Complex);
    let complex = Simulator::new(config).unwrap().simulate(&mut circuit).unwrap();
    assert_abs_diff_eq!(complex.buckets(measure).unwrap()[1], 1.0, epsilon = 1e-10);
}

#[test]
fn test_group_size_limit() {
    let mut circuit = Circuit::new();
    let a = circuit.add_component(Box::new(QuantumSource::default()));
    let b = circuit.add_component(Box::new(QuantumSource::default()));
    let cx = circuit.add_component(Box::new(ControlledGate::new(GateKind::X)));
    let ma = circuit.add_component(Box::new(QuantumMeasure::new(group(1))));
    let mb = circuit.add_component(Box::new(QuantumMeasure::new(group(1))));
    wire(&mut circuit, a, 0, cx, 0);
    wire(&mut circuit, b, 0, cx, 1);
    wire(&mut circuit, cx, 0, ma, 0);
    wire(&mut circuit, cx, 1, mb, 0);

    let config = SimulatorConfig::default().with_max_group_size(1);
    let err = Simulator::new(config).unwrap().simulate(&mut circuit).unwrap_err();
    assert!(matches!(err, SimulatorError::GroupTooLarge { size: 2, .. }));
}

#[test]
fn test_warm_cache_matches_cold() {
    let mut circuit = Circuit::new();
    let a = circuit.add_component(Box::new(QuantumSource::default()));
    let b = circuit.add_component(Box::new(QuantumSource::default()));
    let h = circuit.add_component(Box::new(SingleQubitGate::new(GateKind::H)));
    let cx = circuit.add_component(Box::new(ControlledGate::new(GateKind::X)));
    let t = circuit.add_component(Box::new(SingleQubitGate::new(GateKind::H)));
    let ma = circuit.add_component(Box::new(QuantumMeasure::new(group(1))));
    let mb = circuit.add_component(Box::new(QuantumMeasure::new(group(1))));
    wire(&mut circuit, a, 0, h, 0);
    wire(&mut circuit, h, 0, cx, 0);
    wire(&mut circuit, b, 0, cx, 1);
    wire(&mut circuit, cx, 1, t, 0);
    wire(&mut circuit, cx, 0, ma, 0);
    wire(&mut circuit, t, 0, mb, 0);

    let mut uncached = Simulator::new(SimulatorConfig::default().with_cache(false)).unwrap();
    let reference = uncached.simulate(&mut circuit).unwrap();

    let mut simulator = Simulator::new(SimulatorConfig::default().with_statistics(true)).unwrap();
    let cold = simulator.simulate(&mut circuit).unwrap();
    let warm = simulator.simulate(&mut circuit).unwrap();

    for report in [&cold, &warm] {
        let buckets = report.buckets(ma).unwrap();
        let expected = reference.buckets(ma).unwrap();
        for (got, want) in buckets.iter().zip(expected) {
            assert_abs_diff_eq!(*got, *want, epsilon = 1e-12);
        }
    }

    let cold_stats = cold.statistics.unwrap();
    let warm_stats = warm.statistics.unwrap();
    assert!(warm_stats.result_cache.hits > cold_stats.result_cache.hits);
    assert!(warm_stats.layers_reused > 0);
}
