//! Qubit bookkeeping along quantum wire chains

use crate::error::{Result, SimulatorError};
use qlogic_core::{Circuit, ComponentId, QubitId, SocketAddr};
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Qubit carried by each quantum socket of one subcircuit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QubitIndexMap {
    indices: HashMap<SocketAddr, QubitId>,
    num_qubits: usize,
}

impl QubitIndexMap {
    #[inline]
    pub fn get(&self, socket: SocketAddr) -> Option<QubitId> {
        self.indices.get(&socket).copied()
    }

    /// Register size `Q` (one qubit per quantum source)
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of indexed sockets
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    fn record(&mut self, socket: SocketAddr, qubit: QubitId) {
        self.indices.insert(socket, qubit);
    }
}

/// Threads each source's qubit through the gates it feeds
pub struct QubitIndexAssigner;

impl QubitIndexAssigner {
    /// Assign qubit `i` to every socket reachable from `sources[i]`
    ///
    /// From the source's output the walk crosses the wire to an input, then
    /// continues from the corresponding output of that component, until a
    /// socket has no wire or no counterpart.
    ///
    /// # Errors
    /// Returns [`SimulatorError::QubitCycle`] if a walk enters a component
    /// it already passed through.
    pub fn assign(circuit: &Circuit, sources: &[ComponentId]) -> Result<QubitIndexMap> {
        let mut map = QubitIndexMap {
            indices: HashMap::new(),
            num_qubits: sources.len(),
        };

        for (i, &source) in sources.iter().enumerate() {
            let qubit = QubitId::new(i);
            let mut visited = HashSet::from([source]);
            let mut socket = SocketAddr::output(source, 0);
            map.record(socket, qubit);

            while let Some(input) = circuit.connected(socket) {
                if !visited.insert(input.component) {
                    return Err(SimulatorError::QubitCycle {
                        qubit,
                        component: input.component,
                    });
                }
                map.record(input, qubit);
                let Some(output) = circuit.corresponding(input) else {
                    break;
                };
                map.record(output, qubit);
                socket = output;
            }
            trace!(%qubit, %source, components = visited.len(), "qubit chain indexed");
        }

        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qlogic_gates::{ControlledGate, GateKind, Passthrough, QuantumSource, SingleQubitGate};

    #[test]
    fn test_index_threads_through_gates() {
        let mut circuit = Circuit::new();
        let control = circuit.add_component(Box::new(QuantumSource::default()));
        let target = circuit.add_component(Box::new(QuantumSource::default()));
        let cx = circuit.add_component(Box::new(ControlledGate::new(GateKind::X)));
        let h = circuit.add_component(Box::new(SingleQubitGate::new(GateKind::H)));
        circuit.connect(SocketAddr::output(control, 0), SocketAddr::input(cx, 0)).unwrap();
        circuit.connect(SocketAddr::output(target, 0), SocketAddr::input(cx, 1)).unwrap();
        circuit.connect(SocketAddr::output(cx, 1), SocketAddr::input(h, 0)).unwrap();

        let map = QubitIndexAssigner::assign(&circuit, &[control, target]).unwrap();
        assert_eq!(map.num_qubits(), 2);
        assert_eq!(map.get(SocketAddr::input(cx, 0)), Some(QubitId::new(0)));
        assert_eq!(map.get(SocketAddr::output(cx, 0)), Some(QubitId::new(0)));
        assert_eq!(map.get(SocketAddr::input(cx, 1)), Some(QubitId::new(1)));
        assert_eq!(map.get(SocketAddr::input(h, 0)), Some(QubitId::new(1)));
        assert_eq!(map.get(SocketAddr::output(h, 0)), Some(QubitId::new(1)));
    }

    #[test]
    fn test_walk_stops_at_sink() {
        let mut circuit = Circuit::new();
        let source = circuit.add_component(Box::new(QuantumSource::default()));
        let sink = circuit.add_component(Box::new(Passthrough::sink()));
        circuit.connect(SocketAddr::output(source, 0), SocketAddr::input(sink, 0)).unwrap();
        let map = QubitIndexAssigner::assign(&circuit, &[source]).unwrap();
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_feedback_loop_is_a_cycle() {
        // source -> cx.control, cx.control out -> x -> cx.target
        let mut circuit = Circuit::new();
        let source = circuit.add_component(Box::new(QuantumSource::default()));
        let cx = circuit.add_component(Box::new(ControlledGate::new(GateKind::X)));
        let x = circuit.add_component(Box::new(SingleQubitGate::new(GateKind::X)));
        circuit.connect(SocketAddr::output(source, 0), SocketAddr::input(cx, 0)).unwrap();
        circuit.connect(SocketAddr::output(cx, 0), SocketAddr::input(x, 0)).unwrap();
        circuit.connect(SocketAddr::output(x, 0), SocketAddr::input(cx, 1)).unwrap();

        let err = QubitIndexAssigner::assign(&circuit, &[source]).unwrap_err();
        assert_eq!(
            err,
            SimulatorError::QubitCycle {
                qubit: QubitId::new(0),
                component: cx
            }
        );
    }
}
