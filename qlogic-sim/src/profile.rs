//! Per-component facts resolved once per subcircuit
//!
//! The engine consults these instead of querying component capabilities
//! inside its layer loops.

use crate::subcircuit::Subcircuit;
use qlogic_core::{Circuit, ComponentId, ComponentRole, ComponentTypeId, Direction, MeasureGroup, SocketAddr};
use std::collections::HashMap;

/// What the simulator needs to know about one component
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentProfile {
    pub id: ComponentId,
    pub type_id: ComponentTypeId,
    pub role: ComponentRole,
    /// Owns at least one quantum socket
    pub quantum: bool,
    /// Operator depends on instance settings or classical inputs, so
    /// layers containing it are never cached
    pub varying: bool,
    /// Every input socket has a wire
    pub inputs_wired: bool,
    pub quantum_inputs: Vec<usize>,
    pub quantum_outputs: Vec<usize>,
    pub classical_inputs: Vec<usize>,
}

impl ComponentProfile {
    fn build(circuit: &Circuit, id: ComponentId) -> Option<Self> {
        let component = circuit.component(id)?;
        let split = |direction: Direction, quantum: bool| -> Vec<usize> {
            component
                .socket_kinds(direction)
                .iter()
                .enumerate()
                .filter(|(_, kind)| kind.is_quantum() == quantum)
                .map(|(index, _)| index)
                .collect()
        };
        let classical_inputs = split(Direction::Input, false);
        let inputs_wired =
            (0..component.inputs().len()).all(|i| circuit.is_wired(SocketAddr::input(id, i)));

        Some(Self {
            id,
            type_id: component.component_type(),
            role: component.role(),
            quantum: component.is_quantum(),
            varying: component.has_instance_matrix() || !classical_inputs.is_empty(),
            inputs_wired,
            quantum_inputs: split(Direction::Input, true),
            quantum_outputs: split(Direction::Output, true),
            classical_inputs,
        })
    }

    #[inline]
    pub fn is_source(&self) -> bool {
        self.role == ComponentRole::QuantumSource
    }

    /// Measurement group, if this is a quantum measurement
    pub fn measure_group(&self) -> Option<MeasureGroup> {
        match self.role {
            ComponentRole::QuantumMeasure(group) => Some(group),
            _ => None,
        }
    }

    /// Quantum sockets that carry this component's qubits, in lane order
    ///
    /// Sources have no inputs, so their output lanes are used.
    pub fn qubit_sockets(&self) -> Vec<SocketAddr> {
        if self.is_source() {
            self.quantum_outputs
                .iter()
                .map(|&i| SocketAddr::output(self.id, i))
                .collect()
        } else {
            self.quantum_inputs
                .iter()
                .map(|&i| SocketAddr::input(self.id, i))
                .collect()
        }
    }
}

/// Profiles of every member of one subcircuit, in member order
#[derive(Debug, Clone, Default)]
pub struct ProfileTable {
    profiles: Vec<ComponentProfile>,
    index: HashMap<ComponentId, usize>,
}

impl ProfileTable {
    pub fn build(circuit: &Circuit, subcircuit: &Subcircuit) -> Self {
        let profiles: Vec<ComponentProfile> = subcircuit
            .members()
            .iter()
            .filter_map(|&id| ComponentProfile::build(circuit, id))
            .collect();
        let index = profiles
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id, i))
            .collect();
        Self { profiles, index }
    }

    pub fn get(&self, id: ComponentId) -> Option<&ComponentProfile> {
        self.index.get(&id).map(|&i| &self.profiles[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentProfile> {
        self.profiles.iter()
    }

    /// Quantum sources in member order; position is the qubit index
    pub fn sources(&self) -> Vec<ComponentId> {
        self.iter().filter(|p| p.is_source()).map(|p| p.id).collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
