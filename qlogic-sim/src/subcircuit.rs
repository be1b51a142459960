//! Partition of a circuit into independently simulated groups

use qlogic_core::{Circuit, ComponentId};
use std::collections::{HashSet, VecDeque};

/// Maximal set of components joined by wires
///
/// Members are listed in circuit insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subcircuit {
    members: Vec<ComponentId>,
    member_set: HashSet<ComponentId>,
}

impl Subcircuit {
    fn new(members: Vec<ComponentId>) -> Self {
        let member_set = members.iter().copied().collect();
        Self {
            members,
            member_set,
        }
    }

    #[inline]
    pub fn members(&self) -> &[ComponentId] {
        &self.members
    }

    #[inline]
    pub fn contains(&self, id: ComponentId) -> bool {
        self.member_set.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Splits a circuit into weakly connected subcircuits
pub struct SubcircuitResolver;

impl SubcircuitResolver {
    /// Resolve the subcircuits of `circuit`
    ///
    /// Components without sockets are left out. Groups come out in the
    /// insertion order of their first member, so the same graph always
    /// yields the same partition in the same order.
    pub fn resolve(circuit: &Circuit) -> Vec<Subcircuit> {
        let mut visited: HashSet<ComponentId> = HashSet::new();
        let mut subcircuits = Vec::new();

        for (start, component) in circuit.components() {
            if component.socket_count() == 0 || !visited.insert(start) {
                continue;
            }

            let mut members = vec![start];
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                for neighbor in circuit.neighbors(current) {
                    if visited.insert(neighbor) {
                        members.push(neighbor);
                        queue.push_back(neighbor);
                    }
                }
            }

            members.sort_by_key(|id| circuit.position(*id));
            subcircuits.push(Subcircuit::new(members));
        }

        subcircuits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qlogic_core::SocketAddr;
    use qlogic_gates::{Annotation, ClassicalSink, ClassicalSource, LogicGate, LogicOp};

    #[test]
    fn test_partition_by_wires() {
        let mut circuit = Circuit::new();
        let a = circuit.add_component(Box::new(ClassicalSource::new(true)));
        let lone = circuit.add_component(Box::new(ClassicalSink));
        let not = circuit.add_component(Box::new(LogicGate::new(LogicOp::Not)));
        let sink = circuit.add_component(Box::new(ClassicalSink));
        circuit.connect(SocketAddr::output(a, 0), SocketAddr::input(not, 0)).unwrap();
        circuit.connect(SocketAddr::output(not, 0), SocketAddr::input(sink, 0)).unwrap();

        let groups = SubcircuitResolver::resolve(&circuit);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members(), &[a, not, sink]);
        assert_eq!(groups[1].members(), &[lone]);
        assert!(groups[0].contains(sink));
        assert!(!groups[0].contains(lone));
    }

    #[test]
    fn test_socketless_components_excluded() {
        let mut circuit = Circuit::new();
        circuit.add_component(Box::new(Annotation::text("label")));
        circuit.add_component(Box::new(Annotation::area()));
        assert!(SubcircuitResolver::resolve(&circuit).is_empty());
    }

    #[test]
    fn test_members_in_insertion_order_when_reached_backwards() {
        let mut circuit = Circuit::new();
        let sink = circuit.add_component(Box::new(ClassicalSink));
        let source = circuit.add_component(Box::new(ClassicalSource::new(false)));
        circuit.connect(SocketAddr::output(source, 0), SocketAddr::input(sink, 0)).unwrap();
        let groups = SubcircuitResolver::resolve(&circuit);
        assert_eq!(groups[0].members(), &[sink, source]);
    }
}
