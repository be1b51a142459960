//! Circuit graph: components, sockets, and the wires joining them

use crate::component::{Component, ComponentId, Direction, SocketAddr, SocketKind};
use crate::{CircuitError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A wire between one output socket and one input socket of the same kind
///
/// Stored directionally (`start` is always the output side) but traversed
/// in both directions by the simulator.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Wire {
    pub start: SocketAddr,
    pub end: SocketAddr,
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.start, self.end)
    }
}

struct Node {
    id: ComponentId,
    component: Box<dyn Component>,
}

/// A hybrid classical/quantum circuit graph
///
/// Components are kept in insertion order, which is the order every
/// simulator pass iterates in. Each socket holds at most one wire.
///
/// # Example
/// ```ignore
/// use qlogic_core::{Circuit, SocketAddr};
///
/// let mut circuit = Circuit::new();
/// let source = circuit.add_component(Box::new(some_source));
/// let sink = circuit.add_component(Box::new(some_sink));
/// circuit.connect(SocketAddr::output(source, 0), SocketAddr::input(sink, 0))?;
/// ```
#[derive(Default)]
pub struct Circuit {
    nodes: Vec<Node>,
    positions: HashMap<ComponentId, usize>,
    // Both endpoints of every wire map to each other
    links: HashMap<SocketAddr, SocketAddr>,
    next_id: u32,
}

impl Circuit {
    /// Create an empty circuit
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of components
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a component under the next free id
    pub fn add_component(&mut self, component: Box<dyn Component>) -> ComponentId {
        while self.positions.contains_key(&ComponentId::new(self.next_id)) {
            self.next_id += 1;
        }
        let id = ComponentId::new(self.next_id);
        self.next_id += 1;
        self.push_node(id, component);
        id
    }

    /// Add a component under an externally chosen id (e.g. when an editor
    /// reconstructs a saved graph)
    ///
    /// # Errors
    /// Returns error if the id is already in use
    pub fn insert_component_with_id(
        &mut self,
        id: ComponentId,
        component: Box<dyn Component>,
    ) -> Result<()> {
        if self.positions.contains_key(&id) {
            return Err(CircuitError::DuplicateComponent(id));
        }
        self.push_node(id, component);
        self.next_id = self.next_id.max(id.value() + 1);
        Ok(())
    }

    fn push_node(&mut self, id: ComponentId, component: Box<dyn Component>) {
        self.positions.insert(id, self.nodes.len());
        self.nodes.push(Node { id, component });
    }

    /// Remove a component together with every wire touching its sockets
    pub fn remove_component(&mut self, id: ComponentId) -> Option<Box<dyn Component>> {
        let position = self.positions.remove(&id)?;
        self.links.retain(|from, to| from.component != id && to.component != id);
        let node = self.nodes.remove(position);
        for (i, node) in self.nodes.iter().enumerate().skip(position) {
            self.positions.insert(node.id, i);
        }
        Some(node.component)
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn component(&self, id: ComponentId) -> Option<&dyn Component> {
        self.positions
            .get(&id)
            .map(|&i| self.nodes[i].component.as_ref())
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut (dyn Component + 'static)> {
        match self.positions.get(&id) {
            Some(&i) => Some(self.nodes[i].component.as_mut()),
            None => None,
        }
    }

    /// Iterate components in insertion order
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &dyn Component)> {
        self.nodes.iter().map(|n| (n.id, n.component.as_ref()))
    }

    /// Component ids in insertion order
    pub fn ids(&self) -> Vec<ComponentId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    /// Insertion position of a component
    pub fn position(&self, id: ComponentId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Kind of the signal on a socket, if the socket exists
    pub fn socket_kind(&self, socket: SocketAddr) -> Option<SocketKind> {
        self.component(socket.component)?
            .socket_kinds(socket.direction)
            .get(socket.index)
            .copied()
    }

    fn check_socket(&self, socket: SocketAddr) -> Result<SocketKind> {
        let component = self
            .component(socket.component)
            .ok_or(CircuitError::UnknownComponent(socket.component))?;
        let kinds = component.socket_kinds(socket.direction);
        kinds
            .get(socket.index)
            .copied()
            .ok_or(CircuitError::SocketOutOfRange {
                socket,
                available: kinds.len(),
            })
    }

    /// Wire two sockets together
    ///
    /// The endpoints may be given in either order. Any wire already on
    /// either endpoint is replaced.
    ///
    /// # Errors
    /// Returns error if the sockets do not exist, belong to the same
    /// component, share a direction, or carry different kinds
    pub fn connect(&mut self, a: SocketAddr, b: SocketAddr) -> Result<Wire> {
        let kind_a = self.check_socket(a)?;
        let kind_b = self.check_socket(b)?;
        if a.component == b.component {
            return Err(CircuitError::SelfWire(a.component));
        }
        if a.direction == b.direction {
            return Err(CircuitError::DirectionMismatch { from: a, to: b });
        }
        if kind_a != kind_b {
            return Err(CircuitError::KindMismatch { from: a, to: b });
        }

        let (start, end) = match a.direction {
            Direction::Output => (a, b),
            Direction::Input => (b, a),
        };
        self.disconnect(start);
        self.disconnect(end);
        self.links.insert(start, end);
        self.links.insert(end, start);
        Ok(Wire { start, end })
    }

    /// Remove the wire on a socket, returning it if there was one
    pub fn disconnect(&mut self, socket: SocketAddr) -> Option<Wire> {
        let other = self.links.remove(&socket)?;
        self.links.remove(&other);
        Some(match socket.direction {
            Direction::Output => Wire {
                start: socket,
                end: other,
            },
            Direction::Input => Wire {
                start: other,
                end: socket,
            },
        })
    }

    /// Socket at the other end of the wire on `socket`
    #[inline]
    pub fn connected(&self, socket: SocketAddr) -> Option<SocketAddr> {
        self.links.get(&socket).copied()
    }

    #[inline]
    pub fn is_wired(&self, socket: SocketAddr) -> bool {
        self.links.contains_key(&socket)
    }

    /// Socket at the same position in the component's opposite-direction
    /// list, provided it exists and carries the same kind
    ///
    /// This is how one wire's qubit identity threads through a gate with
    /// matching input and output lanes.
    pub fn corresponding(&self, socket: SocketAddr) -> Option<SocketAddr> {
        let kind = self.socket_kind(socket)?;
        let mirrored = socket.mirrored();
        (self.socket_kind(mirrored)? == kind).then_some(mirrored)
    }

    /// All wires touching a component
    pub fn wires_of(&self, id: ComponentId) -> Vec<Wire> {
        let Some(component) = self.component(id) else {
            return Vec::new();
        };
        let mut wires = Vec::new();
        for direction in [Direction::Input, Direction::Output] {
            for index in 0..component.socket_kinds(direction).len() {
                let socket = SocketAddr::new(id, direction, index);
                if let Some(other) = self.connected(socket) {
                    wires.push(match direction {
                        Direction::Output => Wire {
                            start: socket,
                            end: other,
                        },
                        Direction::Input => Wire {
                            start: other,
                            end: socket,
                        },
                    });
                }
            }
        }
        wires
    }

    /// Every wire in the circuit, once each
    pub fn wires(&self) -> Vec<Wire> {
        let mut wires: Vec<Wire> = self
            .links
            .iter()
            .filter(|(from, _)| from.direction == Direction::Output)
            .map(|(&start, &end)| Wire { start, end })
            .collect();
        wires.sort_by_key(|w| (w.start, w.end));
        wires
    }

    /// Components on the far side of any wire touching `id`
    pub fn neighbors(&self, id: ComponentId) -> Vec<ComponentId> {
        self.wires_of(id)
            .into_iter()
            .map(|w| {
                if w.start.component == id {
                    w.end.component
                } else {
                    w.start.component
                }
            })
            .collect()
    }
}

impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Circuit")
            .field(
                "components",
                &self
                    .nodes
                    .iter()
                    .map(|n| (n.id, n.component.name()))
                    .collect::<Vec<_>>(),
            )
            .field("wires", &self.wires())
            .finish()
    }
}
