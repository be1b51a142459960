//! Fixpoint evaluation of the purely classical components

use crate::error::Result;
use crate::profile::ProfileTable;
use qlogic_core::{Circuit, ComponentId, SocketAddr};
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Resolved classical signals of one subcircuit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassicalValues {
    outputs: HashMap<SocketAddr, bool>,
    resolved: Vec<ComponentId>,
    pending: Vec<ComponentId>,
}

impl ClassicalValues {
    /// Value on an output socket, if its component resolved
    #[inline]
    pub fn output(&self, socket: SocketAddr) -> Option<bool> {
        self.outputs.get(&socket).copied()
    }

    /// Value arriving at an input socket over its wire
    pub fn input(&self, circuit: &Circuit, socket: SocketAddr) -> Option<bool> {
        self.output(circuit.connected(socket)?)
    }

    /// Output bits of a resolved component, in socket order
    pub fn outputs_of(&self, circuit: &Circuit, id: ComponentId) -> Option<Vec<bool>> {
        let count = circuit.component(id)?.outputs().len();
        (0..count)
            .map(|i| self.output(SocketAddr::output(id, i)))
            .collect()
    }

    /// Components evaluated, in the order they resolved
    pub fn resolved(&self) -> &[ComponentId] {
        &self.resolved
    }

    /// Components whose inputs never became known
    pub fn pending(&self) -> &[ComponentId] {
        &self.pending
    }

    pub fn is_resolved(&self, id: ComponentId) -> bool {
        self.resolved.contains(&id)
    }
}

/// Resolves classical outputs round by round until nothing changes
pub struct ClassicalEvaluator;

impl ClassicalEvaluator {
    /// Evaluate every member without quantum sockets
    ///
    /// A component is evaluated once all its inputs are known. An unwired
    /// input is unknown unless the component reports it as optional, in
    /// which case it reads as `false`. Components still waiting when a full
    /// round makes no progress stay pending; that is not an error.
    ///
    /// # Errors
    /// Propagates a component's refusal to produce a classical output.
    pub fn evaluate(circuit: &Circuit, profiles: &ProfileTable) -> Result<ClassicalValues> {
        let mut values = ClassicalValues::default();
        let mut pending: Vec<ComponentId> = profiles
            .iter()
            .filter(|p| !p.quantum)
            .map(|p| p.id)
            .collect();

        let mut round = 0;
        loop {
            let mut progressed: HashSet<ComponentId> = HashSet::new();
            for &id in &pending {
                let Some(component) = circuit.component(id) else {
                    continue;
                };
                let inputs: Option<Vec<bool>> = (0..component.inputs().len())
                    .map(|i| {
                        let socket = SocketAddr::input(id, i);
                        match circuit.connected(socket) {
                            Some(upstream) => values.output(upstream),
                            None if component.input_required(i) => None,
                            None => Some(false),
                        }
                    })
                    .collect();
                let Some(inputs) = inputs else {
                    continue;
                };

                let outputs = component.classical_output(&inputs)?;
                for (i, bit) in outputs.into_iter().enumerate() {
                    values.outputs.insert(SocketAddr::output(id, i), bit);
                }
                values.resolved.push(id);
                progressed.insert(id);
            }

            round += 1;
            if progressed.is_empty() {
                break;
            }
            pending.retain(|id| !progressed.contains(id));
        }

        trace!(
            rounds = round,
            resolved = values.resolved.len(),
            pending = pending.len(),
            "classical fixpoint reached"
        );
        values.pending = pending;
        Ok(values)
    }
}
