//! Scheduling of quantum components into layers

use crate::config::SimulatorConfig;
use crate::error::{Result, SimulatorError};
use crate::profile::{ComponentProfile, ProfileTable};
use crate::qubit_index::QubitIndexMap;
use qlogic_core::{Circuit, CircuitError, ComponentId, QubitId, SocketAddr};
use ahash::AHashSet;
use smallvec::SmallVec;
use std::collections::HashMap;
use tracing::{trace, warn};

/// Qubits of one component; no catalogue component spans more than three
type Lanes = SmallVec<[QubitId; 3]>;

/// One scheduling step: each qubit is touched by at most one component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    slots: Vec<Option<ComponentId>>,
}

impl Layer {
    /// Empty layer over `num_qubits` slots
    pub fn new(num_qubits: usize) -> Self {
        Self {
            slots: vec![None; num_qubits],
        }
    }

    #[inline]
    pub fn slots(&self) -> &[Option<ComponentId>] {
        &self.slots
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.slots.len()
    }

    /// Distinct components in order of their lowest slot
    pub fn components(&self) -> Vec<ComponentId> {
        let mut seen = Vec::new();
        for id in self.slots.iter().flatten() {
            if !seen.contains(id) {
                seen.push(*id);
            }
        }
        seen
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Claim `qubit` for `component`
    ///
    /// # Errors
    /// [`SimulatorError::SlotConflict`] if another component holds the slot.
    pub fn reserve(&mut self, layer: usize, qubit: QubitId, component: ComponentId) -> Result<()> {
        let num_qubits = self.slots.len();
        let slot = self
            .slots
            .get_mut(qubit.index())
            .ok_or(CircuitError::InvalidQubit(qubit.index(), num_qubits))?;
        match *slot {
            Some(first) => Err(SimulatorError::SlotConflict {
                layer,
                qubit,
                first,
                second: component,
            }),
            None => {
                *slot = Some(component);
                Ok(())
            }
        }
    }
}

/// Ordered layers of one subcircuit plus each placed component's qubits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerPlan {
    layers: Vec<Layer>,
    qubits: HashMap<ComponentId, Lanes>,
    placement: HashMap<ComponentId, usize>,
    dropped: Vec<ComponentId>,
}

impl LayerPlan {
    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Qubits of a placed component, in lane order
    pub fn qubits_of(&self, id: ComponentId) -> Option<&[QubitId]> {
        self.qubits.get(&id).map(|lanes| lanes.as_slice())
    }

    /// Index of the layer a component was placed in
    pub fn layer_of(&self, id: ComponentId) -> Option<usize> {
        self.placement.get(&id).copied()
    }

    pub fn is_placed(&self, id: ComponentId) -> bool {
        self.placement.contains_key(&id)
    }

    /// Eligible components left out in lenient mode
    pub fn dropped(&self) -> &[ComponentId] {
        &self.dropped
    }
}

/// Packs quantum components into layers in dependency order
pub struct GateLayerizer<'a> {
    circuit: &'a Circuit,
    profiles: &'a ProfileTable,
    indices: &'a QubitIndexMap,
    strict: bool,
}

impl<'a> GateLayerizer<'a> {
    pub fn new(
        circuit: &'a Circuit,
        profiles: &'a ProfileTable,
        indices: &'a QubitIndexMap,
        config: &SimulatorConfig,
    ) -> Self {
        Self {
            circuit,
            profiles,
            indices,
            strict: config.is_strict(),
        }
    }

    /// Build the layer plan
    ///
    /// Eligible components are the quantum ones whose inputs are all wired.
    /// Each pass places every component whose quantum inputs all come from
    /// components placed in earlier passes, and emits one layer.
    ///
    /// # Errors
    /// - [`SimulatorError::SlotConflict`] in either mode
    /// - [`SimulatorError::UnindexedSocket`] and
    ///   [`SimulatorError::UnplacedComponents`] in strict mode
    pub fn layerize(&self) -> Result<LayerPlan> {
        let num_qubits = self.indices.num_qubits();
        let mut plan = LayerPlan::default();
        let mut work: Vec<&ComponentProfile> = self
            .profiles
            .iter()
            .filter(|p| p.quantum && p.inputs_wired)
            .collect();
        let mut placed: AHashSet<ComponentId> = AHashSet::new();

        loop {
            let layer_index = plan.layers.len();
            let mut layer = Layer::new(num_qubits);
            let mut newly_placed: Vec<ComponentId> = Vec::new();
            let mut skipped: Vec<ComponentId> = Vec::new();

            for profile in &work {
                if !self.upstream_placed(profile, &placed) {
                    continue;
                }
                let Some(qubits) = self.qubits_for(profile)? else {
                    skipped.push(profile.id);
                    continue;
                };
                for &qubit in &qubits {
                    layer.reserve(layer_index, qubit, profile.id)?;
                }
                plan.qubits.insert(profile.id, qubits);
                plan.placement.insert(profile.id, layer_index);
                newly_placed.push(profile.id);
            }

            plan.dropped.extend(skipped.iter().copied());
            work.retain(|p| !newly_placed.contains(&p.id) && !skipped.contains(&p.id));
            if newly_placed.is_empty() {
                break;
            }
            trace!(layer = layer_index, components = newly_placed.len(), "layer scheduled");
            placed.extend(newly_placed);
            plan.layers.push(layer);
        }

        if !work.is_empty() {
            let components: Vec<ComponentId> = work.iter().map(|p| p.id).collect();
            if self.strict {
                return Err(SimulatorError::UnplacedComponents { components });
            }
            warn!(?components, "dropping quantum components that cannot be scheduled");
            plan.dropped.extend(components);
        }

        Ok(plan)
    }

    fn upstream_placed(&self, profile: &ComponentProfile, placed: &AHashSet<ComponentId>) -> bool {
        profile.quantum_inputs.iter().all(|&i| {
            self.circuit
                .connected(SocketAddr::input(profile.id, i))
                .is_some_and(|upstream| placed.contains(&upstream.component))
        })
    }

    /// Qubits on the component's lanes; `None` when lenient mode skips it
    fn qubits_for(&self, profile: &ComponentProfile) -> Result<Option<Lanes>> {
        let mut qubits = Lanes::new();
        for socket in profile.qubit_sockets() {
            match self.indices.get(socket) {
                Some(qubit) => qubits.push(qubit),
                None if self.strict => return Err(SimulatorError::UnindexedSocket { socket }),
                None => {
                    warn!(%socket, "skipping component with an unindexed quantum socket");
                    return Ok(None);
                }
            }
        }
        Ok(Some(qubits))
    }
}
