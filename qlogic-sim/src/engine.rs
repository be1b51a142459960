//! Statevector evolution over a layer plan

use crate::cache::{LayerCache, LayerKey};
use crate::classical::ClassicalValues;
use crate::config::SimulatorConfig;
use crate::error::{Result, SimulatorError};
use crate::layers::{Layer, LayerPlan};
use crate::profile::ProfileTable;
use crate::progress::ProgressObserver;
use crate::statistics::RunStatistics;
use num_complex::Complex64;
use qlogic_core::{Circuit, CircuitError, ComponentId, PhaseModel, QubitId, SocketAddr, UnitaryRequest};
use qlogic_gates::matrix_ops::{identity_matrix, matrix_multiply};
use qlogic_state::DenseState;
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// Outcomes forced on measurement components for one run
///
/// An empty assignment means a free run that only observes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForcedAssignment {
    bits: BTreeMap<ComponentId, bool>,
}

impl ForcedAssignment {
    /// No forced outcomes
    pub fn none() -> Self {
        Self::default()
    }

    /// Assignment number `index` over `members`
    ///
    /// The first member takes the most significant bit of `index`.
    pub fn from_index(members: &[ComponentId], index: usize) -> Self {
        let n = members.len();
        let bits = members
            .iter()
            .enumerate()
            .map(|(j, &id)| (id, (index >> (n - 1 - j)) & 1 == 1))
            .collect();
        Self { bits }
    }

    pub fn force(&mut self, id: ComponentId, outcome: bool) {
        self.bits.insert(id, outcome);
    }

    #[inline]
    pub fn get(&self, id: ComponentId) -> Option<bool> {
        self.bits.get(&id).copied()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }
}

/// Result of one statevector run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutcome {
    /// Product of the probabilities of every forced outcome; 1 for a free run
    pub joint_probability: f64,
    /// Probability of reading 1, per measurement; filled by free runs only
    pub one_rates: HashMap<ComponentId, f64>,
}

/// Mutable collaborators threaded through every run
pub struct RunContext<'r> {
    pub cache: &'r mut LayerCache,
    pub observer: &'r mut dyn ProgressObserver,
    pub stats: &'r mut RunStatistics,
}

/// Applies a subcircuit's layers to `|0…0⟩`, collapsing forced measurements
/// on the way
pub struct StatevectorEngine<'a> {
    circuit: &'a Circuit,
    profiles: &'a ProfileTable,
    classical: &'a ClassicalValues,
    plan: &'a LayerPlan,
    num_qubits: usize,
    phase_model: PhaseModel,
    tolerance: f64,
    /// Cache key per layer, `None` for layers that must be recomputed
    keys: Vec<Option<LayerKey>>,
    /// Measurements per layer in ascending qubit order
    measurements: Vec<Vec<(ComponentId, QubitId)>>,
}

impl<'a> StatevectorEngine<'a> {
    pub fn new(
        circuit: &'a Circuit,
        profiles: &'a ProfileTable,
        classical: &'a ClassicalValues,
        plan: &'a LayerPlan,
        num_qubits: usize,
        config: &SimulatorConfig,
    ) -> Self {
        let keys = plan
            .layers()
            .iter()
            .map(|layer| LayerKey::for_layer(layer, plan, profiles))
            .collect();
        let measurements = plan
            .layers()
            .iter()
            .map(|layer| Self::layer_measurements(layer, plan, profiles))
            .collect();

        Self {
            circuit,
            profiles,
            classical,
            plan,
            num_qubits,
            phase_model: config.phase_model,
            tolerance: config.tolerance,
            keys,
            measurements,
        }
    }

    fn layer_measurements(
        layer: &Layer,
        plan: &LayerPlan,
        profiles: &ProfileTable,
    ) -> Vec<(ComponentId, QubitId)> {
        let mut found: Vec<(ComponentId, QubitId)> = layer
            .components()
            .into_iter()
            .filter(|&id| profiles.get(id).is_some_and(|p| p.measure_group().is_some()))
            .filter_map(|id| Some((id, *plan.qubits_of(id)?.first()?)))
            .collect();
        found.sort_by_key(|&(_, qubit)| qubit);
        found
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_layers(&self) -> usize {
        self.plan.len()
    }

    /// Run every layer once
    ///
    /// With an empty `forced`, each measurement records `1 - p(0)` and the
    /// state is left alone. Otherwise each forced measurement multiplies the
    /// joint probability by the chance of its outcome and projects the state
    /// onto it, renormalised; unforced measurements are ignored. Once the
    /// joint probability reaches zero the run stops early.
    ///
    /// # Errors
    /// - [`SimulatorError::Cancelled`] if the observer breaks
    /// - component or state errors while composing or applying a layer
    pub fn run(&self, ctx: &mut RunContext<'_>, forced: &ForcedAssignment) -> Result<RunOutcome> {
        let mut state = DenseState::new(self.num_qubits)?;
        let mut outcome = RunOutcome {
            joint_probability: 1.0,
            one_rates: HashMap::new(),
        };
        let total = self.plan.len();
        ctx.stats.statevector_runs += 1;

        for (index, layer) in self.plan.layers().iter().enumerate() {
            if ctx.observer.on_layer(index, total).is_break() {
                return Err(SimulatorError::Cancelled);
            }
            self.apply_layer(index, layer, &mut state, ctx)?;

            for &(id, qubit) in &self.measurements[index] {
                let zero = state.zero_probability(qubit)?;
                if forced.is_empty() {
                    outcome.one_rates.insert(id, 1.0 - zero);
                    continue;
                }
                let Some(bit) = forced.get(id) else {
                    continue;
                };

                let probability = (zero - if bit { 1.0 } else { 0.0 }).abs();
                outcome.joint_probability *= probability;
                if probability <= self.tolerance {
                    trace!(%id, %qubit, bit, "forced outcome impossible");
                    outcome.joint_probability = 0.0;
                    return Ok(outcome);
                }
                state.project(qubit, bit, 1.0 / probability.sqrt())?;
            }
        }

        Ok(outcome)
    }

    fn apply_layer(
        &self,
        index: usize,
        layer: &Layer,
        state: &mut DenseState,
        ctx: &mut RunContext<'_>,
    ) -> Result<()> {
        ctx.stats.layers_applied += 1;

        let key = match &self.keys[index] {
            Some(key) if ctx.cache.is_enabled() => key,
            _ => {
                let unitary = self.compose(layer)?;
                state.apply_operator(&unitary)?;
                return Ok(());
            }
        };

        let result_key = (key.clone(), state.fingerprint());
        if let Some(amplitudes) = ctx.cache.result(&result_key) {
            trace!(layer = index, "layer result cache hit");
            ctx.stats.layers_reused += 1;
            state.replace_amplitudes(amplitudes)?;
            return Ok(());
        }

        let unitary = match ctx.cache.unitary(key) {
            Some(unitary) => {
                trace!(layer = index, "layer unitary cache hit");
                unitary
            }
            None => {
                let unitary = self.compose(layer)?;
                ctx.cache.store_unitary(key.clone(), unitary.clone());
                unitary
            }
        };
        state.apply_operator(&unitary)?;
        ctx.cache.store_result(result_key, state.amplitudes().to_vec());
        Ok(())
    }

    /// Product of the layer's component operators
    ///
    /// Components in one layer touch disjoint qubits, so the order of the
    /// product does not matter.
    pub fn compose(&self, layer: &Layer) -> Result<Vec<Complex64>> {
        let mut combined: Option<Vec<Complex64>> = None;
        for id in layer.components() {
            let operator = self.component_operator(id)?;
            combined = Some(match combined {
                Some(acc) => matrix_multiply(&operator, &acc),
                None => operator,
            });
        }
        Ok(combined.unwrap_or_else(|| identity_matrix(1 << self.num_qubits)))
    }

    fn component_operator(&self, id: ComponentId) -> Result<Vec<Complex64>> {
        let component = self
            .circuit
            .component(id)
            .ok_or(CircuitError::UnknownComponent(id))?;
        let profile = self
            .profiles
            .get(id)
            .ok_or(CircuitError::UnknownComponent(id))?;

        // Unresolved classical inputs read as false
        let classical_inputs: Vec<bool> = profile
            .classical_inputs
            .iter()
            .map(|&i| {
                self.classical
                    .input(self.circuit, SocketAddr::input(id, i))
                    .unwrap_or(false)
            })
            .collect();
        let qubits = self.plan.qubits_of(id).unwrap_or(&[]);

        let operator = component.unitary(&UnitaryRequest {
            classical_inputs: &classical_inputs,
            total_qubits: self.num_qubits,
            qubits,
            phase_model: self.phase_model,
        })?;
        Ok(operator)
    }
}
