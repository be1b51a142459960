//! Per-run results, kept apart from the circuit until published

use crate::measurement_groups::GroupHistogram;
use crate::statistics::RunStatistics;
use qlogic_core::{Circuit, ComponentId, MeasureGroup, QubitId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether a component's value was computed this run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentStatus {
    Resolved,
    /// Inputs never became known (classical) or the component was never
    /// scheduled (quantum)
    Pending,
}

/// Shape of one subcircuit as simulated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcircuitSummary {
    pub members: Vec<ComponentId>,
    pub num_qubits: usize,
    pub num_layers: usize,
    /// Quantum components left out in lenient mode
    pub dropped: Vec<ComponentId>,
}

/// What one quantum measurement observed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementReport {
    pub group: MeasureGroup,
    pub qubit: QubitId,
    /// Probability of reading 1 in the unforced run
    pub one_rate: f64,
    /// The group's histogram; empty for ungrouped measurements
    pub buckets: Vec<f64>,
}

/// Everything one simulation produced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub subcircuits: Vec<SubcircuitSummary>,
    pub status: BTreeMap<ComponentId, ComponentStatus>,
    /// Output bits of every resolved classical component
    pub classical_outputs: BTreeMap<ComponentId, Vec<bool>>,
    /// Recorded value of every resolved classical measurement
    pub classical_results: BTreeMap<ComponentId, bool>,
    pub measurements: BTreeMap<ComponentId, MeasurementReport>,
    pub histograms: Vec<GroupHistogram>,
    pub statistics: Option<RunStatistics>,
}

impl SimulationReport {
    pub fn status(&self, id: ComponentId) -> Option<ComponentStatus> {
        self.status.get(&id).copied()
    }

    pub fn is_pending(&self, id: ComponentId) -> bool {
        self.status(id) == Some(ComponentStatus::Pending)
    }

    pub fn classical_result(&self, id: ComponentId) -> Option<bool> {
        self.classical_results.get(&id).copied()
    }

    pub fn measurement(&self, id: ComponentId) -> Option<&MeasurementReport> {
        self.measurements.get(&id)
    }

    pub fn one_rate(&self, id: ComponentId) -> Option<f64> {
        self.measurement(id).map(|m| m.one_rate)
    }

    /// Histogram shared by the measurement's group, if it has one
    pub fn buckets(&self, id: ComponentId) -> Option<&[f64]> {
        self.measurement(id)
            .map(|m| m.buckets.as_slice())
            .filter(|b| !b.is_empty())
    }

    /// Subcircuit containing `id`
    pub fn subcircuit_of(&self, id: ComponentId) -> Option<&SubcircuitSummary> {
        self.subcircuits.iter().find(|s| s.members.contains(&id))
    }

    /// Push the results onto the circuit's components
    ///
    /// Every reported component gets its pending flag; classical
    /// measurements get their result; quantum measurements get their one
    /// rate and, when grouped, their group's buckets. Components the run
    /// never reached keep whatever they showed before.
    pub fn publish(&self, circuit: &mut Circuit) {
        for (&id, &status) in &self.status {
            if let Some(component) = circuit.component_mut(id) {
                component.set_pending(status == ComponentStatus::Pending);
            }
        }
        for (&id, &result) in &self.classical_results {
            if let Some(component) = circuit.component_mut(id) {
                component.set_result(result);
            }
        }
        for (&id, measurement) in &self.measurements {
            if let Some(component) = circuit.component_mut(id) {
                component.set_one_rate(measurement.one_rate);
                if measurement.group.is_grouped() && !measurement.buckets.is_empty() {
                    component.set_buckets(&measurement.buckets);
                }
            }
        }
    }
}
