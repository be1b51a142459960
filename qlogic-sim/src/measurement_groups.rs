//! Joint-outcome histograms for tagged measurement groups

use crate::engine::{ForcedAssignment, RunContext, StatevectorEngine};
use crate::error::{Result, SimulatorError};
use crate::layers::LayerPlan;
use crate::profile::ProfileTable;
use qlogic_core::{ComponentId, MeasureGroup, QubitId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Bucket array of one group
///
/// `buckets[i]` is the probability that the members read the bits of `i`,
/// with `members[0]` as the most significant bit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupHistogram {
    pub group: MeasureGroup,
    pub members: Vec<ComponentId>,
    pub buckets: Vec<f64>,
}

impl GroupHistogram {
    /// Sum of all buckets; 1 up to rounding for a well-formed circuit
    pub fn total(&self) -> f64 {
        self.buckets.iter().sum()
    }
}

/// Collects the scheduled members of each group and enumerates their
/// outcomes
#[derive(Debug, Clone)]
pub struct MeasurementGroupEnumerator {
    groups: Vec<(MeasureGroup, Vec<ComponentId>)>,
}

impl MeasurementGroupEnumerator {
    /// Gather groups 1 through 3 from the placed measurements
    ///
    /// Members are ordered by qubit, then layer, then id.
    ///
    /// # Errors
    /// [`SimulatorError::GroupTooLarge`] if a group exceeds `max_group_size`.
    pub fn new(plan: &LayerPlan, profiles: &ProfileTable, max_group_size: usize) -> Result<Self> {
        let mut groups = Vec::new();

        for group in MeasureGroup::histogram_groups() {
            let mut members: Vec<(QubitId, usize, ComponentId)> = profiles
                .iter()
                .filter(|p| p.measure_group() == Some(group))
                .filter_map(|p| {
                    let qubit = *plan.qubits_of(p.id)?.first()?;
                    Some((qubit, plan.layer_of(p.id)?, p.id))
                })
                .collect();
            if members.is_empty() {
                continue;
            }
            if members.len() > max_group_size {
                return Err(SimulatorError::GroupTooLarge {
                    group,
                    size: members.len(),
                    max: max_group_size,
                });
            }
            members.sort_unstable();
            groups.push((group, members.into_iter().map(|(_, _, id)| id).collect()));
        }

        Ok(Self { groups })
    }

    /// Non-empty groups with their ordered members
    pub fn groups(&self) -> &[(MeasureGroup, Vec<ComponentId>)] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Run the engine once per assignment of every group
    ///
    /// # Errors
    /// [`SimulatorError::Cancelled`] if the observer breaks, or any engine
    /// error.
    pub fn enumerate(
        &self,
        engine: &StatevectorEngine<'_>,
        ctx: &mut RunContext<'_>,
    ) -> Result<Vec<GroupHistogram>> {
        let mut histograms = Vec::with_capacity(self.groups.len());

        for (group, members) in &self.groups {
            let total = 1usize << members.len();
            debug!(%group, members = members.len(), assignments = total, "enumerating measurement group");

            let mut buckets = Vec::with_capacity(total);
            for index in 0..total {
                if ctx.observer.on_assignment(*group, index, total).is_break() {
                    return Err(SimulatorError::Cancelled);
                }
                let forced = ForcedAssignment::from_index(members, index);
                buckets.push(engine.run(ctx, &forced)?.joint_probability);
                ctx.stats.assignments_enumerated += 1;
            }

            histograms.push(GroupHistogram {
                group: *group,
                members: members.clone(),
                buckets,
            });
        }

        Ok(histograms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LayerCache;
    use crate::classical::ClassicalEvaluator;
    use crate::config::SimulatorConfig;
    use crate::layers::GateLayerizer;
    use crate::progress::NoProgress;
    use crate::qubit_index::QubitIndexAssigner;
    use crate::statistics::RunStatistics;
    use crate::subcircuit::SubcircuitResolver;
    use approx::assert_abs_diff_eq;
    use qlogic_core::{Circuit, SocketAddr};
    use qlogic_gates::{ControlledGate, GateKind, QuantumMeasure, QuantumSource};

    fn group(n: u8) -> MeasureGroup {
        MeasureGroup::new(n).unwrap()
    }

    /// |1⟩ controls an X on |0⟩; both wires are measured in group 1, the
    /// target's measurement inserted first
    fn circuit() -> (Circuit, ComponentId, ComponentId) {
        let mut circuit = Circuit::new();
        let control = circuit.add_component(Box::new(QuantumSource::one()));
        let target = circuit.add_component(Box::new(QuantumSource::default()));
        let cx = circuit.add_component(Box::new(ControlledGate::new(GateKind::X)));
        let m_target = circuit.add_component(Box::new(QuantumMeasure::new(group(1))));
        let m_control = circuit.add_component(Box::new(QuantumMeasure::new(group(1))));
        circuit.connect(SocketAddr::output(control, 0), SocketAddr::input(cx, 0)).unwrap();
        circuit.connect(SocketAddr::output(target, 0), SocketAddr::input(cx, 1)).unwrap();
        circuit.connect(SocketAddr::output(cx, 0), SocketAddr::input(m_control, 0)).unwrap();
        circuit.connect(SocketAddr::output(cx, 1), SocketAddr::input(m_target, 0)).unwrap();
        (circuit, m_control, m_target)
    }

    fn plan(circuit: &Circuit) -> (ProfileTable, LayerPlan) {
        let subcircuits = SubcircuitResolver::resolve(circuit);
        assert_eq!(subcircuits.len(), 1);
        let profiles = ProfileTable::build(circuit, &subcircuits[0]);
        let indices = QubitIndexAssigner::assign(circuit, &profiles.sources()).unwrap();
        let plan = GateLayerizer::new(circuit, &profiles, &indices, &SimulatorConfig::default())
            .layerize()
            .unwrap();
        (profiles, plan)
    }

    #[test]
    fn test_members_ordered_by_qubit() {
        let (circuit, m_control, m_target) = circuit();
        let (profiles, plan) = plan(&circuit);

        let enumerator = MeasurementGroupEnumerator::new(&plan, &profiles, 10).unwrap();
        assert_eq!(enumerator.groups(), &[(group(1), vec![m_control, m_target])]);

        let err = MeasurementGroupEnumerator::new(&plan, &profiles, 1).unwrap_err();
        assert!(matches!(err, SimulatorError::GroupTooLarge { size: 2, max: 1, .. }));
    }

    #[test]
    fn test_buckets_follow_member_order() {
        let (circuit, m_control, m_target) = circuit();
        let (profiles, plan) = plan(&circuit);
        let config = SimulatorConfig::default();
        let classical = ClassicalEvaluator::evaluate(&circuit, &profiles).unwrap();
        let engine = StatevectorEngine::new(&circuit, &profiles, &classical, &plan, 2, &config);
        let enumerator = MeasurementGroupEnumerator::new(&plan, &profiles, 10).unwrap();

        let mut cache = LayerCache::new(16, true);
        let mut stats = RunStatistics::default();
        let mut observer = NoProgress;
        let mut ctx = RunContext {
            cache: &mut cache,
            observer: &mut observer,
            stats: &mut stats,
        };
        let histograms = enumerator.enumerate(&engine, &mut ctx).unwrap();

        assert_eq!(histograms.len(), 1);
        let histogram = &histograms[0];
        assert_eq!(histogram.members, vec![m_control, m_target]);
        assert_abs_diff_eq!(histogram.total(), 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(histogram.buckets[3], 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(histogram.buckets[1], 0.0, epsilon = 1e-10);
        assert_eq!(stats.assignments_enumerated, 4);
    }
}
