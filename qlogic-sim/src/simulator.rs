//! Core simulator implementation

use std::time::Instant;

use qlogic_core::{Circuit, ComponentRole, SocketAddr};
use tracing::{debug, debug_span};

use crate::{
    cache::{CacheStatistics, LayerCache},
    classical::{ClassicalEvaluator, ClassicalValues},
    config::SimulatorConfig,
    engine::{ForcedAssignment, RunContext, RunOutcome, StatevectorEngine},
    error::{Result, SimulatorError},
    layers::{GateLayerizer, LayerPlan},
    measurement_groups::{GroupHistogram, MeasurementGroupEnumerator},
    profile::ProfileTable,
    progress::{NoProgress, ProgressObserver},
    qubit_index::QubitIndexAssigner,
    report::{ComponentStatus, MeasurementReport, SimulationReport, SubcircuitSummary},
    statistics::RunStatistics,
    subcircuit::{Subcircuit, SubcircuitResolver},
};

/// Hybrid classical/quantum circuit simulator
///
/// One simulator serves one editor session: its layer caches persist
/// across calls so re-simulating after a small edit reuses earlier work.
/// A simulator must not be shared between threads running different
/// circuits; create one per circuit instead.
///
/// # Example
///
/// ```
/// use qlogic_core::{Circuit, MeasureGroup, SocketAddr};
/// use qlogic_gates::{GateKind, QuantumMeasure, QuantumSource, SingleQubitGate};
/// use qlogic_sim::{Simulator, SimulatorConfig};
///
/// let mut circuit = Circuit::new();
/// let source = circuit.add_component(Box::new(QuantumSource::default()));
/// let h = circuit.add_component(Box::new(SingleQubitGate::new(GateKind::H)));
/// let group = MeasureGroup::new(1).unwrap();
/// let measure = circuit.add_component(Box::new(QuantumMeasure::new(group)));
/// circuit.connect(SocketAddr::output(source, 0), SocketAddr::input(h, 0)).unwrap();
/// circuit.connect(SocketAddr::output(h, 0), SocketAddr::input(measure, 0)).unwrap();
///
/// let mut simulator = Simulator::new(SimulatorConfig::default()).unwrap();
/// let report = simulator.simulate(&mut circuit).unwrap();
/// let buckets = report.buckets(measure).unwrap();
/// assert!((buckets[0] - 0.5).abs() < 1e-10);
/// ```
pub struct Simulator {
    config: SimulatorConfig,
    cache: LayerCache,
    observer: Box<dyn ProgressObserver>,
    last_statistics: Option<RunStatistics>,
}

impl Simulator {
    /// Create a new simulator with the given configuration
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::InvalidConfig`] if the configuration is
    /// invalid.
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        config.validate().map_err(SimulatorError::InvalidConfig)?;

        Ok(Self {
            cache: LayerCache::new(config.cache_capacity, config.enable_cache),
            config,
            observer: Box::new(NoProgress),
            last_statistics: None,
        })
    }

    /// Install a progress observer, replacing the current one
    pub fn with_observer(mut self, observer: impl ProgressObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn set_observer(&mut self, observer: impl ProgressObserver + 'static) {
        self.observer = Box::new(observer);
    }

    /// Get the simulator configuration
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Forget everything left over from previous calls except the caches
    pub fn reset(&mut self) {
        self.last_statistics = None;
    }

    /// Drop every cached layer unitary and layer result
    pub fn clear_caches(&mut self) {
        self.cache.clear();
    }

    /// Unitary and result cache statistics, cumulative since creation
    pub fn cache_statistics(&self) -> (CacheStatistics, CacheStatistics) {
        (self.cache.unitary_statistics(), self.cache.result_statistics())
    }

    /// Statistics of the last successful call, when collection is enabled
    pub fn last_statistics(&self) -> Option<&RunStatistics> {
        self.last_statistics.as_ref()
    }

    /// Simulate `circuit` and publish the results onto its components
    ///
    /// Nothing is published when an error is returned.
    ///
    /// # Errors
    ///
    /// See [`Simulator::analyze`].
    pub fn simulate(&mut self, circuit: &mut Circuit) -> Result<SimulationReport> {
        let report = self.analyze(circuit)?;
        report.publish(circuit);
        Ok(report)
    }

    /// Simulate `circuit` without touching it
    ///
    /// Every subcircuit is resolved classically; those with quantum sources
    /// are layered, each measurement group is enumerated, and one free run
    /// records the live one rates.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The quantum wiring is malformed (slot conflict, cycle, or in strict
    ///   mode an unschedulable component)
    /// - A subcircuit or group exceeds the configured limits
    /// - The progress observer cancels the run
    pub fn analyze(&mut self, circuit: &Circuit) -> Result<SimulationReport> {
        let span = debug_span!("simulate", components = circuit.len());
        let _guard = span.enter();
        let total_start = Instant::now();

        let mut report = SimulationReport::default();
        let mut stats = RunStatistics::new();
        let subcircuits = SubcircuitResolver::resolve(circuit);
        stats.subcircuits = subcircuits.len();

        for (index, subcircuit) in subcircuits.iter().enumerate() {
            let summary = self.simulate_subcircuit(circuit, subcircuit, &mut report, &mut stats)?;
            debug!(
                subcircuit = index,
                members = summary.members.len(),
                qubits = summary.num_qubits,
                layers = summary.num_layers,
                "subcircuit simulated"
            );
            report.subcircuits.push(summary);
        }

        if self.config.collect_statistics {
            stats.unitary_cache = self.cache.unitary_statistics();
            stats.result_cache = self.cache.result_statistics();
            stats.total_time = total_start.elapsed();
            report.statistics = Some(stats.clone());
            self.last_statistics = Some(stats);
        }

        Ok(report)
    }

    fn simulate_subcircuit(
        &mut self,
        circuit: &Circuit,
        subcircuit: &Subcircuit,
        report: &mut SimulationReport,
        stats: &mut RunStatistics,
    ) -> Result<SubcircuitSummary> {
        let profiles = ProfileTable::build(circuit, subcircuit);
        let classical = ClassicalEvaluator::evaluate(circuit, &profiles)?;
        record_classical(circuit, &profiles, &classical, report);

        let mut summary = SubcircuitSummary {
            members: subcircuit.members().to_vec(),
            ..Default::default()
        };

        let sources = profiles.sources();
        let num_qubits = sources.len();
        if num_qubits > self.config.max_qubits {
            return Err(SimulatorError::TooManyQubits {
                num_qubits,
                max_qubits: self.config.max_qubits,
            });
        }
        if num_qubits == 0 {
            record_quantum(&profiles, &LayerPlan::default(), &[], &RunOutcome::default(), report);
            return Ok(summary);
        }

        let indices = QubitIndexAssigner::assign(circuit, &sources)?;
        let plan = GateLayerizer::new(circuit, &profiles, &indices, &self.config).layerize()?;
        let engine = StatevectorEngine::new(circuit, &profiles, &classical, &plan, num_qubits, &self.config);
        let enumerator = MeasurementGroupEnumerator::new(&plan, &profiles, self.config.max_group_size)?;

        let mut ctx = RunContext {
            cache: &mut self.cache,
            observer: self.observer.as_mut(),
            stats: &mut *stats,
        };
        let histograms = enumerator.enumerate(&engine, &mut ctx)?;
        let live = engine.run(&mut ctx, &ForcedAssignment::none())?;

        stats.quantum_subcircuits += 1;
        stats.max_qubits = stats.max_qubits.max(num_qubits);
        record_quantum(&profiles, &plan, &histograms, &live, report);
        report.histograms.extend(histograms);

        summary.num_qubits = num_qubits;
        summary.num_layers = plan.len();
        summary.dropped = plan.dropped().to_vec();
        Ok(summary)
    }
}

impl Default for Simulator {
    fn default() -> Self {
        let config = SimulatorConfig::default();
        Self {
            cache: LayerCache::new(config.cache_capacity, config.enable_cache),
            config,
            observer: Box::new(NoProgress),
            last_statistics: None,
        }
    }
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

fn record_classical(
    circuit: &Circuit,
    profiles: &ProfileTable,
    classical: &ClassicalValues,
    report: &mut SimulationReport,
) {
    for profile in profiles.iter().filter(|p| !p.quantum) {
        let outputs = classical
            .is_resolved(profile.id)
            .then(|| classical.outputs_of(circuit, profile.id))
            .flatten();
        let Some(outputs) = outputs else {
            report.status.insert(profile.id, ComponentStatus::Pending);
            continue;
        };

        report.status.insert(profile.id, ComponentStatus::Resolved);
        if profile.role == ComponentRole::ClassicalMeasure {
            // The measurement records the value arriving on its input
            let value = classical
                .input(circuit, SocketAddr::input(profile.id, 0))
                .unwrap_or(false);
            report.classical_results.insert(profile.id, value);
        }
        report.classical_outputs.insert(profile.id, outputs);
    }
}

fn record_quantum(
    profiles: &ProfileTable,
    plan: &LayerPlan,
    histograms: &[GroupHistogram],
    live: &RunOutcome,
    report: &mut SimulationReport,
) {
    for profile in profiles.iter().filter(|p| p.quantum) {
        let status = if plan.is_placed(profile.id) {
            ComponentStatus::Resolved
        } else {
            ComponentStatus::Pending
        };
        report.status.insert(profile.id, status);

        let Some(group) = profile.measure_group() else {
            continue;
        };
        let Some(&qubit) = plan.qubits_of(profile.id).and_then(|q| q.first()) else {
            continue;
        };
        let buckets = histograms
            .iter()
            .find(|h| h.members.contains(&profile.id))
            .map(|h| h.buckets.clone())
            .unwrap_or_default();
        report.measurements.insert(
            profile.id,
            MeasurementReport {
                group,
                qubit,
                one_rate: live.one_rates.get(&profile.id).copied().unwrap_or(0.0),
                buckets,
            },
        );
    }
}
