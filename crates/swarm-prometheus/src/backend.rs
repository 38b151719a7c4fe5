use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use prometheus::{
    Encoder, Gauge, GaugeVec, Histogram, HistogramOpts, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder, proto::MetricFamily,
};
use swarm_core::{CoreError, CycleOutcome, Reconciled, StatePublisher};

const TASK_STATE_LABELS: [&str; 4] = ["unit", "state", "desired_state", "error"];

/// Prometheus metrics backend.
#[derive(Clone)]
pub struct PrometheusMetrics {
    registry: Registry,
    snapshot: Arc<RwLock<()>>,

    task_state: GaugeVec,
    cycles: IntCounterVec,
    cycle_duration: Histogram,
    units: IntGauge,
    last_success: Gauge,
}

impl PrometheusMetrics {
    /// Create a backend with its own private registry.
    ///
    /// The registry is only reachable through [`PrometheusMetrics::gather`],
    /// which keeps scrapes consistent with `publish`.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let task_state = GaugeVec::new(
            Opts::new(
                "swarm_task_state",
                "Current state of each service slot in the latest snapshot (always 1)",
            ),
            &TASK_STATE_LABELS,
        )?;
        let cycles = IntCounterVec::new(
            Opts::new(
                "swarm_exporter_cycles_total",
                "Collection cycles by outcome",
            ),
            &["outcome"],
        )?;
        let cycle_duration = Histogram::with_opts(
            HistogramOpts::new(
                "swarm_exporter_cycle_duration_seconds",
                "Duration of a collection cycle",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        )?;
        let units = IntGauge::new(
            "swarm_exporter_units",
            "Logical units in the latest published snapshot",
        )?;
        let last_success = Gauge::new(
            "swarm_exporter_last_success_timestamp_seconds",
            "Unix time of the last successful collection cycle",
        )?;

        registry.register(Box::new(task_state.clone()))?;
        registry.register(Box::new(cycles.clone()))?;
        registry.register(Box::new(cycle_duration.clone()))?;
        registry.register(Box::new(units.clone()))?;
        registry.register(Box::new(last_success.clone()))?;

        Ok(Self {
            registry,
            snapshot: Arc::new(RwLock::new(())),
            task_state,
            cycles,
            cycle_duration,
            units,
            last_success,
        })
    }

    /// Gather all metric families, never observing a publish in progress.
    pub fn gather(&self) -> Vec<MetricFamily> {
        let _guard = self
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        self.registry.gather()
    }

    /// Gather and encode in the Prometheus text exposition format.
    pub fn encode_text(&self) -> Result<String, prometheus::Error> {
        let families = self.gather();
        TextEncoder::new().encode_to_string(&families)
    }

    /// Content type matching [`PrometheusMetrics::encode_text`].
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }
}

impl StatePublisher for PrometheusMetrics {
    fn publish(&self, reconciled: &Reconciled) -> Result<(), CoreError> {
        let _guard = self
            .snapshot
            .write()
            .map_err(|_| CoreError::Publish("metrics snapshot lock poisoned".into()))?;

        self.task_state.reset();
        for (key, record) in reconciled {
            let unit = key.to_string();
            self.task_state
                .get_metric_with_label_values(&[
                    unit.as_str(),
                    record.state.as_str(),
                    record.desired_state.as_str(),
                    record.error_label(),
                ])
                .map_err(|e| CoreError::Publish(e.to_string()))?
                .set(1.0);
        }
        self.units.set(reconciled.len() as i64);
        Ok(())
    }

    fn record_cycle(&self, outcome: CycleOutcome, elapsed: Duration) {
        self.cycles.with_label_values(&[outcome.as_label()]).inc();
        self.cycle_duration.observe(elapsed.as_secs_f64());

        if outcome == CycleOutcome::Success
            && let Ok(now) = SystemTime::now().duration_since(UNIX_EPOCH)
        {
            self.last_success.set(now.as_secs_f64());
        }
    }
}
