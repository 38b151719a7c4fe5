//! Prometheus backend for the swarm task-state collector.
//!
//! [`PrometheusMetrics`] implements [`swarm_core::StatePublisher`] and owns a
//! private registry, so several instances can coexist (e.g. in tests).
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use swarm_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let publisher = Arc::new(metrics.clone());
//!
//! // hand `publisher` to a swarm_core::Collector, serve `metrics.encode_text()` on /metrics
//! let body = metrics.encode_text()?;
//! assert!(body.is_empty() || body.starts_with('#'));
//! # let _ = publisher;
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `swarm_task_state{unit, state, desired_state, error}` - Gauge, always `1`
//! - `swarm_exporter_cycles_total{outcome}` - Counter
//! - `swarm_exporter_cycle_duration_seconds` - Histogram
//! - `swarm_exporter_units` - Gauge
//! - `swarm_exporter_last_success_timestamp_seconds` - Gauge
//!
//! ## Consistency
//! `publish` clears and repopulates `swarm_task_state` under a write lock and
//! [`PrometheusMetrics::gather`] takes the matching read lock, so a scrape never
//! sees a half-cleared family.

mod backend;
pub use backend::PrometheusMetrics;

