//! Metrics for the logging facility.
//!
//! # Responsibilities
//! - Define the counter provider seam used by the metrics observer
//! - Implement it over the `metrics` facade
//! - Expose a Prometheus scrape endpoint for the daemon
//!
//! # Metrics
//! - `logging_entries_checked` (counter): entries checked against the active spec, by `level`
//! - `logging_entries_written` (counter): entries that passed the check and were written, by `level`
//!
//! # Design Decisions
//! - Per-severity counters are resolved once, so the hot path is one increment
//! - Install the recorder before building the observer; handles bind at construction

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::level::Severity;
use crate::observability::observer::Observer;

/// Description of a counter family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterOpts {
    pub namespace: &'static str,
    pub name: &'static str,
    pub help: &'static str,
    pub label_names: &'static [&'static str],
}

impl CounterOpts {
    /// `namespace_name`, or just `name` without a namespace.
    pub fn fq_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.to_string()
        } else {
            format!("{}_{}", self.namespace, self.name)
        }
    }
}

pub const CHECKED_COUNT_OPTS: CounterOpts = CounterOpts {
    namespace: "logging",
    name: "entries_checked",
    help: "Number of log entries checked against the active logging level",
    label_names: &["level"],
};

pub const WRITE_COUNT_OPTS: CounterOpts = CounterOpts {
    namespace: "logging",
    name: "entries_written",
    help: "Number of log entries that are written",
    label_names: &["level"],
};

/// A monotonically increasing counter.
pub trait Counter: Send + Sync {
    /// The counter for the given `(label, value)` pairs.
    fn with(&self, labels: &[(&str, &str)]) -> Arc<dyn Counter>;

    fn add(&self, delta: u64);
}

/// Creates counters from their description.
pub trait Provider {
    fn new_counter(&self, opts: CounterOpts) -> Arc<dyn Counter>;
}

/// `Provider` backed by the globally installed `metrics` recorder.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsProvider;

impl Provider for MetricsProvider {
    fn new_counter(&self, opts: CounterOpts) -> Arc<dyn Counter> {
        let name = opts.fq_name();
        metrics::describe_counter!(name.clone(), opts.help);
        Arc::new(FacadeCounter::new(name, Vec::new()))
    }
}

struct FacadeCounter {
    name: String,
    labels: Vec<(String, String)>,
    handle: metrics::Counter,
}

impl FacadeCounter {
    fn new(name: String, labels: Vec<(String, String)>) -> Self {
        let metric_labels: Vec<metrics::Label> = labels
            .iter()
            .map(|(key, value)| metrics::Label::new(key.clone(), value.clone()))
            .collect();
        let handle = metrics::counter!(name.clone(), metric_labels);
        Self {
            name,
            labels,
            handle,
        }
    }
}

impl Counter for FacadeCounter {
    fn with(&self, labels: &[(&str, &str)]) -> Arc<dyn Counter> {
        let mut all = self.labels.clone();
        all.extend(
            labels
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        );
        Arc::new(FacadeCounter::new(self.name.clone(), all))
    }

    fn add(&self, delta: u64) {
        self.handle.increment(delta);
    }
}

/// Observer counting checked and written entries per severity.
pub struct MetricsObserver {
    checked: Vec<Arc<dyn Counter>>,
    written: Vec<Arc<dyn Counter>>,
}

impl MetricsObserver {
    pub fn new(provider: &dyn Provider) -> Self {
        let checked = provider.new_counter(CHECKED_COUNT_OPTS);
        let written = provider.new_counter(WRITE_COUNT_OPTS);

        let by_level = |counter: &Arc<dyn Counter>| -> Vec<Arc<dyn Counter>> {
            Severity::ALL
                .iter()
                .map(|severity| counter.with(&[("level", severity.as_str())]))
                .collect()
        };

        Self {
            checked: by_level(&checked),
            written: by_level(&written),
        }
    }
}

impl Observer for MetricsObserver {
    fn check(&self, severity: Severity, _logger: &str) {
        self.checked[severity.index()].add(1);
    }

    fn write_entry(&self, severity: Severity, _logger: &str) {
        self.written[severity.index()].add(1);
    }
}

/// Install the Prometheus recorder and serve `/metrics` on `addr`.
///
/// Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}
