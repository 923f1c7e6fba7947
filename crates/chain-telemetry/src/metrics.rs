//! Prometheus metrics for the belief-merge consensus core.
//!
//! Naming convention: `cc_<area>_<metric>_<unit>`.

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramVec, Opts,
    Registry, TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // BELIEF-MERGE METRICS
    // =========================================================================

    /// Total belief-merge rounds run by this peer.
    pub static ref MERGE_ROUNDS: Counter = Counter::new(
        "cc_consensus_merge_rounds_total",
        "Total number of mergeBeliefs invocations"
    ).expect("metric creation failed");

    /// Time spent inside a single mergeBeliefs call.
    pub static ref MERGE_DURATION: Histogram = Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "cc_consensus_merge_duration_seconds",
            "Time spent in mergeBeliefs"
        ).buckets(exponential_buckets(0.0001, 2.0, 15).unwrap())
    ).expect("metric creation failed");

    /// Current proposalPoint of this peer's own Order.
    pub static ref PROPOSAL_POINT: Gauge = Gauge::new(
        "cc_consensus_proposal_point",
        "proposalPoint of the peer's own Order"
    ).expect("metric creation failed");

    /// Current consensusPoint of this peer's own Order.
    pub static ref CONSENSUS_POINT: Gauge = Gauge::new(
        "cc_consensus_consensus_point",
        "consensusPoint of the peer's own Order"
    ).expect("metric creation failed");

    /// Belief-map entries dropped during merge, by reason.
    pub static ref MERGE_ENTRIES_DROPPED: CounterVec = CounterVec::new(
        Opts::new("cc_consensus_entries_dropped_total", "Order entries dropped during merge"),
        &["reason"] // bad_signature, stale_timestamp, stale_consensus_point
    ).expect("metric creation failed");

    // =========================================================================
    // STORE METRICS
    // =========================================================================

    /// Total cells written to the store.
    pub static ref STORE_PUTS: Counter = Counter::new(
        "cc_store_puts_total",
        "Total cell store put operations"
    ).expect("metric creation failed");

    /// Store get hits vs misses.
    pub static ref STORE_GETS: CounterVec = CounterVec::new(
        Opts::new("cc_store_gets_total", "Cell store get operations"),
        &["outcome"] // hit, miss
    ).expect("metric creation failed");

    /// Missing-data faults raised during traversal.
    pub static ref STORE_MISSING_DATA: Counter = Counter::new(
        "cc_store_missing_data_total",
        "Total MissingData faults raised resolving refs"
    ).expect("metric creation failed");

    // =========================================================================
    // SIGNATURE METRICS
    // =========================================================================

    pub static ref SIGNATURE_VERIFICATIONS: CounterVec = CounterVec::new(
        Opts::new("cc_signature_verifications_total", "Total signature verifications"),
        &["result"] // valid, invalid
    ).expect("metric creation failed");

    // =========================================================================
    // WIRE / GOSSIP METRICS
    // =========================================================================

    pub static ref FRAMES_ENCODED: CounterVec = CounterVec::new(
        Opts::new("cc_wire_frames_encoded_total", "Frames encoded for transmission"),
        &["tag"]
    ).expect("metric creation failed");

    pub static ref FRAMES_DECODED: CounterVec = CounterVec::new(
        Opts::new("cc_wire_frames_decoded_total", "Frames decoded on receipt"),
        &["tag"]
    ).expect("metric creation failed");

    // =========================================================================
    // ERROR METRICS
    // =========================================================================

    pub static ref CORE_ERRORS: CounterVec = CounterVec::new(
        Opts::new("cc_core_errors_total", "Errors by crate and kind"),
        &["crate_name", "error_kind"]
    ).expect("metric creation failed");
}

/// Handle for the metrics server
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(MERGE_ROUNDS.clone()),
        Box::new(MERGE_DURATION.clone()),
        Box::new(PROPOSAL_POINT.clone()),
        Box::new(CONSENSUS_POINT.clone()),
        Box::new(MERGE_ENTRIES_DROPPED.clone()),
        Box::new(STORE_PUTS.clone()),
        Box::new(STORE_GETS.clone()),
        Box::new(STORE_MISSING_DATA.clone()),
        Box::new(SIGNATURE_VERIFICATIONS.clone()),
        Box::new(FRAMES_ENCODED.clone()),
        Box::new(FRAMES_DECODED.clone()),
        Box::new(CORE_ERRORS.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_metrics() {
        let result = register_metrics();
        let _ = result;
    }

    #[test]
    fn test_counter_increment() {
        MERGE_ROUNDS.inc();
        assert!(MERGE_ROUNDS.get() >= 1.0);
    }

    #[test]
    fn test_gauge_set() {
        CONSENSUS_POINT.set(3.0);
        assert_eq!(CONSENSUS_POINT.get(), 3.0);
    }

    #[test]
    fn test_histogram_timer() {
        let _timer = HistogramTimer::new(&MERGE_DURATION);
        std::thread::sleep(std::time::Duration::from_millis(1));
    }
}
