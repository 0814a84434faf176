//! Prometheus metrics for the watch service.
//!
//! Everything is registered on one process-wide [`REGISTRY`]: per-endpoint
//! HTTP counters fed by [`middleware::MetricsMiddleware`], and the domain
//! counters bumped by registrations and the lineage engine.

pub mod middleware;
use lazy_static::lazy_static;
use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};

/// Labels shared by every HTTP metric.
const HTTP_LABELS: &[&str] = &["endpoint", "method", "status"];

const LATENCY_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

fn counter(name: &str, help: &str, labels: &[&str]) -> CounterVec {
    let counter_vec = CounterVec::new(Opts::new(name, help), labels)
        .unwrap_or_else(|e| panic!("invalid counter {}: {}", name, e));
    REGISTRY
        .register(Box::new(counter_vec.clone()))
        .unwrap_or_else(|e| panic!("counter {} registered twice: {}", name, e));
    counter_vec
}

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    pub static ref REQUEST_COUNTER: CounterVec =
        counter("requests_total", "Total number of HTTP requests", HTTP_LABELS);

    pub static ref ERROR_COUNTER: CounterVec =
        counter("error_requests_total", "HTTP responses with a 4xx or 5xx status", HTTP_LABELS);

    pub static ref REQUEST_LATENCY: HistogramVec = {
        let opts = HistogramOpts::new("request_latency_seconds", "Request latency in seconds")
            .buckets(LATENCY_BUCKETS.to_vec());
        let histogram_vec = HistogramVec::new(opts, HTTP_LABELS)
            .unwrap_or_else(|e| panic!("invalid latency histogram: {}", e));
        REGISTRY
            .register(Box::new(histogram_vec.clone()))
            .unwrap_or_else(|e| panic!("latency histogram registered twice: {}", e));
        histogram_vec
    };

    /// Watch registrations by network and `success`/`failure`.
    pub static ref WATCH_REGISTRATIONS: CounterVec = counter(
        "watch_registrations_total",
        "Watch registrations by network and result",
        &["network", "result"],
    );

    /// Webhook events by network and what the lineage engine did with them.
    pub static ref LINEAGE_EVENTS: CounterVec = counter(
        "lineage_events_total",
        "Notifier events by network and outcome",
        &["network", "kind"],
    );
}

/// Encodes the whole registry in the Prometheus text format.
pub fn gather_metrics() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(buffer)
}
