use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref UPDATES_TOTAL: Counter = Counter::with_opts(Opts::new(
        "statusd_updates_total",
        "Total status updates accepted and stored"
    ))
    .unwrap();
    pub static ref INVALID_UPDATES_TOTAL: Counter = Counter::with_opts(Opts::new(
        "statusd_invalid_updates_total",
        "Total payloads rejected by validation"
    ))
    .unwrap();
    pub static ref AUTH_FAILURES_TOTAL: Counter = Counter::with_opts(Opts::new(
        "statusd_auth_failures_total",
        "Total requests rejected by API key authentication"
    ))
    .unwrap();
    pub static ref DB_FAILURES_TOTAL: Counter = Counter::with_opts(Opts::new(
        "statusd_db_failures_total",
        "Total database failures"
    ))
    .unwrap();
    pub static ref UPSERT_LATENCY_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "statusd_upsert_latency_seconds",
            "Time taken to persist a status update"
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0])
    )
    .unwrap();
}

pub fn init_metrics() {
    REGISTRY.register(Box::new(UPDATES_TOTAL.clone())).unwrap();
    REGISTRY
        .register(Box::new(INVALID_UPDATES_TOTAL.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(AUTH_FAILURES_TOTAL.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(DB_FAILURES_TOTAL.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(UPSERT_LATENCY_SECONDS.clone()))
        .unwrap();
}

pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}
