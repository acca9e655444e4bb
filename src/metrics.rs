//! Prometheus metrics for the HTTP surface and evaluation cycles.

use prometheus::{Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
    pub evaluation_cycles_total: IntCounter,
    pub evaluation_cycle_failures_total: IntCounter,
    pub evaluation_cycle_duration_seconds: Histogram,
    pub symbols_skipped_total: IntCounter,
    pub qualifying_symbols: Gauge,
    pub notifications_sent_total: IntCounter,
    pub notification_failures_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total number of HTTP requests")?;
        let http_request_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request latency in seconds",
            )
            .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0]),
        )?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently being served")?;
        let evaluation_cycles_total =
            IntCounter::new("evaluation_cycles_total", "Evaluation cycles completed")?;
        let evaluation_cycle_failures_total = IntCounter::new(
            "evaluation_cycle_failures_total",
            "Evaluation cycles that ended in an error",
        )?;
        let evaluation_cycle_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "evaluation_cycle_duration_seconds",
                "Wall time of one evaluation cycle",
            )
            .buckets(vec![1.0, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
        )?;
        let symbols_skipped_total = IntCounter::new(
            "symbols_skipped_total",
            "Symbols skipped because they were unlisted or failed to fetch",
        )?;
        let qualifying_symbols =
            Gauge::new("qualifying_symbols", "Symbols meeting the MA condition last cycle")?;
        let notifications_sent_total =
            IntCounter::new("notifications_sent_total", "Notifications delivered")?;
        let notification_failures_total =
            IntCounter::new("notification_failures_total", "Notifications that failed to deliver")?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(evaluation_cycles_total.clone()))?;
        registry.register(Box::new(evaluation_cycle_failures_total.clone()))?;
        registry.register(Box::new(evaluation_cycle_duration_seconds.clone()))?;
        registry.register(Box::new(symbols_skipped_total.clone()))?;
        registry.register(Box::new(qualifying_symbols.clone()))?;
        registry.register(Box::new(notifications_sent_total.clone()))?;
        registry.register(Box::new(notification_failures_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            evaluation_cycles_total,
            evaluation_cycle_failures_total,
            evaluation_cycle_duration_seconds,
            symbols_skipped_total,
            qualifying_symbols,
            notifications_sent_total,
            notification_failures_total,
        })
    }

    pub fn record_notification(&self, delivered: bool) {
        if delivered {
            self.notifications_sent_total.inc();
        } else {
            self.notification_failures_total.inc();
        }
    }

    /// Text exposition format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
