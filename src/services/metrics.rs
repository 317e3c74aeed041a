//! Detection metrics and Prometheus integration.

use prometheus::{Counter, CounterVec, Opts, Registry, TextEncoder};

/// Prometheus counters for the detection engine
#[derive(Clone)]
pub struct DetectionMetrics {
    pub registry: Registry,
    pub login_attempts_total: CounterVec,
    pub escalations_total: Counter,
    pub ip_blocks_total: Counter,
}

impl DetectionMetrics {
    /// Create a metrics collector with its own registry
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Attempt counter by outcome (success / failure)
        let login_attempts_total = CounterVec::new(
            Opts::new("login_attempts_total", "Total login attempts evaluated"),
            &["outcome"],
        )?;

        let escalations_total = Counter::new(
            "escalations_total",
            "Principals escalated to the ALERT state",
        )?;

        let ip_blocks_total = Counter::new("ip_blocks_total", "IP block entries installed")?;

        registry.register(Box::new(login_attempts_total.clone()))?;
        registry.register(Box::new(escalations_total.clone()))?;
        registry.register(Box::new(ip_blocks_total.clone()))?;

        Ok(Self {
            registry,
            login_attempts_total,
            escalations_total,
            ip_blocks_total,
        })
    }

    /// Record one evaluated attempt
    pub fn record_attempt(&self, success: bool) {
        let outcome = if success { "success" } else { "failure" };
        self.login_attempts_total
            .with_label_values(&[outcome])
            .inc();
    }

    /// Record a transition into `ALERT`
    pub fn record_escalation(&self) {
        self.escalations_total.inc();
    }

    /// Record the installation of an IP block
    pub fn record_block(&self) {
        self.ip_blocks_total.inc();
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder.encode_to_string(&metric_families)
    }
}
