use prometheus::{
    Encoder, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub assignments_total: IntCounterVec,
    pub jobs_in_queue: IntGauge,
    pub assignment_latency_seconds: HistogramVec,
    pub conflict_decisions_total: IntCounterVec,
    pub recommendation_latency_seconds: HistogramVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let assignments_total = IntCounterVec::new(
            Opts::new("assignments_total", "Total auto-assignments by outcome"),
            &["outcome"],
        )
        .expect("valid assignments_total metric");

        let jobs_in_queue = IntGauge::new(
            "jobs_in_queue",
            "Current number of jobs awaiting auto-assignment",
        )
        .expect("valid jobs_in_queue metric");

        let assignment_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "assignment_latency_seconds",
                "Latency of auto-assignment processing in seconds",
            ),
            &["outcome"],
        )
        .expect("valid assignment_latency_seconds metric");

        let conflict_decisions_total = IntCounterVec::new(
            Opts::new(
                "conflict_decisions_total",
                "Job-creation conflict decisions by outcome",
            ),
            &["outcome"],
        )
        .expect("valid conflict_decisions_total metric");

        let recommendation_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "recommendation_latency_seconds",
                "Latency of worker recommendation scoring in seconds",
            ),
            &["outcome"],
        )
        .expect("valid recommendation_latency_seconds metric");

        registry
            .register(Box::new(assignments_total.clone()))
            .expect("register assignments_total");
        registry
            .register(Box::new(jobs_in_queue.clone()))
            .expect("register jobs_in_queue");
        registry
            .register(Box::new(assignment_latency_seconds.clone()))
            .expect("register assignment_latency_seconds");
        registry
            .register(Box::new(conflict_decisions_total.clone()))
            .expect("register conflict_decisions_total");
        registry
            .register(Box::new(recommendation_latency_seconds.clone()))
            .expect("register recommendation_latency_seconds");

        Self {
            registry,
            assignments_total,
            jobs_in_queue,
            assignment_latency_seconds,
            conflict_decisions_total,
            recommendation_latency_seconds,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
