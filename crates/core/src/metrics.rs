//! Prometheus metrics for bulletin processing.
//!
//! Collectors are process-global; register them once with
//! [`register_metrics`] when an exporter is wanted.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

/// Processing requests by outcome.
pub static PROCESS_OUTCOMES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "bulletin_process_outcomes_total",
            "Total processing requests by outcome",
        ),
        &["outcome"], // "published", "already_present", "deferred", "failed"
    )
    .unwrap()
});

/// Wall-clock duration of ffmpeg runs.
pub static TRANSCODE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "bulletin_transcode_duration_seconds",
            "Duration of ffmpeg transcodes",
        )
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
        &["format", "status"], // status: "success", "failed"
    )
    .unwrap()
});

/// Counts one processing outcome.
pub fn record_outcome(outcome: &str) {
    PROCESS_OUTCOMES.with_label_values(&[outcome]).inc();
}

/// Records how long one transcode took.
pub fn observe_transcode(format: &str, success: bool, seconds: f64) {
    let status = if success { "success" } else { "failed" };
    TRANSCODE_DURATION
        .with_label_values(&[format, status])
        .observe(seconds);
}

/// Get all metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(PROCESS_OUTCOMES.clone()),
        Box::new(TRANSCODE_DURATION.clone()),
    ]
}

/// Registers every bulletin collector with `registry`.
pub fn register_metrics(registry: &Registry) -> prometheus::Result<()> {
    for metric in all_metrics() {
        registry.register(metric)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_outcome_increments() {
        let before = PROCESS_OUTCOMES.with_label_values(&["deferred"]).get();
        record_outcome("deferred");
        let after = PROCESS_OUTCOMES.with_label_values(&["deferred"]).get();
        assert!(after > before);
    }

    #[test]
    fn test_register_metrics() {
        let registry = Registry::new();
        record_outcome("published");
        observe_transcode("mp3", true, 1.5);
        register_metrics(&registry).unwrap();

        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"bulletin_process_outcomes_total".to_string()));
        assert!(names.contains(&"bulletin_transcode_duration_seconds".to_string()));
    }

    #[test]
    fn test_double_registration_fails() {
        let registry = Registry::new();
        register_metrics(&registry).unwrap();
        assert!(register_metrics(&registry).is_err());
    }
}
