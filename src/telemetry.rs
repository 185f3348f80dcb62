//! Prometheus exposition for batch runs.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::path::Path;

/// Process-wide Prometheus recorder for a single batch run. There is no
/// scrape endpoint: the exposition text is dumped to a file at the end of the
/// run (node_exporter textfile-collector style).
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    pub fn init() -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;
        metrics::describe_counter!("score_items_total", "Scored items written per run.");
        metrics::describe_histogram!("score_duration_ms", "Scoring stage duration in milliseconds.");
        metrics::describe_counter!(
            "trends_dropped_total",
            "Scored items ignored by aggregation (unknown source or sentiment)."
        );
        Ok(Self { handle })
    }

    pub fn render(&self) -> String {
        self.handle.render()
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        crate::store::write_text_atomic(path, &self.render())
            .with_context(|| format!("writing metrics to {}", path.display()))
    }
}
