use crate::analyze::trends::{self, TrendSummary};
use crate::error::PipelineResult;
use crate::store::{self, ArtifactStore};

pub const REPORT_TITLE: &str = "# SentimentSage Trend Report";

/// Markdown report with one section per source, in summary key order.
pub fn render_report(summary: &TrendSummary) -> String {
    let mut lines: Vec<String> = vec![format!("{REPORT_TITLE}\n")];
    for (source, stats) in summary.iter() {
        lines.push(format!("## {}\n", source.heading()));
        lines.push(format!("- Average Sentiment: {:.3}", stats.average));
        lines.push(format!("- Std Dev: {:.3}", stats.stddev));
        lines.push(format!("- Count: {}", stats.count));
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Report stage: `trend_summary.json` → `report.md`.
pub fn run(store: &ArtifactStore) -> PipelineResult<String> {
    let summary = trends::load_summary(&store.trend_summary_file())?;
    let report = render_report(&summary);
    store::write_text_atomic(&store.report_file(), &report)?;
    tracing::info!(target: "report", path = %store.report_file().display(), "report generated");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::trends::{compute_trends, Observation};

    #[test]
    fn renders_known_example() {
        let obs: Vec<Observation> = [0.5, -0.5, 0.0]
            .into_iter()
            .map(|s| Observation::new("twitter", s))
            .collect();
        let out = render_report(&compute_trends(&obs));
        let expected = "# SentimentSage Trend Report\n\n\
## Twitter\n\n\
- Average Sentiment: 0.000\n\
- Std Dev: 0.408\n\
- Count: 3\n\n\
## Reddit\n\n\
- Average Sentiment: 0.000\n\
- Std Dev: 0.000\n\
- Count: 0\n\n\
## News\n\n\
- Average Sentiment: 0.000\n\
- Std Dev: 0.000\n\
- Count: 0\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn rendering_is_deterministic() {
        let obs = vec![Observation::new("news", 0.1234), Observation::new("news", -0.9)];
        let t = compute_trends(&obs);
        assert_eq!(render_report(&t), render_report(&t));
        assert!(render_report(&t).contains("- Average Sentiment: -0.388"));
    }
}
