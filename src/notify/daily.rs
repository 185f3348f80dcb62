//! Builds the daily report from the trend summary.

use chrono::NaiveDate;

use super::{DailyReport, Scalar, SentimentCategory};
use crate::analyze::trends::{self, TrendSummary};
use crate::error::PipelineResult;
use crate::store::{self, ArtifactStore};

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

impl DailyReport {
    pub fn from_trends(summary: &TrendSummary) -> Self {
        let total = summary.total_count();
        let active: Vec<_> = summary.iter().filter(|(_, st)| st.count > 0).collect();

        // Count-weighted mean and pooled population stddev across sources.
        let (score, volatility) = if total == 0 {
            (0.0, 0.0)
        } else {
            let n = total as f64;
            let mean = active
                .iter()
                .map(|(_, st)| st.average * st.count as f64)
                .sum::<f64>()
                / n;
            let second_moment = active
                .iter()
                .map(|(_, st)| (st.stddev.powi(2) + st.average.powi(2)) * st.count as f64)
                .sum::<f64>()
                / n;
            (mean, (second_moment - mean * mean).max(0.0).sqrt())
        };

        let category = SentimentCategory::from_score(score);

        let summary_text = if total == 0 {
            "No items were collected for this run.".to_string()
        } else {
            format!(
                "Bitcoin sentiment is {} overall (score {:.3}) across {} items from {} source(s).",
                category.label().to_lowercase(),
                score,
                total,
                active.len()
            )
        };

        let insights = active
            .iter()
            .map(|(src, st)| {
                format!(
                    "{}: average sentiment {:.3} across {} items (std dev {:.3})",
                    src.heading(),
                    st.average,
                    st.count,
                    st.stddev
                )
            })
            .collect();

        let most_pos = active
            .iter()
            .max_by(|a, b| a.1.average.total_cmp(&b.1.average));
        let most_neg = active
            .iter()
            .min_by(|a, b| a.1.average.total_cmp(&b.1.average));
        let premium_insights = match (most_pos, most_neg) {
            (Some((p, ps)), Some((q, qs))) => Some(format!(
                "Most positive source: {} ({:.3}); most negative source: {} ({:.3}).",
                p.heading(),
                ps.average,
                q.heading(),
                qs.average
            )),
            _ => None,
        };

        let trend_direction = match category {
            SentimentCategory::Positive => "bullish",
            SentimentCategory::Negative => "bearish",
            SentimentCategory::Neutral => "sideways",
        };

        DailyReport {
            sentiment_category: category,
            sentiment_score: Some(Scalar::from(round3(score))),
            summary: Some(summary_text),
            insights,
            trend_direction: Some(trend_direction.to_string()),
            volatility: Some(Scalar::from(round3(volatility))),
            premium_insights,
        }
    }
}

/// Daily stage: `trend_summary.json` → `daily_report_<date>.json`.
pub fn run(store: &ArtifactStore, date: NaiveDate) -> PipelineResult<DailyReport> {
    let summary = trends::load_summary(&store.trend_summary_file())?;
    let report = DailyReport::from_trends(&summary);
    let path = store.daily_report_file(date);
    store::write_json(&path, &report)?;
    tracing::info!(
        target: "daily",
        category = %report.sentiment_category,
        path = %path.display(),
        "daily report written"
    );
    Ok(report)
}

pub fn load(store: &ArtifactStore, date: NaiveDate) -> PipelineResult<DailyReport> {
    store::read_json(&store.daily_report_file(date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::trends::{compute_trends, Observation};
    use crate::source::Source;

    #[test]
    fn empty_summary_is_neutral() {
        let r = DailyReport::from_trends(&TrendSummary::default());
        assert_eq!(r.sentiment_category, SentimentCategory::Neutral);
        assert_eq!(r.sentiment_score, Some(Scalar::Number(0.0)));
        assert!(r.insights.is_empty());
        assert!(r.premium_insights.is_none());
    }

    #[test]
    fn weighted_score_and_pooled_volatility() {
        let obs = vec![
            Observation::new("twitter", 0.4),
            Observation::new("twitter", 0.2),
            Observation::new("news", -0.3),
        ];
        let t = compute_trends(&obs);
        assert_eq!(t.get(Source::Reddit).count, 0);
        let r = DailyReport::from_trends(&t);
        // mean of all three values = 0.1
        assert_eq!(r.sentiment_score, Some(Scalar::Number(0.1)));
        assert_eq!(r.sentiment_category, SentimentCategory::Positive);
        assert_eq!(r.trend_direction.as_deref(), Some("bullish"));
        // pooled stddev of [0.4, 0.2, -0.3]
        let all = crate::analyze::SourceStats::from_values(&[0.4, 0.2, -0.3]);
        assert_eq!(r.volatility, Some(Scalar::Number(round3(all.stddev))));
        assert_eq!(r.insights.len(), 2);
        assert!(r.premium_insights.unwrap().contains("most negative source: News"));
    }
}
