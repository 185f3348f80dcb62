use chrono::NaiveDate;
use html_escape::encode_text;
use std::fmt::Write as _;

use super::{DailyReport, Scalar};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
}

fn or_na(v: Option<&Scalar>) -> String {
    v.map(Scalar::render).unwrap_or_else(|| "N/A".to_string())
}

/// HTML e-mail for a daily report. The "Detailed Analysis" block is only
/// emitted when `premium` is set.
pub fn compose_email(report: &DailyReport, date: NaiveDate, premium: bool) -> EmailContent {
    let day = date.format("%Y-%m-%d").to_string();
    let category = report.sentiment_category;
    let color = category.color();

    let subject = format!("Bitcoin Sentiment Alert: {} on {}", category.label(), day);

    let score = or_na(report.sentiment_score.as_ref());
    let summary = report
        .summary
        .as_deref()
        .unwrap_or("No summary available.");

    let mut html = String::with_capacity(2048);
    let _ = write!(
        html,
        r#"<html>
<head>
<style>
  body {{ font-family: Arial, sans-serif; background: #f8f9fa; }}
  .container {{ background: #fff; border-radius: 8px; padding: 2em; max-width: 600px; margin: auto; }}
  h1, h2 {{ color: #2c3e50; }}
  .sentiment-score {{ font-size: 2em; font-weight: bold; color: {color}; }}
  .insights ul {{ margin: 0; padding-left: 1.2em; }}
  .footer {{ margin-top: 2em; font-size: 0.9em; color: #888; }}
</style>
</head>
<body>
<div class="container">
<h1>SentimentSage Daily Report</h1>
<h2>Bitcoin Sentiment: <span style="color: {color}">{label}</span></h2>
<div class="sentiment-score">{score}</div>
<p>Date: {day}</p>
<p>Summary: {summary}</p>
<h3>Key Insights:</h3>
<div class="insights">
<ul>
"#,
        label = category.label(),
        score = encode_text(&score),
        summary = encode_text(summary),
    );

    for insight in &report.insights {
        let _ = writeln!(html, "<li>{}</li>", encode_text(insight));
    }
    html.push_str("</ul>\n</div>\n");

    if premium {
        let direction = report.trend_direction.as_deref().unwrap_or("neutral");
        let volatility = or_na(report.volatility.as_ref());
        let extra = report
            .premium_insights
            .as_deref()
            .unwrap_or("No additional insights.");
        let _ = write!(
            html,
            "<h3>Detailed Analysis:</h3>\n\
<p>Trend Direction: <strong>{}</strong></p>\n\
<p>Volatility: <strong>{}</strong></p>\n\
<p>Premium Insights: {}</p>\n",
            encode_text(direction),
            encode_text(&volatility),
            encode_text(extra)
        );
    }

    html.push_str(
        "<p>For more details, visit your dashboard.</p>\n</div>\n\
<div class=\"footer\">&copy; SentimentSage. All rights reserved.</div>\n</body>\n</html>\n",
    );

    EmailContent { subject, html }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::SentimentCategory;

    fn report() -> DailyReport {
        DailyReport {
            sentiment_category: SentimentCategory::Negative,
            sentiment_score: Some(Scalar::Number(-0.31)),
            summary: Some("Fear <rising>".into()),
            insights: vec!["Reddit & news agree".into(), "Twitter quiet".into()],
            trend_direction: Some("bearish".into()),
            volatility: Some(Scalar::Number(0.42)),
            premium_insights: Some("Watch funding rates".into()),
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    #[test]
    fn subject_and_color() {
        let c = compose_email(&report(), day(), false);
        assert_eq!(c.subject, "Bitcoin Sentiment Alert: Negative on 2025-01-06");
        assert!(c.html.contains("#e74c3c"));
        assert!(c.html.contains("-0.310"));
    }

    #[test]
    fn text_is_escaped() {
        let c = compose_email(&report(), day(), false);
        assert!(c.html.contains("Fear &lt;rising&gt;"));
        assert!(c.html.contains("<li>Reddit &amp; news agree</li>"));
    }

    #[test]
    fn premium_block_only_when_requested() {
        let basic = compose_email(&report(), day(), false);
        assert!(!basic.html.contains("Trend Direction"));
        assert!(!basic.html.contains("Volatility"));
        assert!(!basic.html.contains("Detailed Analysis"));

        let premium = compose_email(&report(), day(), true);
        assert!(premium.html.contains("Trend Direction: <strong>bearish</strong>"));
        assert!(premium.html.contains("Volatility: <strong>0.420</strong>"));
        assert!(premium.html.contains("Watch funding rates"));
    }

    #[test]
    fn premium_defaults_when_fields_missing() {
        let mut r = report();
        r.trend_direction = None;
        r.volatility = None;
        r.premium_insights = None;
        let c = compose_email(&r, day(), true);
        assert!(c.html.contains("Trend Direction: <strong>neutral</strong>"));
        assert!(c.html.contains("Volatility: <strong>N/A</strong>"));
        assert!(c.html.contains("No additional insights."));
    }

    #[test]
    fn text_figures_render_verbatim() {
        let mut r = report();
        r.sentiment_score = Some(Scalar::Text("0.1".into()));
        r.volatility = Some(Scalar::Text("High".into()));
        let c = compose_email(&r, day(), true);
        assert!(c.html.contains(r#"<div class="sentiment-score">0.1</div>"#));
        assert!(c.html.contains("Volatility: <strong>High</strong>"));
    }
}
