//! Daily report document and its delivery.
//!
//! `daily_report_<date>.json` is the contract between the pipeline and the
//! notifier; `template` turns it into an e-mail, `email` ships it.

pub mod daily;
pub mod email;
pub mod template;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use template::{compose_email, EmailContent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentCategory {
    #[serde(alias = "Positive", alias = "POSITIVE")]
    Positive,
    #[serde(alias = "Neutral", alias = "NEUTRAL")]
    Neutral,
    #[serde(alias = "Negative", alias = "NEGATIVE")]
    Negative,
}

impl SentimentCategory {
    /// Scores strictly above/below ±0.05 leave the neutral band.
    pub const NEUTRAL_BAND: f64 = 0.05;

    pub fn from_score(score: f64) -> Self {
        if score > Self::NEUTRAL_BAND {
            SentimentCategory::Positive
        } else if score < -Self::NEUTRAL_BAND {
            SentimentCategory::Negative
        } else {
            SentimentCategory::Neutral
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SentimentCategory::Positive => "Positive",
            SentimentCategory::Neutral => "Neutral",
            SentimentCategory::Negative => "Negative",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            SentimentCategory::Positive => "#27ae60",
            SentimentCategory::Neutral => "#f1c40f",
            SentimentCategory::Negative => "#e74c3c",
        }
    }
}

impl fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A report figure that may arrive as a number or as preformatted text
/// (`0.42` or `"High"`). Text is shown as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Numbers with three decimals, text unchanged.
    pub fn render(&self) -> String {
        match self {
            Scalar::Number(n) => format!("{n:.3}"),
            Scalar::Text(t) => t.clone(),
        }
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

/// One day's aggregate, as consumed by the notifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    pub sentiment_category: SentimentCategory,
    #[serde(default)]
    pub sentiment_score: Option<Scalar>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend_direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatility: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium_insights: Option<String>,
}
