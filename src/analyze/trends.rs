//! # Trend aggregation
//! Groups scored items by source and computes count / mean / population
//! standard deviation per group.
//!
//! Policies:
//! - every known source is always present; an empty group is `{0, 0, 0}`
//! - items with an unknown source, or a non-numeric sentiment, are dropped
//!   without error
//! - a missing or unparseable results file is an error, never zero-filled

use metrics::counter;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::source::Source;
use crate::store::{self, ArtifactStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceStats {
    pub average: f64,
    pub stddev: f64,
    pub count: u64,
}

impl SourceStats {
    /// Mean and population stddev (divide by n) in f64, no rounding.
    pub fn from_values(values: &[f64]) -> Self {
        let n = values.len();
        if n == 0 {
            return Self::default();
        }
        let nf = n as f64;
        let mean = values.iter().sum::<f64>() / nf;
        let stddev = if n == 1 {
            0.0
        } else {
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / nf;
            var.sqrt()
        };
        Self {
            average: mean,
            stddev,
            count: n as u64,
        }
    }
}

/// Per-source statistics for exactly the sources in [`Source::ALL`], kept in
/// that order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrendSummary {
    stats: [SourceStats; 3],
}

impl TrendSummary {
    fn slot(source: Source) -> usize {
        match source {
            Source::Twitter => 0,
            Source::Reddit => 1,
            Source::News => 2,
        }
    }

    pub fn get(&self, source: Source) -> &SourceStats {
        &self.stats[Self::slot(source)]
    }

    pub fn set(&mut self, source: Source, stats: SourceStats) {
        self.stats[Self::slot(source)] = stats;
    }

    /// `(source, stats)` in stable key order.
    pub fn iter(&self) -> impl Iterator<Item = (Source, &SourceStats)> + '_ {
        Source::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    pub fn total_count(&self) -> u64 {
        self.stats.iter().map(|s| s.count).sum()
    }
}

impl Serialize for TrendSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Source::ALL.len()))?;
        for (source, stats) in self.iter() {
            map.serialize_entry(source.as_str(), stats)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TrendSummary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SummaryVisitor;

        impl<'de> Visitor<'de> for SummaryVisitor {
            type Value = TrendSummary;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object keyed by source name")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut found: HashMap<Source, SourceStats> = HashMap::new();
                while let Some(key) = access.next_key::<String>()? {
                    match Source::parse(&key) {
                        Some(src) => {
                            found.insert(src, access.next_value()?);
                        }
                        None => {
                            access.next_value::<de::IgnoredAny>()?;
                        }
                    }
                }
                let mut summary = TrendSummary::default();
                for src in Source::ALL {
                    let stats = found
                        .remove(&src)
                        .ok_or_else(|| de::Error::missing_field(src.as_str()))?;
                    summary.set(src, stats);
                }
                Ok(summary)
            }
        }

        deserializer.deserialize_map(SummaryVisitor)
    }
}

/// Minimal view of a scored record: just enough to aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub source: String,
    pub sentiment: Option<f64>,
}

impl Observation {
    pub fn new(source: impl Into<String>, sentiment: f64) -> Self {
        Self {
            source: source.into(),
            sentiment: Some(sentiment),
        }
    }

    fn from_value(v: &serde_json::Value) -> Self {
        Self {
            source: v
                .get("source")
                .and_then(|s| s.as_str())
                .unwrap_or_default()
                .to_string(),
            sentiment: v
                .get("sentiment")
                .and_then(|s| s.as_f64())
                .filter(|x| x.is_finite()),
        }
    }
}

/// Group by source and compute statistics.
pub fn compute_trends<'a, I>(items: I) -> TrendSummary
where
    I: IntoIterator<Item = &'a Observation>,
{
    let mut groups: [Vec<f64>; 3] = Default::default();
    let mut dropped = 0u64;

    for it in items {
        match (Source::parse(&it.source), it.sentiment) {
            (Some(src), Some(s)) => groups[TrendSummary::slot(src)].push(s),
            _ => dropped += 1,
        }
    }
    if dropped > 0 {
        tracing::debug!(target: "trends", dropped, "ignored items with unknown source or sentiment");
        counter!("trends_dropped_total").increment(dropped);
    }

    let mut summary = TrendSummary::default();
    for src in Source::ALL {
        summary.set(src, SourceStats::from_values(&groups[TrendSummary::slot(src)]));
    }
    summary
}

/// Read `sentiment_results.json`. The top level must be an array; elements
/// are read leniently.
pub fn load_observations(path: &Path) -> PipelineResult<Vec<Observation>> {
    let raw = store::read_text(path)?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| PipelineError::malformed(path, e))?;
    let arr = value
        .as_array()
        .ok_or_else(|| PipelineError::malformed(path, "expected a JSON array of scored items"))?;
    Ok(arr.iter().map(Observation::from_value).collect())
}

pub fn load_summary(path: &Path) -> PipelineResult<TrendSummary> {
    store::read_json(path)
}

/// Aggregation stage: `sentiment_results.json` → `trend_summary.json`.
pub fn run(store: &ArtifactStore) -> PipelineResult<TrendSummary> {
    let obs = load_observations(&store.scored_file())?;
    let summary = compute_trends(&obs);
    store::write_json(&store.trend_summary_file(), &summary)?;
    tracing::info!(target: "trends", items = summary.total_count(), "trend summary saved");
    Ok(summary)
}
