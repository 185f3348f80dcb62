//! Scoring stage: collected batches → `sentiment_results.json`.
//!
//! Every collected file of every source is read on each run and the result
//! set is rebuilt from scratch. Whether an item collected twice is counted
//! twice is decided by [`DedupPolicy`].

use metrics::{counter, histogram};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::ingest::types::{NewsArticle, RawRecord, RedditPost, Tweet};
use crate::sentiment::SentimentAnalyzer;
use crate::source::Source;
use crate::store::{self, ArtifactStore};

/// One scored record as stored in `sentiment_results.json`.
///
/// `source` stays a plain string: the file may be produced by other tools,
/// and unknown sources are dropped by the aggregator rather than rejected here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub text: String,
    pub sentiment: f64,
}

impl ScoredItem {
    /// Identifier used for de-duplication (`id`, or `title` for news).
    pub fn identifier(&self) -> Option<&str> {
        self.id.as_deref().or(self.title.as_deref())
    }
}

/// What to do with records that were collected more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupPolicy {
    /// Count every occurrence (re-collected items weigh more).
    #[default]
    KeepAll,
    /// First occurrence per `(source, identifier)` wins. Records without an
    /// identifier are always kept.
    ByIdentifier,
}

/// Score a single record using its per-source text composition.
pub fn score_record<R: RawRecord>(analyzer: &SentimentAnalyzer, rec: &R) -> ScoredItem {
    let text = rec.scoring_text();
    let sentiment = analyzer.polarity(&text);
    let ident = rec.identifier().map(str::to_string);
    let (id, title) = match rec.source() {
        Source::News => (None, ident),
        _ => (ident, None),
    };
    ScoredItem {
        source: rec.source().as_str().to_string(),
        id,
        title,
        text,
        sentiment,
    }
}

pub fn score_records<R: RawRecord>(analyzer: &SentimentAnalyzer, recs: &[R]) -> Vec<ScoredItem> {
    recs.iter().map(|r| score_record(analyzer, r)).collect()
}

/// Apply `policy`, preserving input order.
pub fn dedup(items: Vec<ScoredItem>, policy: DedupPolicy) -> Vec<ScoredItem> {
    match policy {
        DedupPolicy::KeepAll => items,
        DedupPolicy::ByIdentifier => {
            let mut seen: HashSet<(String, String)> = HashSet::new();
            items
                .into_iter()
                .filter(|it| match it.identifier() {
                    Some(id) => seen.insert((it.source.clone(), id.to_string())),
                    None => true,
                })
                .collect()
        }
    }
}

fn read_batch<R: DeserializeOwned>(path: &Path) -> PipelineResult<Vec<R>> {
    let raw = store::read_text(path)?;
    serde_json::from_str::<Vec<R>>(&raw).map_err(|e| PipelineError::malformed(path, e))
}

fn score_source_files<R: RawRecord + DeserializeOwned>(
    store: &ArtifactStore,
    analyzer: &SentimentAnalyzer,
    source: Source,
) -> PipelineResult<Vec<ScoredItem>> {
    let mut out = Vec::new();
    for path in store.collected_files(source)? {
        let batch: Vec<R> = read_batch(&path)?;
        tracing::debug!(target: "score", %source, file = %path.display(), items = batch.len(), "scoring batch");
        out.extend(score_records(analyzer, &batch));
    }
    Ok(out)
}

/// Score every collected batch (twitter, then reddit, then news).
pub fn score_collected(
    store: &ArtifactStore,
    analyzer: &SentimentAnalyzer,
    policy: DedupPolicy,
) -> PipelineResult<Vec<ScoredItem>> {
    let mut all = Vec::new();
    all.extend(score_source_files::<Tweet>(store, analyzer, Source::Twitter)?);
    all.extend(score_source_files::<RedditPost>(store, analyzer, Source::Reddit)?);
    all.extend(score_source_files::<NewsArticle>(store, analyzer, Source::News)?);

    let before = all.len();
    let all = dedup(all, policy);
    if all.len() != before {
        tracing::info!(target: "score", removed = before - all.len(), "dropped duplicate items");
    }
    Ok(all)
}

/// Scoring stage: rebuild and write `sentiment_results.json`.
pub fn run(
    store: &ArtifactStore,
    analyzer: &SentimentAnalyzer,
    policy: DedupPolicy,
) -> PipelineResult<Vec<ScoredItem>> {
    let t0 = std::time::Instant::now();
    let items = score_collected(store, analyzer, policy)?;
    store::write_json(&store.scored_file(), &items)?;

    histogram!("score_duration_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
    counter!("score_items_total").increment(items.len() as u64);
    tracing::info!(target: "score", items = items.len(), "processed items for sentiment analysis");
    Ok(items)
}
