// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::ingest::types::Collector;
use crate::store::{self, ArtifactStore};
use chrono::NaiveDate;
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;
use std::path::PathBuf;

/// Default cap for short texts (titles, summaries).
pub const SHORT_TEXT_CAP: usize = 1500;

/// One-time metrics registration (so series show up in the exposition).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("collect_items_total", "Records written by collectors.");
        describe_counter!(
            "collect_errors_total",
            "Collector fetch/parse errors (non-fatal)."
        );
        describe_counter!(
            "collect_empty_total",
            "Collector runs that found nothing to write."
        );
        describe_histogram!("collect_fetch_ms", "Collector fetch time in milliseconds.");
    });
}

/// Normalize text: decode entities, strip tags, collapse whitespace, trim,
/// strip trailing sentence punctuation, cap at 1500 chars.
pub fn normalize_text(s: &str) -> String {
    normalize_text_capped(s, SHORT_TEXT_CAP)
}

pub fn normalize_text_capped(s: &str, cap: usize) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out = out.trim().to_string();

    // 5) Strip trailing sentence punctuation (keep quotes)
    while let Some(last) = out.chars().last() {
        if matches!(last, '!' | '?' | '.' | ',') {
            out.pop();
        } else {
            break;
        }
    }

    // 6) Length cap
    if out.chars().count() > cap {
        out = out.chars().take(cap).collect();
    }

    out
}

/// Plain text of an article page: drops script/style blocks, then normalizes.
pub fn extract_article_text(html: &str, cap: usize) -> String {
    static RE_BLOCKS: OnceCell<regex::Regex> = OnceCell::new();
    let re = RE_BLOCKS.get_or_init(|| {
        regex::Regex::new(r"(?is)<(script|style|noscript|head)\b[^>]*>.*?</(script|style|noscript|head)>")
            .unwrap()
    });
    let without_blocks = re.replace_all(html, " ");
    normalize_text_capped(&without_blocks, cap)
}

/// Topic filter used by the news collector.
pub fn mentions_bitcoin(title: &str, summary: &str) -> bool {
    let t = title.to_lowercase();
    let s = summary.to_lowercase();
    ["bitcoin", "btc"]
        .iter()
        .any(|kw| t.contains(kw) || s.contains(kw))
}

/// Run one collector and persist its batch as `<source>_<date>.json`.
///
/// Collector failures are logged and reported as `None`; so is an empty
/// batch. Neither is fatal for the run.
pub async fn run_collector<C: Collector + Sync>(
    collector: &C,
    store: &ArtifactStore,
    date: NaiveDate,
) -> Option<PathBuf> {
    ensure_metrics_described();
    let source = collector.source();
    let t0 = std::time::Instant::now();

    let records = match collector.collect().await {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(target: "collect", error = ?e, %source, "collector error");
            counter!("collect_errors_total", "source" => source.as_str()).increment(1);
            return None;
        }
    };
    metrics::histogram!("collect_fetch_ms", "source" => source.as_str())
        .record(t0.elapsed().as_secs_f64() * 1_000.0);

    if records.is_empty() {
        tracing::info!(target: "collect", %source, "no items collected");
        counter!("collect_empty_total", "source" => source.as_str()).increment(1);
        return None;
    }

    let path = store.collected_file(source, date);
    if let Err(e) = store::write_json(&path, &records) {
        tracing::warn!(target: "collect", error = %e, %source, "could not write collected batch");
        counter!("collect_errors_total", "source" => source.as_str()).increment(1);
        return None;
    }

    counter!("collect_items_total", "source" => source.as_str()).increment(records.len() as u64);
    tracing::info!(
        target: "collect",
        %source,
        items = records.len(),
        path = %path.display(),
        "collected batch written"
    );
    Some(path)
}
