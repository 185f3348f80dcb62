//! Stage orchestration. Each stage completes (and its artifact is renamed
//! into place) before the next one starts.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;

use crate::analyze::{report, scoring, trends, DedupPolicy};
use crate::config::Config;
use crate::ingest::providers::{news_rss::NewsRssCollector, reddit::RedditCollector, twitter::TwitterCollector};
use crate::ingest::run_collector;
use crate::notify::{compose_email, daily, email::EmailSender};
use crate::sentiment::SentimentAnalyzer;
use crate::store::ArtifactStore;

/// Files written by one collection pass (absent sources wrote nothing).
#[derive(Debug, Default)]
pub struct CollectOutcome {
    pub written: Vec<PathBuf>,
}

/// Run all three collectors. Individual collector failures are non-fatal.
pub async fn collect_all(cfg: &Config, store: &ArtifactStore, date: NaiveDate) -> CollectOutcome {
    let mut out = CollectOutcome::default();

    let twitter = TwitterCollector::from_config(&cfg.twitter);
    out.written.extend(run_collector(&twitter, store, date).await);

    match RedditCollector::from_config(&cfg.reddit) {
        Ok(reddit) => out.written.extend(run_collector(&reddit, store, date).await),
        Err(e) => tracing::warn!(target: "collect", error = ?e, "reddit collector unavailable"),
    }

    let news = NewsRssCollector::from_config(&cfg.news);
    out.written.extend(run_collector(&news, store, date).await);

    tracing::info!(target: "collect", files = out.written.len(), "collection finished");
    out
}

/// Compose the daily e-mail and send it to every configured recipient.
pub async fn notify(cfg: &Config, store: &ArtifactStore, date: NaiveDate, premium: bool) -> Result<usize> {
    let report = daily::load(store, date).with_context(|| format!("no daily report found for {date}"))?;
    let content = compose_email(&report, date, premium);

    if cfg.email.recipients.is_empty() {
        tracing::warn!(target: "notify", "no EMAIL_RECIPIENTS configured; nothing sent");
        return Ok(0);
    }
    let sender = EmailSender::from_config(&cfg.email)?;
    Ok(sender.send_all(&cfg.email.recipients, &content).await)
}

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub dedup: DedupPolicy,
    pub notify: bool,
    pub premium: bool,
}

/// Full run: collect → score → trends → report → daily (→ notify).
pub async fn run_all(cfg: &Config, store: &ArtifactStore, date: NaiveDate, opts: RunOptions) -> Result<()> {
    collect_all(cfg, store, date).await;
    let analyzer = SentimentAnalyzer::new();
    scoring::run(store, &analyzer, opts.dedup)?;
    trends::run(store)?;
    report::run(store)?;
    daily::run(store, date)?;
    if opts.notify {
        let sent = notify(cfg, store, date, opts.premium).await?;
        tracing::info!(target: "notify", sent, "notifications sent");
    }
    Ok(())
}
