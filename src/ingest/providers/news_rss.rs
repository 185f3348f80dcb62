use anyhow::{Context, Result};
use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::config::NewsConfig;
use crate::ingest::types::{Collector, NewsArticle};
use crate::ingest::{extract_article_text, mentions_bitcoin, normalize_text};
use crate::source::Source;

/// Cap for fetched article bodies.
const FULL_TEXT_CAP: usize = 20_000;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}
#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(default)]
    title: Option<String>,
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

enum Feed {
    Fixture(String),
    Url(String),
}

/// Bitcoin-related articles from a set of RSS feeds.
pub struct NewsRssCollector {
    feeds: Vec<Feed>,
    per_feed_limit: usize,
    fetch_full_text: bool,
    client: reqwest::Client,
}

impl NewsRssCollector {
    pub fn from_config(cfg: &NewsConfig) -> Self {
        Self {
            feeds: cfg.feeds.iter().cloned().map(Feed::Url).collect(),
            per_feed_limit: cfg.per_feed_limit,
            fetch_full_text: cfg.fetch_full_text,
            client: reqwest::Client::new(),
        }
    }

    /// Parse pre-fetched feed documents; never touches the network.
    pub fn from_fixtures<I, S>(docs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            feeds: docs
                .into_iter()
                .map(|s| Feed::Fixture(s.as_ref().to_string()))
                .collect(),
            per_feed_limit: NewsConfig::default().per_feed_limit,
            fetch_full_text: false,
            client: reqwest::Client::new(),
        }
    }

    /// Parse one feed into articles (first `limit` entries, Bitcoin-only).
    pub fn parse_feed(xml: &str, limit: usize) -> Result<Vec<NewsArticle>> {
        let xml_clean = scrub_html_entities_for_xml(xml);
        let rss: Rss = from_str(&xml_clean).context("parsing rss xml")?;
        let feed_title = rss.channel.title.unwrap_or_default();

        let mut out = Vec::new();
        for it in rss.channel.item.into_iter().take(limit) {
            let title = normalize_text(it.title.as_deref().unwrap_or_default());
            let summary = normalize_text(it.description.as_deref().unwrap_or_default());
            if !mentions_bitcoin(&title, &summary) {
                continue;
            }
            out.push(NewsArticle {
                title,
                summary,
                link: it.link.unwrap_or_default().trim().to_string(),
                published: it.pub_date.unwrap_or_default().trim().to_string(),
                source: feed_title.trim().to_string(),
                full_text: String::new(),
            });
        }
        Ok(out)
    }

    /// Best-effort article body; any failure yields an empty string.
    async fn fetch_full_text(&self, link: &str) -> String {
        if link.is_empty() {
            return String::new();
        }
        let res = async {
            let body = self
                .client
                .get(link)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?;
            Ok::<_, reqwest::Error>(body)
        }
        .await;
        match res {
            Ok(html) => extract_article_text(&html, FULL_TEXT_CAP),
            Err(e) => {
                tracing::debug!(target: "collect", error = %e, link, "article fetch failed");
                String::new()
            }
        }
    }

    async fn load_feed(&self, feed: &Feed) -> Result<String> {
        match feed {
            Feed::Fixture(s) => Ok(s.clone()),
            Feed::Url(url) => self
                .client
                .get(url.as_str())
                .send()
                .await
                .with_context(|| format!("rss get {url}"))?
                .error_for_status()
                .with_context(|| format!("rss status {url}"))?
                .text()
                .await
                .with_context(|| format!("rss body {url}")),
        }
    }
}

#[async_trait]
impl Collector for NewsRssCollector {
    type Record = NewsArticle;

    async fn collect(&self) -> Result<Vec<NewsArticle>> {
        let mut all = Vec::new();
        for feed in &self.feeds {
            // One broken feed must not hide the others.
            let xml = match self.load_feed(feed).await {
                Ok(x) => x,
                Err(e) => {
                    tracing::warn!(target: "collect", error = ?e, "news feed unavailable");
                    continue;
                }
            };
            let mut articles = match Self::parse_feed(&xml, self.per_feed_limit) {
                Ok(a) => a,
                Err(e) => {
                    tracing::warn!(target: "collect", error = ?e, "news feed unparseable");
                    continue;
                }
            };
            if self.fetch_full_text {
                for a in articles.iter_mut() {
                    a.full_text = self.fetch_full_text(&a.link).await;
                }
            }
            all.append(&mut articles);
        }
        Ok(all)
    }

    fn source(&self) -> Source {
        Source::News
    }
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Crypto Wire</title>
  <item><title>Bitcoin climbs past resistance</title><link>https://x.test/1</link>
    <pubDate>Mon, 06 Jan 2025 10:00:00 GMT</pubDate>
    <description>&lt;p&gt;Analysts are bullish&lt;/p&gt;</description></item>
  <item><title>Solana update</title><link>https://x.test/2</link>
    <description>Nothing about the big one</description></item>
  <item><title>Macro week</title><link>https://x.test/3</link>
    <description>BTC&nbsp;and gold diverge</description></item>
</channel></rss>"#;

    #[test]
    fn keeps_only_bitcoin_items() {
        let out = NewsRssCollector::parse_feed(FEED, 10).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].title, "Bitcoin climbs past resistance");
        assert_eq!(out[0].summary, "Analysts are bullish");
        assert_eq!(out[0].source, "Crypto Wire");
        assert_eq!(out[1].summary, "BTC and gold diverge");
        assert!(out.iter().all(|a| a.full_text.is_empty()));
    }

    #[test]
    fn limit_applies_before_filter() {
        let out = NewsRssCollector::parse_feed(FEED, 2).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[tokio::test]
    async fn broken_feed_does_not_hide_good_one() {
        let c = NewsRssCollector::from_fixtures(["<rss><oops", FEED]);
        let out = c.collect().await.unwrap();
        assert_eq!(out.len(), 2);
    }
}
