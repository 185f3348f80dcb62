use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::config::RedditConfig;
use crate::ingest::types::{Collector, RedditPost};
use crate::source::Source;

const LISTING_BASE: &str = "https://www.reddit.com";

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}
#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}
#[derive(Debug, Deserialize)]
struct Child {
    data: RedditPost,
}

enum Mode {
    /// (subreddit, listing JSON) pairs.
    Fixture(Vec<(String, String)>),
    Http {
        subreddits: Vec<String>,
        client: reqwest::Client,
    },
}

/// Hot posts from the configured subreddits via the public JSON listing.
pub struct RedditCollector {
    mode: Mode,
    limit: u32,
}

impl RedditCollector {
    pub fn from_config(cfg: &RedditConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .build()
            .context("building reddit http client")?;
        Ok(Self {
            mode: Mode::Http {
                subreddits: cfg.subreddits.clone(),
                client,
            },
            limit: cfg.limit,
        })
    }

    pub fn from_fixtures(listings: Vec<(String, String)>) -> Self {
        Self {
            mode: Mode::Fixture(listings),
            limit: RedditConfig::default().limit,
        }
    }

    /// Parse a listing document, tagging every post with `subreddit`.
    pub fn parse_listing(json: &str, subreddit: &str) -> Result<Vec<RedditPost>> {
        let listing: Listing = serde_json::from_str(json).context("parsing reddit listing")?;
        Ok(listing
            .data
            .children
            .into_iter()
            .map(|c| RedditPost {
                subreddit: subreddit.to_string(),
                ..c.data
            })
            .collect())
    }

    async fn fetch_listing(client: &reqwest::Client, subreddit: &str, limit: u32) -> Result<String> {
        let url = format!("{LISTING_BASE}/r/{subreddit}/hot.json");
        client
            .get(&url)
            .query(&[("limit", limit)])
            .send()
            .await
            .with_context(|| format!("reddit get {url}"))?
            .error_for_status()
            .with_context(|| format!("reddit status {url}"))?
            .text()
            .await
            .context("reddit body")
    }
}

#[async_trait]
impl Collector for RedditCollector {
    type Record = RedditPost;

    async fn collect(&self) -> Result<Vec<RedditPost>> {
        let mut all = Vec::new();
        match &self.mode {
            Mode::Fixture(listings) => {
                for (sub, json) in listings {
                    all.extend(Self::parse_listing(json, sub)?);
                }
            }
            Mode::Http { subreddits, client } => {
                for sub in subreddits {
                    let body = Self::fetch_listing(client, sub, self.limit).await?;
                    all.extend(Self::parse_listing(&body, sub)?);
                }
            }
        }
        Ok(all)
    }

    fn source(&self) -> Source {
        Source::Reddit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"{"kind":"Listing","data":{"after":null,"children":[
        {"kind":"t3","data":{"id":"a1","title":"HODL strong","selftext":"","score":120,
         "num_comments":14,"created_utc":1736150000.0,"subreddit":"bitcoin","url":"https://r/a1"}},
        {"kind":"t3","data":{"id":"a2","title":"Lost my keys","score":3}}
    ]}}"#;

    #[test]
    fn listing_is_flattened_and_tagged() {
        let posts = RedditCollector::parse_listing(LISTING, "Bitcoin").unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, "a1");
        assert_eq!(posts[0].num_comments, 14);
        assert!(posts.iter().all(|p| p.subreddit == "Bitcoin"));
        assert_eq!(posts[1].selftext, "");
    }

    #[tokio::test]
    async fn fixture_mode_collects_all_subreddits() {
        let c = RedditCollector::from_fixtures(vec![
            ("Bitcoin".into(), LISTING.into()),
            ("BitcoinMarkets".into(), LISTING.into()),
        ]);
        let posts = c.collect().await.unwrap();
        assert_eq!(posts.len(), 4);
        assert_eq!(posts[3].subreddit, "BitcoinMarkets");
    }
}
