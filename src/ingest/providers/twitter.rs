use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::config::TwitterConfig;
use crate::ingest::types::{Collector, Tweet};
use crate::source::Source;

const SEARCH_RECENT_URL: &str = "https://api.twitter.com/2/tweets/search/recent";
const TWEET_FIELDS: &str = "created_at,public_metrics,author_id";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    /// Absent when the search matched nothing.
    #[serde(default)]
    data: Vec<Tweet>,
}

enum Mode {
    Fixture(String),
    Http {
        bearer_token: Option<String>,
        query: String,
        max_results: u32,
        client: reqwest::Client,
    },
}

/// Recent tweets via the v2 recent-search endpoint.
pub struct TwitterCollector {
    mode: Mode,
}

impl TwitterCollector {
    pub fn from_config(cfg: &TwitterConfig) -> Self {
        Self {
            mode: Mode::Http {
                bearer_token: cfg.bearer_token.clone(),
                query: cfg.query.clone(),
                // API accepts 10..=100
                max_results: cfg.max_results.clamp(10, 100),
                client: reqwest::Client::new(),
            },
        }
    }

    pub fn from_fixture(json: &str) -> Self {
        Self {
            mode: Mode::Fixture(json.to_string()),
        }
    }

    pub fn parse_response(json: &str) -> Result<Vec<Tweet>> {
        let resp: SearchResponse =
            serde_json::from_str(json).context("parsing twitter search response")?;
        Ok(resp.data)
    }
}

#[async_trait]
impl Collector for TwitterCollector {
    type Record = Tweet;

    async fn collect(&self) -> Result<Vec<Tweet>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_response(s),
            Mode::Http {
                bearer_token,
                query,
                max_results,
                client,
            } => {
                let token = bearer_token
                    .as_deref()
                    .ok_or_else(|| anyhow!("TWITTER_BEARER_TOKEN not configured"))?;
                let max_results = max_results.to_string();
                let body = client
                    .get(SEARCH_RECENT_URL)
                    .bearer_auth(token)
                    .query(&[
                        ("query", query.as_str()),
                        ("max_results", max_results.as_str()),
                        ("tweet.fields", TWEET_FIELDS),
                    ])
                    .send()
                    .await
                    .context("twitter get")?
                    .error_for_status()
                    .context("twitter non-2xx")?
                    .text()
                    .await
                    .context("twitter body")?;
                Self::parse_response(&body)
            }
        }
    }

    fn source(&self) -> Source {
        Source::Twitter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TwitterConfig;

    #[test]
    fn empty_search_has_no_data_field() {
        let out = TwitterCollector::parse_response(r#"{"meta":{"result_count":0}}"#).unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn fixture_parses_tweets() {
        let json = r#"{"data":[
            {"id":"1","text":"Bitcoin looks strong today","author_id":"9",
             "created_at":"2025-01-06T10:00:00.000Z",
             "public_metrics":{"retweet_count":1,"reply_count":0,"like_count":5,"quote_count":0}},
            {"id":"2","text":"meh"}],"meta":{"result_count":2}}"#;
        let tweets = TwitterCollector::from_fixture(json).collect().await.unwrap();
        assert_eq!(tweets.len(), 2);
        assert_eq!(tweets[0].author_id.as_deref(), Some("9"));
        assert!(tweets[1].public_metrics.is_none());
    }

    #[tokio::test]
    async fn missing_token_is_a_collector_error() {
        let cfg = TwitterConfig {
            bearer_token: None,
            ..TwitterConfig::default()
        };
        let err = TwitterCollector::from_config(&cfg).collect().await.unwrap_err();
        assert!(err.to_string().contains("TWITTER_BEARER_TOKEN"));
    }
}
