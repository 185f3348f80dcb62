// src/config/mod.rs
//! Process-wide configuration, loaded once in `main` and passed explicitly
//! into collectors and the notifier. Scoring, aggregation and rendering never
//! read it.
//!
//! Lookup order for the file:
//! 1) explicit `--config` path
//! 2) `$SENTIMENT_SAGE_CONFIG`
//! 3) `config/sentiment_sage.toml`
//! 4) built-in defaults
//!
//! Secrets and deployment knobs are then overlaid from the environment
//! (`.env` is loaded by `main` via dotenvy).

pub mod email;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub use email::EmailConfig;

pub const ENV_CONFIG_PATH: &str = "SENTIMENT_SAGE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/sentiment_sage.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub twitter: TwitterConfig,
    pub reddit: RedditConfig,
    pub news: NewsConfig,
    pub email: EmailConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(crate::store::DEFAULT_DATA_DIR),
            twitter: TwitterConfig::default(),
            reddit: RedditConfig::default(),
            news: NewsConfig::default(),
            email: EmailConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TwitterConfig {
    /// Usually left out of the file and taken from `TWITTER_BEARER_TOKEN`.
    pub bearer_token: Option<String>,
    pub query: String,
    pub max_results: u32,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            bearer_token: None,
            query: "bitcoin lang:en -is:retweet -is:reply -has:links".to_string(),
            max_results: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedditConfig {
    pub subreddits: Vec<String>,
    pub limit: u32,
    pub user_agent: String,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            subreddits: vec![
                "Bitcoin".to_string(),
                "CryptoCurrency".to_string(),
                "BitcoinMarkets".to_string(),
            ],
            limit: 25,
            user_agent: "SentimentSage/0.1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub feeds: Vec<String>,
    pub per_feed_limit: usize,
    pub fetch_full_text: bool,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            feeds: vec![
                "https://cointelegraph.com/rss".to_string(),
                "https://www.coindesk.com/arc/outboundfeeds/rss/".to_string(),
                "https://cryptonews.com/news/feed/".to_string(),
            ],
            per_feed_limit: 10,
            fetch_full_text: true,
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing config toml")
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Resolve the config file (see module docs) and overlay the process env.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut cfg = Self::load_file_layer(explicit)?;
        cfg.apply_env_from(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    fn load_file_layer(explicit: Option<&Path>) -> Result<Self> {
        if let Some(p) = explicit {
            return Self::load_from_file(p);
        }
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from_file(&pb);
            } else {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from_file(&default_p);
        }
        Ok(Self::default())
    }

    /// Overlay values from an env-like lookup. Blank values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get("DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = get("TWITTER_BEARER_TOKEN") {
            self.twitter.bearer_token = Some(v);
        }
        if let Some(v) = get("REDDIT_USER_AGENT") {
            self.reddit.user_agent = v;
        }
        self.email.apply_env_from(&get);
    }
}
