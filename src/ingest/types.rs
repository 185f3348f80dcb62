// src/ingest/types.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::source::Source;

/// Common view over one collected record, whatever platform it came from.
pub trait RawRecord {
    fn source(&self) -> Source;
    /// Stable identifier if the platform has one (tweet/post id, article title).
    fn identifier(&self) -> Option<&str>;
    /// Text fed to the scorer: designated fields joined with a space, in order.
    fn scoring_text(&self) -> String;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PublicMetrics {
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub quote_count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Tweet {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_metrics: Option<PublicMetrics>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RedditPost {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: u64,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewsArticle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub published: String,
    /// Feed title, e.g. "Cointelegraph.com News".
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub full_text: String,
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

impl RawRecord for Tweet {
    fn source(&self) -> Source {
        Source::Twitter
    }
    fn identifier(&self) -> Option<&str> {
        non_empty(&self.id)
    }
    fn scoring_text(&self) -> String {
        self.text.clone()
    }
}

impl RawRecord for RedditPost {
    fn source(&self) -> Source {
        Source::Reddit
    }
    fn identifier(&self) -> Option<&str> {
        non_empty(&self.id)
    }
    fn scoring_text(&self) -> String {
        [self.title.as_str(), self.selftext.as_str()].join(" ")
    }
}

impl RawRecord for NewsArticle {
    fn source(&self) -> Source {
        Source::News
    }
    fn identifier(&self) -> Option<&str> {
        non_empty(&self.title)
    }
    fn scoring_text(&self) -> String {
        [
            self.title.as_str(),
            self.summary.as_str(),
            self.full_text.as_str(),
        ]
        .join(" ")
    }
}

/// One collector per platform. Implementations return whatever they found;
/// an empty vector is a valid outcome.
#[async_trait::async_trait]
pub trait Collector {
    type Record: RawRecord + Serialize + Send;

    async fn collect(&self) -> Result<Vec<Self::Record>>;
    fn source(&self) -> Source;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_empty() {
        let post: RedditPost = serde_json::from_str(r#"{"id":"abc","title":"Hi"}"#).unwrap();
        assert_eq!(post.selftext, "");
        assert_eq!(post.scoring_text(), "Hi ");

        let art: NewsArticle = serde_json::from_str(r#"{"summary":"S"}"#).unwrap();
        assert_eq!(art.scoring_text(), " S ");
        assert_eq!(art.identifier(), None);
    }

    #[test]
    fn news_fields_in_title_summary_body_order() {
        let art = NewsArticle {
            title: "T".into(),
            summary: "S".into(),
            full_text: "F".into(),
            ..Default::default()
        };
        assert_eq!(art.scoring_text(), "T S F");
        assert_eq!(art.identifier(), Some("T"));
    }

    #[test]
    fn tweet_tolerates_extra_fields() {
        let t: Tweet = serde_json::from_str(
            r#"{"id":"1","text":"gm","edit_history_tweet_ids":["1"],"public_metrics":{"like_count":3}}"#,
        )
        .unwrap();
        assert_eq!(t.identifier(), Some("1"));
        assert_eq!(t.public_metrics.unwrap().like_count, 3);
    }
}
