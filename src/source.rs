//! # Sources
//! The fixed set of origin categories the pipeline knows about.
//!
//! Order of [`Source::ALL`] is the stable key order used by the trend
//! summary and the rendered report.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Twitter,
    Reddit,
    News,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Twitter, Source::Reddit, Source::News];

    /// Lower-case wire name, also the prefix of collected file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Twitter => "twitter",
            Source::Reddit => "reddit",
            Source::News => "news",
        }
    }

    /// Case-insensitive lookup. Unknown names are `None`, never an error.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|src| src.as_str().eq_ignore_ascii_case(s))
    }

    /// Human-readable heading: first letter upper-cased.
    pub fn heading(self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
