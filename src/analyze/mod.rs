// src/analyze/mod.rs
//! Core batch stages: scoring → trend aggregation → report rendering.
//! Each stage reads the previous stage's artifact and writes its own.

pub mod report;
pub mod scoring;
pub mod trends;

// Re-export convenient types.
pub use crate::analyze::report::render_report;
pub use crate::analyze::scoring::{DedupPolicy, ScoredItem};
pub use crate::analyze::trends::{compute_trends, Observation, SourceStats, TrendSummary};
