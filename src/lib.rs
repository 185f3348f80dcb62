// src/lib.rs
// Public library surface for the CLI and integration tests.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod sentiment;
pub mod source;
pub mod store;
pub mod telemetry;

// Collectors (external collaborators) and their record types
pub mod ingest;

// Core batch stages: scoring, trends, report
pub mod analyze;

// Daily report + e-mail delivery
pub mod notify;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{compute_trends, render_report, DedupPolicy, ScoredItem, SourceStats, TrendSummary};
pub use crate::error::{PipelineError, PipelineResult};
pub use crate::notify::{compose_email, DailyReport, EmailContent, Scalar, SentimentCategory};
pub use crate::sentiment::SentimentAnalyzer;
pub use crate::source::Source;
pub use crate::store::ArtifactStore;
