//! dagcheck Core
//!
//! Core domain model with stable, versioned types.
//! Never rename insight aliases - they are part of the public API and
//! appear as keys in user configuration.

pub mod finding;
pub mod pattern;
pub mod report;
pub mod config;

pub use finding::{Finding, InsightKind, Severity};
pub use pattern::GlobPattern;
pub use report::{content_digest, InsightFailure, Report, ReportSummary, ReportVersion, SkipReason, SkippedInsight};
pub use config::{Config, ConfigError, RunnerConfig, SelectionConfig, SeverityThreshold};
