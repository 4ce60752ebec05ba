//! dagcheck engine - insight evaluation
//!
//! This crate implements:
//! - The `Insight` trait and its evaluation context
//! - Severity resolution
//! - Configuration fragment validation
//! - The runner that aggregates findings into a report
//! - The built-in insights

pub mod error;
pub mod insight;
pub mod severity;
pub mod validation;
pub mod context;
pub mod insights;
pub mod registry;
pub mod runner;

pub use error::{InsightError, RunError};
pub use insight::{DataRequirement, Insight, InsightMeta};
pub use severity::SeverityResolver;
pub use context::InsightContext;
pub use registry::default_registry;
pub use runner::{InsightRunner, Outcome};
