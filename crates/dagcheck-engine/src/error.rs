//! Engine error types

/// Errors an insight may return from `evaluate`
///
/// The runner turns any of these into a failure record for the insight;
/// other insights keep running.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InsightError {
    #[error("Invalid options for {alias}: {message}")]
    InvalidOptions { alias: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors that abort a run before any insight is evaluated
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    #[error("[runner] only lists unknown insights: {}", .0.join(", "))]
    UnknownInsights(Vec<String>),
}
