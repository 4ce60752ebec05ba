//! Report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use crate::finding::{Finding, Severity};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Summary statistics for a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total number of findings
    pub total: usize,

    /// Number of errors
    pub errors: usize,

    /// Number of warnings
    pub warnings: usize,

    /// Number of info findings
    pub info: usize,

    /// Insights that were evaluated
    pub insights_run: usize,

    /// Insights skipped (precondition, config, disabled)
    pub insights_skipped: usize,

    /// Insights that failed internally
    pub insights_failed: usize,

    /// Nodes in the analyzed graph
    pub nodes_analyzed: usize,
}

/// Why an insight did not run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Required input document is not available
    PreconditionUnmet(String),

    /// Configuration fragment failed validation
    InvalidConfig(Vec<String>),

    /// Turned off by configuration
    Disabled(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PreconditionUnmet(reason) => write!(f, "precondition unmet: {}", reason),
            Self::InvalidConfig(errors) => write!(f, "invalid configuration: {}", errors.join("; ")),
            Self::Disabled(reason) => write!(f, "disabled: {}", reason),
        }
    }
}

/// An insight that was not evaluated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedInsight {
    /// Insight alias
    pub alias: String,

    /// Why it was skipped
    pub reason: SkipReason,
}

/// An insight whose evaluation failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightFailure {
    /// Insight alias
    pub alias: String,

    /// Failure description
    pub message: String,
}

/// Insight run report (report.json v1)
///
/// This is the stable output format.
/// All fields are versioned and backward-compatible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601), only set when the caller stamps the report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,

    /// Summary statistics
    pub summary: ReportSummary,

    /// All findings, in insight registration order then node order
    pub findings: Vec<Finding>,

    /// Insights that were not evaluated
    #[serde(default)]
    pub skipped: Vec<SkippedInsight>,

    /// Insights that failed during evaluation
    #[serde(default)]
    pub failures: Vec<InsightFailure>,

    /// Metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Report {
    /// Create a new empty report
    pub fn new() -> Self {
        Self {
            version: ReportVersion::CURRENT,
            generated_at: None,
            summary: ReportSummary::default(),
            findings: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
            metadata: None,
        }
    }

    /// Stamp the report with the current UTC time
    pub fn with_timestamp(mut self) -> Self {
        self.generated_at = Some(chrono::Utc::now().to_rfc3339());
        self
    }

    /// Attach metadata
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Add a finding to the report
    pub fn add_finding(&mut self, finding: Finding) {
        match finding.severity {
            Severity::Error => self.summary.errors += 1,
            Severity::Warn => self.summary.warnings += 1,
            Severity::Info => self.summary.info += 1,
        }

        self.summary.total += 1;
        self.findings.push(finding);
    }

    /// Record an insight that was evaluated
    pub fn record_run(&mut self) {
        self.summary.insights_run += 1;
    }

    /// Record a skipped insight
    pub fn record_skip(&mut self, alias: impl Into<String>, reason: SkipReason) {
        self.summary.insights_skipped += 1;
        self.skipped.push(SkippedInsight {
            alias: alias.into(),
            reason,
        });
    }

    /// Record a failed insight
    pub fn record_failure(&mut self, alias: impl Into<String>, message: impl Into<String>) {
        self.summary.insights_failed += 1;
        self.failures.push(InsightFailure {
            alias: alias.into(),
            message: message.into(),
        });
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    /// Whether every registered insight ran to completion
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.failures.is_empty()
    }

    /// Findings for one insight alias
    pub fn findings_for<'a>(&'a self, alias: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.findings.iter().filter(move |f| f.alias == alias)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

/// SHA-256 of a document, hex encoded
pub fn content_digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
