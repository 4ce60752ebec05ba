//! Findings produced by insights
//!
//! A finding is the result of one insight applied to one subject node
//! (or to the whole project). Findings are built once by an insight and
//! never modified afterwards.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Finding severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Warning - should be reviewed but not blocking
    #[serde(alias = "warning")]
    Warn,

    /// Error - blocking issue that should fail CI
    Error,
}

impl Severity {
    /// All accepted spellings, used when describing config schemas
    pub const NAMES: [&'static str; 4] = ["info", "warn", "warning", "error"];
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Broad family an insight belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Project convention checks (tests, docs, schemas)
    Check,

    /// Governance rules (ownership, access)
    Governance,

    /// Modelling practices (DAG shape)
    Modelling,

    /// Performance of materialized relations
    Performance,
}

impl std::fmt::Display for InsightKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Check => write!(f, "check"),
            Self::Governance => write!(f, "governance"),
            Self::Modelling => write!(f, "modelling"),
            Self::Performance => write!(f, "performance"),
        }
    }
}

/// One reported issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Human-readable insight name
    pub insight: String,

    /// Stable insight alias (configuration key)
    pub alias: String,

    /// Insight family
    pub kind: InsightKind,

    /// Subject node unique_id, `None` for project-wide findings
    pub unique_id: Option<String>,

    /// Package of the subject node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,

    /// Original file path of the subject node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// What is wrong
    pub message: String,

    /// How to fix it
    pub recommendation: String,

    /// Why the insight flags this
    pub reason_to_flag: String,

    /// Resolved severity
    pub severity: Severity,

    /// Insight-specific structured data
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl Finding {
    /// Create a project-wide finding with minimal fields
    pub fn new(
        insight: impl Into<String>,
        alias: impl Into<String>,
        kind: InsightKind,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            insight: insight.into(),
            alias: alias.into(),
            kind,
            unique_id: None,
            package_name: None,
            path: None,
            message: message.into(),
            recommendation: String::new(),
            reason_to_flag: String::new(),
            severity,
            metadata: Map::new(),
        }
    }

    /// Attach the subject node
    pub fn for_node(
        mut self,
        unique_id: impl Into<String>,
        package_name: Option<String>,
        path: Option<String>,
    ) -> Self {
        self.unique_id = Some(unique_id.into());
        self.package_name = package_name;
        self.path = path;
        self
    }

    /// Set the recommendation text
    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = recommendation.into();
        self
    }

    /// Set the justification text
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason_to_flag = reason.into();
        self
    }

    /// Add one metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
