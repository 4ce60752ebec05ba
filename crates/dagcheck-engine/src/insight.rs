//! The insight contract
//!
//! An insight is a stateless rule over the project graph. It declares what
//! it is (`meta`), what it needs (`has_required_data`), which configuration
//! keys it accepts (`config_schema`), and produces findings (`evaluate`).
//! The runner never needs to know how many insights exist.

use dagcheck_core::{Finding, InsightKind, Severity};
use serde_json::{json, Value};
use crate::context::InsightContext;
use crate::error::InsightError;

/// Static description of an insight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightMeta {
    /// Human-readable name
    pub name: &'static str,

    /// Stable configuration key. Never rename.
    pub alias: &'static str,

    /// What the insight checks
    pub description: &'static str,

    /// Why a finding matters
    pub reason_to_flag: &'static str,

    /// Severity when nothing in configuration overrides it
    pub default_severity: Severity,

    pub kind: InsightKind,
}

/// Whether the inputs an insight needs are present
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataRequirement {
    Satisfied,

    /// Not runnable; carries the reason recorded in the report
    Missing(String),
}

impl DataRequirement {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied)
    }
}

/// A rule evaluated against the project graph
pub trait Insight: Send + Sync {
    /// Identity and defaults
    fn meta(&self) -> &'static InsightMeta;

    /// Precondition check. The default only needs a manifest.
    fn has_required_data(&self, has_manifest: bool, _has_catalog: bool) -> DataRequirement {
        if has_manifest {
            DataRequirement::Satisfied
        } else {
            DataRequirement::Missing("a manifest is required".to_string())
        }
    }

    /// JSON Schema for the insight's own configuration keys
    ///
    /// Keys shared by every insight (`enabled`, `severity`, `node_severity`)
    /// are merged in by the runner and must not be declared here.
    fn config_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    /// Produce findings. Must not perform I/O.
    fn evaluate(&self, ctx: &InsightContext<'_>) -> Result<Vec<Finding>, InsightError>;
}
