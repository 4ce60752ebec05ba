//! Insight configuration fragment validation
//!
//! Each insight publishes a JSON Schema for its own keys. The keys every
//! insight accepts are merged in, unknown keys are rejected, and the
//! fragment from `[insights.<alias>]` is validated before the insight runs.

use dagcheck_core::{GlobPattern, Severity};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Keys accepted in every insight fragment
#[derive(Debug, Clone, PartialEq)]
pub struct CommonOptions {
    pub enabled: bool,
    pub severity: Option<Severity>,
    pub node_severity: Vec<(GlobPattern, Severity)>,
}

impl Default for CommonOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: None,
            node_severity: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
struct RawCommonOptions {
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default)]
    severity: Option<Severity>,
    #[serde(default)]
    node_severity: BTreeMap<String, Severity>,
}

fn default_true() -> bool {
    true
}

impl CommonOptions {
    /// Read the shared keys from an already validated fragment
    pub fn from_fragment(fragment: &Value) -> Result<Self, Vec<String>> {
        let raw: RawCommonOptions =
            serde_json::from_value(fragment.clone()).map_err(|e| vec![e.to_string()])?;

        let mut errors = Vec::new();
        let mut node_severity = Vec::new();
        for (pattern, severity) in raw.node_severity {
            match GlobPattern::new(&pattern) {
                Ok(glob) => node_severity.push((glob, severity)),
                Err(e) => errors.push(format!("node_severity key '{pattern}': {e}")),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            enabled: raw.enabled,
            severity: raw.severity,
            node_severity,
        })
    }
}

fn severity_schema() -> Value {
    json!({"type": "string", "enum": Severity::NAMES})
}

/// The full fragment schema: the insight's own keys plus the shared ones
pub fn fragment_schema(insight_schema: &Value) -> Value {
    let mut schema = match insight_schema {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };

    schema.insert("type".into(), json!("object"));

    let properties = schema
        .entry("properties")
        .or_insert_with(|| json!({}));
    if let Value::Object(props) = properties {
        props.insert(
            "enabled".into(),
            json!({"type": "boolean", "default": true, "description": "Run this insight"}),
        );
        props.insert("severity".into(), severity_schema());
        props.insert(
            "node_severity".into(),
            json!({
                "type": "object",
                "additionalProperties": severity_schema(),
                "description": "Severity per node id or node id glob"
            }),
        );
    }

    schema
        .entry("additionalProperties")
        .or_insert(Value::Bool(false));

    Value::Object(schema)
}

/// Validate a fragment against a schema, collecting every message
pub fn validate(schema: &Value, fragment: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::validator_for(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(fragment)
        .map(|e| {
            let path = e.instance_path.to_string();
            if path.is_empty() {
                e.to_string()
            } else {
                format!("{}: {}", path, e)
            }
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
