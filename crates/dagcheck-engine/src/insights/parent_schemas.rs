//! Allowed and denied schemas for model parents

use dagcheck_core::{Finding, InsightKind, Severity};
use dagcheck_dbt::{Node, ResourceType};
use serde::Deserialize;
use serde_json::{json, Value};
use crate::context::InsightContext;
use crate::error::InsightError;
use crate::insight::{Insight, InsightMeta};

/// Flags models whose parents live in schemas outside the allow-list or in the deny-list
pub struct ModelParentsSchema;

static META: InsightMeta = InsightMeta {
    name: "Check Model Parents Schema",
    alias: "check_model_parents_schema",
    description: "Ensures the parent models or sources of a model come from certain schemas.",
    reason_to_flag: "The model reads from a schema it is not supposed to depend on.",
    default_severity: Severity::Warn,
    kind: InsightKind::Check,
};

#[derive(Debug, Default, Deserialize)]
struct Options {
    /// Parents must be in one of these (when non-empty)
    #[serde(default)]
    allowed_schemas: Vec<String>,

    /// Parents must not be in any of these
    #[serde(default)]
    denied_schemas: Vec<String>,
}

impl Options {
    fn is_disallowed(&self, schema: &str) -> bool {
        (!self.allowed_schemas.is_empty() && !listed(&self.allowed_schemas, schema))
            || listed(&self.denied_schemas, schema)
    }
}

/// Schema names compare case-insensitively
fn listed(schemas: &[String], schema: &str) -> bool {
    schemas.iter().any(|s| s.eq_ignore_ascii_case(schema))
}

impl Insight for ModelParentsSchema {
    fn meta(&self) -> &'static InsightMeta {
        &META
    }

    fn config_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "allowed_schemas": {
                    "type": "array",
                    "items": {"type": "string"},
                    "default": [],
                    "description": "Schemas parents may come from; empty allows any"
                },
                "denied_schemas": {
                    "type": "array",
                    "items": {"type": "string"},
                    "default": [],
                    "description": "Schemas parents may never come from"
                }
            }
        })
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Result<Vec<Finding>, InsightError> {
        let options: Options = ctx.options()?;
        if options.allowed_schemas.is_empty() && options.denied_schemas.is_empty() {
            tracing::debug!(insight = META.alias, "no schemas configured, nothing to check");
            return Ok(Vec::new());
        }

        let mut findings = Vec::new();
        for model in ctx.candidates(&ResourceType::Model) {
            let offenders: Vec<(&Node, &str)> = ctx
                .graph()
                .parents(&model.unique_id)
                .iter()
                .filter_map(|parent_id| ctx.graph().get(parent_id))
                .filter_map(|parent| parent.schema.as_deref().map(|schema| (parent, schema)))
                .filter(|(_, schema)| options.is_disallowed(schema))
                .collect();

            if offenders.is_empty() {
                continue;
            }

            let described: Vec<String> = offenders
                .iter()
                .map(|(parent, schema)| format!("`{}` (schema `{}`)", parent.unique_id, schema))
                .collect();
            let message = format!(
                "The model `{}` has parents in schemas that are not allowed: {}.",
                model.unique_id,
                described.join(", ")
            );

            let parents: Vec<Value> = offenders
                .iter()
                .map(|(parent, schema)| json!({"unique_id": parent.unique_id, "schema": schema}))
                .collect();

            findings.push(
                ctx.finding(model, message)
                    .with_recommendation(
                        "Read from models in an allowed schema instead, or update the allowed/denied schema lists.",
                    )
                    .with_metadata("parents", parents),
            );
        }

        Ok(findings)
    }
}
