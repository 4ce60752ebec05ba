//! Materialization of exposure parents
//!
//! Exposures are queried by downstream tools. They should read from
//! transformed models, not raw sources, and those models should be
//! persisted as tables.

use dagcheck_core::{Finding, InsightKind, Severity};
use dagcheck_dbt::ResourceType;
use crate::context::InsightContext;
use crate::error::InsightError;
use crate::insight::{Insight, InsightMeta};

/// Materializations acceptable for an exposure parent
const EFFICIENT_MATERIALIZATIONS: &[&str] = &["table", "incremental"];

pub struct ExposureParentMaterialization;

static META: InsightMeta = InsightMeta {
    name: "Exposure Parent Materialization Check",
    alias: "exposure_parent_bad_materialization",
    description: "Evaluates the parents of exposures: exposures should rely on dbt models rather than \
        raw sources, and those models should be materialized for efficient querying.",
    reason_to_flag: "Exposures are heavily used in downstream systems. They should depend on transformed \
        models, and those models should be materialized efficiently.",
    default_severity: Severity::Warn,
    kind: InsightKind::Performance,
};

impl Insight for ExposureParentMaterialization {
    fn meta(&self) -> &'static InsightMeta {
        &META
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Result<Vec<Finding>, InsightError> {
        let mut findings = Vec::new();

        for exposure in ctx.candidates(&ResourceType::Exposure) {
            let mut source_parents = Vec::new();
            let mut bad_materialization_parents = Vec::new();

            for parent_id in ctx.graph().parents(&exposure.unique_id) {
                let Some(parent) = ctx.graph().get(parent_id) else {
                    continue;
                };

                match parent.resource_type {
                    ResourceType::Source => source_parents.push(parent_id.as_str()),
                    ResourceType::Model => {
                        let efficient = parent
                            .materialization()
                            .is_some_and(|m| EFFICIENT_MATERIALIZATIONS.contains(&m));
                        if !efficient {
                            bad_materialization_parents.push(parent_id.as_str());
                        }
                    }
                    _ => {}
                }
            }

            if source_parents.is_empty() && bad_materialization_parents.is_empty() {
                continue;
            }

            let mut message = format!(
                "Exposure `{}` has parents that are slow or unclear to query downstream.",
                exposure.unique_id
            );
            if !source_parents.is_empty() {
                message.push_str(&format!(" Source parents: {}.", source_parents.join(", ")));
            }
            if !bad_materialization_parents.is_empty() {
                message.push_str(&format!(
                    " Parent models not materialized as table or incremental: {}.",
                    bad_materialization_parents.join(", ")
                ));
            }

            findings.push(
                ctx.finding(exposure, message)
                    .with_recommendation(format!(
                        "Review the parents of exposure `{}`. Transform sources into a model first, \
                         and materialize view or ephemeral parents as tables.",
                        exposure.unique_id
                    ))
                    .with_metadata("source_parents", source_parents)
                    .with_metadata("bad_materialization_parents", bad_materialization_parents),
            );
        }

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagcheck_dbt::mock::{MockManifest, MockNode};
    use dagcheck_dbt::{ProjectGraph, Selection};
    use serde_json::json;

    fn run(exposure_parents: &[&str]) -> Vec<Finding> {
        let manifest = MockManifest::new().with_nodes([
            MockNode::source("source.shop.raw.orders").build(),
            MockNode::model("model.shop.orders_view").materialized("view").build(),
            MockNode::model("model.shop.orders").materialized("table").build(),
            MockNode::model("model.shop.events").materialized("incremental").build(),
            MockNode::model("model.shop.unset").build(),
            MockNode::exposure("exposure.shop.dashboard")
                .depends_on(exposure_parents)
                .build(),
        ]);
        let graph = ProjectGraph::build(&manifest, None).unwrap();
        let selection = Selection::all();
        let ctx = InsightContext::with_defaults(&graph, &selection, &META);
        ExposureParentMaterialization.evaluate(&ctx).unwrap()
    }

    #[test]
    fn source_and_view_parents_in_one_finding() {
        let findings = run(&["source.shop.raw.orders", "model.shop.orders_view", "model.shop.orders"]);

        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.kind, InsightKind::Performance);
        assert_eq!(finding.metadata["source_parents"], json!(["source.shop.raw.orders"]));
        assert_eq!(finding.metadata["bad_materialization_parents"], json!(["model.shop.orders_view"]));
        assert!(finding.message.contains("source.shop.raw.orders"));
        assert!(finding.message.contains("model.shop.orders_view"));
    }

    #[test]
    fn table_and_incremental_parents_pass() {
        assert!(run(&["model.shop.orders", "model.shop.events"]).is_empty());
    }

    #[test]
    fn missing_materialization_is_flagged() {
        let findings = run(&["model.shop.unset"]);
        assert_eq!(findings[0].metadata["bad_materialization_parents"], json!(["model.shop.unset"]));
        assert_eq!(findings[0].metadata["source_parents"], json!([]));
    }

    #[test]
    fn dangling_parents_are_skipped() {
        assert!(run(&["model.shop.disabled", "source.shop.raw.gone"]).is_empty());
    }
}
