//! Warehouse columns missing from model documentation

use dagcheck_core::{Finding, InsightKind, Severity};
use dagcheck_dbt::ResourceType;
use crate::context::InsightContext;
use crate::error::InsightError;
use crate::insight::{DataRequirement, Insight, InsightMeta};

/// Flags models whose catalog columns are not all documented in the manifest
pub struct ModelHasAllColumns;

static META: InsightMeta = InsightMeta {
    name: "Check Model Has All Columns",
    alias: "check_model_has_all_columns",
    description: "Checks that every column present in the warehouse is documented on the model.",
    reason_to_flag: "Undocumented columns are invisible to consumers and escape column-level tests.",
    default_severity: Severity::Warn,
    kind: InsightKind::Check,
};

impl Insight for ModelHasAllColumns {
    fn meta(&self) -> &'static InsightMeta {
        &META
    }

    fn has_required_data(&self, has_manifest: bool, has_catalog: bool) -> DataRequirement {
        match (has_manifest, has_catalog) {
            (true, true) => DataRequirement::Satisfied,
            (false, _) => DataRequirement::Missing("a manifest is required".to_string()),
            (true, false) => DataRequirement::Missing("a catalog is required".to_string()),
        }
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Result<Vec<Finding>, InsightError> {
        let catalog = ctx
            .graph()
            .catalog()
            .ok_or_else(|| InsightError::Internal("catalog not loaded".to_string()))?;

        let mut findings = Vec::new();
        for model in ctx.candidates(&ResourceType::Model) {
            if !catalog.contains(&model.unique_id) {
                tracing::debug!(node = %model.unique_id, "model not in catalog");
                continue;
            }

            let table = catalog
                .table(&model.unique_id)
                .map_err(|e| InsightError::Internal(e.to_string()))?;

            let undocumented: Vec<&str> = table
                .columns
                .iter()
                .filter(|col| {
                    !model
                        .columns
                        .values()
                        .any(|documented| documented.name.eq_ignore_ascii_case(&col.name))
                })
                .map(|col| col.name.as_str())
                .collect();

            if undocumented.is_empty() {
                continue;
            }

            let message = format!(
                "The model `{}` has columns in the warehouse that are not documented: {}.",
                model.unique_id,
                undocumented.join(", ")
            );
            findings.push(
                ctx.finding(model, message)
                    .with_recommendation("Document the listed columns in the model's properties file.")
                    .with_metadata("undocumented_columns", undocumented),
            );
        }

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagcheck_dbt::mock::{MockCatalog, MockManifest, MockNode};
    use dagcheck_dbt::{CatalogAdapter, ProjectGraph, Selection};
    use serde_json::json;

    fn graph(with_catalog: bool) -> ProjectGraph {
        let manifest = MockManifest::new().with_nodes([
            MockNode::model("model.shop.orders")
                .column("order_id", "Primary key")
                .column("status", "")
                .build(),
            MockNode::model("model.shop.ephemeral").build(),
        ]);
        let catalog = MockCatalog::new().with_table("model.shop.orders", "analytics", &["ORDER_ID", "STATUS", "TOTAL"]);
        let catalog = with_catalog.then(|| Box::new(catalog) as Box<dyn CatalogAdapter>);
        ProjectGraph::build(&manifest, catalog).unwrap()
    }

    #[test]
    fn needs_a_catalog() {
        assert!(matches!(
            ModelHasAllColumns.has_required_data(true, false),
            DataRequirement::Missing(reason) if reason.contains("catalog")
        ));
        assert!(ModelHasAllColumns.has_required_data(true, true).is_satisfied());
    }

    #[test]
    fn undocumented_warehouse_columns_are_listed() {
        let graph = graph(true);
        let selection = Selection::all();
        let ctx = InsightContext::with_defaults(&graph, &selection, &META);

        let findings = ModelHasAllColumns.evaluate(&ctx).unwrap();

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].metadata["undocumented_columns"], json!(["TOTAL"]));
    }

    #[test]
    fn missing_catalog_is_an_error_not_a_panic() {
        let graph = graph(false);
        let selection = Selection::all();
        let ctx = InsightContext::with_defaults(&graph, &selection, &META);
        assert!(matches!(ModelHasAllColumns.evaluate(&ctx), Err(InsightError::Internal(_))));
    }
}
