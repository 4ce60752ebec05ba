//! Test-count requirements for models and sources
//!
//! Configured per insight as
//!
//! ```toml
//! [insights.check_model_has_tests_by_name]
//! tests = [{ test = "not_null", min_count = 2 }, { test = "unique" }]
//! ```
//!
//! A node's tests are its children in the graph that are data tests or
//! unit tests. They are grouped either by test name (`test_metadata.name`,
//! or the node name for singular tests) or by test type.

use dagcheck_core::{Finding, InsightKind, Severity};
use dagcheck_dbt::{Node, ProjectGraph, ResourceType};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use crate::context::InsightContext;
use crate::error::InsightError;
use crate::insight::{Insight, InsightMeta};

/// How child tests are bucketed before comparing to requirements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Name,
    Type,
}

/// One `{test, min_count}` entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestRequirement {
    pub test: String,
    #[serde(default = "default_min_count")]
    pub min_count: u64,
}

fn default_min_count() -> u64 {
    1
}

#[derive(Debug, Default, Deserialize)]
struct TestCoverageOptions {
    #[serde(default)]
    tests: Vec<TestRequirement>,
}

/// An unmet requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deficit {
    pub test: String,
    pub required: u64,
    pub actual: u64,
}

/// Count `node_id`'s child tests per group key
pub fn count_child_tests(graph: &ProjectGraph, node_id: &str, group_by: GroupBy) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();

    for child_id in graph.children(node_id) {
        let Some(child) = graph.get(child_id) else {
            continue;
        };
        let Some(info) = child.test.as_ref().filter(|_| child.is_test()) else {
            continue;
        };

        let key = match group_by {
            GroupBy::Name => info.name.clone(),
            GroupBy::Type => info.test_type.as_str().to_string(),
        };
        *counts.entry(key).or_insert(0) += 1;
    }

    counts
}

/// Requirements whose minimum is not met, in configured order
pub fn deficits(counts: &BTreeMap<String, u64>, requirements: &[TestRequirement]) -> Vec<Deficit> {
    requirements
        .iter()
        .filter_map(|req| {
            let actual = counts.get(&req.test).copied().unwrap_or(0);
            (actual < req.min_count).then(|| Deficit {
                test: req.test.clone(),
                required: req.min_count,
                actual,
            })
        })
        .collect()
}

/// Test-count insight for one resource type and grouping
pub struct HasTests {
    meta: &'static InsightMeta,
    resource_type: ResourceType,
    group_by: GroupBy,
}

static MODEL_BY_NAME: InsightMeta = InsightMeta {
    name: "Check Model Has Tests By Name",
    alias: "check_model_has_tests_by_name",
    description: "Checks that the model has tests with specific names.",
    reason_to_flag: "Models should have tests with specific names for proper validation.",
    default_severity: Severity::Warn,
    kind: InsightKind::Check,
};

static MODEL_BY_TYPE: InsightMeta = InsightMeta {
    name: "Check Model Has Tests By Type",
    alias: "check_model_has_tests_by_type",
    description: "Checks that the model has tests of specific types.",
    reason_to_flag: "Models should have tests of specific types for proper validation.",
    default_severity: Severity::Warn,
    kind: InsightKind::Check,
};

static SOURCE_BY_NAME: InsightMeta = InsightMeta {
    name: "Source Has Tests By Name",
    alias: "check_source_has_tests_by_name",
    description: "Checks that the source has tests with specific names.",
    reason_to_flag: "Sources should have tests with specific names for proper validation.",
    default_severity: Severity::Warn,
    kind: InsightKind::Check,
};

static SOURCE_BY_TYPE: InsightMeta = InsightMeta {
    name: "Source Has Tests By Type",
    alias: "check_source_has_tests_by_type",
    description: "Checks that the source has tests of specific types.",
    reason_to_flag: "Sources should have tests of specific types for proper validation.",
    default_severity: Severity::Warn,
    kind: InsightKind::Check,
};

impl HasTests {
    pub fn model_by_name() -> Self {
        Self {
            meta: &MODEL_BY_NAME,
            resource_type: ResourceType::Model,
            group_by: GroupBy::Name,
        }
    }

    pub fn model_by_type() -> Self {
        Self {
            meta: &MODEL_BY_TYPE,
            resource_type: ResourceType::Model,
            group_by: GroupBy::Type,
        }
    }

    pub fn source_by_name() -> Self {
        Self {
            meta: &SOURCE_BY_NAME,
            resource_type: ResourceType::Source,
            group_by: GroupBy::Name,
        }
    }

    pub fn source_by_type() -> Self {
        Self {
            meta: &SOURCE_BY_TYPE,
            resource_type: ResourceType::Source,
            group_by: GroupBy::Type,
        }
    }

    fn build_finding(&self, ctx: &InsightContext<'_>, node: &Node, missing: Vec<Deficit>) -> Finding {
        let grouping = match self.group_by {
            GroupBy::Name => "Test Name",
            GroupBy::Type => "Test Type",
        };
        let lines: Vec<String> = missing
            .iter()
            .map(|d| format!("{}: {}, Min Count: {}, Actual Count: {}", grouping, d.test, d.required, d.actual))
            .collect();

        let message = format!(
            "The {} `{}` does not have enough tests:\n{}",
            self.resource_type,
            node.unique_id,
            lines.join("\n")
        );
        let recommendation = match self.group_by {
            GroupBy::Name => format!("Add tests with the listed names to the {}.", self.resource_type),
            GroupBy::Type => format!("Add tests of the listed types to the {}.", self.resource_type),
        };

        ctx.finding(node, message)
            .with_recommendation(recommendation)
            .with_metadata("missing_tests", json!(missing))
    }
}

impl Insight for HasTests {
    fn meta(&self) -> &'static InsightMeta {
        self.meta
    }

    fn config_schema(&self) -> Value {
        let test = match self.group_by {
            GroupBy::Name => json!({"type": "string", "description": "Test name"}),
            GroupBy::Type => json!({
                "type": "string",
                "enum": ["generic", "singular", "unit"],
                "description": "Test type"
            }),
        };

        json!({
            "type": "object",
            "properties": {
                "tests": {
                    "type": "array",
                    "description": "Tests the node must have, with minimum counts",
                    "default": [],
                    "items": {
                        "type": "object",
                        "properties": {
                            "test": test,
                            "min_count": {"type": "integer", "minimum": 0, "default": 1}
                        },
                        "required": ["test"],
                        "additionalProperties": false
                    }
                }
            }
        })
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Result<Vec<Finding>, InsightError> {
        let options: TestCoverageOptions = ctx.options()?;
        if options.tests.is_empty() {
            tracing::warn!(insight = self.meta.alias, "no tests configured, nothing to check");
            return Ok(Vec::new());
        }

        let mut findings = Vec::new();
        for node in ctx.candidates(&self.resource_type) {
            let counts = count_child_tests(ctx.graph(), &node.unique_id, self.group_by);
            let missing = deficits(&counts, &options.tests);
            if !missing.is_empty() {
                findings.push(self.build_finding(ctx, node, missing));
            }
        }

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity::SeverityResolver;
    use dagcheck_dbt::mock::{MockManifest, MockNode};
    use dagcheck_dbt::Selection;
    use pretty_assertions::assert_eq;

    fn graph() -> ProjectGraph {
        let manifest = MockManifest::new().with_nodes([
            MockNode::source("source.shop.raw.orders").build(),
            MockNode::model("model.shop.orders").depends_on(&["source.shop.raw.orders"]).build(),
            MockNode::generic_test("test.shop.not_null_raw_orders_id", "not_null")
                .depends_on(&["source.shop.raw.orders"])
                .build(),
            MockNode::generic_test("test.shop.unique_orders_id", "unique")
                .depends_on(&["model.shop.orders"])
                .build(),
            MockNode::generic_test("test.shop.not_null_orders_id", "not_null")
                .depends_on(&["model.shop.orders"])
                .build(),
            MockNode::singular_test("test.shop.assert_totals")
                .depends_on(&["model.shop.orders"])
                .build(),
        ]);
        ProjectGraph::build(&manifest, None).unwrap()
    }

    fn run(insight: &HasTests, graph: &ProjectGraph, fragment: Value) -> Vec<Finding> {
        let selection = Selection::all();
        let ctx = InsightContext::new(
            graph,
            &selection,
            insight.meta(),
            fragment,
            SeverityResolver::new(insight.meta().default_severity),
        );
        insight.evaluate(&ctx).unwrap()
    }

    #[test]
    fn counts_by_name_and_type() {
        let graph = graph();

        let by_name = count_child_tests(&graph, "model.shop.orders", GroupBy::Name);
        assert_eq!(
            by_name,
            BTreeMap::from([
                ("assert_totals".to_string(), 1),
                ("not_null".to_string(), 1),
                ("unique".to_string(), 1),
            ])
        );

        let by_type = count_child_tests(&graph, "model.shop.orders", GroupBy::Type);
        assert_eq!(
            by_type,
            BTreeMap::from([("generic".to_string(), 2), ("singular".to_string(), 1)])
        );
    }

    #[test]
    fn non_test_children_are_not_counted() {
        let graph = graph();
        let counts = count_child_tests(&graph, "source.shop.raw.orders", GroupBy::Name);
        assert_eq!(counts, BTreeMap::from([("not_null".to_string(), 1)]));
    }

    #[test]
    fn deficit_reports_required_and_actual() {
        let graph = graph();
        let findings = run(
            &HasTests::source_by_name(),
            &graph,
            json!({"tests": [{"test": "not_null", "min_count": 2}]}),
        );

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].unique_id.as_deref(), Some("source.shop.raw.orders"));
        assert_eq!(
            findings[0].metadata["missing_tests"],
            json!([{"test": "not_null", "required": 2, "actual": 1}])
        );
    }

    #[test]
    fn min_count_defaults_to_one() {
        let graph = graph();
        let findings = run(
            &HasTests::model_by_name(),
            &graph,
            json!({"tests": [{"test": "unique"}, {"test": "accepted_values"}]}),
        );

        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].metadata["missing_tests"],
            json!([{"test": "accepted_values", "required": 1, "actual": 0}])
        );
    }

    #[test]
    fn by_type_requirements() {
        let graph = graph();
        let findings = run(
            &HasTests::model_by_type(),
            &graph,
            json!({"tests": [{"test": "generic", "min_count": 2}, {"test": "unit"}]}),
        );

        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].metadata["missing_tests"],
            json!([{"test": "unit", "required": 1, "actual": 0}])
        );
        assert!(findings[0].message.contains("Test Type: unit"));
    }

    #[test]
    fn empty_requirements_produce_nothing() {
        let graph = graph();
        assert!(run(&HasTests::source_by_type(), &graph, json!({})).is_empty());
        assert!(run(&HasTests::model_by_name(), &graph, json!({"tests": []})).is_empty());
    }
}
