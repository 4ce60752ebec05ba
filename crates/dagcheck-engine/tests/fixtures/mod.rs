//! Test fixtures for engine integration tests
//!
//! A jaffle-shop style manifest (v12) where every built-in insight has
//! something to report under `JAFFLE_CONFIG`, plus a matching catalog.

use serde_json::{json, Value};

pub const MANIFEST_V12: &str = "https://schemas.getdbt.com/dbt/manifest/v12.json";
pub const CATALOG_V1: &str = "https://schemas.getdbt.com/dbt/catalog/v1.json";

fn model(name: &str, schema: &str, materialized: &str, parents: &[&str], columns: Value) -> Value {
    json!({
        "unique_id": format!("model.jaffle.{name}"),
        "name": name,
        "resource_type": "model",
        "package_name": "jaffle",
        "path": format!("{name}.sql"),
        "original_file_path": format!("models/{name}.sql"),
        "schema": schema,
        "description": "",
        "config": {"materialized": materialized},
        "depends_on": {"nodes": parents, "macros": []},
        "columns": columns
    })
}

fn generic_test(id: &str, test_name: &str, parent: &str) -> Value {
    json!({
        "unique_id": id,
        "name": id.split('.').nth(2).unwrap_or_default(),
        "resource_type": "test",
        "package_name": "jaffle",
        "original_file_path": "models/schema.yml",
        "depends_on": {"nodes": [parent], "macros": []},
        "test_metadata": {"name": test_name, "kwargs": {}}
    })
}

/// Manifest document for the jaffle project
pub fn jaffle_manifest() -> Value {
    json!({
        "metadata": {"dbt_schema_version": MANIFEST_V12, "dbt_version": "1.8.0"},
        "nodes": {
            "model.jaffle.stg_orders": model(
                "stg_orders", "staging", "view", &["source.jaffle.raw.orders"], json!({})
            ),
            "model.jaffle.orders": model(
                "orders", "analytics", "table", &["model.jaffle.stg_orders"],
                json!({"order_id": {"name": "order_id", "description": "Primary key"}})
            ),
            "model.jaffle.customers": model(
                "customers", "analytics", "view", &["model.jaffle.orders"], json!({})
            ),
            "test.jaffle.not_null_raw_orders_id.1": generic_test(
                "test.jaffle.not_null_raw_orders_id.1", "not_null", "source.jaffle.raw.orders"
            ),
            "test.jaffle.unique_orders_order_id.2": generic_test(
                "test.jaffle.unique_orders_order_id.2", "unique", "model.jaffle.orders"
            )
        },
        "sources": {
            "source.jaffle.raw.orders": {
                "unique_id": "source.jaffle.raw.orders",
                "name": "orders",
                "resource_type": "source",
                "package_name": "jaffle",
                "original_file_path": "models/sources.yml",
                "schema": "raw"
            }
        },
        "macros": {
            "macro.jaffle.cents_to_dollars": {
                "unique_id": "macro.jaffle.cents_to_dollars",
                "name": "cents_to_dollars",
                "resource_type": "macro",
                "package_name": "jaffle",
                "original_file_path": "macros/cents_to_dollars.sql",
                "description": "Convert cents to dollars",
                "arguments": [
                    {"name": "column_name", "description": "Column holding cents"},
                    {"name": "scale", "description": ""}
                ]
            },
            "macro.jaffle.limit_zero": {
                "unique_id": "macro.jaffle.limit_zero",
                "name": "limit_zero",
                "resource_type": "macro",
                "package_name": "jaffle",
                "original_file_path": "macros/limit_zero.sql",
                "description": "  "
            }
        },
        "exposures": {
            "exposure.jaffle.weekly_revenue": {
                "unique_id": "exposure.jaffle.weekly_revenue",
                "name": "weekly_revenue",
                "resource_type": "exposure",
                "package_name": "jaffle",
                "original_file_path": "models/exposures.yml",
                "depends_on": {"nodes": ["source.jaffle.raw.orders", "model.jaffle.customers"], "macros": []}
            }
        },
        "unit_tests": {}
    })
}

/// Catalog with one undocumented warehouse column on `orders`
pub fn jaffle_catalog() -> Value {
    json!({
        "metadata": {"dbt_schema_version": CATALOG_V1},
        "nodes": {
            "model.jaffle.orders": {
                "unique_id": "model.jaffle.orders",
                "metadata": {"type": "BASE TABLE", "schema": "analytics", "name": "orders"},
                "columns": {
                    "ORDER_ID": {"type": "INTEGER", "index": 1, "name": "ORDER_ID"},
                    "AMOUNT": {"type": "NUMERIC", "index": 2, "name": "AMOUNT"}
                }
            }
        },
        "sources": {}
    })
}

/// Project configuration exercising every configurable insight
pub const JAFFLE_CONFIG: &str = r#"
[runner]
parallel = true

[insights.check_source_has_tests_by_name]
tests = [{ test = "not_null", min_count = 2 }]

[insights.check_model_parents_schema]
allowed_schemas = ["analytics"]

[insights.check_model_has_tests_by_type]
tests = [{ test = "generic" }]
"#;
