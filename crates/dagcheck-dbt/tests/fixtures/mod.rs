//! Test fixtures for adapter and graph integration tests
//!
//! A small "shop" project rendered as real manifest/catalog JSON. The same
//! logical project is emitted for each manifest version so tests can check
//! that every adapter yields the same canonical graph.

use serde_json::{json, Value};

pub const V10: &str = "https://schemas.getdbt.com/dbt/manifest/v10.json";
pub const V11: &str = "https://schemas.getdbt.com/dbt/manifest/v11.json";
pub const V12: &str = "https://schemas.getdbt.com/dbt/manifest/v12.json";
pub const CATALOG_V1: &str = "https://schemas.getdbt.com/dbt/catalog/v1.json";

/// Nodes present in every version of the shop manifest
pub const SHOP_NODE_IDS: &[&str] = &[
    "exposure.shop.revenue_dashboard",
    "macro.shop.cents_to_dollars",
    "model.shop.customers",
    "model.shop.orders",
    "model.shop.stg_orders",
    "source.shop.raw.customers",
    "source.shop.raw.orders",
    "test.shop.assert_positive_totals",
    "test.shop.dbt_utils_at_least_one_orders_total.d4e5f6",
    "test.shop.not_null_orders_order_id.a1b2c3",
];

fn model(name: &str, schema: &str, materialized: &str, parents: &[&str], columns: Value) -> Value {
    json!({
        "unique_id": format!("model.shop.{name}"),
        "name": name,
        "resource_type": "model",
        "package_name": "shop",
        "path": format!("marts/{name}.sql"),
        "original_file_path": format!("models/marts/{name}.sql"),
        "database": "warehouse",
        "schema": schema,
        "alias": name,
        "description": format!("The {name} model"),
        "config": {
            "enabled": true,
            "materialized": materialized,
            "tags": ["shop"],
            "schema": schema,
            "meta": {"owner": "finance"}
        },
        "tags": ["shop"],
        "depends_on": {"nodes": parents, "macros": ["macro.shop.cents_to_dollars"]},
        "columns": columns,
        "fqn": ["shop", "marts", name]
    })
}

fn source(table: &str) -> Value {
    json!({
        "unique_id": format!("source.shop.raw.{table}"),
        "name": table,
        "resource_type": "source",
        "package_name": "shop",
        "path": "models/sources.yml",
        "original_file_path": "models/sources.yml",
        "database": "warehouse",
        "schema": "raw",
        "identifier": format!("raw_{table}"),
        "description": null,
        "config": {"enabled": true, "meta": {"loader": "fivetran"}},
        "tags": ["raw"],
        "columns": {
            "id": {"name": "id", "description": "Primary key", "data_type": "integer"},
            "loaded_at": {"name": "loaded_at", "description": null, "data_type": null}
        },
        "fqn": ["shop", "raw", table]
    })
}

fn generic_test(
    unique_id: &str,
    test_name: &str,
    namespace: Option<&str>,
    column: &str,
    parent: &str,
) -> Value {
    let name = unique_id.split('.').nth(2).unwrap_or_default();
    json!({
        "unique_id": unique_id,
        "name": name,
        "resource_type": "test",
        "package_name": "shop",
        "path": format!("{name}.sql"),
        "original_file_path": "models/schema.yml",
        "schema": "analytics_dbt_test__audit",
        "config": {
            "enabled": true,
            "severity": "ERROR",
            "materialized": "test",
            "schema": "dbt_test__audit",
            "tags": ["data_quality"]
        },
        "depends_on": {"nodes": [parent], "macros": [format!("macro.dbt.test_{test_name}")]},
        "test_metadata": {"name": test_name, "kwargs": {"column_name": column}, "namespace": namespace},
        "column_name": column
    })
}

/// The shop project as a manifest document with the given schema version tag
pub fn shop_manifest(version: &str) -> Value {
    let mut nodes = json!({
        "model.shop.stg_orders": model(
            "stg_orders", "staging", "view", &["source.shop.raw.orders"], json!({})
        ),
        "model.shop.orders": model(
            "orders", "analytics", "table", &["model.shop.stg_orders", "model.shop.stg_orders"],
            json!({
                "order_id": {"name": "order_id", "description": "Primary key", "data_type": "integer"},
                "total": {"name": "total", "description": "", "data_type": null}
            })
        ),
        "model.shop.customers": model(
            "customers", "analytics", "view", &["source.shop.raw.customers", "model.shop.orders"], json!({})
        ),
        "test.shop.not_null_orders_order_id.a1b2c3": generic_test(
            "test.shop.not_null_orders_order_id.a1b2c3", "not_null", None, "order_id", "model.shop.orders"
        ),
        "test.shop.dbt_utils_at_least_one_orders_total.d4e5f6": generic_test(
            "test.shop.dbt_utils_at_least_one_orders_total.d4e5f6",
            "at_least_one",
            Some("dbt_utils"),
            "total",
            "model.shop.orders"
        ),
        "test.shop.assert_positive_totals": {
            "unique_id": "test.shop.assert_positive_totals",
            "name": "assert_positive_totals",
            "resource_type": "test",
            "package_name": "shop",
            "path": "assert_positive_totals.sql",
            "original_file_path": "tests/assert_positive_totals.sql",
            "depends_on": {"nodes": ["model.shop.orders"], "macros": []}
        }
    });

    // Depends on a disabled model that is not in the manifest.
    nodes["model.shop.customers"]["depends_on"]["nodes"]
        .as_array_mut()
        .expect("fixture depends_on is an array")
        .push(json!("model.shop.disabled_legacy"));

    let mut document = json!({
        "metadata": {
            "dbt_schema_version": version,
            "dbt_version": "1.8.2",
            "generated_at": "2024-06-01T12:00:00Z",
            "project_name": "shop"
        },
        "nodes": nodes,
        "sources": {
            "source.shop.raw.orders": source("orders"),
            "source.shop.raw.customers": source("customers")
        },
        "macros": {
            "macro.shop.cents_to_dollars": {
                "unique_id": "macro.shop.cents_to_dollars",
                "name": "cents_to_dollars",
                "resource_type": "macro",
                "package_name": "shop",
                "path": "macros/cents_to_dollars.sql",
                "original_file_path": "macros/cents_to_dollars.sql",
                "description": "Convert an integer cents column to dollars",
                "arguments": [
                    {"name": "column_name", "type": "string", "description": "Column holding cents"},
                    {"name": "scale", "type": "integer", "description": ""}
                ]
            }
        },
        "exposures": {
            "exposure.shop.revenue_dashboard": {
                "unique_id": "exposure.shop.revenue_dashboard",
                "name": "revenue_dashboard",
                "resource_type": "exposure",
                "package_name": "shop",
                "path": "exposures.yml",
                "original_file_path": "models/exposures.yml",
                "depends_on": {"nodes": ["model.shop.customers", "source.shop.raw.orders"], "macros": []}
            }
        },
        "metrics": {},
        "groups": {},
        "semantic_models": {}
    });

    if version != V10 {
        document["saved_queries"] = json!({});
    }
    if version == V12 {
        document["unit_tests"] = json!({
            "unit_test.shop.orders.test_order_totals": {
                "unique_id": "unit_test.shop.orders.test_order_totals",
                "name": "test_order_totals",
                "resource_type": "unit_test",
                "package_name": "shop",
                "path": "models/marts/orders.yml",
                "original_file_path": "models/marts/orders.yml",
                "depends_on": {"nodes": ["model.shop.orders"], "macros": []}
            }
        });
    }

    document
}

/// Catalog with physical columns for two of the shop models
pub fn shop_catalog() -> Value {
    json!({
        "metadata": {"dbt_schema_version": CATALOG_V1, "dbt_version": "1.8.2"},
        "nodes": {
            "model.shop.orders": {
                "unique_id": "model.shop.orders",
                "metadata": {"type": "BASE TABLE", "schema": "analytics", "name": "orders", "database": "warehouse", "comment": null},
                "columns": {
                    "ORDER_ID": {"type": "INTEGER", "index": 1, "name": "ORDER_ID", "comment": null},
                    "TOTAL": {"type": "NUMERIC", "index": 3, "name": "TOTAL", "comment": null},
                    "CUSTOMER_ID": {"type": "INTEGER", "index": 2, "name": "CUSTOMER_ID", "comment": null}
                }
            }
        },
        "sources": {
            "source.shop.raw.orders": {
                "unique_id": "source.shop.raw.orders",
                "metadata": {"type": "BASE TABLE", "schema": "raw", "name": "raw_orders", "database": "warehouse", "comment": null},
                "columns": {
                    "id": {"type": "INTEGER", "index": 1, "name": "id", "comment": null}
                }
            }
        },
        "errors": null
    })
}
