//! Catalog v1 adapter
//!
//! `catalog.json` as written by `dbt docs generate`: physical relation
//! metadata and columns for nodes and sources.

use crate::adapter::{AdapterError, CatalogAdapter, CatalogColumn, CatalogTable, DocumentKind, FromDocument};
use crate::node::NodeId;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize)]
struct TableMetadata {
    #[serde(rename = "type", default)]
    table_type: String,
    schema: String,
    name: String,
    #[serde(default)]
    database: Option<String>,
    #[serde(default)]
    comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Column {
    #[serde(rename = "type")]
    data_type: String,
    index: u32,
    name: String,
    #[serde(default)]
    comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Table {
    metadata: TableMetadata,
    #[serde(default)]
    columns: BTreeMap<String, Column>,
    unique_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Document {
    #[serde(default)]
    nodes: BTreeMap<String, Table>,
    #[serde(default)]
    sources: BTreeMap<String, Table>,
}

/// Read view over a v1 catalog
#[derive(Debug, Clone)]
pub struct CatalogV1 {
    document: Document,
}

impl CatalogV1 {
    fn raw(&self, unique_id: &str) -> Option<&Table> {
        self.document
            .nodes
            .get(unique_id)
            .or_else(|| self.document.sources.get(unique_id))
    }
}

impl FromDocument for CatalogV1 {
    const SCHEMA_VERSION: &'static str = "https://schemas.getdbt.com/dbt/catalog/v1.json";

    fn from_document(document: serde_json::Value) -> Result<Self, AdapterError> {
        let document: Document = crate::factory::decode(DocumentKind::Catalog, Self::SCHEMA_VERSION, document)?;
        Ok(Self { document })
    }
}

impl CatalogAdapter for CatalogV1 {
    fn schema_version(&self) -> &'static str {
        Self::SCHEMA_VERSION
    }

    fn table_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .document
            .nodes
            .keys()
            .chain(self.document.sources.keys())
            .cloned()
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    fn contains(&self, unique_id: &str) -> bool {
        self.raw(unique_id).is_some()
    }

    fn table(&self, unique_id: &str) -> Result<CatalogTable, AdapterError> {
        let table = self
            .raw(unique_id)
            .ok_or_else(|| AdapterError::NotFound(unique_id.to_string()))?;

        let mut columns: Vec<CatalogColumn> = table
            .columns
            .values()
            .map(|col| CatalogColumn {
                name: col.name.clone(),
                data_type: col.data_type.clone(),
                index: col.index,
                comment: col.comment.clone(),
            })
            .collect();
        columns.sort_by_key(|c| c.index);

        Ok(CatalogTable {
            unique_id: table.unique_id.clone().unwrap_or_else(|| unique_id.to_string()),
            database: table.metadata.database.clone(),
            schema: table.metadata.schema.clone(),
            name: table.metadata.name.clone(),
            table_type: table.metadata.table_type.clone(),
            comment: table.metadata.comment.clone(),
            columns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> CatalogV1 {
        CatalogV1::from_document(json!({
            "metadata": {"dbt_schema_version": CatalogV1::SCHEMA_VERSION},
            "nodes": {
                "model.shop.orders": {
                    "metadata": {"type": "BASE TABLE", "schema": "analytics", "name": "orders", "database": "prod"},
                    "columns": {
                        "STATUS": {"type": "TEXT", "index": 2, "name": "STATUS", "comment": null},
                        "ID": {"type": "INTEGER", "index": 1, "name": "ID", "comment": null}
                    },
                    "stats": {},
                    "unique_id": "model.shop.orders"
                }
            },
            "sources": {
                "source.shop.raw.orders": {
                    "metadata": {"type": "BASE TABLE", "schema": "raw", "name": "orders"},
                    "columns": {},
                    "unique_id": "source.shop.raw.orders"
                }
            },
            "errors": null
        }))
        .unwrap()
    }

    #[test]
    fn columns_are_in_ordinal_order() {
        let table = catalog().table("model.shop.orders").unwrap();
        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ID", "STATUS"]);
        assert_eq!(table.schema, "analytics");
        assert!(table.column("status").is_some());
    }

    #[test]
    fn sources_are_included() {
        let catalog = catalog();
        assert!(catalog.contains("source.shop.raw.orders"));
        assert_eq!(catalog.table_ids().len(), 2);
    }

    #[test]
    fn missing_table_is_not_found() {
        assert!(matches!(
            catalog().table("model.shop.nope"),
            Err(AdapterError::NotFound(_))
        ));
    }
}
