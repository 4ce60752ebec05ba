//! Schema adapter contracts
//!
//! Each supported artifact version implements one of these traits and
//! translates its own document shape into the canonical [`Node`] /
//! [`CatalogTable`] types.

use crate::node::{Node, NodeConfig, NodeId, ResourceType, TestInfo};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which artifact a document is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Manifest,
    Catalog,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manifest => write!(f, "manifest"),
            Self::Catalog => write!(f, "catalog"),
        }
    }
}

/// Errors raised by adapters and the adapter factory
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("Unsupported {document} schema version: {version}")]
    UnsupportedVersion {
        document: DocumentKind,
        version: String,
    },

    #[error("The {document} does not declare metadata.dbt_schema_version")]
    MissingVersion { document: DocumentKind },

    #[error("Failed to decode {document} ({version}): {message}")]
    Decode {
        document: DocumentKind,
        version: String,
        message: String,
    },

    #[error("Node not found: {0}")]
    NotFound(String),
}

/// Construction from an already-decoded JSON document
pub trait FromDocument: Sized {
    /// The exact `metadata.dbt_schema_version` tag this type reads
    const SCHEMA_VERSION: &'static str;

    /// Build the adapter, consuming the document
    fn from_document(document: serde_json::Value) -> Result<Self, AdapterError>;
}

/// Version-independent read contract over a manifest document
pub trait ManifestAdapter: Send + Sync {
    /// The schema version tag this adapter serves
    fn schema_version(&self) -> &'static str;

    /// dbt version that produced the document
    fn dbt_version(&self) -> &str;

    /// All node identifiers, sorted
    fn node_ids(&self) -> Vec<NodeId>;

    /// Whether the document declares `unique_id`
    fn contains(&self, unique_id: &str) -> bool;

    /// Canonical node for `unique_id`
    ///
    /// Fails with [`AdapterError::NotFound`] when the identifier is not
    /// declared by the document.
    fn resource(&self, unique_id: &str) -> Result<Node, AdapterError>;

    /// Every node, in identifier order
    fn all_nodes(&self) -> Result<Vec<(NodeId, Node)>, AdapterError> {
        self.node_ids()
            .into_iter()
            .map(|id| self.resource(&id).map(|node| (id, node)))
            .collect()
    }

    /// Resource classification of `unique_id`
    fn resource_type(&self, unique_id: &str) -> Result<ResourceType, AdapterError> {
        Ok(self.resource(unique_id)?.resource_type)
    }

    /// Declared parents of `unique_id`
    fn depends_on(&self, unique_id: &str) -> Result<Vec<NodeId>, AdapterError> {
        Ok(self.resource(unique_id)?.depends_on)
    }

    /// Declared configuration of `unique_id`
    fn config(&self, unique_id: &str) -> Result<NodeConfig, AdapterError> {
        Ok(self.resource(unique_id)?.config)
    }

    /// Original file path of `unique_id`
    fn path(&self, unique_id: &str) -> Result<String, AdapterError> {
        Ok(self.resource(unique_id)?.file_path().to_string())
    }

    /// Test metadata of `unique_id` (`None` for non-test nodes)
    fn test_info(&self, unique_id: &str) -> Result<Option<TestInfo>, AdapterError> {
        Ok(self.resource(unique_id)?.test)
    }
}

/// A column as materialized in the warehouse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogColumn {
    /// Column name
    pub name: String,

    /// Warehouse data type
    pub data_type: String,

    /// Ordinal position (1-indexed)
    pub index: u32,

    /// Warehouse comment
    pub comment: Option<String>,
}

/// A relation as materialized in the warehouse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTable {
    /// Node unique_id this relation belongs to
    pub unique_id: NodeId,

    /// Database name
    pub database: Option<String>,

    /// Schema name
    pub schema: String,

    /// Relation name
    pub name: String,

    /// Relation type (`BASE TABLE`, `VIEW`, ...)
    pub table_type: String,

    /// Warehouse comment
    pub comment: Option<String>,

    /// Columns in ordinal order
    pub columns: Vec<CatalogColumn>,
}

impl CatalogTable {
    /// Find a column by name, case-insensitively
    pub fn column(&self, name: &str) -> Option<&CatalogColumn> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// Version-independent read contract over a catalog document
pub trait CatalogAdapter: Send + Sync {
    /// The schema version tag this adapter serves
    fn schema_version(&self) -> &'static str;

    /// All relation identifiers, sorted
    fn table_ids(&self) -> Vec<NodeId>;

    /// Whether the catalog has a relation for `unique_id`
    fn contains(&self, unique_id: &str) -> bool;

    /// Relation for `unique_id`
    fn table(&self, unique_id: &str) -> Result<CatalogTable, AdapterError>;
}
