//! dbt artifact adapters and project graph construction
//!
//! This crate handles:
//! - Version-specific adapters over manifest.json and catalog.json
//! - Selecting the adapter for a document (factory)
//! - Building the canonical project graph (nodes + child edges)
//! - Resolving node selection

pub mod adapter;
pub mod node;
pub mod wire;
pub mod manifest_v10;
pub mod manifest_v11;
pub mod manifest_v12;
pub mod catalog_v1;
pub mod factory;
pub mod graph;
pub mod selection;
pub mod mock;

pub use adapter::{AdapterError, CatalogAdapter, CatalogColumn, CatalogTable, DocumentKind, FromDocument, ManifestAdapter};
pub use node::{ColumnInfo, MacroArgument, Node, NodeConfig, NodeId, ResourceType, TestInfo, TestType};
pub use manifest_v10::ManifestV10;
pub use manifest_v11::ManifestV11;
pub use manifest_v12::ManifestV12;
pub use catalog_v1::CatalogV1;
pub use factory::{catalog_adapter, manifest_adapter, supported_catalog_versions, supported_manifest_versions};
pub use graph::{GraphError, GraphMetadata, ProjectGraph};
pub use selection::Selection;
