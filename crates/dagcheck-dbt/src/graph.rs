//! Project graph construction and lookup
//!
//! The canonical, adapter-independent graph: a node index plus the
//! children index derived by inverting every node's `depends_on`.
//! Built once, read-only afterwards, safe to share across threads.

use std::collections::{BTreeMap, BTreeSet};
use crate::adapter::{AdapterError, CatalogAdapter, ManifestAdapter};
use crate::node::{Node, NodeId, ResourceType};

/// Graph lookup errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("Node not found in project graph: {0}")]
    NotFound(String),
}

/// Facts about the documents the graph was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphMetadata {
    /// Manifest schema version tag
    pub manifest_version: String,

    /// dbt version that wrote the manifest
    pub dbt_version: String,

    /// Catalog schema version tag, when a catalog was supplied
    pub catalog_version: Option<String>,
}

/// Node index with derived child edges
pub struct ProjectGraph {
    /// All nodes by unique_id
    nodes: BTreeMap<NodeId, Node>,

    /// Reverse edges: node -> nodes that depend on it
    children: BTreeMap<NodeId, BTreeSet<NodeId>>,

    /// Physical metadata, when available
    catalog: Option<Box<dyn CatalogAdapter>>,

    metadata: GraphMetadata,
}

impl std::fmt::Debug for ProjectGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectGraph")
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edge_count())
            .field("has_catalog", &self.catalog.is_some())
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl ProjectGraph {
    /// Build the graph from a manifest adapter and an optional catalog adapter
    pub fn build(
        manifest: &dyn ManifestAdapter,
        catalog: Option<Box<dyn CatalogAdapter>>,
    ) -> Result<Self, AdapterError> {
        let nodes: BTreeMap<NodeId, Node> = manifest.all_nodes()?.into_iter().collect();

        let mut children: BTreeMap<NodeId, BTreeSet<NodeId>> = BTreeMap::new();
        for (node_id, node) in &nodes {
            for parent_id in &node.depends_on {
                children
                    .entry(parent_id.clone())
                    .or_default()
                    .insert(node_id.clone());
            }
        }

        let metadata = GraphMetadata {
            manifest_version: manifest.schema_version().to_string(),
            dbt_version: manifest.dbt_version().to_string(),
            catalog_version: catalog.as_ref().map(|c| c.schema_version().to_string()),
        };

        let graph = Self {
            nodes,
            children,
            catalog,
            metadata,
        };

        let dangling = graph.dangling_parents();
        if !dangling.is_empty() {
            tracing::debug!(count = dangling.len(), ids = ?dangling, "depends_on references without a node");
        }

        tracing::info!(
            nodes = graph.len(),
            edges = graph.edge_count(),
            catalog_tables = graph.catalog().map_or(0, |c| c.table_ids().len()),
            "project graph built"
        );

        Ok(graph)
    }

    /// Get a node, failing with [`GraphError::NotFound`] when absent
    pub fn node(&self, node_id: &str) -> Result<&Node, GraphError> {
        self.nodes
            .get(node_id)
            .ok_or_else(|| GraphError::NotFound(node_id.to_string()))
    }

    /// Get a node if present
    pub fn get(&self, node_id: &str) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    /// Whether the graph has a node for `node_id`
    pub fn contains(&self, node_id: &str) -> bool {
        self.nodes.contains_key(node_id)
    }

    /// Get immediate children (dependents) of a node, in identifier order
    ///
    /// Also answers for identifiers that only appear as a parent reference.
    pub fn children(&self, node_id: &str) -> Vec<&NodeId> {
        self.children
            .get(node_id)
            .map(|deps| deps.iter().collect())
            .unwrap_or_default()
    }

    /// Get immediate parents (declared dependencies) of a node
    pub fn parents(&self, node_id: &str) -> &[NodeId] {
        self.nodes
            .get(node_id)
            .map(|node| node.depends_on.as_slice())
            .unwrap_or_default()
    }

    /// All nodes in identifier order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Nodes of one resource type, in identifier order
    pub fn nodes_of_type(&self, resource_type: &ResourceType) -> impl Iterator<Item = &Node> + '_ {
        let resource_type = resource_type.clone();
        self.nodes
            .values()
            .filter(move |node| node.resource_type == resource_type)
    }

    /// Parent identifiers referenced by some `depends_on` but absent from the graph
    pub fn dangling_parents(&self) -> Vec<&NodeId> {
        self.children
            .keys()
            .filter(|id| !self.nodes.contains_key(*id))
            .collect()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of distinct parent -> child edges
    pub fn edge_count(&self) -> usize {
        self.children.values().map(BTreeSet::len).sum()
    }

    /// Catalog adapter, when a catalog was supplied
    pub fn catalog(&self) -> Option<&dyn CatalogAdapter> {
        self.catalog.as_deref()
    }

    /// Whether a catalog was supplied
    pub fn has_catalog(&self) -> bool {
        self.catalog.is_some()
    }

    /// Source document facts
    pub fn metadata(&self) -> &GraphMetadata {
        &self.metadata
    }
}
