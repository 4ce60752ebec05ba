//! In-memory adapters for testing
//!
//! These adapters hold canonical nodes and tables directly instead of
//! reading a dbt artifact. They're useful for:
//! - Unit testing insights without writing manifest JSON
//! - Embedding dagcheck where the graph comes from somewhere other than dbt
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dagcheck_dbt::mock::{MockManifest, MockNode};
//! use dagcheck_dbt::ProjectGraph;
//!
//! let manifest = MockManifest::new()
//!     .with_node(MockNode::source("source.shop.raw.orders").schema("raw").build())
//!     .with_node(
//!         MockNode::model("model.shop.orders")
//!             .materialized("view")
//!             .depends_on(&["source.shop.raw.orders"])
//!             .build(),
//!     );
//!
//! let graph = ProjectGraph::build(&manifest, None)?;
//! ```

use std::collections::BTreeMap;
use crate::adapter::{AdapterError, CatalogAdapter, CatalogColumn, CatalogTable, ManifestAdapter};
use crate::node::{ColumnInfo, MacroArgument, Node, NodeConfig, NodeId, ResourceType, TestInfo, TestType};

/// Manifest adapter over a fixed set of nodes
#[derive(Debug, Clone, Default)]
pub struct MockManifest {
    nodes: BTreeMap<NodeId, Node>,
}

impl MockManifest {
    /// Create an empty mock manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a node
    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.insert(node.unique_id.clone(), node);
        self
    }

    /// Add several nodes
    pub fn with_nodes(self, nodes: impl IntoIterator<Item = Node>) -> Self {
        nodes.into_iter().fold(self, Self::with_node)
    }
}

impl ManifestAdapter for MockManifest {
    fn schema_version(&self) -> &'static str {
        "mock"
    }

    fn dbt_version(&self) -> &str {
        "mock"
    }

    fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().cloned().collect()
    }

    fn contains(&self, unique_id: &str) -> bool {
        self.nodes.contains_key(unique_id)
    }

    fn resource(&self, unique_id: &str) -> Result<Node, AdapterError> {
        self.nodes
            .get(unique_id)
            .cloned()
            .ok_or_else(|| AdapterError::NotFound(unique_id.to_string()))
    }
}

/// Catalog adapter over a fixed set of tables
#[derive(Debug, Clone, Default)]
pub struct MockCatalog {
    tables: BTreeMap<NodeId, CatalogTable>,
}

impl MockCatalog {
    /// Create an empty mock catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table with the given column names (typed as `TEXT`)
    pub fn with_table(mut self, unique_id: &str, schema: &str, columns: &[&str]) -> Self {
        let name = unique_id.rsplit('.').next().unwrap_or(unique_id).to_string();
        let table = CatalogTable {
            unique_id: unique_id.to_string(),
            database: None,
            schema: schema.to_string(),
            name,
            table_type: "BASE TABLE".to_string(),
            comment: None,
            columns: columns
                .iter()
                .enumerate()
                .map(|(i, col)| CatalogColumn {
                    name: col.to_string(),
                    data_type: "TEXT".to_string(),
                    index: i as u32 + 1,
                    comment: None,
                })
                .collect(),
        };
        self.tables.insert(unique_id.to_string(), table);
        self
    }
}

impl CatalogAdapter for MockCatalog {
    fn schema_version(&self) -> &'static str {
        "mock"
    }

    fn table_ids(&self) -> Vec<NodeId> {
        self.tables.keys().cloned().collect()
    }

    fn contains(&self, unique_id: &str) -> bool {
        self.tables.contains_key(unique_id)
    }

    fn table(&self, unique_id: &str) -> Result<CatalogTable, AdapterError> {
        self.tables
            .get(unique_id)
            .cloned()
            .ok_or_else(|| AdapterError::NotFound(unique_id.to_string()))
    }
}

/// Fluent builder for canonical nodes
///
/// Package name is taken from the second segment of the unique_id.
#[derive(Debug, Clone)]
pub struct MockNode {
    node: Node,
}

impl MockNode {
    /// Start a node of any resource type
    pub fn new(unique_id: &str, resource_type: ResourceType) -> Self {
        let mut parts = unique_id.split('.');
        let package_name = parts.nth(1).unwrap_or_default().to_string();
        let name = unique_id.rsplit('.').next().unwrap_or(unique_id).to_string();

        Self {
            node: Node {
                unique_id: unique_id.to_string(),
                original_file_path: format!("{}/{}.sql", resource_type.as_str(), name),
                path: format!("{}.sql", name),
                name,
                resource_type,
                package_name,
                database: None,
                schema: None,
                alias: None,
                description: String::new(),
                config: NodeConfig::default(),
                tags: Vec::new(),
                depends_on: Vec::new(),
                depends_on_macros: Vec::new(),
                columns: BTreeMap::new(),
                arguments: Vec::new(),
                test: None,
                fqn: Vec::new(),
            },
        }
    }

    pub fn model(unique_id: &str) -> Self {
        Self::new(unique_id, ResourceType::Model)
    }

    pub fn source(unique_id: &str) -> Self {
        Self::new(unique_id, ResourceType::Source)
    }

    pub fn macro_node(unique_id: &str) -> Self {
        Self::new(unique_id, ResourceType::Macro)
    }

    pub fn exposure(unique_id: &str) -> Self {
        Self::new(unique_id, ResourceType::Exposure)
    }

    /// A generic data test (`test_name` as in `test_metadata.name`)
    pub fn generic_test(unique_id: &str, test_name: &str) -> Self {
        let mut builder = Self::new(unique_id, ResourceType::Test);
        builder.node.test = Some(TestInfo {
            test_type: TestType::Generic,
            name: test_name.to_string(),
            namespace: None,
            column_name: None,
        });
        builder
    }

    /// A singular data test
    pub fn singular_test(unique_id: &str) -> Self {
        let mut builder = Self::new(unique_id, ResourceType::Test);
        builder.node.test = Some(TestInfo {
            test_type: TestType::Singular,
            name: builder.node.name.clone(),
            namespace: None,
            column_name: None,
        });
        builder
    }

    pub fn schema(mut self, schema: &str) -> Self {
        self.node.schema = Some(schema.to_string());
        self
    }

    pub fn materialized(mut self, materialized: &str) -> Self {
        self.node.config.materialized = Some(materialized.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.node.description = description.to_string();
        self
    }

    pub fn path(mut self, original_file_path: &str) -> Self {
        self.node.original_file_path = original_file_path.to_string();
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.node.tags.push(tag.to_string());
        self
    }

    pub fn depends_on(mut self, parents: &[&str]) -> Self {
        self.node.depends_on = parents.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Add a documented (or undocumented, with `""`) column
    pub fn column(mut self, name: &str, description: &str) -> Self {
        self.node.columns.insert(
            name.to_string(),
            ColumnInfo {
                name: name.to_string(),
                description: description.to_string(),
                data_type: None,
            },
        );
        self
    }

    /// Add a macro argument
    pub fn argument(mut self, name: &str, description: &str) -> Self {
        self.node.arguments.push(MacroArgument {
            name: name.to_string(),
            arg_type: None,
            description: description.to_string(),
        });
        self
    }

    pub fn build(self) -> Node {
        self.node
    }
}
