//! Manifest wire structs shared by the versioned manifest adapters
//!
//! These mirror the JSON shape of manifest resources (subset of fields we
//! care about). Each version adapter decides which collections exist and
//! turns [`WireResource`] values into canonical [`Node`]s; the lookups
//! over those collections live here so the adapters only list them.

use crate::node::{ColumnInfo, MacroArgument, Node, NodeConfig, NodeId, ResourceType, TestInfo, TestType};
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, HashSet};

/// One manifest collection keyed by unique_id
pub type Collection = BTreeMap<String, WireResource>;

/// Find a resource in the first collection that holds it
pub fn find<'a>(collections: &[&'a Collection], unique_id: &str) -> Option<&'a WireResource> {
    collections.iter().find_map(|c| c.get(unique_id))
}

/// Sorted, de-duplicated ids across every collection
pub fn sorted_ids(collections: &[&Collection]) -> Vec<NodeId> {
    let mut ids: Vec<NodeId> = collections.iter().flat_map(|c| c.keys().cloned()).collect();
    ids.sort();
    ids.dedup();
    ids
}

/// Implement [`ManifestAdapter`](crate::adapter::ManifestAdapter) for a
/// versioned manifest that has a `document.metadata` field and a
/// `collections()` method listing its collections.
macro_rules! wire_manifest_adapter {
    ($adapter:ty) => {
        impl $crate::adapter::ManifestAdapter for $adapter {
            fn schema_version(&self) -> &'static str {
                <Self as $crate::adapter::FromDocument>::SCHEMA_VERSION
            }

            fn dbt_version(&self) -> &str {
                &self.document.metadata.dbt_version
            }

            fn node_ids(&self) -> Vec<$crate::node::NodeId> {
                $crate::wire::sorted_ids(&self.collections())
            }

            fn contains(&self, unique_id: &str) -> bool {
                $crate::wire::find(&self.collections(), unique_id).is_some()
            }

            fn resource(&self, unique_id: &str) -> Result<$crate::node::Node, $crate::adapter::AdapterError> {
                $crate::wire::find(&self.collections(), unique_id)
                    .map($crate::wire::WireResource::to_node)
                    .ok_or_else(|| $crate::adapter::AdapterError::NotFound(unique_id.to_string()))
            }
        }
    };
}

pub(crate) use wire_manifest_adapter;

/// Manifest metadata
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ManifestMetadata {
    pub dbt_schema_version: String,
    #[serde(default)]
    pub dbt_version: String,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub invocation_id: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
}

/// Dependencies structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WireDependsOn {
    /// Node unique_ids this resource depends on
    #[serde(default)]
    pub nodes: Vec<String>,

    /// Macro unique_ids this resource calls
    #[serde(default)]
    pub macros: Vec<String>,
}

/// Resource configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub materialized: Option<String>,

    /// dbt accepts either a single tag or a list
    #[serde(default, deserialize_with = "string_or_list")]
    pub tags: Vec<String>,

    #[serde(default)]
    pub schema: Option<String>,

    #[serde(default)]
    pub severity: Option<String>,

    #[serde(default)]
    pub meta: serde_json::Map<String, serde_json::Value>,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            materialized: None,
            tags: Vec::new(),
            schema: None,
            severity: None,
            meta: serde_json::Map::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Column definition from manifest
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireColumn {
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default)]
    pub data_type: Option<String>,
}

/// Macro argument declaration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireMacroArgument {
    pub name: String,
    #[serde(default, rename = "type")]
    pub arg_type: Option<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
}

/// Generic test metadata
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireTestMetadata {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Any manifest resource (node, source, macro, exposure, metric, ...)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireResource {
    pub unique_id: String,
    pub name: String,
    pub resource_type: String,
    pub package_name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub original_file_path: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,

    /// Source table identifier
    #[serde(default)]
    pub identifier: Option<String>,

    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable_config")]
    pub config: WireConfig,
    #[serde(default, deserialize_with = "string_or_list")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub depends_on: WireDependsOn,
    #[serde(default)]
    pub columns: BTreeMap<String, WireColumn>,
    #[serde(default)]
    pub arguments: Vec<WireMacroArgument>,
    #[serde(default)]
    pub test_metadata: Option<WireTestMetadata>,
    #[serde(default)]
    pub column_name: Option<String>,
    #[serde(default)]
    pub fqn: Vec<String>,
}

impl WireResource {
    /// Translate into the canonical node
    pub fn to_node(&self) -> Node {
        let resource_type = ResourceType::from(self.resource_type.as_str());

        Node {
            unique_id: self.unique_id.clone(),
            name: self.name.clone(),
            test: self.test_info(&resource_type),
            resource_type,
            package_name: self.package_name.clone(),
            path: self.path.clone(),
            original_file_path: self.original_file_path.clone(),
            database: self.database.clone(),
            schema: self.schema.clone(),
            alias: self.alias.clone().or_else(|| self.identifier.clone()),
            description: self.description.clone(),
            config: NodeConfig {
                enabled: self.config.enabled,
                materialized: self.config.materialized.clone(),
                tags: self.config.tags.clone(),
                schema: self.config.schema.clone(),
                severity: self.config.severity.clone(),
                meta: self.config.meta.clone(),
            },
            tags: self.tags.clone(),
            depends_on: dedup_preserving_order(&self.depends_on.nodes),
            depends_on_macros: dedup_preserving_order(&self.depends_on.macros),
            columns: self
                .columns
                .iter()
                .map(|(key, col)| {
                    (
                        key.clone(),
                        ColumnInfo {
                            name: col.name.clone(),
                            description: col.description.clone(),
                            data_type: col.data_type.clone(),
                        },
                    )
                })
                .collect(),
            arguments: self
                .arguments
                .iter()
                .map(|arg| MacroArgument {
                    name: arg.name.clone(),
                    arg_type: arg.arg_type.clone(),
                    description: arg.description.clone(),
                })
                .collect(),
            fqn: self.fqn.clone(),
        }
    }

    fn test_info(&self, resource_type: &ResourceType) -> Option<TestInfo> {
        match resource_type {
            ResourceType::Test => Some(match &self.test_metadata {
                Some(meta) => TestInfo {
                    test_type: TestType::Generic,
                    name: meta.name.clone(),
                    namespace: meta.namespace.clone(),
                    column_name: self.column_name.clone(),
                },
                None => TestInfo {
                    test_type: TestType::Singular,
                    name: self.name.clone(),
                    namespace: None,
                    column_name: self.column_name.clone(),
                },
            }),
            ResourceType::UnitTest => Some(TestInfo {
                test_type: TestType::Unit,
                name: self.name.clone(),
                namespace: None,
                column_name: None,
            }),
            _ => None,
        }
    }
}

fn dedup_preserving_order(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn string_or_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(tag)) => vec![tag],
        Some(OneOrMany::Many(tags)) => tags,
    })
}

fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_config<'de, D: Deserializer<'de>>(deserializer: D) -> Result<WireConfig, D::Error> {
    Ok(Option::<WireConfig>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> WireResource {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn tags_accept_string_or_list() {
        let single = decode(json!({
            "unique_id": "model.p.a", "name": "a", "resource_type": "model", "package_name": "p",
            "config": {"tags": "nightly"}, "tags": ["nightly"]
        }));
        assert_eq!(single.config.tags, vec!["nightly".to_string()]);

        let many = decode(json!({
            "unique_id": "model.p.a", "name": "a", "resource_type": "model", "package_name": "p",
            "config": {"tags": ["a", "b"]}
        }));
        assert_eq!(many.config.tags.len(), 2);
    }

    #[test]
    fn null_description_and_config_default() {
        let resource = decode(json!({
            "unique_id": "group.p.finance", "name": "finance", "resource_type": "group",
            "package_name": "p", "description": null, "config": null
        }));
        let node = resource.to_node();
        assert_eq!(node.description, "");
        assert!(node.config.enabled);
    }

    #[test]
    fn generic_and_singular_tests() {
        let generic = decode(json!({
            "unique_id": "test.p.not_null_users_id.abc", "name": "not_null_users_id",
            "resource_type": "test", "package_name": "p", "column_name": "id",
            "test_metadata": {"name": "not_null", "namespace": null, "kwargs": {}}
        }))
        .to_node();
        let info = generic.test.unwrap();
        assert_eq!(info.test_type, TestType::Generic);
        assert_eq!(info.name, "not_null");
        assert_eq!(info.column_name.as_deref(), Some("id"));

        let singular = decode(json!({
            "unique_id": "test.p.assert_positive", "name": "assert_positive",
            "resource_type": "test", "package_name": "p"
        }))
        .to_node();
        let info = singular.test.unwrap();
        assert_eq!(info.test_type, TestType::Singular);
        assert_eq!(info.name, "assert_positive");
    }

    #[test]
    fn duplicate_parents_are_collapsed() {
        let node = decode(json!({
            "unique_id": "model.p.b", "name": "b", "resource_type": "model", "package_name": "p",
            "depends_on": {"nodes": ["model.p.a", "source.p.raw.x", "model.p.a"], "macros": []}
        }))
        .to_node();
        assert_eq!(node.depends_on, vec!["model.p.a".to_string(), "source.p.raw.x".to_string()]);
    }

    #[test]
    fn lookups_span_collections() {
        let model = decode(json!({
            "unique_id": "model.p.a", "name": "a", "resource_type": "model", "package_name": "p"
        }));
        let source = decode(json!({
            "unique_id": "source.p.raw.x", "name": "x", "resource_type": "source", "package_name": "p"
        }));
        let nodes: Collection = BTreeMap::from([(model.unique_id.clone(), model)]);
        let sources: Collection = BTreeMap::from([(source.unique_id.clone(), source.clone())]);
        let collections = [&nodes, &sources, &sources];

        assert_eq!(find(&collections, "source.p.raw.x"), Some(&source));
        assert_eq!(find(&collections, "model.p.missing"), None);
        assert_eq!(sorted_ids(&collections), vec!["model.p.a".to_string(), "source.p.raw.x".to_string()]);
    }

    #[test]
    fn source_identifier_becomes_alias() {
        let node = decode(json!({
            "unique_id": "source.p.raw.orders", "name": "orders", "resource_type": "source",
            "package_name": "p", "schema": "raw", "identifier": "orders_v2"
        }))
        .to_node();
        assert_eq!(node.alias.as_deref(), Some("orders_v2"));
        assert_eq!(node.resource_type, ResourceType::Source);
    }
}
