//! Canonical, version-independent node model
//!
//! Every manifest adapter translates its document into these types, so
//! nothing downstream of the adapters ever branches on schema version.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Node identifier (unique_id from manifest)
pub type NodeId = String;

/// Resource type of a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceType {
    Model,
    Source,
    Seed,
    Snapshot,
    Test,
    UnitTest,
    Analysis,
    Operation,
    SqlOperation,
    Rpc,
    Macro,
    Exposure,
    Metric,
    Group,
    SemanticModel,
    SavedQuery,
    /// Resource types this crate does not know about are preserved verbatim
    Other(String),
}

impl ResourceType {
    /// Stable string form, as written in the manifest
    pub fn as_str(&self) -> &str {
        match self {
            Self::Model => "model",
            Self::Source => "source",
            Self::Seed => "seed",
            Self::Snapshot => "snapshot",
            Self::Test => "test",
            Self::UnitTest => "unit_test",
            Self::Analysis => "analysis",
            Self::Operation => "operation",
            Self::SqlOperation => "sql_operation",
            Self::Rpc => "rpc",
            Self::Macro => "macro",
            Self::Exposure => "exposure",
            Self::Metric => "metric",
            Self::Group => "group",
            Self::SemanticModel => "semantic_model",
            Self::SavedQuery => "saved_query",
            Self::Other(other) => other,
        }
    }
}

impl From<&str> for ResourceType {
    fn from(value: &str) -> Self {
        match value {
            "model" => Self::Model,
            "source" => Self::Source,
            "seed" => Self::Seed,
            "snapshot" => Self::Snapshot,
            "test" => Self::Test,
            "unit_test" => Self::UnitTest,
            "analysis" => Self::Analysis,
            "operation" => Self::Operation,
            "sql_operation" | "sql operation" => Self::SqlOperation,
            "rpc" => Self::Rpc,
            "macro" => Self::Macro,
            "exposure" => Self::Exposure,
            "metric" => Self::Metric,
            "group" => Self::Group,
            "semantic_model" => Self::SemanticModel,
            "saved_query" => Self::SavedQuery,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ResourceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ResourceType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

/// How a test is declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    /// Generic test applied through YAML (`not_null`, `unique`, ...)
    Generic,

    /// Singular test written as a standalone SQL file
    Singular,

    /// Unit test (manifest v12+)
    Unit,
}

impl TestType {
    /// Stable string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Singular => "singular",
            Self::Unit => "unit",
        }
    }
}

impl std::fmt::Display for TestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Test-specific metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestInfo {
    /// Declaration style
    pub test_type: TestType,

    /// Test name (`test_metadata.name` for generic tests, node name otherwise)
    pub name: String,

    /// Package namespace of a generic test (`dbt_utils`, ...)
    pub namespace: Option<String>,

    /// Column the test is attached to
    pub column_name: Option<String>,
}

/// Declared node configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Whether the node is enabled
    pub enabled: bool,

    /// Materialization type
    pub materialized: Option<String>,

    /// Tags set through config
    pub tags: Vec<String>,

    /// Custom schema from config
    pub schema: Option<String>,

    /// Test severity (tests only)
    pub severity: Option<String>,

    /// Free-form meta
    pub meta: serde_json::Map<String, serde_json::Value>,
}

impl Default for NodeConfig {
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

/// Documented column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub description: String,
    pub data_type: Option<String>,
}

/// Declared macro argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroArgument {
    pub name: String,
    pub arg_type: Option<String>,
    pub description: String,
}

impl MacroArgument {
    /// Whether the argument carries a non-blank description
    pub fn is_documented(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

/// A single entity in the project graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier (e.g., "model.my_project.users")
    pub unique_id: NodeId,

    /// Node name (e.g., "users")
    pub name: String,

    /// Resource type
    pub resource_type: ResourceType,

    /// Package name
    pub package_name: String,

    /// Path relative to the resource directory
    pub path: String,

    /// Original file path relative to the project root
    pub original_file_path: String,

    /// Database name
    pub database: Option<String>,

    /// Schema name
    pub schema: Option<String>,

    /// Alias (output relation name, or source identifier)
    pub alias: Option<String>,

    /// Description
    pub description: String,

    /// Declared configuration
    pub config: NodeConfig,

    /// Tags
    pub tags: Vec<String>,

    /// Parent node identifiers, in declaration order, without duplicates
    pub depends_on: Vec<NodeId>,

    /// Macros this node calls
    pub depends_on_macros: Vec<String>,

    /// Documented columns
    pub columns: BTreeMap<String, ColumnInfo>,

    /// Declared macro arguments (macros only)
    pub arguments: Vec<MacroArgument>,

    /// Test metadata (tests and unit tests only)
    pub test: Option<TestInfo>,

    /// Fully qualified name
    pub fqn: Vec<String>,
}

impl Node {
    /// Whether this node is a data test or unit test
    pub fn is_test(&self) -> bool {
        matches!(self.resource_type, ResourceType::Test | ResourceType::UnitTest)
    }

    /// Configured materialization, if any
    pub fn materialization(&self) -> Option<&str> {
        self.config.materialized.as_deref()
    }

    /// Whether the node carries a tag, either top-level or through config
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().chain(self.config.tags.iter()).any(|t| t == tag)
    }

    /// Path used for selection and reporting
    pub fn file_path(&self) -> &str {
        if self.original_file_path.is_empty() {
            &self.path
        } else {
            &self.original_file_path
        }
    }
}
