//! Configuration schema (dagcheck.toml)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::finding::Severity;
use crate::pattern::GlobPattern;

/// Runner behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Evaluate insights on a thread pool
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Only run these insight aliases (all when empty)
    #[serde(default)]
    pub only: Vec<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            only: Vec::new(),
        }
    }
}

impl RunnerConfig {
    /// Whether an alias passes the `only` filter
    pub fn is_enabled(&self, alias: &str) -> bool {
        self.only.is_empty() || self.only.iter().any(|a| a == alias)
    }
}

fn default_true() -> bool {
    true
}

/// Severity overrides keyed by insight alias
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityThreshold {
    /// Map of insight alias to severity override
    #[serde(default)]
    pub overrides: BTreeMap<String, Severity>,
}

impl SeverityThreshold {
    /// Project-wide override for an alias, if any
    pub fn override_for(&self, alias: &str) -> Option<Severity> {
        self.overrides.get(alias).copied()
    }
}

/// Project-wide node selection
///
/// A node is excluded when it matches any `exclude_*` selector, or when
/// any `include_*` selector is set and the node matches none of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Only analyze nodes whose original file path matches one of these globs
    #[serde(default)]
    pub include_paths: Vec<GlobPattern>,

    /// Skip nodes whose original file path matches one of these globs
    #[serde(default)]
    pub exclude_paths: Vec<GlobPattern>,

    /// Only analyze nodes from these packages
    #[serde(default)]
    pub include_packages: Vec<String>,

    /// Skip nodes from these packages
    #[serde(default)]
    pub exclude_packages: Vec<String>,

    /// Only analyze nodes carrying one of these tags
    #[serde(default)]
    pub include_tags: Vec<String>,

    /// Skip nodes carrying one of these tags
    #[serde(default)]
    pub exclude_tags: Vec<String>,

    /// Skip nodes whose unique_id matches one of these globs
    #[serde(default)]
    pub exclude_nodes: Vec<GlobPattern>,
}

impl SelectionConfig {
    /// True when at least one include selector is configured
    pub fn has_includes(&self) -> bool {
        !self.include_paths.is_empty()
            || !self.include_packages.is_empty()
            || !self.include_tags.is_empty()
    }

    /// True when nothing is selected or excluded
    pub fn is_empty(&self) -> bool {
        !self.has_includes()
            && self.exclude_paths.is_empty()
            && self.exclude_packages.is_empty()
            && self.exclude_tags.is_empty()
            && self.exclude_nodes.is_empty()
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Runner behaviour
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Node selection
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Severity thresholds
    #[serde(default)]
    pub severity: SeverityThreshold,

    /// Per-insight configuration fragments keyed by alias
    #[serde(default)]
    pub insights: BTreeMap<String, serde_json::Value>,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Configuration fragment for one insight
    pub fn fragment(&self, alias: &str) -> Option<&serde_json::Value> {
        self.insights.get(alias)
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
