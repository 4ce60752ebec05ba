//! Node selection
//!
//! Path, package, tag and id selectors are resolved once against the graph
//! into a set of excluded node identifiers. Insights only ever ask
//! "is this id selected?".

use std::collections::BTreeSet;
use dagcheck_core::SelectionConfig;
use crate::graph::ProjectGraph;
use crate::node::{Node, NodeId};

/// Resolved selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    excluded: BTreeSet<NodeId>,
}

impl Selection {
    /// Everything selected
    pub fn all() -> Self {
        Self::default()
    }

    /// Resolve selectors against every node of the graph
    pub fn resolve(graph: &ProjectGraph, config: &SelectionConfig) -> Self {
        if config.is_empty() {
            return Self::all();
        }

        let excluded: BTreeSet<NodeId> = graph
            .nodes()
            .filter(|node| is_excluded(node, config))
            .map(|node| node.unique_id.clone())
            .collect();

        tracing::debug!(excluded = excluded.len(), "selection resolved");

        Self { excluded }
    }

    /// Whether an insight should look at `node_id`
    pub fn is_selected(&self, node_id: &str) -> bool {
        !self.excluded.contains(node_id)
    }

    /// Excluded identifiers, sorted
    pub fn excluded(&self) -> &BTreeSet<NodeId> {
        &self.excluded
    }
}

fn is_excluded(node: &Node, config: &SelectionConfig) -> bool {
    let path = node.file_path();

    let excluded = config.exclude_paths.iter().any(|p| p.matches(path))
        || config.exclude_packages.iter().any(|p| p == &node.package_name)
        || config.exclude_tags.iter().any(|t| node.has_tag(t))
        || config.exclude_nodes.iter().any(|p| p.matches(&node.unique_id));

    if excluded {
        return true;
    }

    if !config.has_includes() {
        return false;
    }

    let included = config.include_paths.iter().any(|p| p.matches(path))
        || config.include_packages.iter().any(|p| p == &node.package_name)
        || config.include_tags.iter().any(|t| node.has_tag(t));

    !included
}
