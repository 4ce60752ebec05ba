//! Per-insight evaluation context
//!
//! What an insight sees while it runs: the read-only graph, the resolved
//! selection, its own configuration fragment, and its severity resolver.

use dagcheck_core::Finding;
use dagcheck_dbt::{Node, ProjectGraph, ResourceType, Selection};
use serde::de::DeserializeOwned;
use serde_json::Value;
use crate::error::InsightError;
use crate::insight::InsightMeta;
use crate::severity::SeverityResolver;

pub struct InsightContext<'a> {
    graph: &'a ProjectGraph,
    selection: &'a Selection,
    meta: &'static InsightMeta,
    fragment: Value,
    severity: SeverityResolver,
}

impl<'a> InsightContext<'a> {
    pub fn new(
        graph: &'a ProjectGraph,
        selection: &'a Selection,
        meta: &'static InsightMeta,
        fragment: Value,
        severity: SeverityResolver,
    ) -> Self {
        Self {
            graph,
            selection,
            meta,
            fragment,
            severity,
        }
    }

    /// Context with an empty fragment and default severity
    pub fn with_defaults(graph: &'a ProjectGraph, selection: &'a Selection, meta: &'static InsightMeta) -> Self {
        Self::new(
            graph,
            selection,
            meta,
            Value::Object(Default::default()),
            SeverityResolver::new(meta.default_severity),
        )
    }

    pub fn graph(&self) -> &'a ProjectGraph {
        self.graph
    }

    pub fn meta(&self) -> &'static InsightMeta {
        self.meta
    }

    /// Selected nodes of one resource type, in identifier order
    pub fn candidates(&self, resource_type: &ResourceType) -> Vec<&'a Node> {
        self.graph
            .nodes_of_type(resource_type)
            .filter(|node| {
                let selected = self.selection.is_selected(&node.unique_id);
                if !selected {
                    tracing::debug!(
                        insight = self.meta.alias,
                        node = %node.unique_id,
                        "skipping node outside selection"
                    );
                }
                selected
            })
            .collect()
    }

    pub fn is_selected(&self, node_id: &str) -> bool {
        self.selection.is_selected(node_id)
    }

    /// Typed options from the fragment; missing keys take serde defaults
    pub fn options<T: DeserializeOwned>(&self) -> Result<T, InsightError> {
        serde_json::from_value(self.fragment.clone()).map_err(|e| InsightError::InvalidOptions {
            alias: self.meta.alias.to_string(),
            message: e.to_string(),
        })
    }

    pub fn severity_for(&self, node_id: &str) -> dagcheck_core::Severity {
        self.severity.resolve(node_id)
    }

    /// Start a finding about `node` with identity, subject and severity filled in
    pub fn finding(&self, node: &Node, message: impl Into<String>) -> Finding {
        Finding::new(
            self.meta.name,
            self.meta.alias,
            self.meta.kind,
            self.severity_for(&node.unique_id),
            message,
        )
        .for_node(
            node.unique_id.clone(),
            Some(node.package_name.clone()),
            Some(node.file_path().to_string()),
        )
        .with_reason(self.meta.reason_to_flag)
    }
}
