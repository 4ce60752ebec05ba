//! Manifest v12 adapter (dbt 1.8+)
//!
//! v12 adds unit tests. They are surfaced as `unit_test` nodes whose
//! `depends_on` points at the model under test, so they show up as
//! children of that model like any data test.

use crate::adapter::{AdapterError, DocumentKind, FromDocument};
use crate::wire::{wire_manifest_adapter, Collection, ManifestMetadata};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
struct Document {
    metadata: ManifestMetadata,
    #[serde(default)]
    nodes: Collection,
    #[serde(default)]
    sources: Collection,
    #[serde(default)]
    macros: Collection,
    #[serde(default)]
    exposures: Collection,
    #[serde(default)]
    metrics: Collection,
    #[serde(default)]
    groups: Collection,
    #[serde(default)]
    semantic_models: Collection,
    #[serde(default)]
    saved_queries: Collection,
    #[serde(default)]
    unit_tests: Collection,
}

/// Read view over a v12 manifest
#[derive(Debug, Clone)]
pub struct ManifestV12 {
    document: Document,
}

impl ManifestV12 {
    fn collections(&self) -> [&Collection; 9] {
        let doc = &self.document;
        [
            &doc.nodes,
            &doc.sources,
            &doc.macros,
            &doc.exposures,
            &doc.metrics,
            &doc.groups,
            &doc.semantic_models,
            &doc.saved_queries,
            &doc.unit_tests,
        ]
    }
}

impl FromDocument for ManifestV12 {
    const SCHEMA_VERSION: &'static str = "https://schemas.getdbt.com/dbt/manifest/v12.json";

    fn from_document(document: serde_json::Value) -> Result<Self, AdapterError> {
        let document: Document = crate::factory::decode(DocumentKind::Manifest, Self::SCHEMA_VERSION, document)?;
        Ok(Self { document })
    }
}

wire_manifest_adapter!(ManifestV12);
