//! Manifest v11 adapter (dbt 1.7)
//!
//! v11 adds saved queries on top of the v10 collections.

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
}

/// Read view over a v11 manifest
#[derive(Debug, Clone)]
pub struct ManifestV11 {
    document: Document,
}

impl ManifestV11 {
    fn collections(&self) -> [&Collection; 8] {
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
        ]
    }
}

impl FromDocument for ManifestV11 {
    const SCHEMA_VERSION: &'static str = "https://schemas.getdbt.com/dbt/manifest/v11.json";

    fn from_document(document: serde_json::Value) -> Result<Self, AdapterError> {
        let document: Document = crate::factory::decode(DocumentKind::Manifest, Self::SCHEMA_VERSION, document)?;
        Ok(Self { document })
    }
}

wire_manifest_adapter!(ManifestV11);
