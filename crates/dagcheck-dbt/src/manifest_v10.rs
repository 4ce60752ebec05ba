//! Manifest v10 adapter (dbt 1.5 / 1.6)
//!
//! v10 introduced groups and semantic models next to the classic
//! nodes, sources, macros, exposures and metrics collections.

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
}

/// Read view over a v10 manifest
#[derive(Debug, Clone)]
pub struct ManifestV10 {
    document: Document,
}

impl ManifestV10 {
    fn collections(&self) -> [&Collection; 7] {
        let doc = &self.document;
        [
            &doc.nodes,
            &doc.sources,
            &doc.macros,
            &doc.exposures,
            &doc.metrics,
            &doc.groups,
            &doc.semantic_models,
        ]
    }
}

impl FromDocument for ManifestV10 {
    const SCHEMA_VERSION: &'static str = "https://schemas.getdbt.com/dbt/manifest/v10.json";

    fn from_document(document: serde_json::Value) -> Result<Self, AdapterError> {
        let document: Document = crate::factory::decode(DocumentKind::Manifest, Self::SCHEMA_VERSION, document)?;
        Ok(Self { document })
    }
}

wire_manifest_adapter!(ManifestV10);
