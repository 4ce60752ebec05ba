//! Adapter factory
//!
//! Selects the adapter for a decoded document by exact match on its
//! `metadata.dbt_schema_version` tag. Unknown tags are rejected, never
//! mapped to the closest known version.

use crate::adapter::{AdapterError, CatalogAdapter, DocumentKind, FromDocument, ManifestAdapter};
use crate::catalog_v1::CatalogV1;
use crate::manifest_v10::ManifestV10;
use crate::manifest_v11::ManifestV11;
use crate::manifest_v12::ManifestV12;
use serde::de::DeserializeOwned;
use serde_json::Value;

type ManifestConstructor = fn(Value) -> Result<Box<dyn ManifestAdapter>, AdapterError>;
type CatalogConstructor = fn(Value) -> Result<Box<dyn CatalogAdapter>, AdapterError>;

/// Registered manifest versions. Add a new version by adding one row.
const MANIFEST_ADAPTERS: &[(&str, ManifestConstructor)] = &[
    (ManifestV10::SCHEMA_VERSION, boxed_manifest::<ManifestV10>),
    (ManifestV11::SCHEMA_VERSION, boxed_manifest::<ManifestV11>),
    (ManifestV12::SCHEMA_VERSION, boxed_manifest::<ManifestV12>),
];

/// Registered catalog versions
const CATALOG_ADAPTERS: &[(&str, CatalogConstructor)] = &[
    (CatalogV1::SCHEMA_VERSION, boxed_catalog::<CatalogV1>),
];

fn boxed_manifest<A>(document: Value) -> Result<Box<dyn ManifestAdapter>, AdapterError>
where
    A: FromDocument + ManifestAdapter + 'static,
{
    Ok(Box::new(A::from_document(document)?))
}

fn boxed_catalog<A>(document: Value) -> Result<Box<dyn CatalogAdapter>, AdapterError>
where
    A: FromDocument + CatalogAdapter + 'static,
{
    Ok(Box::new(A::from_document(document)?))
}

/// The `metadata.dbt_schema_version` tag declared by a document
pub fn declared_version(document: &Value) -> Option<&str> {
    document
        .pointer("/metadata/dbt_schema_version")
        .and_then(Value::as_str)
}

fn declared_or_missing(kind: DocumentKind, document: &Value) -> Result<String, AdapterError> {
    declared_version(document)
        .map(str::to_string)
        .ok_or(AdapterError::MissingVersion { document: kind })
}

/// Build the manifest adapter matching the document's declared version
pub fn manifest_adapter(document: Value) -> Result<Box<dyn ManifestAdapter>, AdapterError> {
    let version = declared_or_missing(DocumentKind::Manifest, &document)?;

    let (_, construct) = MANIFEST_ADAPTERS
        .iter()
        .find(|(tag, _)| *tag == version)
        .ok_or(AdapterError::UnsupportedVersion {
            document: DocumentKind::Manifest,
            version: version.clone(),
        })?;

    tracing::debug!(%version, "selected manifest adapter");
    construct(document)
}

/// Build the catalog adapter matching the document's declared version
pub fn catalog_adapter(document: Value) -> Result<Box<dyn CatalogAdapter>, AdapterError> {
    let version = declared_or_missing(DocumentKind::Catalog, &document)?;

    let (_, construct) = CATALOG_ADAPTERS
        .iter()
        .find(|(tag, _)| *tag == version)
        .ok_or(AdapterError::UnsupportedVersion {
            document: DocumentKind::Catalog,
            version: version.clone(),
        })?;

    tracing::debug!(%version, "selected catalog adapter");
    construct(document)
}

/// Manifest schema versions the factory accepts
pub fn supported_manifest_versions() -> Vec<&'static str> {
    MANIFEST_ADAPTERS.iter().map(|(tag, _)| *tag).collect()
}

/// Catalog schema versions the factory accepts
pub fn supported_catalog_versions() -> Vec<&'static str> {
    CATALOG_ADAPTERS.iter().map(|(tag, _)| *tag).collect()
}

/// Decode a document into an adapter's wire type after checking its tag
pub(crate) fn decode<T: DeserializeOwned>(
    kind: DocumentKind,
    expected: &'static str,
    document: Value,
) -> Result<T, AdapterError> {
    let version = declared_or_missing(kind, &document)?;
    if version != expected {
        return Err(AdapterError::UnsupportedVersion {
            document: kind,
            version,
        });
    }

    serde_json::from_value(document).map_err(|e| AdapterError::Decode {
        document: kind,
        version: expected.to_string(),
        message: e.to_string(),
    })
}
