//! Module metadata extraction and storage.
//!
//! A module may embed a declarative descriptor document shaped
//! `{"MetaData": {"name": ..., ...}}`. The parsers here are tolerant by
//! design: absence of the document, an empty nested object, and a missing
//! `name` are all "no usable metadata" outcomes, never errors. A module
//! without metadata still loads.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fixed key under which the declarative section is nested.
pub const METADATA_KEY: &str = "MetaData";

/// Parsed module metadata.
///
/// Immutable value type once parsed; `is_valid()` holds iff `name` is
/// non-empty. All other fields may stay empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleMetadata {
    /// Module name (required for validity).
    pub name: String,

    /// Module version.
    pub version: String,

    /// Human-readable description.
    pub description: String,

    /// Author.
    pub author: String,

    /// Module type tag (e.g. "core").
    #[serde(rename = "type")]
    pub module_type: String,

    /// Declared dependency names, in declaration order. Recorded only;
    /// never resolved or validated.
    pub dependencies: Vec<String>,

    /// Every field of the source descriptor object, preserved verbatim.
    #[serde(skip)]
    pub raw_fields: Map<String, Value>,
}

impl ModuleMetadata {
    /// Whether this record carries at least a name.
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }

    /// Parse a bare field map (the inner `MetaData` object).
    ///
    /// Always returns a record; the caller must check [`is_valid`]. Every
    /// key is copied into `raw_fields` unchanged; the typed fields are
    /// promoted on top of that. Non-string values coerce to empty strings.
    ///
    /// [`is_valid`]: ModuleMetadata::is_valid
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        let text = |key: &str| -> String {
            fields
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let dependencies = fields
            .get("dependencies")
            .and_then(Value::as_array)
            .map(|deps| {
                deps.iter()
                    .filter_map(Value::as_str)
                    .filter(|dep| !dep.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name: text("name"),
            version: text("version"),
            description: text("description"),
            author: text("author"),
            module_type: text("type"),
            dependencies,
            raw_fields: fields.clone(),
        }
    }

    /// Parse a full descriptor document, expecting the nested
    /// [`METADATA_KEY`] object.
    ///
    /// Returns `None` when the nested object is absent or empty, and also
    /// when it parses into an invalid record (missing `name`). The two
    /// cases stay API-equivalent but are logged distinctly.
    pub fn from_descriptor(raw: &Value) -> Option<Self> {
        let fields = match raw.get(METADATA_KEY).and_then(Value::as_object) {
            Some(fields) if !fields.is_empty() => fields,
            _ => {
                tracing::warn!("no {} section found in module descriptor", METADATA_KEY);
                return None;
            }
        };

        let metadata = Self::from_fields(fields);
        if !metadata.is_valid() {
            tracing::warn!(
                "{} section present but missing a usable name; treating as no metadata",
                METADATA_KEY
            );
            return None;
        }

        Some(metadata)
    }

    /// Read the embedded descriptor from a module binary without
    /// instantiating it.
    ///
    /// Returns `None` when the binary cannot be resolved, exports no
    /// descriptor, or carries no usable metadata. Never fails.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let raw = match crate::handle::read_embedded_metadata(path) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::warn!("no metadata found in module: {}", path.display());
                return None;
            }
            Err(e) => {
                tracing::warn!("metadata extraction failed for {}: {}", path.display(), e);
                return None;
            }
        };
        Self::from_descriptor(&raw)
    }
}
