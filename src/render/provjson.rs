//! PROV-JSON rendering.
//!
//! A single JSON object: the `prefix` table first, then every non-empty
//! bucket keyed by name with its id → field-mapping entries. Buckets with
//! zero entries are omitted entirely rather than emitted as `{}`.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::RenderError;
use crate::serialize::SerializedDocument;

/// Render the document as pretty-printed PROV-JSON.
pub fn render(doc: &SerializedDocument) -> Result<String, RenderError> {
    let mut root: IndexMap<&str, Value> = IndexMap::new();

    root.insert(
        "prefix",
        serde_json::to_value(&doc.prefix).map_err(|source| RenderError::Json { source })?,
    );

    for (name, bucket) in &doc.buckets {
        if bucket.is_empty() {
            continue;
        }
        root.insert(
            name,
            serde_json::to_value(bucket).map_err(|source| RenderError::Json { source })?,
        );
    }

    serde_json::to_string_pretty(&root).map_err(|source| RenderError::Json { source })
}
