//! Typed records of the provenance data model.
//!
//! Nodes (entities, activities, agents and their description records) and
//! relations are plain serde-derived structs keyed by free-form string ids,
//! usually namespace-qualified (`rave:dr4`). The store decides whether an
//! activity is an `ActivityFlow` or an entity a `Collection`; the records
//! themselves carry no subtype marker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp type used for activity start/end and usage/generation times.
pub type ProvTime = DateTime<Utc>;

/// True if the id carries a namespace prefix (`ns:local`).
pub fn is_qualified(id: &str) -> bool {
    id.contains(':')
}

/// Qualify an id with the default blank namespace when it has none.
///
/// The wire formats require every identifier to be a qualified name, so a
/// bare relation id like `7` is exposed as `_:7`.
pub fn qualify(id: &str) -> String {
    if is_qualified(id) {
        id.to_string()
    } else {
        format!("_:{id}")
    }
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// A process step that uses and/or generates entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub r#type: Option<String>,
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub start_time: Option<ProvTime>,
    #[serde(default)]
    pub end_time: Option<ProvTime>,
    #[serde(default)]
    pub doculink: Option<String>,
    /// Id of the [`ActivityDescription`] this activity instantiates.
    #[serde(default)]
    pub description: Option<String>,
}

/// A data artifact in the lineage graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub r#type: Option<String>,
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub rights: Option<String>,
    #[serde(default)]
    pub datatype: Option<String>,
    #[serde(default)]
    pub storage_location: Option<String>,
    /// Id of the [`EntityDescription`] this entity instantiates.
    #[serde(default)]
    pub description: Option<String>,
}

/// A person or organization responsible for activities or entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub r#type: Option<String>,
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Static description shared by activities of the same kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDescription {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub r#type: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub doculink: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Static description shared by entities of the same kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDescription {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub doculink: Option<String>,
}

/// A concrete input value an activity was run with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: String,
    /// Id of the owning [`Activity`].
    pub activity: String,
    #[serde(default)]
    pub value: Option<String>,
    /// Id of the [`ParameterDescription`] for this parameter.
    #[serde(default)]
    pub description: Option<String>,
}

/// Static description of a parameter slot (datatype, unit, bounds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescription {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub datatype: Option<String>,
    #[serde(default)]
    pub xtype: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub ucd: Option<String>,
    #[serde(default)]
    pub utype: Option<String>,
    #[serde(default)]
    pub arraysize: Option<String>,
    #[serde(default)]
    pub minval: Option<String>,
    #[serde(default)]
    pub maxval: Option<String>,
    #[serde(default)]
    pub options: Option<String>,
}

// ---------------------------------------------------------------------------
// Relations
// ---------------------------------------------------------------------------

/// Activity → Entity consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Used {
    pub id: String,
    pub activity: String,
    pub entity: String,
    #[serde(default)]
    pub time: Option<ProvTime>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Entity → Activity production.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasGeneratedBy {
    pub id: String,
    pub entity: String,
    pub activity: String,
    #[serde(default)]
    pub time: Option<ProvTime>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Entity-to-entity shortcut: generated entity ← used entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasDerivedFrom {
    pub id: String,
    pub generated_entity: String,
    pub used_entity: String,
}

/// Activity-to-activity shortcut: informed ← informant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasInformedBy {
    pub id: String,
    pub informed: String,
    pub informant: String,
}

/// Activity → Agent responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasAssociatedWith {
    pub id: String,
    pub activity: String,
    pub agent: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Entity → Agent responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasAttributedTo {
    pub id: String,
    pub entity: String,
    pub agent: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Collection → member Entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HadMember {
    pub id: String,
    pub collection: String,
    pub entity: String,
}

/// ActivityFlow → step Activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HadStep {
    pub id: String,
    pub activity_flow: String,
    pub activity: String,
}

/// Subtype resolved for an activity id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Activity,
    ActivityFlow,
}

/// Subtype resolved for an entity id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Entity,
    Collection,
}
