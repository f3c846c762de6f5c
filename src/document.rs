//! Per-query accumulator for the discovered subgraph.
//!
//! A [`ProvDocument`] is created fresh for every query, filled by the
//! traversal engine, serialized once and then dropped. Every bucket is an
//! insertion-ordered map keyed by id; inserts are idempotent (the first
//! record for an id wins), which is what makes the recursive walk cycle-safe.

use indexmap::IndexMap;

use crate::model::{
    Activity, ActivityDescription, Agent, Entity, EntityDescription, HadMember, HadStep,
    Parameter, ParameterDescription, Used, WasAssociatedWith, WasAttributedTo, WasDerivedFrom,
    WasGeneratedBy, WasInformedBy,
};

/// The namespace prefixes every document starts with.
///
/// `prov` and `xsd` are defined by the PROV family of standards, the VO
/// namespaces by the IVOA provenance data model; `custom` covers the
/// non-standard extension fields (e.g. storage location).
pub const DEFAULT_PREFIXES: &[(&str, &str)] = &[
    ("voprov", "http://www.ivoa.net/documents/ProvenanceDM/voprov/"),
    ("org", "http://www.ivoa.net/documents/ProvenanceDM/voprov/org/"),
    ("vo", "http://www.ivoa.net/documents/ProvenanceDM/voprov/vo"),
    ("custom", "http://www.ivoa.net/documents/ProvenanceDM/voprov/custom/"),
    ("prov", "http://www.w3.org/ns/prov#"),
    ("xsd", "http://www.w3.org/2000/10/XMLSchema#"),
];

/// Accumulated result subgraph of one lineage query.
#[derive(Debug, Clone, Default)]
pub struct ProvDocument {
    /// Namespace prefix table (name → uri).
    pub prefix: IndexMap<String, String>,

    pub activity: IndexMap<String, Activity>,
    pub activity_flow: IndexMap<String, Activity>,
    pub activity_description: IndexMap<String, ActivityDescription>,
    pub entity: IndexMap<String, Entity>,
    pub collection: IndexMap<String, Entity>,
    pub entity_description: IndexMap<String, EntityDescription>,
    pub agent: IndexMap<String, Agent>,
    pub parameter: IndexMap<String, Parameter>,
    pub parameter_description: IndexMap<String, ParameterDescription>,

    pub used: IndexMap<String, Used>,
    pub was_generated_by: IndexMap<String, WasGeneratedBy>,
    pub was_associated_with: IndexMap<String, WasAssociatedWith>,
    pub was_attributed_to: IndexMap<String, WasAttributedTo>,
    pub had_member: IndexMap<String, HadMember>,
    pub was_derived_from: IndexMap<String, WasDerivedFrom>,
    pub had_step: IndexMap<String, HadStep>,
    pub was_informed_by: IndexMap<String, WasInformedBy>,
}

impl ProvDocument {
    /// Create an empty document with the default namespace table.
    pub fn new() -> Self {
        let mut doc = Self::default();
        for (name, uri) in DEFAULT_PREFIXES {
            doc.prefix.insert((*name).to_string(), (*uri).to_string());
        }
        doc
    }

    /// Create a document with the default namespaces plus caller-supplied ones.
    ///
    /// Caller prefixes override defaults of the same name.
    pub fn with_prefixes<'a>(extra: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut doc = Self::new();
        for (name, uri) in extra {
            doc.prefix.insert(name.to_string(), uri.to_string());
        }
        doc
    }

    /// True if the activity id is present, in either the plain or flow bucket.
    pub fn has_activity(&self, id: &str) -> bool {
        self.activity.contains_key(id) || self.activity_flow.contains_key(id)
    }

    /// True if the entity id is present, in either the plain or collection bucket.
    pub fn has_entity(&self, id: &str) -> bool {
        self.entity.contains_key(id) || self.collection.contains_key(id)
    }

    pub fn has_agent(&self, id: &str) -> bool {
        self.agent.contains_key(id)
    }

    /// Total number of node records.
    pub fn node_count(&self) -> usize {
        self.activity.len()
            + self.activity_flow.len()
            + self.activity_description.len()
            + self.entity.len()
            + self.collection.len()
            + self.entity_description.len()
            + self.agent.len()
            + self.parameter.len()
            + self.parameter_description.len()
    }

    /// Total number of relation records.
    pub fn relation_count(&self) -> usize {
        self.used.len()
            + self.was_generated_by.len()
            + self.was_associated_with.len()
            + self.was_attributed_to.len()
            + self.had_member.len()
            + self.was_derived_from.len()
            + self.had_step.len()
            + self.was_informed_by.len()
    }
}

/// Idempotent insert into an id-keyed bucket.
///
/// Returns true when the id was new. Existing records are never overwritten,
/// so the first path that reaches a node fixes its record for the whole query.
pub fn insert_once<T>(bucket: &mut IndexMap<String, T>, id: &str, value: T) -> bool {
    if bucket.contains_key(id) {
        return false;
    }
    bucket.insert(id.to_string(), value);
    true
}
