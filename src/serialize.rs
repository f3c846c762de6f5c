//! Profile-driven serialization of an accumulated document.
//!
//! Every node and relation becomes a flat, insertion-ordered field mapping
//! with namespace-qualified keys. Which keys, and which bucket a record lands
//! in, depends on the compliance profile:
//!
//! - **VOProv**: every bucket keeps its own name and every field is
//!   `voprov:*` (a few non-standard ones are `custom:*`).
//! - **W3C**: fields covered by the W3C PROV-DM core take `prov:*` keys;
//!   VO-specific extensions stay `voprov:*`. Subtypes W3C does not know
//!   (ActivityFlow, Collection, the description records, parameters) fold
//!   into the generic `activity`/`entity` buckets, tagged with a
//!   `voprov:votype` field naming the real subtype.
//!
//! Field selection is table-driven: one static descriptor table per
//! (record kind × profile), mapping keys to accessor functions. Fields whose
//! value is absent or empty are omitted, never emitted as placeholders.

use indexmap::IndexMap;

use crate::document::ProvDocument;
use crate::model::{
    is_qualified, qualify, Activity, ActivityDescription, Agent, Entity, EntityDescription,
    HadMember, HadStep, Parameter, ParameterDescription, ProvTime, Used, WasAssociatedWith,
    WasAttributedTo, WasDerivedFrom, WasGeneratedBy, WasInformedBy,
};

/// Compliance profile selected per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// IVOA VOProv field naming, subtype buckets kept.
    #[default]
    VoProv,
    /// W3C PROV-DM field naming, subtypes folded and votype-tagged.
    W3c,
}

/// One serialized record: qualified key → value, in emission order.
pub type FieldMap = IndexMap<String, String>;

/// One serialized bucket: id → record.
pub type Bucket = IndexMap<String, FieldMap>;

/// The fully serialized document, ready for any renderer.
#[derive(Debug, Clone)]
pub struct SerializedDocument {
    pub profile: Profile,
    /// Namespace prefix table (name → uri).
    pub prefix: IndexMap<String, String>,
    /// Buckets in rendering order; may be empty.
    pub buckets: IndexMap<&'static str, Bucket>,
}

impl SerializedDocument {
    /// Look up a bucket by name, treating a missing bucket as empty.
    pub fn bucket(&self, name: &str) -> Option<&Bucket> {
        self.buckets.get(name)
    }
}

// ---------------------------------------------------------------------------
// Field descriptor tables
// ---------------------------------------------------------------------------

type Getter<T> = fn(&T) -> Option<String>;
type FieldTable<T> = &'static [(&'static str, Getter<T>)];

fn opt(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|s| !s.is_empty()).map(str::to_string)
}

fn fmt_time(value: &Option<ProvTime>) -> Option<String> {
    value.map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
}

fn map_fields<T>(record: &T, table: FieldTable<T>) -> FieldMap {
    let mut map = FieldMap::new();
    for (key, get) in table {
        if let Some(value) = get(record) {
            map.insert((*key).to_string(), value);
        }
    }
    map
}

const ACTIVITY_VOPROV: FieldTable<Activity> = &[
    ("voprov:id", |a: &Activity| Some(a.id.clone())),
    ("voprov:name", |a: &Activity| opt(&a.name)),
    ("voprov:type", |a: &Activity| opt(&a.r#type)),
    ("voprov:annotation", |a: &Activity| opt(&a.annotation)),
    ("voprov:startTime", |a: &Activity| fmt_time(&a.start_time)),
    ("voprov:endTime", |a: &Activity| fmt_time(&a.end_time)),
    ("voprov:doculink", |a: &Activity| opt(&a.doculink)),
    ("voprov:description", |a: &Activity| opt(&a.description)),
];

const ACTIVITY_W3C: FieldTable<Activity> = &[
    ("prov:id", |a: &Activity| Some(a.id.clone())),
    ("prov:label", |a: &Activity| opt(&a.name)),
    ("prov:type", |a: &Activity| opt(&a.r#type)),
    ("prov:description", |a: &Activity| opt(&a.annotation)),
    ("prov:startTime", |a: &Activity| fmt_time(&a.start_time)),
    ("prov:endTime", |a: &Activity| fmt_time(&a.end_time)),
    ("voprov:doculink", |a: &Activity| opt(&a.doculink)),
    ("voprov:description", |a: &Activity| opt(&a.description)),
];

/// W3C has no activityFlow; the votype tag preserves the subtype.
const ACTIVITY_FLOW_W3C: FieldTable<Activity> = &[
    ("prov:id", |a: &Activity| Some(a.id.clone())),
    ("prov:label", |a: &Activity| opt(&a.name)),
    ("prov:type", |a: &Activity| opt(&a.r#type)),
    ("prov:description", |a: &Activity| opt(&a.annotation)),
    ("prov:startTime", |a: &Activity| fmt_time(&a.start_time)),
    ("prov:endTime", |a: &Activity| fmt_time(&a.end_time)),
    ("voprov:votype", |_| Some("voprov:activityFlow".to_string())),
    ("voprov:doculink", |a: &Activity| opt(&a.doculink)),
    ("voprov:description", |a: &Activity| opt(&a.description)),
];

const ENTITY_VOPROV: FieldTable<Entity> = &[
    ("voprov:id", |e: &Entity| Some(e.id.clone())),
    ("voprov:name", |e: &Entity| opt(&e.name)),
    ("voprov:type", |e: &Entity| opt(&e.r#type)),
    ("voprov:annotation", |e: &Entity| opt(&e.annotation)),
    ("voprov:rights", |e: &Entity| opt(&e.rights)),
    ("voprov:description", |e: &Entity| opt(&e.description)),
    ("custom:datatype", |e: &Entity| opt(&e.datatype)),
    ("custom:storageLocation", |e: &Entity| opt(&e.storage_location)),
];

const ENTITY_W3C: FieldTable<Entity> = &[
    ("prov:id", |e: &Entity| Some(e.id.clone())),
    ("prov:label", |e: &Entity| opt(&e.name)),
    ("prov:type", |e: &Entity| opt(&e.r#type)),
    ("prov:description", |e: &Entity| opt(&e.annotation)),
    ("voprov:rights", |e: &Entity| opt(&e.rights)),
    ("voprov:description", |e: &Entity| opt(&e.description)),
    ("custom:datatype", |e: &Entity| opt(&e.datatype)),
    ("custom:storageLocation", |e: &Entity| opt(&e.storage_location)),
];

const COLLECTION_W3C: FieldTable<Entity> = &[
    ("prov:id", |e: &Entity| Some(e.id.clone())),
    ("prov:label", |e: &Entity| opt(&e.name)),
    ("prov:type", |e: &Entity| opt(&e.r#type)),
    ("prov:description", |e: &Entity| opt(&e.annotation)),
    ("voprov:rights", |e: &Entity| opt(&e.rights)),
    ("voprov:description", |e: &Entity| opt(&e.description)),
    ("custom:datatype", |e: &Entity| opt(&e.datatype)),
    ("custom:storageLocation", |e: &Entity| opt(&e.storage_location)),
    ("voprov:votype", |_| Some("voprov:collection".to_string())),
];

const AGENT_VOPROV: FieldTable<Agent> = &[
    ("voprov:id", |a: &Agent| Some(a.id.clone())),
    ("voprov:name", |a: &Agent| opt(&a.name)),
    ("voprov:type", |a: &Agent| opt(&a.r#type)),
    ("voprov:email", |a: &Agent| opt(&a.email)),
    ("voprov:address", |a: &Agent| opt(&a.address)),
    ("voprov:annotation", |a: &Agent| opt(&a.annotation)),
];

const AGENT_W3C: FieldTable<Agent> = &[
    ("prov:id", |a: &Agent| Some(a.id.clone())),
    ("prov:label", |a: &Agent| opt(&a.name)),
    ("prov:type", |a: &Agent| opt(&a.r#type)),
    ("voprov:email", |a: &Agent| opt(&a.email)),
    ("voprov:address", |a: &Agent| opt(&a.address)),
    ("prov:description", |a: &Agent| opt(&a.annotation)),
];

const ACTIVITY_DESCRIPTION_VOPROV: FieldTable<ActivityDescription> = &[
    ("voprov:id", |d: &ActivityDescription| Some(d.id.clone())),
    ("voprov:name", |d: &ActivityDescription| opt(&d.name)),
    ("voprov:type", |d: &ActivityDescription| opt(&d.r#type)),
    ("voprov:subtype", |d: &ActivityDescription| opt(&d.subtype)),
    ("voprov:annotation", |d: &ActivityDescription| opt(&d.annotation)),
    ("voprov:doculink", |d: &ActivityDescription| opt(&d.doculink)),
    ("voprov:code", |d: &ActivityDescription| opt(&d.code)),
    ("voprov:version", |d: &ActivityDescription| opt(&d.version)),
];

const ACTIVITY_DESCRIPTION_W3C: FieldTable<ActivityDescription> = &[
    ("prov:id", |d: &ActivityDescription| Some(d.id.clone())),
    ("prov:label", |d: &ActivityDescription| opt(&d.name)),
    ("voprov:votype", |_| Some("voprov:activityDescription".to_string())),
    ("prov:type", |d: &ActivityDescription| opt(&d.r#type)),
    ("voprov:subtype", |d: &ActivityDescription| opt(&d.subtype)),
    ("prov:description", |d: &ActivityDescription| opt(&d.annotation)),
    ("voprov:doculink", |d: &ActivityDescription| opt(&d.doculink)),
    ("voprov:code", |d: &ActivityDescription| opt(&d.code)),
    ("voprov:version", |d: &ActivityDescription| opt(&d.version)),
];

const ENTITY_DESCRIPTION_VOPROV: FieldTable<EntityDescription> = &[
    ("voprov:id", |d: &EntityDescription| Some(d.id.clone())),
    ("voprov:name", |d: &EntityDescription| opt(&d.name)),
    ("voprov:annotation", |d: &EntityDescription| opt(&d.annotation)),
    ("voprov:category", |d: &EntityDescription| opt(&d.category)),
    ("voprov:doculink", |d: &EntityDescription| opt(&d.doculink)),
];

const ENTITY_DESCRIPTION_W3C: FieldTable<EntityDescription> = &[
    ("prov:id", |d: &EntityDescription| Some(d.id.clone())),
    ("prov:label", |d: &EntityDescription| opt(&d.name)),
    ("voprov:votype", |_| Some("voprov:entityDescription".to_string())),
    ("prov:description", |d: &EntityDescription| opt(&d.annotation)),
    ("voprov:category", |d: &EntityDescription| opt(&d.category)),
    ("voprov:doculink", |d: &EntityDescription| opt(&d.doculink)),
];

const PARAMETER_VOPROV: FieldTable<Parameter> = &[
    ("voprov:id", |p: &Parameter| Some(p.id.clone())),
    ("voprov:activity", |p: &Parameter| Some(p.activity.clone())),
    ("voprov:value", |p: &Parameter| opt(&p.value)),
    ("voprov:description", |p: &Parameter| opt(&p.description)),
];

const PARAMETER_DESCRIPTION_VOPROV: FieldTable<ParameterDescription> = &[
    ("voprov:id", |d: &ParameterDescription| Some(d.id.clone())),
    ("voprov:name", |d: &ParameterDescription| opt(&d.name)),
    ("voprov:annotation", |d: &ParameterDescription| opt(&d.annotation)),
    ("voprov:datatype", |d: &ParameterDescription| opt(&d.datatype)),
    ("voprov:xtype", |d: &ParameterDescription| opt(&d.xtype)),
    ("voprov:unit", |d: &ParameterDescription| opt(&d.unit)),
    ("voprov:ucd", |d: &ParameterDescription| opt(&d.ucd)),
    ("voprov:utype", |d: &ParameterDescription| opt(&d.utype)),
    ("voprov:arraysize", |d: &ParameterDescription| opt(&d.arraysize)),
    ("voprov:minval", |d: &ParameterDescription| opt(&d.minval)),
    ("voprov:maxval", |d: &ParameterDescription| opt(&d.maxval)),
    ("voprov:options", |d: &ParameterDescription| opt(&d.options)),
];

// Relation tables: the record id never appears here; it is the bucket key
// (and is re-introduced as prov:id/voprov:id only when already qualified).

const USED_VOPROV: FieldTable<Used> = &[
    ("voprov:activity", |u: &Used| Some(u.activity.clone())),
    ("voprov:entity", |u: &Used| Some(u.entity.clone())),
    ("voprov:time", |u: &Used| fmt_time(&u.time)),
    ("voprov:role", |u: &Used| opt(&u.role)),
];

const USED_W3C: FieldTable<Used> = &[
    ("prov:activity", |u: &Used| Some(u.activity.clone())),
    ("prov:entity", |u: &Used| Some(u.entity.clone())),
    ("prov:time", |u: &Used| fmt_time(&u.time)),
    ("prov:role", |u: &Used| opt(&u.role)),
];

const WAS_GENERATED_BY_VOPROV: FieldTable<WasGeneratedBy> = &[
    ("voprov:entity", |w: &WasGeneratedBy| Some(w.entity.clone())),
    ("voprov:activity", |w: &WasGeneratedBy| Some(w.activity.clone())),
    ("voprov:time", |w: &WasGeneratedBy| fmt_time(&w.time)),
    ("voprov:role", |w: &WasGeneratedBy| opt(&w.role)),
];

const WAS_GENERATED_BY_W3C: FieldTable<WasGeneratedBy> = &[
    ("prov:entity", |w: &WasGeneratedBy| Some(w.entity.clone())),
    ("prov:activity", |w: &WasGeneratedBy| Some(w.activity.clone())),
    ("prov:time", |w: &WasGeneratedBy| fmt_time(&w.time)),
    ("prov:role", |w: &WasGeneratedBy| opt(&w.role)),
];

const WAS_DERIVED_FROM_VOPROV: FieldTable<WasDerivedFrom> = &[
    ("voprov:generatedEntity", |w: &WasDerivedFrom| Some(w.generated_entity.clone())),
    ("voprov:usedEntity", |w: &WasDerivedFrom| Some(w.used_entity.clone())),
];

const WAS_DERIVED_FROM_W3C: FieldTable<WasDerivedFrom> = &[
    ("prov:generatedEntity", |w: &WasDerivedFrom| Some(w.generated_entity.clone())),
    ("prov:usedEntity", |w: &WasDerivedFrom| Some(w.used_entity.clone())),
];

const WAS_INFORMED_BY_VOPROV: FieldTable<WasInformedBy> = &[
    ("voprov:informed", |w: &WasInformedBy| Some(w.informed.clone())),
    ("voprov:informant", |w: &WasInformedBy| Some(w.informant.clone())),
];

const WAS_INFORMED_BY_W3C: FieldTable<WasInformedBy> = &[
    ("prov:informed", |w: &WasInformedBy| Some(w.informed.clone())),
    ("prov:informant", |w: &WasInformedBy| Some(w.informant.clone())),
];

const WAS_ASSOCIATED_WITH_VOPROV: FieldTable<WasAssociatedWith> = &[
    ("voprov:activity", |w: &WasAssociatedWith| Some(w.activity.clone())),
    ("voprov:agent", |w: &WasAssociatedWith| Some(w.agent.clone())),
    ("voprov:role", |w: &WasAssociatedWith| opt(&w.role)),
];

const WAS_ASSOCIATED_WITH_W3C: FieldTable<WasAssociatedWith> = &[
    ("prov:activity", |w: &WasAssociatedWith| Some(w.activity.clone())),
    ("prov:agent", |w: &WasAssociatedWith| Some(w.agent.clone())),
    ("prov:role", |w: &WasAssociatedWith| opt(&w.role)),
];

// Role is not W3C-legal on an attribution, so it keeps the voprov namespace
// under both profiles.
const WAS_ATTRIBUTED_TO_VOPROV: FieldTable<WasAttributedTo> = &[
    ("voprov:entity", |w: &WasAttributedTo| Some(w.entity.clone())),
    ("voprov:agent", |w: &WasAttributedTo| Some(w.agent.clone())),
    ("voprov:role", |w: &WasAttributedTo| opt(&w.role)),
];

const WAS_ATTRIBUTED_TO_W3C: FieldTable<WasAttributedTo> = &[
    ("prov:entity", |w: &WasAttributedTo| Some(w.entity.clone())),
    ("prov:agent", |w: &WasAttributedTo| Some(w.agent.clone())),
    ("voprov:role", |w: &WasAttributedTo| opt(&w.role)),
];

const HAD_MEMBER_VOPROV: FieldTable<HadMember> = &[
    ("voprov:collection", |h: &HadMember| Some(h.collection.clone())),
    ("voprov:entity", |h: &HadMember| Some(h.entity.clone())),
];

const HAD_MEMBER_W3C: FieldTable<HadMember> = &[
    ("prov:collection", |h: &HadMember| Some(h.collection.clone())),
    ("prov:entity", |h: &HadMember| Some(h.entity.clone())),
];

const HAD_STEP_VOPROV: FieldTable<HadStep> = &[
    ("voprov:activityFlow", |h: &HadStep| Some(h.activity_flow.clone())),
    ("voprov:activity", |h: &HadStep| Some(h.activity.clone())),
];

/// W3C has no hadStep; it degrades to a wasInfluencedBy with a votype tag.
const HAD_STEP_W3C: FieldTable<HadStep> = &[
    ("prov:influencee", |h: &HadStep| Some(h.activity_flow.clone())),
    ("prov:influencer", |h: &HadStep| Some(h.activity.clone())),
    ("voprov:votype", |_| Some("voprov:hadStep".to_string())),
];

// ---------------------------------------------------------------------------
// Document assembly
// ---------------------------------------------------------------------------

fn id_key(profile: Profile) -> &'static str {
    match profile {
        Profile::VoProv => "voprov:id",
        Profile::W3c => "prov:id",
    }
}

fn node_bucket<T>(records: &IndexMap<String, T>, table: FieldTable<T>) -> Bucket {
    records.iter().map(|(id, record)| (id.clone(), map_fields(record, table))).collect()
}

fn fold_into<T>(bucket: &mut Bucket, records: &IndexMap<String, T>, table: FieldTable<T>) {
    for (id, record) in records {
        bucket.insert(id.clone(), map_fields(record, table));
    }
}

/// Serialize a relation: the bucket key is the qualified id, and the raw id
/// comes back as the record's first field only when it was already qualified.
fn relation_bucket<T>(
    records: &IndexMap<String, T>,
    table: FieldTable<T>,
    profile: Profile,
) -> Bucket {
    let mut bucket = Bucket::new();
    for (id, record) in records {
        let mut map = FieldMap::new();
        if is_qualified(id) {
            map.insert(id_key(profile).to_string(), id.clone());
        }
        map.extend(map_fields(record, table));
        bucket.insert(qualify(id), map);
    }
    bucket
}

/// W3C folding of a parameter: the linked description's fields are flattened
/// into the parameter's entity record.
fn w3c_parameter_fields(param: &Parameter, desc: Option<&ParameterDescription>) -> FieldMap {
    let mut map = FieldMap::new();
    map.insert("prov:id".to_string(), param.id.clone());
    if let Some(value) = opt(&param.value) {
        map.insert("prov:value".to_string(), value);
    }
    if let Some(desc) = desc {
        if let Some(label) = opt(&desc.name) {
            map.insert("prov:label".to_string(), label);
        }
        if let Some(annotation) = opt(&desc.annotation) {
            map.insert("prov:description".to_string(), annotation);
        }
    }
    map.insert("voprov:votype".to_string(), "voprov:parameter".to_string());
    map.insert("voprov:activity".to_string(), param.activity.clone());
    if let Some(desc) = desc {
        let extension_fields: &[(&str, Getter<ParameterDescription>)] = &[
            ("voprov:datatype", |d: &ParameterDescription| opt(&d.datatype)),
            ("voprov:xtype", |d: &ParameterDescription| opt(&d.xtype)),
            ("voprov:unit", |d: &ParameterDescription| opt(&d.unit)),
            ("voprov:ucd", |d: &ParameterDescription| opt(&d.ucd)),
            ("voprov:utype", |d: &ParameterDescription| opt(&d.utype)),
            ("voprov:arraysize", |d: &ParameterDescription| opt(&d.arraysize)),
            ("voprov:minval", |d: &ParameterDescription| opt(&d.minval)),
            ("voprov:maxval", |d: &ParameterDescription| opt(&d.maxval)),
            ("voprov:options", |d: &ParameterDescription| opt(&d.options)),
        ];
        for (key, get) in extension_fields {
            if let Some(value) = get(desc) {
                map.insert((*key).to_string(), value);
            }
        }
    }
    map
}

/// Serialize the document under the given profile.
pub fn serialize(doc: &ProvDocument, profile: Profile) -> SerializedDocument {
    let mut buckets: IndexMap<&'static str, Bucket> = IndexMap::new();

    match profile {
        Profile::VoProv => {
            buckets.insert("activity", node_bucket(&doc.activity, ACTIVITY_VOPROV));
            buckets.insert("activityFlow", node_bucket(&doc.activity_flow, ACTIVITY_VOPROV));
            buckets.insert(
                "activityDescription",
                node_bucket(&doc.activity_description, ACTIVITY_DESCRIPTION_VOPROV),
            );
            buckets.insert("entity", node_bucket(&doc.entity, ENTITY_VOPROV));
            buckets.insert("collection", node_bucket(&doc.collection, ENTITY_VOPROV));
            buckets.insert(
                "entityDescription",
                node_bucket(&doc.entity_description, ENTITY_DESCRIPTION_VOPROV),
            );
            buckets.insert("agent", node_bucket(&doc.agent, AGENT_VOPROV));
            buckets.insert("parameter", node_bucket(&doc.parameter, PARAMETER_VOPROV));
            buckets.insert(
                "parameterDescription",
                node_bucket(&doc.parameter_description, PARAMETER_DESCRIPTION_VOPROV),
            );
            buckets.insert("used", relation_bucket(&doc.used, USED_VOPROV, profile));
            buckets.insert(
                "wasGeneratedBy",
                relation_bucket(&doc.was_generated_by, WAS_GENERATED_BY_VOPROV, profile),
            );
            buckets.insert(
                "wasAssociatedWith",
                relation_bucket(&doc.was_associated_with, WAS_ASSOCIATED_WITH_VOPROV, profile),
            );
            buckets.insert(
                "wasAttributedTo",
                relation_bucket(&doc.was_attributed_to, WAS_ATTRIBUTED_TO_VOPROV, profile),
            );
            buckets.insert("hadMember", relation_bucket(&doc.had_member, HAD_MEMBER_VOPROV, profile));
            buckets.insert(
                "wasDerivedFrom",
                relation_bucket(&doc.was_derived_from, WAS_DERIVED_FROM_VOPROV, profile),
            );
            buckets.insert("hadStep", relation_bucket(&doc.had_step, HAD_STEP_VOPROV, profile));
            buckets.insert(
                "wasInformedBy",
                relation_bucket(&doc.was_informed_by, WAS_INFORMED_BY_VOPROV, profile),
            );
        }
        Profile::W3c => {
            let mut activity = node_bucket(&doc.activity, ACTIVITY_W3C);
            fold_into(&mut activity, &doc.activity_flow, ACTIVITY_FLOW_W3C);
            buckets.insert("activity", activity);

            let mut entity = node_bucket(&doc.entity, ENTITY_W3C);
            fold_into(&mut entity, &doc.collection, COLLECTION_W3C);
            for (id, param) in &doc.parameter {
                let desc = param
                    .description
                    .as_deref()
                    .and_then(|d| doc.parameter_description.get(d));
                entity.insert(id.clone(), w3c_parameter_fields(param, desc));
            }
            fold_into(&mut entity, &doc.entity_description, ENTITY_DESCRIPTION_W3C);
            fold_into(&mut entity, &doc.activity_description, ACTIVITY_DESCRIPTION_W3C);
            buckets.insert("entity", entity);

            buckets.insert("agent", node_bucket(&doc.agent, AGENT_W3C));
            buckets.insert("used", relation_bucket(&doc.used, USED_W3C, profile));
            buckets.insert(
                "wasGeneratedBy",
                relation_bucket(&doc.was_generated_by, WAS_GENERATED_BY_W3C, profile),
            );
            buckets.insert(
                "wasAssociatedWith",
                relation_bucket(&doc.was_associated_with, WAS_ASSOCIATED_WITH_W3C, profile),
            );
            buckets.insert(
                "wasAttributedTo",
                relation_bucket(&doc.was_attributed_to, WAS_ATTRIBUTED_TO_W3C, profile),
            );
            buckets.insert("hadMember", relation_bucket(&doc.had_member, HAD_MEMBER_W3C, profile));
            buckets.insert(
                "wasDerivedFrom",
                relation_bucket(&doc.was_derived_from, WAS_DERIVED_FROM_W3C, profile),
            );
            buckets.insert(
                "wasInformedBy",
                relation_bucket(&doc.was_informed_by, WAS_INFORMED_BY_W3C, profile),
            );
            buckets.insert(
                "wasInfluencedBy",
                relation_bucket(&doc.had_step, HAD_STEP_W3C, profile),
            );
        }
    }

    SerializedDocument { profile, prefix: doc.prefix.clone(), buckets }
}
