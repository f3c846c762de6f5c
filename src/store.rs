//! In-memory provenance graph store.
//!
//! The store is the read-only collaborator the traversal engine runs against:
//! per-kind lookup by id, per-relation filtering by one endpoint, and the
//! ActivityFlow/Collection classification registries. It is populated once
//! (usually from a JSON dataset file) and never mutated by queries.
//!
//! Ingestion is strict: relation endpoints must resolve to already-ingested
//! nodes and ids must be unique within their kind. Dangling edges are a data
//! defect and are rejected here rather than tolerated during traversal.

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::StoreError;
use crate::model::{
    Activity, ActivityDescription, ActivityKind, Agent, Entity, EntityDescription, EntityKind,
    HadMember, HadStep, Parameter, ParameterDescription, Used, WasAssociatedWith, WasAttributedTo,
    WasDerivedFrom, WasGeneratedBy, WasInformedBy,
};

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Read-only provenance graph: id-keyed node tables, relation tables with
/// endpoint filters, and the subtype registries.
///
/// Iteration order of every table equals ingestion order, which makes
/// traversal and rendering output reproducible for a given dataset.
#[derive(Debug, Default)]
pub struct ProvStore {
    activities: IndexMap<String, Activity>,
    entities: IndexMap<String, Entity>,
    agents: IndexMap<String, Agent>,
    activity_descriptions: IndexMap<String, ActivityDescription>,
    entity_descriptions: IndexMap<String, EntityDescription>,
    parameters: IndexMap<String, Parameter>,
    parameter_descriptions: IndexMap<String, ParameterDescription>,

    used: IndexMap<String, Used>,
    was_generated_by: IndexMap<String, WasGeneratedBy>,
    was_derived_from: IndexMap<String, WasDerivedFrom>,
    was_informed_by: IndexMap<String, WasInformedBy>,
    was_associated_with: IndexMap<String, WasAssociatedWith>,
    was_attributed_to: IndexMap<String, WasAttributedTo>,
    had_member: IndexMap<String, HadMember>,
    had_step: IndexMap<String, HadStep>,

    /// Activity ids ingested as ActivityFlows.
    flows: HashSet<String>,
    /// Entity ids ingested as Collections.
    collections: HashSet<String>,
}

impl ProvStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a JSON dataset file.
    pub fn from_json_file(path: &Path) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| StoreError::Io { source })?;
        Self::from_json(&text)
    }

    /// Load a store from a JSON dataset string.
    pub fn from_json(text: &str) -> StoreResult<Self> {
        let dataset: Dataset =
            serde_json::from_str(text).map_err(|source| StoreError::Parse { source })?;
        dataset.build()
    }

    // ── Node ingestion ────────────────────────────────────────────────────

    pub fn add_activity(&mut self, activity: Activity) -> StoreResult<()> {
        if self.activities.contains_key(&activity.id) {
            return Err(StoreError::DuplicateId { kind: "activity", id: activity.id });
        }
        self.activities.insert(activity.id.clone(), activity);
        Ok(())
    }

    /// Ingest an activity and register it as an ActivityFlow.
    pub fn add_activity_flow(&mut self, activity: Activity) -> StoreResult<()> {
        self.flows.insert(activity.id.clone());
        self.add_activity(activity)
    }

    pub fn add_entity(&mut self, entity: Entity) -> StoreResult<()> {
        if self.entities.contains_key(&entity.id) {
            return Err(StoreError::DuplicateId { kind: "entity", id: entity.id });
        }
        self.entities.insert(entity.id.clone(), entity);
        Ok(())
    }

    /// Ingest an entity and register it as a Collection.
    pub fn add_collection(&mut self, entity: Entity) -> StoreResult<()> {
        self.collections.insert(entity.id.clone());
        self.add_entity(entity)
    }

    pub fn add_agent(&mut self, agent: Agent) -> StoreResult<()> {
        if self.agents.contains_key(&agent.id) {
            return Err(StoreError::DuplicateId { kind: "agent", id: agent.id });
        }
        self.agents.insert(agent.id.clone(), agent);
        Ok(())
    }

    pub fn add_activity_description(&mut self, desc: ActivityDescription) -> StoreResult<()> {
        if self.activity_descriptions.contains_key(&desc.id) {
            return Err(StoreError::DuplicateId { kind: "activityDescription", id: desc.id });
        }
        self.activity_descriptions.insert(desc.id.clone(), desc);
        Ok(())
    }

    pub fn add_entity_description(&mut self, desc: EntityDescription) -> StoreResult<()> {
        if self.entity_descriptions.contains_key(&desc.id) {
            return Err(StoreError::DuplicateId { kind: "entityDescription", id: desc.id });
        }
        self.entity_descriptions.insert(desc.id.clone(), desc);
        Ok(())
    }

    pub fn add_parameter_description(&mut self, desc: ParameterDescription) -> StoreResult<()> {
        if self.parameter_descriptions.contains_key(&desc.id) {
            return Err(StoreError::DuplicateId { kind: "parameterDescription", id: desc.id });
        }
        self.parameter_descriptions.insert(desc.id.clone(), desc);
        Ok(())
    }

    pub fn add_parameter(&mut self, parameter: Parameter) -> StoreResult<()> {
        if self.parameters.contains_key(&parameter.id) {
            return Err(StoreError::DuplicateId { kind: "parameter", id: parameter.id });
        }
        self.check_endpoint("parameter", &parameter.id, "activity", &parameter.activity,
            self.activities.contains_key(&parameter.activity))?;
        self.parameters.insert(parameter.id.clone(), parameter);
        Ok(())
    }

    // ── Relation ingestion ────────────────────────────────────────────────

    fn check_endpoint(
        &self,
        relation: &'static str,
        id: &str,
        endpoint: &'static str,
        target: &str,
        ok: bool,
    ) -> StoreResult<()> {
        if ok {
            Ok(())
        } else {
            Err(StoreError::UnknownEndpoint {
                relation,
                id: id.to_string(),
                endpoint,
                target: target.to_string(),
            })
        }
    }

    pub fn add_used(&mut self, rel: Used) -> StoreResult<()> {
        if self.used.contains_key(&rel.id) {
            return Err(StoreError::DuplicateId { kind: "used", id: rel.id });
        }
        self.check_endpoint("used", &rel.id, "activity", &rel.activity,
            self.activities.contains_key(&rel.activity))?;
        self.check_endpoint("used", &rel.id, "entity", &rel.entity,
            self.entities.contains_key(&rel.entity))?;
        self.used.insert(rel.id.clone(), rel);
        Ok(())
    }

    pub fn add_was_generated_by(&mut self, rel: WasGeneratedBy) -> StoreResult<()> {
        if self.was_generated_by.contains_key(&rel.id) {
            return Err(StoreError::DuplicateId { kind: "wasGeneratedBy", id: rel.id });
        }
        self.check_endpoint("wasGeneratedBy", &rel.id, "entity", &rel.entity,
            self.entities.contains_key(&rel.entity))?;
        self.check_endpoint("wasGeneratedBy", &rel.id, "activity", &rel.activity,
            self.activities.contains_key(&rel.activity))?;
        self.was_generated_by.insert(rel.id.clone(), rel);
        Ok(())
    }

    pub fn add_was_derived_from(&mut self, rel: WasDerivedFrom) -> StoreResult<()> {
        if self.was_derived_from.contains_key(&rel.id) {
            return Err(StoreError::DuplicateId { kind: "wasDerivedFrom", id: rel.id });
        }
        self.check_endpoint("wasDerivedFrom", &rel.id, "generatedEntity", &rel.generated_entity,
            self.entities.contains_key(&rel.generated_entity))?;
        self.check_endpoint("wasDerivedFrom", &rel.id, "usedEntity", &rel.used_entity,
            self.entities.contains_key(&rel.used_entity))?;
        self.was_derived_from.insert(rel.id.clone(), rel);
        Ok(())
    }

    pub fn add_was_informed_by(&mut self, rel: WasInformedBy) -> StoreResult<()> {
        if self.was_informed_by.contains_key(&rel.id) {
            return Err(StoreError::DuplicateId { kind: "wasInformedBy", id: rel.id });
        }
        self.check_endpoint("wasInformedBy", &rel.id, "informed", &rel.informed,
            self.activities.contains_key(&rel.informed))?;
        self.check_endpoint("wasInformedBy", &rel.id, "informant", &rel.informant,
            self.activities.contains_key(&rel.informant))?;
        self.was_informed_by.insert(rel.id.clone(), rel);
        Ok(())
    }

    pub fn add_was_associated_with(&mut self, rel: WasAssociatedWith) -> StoreResult<()> {
        if self.was_associated_with.contains_key(&rel.id) {
            return Err(StoreError::DuplicateId { kind: "wasAssociatedWith", id: rel.id });
        }
        self.check_endpoint("wasAssociatedWith", &rel.id, "activity", &rel.activity,
            self.activities.contains_key(&rel.activity))?;
        self.check_endpoint("wasAssociatedWith", &rel.id, "agent", &rel.agent,
            self.agents.contains_key(&rel.agent))?;
        self.was_associated_with.insert(rel.id.clone(), rel);
        Ok(())
    }

    pub fn add_was_attributed_to(&mut self, rel: WasAttributedTo) -> StoreResult<()> {
        if self.was_attributed_to.contains_key(&rel.id) {
            return Err(StoreError::DuplicateId { kind: "wasAttributedTo", id: rel.id });
        }
        self.check_endpoint("wasAttributedTo", &rel.id, "entity", &rel.entity,
            self.entities.contains_key(&rel.entity))?;
        self.check_endpoint("wasAttributedTo", &rel.id, "agent", &rel.agent,
            self.agents.contains_key(&rel.agent))?;
        self.was_attributed_to.insert(rel.id.clone(), rel);
        Ok(())
    }

    pub fn add_had_member(&mut self, rel: HadMember) -> StoreResult<()> {
        if self.had_member.contains_key(&rel.id) {
            return Err(StoreError::DuplicateId { kind: "hadMember", id: rel.id });
        }
        self.check_endpoint("hadMember", &rel.id, "collection", &rel.collection,
            self.entities.contains_key(&rel.collection))?;
        self.check_endpoint("hadMember", &rel.id, "entity", &rel.entity,
            self.entities.contains_key(&rel.entity))?;
        // The owning side of a membership is a collection by definition.
        self.collections.insert(rel.collection.clone());
        self.had_member.insert(rel.id.clone(), rel);
        Ok(())
    }

    pub fn add_had_step(&mut self, rel: HadStep) -> StoreResult<()> {
        if self.had_step.contains_key(&rel.id) {
            return Err(StoreError::DuplicateId { kind: "hadStep", id: rel.id });
        }
        self.check_endpoint("hadStep", &rel.id, "activityFlow", &rel.activity_flow,
            self.activities.contains_key(&rel.activity_flow))?;
        self.check_endpoint("hadStep", &rel.id, "activity", &rel.activity,
            self.activities.contains_key(&rel.activity))?;
        // The owning side of a step is an activity flow by definition.
        self.flows.insert(rel.activity_flow.clone());
        self.had_step.insert(rel.id.clone(), rel);
        Ok(())
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    pub fn activity(&self, id: &str) -> Option<&Activity> {
        self.activities.get(id)
    }

    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn agent(&self, id: &str) -> Option<&Agent> {
        self.agents.get(id)
    }

    pub fn activity_description(&self, id: &str) -> Option<&ActivityDescription> {
        self.activity_descriptions.get(id)
    }

    pub fn entity_description(&self, id: &str) -> Option<&EntityDescription> {
        self.entity_descriptions.get(id)
    }

    pub fn parameter_description(&self, id: &str) -> Option<&ParameterDescription> {
        self.parameter_descriptions.get(id)
    }

    /// Resolve whether an activity id names a plain Activity or an ActivityFlow.
    pub fn classify_activity(&self, id: &str) -> ActivityKind {
        if self.flows.contains(id) {
            ActivityKind::ActivityFlow
        } else {
            ActivityKind::Activity
        }
    }

    /// Resolve whether an entity id names a plain Entity or a Collection.
    pub fn classify_entity(&self, id: &str) -> EntityKind {
        if self.collections.contains(id) {
            EntityKind::Collection
        } else {
            EntityKind::Entity
        }
    }

    // ── Endpoint filters ──────────────────────────────────────────────────

    pub fn used_by_activity(&self, activity: &str) -> Vec<&Used> {
        self.used.values().filter(|u| u.activity == activity).collect()
    }

    pub fn used_of_entity(&self, entity: &str) -> Vec<&Used> {
        self.used.values().filter(|u| u.entity == entity).collect()
    }

    pub fn generations_of_entity(&self, entity: &str) -> Vec<&WasGeneratedBy> {
        self.was_generated_by.values().filter(|w| w.entity == entity).collect()
    }

    pub fn generations_by_activity(&self, activity: &str) -> Vec<&WasGeneratedBy> {
        self.was_generated_by.values().filter(|w| w.activity == activity).collect()
    }

    pub fn derivations_of_generated(&self, entity: &str) -> Vec<&WasDerivedFrom> {
        self.was_derived_from.values().filter(|w| w.generated_entity == entity).collect()
    }

    pub fn derivations_of_used(&self, entity: &str) -> Vec<&WasDerivedFrom> {
        self.was_derived_from.values().filter(|w| w.used_entity == entity).collect()
    }

    pub fn informations_of_informed(&self, activity: &str) -> Vec<&WasInformedBy> {
        self.was_informed_by.values().filter(|w| w.informed == activity).collect()
    }

    pub fn informations_of_informant(&self, activity: &str) -> Vec<&WasInformedBy> {
        self.was_informed_by.values().filter(|w| w.informant == activity).collect()
    }

    pub fn associations_of_activity(&self, activity: &str) -> Vec<&WasAssociatedWith> {
        self.was_associated_with.values().filter(|w| w.activity == activity).collect()
    }

    pub fn associations_of_agent(&self, agent: &str) -> Vec<&WasAssociatedWith> {
        self.was_associated_with.values().filter(|w| w.agent == agent).collect()
    }

    pub fn attributions_of_entity(&self, entity: &str) -> Vec<&WasAttributedTo> {
        self.was_attributed_to.values().filter(|w| w.entity == entity).collect()
    }

    pub fn attributions_of_agent(&self, agent: &str) -> Vec<&WasAttributedTo> {
        self.was_attributed_to.values().filter(|w| w.agent == agent).collect()
    }

    pub fn memberships_of_entity(&self, entity: &str) -> Vec<&HadMember> {
        self.had_member.values().filter(|h| h.entity == entity).collect()
    }

    pub fn memberships_of_collection(&self, collection: &str) -> Vec<&HadMember> {
        self.had_member.values().filter(|h| h.collection == collection).collect()
    }

    pub fn steps_of_activity(&self, activity: &str) -> Vec<&HadStep> {
        self.had_step.values().filter(|h| h.activity == activity).collect()
    }

    pub fn steps_of_flow(&self, flow: &str) -> Vec<&HadStep> {
        self.had_step.values().filter(|h| h.activity_flow == flow).collect()
    }

    pub fn parameters_of_activity(&self, activity: &str) -> Vec<&Parameter> {
        self.parameters.values().filter(|p| p.activity == activity).collect()
    }

    // ── Whole-store iteration (full dumps, statistics) ────────────────────

    pub fn all_activities(&self) -> impl Iterator<Item = &Activity> {
        self.activities.values()
    }

    pub fn all_entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn all_agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    pub fn all_used(&self) -> impl Iterator<Item = &Used> {
        self.used.values()
    }

    pub fn all_was_generated_by(&self) -> impl Iterator<Item = &WasGeneratedBy> {
        self.was_generated_by.values()
    }

    pub fn all_was_derived_from(&self) -> impl Iterator<Item = &WasDerivedFrom> {
        self.was_derived_from.values()
    }

    pub fn all_was_informed_by(&self) -> impl Iterator<Item = &WasInformedBy> {
        self.was_informed_by.values()
    }

    pub fn all_was_associated_with(&self) -> impl Iterator<Item = &WasAssociatedWith> {
        self.was_associated_with.values()
    }

    pub fn all_was_attributed_to(&self) -> impl Iterator<Item = &WasAttributedTo> {
        self.was_attributed_to.values()
    }

    pub fn all_had_member(&self) -> impl Iterator<Item = &HadMember> {
        self.had_member.values()
    }

    pub fn all_had_step(&self) -> impl Iterator<Item = &HadStep> {
        self.had_step.values()
    }

    /// Number of nodes (activities + entities + agents).
    pub fn node_count(&self) -> usize {
        self.activities.len() + self.entities.len() + self.agents.len()
    }

    /// Number of relations across all kinds.
    pub fn relation_count(&self) -> usize {
        self.used.len()
            + self.was_generated_by.len()
            + self.was_derived_from.len()
            + self.was_informed_by.len()
            + self.was_associated_with.len()
            + self.was_attributed_to.len()
            + self.had_member.len()
            + self.had_step.len()
    }
}

// ---------------------------------------------------------------------------
// Dataset file format
// ---------------------------------------------------------------------------

/// JSON dataset: one array per record kind, all optional.
///
/// Ingestion order inside the builder is nodes first (descriptions before the
/// records referencing them), then relations, so the endpoint checks see a
/// complete node set regardless of array order in the file.
#[derive(Debug, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub activity_descriptions: Vec<ActivityDescription>,
    #[serde(default)]
    pub entity_descriptions: Vec<EntityDescription>,
    #[serde(default)]
    pub parameter_descriptions: Vec<ParameterDescription>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub activity_flows: Vec<Activity>,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub collections: Vec<Entity>,
    #[serde(default)]
    pub agents: Vec<Agent>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub used: Vec<Used>,
    #[serde(default)]
    pub was_generated_by: Vec<WasGeneratedBy>,
    #[serde(default)]
    pub was_derived_from: Vec<WasDerivedFrom>,
    #[serde(default)]
    pub was_informed_by: Vec<WasInformedBy>,
    #[serde(default)]
    pub was_associated_with: Vec<WasAssociatedWith>,
    #[serde(default)]
    pub was_attributed_to: Vec<WasAttributedTo>,
    #[serde(default)]
    pub had_member: Vec<HadMember>,
    #[serde(default)]
    pub had_step: Vec<HadStep>,
}

impl Dataset {
    /// Validate and assemble the dataset into a store.
    pub fn build(self) -> StoreResult<ProvStore> {
        let mut store = ProvStore::new();

        for desc in self.activity_descriptions {
            store.add_activity_description(desc)?;
        }
        for desc in self.entity_descriptions {
            store.add_entity_description(desc)?;
        }
        for desc in self.parameter_descriptions {
            store.add_parameter_description(desc)?;
        }
        for activity in self.activities {
            store.add_activity(activity)?;
        }
        for flow in self.activity_flows {
            store.add_activity_flow(flow)?;
        }
        for entity in self.entities {
            store.add_entity(entity)?;
        }
        for collection in self.collections {
            store.add_collection(collection)?;
        }
        for agent in self.agents {
            store.add_agent(agent)?;
        }
        for parameter in self.parameters {
            store.add_parameter(parameter)?;
        }
        for rel in self.used {
            store.add_used(rel)?;
        }
        for rel in self.was_generated_by {
            store.add_was_generated_by(rel)?;
        }
        for rel in self.was_derived_from {
            store.add_was_derived_from(rel)?;
        }
        for rel in self.was_informed_by {
            store.add_was_informed_by(rel)?;
        }
        for rel in self.was_associated_with {
            store.add_was_associated_with(rel)?;
        }
        for rel in self.was_attributed_to {
            store.add_was_attributed_to(rel)?;
        }
        for rel in self.had_member {
            store.add_had_member(rel)?;
        }
        for rel in self.had_step {
            store.add_had_step(rel)?;
        }

        tracing::debug!(
            nodes = store.node_count(),
            relations = store.relation_count(),
            "provenance store assembled"
        );

        Ok(store)
    }
}
