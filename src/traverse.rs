//! Depth-bounded, direction-aware lineage traversal.
//!
//! The walk is a set of mutually recursive per-kind expansions
//! (entity/activity/agent) over the read-only [`ProvStore`], writing every
//! discovered node and relation into a [`ProvDocument`]. Presence in the
//! document doubles as the visited set: a node is expanded at most once per
//! query, so the walk terminates on any finite graph — cycles and unbounded
//! depth included — because recursion depth is bounded by the number of
//! distinct nodes, not by path length.
//!
//! Shortcut relations (entity-to-entity `WasDerivedFrom`, activity-to-activity
//! `WasInformedBy`) are expanded before their activity-mediated equivalents so
//! the shortest path to a shared predecessor claims the node first.

use crate::document::{insert_once, ProvDocument};
use crate::model::{Activity, ActivityKind, Agent, Entity, EntityKind};
use crate::store::ProvStore;

/// Which way the walk follows relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Towards predecessors (provenance history).
    #[default]
    Back,
    /// Towards successors (downstream usage).
    Forth,
}

/// Remaining relation-hop budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthBudget {
    /// No bound; termination relies on the dedup invariant alone.
    Unbounded,
    /// At most this many further hops.
    Finite(u32),
}

impl DepthBudget {
    /// True when no further hop may be taken.
    pub fn is_exhausted(self) -> bool {
        matches!(self, DepthBudget::Finite(0))
    }

    /// Budget for the next hop. No-op on the unbounded sentinel.
    pub fn step(self) -> Self {
        match self {
            DepthBudget::Unbounded => DepthBudget::Unbounded,
            DepthBudget::Finite(n) => DepthBudget::Finite(n.saturating_sub(1)),
        }
    }
}

/// Optional expansions beyond the always-followed lineage relations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FollowFlags {
    /// Expand collections downward into their members.
    pub members: bool,
    /// Expand activity flows downward into their steps.
    pub steps: bool,
    /// Expand agents into their other associations/attributions.
    pub agents: bool,
}

/// One lineage walk over a store.
pub struct Traverser<'a> {
    store: &'a ProvStore,
    direction: Direction,
    flags: FollowFlags,
}

impl<'a> Traverser<'a> {
    pub fn new(store: &'a ProvStore, direction: Direction, flags: FollowFlags) -> Self {
        Self { store, direction, flags }
    }

    /// Trace lineage from one seed id into the document.
    ///
    /// The id is looked up as entity, activity and agent; whatever matches is
    /// inserted and expanded. An id resolving to nothing is skipped silently —
    /// the query proceeds and may well produce an empty document.
    pub fn trace(&self, seed: &str, budget: DepthBudget, doc: &mut ProvDocument) {
        let mut found = false;

        if let Some(entity) = self.store.entity(seed) {
            found = true;
            if self.insert_entity(entity, doc) {
                self.expand_entity(seed, budget, doc);
            }
        }
        if let Some(activity) = self.store.activity(seed) {
            found = true;
            if self.insert_activity(activity, doc) {
                self.expand_activity(seed, budget, doc);
            }
        }
        if let Some(agent) = self.store.agent(seed) {
            found = true;
            let new = insert_once(&mut doc.agent, seed, agent.clone());
            // Relations of an agent are only walked on explicit request.
            if new && self.flags.agents {
                self.expand_agent(seed, budget, doc);
            }
        }

        if !found {
            tracing::debug!(id = seed, "seed id not found, skipping");
        }
    }

    // ── Node insertion ────────────────────────────────────────────────────

    /// Insert an entity into its subtype bucket; attach intrinsic metadata.
    ///
    /// Returns true when the id was new. The Collection classification is
    /// resolved here, once, and fixes the record's bucket for the query.
    fn insert_entity(&self, entity: &Entity, doc: &mut ProvDocument) -> bool {
        let new = match self.store.classify_entity(&entity.id) {
            EntityKind::Entity => insert_once(&mut doc.entity, &entity.id, entity.clone()),
            EntityKind::Collection => insert_once(&mut doc.collection, &entity.id, entity.clone()),
        };
        if new {
            if let Some(desc_id) = &entity.description {
                if let Some(desc) = self.store.entity_description(desc_id) {
                    insert_once(&mut doc.entity_description, desc_id, desc.clone());
                }
            }
        }
        new
    }

    /// Insert an activity into its subtype bucket; attach intrinsic metadata
    /// (description, parameters, parameter descriptions).
    fn insert_activity(&self, activity: &Activity, doc: &mut ProvDocument) -> bool {
        let new = match self.store.classify_activity(&activity.id) {
            ActivityKind::Activity => insert_once(&mut doc.activity, &activity.id, activity.clone()),
            ActivityKind::ActivityFlow => {
                insert_once(&mut doc.activity_flow, &activity.id, activity.clone())
            }
        };
        if new {
            if let Some(desc_id) = &activity.description {
                if let Some(desc) = self.store.activity_description(desc_id) {
                    insert_once(&mut doc.activity_description, desc_id, desc.clone());
                }
            }
            for param in self.store.parameters_of_activity(&activity.id) {
                insert_once(&mut doc.parameter, &param.id, param.clone());
                if let Some(desc_id) = &param.description {
                    if let Some(desc) = self.store.parameter_description(desc_id) {
                        insert_once(&mut doc.parameter_description, desc_id, desc.clone());
                    }
                }
            }
        }
        new
    }

    fn insert_agent(&self, agent: &Agent, doc: &mut ProvDocument) -> bool {
        insert_once(&mut doc.agent, &agent.id, agent.clone())
    }

    // ── Per-kind expansion ────────────────────────────────────────────────

    fn expand_entity(&self, id: &str, budget: DepthBudget, doc: &mut ProvDocument) {
        if budget.is_exhausted() {
            return;
        }
        let next = budget.step();

        // Entity-to-entity shortcut first, so a shared predecessor is claimed
        // via the one-hop path before the activity-mediated walk reaches it.
        match self.direction {
            Direction::Back => {
                for rel in self.store.derivations_of_generated(id) {
                    let rel = rel.clone();
                    insert_once(&mut doc.was_derived_from, &rel.id, rel.clone());
                    if let Some(predecessor) = self.store.entity(&rel.used_entity) {
                        if self.insert_entity(predecessor, doc) {
                            self.expand_entity(&rel.used_entity, next, doc);
                        }
                    }
                }
                for rel in self.store.generations_of_entity(id) {
                    let rel = rel.clone();
                    insert_once(&mut doc.was_generated_by, &rel.id, rel.clone());
                    if let Some(producer) = self.store.activity(&rel.activity) {
                        if self.insert_activity(producer, doc) {
                            self.expand_activity(&rel.activity, next, doc);
                        }
                    }
                }
            }
            Direction::Forth => {
                for rel in self.store.derivations_of_used(id) {
                    let rel = rel.clone();
                    insert_once(&mut doc.was_derived_from, &rel.id, rel.clone());
                    if let Some(successor) = self.store.entity(&rel.generated_entity) {
                        if self.insert_entity(successor, doc) {
                            self.expand_entity(&rel.generated_entity, next, doc);
                        }
                    }
                }
                for rel in self.store.used_of_entity(id) {
                    let rel = rel.clone();
                    insert_once(&mut doc.used, &rel.id, rel.clone());
                    if let Some(consumer) = self.store.activity(&rel.activity) {
                        if self.insert_activity(consumer, doc) {
                            self.expand_activity(&rel.activity, next, doc);
                        }
                    }
                }
            }
        }

        // Membership upward is intrinsic lineage and direction-independent.
        for rel in self.store.memberships_of_entity(id) {
            let rel = rel.clone();
            insert_once(&mut doc.had_member, &rel.id, rel.clone());
            if let Some(owner) = self.store.entity(&rel.collection) {
                if self.insert_entity(owner, doc) {
                    self.expand_entity(&rel.collection, next, doc);
                }
            }
        }
        if self.flags.members {
            for rel in self.store.memberships_of_collection(id) {
                let rel = rel.clone();
                insert_once(&mut doc.had_member, &rel.id, rel.clone());
                if let Some(member) = self.store.entity(&rel.entity) {
                    if self.insert_entity(member, doc) {
                        self.expand_entity(&rel.entity, next, doc);
                    }
                }
            }
        }

        for rel in self.store.attributions_of_entity(id) {
            let rel = rel.clone();
            insert_once(&mut doc.was_attributed_to, &rel.id, rel.clone());
            if let Some(agent) = self.store.agent(&rel.agent) {
                if self.insert_agent(agent, doc) && self.flags.agents {
                    self.expand_agent(&rel.agent, next, doc);
                }
            }
        }
    }

    fn expand_activity(&self, id: &str, budget: DepthBudget, doc: &mut ProvDocument) {
        if budget.is_exhausted() {
            return;
        }
        let next = budget.step();

        // Activity-to-activity shortcut first, mirroring the entity case.
        match self.direction {
            Direction::Back => {
                for rel in self.store.informations_of_informed(id) {
                    let rel = rel.clone();
                    insert_once(&mut doc.was_informed_by, &rel.id, rel.clone());
                    if let Some(informant) = self.store.activity(&rel.informant) {
                        if self.insert_activity(informant, doc) {
                            self.expand_activity(&rel.informant, next, doc);
                        }
                    }
                }
                for rel in self.store.used_by_activity(id) {
                    let rel = rel.clone();
                    insert_once(&mut doc.used, &rel.id, rel.clone());
                    if let Some(input) = self.store.entity(&rel.entity) {
                        if self.insert_entity(input, doc) {
                            self.expand_entity(&rel.entity, next, doc);
                        }
                    }
                }
            }
            Direction::Forth => {
                for rel in self.store.informations_of_informant(id) {
                    let rel = rel.clone();
                    insert_once(&mut doc.was_informed_by, &rel.id, rel.clone());
                    if let Some(informed) = self.store.activity(&rel.informed) {
                        if self.insert_activity(informed, doc) {
                            self.expand_activity(&rel.informed, next, doc);
                        }
                    }
                }
                for rel in self.store.generations_by_activity(id) {
                    let rel = rel.clone();
                    insert_once(&mut doc.was_generated_by, &rel.id, rel.clone());
                    if let Some(product) = self.store.entity(&rel.entity) {
                        if self.insert_entity(product, doc) {
                            self.expand_entity(&rel.entity, next, doc);
                        }
                    }
                }
            }
        }

        for rel in self.store.associations_of_activity(id) {
            let rel = rel.clone();
            insert_once(&mut doc.was_associated_with, &rel.id, rel.clone());
            if let Some(agent) = self.store.agent(&rel.agent) {
                if self.insert_agent(agent, doc) && self.flags.agents {
                    self.expand_agent(&rel.agent, next, doc);
                }
            }
        }

        // Step-to-flow upward is intrinsic lineage and direction-independent.
        for rel in self.store.steps_of_activity(id) {
            let rel = rel.clone();
            insert_once(&mut doc.had_step, &rel.id, rel.clone());
            if let Some(flow) = self.store.activity(&rel.activity_flow) {
                if self.insert_activity(flow, doc) {
                    self.expand_activity(&rel.activity_flow, next, doc);
                }
            }
        }
        if self.flags.steps {
            for rel in self.store.steps_of_flow(id) {
                let rel = rel.clone();
                insert_once(&mut doc.had_step, &rel.id, rel.clone());
                if let Some(step) = self.store.activity(&rel.activity) {
                    if self.insert_activity(step, doc) {
                        self.expand_activity(&rel.activity, next, doc);
                    }
                }
            }
        }
    }

    /// Only entered with `flags.agents`.
    fn expand_agent(&self, id: &str, budget: DepthBudget, doc: &mut ProvDocument) {
        if budget.is_exhausted() {
            return;
        }
        let next = budget.step();

        for rel in self.store.associations_of_agent(id) {
            let rel = rel.clone();
            insert_once(&mut doc.was_associated_with, &rel.id, rel.clone());
            if let Some(activity) = self.store.activity(&rel.activity) {
                if self.insert_activity(activity, doc) {
                    self.expand_activity(&rel.activity, next, doc);
                }
            }
        }
        for rel in self.store.attributions_of_agent(id) {
            let rel = rel.clone();
            insert_once(&mut doc.was_attributed_to, &rel.id, rel.clone());
            if let Some(entity) = self.store.entity(&rel.entity) {
                if self.insert_entity(entity, doc) {
                    self.expand_entity(&rel.entity, next, doc);
                }
            }
        }
    }
}

/// Copy the entire store into a document, no traversal involved.
///
/// Backs the whole-store dump endpoint. Subtype classification and intrinsic
/// metadata attachment work exactly as during a walk.
pub fn collect_full(store: &ProvStore, doc: &mut ProvDocument) {
    let walker = Traverser::new(store, Direction::Back, FollowFlags::default());

    for activity in store.all_activities() {
        walker.insert_activity(activity, doc);
    }
    for entity in store.all_entities() {
        walker.insert_entity(entity, doc);
    }
    for agent in store.all_agents() {
        walker.insert_agent(agent, doc);
    }
    for rel in store.all_used() {
        insert_once(&mut doc.used, &rel.id, rel.clone());
    }
    for rel in store.all_was_generated_by() {
        insert_once(&mut doc.was_generated_by, &rel.id, rel.clone());
    }
    for rel in store.all_was_derived_from() {
        insert_once(&mut doc.was_derived_from, &rel.id, rel.clone());
    }
    for rel in store.all_was_informed_by() {
        insert_once(&mut doc.was_informed_by, &rel.id, rel.clone());
    }
    for rel in store.all_was_associated_with() {
        insert_once(&mut doc.was_associated_with, &rel.id, rel.clone());
    }
    for rel in store.all_was_attributed_to() {
        insert_once(&mut doc.was_attributed_to, &rel.id, rel.clone());
    }
    for rel in store.all_had_member() {
        insert_once(&mut doc.had_member, &rel.id, rel.clone());
    }
    for rel in store.all_had_step() {
        insert_once(&mut doc.had_step, &rel.id, rel.clone());
    }
}

/// Run a full lineage query: trace every seed into a fresh bucket set.
///
/// The caller provides the document so the prefix table can be configured
/// up front; seeds resolving to nothing are skipped.
pub fn trace_lineage(
    store: &ProvStore,
    seeds: &[String],
    budget: DepthBudget,
    direction: Direction,
    flags: FollowFlags,
    doc: &mut ProvDocument,
) {
    let walker = Traverser::new(store, direction, flags);
    for seed in seeds {
        walker.trace(seed, budget, doc);
    }
    tracing::debug!(
        seeds = seeds.len(),
        nodes = doc.node_count(),
        relations = doc.relation_count(),
        "lineage walk finished"
    );
}
