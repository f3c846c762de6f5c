//! Graph-JSON rendering for visualization.
//!
//! Derived view over the serialized document: a `nodes` array with one entry
//! per node record and a `links` array whose `source`/`target` are positional
//! indices into `nodes`. The index map is built by walking the node buckets
//! in their serialized order, then every relation's endpoint ids are resolved
//! through it. Each relation kind carries a fixed display weight.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::RenderError;
use crate::serialize::{Profile, SerializedDocument};

/// Buckets whose records become graph nodes, in display order.
const NODE_BUCKETS: &[&str] = &["activity", "entity", "agent", "activityFlow", "collection"];

/// (bucket, source field, target field, weight) per link kind.
const LINK_KINDS: &[(&str, &str, &str, f64)] = &[
    ("used", "activity", "entity", 0.5),
    ("wasGeneratedBy", "entity", "activity", 0.5),
    ("wasAssociatedWith", "agent", "activity", 0.2),
    ("wasAttributedTo", "agent", "entity", 0.2),
    ("hadMember", "collection", "entity", 0.2),
    ("wasDerivedFrom", "generatedEntity", "usedEntity", 0.2),
    ("hadStep", "activityFlow", "activity", 0.2),
    ("wasInformedBy", "informed", "informant", 0.2),
    ("wasInfluencedBy", "influencee", "influencer", 0.2),
];

#[derive(Debug, Serialize)]
struct GraphNode {
    name: String,
    #[serde(rename = "type")]
    node_type: String,
}

#[derive(Debug, Serialize)]
struct GraphLink {
    source: usize,
    target: usize,
    value: f64,
    #[serde(rename = "type")]
    link_type: String,
}

#[derive(Debug, Serialize)]
struct GraphDocument {
    nodes: Vec<GraphNode>,
    links: Vec<GraphLink>,
}

fn profile_key(profile: Profile, local: &str) -> String {
    match profile {
        Profile::VoProv => format!("voprov:{local}"),
        Profile::W3c => format!("prov:{local}"),
    }
}

/// Render the document as the d3-style nodes/links JSON shape.
pub fn render(doc: &SerializedDocument) -> Result<String, RenderError> {
    let id_key = profile_key(doc.profile, "id");
    let name_key = match doc.profile {
        Profile::VoProv => "voprov:name".to_string(),
        Profile::W3c => "prov:label".to_string(),
    };

    let mut nodes = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for bucket_name in NODE_BUCKETS.iter().copied() {
        let Some(bucket) = doc.bucket(bucket_name) else { continue };
        for (key, fields) in bucket {
            let id = fields.get(&id_key).cloned().unwrap_or_else(|| key.clone());
            let name = fields.get(&name_key).cloned().unwrap_or_else(|| id.clone());
            index.insert(id, nodes.len());
            nodes.push(GraphNode { name, node_type: bucket_name.to_string() });
        }
    }

    let mut links = Vec::new();
    for (bucket_name, source_field, target_field, value) in LINK_KINDS.iter().copied() {
        let Some(bucket) = doc.bucket(bucket_name) else { continue };
        let source_key = profile_key(doc.profile, source_field);
        let target_key = profile_key(doc.profile, target_field);

        for fields in bucket.values() {
            let resolve = |key: &str| -> Result<usize, RenderError> {
                let id = fields.get(key).ok_or_else(|| RenderError::DanglingLink {
                    relation: bucket_name,
                    id: key.to_string(),
                })?;
                index.get(id).copied().ok_or_else(|| RenderError::DanglingLink {
                    relation: bucket_name,
                    id: id.clone(),
                })
            };
            links.push(GraphLink {
                source: resolve(&source_key)?,
                target: resolve(&target_key)?,
                value,
                link_type: bucket_name.to_string(),
            });
        }
    }

    serde_json::to_string(&GraphDocument { nodes, links })
        .map_err(|source| RenderError::Json { source })
}
