//! # provdal
//!
//! A provenance lineage query engine in the style of the IVOA ProvDAL
//! protocol: given one or more identifiers naming entities, activities or
//! agents in a provenance graph, it computes the subgraph reachable within a
//! bounded number of relation-hops and renders it under a compliance profile.
//!
//! ## Architecture
//!
//! - **Store** (`store`): read-only in-memory graph with per-kind lookups,
//!   endpoint filters and subtype registries
//! - **Traversal** (`traverse`): depth-bounded, direction-aware, cycle-safe
//!   recursive walk writing into a per-query document
//! - **Serialization** (`serialize`): VOProv / W3C-PROV field mappings from
//!   static descriptor tables
//! - **Renderers** (`render`): PROV-N, PROV-JSON, PROV-XML, Graph-JSON
//! - **Resolver** (`query`): strict parameter validation + content negotiation
//!
//! ## Library usage
//!
//! ```no_run
//! use provdal::query::resolve;
//! use provdal::store::ProvStore;
//!
//! let store = ProvStore::from_json(r#"{"entities": [{"id": "ex:dr4"}]}"#).unwrap();
//! let params = vec![("ID".to_string(), "ex:dr4".to_string())];
//! let query = resolve(&params, None).unwrap();
//! let rendered = provdal::run_query(&store, &query, &Default::default()).unwrap();
//! println!("{}", rendered.body);
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod model;
pub mod query;
pub mod render;
pub mod serialize;
pub mod store;
pub mod traverse;

use indexmap::IndexMap;

use crate::document::ProvDocument;
use crate::error::ProvResult;
use crate::query::ResolvedQuery;
use crate::render::{render, OutputFormat, Rendered};
use crate::serialize::{serialize, Profile};
use crate::store::ProvStore;
use crate::traverse::{collect_full, trace_lineage};

/// Execute a resolved query end to end: traverse, serialize, render.
///
/// `namespaces` holds project-specific prefixes merged into the document's
/// prefix table on top of the defaults.
pub fn run_query(
    store: &ProvStore,
    query: &ResolvedQuery,
    namespaces: &IndexMap<String, String>,
) -> ProvResult<Rendered> {
    let mut doc =
        ProvDocument::with_prefixes(namespaces.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    trace_lineage(store, &query.ids, query.depth, query.direction, query.flags, &mut doc);
    let serialized = serialize(&doc, query.profile);
    Ok(render(&serialized, query.format)?)
}

/// Render the whole store (no traversal) under the W3C profile.
///
/// Backs the `/prov/{format}` full-dump endpoint.
pub fn run_full_dump(
    store: &ProvStore,
    format: OutputFormat,
    namespaces: &IndexMap<String, String>,
) -> ProvResult<Rendered> {
    let mut doc =
        ProvDocument::with_prefixes(namespaces.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    collect_full(store, &mut doc);
    let serialized = serialize(&doc, Profile::W3c);
    Ok(render(&serialized, format)?)
}
