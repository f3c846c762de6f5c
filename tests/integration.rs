//! End-to-end tests for the provdal engine.
//!
//! These exercise the full pipeline from parameter resolution through
//! traversal, profile serialization and rendering, validating that the
//! subsystems work together on a realistic survey-style dataset.

use indexmap::IndexMap;

use provdal::error::{ProvError, QueryError};
use provdal::query::resolve;
use provdal::render::Rendered;
use provdal::store::ProvStore;

/// The fixture graph used by most tests:
///
/// ```text
/// rave:flow --hadStep--> rave:act --used--> rave:obs
/// rave:dr4 --wasGeneratedBy--> rave:act
/// rave:act --wasAssociatedWith--> org:rave
/// rave:dr4 --wasAttributedTo--> org:rave
/// ```
fn sample_store() -> ProvStore {
    ProvStore::from_json(
        r#"{
        "activities": [{"id": "rave:act", "name": "myactivity"}],
        "activity_flows": [{"id": "rave:flow", "name": "myflow"}],
        "entities": [
            {"id": "rave:dr4", "name": "RAVE DR4"},
            {"id": "rave:obs", "name": "RAVE observations"}
        ],
        "agents": [{"id": "org:rave", "name": "RAVE project"}],
        "had_step": [{"id": "1", "activity_flow": "rave:flow", "activity": "rave:act"}],
        "was_generated_by": [{"id": "1", "entity": "rave:dr4", "activity": "rave:act"}],
        "used": [{"id": "1", "activity": "rave:act", "entity": "rave:obs"}],
        "was_associated_with": [{"id": "1", "activity": "rave:act", "agent": "org:rave"}],
        "was_attributed_to": [{"id": "1", "entity": "rave:dr4", "agent": "org:rave"}]
    }"#,
    )
    .unwrap()
}

fn query(
    store: &ProvStore,
    params: &[(&str, &str)],
    accept: Option<&str>,
) -> Result<Rendered, ProvError> {
    let params: Vec<(String, String)> =
        params.iter().map(|(n, v)| (n.to_string(), v.to_string())).collect();
    let resolved = resolve(&params, accept)?;
    provdal::run_query(store, &resolved, &IndexMap::new())
}

/// Drop the `document`/`prefix`/`endDocument` framing from PROV-N output.
fn records(rendered: &Rendered) -> String {
    rendered
        .body
        .lines()
        .filter(|line| {
            !line.is_empty()
                && *line != "document"
                && *line != "endDocument"
                && !line.starts_with("prefix ")
        })
        .map(|line| format!("{line}\n"))
        .collect()
}

// ── Traversal + PROV-N ────────────────────────────────────────────────────

#[test]
fn backward_walk_from_activity() {
    let store = sample_store();
    let out = query(&store, &[("ID", "rave:act"), ("DEPTH", "1"), ("RESPONSEFORMAT", "PROV-N")], None)
        .unwrap();

    let expected = "\
activity(rave:act, -, -, [voprov:name=\"myactivity\"])
activityFlow(rave:flow, -, -, [voprov:name=\"myflow\"])
entity(rave:obs, [voprov:name=\"RAVE observations\"])
agent(org:rave, [voprov:name=\"RAVE project\"])
used(rave:act, rave:obs, -)
wasAssociatedWith(rave:act, org:rave, -)
hadStep(rave:flow, rave:act)
";
    assert_eq!(records(&out), expected);
    assert_eq!(out.media_type, "text/plain");
}

#[test]
fn forward_walk_from_activity() {
    let store = sample_store();
    let out = query(
        &store,
        &[("ID", "rave:act"), ("DEPTH", "1"), ("DIRECTION", "FORTH"), ("RESPONSEFORMAT", "PROV-N")],
        None,
    )
    .unwrap();

    let expected = "\
activity(rave:act, -, -, [voprov:name=\"myactivity\"])
activityFlow(rave:flow, -, -, [voprov:name=\"myflow\"])
entity(rave:dr4, [voprov:name=\"RAVE DR4\"])
agent(org:rave, [voprov:name=\"RAVE project\"])
wasGeneratedBy(rave:dr4, rave:act, -)
wasAssociatedWith(rave:act, org:rave, -)
hadStep(rave:flow, rave:act)
";
    assert_eq!(records(&out), expected);
}

#[test]
fn depth_zero_returns_seed_records_only() {
    let store = sample_store();
    let out = query(
        &store,
        &[
            ("ID", "rave:dr4"),
            ("ID", "rave:act"),
            ("ID", "org:rave"),
            ("DEPTH", "0"),
            ("RESPONSEFORMAT", "PROV-N"),
        ],
        None,
    )
    .unwrap();

    let expected = "\
activity(rave:act, -, -, [voprov:name=\"myactivity\"])
entity(rave:dr4, [voprov:name=\"RAVE DR4\"])
agent(org:rave, [voprov:name=\"RAVE project\"])
";
    assert_eq!(records(&out), expected);
}

#[test]
fn derivation_is_symmetric_across_directions() {
    let store = ProvStore::from_json(
        r#"{
        "entities": [
            {"id": "rave:dr4", "name": "RAVE DR4"},
            {"id": "rave:obs", "name": "RAVE observations"}
        ],
        "was_derived_from": [
            {"id": "1", "generated_entity": "rave:dr4", "used_entity": "rave:obs"}
        ]
    }"#,
    )
    .unwrap();

    let back =
        query(&store, &[("ID", "rave:dr4"), ("DEPTH", "1"), ("RESPONSEFORMAT", "PROV-N")], None)
            .unwrap();
    assert_eq!(
        records(&back),
        "entity(rave:dr4, [voprov:name=\"RAVE DR4\"])\n\
         entity(rave:obs, [voprov:name=\"RAVE observations\"])\n\
         wasDerivedFrom(rave:dr4, rave:obs, -, -, -)\n"
    );

    let forth = query(
        &store,
        &[("ID", "rave:obs"), ("DEPTH", "1"), ("DIRECTION", "FORTH"), ("RESPONSEFORMAT", "PROV-N")],
        None,
    )
    .unwrap();
    assert_eq!(
        records(&forth),
        "entity(rave:obs, [voprov:name=\"RAVE observations\"])\n\
         entity(rave:dr4, [voprov:name=\"RAVE DR4\"])\n\
         wasDerivedFrom(rave:dr4, rave:obs, -, -, -)\n"
    );
}

#[test]
fn unbounded_depth_terminates_on_cyclic_data() {
    let store = ProvStore::from_json(
        r#"{
        "entities": [{"id": "ex:a"}, {"id": "ex:b"}],
        "was_derived_from": [
            {"id": "1", "generated_entity": "ex:a", "used_entity": "ex:b"},
            {"id": "2", "generated_entity": "ex:b", "used_entity": "ex:a"}
        ]
    }"#,
    )
    .unwrap();

    let out = query(&store, &[("ID", "ex:a"), ("DEPTH", "ALL"), ("RESPONSEFORMAT", "PROV-N")], None)
        .unwrap();
    let body = records(&out);
    assert_eq!(body.matches("entity(").count(), 2);
    assert_eq!(body.matches("wasDerivedFrom(").count(), 2);
}

#[test]
fn unknown_seed_yields_empty_document() {
    let store = sample_store();
    let out = query(&store, &[("ID", "blabla"), ("RESPONSEFORMAT", "PROV-N")], None).unwrap();
    assert_eq!(records(&out), "");
}

// ── Flags ─────────────────────────────────────────────────────────────────

#[test]
fn membership_expansion_follows_the_flag() {
    let store = ProvStore::from_json(
        r#"{
        "collections": [{"id": "rave:dr4", "name": "RAVE DR4"}],
        "entities": [{"id": "rave:x", "name": "RAVE stellar properties"}],
        "had_member": [{"id": "1", "collection": "rave:dr4", "entity": "rave:x"}]
    }"#,
    )
    .unwrap();

    // Member upward: collection is always pulled in.
    let out = query(&store, &[("ID", "rave:x"), ("DEPTH", "1"), ("RESPONSEFORMAT", "PROV-N")], None)
        .unwrap();
    let body = records(&out);
    assert!(body.contains("collection(rave:dr4"));
    assert!(body.contains("hadMember(rave:dr4, rave:x)"));

    // Collection downward: members only with MEMBERS=TRUE.
    let out = query(&store, &[("ID", "rave:dr4"), ("DEPTH", "1"), ("RESPONSEFORMAT", "PROV-N")], None)
        .unwrap();
    let body = records(&out);
    assert!(!body.contains("rave:x"));
    assert!(!body.contains("hadMember("));

    let out = query(
        &store,
        &[("ID", "rave:dr4"), ("DEPTH", "1"), ("MEMBERS", "true"), ("RESPONSEFORMAT", "PROV-N")],
        None,
    )
    .unwrap();
    let body = records(&out);
    assert!(body.contains("entity(rave:x"));
    assert!(body.contains("hadMember(rave:dr4, rave:x)"));
}

#[test]
fn steps_expansion_follows_the_flag() {
    let store = sample_store();

    let out = query(
        &store,
        &[("ID", "rave:flow"), ("DEPTH", "2"), ("RESPONSEFORMAT", "PROV-N")],
        None,
    )
    .unwrap();
    assert_eq!(records(&out), "activityFlow(rave:flow, -, -, [voprov:name=\"myflow\"])\n");

    let out = query(
        &store,
        &[("ID", "rave:flow"), ("DEPTH", "3"), ("STEPS", "true"), ("RESPONSEFORMAT", "PROV-N")],
        None,
    )
    .unwrap();
    let body = records(&out);
    assert!(body.contains("activity(rave:act"));
    assert!(body.contains("activityFlow(rave:flow"));
    assert!(body.contains("hadStep(rave:flow, rave:act)"));
}

#[test]
fn agent_expansion_follows_the_flag() {
    let store = sample_store();

    // Without AGENT: the agent record alone.
    let out = query(&store, &[("ID", "org:rave"), ("DEPTH", "1"), ("RESPONSEFORMAT", "PROV-N")], None)
        .unwrap();
    assert_eq!(records(&out), "agent(org:rave, [voprov:name=\"RAVE project\"])\n");

    // With AGENT: one hop through both agent relations.
    let out = query(
        &store,
        &[("ID", "org:rave"), ("AGENT", "TRUE"), ("DEPTH", "1"), ("RESPONSEFORMAT", "PROV-N")],
        None,
    )
    .unwrap();
    let expected = "\
activity(rave:act, -, -, [voprov:name=\"myactivity\"])
entity(rave:dr4, [voprov:name=\"RAVE DR4\"])
agent(org:rave, [voprov:name=\"RAVE project\"])
wasAssociatedWith(rave:act, org:rave, -)
wasAttributedTo(rave:dr4, org:rave)
";
    assert_eq!(records(&out), expected);
}

// ── Profiles ──────────────────────────────────────────────────────────────

#[test]
fn w3c_profile_folds_activity_flow() {
    let store = sample_store();
    let out = query(
        &store,
        &[("ID", "rave:flow"), ("RESPONSEFORMAT", "PROV-N"), ("MODEL", "W3C")],
        None,
    )
    .unwrap();
    assert_eq!(
        records(&out),
        "activity(rave:flow, -, -, [prov:label=\"myflow\", voprov:votype=\"voprov:activityFlow\"])\n"
    );
}

#[test]
fn w3c_profile_turns_had_step_into_was_influenced_by() {
    let store = sample_store();
    let out = query(
        &store,
        &[
            ("ID", "rave:flow"),
            ("DEPTH", "3"),
            ("STEPS", "true"),
            ("RESPONSEFORMAT", "PROV-N"),
            ("MODEL", "W3C"),
        ],
        None,
    )
    .unwrap();
    let body = records(&out);
    assert_eq!(body.matches("activity(").count(), 2);
    assert_eq!(body.matches("wasInfluencedBy(").count(), 1);
    assert!(body.contains("wasInfluencedBy(rave:flow, rave:act, [voprov:votype=\"voprov:hadStep\"])"));
}

// ── PROV-JSON ─────────────────────────────────────────────────────────────

#[test]
fn default_format_is_prov_json_with_voprov_keys() {
    let store = ProvStore::from_json(
        r#"{"entities": [{"id": "ex:ent", "name": "An example entity"}]}"#,
    )
    .unwrap();

    for accept in [None, Some("*/*"), Some("application/json")] {
        let out = query(&store, &[("ID", "ex:ent")], accept).unwrap();
        assert_eq!(out.media_type, "application/json");

        let parsed: serde_json::Value = serde_json::from_str(&out.body).unwrap();
        assert_eq!(
            parsed["entity"],
            serde_json::json!({"ex:ent": {"voprov:id": "ex:ent", "voprov:name": "An example entity"}})
        );
        // Untouched buckets are omitted, the prefix table never is.
        assert!(parsed.get("activity").is_none());
        assert!(parsed.get("prefix").is_some());
    }
}

// ── Graph-JSON ────────────────────────────────────────────────────────────

#[test]
fn graph_json_resolves_links_through_node_indices() {
    let store = ProvStore::from_json(
        r#"{
        "entities": [
            {"id": "rave:dr4", "name": "RAVE DR4"},
            {"id": "rave:obs", "name": "RAVE observations"}
        ],
        "was_derived_from": [
            {"id": "1", "generated_entity": "rave:dr4", "used_entity": "rave:obs"}
        ]
    }"#,
    )
    .unwrap();

    let out = query(&store, &[("ID", "rave:dr4"), ("DEPTH", "1"), ("RESPONSEFORMAT", "GRAPH-JSON")], None)
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&out.body).unwrap();

    assert_eq!(
        parsed["nodes"],
        serde_json::json!([
            {"name": "RAVE DR4", "type": "entity"},
            {"name": "RAVE observations", "type": "entity"}
        ])
    );
    assert_eq!(
        parsed["links"],
        serde_json::json!([
            {"source": 0, "target": 1, "value": 0.2, "type": "wasDerivedFrom"}
        ])
    );

    // GRAPH serves the same payload.
    let graph = query(&store, &[("ID", "rave:dr4"), ("DEPTH", "1"), ("RESPONSEFORMAT", "GRAPH")], None)
        .unwrap();
    assert_eq!(graph.body, out.body);
}

// ── PROV-XML ──────────────────────────────────────────────────────────────

#[test]
fn prov_xml_renders_refs_and_namespaces() {
    let store = sample_store();
    let out = query(
        &store,
        &[("ID", "rave:act"), ("DEPTH", "1"), ("RESPONSEFORMAT", "PROV-XML")],
        None,
    )
    .unwrap();

    assert_eq!(out.media_type, "text/xml");
    assert!(out.body.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(out.body.contains("<voprov:document"));
    assert!(out.body.contains("xmlns:prov=\"http://www.w3.org/ns/prov#\""));
    assert!(out.body.contains("<voprov:activity voprov:id=\"rave:act\">"));
    assert!(out.body.contains("<voprov:entity voprov:ref=\"rave:obs\"/>"));
}

// ── Supplemental records ──────────────────────────────────────────────────

fn parameter_store() -> ProvStore {
    ProvStore::from_json(
        r#"{
        "parameter_descriptions": [
            {"id": "ex:paramdesc1", "name": "Parameter1", "unit": "sec", "datatype": "float"}
        ],
        "activities": [{"id": "ex:act", "name": "myactivity"}],
        "parameters": [
            {"id": "ex:param1", "activity": "ex:act", "value": "1.0", "description": "ex:paramdesc1"}
        ]
    }"#,
    )
    .unwrap()
}

#[test]
fn parameters_render_in_their_own_voprov_buckets() {
    let store = parameter_store();
    let out = query(
        &store,
        &[("ID", "ex:act"), ("DEPTH", "1"), ("RESPONSEFORMAT", "PROV-N"), ("MODEL", "IVOA")],
        None,
    )
    .unwrap();

    let expected = "\
activity(ex:act, -, -, [voprov:name=\"myactivity\"])
parameter(ex:param1, ex:act, 1.0, [voprov:description=\"ex:paramdesc1\"])
parameterDescription(ex:paramdesc1, Parameter1, [voprov:datatype=\"float\", voprov:unit=\"sec\"])
";
    assert_eq!(records(&out), expected);
}

#[test]
fn parameters_fold_into_w3c_entities() {
    let store = parameter_store();
    let out = query(
        &store,
        &[("ID", "ex:act"), ("DEPTH", "1"), ("RESPONSEFORMAT", "PROV-N"), ("MODEL", "W3C")],
        None,
    )
    .unwrap();

    let expected = "\
activity(ex:act, -, -, [prov:label=\"myactivity\"])
entity(ex:param1, [prov:value=\"1.0\", prov:label=\"Parameter1\", voprov:votype=\"voprov:parameter\", voprov:activity=\"ex:act\", voprov:datatype=\"float\", voprov:unit=\"sec\"])
";
    assert_eq!(records(&out), expected);
}

#[test]
fn activity_description_is_attached_and_profiled() {
    let store = ProvStore::from_json(
        r#"{
        "activity_descriptions": [
            {"id": "ex:actdesc1", "name": "Activity Description 1", "type": "observation"}
        ],
        "activities": [
            {"id": "ex:act1", "name": "Activity 1", "description": "ex:actdesc1"}
        ]
    }"#,
    )
    .unwrap();

    let out = query(
        &store,
        &[("ID", "ex:act1"), ("DEPTH", "1"), ("RESPONSEFORMAT", "PROV-N"), ("MODEL", "IVOA")],
        None,
    )
    .unwrap();
    let expected = "\
activity(ex:act1, -, -, [voprov:name=\"Activity 1\", voprov:description=\"ex:actdesc1\"])
activityDescription(ex:actdesc1, Activity Description 1, [voprov:type=\"observation\"])
";
    assert_eq!(records(&out), expected);

    let out = query(
        &store,
        &[("ID", "ex:act1"), ("DEPTH", "1"), ("RESPONSEFORMAT", "PROV-N"), ("MODEL", "W3C")],
        None,
    )
    .unwrap();
    let expected = "\
activity(ex:act1, -, -, [prov:label=\"Activity 1\", voprov:description=\"ex:actdesc1\"])
entity(ex:actdesc1, [prov:label=\"Activity Description 1\", voprov:votype=\"voprov:activityDescription\", prov:type=\"observation\"])
";
    assert_eq!(records(&out), expected);
}

// ── Parameter resolution over the full pipeline ───────────────────────────

#[test]
fn resolver_errors_carry_dal_status_codes() {
    let store = sample_store();

    let err = query(&store, &[("DEPTH", "1")], None).unwrap_err();
    assert_status(err, 400);

    let err = query(&store, &[("ID", "rave:dr4"), ("DEPTH", "1"), ("DEPTH", "2")], None).unwrap_err();
    assert_status(err, 400);

    let err = query(&store, &[("ID", "rave:dr4"), ("SOMETHING", "nothing")], None).unwrap_err();
    assert_status(err, 400);

    let err = query(&store, &[("ID", "rave:dr4"), ("RESPONSEFORMAT", "HUBBA")], None).unwrap_err();
    assert_status(err, 415);

    let err = query(&store, &[("ID", "rave:dr4")], Some("image/png")).unwrap_err();
    assert_status(err, 415);

    let err = query(
        &store,
        &[("ID", "rave:dr4"), ("RESPONSEFORMAT", "PROV-N")],
        Some("application/json"),
    )
    .unwrap_err();
    assert_status(err, 406);
}

fn assert_status(err: ProvError, expected: u16) {
    match err {
        ProvError::Query(query_err) => assert_eq!(query_err.http_status(), expected),
        other => panic!("expected query error, got {other:?}"),
    }
}

#[test]
fn case_insensitive_parameters_reach_the_engine() {
    let store = sample_store();
    let out = query(&store, &[("id", "rave:obs"), ("responseformat", "PROV-N")], None).unwrap();
    assert_eq!(records(&out), "entity(rave:obs, [voprov:name=\"RAVE observations\"])\n");
}

// ── Dataset files & full dump ─────────────────────────────────────────────

#[test]
fn store_loads_from_a_dataset_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("dataset.json");
    std::fs::write(
        &path,
        r#"{"entities": [{"id": "ex:ent", "name": "An example entity"}]}"#,
    )
    .unwrap();

    let store = ProvStore::from_json_file(&path).unwrap();
    assert_eq!(store.node_count(), 1);
}

#[test]
fn dangling_relation_is_rejected_at_ingestion() {
    let err = ProvStore::from_json(
        r#"{
        "activities": [{"id": "rave:act"}],
        "used": [{"id": "1", "activity": "rave:act", "entity": "rave:missing"}]
    }"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("rave:missing"));
}

#[test]
fn full_dump_renders_the_whole_store() {
    let store = sample_store();
    let out = provdal::run_full_dump(&store, provdal::render::OutputFormat::ProvN, &IndexMap::new())
        .unwrap();

    let body = records(&out);
    // Everything is present, regardless of connectivity.
    assert!(body.contains("activity(rave:act"));
    assert!(body.contains("activityFlow(rave:flow") || body.contains("activity(rave:flow"));
    assert!(body.contains("entity(rave:dr4"));
    assert!(body.contains("entity(rave:obs"));
    assert!(body.contains("agent(org:rave"));
    assert!(body.contains("used("));
    assert!(body.contains("wasGeneratedBy("));
}

#[test]
fn missing_id_error_matches_the_dal_wording() {
    let store = sample_store();
    let err = query(&store, &[], None).unwrap_err();
    match err {
        ProvError::Query(QueryError::MissingId) => {
            assert_eq!(
                format!("{}", QueryError::MissingId),
                "the ID parameter is required"
            );
        }
        other => panic!("expected MissingId, got {other:?}"),
    }
}
