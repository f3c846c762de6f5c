//! Benchmarks for the lineage walk on chain- and fan-shaped graphs.

use criterion::{criterion_group, criterion_main, Criterion};

use provdal::document::ProvDocument;
use provdal::store::ProvStore;
use provdal::traverse::{trace_lineage, DepthBudget, Direction, FollowFlags};

/// A derivation chain of `n` entities with an activity between each pair.
fn chain_store(n: usize) -> ProvStore {
    let mut store = ProvStore::new();
    for i in 0..n {
        store
            .add_entity(provdal::model::Entity {
                id: format!("ex:e{i}"),
                name: Some(format!("entity {i}")),
                r#type: None,
                annotation: None,
                rights: None,
                datatype: None,
                storage_location: None,
                description: None,
            })
            .unwrap();
    }
    for i in 0..n {
        store
            .add_activity(provdal::model::Activity {
                id: format!("ex:a{i}"),
                name: Some(format!("activity {i}")),
                r#type: None,
                annotation: None,
                start_time: None,
                end_time: None,
                doculink: None,
                description: None,
            })
            .unwrap();
    }
    for i in 1..n {
        store
            .add_was_generated_by(provdal::model::WasGeneratedBy {
                id: format!("g{i}"),
                entity: format!("ex:e{}", i - 1),
                activity: format!("ex:a{i}"),
                time: None,
                role: None,
            })
            .unwrap();
        store
            .add_used(provdal::model::Used {
                id: format!("u{i}"),
                activity: format!("ex:a{i}"),
                entity: format!("ex:e{i}"),
                time: None,
                role: None,
            })
            .unwrap();
        store
            .add_was_derived_from(provdal::model::WasDerivedFrom {
                id: format!("d{i}"),
                generated_entity: format!("ex:e{}", i - 1),
                used_entity: format!("ex:e{i}"),
            })
            .unwrap();
    }
    store
}

fn bench_traverse(c: &mut Criterion) {
    let store = chain_store(500);
    let seeds = vec!["ex:e0".to_string()];

    c.bench_function("trace_chain_500_unbounded", |b| {
        b.iter(|| {
            let mut doc = ProvDocument::new();
            trace_lineage(
                &store,
                &seeds,
                DepthBudget::Unbounded,
                Direction::Back,
                FollowFlags::default(),
                &mut doc,
            );
            doc.node_count()
        })
    });

    c.bench_function("trace_chain_500_depth_10", |b| {
        b.iter(|| {
            let mut doc = ProvDocument::new();
            trace_lineage(
                &store,
                &seeds,
                DepthBudget::Finite(10),
                Direction::Back,
                FollowFlags::default(),
                &mut doc,
            );
            doc.node_count()
        })
    });
}

criterion_group!(benches, bench_traverse);
criterion_main!(benches);
