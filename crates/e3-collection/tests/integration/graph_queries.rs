//! Queries over a loaded DAG: waves, closures, contexts, reverse and merge.

use e3_collection::{ContextQuery, Dag, Error, SpecFormat, Vertex, VertexId};
use serde_json::{Value, json};
use std::collections::BTreeSet;

use crate::common::{chain, pipeline, position};

fn ids(set: &BTreeSet<VertexId>) -> Vec<&str> {
    set.iter().map(VertexId::as_str).collect()
}

#[test]
fn test_waves_group_independent_vertices() {
    let dag = pipeline();
    let waves: Vec<Vec<&str>> = dag
        .waves()
        .unwrap()
        .into_iter()
        .map(|wave| wave.into_iter().map(|id| id.as_str()).collect())
        .collect();
    assert_eq!(
        waves,
        vec![
            vec!["fetch"],
            vec!["compile", "docs"],
            vec!["test"],
            vec!["package"],
        ]
    );
}

#[test]
fn test_closure_of_sink_is_everything_else() {
    let dag = pipeline();
    let closure = dag.closure("package").unwrap();
    assert_eq!(ids(&closure), vec!["compile", "docs", "fetch", "test"]);
    assert!(dag.closure("fetch").unwrap().is_empty());
}

#[test]
fn test_context_follows_predecessors() {
    let dag = pipeline();

    let context = dag.context("test", &ContextQuery::new()).unwrap();
    assert_eq!(context.len(), 1);
    assert_eq!(context[0].distance, 2);
    assert_eq!(context[0].id.as_str(), "fetch");
    assert_eq!(context[0].tag, &json!("source"));

    let own = dag.context("package", &ContextQuery::new()).unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].distance, 0);
}

#[test]
fn test_context_respects_max_distance() {
    let dag = pipeline();
    let query = ContextQuery::new().with_max_distance(1);
    assert!(dag.context("test", &query).unwrap().is_empty());
}

#[test]
fn test_context_reversed_follows_successors() {
    let dag = pipeline();
    let query = ContextQuery::new().reversed();

    let context = dag.context("compile", &query).unwrap();
    assert_eq!(context.len(), 1);
    assert_eq!(context[0].id.as_str(), "package");
    assert_eq!(context[0].distance, 2);
}

#[test]
fn test_reverse_inverts_every_edge() {
    let dag = pipeline();
    let reversed = dag.reversed().unwrap();

    assert_eq!(reversed.len(), dag.len());
    assert_eq!(reversed.edge_count(), dag.edge_count());
    for (id, preds) in dag.vertex_predecessors() {
        for p in preds {
            assert!(reversed.predecessors(p.as_str()).contains(id));
        }
    }
    assert_eq!(reversed.tag("fetch"), dag.tag("fetch"));

    let order: Vec<&VertexId> = reversed.topological_order().unwrap();
    assert_eq!(order.first().map(|id| id.as_str()), Some("package"));
    assert_eq!(order.last().map(|id| id.as_str()), Some("fetch"));
}

#[test]
fn test_merge_pipeline_with_deployment() {
    let deploy: Dag<Value> = Dag::parse(
        r#"{"vertices": [
            {"id": "package", "data": {"format": "wheel"}},
            {"id": "upload", "predecessors": ["package"], "tag": "deploy"}
        ]}"#,
        SpecFormat::Json,
    )
    .unwrap();

    let merged = pipeline().merge(&deploy).unwrap();
    assert_eq!(merged.len(), 6);
    assert_eq!(merged.get("package"), Some(&json!({"format": "wheel"})));
    assert_eq!(merged.get("compile"), Some(&json!({"jobs": 4})));
    assert_eq!(merged.tag("package"), Some(&json!("release")));
    assert_eq!(merged.tag("upload"), Some(&json!("deploy")));

    let order = merged.topological_order().unwrap();
    assert!(position(&order, "test") < position(&order, "upload"));
    assert!(position(&order, "package") < position(&order, "upload"));
}

#[test]
fn test_merge_rejects_cycle_across_graphs() {
    let mut other: Dag<Value> = Dag::new();
    other.add_vertex(Vertex::new("package")).unwrap();
    other
        .add_vertex(Vertex::new("fetch").with_predecessors(["package"]))
        .unwrap();

    let err = pipeline().merge(&other).unwrap_err();
    assert!(matches!(err, Error::CycleDetected));
}

#[test]
fn test_incremental_updates_keep_long_chain_valid() {
    let mut dag = chain(50);
    assert_eq!(dag.topological_order().unwrap().len(), 50);

    let err = dag
        .update_vertex(Vertex::new("v0").with_predecessors(["v49"]))
        .unwrap_err();
    assert!(matches!(err, Error::CycleIntroduced { .. }));
    assert!(dag.predecessors("v0").is_empty());
    assert_eq!(dag.closure("v49").unwrap().len(), 49);

    dag.update_vertex(Vertex::new("v49").with_predecessors(["v0"]))
        .unwrap();
    assert_eq!(dag.predecessors("v49").len(), 2);
    assert!(dag.check().is_ok());
}

#[test]
fn test_scheduler_drives_manual_walk() {
    let dag = pipeline();
    let mut scheduler = dag.scheduler();
    let mut done = Vec::new();

    loop {
        let batch = scheduler.ready_batch().unwrap();
        if batch.is_empty() {
            break;
        }
        for visit in batch {
            scheduler.leave(visit.id.as_str()).unwrap();
            done.push(visit.id.as_str());
        }
    }

    assert_eq!(done.len(), dag.len());
    assert!(scheduler.is_complete());
    assert!(position(&done, "docs") < position(&done, "package"));
}
