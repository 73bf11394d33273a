//! Loading description files and rendering the resulting DAG.

use e3_collection::{Dag, Error, SpecFormat};
use serde_json::{Value, json};

use crate::common::{Fixture, PIPELINE_TOML, pipeline};

#[test]
fn test_load_toml_file_and_order() {
    let fixture = Fixture::new();
    let path = fixture.write("pipeline.toml", PIPELINE_TOML);

    let dag: Dag<Value> = Dag::load(&path).expect("pipeline should load");
    assert_eq!(dag.len(), 5);
    assert_eq!(dag.edge_count(), 5);
    assert!(dag.check().is_ok());

    let order: Vec<&str> = dag
        .topological_order()
        .unwrap()
        .into_iter()
        .map(|id| id.as_str())
        .collect();
    assert_eq!(order, vec!["fetch", "compile", "docs", "test", "package"]);
}

#[test]
fn test_load_keeps_data_and_tags() {
    let dag = pipeline();
    assert_eq!(dag.get("compile"), Some(&json!({"jobs": 4})));
    assert_eq!(dag.get("test"), None);
    assert_eq!(dag.tag("package"), Some(&json!("release")));
    assert_eq!(dag.tags().count(), 2);
}

#[test]
fn test_save_json_then_load_as_toml_fails() {
    let fixture = Fixture::new();
    let json_path = fixture.path("pipeline.json");
    pipeline().save(&json_path).unwrap();

    let err = Dag::<Value>::load_as(&json_path, SpecFormat::Toml).unwrap_err();
    assert!(matches!(err, Error::TomlDecode(_)));

    let reloaded: Dag<Value> = Dag::load(&json_path).unwrap();
    assert_eq!(reloaded.to_string(), pipeline().to_string());
}

#[test]
fn test_converting_between_formats_keeps_graph() {
    let dag = pipeline();
    let json = dag.to_spec().render(SpecFormat::Json).unwrap();
    let from_json: Dag<Value> = Dag::parse(&json, SpecFormat::Json).unwrap();

    let toml = from_json.to_spec().render(SpecFormat::Toml).unwrap();
    let from_toml: Dag<Value> = Dag::parse(&toml, SpecFormat::Toml).unwrap();

    assert_eq!(from_toml.to_string(), dag.to_string());
    assert_eq!(from_toml.get("fetch"), dag.get("fetch"));
    assert_eq!(from_toml.tag("fetch"), dag.tag("fetch"));
}

#[test]
fn test_load_rejects_cyclic_description() {
    let fixture = Fixture::new();
    let path = fixture.write(
        "cycle.json",
        r#"{"vertices": [
            {"id": "a", "predecessors": ["c"]},
            {"id": "b", "predecessors": ["a"]},
            {"id": "c", "predecessors": ["b"]}
        ]}"#,
    );
    let err = Dag::<Value>::load(&path).unwrap_err();
    assert!(err.is_cycle());
    assert!(err.is_structural());
}

#[test]
fn test_load_unknown_extension() {
    let fixture = Fixture::new();
    let path = fixture.write("pipeline.yaml", "vertices: []");
    let err = Dag::<Value>::load(&path).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

#[test]
fn test_render_dot_and_text() {
    let dag = pipeline();

    let dot = dag.as_dot().unwrap();
    assert!(dot.starts_with("digraph G {\nrankdir=\"LR\";"));
    assert!(dot.contains("\"package\" -> \"docs\""));
    assert!(dot.contains("\"package\" -> \"test\""));
    assert!(dot.ends_with('}'));

    assert_eq!(
        dag.to_string(),
        [
            "compile -> fetch",
            "docs -> fetch",
            "fetch -> (none)",
            "package -> docs, test",
            "test -> compile",
        ]
        .join("\n")
    );
}
