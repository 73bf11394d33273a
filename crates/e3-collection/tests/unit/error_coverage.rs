//! Error construction, display and classification.

use e3_collection::{Dag, Error, Vertex, VertexId};

#[test]
fn test_vertex_exists_display() {
    let err = Error::VertexExists {
        id: VertexId::new("build"),
    };
    assert_eq!(err.to_string(), "Vertex already exists: build");
    assert!(err.is_structural());
    assert!(!err.is_cycle());
}

#[test]
fn test_unknown_predecessors_lists_all_missing() {
    let err = Error::UnknownPredecessors {
        id: VertexId::new("build"),
        missing: vec![VertexId::new("fetch"), VertexId::new("configure")],
    };
    assert_eq!(
        err.to_string(),
        "Predecessors of build are not vertices: fetch, configure"
    );
    assert!(err.is_structural());
}

#[test]
fn test_cycle_errors_are_cycles() {
    let introduced = Error::CycleIntroduced {
        id: VertexId::new("a"),
    };
    assert_eq!(
        introduced.to_string(),
        "Cannot update vertex a: it would create a cycle"
    );
    assert!(introduced.is_cycle());
    assert!(Error::CycleDetected.is_cycle());
    assert_eq!(Error::CycleDetected.to_string(), "Cycle detected");
}

#[test]
fn test_invalid_predecessors_display() {
    let err = Error::InvalidPredecessors {
        id: VertexId::new("x"),
    };
    assert_eq!(err.to_string(), "Invalid vertices in predecessors of x");
    assert!(err.is_structural());
    assert!(!err.is_cycle());
}

#[test]
fn test_not_found_helper() {
    let err = Error::not_found("ghost");
    assert_eq!(err.to_string(), "Vertex not found: ghost");
    match &err {
        Error::VertexNotFound { id } => assert_eq!(id.as_str(), "ghost"),
        _ => unreachable!("Expected VertexNotFound error"),
    }
    assert!(!err.is_structural());
}

#[test]
fn test_not_busy_is_not_structural() {
    let err = Error::NotBusy {
        id: VertexId::new("a"),
    };
    assert_eq!(err.to_string(), "Vertex is not busy: a");
    assert!(!err.is_structural());
}

#[test]
fn test_config_helper() {
    let err = Error::config("max_concurrency must be at least 1");
    assert_eq!(
        err.to_string(),
        "Configuration error: max_concurrency must be at least 1"
    );
    assert!(!err.is_structural());
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
    let err: Error = io.into();
    assert!(matches!(err, Error::Io(_)));
    assert!(err.to_string().starts_with("I/O error:"));
}

#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Serialization(_)));
    assert!(!err.is_cycle());
}

#[test]
fn test_toml_error_conversion() {
    let toml_err = toml::from_str::<toml::Table>("= broken").unwrap_err();
    let err: Error = toml_err.into();
    assert!(matches!(err, Error::TomlDecode(_)));
    assert!(err.to_string().starts_with("TOML parse error:"));
}

#[test]
fn test_errors_returned_by_api_match_classification() {
    let mut dag: Dag<()> = Dag::new();
    dag.add_vertex(Vertex::new("a")).unwrap();

    let exists = dag.add_vertex(Vertex::new("a")).unwrap_err();
    assert!(exists.is_structural());

    let missing = dag
        .add_vertex(Vertex::new("b").with_predecessors(["nope"]))
        .unwrap_err();
    assert!(matches!(missing, Error::UnknownPredecessors { .. }));

    let self_loop = dag
        .update_vertex(Vertex::new("a").with_predecessors(["a"]))
        .unwrap_err();
    assert!(self_loop.is_cycle());

    let unknown = dag.set_predecessors("zzz", ["a"]).unwrap_err();
    assert!(matches!(unknown, Error::VertexNotFound { .. }));

    let mut scheduler = dag.scheduler();
    let not_busy = scheduler.leave("a").unwrap_err();
    assert!(matches!(not_busy, Error::NotBusy { .. }));
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Error>();
}
