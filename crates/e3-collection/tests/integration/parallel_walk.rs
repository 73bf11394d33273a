//! Walking a loaded DAG with async jobs.

use e3_collection::{Outcome, VertexId, WalkOptions, walk};
use std::sync::{Arc, Mutex};

use crate::common::{chain, pipeline, position};

#[tokio::test]
async fn test_walk_pipeline_in_dependency_order() {
    let dag = pipeline();
    let started = Arc::new(Mutex::new(Vec::new()));

    let report = walk(&dag, WalkOptions::default().with_max_concurrency(3), |id, _| {
        let started = Arc::clone(&started);
        async move {
            started.lock().unwrap().push(id.to_string());
            tokio::task::yield_now().await;
            Ok::<_, String>(id.to_string())
        }
    })
    .await
    .expect("walk should run");

    assert!(report.is_success());
    assert_eq!(report.outcomes.len(), 5);
    assert_eq!(
        report.outcome("package"),
        Some(&Outcome::Succeeded("package".to_string()))
    );

    let started = started.lock().unwrap().clone();
    assert_eq!(started.len(), 5);
    assert!(position(&started, "fetch") < position(&started, "compile"));
    assert!(position(&started, "compile") < position(&started, "test"));
    assert!(position(&started, "test") < position(&started, "package"));
    assert!(position(&started, "docs") < position(&started, "package"));
}

#[tokio::test]
async fn test_walk_failure_skips_transitive_successors() {
    let dag = pipeline();

    let report = walk(&dag, WalkOptions::default(), |id, _| async move {
        if id.as_str() == "compile" {
            Err("compiler crashed")
        } else {
            Ok(())
        }
    })
    .await
    .unwrap();

    assert!(!report.is_success());
    assert_eq!(report.failed(), vec![&VertexId::new("compile")]);
    assert_eq!(
        report.skipped(),
        vec![&VertexId::new("package"), &VertexId::new("test")]
    );
    assert_eq!(
        report.outcome("package"),
        Some(&Outcome::Skipped {
            failed_predecessor: VertexId::new("compile")
        })
    );
    assert_eq!(report.outcome("docs"), Some(&Outcome::Succeeded(())));
}

#[tokio::test]
#[allow(clippy::panic)]
async fn test_walk_panicking_job_is_reported_as_failure() {
    let dag = chain(3);

    let report = walk(&dag, WalkOptions::default(), |id, data| async move {
        if id.as_str() == "v1" {
            panic!("job panicked");
        }
        Ok::<_, String>(data.unwrap_or_default())
    })
    .await
    .unwrap();

    assert!(matches!(report.outcome("v1"), Some(Outcome::Failed(_))));
    assert!(matches!(
        report.outcome("v2"),
        Some(Outcome::Skipped { .. })
    ));
    assert_eq!(report.outcome("v0"), Some(&Outcome::Succeeded(0)));
}

#[tokio::test]
async fn test_walk_chain_completes_in_order() {
    let dag = chain(10);
    let report = walk(&dag, WalkOptions::default(), |_, data| async move {
        Ok::<_, String>(data.unwrap_or_default() * 2)
    })
    .await
    .unwrap();

    let order: Vec<&str> = report
        .completion_order
        .iter()
        .map(VertexId::as_str)
        .collect();
    let expected: Vec<String> = (0..10).map(|i| format!("v{i}")).collect();
    assert_eq!(order, expected);
    assert_eq!(report.outcome("v9"), Some(&Outcome::Succeeded(18)));
}
