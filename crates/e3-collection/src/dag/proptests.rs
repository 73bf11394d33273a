//! Property-based tests for DAG operations.
