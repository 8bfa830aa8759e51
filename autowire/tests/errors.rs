mod common;

use common::*;
use fibre_autowire::{params, ResolveError};
use pretty_assertions::assert_eq;
use std::error::Error;

#[test]
fn test_unknown_identifier_is_not_found() {
  let container = container();

  let err = container.get("abcdefg", params! {}).unwrap_err();
  assert!(err.is_not_found());
  assert!(!err.is_construction_failure());
  assert_eq!(
    err.to_string(),
    "Identifier 'abcdefg' does not name a known type, alias or binding"
  );
}

#[test]
fn test_unknown_typed_dependency_is_not_found_unwrapped() {
  let container = container();
  container.set_preference("RoomInterface", "Attic");

  match container.create("House", params! {}).unwrap_err() {
    ResolveError::NotFound(id) => assert_eq!(id, "Attic"),
    other => panic!("unexpected error: {other}"),
  }
}

#[test]
fn test_constructor_errors_are_wrapped_with_their_source() {
  let container = container();

  let err = container.create("Grumpy", params! {}).unwrap_err();
  assert!(err.is_construction_failure());
  assert_eq!(err.to_string(), "Failed to construct 'Grumpy': refuses to be built");
  assert_eq!(err.source().unwrap().to_string(), "refuses to be built");
}

#[test]
fn test_failed_build_leaves_nothing_cached() {
  let container = container();

  assert!(container.get("TVRemote", params! {}).is_err());
  container.set_params("TVRemote", params! { "batteries" => "AA" });
  assert!(container.get("TVRemote", params! {}).is_ok());
}

#[test]
fn test_dependency_cycle_is_detected() {
  let container = container();

  match container.get("Chicken", params! {}).unwrap_err() {
    ResolveError::CycleDetected { chain } => assert_eq!(chain, vec!["Chicken", "Egg", "Chicken"]),
    other => panic!("unexpected error: {other}"),
  }
}

#[test]
fn test_cycle_error_leaves_container_usable() {
  let container = container();

  assert!(container.create("Chicken", params! {}).is_err());
  assert!(container.create("Sink", params! {}).is_ok());
  assert!(matches!(
    container.create("Egg", params! {}),
    Err(ResolveError::CycleDetected { .. })
  ));
}

#[test]
fn test_cycle_is_broken_by_an_override() {
  let container = container();

  let chicken = container.create("Chicken", params! { "egg" => "a plain egg" }).unwrap();
  assert!(object(chicken).is::<Chicken>());
}
