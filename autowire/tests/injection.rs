mod common;

use common::*;
use fibre_autowire::{params, ResolveError, Value};
use pretty_assertions::assert_eq;

#[test]
fn test_injected_methods_receive_params() {
  let container = container();
  container.set_injection("Entity", "setId", params! { "id" => 5 });
  container.set_injection("Entity", "setUserId", params! { "userId" => 7 });

  let entity = object(container.get("Entity", params! {}).unwrap());
  let entity = entity.borrow::<Entity>().unwrap();
  assert_eq!(entity.id, Value::Int(5));
  assert_eq!(entity.user_id, Value::Int(7));
}

#[test]
fn test_same_method_can_be_injected_repeatedly() {
  let container = container();
  container.set_injection("Logger", "addLogger", params! { "logger" => "foo" });
  container.set_injection("Logger", "addLogger", params! { "logger" => "bar" });

  let logger = object(container.get("Logger", params! {}).unwrap());
  assert_eq!(
    logger.borrow::<Logger>().unwrap().loggers,
    vec![Value::from("foo"), Value::from("bar")]
  );
}

#[test]
fn test_parameterless_methods_can_be_injected() {
  let container = container();
  container.set_injection("Foo", "doSomething", params! {});
  container.set_injection("Foo", "doSomethingElse", params! {});

  let foo = object(container.create("Foo", params! {}).unwrap());
  let foo = foo.borrow::<Foo>().unwrap();
  assert!(foo.something_happened);
  assert!(foo.something_else_happened);
}

#[test]
fn test_injected_typed_parameters_are_autowired() {
  let container = container();
  container.set_injection("Bar", "setEntity", params! {});

  let bar = object(container.create("Bar", params! {}).unwrap());
  let bar = bar.borrow::<Bar>().unwrap();
  assert!(bar.entity.as_ref().unwrap().is::<Entity>());
}

#[test]
fn test_injected_parameters_accept_instance_markers() {
  let container = container();
  container.set_alias("Entity2", "Entity", params! {});
  container.set_injection("Entity2", "setId", params! { "id" => 99 });
  container.set_injection("Bar", "setEntity", params! { "entity" => Value::instance_of("Entity2") });

  let bar = object(container.create("Bar", params! {}).unwrap());
  let bar = bar.borrow::<Bar>().unwrap();
  let entity = bar.entity.as_ref().unwrap().borrow::<Entity>().unwrap();
  assert_eq!(entity.id, Value::Int(99));
}

#[test]
fn test_alias_injections_apply_only_through_that_alias() {
  let container = container();
  container.set_alias("Foo2", "Foo", params! {});
  container.set_alias("Foo3", "Foo", params! {});
  container.set_injection("Foo2", "doSomething", params! {});

  let through_alias = object(container.create("Foo2", params! {}).unwrap());
  let direct = object(container.create("Foo", params! {}).unwrap());
  let other_alias = object(container.create("Foo3", params! {}).unwrap());

  assert!(through_alias.borrow::<Foo>().unwrap().something_happened);
  assert!(!direct.borrow::<Foo>().unwrap().something_happened);
  assert!(!other_alias.borrow::<Foo>().unwrap().something_happened);
}

#[test]
fn test_injections_registered_after_first_build_apply() {
  let container = container();

  let foo = object(container.create("Foo", params! {}).unwrap());
  assert!(!foo.borrow::<Foo>().unwrap().something_happened);

  container.set_injection("Foo", "doSomething", params! {});
  let foo = object(container.create("Foo", params! {}).unwrap());
  assert!(foo.borrow::<Foo>().unwrap().something_happened);
}

#[test]
fn test_missing_method_parameter_names_the_method() {
  let container = container();
  container.set_injection("Entity", "setId", params! {});

  match container.create("Entity", params! {}).unwrap_err() {
    ResolveError::MissingParameter { target, parameter } => {
      assert_eq!(target, "Entity::setId");
      assert_eq!(parameter, "id");
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[test]
fn test_unknown_method_is_a_construction_failure() {
  let container = container();
  container.set_injection("Entity", "setNothing", params! {});

  let err = container.create("Entity", params! {}).unwrap_err();
  assert!(err.is_construction_failure());
  assert_eq!(
    err.to_string(),
    "Failed to construct 'Entity': method Entity::setNothing does not exist"
  );
}
