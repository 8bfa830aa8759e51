#![allow(dead_code)]

use fibre_autowire::{
  Arguments, BoxError, Container, Instance, ParameterDescriptor, TypeDefinition, TypeRegistry, Value,
};
use std::sync::Arc;

// --- Rooms ---

#[derive(Debug)]
pub struct Sink;

#[derive(Debug)]
pub struct Tv {
  pub inches: Value,
}

#[derive(Debug)]
pub struct TvRemote {
  pub batteries: Value,
  pub buttons: i64,
}

#[derive(Debug)]
pub struct LivingRoom {
  pub tv: Instance,
  pub remote: Instance,
}

#[derive(Debug)]
pub struct Kitchen {
  pub sink: Instance,
  pub toaster: Value,
}

#[derive(Debug)]
pub struct House {
  pub living_room: Instance,
  pub kitchen: Instance,
}

#[derive(Debug)]
pub struct Variadic {
  pub a: Value,
  pub b: Vec<Value>,
}

// --- Setter injection ---

#[derive(Debug, Default)]
pub struct Entity {
  pub id: Value,
  pub user_id: Value,
}

#[derive(Debug, Default)]
pub struct Logger {
  pub loggers: Vec<Value>,
}

#[derive(Debug, Default)]
pub struct Foo {
  pub something_happened: bool,
  pub something_else_happened: bool,
}

#[derive(Debug, Default)]
pub struct Bar {
  pub entity: Option<Instance>,
}

#[derive(Debug, Default)]
pub struct Baz {
  pub bazzles: Vec<Value>,
}

// --- Failure cases ---

#[derive(Debug)]
pub struct Chicken;

#[derive(Debug)]
pub struct Egg;

fn instance(args: &Arguments, index: usize) -> Result<Instance, BoxError> {
  Ok(args.instance(index)?)
}

/// Registers every fixture type used by the integration tests.
pub fn registry() -> TypeRegistry {
  let registry = TypeRegistry::new();

  registry
    .register(TypeDefinition::new("Sink", |_| Ok(Sink)))
    .register(
      TypeDefinition::new("TV", |args| Ok(Tv { inches: args.value(0)? }))
        .constructor(vec![ParameterDescriptor::optional("inches", 32)]),
    )
    .register(
      TypeDefinition::new("TVRemote", |args| {
        Ok(TvRemote {
          batteries: args.value(0)?,
          buttons: args.int(1)?,
        })
      })
      .constructor(vec![
        ParameterDescriptor::required("batteries"),
        ParameterDescriptor::optional("buttons", 12),
      ]),
    )
    .register_abstract("RoomInterface")
    .register(
      TypeDefinition::new("LivingRoom", |args| {
        Ok(LivingRoom {
          tv: instance(&args, 0)?,
          remote: instance(&args, 1)?,
        })
      })
      .constructor(vec![
        ParameterDescriptor::typed("tv", "TV"),
        ParameterDescriptor::typed("tvRemote", "TVRemote"),
      ]),
    )
    .register(
      TypeDefinition::new("Kitchen", |args| {
        Ok(Kitchen {
          sink: instance(&args, 0)?,
          toaster: Value::Bool(true),
        })
      })
      .constructor(vec![ParameterDescriptor::typed("sink", "Sink")])
      .method("setToaster", vec![ParameterDescriptor::required("toaster")], |kitchen: &mut Kitchen, args| {
        kitchen.toaster = args.value(0)?;
        Ok(())
      }),
    )
    .register(
      TypeDefinition::new("House", |args| {
        Ok(House {
          living_room: instance(&args, 0)?,
          kitchen: instance(&args, 1)?,
        })
      })
      .constructor(vec![
        ParameterDescriptor::typed("livingRoom", "RoomInterface"),
        ParameterDescriptor::typed("kitchen", "RoomInterface"),
      ]),
    )
    .register(
      TypeDefinition::new("Variadic", |args| {
        Ok(Variadic {
          a: args.value(0)?,
          b: args.rest(1),
        })
      })
      .constructor(vec![
        ParameterDescriptor::required("a"),
        ParameterDescriptor::variadic("b"),
      ]),
    )
    .register(
      TypeDefinition::new("VariadicWithTypeHinting", |args| {
        Ok(Variadic {
          a: args.value(0)?,
          b: args.rest(1),
        })
      })
      .constructor(vec![
        ParameterDescriptor::required("a"),
        ParameterDescriptor::variadic("b").of_type("TV"),
      ]),
    );

  registry
    .register(
      TypeDefinition::new("Entity", |_| Ok(Entity::default()))
        .method("setId", vec![ParameterDescriptor::required("id")], |entity: &mut Entity, args| {
          entity.id = args.value(0)?;
          Ok(())
        })
        .method("setUserId", vec![ParameterDescriptor::required("userId")], |entity: &mut Entity, args| {
          entity.user_id = args.value(0)?;
          Ok(())
        }),
    )
    .register(TypeDefinition::new("Logger", |_| Ok(Logger::default())).method(
      "addLogger",
      vec![ParameterDescriptor::required("logger")],
      |logger: &mut Logger, args| {
        logger.loggers.push(args.value(0)?);
        Ok(())
      },
    ))
    .register(
      TypeDefinition::new("Foo", |_| Ok(Foo::default()))
        .method("doSomething", vec![], |foo: &mut Foo, _| {
          foo.something_happened = true;
          Ok(())
        })
        .method("doSomethingElse", vec![], |foo: &mut Foo, _| {
          foo.something_else_happened = true;
          Ok(())
        }),
    )
    .register(TypeDefinition::new("Bar", |_| Ok(Bar::default())).method(
      "setEntity",
      vec![ParameterDescriptor::typed("entity", "Entity")],
      |bar: &mut Bar, args| {
        bar.entity = Some(args.instance(0)?);
        Ok(())
      },
    ))
    .register(TypeDefinition::new("Baz", |_| Ok(Baz::default())).method(
      "setBazzles",
      vec![ParameterDescriptor::variadic("bazzles")],
      |baz: &mut Baz, args| {
        baz.bazzles = args.rest(0);
        Ok(())
      },
    ))
    .register(TypeDefinition::new("Bazz", |_| Ok(Baz::default())).method(
      "setBazzles",
      vec![ParameterDescriptor::variadic("bazzles").of_type("Baz")],
      |baz: &mut Baz, args| {
        baz.bazzles = args.rest(0);
        Ok(())
      },
    ));

  registry
    .register(
      TypeDefinition::new("Chicken", |_| Ok(Chicken))
        .constructor(vec![ParameterDescriptor::typed("egg", "Egg")]),
    )
    .register(
      TypeDefinition::new("Egg", |_| Ok(Egg))
        .constructor(vec![ParameterDescriptor::typed("chicken", "Chicken")]),
    )
    .register(
      TypeDefinition::new("Grumpy", |_| -> Result<Sink, BoxError> { Err("refuses to be built".into()) })
        .constructor(vec![ParameterDescriptor::optional("mood", "bad")]),
    );

  registry
}

pub fn container() -> Container {
  Container::new(Arc::new(registry()))
}

/// Unwraps a resolution result into the constructed object.
pub fn object(value: Value) -> Instance {
  match value {
    Value::Object(instance) => instance,
    other => panic!("expected an object, got {:?}", other),
  }
}

/// Reads the `inches` field of a `TV` instance.
pub fn inches(value: &Value) -> Value {
  let instance = value.as_instance().expect("expected a TV instance");
  let tv = instance.borrow::<Tv>().expect("instance is not a TV");
  tv.inches.clone()
}

/// Sets the `inches` field of a `TV` instance.
pub fn set_inches(value: &Value, inches: impl Into<Value>) {
  let instance = value.as_instance().expect("expected a TV instance");
  instance.borrow_mut::<Tv>().expect("instance is not a TV").inches = inches.into();
}
