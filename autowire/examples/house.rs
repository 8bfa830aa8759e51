use fibre_autowire::{params, Container, ParameterDescriptor, Rules, TypeDefinition, TypeRegistry, Value};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

struct Tv {
  inches: i64,
}

struct Kitchen {
  toaster: bool,
}

struct House {
  kitchen: Value,
  tv: Value,
}

fn registry() -> TypeRegistry {
  let registry = TypeRegistry::new();
  registry
    .register(
      TypeDefinition::new("TV", |args| Ok(Tv { inches: args.int(0)? }))
        .constructor(vec![ParameterDescriptor::optional("inches", 32)]),
    )
    .register_abstract("RoomInterface")
    .register(
      TypeDefinition::new("Kitchen", |_| Ok(Kitchen { toaster: false })).method(
        "setToaster",
        vec![ParameterDescriptor::required("toaster")],
        |kitchen: &mut Kitchen, args| {
          kitchen.toaster = args.bool(0)?;
          Ok(())
        },
      ),
    )
    .register(
      TypeDefinition::new("House", |args| {
        Ok(House {
          kitchen: args.value(0)?,
          tv: args.value(1)?,
        })
      })
      .constructor(vec![
        ParameterDescriptor::typed("kitchen", "RoomInterface"),
        ParameterDescriptor::typed("tv", "TV"),
      ]),
    );
  registry
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  // RUST_LOG=fibre_autowire=trace shows every resolution step.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let container = Container::new(Arc::new(registry()));
  container.set_rules(&Rules::from_yaml_str(
    r#"
preferences:
  RoomInterface: Kitchen
aliases:
  LargeTV: [TV, { inches: 65 }]
injections:
  Kitchen:
    - [setToaster, { toaster: true }]
"#,
  )?);

  let house = container
    .get("House", params! { "tv" => Value::instance_of("LargeTV") })?
    .into_instance()
    .ok_or("House did not resolve to an object")?;
  let house = house.borrow::<House>().ok_or("unexpected House type")?;

  let kitchen = house.kitchen.as_instance().ok_or("kitchen is not an object")?;
  let tv = house.tv.as_instance().ok_or("tv is not an object")?;
  println!("kitchen is a {} with toaster = {}", kitchen.class(), kitchen.borrow::<Kitchen>().map_or(false, |k| k.toaster));
  println!("tv is {} inches", tv.borrow::<Tv>().map_or(0, |tv| tv.inches));

  Ok(())
}
