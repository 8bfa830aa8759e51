//! # Fibre Autowire
//!
//! A runtime object-construction resolver for Rust.
//!
//! Given the identifier of a type (or a symbolic alias for one) and an optional
//! map of named parameter overrides, the container produces a fully
//! constructed instance. Constructor arguments come from call-time overrides,
//! alias overrides, predefined params or declared defaults, and typed
//! parameters nobody supplied are built recursively.
//!
//! ## Core Concepts
//!
//! - **TypeRegistry**: describes every constructible type up front: its
//!   constructor parameters, an allocation closure, and injectable methods.
//!   Any other [`MetadataProvider`] can stand in for it.
//! - **Container**: holds the rules and the caches, and answers `get`
//!   (shared retrieval) and `create` (fresh retrieval).
//! - **Aliases and preferences**: aliases are named variants of a type with
//!   their own overrides; preferences redirect an identifier (typically an
//!   interface) to another one before anything else happens.
//! - **Injections**: methods called on each new object after construction.
//! - **Rules**: the same configuration, loaded from JSON or YAML.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_autowire::{params, Container, ParameterDescriptor, TypeDefinition, TypeRegistry, Value};
//! use std::sync::Arc;
//!
//! struct Tv {
//!   inches: i64,
//! }
//!
//! struct Remote {
//!   batteries: String,
//! }
//!
//! struct LivingRoom {
//!   tv: Value,
//!   remote: Value,
//! }
//!
//! let registry = TypeRegistry::new();
//! registry
//!   .register(
//!     TypeDefinition::new("TV", |args| Ok(Tv { inches: args.int(0)? }))
//!       .constructor(vec![ParameterDescriptor::optional("inches", 32)]),
//!   )
//!   .register(
//!     TypeDefinition::new("Remote", |args| Ok(Remote { batteries: args.string(0)? }))
//!       .constructor(vec![ParameterDescriptor::required("batteries")]),
//!   )
//!   .register(
//!     TypeDefinition::new("LivingRoom", |args| {
//!       Ok(LivingRoom { tv: args.value(0)?, remote: args.value(1)? })
//!     })
//!     .constructor(vec![
//!       ParameterDescriptor::typed("tv", "TV"),
//!       ParameterDescriptor::typed("remote", "Remote"),
//!     ]),
//!   );
//!
//! let container = Container::new(Arc::new(registry));
//! container.set_params("Remote", params! { "batteries" => "AA" });
//!
//! let room = container.get("LivingRoom", params! {}).unwrap().into_instance().unwrap();
//! let room = room.borrow::<LivingRoom>().unwrap();
//! let tv = room.tv.as_instance().unwrap().borrow::<Tv>().unwrap();
//! assert_eq!(tv.inches, 32);
//! ```

mod binder;
mod config;
mod container;
mod core;
mod error;
mod macros;
mod metadata;
mod plan;
mod registry;
mod resolver;
mod rules;
mod value;

pub use config::{AliasRule, InjectionRule, Rules};
pub use container::Container;
pub use error::{ArgumentError, BoxError, ConfigError, ResolveError, Result};
pub use metadata::{MetadataProvider, ParameterDescriptor, TypeKind};
pub use registry::{Arguments, TypeDefinition, TypeRegistry};
pub use rules::FactoryFn;
pub use value::{Instance, Params, Value};
