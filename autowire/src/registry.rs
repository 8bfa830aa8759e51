//! An in-process [`MetadataProvider`] backed by registered factory closures.
//!
//! Rust has no runtime reflection, so every constructible type is described
//! up front: its constructor parameters, the closure that allocates it from
//! bound arguments, and the methods that may be injected after construction.

use crate::error::{ArgumentError, BoxError};
use crate::metadata::{MetadataProvider, ParameterDescriptor, TypeKind};
use crate::value::{Instance, Value};
use dashmap::DashMap;
use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

/// Positional arguments produced by parameter binding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
  values: Vec<Value>,
}

impl Arguments {
  pub fn new(values: Vec<Value>) -> Self {
    Self { values }
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&Value> {
    self.values.get(index)
  }

  pub fn value(&self, index: usize) -> Result<Value, ArgumentError> {
    self.values.get(index).cloned().ok_or(ArgumentError::Missing(index))
  }

  pub fn int(&self, index: usize) -> Result<i64, ArgumentError> {
    let value = self.values.get(index).ok_or(ArgumentError::Missing(index))?;
    value.as_i64().ok_or(ArgumentError::Type {
      index,
      expected: "int",
      found: value.kind(),
    })
  }

  pub fn bool(&self, index: usize) -> Result<bool, ArgumentError> {
    let value = self.values.get(index).ok_or(ArgumentError::Missing(index))?;
    value.as_bool().ok_or(ArgumentError::Type {
      index,
      expected: "bool",
      found: value.kind(),
    })
  }

  pub fn string(&self, index: usize) -> Result<String, ArgumentError> {
    let value = self.values.get(index).ok_or(ArgumentError::Missing(index))?;
    value.as_str().map(str::to_owned).ok_or(ArgumentError::Type {
      index,
      expected: "string",
      found: value.kind(),
    })
  }

  pub fn instance(&self, index: usize) -> Result<Instance, ArgumentError> {
    let value = self.values.get(index).ok_or(ArgumentError::Missing(index))?;
    value.as_instance().cloned().ok_or(ArgumentError::Type {
      index,
      expected: "object",
      found: value.kind(),
    })
  }

  /// Every argument from `from` onwards; what a variadic parameter receives.
  pub fn rest(&self, from: usize) -> Vec<Value> {
    self.values.get(from..).map(<[Value]>::to_vec).unwrap_or_default()
  }

  pub fn into_vec(self) -> Vec<Value> {
    self.values
  }
}

type AllocateFn = Arc<dyn Fn(Arguments) -> Result<Box<dyn Any + Send + Sync>, BoxError> + Send + Sync>;
type MethodFn = Arc<dyn Fn(&mut (dyn Any + Send + Sync), Arguments) -> Result<(), BoxError> + Send + Sync>;

#[derive(Clone)]
struct MethodEntry {
  params: Vec<ParameterDescriptor>,
  call: MethodFn,
}

#[derive(Clone)]
enum TypeEntry {
  Abstract,
  Concrete {
    constructor: Option<Vec<ParameterDescriptor>>,
    allocate: AllocateFn,
    methods: HashMap<String, MethodEntry>,
  },
}

/// Describes one constructible type before it is handed to a [`TypeRegistry`].
///
/// ```
/// use fibre_autowire::{ParameterDescriptor, TypeDefinition};
///
/// struct Tv {
///   inches: i64,
/// }
///
/// let tv = TypeDefinition::new("TV", |args| Ok(Tv { inches: args.int(0)? }))
///   .constructor(vec![ParameterDescriptor::optional("inches", 32)])
///   .method("resize", vec![ParameterDescriptor::required("inches")], |tv: &mut Tv, args| {
///     tv.inches = args.int(0)?;
///     Ok(())
///   });
/// # let _ = tv;
/// ```
pub struct TypeDefinition<T> {
  name: String,
  constructor: Option<Vec<ParameterDescriptor>>,
  allocate: AllocateFn,
  methods: HashMap<String, MethodEntry>,
  _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> TypeDefinition<T> {
  /// A type with no constructor parameters until [`constructor`](Self::constructor) is called.
  pub fn new<F>(name: impl Into<String>, allocate: F) -> Self
  where
    F: Fn(Arguments) -> Result<T, BoxError> + Send + Sync + 'static,
  {
    Self {
      name: name.into(),
      constructor: None,
      allocate: Arc::new(move |args: Arguments| {
        let object = allocate(args)?;
        Ok(Box::new(object) as Box<dyn Any + Send + Sync>)
      }),
      methods: HashMap::new(),
      _marker: PhantomData,
    }
  }

  pub fn constructor(mut self, params: Vec<ParameterDescriptor>) -> Self {
    self.constructor = Some(params);
    self
  }

  pub fn method<F>(mut self, name: impl Into<String>, params: Vec<ParameterDescriptor>, call: F) -> Self
  where
    F: Fn(&mut T, Arguments) -> Result<(), BoxError> + Send + Sync + 'static,
  {
    let name = name.into();
    let type_name = self.name.clone();
    let erased: MethodFn = Arc::new(move |object: &mut (dyn Any + Send + Sync), args: Arguments| {
      let object = object
        .downcast_mut::<T>()
        .ok_or_else(|| format!("object is not an instance of '{}'", type_name))?;
      call(object, args)
    });
    self.methods.insert(name, MethodEntry { params, call: erased });
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }
}

/// Thread-safe registry of constructible and abstract types.
#[derive(Default)]
pub struct TypeRegistry {
  types: DashMap<String, TypeEntry>,
}

impl TypeRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers (or replaces) a constructible type.
  pub fn register<T: Any + Send + Sync>(&self, definition: TypeDefinition<T>) -> &Self {
    tracing::trace!(type_name = %definition.name, "registering type");
    self.types.insert(
      definition.name,
      TypeEntry::Concrete {
        constructor: definition.constructor,
        allocate: definition.allocate,
        methods: definition.methods,
      },
    );
    self
  }

  /// Registers a name that can be depended upon but never built directly.
  pub fn register_abstract(&self, name: impl Into<String>) -> &Self {
    self.types.insert(name.into(), TypeEntry::Abstract);
    self
  }

  pub fn contains(&self, name: &str) -> bool {
    self.types.contains_key(name)
  }

  // Clone out of the map so no shard lock is held while user code runs.
  fn entry(&self, name: &str) -> Result<TypeEntry, BoxError> {
    self
      .types
      .get(name)
      .map(|entry| entry.value().clone())
      .ok_or_else(|| format!("type '{}' is not registered", name).into())
  }
}

impl MetadataProvider for TypeRegistry {
  fn kind(&self, type_name: &str) -> Option<TypeKind> {
    self.types.get(type_name).map(|entry| match entry.value() {
      TypeEntry::Abstract => TypeKind::Abstract,
      TypeEntry::Concrete { .. } => TypeKind::Concrete,
    })
  }

  fn describe_constructor(
    &self,
    type_name: &str,
  ) -> Result<Option<Vec<ParameterDescriptor>>, BoxError> {
    match self.entry(type_name)? {
      TypeEntry::Abstract => Err(format!("cannot instantiate abstract type '{}'", type_name).into()),
      TypeEntry::Concrete { constructor, .. } => Ok(constructor),
    }
  }

  fn describe_method(
    &self,
    type_name: &str,
    method: &str,
  ) -> Result<Vec<ParameterDescriptor>, BoxError> {
    match self.entry(type_name)? {
      TypeEntry::Abstract => Err(format!("abstract type '{}' has no callable methods", type_name).into()),
      TypeEntry::Concrete { methods, .. } => methods
        .get(method)
        .map(|entry| entry.params.clone())
        .ok_or_else(|| format!("method {}::{} does not exist", type_name, method).into()),
    }
  }

  fn instantiate(&self, type_name: &str, args: Arguments) -> Result<Instance, BoxError> {
    match self.entry(type_name)? {
      TypeEntry::Abstract => Err(format!("cannot instantiate abstract type '{}'", type_name).into()),
      TypeEntry::Concrete { allocate, .. } => {
        let object = allocate(args)?;
        Ok(Instance::from_boxed(type_name, object))
      }
    }
  }

  fn invoke(&self, target: &Instance, method: &str, args: Arguments) -> Result<(), BoxError> {
    let entry = match self.entry(target.class())? {
      TypeEntry::Concrete { methods, .. } => methods.get(method).cloned(),
      TypeEntry::Abstract => None,
    };
    let entry =
      entry.ok_or_else(|| format!("method {}::{} does not exist", target.class(), method))?;
    target.with_object_mut(|object| (entry.call)(object, args))
  }
}
