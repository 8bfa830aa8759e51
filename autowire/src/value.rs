//! Dynamic values flowing through parameter binding.

use parking_lot::{MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Named parameter overrides, keyed by parameter name.
pub type Params = BTreeMap<String, Value>;

/// A constructed object.
///
/// Clones are handles to the same object: a mutation made through one handle
/// is observed through every other, which is what makes shared instances
/// behave as singletons.
#[derive(Clone)]
pub struct Instance {
  class: Arc<str>,
  inner: Arc<RwLock<Box<dyn Any + Send + Sync>>>,
}

impl Instance {
  pub fn new<T: Any + Send + Sync>(class: impl Into<Arc<str>>, object: T) -> Self {
    Self {
      class: class.into(),
      inner: Arc::new(RwLock::new(Box::new(object))),
    }
  }

  pub(crate) fn from_boxed(class: impl Into<Arc<str>>, object: Box<dyn Any + Send + Sync>) -> Self {
    Self {
      class: class.into(),
      inner: Arc::new(RwLock::new(object)),
    }
  }

  /// Runs `f` against the type-erased object while holding the write lock.
  pub(crate) fn with_object_mut<R>(&self, f: impl FnOnce(&mut (dyn Any + Send + Sync)) -> R) -> R {
    let mut guard = self.inner.write();
    f(&mut **guard)
  }

  /// The registered type identifier this object was built from.
  pub fn class(&self) -> &str {
    &self.class
  }

  pub fn is<T: Any>(&self) -> bool {
    self.inner.read().is::<T>()
  }

  /// Borrows the object as `T`, or `None` if it is some other type.
  pub fn borrow<T: Any>(&self) -> Option<MappedRwLockReadGuard<'_, T>> {
    RwLockReadGuard::try_map(self.inner.read(), |object| object.downcast_ref::<T>()).ok()
  }

  /// Mutably borrows the object as `T`, or `None` if it is some other type.
  pub fn borrow_mut<T: Any>(&self) -> Option<MappedRwLockWriteGuard<'_, T>> {
    RwLockWriteGuard::try_map(self.inner.write(), |object| object.downcast_mut::<T>()).ok()
  }

  /// True when both handles point at the same object.
  pub fn ptr_eq(&self, other: &Instance) -> bool {
    Arc::ptr_eq(&self.inner, &other.inner)
  }
}

impl fmt::Debug for Instance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Instance({} @ {:p})", self.class, Arc::as_ptr(&self.inner))
  }
}

/// A parameter value, a raw binding, or the result of a resolution.
#[derive(Debug, Clone, Default)]
pub enum Value {
  #[default]
  Null,
  Bool(bool),
  Int(i64),
  Float(f64),
  String(String),
  List(Vec<Value>),
  Map(Params),
  /// "Construct this type here": replaced by an instance of `id` (built with
  /// `params`) before it reaches a constructor or method.
  InstanceOf { id: String, params: Params },
  Object(Instance),
}

impl Value {
  /// Shorthand for an `InstanceOf` marker with no nested overrides.
  pub fn instance_of(id: impl Into<String>) -> Self {
    Value::InstanceOf {
      id: id.into(),
      params: Params::new(),
    }
  }

  pub fn instance_of_with(id: impl Into<String>, params: Params) -> Self {
    Value::InstanceOf {
      id: id.into(),
      params,
    }
  }

  pub fn kind(&self) -> &'static str {
    match self {
      Value::Null => "null",
      Value::Bool(_) => "bool",
      Value::Int(_) => "int",
      Value::Float(_) => "float",
      Value::String(_) => "string",
      Value::List(_) => "list",
      Value::Map(_) => "map",
      Value::InstanceOf { .. } => "instanceOf marker",
      Value::Object(_) => "object",
    }
  }

  pub fn is_null(&self) -> bool {
    matches!(self, Value::Null)
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Value::Bool(b) => Some(*b),
      _ => None,
    }
  }

  pub fn as_i64(&self) -> Option<i64> {
    match self {
      Value::Int(i) => Some(*i),
      _ => None,
    }
  }

  pub fn as_f64(&self) -> Option<f64> {
    match self {
      Value::Float(f) => Some(*f),
      Value::Int(i) => Some(*i as f64),
      _ => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::String(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_list(&self) -> Option<&[Value]> {
    match self {
      Value::List(items) => Some(items),
      _ => None,
    }
  }

  pub fn as_map(&self) -> Option<&Params> {
    match self {
      Value::Map(map) => Some(map),
      _ => None,
    }
  }

  pub fn as_instance(&self) -> Option<&Instance> {
    match self {
      Value::Object(instance) => Some(instance),
      _ => None,
    }
  }

  pub fn into_instance(self) -> Option<Instance> {
    match self {
      Value::Object(instance) => Some(instance),
      _ => None,
    }
  }

  /// True when this value, or anything nested inside it, is an `InstanceOf`
  /// marker that still has to be expanded.
  pub fn contains_marker(&self) -> bool {
    match self {
      Value::InstanceOf { .. } => true,
      Value::List(items) => items.iter().any(Value::contains_marker),
      Value::Map(map) => map.values().any(Value::contains_marker),
      _ => false,
    }
  }
}

// Objects compare by identity; everything else structurally.
impl PartialEq for Value {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Value::Null, Value::Null) => true,
      (Value::Bool(a), Value::Bool(b)) => a == b,
      (Value::Int(a), Value::Int(b)) => a == b,
      (Value::Float(a), Value::Float(b)) => a == b,
      (Value::String(a), Value::String(b)) => a == b,
      (Value::List(a), Value::List(b)) => a == b,
      (Value::Map(a), Value::Map(b)) => a == b,
      (
        Value::InstanceOf { id: a, params: pa },
        Value::InstanceOf { id: b, params: pb },
      ) => a == b && pa == pb,
      (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
      _ => false,
    }
  }
}

impl From<bool> for Value {
  fn from(b: bool) -> Self {
    Value::Bool(b)
  }
}

macro_rules! impl_from_int {
  ($($t:ty),+ $(,)?) => {
    $(
      impl From<$t> for Value {
        fn from(i: $t) -> Self {
          Value::Int(i as i64)
        }
      }
    )+
  };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32, usize);

impl From<f32> for Value {
  fn from(f: f32) -> Self {
    Value::Float(f as f64)
  }
}

impl From<f64> for Value {
  fn from(f: f64) -> Self {
    Value::Float(f)
  }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self {
    Value::String(s.to_owned())
  }
}

impl From<String> for Value {
  fn from(s: String) -> Self {
    Value::String(s)
  }
}

impl From<Instance> for Value {
  fn from(instance: Instance) -> Self {
    Value::Object(instance)
  }
}

impl From<Params> for Value {
  fn from(map: Params) -> Self {
    Value::Map(map)
  }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
  fn from(items: Vec<T>) -> Self {
    Value::List(items.into_iter().map(Into::into).collect())
  }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(option: Option<T>) -> Self {
    option.map_or(Value::Null, Into::into)
  }
}

/// Marker key recognised in JSON/YAML rules.
pub(crate) const INSTANCE_OF_KEY: &str = "instanceOf";
pub(crate) const MARKER_PARAMS_KEY: &str = "params";

impl From<serde_json::Value> for Value {
  fn from(json: serde_json::Value) -> Self {
    match json {
      serde_json::Value::Null => Value::Null,
      serde_json::Value::Bool(b) => Value::Bool(b),
      serde_json::Value::Number(n) => match n.as_i64() {
        Some(i) => Value::Int(i),
        None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
      },
      serde_json::Value::String(s) => Value::String(s),
      serde_json::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
      serde_json::Value::Object(mut map) => {
        let marker = match map.get(INSTANCE_OF_KEY) {
          Some(serde_json::Value::String(id)) => Some(id.clone()),
          _ => None,
        };
        if let Some(id) = marker {
          map.remove(INSTANCE_OF_KEY);
          let nested = match map.remove(MARKER_PARAMS_KEY) {
            Some(serde_json::Value::Object(nested)) => nested,
            _ => serde_json::Map::new(),
          };
          // Sibling keys are params too; entries under `params` take precedence.
          let params = map
            .into_iter()
            .chain(nested)
            .map(|(k, v)| (k, Value::from(v)))
            .collect();
          return Value::InstanceOf { id, params };
        }
        Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
      }
    }
  }
}
