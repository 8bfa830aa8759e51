//! The metadata seam between the resolver and whatever knows how to describe,
//! allocate and call into concrete types.

use crate::error::BoxError;
use crate::registry::Arguments;
use crate::value::{Instance, Value};

/// Describes one constructor or method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
  pub name: String,
  pub optional: bool,
  /// Used when the parameter is optional, not variadic and not overridden.
  pub default: Value,
  pub variadic: bool,
  /// Declared type identifier for non-primitive parameters.
  pub type_name: Option<String>,
}

impl ParameterDescriptor {
  /// A required, untyped parameter.
  pub fn required(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      optional: false,
      default: Value::Null,
      variadic: false,
      type_name: None,
    }
  }

  /// An optional parameter falling back to `default`.
  pub fn optional(name: impl Into<String>, default: impl Into<Value>) -> Self {
    Self {
      optional: true,
      default: default.into(),
      ..Self::required(name)
    }
  }

  /// A trailing parameter accepting zero or more positional values.
  pub fn variadic(name: impl Into<String>) -> Self {
    Self {
      optional: true,
      variadic: true,
      ..Self::required(name)
    }
  }

  /// A required parameter whose declared type can be built by the container.
  pub fn typed(name: impl Into<String>, type_name: impl Into<String>) -> Self {
    Self::required(name).of_type(type_name)
  }

  /// Attaches a declared type, e.g. `ParameterDescriptor::variadic("b").of_type("TV")`.
  pub fn of_type(mut self, type_name: impl Into<String>) -> Self {
    self.type_name = Some(type_name.into());
    self
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
  /// Can be allocated.
  Concrete,
  /// Known by name (an interface or trait), but must be bound to a concrete
  /// type through a preference or alias before it can be built.
  Abstract,
}

/// Introspection and activation capability consumed by the container.
///
/// Implementations must be cheap to query: the container calls
/// `describe_*` once per identifier and caches the result, but `instantiate`
/// and `invoke` run on every construction.
pub trait MetadataProvider: Send + Sync {
  /// `None` when `type_name` is unknown.
  fn kind(&self, type_name: &str) -> Option<TypeKind>;

  /// Constructor parameters in declaration order, or `None` when the type has
  /// no constructor.
  fn describe_constructor(
    &self,
    type_name: &str,
  ) -> Result<Option<Vec<ParameterDescriptor>>, BoxError>;

  /// Parameters of `method` in declaration order.
  fn describe_method(
    &self,
    type_name: &str,
    method: &str,
  ) -> Result<Vec<ParameterDescriptor>, BoxError>;

  /// Allocates `type_name` with already bound positional arguments.
  fn instantiate(&self, type_name: &str, args: Arguments) -> Result<Instance, BoxError>;

  /// Calls `method` on `target` with already bound positional arguments.
  fn invoke(&self, target: &Instance, method: &str, args: Arguments) -> Result<(), BoxError>;
}
