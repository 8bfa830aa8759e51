use thiserror::Error;

/// Boxed error returned by user-supplied constructors, methods and factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for `fibre_autowire`.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// The identifier is not a known type, alias, preference, raw binding or factory.
  #[error("Identifier '{0}' does not name a known type, alias or binding")]
  NotFound(String),

  /// A required parameter had neither an override nor a resolvable declared type.
  #[error("Required parameter ${parameter} of '{target}' is missing")]
  MissingParameter { target: String, parameter: String },

  /// Introspection, allocation or method invocation failed for `id`.
  #[error("Failed to construct '{id}': {source}")]
  ConstructionFailure {
    id: String,
    #[source]
    source: BoxError,
  },

  /// A preference chain, alias chain or dependency graph loops back on itself.
  #[error("Cycle detected while resolving: {}", chain.join(" -> "))]
  CycleDetected { chain: Vec<String> },
}

impl ResolveError {
  pub(crate) fn construction(id: impl Into<String>, source: impl Into<BoxError>) -> Self {
    ResolveError::ConstructionFailure {
      id: id.into(),
      source: source.into(),
    }
  }

  /// True for every "could not build" condition, as opposed to lookups that
  /// failed before construction started.
  pub fn is_construction_failure(&self) -> bool {
    matches!(
      self,
      ResolveError::MissingParameter { .. } | ResolveError::ConstructionFailure { .. }
    )
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, ResolveError::NotFound(_))
  }
}

/// Raised by [`Arguments`](crate::Arguments) accessors when a constructor or
/// method receives something it cannot use.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArgumentError {
  #[error("Argument #{0} was not supplied")]
  Missing(usize),

  #[error("Argument #{index} should be {expected}, found {found}")]
  Type {
    index: usize,
    expected: &'static str,
    found: &'static str,
  },
}

/// Errors produced while loading declarative rules.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Failed to read rules file: {0}")]
  Read(#[from] std::io::Error),

  #[error("Failed to parse rules: {0}")]
  Parse(String),

  #[error("Unsupported rules file extension: {0:?}")]
  UnsupportedFormat(Option<String>),

  #[error("Invalid rule in '{section}' for '{key}': {message}")]
  InvalidRule {
    section: &'static str,
    key: String,
    message: String,
  },
}

/// A specialized `Result` type for `fibre_autowire` operations.
pub type Result<T, E = ResolveError> = std::result::Result<T, E>;
