//! Cached construction procedures.
//!
//! A plan captures only topology and metadata: which type to allocate, its
//! constructor descriptors and the chain of injected method calls. Overrides
//! and predefined params are supplied when the plan runs, so a cached plan
//! never pins resolved values.

use crate::binder;
use crate::container::Container;
use crate::error::{ResolveError, Result};
use crate::metadata::{MetadataProvider, ParameterDescriptor};
use crate::registry::Arguments;
use crate::rules::InjectionDirective;
use crate::value::{Params, Value};
use std::sync::Arc;

#[derive(Debug)]
struct InjectionCall {
  method: String,
  params: Arc<Vec<ParameterDescriptor>>,
  overrides: Params,
}

#[derive(Debug)]
pub(crate) struct ConstructionPlan {
  concrete: String,
  /// `None` when the type has no constructor or a parameterless one.
  constructor: Option<Vec<ParameterDescriptor>>,
  injections: Vec<InjectionCall>,
}

impl ConstructionPlan {
  /// Introspects `concrete` and every method named by `directives`.
  pub(crate) fn build(
    provider: &dyn MetadataProvider,
    concrete: &str,
    directives: &[InjectionDirective],
  ) -> Result<Self> {
    let constructor = provider
      .describe_constructor(concrete)
      .map_err(|e| ResolveError::construction(concrete, e))?
      .filter(|params| !params.is_empty());

    let mut injections = Vec::new();
    for directive in directives {
      let params = provider
        .describe_method(concrete, &directive.method)
        .map_err(|e| ResolveError::construction(concrete, e))?;
      let params = Arc::new(params);
      for overrides in &directive.calls {
        injections.push(InjectionCall {
          method: directive.method.clone(),
          params: Arc::clone(&params),
          overrides: overrides.clone(),
        });
      }
    }

    tracing::debug!(
      concrete = %concrete,
      constructor_params = constructor.as_ref().map_or(0, Vec::len),
      injections = injections.len(),
      "built construction plan"
    );

    Ok(Self {
      concrete: concrete.to_owned(),
      constructor,
      injections,
    })
  }

  /// Allocates the concrete type and runs every injection against it.
  ///
  /// `overrides` beat the predefined params of the concrete type, which in
  /// turn beat declared defaults.
  pub(crate) fn execute(&self, container: &Container, overrides: Params) -> Result<Value> {
    let args = match &self.constructor {
      None => Arguments::default(),
      Some(params) => {
        let mut merged = overrides;
        for (name, value) in container.predefined_params(&self.concrete) {
          merged.entry(name).or_insert(value);
        }
        binder::bind(container, &self.concrete, params, &merged)?
      }
    };

    let provider = container.provider();
    let instance = provider
      .instantiate(&self.concrete, args)
      .map_err(|e| ResolveError::construction(&self.concrete, e))?;

    for call in &self.injections {
      let target = format!("{}::{}", self.concrete, call.method);
      let args = binder::bind(container, &target, &call.params, &call.overrides)?;
      tracing::trace!(method = %target, args = args.len(), "invoking injected method");
      provider
        .invoke(&instance, &call.method, args)
        .map_err(|e| ResolveError::construction(&self.concrete, e))?;
    }

    Ok(Value::Object(instance))
  }
}
