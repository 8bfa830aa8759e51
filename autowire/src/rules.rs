//! Registered configuration: the data every resolution reads from.

use crate::error::BoxError;
use crate::value::{Params, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// A factory binding. Receives the overrides of the `create`/`get` call.
pub type FactoryFn = Arc<dyn Fn(&Params) -> Result<Value, BoxError> + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Alias {
  pub(crate) target: String,
  pub(crate) params: Params,
}

/// One injected method and every call registered for it, in registration order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct InjectionDirective {
  pub(crate) method: String,
  pub(crate) calls: Vec<Params>,
}

#[derive(Default)]
pub(crate) struct RuleStore {
  preferences: HashMap<String, String>,
  aliases: HashMap<String, Alias>,
  params: HashMap<String, Params>,
  shared: HashMap<String, bool>,
  injections: HashMap<String, Vec<InjectionDirective>>,
  values: HashMap<String, Value>,
  factories: HashMap<String, FactoryFn>,
}

impl RuleStore {
  pub(crate) fn set_preference(&mut self, from: String, to: String) {
    self.preferences.insert(from, to);
  }

  /// Replaces any previous alias of the same name, params included.
  pub(crate) fn set_alias(&mut self, alias: String, target: String, params: Params) {
    self.aliases.insert(alias, Alias { target, params });
  }

  /// Merges into previously predefined params; same-named keys are overwritten.
  pub(crate) fn set_params(&mut self, id: String, params: Params) {
    self.params.entry(id).or_default().extend(params);
  }

  pub(crate) fn set_shared(&mut self, id: String, shared: bool) {
    self.shared.insert(id, shared);
  }

  pub(crate) fn add_injection(&mut self, id: String, method: String, params: Params) {
    let directives = self.injections.entry(id).or_default();
    match directives.iter_mut().find(|d| d.method == method) {
      Some(directive) => directive.calls.push(params),
      None => directives.push(InjectionDirective {
        method,
        calls: vec![params],
      }),
    }
  }

  pub(crate) fn set_value(&mut self, key: String, value: Value) {
    self.values.insert(key, value);
  }

  pub(crate) fn set_factory(&mut self, key: String, factory: FactoryFn) {
    self.factories.insert(key, factory);
  }

  pub(crate) fn preference(&self, id: &str) -> Option<&str> {
    self.preferences.get(id).map(String::as_str)
  }

  pub(crate) fn alias(&self, id: &str) -> Option<&Alias> {
    self.aliases.get(id)
  }

  pub(crate) fn params(&self, id: &str) -> Option<&Params> {
    self.params.get(id)
  }

  /// `None` when sharing was never configured for `id`.
  pub(crate) fn shared(&self, id: &str) -> Option<bool> {
    self.shared.get(id).copied()
  }

  pub(crate) fn injections(&self, id: &str) -> &[InjectionDirective] {
    self.injections.get(id).map(Vec::as_slice).unwrap_or_default()
  }

  pub(crate) fn value(&self, key: &str) -> Option<&Value> {
    self.values.get(key)
  }

  pub(crate) fn factory(&self, key: &str) -> Option<&FactoryFn> {
    self.factories.get(key)
  }

  /// True when `id` is an alias, a preference source, a raw value or a factory.
  pub(crate) fn is_bound(&self, id: &str) -> bool {
    self.aliases.contains_key(id)
      || self.preferences.contains_key(id)
      || self.values.contains_key(id)
      || self.factories.contains_key(id)
  }
}
