//! The main `Container` struct and its associated methods.

use crate::config::Rules;
use crate::core::ResolutionGuard;
use crate::error::{BoxError, ResolveError, Result};
use crate::metadata::{MetadataProvider, TypeKind};
use crate::plan::ConstructionPlan;
use crate::resolver::{self, Resolution};
use crate::rules::{FactoryFn, RuleStore};
use crate::value::{Params, Value};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static NEXT_CONTAINER_ID: AtomicUsize = AtomicUsize::new(1);

/// The object-construction container.
///
/// Holds the rules (preferences, aliases, predefined params, sharing,
/// injections, raw values and factories), the shared-instance cache and the
/// construction-plan cache. Cloning is cheap and every clone sees the same
/// state; the container is `Send + Sync` and can be used from many threads.
///
/// ```
/// use fibre_autowire::{params, Container, ParameterDescriptor, TypeDefinition, TypeRegistry};
/// use std::sync::Arc;
///
/// struct Tv {
///   inches: i64,
/// }
///
/// let registry = TypeRegistry::new();
/// registry.register(
///   TypeDefinition::new("TV", |args| Ok(Tv { inches: args.int(0)? }))
///     .constructor(vec![ParameterDescriptor::optional("inches", 32)]),
/// );
///
/// let container = Container::new(Arc::new(registry));
/// container.set_alias("LargeTV", "TV", params! { "inches" => 55 });
///
/// let tv = container.create("LargeTV", params! {}).unwrap().into_instance().unwrap();
/// assert_eq!(tv.borrow::<Tv>().unwrap().inches, 55);
/// ```
#[derive(Clone)]
pub struct Container {
  inner: Arc<Inner>,
}

struct Inner {
  id: usize,
  provider: Arc<dyn MetadataProvider>,
  rules: RwLock<RuleStore>,
  shared_instances: DashMap<String, Value>,
  plans: DashMap<String, Arc<ConstructionPlan>>,
  plan_generation: AtomicUsize,
}

impl Container {
  /// Creates an empty container backed by `provider`.
  pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
    Self {
      inner: Arc::new(Inner {
        id: NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed),
        provider,
        rules: RwLock::new(RuleStore::default()),
        shared_instances: DashMap::new(),
        plans: DashMap::new(),
        plan_generation: AtomicUsize::new(0),
      }),
    }
  }

  pub fn provider(&self) -> &Arc<dyn MetadataProvider> {
    &self.inner.provider
  }

  // --- REGISTRATION ---

  /// Resolves `from` as `to` before anything else happens to a request.
  ///
  /// Unlike an alias, the resolved identifier becomes the identity used for
  /// injections and plan caching, so injections registered on `to` apply.
  pub fn set_preference(&self, from: impl Into<String>, to: impl Into<String>) -> &Self {
    let mut rules = self.inner.rules.write();
    rules.set_preference(from.into(), to.into());
    self.invalidate_plans();
    drop(rules);
    self
  }

  /// Registers `alias` as a name for `target` with its own parameter overrides.
  ///
  /// Setting the same alias again replaces the target and the overrides.
  pub fn set_alias(&self, alias: impl Into<String>, target: impl Into<String>, params: Params) -> &Self {
    let mut rules = self.inner.rules.write();
    rules.set_alias(alias.into(), target.into(), params);
    self.invalidate_plans();
    drop(rules);
    self
  }

  /// Predefines constructor parameters for a concrete type, merging with any
  /// previously predefined ones.
  pub fn set_params(&self, type_name: impl Into<String>, params: Params) -> &Self {
    self.inner.rules.write().set_params(type_name.into(), params);
    self
  }

  /// Marks `id` as shared (`true`) or explicitly unshared (`false`).
  pub fn set_shared(&self, id: impl Into<String>, shared: bool) -> &Self {
    self.inner.rules.write().set_shared(id.into(), shared);
    self
  }

  /// Calls `method` with `params` on every new object built for `id`.
  ///
  /// Repeated registrations of the same method add further calls.
  pub fn set_injection(&self, id: impl Into<String>, method: impl Into<String>, params: Params) -> &Self {
    let mut rules = self.inner.rules.write();
    rules.add_injection(id.into(), method.into(), params);
    self.invalidate_plans();
    drop(rules);
    self
  }

  /// Binds a raw value, returned as-is by [`get`](Self::get).
  pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> &Self {
    self.inner.rules.write().set_value(key.into(), value.into());
    self
  }

  /// Binds a factory invoked with the call's overrides whenever `key` is built.
  pub fn set_factory<F>(&self, key: impl Into<String>, factory: F) -> &Self
  where
    F: Fn(&Params) -> std::result::Result<Value, BoxError> + Send + Sync + 'static,
  {
    let factory: FactoryFn = Arc::new(factory);
    self.inner.rules.write().set_factory(key.into(), factory);
    self
  }

  /// Applies declarative rules section by section: preferences, aliases,
  /// params, shared, injections.
  pub fn set_rules(&self, rules: &Rules) -> &Self {
    tracing::debug!(
      preferences = rules.preferences.len(),
      aliases = rules.aliases.len(),
      params = rules.params.len(),
      shared = rules.shared.len(),
      injections = rules.injections.len(),
      "applying rules"
    );
    {
      let mut store = self.inner.rules.write();
      for (from, to) in &rules.preferences {
        store.set_preference(from.clone(), to.clone());
      }
      for (alias, rule) in &rules.aliases {
        store.set_alias(alias.clone(), rule.target.clone(), rule.params.clone());
      }
      for (type_name, params) in &rules.params {
        store.set_params(type_name.clone(), params.clone());
      }
      for (id, shared) in &rules.shared {
        store.set_shared(id.clone(), *shared);
      }
      for (id, injections) in &rules.injections {
        for injection in injections {
          store.add_injection(id.clone(), injection.method.clone(), injection.params.clone());
        }
      }
      self.invalidate_plans();
    }
    self
  }

  // --- RESOLUTION ---

  /// Retrieves `id`, reusing the shared instance unless sharing was
  /// explicitly turned off for it.
  ///
  /// Raw values are returned directly. Sharing and the cached instance belong
  /// to the identifier left after following preferences, so an interface and
  /// its preferred implementation share one instance. Once an instance is
  /// cached, later calls return it regardless of their overrides.
  pub fn get(&self, id: &str, overrides: Params) -> Result<Value> {
    let (key, shared) = {
      let rules = self.inner.rules.read();
      if let Some(value) = rules.value(id) {
        tracing::trace!(id = %id, "returning raw value");
        return Ok(value.clone());
      }
      let key = resolver::follow_preferences(&rules, id)?;
      let shared = rules.shared(&key);
      (key, shared)
    };

    if shared == Some(false) {
      return self.build(id, overrides);
    }

    if let Some(instance) = self.inner.shared_instances.get(&key) {
      tracing::trace!(id = %id, key = %key, "shared instance cache hit");
      return Ok(instance.value().clone());
    }

    let value = self.build(id, overrides)?;
    // Under a concurrent first access the first stored instance wins.
    let value = self
      .inner
      .shared_instances
      .entry(key.clone())
      .or_insert(value)
      .value()
      .clone();
    tracing::debug!(id = %id, key = %key, "cached shared instance");
    Ok(value)
  }

  /// Builds a fresh `id`, bypassing the shared-instance cache unless `id`
  /// (after preferences) is marked shared, in which case this is
  /// [`get`](Self::get).
  pub fn create(&self, id: &str, overrides: Params) -> Result<Value> {
    let shared = {
      let rules = self.inner.rules.read();
      let key = resolver::follow_preferences(&rules, id)?;
      rules.shared(&key)
    };
    if shared == Some(true) {
      return self.get(id, overrides);
    }
    self.build(id, overrides)
  }

  /// True when `id` is a constructible type, an alias, a preference, a raw
  /// value or a factory.
  ///
  /// Preferences count by their source name. A preference target is only
  /// reported when it is itself constructible or bound.
  pub fn has(&self, id: &str) -> bool {
    self.inner.rules.read().is_bound(id) || self.inner.provider.kind(id) == Some(TypeKind::Concrete)
  }

  // --- PRIVATE HELPERS ---

  fn build(&self, id: &str, overrides: Params) -> Result<Value> {
    let _guard = ResolutionGuard::enter(self.inner.id, id)?;

    let factory = self.inner.rules.read().factory(id).cloned();
    if let Some(factory) = factory {
      tracing::debug!(id = %id, "invoking factory");
      return factory(&overrides).map_err(|e| ResolveError::construction(id, e));
    }

    let resolution = {
      let rules = self.inner.rules.read();
      resolver::resolve(&rules, self.inner.provider.as_ref(), id, overrides)?
    };
    tracing::debug!(id = %id, concrete = %resolution.concrete, "building");

    let plan = self.plan_for(&resolution)?;
    plan.execute(self, resolution.overrides)
  }

  fn plan_for(&self, resolution: &Resolution) -> Result<Arc<ConstructionPlan>> {
    if let Some(plan) = self.inner.plans.get(&resolution.original) {
      return Ok(Arc::clone(plan.value()));
    }

    let (generation, directives) = {
      let rules = self.inner.rules.read();
      let generation = self.inner.plan_generation.load(Ordering::Acquire);
      (generation, rules.injections(&resolution.original).to_vec())
    };
    let plan = Arc::new(ConstructionPlan::build(
      self.inner.provider.as_ref(),
      &resolution.concrete,
      &directives,
    )?);

    // Invalidation runs under the rules write lock; a plan built from rules
    // that changed meanwhile is used for this call only.
    let _rules = self.inner.rules.read();
    if self.inner.plan_generation.load(Ordering::Acquire) == generation {
      self.inner.plans.insert(resolution.original.clone(), Arc::clone(&plan));
    }
    Ok(plan)
  }

  pub(crate) fn predefined_params(&self, type_name: &str) -> Params {
    self.inner.rules.read().params(type_name).cloned().unwrap_or_default()
  }

  // Callers hold the rules write lock.
  fn invalidate_plans(&self) {
    self.inner.plan_generation.fetch_add(1, Ordering::AcqRel);
    self.inner.plans.clear();
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container")
      .field("id", &self.inner.id)
      .field("shared_instances", &self.inner.shared_instances.len())
      .field("plans", &self.inner.plans.len())
      .finish()
  }
}
