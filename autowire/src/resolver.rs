//! Turns a requested identifier into the concrete type to build.
//!
//! Preferences are followed first, then aliases. Parameters attached to
//! aliases accumulate on the way down, the outermost alias winning on
//! conflicting names, and every accumulated value loses to the call's own
//! overrides.

use crate::error::{ResolveError, Result};
use crate::metadata::MetadataProvider;
use crate::rules::RuleStore;
use crate::value::Params;

/// The outcome of following preferences and aliases for one request.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Resolution {
  /// Identifier after the preference chain; keys the construction plan.
  pub(crate) original: String,
  /// The type that will actually be allocated.
  pub(crate) concrete: String,
  /// Call overrides merged with every alias' params along the chain.
  pub(crate) overrides: Params,
}

pub(crate) fn resolve(
  rules: &RuleStore,
  provider: &dyn MetadataProvider,
  id: &str,
  overrides: Params,
) -> Result<Resolution> {
  let original = follow_preferences(rules, id)?;

  let mut overrides = overrides;
  let mut chain = vec![original.clone()];
  let mut concrete = original.clone();
  while let Some(alias) = rules.alias(&concrete) {
    if chain.iter().any(|seen| *seen == alias.target) {
      chain.push(alias.target.clone());
      tracing::warn!(chain = ?chain, "alias cycle detected");
      return Err(ResolveError::CycleDetected { chain });
    }
    for (name, value) in &alias.params {
      overrides.entry(name.clone()).or_insert_with(|| value.clone());
    }
    tracing::trace!(alias = %concrete, target = %alias.target, "following alias");
    concrete = alias.target.clone();
    chain.push(concrete.clone());
  }

  if provider.kind(&concrete).is_none() {
    return Err(ResolveError::NotFound(concrete));
  }

  Ok(Resolution {
    original,
    concrete,
    overrides,
  })
}

pub(crate) fn follow_preferences(rules: &RuleStore, id: &str) -> Result<String> {
  let mut chain = vec![id.to_owned()];
  let mut current = id;
  while let Some(next) = rules.preference(current) {
    if chain.iter().any(|seen| seen == next) {
      chain.push(next.to_owned());
      tracing::warn!(chain = ?chain, "preference cycle detected");
      return Err(ResolveError::CycleDetected { chain });
    }
    tracing::trace!(from = %current, to = %next, "following preference");
    chain.push(next.to_owned());
    current = next;
  }
  Ok(current.to_owned())
}
