//! Dependency-cycle detection shared by every container on a thread.

use crate::error::{ResolveError, Result};
use std::cell::RefCell;

thread_local! {
  // Identifiers currently being built on this thread, outermost first. Keyed
  // by container so two containers never see each other's in-flight builds.
  static RESOLVING_STACK: RefCell<Vec<ResolutionKey>> = const { RefCell::new(Vec::new()) };
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolutionKey {
  container: usize,
  identifier: String,
}

/// An RAII guard marking an identifier as "being built".
///
/// Entering an identifier that is already on the stack for the same container
/// means the dependency graph loops back on itself; instead of recursing until
/// the stack overflows, `enter` reports the loop. Dropping the guard pops the
/// identifier again.
pub(crate) struct ResolutionGuard {
  key: ResolutionKey,
}

impl ResolutionGuard {
  pub(crate) fn enter(container: usize, identifier: &str) -> Result<Self> {
    let key = ResolutionKey {
      container,
      identifier: identifier.to_owned(),
    };

    RESOLVING_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();
      if let Some(start) = stack.iter().position(|k| *k == key) {
        let chain: Vec<String> = stack[start..]
          .iter()
          .filter(|k| k.container == container)
          .map(|k| k.identifier.clone())
          .chain(std::iter::once(key.identifier.clone()))
          .collect();
        tracing::warn!(chain = ?chain, "dependency cycle detected");
        return Err(ResolveError::CycleDetected { chain });
      }
      stack.push(key.clone());
      Ok(())
    })?;

    Ok(Self { key })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();
      if let Some(pos) = stack.iter().rposition(|k| *k == self.key) {
        stack.remove(pos);
      }
    });
  }
}
