//! Parameter binding: descriptors plus overrides in, positional arguments out.

use crate::container::Container;
use crate::error::{ResolveError, Result};
use crate::metadata::ParameterDescriptor;
use crate::registry::Arguments;
use crate::value::{Params, Value};

/// Binds `params` in declaration order.
///
/// For each parameter the first applicable rule wins: an override of the same
/// name (variadic parameters spread a list override over the remaining
/// positions), the declared default, a container lookup of the declared type,
/// and finally a `MissingParameter` error. A variadic parameter without an
/// override contributes nothing.
pub(crate) fn bind(
  container: &Container,
  target: &str,
  params: &[ParameterDescriptor],
  overrides: &Params,
) -> Result<Arguments> {
  let mut args = Vec::with_capacity(params.len());

  for param in params {
    if let Some(value) = overrides.get(&param.name) {
      match (param.variadic, value) {
        (true, Value::List(items)) => {
          for item in items {
            args.push(expand(container, item)?);
          }
        }
        _ => args.push(expand(container, value)?),
      }
      continue;
    }

    if param.variadic {
      break;
    }

    if param.optional {
      args.push(param.default.clone());
      continue;
    }

    match &param.type_name {
      Some(type_name) => {
        tracing::trace!(target_id = %target, parameter = %param.name, type_name = %type_name, "autowiring parameter");
        args.push(container.get(type_name, Params::new())?);
      }
      None => {
        return Err(ResolveError::MissingParameter {
          target: target.to_owned(),
          parameter: param.name.clone(),
        })
      }
    }
  }

  Ok(Arguments::new(args))
}

/// Replaces every `InstanceOf` marker inside `value` with a built instance,
/// keeping the surrounding list and map structure.
pub(crate) fn expand(container: &Container, value: &Value) -> Result<Value> {
  if !value.contains_marker() {
    return Ok(value.clone());
  }

  match value {
    Value::InstanceOf { id, params } => container.create(id, params.clone()),
    Value::List(items) => items
      .iter()
      .map(|item| expand(container, item))
      .collect::<Result<Vec<_>>>()
      .map(Value::List),
    Value::Map(map) => map
      .iter()
      .map(|(key, item)| Ok((key.clone(), expand(container, item)?)))
      .collect::<Result<Params>>()
      .map(Value::Map),
    _ => Ok(value.clone()),
  }
}
