//! Declarative rules, loadable from JSON or YAML.
//!
//! ```yaml
//! preferences:
//!   RoomInterface: Kitchen
//! aliases:
//!   LargeTV: [TV]
//!   SmallTV: [TV, { inches: 12 }]
//! params:
//!   TV: { inches: 55 }
//! shared:
//!   LargeTV: true
//! injections:
//!   Logger:
//!     - [addLogger, { logger: foo }]
//!     - [addLogger, { logger: { instanceOf: FileLogger } }]
//! ```
//!
//! Every section is optional. Parameter maps go through the same conversion
//! as [`Value::from`] on a `serde_json::Value`, so `{ instanceOf: X }` objects
//! become construction markers. Keys next to `instanceOf` are read as the
//! marker's params, merged under an explicit `params` map.

use crate::error::ConfigError;
use crate::value::{Params, Value};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

// --- Raw (deserialized) form ---

#[derive(Debug, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
struct RulesRaw {
  #[serde(default)]
  preferences: BTreeMap<String, String>,
  #[serde(default)]
  aliases: BTreeMap<String, TargetRaw>,
  #[serde(default)]
  params: BTreeMap<String, serde_json::Value>,
  #[serde(default)]
  shared: BTreeMap<String, bool>,
  #[serde(default)]
  injections: BTreeMap<String, Vec<TargetRaw>>,
}

/// `name`, `[name]` or `[name, {params}]`; used by aliases and injections.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
enum TargetRaw {
  WithParams((String, serde_json::Value)),
  Bare((String,)),
  Name(String),
}

impl TargetRaw {
  fn into_parts(self) -> (String, Option<serde_json::Value>) {
    match self {
      TargetRaw::WithParams((name, params)) => (name, Some(params)),
      TargetRaw::Bare((name,)) | TargetRaw::Name(name) => (name, None),
    }
  }
}

// --- Processed form ---

#[derive(Debug, Clone, PartialEq)]
pub struct AliasRule {
  pub target: String,
  pub params: Params,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InjectionRule {
  pub method: String,
  pub params: Params,
}

/// A validated rule set, applied with [`Container::set_rules`](crate::Container::set_rules).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rules {
  pub preferences: BTreeMap<String, String>,
  pub aliases: BTreeMap<String, AliasRule>,
  pub params: BTreeMap<String, Params>,
  pub shared: BTreeMap<String, bool>,
  /// Calls per identifier, in the order they are listed.
  pub injections: BTreeMap<String, Vec<InjectionRule>>,
}

impl Rules {
  pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
    let raw: RulesRaw = serde_json::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
    Self::from_raw(raw)
  }

  pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
    let raw: RulesRaw = serde_yaml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
    Self::from_raw(raw)
  }

  /// Loads a `.json`, `.yaml` or `.yml` file.
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let extension = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_ascii_lowercase);

    match extension.as_deref() {
      Some("json") => {
        let contents = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading JSON rules");
        Self::from_json_str(&contents)
      }
      Some("yaml") | Some("yml") => {
        let contents = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading YAML rules");
        Self::from_yaml_str(&contents)
      }
      _ => Err(ConfigError::UnsupportedFormat(extension)),
    }
  }

  fn from_raw(raw: RulesRaw) -> Result<Self, ConfigError> {
    let mut rules = Rules {
      preferences: raw.preferences,
      shared: raw.shared,
      ..Rules::default()
    };

    for (from, to) in &rules.preferences {
      if to.is_empty() {
        return Err(invalid("preferences", from, "target must not be empty"));
      }
    }

    for (alias, target) in raw.aliases {
      let (target, params) = target.into_parts();
      if target.is_empty() {
        return Err(invalid("aliases", &alias, "target must not be empty"));
      }
      let params = to_params("aliases", &alias, params)?;
      rules.aliases.insert(alias, AliasRule { target, params });
    }

    for (type_name, params) in raw.params {
      let params = to_params("params", &type_name, Some(params))?;
      rules.params.insert(type_name, params);
    }

    for (id, calls) in raw.injections {
      let mut injections = Vec::with_capacity(calls.len());
      for call in calls {
        let (method, params) = call.into_parts();
        if method.is_empty() {
          return Err(invalid("injections", &id, "method name must not be empty"));
        }
        injections.push(InjectionRule {
          method,
          params: to_params("injections", &id, params)?,
        });
      }
      rules.injections.insert(id, injections);
    }

    Ok(rules)
  }
}

fn to_params(
  section: &'static str,
  key: &str,
  params: Option<serde_json::Value>,
) -> Result<Params, ConfigError> {
  match params {
    None | Some(serde_json::Value::Null) => Ok(Params::new()),
    // An empty YAML/JSON list stands in for "no params".
    Some(serde_json::Value::Array(items)) if items.is_empty() => Ok(Params::new()),
    Some(serde_json::Value::Object(map)) => Ok(
      map
        .into_iter()
        .map(|(name, value)| (name, Value::from(value)))
        .collect(),
    ),
    Some(other) => Err(invalid(
      section,
      key,
      &format!("parameters must be a map, found {}", other),
    )),
  }
}

fn invalid(section: &'static str, key: &str, message: &str) -> ConfigError {
  ConfigError::InvalidRule {
    section,
    key: key.to_owned(),
    message: message.to_owned(),
  }
}
