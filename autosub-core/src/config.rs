// Container configuration

use crate::behaviour::SubstituteBehaviour;
use crate::constructor::Accessibility;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

/// Prefix of the environment variables read by [`AutoSubstituteConfig::from_env`]
pub const ENV_PREFIX: &str = "AUTOSUB";

/// Options fixed when an `AutoSubstitute` container is created.
///
/// ```
/// use autosub_core::{AutoSubstituteConfig, SubstituteBehaviour};
///
/// let config = AutoSubstituteConfig::default()
///     .behaviour(SubstituteBehaviour::ManualWithNulls)
///     .search_private_constructors(true);
///
/// assert!(config.search_private_constructors);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoSubstituteConfig {
    pub behaviour: SubstituteBehaviour,
    /// Also consider private constructors of the system under test
    pub search_private_constructors: bool,
}

impl AutoSubstituteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn behaviour(mut self, behaviour: SubstituteBehaviour) -> Self {
        self.behaviour = behaviour;
        self
    }

    pub fn search_private_constructors(mut self, enable: bool) -> Self {
        self.search_private_constructors = enable;
        self
    }

    /// Constructor visibility the resolver may use
    pub fn accessibility(&self) -> Accessibility {
        if self.search_private_constructors {
            Accessibility::All
        } else {
            Accessibility::Public
        }
    }

    /// Read `AUTOSUB_BEHAVIOUR` and `AUTOSUB_PRIVATE_CONSTRUCTORS`.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env::vars())
    }

    /// Same as [`from_env`](Self::from_env) over an explicit set of variables
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.as_ref()
                    .strip_prefix(ENV_PREFIX)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| (rest.to_lowercase(), value.into()))
            })
            .collect();

        let mut config = Self::default();

        if let Some(behaviour) = vars.get("behaviour") {
            config.behaviour = behaviour.parse()?;
        }
        if let Some(flag) = vars.get("private_constructors") {
            config.search_private_constructors = parse_flag("PRIVATE_CONSTRUCTORS", flag)?;
        }

        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid container configuration: {}", e)))
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::Config(format!(
            "{}_{} must be a boolean, got '{}'",
            ENV_PREFIX, key, other
        ))),
    }
}
