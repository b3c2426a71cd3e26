//! In-memory model of the configuration file.
//!
//! On disk the document is YAML: an `activeProfile` entry plus one mapping
//! per profile. Inside a profile, dotted keys are stored as nested mappings
//! (`service.pingone.regionCode` becomes `service: { pingone: { regionCode } }`).
//! Flat dotted keys are accepted on read as well.

use serde_yaml::{Mapping, Value};
use std::collections::{BTreeMap, HashSet};

use crate::error::{ConfigError, InvalidNameReason, Result};
use crate::options::Registry;
use crate::values::OptionValue;

/// Top-level key naming the active profile; no profile may use it
pub const ACTIVE_PROFILE_KEY: &str = "activeProfile";

/// Profile created on first run
pub const DEFAULT_PROFILE_NAME: &str = "default";

const DESCRIPTION_KEY: &str = "description";

/// Where a setting's value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Read from the file or written by `set`
    Stored,
    /// Filled in from the descriptor default after load; never written back
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub value: OptionValue,
    pub origin: Origin,
}

impl Setting {
    pub fn stored(value: OptionValue) -> Self {
        Self {
            value,
            origin: Origin::Stored,
        }
    }

    pub fn defaulted(value: OptionValue) -> Self {
        Self {
            value,
            origin: Origin::Default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Name with the casing it was created with
    pub name: String,
    pub description: String,
    pub settings: BTreeMap<String, Setting>,
}

impl Profile {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            settings: BTreeMap::new(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    pub active_profile: String,
    /// Profiles in file order
    pub profiles: Vec<Profile>,
}

/// Check name format rules that don't depend on other profiles
pub fn check_profile_name(name: &str) -> std::result::Result<(), InvalidNameReason> {
    if name.is_empty() {
        return Err(InvalidNameReason::Empty);
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(InvalidNameReason::BadFormat);
    }
    if name.eq_ignore_ascii_case(ACTIVE_PROFILE_KEY) {
        return Err(InvalidNameReason::Reserved);
    }
    Ok(())
}

impl ConfigDocument {
    /// A fresh document holding only the `default` profile
    pub fn seeded() -> Self {
        Self {
            active_profile: DEFAULT_PROFILE_NAME.to_string(),
            profiles: vec![Profile::new(DEFAULT_PROFILE_NAME, "Default profile")],
        }
    }

    pub fn find(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.matches(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Profile> {
        self.profiles.iter_mut().find(|p| p.matches(name))
    }

    /// Build a document from parsed YAML. Keys are checked against the
    /// registry and values are typed, but document invariants are left to
    /// [`ConfigDocument::validate`].
    pub fn from_yaml(root: &Value, registry: &Registry) -> Result<Self> {
        let mapping = match root {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(mapping) => mapping,
            _ => {
                return Err(ConfigError::invalid_document(
                    "top level of the configuration file must be a mapping",
                ));
            }
        };

        let mut document = Self::default();
        for (key, node) in mapping {
            let key = key
                .as_str()
                .ok_or_else(|| ConfigError::invalid_document("top-level keys must be strings"))?;

            if key == ACTIVE_PROFILE_KEY {
                document.active_profile = node
                    .as_str()
                    .ok_or_else(|| {
                        ConfigError::invalid_document(format!("'{ACTIVE_PROFILE_KEY}' must be a string"))
                    })?
                    .to_string();
                continue;
            }

            document.profiles.push(profile_from_yaml(key, node, registry)?);
        }

        Ok(document)
    }

    /// Serialize to YAML, writing only values that were explicitly stored
    pub fn to_yaml(&self) -> Value {
        let mut root = Mapping::new();
        root.insert(
            Value::String(ACTIVE_PROFILE_KEY.to_string()),
            Value::String(self.active_profile.clone()),
        );

        for profile in &self.profiles {
            let mut body = Mapping::new();
            body.insert(
                Value::String(DESCRIPTION_KEY.to_string()),
                Value::String(profile.description.clone()),
            );
            let stored = profile
                .settings
                .iter()
                .filter(|(_, setting)| setting.origin == Origin::Stored)
                .map(|(key, setting)| (key.as_str(), setting.value.to_yaml()));
            for (key, value) in nest(stored) {
                body.insert(key, value);
            }
            root.insert(Value::String(profile.name.clone()), Value::Mapping(body));
        }

        Value::Mapping(root)
    }

    /// Re-check every document invariant
    pub fn validate(&self) -> Result<()> {
        if self.profiles.is_empty() {
            return Err(ConfigError::invalid_document("no profiles are defined"));
        }

        let mut seen = HashSet::new();
        for profile in &self.profiles {
            if let Err(reason) = check_profile_name(&profile.name) {
                return Err(ConfigError::invalid_document(format!(
                    "invalid profile name '{}': {}",
                    profile.name, reason
                )));
            }
            if !seen.insert(profile.name.to_ascii_lowercase()) {
                return Err(ConfigError::invalid_document(format!(
                    "profile '{}' is defined more than once (names are case-insensitive)",
                    profile.name
                )));
            }
        }

        if self.active_profile.is_empty() {
            return Err(ConfigError::invalid_document(format!(
                "'{ACTIVE_PROFILE_KEY}' is not set"
            )));
        }
        if self.find(&self.active_profile).is_none() {
            return Err(ConfigError::invalid_document(format!(
                "active profile '{}' does not exist",
                self.active_profile
            )));
        }

        Ok(())
    }
}

fn profile_from_yaml(name: &str, node: &Value, registry: &Registry) -> Result<Profile> {
    let mut profile = Profile::new(name, "");
    let body = match node {
        Value::Null => return Ok(profile),
        Value::Mapping(body) => body,
        _ => {
            return Err(ConfigError::invalid_document(format!(
                "profile '{name}' must be a mapping"
            )));
        }
    };

    for (key, child) in body {
        let key = key.as_str().ok_or_else(|| {
            ConfigError::invalid_document(format!("profile '{name}' has a non-string key"))
        })?;
        if key == DESCRIPTION_KEY {
            profile.description = match child {
                Value::Null => String::new(),
                Value::String(s) => s.clone(),
                _ => {
                    return Err(ConfigError::invalid_document(format!(
                        "description of profile '{name}' must be a string"
                    )));
                }
            };
            continue;
        }
        collect_settings(name, key, child, registry, &mut profile.settings)?;
    }

    Ok(profile)
}

/// Walk a nested mapping, stopping at the first path that is a registered key
fn collect_settings(
    profile: &str,
    path: &str,
    node: &Value,
    registry: &Registry,
    settings: &mut BTreeMap<String, Setting>,
) -> Result<()> {
    if let Some(descriptor) = registry.lookup(path) {
        let value = OptionValue::from_yaml(descriptor, node).map_err(|err| {
            ConfigError::invalid_document(format!("profile '{profile}', key '{path}': {err}"))
        })?;
        if let Some(value) = value {
            settings.insert(path.to_string(), Setting::stored(value));
        }
        return Ok(());
    }

    match node {
        Value::Mapping(children) => {
            for (segment, child) in children {
                let segment = segment.as_str().ok_or_else(|| {
                    ConfigError::invalid_document(format!(
                        "profile '{profile}' has a non-string key under '{path}'"
                    ))
                })?;
                collect_settings(profile, &format!("{path}.{segment}"), child, registry, settings)?;
            }
            Ok(())
        }
        _ => Err(ConfigError::invalid_document(format!(
            "profile '{profile}': '{path}' is not a recognized configuration key"
        ))),
    }
}

/// Turn dotted keys into nested mappings
pub fn nest<'a>(entries: impl IntoIterator<Item = (&'a str, Value)>) -> Mapping {
    let mut root = Mapping::new();
    for (key, value) in entries {
        let path: Vec<&str> = key.split('.').collect();
        insert_path(&mut root, &path, value);
    }
    root
}

fn insert_path(map: &mut Mapping, path: &[&str], value: Value) {
    match path {
        [] => {}
        [leaf] => {
            map.insert(Value::String(leaf.to_string()), value);
        }
        [head, rest @ ..] => {
            let is_mapping = map.get(*head).is_some_and(Value::is_mapping);
            if !is_mapping {
                map.insert(Value::String(head.to_string()), Value::Mapping(Mapping::new()));
            }
            if let Some(Value::Mapping(child)) = map.get_mut(*head) {
                insert_path(child, rest, value);
            }
        }
    }
}
