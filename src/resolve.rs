//! Effective values of options outside the `config` commands.
//!
//! Precedence, highest first: CLI flag, value stored in the target profile,
//! the option's environment variable, the descriptor default. Defaults filled
//! in after load don't count as stored, so the environment still applies to
//! keys the profile never set.

use std::collections::BTreeMap;

use crate::catalog::keys;
use crate::error::{ConfigError, Result};
use crate::options::OptionDescriptor;
use crate::store::ProfileStore;
use crate::values::{self, OptionValue};

/// Where an effective value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Flag,
    Profile,
    Environment,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub value: OptionValue,
    pub source: Source,
}

pub struct Resolver<'a, 'r> {
    store: &'a ProfileStore<'r>,
    profile: &'a str,
    /// Raw flag values keyed by canonical option key
    flags: &'a BTreeMap<String, String>,
}

impl<'a, 'r> Resolver<'a, 'r> {
    pub fn new(
        store: &'a ProfileStore<'r>,
        profile: &'a str,
        flags: &'a BTreeMap<String, String>,
    ) -> Self {
        Self {
            store,
            profile,
            flags,
        }
    }

    pub fn resolve(&self, key: &str) -> Result<Resolved> {
        let registry = self.store.registry();
        let descriptor = registry
            .lookup(key)
            .ok_or_else(|| ConfigError::unknown_key(key, registry.all_keys()))?;

        if let Some(raw) = self.flags.get(key) {
            return Ok(Resolved {
                value: parse(descriptor, raw)?,
                source: Source::Flag,
            });
        }

        if let Some(value) = self.store.stored_value(self.profile, key) {
            return Ok(Resolved {
                value: value.clone(),
                source: Source::Profile,
            });
        }

        let from_env = descriptor
            .env_var
            .as_deref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|raw| !raw.is_empty());
        if let Some(raw) = from_env {
            return Ok(Resolved {
                value: parse(descriptor, &raw)?,
                source: Source::Environment,
            });
        }

        Ok(Resolved {
            value: descriptor.default.clone(),
            source: Source::Default,
        })
    }

    fn bool(&self, key: &str) -> Result<bool> {
        Ok(matches!(self.resolve(key)?.value, OptionValue::Bool(true)))
    }
}

fn parse(descriptor: &OptionDescriptor, raw: &str) -> Result<OptionValue> {
    values::parse(descriptor, raw).map_err(|source| ConfigError::ValueParse {
        key: descriptor.key.clone(),
        source,
    })
}

/// Options that shape every command's output and exit code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalSettings {
    pub no_color: bool,
    pub output_format: String,
    pub detailed_exit_code: bool,
}

impl GlobalSettings {
    pub fn resolve(resolver: &Resolver<'_, '_>) -> Result<Self> {
        Ok(Self {
            no_color: resolver.bool(keys::NO_COLOR)?,
            output_format: resolver.resolve(keys::OUTPUT_FORMAT)?.value.to_string(),
            detailed_exit_code: resolver.bool(keys::DETAILED_EXIT_CODE)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::test_utils::default_location;
    use serial_test::serial;
    use tempfile::TempDir;

    const ENV: &str = "PINGCLI_OUTPUT_FORMAT";

    #[test]
    #[serial]
    fn test_precedence() {
        let temp_dir = TempDir::new().unwrap();
        let registry = catalog::builtin();
        let mut store = ProfileStore::open(&default_location(&temp_dir), &registry).unwrap();
        let mut flags = BTreeMap::new();

        unsafe { std::env::remove_var(ENV) };
        let resolved = Resolver::new(&store, "default", &flags)
            .resolve(keys::OUTPUT_FORMAT)
            .unwrap();
        assert_eq!(resolved.source, Source::Default);
        assert_eq!(resolved.value, OptionValue::Enum("text".into()));

        unsafe { std::env::set_var(ENV, "json") };
        let resolved = Resolver::new(&store, "default", &flags)
            .resolve(keys::OUTPUT_FORMAT)
            .unwrap();
        assert_eq!(resolved.source, Source::Environment);
        assert_eq!(resolved.value, OptionValue::Enum("json".into()));

        store.set_value("default", keys::OUTPUT_FORMAT, "text").unwrap();
        let resolved = Resolver::new(&store, "default", &flags)
            .resolve(keys::OUTPUT_FORMAT)
            .unwrap();
        assert_eq!(resolved.source, Source::Profile);
        assert_eq!(resolved.value, OptionValue::Enum("text".into()));

        flags.insert(keys::OUTPUT_FORMAT.to_string(), "json".to_string());
        let resolved = Resolver::new(&store, "default", &flags)
            .resolve(keys::OUTPUT_FORMAT)
            .unwrap();
        assert_eq!(resolved.source, Source::Flag);
        unsafe { std::env::remove_var(ENV) };
    }

    #[test]
    #[serial]
    fn test_bad_env_value_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let registry = catalog::builtin();
        let store = ProfileStore::open(&default_location(&temp_dir), &registry).unwrap();
        let flags = BTreeMap::new();

        unsafe { std::env::set_var(ENV, "xml") };
        let result = Resolver::new(&store, "default", &flags).resolve(keys::OUTPUT_FORMAT);
        unsafe { std::env::remove_var(ENV) };

        assert!(matches!(result, Err(ConfigError::ValueParse { .. })));
    }

    #[test]
    #[serial]
    fn test_global_settings() {
        let temp_dir = TempDir::new().unwrap();
        let registry = catalog::builtin();
        let mut store = ProfileStore::open(&default_location(&temp_dir), &registry).unwrap();
        store.set_value("default", keys::NO_COLOR, "true").unwrap();
        let mut flags = BTreeMap::new();
        flags.insert(keys::DETAILED_EXIT_CODE.to_string(), "true".to_string());

        unsafe { std::env::remove_var(ENV) };
        let settings =
            GlobalSettings::resolve(&Resolver::new(&store, "default", &flags)).unwrap();
        assert_eq!(
            settings,
            GlobalSettings {
                no_color: true,
                output_format: "text".into(),
                detailed_exit_code: true,
            }
        );
    }
}
