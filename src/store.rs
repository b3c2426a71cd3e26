//! The profile store.
//!
//! A [`ProfileStore`] owns the configuration document for the length of one
//! invocation. Opening it runs the bootstrap sequence:
//!
//! 1. If the file is missing at the default location, create it with a
//!    single `default` profile. A missing file at a user-supplied location is
//!    an error.
//! 2. Parse the YAML into a [`ConfigDocument`].
//! 3. Fill every absent key with its descriptor default.
//! 4. Re-validate the document invariants.
//!
//! Every mutating operation checks all of its preconditions before it
//! touches the document, so a failed call leaves the store unchanged.
//! Nothing reaches disk until [`ProfileStore::save`].
//!
//! There is no file locking. Two invocations writing the same file at once
//! race and the last writer wins.

use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::{self, ConfigDocument, Origin, Profile, Setting, check_profile_name};
use crate::error::{ConfigError, InvalidNameReason, Result};
use crate::options::{OptionDescriptor, Registry};
use crate::paths::ConfigLocation;
use crate::values::{self, OptionValue};

/// Result of reading a key or key prefix from a profile
#[derive(Debug, Clone)]
pub enum Lookup<'r> {
    /// An exact key and its value (defaulted if the profile never set it)
    Value {
        descriptor: &'r OptionDescriptor,
        value: OptionValue,
    },
    /// Every key nested under a prefix, in key order
    Subtree(Vec<(&'r OptionDescriptor, OptionValue)>),
}

impl Lookup<'_> {
    /// Nested YAML rendering, masking sensitive values unless `unmask`
    pub fn render(&self, unmask: bool) -> Value {
        match self {
            Lookup::Value { descriptor, value } => {
                Value::Mapping(document::nest([(
                    descriptor.key.as_str(),
                    values::display_yaml(descriptor, value, unmask),
                )]))
            }
            Lookup::Subtree(entries) => Value::Mapping(document::nest(entries.iter().map(
                |(descriptor, value)| {
                    (
                        descriptor.key.as_str(),
                        values::display_yaml(descriptor, value, unmask),
                    )
                },
            ))),
        }
    }
}

/// One rendered row of a profile view
#[derive(Debug, Clone, PartialEq)]
pub struct ViewEntry {
    pub key: String,
    /// Display string, already masked
    pub text: String,
    /// Same value in YAML form, already masked
    pub yaml: Value,
}

/// Every registered key of one profile, defaulted and masked
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub name: String,
    pub description: String,
    pub active: bool,
    pub entries: Vec<ViewEntry>,
}

impl ProfileView {
    /// Nested `{name, description, active, settings}` mapping for structured output
    pub fn to_yaml(&self) -> Value {
        let settings = document::nest(
            self.entries
                .iter()
                .map(|entry| (entry.key.as_str(), entry.yaml.clone())),
        );
        let mut root = Mapping::new();
        root.insert("name".into(), Value::String(self.name.clone()));
        root.insert("description".into(), Value::String(self.description.clone()));
        root.insert("active".into(), Value::Bool(self.active));
        root.insert("settings".into(), Value::Mapping(settings));
        Value::Mapping(root)
    }
}

#[derive(Debug)]
pub struct ProfileStore<'r> {
    registry: &'r Registry,
    path: PathBuf,
    document: ConfigDocument,
    created: bool,
    dirty: bool,
}

impl<'r> ProfileStore<'r> {
    /// Open the configuration file, creating it at the default location if needed
    pub fn open(location: &ConfigLocation, registry: &'r Registry) -> Result<Self> {
        let mut created = false;
        if !location.path.exists() {
            if location.explicit {
                return Err(ConfigError::ConfigFileMissing {
                    path: location.path.clone(),
                });
            }
            write_document(&location.path, &ConfigDocument::seeded())?;
            created = true;
        }

        let content =
            fs::read_to_string(&location.path).map_err(|source| ConfigError::ConfigFileUnreadable {
                path: location.path.clone(),
                source,
            })?;
        let root: Value =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::ConfigFileMalformed {
                path: location.path.clone(),
                source,
            })?;

        let store = Self::from_document(
            location.path.clone(),
            ConfigDocument::from_yaml(&root, registry)?,
            registry,
            created,
        )?;
        // An existing file without profiles was seeded in memory; persist it
        // the same way a fresh file is
        if store.created && !created {
            write_document(&store.path, &store.document)?;
        }
        Ok(store)
    }

    /// Wrap an already-parsed document, running the defaulting and validation steps
    pub fn from_document(
        path: PathBuf,
        mut document: ConfigDocument,
        registry: &'r Registry,
        mut created: bool,
    ) -> Result<Self> {
        // Seeding an empty document counts as creating it, not as a change
        if document.profiles.is_empty() {
            document = ConfigDocument::seeded();
            created = true;
        }

        let mut store = Self {
            registry,
            path,
            document,
            created,
            dirty: false,
        };
        store.default_missing_keys();
        store.document.validate()?;
        Ok(store)
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    /// True when this invocation created the configuration file or seeded an empty one
    pub fn was_created(&self) -> bool {
        self.created
    }

    /// True when the in-memory document differs from what was loaded
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the document back to disk atomically
    pub fn save(&mut self) -> Result<()> {
        write_document(&self.path, &self.document)?;
        self.dirty = false;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Profiles
    // -------------------------------------------------------------------------

    /// Profile names sorted case-insensitively, in their original casing
    pub fn list_profile_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .document
            .profiles
            .iter()
            .map(|p| p.name.clone())
            .collect();
        names.sort_by_key(|name| name.to_ascii_lowercase());
        names
    }

    pub fn active_profile(&self) -> &str {
        &self.document.active_profile
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.document.active_profile.eq_ignore_ascii_case(name)
    }

    /// Find a profile by case-insensitive name
    pub fn require_profile(&self, name: &str) -> Result<&Profile> {
        self.document
            .find(name)
            .ok_or_else(|| ConfigError::not_found(name))
    }

    /// Check that `name` could be added as a new profile
    pub fn validate_new_profile_name(&self, name: &str) -> Result<()> {
        check_profile_name(name).map_err(|reason| ConfigError::invalid_name(name, reason))?;
        if self.document.find(name).is_some() {
            return Err(ConfigError::invalid_name(name, InvalidNameReason::Duplicate));
        }
        Ok(())
    }

    pub fn add_profile(&mut self, name: &str, description: &str, set_active: bool) -> Result<()> {
        self.validate_new_profile_name(name)?;

        let mut profile = Profile::new(name, description);
        fill_defaults(self.registry, &mut profile);
        self.document.profiles.push(profile);
        if set_active {
            self.document.active_profile = name.to_string();
        }
        self.dirty = true;
        Ok(())
    }

    /// Check that `name` exists and is not active; returns its stored casing
    pub fn ensure_deletable(&self, name: &str) -> Result<&str> {
        let profile = self.require_profile(name)?;
        if self.is_active(&profile.name) {
            return Err(ConfigError::ActiveProfileProtected {
                name: profile.name.clone(),
            });
        }
        Ok(&profile.name)
    }

    pub fn delete_profile(&mut self, name: &str) -> Result<()> {
        self.ensure_deletable(name)?;
        self.document.profiles.retain(|p| !p.matches(name));
        self.dirty = true;
        Ok(())
    }

    pub fn set_active_profile(&mut self, name: &str) -> Result<()> {
        let stored_name = self.require_profile(name)?.name.clone();
        if self.document.active_profile != stored_name {
            self.document.active_profile = stored_name;
            self.dirty = true;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Values
    // -------------------------------------------------------------------------

    /// Read an exact key, or every key nested under a prefix
    pub fn get_value(&self, profile: &str, key: &str) -> Result<Lookup<'r>> {
        let profile = self.require_profile(profile)?;

        if let Some(descriptor) = self.registry.lookup(key) {
            return Ok(Lookup::Value {
                descriptor,
                value: current_value(profile, descriptor),
            });
        }

        let nested = self.registry.prefix_match(key);
        if nested.is_empty() {
            return Err(self.unknown_key(key));
        }
        Ok(Lookup::Subtree(
            nested
                .into_iter()
                .map(|descriptor| (descriptor, current_value(profile, descriptor)))
                .collect(),
        ))
    }

    /// Value the profile explicitly stores for `key`, ignoring defaults
    pub fn stored_value(&self, profile: &str, key: &str) -> Option<&OptionValue> {
        self.document
            .find(profile)?
            .settings
            .get(key)
            .filter(|setting| setting.origin == Origin::Stored)
            .map(|setting| &setting.value)
    }

    pub fn set_value(&mut self, profile: &str, key: &str, raw: &str) -> Result<()> {
        self.require_profile(profile)?;
        let descriptor = self.exact_key(key)?;
        if raw.is_empty() {
            return Err(ConfigError::EmptyValueOnSet {
                key: key.to_string(),
            });
        }
        let value = values::parse(descriptor, raw).map_err(|source| ConfigError::ValueParse {
            key: key.to_string(),
            source,
        })?;

        let setting = Setting::stored(value);
        let Some(target) = self.document.find_mut(profile) else {
            return Err(ConfigError::not_found(profile));
        };
        if target.settings.get(key) != Some(&setting) {
            target.settings.insert(key.to_string(), setting);
            self.dirty = true;
        }
        Ok(())
    }

    pub fn unset_value(&mut self, profile: &str, key: &str) -> Result<()> {
        self.require_profile(profile)?;
        let descriptor = self.exact_key(key)?;

        let Some(target) = self.document.find_mut(profile) else {
            return Err(ConfigError::not_found(profile));
        };
        let previous = target.settings.insert(
            key.to_string(),
            Setting::defaulted(descriptor.default.clone()),
        );
        if previous.is_some_and(|setting| setting.origin == Origin::Stored) {
            self.dirty = true;
        }
        Ok(())
    }

    /// Give every profile a value for every registered key
    pub fn default_missing_keys(&mut self) {
        for profile in &mut self.document.profiles {
            fill_defaults(self.registry, profile);
        }
    }

    /// Render every registered key of a profile
    pub fn view_profile(&self, name: &str, unmask: bool) -> Result<ProfileView> {
        let profile = self.require_profile(name)?;
        let entries = self
            .registry
            .iter()
            .map(|descriptor| {
                let value = current_value(profile, descriptor);
                ViewEntry {
                    key: descriptor.key.clone(),
                    text: values::format(descriptor, &value, unmask),
                    yaml: values::display_yaml(descriptor, &value, unmask),
                }
            })
            .collect();

        Ok(ProfileView {
            name: profile.name.clone(),
            description: profile.description.clone(),
            active: self.is_active(&profile.name),
            entries,
        })
    }

    fn exact_key(&self, key: &str) -> Result<&'r OptionDescriptor> {
        self.registry
            .lookup(key)
            .ok_or_else(|| self.unknown_key(key))
    }

    fn unknown_key(&self, key: &str) -> ConfigError {
        ConfigError::unknown_key(key, self.registry.all_keys())
    }
}

fn current_value(profile: &Profile, descriptor: &OptionDescriptor) -> OptionValue {
    profile
        .settings
        .get(&descriptor.key)
        .map(|setting| setting.value.clone())
        .unwrap_or_else(|| descriptor.default.clone())
}

fn fill_defaults(registry: &Registry, profile: &mut Profile) {
    for descriptor in registry.iter() {
        profile
            .settings
            .entry(descriptor.key.clone())
            .or_insert_with(|| Setting::defaulted(descriptor.default.clone()));
    }
}

/// Write to a sibling temp file, then rename over the target
fn write_document(path: &Path, document: &ConfigDocument) -> Result<()> {
    let unwritable = |source| ConfigError::ConfigFileUnwritable {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(unwritable)?;
    }

    let content = serde_yaml::to_string(&document.to_yaml()).map_err(|err| {
        ConfigError::invalid_document(format!("failed to serialize configuration: {err}"))
    })?;

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, content).map_err(unwritable)?;
    fs::rename(&temp_path, path).map_err(unwritable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::test_utils::{default_location, explicit_location};
    use crate::values::MASK;
    use tempfile::TempDir;

    const SECRET_KEY: &str = "service.pingFederate.authentication.basicAuth.password";

    #[test]
    fn test_bootstrap_seeds_default_profile() {
        let temp_dir = TempDir::new().unwrap();
        let registry = catalog::builtin();
        let location = default_location(&temp_dir);

        let store = ProfileStore::open(&location, &registry).unwrap();
        assert!(store.was_created());
        assert!(!store.is_dirty());
        assert!(location.path.exists());
        assert_eq!(store.active_profile(), "default");
        assert_eq!(store.list_profile_names(), vec!["default"]);

        let text = fs::read_to_string(&location.path).unwrap();
        assert!(text.contains("activeProfile: default"));

        let reopened = ProfileStore::open(&location, &registry).unwrap();
        assert!(!reopened.was_created());
    }

    #[test]
    fn test_explicit_missing_path_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let registry = catalog::builtin();
        let location = explicit_location(&temp_dir);

        let err = ProfileStore::open(&location, &registry).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigFileMissing { .. }));
        assert!(err.is_fatal());
        assert!(!location.path.exists());
    }

    #[test]
    fn test_malformed_and_invalid_documents_are_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let registry = catalog::builtin();
        let location = explicit_location(&temp_dir);

        fs::write(&location.path, "activeProfile: [unclosed\n").unwrap();
        let err = ProfileStore::open(&location, &registry).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigFileMalformed { .. }));
        assert!(err.is_fatal());

        fs::write(&location.path, "activeProfile: missing\nwork: {}\n").unwrap();
        let err = ProfileStore::open(&location, &registry).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDocument { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_empty_file_gets_default_profile() {
        let temp_dir = TempDir::new().unwrap();
        let registry = catalog::builtin();
        let location = explicit_location(&temp_dir);
        fs::write(&location.path, "").unwrap();

        let store = ProfileStore::open(&location, &registry).unwrap();
        assert_eq!(store.active_profile(), "default");
        assert!(store.was_created());
        assert!(!store.is_dirty());

        let text = fs::read_to_string(&location.path).unwrap();
        assert!(text.contains("activeProfile: default"));
        let reopened = ProfileStore::open(&location, &registry).unwrap();
        assert!(!reopened.was_created());
    }

    #[test]
    fn test_get_set_unset_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let registry = catalog::builtin();
        let mut store = ProfileStore::open(&default_location(&temp_dir), &registry).unwrap();

        let default_value = match store.get_value("default", "noColor").unwrap() {
            Lookup::Value { value, .. } => value,
            other => panic!("expected a single value, got {other:?}"),
        };
        assert_eq!(default_value, OptionValue::Bool(false));

        store.set_value("default", "noColor", "true").unwrap();
        assert!(store.is_dirty());
        match store.get_value("default", "noColor").unwrap() {
            Lookup::Value { value, .. } => assert_eq!(value, OptionValue::Bool(true)),
            other => panic!("expected a single value, got {other:?}"),
        }

        store.unset_value("default", "noColor").unwrap();
        match store.get_value("default", "noColor").unwrap() {
            Lookup::Value { value, .. } => assert_eq!(value, default_value),
            other => panic!("expected a single value, got {other:?}"),
        }
    }

    #[test]
    fn test_set_persists_only_after_save() {
        let temp_dir = TempDir::new().unwrap();
        let registry = catalog::builtin();
        let location = default_location(&temp_dir);

        let mut store = ProfileStore::open(&location, &registry).unwrap();
        store
            .set_value("default", "service.pingone.regionCode", "EU")
            .unwrap();
        let before = fs::read_to_string(&location.path).unwrap();
        assert!(!before.contains("regionCode"));

        store.save().unwrap();
        assert!(!store.is_dirty());
        let after = fs::read_to_string(&location.path).unwrap();
        assert!(after.contains("regionCode: EU"));
        assert!(!after.contains("noColor"));

        let reopened = ProfileStore::open(&location, &registry).unwrap();
        assert_eq!(
            reopened.stored_value("default", "service.pingone.regionCode"),
            Some(&OptionValue::Enum("EU".into()))
        );
        assert_eq!(reopened.stored_value("default", "noColor"), None);
    }

    #[test]
    fn test_prefix_get_returns_subtree() {
        let temp_dir = TempDir::new().unwrap();
        let registry = catalog::builtin();
        let mut store = ProfileStore::open(&default_location(&temp_dir), &registry).unwrap();
        store
            .set_value("default", "service.pingone.authentication.worker.clientSecret", "abc")
            .unwrap();

        let lookup = store.get_value("default", "service.pingone").unwrap();
        let Lookup::Subtree(entries) = &lookup else {
            panic!("expected a subtree");
        };
        assert_eq!(entries.len(), 5);

        let rendered = serde_yaml::to_string(&lookup.render(false)).unwrap();
        assert!(rendered.starts_with("service:\n  pingone:\n"));
        assert!(rendered.contains(MASK));
        assert!(!rendered.contains("abc"));
        let unmasked = serde_yaml::to_string(&lookup.render(true)).unwrap();
        assert!(unmasked.contains("clientSecret: abc"));
    }

    #[test]
    fn test_unknown_key_symmetry() {
        let temp_dir = TempDir::new().unwrap();
        let registry = catalog::builtin();
        let mut store = ProfileStore::open(&default_location(&temp_dir), &registry).unwrap();
        let all_keys = registry.all_keys();

        let errors = [
            store.get_value("default", "service.bogus").unwrap_err(),
            store.set_value("default", "service.bogus", "x").unwrap_err(),
            store.unset_value("default", "service.bogus").unwrap_err(),
        ];
        for err in errors {
            let ConfigError::UnknownConfigKey { key, valid_keys } = &err else {
                panic!("expected UnknownConfigKey, got {err:?}");
            };
            assert_eq!(key, "service.bogus");
            assert_eq!(valid_keys, &all_keys);
            for valid in &all_keys {
                assert!(err.to_string().contains(valid.as_str()));
            }
        }
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_set_rejects_prefix_keys_and_empty_values() {
        let temp_dir = TempDir::new().unwrap();
        let registry = catalog::builtin();
        let mut store = ProfileStore::open(&default_location(&temp_dir), &registry).unwrap();

        assert!(matches!(
            store.set_value("default", "service.pingone", "x"),
            Err(ConfigError::UnknownConfigKey { .. })
        ));
        let err = store.set_value("default", "noColor", "").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyValueOnSet { .. }));
        assert!(err.to_string().contains("config unset noColor"));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_set_surfaces_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        let registry = catalog::builtin();
        let mut store = ProfileStore::open(&default_location(&temp_dir), &registry).unwrap();

        let err = store
            .set_value("default", "service.pingone.regionCode", "Mars")
            .unwrap_err();
        match &err {
            ConfigError::ValueParse { key, .. } => assert_eq!(key, "service.pingone.regionCode"),
            other => panic!("expected ValueParse, got {other:?}"),
        }
        let rendered = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(rendered.matches("must be one of: AP, AU, CA, EU, NA").count(), 1);

        let err = store
            .set_value("default", "export.pingone.environmentID", "nope")
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValueParse { .. }));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_setting_the_same_value_twice_is_a_no_op() {
        let temp_dir = TempDir::new().unwrap();
        let registry = catalog::builtin();
        let location = default_location(&temp_dir);
        let mut store = ProfileStore::open(&location, &registry).unwrap();
        store.set_value("default", "noColor", "true").unwrap();
        store.save().unwrap();

        store.set_value("default", "noColor", "TRUE").unwrap();
        assert!(!store.is_dirty());
        store.unset_value("default", "export.overwrite").unwrap();
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_add_profile_validation() {
        let temp_dir = TempDir::new().unwrap();
        let registry = catalog::builtin();
        let mut store = ProfileStore::open(&default_location(&temp_dir), &registry).unwrap();

        store.add_profile("same-profile", "", false).unwrap();
        let reason_of = |result: Result<()>| match result {
            Err(ConfigError::InvalidProfileName { reason, .. }) => reason,
            other => panic!("expected InvalidProfileName, got {other:?}"),
        };
        assert_eq!(
            reason_of(store.add_profile("SAME-PROFILE", "", false)),
            InvalidNameReason::Duplicate
        );
        assert_eq!(
            reason_of(store.add_profile("default", "", false)),
            InvalidNameReason::Duplicate
        );
        assert_eq!(
            reason_of(store.add_profile("bad name", "", false)),
            InvalidNameReason::BadFormat
        );
        assert_eq!(
            reason_of(store.add_profile("activeProfile", "", false)),
            InvalidNameReason::Reserved
        );
        assert_eq!(reason_of(store.add_profile("", "", false)), InvalidNameReason::Empty);
        assert_eq!(store.list_profile_names(), vec!["default", "same-profile"]);
    }

    #[test]
    fn test_add_profile_set_active_keeps_casing() {
        let temp_dir = TempDir::new().unwrap();
        let registry = catalog::builtin();
        let location = default_location(&temp_dir);
        let mut store = ProfileStore::open(&location, &registry).unwrap();

        store.add_profile("Production", "prod tenant", true).unwrap();
        assert_eq!(store.active_profile(), "Production");
        store.save().unwrap();

        let reopened = ProfileStore::open(&location, &registry).unwrap();
        assert_eq!(reopened.active_profile(), "Production");
        let view = reopened.view_profile("production", false).unwrap();
        assert_eq!(view.name, "Production");
        assert_eq!(view.description, "prod tenant");
        assert!(view.active);
    }

    #[test]
    fn test_delete_profile() {
        let temp_dir = TempDir::new().unwrap();
        let registry = catalog::builtin();
        let mut store = ProfileStore::open(&default_location(&temp_dir), &registry).unwrap();
        store.add_profile("scratch", "", false).unwrap();

        assert!(matches!(
            store.delete_profile("missing"),
            Err(ConfigError::ProfileNotFound { .. })
        ));
        assert!(matches!(
            store.delete_profile("DEFAULT"),
            Err(ConfigError::ActiveProfileProtected { .. })
        ));

        store.delete_profile("SCRATCH").unwrap();
        assert_eq!(store.list_profile_names(), vec!["default"]);
    }

    #[test]
    fn test_active_profile_is_always_protected() {
        let temp_dir = TempDir::new().unwrap();
        let registry = catalog::builtin();
        let mut store = ProfileStore::open(&default_location(&temp_dir), &registry).unwrap();
        store.add_profile("filled", "has values", true).unwrap();
        store.set_value("filled", "noColor", "true").unwrap();
        store.set_value("filled", SECRET_KEY, "pw").unwrap();

        for name in ["filled", "FILLED"] {
            let err = store.delete_profile(name).unwrap_err();
            assert!(matches!(err, ConfigError::ActiveProfileProtected { .. }));
            assert_eq!(err.to_string(), "'filled' is the active profile and cannot be deleted");
        }
        assert_eq!(store.list_profile_names().len(), 2);
    }

    #[test]
    fn test_set_active_profile() {
        let temp_dir = TempDir::new().unwrap();
        let registry = catalog::builtin();
        let mut store = ProfileStore::open(&default_location(&temp_dir), &registry).unwrap();
        store.add_profile("Other", "", false).unwrap();
        store.save().unwrap();

        assert!(matches!(
            store.set_active_profile("nope"),
            Err(ConfigError::ProfileNotFound { .. })
        ));
        store.set_active_profile("other").unwrap();
        assert_eq!(store.active_profile(), "Other");
        assert!(store.is_dirty());
    }

    #[test]
    fn test_default_missing_keys_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let registry = catalog::builtin();
        let mut store = ProfileStore::open(&default_location(&temp_dir), &registry).unwrap();
        store.add_profile("second", "", false).unwrap();
        store.set_value("second", "plugins", "a,b").unwrap();

        store.default_missing_keys();
        let once = store.document().clone();
        store.default_missing_keys();
        assert_eq!(store.document(), &once);
        for profile in &once.profiles {
            assert_eq!(profile.settings.len(), registry.len());
        }
    }

    #[test]
    fn test_view_profile_masks_sensitive_values() {
        let temp_dir = TempDir::new().unwrap();
        let registry = catalog::builtin();
        let mut store = ProfileStore::open(&default_location(&temp_dir), &registry).unwrap();
        store.set_value("default", SECRET_KEY, "hunter2").unwrap();

        let entry_for = |view: &ProfileView| {
            view.entries
                .iter()
                .find(|entry| entry.key == SECRET_KEY)
                .map(|entry| entry.text.clone())
                .unwrap()
        };

        let masked = store.view_profile("default", false).unwrap();
        assert_eq!(masked.entries.len(), registry.len());
        assert_eq!(entry_for(&masked), MASK);

        let unmasked = store.view_profile("default", true).unwrap();
        assert_eq!(entry_for(&unmasked), "hunter2");

        assert!(matches!(
            store.view_profile("ghost", false),
            Err(ConfigError::ProfileNotFound { .. })
        ));
    }

    #[test]
    fn test_failed_mutations_leave_document_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let registry = catalog::builtin();
        let mut store = ProfileStore::open(&default_location(&temp_dir), &registry).unwrap();
        let before = store.document().clone();

        let _ = store.add_profile("default", "dup", true);
        let _ = store.delete_profile("default");
        let _ = store.set_value("default", "noColor", "perhaps");
        let _ = store.set_value("ghost", "noColor", "true");
        let _ = store.set_active_profile("ghost");

        assert_eq!(store.document(), &before);
        assert!(!store.is_dirty());
    }
}
