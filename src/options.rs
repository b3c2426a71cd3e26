//! Option descriptors and the registry that catalogs them.
//!
//! A [`Registry`] is built once at startup (see [`crate::catalog::builtin`])
//! and passed by reference to everything that needs it. Tests build their
//! own isolated registries.

use std::collections::BTreeMap;
use std::fmt;

use crate::values::OptionValue;

/// Semantic type of an option's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    Bool,
    String,
    Uuid,
    Enum,
    StringList,
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::Uuid => "uuid",
            Self::Enum => "enum",
            Self::StringList => "stringList",
        };
        f.write_str(name)
    }
}

/// Metadata for one recognized configuration key
#[derive(Debug, Clone)]
pub struct OptionDescriptor {
    /// Dot-separated canonical key, e.g. `service.pingone.regionCode`
    pub key: String,
    /// Long CLI flag that overrides the profile value, without dashes
    pub flag: Option<String>,
    /// Environment variable used when nothing else sets the option
    pub env_var: Option<String>,
    pub value_type: OptionType,
    pub default: OptionValue,
    pub sensitive: bool,
    /// Members of an enum option, empty for every other type
    pub allowed_values: Vec<String>,
    pub usage: String,
}

impl OptionDescriptor {
    fn with_type(key: &str, value_type: OptionType, default: OptionValue) -> Self {
        Self {
            key: key.to_string(),
            flag: None,
            env_var: None,
            value_type,
            default,
            sensitive: false,
            allowed_values: Vec::new(),
            usage: String::new(),
        }
    }

    pub fn bool(key: &str, default: bool) -> Self {
        Self::with_type(key, OptionType::Bool, OptionValue::Bool(default))
    }

    pub fn string(key: &str, default: &str) -> Self {
        Self::with_type(
            key,
            OptionType::String,
            OptionValue::String(default.to_string()),
        )
    }

    pub fn uuid(key: &str) -> Self {
        Self::with_type(key, OptionType::Uuid, OptionValue::Uuid(None))
    }

    /// An enum option. `default` may be empty to mean "not chosen yet".
    pub fn enumeration(key: &str, allowed: &[&str], default: &str) -> Self {
        let mut descriptor = Self::with_type(
            key,
            OptionType::Enum,
            OptionValue::Enum(default.to_string()),
        );
        descriptor.allowed_values = allowed.iter().map(|v| v.to_string()).collect();
        descriptor
    }

    pub fn string_list(key: &str) -> Self {
        Self::with_type(key, OptionType::StringList, OptionValue::StringList(Vec::new()))
    }

    pub fn with_flag(mut self, flag: &str) -> Self {
        self.flag = Some(flag.to_string());
        self
    }

    pub fn with_env(mut self, env_var: &str) -> Self {
        self.env_var = Some(env_var.to_string());
        self
    }

    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

/// Catalog of every recognized configuration key
#[derive(Debug, Clone, Default)]
pub struct Registry {
    options: BTreeMap<String, OptionDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor to the catalog.
    ///
    /// # Panics
    ///
    /// Panics if the key is already registered. Keys are static, so a
    /// duplicate is a programming error rather than a user-facing failure.
    pub fn register(&mut self, descriptor: OptionDescriptor) {
        if self.options.contains_key(&descriptor.key) {
            panic!("configuration key '{}' registered twice", descriptor.key);
        }
        self.options.insert(descriptor.key.clone(), descriptor);
    }

    /// Exact, case-sensitive lookup
    pub fn lookup(&self, key: &str) -> Option<&OptionDescriptor> {
        self.options.get(key)
    }

    /// All canonical keys in sorted order
    pub fn all_keys(&self) -> Vec<String> {
        self.options.keys().cloned().collect()
    }

    /// Descriptors nested under `partial`, i.e. whose key starts with `partial.`
    pub fn prefix_match(&self, partial: &str) -> Vec<&OptionDescriptor> {
        if partial.is_empty() {
            return Vec::new();
        }
        let prefix = format!("{partial}.");
        self.options
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .map(|(_, descriptor)| descriptor)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionDescriptor> {
        self.options.values()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_registry() -> Registry {
        let mut registry = Registry::new();
        registry.register(OptionDescriptor::bool("noColor", false));
        registry.register(OptionDescriptor::string("service.pingone.clientID", ""));
        registry.register(OptionDescriptor::string("service.pingone.secret", "").sensitive());
        registry.register(OptionDescriptor::string("service.pingoneExtra", ""));
        registry.register(OptionDescriptor::string("service.pingFederate.httpsHost", ""));
        registry
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = small_registry();
        assert!(registry.lookup("noColor").is_some());
        assert!(registry.lookup("nocolor").is_none());
        assert!(registry.lookup("NOCOLOR").is_none());
    }

    #[test]
    fn test_all_keys_sorted() {
        let registry = small_registry();
        let keys = registry.all_keys();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(keys.len(), 5);
    }

    #[test]
    fn test_prefix_match_respects_dot_boundary() {
        let registry = small_registry();
        let keys: Vec<&str> = registry
            .prefix_match("service.pingone")
            .iter()
            .map(|d| d.key.as_str())
            .collect();
        assert_eq!(keys, vec!["service.pingone.clientID", "service.pingone.secret"]);

        assert_eq!(registry.prefix_match("service").len(), 4);
        assert!(registry.prefix_match("serv").is_empty());
        assert!(registry.prefix_match("noColor").is_empty());
        assert!(registry.prefix_match("").is_empty());
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_duplicate_registration_panics() {
        let mut registry = small_registry();
        registry.register(OptionDescriptor::bool("noColor", true));
    }

    #[test]
    fn test_enum_descriptor() {
        let descriptor =
            OptionDescriptor::enumeration("outputFormat", &["text", "json"], "text");
        assert_eq!(descriptor.value_type, OptionType::Enum);
        assert_eq!(descriptor.allowed_values, vec!["text", "json"]);
        assert_eq!(descriptor.default, OptionValue::Enum("text".into()));
    }
}
