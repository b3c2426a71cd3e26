//! Typed option values and the coercion between them and user input.

use serde_yaml::Value;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::options::{OptionDescriptor, OptionType};

/// Placeholder shown instead of a sensitive value
pub const MASK: &str = "********";

/// A value held by a profile for one option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    String(String),
    /// `None` until the user supplies an identifier
    Uuid(Option<Uuid>),
    Enum(String),
    StringList(Vec<String>),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse '{value}' as a boolean")]
    InvalidBool { value: String },

    #[error("unrecognized value '{value}', must be one of: {}", allowed.join(", "))]
    UnrecognizedEnum { value: String, allowed: Vec<String> },

    #[error("'{value}' is not a valid RFC 4122 UUID")]
    InvalidUuid { value: String },

    #[error("expected a {expected} value, found {found}")]
    TypeMismatch {
        expected: OptionType,
        found: &'static str,
    },
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::String(s) | Self::Enum(s) => f.write_str(s),
            Self::Uuid(Some(id)) => write!(f, "{}", id.hyphenated()),
            Self::Uuid(None) => Ok(()),
            Self::StringList(items) => f.write_str(&items.join(",")),
        }
    }
}

impl OptionValue {
    pub fn to_yaml(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::StringList(items) => {
                Value::Sequence(items.iter().cloned().map(Value::String).collect())
            }
            other => Value::String(other.to_string()),
        }
    }

    /// Convert a persisted YAML node into a typed value.
    ///
    /// Returns `Ok(None)` for an explicit YAML null, which reads as "not set".
    pub fn from_yaml(descriptor: &OptionDescriptor, node: &Value) -> Result<Option<Self>, ParseError> {
        let mismatch = |found| ParseError::TypeMismatch {
            expected: descriptor.value_type,
            found,
        };

        let value = match (descriptor.value_type, node) {
            (_, Value::Null) => return Ok(None),
            (OptionType::Bool, Value::Bool(b)) => Self::Bool(*b),
            (OptionType::String, Value::Bool(b)) => Self::String(b.to_string()),
            (OptionType::String, Value::Number(n)) => Self::String(n.to_string()),
            // Blank uuids and enums are how unset defaults are written out
            (OptionType::Uuid, Value::String(s)) if s.is_empty() => Self::Uuid(None),
            (OptionType::Enum, Value::String(s)) if s.is_empty() => Self::Enum(String::new()),
            (OptionType::StringList, Value::Sequence(items)) => {
                let mut list = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => list.push(s.trim().to_string()),
                        Value::Number(n) => list.push(n.to_string()),
                        Value::Bool(b) => list.push(b.to_string()),
                        other => return Err(mismatch(yaml_kind(other))),
                    }
                }
                list.retain(|s| !s.is_empty());
                Self::StringList(list)
            }
            (_, Value::String(s)) => parse(descriptor, s)?,
            (_, other) => return Err(mismatch(yaml_kind(other))),
        };
        Ok(Some(value))
    }
}

fn yaml_kind(node: &Value) -> &'static str {
    match node {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Parse a user-supplied string into the descriptor's type
pub fn parse(descriptor: &OptionDescriptor, raw: &str) -> Result<OptionValue, ParseError> {
    match descriptor.value_type {
        OptionType::Bool => parse_bool(raw).map(OptionValue::Bool),
        OptionType::String => Ok(OptionValue::String(raw.to_string())),
        OptionType::Uuid => parse_uuid(raw).map(|id| OptionValue::Uuid(Some(id))),
        OptionType::Enum => {
            if descriptor.allowed_values.iter().any(|allowed| allowed == raw) {
                Ok(OptionValue::Enum(raw.to_string()))
            } else {
                Err(ParseError::UnrecognizedEnum {
                    value: raw.to_string(),
                    allowed: descriptor.allowed_values.clone(),
                })
            }
        }
        OptionType::StringList => Ok(OptionValue::StringList(split_list(raw))),
    }
}

/// Render a value for display, masking sensitive options unless `unmask`
pub fn format(descriptor: &OptionDescriptor, value: &OptionValue, unmask: bool) -> String {
    if descriptor.sensitive && !unmask {
        return MASK.to_string();
    }
    value.to_string()
}

/// Same masking rule as [`format`], but keeps the YAML shape for nested output
pub fn display_yaml(descriptor: &OptionDescriptor, value: &OptionValue, unmask: bool) -> Value {
    if descriptor.sensitive && !unmask {
        return Value::String(MASK.to_string());
    }
    value.to_yaml()
}

fn parse_bool(raw: &str) -> Result<bool, ParseError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ParseError::InvalidBool {
            value: raw.to_string(),
        }),
    }
}

fn parse_uuid(raw: &str) -> Result<Uuid, ParseError> {
    let invalid = || ParseError::InvalidUuid {
        value: raw.to_string(),
    };
    // Only the hyphenated 8-4-4-4-12 form; `Uuid::parse_str` also takes braced and URN forms
    if raw.len() != 36 {
        return Err(invalid());
    }
    Uuid::parse_str(raw).map_err(|_| invalid())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
