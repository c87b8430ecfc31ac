//! Per-target tool options.
//!
//! Options are a small, typed mapping checked against the tool's schema when
//! the manifest is read. Anything the schema does not name is refused.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::tool::ToolKind;

/// A primitive option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Integer(i64),
    String(String),
}

impl OptionValue {
    /// Convert a raw TOML value, rejecting tables, arrays, floats and datetimes.
    pub fn from_toml(value: &toml::Value) -> Result<Self, String> {
        match value {
            toml::Value::Boolean(b) => Ok(OptionValue::Bool(*b)),
            toml::Value::Integer(i) => Ok(OptionValue::Integer(*i)),
            toml::Value::String(s) => Ok(OptionValue::String(s.clone())),
            other => Err(format!("unsupported value type `{}`", other.type_str())),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Bool(_) => "boolean",
            OptionValue::Integer(_) => "integer",
            OptionValue::String(_) => "string",
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Integer(i) => write!(f, "{}", i),
            OptionValue::String(s) => write!(f, "{}", s),
        }
    }
}

/// Expected kind of an option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Bool,
    Integer,
    String,
    /// A string restricted to the listed values
    OneOf(&'static [&'static str]),
}

impl OptionKind {
    fn accepts(&self, value: &OptionValue) -> Result<(), String> {
        match (self, value) {
            (OptionKind::Bool, OptionValue::Bool(_))
            | (OptionKind::Integer, OptionValue::Integer(_))
            | (OptionKind::String, OptionValue::String(_)) => Ok(()),
            (OptionKind::OneOf(allowed), OptionValue::String(s)) => {
                if allowed.contains(&s.as_str()) {
                    Ok(())
                } else {
                    Err(format!("expected one of {}, found `{}`", allowed.join(", "), s))
                }
            }
            (kind, value) => Err(format!(
                "expected {}, found {}",
                kind.describe(),
                value.type_name()
            )),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            OptionKind::Bool => "boolean",
            OptionKind::Integer => "integer",
            OptionKind::String | OptionKind::OneOf(_) => "string",
        }
    }
}

/// Validated options for one target, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolOptions(BTreeMap<String, OptionValue>);

impl ToolOptions {
    pub fn new() -> Self {
        ToolOptions(BTreeMap::new())
    }

    /// Build options for `tool`, checking every entry against its schema.
    pub fn validated<I>(tool: ToolKind, entries: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (String, OptionValue)>,
    {
        let mut options = BTreeMap::new();
        for (name, value) in entries {
            let kind = tool.option_kind(&name).ok_or_else(|| {
                let known: Vec<&str> = tool.option_schema().iter().map(|(n, _)| *n).collect();
                format!(
                    "unknown option `{}` for {} (known: {})",
                    name,
                    tool,
                    known.join(", ")
                )
            })?;
            kind.accepts(&value)
                .map_err(|e| format!("option `{}`: {}", name, e))?;
            options.insert(name, value);
        }
        Ok(ToolOptions(options))
    }

    /// Convert and validate a raw TOML option table.
    pub fn from_toml(
        tool: ToolKind,
        raw: &BTreeMap<String, toml::Value>,
    ) -> Result<Self, String> {
        let entries = raw
            .iter()
            .map(|(name, value)| {
                OptionValue::from_toml(value)
                    .map(|v| (name.clone(), v))
                    .map_err(|e| format!("option `{}`: {}", name, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::validated(tool, entries)
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.0.get(name)
    }

    /// Boolean option, or `None` if unset.
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.0.get(name) {
            Some(OptionValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.0.get(name) {
            Some(OptionValue::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(OptionValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}
