//! Values produced by binding tokens against an [`OptionSchema`].

use crate::error::{Result, ShellError};
use crate::schema::{normalize_flag_name, OptionSchema};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Str(String),
}

/// Whether a value was typed by the user or filled in from the declared default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueSource {
    CommandLine,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub value: OptionValue,
    pub source: ValueSource,
}

/// The bound values of one schema, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BoundOptions {
    values: IndexMap<String, Binding>,
}

impl BoundOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&mut self, name: &str, value: OptionValue, source: ValueSource) {
        self.values
            .insert(name.to_string(), Binding { value, source });
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.values.get(&normalize_flag_name(name))
    }

    /// Reads a bool field; fails if the field was never declared.
    pub fn flag(&self, name: &str) -> Result<bool> {
        match self.get(name).map(|b| &b.value) {
            Some(OptionValue::Bool(value)) => Ok(*value),
            Some(OptionValue::Str(_)) => Err(ShellError::MalformedOptionsShape(format!(
                "option `{}` is a string, not a bool",
                name
            ))),
            None => Err(ShellError::UnknownOption(name.to_string())),
        }
    }

    /// Reads a string field (including positionals and the selector).
    pub fn string(&self, name: &str) -> Result<&str> {
        match self.get(name).map(|b| &b.value) {
            Some(OptionValue::Str(value)) => Ok(value),
            Some(OptionValue::Bool(_)) => Err(ShellError::MalformedOptionsShape(format!(
                "option `{}` is a bool, not a string",
                name
            ))),
            None => Err(ShellError::UnknownOption(name.to_string())),
        }
    }

    /// Like [`BoundOptions::string`], mapping the empty string to `None`.
    pub fn optional_string(&self, name: &str) -> Result<Option<&str>> {
        self.string(name)
            .map(|value| if value.is_empty() { None } else { Some(value) })
    }

    pub fn source(&self, name: &str) -> Option<ValueSource> {
        self.get(name).map(|b| b.source)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A typed options struct backed by a declared schema.
///
/// Implementors describe their fields once in [`CommandOptions::schema`] and
/// read them back out of the bound values in [`CommandOptions::from_bound`].
pub trait CommandOptions: Sized {
    fn schema() -> Result<OptionSchema>;

    fn from_bound(bound: &BoundOptions) -> Result<Self>;
}

/// Options type for commands that take no arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoOptions;

impl CommandOptions for NoOptions {
    fn schema() -> Result<OptionSchema> {
        Ok(OptionSchema::empty())
    }

    fn from_bound(_bound: &BoundOptions) -> Result<Self> {
        Ok(NoOptions)
    }
}
