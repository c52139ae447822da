//! # Option Schemas
//!
//! Every command declares its options as data: an ordered list of
//! [`OptionField`]s collected into an [`OptionSchema`]. The parser binds tokens
//! against a schema; the usage renderer reads the same schema to produce help.
//!
//! ## Default Specs
//!
//! A field's default is declared as a string and parsed into a [`DefaultSpec`]:
//!
//! ```text
//! "internal"                          literal, used verbatim
//! "$OPENSTACK_AUTH_URL"               environment variable, empty when unset
//! "$OPENSTACK_ENDPOINT_TYPE|internal" environment variable with a fallback
//! ```
//!
//! Defaults are resolved on every parse, never when the schema is built, so a
//! change to the environment between two parses is always observed.
//!
//! ## Declaring Schemas
//!
//! In code, through the builder:
//!
//! ```rust
//! use cmdtable::{OptionField, OptionSchema};
//!
//! let schema = OptionSchema::builder()
//!     .field(OptionField::bool("debug").help("debug mode"))
//!     .field(
//!         OptionField::string("endpoint-type")
//!             .help("Endpoint type")
//!             .default("$OPENSTACK_ENDPOINT_TYPE|internal"),
//!     )
//!     .field(OptionField::selector("subcommand").help("subcommand to run"))
//!     .build()
//!     .unwrap();
//! assert!(schema.selector().is_some());
//! ```
//!
//! Or as JSON, which is how external providers ship option tables:
//!
//! ```rust
//! use cmdtable::OptionSchema;
//!
//! let schema = OptionSchema::from_json(r#"[
//!     {"name": "json", "kind": "bool", "help": "print JSON"},
//!     {"name": "region", "kind": "string", "positional": true, "required": true}
//! ]"#).unwrap();
//! assert_eq!(schema.len(), 2);
//! ```

use crate::error::{Result, ShellError};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// The primitive a field binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Bool,
    String,
    /// Consumes the first non-flag token as the name of the command to run.
    Subcommand,
}

impl FromStr for OptionKind {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Ok(OptionKind::Bool),
            "string" | "str" => Ok(OptionKind::String),
            "subcommand" => Ok(OptionKind::Subcommand),
            other => Err(ShellError::MalformedOptionsShape(format!(
                "unsupported option kind `{}`",
                other
            ))),
        }
    }
}

/// Where a field's value comes from when it is not on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DefaultSpec {
    #[default]
    None,
    Literal(String),
    Env {
        var: String,
        fallback: Option<String>,
    },
}

impl DefaultSpec {
    /// Parses a declared default: `$VAR`, `$VAR|fallback`, or a literal.
    pub fn parse(spec: &str) -> Self {
        if spec.is_empty() {
            return DefaultSpec::None;
        }
        match spec.strip_prefix('$') {
            Some(rest) => match rest.split_once('|') {
                Some((var, fallback)) => DefaultSpec::Env {
                    var: var.to_string(),
                    fallback: Some(fallback.to_string()),
                },
                None => DefaultSpec::Env {
                    var: rest.to_string(),
                    fallback: None,
                },
            },
            None => DefaultSpec::Literal(spec.to_string()),
        }
    }

    /// Resolves the default against the current process environment.
    ///
    /// An environment variable that is set but empty counts as unset.
    pub fn resolve(&self) -> String {
        match self {
            DefaultSpec::None => String::new(),
            DefaultSpec::Literal(text) => text.clone(),
            DefaultSpec::Env { var, fallback } => match std::env::var(var) {
                Ok(value) if !value.is_empty() => value,
                _ => fallback.clone().unwrap_or_default(),
            },
        }
    }

    /// The environment variable consulted, if any.
    pub fn env_var(&self) -> Option<&str> {
        match self {
            DefaultSpec::Env { var, .. } => Some(var),
            _ => None,
        }
    }

    /// The text used when the environment variable is unset, or the literal.
    pub fn fallback(&self) -> Option<&str> {
        match self {
            DefaultSpec::None => None,
            DefaultSpec::Literal(text) => Some(text),
            DefaultSpec::Env { fallback, .. } => fallback.as_deref(),
        }
    }
}

impl fmt::Display for DefaultSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultSpec::None => Ok(()),
            DefaultSpec::Literal(text) => write!(f, "{}", text),
            DefaultSpec::Env {
                var,
                fallback: Some(fallback),
            } => write!(f, "${}|{}", var, fallback),
            DefaultSpec::Env {
                var,
                fallback: None,
            } => write!(f, "${}", var),
        }
    }
}

/// One declared option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionField {
    name: String,
    kind: OptionKind,
    help: String,
    default: DefaultSpec,
    metavar: Option<String>,
    required: bool,
    positional: bool,
}

impl OptionField {
    fn new(name: &str, kind: OptionKind, positional: bool) -> Self {
        Self {
            name: normalize_flag_name(name),
            kind,
            help: String::new(),
            default: DefaultSpec::None,
            metavar: None,
            required: false,
            positional,
        }
    }

    /// A `--name` switch.
    pub fn bool(name: &str) -> Self {
        Self::new(name, OptionKind::Bool, false)
    }

    /// A `--name VALUE` option.
    pub fn string(name: &str) -> Self {
        Self::new(name, OptionKind::String, false)
    }

    /// A positional string argument, bound in declaration order.
    pub fn positional(name: &str) -> Self {
        Self::new(name, OptionKind::String, true)
    }

    /// The field that receives the subcommand name.
    pub fn selector(name: &str) -> Self {
        Self::new(name, OptionKind::Subcommand, true)
    }

    pub fn help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    /// Sets the declared default (`$VAR`, `$VAR|fallback` or a literal).
    pub fn default(mut self, spec: &str) -> Self {
        self.default = DefaultSpec::parse(spec);
        self
    }

    pub fn metavar(mut self, metavar: &str) -> Self {
        self.metavar = Some(metavar.to_string());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    pub fn help_text(&self) -> &str {
        &self.help
    }

    pub fn default_spec(&self) -> &DefaultSpec {
        &self.default
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_positional(&self) -> bool {
        self.positional
    }

    pub fn is_selector(&self) -> bool {
        self.kind == OptionKind::Subcommand
    }

    /// Placeholder shown in usage: the declared metavar or the upper-cased name.
    pub fn display_metavar(&self) -> String {
        match &self.metavar {
            Some(metavar) => metavar.clone(),
            None => self.name.to_uppercase().replace('-', "_"),
        }
    }
}

/// An ordered, validated set of option fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OptionSchema {
    fields: Vec<OptionField>,
}

impl OptionSchema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// A schema with no fields, for commands that take no options.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validates and wraps a list of fields.
    pub fn new(fields: Vec<OptionField>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut selectors = Vec::new();
        let mut after_selector = false;

        for field in &fields {
            if field.name.is_empty()
                || field.name.starts_with('-')
                || field.name.chars().any(char::is_whitespace)
            {
                return Err(ShellError::MalformedOptionsShape(format!(
                    "invalid field name `{}`",
                    field.name
                )));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(ShellError::MalformedOptionsShape(format!(
                    "field `{}` is declared twice",
                    field.name
                )));
            }
            if field.positional && field.kind == OptionKind::Bool {
                return Err(ShellError::MalformedOptionsShape(format!(
                    "positional field `{}` cannot be a bool",
                    field.name
                )));
            }
            if field.is_selector() {
                selectors.push(field.name.as_str());
                after_selector = true;
            } else if field.positional && after_selector {
                return Err(ShellError::MalformedOptionsShape(format!(
                    "positional field `{}` follows the subcommand selector",
                    field.name
                )));
            }
        }

        if selectors.len() > 1 {
            return Err(ShellError::MalformedOptionsShape(format!(
                "more than one subcommand selector: {}",
                selectors.join(", ")
            )));
        }

        Ok(Self { fields })
    }

    /// Loads a schema declared as a JSON array of fields.
    pub fn from_json(json: &str) -> Result<Self> {
        let decls: Vec<FieldDecl> = serde_json::from_str(json)
            .map_err(|e| ShellError::MalformedOptionsShape(e.to_string()))?;

        let fields = decls
            .into_iter()
            .map(FieldDecl::into_field)
            .collect::<Result<Vec<_>>>()?;
        Self::new(fields)
    }

    pub fn fields(&self) -> &[OptionField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&OptionField> {
        let name = normalize_flag_name(name);
        self.fields.iter().find(|f| f.name == name)
    }

    /// Looks up a field addressable as `--name`.
    pub fn flag(&self, name: &str) -> Option<&OptionField> {
        self.field(name).filter(|f| !f.positional)
    }

    pub fn flags(&self) -> impl Iterator<Item = &OptionField> {
        self.fields.iter().filter(|f| !f.positional)
    }

    /// Positional string fields, excluding the selector.
    pub fn positionals(&self) -> impl Iterator<Item = &OptionField> {
        self.fields
            .iter()
            .filter(|f| f.positional && !f.is_selector())
    }

    pub fn selector(&self) -> Option<&OptionField> {
        self.fields.iter().find(|f| f.is_selector())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<OptionField>,
}

impl SchemaBuilder {
    pub fn field(mut self, field: OptionField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> Result<OptionSchema> {
        OptionSchema::new(self.fields)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldDecl {
    name: String,
    kind: String,
    #[serde(default)]
    help: String,
    #[serde(default)]
    default: String,
    #[serde(default)]
    metavar: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    positional: bool,
}

impl FieldDecl {
    fn into_field(self) -> Result<OptionField> {
        let kind: OptionKind = self.kind.parse().map_err(|_| {
            ShellError::MalformedOptionsShape(format!(
                "field `{}` has unsupported kind `{}`",
                self.name, self.kind
            ))
        })?;
        let positional = self.positional || kind == OptionKind::Subcommand;

        let mut field = OptionField::new(&self.name, kind, positional)
            .help(&self.help)
            .default(&self.default);
        field.metavar = self.metavar;
        field.required = self.required;
        Ok(field)
    }
}

/// Flags may be written with `_` or `-`; the schema stores the dashed form.
pub(crate) fn normalize_flag_name(name: &str) -> String {
    name.replace('_', "-")
}

/// Interprets a flag or default value as a boolean.
pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
