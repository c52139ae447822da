//! # Command Registry
//!
//! An insertion-ordered, append-only table of commands. Providers add their
//! commands through explicit calls during start-up:
//!
//! ```rust
//! use cmdtable::{NoOptions, Registry};
//!
//! struct Client;
//!
//! fn register(registry: &mut Registry<Client>) -> cmdtable::Result<()> {
//!     registry.register_with_client(
//!         "list-regions",
//!         "List regions",
//!         |_client: &Client, _: NoOptions| Ok(()),
//!     )?;
//!     registry.register_options_only("version", "Show version", |_: NoOptions| Ok(()))
//! }
//!
//! let mut registry = Registry::new();
//! register(&mut registry).unwrap();
//! let names: Vec<_> = registry.list().map(|e| e.name()).collect();
//! assert_eq!(names, ["list-regions", "version"]);
//! ```
//!
//! Once built the registry is only read. Callbacks are `Send + Sync`, so a
//! finished registry can be shared across threads.

use crate::bound::{BoundOptions, CommandOptions};
use crate::error::{Result, ShellError};
use crate::schema::OptionSchema;
use indexmap::IndexMap;
use std::fmt;

/// Name reserved for the built-in help pseudo-command.
pub const HELP_COMMAND: &str = "help";

type OptionsOnlyFn = dyn Fn(&BoundOptions) -> Result<()> + Send + Sync;
type ClientFn<C> = dyn Fn(&C, &BoundOptions) -> Result<()> + Send + Sync;

/// A command callback, tagged by whether it receives a client.
pub enum Callback<C> {
    OptionsOnly(Box<OptionsOnlyFn>),
    NeedsClient(Box<ClientFn<C>>),
}

impl<C: 'static> Callback<C> {
    /// Wraps `f(options)`, converting bound values into `O` first.
    pub fn options_only<O, F>(f: F) -> Self
    where
        O: CommandOptions,
        F: Fn(O) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Callback::OptionsOnly(Box::new(move |bound: &BoundOptions| {
            let options = O::from_bound(bound)?;
            f(options).map_err(ShellError::CommandFailure)
        }))
    }

    /// Wraps `f(client, options)`, converting bound values into `O` first.
    pub fn with_client<O, F>(f: F) -> Self
    where
        O: CommandOptions,
        F: Fn(&C, O) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Callback::NeedsClient(Box::new(move |client: &C, bound: &BoundOptions| {
            let options = O::from_bound(bound)?;
            f(client, options).map_err(ShellError::CommandFailure)
        }))
    }
}

impl<C> Callback<C> {
    pub fn needs_client(&self) -> bool {
        matches!(self, Callback::NeedsClient(_))
    }
}

impl<C> fmt::Debug for Callback<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::OptionsOnly(_) => f.write_str("OptionsOnly"),
            Callback::NeedsClient(_) => f.write_str("NeedsClient"),
        }
    }
}

/// One registered command.
pub struct CommandEntry<C> {
    name: String,
    description: String,
    schema: OptionSchema,
    callback: Callback<C>,
}

impl<C> fmt::Debug for CommandEntry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEntry")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("schema", &self.schema)
            .field("callback", &self.callback)
            .finish()
    }
}

impl<C> CommandEntry<C> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn schema(&self) -> &OptionSchema {
        &self.schema
    }

    pub fn callback(&self) -> &Callback<C> {
        &self.callback
    }

    pub fn needs_client(&self) -> bool {
        self.callback.needs_client()
    }
}

pub struct Registry<C> {
    entries: IndexMap<String, CommandEntry<C>>,
}

impl<C> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.values()).finish()
    }
}

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<C> Registry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command. Names are unique and `help` is reserved.
    pub fn register(
        &mut self,
        name: &str,
        schema: OptionSchema,
        description: &str,
        callback: Callback<C>,
    ) -> Result<()> {
        if name.is_empty() || name.starts_with('-') || name.chars().any(char::is_whitespace) {
            return Err(ShellError::MalformedOptionsShape(format!(
                "invalid command name `{}`",
                name
            )));
        }
        if name == HELP_COMMAND || self.entries.contains_key(name) {
            return Err(ShellError::DuplicateCommand(name.to_string()));
        }
        if let Some(selector) = schema.selector() {
            return Err(ShellError::MalformedOptionsShape(format!(
                "command `{}` declares a nested subcommand selector `{}`",
                name,
                selector.name()
            )));
        }

        tracing::trace!(command = name, kind = ?callback, "registered command");
        self.entries.insert(
            name.to_string(),
            CommandEntry {
                name: name.to_string(),
                description: description.to_string(),
                schema,
                callback,
            },
        );
        Ok(())
    }

    /// Lookup by name. The returned error carries no usage text; the
    /// program attaches it.
    pub fn lookup(&self, name: &str) -> Result<&CommandEntry<C>> {
        self.entries
            .get(name)
            .ok_or_else(|| ShellError::UnknownCommand {
                name: name.to_string(),
                usage: String::new(),
            })
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry<C>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Entries in registration order.
    pub fn list(&self) -> impl Iterator<Item = &CommandEntry<C>> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C: 'static> Registry<C> {
    /// Registers `f(options)` with the schema declared by `O`.
    pub fn register_options_only<O, F>(&mut self, name: &str, description: &str, f: F) -> Result<()>
    where
        O: CommandOptions,
        F: Fn(O) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(name, O::schema()?, description, Callback::options_only::<O, F>(f))
    }

    /// Registers `f(client, options)` with the schema declared by `O`.
    pub fn register_with_client<O, F>(&mut self, name: &str, description: &str, f: F) -> Result<()>
    where
        O: CommandOptions,
        F: Fn(&C, O) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(name, O::schema()?, description, Callback::with_client::<O, F>(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bound::NoOptions;
    use crate::schema::OptionField;

    struct Client;

    fn flag_schema() -> OptionSchema {
        OptionSchema::builder()
            .field(OptionField::string("flag").help("a flag"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_lookup_returns_registered_entry() {
        let mut registry: Registry<Client> = Registry::new();
        registry
            .register(
                "mycmd",
                flag_schema(),
                "My command",
                Callback::with_client(|_: &Client, _: NoOptions| Ok(())),
            )
            .unwrap();

        let entry = registry.lookup("mycmd").unwrap();
        assert_eq!(entry.name(), "mycmd");
        assert_eq!(entry.description(), "My command");
        assert_eq!(entry.schema(), &flag_schema());
        assert!(entry.needs_client());
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry: Registry<Client> = Registry::new();
        registry
            .register_options_only("mycmd", "first", |_: NoOptions| Ok(()))
            .unwrap();
        let err = registry
            .register_options_only("mycmd", "second", |_: NoOptions| Ok(()))
            .unwrap_err();
        assert!(matches!(err, ShellError::DuplicateCommand(name) if name == "mycmd"));
        assert_eq!(registry.lookup("mycmd").unwrap().description(), "first");
    }

    #[test]
    fn test_help_name_is_reserved() {
        let mut registry: Registry<Client> = Registry::new();
        let err = registry
            .register_options_only(HELP_COMMAND, "shadow", |_: NoOptions| Ok(()))
            .unwrap_err();
        assert!(matches!(err, ShellError::DuplicateCommand(_)));
    }

    #[test]
    fn test_unknown_lookup_fails() {
        let registry: Registry<Client> = Registry::new();
        assert!(matches!(
            registry.lookup("bogus"),
            Err(ShellError::UnknownCommand { name, .. }) if name == "bogus"
        ));
    }

    #[test]
    fn test_list_preserves_registration_order() {
        let mut registry: Registry<Client> = Registry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry
                .register_options_only(name, "", |_: NoOptions| Ok(()))
                .unwrap();
        }
        let names: Vec<_> = registry.list().map(|e| e.name()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_nested_selector_in_command_schema_is_rejected() {
        let mut registry: Registry<Client> = Registry::new();
        let schema = OptionSchema::builder()
            .field(OptionField::selector("inner"))
            .build()
            .unwrap();
        let err = registry
            .register(
                "outer",
                schema,
                "",
                Callback::options_only(|_: NoOptions| Ok(())),
            )
            .unwrap_err();
        assert!(matches!(err, ShellError::MalformedOptionsShape(_)));
        assert!(!registry.contains("outer"));
    }

    #[test]
    fn test_invalid_command_names_are_rejected() {
        let mut registry: Registry<Client> = Registry::new();
        for name in ["", "--flag", "two words"] {
            assert!(registry
                .register_options_only(name, "", |_: NoOptions| Ok(()))
                .is_err());
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry<Client>>();
    }
}
