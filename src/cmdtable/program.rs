//! # Programs
//!
//! A [`Program`] ties a base schema (which must declare a subcommand selector)
//! to a [`Registry`] and turns raw tokens into either a help page or an
//! [`Invocation`] ready to execute.
//!
//! ```text
//! tokens ──► base pass ──► --help or help=true? ──► Help(top-level)
//!                │
//!                ▼
//!          command name ──► "help" ──► Help(command or top-level)
//!                │
//!                ▼
//!          registry lookup ──► unknown ──► UnknownCommand(top-level usage)
//!                │
//!                ▼
//!          command pass ──► --help or help=true? ──► Help(command)
//!                │
//!                ▼
//!          Invocation { base, entry, options }
//! ```
//!
//! Parsing only reads the registry and keeps no state between calls: the same
//! tokens against the same registry and environment bind the same values.

use crate::bound::BoundOptions;
use crate::error::{Result, ShellError};
use crate::parser::{bind, BindMode, PassOutcome, TokenCursor};
use crate::registry::{CommandEntry, Registry, HELP_COMMAND};
use crate::schema::{OptionField, OptionKind, OptionSchema};
use crate::usage::{colors_supported, render_help, usage_line, HelpPage};

const HELP_DESCRIPTION: &str = "Show help of a subcommand";
const HELP_TARGET: &str = "subcommand";
const HELP_FLAG: &str = "help";

/// The result of a successful parse.
pub enum Parsed<'p, C> {
    /// Help was asked for; the text is ready to print.
    Help(String),
    Run(Invocation<'p, C>),
}

/// A resolved command with both option sets bound.
pub struct Invocation<'p, C> {
    pub(crate) base_schema: &'p OptionSchema,
    pub(crate) base: BoundOptions,
    pub(crate) entry: &'p CommandEntry<C>,
    pub(crate) options: BoundOptions,
}

impl<'p, C> Invocation<'p, C> {
    pub fn command(&self) -> &str {
        self.entry.name()
    }

    pub fn entry(&self) -> &CommandEntry<C> {
        self.entry
    }

    /// Top-level options, including the resolved command name.
    pub fn base(&self) -> &BoundOptions {
        &self.base
    }

    /// Options bound against the command's own schema.
    pub fn options(&self) -> &BoundOptions {
        &self.options
    }

    pub fn needs_client(&self) -> bool {
        self.entry.needs_client()
    }
}

pub struct Program<C> {
    name: String,
    about: String,
    epilog: String,
    base: OptionSchema,
    registry: Registry<C>,
    use_color: bool,
}

impl<C> Program<C> {
    /// Builds a program. The base schema must declare a subcommand selector.
    pub fn new(name: &str, base: OptionSchema, registry: Registry<C>) -> Result<Self> {
        if base.selector().is_none() {
            return Err(ShellError::MalformedOptionsShape(format!(
                "base options of `{}` declare no subcommand selector",
                name
            )));
        }
        Ok(Self {
            name: name.to_string(),
            about: String::new(),
            epilog: String::new(),
            base,
            registry,
            use_color: colors_supported(),
        })
    }

    pub fn about(mut self, about: &str) -> Self {
        self.about = about.to_string();
        self
    }

    /// Text printed at the bottom of the top-level help.
    pub fn epilog(mut self, epilog: &str) -> Self {
        self.epilog = epilog.to_string();
        self
    }

    /// Overrides terminal color detection for help pages.
    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &Registry<C> {
        &self.registry
    }

    pub fn base_schema(&self) -> &OptionSchema {
        &self.base
    }

    /// The top-level usage line, always plain.
    pub fn usage(&self) -> String {
        format!("{}\n", usage_line(&self.name, &self.base))
    }

    /// The full top-level help page.
    pub fn help(&self) -> String {
        let mut commands: Vec<(&str, &str)> = self
            .registry
            .list()
            .map(|entry| (entry.name(), entry.description()))
            .collect();
        commands.push((HELP_COMMAND, HELP_DESCRIPTION));

        render_help(
            &HelpPage {
                usage: usage_line(&self.name, &self.base),
                about: &self.about,
                schema: &self.base,
                commands,
                epilog: &self.epilog,
            },
            self.use_color,
        )
    }

    /// The usage line of one command, always plain.
    pub fn command_usage(&self, entry: &CommandEntry<C>) -> String {
        format!("{}\n", usage_line(&self.command_path(entry.name()), entry.schema()))
    }

    /// The full help page of a registered command (or of `help` itself).
    pub fn command_help(&self, name: &str) -> Result<String> {
        if name == HELP_COMMAND {
            return Ok(self.page_for(HELP_COMMAND, HELP_DESCRIPTION, &help_schema()));
        }
        let entry = self
            .registry
            .get(name)
            .ok_or_else(|| ShellError::UnknownCommand {
                name: name.to_string(),
                usage: self.usage(),
            })?;
        Ok(self.page_for(entry.name(), entry.description(), entry.schema()))
    }

    fn command_path(&self, command: &str) -> String {
        format!("{} {}", self.name, command)
    }

    fn page_for(&self, command: &str, description: &str, schema: &OptionSchema) -> String {
        render_help(
            &HelpPage {
                usage: usage_line(&self.command_path(command), schema),
                about: description,
                schema,
                commands: Vec::new(),
                epilog: "",
            },
            self.use_color,
        )
    }

    /// Parses raw tokens (without the program name).
    pub fn parse<S: AsRef<str>>(&self, args: &[S]) -> Result<Parsed<'_, C>> {
        let tokens: Vec<String> = args.iter().map(|a| a.as_ref().to_string()).collect();
        let mut cursor = TokenCursor::new(&tokens);

        let base = match bind(&self.base, &mut cursor, BindMode::Base) {
            Ok(PassOutcome::Bound(base)) => base,
            Ok(PassOutcome::HelpRequested) => {
                tracing::debug!("top-level help requested");
                return Ok(Parsed::Help(self.help()));
            }
            Err(fault) => return Err(fault.with_usage(self.usage())),
        };
        if help_flag_set(&self.base, &base) {
            tracing::debug!("top-level help requested");
            return Ok(Parsed::Help(self.help()));
        }

        let selector = self.base.selector().map(OptionField::name).unwrap_or_default();
        let command = match base.string(selector) {
            Ok(name) => name.to_string(),
            Err(_) => {
                return Err(ShellError::MissingSubcommand {
                    usage: self.usage(),
                })
            }
        };
        tracing::debug!(command = %command, "base options bound");

        if command == HELP_COMMAND {
            return self.parse_help(&mut cursor).map(Parsed::Help);
        }

        let entry = self
            .registry
            .get(&command)
            .ok_or_else(|| ShellError::UnknownCommand {
                name: command.clone(),
                usage: self.usage(),
            })?;

        let options = match bind(entry.schema(), &mut cursor, BindMode::Command) {
            Ok(PassOutcome::Bound(options)) => options,
            Ok(PassOutcome::HelpRequested) => {
                tracing::debug!(command = %command, "command help requested");
                return self.command_help(&command).map(Parsed::Help);
            }
            Err(fault) => return Err(fault.with_usage(self.command_usage(entry))),
        };
        if help_flag_set(entry.schema(), &options) {
            tracing::debug!(command = %command, "command help requested");
            return self.command_help(&command).map(Parsed::Help);
        }
        tracing::debug!(
            command = %command,
            needs_client = entry.needs_client(),
            "command options bound"
        );

        Ok(Parsed::Run(Invocation {
            base_schema: &self.base,
            base,
            entry,
            options,
        }))
    }

    fn parse_help(&self, cursor: &mut TokenCursor<'_>) -> Result<String> {
        let schema = help_schema();
        let options = match bind(&schema, cursor, BindMode::Command) {
            Ok(PassOutcome::Bound(options)) => options,
            Ok(PassOutcome::HelpRequested) => return self.command_help(HELP_COMMAND),
            Err(fault) => {
                let usage = format!(
                    "{}\n",
                    usage_line(&self.command_path(HELP_COMMAND), &schema)
                );
                return Err(fault.with_usage(usage));
            }
        };

        match options.optional_string(HELP_TARGET)? {
            Some(target) => self.command_help(target),
            None => Ok(self.help()),
        }
    }
}

/// True when the schema declares a bool `help` field and it bound to `true`,
/// whether from `--help=<bool>` or from an environment default.
fn help_flag_set(schema: &OptionSchema, bound: &BoundOptions) -> bool {
    schema
        .field(HELP_FLAG)
        .is_some_and(|field| field.kind() == OptionKind::Bool)
        && bound.flag(HELP_FLAG).unwrap_or(false)
}

fn help_schema() -> OptionSchema {
    OptionSchema::builder()
        .field(OptionField::positional(HELP_TARGET).help("sub-command name"))
        .build()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bound::{CommandOptions, NoOptions, ValueSource};
    use serial_test::serial;
    use std::env;

    struct Client;

    struct FlagOptions {
        flag: String,
    }

    impl CommandOptions for FlagOptions {
        fn schema() -> Result<OptionSchema> {
            OptionSchema::builder()
                .field(OptionField::string("flag").help("a flag"))
                .build()
        }

        fn from_bound(bound: &BoundOptions) -> Result<Self> {
            Ok(Self {
                flag: bound.string("flag")?.to_string(),
            })
        }
    }

    fn base_schema() -> OptionSchema {
        OptionSchema::builder()
            .field(OptionField::bool("debug").help("debug mode"))
            .field(OptionField::bool("help").help("Show help"))
            .field(
                OptionField::string("region-id")
                    .help("RegionId")
                    .default("$CMDTABLE_PROGRAM_REGION"),
            )
            .field(OptionField::selector("subcommand").help("prog subcommand"))
            .build()
            .unwrap()
    }

    fn program() -> Program<Client> {
        let mut registry = Registry::new();
        registry
            .register_with_client("mycmd", "My command", |_: &Client, opts: FlagOptions| {
                assert!(!opts.flag.is_empty());
                Ok(())
            })
            .unwrap();
        registry
            .register_options_only("version", "Show version", |_: NoOptions| Ok(()))
            .unwrap();
        Program::new("prog", base_schema(), registry)
            .unwrap()
            .about("A test program.")
            .epilog("See \"prog help COMMAND\".")
            .with_color(false)
    }

    fn run<'p>(parsed: Parsed<'p, Client>) -> Invocation<'p, Client> {
        match parsed {
            Parsed::Run(invocation) => invocation,
            Parsed::Help(text) => panic!("unexpected help:\n{text}"),
        }
    }

    fn help(parsed: Parsed<'_, Client>) -> String {
        match parsed {
            Parsed::Help(text) => text,
            Parsed::Run(inv) => panic!("unexpected run of {}", inv.command()),
        }
    }

    #[test]
    fn test_base_schema_without_selector_is_rejected() {
        let schema = OptionSchema::builder()
            .field(OptionField::bool("debug"))
            .build()
            .unwrap();
        let err = Program::<Client>::new("prog", schema, Registry::new()).err().unwrap();
        assert!(matches!(err, ShellError::MalformedOptionsShape(_)));
    }

    #[test]
    fn test_parse_binds_both_passes() {
        let program = program();
        let inv = run(program
            .parse(&["--region-id", "RegionOne", "mycmd", "--flag", "v"])
            .unwrap());

        assert_eq!(inv.command(), "mycmd");
        assert_eq!(inv.base().string("region-id").unwrap(), "RegionOne");
        assert_eq!(inv.base().string("subcommand").unwrap(), "mycmd");
        assert_eq!(inv.options().string("flag").unwrap(), "v");
        assert_eq!(inv.options().source("flag"), Some(ValueSource::CommandLine));
        assert!(inv.needs_client());
    }

    #[test]
    fn test_help_pseudo_command_returns_command_help() {
        let program = program();
        let text = help(program.parse(&["help", "mycmd"]).unwrap());
        assert!(text.starts_with("usage: prog mycmd [--flag FLAG]"));
        assert!(text.contains("My command"));
        assert!(!text.contains("Positional arguments:"));
    }

    #[test]
    fn test_help_without_target_returns_top_level_help() {
        let program = program();
        let text = help(program.parse(&["help"]).unwrap());
        assert_eq!(text, program.help());
    }

    #[test]
    fn test_help_for_help() {
        let program = program();
        let text = help(program.parse(&["help", "help"]).unwrap());
        assert!(text.starts_with("usage: prog help [<SUBCOMMAND>]"));
    }

    #[test]
    fn test_help_for_unknown_command_fails_with_top_usage() {
        let program = program();
        let err = program.parse(&["help", "bogus"]).err().unwrap();
        assert!(matches!(&err, ShellError::UnknownCommand { name, .. } if name == "bogus"));
        assert_eq!(err.usage(), Some(program.usage().as_str()));
    }

    #[test]
    fn test_unknown_command_carries_top_level_usage() {
        let program = program();
        let err = program.parse(&["bogus"]).err().unwrap();
        assert!(matches!(&err, ShellError::UnknownCommand { name, .. } if name == "bogus"));
        let usage = err.usage().unwrap();
        assert!(usage.starts_with("usage: prog [--debug]"));
        assert!(usage.contains("<SUBCOMMAND> ..."));
    }

    #[test]
    fn test_missing_subcommand() {
        let program = program();
        let err = program.parse(&["--debug"]).err().unwrap();
        assert!(matches!(err, ShellError::MissingSubcommand { .. }));
    }

    #[test]
    fn test_top_level_help_flag_short_circuits() {
        let program = program();
        let text = help(program.parse(&["--help", "bogus"]).unwrap());
        assert!(text.contains("Positional arguments:"));
        assert!(text.contains("    mycmd"));
        assert!(text.contains("    version"));
        assert!(text.contains("    help"));
        assert!(text.contains("See \"prog help COMMAND\"."));
    }

    #[test]
    fn test_help_flag_with_value_short_circuits() {
        let program = program();
        for args in [
            &["--help=true", "version"][..],
            &["--help=yes", "mycmd", "--flag", "v"][..],
            &["--help=1"][..],
        ] {
            assert_eq!(help(program.parse(args).unwrap()), program.help());
        }
    }

    #[test]
    fn test_help_flag_set_false_runs_the_command() {
        let program = program();
        let inv = run(program.parse(&["--help=false", "version"]).unwrap());
        assert_eq!(inv.command(), "version");
        assert!(!inv.base().flag("help").unwrap());
    }

    #[test]
    fn test_command_help_field_with_value_returns_command_help() {
        struct HelpOptions;

        impl CommandOptions for HelpOptions {
            fn schema() -> Result<OptionSchema> {
                OptionSchema::builder()
                    .field(OptionField::bool("help").help("Show help"))
                    .build()
            }

            fn from_bound(_bound: &BoundOptions) -> Result<Self> {
                Ok(HelpOptions)
            }
        }

        let mut registry = Registry::new();
        registry
            .register_with_client(
                "selfhelp",
                "Declares its own help field",
                |_: &Client, _: HelpOptions| Ok(()),
            )
            .unwrap();
        let program = Program::new("prog", base_schema(), registry)
            .unwrap()
            .with_color(false);

        let text = help(program.parse(&["selfhelp", "--help=on"]).unwrap());
        assert_eq!(text, program.command_help("selfhelp").unwrap());
    }

    #[test]
    fn test_help_lists_commands_in_registration_order_with_help_last() {
        let text = program().help();
        let mycmd = text.find("    mycmd").unwrap();
        let version = text.find("    version").unwrap();
        let help = text.find("    help").unwrap();
        assert!(mycmd < version && version < help);
    }

    #[test]
    fn test_command_help_flag() {
        let program = program();
        let text = help(program.parse(&["mycmd", "--help"]).unwrap());
        assert!(text.starts_with("usage: prog mycmd"));
    }

    #[test]
    fn test_flag_errors_use_scope_usage() {
        let program = program();

        let err = program.parse(&["--bogus", "mycmd"]).err().unwrap();
        assert!(matches!(err, ShellError::UnrecognizedFlag { .. }));
        assert!(err.usage().unwrap().starts_with("usage: prog [--debug]"));

        let err = program.parse(&["mycmd", "--bogus"]).err().unwrap();
        assert!(matches!(err, ShellError::UnrecognizedFlag { .. }));
        assert_eq!(err.usage(), Some("usage: prog mycmd [--flag FLAG]\n"));

        let err = program.parse(&["mycmd", "--flag"]).err().unwrap();
        assert!(matches!(err, ShellError::MissingFlagValue { flag, .. } if flag == "flag"));
    }

    #[test]
    fn test_surplus_argument_after_command() {
        let program = program();
        let err = program.parse(&["version", "extra"]).err().unwrap();
        assert!(matches!(err, ShellError::UnexpectedArgument { arg, .. } if arg == "extra"));
    }

    #[test]
    #[serial]
    fn test_parsing_is_idempotent() {
        env::set_var("CMDTABLE_PROGRAM_REGION", "RegionTwo");
        let program = program();
        let args = ["--debug", "mycmd", "--flag", "v"];

        let first = run(program.parse(&args).unwrap());
        let second = run(program.parse(&args).unwrap());
        env::remove_var("CMDTABLE_PROGRAM_REGION");

        assert_eq!(first.base(), second.base());
        assert_eq!(first.options(), second.options());
        assert_eq!(first.base().string("region-id").unwrap(), "RegionTwo");
        assert_eq!(program.registry().len(), 2);
    }

    #[test]
    fn test_parse_accepts_owned_strings() {
        let program = program();
        let args: Vec<String> = vec!["version".into()];
        let inv = run(program.parse(&args).unwrap());
        assert!(!inv.needs_client());
        assert!(inv.options().is_empty());
    }
}
