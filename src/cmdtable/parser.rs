//! # Token Binding
//!
//! One binding pass walks a shared [`TokenCursor`] and binds tokens against a
//! single [`OptionSchema`]:
//!
//! - `--name value`, `--name=value` for string fields
//! - `--name` (or `--name=false`) for bool fields
//! - bare tokens fill positional fields in declaration order
//! - `--` ends flag parsing
//! - `--help` / `-h` stops the pass and asks for help
//!
//! In [`BindMode::Base`] the first bare token left over after the positionals
//! becomes the subcommand name and the pass stops there, leaving the cursor
//! on the first token that belongs to the subcommand. Fields that were not
//! supplied get their declared default, resolved now.
//!
//! Failures are returned as a [`Fault`] without usage text; the program
//! attaches the usage of whichever scope was being parsed.

use crate::bound::{BoundOptions, OptionValue, ValueSource};
use crate::error::ShellError;
use crate::schema::{parse_bool, OptionKind, OptionSchema};

pub(crate) struct TokenCursor<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    pub(crate) fn new(tokens: &'a [String]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn advance(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token.as_str())
    }

    #[cfg(test)]
    fn remaining(&self) -> &'a [String] {
        &self.tokens[self.pos..]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BindMode {
    /// Top-level pass: stops at the subcommand name, required flags are
    /// checked later and only for commands that need a client.
    Base,
    /// Subcommand pass: consumes everything, required fields checked now.
    Command,
}

#[derive(Debug)]
pub(crate) enum PassOutcome {
    Bound(BoundOptions),
    HelpRequested,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Fault {
    UnrecognizedFlag(String),
    MissingFlagValue(String),
    InvalidFlagValue { flag: String, value: String },
    UnexpectedArgument(String),
    MissingArgument(String),
}

impl Fault {
    pub(crate) fn with_usage(self, usage: String) -> ShellError {
        match self {
            Fault::UnrecognizedFlag(flag) => ShellError::UnrecognizedFlag { flag, usage },
            Fault::MissingFlagValue(flag) => ShellError::MissingFlagValue { flag, usage },
            Fault::InvalidFlagValue { flag, value } => {
                ShellError::InvalidFlagValue { flag, value, usage }
            }
            Fault::UnexpectedArgument(arg) => ShellError::UnexpectedArgument { arg, usage },
            Fault::MissingArgument(name) => ShellError::MissingArgument { name, usage },
        }
    }
}

fn is_help_token(token: &str) -> bool {
    token == "--help" || token == "-h"
}

pub(crate) fn bind(
    schema: &OptionSchema,
    cursor: &mut TokenCursor<'_>,
    mode: BindMode,
) -> Result<PassOutcome, Fault> {
    let mut bound = BoundOptions::new();
    let mut positionals = schema.positionals();
    let mut flags_done = false;

    while let Some(token) = cursor.advance() {
        if !flags_done {
            if token == "--" {
                flags_done = true;
                continue;
            }
            if is_help_token(token) {
                return Ok(PassOutcome::HelpRequested);
            }
            if let Some(body) = token.strip_prefix("--") {
                bind_flag(schema, cursor, &mut bound, body)?;
                continue;
            }
            if token.len() > 1 && token.starts_with('-') {
                return Err(Fault::UnrecognizedFlag(token.to_string()));
            }
        }

        if let Some(field) = positionals.next() {
            tracing::trace!(field = field.name(), "bound positional");
            bound.set(
                field.name(),
                OptionValue::Str(token.to_string()),
                ValueSource::CommandLine,
            );
            continue;
        }

        match (mode, schema.selector()) {
            (BindMode::Base, Some(selector)) => {
                bound.set(
                    selector.name(),
                    OptionValue::Str(token.to_string()),
                    ValueSource::CommandLine,
                );
                break;
            }
            _ => return Err(Fault::UnexpectedArgument(token.to_string())),
        }
    }

    apply_defaults(schema, &mut bound)?;

    if mode == BindMode::Command {
        check_required(schema, &bound)?;
    }

    Ok(PassOutcome::Bound(bound))
}

fn bind_flag(
    schema: &OptionSchema,
    cursor: &mut TokenCursor<'_>,
    bound: &mut BoundOptions,
    body: &str,
) -> Result<(), Fault> {
    let (name, inline) = match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    };
    let field = schema
        .flag(name)
        .ok_or_else(|| Fault::UnrecognizedFlag(format!("--{}", name)))?;

    let value = match field.kind() {
        OptionKind::Bool => {
            let value = match inline {
                Some(text) => parse_bool(text).ok_or_else(|| Fault::InvalidFlagValue {
                    flag: field.name().to_string(),
                    value: text.to_string(),
                })?,
                None => true,
            };
            OptionValue::Bool(value)
        }
        OptionKind::String => {
            let value = match inline {
                Some(text) => text,
                None => cursor
                    .advance()
                    .ok_or_else(|| Fault::MissingFlagValue(field.name().to_string()))?,
            };
            OptionValue::Str(value.to_string())
        }
        OptionKind::Subcommand => return Err(Fault::UnrecognizedFlag(format!("--{}", name))),
    };

    tracing::trace!(field = field.name(), "bound flag");
    bound.set(field.name(), value, ValueSource::CommandLine);
    Ok(())
}

fn apply_defaults(schema: &OptionSchema, bound: &mut BoundOptions) -> Result<(), Fault> {
    for field in schema.fields() {
        if bound.contains(field.name()) {
            continue;
        }
        let value = match field.kind() {
            OptionKind::Bool => {
                let text = field.default_spec().resolve();
                let value = parse_bool(&text).ok_or_else(|| Fault::InvalidFlagValue {
                    flag: field.name().to_string(),
                    value: text.clone(),
                })?;
                OptionValue::Bool(value)
            }
            OptionKind::String => OptionValue::Str(field.default_spec().resolve()),
            // left unbound so the caller can tell that no command was named
            OptionKind::Subcommand => continue,
        };
        bound.set(field.name(), value, ValueSource::Default);
    }
    Ok(())
}

fn check_required(schema: &OptionSchema, bound: &BoundOptions) -> Result<(), Fault> {
    for field in schema.fields().iter().filter(|f| f.is_required()) {
        if let Ok(None) = bound.optional_string(field.name()) {
            let display = if field.is_positional() {
                format!("<{}>", field.display_metavar())
            } else {
                format!("--{}", field.name())
            };
            return Err(Fault::MissingArgument(display));
        }
    }
    Ok(())
}
