//! # Commands
//!
//! The command set shipped with the binary. Each module adds its commands
//! through a `register` function; [`register`] calls them in the order they
//! should appear in `openstackcli help`.
//!
//! Commands print their own output. Formatting lives in `render` so it can be
//! tested without capturing stdout.

mod config;
mod regions;
mod render;
mod version;

use crate::client::OpenStackRegion;
use crate::options::BaseOptions;
use cmdtable::{BoundOptions, CommandOptions, OptionField, OptionSchema, Program, Registry, Result};

pub use version::{version_string, BuildInfo};

pub const PROGRAM_NAME: &str = "openstackcli";
pub const ABOUT: &str = "Command-line interface to openstack API.";
pub const EPILOG: &str = "See \"openstackcli help COMMAND\" for help on a specific command.";

/// Adds every command to `registry`.
pub fn register(registry: &mut Registry<OpenStackRegion>) -> Result<()> {
    regions::register(registry)?;
    config::register(registry)?;
    version::register(registry)
}

/// The full program: base options, every command, about and epilog text.
pub fn build_program() -> Result<Program<OpenStackRegion>> {
    let mut registry = Registry::new();
    register(&mut registry)?;
    Ok(Program::new(PROGRAM_NAME, BaseOptions::schema()?, registry)?
        .about(ABOUT)
        .epilog(EPILOG))
}

/// Options for commands whose only switch is `--json`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct JsonOptions {
    pub json: bool,
}

pub(crate) fn json_flag() -> OptionField {
    OptionField::bool("json").help("Print the result as JSON")
}

impl CommandOptions for JsonOptions {
    fn schema() -> Result<OptionSchema> {
        OptionSchema::builder().field(json_flag()).build()
    }

    fn from_bound(bound: &BoundOptions) -> Result<Self> {
        Ok(Self {
            json: bound.flag("json")?,
        })
    }
}
