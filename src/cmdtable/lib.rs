//! # cmdtable - Declarative Subcommand Tables
//!
//! A small engine for CLIs shaped as `prog [base options] COMMAND [command
//! options]`, where many independently defined commands share one set of
//! top-level options and most of them need an authenticated client built from
//! those options.
//!
//! ## The Pieces
//!
//! ```text
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ OptionSchema  │──►│   Registry    │──►│    Program    │
//! │ fields, kinds │   │ name → entry  │   │ two-pass parse│
//! │ env defaults  │   │ (ordered)     │   │ help, usage   │
//! └───────────────┘   └───────────────┘   └───────┬───────┘
//!                                                 │ Invocation
//!                                                 ▼
//!                                         ┌───────────────┐
//!                                         │  Dispatcher   │
//!                                         │ creds → client│
//!                                         │ → callback    │
//!                                         └───────────────┘
//! ```
//!
//! - [`OptionSchema`]: the declared options of one command (or of the program
//!   itself). Defaults may point at environment variables and are resolved on
//!   every parse.
//! - [`Registry`]: commands in registration order, each tagged by whether its
//!   callback needs a client ([`Callback`]).
//! - [`Program`]: parses raw tokens into a [`Parsed`] value: either help text
//!   or an [`Invocation`]. `help [COMMAND]` is built in.
//! - [`Invocation::execute`]: checks required credentials, asks a
//!   [`ClientBootstrap`] for a client and runs the callback.
//!
//! ## Example
//!
//! ```rust
//! use cmdtable::{BoundOptions, NoOptions, OptionField, OptionSchema, Parsed, Program, Registry};
//!
//! struct Client {
//!     region: String,
//! }
//!
//! let base = OptionSchema::builder()
//!     .field(OptionField::string("region-id").default("$EXAMPLE_REGION|RegionOne"))
//!     .field(OptionField::selector("subcommand"))
//!     .build()?;
//!
//! let mut registry = Registry::new();
//! registry.register_with_client("whereami", "Print the region", |client: &Client, _: NoOptions| {
//!     println!("{}", client.region);
//!     Ok(())
//! })?;
//!
//! let program = Program::new("example", base, registry)?;
//! let bootstrap = |base: &BoundOptions| -> anyhow::Result<Client> {
//!     Ok(Client { region: base.string("region-id")?.to_string() })
//! };
//!
//! match program.parse(&["whereami"])? {
//!     Parsed::Help(text) => print!("{}", text),
//!     Parsed::Run(invocation) => invocation.execute(&bootstrap)?,
//! }
//! # Ok::<(), cmdtable::ShellError>(())
//! ```
//!
//! ## No I/O
//!
//! Nothing in this crate prints or exits. Help and usage come back as strings
//! and every failure as a [`ShellError`]; the binary decides what goes to
//! stdout, stderr and the exit code.

pub mod bound;
pub mod dispatch;
pub mod error;
pub(crate) mod parser;
pub mod program;
pub mod registry;
pub mod schema;
pub(crate) mod usage;

pub use bound::{Binding, BoundOptions, CommandOptions, NoOptions, OptionValue, ValueSource};
pub use dispatch::{ClientBootstrap, Dispatcher};
pub use error::{Result, ShellError};
pub use program::{Invocation, Parsed, Program};
pub use registry::{Callback, CommandEntry, Registry, HELP_COMMAND};
pub use schema::{DefaultSpec, OptionField, OptionKind, OptionSchema, SchemaBuilder};
