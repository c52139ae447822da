//! # openstackcli Architecture
//!
//! `openstackcli` is a thin command-line front end over a generic subcommand
//! engine. The engine ([`cmdtable`]) knows nothing about clouds; this crate
//! supplies the cloud-specific pieces and wires them together.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Binary (main.rs + cli/)                                    │
//! │  - Collects argv, installs logging                          │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (shell/)                                          │
//! │  - One `register` per module, called explicitly             │
//! │  - Each command declares its options as a schema            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engine (cmdtable)                                          │
//! │  - Two-pass parsing, env-backed defaults, help              │
//! │  - Credential check → client bootstrap → callback           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Client (client.rs, config.rs)                              │
//! │  - BaseOptions → ClientConfig → OpenStackRegion             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//!
//! There is no configuration file. Every top-level option may come from the
//! command line or from its `OPENSTACK_*` environment variable; the region
//! falls back to [`options::DEFAULT_REGION`]. Proxy settings are read from
//! `HTTP_PROXY`, `HTTPS_PROXY` and `NO_PROXY`.
//!
//! ## Module Overview
//!
//! - [`options`]: the top-level option schema and its typed form
//! - [`config`]: client and proxy configuration
//! - [`client`]: the client handed to commands and the bootstrap that builds it
//! - [`shell`]: the command set and the assembled program
//! - [`logging`]: tracing subscriber setup

pub mod client;
pub mod config;
pub mod logging;
pub mod options;
pub mod shell;

pub use client::{OpenStackBootstrap, OpenStackClient, OpenStackRegion, Region};
pub use config::{ClientConfig, ProxyConfig};
pub use options::{BaseOptions, DEFAULT_REGION};
pub use shell::build_program;
