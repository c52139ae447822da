use super::{render, JsonOptions};
use crate::client::OpenStackRegion;
use cmdtable::{Registry, Result};
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// What `build.rs` stamped into the binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub commit_date: &'static str,
    pub release: bool,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            git_hash: env!("GIT_HASH"),
            commit_date: env!("GIT_COMMIT_DATE"),
            release: env!("IS_RELEASE") == "true",
        }
    }
}

/// Tagged builds and builds outside a checkout show the bare version; anything
/// else gets `@<hash> <commit date>` appended.
impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.release || self.git_hash.is_empty() {
            write!(f, "{}", self.version)
        } else {
            write!(f, "{}@{} {}", self.version, self.git_hash, self.commit_date)
        }
    }
}

pub fn version_string() -> &'static str {
    static VERSION: OnceLock<String> = OnceLock::new();
    VERSION.get_or_init(|| BuildInfo::current().to_string())
}

pub(super) fn register(registry: &mut Registry<OpenStackRegion>) -> Result<()> {
    registry.register_options_only("version", "Show version", |opts: JsonOptions| {
        if opts.json {
            print!("{}", render::json(&BuildInfo::current())?);
        } else {
            println!("{} {}", super::PROGRAM_NAME, version_string());
        }
        Ok(())
    })
}
