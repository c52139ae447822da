//! # Dispatch
//!
//! Running a parsed [`Invocation`] goes through three steps, each at most once:
//!
//! 1. For commands that need a client, every base field declared `required`
//!    must have a non-empty value.
//! 2. The [`ClientBootstrap`] collaborator turns the base options into a
//!    client.
//! 3. The command's callback runs with the client (if any) and its options.
//!
//! Options-only commands skip the first two steps entirely.

use crate::bound::BoundOptions;
use crate::error::{Result, ShellError};
use crate::program::Invocation;
use crate::registry::{Callback, CommandEntry};

/// Builds the client handed to commands that need one.
pub trait ClientBootstrap {
    type Client;

    fn bootstrap(&self, base: &BoundOptions) -> anyhow::Result<Self::Client>;
}

impl<C, F> ClientBootstrap for F
where
    F: Fn(&BoundOptions) -> anyhow::Result<C>,
{
    type Client = C;

    fn bootstrap(&self, base: &BoundOptions) -> anyhow::Result<C> {
        self(base)
    }
}

pub struct Dispatcher;

impl Dispatcher {
    /// Calls the entry's callback with the receiver its tag asks for.
    pub fn invoke<C>(
        entry: &CommandEntry<C>,
        client: Option<&C>,
        options: &BoundOptions,
    ) -> Result<()> {
        tracing::debug!(command = entry.name(), "dispatching");
        match (entry.callback(), client) {
            (Callback::OptionsOnly(f), _) => f(options),
            (Callback::NeedsClient(f), Some(client)) => f(client, options),
            (Callback::NeedsClient(_), None) => {
                Err(ShellError::ClientRequired(entry.name().to_string()))
            }
        }
    }
}

impl<'p, C> Invocation<'p, C> {
    /// Checks credentials, bootstraps a client when needed, and runs the command.
    pub fn execute<B>(&self, bootstrap: &B) -> Result<()>
    where
        B: ClientBootstrap<Client = C> + ?Sized,
    {
        if !self.entry.needs_client() {
            return Dispatcher::invoke(self.entry, None, &self.options);
        }

        self.check_credentials()?;

        tracing::debug!(command = self.entry.name(), "bootstrapping client");
        let client = bootstrap
            .bootstrap(&self.base)
            .map_err(ShellError::ClientBootstrapFailure)?;

        Dispatcher::invoke(self.entry, Some(&client), &self.options)
    }

    fn check_credentials(&self) -> Result<()> {
        for field in self.base_schema.fields().iter().filter(|f| f.is_required()) {
            let value = self.base.optional_string(field.name())?;
            if value.is_none() {
                return Err(ShellError::MissingRequiredCredential(field.name().to_string()));
            }
        }
        Ok(())
    }
}
