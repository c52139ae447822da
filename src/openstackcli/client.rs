//! The client handed to commands.
//!
//! Commands receive an [`OpenStackRegion`]: the region the user selected plus
//! a shared handle to the [`OpenStackClient`] that produced it. The client is
//! built by [`OpenStackBootstrap`] from the bound top-level options.

use crate::config::{ClientConfig, ProxyConfig};
use crate::options::BaseOptions;
use anyhow::{anyhow, bail, Context};
use cmdtable::{BoundOptions, ClientBootstrap, CommandOptions};
use serde::Serialize;
use std::sync::Arc;
use url::Url;

/// One entry of the service catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub id: String,
    pub endpoint_type: String,
}

impl Region {
    pub fn new(id: &str, endpoint_type: &str) -> Self {
        Self {
            id: id.to_string(),
            endpoint_type: endpoint_type.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct OpenStackClient {
    config: ClientConfig,
    catalog: Vec<Region>,
}

impl OpenStackClient {
    /// Validates the configuration and wraps it with its region catalog.
    pub fn new(config: ClientConfig, catalog: Vec<Region>) -> anyhow::Result<Arc<Self>> {
        let url = Url::parse(config.auth_url())
            .with_context(|| format!("invalid auth URL `{}`", config.auth_url()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            bail!(
                "invalid auth URL `{}`: expected an http:// or https:// URL",
                config.auth_url()
            );
        }
        Ok(Arc::new(Self { config, catalog }))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn regions(&self) -> &[Region] {
        &self.catalog
    }

    pub fn get_region(self: &Arc<Self>, id: &str) -> Option<OpenStackRegion> {
        let region = self.catalog.iter().find(|r| r.id == id)?;
        Some(OpenStackRegion {
            client: Arc::clone(self),
            region: region.clone(),
        })
    }
}

/// A selected region; what client commands receive.
#[derive(Debug, Clone)]
pub struct OpenStackRegion {
    client: Arc<OpenStackClient>,
    region: Region,
}

impl OpenStackRegion {
    pub fn id(&self) -> &str {
        &self.region.id
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn client(&self) -> &OpenStackClient {
        &self.client
    }
}

/// Builds an [`OpenStackRegion`] from the top-level options.
#[derive(Debug, Clone, Default)]
pub struct OpenStackBootstrap {
    proxy: ProxyConfig,
}

impl OpenStackBootstrap {
    pub fn new(proxy: ProxyConfig) -> Self {
        Self { proxy }
    }

    pub fn from_env() -> Self {
        Self::new(ProxyConfig::from_env())
    }

    pub fn connect(&self, options: &BaseOptions) -> anyhow::Result<OpenStackRegion> {
        let config = ClientConfig::new(
            &options.auth_url,
            &options.username,
            &options.password,
            &options.project,
            &options.project_domain,
        )
        .endpoint_type(&options.endpoint_type)
        .domain_name(&options.domain_name)
        .debug(options.debug)
        .proxy(self.proxy.clone());

        tracing::debug!(
            auth_url = config.auth_url(),
            username = config.username(),
            project = config.project(),
            region = %options.region_id,
            proxy = ?config.auth_proxy(),
            "building client"
        );

        let catalog = vec![Region::new(&options.region_id, &options.endpoint_type)];
        let client = OpenStackClient::new(config, catalog)?;
        client
            .get_region(&options.region_id)
            .ok_or_else(|| anyhow!("No such region {}", options.region_id))
    }
}

impl ClientBootstrap for OpenStackBootstrap {
    type Client = OpenStackRegion;

    fn bootstrap(&self, base: &BoundOptions) -> anyhow::Result<OpenStackRegion> {
        let options = BaseOptions::from_bound(base)?;
        self.connect(&options)
    }
}
