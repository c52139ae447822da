//! Client configuration.
//!
//! Everything the client needs is gathered into a [`ClientConfig`] before the
//! client is built. Proxy settings come from the usual `HTTP_PROXY`,
//! `HTTPS_PROXY` and `NO_PROXY` variables (upper case wins over lower case) and
//! are read once at start-up.

use serde::{Serialize, Serializer};
use std::env;
use std::fmt;
use url::Url;

const MASK: &str = "******";

/// Proxy settings taken from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProxyConfig {
    pub http_proxy: Option<String>,
    pub https_proxy: Option<String>,
    pub no_proxy: Vec<String>,
}

fn read_var(upper: &str) -> Option<String> {
    [upper.to_string(), upper.to_lowercase()]
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
        .map(|value| value.trim().to_string())
}

impl ProxyConfig {
    pub fn from_env() -> Self {
        let no_proxy = read_var("NO_PROXY")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|entry| !entry.is_empty())
                    .map(str::to_lowercase)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            http_proxy: read_var("HTTP_PROXY"),
            https_proxy: read_var("HTTPS_PROXY"),
            no_proxy,
        }
    }

    /// The proxy to use for `url`, or `None` for a direct connection.
    pub fn proxy_for(&self, url: &str) -> Option<&str> {
        let url = Url::parse(url).ok()?;
        let host = url.host_str()?.to_lowercase();

        if self.bypasses(&host, url.port_or_known_default()) {
            return None;
        }
        match url.scheme() {
            "https" => self.https_proxy.as_deref(),
            "http" => self.http_proxy.as_deref(),
            _ => None,
        }
    }

    fn bypasses(&self, host: &str, port: Option<u16>) -> bool {
        if host == "localhost" || host == "127.0.0.1" || host == "[::1]" {
            return true;
        }
        self.no_proxy.iter().any(|entry| {
            if entry == "*" {
                return true;
            }
            let (pattern, entry_port) = match entry.rsplit_once(':') {
                Some((pattern, p)) => match p.parse::<u16>() {
                    Ok(p) => (pattern, Some(p)),
                    Err(_) => (entry.as_str(), None),
                },
                None => (entry.as_str(), None),
            };
            if entry_port.is_some() && entry_port != port {
                return false;
            }
            let pattern = pattern.trim_start_matches('*');
            match pattern.strip_prefix('.') {
                Some(suffix) => host == suffix || host.ends_with(&format!(".{}", suffix)),
                None => host == pattern || host.ends_with(&format!(".{}", pattern)),
            }
        })
    }
}

fn mask<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_empty() {
        serializer.serialize_str("")
    } else {
        serializer.serialize_str(MASK)
    }
}

/// Settings for one client.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ClientConfig {
    auth_url: String,
    username: String,
    #[serde(serialize_with = "mask")]
    password: String,
    project: String,
    project_domain: String,
    endpoint_type: String,
    domain_name: String,
    debug: bool,
    proxy: ProxyConfig,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("auth_url", &self.auth_url)
            .field("username", &self.username)
            .field("password", &MASK)
            .field("project", &self.project)
            .field("project_domain", &self.project_domain)
            .field("endpoint_type", &self.endpoint_type)
            .field("domain_name", &self.domain_name)
            .field("debug", &self.debug)
            .field("proxy", &self.proxy)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(
        auth_url: &str,
        username: &str,
        password: &str,
        project: &str,
        project_domain: &str,
    ) -> Self {
        Self {
            auth_url: auth_url.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            project: project.to_string(),
            project_domain: project_domain.to_string(),
            endpoint_type: "internal".to_string(),
            domain_name: "Default".to_string(),
            debug: false,
            proxy: ProxyConfig::default(),
        }
    }

    pub fn endpoint_type(mut self, endpoint_type: &str) -> Self {
        self.endpoint_type = endpoint_type.to_string();
        self
    }

    pub fn domain_name(mut self, domain_name: &str) -> Self {
        self.domain_name = domain_name.to_string();
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn project_domain(&self) -> &str {
        &self.project_domain
    }

    pub fn get_endpoint_type(&self) -> &str {
        &self.endpoint_type
    }

    pub fn get_domain_name(&self) -> &str {
        &self.domain_name
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn proxy_config(&self) -> &ProxyConfig {
        &self.proxy
    }

    /// The proxy the client would use to reach the identity service.
    pub fn auth_proxy(&self) -> Option<&str> {
        self.proxy.proxy_for(&self.auth_url)
    }
}
