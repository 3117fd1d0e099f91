//! Client settings shared by every descriptor a program builds.
//!
//! Settings come from JSON or from the environment and are applied to a
//! descriptor explicitly; nothing here is global state.

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::request::{Proxy, RequestDescriptor, DEFAULT_USER_AGENT};
use crate::url::split_url;

/// Environment variable overriding the user agent.
pub const USER_AGENT_VAR: &str = "HTTP_TINY_USER_AGENT";

/// Environment variables naming the proxy, checked in order.
pub const PROXY_VARS: [&str; 2] = ["http_proxy", "HTTP_PROXY"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub user_agent: String,
    pub proxy: Option<Proxy>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
        }
    }
}

impl ClientConfig {
    /// Parse settings such as `{"user_agent": "x/1", "proxy": {"host": "p", "port": 3128}}`.
    /// Missing fields take their defaults. A proxy needs a host and a non-zero
    /// port.
    pub fn from_json(json: &str) -> Result<Self, ClientError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ClientError::Config(e.to_string()))?;
        if let Some(proxy) = config.proxy.as_ref().filter(|proxy| !proxy.is_active()) {
            return Err(ClientError::Config(format!(
                "proxy {}:{} needs a host and a non-zero port",
                proxy.host, proxy.port
            )));
        }
        Ok(config)
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    /// An empty proxy variable means no proxy.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(user_agent) = lookup(USER_AGENT_VAR).filter(|v| !v.is_empty()) {
            config.user_agent = user_agent;
        }

        let proxy_url = PROXY_VARS
            .iter()
            .find_map(|name| lookup(name))
            .filter(|v| !v.is_empty());
        if let Some(url) = proxy_url {
            let parts = split_url(&url)
                .map_err(|e| ClientError::Config(format!("proxy url {url:?}: {e}")))?;
            config.proxy = Some(Proxy::new(parts.host, parts.port));
        }

        Ok(config)
    }

    /// Parse `url` into a descriptor carrying these settings.
    pub fn descriptor(&self, url: &str) -> Result<RequestDescriptor, ClientError> {
        let mut req = RequestDescriptor {
            user_agent: self.user_agent.clone(),
            proxy: self.proxy.clone(),
            ..RequestDescriptor::default()
        };
        req.set_url(url)?;
        Ok(req)
    }
}
