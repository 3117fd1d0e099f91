//! The caller-owned request descriptor.
//!
//! # Design
//! A `RequestDescriptor` names one resource on one server plus the optional
//! proxy and the user agent to present. It holds no connection state, so the
//! same descriptor can be reused across calls or re-pointed with `set_url`.
//! Dropping it releases its strings.

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::url::{split_url, DEFAULT_PORT};

/// User agent sent when the caller does not configure one.
pub const DEFAULT_USER_AGENT: &str = "http-tiny/1.2";

/// An HTTP proxy. Host and port are always set together; a proxy with an
/// empty host or a zero port is inactive and requests go direct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proxy {
    pub host: String,
    pub port: u16,
}

impl Proxy {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.host.is_empty() && self.port != 0
    }
}

/// Target server, resource path and client identity for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub server: String,
    pub port: u16,
    pub proxy: Option<Proxy>,
    pub user_agent: String,
    /// Resource path without the leading slash.
    pub pathname: String,
}

impl Default for RequestDescriptor {
    fn default() -> Self {
        Self {
            server: String::new(),
            port: DEFAULT_PORT,
            proxy: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            pathname: String::new(),
        }
    }
}

impl RequestDescriptor {
    /// Describe `pathname` on `server` at the default port.
    pub fn new(server: impl Into<String>, pathname: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            pathname: pathname.into(),
            ..Self::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_proxy(mut self, proxy: Proxy) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Re-point this descriptor at `url`.
    ///
    /// `server` and `pathname` are cleared and `port` reset before parsing, so
    /// after a failure they hold no stale values. Proxy and user agent are
    /// kept.
    pub fn set_url(&mut self, url: &str) -> Result<(), ClientError> {
        self.server.clear();
        self.pathname.clear();
        self.port = DEFAULT_PORT;

        let parts = split_url(url)?;
        self.server.push_str(parts.host);
        self.port = parts.port;
        self.pathname.push_str(parts.path);
        Ok(())
    }

    /// Absolute URL of the resource, always with an explicit port.
    pub fn url(&self) -> String {
        format!("http://{}:{}/{}", self.server, self.port, self.pathname)
    }

    /// The proxy requests are routed through, if one is set and active.
    pub fn active_proxy(&self) -> Option<&Proxy> {
        self.proxy.as_ref().filter(|proxy| proxy.is_active())
    }

    /// Host and port the TCP connection goes to: the active proxy if any.
    pub(crate) fn target(&self) -> (&str, u16) {
        match self.active_proxy() {
            Some(proxy) => (proxy.host.as_str(), proxy.port),
            None => (self.server.as_str(), self.port),
        }
    }
}

/// Build a descriptor with default settings from an absolute `http://` URL.
pub fn parse_url(url: &str) -> Result<RequestDescriptor, ClientError> {
    let mut req = RequestDescriptor::default();
    req.set_url(url)?;
    Ok(req)
}
