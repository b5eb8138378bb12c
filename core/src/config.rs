//! Where requests are sent.

use std::env;

use crate::error::ApiError;
use crate::http::Protocol;

pub const DEFAULT_HOST: &str = "pinterest.com";

/// Target host and default scheme for every request a client issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub protocol: Protocol,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            protocol: Protocol::Http,
        }
    }
}

impl ClientConfig {
    pub fn new(host: &str, protocol: Protocol) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            protocol,
        }
    }

    /// Reads `PINTEREST_HOST` and `PINTEREST_PROTOCOL`, falling back to the
    /// defaults for whichever is unset.
    pub fn from_env() -> Result<Self, ApiError> {
        let mut config = Self::default();
        if let Ok(host) = env::var("PINTEREST_HOST") {
            config.host = host.trim_end_matches('/').to_string();
        }
        if let Ok(protocol) = env::var("PINTEREST_PROTOCOL") {
            config.protocol = protocol.parse()?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_targets_plain_http_site() {
        let config = ClientConfig::default();
        assert_eq!(config.host, "pinterest.com");
        assert_eq!(config.protocol, Protocol::Http);
    }

    #[test]
    fn trailing_slash_is_stripped_from_host() {
        let config = ClientConfig::new("127.0.0.1:3000/", Protocol::Http);
        assert_eq!(config.host, "127.0.0.1:3000");
    }
}
