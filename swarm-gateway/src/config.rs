//! Connection parameters for the Docker Engine control plane.

use crate::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DOCKER_HOST: &str = "unix:///var/run/docker.sock";
pub const DEFAULT_API_VERSION: &str = "v1.33";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Where and how to reach the control plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// `unix:///path/to/socket`, `tcp://host:port` or `http://host:port`.
    host: String,
    /// Engine API version, with or without the leading `v`.
    api_version: String,
    timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DOCKER_HOST.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// A parsed host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Path of a local socket.
    Unix(String),
    /// `host:port` reached over plain HTTP.
    Http(String),
}

/// A parsed API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiVersion {
    pub major: usize,
    pub minor: usize,
}

impl GatewayConfig {
    pub fn new(host: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_version: api_version.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn endpoint(&self) -> Result<Endpoint> {
        let host = self.host.trim();
        if let Some(path) = host.strip_prefix("unix://") {
            if path.is_empty() {
                return Err(GatewayError::InvalidConfig(format!(
                    "Empty socket path in host '{}'",
                    self.host
                )));
            }
            return Ok(Endpoint::Unix(path.to_string()));
        }

        let address = host
            .strip_prefix("tcp://")
            .or_else(|| host.strip_prefix("http://"))
            .ok_or_else(|| {
                GatewayError::InvalidConfig(format!(
                    "Unsupported host '{}', expected unix://, tcp:// or http://",
                    self.host
                ))
            })?;

        let address = address.trim_end_matches('/');
        if address.is_empty() {
            return Err(GatewayError::InvalidConfig(format!(
                "Empty address in host '{}'",
                self.host
            )));
        }
        Ok(Endpoint::Http(address.to_string()))
    }

    pub fn parsed_api_version(&self) -> Result<ApiVersion> {
        let invalid = || {
            GatewayError::InvalidConfig(format!(
                "Invalid API version '{}', expected something like v1.33",
                self.api_version
            ))
        };

        let version = self.api_version.trim();
        let version = version.strip_prefix('v').unwrap_or(version);
        let (major, minor) = version.split_once('.').ok_or_else(invalid)?;

        Ok(ApiVersion {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(
            config.endpoint().unwrap(),
            Endpoint::Unix("/var/run/docker.sock".to_string())
        );
        assert_eq!(
            config.parsed_api_version().unwrap(),
            ApiVersion {
                major: 1,
                minor: 33
            }
        );
        assert_eq!(config.timeout_secs(), 120);
    }

    #[test]
    fn test_tcp_and_http_hosts() {
        let config = GatewayConfig::new("tcp://10.0.0.5:2375", "1.41");
        assert_eq!(
            config.endpoint().unwrap(),
            Endpoint::Http("10.0.0.5:2375".to_string())
        );
        assert_eq!(
            config.parsed_api_version().unwrap(),
            ApiVersion {
                major: 1,
                minor: 41
            }
        );

        let config = GatewayConfig::new("http://docker.internal:2375/", "v1.41");
        assert_eq!(
            config.endpoint().unwrap(),
            Endpoint::Http("docker.internal:2375".to_string())
        );
    }

    #[test]
    fn test_invalid_hosts() {
        for host in ["npipe:////./pipe/docker_engine", "unix://", "tcp://", "localhost"] {
            let config = GatewayConfig::new(host, DEFAULT_API_VERSION);
            assert!(
                matches!(config.endpoint(), Err(GatewayError::InvalidConfig(_))),
                "host {} should be rejected",
                host
            );
        }
    }

    #[test]
    fn test_invalid_api_versions() {
        for version in ["", "v1", "latest", "v1.x", "1.33.0"] {
            let config = GatewayConfig::new(DEFAULT_DOCKER_HOST, version);
            assert!(
                config.parsed_api_version().is_err(),
                "version {} should be rejected",
                version
            );
        }
    }
}
