//! Command-line options shared by every binary that talks to the control plane.

use crate::config::{GatewayConfig, DEFAULT_API_VERSION, DEFAULT_DOCKER_HOST, DEFAULT_TIMEOUT_SECS};
use clap::Args;

/// Flatten into a binary's `Parser` with `#[command(flatten)]`.
#[derive(Args, Debug, Clone)]
pub struct GatewayArgs {
    /// Docker Engine endpoint (unix:// socket, tcp:// or http:// address)
    #[arg(long, env = "DOCKER_HOST", default_value = DEFAULT_DOCKER_HOST)]
    docker_host: String,

    /// Docker Engine API version
    #[arg(long, env = "DOCKER_API_VERSION", default_value = DEFAULT_API_VERSION)]
    docker_api_version: String,

    /// Request timeout towards the Docker Engine, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    docker_timeout: u64,
}

impl GatewayArgs {
    pub fn to_config(&self) -> GatewayConfig {
        GatewayConfig::new(&self.docker_host, &self.docker_api_version)
            .with_timeout_secs(self.docker_timeout)
    }
}
