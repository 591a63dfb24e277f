//! Access to the swarm control plane, and the status queries built on it.

pub mod args;
pub mod client;
pub mod config;
pub mod docker;
pub mod error;
pub mod gateway;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub use args::GatewayArgs;
pub use client::StatusClient;
pub use config::GatewayConfig;
pub use docker::DockerGateway;
pub use error::{GatewayError, Result};
pub use gateway::{OrchestrationGateway, TaskFilter};
