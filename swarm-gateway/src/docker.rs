//! Docker Engine implementation of the gateway.

use crate::config::{Endpoint, GatewayConfig};
use crate::error::Result;
use crate::gateway::{OrchestrationGateway, TaskFilter};
use async_trait::async_trait;
use bollard::models::{Service, Task};
use bollard::query_parameters::{ListServicesOptionsBuilder, ListTasksOptionsBuilder};
use bollard::{ClientVersion, Docker};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::collections::HashMap;
use swarm_status::{ServiceDescriptor, TaskRecord, TaskState, UpdateState, UpdateStatus};

/// Talks to a swarm manager through the Docker Engine API.
#[derive(Debug, Clone)]
pub struct DockerGateway {
    docker: Docker,
}

impl DockerGateway {
    /// Builds a client for `config`.
    ///
    /// No request is made here; an unreachable engine shows up on the first query.
    pub fn connect(config: &GatewayConfig) -> Result<Self> {
        let version = config.parsed_api_version()?;
        let client_version = ClientVersion {
            major_version: version.major,
            minor_version: version.minor,
        };

        let docker = match config.endpoint()? {
            #[cfg(unix)]
            Endpoint::Unix(path) => {
                Docker::connect_with_unix(&path, config.timeout_secs(), &client_version)?
            }
            #[cfg(not(unix))]
            Endpoint::Unix(path) => {
                return Err(crate::error::GatewayError::InvalidConfig(format!(
                    "Unix sockets are not supported on this platform: {}",
                    path
                )))
            }
            Endpoint::Http(address) => {
                Docker::connect_with_http(&address, config.timeout_secs(), &client_version)?
            }
        };

        info!(
            "Docker gateway configured for {} (API v{}.{})",
            config.host(),
            version.major,
            version.minor
        );
        Ok(Self { docker })
    }

    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }
}

#[async_trait]
impl OrchestrationGateway for DockerGateway {
    async fn lookup_service(&self, name: &str) -> Result<ServiceDescriptor> {
        let options = ListServicesOptionsBuilder::default()
            .filters(&service_filters(name))
            .build();

        let services = self.docker.list_services(Some(options)).await?;
        debug!("Name filter '{}' matched {} service(s)", name, services.len());

        // The name filter also matches on prefixes.
        let found = services
            .into_iter()
            .find(|service| spec_name(service) == Some(name));

        Ok(match found {
            Some(service) => service_descriptor(name, service),
            None => ServiceDescriptor::not_found(name),
        })
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<TaskRecord>> {
        let options = ListTasksOptionsBuilder::default()
            .filters(&task_filters(filter))
            .build();

        let tasks = self.docker.list_tasks(Some(options)).await?;
        debug!(
            "Service {} has {} task(s) matching {:?}",
            filter.service_id(),
            tasks.len(),
            filter.desired_state()
        );

        Ok(tasks.into_iter().map(task_record).collect())
    }
}

fn service_filters(name: &str) -> HashMap<&'static str, Vec<String>> {
    HashMap::from([("name", vec![name.to_string()])])
}

fn task_filters(filter: &TaskFilter) -> HashMap<&'static str, Vec<String>> {
    let mut filters = HashMap::from([("service", vec![filter.service_id().to_string()])]);
    if let Some(state) = filter.desired_state() {
        filters.insert("desired-state", vec![state.as_str().to_string()]);
    }
    filters
}

fn spec_name(service: &Service) -> Option<&str> {
    service.spec.as_ref().and_then(|spec| spec.name.as_deref())
}

fn service_descriptor(name: &str, service: Service) -> ServiceDescriptor {
    let mut descriptor = ServiceDescriptor::new(service.id.unwrap_or_default(), name);

    let replicas = service
        .spec
        .and_then(|spec| spec.mode)
        .and_then(|mode| mode.replicated)
        .and_then(|replicated| replicated.replicas)
        .and_then(|replicas| u64::try_from(replicas).ok());
    if let Some(replicas) = replicas {
        descriptor = descriptor.with_desired_replicas(replicas);
    }

    if let Some(status) = service.update_status {
        let raw = status.state.map(|state| state.to_string()).unwrap_or_default();
        if !raw.is_empty() {
            let state = UpdateState::parse(&raw);
            if state == UpdateState::Unknown {
                warn!("Service {} has an unrecognised update state '{}'", name, raw);
            }
            descriptor = descriptor
                .with_update_status(UpdateStatus::new(state, status.message.unwrap_or_default()));
        }
    }

    descriptor
}

fn task_state(task_id: &str, raw: Option<String>) -> TaskState {
    let raw = raw.unwrap_or_default();
    let state = TaskState::parse(&raw);
    if state == TaskState::Unknown {
        warn!("Task {} has an unrecognised state '{}'", task_id, raw);
    }
    state
}

fn task_record(task: Task) -> TaskRecord {
    let task_id = task.id.unwrap_or_default();
    let image = task
        .spec
        .and_then(|spec| spec.container_spec)
        .and_then(|container| container.image)
        .unwrap_or_default();
    let desired = task_state(&task_id, task.desired_state.map(|state| state.to_string()));

    let status = task.status.unwrap_or_default();
    let observed = task_state(&task_id, status.state.map(|state| state.to_string()));

    let mut record = TaskRecord::new(task_id, desired, observed, image)
        .with_message(status.message.unwrap_or_default())
        .with_error(status.err.unwrap_or_default());

    if let Some(timestamp) = status.timestamp.as_deref().and_then(parse_timestamp) {
        record = record.with_timestamp(timestamp);
    }
    record
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}
