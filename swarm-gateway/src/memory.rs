use crate::error::{GatewayError, Result};
use crate::gateway::{OrchestrationGateway, TaskFilter};
use async_trait::async_trait;
use std::collections::HashMap;
use swarm_status::{ServiceDescriptor, TaskRecord};

/// In-memory gateway for tests and offline runs.
///
/// Holds fixed service descriptors and task lists, or fails every call when
/// built with [`MemoryGateway::failing`].
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    services: Vec<ServiceDescriptor>,
    tasks: HashMap<String, Vec<TaskRecord>>,
    failure: Option<String>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Registers a service and its tasks, in listing order.
    pub fn with_service(mut self, service: ServiceDescriptor, tasks: Vec<TaskRecord>) -> Self {
        self.tasks.insert(service.id().to_string(), tasks);
        self.services.push(service);
        self
    }

    fn check_available(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(GatewayError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl OrchestrationGateway for MemoryGateway {
    async fn lookup_service(&self, name: &str) -> Result<ServiceDescriptor> {
        self.check_available()?;
        Ok(self
            .services
            .iter()
            .find(|service| service.name() == name)
            .cloned()
            .unwrap_or_else(|| ServiceDescriptor::not_found(name)))
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<TaskRecord>> {
        self.check_available()?;
        Ok(self
            .tasks
            .get(filter.service_id())
            .map(|tasks| {
                tasks
                    .iter()
                    .filter(|task| filter.accepts(task))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
