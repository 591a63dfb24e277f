use crate::error::Result;
use async_trait::async_trait;
use swarm_status::{ServiceDescriptor, TaskRecord, TaskState};

/// Task listing filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFilter {
    service_id: String,
    desired_state: Option<TaskState>,
}

impl TaskFilter {
    /// All tasks of a service, whatever their desired state.
    pub fn for_service(service_id: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
            desired_state: None,
        }
    }

    pub fn with_desired_state(mut self, state: TaskState) -> Self {
        self.desired_state = Some(state);
        self
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub fn desired_state(&self) -> Option<TaskState> {
        self.desired_state
    }

    /// Whether `task` passes the desired-state part of the filter.
    pub fn accepts(&self, task: &TaskRecord) -> bool {
        self.desired_state
            .map_or(true, |state| task.desired_state() == state)
    }
}

/// Read access to the orchestration control plane.
///
/// Implement this for the Docker Engine, for an in-memory fixture, or for any
/// other swarm control plane.
#[async_trait]
pub trait OrchestrationGateway: Send + Sync {
    /// Resolves a service by name.
    /// Returns a descriptor with an empty id when no service has that name.
    async fn lookup_service(&self, name: &str) -> Result<ServiceDescriptor>;

    /// Lists the tasks matching `filter`, in control plane order.
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<TaskRecord>>;
}
