use crate::error::Result;
use crate::gateway::{OrchestrationGateway, TaskFilter};
use log::debug;
use std::sync::Arc;
use swarm_status::reconcile::{self, reconcile_deployment, reconcile_service};
use swarm_status::{StatusAggregate, TaskState};

/// Answers status queries by fetching from a gateway and reconciling.
///
/// Gateway failures are returned as errors. Everything the reconciler finds
/// wrong with the service comes back inside an `Ok` aggregate.
#[derive(Clone)]
pub struct StatusClient {
    gateway: Arc<dyn OrchestrationGateway>,
}

impl StatusClient {
    pub fn new(gateway: Arc<dyn OrchestrationGateway>) -> Self {
        Self { gateway }
    }

    /// Whether `image` is deployed on `service_name`, and how the rollout went.
    pub async fn deployment_status(
        &self,
        service_name: &str,
        image: &str,
    ) -> Result<StatusAggregate> {
        let service = self.gateway.lookup_service(service_name).await?;
        if !service.exists() {
            debug!("Service {} not found", service_name);
            return Ok(reconcile::service_not_found(service_name));
        }

        let tasks = self
            .gateway
            .list_tasks(&TaskFilter::for_service(service.id()))
            .await?;

        Ok(reconcile_deployment(&service, tasks, image))
    }

    /// Replica counts of `service_name` over the tasks meant to be running.
    pub async fn service_status(&self, service_name: &str) -> Result<StatusAggregate> {
        let service = self.gateway.lookup_service(service_name).await?;
        if !service.exists() {
            debug!("Service {} not found", service_name);
            return Ok(reconcile::service_not_found(service_name));
        }

        let filter = TaskFilter::for_service(service.id()).with_desired_state(TaskState::Running);
        let tasks = self.gateway.list_tasks(&filter).await?;

        Ok(reconcile_service(&service, tasks))
    }
}
