//! Status reconciliation.
//!
//! Turns a service descriptor and its task list into a [`StatusAggregate`].
//! Everything here is pure: no I/O and no state kept between calls.
//!
//! - `image`: digest normalization and the deployment-match test.
//! - `replicas`: task classification and replica counting.
//! - `diagnosis`: the ordered failure rules for deployment queries.

pub mod diagnosis;
pub mod image;
pub mod replicas;

pub use diagnosis::{Finding, diagnose};
pub use image::{is_image_deployed, normalize_image};
pub use replicas::{ImageScope, ReplicaCount, TaskBucket, classify, count_replicas};

use crate::model::{ServiceDescriptor, StatusAggregate, TaskRecord};

/// Aggregate for a service the control plane does not know.
pub fn service_not_found(name: &str) -> StatusAggregate {
    let mut status = StatusAggregate::new(name);
    status.error = Some(
        Finding::ServiceNotFound {
            name: name.to_string(),
        }
        .to_string(),
    );
    status
}

/// Reconciles a service against the tasks of a specific image rollout.
///
/// Returns early with only the identity and the finding when the service is
/// missing or no task runs `image`. Otherwise counts the replicas of `image`
/// and runs the rollout rules.
pub fn reconcile_deployment(
    service: &ServiceDescriptor,
    tasks: Vec<TaskRecord>,
    image: &str,
) -> StatusAggregate {
    if !service.exists() {
        return service_not_found(service.name());
    }

    let mut status = StatusAggregate::new(service.name());
    status.id = service.id().to_string();

    if !is_image_deployed(&tasks, image) {
        status.error = Some(
            Finding::ImageNotDeployed {
                image: image.to_string(),
            }
            .to_string(),
        );
        return status;
    }

    let count = count_replicas(&tasks, ImageScope::from_image(Some(image)));
    status.error = diagnose(
        service.name(),
        service.desired_replicas(),
        count,
        service.update_status(),
    )
    .map(|finding| finding.to_string());

    fill(status, service, tasks, count)
}

/// Reconciles a service without regard to image.
///
/// `tasks` are expected to be pre-filtered to desired state `running`. Only
/// the not-found rule applies.
pub fn reconcile_service(service: &ServiceDescriptor, tasks: Vec<TaskRecord>) -> StatusAggregate {
    if !service.exists() {
        return service_not_found(service.name());
    }

    let mut status = StatusAggregate::new(service.name());
    status.id = service.id().to_string();

    let count = count_replicas(&tasks, ImageScope::Any);
    fill(status, service, tasks, count)
}

fn fill(
    mut status: StatusAggregate,
    service: &ServiceDescriptor,
    tasks: Vec<TaskRecord>,
    count: ReplicaCount,
) -> StatusAggregate {
    status.desired_replicas = service.desired_replicas();
    status.update_status = service.update_status().cloned();
    status.running_replicas = count.running;
    status.failed_replicas = count.failed;
    status.task_history = tasks;
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TaskState, UpdateState, UpdateStatus};

    const IMAGE: &str = "app:1.0.0";
    const DIGEST_IMAGE: &str = "app:1.0.0@sha256:abc";

    fn service(replicas: u64) -> ServiceDescriptor {
        ServiceDescriptor::new("tt3otdsnkd1kgh80u45bwmcb4", "app").with_desired_replicas(replicas)
    }

    fn running(id: &str, image: &str) -> TaskRecord {
        TaskRecord::new(id, TaskState::Running, TaskState::Running, image)
    }

    fn failed(id: &str, image: &str) -> TaskRecord {
        TaskRecord::new(id, TaskState::Shutdown, TaskState::Failed, image)
    }

    #[test]
    fn test_single_healthy_replica() {
        let status = reconcile_deployment(&service(1), vec![running("t1", DIGEST_IMAGE)], IMAGE);

        assert_eq!(status.id, "tt3otdsnkd1kgh80u45bwmcb4");
        assert_eq!(status.name, "app");
        assert_eq!(status.desired_replicas, Some(1));
        assert_eq!(status.running_replicas, 1);
        assert_eq!(status.failed_replicas, 0);
        assert_eq!(status.error, None);
        assert_eq!(status.task_history.len(), 1);
        assert!(status.update_status.is_none());
    }

    #[test]
    fn test_scaled_up_with_one_failure_is_not_a_finding() {
        let tasks = vec![running("t1", DIGEST_IMAGE), failed("t2", DIGEST_IMAGE)];
        let status = reconcile_deployment(&service(2), tasks, IMAGE);

        assert_eq!(status.running_replicas, 1);
        assert_eq!(status.failed_replicas, 1);
        assert!((status.running_replicas as u64) < status.desired_replicas.unwrap());
        assert_eq!(status.error, None);
    }

    #[test]
    fn test_repeated_failures_are_reported() {
        let tasks = vec![
            failed("t1", DIGEST_IMAGE),
            failed("t2", DIGEST_IMAGE),
            running("t3", DIGEST_IMAGE),
        ];
        let status = reconcile_deployment(&service(2), tasks, IMAGE);

        assert_eq!(
            status.error.as_deref(),
            Some(
                "Looks like something went wrong during the deployment, because the app service failed 2 time(s) since last deployment"
            )
        );
    }

    #[test]
    fn test_paused_update_overrides_clean_counts() {
        let service = service(1)
            .with_update_status(UpdateStatus::new(UpdateState::Paused, "update completed"));
        let status = reconcile_deployment(&service, vec![running("t1", DIGEST_IMAGE)], IMAGE);

        assert_eq!(status.running_replicas, 1);
        assert_eq!(
            status.error.as_deref(),
            Some(
                "Something went wrong during the deployment of the app service. The error message is: update completed"
            )
        );
        assert_eq!(
            status.update_status.map(|update| update.state()),
            Some(UpdateState::Paused)
        );
    }

    #[test]
    fn test_image_not_deployed() {
        let status =
            reconcile_deployment(&service(1), vec![running("t1", DIGEST_IMAGE)], "app:1.0.1");

        assert_eq!(
            status.error.as_deref(),
            Some("The app:1.0.1 image was not deployed or not found in the current tasks running.")
        );
        assert_eq!(status.id, "tt3otdsnkd1kgh80u45bwmcb4");
        assert_eq!(status.running_replicas, 0);
        assert_eq!(status.failed_replicas, 0);
        assert_eq!(status.desired_replicas, None);
        assert!(status.task_history.is_empty());
    }

    #[test]
    fn test_service_not_found() {
        let missing = ServiceDescriptor::not_found("my-service");

        for status in [
            reconcile_deployment(&missing, vec![running("t1", DIGEST_IMAGE)], IMAGE),
            reconcile_service(&missing, vec![running("t1", DIGEST_IMAGE)]),
        ] {
            assert_eq!(
                status.error.as_deref(),
                Some("The my-service service was not found in the cluster.")
            );
            assert_eq!(status.name, "my-service");
            assert!(status.id.is_empty());
            assert!(status.task_history.is_empty());
            assert_eq!(status.running_replicas, 0);
        }
    }

    #[test]
    fn test_service_status_is_image_agnostic_and_skips_rollout_rules() {
        let service = service(3).with_update_status(UpdateStatus::new(
            UpdateState::RollbackCompleted,
            "rollback completed",
        ));
        let tasks = vec![
            running("t1", "app:1.0.0@sha256:abc"),
            running("t2", "app:0.9.0@sha256:old"),
            failed("t3", "app:1.0.0@sha256:abc"),
            failed("t4", "app:1.0.0@sha256:abc"),
        ];
        let status = reconcile_service(&service, tasks);

        assert_eq!(status.running_replicas, 2);
        assert_eq!(status.failed_replicas, 2);
        assert_eq!(status.error, None);
        assert_eq!(status.task_history.len(), 4);
        assert_eq!(status.desired_replicas, Some(3));
        assert!(status.update_status.is_some());
    }

    #[test]
    fn test_task_history_keeps_listing_order() {
        let tasks = vec![
            running("b", DIGEST_IMAGE),
            running("a", DIGEST_IMAGE),
            running("c", DIGEST_IMAGE),
        ];
        let status = reconcile_deployment(&service(3), tasks, IMAGE);

        let ids: Vec<&str> = status.task_history.iter().map(|t| t.task_id()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }
}
