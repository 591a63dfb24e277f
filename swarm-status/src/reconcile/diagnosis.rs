//! Diagnosis policy for deployment queries.

use super::replicas::ReplicaCount;
use crate::model::UpdateStatus;
use thiserror::Error;

/// A known failure pattern found while reconciling a service.
///
/// Findings are successful query outcomes. Their text is what callers see in
/// the aggregate's `error` field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    #[error("The {name} service was not found in the cluster.")]
    ServiceNotFound { name: String },

    #[error("The {image} image was not deployed or not found in the current tasks running.")]
    ImageNotDeployed { image: String },

    #[error(
        "Looks like something went wrong during the deployment, because the {name} service failed {failed} time(s) since last deployment"
    )]
    RolloutFailures { name: String, failed: usize },

    #[error(
        "Something went wrong during the deployment of the {name} service. The error message is: {message}"
    )]
    UpdateFailed { name: String, message: String },
}

/// Applies the rollout rules once the image is known to be deployed.
///
/// Replica counts are checked first, then the update status. The update
/// status wins when both match. Without a desired count (global services)
/// the replica rule does not apply.
pub fn diagnose(
    name: &str,
    desired_replicas: Option<u64>,
    count: ReplicaCount,
    update_status: Option<&UpdateStatus>,
) -> Option<Finding> {
    let mut finding = None;

    if let Some(desired) = desired_replicas {
        if count.failed > count.running && (count.running as u64) < desired {
            finding = Some(Finding::RolloutFailures {
                name: name.to_string(),
                failed: count.failed,
            });
        }
    }

    if let Some(status) = update_status {
        if status.state().is_failed_rollout() {
            finding = Some(Finding::UpdateFailed {
                name: name.to_string(),
                message: status.message().to_string(),
            });
        }
    }

    finding
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UpdateState;

    fn count(running: usize, failed: usize) -> ReplicaCount {
        ReplicaCount { running, failed }
    }

    #[test]
    fn test_healthy_rollout_has_no_finding() {
        assert_eq!(diagnose("web", Some(1), count(1, 0), None), None);
    }

    #[test]
    fn test_failures_outnumbering_running_replicas() {
        let finding = diagnose("web", Some(2), count(0, 3), None);
        assert_eq!(
            finding,
            Some(Finding::RolloutFailures {
                name: "web".to_string(),
                failed: 3
            })
        );
        assert_eq!(
            finding.unwrap().to_string(),
            "Looks like something went wrong during the deployment, because the web service failed 3 time(s) since last deployment"
        );
    }

    #[test]
    fn test_equal_failed_and_running_is_not_a_finding() {
        assert_eq!(diagnose("web", Some(2), count(1, 1), None), None);
    }

    #[test]
    fn test_failures_ignored_once_desired_count_is_reached() {
        assert_eq!(diagnose("web", Some(2), count(2, 5), None), None);
    }

    #[test]
    fn test_global_service_skips_replica_rule() {
        assert_eq!(diagnose("web", None, count(0, 4), None), None);
    }

    #[test]
    fn test_paused_update_overrides_replica_finding() {
        let status = UpdateStatus::new(UpdateState::Paused, "update paused due to failure");
        let finding = diagnose("web", Some(2), count(0, 3), Some(&status));
        assert_eq!(
            finding.unwrap().to_string(),
            "Something went wrong during the deployment of the web service. The error message is: update paused due to failure"
        );
    }

    #[test]
    fn test_completed_update_is_not_a_finding() {
        let status = UpdateStatus::new(UpdateState::Completed, "update completed");
        assert_eq!(diagnose("web", Some(1), count(1, 0), Some(&status)), None);
    }

    #[test]
    fn test_rollback_states_are_findings() {
        for state in [UpdateState::RollbackPaused, UpdateState::RollbackCompleted] {
            let status = UpdateStatus::new(state, "rollback");
            assert!(matches!(
                diagnose("web", Some(1), count(1, 0), Some(&status)),
                Some(Finding::UpdateFailed { .. })
            ));
        }
    }

    #[test]
    fn test_lookup_finding_messages() {
        let not_found = Finding::ServiceNotFound {
            name: "my-service".to_string(),
        };
        assert_eq!(
            not_found.to_string(),
            "The my-service service was not found in the cluster."
        );

        let not_deployed = Finding::ImageNotDeployed {
            image: "app:1.0.1".to_string(),
        };
        assert_eq!(
            not_deployed.to_string(),
            "The app:1.0.1 image was not deployed or not found in the current tasks running."
        );
    }
}
