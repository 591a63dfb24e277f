//! The status aggregate handed back to callers.

use crate::model::service::UpdateStatus;
use crate::model::task::TaskRecord;
use serde::{Deserialize, Serialize};

/// Outcome of one status query.
///
/// `error` holds a diagnostic finding. Its absence only means that no known
/// failure pattern matched. Tasks in transient states are in `task_history`
/// but count toward neither replica counter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusAggregate {
    /// Orchestrator identifier of the service, empty when not found.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Service name as queried.
    pub name: String,
    /// Diagnostic finding, absent when no failure pattern matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Task summaries in orchestrator listing order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub task_history: Vec<TaskRecord>,
    /// Declared replica count, absent for global services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_replicas: Option<u64>,
    /// Tasks running as desired.
    #[serde(default)]
    pub running_replicas: usize,
    /// Tasks that failed or were rejected on shutdown.
    #[serde(default)]
    pub failed_replicas: usize,
    /// Latest rolling update of the service, passed through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_status: Option<UpdateStatus>,
}

impl StatusAggregate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn has_finding(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TaskState, UpdateState};

    #[test]
    fn test_not_found_wire_format() {
        let mut status = StatusAggregate::new("my-service");
        status.error = Some("The my-service service was not found in the cluster.".to_string());

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "my-service",
                "error": "The my-service service was not found in the cluster.",
                "runningReplicas": 0,
                "failedReplicas": 0
            })
        );
    }

    #[test]
    fn test_full_aggregate_round_trip() {
        let status = StatusAggregate {
            id: "tt3otdsnkd1kgh80u45bwmcb4".to_string(),
            name: "docker-routing-mesh".to_string(),
            error: None,
            task_history: vec![TaskRecord::new(
                "evv1jw9o7981mrp0p50j1gy5k",
                TaskState::Running,
                TaskState::Running,
                "albertogviana/docker-routing-mesh:1.0.0@sha256:87e5c74f80",
            )],
            desired_replicas: Some(1),
            running_replicas: 1,
            failed_replicas: 0,
            update_status: Some(UpdateStatus::new(UpdateState::Completed, "update completed")),
        };

        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"taskHistory\""));
        assert!(json.contains("\"desiredReplicas\":1"));
        assert!(json.contains("\"updateStatus\":{\"state\":\"completed\""));

        let decoded: StatusAggregate = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, status);
        assert!(!decoded.has_finding());
    }

    #[test]
    fn test_wire_keys_are_camel_case_only() {
        let mut status = StatusAggregate::new("web");
        status.id = "svc1".to_string();
        status.error = Some("finding".to_string());
        status.desired_replicas = Some(2);
        status.task_history = vec![TaskRecord::new("t1", TaskState::Shutdown, TaskState::Failed, "app:1")];

        let json = serde_json::to_value(&status).unwrap();
        let object = json.as_object().unwrap();
        for key in ["id", "name", "error", "taskHistory", "desiredReplicas", "runningReplicas", "failedReplicas"] {
            assert!(object.contains_key(key), "missing key {}", key);
        }
        for key in ["Err", "TaskStatus", "Replicas", "ID", "Name"] {
            assert!(!object.contains_key(key), "unexpected key {}", key);
        }
        assert_eq!(json["taskHistory"][0]["observedState"], "failed");
        assert_eq!(json["taskHistory"][0]["desiredState"], "shutdown");
        assert!(json["taskHistory"][0].get("State").is_none());
    }
}
