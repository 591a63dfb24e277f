//! Task models.
//!
//! A task is one scheduled instance of a service's container. Tasks carry two
//! states: the one the orchestrator wants (`desired_state`) and the one the
//! node last reported (`observed_state`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a task, spelled the way the control plane spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Task has been created.
    New,
    /// Task has been allocated resources by the orchestrator.
    Allocated,
    /// Task is waiting for a node to be assigned.
    Pending,
    /// Task has been assigned to a node.
    Assigned,
    /// Task has been accepted by the node.
    Accepted,
    /// Node is preparing the task, e.g. pulling the image.
    Preparing,
    /// Task is prepared and ready to start.
    Ready,
    /// Container is starting.
    Starting,
    /// Container is running.
    Running,
    /// Container exited successfully.
    Complete,
    /// Task was asked to stop, or is meant to stay stopped.
    Shutdown,
    /// Container exited with an error.
    Failed,
    /// Node refused the task.
    Rejected,
    /// Task is marked for removal.
    Remove,
    /// Node holding the task has been unreachable for too long.
    Orphaned,
    /// A state this crate does not know about. Never counted as running or failed.
    #[serde(other)]
    Unknown,
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::New => "new",
            TaskState::Allocated => "allocated",
            TaskState::Pending => "pending",
            TaskState::Assigned => "assigned",
            TaskState::Accepted => "accepted",
            TaskState::Preparing => "preparing",
            TaskState::Ready => "ready",
            TaskState::Starting => "starting",
            TaskState::Running => "running",
            TaskState::Complete => "complete",
            TaskState::Shutdown => "shutdown",
            TaskState::Failed => "failed",
            TaskState::Rejected => "rejected",
            TaskState::Remove => "remove",
            TaskState::Orphaned => "orphaned",
            TaskState::Unknown => "unknown",
        }
    }

    /// Parses the control plane spelling. Anything unrecognised maps to `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value {
            "new" => TaskState::New,
            "allocated" => TaskState::Allocated,
            "pending" => TaskState::Pending,
            "assigned" => TaskState::Assigned,
            "accepted" => TaskState::Accepted,
            "preparing" => TaskState::Preparing,
            "ready" => TaskState::Ready,
            "starting" => TaskState::Starting,
            "running" => TaskState::Running,
            "complete" => TaskState::Complete,
            "shutdown" => TaskState::Shutdown,
            "failed" => TaskState::Failed,
            "rejected" => TaskState::Rejected,
            "remove" => TaskState::Remove,
            "orphaned" => TaskState::Orphaned,
            _ => TaskState::Unknown,
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a single task as listed by the control plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// Orchestrator identifier of the task.
    task_id: String,

    /// Time of the last status transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,

    /// State the orchestrator wants the task in.
    desired_state: TaskState,

    /// State the node last reported.
    observed_state: TaskState,

    /// Status message of the last transition.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    message: String,

    /// Error reported by the node, if any.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    error: String,

    /// Image reference, possibly digest qualified (`name:tag@sha256:...`).
    image: String,
}

impl TaskRecord {
    /// Creates a new TaskRecord with empty diagnostics and no timestamp.
    ///
    /// # Arguments
    ///
    /// * `task_id` - The orchestrator's task identifier.
    /// * `desired_state` - The state the orchestrator wants the task in.
    /// * `observed_state` - The state the task was last reported in.
    /// * `image` - The container image reference of the task.
    pub fn new(
        task_id: impl Into<String>,
        desired_state: TaskState,
        observed_state: TaskState,
        image: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            timestamp: None,
            desired_state,
            observed_state,
            message: String::new(),
            error: String::new(),
            image: image.into(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = error.into();
        self
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    pub fn desired_state(&self) -> TaskState {
        self.desired_state
    }

    pub fn observed_state(&self) -> TaskState {
        self.observed_state
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn image(&self) -> &str {
        &self.image
    }
}
