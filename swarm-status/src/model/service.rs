//! Service models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of the latest rolling update of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateState {
    /// Update is being rolled out.
    Updating,
    /// Update was stopped after too many task failures.
    Paused,
    /// Update finished on every task.
    Completed,
    /// Rollback to the previous definition has begun.
    RollbackStarted,
    /// Rollback was stopped after too many task failures.
    RollbackPaused,
    /// Rollback to the previous definition finished.
    RollbackCompleted,
    /// A state this crate does not know about.
    #[serde(other)]
    Unknown,
}

impl UpdateState {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateState::Updating => "updating",
            UpdateState::Paused => "paused",
            UpdateState::Completed => "completed",
            UpdateState::RollbackStarted => "rollback_started",
            UpdateState::RollbackPaused => "rollback_paused",
            UpdateState::RollbackCompleted => "rollback_completed",
            UpdateState::Unknown => "unknown",
        }
    }

    /// Parses the control plane spelling. Anything unrecognised maps to `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value {
            "updating" => UpdateState::Updating,
            "paused" => UpdateState::Paused,
            "completed" => UpdateState::Completed,
            "rollback_started" => UpdateState::RollbackStarted,
            "rollback_paused" => UpdateState::RollbackPaused,
            "rollback_completed" => UpdateState::RollbackCompleted,
            _ => UpdateState::Unknown,
        }
    }

    /// Whether the orchestrator gave up on the rollout.
    ///
    /// A paused update means the failure threshold was hit; a rollback that
    /// paused or completed means the new service definition was abandoned.
    pub fn is_failed_rollout(&self) -> bool {
        match self {
            UpdateState::Paused | UpdateState::RollbackPaused | UpdateState::RollbackCompleted => {
                true
            }
            UpdateState::Updating
            | UpdateState::Completed
            | UpdateState::RollbackStarted
            | UpdateState::Unknown => false,
        }
    }
}

impl fmt::Display for UpdateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The orchestrator's record of the latest rolling update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatus {
    /// Where the update stands.
    state: UpdateState,
    /// Orchestrator explanation, e.g. why the update paused.
    #[serde(default)]
    message: String,
}

impl UpdateStatus {
    pub fn new(state: UpdateState, message: impl Into<String>) -> Self {
        Self {
            state,
            message: message.into(),
        }
    }

    pub fn state(&self) -> UpdateState {
        self.state
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Declared state of a service, as resolved by name.
///
/// An empty `id` means the control plane holds no service under that name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Orchestrator identifier, empty when not found.
    id: String,
    /// Name the service was looked up by.
    name: String,
    /// `None` for global services.
    desired_replicas: Option<u64>,
    /// Latest rolling update, if the service was ever updated.
    update_status: Option<UpdateStatus>,
}

impl ServiceDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            desired_replicas: None,
            update_status: None,
        }
    }

    /// Descriptor for a name the control plane does not know.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::new(String::new(), name)
    }

    pub fn with_desired_replicas(mut self, replicas: u64) -> Self {
        self.desired_replicas = Some(replicas);
        self
    }

    pub fn with_update_status(mut self, status: UpdateStatus) -> Self {
        self.update_status = Some(status);
        self
    }

    pub fn exists(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn desired_replicas(&self) -> Option<u64> {
        self.desired_replicas
    }

    pub fn update_status(&self) -> Option<&UpdateStatus> {
        self.update_status.as_ref()
    }
}
