//! Task classification and replica counting.

use super::image::normalize_image;
use crate::model::{TaskRecord, TaskState};

/// Which tasks take part in counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageScope<'a> {
    /// Every task, whatever its image. Used by the service-status query.
    Any,
    /// Only tasks whose digest-stripped image equals the given reference.
    Only(&'a str),
}

impl<'a> ImageScope<'a> {
    /// An absent or empty image means no image scoping.
    pub fn from_image(image: Option<&'a str>) -> Self {
        match image {
            Some(image) if !image.is_empty() => ImageScope::Only(image),
            _ => ImageScope::Any,
        }
    }

    pub fn matches(&self, task: &TaskRecord) -> bool {
        match self {
            ImageScope::Any => true,
            ImageScope::Only(image) => normalize_image(task.image()) == *image,
        }
    }
}

/// The counter a task contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskBucket {
    Running,
    Failed,
}

/// Places a task in at most one bucket, from its states alone.
///
/// Running needs both states at `running`. Failed is any `failed` task, or a
/// `rejected` one the orchestrator has already told to shut down.
pub fn classify(task: &TaskRecord) -> Option<TaskBucket> {
    let desired = task.desired_state();
    match task.observed_state() {
        TaskState::Running => (desired == TaskState::Running).then_some(TaskBucket::Running),
        TaskState::Failed => Some(TaskBucket::Failed),
        TaskState::Rejected => (desired == TaskState::Shutdown).then_some(TaskBucket::Failed),
        TaskState::New
        | TaskState::Allocated
        | TaskState::Pending
        | TaskState::Assigned
        | TaskState::Accepted
        | TaskState::Preparing
        | TaskState::Ready
        | TaskState::Starting
        | TaskState::Complete
        | TaskState::Shutdown
        | TaskState::Remove
        | TaskState::Orphaned
        | TaskState::Unknown => None,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplicaCount {
    pub running: usize,
    pub failed: usize,
}

/// Counts running and failed tasks within `scope`.
///
/// `running + failed` never exceeds `tasks.len()`.
pub fn count_replicas(tasks: &[TaskRecord], scope: ImageScope<'_>) -> ReplicaCount {
    tasks
        .iter()
        .filter(|task| scope.matches(task))
        .filter_map(classify)
        .fold(ReplicaCount::default(), |mut count, bucket| {
            match bucket {
                TaskBucket::Running => count.running += 1,
                TaskBucket::Failed => count.failed += 1,
            }
            count
        })
}
