pub mod service;
pub mod status;
pub mod task;

pub use service::{ServiceDescriptor, UpdateState, UpdateStatus};
pub use status::StatusAggregate;
pub use task::{TaskRecord, TaskState};
