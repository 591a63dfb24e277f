//! # Swarm Status
//!
//! Answers "did my rollout succeed?" for a swarm service by reconciling the
//! declared state of the service against the observed state of its tasks.
//!
//! ## Modules
//! - `model`: Service, task and aggregate types, with their wire format.
//! - `reconcile`: The pure reconciliation algorithm.
//!
//! ## Wire format
//! Aggregates serialize with camelCase keys (`error`, `taskHistory`,
//! `desiredReplicas`, `runningReplicas`, `failedReplicas`, `updateStatus`) and
//! always carry both counters. Consumers of the older payload, keyed `Err`,
//! `TaskStatus`, `Replicas` and `State` with zero counters omitted, must be
//! updated.

pub mod model;
pub mod reconcile;

pub use model::{
    ServiceDescriptor, StatusAggregate, TaskRecord, TaskState, UpdateState, UpdateStatus,
};
pub use reconcile::{Finding, reconcile_deployment, reconcile_service};
