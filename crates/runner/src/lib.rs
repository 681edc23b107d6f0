//! Concurrent task runner with per-task timing.
//!
//! Hand a set of [`WorkItem`]s to [`run`] (or register them on a
//! [`TaskScheduler`]) and get back a [`RunReport`] with one
//! [`ExecutionResult`] per item, in submission order, once every item has
//! finished. Panicking or erroring items are recorded as failed results
//! rather than tearing down the run.

pub mod report;
pub mod runner;
pub mod scheduler;
pub mod task;
pub mod types;

pub use report::{RunReport, RunSummary};
pub use runner::{run, Runner};
pub use scheduler::{ScheduledTask, TaskScheduler};
pub use tally_core::{TaskId, TallyError};
pub use task::WorkItem;
pub use types::{ExecutionResult, FailureKind, RunnerConfig, TaskFailure, TaskStatus};
