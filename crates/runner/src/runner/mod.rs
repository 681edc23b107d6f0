//! Concurrent task runner -- dispatches work items onto a worker pool and joins.
//!
//! Split into focused submodules:
//! - `core`: Runner struct, constructor, and accessors
//! - `execution`: dispatch, per-item timing, and the join barrier

mod core;
mod execution;

pub use self::core::Runner;

use tally_core::TallyError;

use crate::report::RunReport;
use crate::task::WorkItem;

/// Run `tasks` concurrently with the default config and wait for all of them.
///
/// Results are identified by submission index.
pub fn run(tasks: Vec<WorkItem>) -> Result<RunReport, TallyError> {
    Runner::default().run(tasks)
}
