use tracing::debug;

use crate::types::RunnerConfig;

/// The concurrent task runner. Each call to [`Runner::run`] launches one
/// worker per work item (subject to `max_workers`), times every item, and
/// returns only once all of them have finished.
///
/// A runner holds no per-run state, so one instance may serve overlapping
/// runs from several threads.
#[derive(Debug, Default)]
pub struct Runner {
    pub(super) config: RunnerConfig,
}

impl Runner {
    /// Create a runner with the given config.
    pub fn new(config: RunnerConfig) -> Self {
        debug!(
            max_workers = config.max_workers,
            prefix = %config.thread_name_prefix,
            "runner created"
        );
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }
}
