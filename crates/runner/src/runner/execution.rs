use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use chrono::Utc;
use tally_core::{TaskId, TallyError};
use tracing::{debug, info, warn};

use crate::report::RunReport;
use crate::task::WorkItem;
use crate::types::ExecutionResult;

use super::Runner;

impl Runner {
    /// Run `tasks` concurrently; result `i` belongs to `tasks[i]` and has id `i`.
    pub fn run(&self, tasks: Vec<WorkItem>) -> Result<RunReport, TallyError> {
        let items = tasks
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index as TaskId, item))
            .collect();
        self.dispatch_and_join(items)
    }

    /// Run items under caller-chosen identifiers. Results keep submission order.
    ///
    /// Identifiers must be unique; duplicates are rejected before anything runs.
    pub fn run_identified(&self, items: Vec<(TaskId, WorkItem)>) -> Result<RunReport, TallyError> {
        let mut seen = HashSet::with_capacity(items.len());
        for (id, _) in &items {
            if !seen.insert(*id) {
                return Err(TallyError::InvalidArgument(format!(
                    "task id {id} submitted more than once"
                )));
            }
        }
        self.dispatch_and_join(items)
    }

    fn dispatch_and_join(&self, items: Vec<(TaskId, WorkItem)>) -> Result<RunReport, TallyError> {
        self.config.validate()?;
        let expected = items.len();
        if expected == 0 {
            debug!("empty run, nothing to dispatch");
            return Ok(RunReport::empty());
        }

        let workers = self.config.resolved_workers(expected);
        let prefix = self.config.thread_name_prefix.clone();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(move |i| format!("{prefix}-{i}"))
            .build()
            .map_err(|e| TallyError::WorkerPool(e.to_string()))?;

        info!(tasks = expected, workers, "dispatching tasks");

        // One slot per item; each worker gets a `&mut` to its own slot only.
        let mut slots: Vec<Option<ExecutionResult>> = (0..expected).map(|_| None).collect();
        let slow_threshold = self.config.slow_task_threshold();
        // Per-run completion count, checked against `expected` after the join.
        let done = AtomicUsize::new(0);
        let completed = &done;

        let started_at = Utc::now();
        let start = Instant::now();

        // The scope is the join barrier: it returns only once every spawned job has.
        pool.scope(|scope| {
            for (slot, (id, item)) in slots.iter_mut().zip(items) {
                scope.spawn(move |_| {
                    let (elapsed, status) = item.execute();
                    match status.failure() {
                        Some(failure) => warn!(
                            task = id,
                            kind = ?failure.kind,
                            error = %failure.message,
                            "task failed after {:?}", elapsed
                        ),
                        None => debug!(task = id, "task completed in {:?}", elapsed),
                    }
                    if slow_threshold.is_some_and(|limit| elapsed > limit) {
                        warn!(task = id, "slow task took {:?}", elapsed);
                    }
                    *slot = Some(ExecutionResult {
                        id,
                        elapsed,
                        status,
                    });
                    completed.fetch_add(1, Ordering::AcqRel);
                });
            }
        });

        let wall_clock = start.elapsed();
        let finished = completed.load(Ordering::Acquire);
        if finished != expected {
            return Err(TallyError::IncompleteRun {
                expected,
                completed: finished,
            });
        }

        let results = slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(TallyError::IncompleteRun {
                expected,
                completed: finished,
            })?;

        let report = RunReport::new(started_at, wall_clock, results);
        let failed = report.failures().count();
        info!(
            tasks = expected,
            failed,
            "all tasks joined in {:?}", wall_clock
        );
        Ok(report)
    }
}
