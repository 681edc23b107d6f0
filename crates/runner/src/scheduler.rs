//! Registration-style front end over [`Runner`].
//!
//! Tasks are added one at a time under caller-chosen IDs, run once with
//! [`TaskScheduler::run_all`], and then reported in registration order.

use std::io::{self, Write};
use std::time::Duration;

use tally_core::{TaskId, TallyError};
use tracing::{debug, info};

use crate::report::{round_ms, RunReport};
use crate::runner::Runner;
use crate::task::WorkItem;
use crate::types::{RunnerConfig, TaskStatus};

/// Long-lived record for one registered task.
#[derive(Debug)]
pub struct ScheduledTask {
    pub id: TaskId,
    work: Option<WorkItem>,
    /// Set once the scheduler has run.
    pub duration: Option<Duration>,
    /// Set once the scheduler has run.
    pub status: Option<TaskStatus>,
}

impl ScheduledTask {
    pub fn has_run(&self) -> bool {
        self.status.is_some()
    }
}

/// Collects tasks, runs them all concurrently exactly once, and keeps the results.
#[derive(Debug, Default)]
pub struct TaskScheduler {
    runner: Runner,
    tasks: Vec<ScheduledTask>,
    report: Option<RunReport>,
    /// Set once `run_all` has taken the work items, whether or not the run succeeded.
    spent: bool,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RunnerConfig) -> Self {
        Self {
            runner: Runner::new(config),
            tasks: Vec::new(),
            report: None,
            spent: false,
        }
    }

    /// Register an infallible task.
    pub fn add_task<F>(&mut self, id: TaskId, f: F) -> Result<(), TallyError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.register(id, WorkItem::new(f))
    }

    /// Register a task that may report failure through its return value.
    pub fn add_fallible_task<F>(&mut self, id: TaskId, f: F) -> Result<(), TallyError>
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        self.register(id, WorkItem::fallible(f))
    }

    fn register(&mut self, id: TaskId, work: WorkItem) -> Result<(), TallyError> {
        if self.spent {
            return Err(TallyError::AlreadyRun);
        }
        if self.tasks.iter().any(|t| t.id == id) {
            return Err(TallyError::DuplicateTaskId(id));
        }
        debug!(task = id, "registered task");
        self.tasks.push(ScheduledTask {
            id,
            work: Some(work),
            duration: None,
            status: None,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Registered tasks in registration order.
    pub fn tasks(&self) -> &[ScheduledTask] {
        &self.tasks
    }

    /// The report from `run_all`, if it has happened.
    pub fn report(&self) -> Option<&RunReport> {
        self.report.as_ref()
    }

    /// Run every registered task concurrently and wait for all of them.
    ///
    /// A scheduler runs once; a second call fails with [`TallyError::AlreadyRun`].
    /// That includes a first call that failed: its work items are consumed
    /// and the tasks stay pending.
    pub fn run_all(&mut self) -> Result<&RunReport, TallyError> {
        if self.spent {
            return Err(TallyError::AlreadyRun);
        }
        self.spent = true;

        let items: Vec<(TaskId, WorkItem)> = self
            .tasks
            .iter_mut()
            .filter_map(|t| t.work.take().map(|w| (t.id, w)))
            .collect();
        info!(tasks = items.len(), "running all registered tasks");

        let report = self.runner.run_identified(items)?;

        // Results come back in registration order, one per task.
        for (task, result) in self.tasks.iter_mut().zip(report.iter()) {
            debug_assert_eq!(task.id, result.id);
            task.duration = Some(result.elapsed);
            task.status = Some(result.status.clone());
        }

        Ok(&*self.report.insert(report))
    }

    /// Write a header and one line per registered task, in registration order.
    pub fn print_results<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Task results:")?;
        for task in &self.tasks {
            match (&task.duration, &task.status) {
                (Some(d), Some(TaskStatus::Succeeded)) => {
                    writeln!(out, "task id: {}, elapsed: {}", task.id, round_ms(*d))?
                }
                (Some(d), Some(TaskStatus::Failed(f))) => writeln!(
                    out,
                    "task id: {}, elapsed: {}, failed: {}",
                    task.id,
                    round_ms(*d),
                    f.message
                )?,
                _ => writeln!(out, "task id: {}, pending", task.id)?,
            }
        }
        if let Some(report) = &self.report {
            writeln!(out, "{}", report.summary())?;
        }
        Ok(())
    }
}
