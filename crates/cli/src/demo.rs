//! Simulated work items: sleep for a fixed time, optionally fail at the end.

use std::time::Duration;

use anyhow::{bail, Result};
use tally_core::TaskId;
use tally_runner::{TaskScheduler, WorkItem};

/// A task that sleeps for `d` and then succeeds or fails.
pub fn mock_task(d: Duration, fail: bool) -> WorkItem {
    WorkItem::fallible(move || simulate(d, fail))
}

/// Positional batch for `tally run`. Failure indices must name an existing task.
pub fn batch(durations_ms: &[u64], fail_indices: &[u64]) -> Result<Vec<WorkItem>> {
    let count = durations_ms.len() as u64;
    if let Some(bad) = fail_indices.iter().find(|&&i| i >= count) {
        bail!("--fail {bad} is out of range: tasks are indexed 0..{count}");
    }
    Ok(durations_ms
        .iter()
        .enumerate()
        .map(|(i, ms)| mock_task(Duration::from_millis(*ms), fail_indices.contains(&(i as u64))))
        .collect())
}

/// Register one announcing task per duration, IDs starting at 1.
pub fn register(
    scheduler: &mut TaskScheduler,
    durations_ms: &[u64],
    fail_ids: &[TaskId],
) -> Result<()> {
    let count = durations_ms.len() as TaskId;
    if let Some(bad) = fail_ids.iter().find(|&&id| id == 0 || id > count) {
        bail!("--fail {bad} is out of range: task IDs are 1..={count}");
    }
    for (id, ms) in (1..).zip(durations_ms.iter().copied()) {
        let fail = fail_ids.contains(&id);
        scheduler.add_fallible_task(id, move || {
            eprintln!("executing task {id}");
            simulate(Duration::from_millis(ms), fail)
        })?;
    }
    Ok(())
}

fn simulate(d: Duration, fail: bool) -> Result<()> {
    std::thread::sleep(d);
    if fail {
        bail!("simulated failure after {d:?}");
    }
    Ok(())
}
