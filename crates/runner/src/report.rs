use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tally_core::TaskId;

use crate::types::{duration_ms, ExecutionResult, TaskFailure};

/// The complete, submission-ordered outcome of one run.
///
/// Only ever built after every work item has signaled completion, so a
/// report is never partial.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// When dispatch began (wall clock, for display only).
    pub started_at: DateTime<Utc>,
    /// Monotonic time from dispatch to join.
    #[serde(rename = "wall_clock_ms", serialize_with = "duration_ms")]
    pub wall_clock: Duration,
    pub results: Vec<ExecutionResult>,
}

impl RunReport {
    pub(crate) fn new(
        started_at: DateTime<Utc>,
        wall_clock: Duration,
        results: Vec<ExecutionResult>,
    ) -> Self {
        Self {
            started_at,
            wall_clock,
            results,
        }
    }

    /// Report for a run with nothing to do.
    pub fn empty() -> Self {
        Self::new(Utc::now(), Duration::ZERO, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExecutionResult> {
        self.results.iter()
    }

    /// Result at submission index `index`.
    pub fn get(&self, index: usize) -> Option<&ExecutionResult> {
        self.results.get(index)
    }

    /// Result for the item registered under `id`.
    pub fn find(&self, id: TaskId) -> Option<&ExecutionResult> {
        self.results.iter().find(|r| r.id == id)
    }

    /// Elapsed time per item, in submission order.
    pub fn durations(&self) -> Vec<Duration> {
        self.results.iter().map(|r| r.elapsed).collect()
    }

    /// Failed items with their failure details.
    pub fn failures(&self) -> impl Iterator<Item = (TaskId, &TaskFailure)> {
        self.results
            .iter()
            .filter_map(|r| r.status.failure().map(|f| (r.id, f)))
    }

    pub fn is_success(&self) -> bool {
        self.results.iter().all(ExecutionResult::is_success)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::from_report(self)
    }

    /// Pretty JSON with the report and its summary side by side.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&serde_json::json!({
            "report": self,
            "summary": self.summary(),
        }))
    }
}

impl<'a> IntoIterator for &'a RunReport {
    type Item = &'a ExecutionResult;
    type IntoIter = std::slice::Iter<'a, ExecutionResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            write_result_line(f, result)?;
        }
        write!(f, "{}", self.summary())
    }
}

pub(crate) fn write_result_line(
    out: &mut impl fmt::Write,
    result: &ExecutionResult,
) -> fmt::Result {
    write!(out, "task {}: {}", result.id, round_ms(result.elapsed))?;
    if let Some(failure) = result.status.failure() {
        write!(out, " [FAILED ({:?}): {}]", failure.kind, failure.message)?;
    }
    writeln!(out)
}

/// Render a duration rounded to the nearest millisecond, e.g. `800ms` or `1.002s`.
pub fn round_ms(d: Duration) -> String {
    let ms = (d.as_micros() + 500) / 1000;
    if ms >= 1000 {
        format!("{}.{:03}s", ms / 1000, ms % 1000)
    } else {
        format!("{ms}ms")
    }
}

// ── Summary ──────────────────────────────────────────────────

/// Aggregate timing over one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    #[serde(rename = "wall_clock_ms", serialize_with = "duration_ms")]
    pub wall_clock: Duration,
    /// Sum of every item's elapsed time.
    #[serde(rename = "busy_time_ms", serialize_with = "duration_ms")]
    pub busy_time: Duration,
    #[serde(rename = "longest_ms", serialize_with = "duration_ms")]
    pub longest: Duration,
    #[serde(rename = "mean_ms", serialize_with = "duration_ms")]
    pub mean: Duration,
    /// busy_time / wall_clock. Near 1.0 means the items effectively ran serially.
    pub parallelism: f64,
}

impl RunSummary {
    fn from_report(report: &RunReport) -> Self {
        let total = report.len();
        let succeeded = report.iter().filter(|r| r.is_success()).count();
        let busy_time: Duration = report.iter().map(|r| r.elapsed).sum();
        let longest = report.iter().map(|r| r.elapsed).max().unwrap_or_default();
        let mean = match u32::try_from(total) {
            Ok(0) => Duration::ZERO,
            Ok(n) => busy_time / n,
            Err(_) => Duration::from_secs_f64(busy_time.as_secs_f64() / total as f64),
        };
        let parallelism = if report.wall_clock.is_zero() {
            0.0
        } else {
            busy_time.as_secs_f64() / report.wall_clock.as_secs_f64()
        };

        Self {
            total,
            succeeded,
            failed: total - succeeded,
            wall_clock: report.wall_clock,
            busy_time,
            longest,
            mean,
            parallelism,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tasks ({} ok, {} failed) in {} wall clock, {} busy, parallelism {:.2}",
            self.total,
            self.succeeded,
            self.failed,
            round_ms(self.wall_clock),
            round_ms(self.busy_time),
            self.parallelism,
        )
    }
}
