use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};
use tally_core::config::env_parse;
use tally_core::{TaskId, TallyError};

// ── Execution results ────────────────────────────────────────

/// How a failed work item failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The item panicked; the panic was caught by the runner.
    Panicked,
    /// The item returned `Err`.
    Errored,
}

/// Details of a failed work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of one work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskStatus {
    Succeeded,
    Failed(TaskFailure),
}

impl TaskStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskStatus::Succeeded)
    }

    pub fn failure(&self) -> Option<&TaskFailure> {
        match self {
            TaskStatus::Failed(f) => Some(f),
            TaskStatus::Succeeded => None,
        }
    }
}

/// Recorded outcome of a single work item. Written once, by the worker that ran it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    pub id: TaskId,
    /// Monotonic time from the item starting to execute until it returned or failed.
    #[serde(rename = "elapsed_ms", serialize_with = "duration_ms")]
    pub elapsed: Duration,
    #[serde(flatten)]
    pub status: TaskStatus,
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Serialize a duration as fractional milliseconds.
pub(crate) fn duration_ms<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_nanos() as f64 / 1_000_000.0)
}

// ── Configuration ────────────────────────────────────────────

/// Runner configuration, typically parsed from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Worker thread cap. 0 = one worker per submitted item.
    #[serde(default)]
    pub max_workers: usize,
    /// Name prefix for worker threads (`{prefix}-{index}`).
    #[serde(default = "default_thread_name_prefix")]
    pub thread_name_prefix: String,
    /// Items slower than this are logged at warn level.
    #[serde(default)]
    pub slow_task_threshold_ms: Option<u64>,
}

fn default_thread_name_prefix() -> String {
    "tally-worker".to_string()
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_workers: 0,
            thread_name_prefix: default_thread_name_prefix(),
            slow_task_threshold_ms: None,
        }
    }
}

impl RunnerConfig {
    /// Parse config from a TOML string, then apply env overrides and validate.
    pub fn from_toml(toml_str: &str) -> Result<Self, TallyError> {
        let mut config: Self = toml::from_str(toml_str)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TallyError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Defaults with env overrides applied.
    pub fn from_env() -> Result<Self, TallyError> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `TALLY_*` env vars (call `load_dotenv()` first).
    pub fn apply_env_overrides(&mut self) -> Result<(), TallyError> {
        if let Some(n) = env_parse("TALLY_MAX_WORKERS")? {
            self.max_workers = n;
        }
        if let Some(prefix) = env_parse::<String>("TALLY_THREAD_NAME_PREFIX")? {
            self.thread_name_prefix = prefix;
        }
        if let Some(ms) = env_parse("TALLY_SLOW_TASK_THRESHOLD_MS")? {
            self.slow_task_threshold_ms = Some(ms);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), TallyError> {
        if self.thread_name_prefix.trim().is_empty() {
            return Err(TallyError::Config(
                "thread_name_prefix must not be empty".to_string(),
            ));
        }
        if self.thread_name_prefix.contains('\0') {
            return Err(TallyError::Config(
                "thread_name_prefix must not contain NUL bytes".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of worker threads to use for a run of `task_count` items.
    pub fn resolved_workers(&self, task_count: usize) -> usize {
        let wanted = task_count.max(1);
        if self.max_workers == 0 {
            wanted
        } else {
            self.max_workers.min(wanted)
        }
    }

    pub fn slow_task_threshold(&self) -> Option<Duration> {
        self.slow_task_threshold_ms.map(Duration::from_millis)
    }
}
