use thiserror::Error;

use crate::task::TaskId;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Duplicate task id: {0}")]
    DuplicateTaskId(TaskId),

    #[error("Scheduler has already run; a scheduler instance is single-shot")]
    AlreadyRun,

    #[error("Config error: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    #[error("Run incomplete: {completed} of {expected} tasks signaled completion")]
    IncompleteRun { expected: usize, completed: usize },
}

pub type Result<T> = std::result::Result<T, TallyError>;
