pub mod config;
pub mod error;
pub mod task;

pub use error::*;
pub use task::TaskId;
