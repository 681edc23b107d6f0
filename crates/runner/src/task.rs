use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use crate::types::{FailureKind, TaskFailure, TaskStatus};

type Body = Box<dyn FnOnce() -> anyhow::Result<()> + Send + 'static>;

/// A unit of work submitted to the runner.
///
/// Takes no input and produces no value; anything it does is a side effect.
/// Failure is signaled by panicking or, for [`WorkItem::fallible`], by
/// returning `Err`.
pub struct WorkItem {
    body: Body,
}

impl WorkItem {
    /// Wrap an infallible closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            body: Box::new(move || {
                f();
                Ok(())
            }),
        }
    }

    /// Wrap a closure that can report failure through its return value.
    pub fn fallible<F>(f: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        Self { body: Box::new(f) }
    }

    /// Run the item to completion on the current thread and time it.
    ///
    /// Panics are caught here, so the caller always gets an outcome back.
    pub(crate) fn execute(self) -> (Duration, TaskStatus) {
        let start = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(self.body));
        let elapsed = start.elapsed();

        let status = match outcome {
            Ok(Ok(())) => TaskStatus::Succeeded,
            Ok(Err(e)) => TaskStatus::Failed(TaskFailure {
                kind: FailureKind::Errored,
                message: format!("{e:#}"),
            }),
            Err(payload) => TaskStatus::Failed(TaskFailure {
                kind: FailureKind::Panicked,
                message: panic_message(payload.as_ref()),
            }),
        };
        (elapsed, status)
    }
}

impl<F> From<F> for WorkItem
where
    F: FnOnce() + Send + 'static,
{
    fn from(f: F) -> Self {
        WorkItem::new(f)
    }
}

impl fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItem").finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn infallible_item_succeeds() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let (_, status) = WorkItem::new(move || flag.store(true, Ordering::SeqCst)).execute();

        assert!(ran.load(Ordering::SeqCst));
        assert_eq!(status, TaskStatus::Succeeded);
    }

    #[test]
    fn error_return_is_recorded() {
        let (_, status) = WorkItem::fallible(|| anyhow::bail!("disk full")).execute();
        match status {
            TaskStatus::Failed(f) => {
                assert_eq!(f.kind, FailureKind::Errored);
                assert_eq!(f.message, "disk full");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn panic_is_caught_with_message() {
        let (_, status) = WorkItem::new(|| panic!("boom {}", 7)).execute();
        match status {
            TaskStatus::Failed(f) => {
                assert_eq!(f.kind, FailureKind::Panicked);
                assert_eq!(f.message, "boom 7");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn static_str_panic_payload() {
        let (_, status) = WorkItem::new(|| std::panic::panic_any("plain")).execute();
        assert_eq!(status.failure().map(|f| f.message.as_str()), Some("plain"));
    }

    #[test]
    fn closures_convert_into_items() {
        let items: Vec<WorkItem> = vec![(|| {}).into(), WorkItem::from(|| {})];
        for item in items {
            assert!(item.execute().1.is_success());
        }
    }

    #[test]
    fn elapsed_covers_the_body() {
        let (elapsed, _) =
            WorkItem::new(|| std::thread::sleep(Duration::from_millis(20))).execute();
        assert!(elapsed >= Duration::from_millis(20), "got {elapsed:?}");
    }
}
