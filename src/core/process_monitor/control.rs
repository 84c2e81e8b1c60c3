//! Process control adapter.
//!
//! Every OS failure is folded into a [`ControlOutcome`]; callers that only
//! care whether it worked use the boolean forms.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ControlError;
use crate::platform::process_control;

/// Accepted scheduling priorities (Unix nice values).
pub const PRIORITY_RANGE: RangeInclusive<i32> = -20..=19;

/// OS primitives for changing a process's priority and terminating it.
pub trait ProcessControl: Send + Sync + 'static {
    fn set_priority(&self, pid: u32, priority: i32) -> Result<(), ControlError>;

    fn terminate(&self, pid: u32) -> Result<(), ControlError>;
}

/// [`ProcessControl`] that talks to the running OS.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsProcessControl;

impl ProcessControl for OsProcessControl {
    fn set_priority(&self, pid: u32, priority: i32) -> Result<(), ControlError> {
        process_control::set_priority(pid, priority)
    }

    fn terminate(&self, pid: u32) -> Result<(), ControlError> {
        process_control::terminate(pid)
    }
}

/// Definite result of a control request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOutcome {
    Ok,
    NotFound,
    PermissionDenied,
    InvalidArgument,
    TimedOut,
    Failed,
}

impl ControlOutcome {
    pub fn is_ok(self) -> bool {
        self == ControlOutcome::Ok
    }
}

impl From<&ControlError> for ControlOutcome {
    fn from(err: &ControlError) -> Self {
        match err {
            ControlError::NotFound(_) => ControlOutcome::NotFound,
            ControlError::PermissionDenied(_) => ControlOutcome::PermissionDenied,
            ControlError::InvalidArgument(_) => ControlOutcome::InvalidArgument,
            ControlError::TimedOut(_) => ControlOutcome::TimedOut,
            ControlError::Unsupported(_) | ControlError::Os(_) | ControlError::Worker(_) => {
                ControlOutcome::Failed
            }
        }
    }
}

/// Validating, time-bounded front of a [`ProcessControl`].
#[derive(Clone)]
pub struct ControlAdapter {
    backend: Arc<dyn ProcessControl>,
    timeout: Duration,
}

impl ControlAdapter {
    pub fn new(backend: Arc<dyn ProcessControl>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub async fn set_priority(&self, pid: u32, priority: i32) -> bool {
        self.set_priority_outcome(pid, priority).await.is_ok()
    }

    pub async fn terminate(&self, pid: u32) -> bool {
        self.terminate_outcome(pid).await.is_ok()
    }

    pub async fn set_priority_outcome(&self, pid: u32, priority: i32) -> ControlOutcome {
        let result = match validate(pid, Some(priority)) {
            Ok(()) => {
                let backend = Arc::clone(&self.backend);
                self.run(move || backend.set_priority(pid, priority)).await
            }
            Err(e) => Err(e),
        };

        outcome("set priority", pid, result)
    }

    pub async fn terminate_outcome(&self, pid: u32) -> ControlOutcome {
        let result = match validate(pid, None) {
            Ok(()) => {
                let backend = Arc::clone(&self.backend);
                self.run(move || backend.terminate(pid)).await
            }
            Err(e) => Err(e),
        };

        outcome("terminate", pid, result)
    }

    async fn run<F>(&self, f: F) -> Result<(), ControlError>
    where
        F: FnOnce() -> Result<(), ControlError> + Send + 'static,
    {
        match tokio::time::timeout(self.timeout, tokio::task::spawn_blocking(f)).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(ControlError::Worker(e.to_string())),
            Err(_) => Err(ControlError::TimedOut(self.timeout.as_millis() as u64)),
        }
    }
}

fn validate(pid: u32, priority: Option<i32>) -> Result<(), ControlError> {
    if pid == 0 || pid > i32::MAX as u32 {
        return Err(ControlError::invalid_argument(format!("invalid pid {}", pid)));
    }

    if let Some(priority) = priority {
        if !PRIORITY_RANGE.contains(&priority) {
            return Err(ControlError::invalid_argument(format!(
                "priority {} outside {}..={}",
                priority,
                PRIORITY_RANGE.start(),
                PRIORITY_RANGE.end()
            )));
        }
    }

    Ok(())
}

fn outcome(action: &str, pid: u32, result: Result<(), ControlError>) -> ControlOutcome {
    match result {
        Ok(()) => {
            log::info!("{} succeeded for pid {}", action, pid);
            ControlOutcome::Ok
        }
        Err(e) => {
            log::warn!("{} failed for pid {}: {}", action, pid, e);
            ControlOutcome::from(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingControl {
        calls: AtomicUsize,
    }

    impl ProcessControl for CountingControl {
        fn set_priority(&self, pid: u32, _priority: i32) -> Result<(), ControlError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match pid {
                404 => Err(ControlError::NotFound(pid)),
                403 => Err(ControlError::PermissionDenied(pid)),
                _ => Ok(()),
            }
        }

        fn terminate(&self, pid: u32) -> Result<(), ControlError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match pid {
                404 => Err(ControlError::NotFound(pid)),
                _ => Err(ControlError::Os(std::io::Error::other("boom"))),
            }
        }
    }

    fn adapter(control: Arc<CountingControl>) -> ControlAdapter {
        ControlAdapter::new(control, Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_errors_collapse_to_outcomes() {
        let control = Arc::new(CountingControl::default());
        let adapter = adapter(control.clone());

        assert_eq!(adapter.set_priority_outcome(100, 5).await, ControlOutcome::Ok);
        assert_eq!(adapter.set_priority_outcome(404, 5).await, ControlOutcome::NotFound);
        assert_eq!(
            adapter.set_priority_outcome(403, 5).await,
            ControlOutcome::PermissionDenied
        );
        assert_eq!(adapter.terminate_outcome(7).await, ControlOutcome::Failed);
        assert!(!adapter.terminate(404).await);
        assert_eq!(control.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_invalid_arguments_never_reach_backend() {
        let control = Arc::new(CountingControl::default());
        let adapter = adapter(control.clone());

        assert_eq!(adapter.terminate_outcome(0).await, ControlOutcome::InvalidArgument);
        assert_eq!(
            adapter.set_priority_outcome(100, 20).await,
            ControlOutcome::InvalidArgument
        );
        assert_eq!(
            adapter.set_priority_outcome(100, -21).await,
            ControlOutcome::InvalidArgument
        );
        assert!(!adapter.set_priority(u32::MAX, 0).await);
        assert_eq!(control.calls.load(Ordering::SeqCst), 0);
    }

    struct StuckControl;

    impl ProcessControl for StuckControl {
        fn set_priority(&self, _pid: u32, _priority: i32) -> Result<(), ControlError> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(())
        }

        fn terminate(&self, _pid: u32) -> Result<(), ControlError> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_unresponsive_os_times_out() {
        let adapter = ControlAdapter::new(Arc::new(StuckControl), Duration::from_millis(20));
        assert_eq!(adapter.terminate_outcome(10).await, ControlOutcome::TimedOut);
    }
}
