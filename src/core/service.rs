//! Request/response boundary between the presentation layer and the core.
//!
//! Every operation has a total return value: listing degrades to an empty
//! sequence, mutations to `false`, login to an [`AuthError`] message. Write
//! authorization is always re-checked here regardless of what the caller
//! already verified.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use super::access::{AccessGate, CredentialStore, Session, StaticCredentialStore};
use super::config::Config;
use super::process_monitor::{
    ControlAdapter, ControlOutcome, MetricsAdapter, MetricsSource, OsProcessControl, PollHandle,
    PollingOrchestrator, ProcessControl, ProcessRecord, Snapshot, SnapshotStore, SysinfoSource,
};
use crate::error::{AuthError, AuthorizationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Reprioritize { priority: i32 },
    Terminate,
}

/// A privileged operation on one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationRequest {
    pub kind: MutationKind,
    pub target_pid: u32,
}

impl MutationRequest {
    pub fn reprioritize(target_pid: u32, priority: i32) -> Self {
        Self {
            kind: MutationKind::Reprioritize { priority },
            target_pid,
        }
    }

    pub fn terminate(target_pid: u32) -> Self {
        Self {
            kind: MutationKind::Terminate,
            target_pid,
        }
    }
}

impl fmt::Display for MutationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MutationKind::Reprioritize { priority } => {
                write!(f, "reprioritize pid {} to {}", self.target_pid, priority)
            }
            MutationKind::Terminate => write!(f, "terminate pid {}", self.target_pid),
        }
    }
}

pub struct ProcessService {
    gate: Mutex<AccessGate>,
    metrics: MetricsAdapter,
    control: ControlAdapter,
    store: Arc<SnapshotStore>,
    orchestrator: PollingOrchestrator,
    poller: Mutex<Option<PollHandle>>,
}

impl ProcessService {
    /// Service backed by the running OS and the built-in accounts.
    pub fn new(config: &Config) -> Self {
        Self::with_backends(
            config,
            Arc::new(StaticCredentialStore::builtin()),
            Arc::new(SysinfoSource::with_lock_timeout(config.os_call_timeout())),
            Arc::new(OsProcessControl),
        )
    }

    pub fn with_backends(
        config: &Config,
        credentials: Arc<dyn CredentialStore>,
        source: Arc<dyn MetricsSource>,
        control: Arc<dyn ProcessControl>,
    ) -> Self {
        let timeout = config.os_call_timeout();
        let metrics = MetricsAdapter::new(source, timeout);
        let store = Arc::new(SnapshotStore::new());
        let orchestrator =
            PollingOrchestrator::new(metrics.clone(), Arc::clone(&store), config.poll_interval());

        Self {
            gate: Mutex::new(AccessGate::new(credentials)),
            metrics,
            control: ControlAdapter::new(control, timeout),
            store,
            orchestrator,
            poller: Mutex::new(None),
        }
    }

    /// Authenticate and start polling. Must be called inside a Tokio runtime.
    ///
    /// Any current session ends first, so a rejected login leaves the service
    /// Anonymous.
    pub fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let mut gate = self.gate.lock();
        self.end_session(&mut gate);

        let session = gate.login(username, password)?;
        let generation = self.store.begin_session();
        *self.poller.lock() = Some(self.orchestrator.start(generation));
        Ok(session)
    }

    /// Stop polling, discard the stored snapshot and return to Anonymous.
    pub fn logout(&self) {
        let mut gate = self.gate.lock();
        self.end_session(&mut gate);
    }

    fn end_session(&self, gate: &mut AccessGate) {
        if let Some(handle) = self.poller.lock().take() {
            handle.cancel();
        }
        self.store.end_session();
        gate.logout();
    }

    pub fn session(&self) -> Option<Session> {
        self.gate.lock().session().cloned()
    }

    /// Fetch the process list now. Never fails.
    ///
    /// With an active session the result also becomes the stored snapshot;
    /// of two overlapping calls, the one resolving last wins.
    pub async fn list(&self) -> Vec<ProcessRecord> {
        let generation = self.store.generation();
        let records = self.metrics.list_processes().await;
        self.store.apply(generation, records.clone());
        records
    }

    pub async fn reprioritize(&self, pid: u32, priority: i32) -> bool {
        self.execute(MutationRequest::reprioritize(pid, priority)).await
    }

    pub async fn terminate(&self, pid: u32) -> bool {
        self.execute(MutationRequest::terminate(pid)).await
    }

    pub async fn execute(&self, request: MutationRequest) -> bool {
        matches!(self.execute_detailed(request).await, Ok(ControlOutcome::Ok))
    }

    /// Like [`execute`](Self::execute) but keeps the reason for a failure.
    ///
    /// A successful mutation triggers a refresh of the stored snapshot.
    pub async fn execute_detailed(
        &self,
        request: MutationRequest,
    ) -> Result<ControlOutcome, AuthorizationError> {
        let session = self.authorize_write().map_err(|e| {
            log::warn!("Rejected {}: {}", request, e);
            e
        })?;
        log::debug!("'{}' requested {}", session.identity, request);

        let outcome = match request.kind {
            MutationKind::Reprioritize { priority } => {
                self.control
                    .set_priority_outcome(request.target_pid, priority)
                    .await
            }
            MutationKind::Terminate => self.control.terminate_outcome(request.target_pid).await,
        };

        if outcome.is_ok() {
            self.refresh();
        }
        Ok(outcome)
    }

    fn authorize_write(&self) -> Result<Session, AuthorizationError> {
        self.gate.lock().check_write().cloned()
    }

    /// Request an out-of-schedule fetch. No-op without an active session.
    pub fn refresh(&self) -> bool {
        self.poller
            .lock()
            .as_ref()
            .map(|handle| handle.refresh())
            .unwrap_or(false)
    }

    pub fn is_polling(&self) -> bool {
        self.poller
            .lock()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Last stored process list.
    pub fn snapshot(&self) -> Snapshot {
        self.store.records()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.store.subscribe()
    }
}

impl Drop for ProcessService {
    fn drop(&mut self) {
        if let Some(handle) = self.poller.get_mut().take() {
            handle.cancel();
        }
    }
}
