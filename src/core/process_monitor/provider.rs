//! Metrics provider adapter.
//!
//! Wraps the OS process enumeration and memory summary behind the
//! [`MetricsSource`] trait and normalizes whatever it reports into
//! [`ProcessRecord`]s. Listing is fail-soft: any source failure is logged and
//! turns into an empty sequence.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use sysinfo::{MemoryRefreshKind, ProcessRefreshKind, ProcessesToUpdate, RefreshKind, System, UpdateKind};

use super::record::{MemorySummary, ProcessRecord, RawProcess};
use crate::error::ProviderError;
use crate::platform::process_control;

/// OS-level source of process metrics.
///
/// Both calls may block; the adapter runs them on the blocking pool.
pub trait MetricsSource: Send + Sync + 'static {
    /// Enumerate every running process.
    fn processes(&self) -> Result<Vec<RawProcess>, ProviderError>;

    /// Query total system memory.
    fn memory_summary(&self) -> Result<MemorySummary, ProviderError>;
}

/// Default bound on waiting for a `System` still held by an earlier call.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(3);

/// [`MetricsSource`] backed by `sysinfo`.
///
/// Keeps its `System` instances alive between polls so cpu usage is measured
/// over the interval since the previous refresh. A call that finds a
/// `System` still busy (an earlier, abandoned call hanging in the OS) gives
/// up after the lock timeout instead of queueing behind it.
pub struct SysinfoSource {
    processes: Mutex<System>,
    memory: Mutex<System>,
    lock_timeout: Duration,
}

impl SysinfoSource {
    pub fn new() -> Self {
        Self::with_lock_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        let mut processes = System::new_with_specifics(RefreshKind::nothing());
        processes.refresh_processes_specifics(ProcessesToUpdate::All, true, Self::process_refresh_kind());

        let memory = System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::nothing().with_ram()),
        );

        Self {
            processes: Mutex::new(processes),
            memory: Mutex::new(memory),
            lock_timeout,
        }
    }

    fn acquire<'a>(&self, system: &'a Mutex<System>) -> Result<MutexGuard<'a, System>, ProviderError> {
        system
            .try_lock_for(self.lock_timeout)
            .ok_or(ProviderError::TimedOut(self.lock_timeout.as_millis() as u64))
    }

    fn process_refresh_kind() -> ProcessRefreshKind {
        ProcessRefreshKind::nothing()
            .with_cpu()
            .with_memory()
            .with_exe(UpdateKind::OnlyIfNotSet)
    }
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSource for SysinfoSource {
    fn processes(&self) -> Result<Vec<RawProcess>, ProviderError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(ProviderError::unavailable(
                "process enumeration is not supported on this platform",
            ));
        }

        let mut system = self.acquire(&self.processes)?;
        system.refresh_processes_specifics(ProcessesToUpdate::All, true, Self::process_refresh_kind());

        let mut processes: Vec<RawProcess> = system
            .processes()
            .values()
            .map(|proc| {
                let pid = proc.pid().as_u32();
                let name = proc.name().to_string_lossy().to_string();

                RawProcess {
                    pid,
                    name: (!name.is_empty()).then_some(name),
                    cpu: Some(f64::from(proc.cpu_usage())),
                    memory_bytes: Some(proc.memory()),
                    memory_percent: None,
                    priority: process_control::get_priority(pid),
                    path: proc.exe().map(|p| p.to_string_lossy().to_string()),
                }
            })
            .collect();

        if processes.is_empty() {
            return Err(ProviderError::unavailable("no processes reported"));
        }

        processes.sort_by_key(|p| p.pid);
        Ok(processes)
    }

    fn memory_summary(&self) -> Result<MemorySummary, ProviderError> {
        let mut system = self.acquire(&self.memory)?;
        system.refresh_memory_specifics(MemoryRefreshKind::nothing().with_ram());

        match system.total_memory() {
            0 => Err(ProviderError::unavailable("total memory reported as 0")),
            total_bytes => Ok(MemorySummary { total_bytes }),
        }
    }
}

/// Normalizing, fail-soft front of a [`MetricsSource`].
#[derive(Clone)]
pub struct MetricsAdapter {
    source: Arc<dyn MetricsSource>,
    timeout: Duration,
}

impl MetricsAdapter {
    pub fn new(source: Arc<dyn MetricsSource>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    /// List all processes. Never fails: source errors yield an empty list.
    pub async fn list_processes(&self) -> Vec<ProcessRecord> {
        match self.try_list_processes().await {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Process listing failed: {}", e);
                Vec::new()
            }
        }
    }

    /// List all processes, reporting source failures.
    ///
    /// The process list and the memory summary are fetched concurrently. A
    /// failing memory summary only degrades memory percentages.
    pub async fn try_list_processes(&self) -> Result<Vec<ProcessRecord>, ProviderError> {
        let process_source = Arc::clone(&self.source);
        let memory_source = Arc::clone(&self.source);

        let (processes, memory) = tokio::join!(
            run_blocking(self.timeout, move || process_source.processes()),
            run_blocking(self.timeout, move || memory_source.memory_summary()),
        );

        let processes = processes?;
        let memory = match memory {
            Ok(summary) => Some(summary),
            Err(e) => {
                log::debug!("Memory summary unavailable, using per-process values: {}", e);
                None
            }
        };

        log::debug!("Fetched {} processes", processes.len());

        Ok(processes
            .into_iter()
            .map(|raw| ProcessRecord::from_raw(raw, memory.as_ref()))
            .collect())
    }
}

async fn run_blocking<T, F>(timeout: Duration, f: F) -> Result<T, ProviderError>
where
    F: FnOnce() -> Result<T, ProviderError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::time::timeout(timeout, tokio::task::spawn_blocking(f)).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(ProviderError::Worker(e.to_string())),
        Err(_) => Err(ProviderError::TimedOut(timeout.as_millis() as u64)),
    }
}
