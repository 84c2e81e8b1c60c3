// In-memory operating system used by the integration tests

use std::collections::BTreeMap;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use procgate::core::access::StaticCredentialStore;
use procgate::core::process_monitor::{MemorySummary, MetricsSource, ProcessControl, RawProcess};
use procgate::core::{Config, ProcessService};
use procgate::error::{ControlError, ProviderError};

#[derive(Default)]
struct FakeState {
    processes: BTreeMap<u32, (String, i32)>,
    list_calls: usize,
    control_calls: usize,
    hold_next_list: Option<Receiver<()>>,
    fail_listing: bool,
}

#[derive(Default)]
pub struct FakeOs {
    state: Mutex<FakeState>,
}

impl FakeOs {
    pub fn with_processes(processes: &[(u32, &str)]) -> Arc<Self> {
        let os = FakeOs::default();
        {
            let mut state = os.state.lock();
            for &(pid, name) in processes {
                state.processes.insert(pid, (name.to_string(), 0));
            }
        }
        Arc::new(os)
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().list_calls
    }

    pub fn control_calls(&self) -> usize {
        self.state.lock().control_calls
    }

    /// Make the next listing block until `release` receives a message.
    pub fn hold_next_list(&self, release: Receiver<()>) {
        self.state.lock().hold_next_list = Some(release);
    }

    pub fn set_listing_fails(&self, fail: bool) {
        self.state.lock().fail_listing = fail;
    }
}

impl MetricsSource for FakeOs {
    fn processes(&self) -> Result<Vec<RawProcess>, ProviderError> {
        // Sample first, then block: a held listing reports the state it saw.
        let (processes, hold) = {
            let mut state = self.state.lock();
            state.list_calls += 1;
            if state.fail_listing {
                return Err(ProviderError::unavailable("fake outage"));
            }

            let call = state.list_calls;
            let processes: Vec<RawProcess> = state
                .processes
                .iter()
                .map(|(&pid, (name, priority))| RawProcess {
                    pid,
                    name: Some(name.clone()),
                    cpu: Some(1.0),
                    memory_bytes: Some(1024),
                    memory_percent: None,
                    priority: Some(*priority),
                    path: Some(format!("/fake/call-{}", call)),
                })
                .collect();
            (processes, state.hold_next_list.take())
        };

        if let Some(release) = hold {
            let _ = release.recv();
        }
        Ok(processes)
    }

    fn memory_summary(&self) -> Result<MemorySummary, ProviderError> {
        Ok(MemorySummary {
            total_bytes: 1024 * 1024,
        })
    }
}

impl ProcessControl for FakeOs {
    fn set_priority(&self, pid: u32, priority: i32) -> Result<(), ControlError> {
        let mut state = self.state.lock();
        state.control_calls += 1;
        match state.processes.get_mut(&pid) {
            Some(entry) => {
                entry.1 = priority;
                Ok(())
            }
            None => Err(ControlError::NotFound(pid)),
        }
    }

    fn terminate(&self, pid: u32) -> Result<(), ControlError> {
        let mut state = self.state.lock();
        state.control_calls += 1;
        state
            .processes
            .remove(&pid)
            .map(|_| ())
            .ok_or(ControlError::NotFound(pid))
    }
}

pub fn service_with(os: &Arc<FakeOs>, config: &Config) -> ProcessService {
    ProcessService::with_backends(
        config,
        Arc::new(StaticCredentialStore::builtin()),
        os.clone(),
        os.clone(),
    )
}

/// Config whose timer never fires during a test
pub fn quiet_config() -> Config {
    Config {
        poll_interval_secs: 3600,
        ..Default::default()
    }
}

/// Wait (in real time) until `condition` holds, up to two seconds.
pub async fn wait_until<F: Fn() -> bool>(condition: F) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

/// Let spawned tasks and blocking calls run without moving a paused clock.
pub async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
        std::thread::sleep(Duration::from_millis(1));
    }
}
