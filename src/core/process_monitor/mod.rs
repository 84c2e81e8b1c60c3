//! Process inventory and control.
//!
//! This module collects process snapshots from the OS, keeps the latest one
//! for the active session, and wraps the priority/termination primitives.

mod control;
mod poller;
mod provider;
mod record;
mod store;

pub use control::{ControlAdapter, ControlOutcome, OsProcessControl, ProcessControl, PRIORITY_RANGE};
pub use poller::{PollHandle, PollingOrchestrator, DEFAULT_POLL_INTERVAL};
pub use provider::{MetricsAdapter, MetricsSource, SysinfoSource};
pub use record::{normalize_cpu, MemorySummary, ProcessRecord, RawProcess};
pub use store::{Snapshot, SnapshotStore};
