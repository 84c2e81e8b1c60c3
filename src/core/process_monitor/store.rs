use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;

use super::record::ProcessRecord;

pub type Snapshot = Arc<Vec<ProcessRecord>>;

#[derive(Debug, Default)]
struct StoreState {
    generation: u64,
    active: bool,
    records: Snapshot,
}

/// Last fetched process list, scoped to the current session.
///
/// Each session gets a generation number. Results computed under an older
/// generation are dropped, so a fetch that resolves after logout never lands.
#[derive(Debug)]
pub struct SnapshotStore {
    state: RwLock<StoreState>,
    updates: watch::Sender<Snapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (updates, _) = watch::channel(Snapshot::default());
        Self {
            state: RwLock::new(StoreState::default()),
            updates,
        }
    }

    /// Current generation, to tag a fetch before it starts.
    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    pub fn is_active(&self) -> bool {
        self.state.read().active
    }

    /// Open a fresh session scope and return its generation.
    pub fn begin_session(&self) -> u64 {
        let mut state = self.state.write();
        state.generation += 1;
        state.active = true;
        state.records = Snapshot::default();
        self.updates.send_replace(Snapshot::default());
        state.generation
    }

    /// Close the session scope and discard the stored records.
    pub fn end_session(&self) {
        let mut state = self.state.write();
        state.generation += 1;
        state.active = false;
        state.records = Snapshot::default();
        self.updates.send_replace(Snapshot::default());
    }

    /// Replace the stored records if `generation` is still current.
    ///
    /// Returns `false` when the result is stale and was dropped.
    pub fn apply(&self, generation: u64, records: Vec<ProcessRecord>) -> bool {
        let mut state = self.state.write();
        if !state.active || state.generation != generation {
            return false;
        }

        let snapshot = Arc::new(records);
        state.records = Arc::clone(&snapshot);
        self.updates.send_replace(snapshot);
        true
    }

    pub fn records(&self) -> Snapshot {
        Arc::clone(&self.state.read().records)
    }

    /// Receiver notified on every stored or cleared snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.updates.subscribe()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
