//! In-memory remote collection

use async_trait::async_trait;
use mortgage_core::{ClientError, RemoteCollectionClient};
use mortgage_schema::{PersistedRecord, RecordId, TypedRecord};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Notify;

/// Store call kinds, for counting, failure injection and gating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    List,
    Create,
    Update,
    Delete,
}

/// Injected failure for the next call of an op
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureMode {
    Transport,
    Rejected(u16),
    NotFound,
}

impl FailureMode {
    fn into_error(self, id: Option<RecordId>) -> ClientError {
        match self {
            Self::Transport => ClientError::Transport("connection reset".to_string()),
            Self::Rejected(status) => ClientError::Rejected {
                status,
                message: "rejected by test store".to_string(),
            },
            Self::NotFound => ClientError::NotFound(id.unwrap_or(RecordId(0))),
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    records: BTreeMap<RecordId, PersistedRecord>,
    writes: HashMap<RecordId, u64>,
    next_id: u64,
    calls: HashMap<StoreOp, usize>,
    failures: HashMap<StoreOp, VecDeque<FailureMode>>,
    gates: HashMap<StoreOp, Arc<Notify>>,
}

/// `RemoteCollectionClient` backed by a map
///
/// Ids start at 1. Every stored record carries a server-side `revision`
/// attribute counting writes to it, so derived columns can be observed.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with `records` under their own ids
    pub fn with_records(records: impl IntoIterator<Item = PersistedRecord>) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.lock();
            for record in records {
                let id = record.id();
                state.next_id = state.next_id.max(id.get());
                state.records.insert(id, record);
            }
        }
        store
    }

    /// Number of calls made to `op`, counted on entry
    pub fn calls(&self, op: StoreOp) -> usize {
        self.state.lock().calls.get(&op).copied().unwrap_or(0)
    }

    /// Fail the next call of `op`
    pub fn fail_next(&self, op: StoreOp, mode: FailureMode) {
        self.state
            .lock()
            .failures
            .entry(op)
            .or_default()
            .push_back(mode);
    }

    /// Hold the next call of `op` until the returned handle is notified
    pub fn gate(&self, op: StoreOp) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state.lock().gates.insert(op, Arc::clone(&gate));
        gate
    }

    /// Current contents in id order
    pub fn records(&self) -> Vec<PersistedRecord> {
        self.state.lock().records.values().cloned().collect()
    }

    /// Stored record
    pub fn get(&self, id: RecordId) -> Option<PersistedRecord> {
        self.state.lock().records.get(&id).cloned()
    }

    /// Insert or replace a record behind the editor's back
    pub fn put(&self, record: PersistedRecord) {
        let mut state = self.state.lock();
        state.next_id = state.next_id.max(record.id().get());
        state.records.insert(record.id(), record);
    }

    /// Remove a record behind the editor's back
    pub fn remove(&self, id: RecordId) -> Option<PersistedRecord> {
        self.state.lock().records.remove(&id)
    }

    async fn enter(&self, op: StoreOp, id: Option<RecordId>) -> Result<(), ClientError> {
        let gate = {
            let mut state = self.state.lock();
            *state.calls.entry(op).or_default() += 1;
            state.gates.remove(&op)
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let failure = self
            .state
            .lock()
            .failures
            .get_mut(&op)
            .and_then(VecDeque::pop_front);
        match failure {
            Some(mode) => Err(mode.into_error(id)),
            None => Ok(()),
        }
    }
}

fn stamp(state: &mut StoreState, id: RecordId, record: &TypedRecord) -> PersistedRecord {
    let revision = state.writes.entry(id).or_default();
    *revision += 1;
    let stored = PersistedRecord::from_typed(id, record).with_attribute("revision", *revision);
    state.records.insert(id, stored.clone());
    stored
}

#[async_trait]
impl RemoteCollectionClient for InMemoryStore {
    async fn list(&self) -> Result<Vec<PersistedRecord>, ClientError> {
        self.enter(StoreOp::List, None).await?;
        Ok(self.records())
    }

    async fn create(&self, record: &TypedRecord) -> Result<PersistedRecord, ClientError> {
        self.enter(StoreOp::Create, None).await?;
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = RecordId(state.next_id);
        Ok(stamp(&mut state, id, record))
    }

    async fn update(
        &self,
        id: RecordId,
        record: &TypedRecord,
    ) -> Result<PersistedRecord, ClientError> {
        self.enter(StoreOp::Update, Some(id)).await?;
        let mut state = self.state.lock();
        if !state.records.contains_key(&id) {
            return Err(ClientError::NotFound(id));
        }
        Ok(stamp(&mut state, id, record))
    }

    async fn delete(&self, id: RecordId) -> Result<(), ClientError> {
        self.enter(StoreOp::Delete, Some(id)).await?;
        self.state
            .lock()
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or(ClientError::NotFound(id))
    }
}
