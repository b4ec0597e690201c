//! Canonical owner of persisted practice progress.
//!
//! Every screen and controller reads and writes the incorrect/marked id
//! sets and the recall-state map through this store, never through raw
//! storage keys. In-memory state is authoritative: storage reads happen
//! once at load, writes are best effort, and a failed or corrupt backend
//! degrades to in-memory-only operation instead of surfacing an error.

use crate::store::{KeyValueStore, StorageError};
use practice_core::types::{QuestionId, SrsRecord};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

/// Storage key for the incorrectly-answered question ids (JSON id array).
pub const INCORRECT_KEY: &str = "practice:incorrect";
/// Storage key for the marked question ids (JSON id array).
pub const MARKED_KEY: &str = "practice:marked";
/// Storage key for the recall-state map (JSON object, stringified id keys).
pub const SRS_KEY: &str = "practice:srs_data";

/// Collection sizes broadcast to subscribers after every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct ProgressSnapshot {
    pub incorrect: usize,
    pub marked: usize,
    pub tracked: usize,
}

/// Single canonical progress store over an opaque key-value backend.
///
/// Each collection's read-modify-write cycle runs under its own lock, held
/// across the serialize and `set`, so rapid interaction cannot interleave
/// writes to one storage key.
pub struct ProgressStore {
    store: Arc<dyn KeyValueStore>,
    incorrect: Mutex<HashSet<QuestionId>>,
    marked: Mutex<HashSet<QuestionId>>,
    srs: Mutex<HashMap<QuestionId, SrsRecord>>,
    notify: watch::Sender<ProgressSnapshot>,
}

impl ProgressStore {
    /// Load persisted progress. Never fails: missing, unreadable, or
    /// corrupt payloads start the corresponding collection empty.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let incorrect = read_id_set(store.as_ref(), INCORRECT_KEY).await;
        let marked = read_id_set(store.as_ref(), MARKED_KEY).await;
        let srs = read_srs_map(store.as_ref()).await;

        let (notify, _) = watch::channel(ProgressSnapshot {
            incorrect: incorrect.len(),
            marked: marked.len(),
            tracked: srs.len(),
        });

        Self {
            store,
            incorrect: Mutex::new(incorrect),
            marked: Mutex::new(marked),
            srs: Mutex::new(srs),
            notify,
        }
    }

    /// Subscribe to collection-size snapshots.
    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.notify.subscribe()
    }

    pub async fn incorrect(&self) -> HashSet<QuestionId> {
        self.incorrect.lock().await.clone()
    }

    pub async fn marked(&self) -> HashSet<QuestionId> {
        self.marked.lock().await.clone()
    }

    pub async fn is_marked(&self, id: QuestionId) -> bool {
        self.marked.lock().await.contains(&id)
    }

    pub async fn srs_map(&self) -> HashMap<QuestionId, SrsRecord> {
        self.srs.lock().await.clone()
    }

    pub async fn srs_record(&self, id: QuestionId) -> Option<SrsRecord> {
        self.srs.lock().await.get(&id).cloned()
    }

    /// Add a question to the incorrect set and persist it.
    pub async fn record_incorrect(&self, id: QuestionId) {
        let mut guard = self.incorrect.lock().await;
        if !guard.insert(id) {
            return;
        }
        self.write_id_set(INCORRECT_KEY, &guard).await;
        let len = guard.len();
        drop(guard);
        self.notify.send_modify(|s| s.incorrect = len);
    }

    /// Flip a question's marked state and persist it. Returns the new state.
    pub async fn toggle_marked(&self, id: QuestionId) -> bool {
        let mut guard = self.marked.lock().await;
        let now_marked = if guard.contains(&id) {
            guard.remove(&id);
            false
        } else {
            guard.insert(id);
            true
        };
        self.write_id_set(MARKED_KEY, &guard).await;
        let len = guard.len();
        drop(guard);
        self.notify.send_modify(|s| s.marked = len);
        now_marked
    }

    /// Upsert a recall-state record and persist the full map.
    pub async fn save_record(&self, record: SrsRecord) {
        let mut guard = self.srs.lock().await;
        guard.insert(record.question_id, record);

        let payload = {
            let entries: BTreeMap<String, &SrsRecord> = guard
                .iter()
                .map(|(id, record)| (id.to_string(), record))
                .collect();
            serde_json::to_string(&entries)
        };
        match payload {
            Ok(json) => self.write(SRS_KEY, json).await,
            Err(err) => tracing::warn!(key = SRS_KEY, error = %err, "failed to encode payload"),
        }
        let len = guard.len();
        drop(guard);
        self.notify.send_modify(|s| s.tracked = len);
    }

    async fn write_id_set(&self, key: &str, set: &HashSet<QuestionId>) {
        let mut ids: Vec<QuestionId> = set.iter().copied().collect();
        ids.sort_unstable();
        match serde_json::to_string(&ids) {
            Ok(json) => self.write(key, json).await,
            Err(err) => tracing::warn!(key, error = %err, "failed to encode payload"),
        }
    }

    /// Best-effort write: a failure is logged and the in-memory state stays
    /// authoritative for the rest of the session. No retry.
    async fn write(&self, key: &str, payload: String) {
        if let Err(err) = self.store.set(key, payload).await {
            tracing::warn!(key, error = %err, "progress write failed; continuing in memory");
        }
    }
}

async fn read_id_set(store: &dyn KeyValueStore, key: &str) -> HashSet<QuestionId> {
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return HashSet::new(),
        Err(err) => {
            tracing::warn!(key, error = %err, "progress read failed; starting empty");
            return HashSet::new();
        }
    };

    match serde_json::from_str::<Vec<QuestionId>>(&raw) {
        Ok(ids) => ids.into_iter().collect(),
        Err(err) => {
            tracing::warn!(key, error = %err, "corrupt payload; starting empty");
            HashSet::new()
        }
    }
}

async fn read_srs_map(store: &dyn KeyValueStore) -> HashMap<QuestionId, SrsRecord> {
    let raw = match store.get(SRS_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return HashMap::new(),
        Err(err) => {
            tracing::warn!(key = SRS_KEY, error = %err, "progress read failed; starting empty");
            return HashMap::new();
        }
    };

    let parsed: BTreeMap<String, SrsRecord> = match serde_json::from_str(&raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(key = SRS_KEY, error = %err, "corrupt payload; starting empty");
            return HashMap::new();
        }
    };

    parsed
        .into_iter()
        .filter_map(|(key, record)| match key.parse::<QuestionId>() {
            Ok(id) => Some((id, record)),
            Err(_) => {
                tracing::warn!(key = SRS_KEY, entry = %key, "skipping entry with non-numeric id");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use practice_core::sm2::{Quality, Sm2};
    use pretty_assertions::assert_eq;

    fn arc(store: &MemoryStore) -> Arc<dyn KeyValueStore> {
        Arc::new(store.clone())
    }

    #[tokio::test]
    async fn loads_persisted_sets() {
        let backend = MemoryStore::new();
        backend.insert(INCORRECT_KEY, "[3, 1]");
        backend.insert(MARKED_KEY, "[7]");

        let store = ProgressStore::load(arc(&backend)).await;
        assert_eq!(store.incorrect().await, [1, 3].into_iter().collect());
        assert!(store.is_marked(7).await);
    }

    #[tokio::test]
    async fn corrupt_payloads_start_empty() {
        let backend = MemoryStore::new();
        backend.insert(INCORRECT_KEY, "{not json");
        backend.insert(MARKED_KEY, "\"wrong shape\"");
        backend.insert(SRS_KEY, "[1, 2, 3]");

        let store = ProgressStore::load(arc(&backend)).await;
        assert!(store.incorrect().await.is_empty());
        assert!(store.marked().await.is_empty());
        assert!(store.srs_map().await.is_empty());
    }

    #[tokio::test]
    async fn record_incorrect_persists_sorted_ids() {
        let backend = MemoryStore::new();
        let store = ProgressStore::load(arc(&backend)).await;

        store.record_incorrect(9).await;
        store.record_incorrect(2).await;
        store.record_incorrect(9).await; // duplicate is a no-op

        assert_eq!(backend.value(INCORRECT_KEY).as_deref(), Some("[2,9]"));
    }

    #[tokio::test]
    async fn toggle_marked_round_trips() {
        let backend = MemoryStore::new();
        let store = ProgressStore::load(arc(&backend)).await;

        assert!(store.toggle_marked(5).await);
        assert_eq!(backend.value(MARKED_KEY).as_deref(), Some("[5]"));

        assert!(!store.toggle_marked(5).await);
        assert_eq!(backend.value(MARKED_KEY).as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn saved_records_survive_reload() {
        let backend = MemoryStore::new();
        let sm2 = Sm2::default();
        let record = sm2.next_review(&sm2.initial_record(11), Quality::Perfect, chrono::Utc::now());

        {
            let store = ProgressStore::load(arc(&backend)).await;
            store.save_record(record.clone()).await;
        }

        let reloaded = ProgressStore::load(arc(&backend)).await;
        assert_eq!(reloaded.srs_record(11).await, Some(record));
    }

    #[tokio::test]
    async fn snapshots_track_collection_sizes() {
        let backend = MemoryStore::new();
        let store = ProgressStore::load(arc(&backend)).await;
        let rx = store.subscribe();

        store.record_incorrect(1).await;
        store.toggle_marked(2).await;

        let snapshot = *rx.borrow();
        assert_eq!(
            snapshot,
            ProgressSnapshot {
                incorrect: 1,
                marked: 1,
                tracked: 0
            }
        );
    }
}
