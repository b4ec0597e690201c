//! Common test utilities for engine integration tests.
//!
//! Provides a small civics question bank, controller construction helpers,
//! and storage/cue doubles for exercising the failure paths.

pub mod fixtures;

use async_trait::async_trait;
use practice_core::bank::QuestionBank;
use practice_core::types::{Question, QuestionId, SessionMode};
use practice_engine::{
    CuePlayer, KeyValueStore, MemoryStore, ProgressStore, SessionController, SessionSettings,
    StorageError,
};
use std::sync::{Arc, Mutex};

/// Install a fmt subscriber once so failing tests can be re-run with
/// RUST_LOG for detail.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Build a controller over the given backend and start it.
pub async fn started_controller(
    bank: Arc<QuestionBank>,
    backend: Arc<dyn KeyValueStore>,
    mode: SessionMode,
    session_size: usize,
) -> SessionController {
    let progress = Arc::new(ProgressStore::load(backend).await);
    let mut controller = SessionController::new(
        bank,
        progress,
        Arc::new(practice_engine::NullCue),
        mode,
        SessionSettings { session_size },
    );
    controller.begin().await;
    controller
}

/// Shared in-memory backend as a trait object.
pub fn memory_backend(store: &MemoryStore) -> Arc<dyn KeyValueStore> {
    Arc::new(store.clone())
}

/// Store whose reads succeed empty and whose writes always fail.
#[derive(Clone, Default)]
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), StorageError> {
        Err(StorageError::Backend("disk unavailable".to_string()))
    }
}

/// Cue player that records which questions it was asked to cue.
#[derive(Clone, Default)]
pub struct RecordingCue {
    cued: Arc<Mutex<Vec<QuestionId>>>,
}

impl RecordingCue {
    pub fn cued(&self) -> Vec<QuestionId> {
        self.cued.lock().expect("cue lock").clone()
    }
}

impl CuePlayer for RecordingCue {
    fn begin_cue(&self, question: &Question) {
        self.cued.lock().expect("cue lock").push(question.id);
    }
}
