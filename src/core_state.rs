//! Shared application state.
//!
//! `CoreState` is wrapped in `Arc` at startup and shared by the axum
//! handlers (which only need the database path) and the alarm ticker
//! (which reads the in-memory store once per second). `RwLock` keeps
//! ticks and HTTP reads concurrent; only store mutations take the write
//! lock.

use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDateTime;

use crate::alarms::clock_display;
use crate::db;
use crate::store::{ActionOutcome, CareStore, StoreAction, StoreError};

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    /// SQLite file backing the query service.
    db_path: PathBuf,
    /// Client-side patients and medications.
    store: RwLock<CareStore>,
    /// Instant of the most recent alarm tick (the displayed clock).
    last_tick: RwLock<Option<NaiveDateTime>>,
}

impl CoreState {
    /// State over `db_path` with an empty store.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self::with_store(db_path, CareStore::new())
    }

    pub fn with_store(db_path: impl Into<PathBuf>, store: CareStore) -> Self {
        Self {
            db_path: db_path.into(),
            store: RwLock::new(store),
            last_tick: RwLock::new(None),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    // ── Database ────────────────────────────────────────────

    /// Open a fresh connection. Handlers open one per request.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        db::open_database(&self.db_path).map_err(CoreError::Database)
    }

    /// Replace the in-memory store with the rows currently in the
    /// database. Returns `(patients, medications)` loaded.
    pub fn hydrate_from_db(&self) -> Result<(usize, usize), CoreError> {
        let conn = self.open_db()?;
        let patients = db::list_patients(&conn)?;
        let medications = db::list_medications(&conn)?;
        let hydrated = CareStore::from_records(patients, medications);
        let counts = (hydrated.patients().len(), hydrated.medications().len());

        *self.write_store()? = hydrated;
        tracing::info!(
            patients = counts.0,
            medications = counts.1,
            "Store hydrated from database"
        );
        Ok(counts)
    }

    // ── Store ───────────────────────────────────────────────

    pub fn read_store(&self) -> Result<RwLockReadGuard<'_, CareStore>, CoreError> {
        self.store.read().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn write_store(&self) -> Result<RwLockWriteGuard<'_, CareStore>, CoreError> {
        self.store.write().map_err(|_| CoreError::LockPoisoned)
    }

    /// Apply one action under the write lock.
    pub fn dispatch(&self, action: StoreAction) -> Result<ActionOutcome, CoreError> {
        let mut store = self.write_store()?;
        Ok(store.dispatch(action)?)
    }

    // ── Clock ───────────────────────────────────────────────

    pub fn record_tick(&self, instant: NaiveDateTime) {
        if let Ok(mut last) = self.last_tick.write() {
            *last = Some(instant);
        }
    }

    /// `HH:MM:SS` of the last tick, `None` before the ticker has run.
    pub fn displayed_clock(&self) -> Option<String> {
        self.last_tick
            .read()
            .ok()
            .and_then(|last| last.as_ref().map(clock_display))
    }
}

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
