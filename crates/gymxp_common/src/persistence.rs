//! Persistence for the progression state.
//!
//! The whole state lives as UTF-8 JSON under one versioned key in a byte
//! store. Loading and importing are tolerant: each top-level field
//! (`totalXP`, `notes`, `today`) is checked and applied on its own, and a
//! field that fails its check keeps its current value.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::draft::SessionDraft;
use crate::error::TrackerError;
use crate::progression::{LedgerEntry, ProgressionState};

/// Storage key. Bump the version suffix whenever the state shape changes.
pub const STORAGE_KEY: &str = "xp_tracker_full_v3";

/// Key-value byte storage.
pub trait ByteStore {
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>>;
    fn put(&mut self, key: &str, bytes: &[u8]) -> io::Result<()>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl ByteStore for FileStore {
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn put(&mut self, key: &str, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        // Write next to the target, then rename over it
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        {
            let mut file = File::create(&tmp)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ByteStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, bytes: &[u8]) -> io::Result<()> {
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Result of a successful import.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub state: ProgressionState,
    /// Top-level fields that passed their check and were applied
    pub applied: Vec<&'static str>,
}

impl ImportOutcome {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Saves and restores the state through a [`ByteStore`].
#[derive(Debug)]
pub struct PersistenceAdapter<S> {
    store: S,
}

impl<S: ByteStore> PersistenceAdapter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Write the full state under [`STORAGE_KEY`].
    pub fn save(&mut self, state: &ProgressionState) -> Result<(), TrackerError> {
        let bytes = serde_json::to_vec(state)?;
        self.store.put(STORAGE_KEY, &bytes)?;
        debug!("Saved state ({} bytes, {} notes)", bytes.len(), state.notes.len());
        Ok(())
    }

    /// Read the stored state. Missing or unusable data yields `None` and the
    /// caller starts fresh; errors never leave this function.
    pub fn load(&self, clock: &Clock) -> Option<ProgressionState> {
        let bytes = match self.store.get(STORAGE_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("No saved state under {}", STORAGE_KEY);
                return None;
            }
            Err(e) => {
                warn!("Could not read saved state: {}", e);
                return None;
            }
        };

        match decode_persisted(&bytes, clock) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!("{}; starting fresh", e);
                None
            }
        }
    }
}

fn decode_persisted(bytes: &[u8], clock: &Clock) -> Result<ProgressionState, TrackerError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| TrackerError::MalformedPersistedState(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| TrackerError::MalformedPersistedState("not a JSON object".into()))?;

    let (state, applied) = merge_fields(&ProgressionState::fresh(clock), object);
    if applied.is_empty() {
        return Err(TrackerError::MalformedPersistedState(
            "no recognisable fields".into(),
        ));
    }
    if applied.len() < 3 {
        warn!("Saved state only partially usable; restored {:?}", applied);
    }
    Ok(state)
}

/// Apply every top-level field that passes its check onto `base`.
fn merge_fields(
    base: &ProgressionState,
    object: &Map<String, Value>,
) -> (ProgressionState, Vec<&'static str>) {
    let mut state = base.clone();
    let mut applied = Vec::new();

    if let Some(total) = object.get("totalXP").and_then(checked_total) {
        state.total_xp = total;
        applied.push("totalXP");
    }

    if let Some(notes) = object.get("notes").and_then(checked_notes) {
        state.notes = notes;
        applied.push("notes");
    }

    if let Some(today) = object.get("today").and_then(checked_today) {
        state.today = today;
        applied.push("today");
    }

    (state, applied)
}

fn checked_total(value: &Value) -> Option<i64> {
    let total = value.as_f64()?;
    if total.is_finite() {
        Some(total.round() as i64)
    } else {
        None
    }
}

fn checked_notes(value: &Value) -> Option<Vec<LedgerEntry>> {
    if !value.is_array() {
        return None;
    }
    let notes: Vec<LedgerEntry> = serde_json::from_value(value.clone()).ok()?;
    notes.iter().all(|n| n.xp >= 0).then_some(notes)
}

fn checked_today(value: &Value) -> Option<SessionDraft> {
    if !value.is_object() {
        return None;
    }
    let draft: SessionDraft = serde_json::from_value(value.clone()).ok()?;
    draft.has_base_layout().then_some(draft)
}

/// Pretty-printed JSON backup of the whole state.
pub fn export_blob(state: &ProgressionState) -> Result<Vec<u8>, TrackerError> {
    let bytes = serde_json::to_vec_pretty(state)?;
    info!("Exported backup ({} notes, {} XP)", state.notes.len(), state.total_xp);
    Ok(bytes)
}

/// Download name for a backup, e.g. `xp-backup-2024-05-01.json`.
pub fn backup_file_name(state: &ProgressionState) -> String {
    format!("xp-backup-{}.json", state.today.date)
}

/// Merge a backup into `current`.
///
/// Unparsable bytes are rejected with [`TrackerError::MalformedBackup`] and
/// nothing is applied. Otherwise each field is applied independently, as
/// when loading.
pub fn import_blob(current: &ProgressionState, bytes: &[u8]) -> Result<ImportOutcome, TrackerError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| TrackerError::MalformedBackup(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| TrackerError::MalformedBackup("expected a JSON object".into()))?;

    let (state, applied) = merge_fields(current, object);
    info!("Imported backup; applied {:?}", applied);
    Ok(ImportOutcome { state, applied })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::fixed_clock;

    fn committed_state() -> ProgressionState {
        let clock = fixed_clock();
        let state = ProgressionState::fresh(&clock);
        let state = state.with_today(state.today.toggle_item(0).toggle_item(4));
        let (state, _) = state.commit(&clock);
        state.with_today(state.today.add_extra(&clock).set_run_meters(1500.5))
    }

    #[test]
    fn test_memory_round_trip() {
        let clock = fixed_clock();
        let state = committed_state();
        let mut adapter = PersistenceAdapter::new(MemoryStore::new());
        adapter.save(&state).unwrap();
        assert_eq!(adapter.load(&clock), Some(state));
    }

    #[test]
    fn test_load_missing_is_none() {
        let adapter = PersistenceAdapter::new(MemoryStore::new());
        assert_eq!(adapter.load(&fixed_clock()), None);
    }

    #[test]
    fn test_load_garbage_is_none() {
        let clock = fixed_clock();
        let payloads: [&[u8]; 5] = [
            b"{not json",
            b"[1,2,3]",
            b"42",
            b"{\"unrelated\":true}",
            b"\xff\xfe",
        ];
        for raw in payloads {
            let mut store = MemoryStore::new();
            store.put(STORAGE_KEY, raw).unwrap();
            let adapter = PersistenceAdapter::new(store);
            assert_eq!(adapter.load(&clock), None, "{:?}", raw);
        }
    }

    #[test]
    fn test_load_partial_keeps_defaults() {
        let clock = fixed_clock();
        let mut store = MemoryStore::new();
        store
            .put(STORAGE_KEY, br#"{"totalXP": 1234, "notes": "oops", "today": 5}"#)
            .unwrap();
        let state = PersistenceAdapter::new(store).load(&clock).unwrap();
        assert_eq!(state.total_xp, 1234);
        assert!(state.notes.is_empty());
        assert_eq!(state.today, SessionDraft::fresh(&clock));
    }

    #[test]
    fn test_total_checks() {
        assert_eq!(checked_total(&serde_json::json!(500)), Some(500));
        assert_eq!(checked_total(&serde_json::json!(500.6)), Some(501));
        assert_eq!(checked_total(&serde_json::json!(-20)), Some(-20));
        assert_eq!(checked_total(&serde_json::json!("500")), None);
        assert_eq!(checked_total(&Value::Null), None);
    }

    #[test]
    fn test_today_with_wrong_layout_rejected() {
        let mut draft = SessionDraft::new("2024-01-01");
        draft.items.pop();
        let value = serde_json::to_value(&draft).unwrap();
        assert!(checked_today(&value).is_none());

        let mut swapped = SessionDraft::new("2024-01-01");
        swapped.items.swap(0, 1);
        assert!(checked_today(&serde_json::to_value(&swapped).unwrap()).is_none());
    }

    #[test]
    fn test_notes_with_negative_xp_rejected() {
        let value = serde_json::json!([{"date": "2024-01-01", "xp": -5, "memo": ""}]);
        assert!(checked_notes(&value).is_none());
        let value = serde_json::json!([{"date": "2024-01-01", "xp": 5}]);
        assert_eq!(checked_notes(&value).unwrap()[0].memo, "");
    }

    #[test]
    fn test_import_total_only() {
        let current = committed_state();
        let outcome = import_blob(&current, br#"{"totalXP": 500}"#).unwrap();
        assert_eq!(outcome.applied, vec!["totalXP"]);
        assert_eq!(outcome.state.total_xp, 500);
        assert_eq!(outcome.state.notes, current.notes);
        assert_eq!(outcome.state.today, current.today);
    }

    #[test]
    fn test_import_malformed() {
        let current = committed_state();
        let err = import_blob(&current, b"not json at all").unwrap_err();
        assert!(matches!(err, TrackerError::MalformedBackup(_)));
        let err = import_blob(&current, b"[]").unwrap_err();
        assert!(matches!(err, TrackerError::MalformedBackup(_)));
    }

    #[test]
    fn test_import_unrelated_object_is_noop() {
        let current = committed_state();
        let outcome = import_blob(&current, br#"{"hello": "world"}"#).unwrap();
        assert!(outcome.is_noop());
        assert_eq!(outcome.state, current);
    }

    #[test]
    fn test_export_is_pretty_and_importable() {
        let state = committed_state();
        let blob = export_blob(&state).unwrap();
        let text = String::from_utf8(blob.clone()).unwrap();
        assert!(text.contains("\n  \"totalXP\""));

        let fresh = ProgressionState::fresh(&fixed_clock());
        let outcome = import_blob(&fresh, &blob).unwrap();
        assert_eq!(outcome.applied, vec!["totalXP", "notes", "today"]);
        assert_eq!(outcome.state, state);
    }

    #[test]
    fn test_backup_file_name() {
        let state = ProgressionState::fresh(&fixed_clock());
        assert_eq!(backup_file_name(&state), "xp-backup-2023-11-14.json");
    }
}
