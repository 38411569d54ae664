//! GymXP Common - progression and scoring engine for the gym XP tracker.
//!
//! Turns logged exercise volume into XP, accumulates it into levels with
//! titles, and keeps a ledger of committed sessions on a local byte store.

pub mod clock;
pub mod config;
pub mod draft;
pub mod error;
pub mod exercise;
pub mod format;
pub mod levels;
pub mod persistence;
pub mod progression;
pub mod scoring;
pub mod titles;
pub mod tracker;

pub use clock::Clock;
pub use config::GymXpConfig;
pub use draft::{ExtraItem, ItemField, LegExtension, SessionDraft, SessionItem};
pub use error::TrackerError;
pub use exercise::{ExerciseTemplate, BASE_EXERCISES};
pub use levels::{LevelStanding, LevelTable, ProgressSnapshot};
pub use persistence::{
    backup_file_name, export_blob, import_blob, ByteStore, FileStore, ImportOutcome,
    MemoryStore, PersistenceAdapter, STORAGE_KEY,
};
pub use progression::{LedgerEntry, ProgressionState};
pub use scoring::{score, ScoreBreakdown};
pub use titles::{title_for, TITLES};
pub use tracker::Tracker;
