//! Tracker: owns the live progression state and writes it through to the
//! byte store after every change.

use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::draft::{check_index, ItemField};
use crate::error::TrackerError;
use crate::levels::ProgressSnapshot;
use crate::persistence::{export_blob, import_blob, ByteStore, PersistenceAdapter};
use crate::progression::{LedgerEntry, ProgressionState};
use crate::scoring::{score, ScoreBreakdown};

pub struct Tracker<S: ByteStore> {
    state: ProgressionState,
    persistence: PersistenceAdapter<S>,
    clock: Clock,
}

impl<S: ByteStore> Tracker<S> {
    /// Restore the saved state, or start fresh when there is none.
    pub fn open(store: S, clock: Clock) -> Self {
        let persistence = PersistenceAdapter::new(store);
        let state = match persistence.load(&clock) {
            Some(state) => {
                debug!("Restored state: {} XP, {} notes", state.total_xp, state.notes.len());
                state
            }
            None => ProgressionState::fresh(&clock),
        };
        Self {
            state,
            persistence,
            clock,
        }
    }

    pub fn state(&self) -> &ProgressionState {
        &self.state
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn persistence(&self) -> &PersistenceAdapter<S> {
        &self.persistence
    }

    /// Today's breakdown, recomputed from the current draft.
    pub fn score(&self) -> ScoreBreakdown {
        score(&self.state.today)
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        self.state.snapshot()
    }

    /// Persist `next`, then make it live. A failed write keeps the old state.
    fn apply(&mut self, next: ProgressionState) -> Result<(), TrackerError> {
        if let Err(e) = self.persistence.save(&next) {
            warn!("Failed to save state: {}", e);
            return Err(e);
        }
        self.state = next;
        Ok(())
    }

    pub fn toggle_item(&mut self, index: usize) -> Result<(), TrackerError> {
        check_index("item", index, self.state.today.items.len())?;
        debug!("Toggle item {}", index);
        let today = self.state.today.toggle_item(index);
        self.apply(self.state.with_today(today))
    }

    pub fn toggle_extra(&mut self, index: usize) -> Result<(), TrackerError> {
        check_index("extra", index, self.state.today.extras.len())?;
        debug!("Toggle extra {}", index);
        let today = self.state.today.toggle_extra(index);
        self.apply(self.state.with_today(today))
    }

    pub fn toggle_leg_ext(&mut self) -> Result<(), TrackerError> {
        debug!("Toggle leg extension");
        let today = self.state.today.toggle_leg_ext();
        self.apply(self.state.with_today(today))
    }

    pub fn update_item_field(
        &mut self,
        index: usize,
        field: ItemField,
        value: f64,
    ) -> Result<(), TrackerError> {
        check_index("item", index, self.state.today.items.len())?;
        debug!("Item {} {:?} = {}", index, field, value);
        let today = self.state.today.update_item_field(index, field, value);
        self.apply(self.state.with_today(today))
    }

    pub fn update_extra_field(
        &mut self,
        index: usize,
        field: ItemField,
        value: f64,
    ) -> Result<(), TrackerError> {
        check_index("extra", index, self.state.today.extras.len())?;
        debug!("Extra {} {:?} = {}", index, field, value);
        let today = self.state.today.update_extra_field(index, field, value);
        self.apply(self.state.with_today(today))
    }

    pub fn update_extra_name(&mut self, index: usize, name: &str) -> Result<(), TrackerError> {
        check_index("extra", index, self.state.today.extras.len())?;
        let today = self.state.today.update_extra_name(index, name);
        self.apply(self.state.with_today(today))
    }

    pub fn update_leg_ext_field(&mut self, field: ItemField, value: f64) -> Result<(), TrackerError> {
        debug!("Leg extension {:?} = {}", field, value);
        let today = self.state.today.update_leg_ext_field(field, value);
        self.apply(self.state.with_today(today))
    }

    /// Append an extra; returns its index.
    pub fn add_extra(&mut self, name: Option<&str>) -> Result<usize, TrackerError> {
        let today = match name {
            Some(name) => self.state.today.add_extra_named(&self.clock, name),
            None => self.state.today.add_extra(&self.clock),
        };
        let index = today.extras.len() - 1;
        debug!("Added extra {} ({})", index, today.extras[index].key);
        self.apply(self.state.with_today(today))?;
        Ok(index)
    }

    pub fn set_run_meters(&mut self, meters: f64) -> Result<(), TrackerError> {
        debug!("Run meters = {}", meters);
        let today = self.state.today.set_run_meters(meters);
        self.apply(self.state.with_today(today))
    }

    /// Finalise today's session.
    pub fn commit(&mut self) -> Result<LedgerEntry, TrackerError> {
        let (next, entry) = self.state.commit(&self.clock);
        info!("Committed {}: +{} XP ({})", entry.date, entry.xp, entry.memo);
        self.apply(next)?;
        Ok(entry)
    }

    pub fn reset_today(&mut self) -> Result<(), TrackerError> {
        info!("Reset today's input");
        let next = self.state.reset_today(&self.clock);
        self.apply(next)
    }

    /// Wipe total, ledger and today. Only call after the user confirmed.
    pub fn hard_reset(&mut self) -> Result<(), TrackerError> {
        info!(
            "Hard reset (dropping {} XP and {} notes)",
            self.state.total_xp,
            self.state.notes.len()
        );
        let next = self.state.hard_reset(&self.clock);
        self.apply(next)
    }

    pub fn override_total_xp(&mut self, value: i64) -> Result<(), TrackerError> {
        info!("Total XP overridden: {} -> {}", self.state.total_xp, value);
        let next = self.state.override_total_xp(value);
        self.apply(next)
    }

    /// Pretty JSON backup of the current state.
    pub fn export(&self) -> Result<Vec<u8>, TrackerError> {
        export_blob(&self.state)
    }

    /// Merge a backup. A malformed backup leaves the state untouched and
    /// writes nothing. Returns the fields that were applied.
    pub fn import(&mut self, bytes: &[u8]) -> Result<Vec<&'static str>, TrackerError> {
        let outcome = import_blob(&self.state, bytes)?;
        self.apply(outcome.state)?;
        Ok(outcome.applied)
    }
}
