//! Progression state: cumulative XP, the session ledger, and today's draft.
//!
//! Transitions take `&self` and return the next state. Persisting the
//! result is up to the caller (see `tracker`).

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::draft::SessionDraft;
use crate::levels::{LevelTable, ProgressSnapshot};
use crate::scoring::score;

/// One committed session. Never edited after commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub date: String,
    pub xp: i64,
    #[serde(default)]
    pub memo: String,
}

/// Root aggregate and unit of persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionState {
    #[serde(rename = "totalXP")]
    pub total_xp: i64,
    /// Most recent first
    pub notes: Vec<LedgerEntry>,
    pub today: SessionDraft,
}

impl ProgressionState {
    pub fn fresh(clock: &Clock) -> Self {
        Self {
            total_xp: 0,
            notes: Vec::new(),
            today: SessionDraft::fresh(clock),
        }
    }

    /// Award today's XP, record it in the ledger and start a new draft.
    pub fn commit(&self, clock: &Clock) -> (Self, LedgerEntry) {
        let breakdown = score(&self.today);
        let entry = LedgerEntry {
            date: self.today.date.clone(),
            xp: breakdown.final_xp,
            memo: breakdown.memo(),
        };

        let mut notes = Vec::with_capacity(self.notes.len() + 1);
        notes.push(entry.clone());
        notes.extend(self.notes.iter().cloned());

        let next = Self {
            total_xp: self.total_xp.saturating_add(breakdown.final_xp),
            notes,
            today: SessionDraft::fresh(clock),
        };
        (next, entry)
    }

    /// Discard today's input. Total and ledger are kept.
    pub fn reset_today(&self, clock: &Clock) -> Self {
        self.with_today(SessionDraft::fresh(clock))
    }

    /// Wipe everything. Confirmation is the caller's job.
    pub fn hard_reset(&self, clock: &Clock) -> Self {
        Self::fresh(clock)
    }

    /// Overwrite the total directly, bypassing the ledger.
    pub fn override_total_xp(&self, value: i64) -> Self {
        Self {
            total_xp: value,
            ..self.clone()
        }
    }

    pub fn with_today(&self, today: SessionDraft) -> Self {
        Self {
            today,
            ..self.clone()
        }
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot::from_total(self.total_xp, LevelTable::standard())
    }

    /// Sum of XP recorded in the ledger (differs from the total after
    /// overrides or imports).
    pub fn ledger_total(&self) -> i64 {
        self.notes.iter().fold(0i64, |acc, n| acc.saturating_add(n.xp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::fixed_clock;

    fn with_chest_done(clock: &Clock) -> ProgressionState {
        let state = ProgressionState::fresh(clock);
        let today = state.today.toggle_item(0);
        state.with_today(today)
    }

    #[test]
    fn test_commit_awards_and_records() {
        let mut clock = fixed_clock();
        let state = with_chest_done(&clock);
        clock.advance(chrono::Duration::days(1));

        let (next, entry) = state.commit(&clock);
        assert_eq!(entry.xp, 360);
        assert_eq!(entry.date, "2023-11-14");
        assert_eq!(entry.memo, "倍率0.50 / 欠け5 / 追加0 / ラン0XP");
        assert_eq!(next.total_xp, 360);
        assert_eq!(next.notes, vec![entry]);
        assert_eq!(next.today, SessionDraft::new("2023-11-15"));
        // the input state is left alone
        assert_eq!(state.total_xp, 0);
    }

    #[test]
    fn test_two_commits_prepend() {
        let clock = fixed_clock();
        let (first, a) = with_chest_done(&clock).commit(&clock);
        let today = first.today.toggle_item(0).toggle_item(1);
        let (second, b) = first.with_today(today).commit(&clock);

        assert_eq!(second.notes.len(), 2);
        assert_eq!(second.notes[0], b);
        assert_eq!(second.notes[1], a);
        assert_eq!(second.total_xp, a.xp + b.xp);
        assert_eq!(second.ledger_total(), second.total_xp);
    }

    #[test]
    fn test_reset_today_keeps_progress() {
        let clock = fixed_clock();
        let (committed, _) = with_chest_done(&clock).commit(&clock);
        let edited = committed.with_today(committed.today.toggle_item(3));
        let reset = edited.reset_today(&clock);
        assert_eq!(reset.total_xp, committed.total_xp);
        assert_eq!(reset.notes, committed.notes);
        assert_eq!(reset.today, SessionDraft::fresh(&clock));
    }

    #[test]
    fn test_hard_reset() {
        let clock = fixed_clock();
        let (committed, _) = with_chest_done(&clock).commit(&clock);
        let wiped = committed.override_total_xp(99_999).hard_reset(&clock);
        assert_eq!(wiped, ProgressionState::fresh(&clock));
    }

    #[test]
    fn test_override_accepts_negative() {
        let clock = fixed_clock();
        let state = ProgressionState::fresh(&clock).override_total_xp(-20);
        assert_eq!(state.total_xp, -20);
        assert!(state.notes.is_empty());
        assert_eq!(state.snapshot().level, 1);
    }

    #[test]
    fn test_ledger_total_saturates() {
        let clock = fixed_clock();
        let mut state = ProgressionState::fresh(&clock);
        state.notes = vec![
            LedgerEntry {
                date: "2024-01-02".to_string(),
                xp: i64::MAX,
                memo: String::new(),
            },
            LedgerEntry {
                date: "2024-01-01".to_string(),
                xp: 1,
                memo: String::new(),
            },
        ];
        assert_eq!(state.ledger_total(), i64::MAX);
    }

    #[test]
    fn test_serialized_field_names() {
        let clock = fixed_clock();
        let (state, _) = with_chest_done(&clock).commit(&clock);
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["totalXP"], 360);
        assert_eq!(value["notes"][0]["xp"], 360);
        assert!(value["today"]["legExt"].is_object());
        assert!(value["today"]["runMeters"].is_number());
    }
}
