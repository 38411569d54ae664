//! Session scoring.
//!
//! Raw XP is the summed volume of every completed row plus run meters.
//! A multiplier then penalises skipped base exercises (-0.1 each) and
//! rewards bonus activity (+0.1 each), clamped to [0.5, 1.5].

use serde::Serialize;

use crate::draft::{SessionDraft, Volume};
use crate::exercise::BASE_EXERCISES;
use crate::format::thousands;

pub const MULT_MIN: f64 = 0.5;
pub const MULT_MAX: f64 = 1.5;
pub const MULT_STEP: f64 = 0.1;

/// Breakdown of how a draft turns into its final XP award.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub base_sum: f64,
    pub extras_sum: f64,
    #[serde(rename = "legExtXP")]
    pub leg_ext_xp: f64,
    #[serde(rename = "runXP")]
    pub run_xp: f64,
    /// Base exercises not done
    pub missing: u32,
    /// Completed extras plus active bonus slots
    pub added: u32,
    pub mult: f64,
    #[serde(rename = "finalXP")]
    pub final_xp: i64,
}

impl ScoreBreakdown {
    pub fn raw_xp(&self) -> f64 {
        self.base_sum + self.extras_sum + self.leg_ext_xp + self.run_xp
    }

    /// Ledger memo recorded at commit time.
    pub fn memo(&self) -> String {
        format!(
            "倍率{:.2} / 欠け{} / 追加{} / ラン{}XP",
            self.mult,
            self.missing,
            self.added,
            thousands(self.run_xp)
        )
    }
}

/// Multiplier for the given skip/bonus counts.
pub fn multiplier(missing: u32, added: u32) -> f64 {
    (1.0 - MULT_STEP * missing as f64 + MULT_STEP * added as f64).clamp(MULT_MIN, MULT_MAX)
}

/// Score a draft. Pure; call it again after every edit.
pub fn score(draft: &SessionDraft) -> ScoreBreakdown {
    let done_items = draft.items.iter().filter(|i| i.done).count();
    let base_sum: f64 = draft.items.iter().filter(|i| i.done).map(Volume::volume).sum();

    let done_extras = draft.extras.iter().filter(|e| e.done).count();
    let extras_sum: f64 = draft.extras.iter().filter(|e| e.done).map(Volume::volume).sum();

    let leg_ext_xp = if draft.leg_ext.done {
        draft.leg_ext.volume()
    } else {
        0.0
    };

    let run_xp = if draft.run_meters.is_finite() && draft.run_meters > 0.0 {
        draft.run_meters
    } else {
        0.0
    };

    let missing = BASE_EXERCISES.len().saturating_sub(done_items) as u32;
    let added = done_extras as u32 + u32::from(draft.leg_ext.done) + u32::from(run_xp > 0.0);
    let mult = multiplier(missing, added);

    let raw = base_sum + extras_sum + leg_ext_xp + run_xp;
    let final_xp = (raw * mult).round().max(0.0) as i64;

    ScoreBreakdown {
        base_sum,
        extras_sum,
        leg_ext_xp,
        run_xp,
        missing,
        added,
        mult,
        final_xp,
    }
}
