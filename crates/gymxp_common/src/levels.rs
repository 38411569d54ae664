//! Level System
//!
//! Level thresholds grow geometrically: the XP needed to go from level
//! `i + 1` to `i + 2` is `round(start * growth^i)`.
//!
//! With the standard parameters (start 1200, growth 1.11, 50 levels):
//! - Level 1 -> 2: 1,200 XP
//! - Level 2 -> 3: 1,332 XP
//! - 49 thresholds in total
//!
//! Cumulative XP is resolved greedily: subtract thresholds in order while
//! the remainder covers them.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::titles::title_for;

pub const STANDARD_START: f64 = 1200.0;
pub const STANDARD_GROWTH: f64 = 1.11;
pub const STANDARD_LEVEL_COUNT: usize = 50;

static STANDARD_TABLE: OnceLock<LevelTable> = OnceLock::new();

/// Precomputed XP needed to advance out of each level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTable {
    thresholds: Vec<u64>,
}

impl LevelTable {
    /// Build `level_count - 1` thresholds starting at `start`, each one
    /// `growth` times the previous (unrounded) value.
    pub fn build(start: f64, growth: f64, level_count: usize) -> Self {
        let mut thresholds = Vec::with_capacity(level_count.saturating_sub(1));
        let mut need = start;
        for _ in 1..level_count {
            thresholds.push(need.round().max(0.0) as u64);
            need *= growth;
        }
        Self { thresholds }
    }

    /// The process-wide table, computed on first use.
    pub fn standard() -> &'static LevelTable {
        STANDARD_TABLE
            .get_or_init(|| Self::build(STANDARD_START, STANDARD_GROWTH, STANDARD_LEVEL_COUNT))
    }

    pub fn thresholds(&self) -> &[u64] {
        &self.thresholds
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// Map cumulative XP to the current level and progress within it.
    ///
    /// Negative totals (reachable through a manual override) resolve as 0.
    /// Once every threshold is consumed the standing is past the tracked
    /// range: `level = len + 2`, with no progress bar.
    pub fn resolve(&self, total_xp: i64) -> LevelStanding {
        let mut rest = total_xp.max(0) as u64;
        let mut level = 1u32;
        for &need in &self.thresholds {
            if rest >= need {
                rest -= need;
                level += 1;
            } else {
                return LevelStanding {
                    level,
                    into: rest,
                    to_next: need,
                };
            }
        }
        LevelStanding {
            level: self.thresholds.len() as u32 + 2,
            into: 0,
            to_next: 0,
        }
    }
}

/// Where a cumulative XP total sits on the level curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelStanding {
    /// Current level, starting at 1
    pub level: u32,
    /// XP earned inside the current level
    pub into: u64,
    /// XP the current level requires in total (0 past the table)
    pub to_next: u64,
}

impl LevelStanding {
    /// XP still missing before the next level.
    pub fn remaining(&self) -> u64 {
        self.to_next.saturating_sub(self.into)
    }

    /// Progress inside the current level, 0-100.
    pub fn progress_percent(&self) -> f64 {
        if self.to_next == 0 {
            return 100.0;
        }
        (self.into as f64 / self.to_next as f64 * 100.0).min(100.0)
    }
}

/// Everything the status header shows about cumulative progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    #[serde(rename = "totalXP")]
    pub total_xp: i64,
    pub level: u32,
    pub title: &'static str,
    pub into: u64,
    pub to_next: u64,
    pub remaining: u64,
    pub progress_percent: f64,
}

impl ProgressSnapshot {
    pub fn from_total(total_xp: i64, table: &LevelTable) -> Self {
        let standing = table.resolve(total_xp);
        Self {
            total_xp,
            level: standing.level,
            title: title_for(standing.level),
            into: standing.into,
            to_next: standing.to_next,
            remaining: standing.remaining(),
            progress_percent: standing.progress_percent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_shape() {
        let table = LevelTable::standard();
        assert_eq!(table.len(), 49);
        assert_eq!(table.thresholds()[0], 1200);
        assert_eq!(table.thresholds()[1], 1332);
        assert_eq!(table.thresholds()[2], 1479);
        assert!(table.thresholds().windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_standard_table_is_shared() {
        assert!(std::ptr::eq(LevelTable::standard(), LevelTable::standard()));
    }

    #[test]
    fn test_build_small_tables() {
        assert!(LevelTable::build(100.0, 2.0, 1).is_empty());
        assert!(LevelTable::build(100.0, 2.0, 0).is_empty());
        assert_eq!(LevelTable::build(100.0, 2.0, 4).thresholds(), &[100, 200, 400]);
    }

    #[test]
    fn test_resolve_zero() {
        let standing = LevelTable::standard().resolve(0);
        assert_eq!(
            standing,
            LevelStanding {
                level: 1,
                into: 0,
                to_next: 1200
            }
        );
    }

    #[test]
    fn test_resolve_boundaries() {
        let table = LevelTable::standard();
        assert_eq!(table.resolve(1199).level, 1);
        assert_eq!(table.resolve(1199).into, 1199);

        let exact = table.resolve(1200);
        assert_eq!(exact.level, 2);
        assert_eq!(exact.into, 0);
        assert_eq!(exact.to_next, 1332);

        let later = table.resolve(1200 + 1332 + 10);
        assert_eq!(later.level, 3);
        assert_eq!(later.into, 10);
    }

    #[test]
    fn test_resolve_past_table() {
        let table = LevelTable::build(100.0, 2.0, 4);
        // 100 + 200 + 400 = 700 consumes all three thresholds
        let standing = table.resolve(700);
        assert_eq!(standing.level, 5);
        assert_eq!(standing.into, 0);
        assert_eq!(standing.to_next, 0);
        assert_eq!(standing.progress_percent(), 100.0);

        let total: u64 = LevelTable::standard().thresholds().iter().sum();
        assert_eq!(LevelTable::standard().resolve(total as i64).level, 51);
        assert_eq!(LevelTable::standard().resolve(total as i64 - 1).level, 49);
    }

    #[test]
    fn test_negative_total_resolves_as_zero() {
        let table = LevelTable::standard();
        assert_eq!(table.resolve(-500), table.resolve(0));
    }

    #[test]
    fn test_into_below_to_next_and_monotonic() {
        let table = LevelTable::standard();
        let mut last_level = 0;
        for xp in (0..400_000i64).step_by(997) {
            let standing = table.resolve(xp);
            if standing.to_next > 0 {
                assert!(standing.into < standing.to_next, "xp {}", xp);
            }
            assert!(standing.level >= last_level, "xp {}", xp);
            last_level = standing.level;
        }
    }

    #[test]
    fn test_snapshot_progress() {
        let snap = ProgressSnapshot::from_total(600, LevelTable::standard());
        assert_eq!(snap.level, 1);
        assert_eq!(snap.remaining, 600);
        assert!((snap.progress_percent - 50.0).abs() < 1e-9);
        assert_eq!(snap.title, title_for(1));
    }
}
