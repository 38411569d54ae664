//! Base exercise catalog and default values for bonus slots.

/// Immutable catalog entry for one base exercise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExerciseTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub default_weight: f64,
    pub default_reps: f64,
    pub default_sets: f64,
}

/// The six base exercises, in display order.
pub const BASE_EXERCISES: [ExerciseTemplate; 6] = [
    ExerciseTemplate {
        key: "chest",
        name: "チェストプレス",
        default_weight: 36.0,
        default_reps: 10.0,
        default_sets: 2.0,
    },
    ExerciseTemplate {
        key: "row",
        name: "シーテッドロー",
        default_weight: 39.0,
        default_reps: 10.0,
        default_sets: 2.0,
    },
    ExerciseTemplate {
        key: "lat",
        name: "ラットプルダウン",
        default_weight: 45.0,
        default_reps: 10.0,
        default_sets: 2.0,
    },
    ExerciseTemplate {
        key: "leg",
        name: "レッグプレス",
        default_weight: 100.0,
        default_reps: 10.0,
        default_sets: 2.0,
    },
    ExerciseTemplate {
        key: "crun",
        name: "アブドミナルクランチ",
        default_weight: 45.0,
        default_reps: 15.0,
        default_sets: 2.0,
    },
    ExerciseTemplate {
        key: "curl",
        name: "アームカール",
        default_weight: 32.0,
        default_reps: 10.0,
        default_sets: 2.0,
    },
];

/// Leg extension bonus slot defaults
pub const LEG_EXT_WEIGHT: f64 = 73.0;
pub const LEG_EXT_REPS: f64 = 10.0;
pub const LEG_EXT_SETS: f64 = 2.0;

/// User-added extra exercise defaults
pub const EXTRA_NAME: &str = "追加種目";
pub const EXTRA_WEIGHT: f64 = 20.0;
pub const EXTRA_REPS: f64 = 10.0;
pub const EXTRA_SETS: f64 = 2.0;

/// Look up a base template by key.
pub fn template(key: &str) -> Option<&'static ExerciseTemplate> {
    BASE_EXERCISES.iter().find(|t| t.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_unique() {
        let mut keys: Vec<_> = BASE_EXERCISES.iter().map(|t| t.key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), BASE_EXERCISES.len());
    }

    #[test]
    fn test_template_lookup() {
        assert_eq!(template("leg").map(|t| t.default_weight), Some(100.0));
        assert_eq!(template("crun").map(|t| t.default_reps), Some(15.0));
        assert!(template("squat").is_none());
    }
}
