//! Session draft: today's exercises, extras and bonus slots before commit.
//!
//! Every edit returns a new draft; nothing is mutated in place. Index
//! arguments must be in range, so front ends should run [`check_index`]
//! before calling an indexed edit.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::clock::Clock;
use crate::error::TrackerError;
use crate::exercise::{
    ExerciseTemplate, BASE_EXERCISES, EXTRA_NAME, EXTRA_REPS, EXTRA_SETS, EXTRA_WEIGHT,
    LEG_EXT_REPS, LEG_EXT_SETS, LEG_EXT_WEIGHT,
};

/// Numbers written by older front ends may be `null` (a NaN that went
/// through JSON). Treat those as 0.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.filter(|v| v.is_finite()).unwrap_or(0.0))
}

/// Editable numeric column of an exercise row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Weight,
    Reps,
    Sets,
}

impl FromStr for ItemField {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weight" | "w" | "kg" => Ok(Self::Weight),
            "reps" | "r" => Ok(Self::Reps),
            "sets" | "s" => Ok(Self::Sets),
            other => Err(TrackerError::UnknownField(other.to_string())),
        }
    }
}

/// Weight x reps x sets of a row.
pub trait Volume {
    fn weight(&self) -> f64;
    fn reps(&self) -> f64;
    fn sets(&self) -> f64;

    fn volume(&self) -> f64 {
        self.weight() * self.reps() * self.sets()
    }

    /// Rounded volume, shown next to each row as its XP estimate.
    fn xp(&self) -> i64 {
        self.volume().round() as i64
    }
}

macro_rules! impl_volume {
    ($($ty:ty),+) => {
        $(
            impl Volume for $ty {
                fn weight(&self) -> f64 {
                    self.weight
                }
                fn reps(&self) -> f64 {
                    self.reps
                }
                fn sets(&self) -> f64 {
                    self.sets
                }
            }
        )+
    };
}

impl_volume!(SessionItem, ExtraItem, LegExtension);

/// One base exercise for the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionItem {
    pub key: String,
    pub name: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub weight: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub reps: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub sets: f64,
    #[serde(default)]
    pub done: bool,
}

impl SessionItem {
    pub fn from_template(template: &ExerciseTemplate) -> Self {
        Self {
            key: template.key.to_string(),
            name: template.name.to_string(),
            weight: template.default_weight,
            reps: template.default_reps,
            sets: template.default_sets,
            done: false,
        }
    }

    fn with_field(&self, field: ItemField, value: f64) -> Self {
        let mut next = self.clone();
        match field {
            ItemField::Weight => next.weight = value,
            ItemField::Reps => next.reps = value,
            ItemField::Sets => next.sets = value,
        }
        next
    }
}

/// Ad-hoc exercise added by the user during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraItem {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub weight: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub reps: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub sets: f64,
    #[serde(default)]
    pub done: bool,
}

impl ExtraItem {
    fn with_field(&self, field: ItemField, value: f64) -> Self {
        let mut next = self.clone();
        match field {
            ItemField::Weight => next.weight = value,
            ItemField::Reps => next.reps = value,
            ItemField::Sets => next.sets = value,
        }
        next
    }
}

/// Fixed leg extension bonus slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegExtension {
    #[serde(deserialize_with = "lenient_f64")]
    pub weight: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub reps: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub sets: f64,
    #[serde(default)]
    pub done: bool,
}

impl Default for LegExtension {
    fn default() -> Self {
        Self {
            weight: LEG_EXT_WEIGHT,
            reps: LEG_EXT_REPS,
            sets: LEG_EXT_SETS,
            done: false,
        }
    }
}

/// Today's in-progress session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDraft {
    /// ISO calendar date, fixed when the draft is created
    pub date: String,
    /// One row per base exercise, in catalog order
    pub items: Vec<SessionItem>,
    #[serde(default)]
    pub extras: Vec<ExtraItem>,
    #[serde(default)]
    pub leg_ext: LegExtension,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub run_meters: f64,
}

/// Validate an index before handing it to an indexed edit.
pub fn check_index(target: &'static str, index: usize, len: usize) -> Result<(), TrackerError> {
    if index < len {
        Ok(())
    } else {
        Err(TrackerError::IndexOutOfRange { target, index, len })
    }
}

impl SessionDraft {
    /// Fresh draft for `date` with every base exercise at its defaults.
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            items: BASE_EXERCISES.iter().map(SessionItem::from_template).collect(),
            extras: Vec::new(),
            leg_ext: LegExtension::default(),
            run_meters: 0.0,
        }
    }

    /// Fresh draft dated today according to `clock`.
    pub fn fresh(clock: &Clock) -> Self {
        Self::new(clock.today())
    }

    /// True when `items` lines up one-to-one with the base catalog.
    pub fn has_base_layout(&self) -> bool {
        self.items.len() == BASE_EXERCISES.len()
            && self
                .items
                .iter()
                .zip(BASE_EXERCISES.iter())
                .all(|(item, template)| item.key == template.key)
    }

    pub fn toggle_item(&self, index: usize) -> Self {
        assert!(index < self.items.len(), "item index {} out of range", index);
        let mut next = self.clone();
        next.items[index].done = !next.items[index].done;
        next
    }

    pub fn toggle_extra(&self, index: usize) -> Self {
        assert!(index < self.extras.len(), "extra index {} out of range", index);
        let mut next = self.clone();
        next.extras[index].done = !next.extras[index].done;
        next
    }

    pub fn toggle_leg_ext(&self) -> Self {
        let mut next = self.clone();
        next.leg_ext.done = !next.leg_ext.done;
        next
    }

    /// Replace one numeric field of a base row. No range checks: zero and
    /// negative values simply score as such.
    pub fn update_item_field(&self, index: usize, field: ItemField, value: f64) -> Self {
        assert!(index < self.items.len(), "item index {} out of range", index);
        let mut next = self.clone();
        next.items[index] = self.items[index].with_field(field, value);
        next
    }

    pub fn update_extra_field(&self, index: usize, field: ItemField, value: f64) -> Self {
        assert!(index < self.extras.len(), "extra index {} out of range", index);
        let mut next = self.clone();
        next.extras[index] = self.extras[index].with_field(field, value);
        next
    }

    pub fn update_extra_name(&self, index: usize, name: impl Into<String>) -> Self {
        assert!(index < self.extras.len(), "extra index {} out of range", index);
        let mut next = self.clone();
        next.extras[index].name = name.into();
        next
    }

    pub fn update_leg_ext_field(&self, field: ItemField, value: f64) -> Self {
        let mut next = self.clone();
        match field {
            ItemField::Weight => next.leg_ext.weight = value,
            ItemField::Reps => next.leg_ext.reps = value,
            ItemField::Sets => next.leg_ext.sets = value,
        }
        next
    }

    /// Append an extra with the placeholder name and default volume.
    pub fn add_extra(&self, clock: &Clock) -> Self {
        self.add_extra_named(clock, EXTRA_NAME)
    }

    pub fn add_extra_named(&self, clock: &Clock, name: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.extras.push(ExtraItem {
            key: self.unique_extra_key(clock.millis()),
            name: name.into(),
            weight: EXTRA_WEIGHT,
            reps: EXTRA_REPS,
            sets: EXTRA_SETS,
            done: false,
        });
        next
    }

    pub fn set_run_meters(&self, meters: f64) -> Self {
        let mut next = self.clone();
        next.run_meters = meters;
        next
    }

    /// `ex_<millis>`, bumped forward until no existing extra uses it.
    fn unique_extra_key(&self, mut millis: i64) -> String {
        loop {
            let key = format!("ex_{}", millis);
            if !self.extras.iter().any(|e| e.key == key) {
                return key;
            }
            millis += 1;
        }
    }
}
