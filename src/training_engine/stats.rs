//! Grading and the persisted stats record.
//!
//! [`StoredStats`] is the one blob handed to the storage collaborator. Its
//! field names match the record written by earlier versions of the trainer,
//! and every field defaults so older or partial records still load.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::training_engine::{
    mistake_queue::MistakeQueue,
    models::{Action, ItemKey, LifetimeStats, WeakSpot},
    strategy,
};

/// Field deserializer for the stored record: a value of the wrong shape
/// (`null`, a string where a number belongs) becomes the default instead of
/// failing the whole record.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match serde_json::from_value(value) {
        Ok(v) => Ok(v),
        Err(e) => {
            warn!(error = %e, "malformed field in stats record, using default");
            Ok(T::default())
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemStats {
    #[serde(deserialize_with = "or_default")]
    pub attempts: u64,
    #[serde(deserialize_with = "or_default")]
    pub correct: u64,
    /// Milliseconds.
    #[serde(deserialize_with = "or_default")]
    pub total_time: u64,
}

impl ItemStats {
    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.correct as f64 / self.attempts as f64
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredStats {
    #[serde(deserialize_with = "or_default")]
    pub total_hands: u64,
    #[serde(deserialize_with = "or_default")]
    pub total_correct: u64,
    #[serde(deserialize_with = "or_default")]
    pub best_streak: u32,
    #[serde(deserialize_with = "or_default")]
    pub by_hand: BTreeMap<ItemKey, ItemStats>,
    /// Time of the last graded hand.
    #[serde(deserialize_with = "or_default")]
    pub last_played: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "or_default")]
    pub mistake_queue: MistakeQueue,
}

impl StoredStats {
    /// Fold one graded answer into the lifetime counters.
    pub fn record(&mut self, key: &ItemKey, is_correct: bool, response_time_ms: u64, streak: u32) {
        let entry = self.by_hand.entry(key.clone()).or_default();
        entry.attempts += 1;
        if is_correct {
            entry.correct += 1;
        }
        entry.total_time += response_time_ms;

        self.total_hands += 1;
        if is_correct {
            self.total_correct += 1;
        }
        self.best_streak = self.best_streak.max(streak);
        self.last_played = Some(Utc::now());
    }

    pub fn lifetime(&self) -> LifetimeStats {
        LifetimeStats {
            total_hands: self.total_hands,
            total_correct: self.total_correct,
            accuracy: percent(self.total_correct, self.total_hands),
            best_streak: self.best_streak,
        }
    }

    /// Items with at least `min_attempts`, worst accuracy first, at most
    /// `limit` of them. Ties keep key order.
    pub fn weak_spots(&self, min_attempts: u64, limit: usize) -> Vec<WeakSpot> {
        let mut spots: Vec<(f64, WeakSpot)> = self
            .by_hand
            .iter()
            .filter(|(_, s)| s.attempts >= min_attempts && s.attempts > 0)
            .map(|(key, s)| {
                let spot = WeakSpot {
                    key: key.clone(),
                    label: key.label(),
                    attempts: s.attempts,
                    correct: s.correct,
                    accuracy: s.accuracy() * 100.0,
                    avg_time_secs: s.total_time as f64 / s.attempts as f64 / 1000.0,
                };
                (s.accuracy(), spot)
            })
            .collect();

        // sort_by is stable.
        spots.sort_by(|a, b| a.0.total_cmp(&b.0));
        spots.into_iter().take(limit).map(|(_, spot)| spot).collect()
    }
}

/// `part / whole` as a percentage; 0 when `whole` is 0.
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Exact match, or Hit where Double is correct.
pub fn is_acceptable(submitted: Action, correct: Action) -> bool {
    submitted == correct || (correct == Action::Double && submitted == Action::Hit)
}

/// Outcome of comparing one answer against the oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub is_correct: bool,
    pub correct_action: Action,
    pub explanation: String,
}

pub fn grade(key: &ItemKey, correct_action: Action, submitted: Action) -> Verdict {
    Verdict {
        is_correct: is_acceptable(submitted, correct_action),
        correct_action,
        explanation: strategy::explanation(key, correct_action),
    }
}
