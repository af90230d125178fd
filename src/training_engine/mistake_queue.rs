//! Spaced-repetition queue of missed items.
//!
//! Per item the queue is a small state machine:
//!
//! ```text
//! not-queued --miss--> queued(0)
//! queued(n)  --miss--> queued(0)
//! queued(n)  --hit, served from queue--> queued(n+1) | not-queued once n+1 >= threshold
//! queued(n)  --hit, fresh draw--------> queued(n)
//! ```
//!
//! Every grading of a queued item refreshes its `last_shown_at`.
//!
//! Timestamps are logical ticks supplied by the caller; only their order
//! matters.

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::training_engine::{
    models::{DrillItem, ItemKey, QueueTransition, TrainingMode},
    sampler,
    stats::or_default,
    universe::HandUniverse,
};

pub const GRADUATION_THRESHOLD: u32 = 3;
pub const MIN_GAP_BETWEEN_QUEUE_SERVES: u32 = 3;
pub const MAX_QUEUE_SIZE: usize = 20;

/// Tunables for the queue; defaults are the constants above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuePolicy {
    pub graduation_threshold: u32,
    pub min_gap: u32,
    pub max_size: usize,
}

impl Default for QueuePolicy {
    fn default() -> Self {
        QueuePolicy {
            graduation_threshold: GRADUATION_THRESHOLD,
            min_gap: MIN_GAP_BETWEEN_QUEUE_SERVES,
            max_size: MAX_QUEUE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MistakeQueueEntry {
    #[serde(rename = "handKey")]
    pub key: ItemKey,
    #[serde(default, deserialize_with = "or_default")]
    pub consecutive_correct: u32,
    #[serde(default, deserialize_with = "or_default")]
    pub last_shown_at: u64,
    #[serde(default, deserialize_with = "or_default")]
    pub added_at: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MistakeQueue {
    entries: Vec<MistakeQueueEntry>,
}

// Entries without a usable key are dropped; the rest of the queue survives.
impl<'de> Deserialize<'de> for MistakeQueue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
        let entries = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<MistakeQueueEntry>(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "dropping malformed mistake queue entry");
                    None
                }
            })
            .collect();
        Ok(MistakeQueue { entries })
    }
}

impl MistakeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[MistakeQueueEntry] {
        &self.entries
    }

    pub fn get(&self, key: &ItemKey) -> Option<&MistakeQueueEntry> {
        self.entries.iter().find(|e| e.key == *key)
    }

    pub fn contains(&self, key: &ItemKey) -> bool {
        self.get(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Largest timestamp held by any entry; the logical clock resumes after it.
    pub fn latest_tick(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| e.last_shown_at.max(e.added_at))
            .max()
            .unwrap_or(0)
    }

    /// Apply one grading outcome for `key`.
    pub fn record(
        &mut self,
        key: &ItemKey,
        is_correct: bool,
        served_from_queue: bool,
        now: u64,
        policy: &QueuePolicy,
    ) -> QueueTransition {
        let pos = self.entries.iter().position(|e| e.key == *key);

        match (pos, is_correct) {
            (None, true) => QueueTransition::Unchanged,
            (None, false) => {
                if policy.max_size > 0 && self.entries.len() >= policy.max_size {
                    self.evict_oldest();
                }
                self.entries.push(MistakeQueueEntry {
                    key: key.clone(),
                    consecutive_correct: 0,
                    last_shown_at: now,
                    added_at: now,
                });
                QueueTransition::Inserted
            }
            (Some(i), false) => {
                let entry = &mut self.entries[i];
                entry.consecutive_correct = 0;
                entry.last_shown_at = now;
                QueueTransition::Relapsed
            }
            (Some(i), true) if !served_from_queue => {
                self.entries[i].last_shown_at = now;
                QueueTransition::Unchanged
            }
            (Some(i), true) => {
                let progress = self.entries[i].consecutive_correct + 1;
                if progress >= policy.graduation_threshold {
                    self.entries.remove(i);
                    QueueTransition::Graduated
                } else {
                    let entry = &mut self.entries[i];
                    entry.consecutive_correct = progress;
                    entry.last_shown_at = now;
                    QueueTransition::Advanced { consecutive_correct: progress }
                }
            }
        }
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .enumerate()
            .min_by_key(|(_, e)| e.added_at)
            .map(|(i, _)| i);
        if let Some(i) = oldest {
            let evicted = self.entries.remove(i);
            warn!(key = %evicted.key, "mistake queue full, evicting oldest entry");
        }
    }

    /// The entry to serve now, if the gap has elapsed: oldest `last_shown_at`
    /// first, skipping `last_key` and keys the universe does not know.
    pub fn next_due<'a>(
        &'a self,
        universe: &HandUniverse,
        last_key: Option<&ItemKey>,
        hands_since_queue_serve: u32,
        policy: &QueuePolicy,
    ) -> Option<&'a MistakeQueueEntry> {
        if hands_since_queue_serve < policy.min_gap {
            return None;
        }
        self.entries
            .iter()
            .filter(|e| Some(&e.key) != last_key)
            .filter(|e| {
                let known = universe.contains(&e.key);
                if !known {
                    warn!(key = %e.key, "queued key is not a drill item, skipping");
                }
                known
            })
            .min_by_key(|e| (e.last_shown_at, e.added_at))
    }
}

/// Queue first, weighted sampler otherwise. Returns the item and whether it
/// came from the queue.
#[allow(clippy::too_many_arguments)]
pub fn select_next<R: Rng>(
    rng: &mut R,
    universe: &HandUniverse,
    mode: TrainingMode,
    queue: &MistakeQueue,
    last_key: Option<&ItemKey>,
    hands_since_queue_serve: u32,
    policy: &QueuePolicy,
    max_redraws: u32,
) -> Option<(DrillItem, bool)> {
    if let Some(entry) = queue.next_due(universe, last_key, hands_since_queue_serve, policy) {
        if let Some(item) = universe.get(&entry.key) {
            return Some((item.clone(), true));
        }
    }
    sampler::draw(rng, universe.items(), mode, last_key, max_redraws)
        .map(|item| (item.clone(), false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training_engine::models::{CardValue, HandCategory};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn key(total: u8) -> ItemKey {
        ItemKey::new(HandCategory::Hard(total), CardValue::Ten)
    }

    #[test]
    fn miss_inserts_at_zero() {
        let mut q = MistakeQueue::new();
        let t = q.record(&key(16), false, false, 1, &QueuePolicy::default());
        assert_eq!(t, QueueTransition::Inserted);
        let e = q.get(&key(16)).unwrap();
        assert_eq!(e.consecutive_correct, 0);
        assert_eq!(e.added_at, 1);
        assert_eq!(e.last_shown_at, 1);
    }

    #[test]
    fn fresh_correct_does_not_advance() {
        let policy = QueuePolicy::default();
        let mut q = MistakeQueue::new();
        q.record(&key(16), false, false, 1, &policy);
        q.record(&key(16), true, true, 2, &policy);
        let t = q.record(&key(16), true, false, 3, &policy);
        assert_eq!(t, QueueTransition::Unchanged);
        let e = q.get(&key(16)).unwrap();
        assert_eq!(e.consecutive_correct, 1);
        assert_eq!(e.last_shown_at, 3);
    }

    #[test]
    fn fresh_correct_moves_entry_behind_waiting_ones() {
        let policy = QueuePolicy::default();
        let universe = HandUniverse::build();
        let mut q = MistakeQueue::new();
        q.record(&key(16), false, false, 1, &policy);
        q.record(&key(15), false, false, 2, &policy);
        q.record(&key(16), true, false, 5, &policy);

        assert_eq!(q.get(&key(16)).unwrap().last_shown_at, 5);
        assert_eq!(q.next_due(&universe, None, 3, &policy).unwrap().key, key(15));
    }

    #[test]
    fn relapse_resets_progress() {
        let policy = QueuePolicy::default();
        let mut q = MistakeQueue::new();
        q.record(&key(16), false, false, 1, &policy);
        q.record(&key(16), true, true, 2, &policy);
        q.record(&key(16), true, true, 3, &policy);
        let t = q.record(&key(16), false, true, 4, &policy);
        assert_eq!(t, QueueTransition::Relapsed);
        assert_eq!(q.get(&key(16)).unwrap().consecutive_correct, 0);
    }

    #[test]
    fn graduates_on_third_queued_hit() {
        let policy = QueuePolicy::default();
        let mut q = MistakeQueue::new();
        q.record(&key(16), false, false, 1, &policy);
        assert_eq!(
            q.record(&key(16), true, true, 2, &policy),
            QueueTransition::Advanced { consecutive_correct: 1 }
        );
        assert_eq!(
            q.record(&key(16), true, true, 3, &policy),
            QueueTransition::Advanced { consecutive_correct: 2 }
        );
        assert_eq!(q.record(&key(16), true, true, 4, &policy), QueueTransition::Graduated);
        assert!(!q.contains(&key(16)));
    }

    #[test]
    fn full_queue_evicts_oldest_addition() {
        let policy = QueuePolicy { max_size: 2, ..QueuePolicy::default() };
        let mut q = MistakeQueue::new();
        q.record(&key(14), false, false, 1, &policy);
        q.record(&key(15), false, false, 2, &policy);
        q.record(&key(16), false, false, 3, &policy);
        assert_eq!(q.len(), 2);
        assert!(!q.contains(&key(14)));
        assert!(q.contains(&key(16)));
    }

    #[test]
    fn nothing_due_before_gap() {
        let policy = QueuePolicy::default();
        let universe = HandUniverse::build();
        let mut q = MistakeQueue::new();
        q.record(&key(16), false, false, 1, &policy);
        assert!(q.next_due(&universe, None, 2, &policy).is_none());
        assert!(q.next_due(&universe, None, 3, &policy).is_some());
    }

    #[test]
    fn due_entries_are_fifo_by_last_shown() {
        let policy = QueuePolicy::default();
        let universe = HandUniverse::build();
        let mut q = MistakeQueue::new();
        q.record(&key(15), false, false, 1, &policy);
        q.record(&key(16), false, false, 2, &policy);
        q.record(&key(15), false, false, 3, &policy);
        assert_eq!(q.next_due(&universe, None, 5, &policy).unwrap().key, key(16));
    }

    #[test]
    fn due_entry_skips_previous_item() {
        let policy = QueuePolicy::default();
        let universe = HandUniverse::build();
        let mut q = MistakeQueue::new();
        q.record(&key(16), false, false, 1, &policy);
        assert!(q.next_due(&universe, Some(&key(16)), 9, &policy).is_none());
    }

    #[test]
    fn select_next_prefers_due_queue_entry() {
        let policy = QueuePolicy::default();
        let universe = HandUniverse::build();
        let mut q = MistakeQueue::new();
        q.record(&key(16), false, false, 1, &policy);
        let mut rng = StdRng::seed_from_u64(1);

        let mode = TrainingMode::Balanced;
        let (item, from_queue) =
            select_next(&mut rng, &universe, mode, &q, None, 3, &policy, 8).unwrap();
        assert!(from_queue);
        assert_eq!(item.key(), key(16));

        let (_, from_queue) =
            select_next(&mut rng, &universe, mode, &q, None, 0, &policy, 8).unwrap();
        assert!(!from_queue);
    }

    #[test]
    fn malformed_entries_are_dropped_individually() {
        let q: MistakeQueue = serde_json::from_str(
            r#"[
                { "handKey": "hard_16_10", "consecutiveCorrect": null,
                  "lastShownAt": 4, "addedAt": 2 },
                { "consecutiveCorrect": 1 },
                { "handKey": "hard_15_10", "consecutiveCorrect": 2,
                  "lastShownAt": 6, "addedAt": 3 }
            ]"#,
        )
        .unwrap();
        assert_eq!(q.len(), 2);
        let e = q.get(&key(16)).unwrap();
        assert_eq!((e.consecutive_correct, e.last_shown_at, e.added_at), (0, 4, 2));
        assert_eq!(q.get(&key(15)).unwrap().consecutive_correct, 2);
    }

    #[test]
    fn unknown_keys_are_skipped() {
        let policy = QueuePolicy::default();
        let universe = HandUniverse::build();
        let mut q = MistakeQueue::new();
        q.record(&ItemKey::new(HandCategory::Hard(30), CardValue::Two), false, false, 1, &policy);
        assert!(q.next_due(&universe, None, 10, &policy).is_none());
    }
}
