//! # blackjack_drill
//!
//! A basic-strategy drill trainer for blackjack, without any UI.
//!
//! The crate decides which hand to show next, grades the answer against a
//! fixed basic-strategy chart (6 decks, dealer stands on soft 17) and keeps
//! missed hands in a spaced-repetition queue until they are answered right
//! three times in a row.
//!
//! ## How it works
//!
//! 1. Build a [`Trainer`] from a [`TrainerConfig`] and a [`StatsStore`]. The
//!    stored record (lifetime counters plus the mistake queue) is read once.
//! 2. Call [`Trainer::next_item`]. A due mistake-queue entry is served first;
//!    otherwise a hand is drawn from the 350-cell universe, weighted by the
//!    [`TrainingMode`].
//! 3. Call [`Trainer::submit`] with the player's [`Action`]. The result says
//!    whether it was right, why, and what happened to the queue. The full
//!    record is written back to the store.
//!
//! ## Key features
//!
//! - **Deterministic**: `rng_seed: Some(u64)` reproduces every draw and deal.
//! - **House rules**: double, double-after-split and surrender flags change
//!   the correct answer for the conditional chart cells.
//! - **Item keys**: each hand has a stable [`ItemKey`] such as `soft_A,7_9`,
//!   shared by the queue, the counters and the stored record.
//!
//! ## Quick start
//!
//! ```rust
//! use blackjack_drill::{MemoryStore, Trainer, TrainerConfig, TrainingMode};
//!
//! let mut trainer = Trainer::new(TrainerConfig::seeded(42), MemoryStore::new());
//!
//! let hand = trainer.next_item(TrainingMode::Critical).unwrap();
//! println!("{} (dealer shows {})", hand.item.category, hand.item.dealer_upcard);
//!
//! let result = trainer.submit(hand.correct_action).unwrap();
//! assert!(result.is_correct);
//! println!("{}", result.explanation);
//!
//! assert_eq!(trainer.lifetime_stats().total_hands, 1);
//! ```

pub mod client;
pub mod training_engine;

// Convenience re-exports so callers can use `blackjack_drill::Trainer`
// directly without reaching into `training_engine::`.
pub use training_engine::{
    Action, CardValue, DrillItem, GradeResult, HandCategory, HouseRules, ItemKey,
    JsonFileStore, MemoryStore, PresentedItem, SharedTrainer, StatsStore, StoredStats,
    Trainer, TrainerConfig, TrainerError, TrainingMode,
};
