//! Core drill engine: strategy lookup, item selection, grading and the
//! spaced-repetition queue.
//!
//! ## Module overview
//!
//! | Module          | Purpose |
//! |-----------------|---------|
//! | `models`        | All shared types: cards, hand categories, actions, results |
//! | `strategy`      | Basic-strategy tables and house-rule resolution |
//! | `universe`      | The 350 drill cells with their base weights and hints |
//! | `sampler`       | Mode-weighted draw with best-effort repeat avoidance |
//! | `mistake_queue` | Missed-item queue: due selection and graduation |
//! | `stats`         | Grading, per-item counters, weak spots, persisted record |
//! | `deck`          | Concrete cards for a drill item |
//! | `config`        | Trainer settings |
//! | `store`         | Storage collaborator trait and two stores |
//! | `trainer`       | The controller behind every caller-facing operation |

pub mod config;
pub mod deck;
pub mod mistake_queue;
pub mod models;
pub mod sampler;
pub mod stats;
pub mod store;
pub mod strategy;
pub mod trainer;
pub mod universe;

// Re-export the public API surface so callers can use
// `training_engine::Trainer` without reaching into sub-modules.
pub use config::TrainerConfig;
pub use mistake_queue::{MistakeQueue, MistakeQueueEntry, QueuePolicy};
pub use models::{
    Action, Card, CardValue, DealtHand, DrillItem, GradeResult, HandCategory, HouseRules,
    ItemKey, LifetimeStats, PresentedItem, QueueEntryView, QueueStats, QueueTransition,
    RawAction, SessionStats, TrainingMode, WeakSpot,
};
pub use stats::{ItemStats, StoredStats};
pub use store::{JsonFileStore, MemoryStore, StatsStore, StoreError};
pub use trainer::{SharedTrainer, Trainer, TrainerError, TrainerResult};
pub use universe::{HandUniverse, UNIVERSE_SIZE};
