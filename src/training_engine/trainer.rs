//! The drill controller: owns the stats record, the mistake queue and the
//! session, and exposes the operations a presentation layer calls.
//!
//! All mutable state lives in one [`TrainerState`]. Hosts with several
//! concurrent callers wrap the whole trainer in a single mutex
//! ([`SharedTrainer`]); there is no finer-grained locking.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rand::{rngs::StdRng, SeedableRng};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::training_engine::{
    config::TrainerConfig,
    deck,
    mistake_queue::{select_next, QueuePolicy},
    models::{
        Action, GradeResult, ItemKey, LifetimeStats, PresentedItem, QueueEntryView,
        QueueStats, QueueTransition, SessionStats, TrainingMode, WeakSpot,
    },
    stats::{self, StoredStats, Verdict},
    store::StatsStore,
    strategy,
    universe::HandUniverse,
};

#[derive(Error, Debug)]
pub enum TrainerError {
    /// The strategy table has no cell for a universe item: the constants are
    /// out of sync. Aborts the current draw only.
    #[error("no strategy entry for {key}")]
    NoStrategyEntry { key: ItemKey },

    #[error("{action} is not available for {key}")]
    ActionUnavailable { action: Action, key: ItemKey },

    #[error("{key} is still awaiting an answer")]
    ItemPending { key: ItemKey },

    #[error("no item is awaiting an answer")]
    NoLiveItem,

    #[error("hand universe is empty")]
    EmptyUniverse,

    #[error("invalid trainer config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type TrainerResult<T> = Result<T, TrainerError>;

/// Per-run counters; reset on explicit reset, never persisted.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub streak: u32,
    pub session_correct: u32,
    pub session_total: u32,
    /// The drawn item awaiting an answer, if any.
    pub current_item: Option<PresentedItem>,
    pub last_result: Option<GradeResult>,
}

/// Everything the trainer mutates.
#[derive(Debug, Clone, Default)]
pub struct TrainerState {
    pub stats: StoredStats,
    pub session: SessionState,
    pub hands_since_queue_serve: u32,
    /// Logical clock for queue timestamps.
    pub clock: u64,
    pub last_key: Option<ItemKey>,
}

impl TrainerState {
    pub fn from_stats(stats: StoredStats) -> Self {
        let clock = stats.mistake_queue.latest_tick();
        TrainerState { stats, clock, ..TrainerState::default() }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Book-keeping for a drawn item.
    pub fn apply_draw(&mut self, key: &ItemKey, served_from_queue: bool) {
        if served_from_queue {
            self.hands_since_queue_serve = 0;
        } else {
            self.hands_since_queue_serve = self.hands_since_queue_serve.saturating_add(1);
        }
        self.last_key = Some(key.clone());
    }

    /// Fold a verdict into streak, session, lifetime counters and the queue.
    /// Returns the new streak and the queue transition.
    pub fn apply_grade(
        &mut self,
        key: &ItemKey,
        verdict: &Verdict,
        served_from_queue: bool,
        response_time_ms: u64,
        policy: &QueuePolicy,
    ) -> (u32, QueueTransition) {
        let session = &mut self.session;
        if verdict.is_correct {
            session.streak += 1;
            session.session_correct += 1;
        } else {
            session.streak = 0;
        }
        session.session_total += 1;
        let streak = session.streak;

        self.stats.record(key, verdict.is_correct, response_time_ms, streak);

        let now = self.tick();
        let transition = self
            .stats
            .mistake_queue
            .record(key, verdict.is_correct, served_from_queue, now, policy);
        (streak, transition)
    }
}

pub type SharedTrainer<S> = Arc<Mutex<Trainer<S>>>;

pub struct Trainer<S: StatsStore> {
    config: TrainerConfig,
    universe: &'static HandUniverse,
    rng: StdRng,
    mode: TrainingMode,
    state: TrainerState,
    drawn_at: Option<Instant>,
    store: S,
}

impl<S: StatsStore> Trainer<S> {
    /// Build a trainer and load the stats record from `store`. A missing or
    /// unparseable record starts from zero; a bad field inside an otherwise
    /// valid record defaults on its own.
    pub fn new(config: TrainerConfig, mut store: S) -> Self {
        let stats = match store.load() {
            Ok(Some(stats)) => stats,
            Ok(None) => StoredStats::default(),
            Err(e) => {
                warn!(error = %e, "could not load stats record, starting fresh");
                StoredStats::default()
            }
        };
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Trainer {
            mode: config.mode,
            config,
            universe: HandUniverse::shared(),
            rng,
            state: TrainerState::from_stats(stats),
            drawn_at: None,
            store,
        }
    }

    pub fn from_json_config(json: &str, store: S) -> TrainerResult<Self> {
        let config = TrainerConfig::from_json_str(json)?;
        Ok(Self::new(config, store))
    }

    pub fn shared(self) -> SharedTrainer<S> {
        Arc::new(Mutex::new(self))
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn state(&self) -> &TrainerState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mode(&self) -> TrainingMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: TrainingMode) {
        debug!(%mode, "training mode changed");
        self.mode = mode;
    }

    /// The item awaiting an answer, if any.
    pub fn current(&self) -> Option<&PresentedItem> {
        self.state.session.current_item.as_ref()
    }

    /// Draw the next item in `mode`. Fails while a previous item is still
    /// awaiting an answer; call [`Trainer::abandon`] first to skip it.
    pub fn next_item(&mut self, mode: TrainingMode) -> TrainerResult<PresentedItem> {
        if let Some(live) = &self.state.session.current_item {
            return Err(TrainerError::ItemPending { key: live.key.clone() });
        }
        self.mode = mode;

        let policy = self.config.queue_policy();
        let (item, served_from_queue) = select_next(
            &mut self.rng,
            self.universe,
            mode,
            &self.state.stats.mistake_queue,
            self.state.last_key.as_ref(),
            self.state.hands_since_queue_serve,
            &policy,
            self.config.max_redraws,
        )
        .ok_or(TrainerError::EmptyUniverse)?;

        let key = item.key();
        let rules = self.config.house_rules;
        let resolved = strategy::resolve(item.category, item.dealer_upcard, &rules);
        let Some(correct_action) = resolved else {
            error!(%key, "strategy table has no entry for drill item");
            return Err(TrainerError::NoStrategyEntry { key });
        };

        self.state.apply_draw(&key, served_from_queue);
        let presented = PresentedItem {
            cards: deck::deal_for(&mut self.rng, &item),
            available_actions: rules.available_actions(item.category),
            correct_action,
            served_from_queue,
            key,
            item,
        };
        debug!(key = %presented.key, served_from_queue, %mode, "drew drill item");

        self.state.session.current_item = Some(presented.clone());
        self.state.session.last_result = None;
        self.drawn_at = Some(Instant::now());
        Ok(presented)
    }

    /// Discard the live item without grading it.
    pub fn abandon(&mut self) -> Option<PresentedItem> {
        self.drawn_at = None;
        let dropped = self.state.session.current_item.take();
        if let Some(item) = &dropped {
            debug!(key = %item.key, "abandoned drill item");
        }
        dropped
    }

    /// Grade `action` against the live item, timing from the draw.
    pub fn submit(&mut self, action: Action) -> TrainerResult<GradeResult> {
        let elapsed = self.drawn_at.map(|t| t.elapsed()).unwrap_or_default();
        self.submit_timed(action, elapsed)
    }

    /// Grade `action` with an explicit response time.
    ///
    /// An action outside the item's available set is rejected with no state
    /// change.
    pub fn submit_timed(
        &mut self,
        action: Action,
        elapsed: Duration,
    ) -> TrainerResult<GradeResult> {
        let live = self.state.session.current_item.as_ref().ok_or(TrainerError::NoLiveItem)?;
        if !live.available_actions.contains(&action) {
            debug!(key = %live.key, %action, "rejected unavailable action");
            return Err(TrainerError::ActionUnavailable { action, key: live.key.clone() });
        }
        let live = self.state.session.current_item.take().ok_or(TrainerError::NoLiveItem)?;
        self.drawn_at = None;

        let response_time_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let verdict = stats::grade(&live.key, live.correct_action, action);
        let policy = self.config.queue_policy();
        let (streak, transition) = self.state.apply_grade(
            &live.key,
            &verdict,
            live.served_from_queue,
            response_time_ms,
            &policy,
        );

        match transition {
            QueueTransition::Graduated => {
                info!(key = %live.key, "item graduated from mistake queue")
            }
            QueueTransition::Inserted => debug!(key = %live.key, "item added to mistake queue"),
            _ => {}
        }
        debug!(
            key = %live.key,
            %action,
            correct = verdict.is_correct,
            response_time_ms,
            "graded answer"
        );

        let session = &self.state.session;
        let session_accuracy =
            stats::percent(session.session_correct as u64, session.session_total as u64);
        let result = GradeResult {
            is_correct: verdict.is_correct,
            user_action: action,
            correct_action: verdict.correct_action,
            explanation: verdict.explanation,
            response_time_ms,
            streak,
            session_accuracy,
            served_from_queue: live.served_from_queue,
            queue: transition,
        };
        self.state.session.last_result = Some(result.clone());
        self.persist();
        Ok(result)
    }

    /// Clear lifetime stats, the queue and the session, and save the empty
    /// record.
    pub fn reset(&mut self) {
        self.state = TrainerState::default();
        self.drawn_at = None;
        self.persist();
        info!("trainer stats reset");
    }

    pub fn session_stats(&self) -> SessionStats {
        let s = &self.state.session;
        SessionStats {
            total: s.session_total,
            correct: s.session_correct,
            accuracy: stats::percent(s.session_correct as u64, s.session_total as u64),
            streak: s.streak,
            best_streak: self.state.stats.best_streak,
        }
    }

    pub fn lifetime_stats(&self) -> LifetimeStats {
        self.state.stats.lifetime()
    }

    pub fn weak_spots(&self, min_attempts: u64, limit: usize) -> Vec<WeakSpot> {
        self.state.stats.weak_spots(min_attempts, limit)
    }

    pub fn queue_stats(&self) -> QueueStats {
        let threshold = self.config.queue_policy().graduation_threshold;
        let entries: Vec<QueueEntryView> = self
            .state
            .stats
            .mistake_queue
            .entries()
            .iter()
            .map(|e| QueueEntryView {
                key: e.key.clone(),
                label: e.key.label(),
                consecutive_correct: e.consecutive_correct,
                remaining: threshold.saturating_sub(e.consecutive_correct),
            })
            .collect();
        QueueStats { count: entries.len(), entries }
    }

    // Fire-and-forget: a failed save never blocks the next draw.
    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.state.stats) {
            warn!(error = %e, "failed to save stats record");
        }
    }
}
