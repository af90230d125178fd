use serde::{Deserialize, Serialize};

use crate::training_engine::{
    mistake_queue::{
        QueuePolicy, GRADUATION_THRESHOLD, MAX_QUEUE_SIZE, MIN_GAP_BETWEEN_QUEUE_SERVES,
    },
    models::{HouseRules, TrainingMode},
};

/// Trainer settings. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrainerConfig {
    pub house_rules: HouseRules,
    pub mode: TrainingMode,
    pub graduation_threshold: u32,
    pub min_gap_between_queue_serves: u32,
    pub max_queue_size: usize,
    /// Extra draws spent avoiding a back-to-back repeat.
    pub max_redraws: u32,
    /// `Some` makes every draw and deal reproducible.
    pub rng_seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            house_rules: HouseRules::default(),
            mode: TrainingMode::default(),
            graduation_threshold: GRADUATION_THRESHOLD,
            min_gap_between_queue_serves: MIN_GAP_BETWEEN_QUEUE_SERVES,
            max_queue_size: MAX_QUEUE_SIZE,
            max_redraws: 8,
            rng_seed: None,
        }
    }
}

impl TrainerConfig {
    /// Default config with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        TrainerConfig { rng_seed: Some(seed), ..Self::default() }
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn queue_policy(&self) -> QueuePolicy {
        QueuePolicy {
            graduation_threshold: self.graduation_threshold.max(1),
            min_gap: self.min_gap_between_queue_serves,
            max_size: self.max_queue_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default() {
        assert_eq!(TrainerConfig::from_json_str("{}").unwrap(), TrainerConfig::default());
    }

    #[test]
    fn partial_json_overrides_fields() {
        let cfg = TrainerConfig::from_json_str(
            r#"{"mode": "critical", "houseRules": {"surrenderAllowed": false}, "rngSeed": 9}"#,
        )
        .unwrap();
        assert_eq!(cfg.mode, TrainingMode::Critical);
        assert!(!cfg.house_rules.surrender_allowed);
        assert!(cfg.house_rules.double_after_split);
        assert_eq!(cfg.rng_seed, Some(9));
        assert_eq!(cfg.graduation_threshold, 3);
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(TrainerConfig::from_json_str(r#"{"mode": "turbo"}"#).is_err());
    }
}
