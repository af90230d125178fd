//! Weighted draw over the hand universe.
//!
//! Each mode rescales an item's base weight by a per-weight multiplier:
//!
//! | Mode     | w=1 | w=2 | w=3 | w=4 | w=5 |
//! |----------|-----|-----|-----|-----|-----|
//! | Critical | 0   | 0.5 | 1   | 2   | 5   |
//! | Hard     | 0.5 | 1   | 2   | 3   | 4   |
//! | Balanced | 1   | 1.5 | 2   | 2.5 | 3   |
//!
//! `Random` ignores base weight entirely and draws uniformly.

use rand::Rng;
use crate::training_engine::models::{DrillItem, ItemKey, TrainingMode};

fn multipliers(mode: TrainingMode) -> [f64; 5] {
    match mode {
        TrainingMode::Critical => [0.0, 0.5, 1.0, 2.0, 5.0],
        TrainingMode::Hard     => [0.5, 1.0, 2.0, 3.0, 4.0],
        TrainingMode::Balanced => [1.0, 1.5, 2.0, 2.5, 3.0],
        TrainingMode::Random   => [1.0; 5],
    }
}

/// Selection mass of an item with `base_weight` under `mode`.
pub fn adjusted_weight(mode: TrainingMode, base_weight: u8) -> f64 {
    if mode == TrainingMode::Random {
        return 1.0;
    }
    let idx = base_weight.clamp(1, 5) as usize - 1;
    base_weight as f64 * multipliers(mode)[idx]
}

/// One weighted draw with no repeat avoidance. `None` only for an empty slice.
pub fn draw_once<'a, R: Rng>(
    rng: &mut R,
    items: &'a [DrillItem],
    mode: TrainingMode,
) -> Option<&'a DrillItem> {
    if items.is_empty() {
        return None;
    }

    let weights: Vec<f64> = items.iter().map(|i| adjusted_weight(mode, i.base_weight)).collect();
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Some(&items[rng.gen_range(0..items.len())]);
    }

    let mut remaining = rng.gen::<f64>() * total;
    let mut last_positive = None;
    for (item, &w) in items.iter().zip(&weights) {
        if w <= 0.0 {
            continue;
        }
        remaining -= w;
        if remaining <= 0.0 {
            return Some(item);
        }
        last_positive = Some(item);
    }
    // Float rounding can leave a sliver of mass after the walk.
    last_positive
}

/// Weighted draw that tries to avoid returning `exclude`.
///
/// Repeat avoidance is best-effort: after `max_redraws` extra attempts a
/// repeat is accepted, which is the only outcome when the mode leaves a single
/// item with positive weight.
pub fn draw<'a, R: Rng>(
    rng: &mut R,
    items: &'a [DrillItem],
    mode: TrainingMode,
    exclude: Option<&ItemKey>,
    max_redraws: u32,
) -> Option<&'a DrillItem> {
    let mut picked = draw_once(rng, items, mode)?;
    let Some(excluded) = exclude else {
        return Some(picked);
    };
    if items.len() < 2 {
        return Some(picked);
    }
    let mut attempts = 0;
    while picked.key() == *excluded && attempts < max_redraws {
        picked = draw_once(rng, items, mode)?;
        attempts += 1;
    }
    Some(picked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training_engine::{
        models::{CardValue, HandCategory},
        universe::{build_universe, UNIVERSE_SIZE},
    };
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn random_mode_is_uniform() {
        let items = build_universe();
        let mut rng = StdRng::seed_from_u64(7);
        let draws = 100_000usize;
        let mut counts: HashMap<ItemKey, usize> = HashMap::new();
        for _ in 0..draws {
            let item = draw_once(&mut rng, &items, TrainingMode::Random).unwrap();
            *counts.entry(item.key()).or_default() += 1;
        }
        assert_eq!(counts.len(), UNIVERSE_SIZE, "every item should appear");
        let expected = draws as f64 / UNIVERSE_SIZE as f64;
        for (key, &n) in &counts {
            let ratio = n as f64 / expected;
            assert!(
                (0.7..=1.3).contains(&ratio),
                "{key} drawn {n} times, expected about {expected:.0}"
            );
        }

        // 349 degrees of freedom: mean 349, sd about 26.4.
        let chi2: f64 = counts
            .values()
            .map(|&n| (n as f64 - expected).powi(2) / expected)
            .sum();
        assert!(chi2 < 480.0, "chi-square {chi2:.1} over 349 degrees of freedom");
    }

    #[test]
    fn critical_mode_never_draws_trivial_items() {
        let items = build_universe();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20_000 {
            let item = draw_once(&mut rng, &items, TrainingMode::Critical).unwrap();
            assert_ne!(item.base_weight, 1, "critical drew trivial {}", item.key());
        }
    }

    #[test]
    fn critical_weights_scale_weight_five_by_five() {
        assert_eq!(adjusted_weight(TrainingMode::Critical, 5), 25.0);
        assert_eq!(adjusted_weight(TrainingMode::Critical, 1), 0.0);
        assert_eq!(adjusted_weight(TrainingMode::Balanced, 2), 3.0);
        assert_eq!(adjusted_weight(TrainingMode::Random, 5), 1.0);
    }

    #[test]
    fn all_zero_weights_fall_back_to_uniform() {
        let items: Vec<DrillItem> = build_universe()
            .into_iter()
            .filter(|i| i.base_weight == 1)
            .collect();
        let mut rng = StdRng::seed_from_u64(3);
        let item = draw_once(&mut rng, &items, TrainingMode::Critical);
        assert!(item.is_some());
    }

    #[test]
    fn empty_slice_draws_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(draw_once(&mut rng, &[], TrainingMode::Balanced).is_none());
    }

    #[test]
    fn exclude_avoids_back_to_back_repeat() {
        let items: Vec<DrillItem> = build_universe().into_iter().take(2).collect();
        let excluded = items[0].key();
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let item = draw(&mut rng, &items, TrainingMode::Random, Some(&excluded), 32).unwrap();
            assert_ne!(item.key(), excluded);
        }
    }

    #[test]
    fn exclude_accepts_repeat_when_only_one_choice() {
        let items = vec![DrillItem {
            category: HandCategory::Hard(16),
            dealer_upcard: CardValue::Ten,
            base_weight: 5,
            hint: None,
        }];
        let excluded = items[0].key();
        let mut rng = StdRng::seed_from_u64(5);
        let item = draw(&mut rng, &items, TrainingMode::Critical, Some(&excluded), 8).unwrap();
        assert_eq!(item.key(), excluded);
    }

    #[test]
    fn seeded_draws_are_deterministic() {
        let items = build_universe();
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..20)
                .map(|_| draw_once(&mut rng, &items, TrainingMode::Balanced).unwrap().key())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
