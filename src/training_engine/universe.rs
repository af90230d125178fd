//! Every drill cell (hand category × dealer upcard) with its base weight.
//!
//! Weight scale:
//!
//! | Weight | Meaning |
//! |--------|---------|
//! | 5 | Critical: most commonly missed, costs the most money |
//! | 4 | Hard: counter-intuitive or emotionally difficult |
//! | 3 | Moderate: needs memorisation |
//! | 2 | Easy: clear decisions |
//! | 1 | Trivial: obvious plays |

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::training_engine::{
    models::{CardValue, DrillItem, HandCategory, ItemKey},
    strategy::{HARD_MAX, HARD_MIN, SOFT_MAX, SOFT_MIN},
};
use crate::training_engine::models::CardValue::{
    Ace as A, Eight as C8, Five as C5, Four as C4, Nine as C9, Seven as C7, Six as C6,
    Ten as C10, Three as C3, Two as C2,
};

/// 17 hard totals + 8 soft totals + 10 pairs, each against 10 upcards.
pub const UNIVERSE_SIZE: usize = 350;

/// Curated weights for commonly misplayed cells.
const OVERRIDES: &[(HandCategory, CardValue, u8, &str)] = &[
    // Critical
    (HandCategory::Soft(7), C9,  5, "HIT soft 18 vs 9!"),
    (HandCategory::Soft(7), C10, 5, "HIT soft 18 vs 10!"),
    (HandCategory::Soft(7), A,   5, "HIT soft 18 vs Ace!"),
    (HandCategory::Hard(12), C2, 5, "HIT 12 vs 2!"),
    (HandCategory::Hard(12), C3, 5, "HIT 12 vs 3!"),
    (HandCategory::Hard(16), C9,  5, "SURRENDER 16 vs 9!"),
    (HandCategory::Hard(16), C10, 5, "SURRENDER 16 vs 10!"),
    (HandCategory::Hard(16), A,   5, "SURRENDER 16 vs Ace!"),
    (HandCategory::Pair(C8), C10, 5, "SPLIT 8s vs 10!"),
    (HandCategory::Pair(C8), A,   5, "SPLIT 8s vs Ace!"),
    (HandCategory::Pair(C9), C7,  5, "STAND with 9s vs 7!"),
    (HandCategory::Hard(11), A,   5, "HIT 11 vs Ace (6-deck)!"),
    // Hard
    (HandCategory::Hard(15), C10, 4, "SURRENDER 15 vs 10!"),
    (HandCategory::Hard(15), A,   4, "SURRENDER 15 vs Ace!"),
    (HandCategory::Hard(17), A,   4, "SURRENDER 17 vs Ace!"),
    (HandCategory::Soft(7), C2, 4, "DOUBLE soft 18 vs 2!"),
    (HandCategory::Soft(7), C3, 4, "DOUBLE soft 18 vs 3!"),
    (HandCategory::Soft(7), C4, 4, "DOUBLE soft 18 vs 4!"),
    (HandCategory::Soft(7), C5, 4, "DOUBLE soft 18 vs 5!"),
    (HandCategory::Soft(7), C6, 4, "DOUBLE soft 18 vs 6!"),
    (HandCategory::Hard(9), C2,   4, "HIT 9 vs 2!"),
    (HandCategory::Hard(10), C10, 4, "HIT 10 vs 10!"),
    (HandCategory::Hard(10), A,   4, "HIT 10 vs Ace!"),
    // Moderate
    (HandCategory::Soft(8), C6, 3, "DOUBLE soft 19 vs 6!"),
    (HandCategory::Soft(6), C3, 3, "DOUBLE soft 17 vs 3!"),
    (HandCategory::Soft(6), C4, 3, "DOUBLE soft 17 vs 4!"),
    (HandCategory::Soft(6), C5, 3, "DOUBLE soft 17 vs 5!"),
    (HandCategory::Soft(6), C6, 3, "DOUBLE soft 17 vs 6!"),
    (HandCategory::Pair(C9), C9,  3, "SPLIT 9s vs 9!"),
    (HandCategory::Pair(C9), C10, 3, "STAND with 9s vs 10!"),
    (HandCategory::Pair(C9), A,   3, "STAND with 9s vs Ace!"),
    (HandCategory::Pair(C6), C2, 3, "SPLIT 6s vs 2 (DAS)!"),
    (HandCategory::Pair(C4), C5, 3, "SPLIT 4s vs 5 (DAS)!"),
    (HandCategory::Pair(C4), C6, 3, "SPLIT 4s vs 6 (DAS)!"),
];

/// Weight for cells without a curated entry.
fn default_weight(category: HandCategory, upcard: CardValue) -> u8 {
    match category {
        HandCategory::Hard(total) if total >= 17 && upcard != CardValue::Ace => 1, // always stand
        HandCategory::Hard(total) if total <= 8 => 1,                             // always hit
        HandCategory::Hard(11) if upcard != CardValue::Ace => 1,                  // always double
        // Always-split / never-split pairs land on the same weight as the rest.
        _ => 2,
    }
}

fn make_item(category: HandCategory, upcard: CardValue) -> DrillItem {
    let curated = OVERRIDES
        .iter()
        .find(|(c, u, _, _)| *c == category && *u == upcard);
    match curated {
        Some(&(_, _, weight, hint)) => DrillItem {
            category,
            dealer_upcard: upcard,
            base_weight: weight,
            hint: Some(hint.to_string()),
        },
        None => DrillItem {
            category,
            dealer_upcard: upcard,
            base_weight: default_weight(category, upcard),
            hint: None,
        },
    }
}

/// All cells in stable order: hard 5..=21, soft A,2..=A,9, pairs 2,2..=A,A;
/// within each row the upcards run 2..=10, A.
pub fn build_universe() -> Vec<DrillItem> {
    let hard = (HARD_MIN..=HARD_MAX).map(HandCategory::Hard);
    let soft = (SOFT_MIN..=SOFT_MAX).map(HandCategory::Soft);
    let pairs = CardValue::ALL.into_iter().map(HandCategory::Pair);

    hard.chain(soft)
        .chain(pairs)
        .flat_map(|category| CardValue::ALL.into_iter().map(move |up| make_item(category, up)))
        .collect()
}

/// The enumerated universe plus a key index for resolving queue entries.
#[derive(Debug, Clone)]
pub struct HandUniverse {
    items: Vec<DrillItem>,
    index: HashMap<ItemKey, usize>,
}

impl HandUniverse {
    pub fn build() -> Self {
        let items = build_universe();
        let index = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.key(), i))
            .collect();
        HandUniverse { items, index }
    }

    /// Process-wide instance, built on first use.
    pub fn shared() -> &'static HandUniverse {
        static UNIVERSE: OnceLock<HandUniverse> = OnceLock::new();
        UNIVERSE.get_or_init(HandUniverse::build)
    }

    pub fn items(&self) -> &[DrillItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, key: &ItemKey) -> Option<&DrillItem> {
        self.index.get(key).map(|&i| &self.items[i])
    }

    pub fn contains(&self, key: &ItemKey) -> bool {
        self.index.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn universe_has_every_cell_once() {
        let items = build_universe();
        assert_eq!(items.len(), UNIVERSE_SIZE);
        let keys: HashSet<ItemKey> = items.iter().map(DrillItem::key).collect();
        assert_eq!(keys.len(), UNIVERSE_SIZE);
    }

    #[test]
    fn enumeration_order_is_hard_soft_pairs() {
        let items = build_universe();
        assert_eq!(items[0].category, HandCategory::Hard(5));
        assert_eq!(items[0].dealer_upcard, CardValue::Two);
        assert_eq!(items[169].category, HandCategory::Hard(21));
        assert_eq!(items[169].dealer_upcard, CardValue::Ace);
        assert_eq!(items[170].category, HandCategory::Soft(2));
        assert_eq!(items[250].category, HandCategory::Pair(CardValue::Two));
        assert_eq!(items[349].category, HandCategory::Pair(CardValue::Ace));
    }

    #[test]
    fn build_is_deterministic() {
        assert_eq!(build_universe(), build_universe());
    }

    #[test]
    fn curated_cells_carry_weight_and_hint() {
        let u = HandUniverse::build();
        let soft18_vs_9 = u.get(&ItemKey::new(HandCategory::Soft(7), CardValue::Nine)).unwrap();
        assert_eq!(soft18_vs_9.base_weight, 5);
        assert_eq!(soft18_vs_9.hint.as_deref(), Some("HIT soft 18 vs 9!"));
    }

    #[test]
    fn default_weights_follow_triviality() {
        let u = HandUniverse::build();
        let w = |c, up| u.get(&ItemKey::new(c, up)).unwrap().base_weight;
        assert_eq!(w(HandCategory::Hard(19), CardValue::Ten), 1);
        assert_eq!(w(HandCategory::Hard(6), CardValue::Five), 1);
        assert_eq!(w(HandCategory::Hard(11), CardValue::Six), 1);
        assert_eq!(w(HandCategory::Hard(18), CardValue::Ace), 2);
        assert_eq!(w(HandCategory::Pair(CardValue::Ace), CardValue::Seven), 2);
        assert_eq!(w(HandCategory::Hard(13), CardValue::Four), 2);
    }

    #[test]
    fn weights_are_in_range() {
        assert!(build_universe().iter().all(|i| (1..=5).contains(&i.base_weight)));
    }
}
