//! Basic strategy for 6 decks, dealer stands on soft 17.
//!
//! Three fixed tables (hard totals, soft totals, pairs), each row indexed by
//! [`CardValue::index`] of the dealer upcard. Conditional symbols are resolved
//! against [`HouseRules`] by [`resolve_raw`].

use crate::training_engine::models::{
    Action, CardValue, HandCategory, HouseRules, ItemKey, RawAction,
};

const H: RawAction = RawAction::Hit;
const S: RawAction = RawAction::Stand;
const D: RawAction = RawAction::DoubleOrHit;
const DS: RawAction = RawAction::DoubleOrStand;
const P: RawAction = RawAction::Split;
const PH: RawAction = RawAction::SplitIfDas;
const RH: RawAction = RawAction::SurrenderOrHit;
const RS: RawAction = RawAction::SurrenderOrStand;
const RP: RawAction = RawAction::SurrenderOrSplit;

pub const HARD_MIN: u8 = 5;
pub const HARD_MAX: u8 = 21;
pub const SOFT_MIN: u8 = 2;
pub const SOFT_MAX: u8 = 9;

// Hard totals 5..=21.
//                          2   3   4   5   6   7   8   9  10   A
const HARD: [[RawAction; 10]; 17] = [
    /*  5 */ [H,  H,  H,  H,  H,  H,  H,  H,  H,  H],
    /*  6 */ [H,  H,  H,  H,  H,  H,  H,  H,  H,  H],
    /*  7 */ [H,  H,  H,  H,  H,  H,  H,  H,  H,  H],
    /*  8 */ [H,  H,  H,  H,  H,  H,  H,  H,  H,  H],
    /*  9 */ [H,  D,  D,  D,  D,  H,  H,  H,  H,  H],
    /* 10 */ [D,  D,  D,  D,  D,  D,  D,  D,  H,  H],
    /* 11 */ [D,  D,  D,  D,  D,  D,  D,  D,  D,  H],
    /* 12 */ [H,  H,  S,  S,  S,  H,  H,  H,  H,  H],
    /* 13 */ [S,  S,  S,  S,  S,  H,  H,  H,  H,  H],
    /* 14 */ [S,  S,  S,  S,  S,  H,  H,  H,  H,  H],
    /* 15 */ [S,  S,  S,  S,  S,  H,  H,  H,  RH, RH],
    /* 16 */ [S,  S,  S,  S,  S,  H,  H,  RH, RH, RH],
    /* 17 */ [S,  S,  S,  S,  S,  S,  S,  S,  S,  RS],
    /* 18 */ [S,  S,  S,  S,  S,  S,  S,  S,  S,  S],
    /* 19 */ [S,  S,  S,  S,  S,  S,  S,  S,  S,  S],
    /* 20 */ [S,  S,  S,  S,  S,  S,  S,  S,  S,  S],
    /* 21 */ [S,  S,  S,  S,  S,  S,  S,  S,  S,  S],
];

// Ace + 2..=9.
//                            2   3   4   5   6   7   8   9  10   A
const SOFT: [[RawAction; 10]; 8] = [
    /* A,2 */ [H,  H,  H,  D,  D,  H,  H,  H,  H,  H],
    /* A,3 */ [H,  H,  H,  D,  D,  H,  H,  H,  H,  H],
    /* A,4 */ [H,  H,  D,  D,  D,  H,  H,  H,  H,  H],
    /* A,5 */ [H,  H,  D,  D,  D,  H,  H,  H,  H,  H],
    /* A,6 */ [H,  D,  D,  D,  D,  H,  H,  H,  H,  H],
    /* A,7 */ [DS, DS, DS, DS, DS, S,  S,  H,  H,  H],
    /* A,8 */ [S,  S,  S,  S,  DS, S,  S,  S,  S,  S],
    /* A,9 */ [S,  S,  S,  S,  S,  S,  S,  S,  S,  S],
];

// Rows follow CardValue order: 2,2 .. 9,9, T,T, A,A.
//                            2   3   4   5   6   7   8   9  10   A
const PAIRS: [[RawAction; 10]; 10] = [
    /* 2,2 */ [PH, PH, P,  P,  P,  P,  H,  H,  H,  H],
    /* 3,3 */ [PH, PH, P,  P,  P,  P,  H,  H,  H,  H],
    /* 4,4 */ [H,  H,  H,  PH, PH, H,  H,  H,  H,  H],
    /* 5,5 */ [D,  D,  D,  D,  D,  D,  D,  D,  H,  H],
    /* 6,6 */ [PH, P,  P,  P,  P,  H,  H,  H,  H,  H],
    /* 7,7 */ [P,  P,  P,  P,  P,  P,  H,  H,  H,  H],
    /* 8,8 */ [P,  P,  P,  P,  P,  P,  P,  P,  P,  RP],
    /* 9,9 */ [P,  P,  P,  P,  P,  S,  P,  P,  S,  S],
    /* T,T */ [S,  S,  S,  S,  S,  S,  S,  S,  S,  S],
    /* A,A */ [P,  P,  P,  P,  P,  P,  P,  P,  P,  P],
];

/// Raw table symbol for a cell, or `None` outside the table's domain.
pub fn lookup(category: HandCategory, upcard: CardValue) -> Option<RawAction> {
    let col = upcard.index();
    match category {
        HandCategory::Hard(total) if (HARD_MIN..=HARD_MAX).contains(&total) => {
            Some(HARD[(total - HARD_MIN) as usize][col])
        }
        HandCategory::Soft(other) if (SOFT_MIN..=SOFT_MAX).contains(&other) => {
            Some(SOFT[(other - SOFT_MIN) as usize][col])
        }
        HandCategory::Pair(rank) => Some(PAIRS[rank.index()][col]),
        _ => None,
    }
}

/// Collapse a conditional symbol to the action allowed under `rules`.
pub fn resolve_raw(raw: RawAction, rules: &HouseRules) -> Action {
    match raw {
        RawAction::Hit => Action::Hit,
        RawAction::Stand => Action::Stand,
        RawAction::Split => Action::Split,
        RawAction::DoubleOrHit => {
            if rules.double_allowed {
                Action::Double
            } else {
                Action::Hit
            }
        }
        RawAction::DoubleOrStand => {
            if rules.double_allowed {
                Action::Double
            } else {
                Action::Stand
            }
        }
        RawAction::SplitIfDas => {
            if rules.double_after_split {
                Action::Split
            } else {
                Action::Hit
            }
        }
        RawAction::SurrenderOrHit => {
            if rules.surrender_allowed {
                Action::Surrender
            } else {
                Action::Hit
            }
        }
        RawAction::SurrenderOrStand => {
            if rules.surrender_allowed {
                Action::Surrender
            } else {
                Action::Stand
            }
        }
        RawAction::SurrenderOrSplit => {
            if rules.surrender_allowed {
                Action::Surrender
            } else {
                Action::Split
            }
        }
    }
}

/// The correct action for a cell. `None` means the cell is not in the table,
/// which for any universe item is a broken-constants bug, not bad input.
pub fn resolve(category: HandCategory, upcard: CardValue, rules: &HouseRules) -> Option<Action> {
    lookup(category, upcard).map(|raw| resolve_raw(raw, rules))
}

/// Hand-written rationale for the cells players get wrong most often, with the
/// action each sentence argues for.
const EXPLANATIONS: &[(&str, Action, &str)] = &[
    ("soft_A,7_9",  Action::Hit,       "Soft 18 vs 9: Dealer likely makes 19+. HIT to improve!"),
    ("soft_A,7_10", Action::Hit,       "Soft 18 vs 10: You lose more by standing. HIT!"),
    ("soft_A,7_A",  Action::Hit,       "Soft 18 vs Ace: Dealer has edge. Take a card!"),
    ("hard_12_2",   Action::Hit,       "Hard 12 vs 2: Dealer busts only 35%. HIT!"),
    ("hard_12_3",   Action::Hit,       "Hard 12 vs 3: Still not enough bust potential. HIT!"),
    ("hard_16_9",   Action::Surrender, "16 vs 9: Surrender saves money long-term."),
    ("hard_16_10",  Action::Surrender, "16 vs 10: Worst hand in blackjack. SURRENDER!"),
    ("hard_16_A",   Action::Surrender, "16 vs Ace: SURRENDER if allowed."),
    ("pair_8,8_10", Action::Split,     "Split 8s vs 10: Two chances at 18 beats one 16."),
    ("pair_8,8_A",  Action::Split,     "Split 8s vs Ace: Painful but mathematically correct."),
    ("pair_9,9_7",  Action::Stand,     "STAND with 18! Dealer likely has 17."),
    ("hard_11_A",   Action::Hit,       "11 vs Ace (6-deck): Just HIT, don't double."),
    ("hard_15_10",  Action::Surrender, "SURRENDER 15 vs 10 to minimize losses."),
    ("hard_15_A",   Action::Surrender, "SURRENDER 15 vs Ace - dealer too strong."),
    ("hard_17_A",   Action::Surrender, "SURRENDER 17 vs Ace if allowed."),
    ("soft_A,6_3",  Action::Double,    "Soft 17: DOUBLE vs dealer bust cards!"),
    ("soft_A,6_4",  Action::Double,    "Soft 17: DOUBLE vs dealer bust cards!"),
    ("soft_A,6_5",  Action::Double,    "Soft 17: DOUBLE vs dealer bust cards!"),
    ("soft_A,6_6",  Action::Double,    "Soft 17: DOUBLE vs dealer bust cards!"),
    ("pair_9,9_9",  Action::Split,     "SPLIT 9s vs 9 for a slight edge."),
    ("pair_9,9_10", Action::Stand,     "STAND with 18 vs 10 - don't split."),
    ("pair_9,9_A",  Action::Stand,     "STAND with 18 vs Ace - splitting is worse."),
];

/// Why `action` is right for `key`. Uses the curated sentence when it argues
/// for the same action, otherwise a generic one. Never fails.
pub fn explanation(key: &ItemKey, action: Action) -> String {
    EXPLANATIONS
        .iter()
        .find(|(k, a, _)| *k == key.as_str() && *a == action)
        .map(|(_, _, text)| text.to_string())
        .unwrap_or_else(|| format!("{action} is the mathematically optimal play."))
}
