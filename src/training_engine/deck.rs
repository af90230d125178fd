use rand::seq::SliceRandom;
use rand::Rng;
use crate::training_engine::models::{
    Card, CardValue, DealtHand, DrillItem, HandCategory, Rank, Suit,
};

/// Ranks that count as ten.
const TEN_RANKS: [u8; 4] = [10, 11, 12, 13];
const ACE: u8 = 14;

fn random_suit<R: Rng>(rng: &mut R) -> Suit {
    Suit::ALL[rng.gen_range(0..Suit::ALL.len())]
}

/// A concrete rank for a blackjack value; ten picks any of 10, J, Q, K.
fn rank_for<R: Rng>(rng: &mut R, points: u8) -> Rank {
    match points {
        10 => Rank(TEN_RANKS[rng.gen_range(0..TEN_RANKS.len())]),
        11 => Rank(ACE),
        p => Rank(p),
    }
}

fn card<R: Rng>(rng: &mut R, points: u8) -> Card {
    Card { rank: rank_for(rng, points), suit: random_suit(rng) }
}

/// Value combinations without aces or repeated values that sum to `total`:
/// two cards where possible, three otherwise (hard 20 and 21).
fn hard_combos(total: u8) -> Vec<Vec<u8>> {
    let mut combos = Vec::new();
    for a in 2u8..=10 {
        for b in (a + 1)..=10 {
            if a + b == total {
                combos.push(vec![a, b]);
            }
        }
    }
    if !combos.is_empty() {
        return combos;
    }
    for a in 2u8..=10 {
        for b in (a + 1)..=10 {
            for c in (b + 1)..=10 {
                if a + b + c == total {
                    combos.push(vec![a, b, c]);
                }
            }
        }
    }
    combos
}

/// Player cards that form `category`. Empty only for categories outside the
/// strategy table.
pub fn player_cards<R: Rng>(rng: &mut R, category: HandCategory) -> Vec<Card> {
    match category {
        HandCategory::Pair(value) => {
            let rank = rank_for(rng, value.points());
            vec![
                Card { rank, suit: random_suit(rng) },
                Card { rank, suit: random_suit(rng) },
            ]
        }
        HandCategory::Soft(other) => vec![card(rng, 11), card(rng, other)],
        HandCategory::Hard(total) => {
            let combos = hard_combos(total);
            let Some(values) = combos.choose(rng).cloned() else {
                return Vec::new();
            };
            let mut cards: Vec<Card> = values.into_iter().map(|v| card(rng, v)).collect();
            cards.shuffle(rng);
            cards
        }
    }
}

pub fn dealer_card<R: Rng>(rng: &mut R, upcard: CardValue) -> Card {
    card(rng, upcard.points())
}

/// Deal the table for one drill item.
pub fn deal_for<R: Rng>(rng: &mut R, item: &DrillItem) -> DealtHand {
    DealtHand {
        player: player_cards(rng, item.category),
        dealer: dealer_card(rng, item.dealer_upcard),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training_engine::universe::build_universe;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn total(cards: &[Card]) -> u32 {
        cards.iter().map(|c| c.rank.points() as u32).sum()
    }

    #[test]
    fn every_universe_item_deals_matching_cards() {
        let mut rng = StdRng::seed_from_u64(42);
        for item in build_universe() {
            let hand = deal_for(&mut rng, &item);
            assert!(hand.player.len() >= 2, "no cards for {}", item.key());
            assert_eq!(hand.dealer.rank.points(), item.dealer_upcard.points());
            match item.category {
                HandCategory::Hard(t) => {
                    assert_eq!(total(&hand.player), t as u32, "{}", item.key());
                    assert!(hand.player.iter().all(|c| c.rank.0 != ACE));
                    assert_ne!(hand.player[0].rank.points(), hand.player[1].rank.points());
                }
                HandCategory::Soft(o) => {
                    assert_eq!(hand.player[0].rank, Rank(ACE));
                    assert_eq!(hand.player[1].rank.points(), o);
                }
                HandCategory::Pair(v) => {
                    assert_eq!(hand.player[0].rank, hand.player[1].rank);
                    assert_eq!(hand.player[0].rank.points(), v.points());
                }
            }
        }
    }

    #[test]
    fn dealing_is_deterministic_with_seed() {
        let items = build_universe();
        let make = |seed: u64| -> Vec<DealtHand> {
            let mut rng = StdRng::seed_from_u64(seed);
            items.iter().take(10).map(|i| deal_for(&mut rng, i)).collect()
        };
        assert_eq!(make(99), make(99));
    }
}
