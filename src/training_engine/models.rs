use std::fmt;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Card primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suit::Clubs => write!(f, "c"),
            Suit::Diamonds => write!(f, "d"),
            Suit::Hearts => write!(f, "h"),
            Suit::Spades => write!(f, "s"),
        }
    }
}

/// Rank 2..=14 where 11..=13 are the court cards and 14 = Ace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rank(pub u8);

impl Rank {
    pub fn symbol(self) -> &'static str {
        match self.0 {
            2 => "2", 3 => "3", 4 => "4", 5 => "5", 6 => "6",
            7 => "7", 8 => "8", 9 => "9", 10 => "10",
            11 => "J", 12 => "Q", 13 => "K", 14 => "A",
            _ => "?",
        }
    }

    /// Blackjack value of the rank, counting an ace as 11.
    pub fn points(self) -> u8 {
        match self.0 {
            14 => 11,
            11..=13 => 10,
            r => r,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// The ten blackjack card values. Used both for the dealer upcard and for the
/// rank of a pair; every ten-valued card (10, J, Q, K) collapses to `Ten`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CardValue {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Ace,
}

impl CardValue {
    /// Column order of the strategy tables.
    pub const ALL: [CardValue; 10] = [
        CardValue::Two, CardValue::Three, CardValue::Four, CardValue::Five,
        CardValue::Six, CardValue::Seven, CardValue::Eight, CardValue::Nine,
        CardValue::Ten, CardValue::Ace,
    ];

    /// Column index 0..=9 into the strategy tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Symbol used for the dealer card ("2".."10", "A").
    pub fn symbol(self) -> &'static str {
        match self {
            CardValue::Two   => "2",
            CardValue::Three => "3",
            CardValue::Four  => "4",
            CardValue::Five  => "5",
            CardValue::Six   => "6",
            CardValue::Seven => "7",
            CardValue::Eight => "8",
            CardValue::Nine  => "9",
            CardValue::Ten   => "10",
            CardValue::Ace   => "A",
        }
    }

    /// Symbol used inside pair keys ("2".."9", "T", "A").
    pub fn pair_symbol(self) -> &'static str {
        match self {
            CardValue::Ten => "T",
            other => other.symbol(),
        }
    }

    pub fn from_symbol(s: &str) -> Option<CardValue> {
        match s {
            "A" => Some(CardValue::Ace),
            "T" | "10" | "J" | "Q" | "K" => Some(CardValue::Ten),
            other => {
                let n: u8 = other.parse().ok()?;
                CardValue::from_points(n)
            }
        }
    }

    /// 2..=10 map to their value, 11 maps to `Ace`.
    pub fn from_points(points: u8) -> Option<CardValue> {
        match points {
            2..=10 => Some(CardValue::ALL[points as usize - 2]),
            11 => Some(CardValue::Ace),
            _ => None,
        }
    }

    pub fn points(self) -> u8 {
        match self {
            CardValue::Ace => 11,
            other => other as u8 + 2,
        }
    }
}

impl fmt::Display for CardValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ---------------------------------------------------------------------------
// Hand categories and drill items
// ---------------------------------------------------------------------------

/// One row of the strategy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandCategory {
    /// Hard total, 5..=21.
    Hard(u8),
    /// Ace plus another card 2..=9 (soft 13 through soft 20).
    Soft(u8),
    Pair(CardValue),
}

impl HandCategory {
    pub fn hand_type(self) -> &'static str {
        match self {
            HandCategory::Hard(_) => "hard",
            HandCategory::Soft(_) => "soft",
            HandCategory::Pair(_) => "pair",
        }
    }

    /// Row identifier as used in stored keys: `16`, `A,7`, `8,8`.
    pub fn hand_key(self) -> String {
        match self {
            HandCategory::Hard(total) => total.to_string(),
            HandCategory::Soft(other) => format!("A,{other}"),
            HandCategory::Pair(rank) => format!("{0},{0}", rank.pair_symbol()),
        }
    }

    pub fn is_pair(self) -> bool {
        matches!(self, HandCategory::Pair(_))
    }

    /// Human-readable label, e.g. "Hard 16", "Soft 18", "Pair of 8s".
    pub fn label(self) -> String {
        match self {
            HandCategory::Hard(total) => format!("Hard {total}"),
            HandCategory::Soft(other) => format!("Soft {}", 11 + other as u32),
            HandCategory::Pair(CardValue::Ace) => "Pair of Aces".to_string(),
            HandCategory::Pair(rank) => format!("Pair of {}s", rank.symbol()),
        }
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Canonical identity of a (category, upcard) pair. Joins drill items, queue
/// entries and per-item counters.
///
/// String form: `{hand_type}_{hand_key}_{dealer}`, e.g. `soft_A,7_9`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKey(String);

impl ItemKey {
    pub fn new(category: HandCategory, upcard: CardValue) -> Self {
        ItemKey(format!("{}_{}_{}", category.hand_type(), category.hand_key(), upcard.symbol()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recover (category, upcard) from the string form. Returns `None` for
    /// keys that do not name a table cell.
    pub fn parse(&self) -> Option<(HandCategory, CardValue)> {
        let mut parts = self.0.splitn(3, '_');
        let hand_type = parts.next()?;
        let hand_key = parts.next()?;
        let upcard = CardValue::from_symbol(parts.next()?)?;

        let category = match hand_type {
            "hard" => HandCategory::Hard(hand_key.parse().ok()?),
            "soft" => {
                let other = hand_key.strip_prefix("A,")?;
                HandCategory::Soft(other.parse().ok()?)
            }
            "pair" => {
                let (a, b) = hand_key.split_once(',')?;
                if a != b {
                    return None;
                }
                HandCategory::Pair(CardValue::from_symbol(a)?)
            }
            _ => return None,
        };
        Some((category, upcard))
    }

    /// "Soft 18 vs 9" style label, falling back to the raw key.
    pub fn label(&self) -> String {
        match self.parse() {
            Some((category, upcard)) => format!("{} vs {}", category.label(), upcard),
            None => self.0.clone(),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One drill cell: a hand category against a dealer upcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillItem {
    pub category: HandCategory,
    pub dealer_upcard: CardValue,
    /// Static difficulty 1..=5; higher is more commonly misplayed.
    pub base_weight: u8,
    pub hint: Option<String>,
}

impl DrillItem {
    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.category, self.dealer_upcard)
    }

    pub fn label(&self) -> String {
        format!("{} vs {}", self.category.label(), self.dealer_upcard)
    }
}

// ---------------------------------------------------------------------------
// Actions and house rules
// ---------------------------------------------------------------------------

/// Table symbols before house rules are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawAction {
    Hit,
    Stand,
    /// `D`: double, else hit.
    DoubleOrHit,
    /// `Ds`: double, else stand.
    DoubleOrStand,
    Split,
    /// `Ph`: split when double-after-split is allowed, else hit.
    SplitIfDas,
    /// `Rh`
    SurrenderOrHit,
    /// `Rs`
    SurrenderOrStand,
    /// `Rp`
    SurrenderOrSplit,
}

impl fmt::Display for RawAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RawAction::Hit              => "H",
            RawAction::Stand            => "S",
            RawAction::DoubleOrHit      => "D",
            RawAction::DoubleOrStand    => "Ds",
            RawAction::Split            => "P",
            RawAction::SplitIfDas       => "Ph",
            RawAction::SurrenderOrHit   => "Rh",
            RawAction::SurrenderOrStand => "Rs",
            RawAction::SurrenderOrSplit => "Rp",
        };
        write!(f, "{}", s)
    }
}

/// The five user-facing decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Hit,
    Stand,
    Double,
    Split,
    Surrender,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Hit, Action::Stand, Action::Double, Action::Split, Action::Surrender,
    ];

    /// Single-letter code used by the original chart (H, S, D, P, R).
    pub fn code(self) -> char {
        match self {
            Action::Hit       => 'H',
            Action::Stand     => 'S',
            Action::Double    => 'D',
            Action::Split     => 'P',
            Action::Surrender => 'R',
        }
    }

    pub fn from_code(c: char) -> Option<Action> {
        match c.to_ascii_uppercase() {
            'H' => Some(Action::Hit),
            'S' => Some(Action::Stand),
            'D' => Some(Action::Double),
            'P' => Some(Action::Split),
            'R' => Some(Action::Surrender),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Hit       => "HIT",
            Action::Stand     => "STAND",
            Action::Double    => "DOUBLE",
            Action::Split     => "SPLIT",
            Action::Surrender => "SURRENDER",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HouseRules {
    pub double_allowed: bool,
    /// DAS
    pub double_after_split: bool,
    /// Late surrender.
    pub surrender_allowed: bool,
}

impl Default for HouseRules {
    fn default() -> Self {
        HouseRules {
            double_allowed: true,
            double_after_split: true,
            surrender_allowed: true,
        }
    }
}

impl HouseRules {
    /// Actions a player may choose for `category` under these rules.
    pub fn available_actions(&self, category: HandCategory) -> Vec<Action> {
        let mut actions = vec![Action::Hit, Action::Stand];
        if self.double_allowed {
            actions.push(Action::Double);
        }
        if category.is_pair() {
            actions.push(Action::Split);
        }
        if self.surrender_allowed {
            actions.push(Action::Surrender);
        }
        actions
    }
}

// ---------------------------------------------------------------------------
// Training modes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingMode {
    /// Commonly missed cells only; trivial cells never appear.
    Critical,
    Hard,
    #[default]
    Balanced,
    /// Uniform over the universe.
    Random,
}

impl TrainingMode {
    pub const ALL: [TrainingMode; 4] = [
        TrainingMode::Critical, TrainingMode::Hard, TrainingMode::Balanced, TrainingMode::Random,
    ];
}

impl fmt::Display for TrainingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainingMode::Critical => write!(f, "Critical"),
            TrainingMode::Hard     => write!(f, "Hard"),
            TrainingMode::Balanced => write!(f, "Balanced"),
            TrainingMode::Random   => write!(f, "Random"),
        }
    }
}

// ---------------------------------------------------------------------------
// Draw / grade results
// ---------------------------------------------------------------------------

/// Concrete cards dealt for a drill item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealtHand {
    pub player: Vec<Card>,
    pub dealer: Card,
}

/// What the caller receives from `next_item`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentedItem {
    pub item: DrillItem,
    pub key: ItemKey,
    pub correct_action: Action,
    pub available_actions: Vec<Action>,
    pub served_from_queue: bool,
    pub cards: DealtHand,
}

/// Effect of one grading on the mistake queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueTransition {
    /// Not queued and answered correctly, or correct on a fresh draw.
    Unchanged,
    Inserted,
    /// Missed again while queued; progress back to zero.
    Relapsed,
    Advanced { consecutive_correct: u32 },
    Graduated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeResult {
    pub is_correct: bool,
    pub user_action: Action,
    pub correct_action: Action,
    pub explanation: String,
    pub response_time_ms: u64,
    pub streak: u32,
    /// Percent, 0.0..=100.0.
    pub session_accuracy: f64,
    pub served_from_queue: bool,
    pub queue: QueueTransition,
}

// ---------------------------------------------------------------------------
// Stats views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total: u32,
    pub correct: u32,
    pub accuracy: f64,
    pub streak: u32,
    pub best_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifetimeStats {
    pub total_hands: u64,
    pub total_correct: u64,
    pub accuracy: f64,
    pub best_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeakSpot {
    pub key: ItemKey,
    pub label: String,
    pub attempts: u64,
    pub correct: u64,
    /// Percent, 0.0..=100.0.
    pub accuracy: f64,
    pub avg_time_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntryView {
    pub key: ItemKey,
    pub label: String,
    pub consecutive_correct: u32,
    pub remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueStats {
    pub count: usize,
    pub entries: Vec<QueueEntryView>,
}
