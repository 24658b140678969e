//! Starting-hand notation and preflop ranges.
//!
//! A [`StartingHand`] is the suit-independent class of a two-card holding:
//! "AA", "AKs", "AKo". Ranges are either explicit sets of starting hands,
//! declarative predicates ("pocket_pair", "high_sum:20"), or unions of both.
//! The standard named ranges are built once on first use and are read-only
//! afterwards.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::cards::{parse_board, parse_card, Card, Rank, ALL_RANKS, ALL_SUITS};
use crate::error::{EngineError, EngineResult};

// ---------------------------------------------------------------------------
// Starting hands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Shape {
    Pair,
    Suited,
    Offsuit,
}

/// Canonical starting hand. `high >= low`, and `shape == Pair` exactly when
/// the ranks are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct StartingHand {
    pub high: Rank,
    pub low: Rank,
    pub shape: Shape,
}

impl StartingHand {
    pub fn pair(rank: Rank) -> Self {
        StartingHand { high: rank, low: rank, shape: Shape::Pair }
    }

    /// Build from two ranks in any order. Returns `None` for equal ranks
    /// with a suited/offsuit shape or unequal ranks marked as a pair.
    pub fn new(a: Rank, b: Rank, shape: Shape) -> Option<Self> {
        let (high, low) = if a >= b { (a, b) } else { (b, a) };
        match (high == low, shape) {
            (true, Shape::Pair) | (false, Shape::Suited) | (false, Shape::Offsuit) => {
                Some(StartingHand { high, low, shape })
            }
            _ => None,
        }
    }

    pub fn is_pair(&self) -> bool {
        self.shape == Shape::Pair
    }

    pub fn is_suited(&self) -> bool {
        self.shape == Shape::Suited
    }

    /// Rank gap between the two cards (0 for pairs, 1 for connectors).
    pub fn gap(&self) -> u8 {
        self.high.value() - self.low.value()
    }

    /// Sum of the two rank values (Ace = 14).
    pub fn rank_sum(&self) -> u8 {
        self.high.value() + self.low.value()
    }

    /// Number of concrete card combinations: 6, 4 or 12.
    pub fn num_combos(&self) -> usize {
        match self.shape {
            Shape::Pair => 6,
            Shape::Suited => 4,
            Shape::Offsuit => 12,
        }
    }

    /// Every concrete two-card holding of this class.
    pub fn combos(&self) -> Vec<(Card, Card)> {
        let mut out = Vec::with_capacity(self.num_combos());
        match self.shape {
            Shape::Pair => {
                for (i, &s1) in ALL_SUITS.iter().enumerate() {
                    for &s2 in &ALL_SUITS[i + 1..] {
                        out.push((Card::new(self.high, s1), Card::new(self.low, s2)));
                    }
                }
            }
            Shape::Suited => {
                for &s in &ALL_SUITS {
                    out.push((Card::new(self.high, s), Card::new(self.low, s)));
                }
            }
            Shape::Offsuit => {
                for &s1 in &ALL_SUITS {
                    for &s2 in &ALL_SUITS {
                        if s1 != s2 {
                            out.push((Card::new(self.high, s1), Card::new(self.low, s2)));
                        }
                    }
                }
            }
        }
        out
    }

    /// All 169 starting hands.
    pub fn all() -> Vec<StartingHand> {
        let mut hands = Vec::with_capacity(169);
        for (i, &high) in ALL_RANKS.iter().enumerate().rev() {
            hands.push(StartingHand::pair(high));
            for &low in ALL_RANKS[..i].iter().rev() {
                hands.push(StartingHand { high, low, shape: Shape::Suited });
                hands.push(StartingHand { high, low, shape: Shape::Offsuit });
            }
        }
        hands
    }
}

impl fmt::Display for StartingHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.shape {
            Shape::Pair => "",
            Shape::Suited => "s",
            Shape::Offsuit => "o",
        };
        write!(f, "{}{}{}", self.high.symbol(), self.low.symbol(), suffix)
    }
}

impl FromStr for StartingHand {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        normalize_notation(s)
    }
}

impl From<StartingHand> for String {
    fn from(hand: StartingHand) -> String {
        hand.to_string()
    }
}

impl TryFrom<String> for StartingHand {
    type Error = EngineError;

    fn try_from(s: String) -> EngineResult<Self> {
        normalize_notation(&s)
    }
}

/// Canonical class of two concrete cards.
pub fn canonicalize_cards(c1: Card, c2: Card) -> EngineResult<StartingHand> {
    if c1 == c2 {
        return Err(EngineError::InvalidHandNotation(format!("{}{}", c1, c2)));
    }
    let shape = if c1.rank == c2.rank {
        Shape::Pair
    } else if c1.suit == c2.suit {
        Shape::Suited
    } else {
        Shape::Offsuit
    };
    StartingHand::new(c1.rank, c2.rank, shape)
        .ok_or_else(|| EngineError::InvalidHandNotation(format!("{}{}", c1, c2)))
}

/// Canonical class of two card tokens in any card notation.
pub fn canonicalize(card1: &str, card2: &str) -> EngineResult<StartingHand> {
    let bad = |_: EngineError| EngineError::InvalidHandNotation(format!("{} {}", card1, card2));
    let c1 = parse_card(card1).map_err(bad)?;
    let c2 = parse_card(card2).map_err(bad)?;
    canonicalize_cards(c1, c2)
}

/// Normalize any single-string hand description: two concrete cards
/// ("AsKd", "A♠K♦", "10h9h") or a starting-hand label in any case and rank
/// order ("AKs", "kas", "tt", "T9o"). A bare unpaired label such as "AK"
/// means offsuit.
pub fn normalize_notation(input: &str) -> EngineResult<StartingHand> {
    let bad = || EngineError::InvalidHandNotation(input.to_string());
    let trimmed = input.trim();

    if let Ok(cards) = parse_board(trimmed) {
        if cards.len() == 2 {
            return canonicalize_cards(cards[0], cards[1]).map_err(|_| bad());
        }
    }

    let label = trimmed.replace("10", "T");
    let chars: Vec<char> = label.chars().collect();
    let (r1, r2, suffix) = match chars.as_slice() {
        [a, b] => (*a, *b, None),
        [a, b, s] => (*a, *b, Some(s.to_ascii_lowercase())),
        _ => return Err(bad()),
    };
    let r1 = Rank::from_symbol(r1).ok_or_else(bad)?;
    let r2 = Rank::from_symbol(r2).ok_or_else(bad)?;
    let shape = match (r1 == r2, suffix) {
        (true, None) => Shape::Pair,
        (false, None) | (false, Some('o')) => Shape::Offsuit,
        (false, Some('s')) => Shape::Suited,
        _ => return Err(bad()),
    };
    StartingHand::new(r1, r2, shape).ok_or_else(bad)
}

/// Every concrete card pair a hand notation stands for.
pub fn hand_combos(notation: &str) -> EngineResult<Vec<(Card, Card)>> {
    Ok(normalize_notation(notation)?.combos())
}

// ---------------------------------------------------------------------------
// Ranges
// ---------------------------------------------------------------------------

/// Declarative starting-hand predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandPredicate {
    Any,
    PocketPair,
    Suited,
    Connector,
    SuitedConnector,
    /// Both cards Ten or higher.
    Broadway,
    SuitedBroadway,
    AceXSuited,
    /// Rank sum (Ace = 14) at least this value.
    HighCardSum(u8),
}

impl HandPredicate {
    pub fn matches(&self, hand: &StartingHand) -> bool {
        match *self {
            HandPredicate::Any => true,
            HandPredicate::PocketPair => hand.is_pair(),
            HandPredicate::Suited => hand.is_suited(),
            HandPredicate::Connector => hand.gap() == 1,
            HandPredicate::SuitedConnector => hand.is_suited() && hand.gap() == 1,
            HandPredicate::Broadway => hand.low >= Rank::Ten,
            HandPredicate::SuitedBroadway => hand.is_suited() && hand.low >= Rank::Ten,
            HandPredicate::AceXSuited => hand.is_suited() && hand.high == Rank::Ace,
            HandPredicate::HighCardSum(min) => hand.rank_sum() >= min,
        }
    }

    /// Predicate by name; `high_sum:N` carries its threshold inline.
    pub fn from_name(name: &str) -> Option<HandPredicate> {
        let name = name.trim().to_ascii_lowercase();
        if let Some(n) = name.strip_prefix("high_sum:") {
            return n.trim().parse().ok().map(HandPredicate::HighCardSum);
        }
        match name.as_str() {
            "any" | "all" => Some(HandPredicate::Any),
            "pocket_pair" => Some(HandPredicate::PocketPair),
            "suited" => Some(HandPredicate::Suited),
            "connector" => Some(HandPredicate::Connector),
            "suited_connector" => Some(HandPredicate::SuitedConnector),
            "broadway" => Some(HandPredicate::Broadway),
            "suited_broadway" => Some(HandPredicate::SuitedBroadway),
            "ace_x_suited" => Some(HandPredicate::AceXSuited),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Range {
    Explicit(BTreeSet<StartingHand>),
    Predicate(HandPredicate),
    Union(Vec<Range>),
}

impl Range {
    /// A range holding every hand any of `parts` holds. Nested unions are
    /// flattened.
    pub fn union(parts: Vec<Range>) -> Range {
        let mut flat = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Range::Union(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            return flat.remove(0);
        }
        Range::Union(flat)
    }

    pub fn contains(&self, hand: &StartingHand) -> bool {
        match self {
            Range::Explicit(set) => set.contains(hand),
            Range::Predicate(p) => p.matches(hand),
            Range::Union(parts) => parts.iter().any(|r| r.contains(hand)),
        }
    }

    /// Does this pair of concrete cards fall in the range?
    pub fn contains_cards(&self, c1: Card, c2: Card) -> bool {
        canonicalize_cards(c1, c2).map(|h| self.contains(&h)).unwrap_or(false)
    }

    /// Every starting hand in the range, strongest-looking first.
    pub fn hands(&self) -> Vec<StartingHand> {
        StartingHand::all().into_iter().filter(|h| self.contains(h)).collect()
    }

    /// Total concrete combinations in the range (1326 for `Any`).
    pub fn total_combos(&self) -> usize {
        self.hands().iter().map(StartingHand::num_combos).sum()
    }
}

/// Parse a comma-separated range such as "TT+, ATs+, KQo, AK".
///
/// - "AA", "AKs", "AKo": one starting hand
/// - "AK": both the suited and offsuit versions
/// - "77+": 77 up to AA
/// - "ATs+", "KTo+": the kicker climbs up to one below the top card
pub fn parse_range(s: &str) -> EngineResult<Range> {
    let mut hands = BTreeSet::new();
    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (body, plus) = match part.strip_suffix('+') {
            Some(body) => (body, true),
            None => (part, false),
        };
        let base = parse_range_token(body)?;
        for hand in base {
            if plus {
                hands.extend(expand_plus(hand));
            } else {
                hands.insert(hand);
            }
        }
    }
    Ok(Range::Explicit(hands))
}

fn parse_range_token(token: &str) -> EngineResult<Vec<StartingHand>> {
    let chars: Vec<char> = token.chars().collect();
    if let [a, b] = chars.as_slice() {
        if let (Some(r1), Some(r2)) = (Rank::from_symbol(*a), Rank::from_symbol(*b)) {
            if r1 != r2 {
                let suited = StartingHand::new(r1, r2, Shape::Suited);
                let offsuit = StartingHand::new(r1, r2, Shape::Offsuit);
                return Ok(suited.into_iter().chain(offsuit).collect());
            }
        }
    }
    normalize_notation(token).map(|h| vec![h])
}

fn expand_plus(hand: StartingHand) -> Vec<StartingHand> {
    match hand.shape {
        Shape::Pair => ALL_RANKS
            .iter()
            .filter(|&&r| r >= hand.high)
            .map(|&r| StartingHand::pair(r))
            .collect(),
        shape => ALL_RANKS
            .iter()
            .filter(|&&r| r >= hand.low && r < hand.high)
            .map(|&r| StartingHand { high: hand.high, low: r, shape })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Named range table
// ---------------------------------------------------------------------------

/// Named ranges. Lookups of unknown names simply miss.
#[derive(Debug, Clone, Default)]
pub struct RangeTable {
    ranges: HashMap<String, Range>,
}

impl RangeTable {
    pub fn new() -> Self {
        RangeTable::default()
    }

    pub fn insert(&mut self, name: &str, range: Range) {
        self.ranges.insert(name.to_ascii_lowercase(), range);
    }

    /// Named range, falling back to a predicate name ("suited",
    /// "high_sum:20").
    pub fn get(&self, name: &str) -> Option<Range> {
        let key = name.trim().to_ascii_lowercase();
        self.ranges
            .get(&key)
            .cloned()
            .or_else(|| HandPredicate::from_name(&key).map(Range::Predicate))
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.ranges.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn contains(&self, name: &str, hand: &StartingHand) -> bool {
        self.get(name).map(|r| r.contains(hand)).unwrap_or(false)
    }

    /// The standard tables: strength tiers, 5-max opening ranges by
    /// position, and 3-bet ranges.
    pub fn standard() -> Self {
        let mut table = RangeTable::new();
        for (name, definition) in standard_definitions() {
            let range = parse_range(&definition)
                .unwrap_or_else(|e| panic!("standard range {} is malformed: {}", name, e));
            table.insert(name, range);
        }
        for (name, parts, extra) in standard_unions() {
            let mut members: Vec<Range> = parts.iter().filter_map(|p| table.get(p)).collect();
            if !extra.is_empty() {
                let range = parse_range(extra)
                    .unwrap_or_else(|e| panic!("standard range {} is malformed: {}", name, e));
                members.push(range);
            }
            table.insert(name, Range::union(members));
        }
        table
    }
}

const PREMIUM: &str = "TT+, AJs+, AKo";
const STRONG: &str = "77, 88, 99, ATs, KJs+, QJs, JTs, AJo, AQo, KQo";
const VALUE: &str = "22, 33, 44, 55, 66, A2s, A3s, A4s, A5s, A6s, A7s, A8s, A9s, \
    K9s, KTs, Q9s, QTs, T9s, 98s, 87s, 76s, 65s, ATo, KTo, KJo, QTo, QJo, JTo";
const SPECULATIVE: &str = "T8s, 97s, 86s, 75s, 64s, 54s, J9s, T9s, 98s, 87s, 76s, 65s";

fn standard_definitions() -> Vec<(&'static str, String)> {
    vec![
        ("premium", PREMIUM.to_string()),
        ("strong", STRONG.to_string()),
        ("value", VALUE.to_string()),
        ("speculative", SPECULATIVE.to_string()),
        ("open_utg", "77+, A2s+, KTs+, QTs+, JTs, T9s, 98s, 87s, 76s, AQo+".to_string()),
        ("open_mp", "55+, A2s+, K9s+, Q9s+, J9s+, T9s, 98s, 87s, 76s, 65s, AJo+, KQo".to_string()),
        (
            "open_co",
            "22+, A2s+, K8s+, Q8s+, J8s+, T8s+, 98s, 87s, 76s, 65s, 54s, A5o+, KTo+, QTo+, JTo".to_string(),
        ),
        (
            "open_btn",
            "22+, A2s+, K2s+, Q2s+, J4s+, T6s+, 96s+, 86s+, 75s+, 64s+, 54s, A2o+, K8o+, Q9o+, J9o+, T9o"
                .to_string(),
        ),
        (
            "open_sb",
            "22+, A2s+, K5s+, Q8s+, J7s+, T8s+, 97s+, 86s+, 75s+, 64s+, 54s, A5o+, K9o+, QTo+, JTo".to_string(),
        ),
        ("threebet_utg", PREMIUM.to_string()),
        ("threebet_hj", format!("{}, 88, 99, ATs, KQs", PREMIUM)),
        ("threebet_co", format!("{}, 77, 88, 99, A9s, ATs, KJs, KQs", PREMIUM)),
        ("threebet_sb", format!("{}, 88, 99, ATs, KQs", PREMIUM)),
    ]
}

/// Ranges composed from earlier table entries plus extra hands.
fn standard_unions() -> Vec<(&'static str, &'static [&'static str], &'static str)> {
    vec![
        ("threebet_btn", &["premium", "strong"][..], "A9s, A8s, A5s, KTs, QJs, JTs, T9s"),
        ("playable", &["premium", "strong", "value", "speculative"][..], ""),
    ]
}

/// Built once on first use; shared read-only across threads.
pub static STANDARD_RANGES: Lazy<RangeTable> = Lazy::new(RangeTable::standard);

/// Is the hand (any notation) in the named standard range? Unknown range
/// names answer `false`; malformed hands are an error.
pub fn is_in_range(notation: &str, range_name: &str) -> EngineResult<bool> {
    let hand = normalize_notation(notation)?;
    Ok(STANDARD_RANGES.contains(range_name, &hand))
}

/// Outcome of probing a hand against several ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeMatch {
    pub notation: String,
    pub in_range: bool,
    /// First matching range name, empty when none matched.
    pub matched_range_name: String,
}

/// Probe `names` in order and report the first range containing the hand.
pub fn check_ranges(table: &RangeTable, notation: &str, names: &[&str]) -> EngineResult<RangeMatch> {
    let hand = normalize_notation(notation)?;
    let matched = names.iter().find(|name| table.contains(name, &hand));
    Ok(RangeMatch {
        notation: hand.to_string(),
        in_range: matched.is_some(),
        matched_range_name: matched.map(|n| n.to_string()).unwrap_or_default(),
    })
}

// ---------------------------------------------------------------------------
// Strength tiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Weak,
    Speculative,
    Value,
    Strong,
    Premium,
}

impl Tier {
    pub fn name(self) -> &'static str {
        match self {
            Tier::Premium => "premium",
            Tier::Strong => "strong",
            Tier::Value => "value",
            Tier::Speculative => "speculative",
            Tier::Weak => "weak",
        }
    }
}

/// Strongest tier containing the hand.
pub fn classify_tier(hand: &StartingHand) -> Tier {
    [Tier::Premium, Tier::Strong, Tier::Value, Tier::Speculative]
        .into_iter()
        .find(|tier| STANDARD_RANGES.contains(tier.name(), hand))
        .unwrap_or(Tier::Weak)
}
