//! Reference hand evaluator.
//!
//! Scores every 5-card subset of the available cards (21 for seven cards)
//! and keeps the strongest. Slower than [`crate::lookup_eval`] but returns the
//! full picture: category, the five cards that make the hand, and the kicker
//! sequence used for tie-breaks.

use std::cmp::Ordering;
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};
use crate::deck::ensure_unique;
use crate::error::{EngineError, EngineResult};

/// When true, an ace-high straight flush is reported as its own Royal Flush
/// category (weight 10). When false it stays a Straight Flush (weight 9)
/// with kicker 14. Relative ordering of hands is identical either way.
pub const DISTINCT_ROYAL_FLUSH: bool = true;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HandCategory {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

pub const ALL_CATEGORIES: [HandCategory; 10] = [
    HandCategory::HighCard,
    HandCategory::OnePair,
    HandCategory::TwoPair,
    HandCategory::ThreeOfAKind,
    HandCategory::Straight,
    HandCategory::Flush,
    HandCategory::FullHouse,
    HandCategory::FourOfAKind,
    HandCategory::StraightFlush,
    HandCategory::RoyalFlush,
];

impl HandCategory {
    /// 1 (High Card) through 10 (Royal Flush).
    pub fn weight(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_weight(weight: u8) -> Option<HandCategory> {
        match weight {
            1..=10 => Some(ALL_CATEGORIES[(weight - 1) as usize]),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::OnePair => "One Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
            HandCategory::RoyalFlush => "Royal Flush",
        }
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of evaluating a hand.
///
/// Ordering and equality look only at `category` and `kickers`: two results
/// that compare equal split the pot even if their cards differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandResult {
    pub category: HandCategory,
    /// The cards that make the hand, most significant first. Five cards
    /// whenever five or more were available.
    pub cards: Vec<Card>,
    /// Rank values (2-14) in descending significance.
    pub kickers: Vec<u8>,
}

impl PartialEq for HandResult {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HandResult {}

impl PartialOrd for HandResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandResult {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.kickers.cmp(&other.kickers))
    }
}

impl HandResult {
    pub fn weight(&self) -> u8 {
        self.category.weight()
    }

    fn kicker_rank(&self, i: usize) -> Option<Rank> {
        self.kickers.get(i).copied().and_then(Rank::from_value)
    }

    /// Human-readable label, e.g. "Full House: Aces over Kings".
    pub fn describe(&self) -> String {
        let k0 = self.kicker_rank(0);
        let k1 = self.kicker_rank(1);
        match (self.category, k0, k1) {
            (HandCategory::RoyalFlush, _, _) => "Royal Flush".to_string(),
            (HandCategory::StraightFlush, Some(h), _) => format!("Straight Flush: {}-high", h.name()),
            (HandCategory::FourOfAKind, Some(q), _) => format!("Four of a Kind: {}", q.plural()),
            (HandCategory::FullHouse, Some(t), Some(p)) => {
                format!("Full House: {} over {}", t.plural(), p.plural())
            }
            (HandCategory::Flush, Some(h), _) => format!("Flush: {}-high", h.name()),
            (HandCategory::Straight, Some(h), _) => format!("Straight: {}-high", h.name()),
            (HandCategory::ThreeOfAKind, Some(t), _) => format!("Three of a Kind: {}", t.plural()),
            (HandCategory::TwoPair, Some(a), Some(b)) => {
                format!("Two Pair: {} and {}", a.plural(), b.plural())
            }
            (HandCategory::OnePair, Some(p), _) => format!("One Pair: {}", p.plural()),
            (HandCategory::HighCard, Some(h), _) => format!("High Card: {}", h.name()),
            (category, _, _) => category.name().to_string(),
        }
    }
}

impl fmt::Display for HandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards = self.cards.iter().map(|c| c.to_string()).join(" ");
        write!(f, "{} - {}", self.describe(), cards)
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate a player's best hand from exactly 2 hole cards and 0-5 board
/// cards. Fewer than five cards in total yields a High Card result over the
/// cards that exist.
pub fn evaluate_hand(hole: &[Card], board: &[Card]) -> EngineResult<HandResult> {
    if hole.len() != 2 {
        return Err(EngineError::InvalidHandSize {
            expected: "2 hole cards".to_string(),
            got: hole.len(),
        });
    }
    if board.len() > 5 {
        return Err(EngineError::InvalidHandSize {
            expected: "0-5 board cards".to_string(),
            got: board.len(),
        });
    }
    let all: Vec<Card> = hole.iter().chain(board.iter()).copied().collect();
    evaluate_cards(&all)
}

/// Evaluate any 1-7 distinct cards.
pub fn evaluate_cards(cards: &[Card]) -> EngineResult<HandResult> {
    if cards.is_empty() || cards.len() > 7 {
        return Err(EngineError::InvalidHandSize {
            expected: "1-7 cards".to_string(),
            got: cards.len(),
        });
    }
    ensure_unique(cards)?;

    if cards.len() < 5 {
        return Ok(partial_high_card(cards));
    }

    let best = cards
        .iter()
        .copied()
        .combinations(5)
        .map(|five| score_five(&five))
        .max();
    // combinations(5) of >= 5 cards always yields at least one subset
    best.ok_or_else(|| EngineError::InvalidHandSize {
        expected: "at least 5 cards".to_string(),
        got: cards.len(),
    })
}

/// Compare two players sharing a board.
pub fn compare_hands(hole1: &[Card], hole2: &[Card], board: &[Card]) -> EngineResult<Ordering> {
    let mut all = Vec::with_capacity(4 + board.len());
    all.extend_from_slice(hole1);
    all.extend_from_slice(hole2);
    all.extend_from_slice(board);
    ensure_unique(&all)?;

    let r1 = evaluate_hand(hole1, board)?;
    let r2 = evaluate_hand(hole2, board)?;
    Ok(r1.cmp(&r2))
}

/// Pair-type hand the community cards make on their own, if any.
/// Only rank groupings count: a board can't hold a straight or flush that
/// "plays" without being the whole board, and callers want to know whether
/// the board is paired.
pub fn board_made_hand(board: &[Card]) -> EngineResult<Option<HandCategory>> {
    if board.len() > 5 {
        return Err(EngineError::InvalidHandSize {
            expected: "0-5 board cards".to_string(),
            got: board.len(),
        });
    }
    ensure_unique(board)?;

    let mut counts = [0u8; 15];
    for card in board {
        counts[card.rank.value() as usize] += 1;
    }
    let pairs = counts.iter().filter(|&&c| c == 2).count();
    let made = if counts.contains(&4) {
        Some(HandCategory::FourOfAKind)
    } else if counts.contains(&3) {
        Some(HandCategory::ThreeOfAKind)
    } else if pairs >= 2 {
        Some(HandCategory::TwoPair)
    } else if pairs == 1 {
        Some(HandCategory::OnePair)
    } else {
        None
    };
    Ok(made)
}

fn partial_high_card(cards: &[Card]) -> HandResult {
    let mut sorted = cards.to_vec();
    sorted.sort_by(|a, b| b.rank.cmp(&a.rank));
    let kickers = sorted.iter().map(|c| c.rank.value()).collect();
    HandResult {
        category: HandCategory::HighCard,
        cards: sorted,
        kickers,
    }
}

/// Score exactly five cards.
fn score_five(five: &[Card]) -> HandResult {
    debug_assert_eq!(five.len(), 5);

    let mut counts = [0u8; 15];
    for card in five {
        counts[card.rank.value() as usize] += 1;
    }

    // (count, rank) groups, biggest group first, higher rank breaking ties
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .filter(|&r| counts[r as usize] > 0)
        .map(|r| (counts[r as usize], r))
        .collect();
    groups.sort_by(|a, b| b.cmp(a));

    let is_flush = five.iter().all(|c| c.suit == five[0].suit);
    let straight_high = if groups.len() == 5 {
        let high = groups[0].1;
        let low = groups[4].1;
        if high - low == 4 {
            Some(high)
        } else if high == 14 && groups[1].1 == 5 {
            // wheel: A-5-4-3-2 plays as a five-high straight
            Some(5)
        } else {
            None
        }
    } else {
        None
    };

    let shape: Vec<u8> = groups.iter().map(|&(c, _)| c).collect();
    let group_ranks: Vec<u8> = groups.iter().map(|&(_, r)| r).collect();

    let (category, kickers) = match (straight_high, is_flush, shape.as_slice()) {
        (Some(14), true, _) if DISTINCT_ROYAL_FLUSH => (HandCategory::RoyalFlush, vec![14]),
        (Some(high), true, _) => (HandCategory::StraightFlush, vec![high]),
        (_, _, [4, 1]) => (HandCategory::FourOfAKind, group_ranks),
        (_, _, [3, 2]) => (HandCategory::FullHouse, group_ranks),
        (_, true, _) => (HandCategory::Flush, group_ranks),
        (Some(high), false, _) => (HandCategory::Straight, vec![high]),
        (_, _, [3, 1, 1]) => (HandCategory::ThreeOfAKind, group_ranks),
        (_, _, [2, 2, 1]) => (HandCategory::TwoPair, group_ranks),
        (_, _, [2, 1, 1, 1]) => (HandCategory::OnePair, group_ranks),
        _ => (HandCategory::HighCard, group_ranks),
    };

    HandResult {
        category,
        cards: order_cards(five, &groups, straight_high == Some(5)),
        kickers,
    }
}

/// Lay the five cards out in order of significance: by group, then rank.
/// In a wheel the ace counts low and goes last.
fn order_cards(five: &[Card], groups: &[(u8, u8)], wheel: bool) -> Vec<Card> {
    let mut ordered = Vec::with_capacity(5);
    for &(_, rank) in groups {
        ordered.extend(five.iter().filter(|c| c.rank.value() == rank).copied());
    }
    if wheel {
        ordered.rotate_left(1);
    }
    ordered
}
