//! Where the hero's made hand stands against every holding an opponent
//! could have right now, with no cards to come.

use std::cmp::Ordering;
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::{card_to_index, index_to_card, remaining_indices};
use crate::error::{EngineError, EngineResult};
use crate::lookup_eval::evaluate_fast;
use crate::ranges::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldRanking {
    /// Opponent holdings that beat the hero.
    pub stronger: usize,
    pub tied: usize,
    pub weaker: usize,
    pub total: usize,
}

impl FieldRanking {
    /// Share of holdings the hero beats, counting ties as half.
    pub fn strength(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.weaker as f64 + 0.5 * self.tied as f64) / self.total as f64
    }
}

impl fmt::Display for FieldRanking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ahead of {} / tied with {} / behind {} of {} holdings ({:.1}%)",
            self.weaker,
            self.tied,
            self.stronger,
            self.total,
            self.strength() * 100.0
        )
    }
}

/// Count unseen two-card holdings that beat, tie or lose to the hero on the
/// current board. `filter` restricts the holdings to a range.
pub fn rank_against_field(hole: &[Card], board: &[Card], filter: Option<&Range>) -> EngineResult<FieldRanking> {
    if hole.len() != 2 {
        return Err(EngineError::InvalidHandSize {
            expected: "2 hole cards".to_string(),
            got: hole.len(),
        });
    }
    if !(3..=5).contains(&board.len()) {
        return Err(EngineError::InvalidHandSize {
            expected: "3-5 board cards".to_string(),
            got: board.len(),
        });
    }

    let known: Vec<Card> = hole.iter().chain(board).copied().collect();
    let unseen = remaining_indices(&known)?;
    let board_idx: Vec<u8> = board.iter().map(card_to_index).collect();

    let score_with = |a: u8, b: u8| {
        let mut cards = Vec::with_capacity(7);
        cards.push(a);
        cards.push(b);
        cards.extend_from_slice(&board_idx);
        evaluate_fast(&cards)
    };
    let hero = score_with(card_to_index(&hole[0]), card_to_index(&hole[1]));

    let mut ranking = FieldRanking::default();
    for (&a, &b) in unseen.iter().tuple_combinations() {
        if let Some(range) = filter {
            if !range.contains_cards(index_to_card(a), index_to_card(b)) {
                continue;
            }
        }
        match score_with(a, b).cmp(&hero) {
            Ordering::Greater => ranking.stronger += 1,
            Ordering::Equal => ranking.tied += 1,
            Ordering::Less => ranking.weaker += 1,
        }
        ranking.total += 1;
    }

    log::debug!("field ranking: {}", ranking);
    Ok(ranking)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_board;
    use crate::ranges::parse_range;

    fn cards(s: &str) -> Vec<Card> {
        parse_board(s).unwrap()
    }

    #[test]
    fn nuts_has_nothing_above() {
        let r = rank_against_field(&cards("AsKs"), &cards("QsJsTs2d3c"), None).unwrap();
        assert_eq!(r.stronger, 0);
        assert_eq!(r.tied, 0);
        assert_eq!(r.total, 990); // C(45, 2)
    }

    #[test]
    fn board_plays_ties_everyone() {
        // broadway straight on board, hero and every opponent play it
        let r = rank_against_field(&cards("2c3d"), &cards("AhKdQcJsTh"), None).unwrap();
        assert_eq!(r.weaker, 0);
        assert_eq!(r.stronger + r.tied, r.total);
        assert!(r.tied > 0);
    }

    #[test]
    fn filter_restricts_holdings() {
        let aces = parse_range("AA").unwrap();
        let r = rank_against_field(&cards("KhKd"), &cards("7c4s2d"), Some(&aces)).unwrap();
        assert_eq!(r.total, 6);
        assert_eq!(r.stronger, 6);
    }

    #[test]
    fn needs_a_flop() {
        assert!(rank_against_field(&cards("KhKd"), &cards("7c4s"), None).is_err());
    }
}
