//! Outs: unseen cards that lift the hero into a stronger hand category.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::remaining_deck;
use crate::error::{EngineError, EngineResult};
use crate::hand_evaluator::{evaluate_hand, HandCategory};
use crate::math_engine::binomial;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutsGroup {
    pub category: HandCategory,
    pub cards: Vec<Card>,
    /// Chance of catching at least one of these cards by the river.
    pub probability: f64,
}

impl OutsGroup {
    pub fn count(&self) -> usize {
        self.cards.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutsReport {
    /// The hero's category on the current board.
    pub current: HandCategory,
    /// Strongest category first.
    pub groups: Vec<OutsGroup>,
    pub total_outs: usize,
    pub probability: f64,
    /// Cards still to come (2 on the flop, 1 on the turn).
    pub draws: usize,
}

/// P(at least one of `outs` among `draws` cards dealt from `unseen`).
pub fn hit_probability(outs: usize, unseen: usize, draws: usize) -> f64 {
    let total = binomial(unseen as u64, draws as u64);
    if total == 0 || outs == 0 {
        return 0.0;
    }
    let miss = binomial(unseen.saturating_sub(outs) as u64, draws as u64);
    1.0 - miss as f64 / total as f64
}

/// Count outs on a flop or turn. Each unseen card is placed in the group of
/// the best category it makes; cards that leave the category unchanged are
/// not outs.
pub fn count_outs(hole: &[Card], board: &[Card]) -> EngineResult<OutsReport> {
    if !(3..=4).contains(&board.len()) {
        return Err(EngineError::InvalidHandSize {
            expected: "3 or 4 board cards".to_string(),
            got: board.len(),
        });
    }
    let current = evaluate_hand(hole, board)?.category;

    let known: Vec<Card> = hole.iter().chain(board).copied().collect();
    let unseen = remaining_deck(&known)?;
    let draws = 5 - board.len();

    let mut groups: Vec<OutsGroup> = Vec::new();
    let mut next = board.to_vec();
    for &card in &unseen {
        next.push(card);
        let made = evaluate_hand(hole, &next)?.category;
        next.pop();
        if made <= current {
            continue;
        }
        match groups.iter_mut().find(|g| g.category == made) {
            Some(group) => group.cards.push(card),
            None => groups.push(OutsGroup {
                category: made,
                cards: vec![card],
                probability: 0.0,
            }),
        }
    }

    groups.sort_by(|a, b| b.category.cmp(&a.category));
    for group in &mut groups {
        group.probability = hit_probability(group.count(), unseen.len(), draws);
    }
    let total_outs: usize = groups.iter().map(OutsGroup::count).sum();

    Ok(OutsReport {
        current,
        groups,
        total_outs,
        probability: hit_probability(total_outs, unseen.len(), draws),
        draws,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_board;
    use approx::assert_abs_diff_eq;

    fn cards(s: &str) -> Vec<Card> {
        parse_board(s).unwrap()
    }

    #[test]
    fn flush_draw_on_flop() {
        let report = count_outs(&cards("AhKh"), &cards("7h2h9c")).unwrap();
        assert_eq!(report.current, HandCategory::HighCard);
        let flush = report.groups.iter().find(|g| g.category == HandCategory::Flush).unwrap();
        assert_eq!(flush.count(), 9);
        // 9 outs twice: 1 - (38*37)/(47*46)
        assert_abs_diff_eq!(flush.probability, 1.0 - (38.0 * 37.0) / (47.0 * 46.0), epsilon = 1e-9);
        // three each of A, K, 7, 2 and the two non-heart nines
        let pair = report.groups.iter().find(|g| g.category == HandCategory::OnePair).unwrap();
        assert_eq!(pair.count(), 14);
    }

    #[test]
    fn open_ender_on_turn() {
        let report = count_outs(&cards("9s8d"), &cards("7c6h2s Kd")).unwrap();
        let straight = report.groups.iter().find(|g| g.category == HandCategory::Straight).unwrap();
        assert_eq!(straight.count(), 8);
        assert_eq!(report.draws, 1);
        assert_abs_diff_eq!(straight.probability, 8.0 / 46.0, epsilon = 1e-9);
    }

    #[test]
    fn groups_strongest_first() {
        let report = count_outs(&cards("AhKh"), &cards("7h2h9c")).unwrap();
        for pair in report.groups.windows(2) {
            assert!(pair[0].category > pair[1].category);
        }
    }

    #[test]
    fn requires_flop_or_turn() {
        assert!(count_outs(&cards("AhKh"), &[]).is_err());
        assert!(count_outs(&cards("AhKh"), &cards("2c3c4c5c6d")).is_err());
    }

    #[test]
    fn hit_probability_edges() {
        assert_eq!(hit_probability(0, 47, 2), 0.0);
        assert_eq!(hit_probability(47, 47, 1), 1.0);
    }
}
