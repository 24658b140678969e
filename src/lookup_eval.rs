//! Packed-score evaluator for the simulator's hot loop.
//!
//! Returns a u32 "hand score" where higher = better hand. Scores compare
//! directly with `>` / `<` / `==` and agree with the ordering of
//! [`crate::hand_evaluator::HandResult`] on every input.
//!
//! Encoding (24 bits used):
//!   bits 23-20: category weight (1=HighCard .. 10=RoyalFlush)
//!   bits 19-16: first kicker (rank value 2-14)
//!   bits 15-12: second kicker
//!   bits 11-8:  third kicker
//!   bits  7-4:  fourth kicker
//!   bits  3-0:  fifth kicker

use once_cell::sync::Lazy;

use crate::cards::Card;
use crate::deck::card_to_index;
use crate::hand_evaluator::{HandCategory, DISTINCT_ROYAL_FLUSH};

/// Bit layout of rank masks: bit 0 = Two(2), ..., bit 12 = Ace(14).
const WHEEL_MASK: u16 = (1 << 12) | 0b1111;

/// For a 13-bit rank mask, the high card (5-14) of the best straight it
/// contains, or 0 if there is none.
static STRAIGHT_TABLE: Lazy<[u8; 8192]> = Lazy::new(|| {
    let mut table = [0u8; 8192];
    for (mask, slot) in table.iter_mut().enumerate() {
        let mask = mask as u16;
        *slot = (4..=12u8)
            .rev()
            .find(|&top| {
                let run = 0x1Fu16 << (top - 4);
                mask & run == run
            })
            .map(|top| top + 2)
            .unwrap_or(if mask & WHEEL_MASK == WHEEL_MASK { 5 } else { 0 });
    }
    table
});

#[inline]
fn pack(category: HandCategory, kickers: &[u8]) -> u32 {
    let mut score = (category.weight() as u32) << 20;
    for (i, &r) in kickers.iter().take(5).enumerate() {
        score |= (r as u32) << (16 - 4 * i as u32);
    }
    score
}

/// Rank values of the `n` highest set bits, high to low.
#[inline]
fn top_ranks(mask: u16, n: usize) -> Vec<u8> {
    (0..13u8)
        .rev()
        .filter(|&bit| mask & (1 << bit) != 0)
        .take(n)
        .map(|bit| bit + 2)
        .collect()
}

#[inline]
fn top_bit(mask: u16) -> Option<u8> {
    (mask != 0).then(|| 15 - mask.leading_zeros() as u8)
}

#[inline]
fn bit_of(rank: u8) -> u16 {
    1 << (rank - 2)
}

/// Score 5-7 cards given as 0-51 indices.
pub fn evaluate_fast(cards: &[u8]) -> u32 {
    debug_assert!(cards.len() >= 5 && cards.len() <= 7);

    let mut rank_counts = [0u8; 13];
    let mut suit_masks = [0u16; 4];
    let mut suit_counts = [0u8; 4];
    for &c in cards {
        let rank = (c >> 2) as usize;
        let suit = (c & 0x3) as usize;
        rank_counts[rank] += 1;
        suit_masks[suit] |= 1 << rank;
        suit_counts[suit] += 1;
    }

    // With at most 7 cards a flush excludes quads and full houses, so the
    // flush branch can return straight away.
    if let Some(suit) = suit_counts.iter().position(|&n| n >= 5) {
        let flush_mask = suit_masks[suit];
        return match STRAIGHT_TABLE[flush_mask as usize] {
            0 => pack(HandCategory::Flush, &top_ranks(flush_mask, 5)),
            14 if DISTINCT_ROYAL_FLUSH => pack(HandCategory::RoyalFlush, &[14]),
            high => pack(HandCategory::StraightFlush, &[high]),
        };
    }

    // by_count[n] = ranks appearing exactly n times
    let mut by_count = [0u16; 5];
    for (rank, &n) in rank_counts.iter().enumerate() {
        by_count[n as usize] |= 1 << rank;
    }
    let present = !by_count[0] & 0x1FFF;

    if let Some(quad) = top_bit(by_count[4]) {
        let rest = present & !(1 << quad);
        let kicker = top_ranks(rest, 1);
        return pack(HandCategory::FourOfAKind, &[quad + 2, kicker[0]]);
    }

    if let Some(trip) = top_bit(by_count[3]) {
        let pair_candidates = (by_count[3] & !(1 << trip)) | by_count[2];
        if let Some(pair) = top_bit(pair_candidates) {
            return pack(HandCategory::FullHouse, &[trip + 2, pair + 2]);
        }
    }

    let straight_high = STRAIGHT_TABLE[present as usize];
    if straight_high > 0 {
        return pack(HandCategory::Straight, &[straight_high]);
    }

    if let Some(trip) = top_bit(by_count[3]) {
        let mut kickers = vec![trip + 2];
        kickers.extend(top_ranks(by_count[1], 2));
        return pack(HandCategory::ThreeOfAKind, &kickers);
    }

    let pairs = top_ranks(by_count[2], 2);
    match pairs.len() {
        2 => {
            let rest = present & !bit_of(pairs[0]) & !bit_of(pairs[1]);
            let kicker = top_ranks(rest, 1);
            pack(HandCategory::TwoPair, &[pairs[0], pairs[1], kicker[0]])
        }
        1 => {
            let mut kickers = pairs;
            kickers.extend(top_ranks(by_count[1], 3));
            pack(HandCategory::OnePair, &kickers)
        }
        _ => pack(HandCategory::HighCard, &top_ranks(by_count[1], 5)),
    }
}

/// Convenience wrapper over [`evaluate_fast`] for `Card` slices.
pub fn score_cards(cards: &[Card]) -> u32 {
    let idx: Vec<u8> = cards.iter().map(card_to_index).collect();
    evaluate_fast(&idx)
}

/// Extract the HandCategory from a packed score.
pub fn category_from_score(score: u32) -> HandCategory {
    HandCategory::from_weight(((score >> 20) & 0xF) as u8).unwrap_or(HandCategory::HighCard)
}

/// Extract kicker values from a packed score (up to 5 values).
pub fn kickers_from_score(score: u32) -> Vec<u8> {
    (0..5)
        .map(|i| ((score >> (16 - 4 * i)) & 0xF) as u8)
        .filter(|&v| v > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_board;

    fn score(s: &str) -> u32 {
        score_cards(&parse_board(s).unwrap())
    }

    #[test]
    fn categories() {
        let cases = [
            ("AsKsQsJsTs", HandCategory::RoyalFlush),
            ("7h6h5h4h3h", HandCategory::StraightFlush),
            ("Ah2h3h4h5h", HandCategory::StraightFlush),
            ("KsKhKdKcAs", HandCategory::FourOfAKind),
            ("AsAhAdKsKh", HandCategory::FullHouse),
            ("AsTs8s5s2s", HandCategory::Flush),
            ("9s8h7d6c5s", HandCategory::Straight),
            ("As2h3d4c5s", HandCategory::Straight),
            ("QsQhQdKs7h", HandCategory::ThreeOfAKind),
            ("AsAdKhKsQc", HandCategory::TwoPair),
            ("AsAhKdQsJh", HandCategory::OnePair),
            ("AsKhQdJs9c", HandCategory::HighCard),
        ];
        for (cards, expected) in cases {
            assert_eq!(category_from_score(score(cards)), expected, "{}", cards);
        }
    }

    #[test]
    fn wheel_below_six_high() {
        assert!(score("2s3h4d5c6s") > score("As2h3d4c5s"));
        assert_eq!(kickers_from_score(score("As2h3d4c5s")), vec![5]);
    }

    #[test]
    fn seven_card_full_house_from_two_trips() {
        let s = score("AhAsAdKsKhKc2d");
        assert_eq!(category_from_score(s), HandCategory::FullHouse);
        assert_eq!(kickers_from_score(s), vec![14, 13]);
    }

    #[test]
    fn seven_card_quads_kicker_from_pair() {
        let s = score("9s9h9d9cQsQh2d");
        assert_eq!(kickers_from_score(s), vec![9, 12]);
    }

    #[test]
    fn seven_card_two_pair_third_pair_kicker() {
        let s = score("AsAdKhKdQsQdJc");
        assert_eq!(category_from_score(s), HandCategory::TwoPair);
        assert_eq!(kickers_from_score(s), vec![14, 13, 12]);
    }

    #[test]
    fn straight_beats_trips_in_seven() {
        let s = score("7s7h7d8c9sTd6h");
        assert_eq!(category_from_score(s), HandCategory::Straight);
        assert_eq!(kickers_from_score(s), vec![10]);
    }

    #[test]
    fn straight_table_picks_highest_run() {
        // 2..7 present: 7-high beats 6-high
        assert_eq!(STRAIGHT_TABLE[0b111111], 7);
        assert_eq!(STRAIGHT_TABLE[WHEEL_MASK as usize], 5);
        assert_eq!(STRAIGHT_TABLE[0b1011111], 6);
        assert_eq!(STRAIGHT_TABLE[0], 0);
    }
}
