//! Deck and card-set operations, plus the compact 0-51 index encoding the
//! packed-score evaluator and the simulator work in.
//!
//! Encoding: index = rank_offset * 4 + suit_offset
//!   rank_offset: 0=Two, 1=Three, ..., 12=Ace
//!   suit_offset: 0=Spades, 1=Hearts, 2=Diamonds, 3=Clubs

use crate::cards::{Card, Suit, ALL_RANKS, ALL_SUITS};
use crate::error::{EngineError, EngineResult};

pub const DECK_SIZE: usize = 52;

pub fn card_to_index(card: &Card) -> u8 {
    let rank_idx = card.rank.value() - 2;
    let suit_idx = match card.suit {
        Suit::Spades => 0,
        Suit::Hearts => 1,
        Suit::Diamonds => 2,
        Suit::Clubs => 3,
    };
    rank_idx * 4 + suit_idx
}

pub fn index_to_card(index: u8) -> Card {
    Card::new(ALL_RANKS[(index / 4) as usize], ALL_SUITS[(index % 4) as usize])
}

pub fn cards_to_indices(cards: &[Card]) -> Vec<u8> {
    cards.iter().map(card_to_index).collect()
}

/// All 52 cards, Two of spades first, Ace of clubs last.
pub fn full_deck() -> Vec<Card> {
    (0..DECK_SIZE as u8).map(index_to_card).collect()
}

/// Mark every known card, failing on the first repeat.
fn dead_mask(known: &[Card]) -> EngineResult<[bool; DECK_SIZE]> {
    let mut dead = [false; DECK_SIZE];
    for card in known {
        let idx = card_to_index(card) as usize;
        if dead[idx] {
            return Err(EngineError::DuplicateCard(card.to_string()));
        }
        dead[idx] = true;
    }
    Ok(dead)
}

/// Reject any card set that names the same card twice.
pub fn ensure_unique(cards: &[Card]) -> EngineResult<()> {
    dead_mask(cards).map(|_| ())
}

/// The unseen cards: the full deck minus `known` (hero hole cards + board).
/// Size is always `52 - known.len()`.
pub fn remaining_deck(known: &[Card]) -> EngineResult<Vec<Card>> {
    Ok(remaining_indices(known)?.into_iter().map(index_to_card).collect())
}

/// Same as [`remaining_deck`], in index form.
pub fn remaining_indices(known: &[Card]) -> EngineResult<Vec<u8>> {
    let dead = dead_mask(known)?;
    Ok((0..DECK_SIZE as u8).filter(|&c| !dead[c as usize]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{parse_board, Rank};

    #[test]
    fn index_roundtrip() {
        for i in 0..52u8 {
            let card = index_to_card(i);
            assert_eq!(card_to_index(&card), i, "roundtrip failed for index {}", i);
        }
    }

    #[test]
    fn known_indices() {
        assert_eq!(card_to_index(&Card::new(Rank::Two, Suit::Spades)), 0);
        assert_eq!(card_to_index(&Card::new(Rank::Ace, Suit::Clubs)), 51);
        assert_eq!(card_to_index(&Card::new(Rank::Ace, Suit::Spades)), 48);
    }

    #[test]
    fn full_deck_is_unique() {
        let deck = full_deck();
        assert_eq!(deck.len(), 52);
        assert!(ensure_unique(&deck).is_ok());
    }

    #[test]
    fn remaining_excludes_known() {
        let known = parse_board("AsKsQsJsTs").unwrap();
        let deck = remaining_deck(&known).unwrap();
        assert_eq!(deck.len(), 47);
        for card in &known {
            assert!(!deck.contains(card));
        }
    }

    #[test]
    fn duplicate_known_card_rejected() {
        let known = parse_board("AsKdAs").unwrap();
        match remaining_deck(&known) {
            Err(EngineError::DuplicateCard(c)) => assert_eq!(c, "As"),
            other => panic!("expected DuplicateCard, got {:?}", other),
        }
    }
}
