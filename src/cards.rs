//! Card model: ranks, suits, and the single parsing entry point for every
//! textual card notation callers hand us.
//!
//! Accepted forms (case-insensitive, tried in this order):
//!   1. rank + Unicode suit glyph: "A♠", "10♥", "t♦"
//!   2. rank + ASCII suit letter:  "Ah", "10h", "tc"
//!
//! where rank is one of 2-9, T, 10, J, Q, K, A. Canonical rendering is always
//! two characters, e.g. "Ah", "Td".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Rank {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

pub const ALL_RANKS: [Rank; 13] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

impl Rank {
    /// Numeric value 2-14.
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn from_value(value: u8) -> Option<Rank> {
        match value {
            2..=14 => Some(ALL_RANKS[(value - 2) as usize]),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    pub fn from_symbol(c: char) -> Option<Rank> {
        match c.to_ascii_uppercase() {
            '2' => Some(Rank::Two),
            '3' => Some(Rank::Three),
            '4' => Some(Rank::Four),
            '5' => Some(Rank::Five),
            '6' => Some(Rank::Six),
            '7' => Some(Rank::Seven),
            '8' => Some(Rank::Eight),
            '9' => Some(Rank::Nine),
            'T' => Some(Rank::Ten),
            'J' => Some(Rank::Jack),
            'Q' => Some(Rank::Queen),
            'K' => Some(Rank::King),
            'A' => Some(Rank::Ace),
            _ => None,
        }
    }

    /// Parse a rank token: a single symbol or the two-character "10".
    pub fn parse_token(token: &str) -> Option<Rank> {
        if token == "10" {
            return Some(Rank::Ten);
        }
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Rank::from_symbol(c),
            _ => None,
        }
    }

    /// Plural English name, used in hand descriptions ("Kings", "Sixes").
    pub fn plural(self) -> &'static str {
        match self {
            Rank::Two => "Twos",
            Rank::Three => "Threes",
            Rank::Four => "Fours",
            Rank::Five => "Fives",
            Rank::Six => "Sixes",
            Rank::Seven => "Sevens",
            Rank::Eight => "Eights",
            Rank::Nine => "Nines",
            Rank::Ten => "Tens",
            Rank::Jack => "Jacks",
            Rank::Queen => "Queens",
            Rank::King => "Kings",
            Rank::Ace => "Aces",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Rank::Two => "Two",
            Rank::Three => "Three",
            Rank::Four => "Four",
            Rank::Five => "Five",
            Rank::Six => "Six",
            Rank::Seven => "Seven",
            Rank::Eight => "Eight",
            Rank::Nine => "Nine",
            Rank::Ten => "Ten",
            Rank::Jack => "Jack",
            Rank::Queen => "Queen",
            Rank::King => "King",
            Rank::Ace => "Ace",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Suits carry no ordering semantics in poker; `Ord` exists only so cards
/// can be sorted into a stable canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

pub const ALL_SUITS: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

impl Suit {
    pub fn letter(self) -> char {
        match self {
            Suit::Spades => 's',
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
            Suit::Clubs => 'c',
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Suit::Spades => '\u{2660}',
            Suit::Hearts => '\u{2665}',
            Suit::Diamonds => '\u{2666}',
            Suit::Clubs => '\u{2663}',
        }
    }

    pub fn from_letter(c: char) -> Option<Suit> {
        match c.to_ascii_lowercase() {
            's' => Some(Suit::Spades),
            'h' => Some(Suit::Hearts),
            'd' => Some(Suit::Diamonds),
            'c' => Some(Suit::Clubs),
            _ => None,
        }
    }

    /// Filled and outlined suit glyphs.
    pub fn from_glyph(c: char) -> Option<Suit> {
        match c {
            '\u{2660}' | '\u{2664}' => Some(Suit::Spades),
            '\u{2665}' | '\u{2661}' => Some(Suit::Hearts),
            '\u{2666}' | '\u{2662}' => Some(Suit::Diamonds),
            '\u{2663}' | '\u{2667}' => Some(Suit::Clubs),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }

    /// Rank followed by the Unicode suit glyph, e.g. "A♠".
    pub fn pretty(&self) -> String {
        format!("{}{}", self.rank.symbol(), self.suit.glyph())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.symbol(), self.suit.letter())
    }
}

impl FromStr for Card {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        parse_card(s)
    }
}

impl From<Card> for String {
    fn from(card: Card) -> String {
        card.to_string()
    }
}

impl TryFrom<String> for Card {
    type Error = EngineError;

    fn try_from(s: String) -> EngineResult<Self> {
        parse_card(&s)
    }
}

/// Emoji presentation selector some sources append to suit glyphs.
const VARIATION_SELECTOR: char = '\u{FE0F}';

/// Parse a single card token in any supported notation.
pub fn parse_card(token: &str) -> EngineResult<Card> {
    let cleaned: String = token
        .trim()
        .chars()
        .filter(|&c| c != VARIATION_SELECTOR)
        .collect();

    let invalid = || EngineError::InvalidCard(token.to_string());

    let suit_char = cleaned.chars().last().ok_or_else(invalid)?;
    let rank_part = &cleaned[..cleaned.len() - suit_char.len_utf8()];

    let suit = Suit::from_glyph(suit_char)
        .or_else(|| Suit::from_letter(suit_char))
        .ok_or_else(invalid)?;
    let rank = Rank::parse_token(rank_part).ok_or_else(invalid)?;

    Ok(Card::new(rank, suit))
}

/// Parse a list of separate card tokens.
pub fn parse_cards<S: AsRef<str>>(tokens: &[S]) -> EngineResult<Vec<Card>> {
    tokens.iter().map(|t| parse_card(t.as_ref())).collect()
}

/// Parse a board string. Tokens may be concatenated ("AsKd5h", "10h9♠")
/// or separated by whitespace and commas ("A♠, K♦, 5h").
pub fn parse_board(s: &str) -> EngineResult<Vec<Card>> {
    let chars: Vec<char> = s
        .chars()
        .filter(|&c| !c.is_whitespace() && c != ',' && c != VARIATION_SELECTOR)
        .collect();

    let mut cards = Vec::with_capacity(chars.len() / 2);
    let mut i = 0;
    while i < chars.len() {
        let rank_len = if chars[i] == '1' && chars.get(i + 1) == Some(&'0') { 2 } else { 1 };
        let end = i + rank_len + 1;
        if end > chars.len() {
            let rest: String = chars[i..].iter().collect();
            return Err(EngineError::InvalidCard(rest));
        }
        let token: String = chars[i..end].iter().collect();
        cards.push(parse_card(&token)?);
        i = end;
    }
    Ok(cards)
}
