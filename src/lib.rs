//! Texas Hold'em hand evaluation and equity engine.
//!
//! Card parsing, a best-of-seven hand evaluator, starting-hand notation and
//! ranges, Monte Carlo and exact equity, outs, and pot-odds arithmetic.
//! Every call is a pure computation; randomness comes from the caller.

pub mod cache;
pub mod cards;
pub mod deck;
pub mod equity;
pub mod error;
pub mod hand_evaluator;
pub mod lookup_eval;
pub mod math_engine;
pub mod matchups;
pub mod outs;
pub mod ranges;
pub mod report;

pub use cards::{parse_board, parse_card, parse_cards, Card, Rank, Suit};
pub use equity::{equity_vs_hand, estimate_equity, estimate_equity_with, EquityEstimate, EquityMethod, SimulationConfig};
pub use error::{EngineError, EngineResult};
pub use hand_evaluator::{compare_hands, evaluate_hand, HandCategory, HandResult};
pub use math_engine::{expected_value, pot_odds};
pub use ranges::{canonicalize, is_in_range, normalize_notation, StartingHand};
