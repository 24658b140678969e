//! Equity estimation: Monte Carlo sampling and exact enumeration.
//!
//! Everything runs in the 0-51 index space with the packed-score evaluator.
//! Randomness always comes from the caller's RNG. Trials are split into
//! fixed-size chunks, each seeded from that RNG up front, and the chunk
//! tallies are folded in chunk order. A given seed therefore produces
//! bit-identical results whether the chunks run on one thread or many.

use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{self, AtomicBool};

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::{card_to_index, ensure_unique, remaining_indices};
use crate::error::{EngineError, EngineResult};
use crate::lookup_eval::evaluate_fast;
use crate::math_engine::binomial;
use crate::ranges::Range;

// ---------------------------------------------------------------------------
// Configuration and results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquityMethod {
    /// Random sampling of `trials` deals.
    MonteCarlo,
    /// Enumerate every runout and opponent holding. Single opponent only.
    Exact,
    /// Exact when there is one opponent and the enumeration fits within
    /// `exact_limit` showdowns, Monte Carlo otherwise.
    #[default]
    Auto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Monte Carlo trials. Zero is allowed and yields an empty estimate.
    pub trials: usize,
    pub method: EquityMethod,
    /// Run chunks on the rayon pool.
    pub parallel: bool,
    /// Trials per independently seeded chunk.
    pub chunk_size: usize,
    /// Largest number of showdowns exact enumeration will take on.
    pub exact_limit: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            trials: 2_000,
            method: EquityMethod::Auto,
            parallel: true,
            chunk_size: 256,
            exact_limit: 2_000_000,
        }
    }
}

impl SimulationConfig {
    pub fn monte_carlo(trials: usize) -> Self {
        SimulationConfig {
            trials,
            method: EquityMethod::MonteCarlo,
            ..SimulationConfig::default()
        }
    }

    pub fn exact() -> Self {
        SimulationConfig {
            method: EquityMethod::Exact,
            ..SimulationConfig::default()
        }
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    fn validate(&self) -> EngineResult<()> {
        if self.chunk_size == 0 {
            return Err(EngineError::InvalidArgument("chunk_size must be positive".to_string()));
        }
        Ok(())
    }
}

/// Outcome of an equity calculation.
///
/// `win_rate` is the hero's equity: outright wins plus the hero's share of
/// split pots (1/k of a pot split k ways). `tie_rate` is how often the pot
/// was split at all, regardless of how many ways.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityEstimate {
    /// (wins + split credit) / trials.
    pub win_rate: f64,
    /// Raw fraction of trials that ended in any split.
    pub tie_rate: f64,
    /// Fraction of trials the hero won alone.
    pub outright_win_rate: f64,
    /// Trials (or enumerated showdowns) actually executed.
    pub trials: usize,
    /// True when produced by exact enumeration.
    pub exact: bool,
}

impl EquityEstimate {
    pub fn equity(&self) -> f64 {
        self.win_rate
    }

    /// Share of split-pot equity folded into `win_rate`.
    pub fn split_equity(&self) -> f64 {
        self.win_rate - self.outright_win_rate
    }

    pub fn loss_rate(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            (1.0 - self.outright_win_rate - self.tie_rate).max(0.0)
        }
    }

    fn uncontested(trials: usize) -> Self {
        EquityEstimate {
            win_rate: 1.0,
            tie_rate: 0.0,
            outright_win_rate: 1.0,
            trials,
            exact: false,
        }
    }
}

impl fmt::Display for EquityEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Equity {:.1}% (win {:.1}% | tie {:.1}% | lose {:.1}%, {} {})",
            self.equity() * 100.0,
            self.outright_win_rate * 100.0,
            self.tie_rate * 100.0,
            self.loss_rate() * 100.0,
            self.trials,
            if self.exact { "showdowns" } else { "trials" },
        )
    }
}

// ---------------------------------------------------------------------------
// Tallying
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    wins: u64,
    ties: u64,
    losses: u64,
    tie_credit: f64,
}

impl Tally {
    fn record(&mut self, hero: u32, opponents: &[u32]) {
        let best = opponents.iter().copied().max().unwrap_or(0);
        match hero.cmp(&best) {
            Ordering::Greater => self.wins += 1,
            Ordering::Less => self.losses += 1,
            Ordering::Equal => {
                let sharing = 1 + opponents.iter().filter(|&&s| s == hero).count();
                self.ties += 1;
                self.tie_credit += 1.0 / sharing as f64;
            }
        }
    }

    fn merge(mut self, other: Tally) -> Tally {
        self.wins += other.wins;
        self.ties += other.ties;
        self.losses += other.losses;
        self.tie_credit += other.tie_credit;
        self
    }

    fn total(&self) -> u64 {
        self.wins + self.ties + self.losses
    }

    fn into_estimate(self, exact: bool) -> EquityEstimate {
        let total = self.total();
        if total == 0 {
            return EquityEstimate {
                win_rate: 0.0,
                tie_rate: 0.0,
                outright_win_rate: 0.0,
                trials: 0,
                exact,
            };
        }
        let n = total as f64;
        EquityEstimate {
            win_rate: (self.wins as f64 + self.tie_credit) / n,
            tie_rate: self.ties as f64 / n,
            outright_win_rate: self.wins as f64 / n,
            trials: total as usize,
            exact,
        }
    }
}

// ---------------------------------------------------------------------------
// Simulation setup
// ---------------------------------------------------------------------------

/// Who the hero is up against.
enum Villains {
    /// `n` opponents holding random unseen cards.
    Random(usize),
    /// Opponents with known hole cards (already removed from the deck).
    Fixed(Vec<[u8; 2]>),
    /// One opponent holding a uniformly chosen combo from this list.
    Range(Vec<[u8; 2]>),
}

struct Setup {
    hero: [u8; 2],
    board: Vec<u8>,
    /// Cards the simulation may deal.
    deck: Vec<u8>,
    villains: Villains,
}

impl Setup {
    fn runout_len(&self) -> usize {
        5 - self.board.len()
    }

    /// Cards drawn from the shuffled deck on each trial.
    fn draw_len(&self) -> usize {
        match &self.villains {
            Villains::Random(n) => self.runout_len() + 2 * n,
            Villains::Fixed(_) => self.runout_len(),
            // two spares cover a runout card colliding with the chosen combo
            Villains::Range(_) => self.runout_len() + 2,
        }
    }

    fn opponent_count(&self) -> usize {
        match &self.villains {
            Villains::Random(n) => *n,
            Villains::Fixed(v) => v.len(),
            Villains::Range(_) => 1,
        }
    }

    fn check_deck(&self) -> EngineResult<()> {
        let needed = self.draw_len();
        if needed > self.deck.len() {
            return Err(EngineError::InsufficientDeck {
                needed,
                available: self.deck.len(),
            });
        }
        Ok(())
    }
}

fn hole_indices(hole: &[Card], what: &str) -> EngineResult<[u8; 2]> {
    match hole {
        [a, b] => Ok([card_to_index(a), card_to_index(b)]),
        _ => Err(EngineError::InvalidHandSize {
            expected: format!("2 {} cards", what),
            got: hole.len(),
        }),
    }
}

fn check_board(board: &[Card]) -> EngineResult<()> {
    if board.len() > 5 {
        return Err(EngineError::InvalidHandSize {
            expected: "0-5 board cards".to_string(),
            got: board.len(),
        });
    }
    Ok(())
}

#[inline]
fn seven(hole: [u8; 2], board: &[u8; 5]) -> u32 {
    evaluate_fast(&[hole[0], hole[1], board[0], board[1], board[2], board[3], board[4]])
}

fn cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.is_some_and(|c| c.load(atomic::Ordering::Relaxed))
}

// ---------------------------------------------------------------------------
// Monte Carlo
// ---------------------------------------------------------------------------

/// Play one random deal and record it.
fn play_trial<R: Rng>(setup: &Setup, deck: &mut [u8], scores: &mut Vec<u32>, rng: &mut R, tally: &mut Tally) {
    let draw = setup.draw_len();
    for k in 0..draw {
        let j = rng.gen_range(k..deck.len());
        deck.swap(k, j);
    }

    let runout = setup.runout_len();
    let mut board = [0u8; 5];
    board[..setup.board.len()].copy_from_slice(&setup.board);
    scores.clear();

    match &setup.villains {
        Villains::Random(n) => {
            board[setup.board.len()..].copy_from_slice(&deck[..runout]);
            for v in 0..*n {
                let at = runout + 2 * v;
                scores.push(seven([deck[at], deck[at + 1]], &board));
            }
        }
        Villains::Fixed(holes) => {
            board[setup.board.len()..].copy_from_slice(&deck[..runout]);
            scores.extend(holes.iter().map(|&h| seven(h, &board)));
        }
        Villains::Range(combos) => {
            let combo = combos[rng.gen_range(0..combos.len())];
            let live = deck[..draw].iter().filter(|&&c| !combo.contains(&c)).take(runout);
            for (slot, &c) in board[setup.board.len()..].iter_mut().zip(live) {
                *slot = c;
            }
            scores.push(seven(combo, &board));
        }
    }

    tally.record(seven(setup.hero, &board), scores);
}

fn run_monte_carlo<R: Rng>(
    setup: &Setup,
    config: &SimulationConfig,
    rng: &mut R,
    cancel: Option<&AtomicBool>,
) -> EquityEstimate {
    let trials = config.trials;
    let chunk = config.chunk_size;
    let chunks: Vec<(u64, usize)> = (0..trials.div_ceil(chunk))
        .map(|i| (rng.gen::<u64>(), chunk.min(trials - i * chunk)))
        .collect();

    let run_chunk = |&(seed, n): &(u64, usize)| -> Tally {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut deck = setup.deck.clone();
        let mut scores = Vec::with_capacity(setup.opponent_count());
        let mut tally = Tally::default();
        for _ in 0..n {
            if cancelled(cancel) {
                break;
            }
            play_trial(setup, &mut deck, &mut scores, &mut rng, &mut tally);
        }
        tally
    };

    let tallies: Vec<Tally> = if config.parallel {
        chunks.par_iter().map(run_chunk).collect()
    } else {
        chunks.iter().map(run_chunk).collect()
    };

    let tally = tallies.into_iter().fold(Tally::default(), Tally::merge);
    if cancelled(cancel) {
        log::warn!("equity simulation cancelled after {} of {} trials", tally.total(), trials);
    }
    tally.into_estimate(false)
}

// ---------------------------------------------------------------------------
// Exact enumeration
// ---------------------------------------------------------------------------

/// Every villain holding the enumeration walks over, plus the deck the
/// runouts come from (villain cards filtered per holding).
fn exact_holdings(setup: &Setup) -> Option<(Vec<[u8; 2]>, Vec<u8>)> {
    match &setup.villains {
        Villains::Random(1) => {
            let holdings = setup.deck.iter().tuple_combinations().map(|(&a, &b)| [a, b]).collect();
            Some((holdings, setup.deck.clone()))
        }
        Villains::Fixed(holes) if holes.len() == 1 => {
            let mut deck = setup.deck.clone();
            deck.extend_from_slice(&holes[0]);
            Some((holes.clone(), deck))
        }
        Villains::Range(combos) => Some((combos.clone(), setup.deck.clone())),
        _ => None,
    }
}

/// Showdowns an exact enumeration would evaluate, if it's possible at all.
fn exact_size(setup: &Setup) -> Option<u64> {
    let holdings = match &setup.villains {
        Villains::Random(1) => binomial(setup.deck.len() as u64, 2),
        Villains::Fixed(holes) if holes.len() == 1 => 1,
        Villains::Range(combos) => combos.len() as u64,
        _ => return None,
    };
    let live = match &setup.villains {
        Villains::Fixed(_) => setup.deck.len(),
        _ => setup.deck.len().saturating_sub(2),
    };
    Some(holdings.saturating_mul(binomial(live as u64, setup.runout_len() as u64)))
}

fn run_exact(setup: &Setup, config: &SimulationConfig, cancel: Option<&AtomicBool>) -> EquityEstimate {
    let Some((holdings, deck)) = exact_holdings(setup) else {
        return Tally::default().into_estimate(true);
    };
    let runout = setup.runout_len();
    let known = setup.board.len();

    let run_holding = |villain: &[u8; 2]| -> Tally {
        let mut tally = Tally::default();
        if cancelled(cancel) {
            return tally;
        }
        let mut board = [0u8; 5];
        board[..known].copy_from_slice(&setup.board);
        if runout == 0 {
            tally.record(seven(setup.hero, &board), &[seven(*villain, &board)]);
            return tally;
        }
        let live: Vec<u8> = deck.iter().copied().filter(|c| !villain.contains(c)).collect();
        for cards in live.into_iter().combinations(runout) {
            board[known..].copy_from_slice(&cards);
            tally.record(seven(setup.hero, &board), &[seven(*villain, &board)]);
        }
        tally
    };

    let tallies: Vec<Tally> = if config.parallel {
        holdings.par_iter().map(run_holding).collect()
    } else {
        holdings.iter().map(run_holding).collect()
    };
    let tally = tallies.into_iter().fold(Tally::default(), Tally::merge);
    if cancelled(cancel) {
        log::warn!("exact enumeration cancelled after {} showdowns", tally.total());
    }
    tally.into_estimate(true)
}

fn dispatch<R: Rng>(
    setup: &Setup,
    config: &SimulationConfig,
    rng: &mut R,
    cancel: Option<&AtomicBool>,
) -> EngineResult<EquityEstimate> {
    config.validate()?;
    setup.check_deck()?;

    let use_exact = match config.method {
        EquityMethod::MonteCarlo => false,
        EquityMethod::Exact => match exact_size(setup) {
            None => {
                return Err(EngineError::InvalidArgument(
                    "exact enumeration supports a single opponent only".to_string(),
                ))
            }
            Some(n) if n > config.exact_limit => {
                return Err(EngineError::InvalidArgument(format!(
                    "exact enumeration needs {} showdowns, limit is {}",
                    n, config.exact_limit
                )))
            }
            Some(_) => true,
        },
        EquityMethod::Auto => exact_size(setup).is_some_and(|n| n <= config.exact_limit),
    };

    log::debug!(
        "equity: {} opponent(s), board {} card(s), {}",
        setup.opponent_count(),
        setup.board.len(),
        if use_exact { "exact".to_string() } else { format!("{} trials", config.trials) },
    );

    let estimate = if use_exact {
        run_exact(setup, config, cancel)
    } else {
        run_monte_carlo(setup, config, rng, cancel)
    };
    log::debug!("equity result: {}", estimate);
    Ok(estimate)
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Hero equity against `opponents` players holding unknown cards, with the
/// default configuration: `trials` Monte Carlo deals.
pub fn estimate_equity<R: Rng>(
    hero: &[Card],
    board: &[Card],
    opponents: usize,
    trials: usize,
    rng: &mut R,
) -> EngineResult<EquityEstimate> {
    estimate_equity_with(hero, board, opponents, &SimulationConfig::monte_carlo(trials), rng, None)
}

/// Hero equity against random opponents under an explicit configuration,
/// optionally interruptible through `cancel`.
pub fn estimate_equity_with<R: Rng>(
    hero: &[Card],
    board: &[Card],
    opponents: usize,
    config: &SimulationConfig,
    rng: &mut R,
    cancel: Option<&AtomicBool>,
) -> EngineResult<EquityEstimate> {
    let hero_idx = hole_indices(hero, "hole")?;
    check_board(board)?;
    let known: Vec<Card> = hero.iter().chain(board).copied().collect();
    let deck = remaining_indices(&known)?;

    let setup = Setup {
        hero: hero_idx,
        board: board.iter().map(card_to_index).collect(),
        deck,
        villains: Villains::Random(opponents),
    };
    setup.check_deck()?;
    config.validate()?;

    if opponents == 0 {
        return Ok(EquityEstimate::uncontested(config.trials));
    }
    dispatch(&setup, config, rng, cancel)
}

/// Heads-up equity against a known hand.
pub fn equity_vs_hand<R: Rng>(
    hero: &[Card],
    villain: &[Card],
    board: &[Card],
    config: &SimulationConfig,
    rng: &mut R,
) -> EngineResult<EquityEstimate> {
    let hero_idx = hole_indices(hero, "hole")?;
    let villain_idx = hole_indices(villain, "villain")?;
    check_board(board)?;
    let known: Vec<Card> = hero.iter().chain(villain).chain(board).copied().collect();
    let deck = remaining_indices(&known)?;

    let setup = Setup {
        hero: hero_idx,
        board: board.iter().map(card_to_index).collect(),
        deck,
        villains: Villains::Fixed(vec![villain_idx]),
    };
    dispatch(&setup, config, rng, None)
}

/// Heads-up equity against a range. Combos that clash with the hero's
/// cards or the board are dropped before sampling.
pub fn equity_vs_range<R: Rng>(
    hero: &[Card],
    range: &Range,
    board: &[Card],
    config: &SimulationConfig,
    rng: &mut R,
) -> EngineResult<EquityEstimate> {
    let hero_idx = hole_indices(hero, "hole")?;
    check_board(board)?;
    let known: Vec<Card> = hero.iter().chain(board).copied().collect();
    ensure_unique(&known)?;

    let combos: Vec<[u8; 2]> = range
        .hands()
        .iter()
        .flat_map(|h| h.combos())
        .filter(|(a, b)| !known.contains(a) && !known.contains(b))
        .map(|(a, b)| [card_to_index(&a), card_to_index(&b)])
        .collect();
    if combos.is_empty() {
        return Err(EngineError::InvalidArgument(
            "range has no combos compatible with the known cards".to_string(),
        ));
    }

    let setup = Setup {
        hero: hero_idx,
        board: board.iter().map(card_to_index).collect(),
        deck: remaining_indices(&known)?,
        villains: Villains::Range(combos),
    };
    dispatch(&setup, config, rng, None)
}
