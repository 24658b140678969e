//! Memo of earlier equity results, owned and passed in by the caller.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::cards::Card;
use crate::equity::EquityEstimate;
use crate::error::EngineResult;

/// Cards are stored sorted so the same spot hits regardless of input order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EquityKey {
    pub hero: Vec<Card>,
    pub board: Vec<Card>,
    pub opponents: usize,
    pub trials: usize,
}

impl EquityKey {
    pub fn new(hero: &[Card], board: &[Card], opponents: usize, trials: usize) -> Self {
        let mut hero = hero.to_vec();
        let mut board = board.to_vec();
        hero.sort();
        board.sort();
        EquityKey { hero, board, opponents, trials }
    }
}

/// Thread-safe, bounded equity cache. Once full, new keys are computed but
/// not stored.
#[derive(Debug)]
pub struct EquityCache {
    entries: RwLock<HashMap<EquityKey, EquityEstimate>>,
    capacity: usize,
}

impl Default for EquityCache {
    fn default() -> Self {
        EquityCache::with_capacity(200)
    }
}

impl EquityCache {
    pub fn with_capacity(capacity: usize) -> Self {
        EquityCache {
            entries: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &EquityKey) -> Option<EquityEstimate> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let hit = entries.get(key).copied();
        if hit.is_some() {
            log::trace!("equity cache hit: {:?}", key);
        }
        hit
    }

    pub fn insert(&self, key: EquityKey, estimate: EquityEstimate) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            log::trace!("equity cache full ({} entries), not storing {:?}", entries.len(), key);
            return;
        }
        entries.insert(key, estimate);
    }

    /// Cached value for `key`, or run `compute` and remember its result.
    /// Errors are returned as-is and never cached.
    pub fn get_or_compute<F>(&self, key: EquityKey, compute: F) -> EngineResult<EquityEstimate>
    where
        F: FnOnce() -> EngineResult<EquityEstimate>,
    {
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }
        let estimate = compute()?;
        self.insert(key, estimate);
        Ok(estimate)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_board;
    use crate::error::EngineError;

    fn est(win: f64) -> EquityEstimate {
        EquityEstimate {
            win_rate: win,
            tie_rate: 0.0,
            outright_win_rate: win,
            trials: 10,
            exact: false,
        }
    }

    #[test]
    fn key_ignores_card_order() {
        let a = EquityKey::new(&parse_board("AsKd").unwrap(), &parse_board("2c3c4c").unwrap(), 1, 100);
        let b = EquityKey::new(&parse_board("KdAs").unwrap(), &parse_board("4c2c3c").unwrap(), 1, 100);
        assert_eq!(a, b);
    }

    #[test]
    fn compute_runs_once() {
        let cache = EquityCache::default();
        let key = EquityKey::new(&parse_board("AsKd").unwrap(), &[], 2, 500);
        let mut calls = 0;
        let first = cache
            .get_or_compute(key.clone(), || {
                calls += 1;
                Ok(est(0.4))
            })
            .unwrap();
        let second = cache.get_or_compute(key, || Ok(est(0.9))).unwrap();
        assert_eq!(calls, 1);
        assert_eq!(first, second);
    }

    #[test]
    fn errors_are_not_cached() {
        let cache = EquityCache::default();
        let key = EquityKey::new(&parse_board("AsKd").unwrap(), &[], 2, 500);
        let r = cache.get_or_compute(key.clone(), || Err(EngineError::InvalidArgument("x".into())));
        assert!(r.is_err());
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn capacity_bound() {
        let cache = EquityCache::with_capacity(2);
        for trials in 0..5 {
            cache.insert(EquityKey::new(&[], &[], 1, trials), est(0.5));
            assert!(cache.len() <= 2);
        }
        assert!(cache.get(&EquityKey::new(&[], &[], 1, 0)).is_some());
        assert!(cache.get(&EquityKey::new(&[], &[], 1, 4)).is_none());
    }
}
