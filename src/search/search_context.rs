//! Mutable per-search state threaded through the core by reference.
//!
//! One context belongs to one search thread. Root workers build their own,
//! so nothing in here is shared across threads.

use crate::search::move_cache::MoveCache;
use crate::search::move_ordering::{HistoryTable, KillerTable};
use crate::search::transposition_table::TranspositionTable;

pub const DEFAULT_HASH_MB: usize = 16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub quiescence_nodes: u64,
    pub tt_hits: u64,
    /// Deepest quiescence ply below a leaf reached so far.
    pub max_quiescence_ply: u8,
}

impl SearchStats {
    /// Adds a worker's counters into this one.
    pub fn absorb(&mut self, other: &SearchStats) {
        self.nodes += other.nodes;
        self.quiescence_nodes += other.quiescence_nodes;
        self.tt_hits += other.tt_hits;
        self.max_quiescence_ply = self.max_quiescence_ply.max(other.max_quiescence_ply);
    }
}

#[derive(Debug, Clone)]
pub struct SearchContext {
    pub tt: TranspositionTable,
    pub killers: KillerTable,
    pub history: HistoryTable,
    pub move_cache: MoveCache,
    pub stats: SearchStats,
}

impl Default for SearchContext {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_MB)
    }
}

impl SearchContext {
    pub fn new(hash_mb: usize) -> Self {
        Self {
            tt: TranspositionTable::new_with_mb(hash_mb),
            killers: KillerTable::default(),
            history: HistoryTable::default(),
            move_cache: MoveCache::new(),
            stats: SearchStats::default(),
        }
    }

    /// Clears every table, including the move cache.
    pub fn reset(&mut self) {
        self.tt.clear();
        self.killers.clear();
        self.history.clear();
        self.move_cache.clear();
        self.stats = SearchStats::default();
    }

    #[inline]
    pub fn reset_stats(&mut self) {
        self.stats = SearchStats::default();
    }
}
