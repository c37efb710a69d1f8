//! Fixed-size transposition table keyed by SHA-256 state digest.
//!
//! This table uses direct indexing on the digest's low bits with
//! depth-preferred replacement and generation aging to evict stale entries.
//! The full digest is kept in each entry, so a probe only ever returns an
//! entry stored for the same position.

use crate::moves::move_descriptions::Move;
use crate::search::state_hasher::StateHash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

impl Bound {
    /// Bound flag for a final score relative to the window the node was
    /// entered with.
    #[inline]
    pub fn classify(score: i64, alpha_orig: i64, beta_orig: i64) -> Self {
        if score <= alpha_orig {
            Bound::Upper
        } else if score >= beta_orig {
            Bound::Lower
        } else {
            Bound::Exact
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TTEntry {
    pub key: StateHash,
    pub depth: u8,
    pub score: i64,
    pub bound: Bound,
    pub best_move: Option<Move>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    entry: Option<TTEntry>,
    stamp: u8,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    slots: Vec<Slot>,
    generation: u8,
    stats: TTStats,
}

impl TranspositionTable {
    /// Generations a slot may sit untouched before any store may take it.
    const STALE_AFTER: u8 = 4;
    /// A shallower result for another position still evicts within this margin.
    const DEPTH_SLACK: u8 = 2;

    pub fn new_with_mb(size_mb: usize) -> Self {
        let slot_bytes = std::mem::size_of::<Slot>().max(1);
        let slots = (size_mb.max(1) << 20) / slot_bytes;
        Self {
            slots: vec![Slot::default(); slots.max(1)],
            generation: 0,
            stats: TTStats::default(),
        }
    }

    /// Called once per deepening iteration.
    #[inline]
    pub fn new_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn clear(&mut self) {
        self.slots.fill(Slot::default());
        self.generation = 0;
        self.stats = TTStats::default();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    #[inline]
    fn slot_index(&self, key: &StateHash) -> usize {
        (key.index_bits() % self.slots.len() as u64) as usize
    }

    pub fn probe(&mut self, key: &StateHash) -> Option<TTEntry> {
        self.stats.probes += 1;
        let generation = self.generation;
        let i = self.slot_index(key);
        let slot = &mut self.slots[i];
        let found = slot.entry.filter(|e| e.key == *key)?;
        slot.stamp = generation;
        self.stats.hits += 1;
        Some(found)
    }

    pub fn store(&mut self, entry: TTEntry) {
        self.stats.stores += 1;
        let generation = self.generation;
        let i = self.slot_index(&entry.key);
        let slot = &mut self.slots[i];
        let accept = match slot.entry {
            None => true,
            Some(held) if held.key == entry.key => entry.depth >= held.depth,
            Some(held) => {
                generation.wrapping_sub(slot.stamp) >= Self::STALE_AFTER
                    || entry.depth.saturating_add(Self::DEPTH_SLACK) >= held.depth
            }
        };
        if accept {
            *slot = Slot {
                entry: Some(entry),
                stamp: generation,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Bound, TTEntry, TranspositionTable};
    use crate::moves::move_descriptions::Move;
    use crate::search::state_hasher::StateHash;

    fn key(byte: u8) -> StateHash {
        StateHash([byte; 32])
    }

    #[test]
    fn stored_entry_is_found_by_its_digest() {
        let mut tt = TranspositionTable::new_with_mb(1);
        let entry = TTEntry {
            key: key(7),
            depth: 5,
            score: 42,
            bound: Bound::Exact,
            best_move: Some(Move::normal(1, 7)),
        };
        tt.store(entry);
        let found = tt.probe(&key(7)).expect("entry should exist");
        assert_eq!((found.key, found.depth, found.score), (entry.key, 5, 42));
        assert_eq!(found.best_move, Some(Move::normal(1, 7)));
        assert!(tt.probe(&key(8)).is_none());
    }

    #[test]
    fn same_position_keeps_the_deeper_result() {
        let mut tt = TranspositionTable::new_with_mb(1);
        let k = key(55);
        tt.store(TTEntry {
            key: k,
            depth: 2,
            score: 1,
            bound: Bound::Upper,
            best_move: None,
        });
        tt.store(TTEntry {
            key: k,
            depth: 1,
            score: 9,
            bound: Bound::Exact,
            best_move: Some(Move::normal(0, 6)),
        });
        assert_eq!(tt.probe(&k).expect("exists").score, 1);
        tt.store(TTEntry {
            key: k,
            depth: 6,
            score: 3,
            bound: Bound::Lower,
            best_move: Some(Move::normal(0, 7)),
        });
        let got = tt.probe(&k).expect("exists");
        assert_eq!(got.depth, 6);
        assert_eq!(got.score, 3);
    }

    /// Digests sharing their first eight bytes land in the same slot.
    fn colliding(tail: u8) -> StateHash {
        let mut bytes = [9u8; 32];
        bytes[31] = tail;
        StateHash(bytes)
    }

    fn entry(key: StateHash, depth: u8) -> TTEntry {
        TTEntry {
            key,
            depth,
            score: i64::from(depth),
            bound: Bound::Exact,
            best_move: None,
        }
    }

    #[test]
    fn other_positions_evict_only_when_deep_enough_or_stale() {
        let mut tt = TranspositionTable::new_with_mb(1);
        tt.store(entry(colliding(1), 8));

        tt.store(entry(colliding(2), 5));
        assert!(tt.probe(&colliding(2)).is_none());
        assert!(tt.probe(&colliding(1)).is_some());

        tt.store(entry(colliding(2), 6));
        assert!(tt.probe(&colliding(1)).is_none());
        assert_eq!(tt.probe(&colliding(2)).expect("replaced").depth, 6);

        for _ in 0..4 {
            tt.new_generation();
        }
        tt.store(entry(colliding(3), 1));
        assert_eq!(tt.probe(&colliding(3)).expect("stale slot taken").depth, 1);
    }

    #[test]
    fn bound_classification_follows_the_original_window() {
        assert_eq!(Bound::classify(-5, -5, 10), Bound::Upper);
        assert_eq!(Bound::classify(10, -5, 10), Bound::Lower);
        assert_eq!(Bound::classify(3, -5, 10), Bound::Exact);
    }

    #[test]
    fn clear_resets_entries_and_stats() {
        let mut tt = TranspositionTable::new_with_mb(1);
        tt.store(TTEntry {
            key: key(3),
            depth: 1,
            score: 0,
            bound: Bound::Exact,
            best_move: None,
        });
        tt.clear();
        assert!(tt.probe(&key(3)).is_none());
        assert_eq!(tt.stats().stores, 0);
    }
}
