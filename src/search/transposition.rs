//! [Transposition Table]: a position-keyed cache of search results.
//!
//! Entries are keyed by the canonical position key (a string; a Zobrist hash
//! is the usual upgrade and would not change the contract) and replacement is
//! always-replace. Bound probes are conservative: a `Lower` entry proves a
//! beta cutoff and returns `beta` itself, an `Upper` entry proves a fail-low
//! and returns `alpha` — the stored value never substitutes for a real
//! evaluation inside the window.
//!
//! [Transposition Table]: https://www.chessprogramming.org/Transposition_Table

use std::collections::HashMap;

use crate::chess::board::Board;
use crate::chess::core::Move;
use crate::evaluation::UNKNOWN;
use crate::search::Depth;

/// How the stored value relates to the true score of the position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    #[allow(missing_docs)]
    Exact,
    /// The value is a lower bound (the search failed high).
    Lower,
    /// The value is an upper bound (the search failed low).
    Upper,
}

#[derive(Clone, Debug)]
struct Entry {
    value: i32,
    depth: Depth,
    bound: Bound,
    best_move: Option<Move>,
}

/// Position-keyed cache shared by all plies of a search.
#[derive(Default)]
pub struct TranspositionTable {
    table: HashMap<String, Entry>,
}

impl TranspositionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Looks up `board`; returns a usable score for the `(alpha, beta)`
    /// window or [`UNKNOWN`] when the entry is missing, too shallow, or its
    /// bound does not produce a cutoff.
    #[must_use]
    pub fn probe(&self, board: &Board, depth: Depth, alpha: i32, beta: i32) -> i32 {
        if let Some(entry) = self.table.get(&board.to_key()) {
            if entry.depth >= depth {
                match entry.bound {
                    Bound::Exact => return entry.value,
                    Bound::Lower if entry.value >= beta => return beta,
                    Bound::Upper if entry.value <= alpha => return alpha,
                    _ => {}
                }
            }
        }
        UNKNOWN
    }

    /// Records a result for `board`, overwriting whatever was there.
    pub fn store(
        &mut self,
        board: &Board,
        depth: Depth,
        value: i32,
        bound: Bound,
        best_move: Option<Move>,
    ) {
        let _ = self.table.insert(
            board.to_key(),
            Entry {
                value,
                depth,
                bound,
                best_move,
            },
        );
    }

    /// The best move recorded for `board`, regardless of entry depth.
    #[must_use]
    pub fn best_move(&self, board: &Board) -> Option<Move> {
        self.table
            .get(&board.to_key())
            .and_then(|entry| entry.best_move)
    }
}
