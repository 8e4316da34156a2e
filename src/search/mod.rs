//! The search stack: a [Negamax] core with [Alpha-Beta pruning], quiescence,
//! a transposition table and the classical selectivity techniques layered on
//! top as interchangeable strategies.
//!
//! All strategies run through one [`Searcher`], which owns the transposition
//! table and the node counter; the table is shared across every ply of a
//! search, which is what makes it useful.
//!
//! [Negamax]: https://en.wikipedia.org/wiki/Negamax
//! [Alpha-Beta pruning]: https://en.wikipedia.org/wiki/Alpha%E2%80%93beta_pruning

mod alphabeta;
mod aspiration;
mod deepening;
mod extensions;
mod null_move;
mod ordering;
mod pvs;
mod quiescence;
mod reduction;
mod transposition;

use std::time::Duration;

use anyhow::bail;

use crate::chess::board::Board;
use crate::chess::core::Move;

pub use aspiration::aspiration_search;
pub use deepening::iterative_search;
pub use extensions::should_extend;
pub use ordering::{move_score, order_moves};
pub use transposition::{Bound, TranspositionTable};

/// Search depth in plies.
pub type Depth = u8;

/// Which member of the alpha-beta family drives the search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Plain alpha-beta with selective depth extensions.
    #[default]
    AlphaBeta,
    /// Principal-variation search: null-window probes for non-first children.
    PrincipalVariation,
    /// Null-move pruning in front of the regular move loop.
    NullMove,
    /// Late-move reductions for quiet moves far down the ordering.
    LateMoveReduction,
}

impl TryFrom<&str> for Strategy {
    type Error = anyhow::Error;

    fn try_from(name: &str) -> anyhow::Result<Self> {
        match name {
            "alphabeta" => Ok(Self::AlphaBeta),
            "pvs" => Ok(Self::PrincipalVariation),
            "nullmove" => Ok(Self::NullMove),
            "lmr" => Ok(Self::LateMoveReduction),
            _ => bail!("unknown strategy: {name}"),
        }
    }
}

/// Outcome of one [`iterative_search`] run.
#[derive(Clone, Copy, Debug)]
pub struct SearchInfo {
    /// Deepest completed iteration.
    pub depth: Depth,
    /// Nodes visited across all iterations.
    pub nodes: u64,
    #[allow(missing_docs)]
    pub elapsed: Duration,
    /// Best move found, `None` when the root has no legal moves or no
    /// iteration finished.
    pub best_move: Option<Move>,
    #[allow(missing_docs)]
    pub score: i32,
}

/// Search context shared by every node of a search: the strategy in use, the
/// transposition table and bookkeeping counters.
pub struct Searcher {
    ttable: TranspositionTable,
    strategy: Strategy,
    extensions: bool,
    aspiration: bool,
    nodes: u64,
}

impl Searcher {
    #[must_use]
    pub fn new(strategy: Strategy) -> Self {
        Self {
            ttable: TranspositionTable::new(),
            strategy,
            extensions: true,
            aspiration: false,
            nodes: 0,
        }
    }

    /// Searches `board` to `depth` within the `(alpha, beta)` window using
    /// the configured strategy.
    pub fn search(&mut self, board: &Board, depth: Depth, alpha: i32, beta: i32) -> i32 {
        match self.strategy {
            Strategy::AlphaBeta => self.alpha_beta(board, depth, alpha, beta),
            Strategy::PrincipalVariation => {
                self.principal_variation(board, depth, alpha, beta, true)
            }
            Strategy::NullMove => self.null_move(board, depth, alpha, beta),
            Strategy::LateMoveReduction => self.late_move_reduction(board, depth, alpha, beta),
        }
    }

    /// Best move recorded for `board`, if the table has seen it.
    #[must_use]
    pub fn table_move(&self, board: &Board) -> Option<Move> {
        self.ttable.best_move(board)
    }

    #[must_use]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.strategy = strategy;
    }

    /// Toggles selective depth extensions (plain alpha-beta only).
    pub fn set_extensions(&mut self, on: bool) {
        self.extensions = on;
    }

    /// Toggles the aspiration-window wrapper around iterative deepening.
    pub fn set_aspiration(&mut self, on: bool) {
        self.aspiration = on;
    }

    #[must_use]
    pub const fn aspiration(&self) -> bool {
        self.aspiration
    }

    /// Drops all accumulated search state. Used on `ucinewgame`.
    pub fn reset(&mut self) {
        self.ttable.clear();
        self.nodes = 0;
    }

    pub(crate) fn begin_search(&mut self) {
        self.nodes = 0;
    }
}
