//! The negamax alpha-beta core every other strategy is a variation of.

use crate::chess::board::Board;
use crate::chess::core::Move;
use crate::chess::movegen::legal_moves;
use crate::evaluation::{INF, MATE, UNKNOWN};
use crate::search::extensions::should_extend;
use crate::search::ordering::order_moves;
use crate::search::transposition::Bound;
use crate::search::{Depth, Searcher};

impl Searcher {
    /// Negamax with alpha-beta pruning. Depth zero falls through to
    /// [`Searcher::quiescence`]; a side to move without legal moves scores
    /// `-MATE - depth` when in check (deeper nodes report more-negative
    /// values, steering the search toward shorter mates) and `0` when
    /// stalemated.
    pub fn alpha_beta(&mut self, board: &Board, depth: Depth, mut alpha: i32, beta: i32) -> i32 {
        if depth == 0 {
            return self.quiescence(board, alpha, beta);
        }
        self.nodes += 1;

        let cached = self.ttable.probe(board, depth, alpha, beta);
        if cached != UNKNOWN {
            return cached;
        }

        let mut moves = legal_moves(board);
        if moves.is_empty() {
            return if board.in_check(board.turn()) {
                -MATE - i32::from(depth)
            } else {
                0
            };
        }
        order_moves(board, &mut moves);

        let mut best = -INF;
        let mut best_move: Option<Move> = None;
        for mv in moves {
            let mut child = *board;
            child.move_piece(mv.from, mv.to);
            child.switch_turn();

            let mut child_depth = depth - 1;
            if self.extensions && should_extend(board, mv, depth) {
                child_depth += 1;
            }

            let value = -self.alpha_beta(&child, child_depth, -beta, -alpha);
            if value > best {
                best = value;
                best_move = Some(mv);
            }
            alpha = alpha.max(best);
            if beta <= alpha {
                break;
            }
        }

        self.ttable
            .store(board, depth, best, Bound::Exact, best_move);
        best
    }
}
