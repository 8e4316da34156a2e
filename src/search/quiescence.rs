//! [Quiescence] extension at the search horizon: explore captures only, so
//! that the static evaluation is never taken in the middle of a tactical
//! exchange.
//!
//! Termination is structural: every recursion step removes a piece from the
//! board, so the depth is bounded by the number of pieces.
//!
//! [Quiescence]: https://www.chessprogramming.org/Quiescence_Search

use crate::chess::board::Board;
use crate::chess::movegen::capture_moves;
use crate::evaluation::evaluate;
use crate::search::ordering::order_moves;
use crate::search::Searcher;

impl Searcher {
    /// Fail-hard capture-only search: the result is clamped to the
    /// `(alpha, beta)` window, with the stand-pat evaluation as the floor.
    pub fn quiescence(&mut self, board: &Board, mut alpha: i32, beta: i32) -> i32 {
        self.nodes += 1;

        let stand_pat = evaluate(board);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut captures = capture_moves(board);
        order_moves(board, &mut captures);

        for mv in captures {
            let mut child = *board;
            child.move_piece(mv.from, mv.to);
            child.switch_turn();

            let score = -self.quiescence(&child, -beta, -alpha);
            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }
        alpha
    }
}
