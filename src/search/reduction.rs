//! [Late-move reductions]: with decent ordering, moves far down the list
//! rarely matter — search them shallower first and only pay full depth when
//! the reduced search surprises.
//!
//! [Late-move reductions]: https://www.chessprogramming.org/Late_Move_Reductions

use crate::chess::board::Board;
use crate::chess::core::Move;
use crate::chess::movegen::legal_moves;
use crate::evaluation::{INF, MATE, UNKNOWN};
use crate::search::extensions::gives_check;
use crate::search::ordering::{move_score, order_moves};
use crate::search::transposition::Bound;
use crate::search::{Depth, Searcher};

impl Searcher {
    /// Alpha-beta with late-move reductions. The first two moves are never
    /// reduced; from the third onwards, quiet moves (no capture, no check,
    /// non-positive ordering score) at `depth >= 3` are searched at
    /// `max(1, depth - 1 - (depth/4 + index/5))` and re-searched at full
    /// depth only when the reduced score lands inside the window.
    pub fn late_move_reduction(
        &mut self,
        board: &Board,
        depth: Depth,
        mut alpha: i32,
        beta: i32,
    ) -> i32 {
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
        for (index, mv) in moves.into_iter().enumerate() {
            let mut child = *board;
            child.move_piece(mv.from, mv.to);
            child.switch_turn();

            let reduced = reduced_depth(board, mv, depth, index);
            let mut value = -self.late_move_reduction(&child, reduced, -beta, -alpha);
            if reduced < depth - 1 && value > alpha && value < beta {
                value = -self.late_move_reduction(&child, depth - 1, -beta, -alpha);
            }

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

fn reduced_depth(board: &Board, mv: Move, depth: Depth, index: usize) -> Depth {
    let quiet =
        !board.is_capture(mv) && !gives_check(board, mv) && move_score(board, mv) <= 0;
    if index < 2 || depth < 3 || !quiet {
        return depth - 1;
    }
    let depth = i32::from(depth);
    let reduced = depth - 1 - (depth / 4 + index as i32 / 5);
    reduced.max(1) as Depth
}
