//! [Null-move pruning]: give the opponent a free move; if the position still
//! clears beta at reduced depth, the node is good enough to cut immediately.
//!
//! The null move is skipped in check (it would be illegal to "stand still")
//! and without enough material (zugzwang positions would make the bluff
//! unsound).
//!
//! [Null-move pruning]: https://www.chessprogramming.org/Null_Move_Pruning

use crate::chess::board::Board;
use crate::chess::core::{Move, PieceKind, Square};
use crate::chess::movegen::legal_moves;
use crate::evaluation::{INF, MATE, UNKNOWN};
use crate::search::ordering::order_moves;
use crate::search::transposition::Bound;
use crate::search::{Depth, Searcher};

/// Depth reduction applied to the null-move verification search.
const NULL_MOVE_REDUCTION: Depth = 2;

impl Searcher {
    /// Alpha-beta with a null-move cutoff attempt before the move loop, at
    /// `depth >= 3` when not in check and with at least two non-pawn,
    /// non-king pieces on the mover's side.
    pub fn null_move(&mut self, board: &Board, depth: Depth, mut alpha: i32, beta: i32) -> i32 {
        if depth == 0 {
            return self.quiescence(board, alpha, beta);
        }
        self.nodes += 1;

        let cached = self.ttable.probe(board, depth, alpha, beta);
        if cached != UNKNOWN {
            return cached;
        }

        if depth >= 3 && !board.in_check(board.turn()) && has_non_pawn_material(board) {
            let mut passed = *board;
            passed.switch_turn();
            let verification = -self.null_move(
                &passed,
                depth - 1 - NULL_MOVE_REDUCTION,
                -beta,
                -beta + 1,
            );
            if verification >= beta {
                return beta;
            }
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

            let value = -self.null_move(&child, depth - 1, -beta, -alpha);
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

/// At least two pieces besides pawns and the king for the side to move.
fn has_non_pawn_material(board: &Board) -> bool {
    let mut count = 0;
    for row in 0..8 {
        for col in 0..8 {
            match board.piece_at(Square::new(row, col)) {
                Some(piece)
                    if piece.color == board.turn()
                        && piece.kind != PieceKind::Pawn
                        && piece.kind != PieceKind::King =>
                {
                    count += 1;
                    if count >= 2 {
                        return true;
                    }
                }
                _ => {}
            }
        }
    }
    false
}
