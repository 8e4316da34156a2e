//! Move ordering for the search: better candidates first so that alpha-beta
//! cutoffs arrive early.

use std::cmp::Reverse;

use crate::chess::board::Board;
use crate::chess::core::{Move, MoveList, PieceKind};
use crate::evaluation::piece_value;

/// Sorts `moves` in place, best candidates first. The sort is stable, so
/// moves with equal scores keep the generator's deterministic order.
pub fn order_moves(board: &Board, moves: &mut MoveList) {
    moves.sort_by_cached_key(|mv| Reverse(move_score(board, *mv)));
}

/// Heuristic desirability of a move, used only for ordering:
///
/// - captures score victim value minus a tenth of the attacker's (MVV-LVA),
/// - every move out of an in-check position gets a flat bonus,
/// - a pawn stepping onto the last rank gets the promotion bonus.
#[must_use]
pub fn move_score(board: &Board, mv: Move) -> i32 {
    let mut score = 0;

    if let Some(victim) = board.piece_at(mv.to) {
        let attacker = board.piece_at(mv.from).map_or(0, |piece| piece_value(piece.kind));
        score += piece_value(victim.kind) - attacker / 10;
    }

    if board.in_check(board.turn()) {
        score += 100;
    }

    if board.piece_at(mv.from).map(|piece| piece.kind) == Some(PieceKind::Pawn)
        && (mv.to.row == 0 || mv.to.row == 7)
    {
        score += 900;
    }

    score
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::movegen::legal_moves;

    #[test]
    fn captures_come_first() {
        let board =
            Board::from_key("r1bqkbnr/ppp2ppp/2n5/3pp3/4P3/5N2/PPPP1PPP/RNBQKB1R w").unwrap();
        let mut moves = legal_moves(&board);
        order_moves(&board, &mut moves);
        assert!(board.is_capture(moves[0]), "expected a capture, got {}", moves[0]);
    }

    #[test]
    fn most_valuable_victim_least_valuable_attacker() {
        // Pawn takes queen outranks queen takes pawn.
        let board = Board::from_key("4k3/8/8/3q4/4P3/8/8/3QK3 w").unwrap();
        let pawn_takes_queen = move_score(&board, Move::from_uci("e4d5").unwrap());
        let queen_takes_queen = move_score(&board, Move::from_uci("d1d5").unwrap());
        assert_eq!(pawn_takes_queen, 900 - 10);
        assert_eq!(queen_takes_queen, 900 - 90);
        assert!(pawn_takes_queen > queen_takes_queen);
    }

    #[test]
    fn in_check_positions_boost_every_move() {
        // The b5 bishop checks the Black king through the vacated d7 square.
        let checked =
            Board::from_key("rnbqkbnr/ppp2ppp/8/1B1pp3/4P3/8/PPPP1PPP/RNBQK1NR b").unwrap();
        // Any quiet Black move carries the get-out-of-check signal.
        assert_eq!(move_score(&checked, Move::from_uci("c7c6").unwrap()), 100);

        let quiet = Board::starting();
        assert_eq!(move_score(&quiet, Move::from_uci("g1f3").unwrap()), 0);
    }

    #[test]
    fn promotion_push_scores_like_a_queen() {
        let board = Board::from_key("8/P6k/8/8/8/8/8/K7 w").unwrap();
        assert_eq!(move_score(&board, Move::from_uci("a7a8").unwrap()), 900);
    }

    #[test]
    fn ordering_is_stable_for_equal_scores() {
        let board = Board::starting();
        let mut ordered = legal_moves(&board);
        order_moves(&board, &mut ordered);
        // All twenty openers score zero, so the generator order survives.
        assert_eq!(ordered, legal_moves(&board));
    }
}
