//! Move generation: pseudo-legal enumeration per piece and the legality
//! filter on top of it.
//!
//! Castling and en passant are never generated (the board carries no state
//! for them), and a pawn reaching the last rank is emitted as a plain move —
//! it stays a pawn on the resulting board. Iteration order is deterministic:
//! rows then columns, then the fixed per-piece direction order, so any
//! reordering for search purposes is the move orderer's job.

use super::board::Board;
use super::core::{
    Color, Move, MoveList, PieceKind, Square, BISHOP_DIRECTIONS, BOARD_WIDTH, KING_OFFSETS,
    KNIGHT_OFFSETS, ROOK_DIRECTIONS,
};

/// Enumerates every move of the side to move that obeys piece movement rules,
/// ignoring whether the mover's king ends up attacked.
#[must_use]
pub fn pseudo_legal_moves(board: &Board) -> MoveList {
    let mut moves = MoveList::new();
    for row in 0..BOARD_WIDTH {
        for col in 0..BOARD_WIDTH {
            let from = Square::new(row, col);
            let piece = match board.piece_at(from) {
                Some(piece) if piece.color == board.turn() => piece,
                _ => continue,
            };
            match piece.kind {
                PieceKind::Pawn => pawn_moves(board, from, piece.color, &mut moves),
                PieceKind::Knight => step_moves(board, from, &KNIGHT_OFFSETS, &mut moves),
                PieceKind::Bishop => ray_moves(board, from, &BISHOP_DIRECTIONS, &mut moves),
                PieceKind::Rook => ray_moves(board, from, &ROOK_DIRECTIONS, &mut moves),
                PieceKind::Queen => {
                    ray_moves(board, from, &BISHOP_DIRECTIONS, &mut moves);
                    ray_moves(board, from, &ROOK_DIRECTIONS, &mut moves);
                }
                PieceKind::King => step_moves(board, from, &KING_OFFSETS, &mut moves),
            }
        }
    }
    moves
}

/// Pseudo-legal moves that leave the mover's king unattacked, checked by
/// simulating each move on a copy.
#[must_use]
pub fn legal_moves(board: &Board) -> MoveList {
    let mut legal = MoveList::new();
    for mv in pseudo_legal_moves(board) {
        if keeps_king_safe(board, mv) {
            legal.push(mv);
        }
    }
    legal
}

/// The legal moves whose destination holds an enemy piece. This is the move
/// set the quiescence search explores.
#[must_use]
pub fn capture_moves(board: &Board) -> MoveList {
    let mut captures = MoveList::new();
    for mv in legal_moves(board) {
        if board.is_capture(mv) {
            captures.push(mv);
        }
    }
    captures
}

fn keeps_king_safe(board: &Board, mv: Move) -> bool {
    let mover = board.turn();
    let mut next = *board;
    next.move_piece(mv.from, mv.to);
    next.switch_turn();
    !next.in_check(mover)
}

fn pawn_moves(board: &Board, from: Square, color: Color, moves: &mut MoveList) {
    let direction = if color == Color::White { -1 } else { 1 };
    let start_row = if color == Color::White { 6 } else { 1 };

    let advance = from.offset(direction, 0);
    if advance.in_bounds() && board.piece_at(advance).is_none() {
        moves.push(Move::new(from, advance));
        let double = from.offset(2 * direction, 0);
        if from.row == start_row && board.piece_at(double).is_none() {
            moves.push(Move::new(from, double));
        }
    }

    for step in [-1, 1] {
        let target = from.offset(direction, step);
        match board.piece_at(target) {
            Some(piece) if piece.color != color => moves.push(Move::new(from, target)),
            _ => {}
        }
    }
}

fn step_moves(board: &Board, from: Square, offsets: &[(i8, i8)], moves: &mut MoveList) {
    let color = board.turn();
    for &(rows, cols) in offsets {
        let target = from.offset(rows, cols);
        if !target.in_bounds() {
            continue;
        }
        match board.piece_at(target) {
            Some(piece) if piece.color == color => {}
            _ => moves.push(Move::new(from, target)),
        }
    }
}

fn ray_moves(board: &Board, from: Square, directions: &[(i8, i8)], moves: &mut MoveList) {
    let color = board.turn();
    for &(rows, cols) in directions {
        let mut target = from.offset(rows, cols);
        while target.in_bounds() {
            match board.piece_at(target) {
                None => moves.push(Move::new(from, target)),
                Some(piece) => {
                    if piece.color != color {
                        moves.push(Move::new(from, target));
                    }
                    break;
                }
            }
            target = target.offset(rows, cols);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn perft(board: &Board, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let mut nodes = 0;
        for mv in legal_moves(board) {
            let mut next = *board;
            next.move_piece(mv.from, mv.to);
            next.switch_turn();
            nodes += perft(&next, depth - 1);
        }
        nodes
    }

    #[test]
    fn twenty_moves_from_the_start() {
        let board = Board::starting();
        assert_eq!(pseudo_legal_moves(&board).len(), 20);
        assert_eq!(legal_moves(&board).len(), 20);
    }

    #[test]
    fn generation_order_is_deterministic() {
        let board = Board::starting();
        let moves = legal_moves(&board);
        assert_eq!(moves, legal_moves(&board));
        // Rows scan top-down, so for White at the start the pawn rank (row 6)
        // comes before the back rank.
        assert_eq!(moves[0], Move::from_uci("a2a3").unwrap());
        assert_eq!(*moves.last().unwrap(), Move::from_uci("g1h3").unwrap());
    }

    #[test]
    fn legal_moves_are_a_subset_of_pseudo_legal() {
        for key in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w",
            "r1bqkbnr/ppp2ppp/2n5/3pp3/4P3/5N2/PPPP1PPP/RNBQKB1R w",
            "4k3/8/8/8/7q/8/5N2/4K3 w",
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w",
        ] {
            let board = Board::from_key(key).unwrap();
            let pseudo = pseudo_legal_moves(&board);
            let legal = legal_moves(&board);
            for mv in &legal {
                assert!(pseudo.contains(mv), "{mv} missing from pseudo-legal set");
                let mut next = board;
                next.move_piece(mv.from, mv.to);
                next.switch_turn();
                assert!(!next.in_check(board.turn()), "{mv} leaves the king hanging");
            }
            assert!(legal.len() <= pseudo.len());
        }
    }

    #[test]
    fn pinned_piece_cannot_move() {
        let board = Board::from_key("4k3/8/8/8/7q/8/5N2/4K3 w").unwrap();
        for mv in legal_moves(&board) {
            assert_ne!(
                mv.from,
                Square::try_from("f2").unwrap(),
                "pinned knight moved: {mv}"
            );
        }
    }

    #[test]
    fn double_push_requires_both_squares_empty() {
        // A knight parked on e3 blocks both e2e3 and e2e4.
        let board = Board::from_key("4k3/8/8/8/8/4n3/4P3/4K3 w").unwrap();
        let moves = legal_moves(&board);
        assert!(!moves.contains(&Move::from_uci("e2e3").unwrap()));
        assert!(!moves.contains(&Move::from_uci("e2e4").unwrap()));

        // With the blocker one square further, only the single push opens up.
        let board = Board::from_key("4k3/8/8/8/4n3/8/4P3/4K3 w").unwrap();
        let moves = legal_moves(&board);
        assert!(moves.contains(&Move::from_uci("e2e3").unwrap()));
        assert!(!moves.contains(&Move::from_uci("e2e4").unwrap()));
    }

    #[test]
    fn pawn_captures_only_enemies() {
        let board = Board::from_key("4k3/8/8/3p4/4P3/8/8/4K3 w").unwrap();
        let moves = legal_moves(&board);
        assert!(moves.contains(&Move::from_uci("e4d5").unwrap()));
        assert!(!moves.contains(&Move::from_uci("e4f5").unwrap()));
    }

    #[test]
    fn promotion_is_not_expanded() {
        let board = Board::from_key("8/P6k/8/8/8/8/8/K7 w").unwrap();
        let moves = legal_moves(&board);
        let push = moves
            .iter()
            .find(|mv| **mv == Move::from_uci("a7a8").unwrap())
            .copied()
            .expect("pawn push to the last rank");
        assert_eq!(push.promotion, None);

        // The pawn stays a pawn after reaching the last rank.
        let mut next = board;
        next.move_piece(push.from, push.to);
        assert_eq!(
            next.piece_at(Square::try_from("a8").unwrap()).map(|p| p.kind),
            Some(PieceKind::Pawn)
        );
    }

    #[test]
    fn captures_are_legal_and_capturing() {
        let board =
            Board::from_key("r2qk2r/ppp2ppp/2n5/2bpp3/4n3/2N2N2/PPPPQPPP/R1B1KB1R w").unwrap();
        let legal = legal_moves(&board);
        for mv in capture_moves(&board) {
            assert!(legal.contains(&mv));
            assert!(board.is_capture(mv));
        }
    }

    #[test]
    fn stalemated_side_has_no_moves() {
        let board = Board::from_key("7k/5Q2/6K1/8/8/8/8/8 b").unwrap();
        assert!(legal_moves(&board).is_empty());
        assert!(!board.in_check(Color::Black));
    }

    #[test]
    fn perft_matches_reference_implementation() {
        let reference = shakmaty::Chess::default();
        let board = Board::starting();
        // Castling and en passant cannot occur within two plies of the start,
        // so the reduced rule set agrees with the full one here.
        assert_eq!(perft(&board, 1), shakmaty::perft(&reference, 1));
        assert_eq!(perft(&board, 2), shakmaty::perft(&reference, 2));
    }
}
