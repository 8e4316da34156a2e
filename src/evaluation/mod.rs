//! This module implements "static" [evaluation], i.e. predicting the relative
//! value of a given position without [`crate::search`].
//!
//! Scores are in centipawn units from the side-to-move's perspective: the
//! component terms are summed as White-minus-Black and the total is negated
//! when Black is to move. Terminal positions short-circuit: a side to move
//! with no legal moves scores `-MATE` when in check and `0` when stalemated.
//!
//! [evaluation]: https://www.chessprogramming.org/Evaluation

use crate::chess::board::Board;
use crate::chess::core::{Color, Piece, PieceKind, Square, BOARD_WIDTH};
use crate::chess::movegen::legal_moves;

/// Score of a checkmated side to move.
pub const MATE: i32 = 10_000;
/// Upper bound on any reachable score; the full search window is `(-INF, INF)`.
pub const INF: i32 = 100_000;
/// Sentinel for "no result" in table probes. Flows through score arithmetic,
/// hence an integer rather than an `Option`.
pub const UNKNOWN: i32 = -INF;

/// Classical material values, in centipawns.
#[must_use]
pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 20_000,
    }
}

/// Evaluates the position for the side to move.
#[must_use]
pub fn evaluate(board: &Board) -> i32 {
    if legal_moves(board).is_empty() {
        return if board.in_check(board.turn()) {
            -MATE
        } else {
            0
        };
    }

    let score = material(board)
        + placement(board)
        + mobility(board)
        + pawn_structure(board)
        + king_safety(board);

    match board.turn() {
        Color::White => score,
        Color::Black => -score,
    }
}

/// True for positions where king activity starts to matter: six or fewer
/// non-king, non-pawn pieces in total, or no queen on the board.
#[must_use]
pub fn is_endgame(board: &Board) -> bool {
    let mut pieces = 0;
    let mut has_queen = false;
    for square in squares() {
        if let Some(piece) = board.piece_at(square) {
            if piece.kind != PieceKind::King && piece.kind != PieceKind::Pawn {
                pieces += 1;
                if piece.kind == PieceKind::Queen {
                    has_queen = true;
                }
            }
        }
    }
    pieces <= 6 || !has_queen
}

fn squares() -> impl Iterator<Item = Square> {
    (0..BOARD_WIDTH).flat_map(|row| (0..BOARD_WIDTH).map(move |col| Square::new(row, col)))
}

fn signed(color: Color, value: i32) -> i32 {
    match color {
        Color::White => value,
        Color::Black => -value,
    }
}

pub(crate) fn material(board: &Board) -> i32 {
    let mut score = 0;
    for square in squares() {
        if let Some(piece) = board.piece_at(square) {
            score += signed(piece.color, piece_value(piece.kind));
        }
    }
    score
}

pub(crate) fn placement(board: &Board) -> i32 {
    let endgame = is_endgame(board);
    let mut score = 0;
    for square in squares() {
        if let Some(piece) = board.piece_at(square) {
            score += signed(
                piece.color,
                piece_square_bonus(piece.kind, piece.color, square, endgame),
            );
        }
    }
    score
}

/// Positional bonus for one piece. Distances to the board centre (3.5 in both
/// coordinates) are computed in half-steps to stay in integers.
pub(crate) fn piece_square_bonus(
    kind: PieceKind,
    color: Color,
    square: Square,
    endgame: bool,
) -> i32 {
    let (row, col) = (i32::from(square.row), i32::from(square.col));
    match kind {
        PieceKind::Pawn => {
            let advance = match color {
                Color::White => (7 - row) * 5,
                Color::Black => row * 5,
            };
            let file_distance = (2 * col - 7).abs() / 2;
            advance + (4 - file_distance) * 2
        }
        PieceKind::Knight => {
            let mut bonus = if (2..=5).contains(&row) && (2..=5).contains(&col) {
                20
            } else {
                0
            };
            if row == 0 || row == 7 {
                bonus -= 15;
            }
            if col == 0 || col == 7 {
                bonus -= 15;
            }
            bonus
        }
        PieceKind::Bishop => {
            if row == col || row + col == 7 {
                15
            } else {
                0
            }
        }
        PieceKind::Rook => {
            let seventh = match color {
                Color::White => 1,
                Color::Black => 6,
            };
            if row == seventh {
                30
            } else {
                0
            }
        }
        PieceKind::Queen => 0,
        PieceKind::King => {
            if endgame {
                14 - ((2 * row - 7).abs() + (2 * col - 7).abs())
            } else {
                let back_rank = match color {
                    Color::White => 7,
                    Color::Black => 0,
                };
                if row == back_rank && !(3..=4).contains(&col) {
                    20
                } else {
                    0
                }
            }
        }
    }
}

/// Legal-move counts with the turn forced to each side, minor-piece moves
/// counted triple (the +2 bonus on top of the move itself).
pub(crate) fn mobility(board: &Board) -> i32 {
    let count = |color: Color| {
        let mut forced = *board;
        forced.set_turn(color);
        let moves = legal_moves(&forced);
        let mut total = moves.len() as i32;
        for mv in &moves {
            if let Some(piece) = forced.piece_at(mv.from) {
                if piece.kind == PieceKind::Knight || piece.kind == PieceKind::Bishop {
                    total += 2;
                }
            }
        }
        total
    };
    (count(Color::White) - count(Color::Black)) * 5
}

pub(crate) fn pawn_structure(board: &Board) -> i32 {
    let mut score = 0;
    for color in [Color::White, Color::Black] {
        let mut per_file = [0_i32; 8];
        for square in squares() {
            if board.piece_at(square) == Some(Piece::new(PieceKind::Pawn, color)) {
                per_file[square.col as usize] += 1;
            }
        }

        let mut doubled = 0;
        for file in per_file {
            doubled += (file - 1).max(0);
        }
        score += signed(color, -20 * doubled);

        for square in squares() {
            if board.piece_at(square) != Some(Piece::new(PieceKind::Pawn, color)) {
                continue;
            }
            let col = square.col as usize;
            let neighbours = (col > 0 && per_file[col - 1] > 0) || (col < 7 && per_file[col + 1] > 0);
            if !neighbours {
                score += signed(color, -15);
            }
            if is_passed_pawn(board, square, color) {
                score += signed(color, 30);
            }
        }
    }
    score
}

/// A pawn is passed when no enemy pawn sits strictly ahead of it on its own
/// file or either adjacent file.
pub(crate) fn is_passed_pawn(board: &Board, square: Square, color: Color) -> bool {
    let direction: i8 = if color == Color::White { -1 } else { 1 };
    let mut row = square.row + direction;
    while (0..BOARD_WIDTH).contains(&row) {
        for col in [square.col - 1, square.col, square.col + 1] {
            let ahead = Square::new(row, col);
            if let Some(piece) = board.piece_at(ahead) {
                if piece.kind == PieceKind::Pawn && piece.color != color {
                    return false;
                }
            }
        }
        row += direction;
    }
    true
}

pub(crate) fn king_safety(board: &Board) -> i32 {
    let mut score = 0;
    if board.in_check(Color::White) {
        score -= 50;
    }
    if board.in_check(Color::Black) {
        score += 50;
    }

    for color in [Color::White, Color::Black] {
        let king = match board.king_square(color) {
            Some(king) => king,
            None => continue,
        };
        let (back_rank, shield_row) = match color {
            Color::White => (7, 6),
            Color::Black => (0, 1),
        };
        if king.row != back_rank {
            continue;
        }
        let mut shield = 0;
        for col in [king.col - 1, king.col, king.col + 1] {
            let front = Square::new(shield_row, col);
            if board.piece_at(front) == Some(Piece::new(PieceKind::Pawn, color)) {
                shield += 1;
            }
        }
        score += signed(color, 15 * shield);
    }
    score
}
