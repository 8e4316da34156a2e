//! Endgame recognition and a heuristic mover for the recognized patterns.
//!
//! This is not a tablebase in the retrograde-analysis sense: positions are
//! classified by material signature (king-and-pawn, rook, bishop, knight or
//! queen endings) and scored by material plus a king-activity hint. The
//! per-kind move pickers encode standard endgame lore — push passers, take
//! open files, centralize — and are a fallback beside the main search, not a
//! replacement for it.

use std::collections::HashMap;

use strum::IntoEnumIterator;

use crate::chess::board::Board;
use crate::chess::core::{Color, Move, PieceKind, Square, BOARD_WIDTH};
use crate::chess::movegen::legal_moves;
use crate::evaluation::{piece_value, INF, UNKNOWN};

/// Per-kind piece counts for both sides plus the endgame verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaterialSignature {
    white: [u8; 6],
    black: [u8; 6],
    endgame: bool,
}

impl MaterialSignature {
    fn count(&self, kind: PieceKind, color: Color) -> u8 {
        match color {
            Color::White => self.white[kind.index()],
            Color::Black => self.black[kind.index()],
        }
    }

    fn non_pawn_pieces(&self, color: Color) -> u8 {
        PieceKind::iter()
            .filter(|kind| *kind != PieceKind::Pawn)
            .map(|kind| self.count(kind, color))
            .sum()
    }

    fn is_king_and_pawn(&self) -> bool {
        self.non_pawn_pieces(Color::White) == 1 && self.non_pawn_pieces(Color::Black) == 1
    }

    fn queens(&self) -> u8 {
        self.count(PieceKind::Queen, Color::White) + self.count(PieceKind::Queen, Color::Black)
    }

    fn both_have(&self, kind: PieceKind) -> bool {
        self.count(kind, Color::White) > 0 && self.count(kind, Color::Black) > 0
    }

    fn is_rook_ending(&self) -> bool {
        self.both_have(PieceKind::Rook) && self.queens() == 0
    }

    fn is_bishop_ending(&self) -> bool {
        self.both_have(PieceKind::Bishop)
            && self.queens() == 0
            && self.count(PieceKind::Rook, Color::White) == 0
            && self.count(PieceKind::Rook, Color::Black) == 0
    }

    fn is_knight_ending(&self) -> bool {
        self.both_have(PieceKind::Knight)
            && self.queens() == 0
            && self.count(PieceKind::Rook, Color::White) == 0
            && self.count(PieceKind::Rook, Color::Black) == 0
            && self.count(PieceKind::Bishop, Color::White) == 0
            && self.count(PieceKind::Bishop, Color::Black) == 0
    }

    fn is_queen_ending(&self) -> bool {
        self.both_have(PieceKind::Queen)
    }
}

/// Signature-keyed endgame oracle with a per-position cache.
#[derive(Default)]
pub struct EndgameTable {
    cache: HashMap<String, MaterialSignature>,
}

impl EndgameTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Whether the position classifies as an endgame: twelve or fewer pieces,
    /// or both queens gone, or at most sixteen pieces with at most four
    /// pawns.
    pub fn is_endgame_position(&mut self, board: &Board) -> bool {
        self.signature(board).endgame
    }

    /// Material-plus-hint score (White minus Black), or [`UNKNOWN`] outside
    /// the classified endgames.
    pub fn probe(&mut self, board: &Board) -> i32 {
        let signature = self.signature(board);
        if !signature.endgame {
            return UNKNOWN;
        }

        let mut score = 0;
        for kind in PieceKind::iter() {
            score += piece_value(kind)
                * (i32::from(signature.count(kind, Color::White))
                    - i32::from(signature.count(kind, Color::Black)));
        }
        if signature.is_king_and_pawn() {
            // King activity decides pawn endings.
            score += (king_centralization(board, Color::White)
                - king_centralization(board, Color::Black))
                * 10;
        }
        score
    }

    /// Heuristic move for the recognized ending, `None` outside them or
    /// without legal moves.
    pub fn best_move(&mut self, board: &Board) -> Option<Move> {
        let signature = self.signature(board);
        if !signature.endgame {
            return None;
        }
        if signature.is_king_and_pawn() {
            king_and_pawn_move(board)
        } else if signature.is_rook_ending() {
            piece_preference_move(board, PieceKind::Rook, rook_move_score)
        } else if signature.is_bishop_ending() {
            piece_preference_move(board, PieceKind::Bishop, bishop_move_score)
        } else if signature.is_knight_ending() {
            piece_preference_move(board, PieceKind::Knight, knight_move_score)
        } else if signature.is_queen_ending() {
            piece_preference_move(board, PieceKind::Queen, queen_move_score)
        } else {
            None
        }
    }

    /// Counts material, memoized by position key.
    pub fn signature(&mut self, board: &Board) -> MaterialSignature {
        let key = board.to_key();
        if let Some(cached) = self.cache.get(&key) {
            return *cached;
        }

        let mut signature = MaterialSignature {
            white: [0; 6],
            black: [0; 6],
            endgame: false,
        };
        let mut total = 0;
        for square in squares() {
            if let Some(piece) = board.piece_at(square) {
                total += 1;
                match piece.color {
                    Color::White => signature.white[piece.kind.index()] += 1,
                    Color::Black => signature.black[piece.kind.index()] += 1,
                }
            }
        }
        let pawns = signature.count(PieceKind::Pawn, Color::White)
            + signature.count(PieceKind::Pawn, Color::Black);
        signature.endgame =
            total <= 12 || signature.queens() == 0 || (total <= 16 && pawns <= 4);

        let _ = self.cache.insert(key, signature);
        signature
    }

    /// Number of cached signatures, exposed for cache behavior tests.
    #[must_use]
    pub fn cached_positions(&self) -> usize {
        self.cache.len()
    }
}

fn squares() -> impl Iterator<Item = Square> {
    (0..BOARD_WIDTH).flat_map(|row| (0..BOARD_WIDTH).map(move |col| Square::new(row, col)))
}

/// Closeness to the centre in half-step manhattan distance, larger is closer.
fn king_centralization(board: &Board, color: Color) -> i32 {
    match board.king_square(color) {
        Some(king) => {
            let row = i32::from(king.row);
            let col = i32::from(king.col);
            7 - ((2 * row - 7).abs() + (2 * col - 7).abs()) / 2
        }
        None => 0,
    }
}

/// King-and-pawn endings: promote if possible, push pawns otherwise, else
/// walk the king toward the centre.
fn king_and_pawn_move(board: &Board) -> Option<Move> {
    let moves = legal_moves(board);
    if moves.is_empty() {
        return None;
    }

    for mv in &moves {
        if let Some(piece) = board.piece_at(mv.from) {
            if piece.kind == PieceKind::Pawn {
                let last_rank = if piece.color == Color::White { 0 } else { 7 };
                if mv.to.row == last_rank {
                    return Some(*mv);
                }
                if mv.from.col == mv.to.col && (mv.to.row - mv.from.row).abs() == 1 {
                    return Some(*mv);
                }
            }
        }
    }

    let mut best = -INF;
    let mut best_move = None;
    for mv in &moves {
        if board.piece_at(mv.from).map(|piece| piece.kind) != Some(PieceKind::King) {
            continue;
        }
        let row = i32::from(mv.to.row);
        let col = i32::from(mv.to.col);
        let score = (3 - (2 * col - 7).abs() / 2) * 10 + (3 - (2 * row - 7).abs() / 2) * 10;
        if score > best {
            best = score;
            best_move = Some(*mv);
        }
    }
    best_move.or_else(|| moves.first().copied())
}

/// Picks the best-scoring move of the given piece kind, falling back to the
/// first legal move when that piece has nothing to do.
fn piece_preference_move(
    board: &Board,
    kind: PieceKind,
    score: fn(&Board, Move) -> i32,
) -> Option<Move> {
    let moves = legal_moves(board);
    if moves.is_empty() {
        return None;
    }

    let mut best = -INF;
    let mut best_move = None;
    for mv in &moves {
        if board.piece_at(mv.from).map(|piece| piece.kind) != Some(kind) {
            continue;
        }
        let score = score(board, *mv);
        if score > best {
            best = score;
            best_move = Some(*mv);
        }
    }
    best_move.or_else(|| moves.first().copied())
}

/// Rooks: open files, enemy-pawn targets, and sitting behind friendly pawns.
fn rook_move_score(board: &Board, mv: Move) -> i32 {
    let color = match board.piece_at(mv.from) {
        Some(piece) => piece.color,
        None => return -INF,
    };
    let mut score = 0;

    let mut open_file = true;
    let mut friendly_pawns_on_file = 0;
    for row in 0..BOARD_WIDTH {
        if row == mv.to.row {
            continue;
        }
        match board.piece_at(Square::new(row, mv.to.col)) {
            Some(piece) => {
                open_file = false;
                if piece.kind == PieceKind::Pawn && piece.color == color {
                    friendly_pawns_on_file += 1;
                }
            }
            None => {}
        }
    }
    if open_file {
        score += 50;
    }
    score += friendly_pawns_on_file * 20;

    if let Some(target) = board.piece_at(mv.to) {
        if target.kind == PieceKind::Pawn && target.color != color {
            score += 30;
        }
    }
    score
}

/// Bishops: the long diagonals and enemy-pawn targets, supported by friendly
/// pawns sharing a diagonal.
fn bishop_move_score(board: &Board, mv: Move) -> i32 {
    let color = match board.piece_at(mv.from) {
        Some(piece) => piece.color,
        None => return -INF,
    };
    let mut score = 0;

    if mv.to.row == mv.to.col || mv.to.row + mv.to.col == 7 {
        score += 30;
    }
    if let Some(target) = board.piece_at(mv.to) {
        if target.kind == PieceKind::Pawn && target.color != color {
            score += 30;
        }
    }
    for square in squares() {
        if square.row + square.col == mv.to.row + mv.to.col
            || square.row - square.col == mv.to.row - mv.to.col
        {
            if let Some(piece) = board.piece_at(square) {
                if piece.kind == PieceKind::Pawn && piece.color == color {
                    score += 20;
                }
            }
        }
    }
    score
}

/// Knights: central outposts, enemy-pawn targets, nearby friendly pawns.
fn knight_move_score(board: &Board, mv: Move) -> i32 {
    let color = match board.piece_at(mv.from) {
        Some(piece) => piece.color,
        None => return -INF,
    };
    let mut score = 0;

    if (2..=5).contains(&mv.to.row) && (2..=5).contains(&mv.to.col) {
        score += 30;
    }
    if let Some(target) = board.piece_at(mv.to) {
        if target.kind == PieceKind::Pawn && target.color != color {
            score += 30;
        }
    }
    for square in squares() {
        let rows = (square.row - mv.to.row).abs();
        let cols = (square.col - mv.to.col).abs();
        if (rows == 2 && cols == 1) || (rows == 1 && cols == 2) {
            if let Some(piece) = board.piece_at(square) {
                if piece.kind == PieceKind::Pawn && piece.color == color {
                    score += 20;
                }
            }
        }
    }
    score
}

/// Queens: central posts, any capture, and maximal reach over friendly
/// structure.
fn queen_move_score(board: &Board, mv: Move) -> i32 {
    let color = match board.piece_at(mv.from) {
        Some(piece) => piece.color,
        None => return -INF,
    };
    let mut score = 0;

    if (2..=5).contains(&mv.to.row) && (2..=5).contains(&mv.to.col) {
        score += 30;
    }
    if let Some(target) = board.piece_at(mv.to) {
        if target.color != color {
            score += 30;
        }
    }
    for square in squares() {
        if square.row == mv.to.row
            || square.col == mv.to.col
            || square.row + square.col == mv.to.row + mv.to.col
            || square.row - square.col == mv.to.row - mv.to.col
        {
            if let Some(piece) = board.piece_at(square) {
                if piece.color == color {
                    score += 20;
                }
            }
        }
    }
    score
}
