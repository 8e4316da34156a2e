//! Square-centric board representation and the attack/legality queries built
//! on top of it.
//!
//! The board stores piece placement and the side to move, nothing else: there
//! is no castling-rights, en-passant or halfmove-clock state, and the move
//! generator accordingly never produces castling, en-passant or promotion
//! moves. This is a deliberate departure from the full rules of chess;
//! [`Board::is_castling`] exists only to classify moves should castling be
//! added later.

use std::fmt;

use anyhow::bail;
use arrayvec::ArrayVec;

use super::core::{
    Color, Move, Piece, PieceKind, Square, BISHOP_DIRECTIONS, BOARD_WIDTH, KING_OFFSETS,
    KNIGHT_OFFSETS, ROOK_DIRECTIONS,
};

/// Squares a single piece attacks; a queen in the open tops out at 27.
pub(crate) type AttackList = ArrayVec<Square, 32>;

/// An 8×8 board plus the side to move. Boards are plain values: descending
/// into a child node copies the parent, so there is never aliasing between
/// plies.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
    turn: Color,
}

impl Board {
    /// An empty board with White to move.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            squares: [None; 64],
            turn: Color::White,
        }
    }

    /// The standard starting position.
    #[must_use]
    pub fn starting() -> Self {
        let mut board = Self::empty();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (col, &kind) in back_rank.iter().enumerate() {
            let col = col as i8;
            board.set_piece(Square::new(0, col), Some(Piece::new(kind, Color::Black)));
            board.set_piece(Square::new(7, col), Some(Piece::new(kind, Color::White)));
        }
        for col in 0..BOARD_WIDTH {
            board.set_piece(
                Square::new(1, col),
                Some(Piece::new(PieceKind::Pawn, Color::Black)),
            );
            board.set_piece(
                Square::new(6, col),
                Some(Piece::new(PieceKind::Pawn, Color::White)),
            );
        }
        board
    }

    /// The piece on `square`, or `None` for empty and out-of-bounds squares.
    #[must_use]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        if !square.in_bounds() {
            return None;
        }
        self.squares[square.index()]
    }

    /// Places (or clears) a square. Out-of-bounds writes are a no-op.
    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        if square.in_bounds() {
            self.squares[square.index()] = piece;
        }
    }

    /// Vacates `from` and overwrites `to` with whatever stood on `from`.
    /// No legality check of any kind.
    pub fn move_piece(&mut self, from: Square, to: Square) {
        if !from.in_bounds() || !to.in_bounds() {
            return;
        }
        let piece = self.squares[from.index()].take();
        self.squares[to.index()] = piece;
    }

    #[must_use]
    pub const fn turn(&self) -> Color {
        self.turn
    }

    pub fn set_turn(&mut self, color: Color) {
        self.turn = color;
    }

    pub fn switch_turn(&mut self) {
        self.turn = !self.turn;
    }

    /// Canonical position key: the piece layout rank by rank from the top,
    /// empty runs collapsed, followed by the side to move. The trailing
    /// `- - 0 1` fields are emitted for FEN compatibility and ignored by
    /// [`Board::from_key`].
    #[must_use]
    pub fn to_key(&self) -> String {
        let mut key = String::with_capacity(72);
        for row in 0..BOARD_WIDTH {
            let mut empty_run = 0;
            for col in 0..BOARD_WIDTH {
                match self.piece_at(Square::new(row, col)) {
                    None => empty_run += 1,
                    Some(piece) => {
                        if empty_run > 0 {
                            key.push(char::from(b'0' + empty_run));
                            empty_run = 0;
                        }
                        key.push(piece.algebraic_symbol());
                    }
                }
            }
            if empty_run > 0 {
                key.push(char::from(b'0' + empty_run));
            }
            if row < BOARD_WIDTH - 1 {
                key.push('/');
            }
        }
        key.push(' ');
        key.push_str(match self.turn {
            Color::White => "w",
            Color::Black => "b",
        });
        key.push_str(" - - 0 1");
        key
    }

    /// Parses a position key (or a full FEN line; the castling, en-passant
    /// and clock fields are ignored). A missing side-to-move field defaults
    /// to White.
    pub fn from_key(key: &str) -> anyhow::Result<Self> {
        let mut parts = key.split_whitespace();
        let layout = match parts.next() {
            Some(layout) => layout,
            None => bail!("malformed key: empty input"),
        };

        let mut board = Self::empty();
        let mut row: i8 = 0;
        let mut col: i8 = 0;
        for symbol in layout.chars() {
            match symbol {
                '/' => {
                    row += 1;
                    col = 0;
                    if row >= BOARD_WIDTH {
                        bail!("malformed key: more than 8 ranks in '{layout}'");
                    }
                }
                '1'..='8' => col += symbol as i8 - b'0' as i8,
                _ => {
                    let piece = Piece::try_from(symbol)?;
                    if col >= BOARD_WIDTH {
                        bail!("malformed key: rank overflow in '{layout}'");
                    }
                    board.set_piece(Square::new(row, col), Some(piece));
                    col += 1;
                }
            }
            if col > BOARD_WIDTH {
                bail!("malformed key: rank overflow in '{layout}'");
            }
        }

        board.turn = match parts.next() {
            Some(turn) => Color::try_from(turn)?,
            None => Color::White,
        };
        Ok(board)
    }

    /// Locates the king of `color`, scanning rows then columns.
    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        for row in 0..BOARD_WIDTH {
            for col in 0..BOARD_WIDTH {
                let square = Square::new(row, col);
                if self.piece_at(square) == Some(Piece::new(PieceKind::King, color)) {
                    return Some(square);
                }
            }
        }
        None
    }

    /// Squares the piece on `square` pseudo-attacks. Slider rays include the
    /// first occupied square; pawns attack only their two forward diagonals,
    /// never the push squares. Empty squares attack nothing.
    pub(crate) fn attacks_from(&self, square: Square) -> AttackList {
        let mut attacks = AttackList::new();
        let piece = match self.piece_at(square) {
            Some(piece) => piece,
            None => return attacks,
        };

        match piece.kind {
            PieceKind::Pawn => {
                let direction = if piece.color == Color::White { -1 } else { 1 };
                for step in [-1, 1] {
                    let target = square.offset(direction, step);
                    if target.in_bounds() {
                        attacks.push(target);
                    }
                }
            }
            PieceKind::Knight => {
                for (rows, cols) in KNIGHT_OFFSETS {
                    let target = square.offset(rows, cols);
                    if target.in_bounds() {
                        attacks.push(target);
                    }
                }
            }
            PieceKind::King => {
                for (rows, cols) in KING_OFFSETS {
                    let target = square.offset(rows, cols);
                    if target.in_bounds() {
                        attacks.push(target);
                    }
                }
            }
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                let directions: &[(i8, i8)] = match piece.kind {
                    PieceKind::Bishop => &BISHOP_DIRECTIONS,
                    PieceKind::Rook => &ROOK_DIRECTIONS,
                    _ => &KING_OFFSETS,
                };
                for &(rows, cols) in directions {
                    let mut target = square.offset(rows, cols);
                    while target.in_bounds() {
                        attacks.push(target);
                        if self.piece_at(target).is_some() {
                            break;
                        }
                        target = target.offset(rows, cols);
                    }
                }
            }
        }
        attacks
    }

    /// True iff some piece of `attacker` has `square` among its pseudo-attack
    /// squares. Does not consult the side to move.
    #[must_use]
    pub fn is_square_attacked(&self, square: Square, attacker: Color) -> bool {
        for row in 0..BOARD_WIDTH {
            for col in 0..BOARD_WIDTH {
                let from = Square::new(row, col);
                match self.piece_at(from) {
                    Some(piece) if piece.color == attacker => {
                        if self.attacks_from(from).contains(&square) {
                            return true;
                        }
                    }
                    _ => continue,
                }
            }
        }
        false
    }

    /// Whether the king of `color` is currently attacked. A missing king is
    /// never in check.
    #[must_use]
    pub fn in_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(king) => self.is_square_attacked(king, !color),
            None => false,
        }
    }

    /// Validates a single move: right color on the source square, the
    /// destination empty or enemy, the destination within the source piece's
    /// pseudo-attack set, and the mover's king safe afterwards.
    ///
    /// This is the validation entry point for externally supplied moves; the
    /// move generator's legality filter is separate. Pawn pushes are not in
    /// the pawn's attack set and therefore do not validate here.
    #[must_use]
    pub fn is_move_legal(&self, mv: Move) -> bool {
        if !mv.from.in_bounds() || !mv.to.in_bounds() {
            return false;
        }
        let piece = match self.piece_at(mv.from) {
            Some(piece) if piece.color == self.turn => piece,
            _ => return false,
        };
        if let Some(target) = self.piece_at(mv.to) {
            if target.color == piece.color {
                return false;
            }
        }
        if !self.attacks_from(mv.from).contains(&mv.to) {
            return false;
        }

        let mut next = *self;
        next.move_piece(mv.from, mv.to);
        !next.in_check(self.turn)
    }

    /// True when the destination holds an enemy of the moving piece.
    #[must_use]
    pub fn is_capture(&self, mv: Move) -> bool {
        match (self.piece_at(mv.from), self.piece_at(mv.to)) {
            (Some(source), Some(target)) => source.color != target.color,
            _ => false,
        }
    }

    /// Classification heuristic: a king travelling exactly two files on one
    /// rank. The generator never produces such moves.
    #[must_use]
    pub fn is_castling(&self, mv: Move) -> bool {
        match self.piece_at(mv.from) {
            Some(piece) if piece.kind == PieceKind::King => {
                mv.from.row == mv.to.row && (mv.from.col - mv.to.col).abs() == 2
            }
            _ => false,
        }
    }
}

impl fmt::Display for Board {
    /// Renders the board as a diagram, ranks labelled 8 down to 1.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..BOARD_WIDTH {
            write!(f, "{} |", 8 - row)?;
            for col in 0..BOARD_WIDTH {
                match self.piece_at(Square::new(row, col)) {
                    Some(piece) => write!(f, "{piece} ")?,
                    None => f.write_str(". ")?,
                }
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "    a b c d e f g h")?;
        write!(f, "turn: {}", self.turn)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_key())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn starting_position_key() {
        assert_eq!(
            Board::starting().to_key(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1"
        );
    }

    #[test]
    fn key_round_trip() {
        for key in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1",
            "r1bqkbnr/ppp2ppp/2n5/3pp3/4P3/5N2/PPPP1PPP/RNBQKB1R w - - 0 1",
            "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1",
            "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1",
        ] {
            let board = Board::from_key(key).unwrap();
            assert_eq!(board.to_key(), key);
            assert_eq!(Board::from_key(&board.to_key()).unwrap(), board);
        }
    }

    #[test]
    fn key_parsing_is_tolerant_of_trailing_fields() {
        // A full FEN with castling rights and clocks parses to the same
        // position as the bare layout.
        let full =
            Board::from_key("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        assert_eq!(full, Board::starting());

        // Missing side to move defaults to White.
        let bare = Board::from_key("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap();
        assert_eq!(bare.turn(), Color::White);
        assert_eq!(bare, Board::starting());
    }

    #[test]
    fn malformed_keys_are_rejected() {
        assert!(Board::from_key("").is_err());
        assert!(Board::from_key("rnbqkbnr/ppxppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w").is_err());
        assert!(Board::from_key("rnbqkbnrr/ppp5/8/8/8/8/8/8 w").is_err());
        assert!(Board::from_key("8/8/8/8/8/8/8/8/8 w").is_err());
    }

    #[test]
    fn out_of_bounds_accessors_are_harmless() {
        let mut board = Board::starting();
        assert_eq!(board.piece_at(Square::new(-1, 0)), None);
        assert_eq!(board.piece_at(Square::new(0, 8)), None);

        let before = board;
        board.set_piece(Square::new(8, 8), Some(Piece::new(PieceKind::Queen, Color::White)));
        board.move_piece(Square::new(6, 4), Square::new(-1, 4));
        assert_eq!(board, before);
    }

    #[test]
    fn move_piece_is_unconditional() {
        let mut board = Board::starting();
        // An illegal teleport is carried out all the same.
        board.move_piece(Square::new(7, 0), Square::new(0, 0));
        assert_eq!(
            board.piece_at(Square::new(0, 0)),
            Some(Piece::new(PieceKind::Rook, Color::White))
        );
        assert_eq!(board.piece_at(Square::new(7, 0)), None);
    }

    #[test]
    fn pawn_attacks_are_diagonal_only() {
        let board = Board::from_key("8/8/8/8/8/8/4P3/8 w").unwrap();
        let attacks = board.attacks_from(Square::try_from("e2").unwrap());
        assert_eq!(attacks.len(), 2);
        assert!(attacks.contains(&Square::try_from("d3").unwrap()));
        assert!(attacks.contains(&Square::try_from("f3").unwrap()));
        // The push square is not an attack.
        assert!(!attacks.contains(&Square::try_from("e3").unwrap()));
    }

    #[test]
    fn slider_rays_include_the_blocker() {
        let board = Board::from_key("8/8/8/8/8/p7/8/R7 w").unwrap();
        let rook = Square::try_from("a1").unwrap();
        assert!(board.is_square_attacked(Square::try_from("a3").unwrap(), Color::White));
        assert!(!board.is_square_attacked(Square::try_from("a4").unwrap(), Color::White));
        assert!(board.attacks_from(rook).contains(&Square::try_from("h1").unwrap()));
    }

    #[test]
    fn check_detection() {
        let board = Board::from_key("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w").unwrap();
        assert!(board.in_check(Color::White));
        assert!(!board.in_check(Color::Black));
        assert_eq!(
            board.king_square(Color::White),
            Some(Square::try_from("e1").unwrap())
        );
    }

    #[test]
    fn missing_king_is_never_in_check() {
        let board = Board::from_key("8/8/8/8/8/8/8/Q7 w").unwrap();
        assert_eq!(board.king_square(Color::Black), None);
        assert!(!board.in_check(Color::Black));
    }

    #[test]
    fn move_validation() {
        let board = Board::starting();
        // Knight development: within the attack set, destination empty.
        assert!(board.is_move_legal(Move::from_uci("g1f3").unwrap()));
        // Wrong side to move.
        assert!(!board.is_move_legal(Move::from_uci("g8f6").unwrap()));
        // Own piece on the destination.
        assert!(!board.is_move_legal(Move::from_uci("a1a2").unwrap()));
        // Empty source.
        assert!(!board.is_move_legal(Move::from_uci("e4e5").unwrap()));

        // Moving a pinned piece exposes the king.
        let pinned = Board::from_key("4k3/8/8/8/7q/8/5N2/4K3 w").unwrap();
        assert!(!pinned.is_move_legal(Move::from_uci("f2d3").unwrap()));
    }

    #[test]
    fn capture_and_castling_predicates() {
        let board = Board::from_key("rnbqkbnr/ppp2ppp/8/3pp3/4P3/8/PPPP1PPP/RNBQKBNR w").unwrap();
        assert!(board.is_capture(Move::from_uci("e4d5").unwrap()));
        assert!(!board.is_capture(Move::from_uci("e4e5").unwrap()));
        assert!(!board.is_capture(Move::from_uci("d2d3").unwrap()));

        let castled = Board::from_key("4k3/8/8/8/8/8/8/4K2R w").unwrap();
        assert!(castled.is_castling(Move::from_uci("e1g1").unwrap()));
        assert!(!castled.is_castling(Move::from_uci("e1f1").unwrap()));
        assert!(!castled.is_castling(Move::from_uci("h1h2").unwrap()));
    }
}
