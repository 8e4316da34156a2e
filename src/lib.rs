//! UCI chess engine built around a classical alpha-beta search family:
//! quiescence, transposition table, move ordering, aspiration windows,
//! principal-variation search, null-move pruning, late-move reductions and
//! iterative deepening, with an opening book and an endgame heuristic in
//! front of the search.
//!
//! The board is a plain 8×8 mailbox without castling, en-passant or
//! promotion bookkeeping; see [`chess::board::Board`] for the exact rule
//! subset.

pub mod book;
pub mod chess;
pub mod endgame;
pub mod engine;
pub mod evaluation;
pub mod search;

pub use engine::Engine;
