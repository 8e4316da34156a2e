//! Iterative deepening: repeat the search at increasing depths until the
//! clock runs out, keeping the best move of the deepest finished iteration.
//!
//! The deadline is only checked between iterations, so a time budget can
//! overshoot by up to one iteration's search time; callers size the budget
//! accordingly.

use std::time::{Duration, Instant};

use crate::chess::board::Board;
use crate::chess::core::Move;
use crate::chess::movegen::legal_moves;
use crate::evaluation::{INF, MATE, UNKNOWN};
use crate::search::aspiration::aspiration_search;
use crate::search::{Depth, SearchInfo, Searcher};

/// Searches `board` at depths `1..=max_depth` within `time_limit`.
///
/// After every iteration the best move is read back from the transposition
/// table; if the root entry carries none, a one-ply scan over the legal root
/// moves fills in. The loop stops early once a forced mate is proven — no
/// deeper iteration can improve on it.
pub fn iterative_search(
    searcher: &mut Searcher,
    board: &Board,
    max_depth: Depth,
    time_limit: Duration,
) -> SearchInfo {
    let start = Instant::now();
    searcher.begin_search();

    let mut best_move: Option<Move> = None;
    let mut best_score = UNKNOWN;
    let mut depth_reached = 0;
    let mut previous = UNKNOWN;

    for depth in 1..=max_depth {
        if start.elapsed() > time_limit {
            break;
        }

        let score = if searcher.aspiration() && previous != UNKNOWN {
            aspiration_search(searcher, board, depth, previous)
        } else {
            searcher.search(board, depth, -INF, INF)
        };
        previous = score;
        depth_reached = depth;

        best_move = searcher
            .table_move(board)
            .or_else(|| one_ply_fallback(searcher, board));
        best_score = score;

        tracing::debug!(
            depth,
            score,
            nodes = searcher.nodes(),
            best = %best_move.map_or_else(|| "none".to_owned(), |mv| mv.to_string()),
            "iteration finished"
        );

        if score.abs() > MATE - i32::from(max_depth) {
            break;
        }
    }

    SearchInfo {
        depth: depth_reached,
        nodes: searcher.nodes(),
        elapsed: start.elapsed(),
        best_move,
        score: best_score,
    }
}

/// Manual one-ply pick for the rare case of a root entry without a move.
fn one_ply_fallback(searcher: &mut Searcher, board: &Board) -> Option<Move> {
    let mut best = -INF;
    let mut best_move = None;
    for mv in legal_moves(board) {
        let mut child = *board;
        child.move_piece(mv.from, mv.to);
        child.switch_turn();
        let score = -searcher.search(&child, 1, -INF, -best);
        if score > best {
            best = score;
            best_move = Some(mv);
        }
    }
    best_move
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::search::Strategy;

    #[test]
    fn reports_progress_and_a_move() {
        let mut searcher = Searcher::new(Strategy::AlphaBeta);
        let info = iterative_search(
            &mut searcher,
            &Board::starting(),
            2,
            Duration::from_secs(600),
        );
        assert_eq!(info.depth, 2);
        assert!(info.nodes > 0);
        assert!(info.best_move.is_some());
        assert!((-50..=50).contains(&info.score), "got {}", info.score);
    }

    #[test]
    fn proven_mate_stops_the_deepening() {
        let board = Board::from_key("6k1/5ppp/8/8/8/8/8/R5K1 w").unwrap();
        let mut searcher = Searcher::new(Strategy::AlphaBeta);
        let info = iterative_search(&mut searcher, &board, 6, Duration::from_secs(600));
        // The mate shows up at depth 1 already; no reason to go deeper.
        assert!(info.depth < 6, "kept searching after mate: {}", info.depth);
        assert!(info.score >= MATE - 6);
        assert_eq!(info.best_move, Some(Move::from_uci("a1a8").unwrap()));
    }

    #[test]
    fn mateless_root_returns_no_move() {
        // Stalemate: no legal moves, score 0, nothing to play.
        let board = Board::from_key("7k/5Q2/6K1/8/8/8/8/8 b").unwrap();
        let mut searcher = Searcher::new(Strategy::AlphaBeta);
        let info = iterative_search(&mut searcher, &board, 3, Duration::from_secs(600));
        assert_eq!(info.best_move, None);
        assert_eq!(info.score, 0);
    }

    #[test]
    fn deeper_iterations_keep_the_forced_capture() {
        let board =
            Board::from_key("rnb1kbnr/pppp1ppp/8/3q4/4P3/8/PPPP1PPP/RNBQKBNR w").unwrap();
        let mut searcher = Searcher::new(Strategy::AlphaBeta);
        let info = iterative_search(&mut searcher, &board, 3, Duration::from_secs(600));
        assert_eq!(info.best_move, Some(Move::from_uci("e4d5").unwrap()));
        assert!(info.score > 700);
    }

    #[test]
    fn aspiration_toggle_still_finds_the_capture() {
        let board =
            Board::from_key("rnb1kbnr/pppp1ppp/8/3q4/4P3/8/PPPP1PPP/RNBQKBNR w").unwrap();
        let mut searcher = Searcher::new(Strategy::AlphaBeta);
        searcher.set_aspiration(true);
        let info = iterative_search(&mut searcher, &board, 3, Duration::from_secs(600));
        assert_eq!(info.best_move, Some(Move::from_uci("e4d5").unwrap()));
    }
}
