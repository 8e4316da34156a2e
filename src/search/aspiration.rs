//! [Aspiration windows]: start the next iteration with a narrow window
//! centred on the previous score, and widen to the failing side when the
//! guess was wrong.
//!
//! [Aspiration windows]: https://www.chessprogramming.org/Aspiration_Windows

use crate::chess::board::Board;
use crate::evaluation::INF;
use crate::search::{Depth, Searcher};

/// Initial half-width of the window around the previous score.
const WINDOW: i32 = 50;

/// Runs `searcher` at `depth` with a `±WINDOW` window around
/// `previous_score`. A fail-low re-searches `(-INF, score)`, a fail-high
/// `(score, INF)`; after two re-searches whatever is in hand is returned.
pub fn aspiration_search(
    searcher: &mut Searcher,
    board: &Board,
    depth: Depth,
    previous_score: i32,
) -> i32 {
    let mut alpha = previous_score - WINDOW;
    let mut beta = previous_score + WINDOW;
    let mut score = searcher.search(board, depth, alpha, beta);

    for _ in 0..2 {
        if score <= alpha {
            alpha = -INF;
            beta = score;
        } else if score >= beta {
            alpha = score;
            beta = INF;
        } else {
            break;
        }
        score = searcher.search(board, depth, alpha, beta);
    }
    score
}
