//! [Principal-variation search]: the first child of a PV node is searched
//! with the full window, every later child with a null window first; only a
//! null-window score landing strictly inside `(alpha, beta)` pays for a full
//! re-search.
//!
//! [Principal-variation search]: https://www.chessprogramming.org/Principal_Variation_Search

use crate::chess::board::Board;
use crate::chess::core::Move;
use crate::chess::movegen::legal_moves;
use crate::evaluation::{INF, MATE, UNKNOWN};
use crate::search::ordering::order_moves;
use crate::search::transposition::Bound;
use crate::search::{Depth, Searcher};

impl Searcher {
    /// Negamax with null-window probing. `is_pv` marks nodes on the principal
    /// variation; transposition hits are not trusted there so the PV is
    /// always backed by a real evaluation.
    pub fn principal_variation(
        &mut self,
        board: &Board,
        depth: Depth,
        mut alpha: i32,
        beta: i32,
        is_pv: bool,
    ) -> i32 {
        if depth == 0 {
            return self.quiescence(board, alpha, beta);
        }
        self.nodes += 1;

        if !is_pv {
            let cached = self.ttable.probe(board, depth, alpha, beta);
            if cached != UNKNOWN {
                return cached;
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
        for (index, mv) in moves.into_iter().enumerate() {
            let mut child = *board;
            child.move_piece(mv.from, mv.to);
            child.switch_turn();

            let value = if index == 0 {
                -self.principal_variation(&child, depth - 1, -beta, -alpha, is_pv)
            } else {
                let probe =
                    -self.principal_variation(&child, depth - 1, -alpha - 1, -alpha, false);
                if probe > alpha && probe < beta {
                    -self.principal_variation(&child, depth - 1, -beta, -alpha, true)
                } else {
                    probe
                }
            };

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

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::search::Strategy;

    #[test]
    fn agrees_with_plain_alpha_beta() {
        // At depth two no transpositions exist, so the null-window probes
        // must reconstruct exactly the plain alpha-beta scores.
        for key in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w",
            "r1bqkbnr/ppp2ppp/2n5/3pp3/4P3/5N2/PPPP1PPP/RNBQKB1R w",
            "rnb1kbnr/pppp1ppp/8/3q4/4P3/8/PPPP1PPP/RNBQKBNR w",
            "4k3/pp3pp1/2p5/4P3/2P5/PP3PP1/8/4K3 w",
        ] {
            let board = Board::from_key(key).unwrap();
            for depth in 1..=2 {
                let mut plain = Searcher::new(Strategy::AlphaBeta);
                plain.set_extensions(false);
                let mut pvs = Searcher::new(Strategy::PrincipalVariation);
                assert_eq!(
                    pvs.search(&board, depth, -INF, INF),
                    plain.search(&board, depth, -INF, INF),
                    "{key} at depth {depth}"
                );
            }
        }
    }

    #[test]
    fn finds_the_hanging_queen() {
        let board =
            Board::from_key("rnb1kbnr/pppp1ppp/8/3q4/4P3/8/PPPP1PPP/RNBQKBNR w").unwrap();
        let mut searcher = Searcher::new(Strategy::PrincipalVariation);
        let score = searcher.search(&board, 3, -INF, INF);
        assert!(score > 700, "got {score}");
        assert_eq!(
            searcher.table_move(&board),
            Some(Move::from_uci("e4d5").unwrap())
        );
    }

    #[test]
    fn terminal_positions_match_the_core() {
        let mated =
            Board::from_key("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w").unwrap();
        let mut searcher = Searcher::new(Strategy::PrincipalVariation);
        assert_eq!(searcher.search(&mated, 3, -INF, INF), -MATE - 3);

        let stalemate = Board::from_key("7k/5Q2/6K1/8/8/8/8/8 b").unwrap();
        assert_eq!(searcher.search(&stalemate, 3, -INF, INF), 0);
    }

    #[test]
    fn null_window_probe_confirmed_by_re_search() {
        // A null-window probe that lands inside the window is re-searched
        // with the full window; both must settle on the same score, which is
        // what makes the composite equal to a full-window search.
        let board =
            Board::from_key("r1bqkbnr/ppp2ppp/2n5/3pp3/4P3/5N2/PPPP1PPP/RNBQKB1R w").unwrap();
        let mut reference = Searcher::new(Strategy::PrincipalVariation);
        let full = reference.search(&board, 2, -INF, INF);

        let mut probed = Searcher::new(Strategy::PrincipalVariation);
        let windowed = probed.search(&board, 2, full - 1, full + 1);
        assert_eq!(windowed, full);
    }
}
