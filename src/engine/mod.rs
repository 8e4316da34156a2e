//! The engine puts all the pieces together: it owns the current position,
//! the search context, the opening book and the endgame oracle, and exposes
//! them through the [Universal Chess Interface] (UCI).
//!
//! [`Engine::uci_loop`] is the "main loop": it reads commands from the input
//! stream and writes protocol responses to the output stream. Diagnostics go
//! through `tracing`, never to the protocol stream.
//!
//! The implementation does not aim to be an exhaustive UCI server: the goal
//! is to work with common GUIs and tournament runners, which are expected to
//! send well-formed input. Unsupported commands are reported and skipped.
//!
//! [Universal Chess Interface]: https://www.chessprogramming.org/UCI

mod time_manager;
mod uci;

use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::Context;

use crate::book::OpeningBook;
use crate::chess::board::Board;
use crate::chess::core::{Color, Move};
use crate::endgame::EndgameTable;
use crate::evaluation::evaluate;
use crate::search::{iterative_search, Depth, SearchInfo, Searcher, Strategy};
use uci::Command;
pub use time_manager::TimeManager;

/// Search depth used when `go` does not name one.
const DEFAULT_DEPTH: Depth = 6;
/// Wall-clock budget used when `go` carries no clock information.
const DEFAULT_MOVETIME: Duration = Duration::from_secs(10);

/// The orchestrator behind the UCI front-end: book first, then iterative
/// deepening, with the endgame mover as a last resort.
pub struct Engine<'a, R: BufRead, W: Write> {
    board: Board,
    searcher: Searcher,
    book: OpeningBook,
    endgame: EndgameTable,
    time_manager: TimeManager,
    /// UCI commands are read from this stream.
    input: &'a mut R,
    /// Responses to UCI commands are written to this stream.
    out: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Engine<'a, R, W> {
    /// A fresh engine on the starting position with an empty book.
    #[must_use]
    pub fn new(input: &'a mut R, out: &'a mut W) -> Self {
        Self {
            board: Board::starting(),
            searcher: Searcher::new(Strategy::default()),
            book: OpeningBook::new(),
            endgame: EndgameTable::new(),
            time_manager: TimeManager::new(),
            input,
            out,
        }
    }

    /// Replaces the opening book.
    pub fn set_book(&mut self, book: OpeningBook) {
        self.book = book;
    }

    /// Continuously reads the input stream and executes UCI commands until
    /// `quit` or end of input.
    pub fn uci_loop(&mut self) -> anyhow::Result<()> {
        loop {
            let mut line = String::new();
            if self
                .input
                .read_line(&mut line)
                .context("reading UCI input")?
                == 0
            {
                break;
            }
            match Command::parse(&line) {
                Command::Uci => self.handshake()?,
                Command::IsReady => self.sync()?,
                Command::NewGame => self.new_game(),
                Command::SetPosition { key, moves } => self.set_position(key, &moves)?,
                Command::Go {
                    depth,
                    wtime,
                    btime,
                    winc,
                    binc,
                    movetime,
                    infinite,
                } => self.go(depth, wtime, btime, winc, binc, movetime, infinite)?,
                Command::SetOption { name, value } => self.set_option(&name, value.as_deref())?,
                Command::Eval => {
                    writeln!(self.out, "info string evaluation {}", evaluate(&self.board))?;
                }
                Command::Stop => {}
                Command::Quit => break,
                Command::Unknown(command) => {
                    let command = command.trim();
                    if !command.is_empty() {
                        writeln!(self.out, "info string Unsupported command: {command}")?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Picks a move for the current position within the given limits: the
    /// book when it answers, otherwise iterative deepening, otherwise the
    /// endgame mover.
    pub fn find_best_move(&mut self, max_depth: Depth, time_limit: Duration) -> Option<Move> {
        self.search_position(max_depth, time_limit).0
    }

    fn search_position(
        &mut self,
        max_depth: Depth,
        time_limit: Duration,
    ) -> (Option<Move>, Option<SearchInfo>) {
        if let Some(book_move) = self.book.probe(&self.board) {
            tracing::info!(%book_move, "book hit");
            return (Some(book_move), None);
        }

        let info = iterative_search(&mut self.searcher, &self.board, max_depth, time_limit);
        tracing::info!(
            depth = info.depth,
            score = info.score,
            nodes = info.nodes,
            elapsed_ms = info.elapsed.as_millis() as u64,
            best = %info.best_move.map_or_else(|| "none".to_owned(), |mv| mv.to_string()),
            "search finished"
        );

        let best = info
            .best_move
            .or_else(|| self.endgame.best_move(&self.board));
        (best, Some(info))
    }

    /// Responds to the `uci` handshake by identifying the engine.
    fn handshake(&mut self) -> anyhow::Result<()> {
        writeln!(
            self.out,
            "id name {} {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        )?;
        writeln!(self.out, "id author {}", env!("CARGO_PKG_AUTHORS"))?;
        writeln!(
            self.out,
            "option name AggressiveMode type check default false"
        )?;
        writeln!(self.out, "option name Aspiration type check default false")?;
        writeln!(
            self.out,
            "option name Strategy type combo default alphabeta var alphabeta var pvs var nullmove var lmr"
        )?;
        writeln!(self.out, "uciok")?;
        Ok(())
    }

    fn sync(&mut self) -> anyhow::Result<()> {
        writeln!(self.out, "readyok")?;
        Ok(())
    }

    fn new_game(&mut self) {
        self.board = Board::starting();
        self.searcher.reset();
        self.endgame.clear();
    }

    /// Rebuilds the position from a key (or the start position) and replays
    /// the given moves. Moves are applied as-is; unparseable ones are
    /// skipped.
    fn set_position(&mut self, key: Option<String>, moves: &[String]) -> anyhow::Result<()> {
        self.board = match key {
            Some(key) => Board::from_key(&key)?,
            None => Board::starting(),
        };
        for notation in moves {
            match Move::from_uci(notation) {
                Ok(mv) => {
                    self.board.move_piece(mv.from, mv.to);
                    self.board.switch_turn();
                }
                Err(error) => {
                    tracing::warn!(%notation, %error, "skipping malformed move");
                }
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn go(
        &mut self,
        depth: Option<Depth>,
        wtime: Option<u64>,
        btime: Option<u64>,
        winc: Option<u64>,
        binc: Option<u64>,
        movetime: Option<u64>,
        infinite: bool,
    ) -> anyhow::Result<()> {
        let max_depth = depth.unwrap_or(DEFAULT_DEPTH);

        let (remaining, increment) = match self.board.turn() {
            Color::White => (wtime, winc),
            Color::Black => (btime, binc),
        };
        let time_limit = if infinite {
            Duration::MAX
        } else if let Some(movetime) = movetime {
            Duration::from_millis(movetime)
        } else if let Some(remaining) = remaining {
            let allocated = Duration::from_millis(remaining + increment.unwrap_or(0));
            self.time_manager.budget(allocated)
        } else {
            DEFAULT_MOVETIME
        };

        let (best, info) = self.search_position(max_depth, time_limit);
        if let Some(info) = info {
            writeln!(
                self.out,
                "info depth {} score cp {} nodes {} time {}",
                info.depth,
                info.score,
                info.nodes,
                info.elapsed.as_millis()
            )?;
        }
        match best {
            Some(mv) => {
                writeln!(self.out, "bestmove {mv}")?;
                self.board.move_piece(mv.from, mv.to);
                self.board.switch_turn();
            }
            None => writeln!(self.out, "bestmove 0000")?,
        }
        Ok(())
    }

    fn set_option(&mut self, name: &str, value: Option<&str>) -> anyhow::Result<()> {
        match (name, value) {
            ("AggressiveMode", Some(value)) => {
                self.time_manager.set_aggressive(value == "true");
            }
            ("Aspiration", Some(value)) => {
                self.searcher.set_aspiration(value == "true");
            }
            ("Strategy", Some(value)) => match Strategy::try_from(value) {
                Ok(strategy) => self.searcher.set_strategy(strategy),
                Err(error) => {
                    writeln!(self.out, "info string {error}")?;
                }
            },
            _ => {
                writeln!(self.out, "info string Unsupported option: {name}")?;
            }
        }
        Ok(())
    }
}
