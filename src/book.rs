//! Opening book: a position-keyed set of weighted candidate moves consulted
//! before any search is started.
//!
//! The on-disk format is line-oriented text, one position per line:
//!
//! ```text
//! <key>|<move> <move> ...|<weight> <weight> ...
//! ```
//!
//! Moves are in coordinate notation; the weight list is optional and padded
//! with ones when shorter than the move list. Keys are normalized to their
//! first four whitespace-separated fields so that full FEN lines and bare
//! position keys address the same entry.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use itertools::{EitherOrBoth, Itertools};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::chess::board::Board;
use crate::chess::core::Move;

#[derive(Clone, Debug)]
struct BookEntry {
    moves: Vec<Move>,
    weights: Vec<u32>,
}

/// Weighted opening repertoire with a seedable sampler, so games can be
/// replayed deterministically.
pub struct OpeningBook {
    entries: HashMap<String, BookEntry>,
    rng: StdRng,
}

impl Default for OpeningBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OpeningBook {
    /// An empty book drawing from an entropy-seeded generator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// An empty book with a fixed sampling seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            entries: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Reads a book file. A missing or unreadable file is an error here;
    /// callers that treat the book as optional degrade to an empty one.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("opening book not readable: {}", path.display()))?;
        let mut book = Self::new();
        book.extend_from_text(&text);
        Ok(book)
    }

    /// Parses book lines from text, skipping lines that do not conform.
    /// Entries with algebraic (non-coordinate) move syntax are rejected
    /// rather than guessed at.
    pub fn extend_from_text(&mut self, text: &str) {
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match parse_line(line) {
                Some((key, entry)) => {
                    let _ = self.entries.insert(key, entry);
                }
                None => tracing::warn!(line, "skipping malformed book line"),
            }
        }
    }

    /// Number of distinct positions in the book.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the book has an entry for this position.
    #[must_use]
    pub fn contains(&self, board: &Board) -> bool {
        self.entries.contains_key(&normalize_key(&board.to_key()))
    }

    /// All book moves for the position, in file order.
    #[must_use]
    pub fn moves(&self, board: &Board) -> &[Move] {
        self.entries
            .get(&normalize_key(&board.to_key()))
            .map_or(&[], |entry| entry.moves.as_slice())
    }

    /// Samples a move for the position from the weighted distribution, or
    /// `None` on a book miss.
    pub fn probe(&mut self, board: &Board) -> Option<Move> {
        let entry = self.entries.get(&normalize_key(&board.to_key()))?;
        let total: u32 = entry.weights.iter().sum();
        if total == 0 {
            return entry.moves.first().copied();
        }
        let mut draw = self.rng.gen_range(0..total);
        for (mv, weight) in entry.moves.iter().zip(&entry.weights) {
            if draw < *weight {
                return Some(*mv);
            }
            draw -= weight;
        }
        entry.moves.last().copied()
    }
}

/// First four whitespace-separated fields of a key, so `<layout> <turn> - -`
/// and full FEN address the same entry.
fn normalize_key(key: &str) -> String {
    key.split_whitespace().take(4).join(" ")
}

fn parse_line(line: &str) -> Option<(String, BookEntry)> {
    let mut fields = line.split('|');
    let key = normalize_key(fields.next()?);
    if key.is_empty() {
        return None;
    }

    let moves = fields
        .next()?
        .split_whitespace()
        .map(Move::from_uci)
        .collect::<anyhow::Result<Vec<_>>>()
        .ok()?;
    if moves.is_empty() {
        return None;
    }

    let raw_weights: Vec<u32> = match fields.next() {
        Some(weights) => weights
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<_, _>>()
            .ok()?,
        None => Vec::new(),
    };
    // Pad missing weights with 1, drop extras.
    let weights = moves
        .iter()
        .zip_longest(raw_weights)
        .filter_map(|pair| match pair {
            EitherOrBoth::Both(_, weight) => Some(weight),
            EitherOrBoth::Left(_) => Some(1),
            EitherOrBoth::Right(_) => None,
        })
        .collect();

    Some((key, BookEntry { moves, weights }))
}
