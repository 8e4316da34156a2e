use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use sable::book::OpeningBook;
use sable::Engine;

/// Environment variable overriding the opening-book location.
const BOOK_PATH_VAR: &str = "SABLE_BOOK";
const DEFAULT_BOOK_PATH: &str = "data/opening_book.txt";

fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr so the protocol stream on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut input = std::io::stdin().lock();
    let mut out = std::io::stdout();
    let mut engine = Engine::new(&mut input, &mut out);

    let book_path = std::env::var(BOOK_PATH_VAR)
        .map_or_else(|_| PathBuf::from(DEFAULT_BOOK_PATH), PathBuf::from);
    match OpeningBook::load(&book_path) {
        Ok(book) => {
            tracing::info!(path = %book_path.display(), positions = book.len(), "opening book loaded");
            engine.set_book(book);
        }
        Err(error) => {
            // A missing book is not fatal; the engine just searches from move one.
            tracing::warn!(%error, "running without an opening book");
        }
    }

    engine.uci_loop()
}
