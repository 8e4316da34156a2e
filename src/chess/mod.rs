//! Implementation of the chess environment: board state, primitives and move
//! generation.

pub mod board;
pub mod core;
pub mod movegen;
