//! Solver for Syncomania-style puzzles: actors move in lockstep, contra-actors mirror them,
//! and every actor has to leave through the single exit.

pub mod board;
pub mod game;
pub mod hash;
pub mod levels;
pub mod pqueue;
pub mod solver;
