//! Deterministic simulation of Lambda Lift mining caves.
//!
//! A [`Cave`] is the whole world at one discrete time step. Applying an
//! [`Action`] yields a fresh cave; the previous one is never mutated, which
//! lets a planner keep arbitrarily many speculative futures alive at once.

pub mod cave;
pub mod cell;
pub mod grid;
pub mod parsing;

pub use cave::{format_route, parse_route, Action, Beard, Cave, EndState, Jumps, Water};
pub use cell::Cell;
pub use grid::{Grid, Pos};
pub use parsing::MapError;
