//! Runs the planner variants and keeps the best route.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lift_sim::{Cave, EndState};
use tracing::info;

use crate::planner::{Planner, Strategy};

/// Outcome of a full solver run.
pub struct Solution {
    pub score: i32,
    pub route: String,
    pub end: Option<EndState>,
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let end = match self.end {
            Some(EndState::Win) => "WIN",
            Some(EndState::Lose) => "LOSE",
            Some(EndState::Abort) => "ABORT",
            None => "_",
        };
        write!(
            f,
            "[summary] score:{} end:{} moves:{}",
            self.score,
            end,
            self.route.len()
        )
    }
}

pub struct Driver {
    interrupted: Arc<AtomicBool>,
}

impl Driver {
    pub fn new(interrupted: Arc<AtomicBool>) -> Driver {
        Driver { interrupted }
    }

    /// Solves the cave with the `from_below` ordering first and the
    /// nearest-first ordering second, skipping the second run when the first
    /// one was interrupted. Returns the higher-scoring route.
    pub fn run(&self, cave: &Cave) -> Solution {
        let first = Planner::new(Strategy { from_below: true }, self.interrupted.clone())
            .solve(cave.clone());
        info!(from_below = true, score = first.score(), "strategy finished");

        let mut best = first;
        if !self.interrupted.load(Ordering::Relaxed) {
            let second = Planner::new(Strategy { from_below: false }, self.interrupted.clone())
                .solve(cave.clone());
            info!(from_below = false, score = second.score(), "strategy finished");
            if second.score() > best.score() {
                best = second;
            }
        }

        Solution {
            score: best.score(),
            route: best.route(),
            end: best.cave.end_state(),
        }
    }
}
