//! Global tuning knobs read from environment variables.
//!
//! These parameters steer planner heuristics that are not worth command-line
//! surface. Each one is read and parsed once, on first access; the default
//! applies when the variable is unset.

use std::str::FromStr;
use std::sync::OnceLock;

pub struct EnvParam<T> {
    cell: OnceLock<T>,
    var: &'static str,
    default: &'static str,
}

impl<T: FromStr + Copy> EnvParam<T> {
    pub const fn new(var: &'static str, default: &'static str) -> EnvParam<T> {
        EnvParam {
            cell: OnceLock::new(),
            var,
            default,
        }
    }

    /// The parameter value. A set-but-unparsable variable aborts loudly
    /// rather than being silently replaced by the default.
    pub fn get(&self) -> T {
        *self.cell.get_or_init(|| {
            let raw = std::env::var(self.var).unwrap_or_else(|_| self.default.to_string());
            match raw.parse() {
                Ok(value) => value,
                Err(_) => panic!("invalid value '{}' for parameter {}", raw, self.var),
            }
        })
    }
}

/// How many times the path to a single target may be rebuilt after the world
/// changed under the robot's feet.
pub static REPLAN_LIMIT: EnvParam<u32> = EnvParam::new("LIFTER_REPLAN_LIMIT", "10");

/// Routing cost of pushing a rock out of the way (a plain step costs 1).
pub static ROCK_PUSH_COST: EnvParam<u32> = EnvParam::new("LIFTER_ROCK_PUSH_COST", "3");

/// Routing cost of a push that would drop the rock right next to the lift.
pub static LIFT_BLOCK_COST: EnvParam<u32> = EnvParam::new("LIFTER_LIFT_BLOCK_COST", "1000");

/// Consecutive panic probes tolerated before the planner gives up.
pub static PANIC_LIMIT: EnvParam<u32> = EnvParam::new("LIFTER_PANIC_LIMIT", "8");
