//! Best-effort solving of Lambda Lift caves.
//!
//! The [`planner::Planner`] drives a [`lift_sim::Cave`] toward a terminal
//! state by chaining A* routes between greedily chosen targets; the
//! [`driver::Driver`] runs both lambda-ordering variants and keeps the
//! better route.

pub mod driver;
pub mod params;
pub mod planner;
pub mod search;
