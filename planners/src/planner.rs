//! Greedy target-directed planning.
//!
//! The planner runs a loop: build an ordered list of candidate targets,
//! attempt each one on a clone of the current cave, and commit the first
//! attempt that ends safely. An attempt walks an A* route move by move and
//! watches the cave react: any rock movement, or a robot that is no longer
//! where the route expects it, invalidates the route and triggers a bounded
//! replan. When every target fails, single-step panic probes try to shake
//! the situation loose before the planner gives up and aborts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use fixedbitset::FixedBitSet;
use itertools::Itertools;
use lift_sim::{format_route, Action, Cave, Cell, EndState, Pos};
use tracing::debug;

use crate::params::{PANIC_LIMIT, REPLAN_LIMIT};
use crate::search::{find_path, step_cost};

/// Planner variant selector. The driver runs one planner per variant and
/// keeps the better result.
#[derive(Copy, Clone, Debug, Default)]
pub struct Strategy {
    /// Collect low-lying lambdas first instead of nearest-first.
    pub from_below: bool,
}

/// What reaching a target's goal cell accomplishes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum TargetKind {
    /// Collect the lambda sitting on the goal.
    Lambda,
    /// Eat a removable cell so that a rock blocking a lambda can fall.
    Clear,
    /// Stand on the goal, then push the adjacent lambda-rock so it cracks.
    Push(Action),
    /// Wait one tick for a rockfall to settle.
    Settle,
    /// Enter the trampoline pad at the goal, landing at the given position.
    Jump(Pos),
    /// Enter the open lift.
    Lift,
}

#[derive(Copy, Clone, Debug)]
struct Target {
    kind: TargetKind,
    goal: Pos,
}

/// A finished planning run: the terminal cave and the moves that led to it.
pub struct Plan {
    pub cave: Cave,
    pub moves: Vec<Action>,
}

impl Plan {
    pub fn score(&self) -> i32 {
        self.cave.score()
    }

    pub fn route(&self) -> String {
        format_route(&self.moves)
    }
}

pub struct Planner {
    strategy: Strategy,
    interrupted: Arc<AtomicBool>,
}

impl Planner {
    pub fn new(strategy: Strategy, interrupted: Arc<AtomicBool>) -> Planner {
        Planner {
            strategy,
            interrupted,
        }
    }

    fn interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Relaxed)
    }

    /// Drives the cave to a terminal state. The returned plan never ends in
    /// a loss: attempts that would kill the robot are discarded, and when no
    /// progress is possible the planner aborts to bank the current score.
    pub fn solve(&self, initial: Cave) -> Plan {
        let mut cave = initial;
        let mut moves = Vec::new();
        let mut failed = FixedBitSet::with_capacity(cave.grid().cell_count());
        let mut panics = 0u32;
        while !cave.is_terminal() {
            if self.interrupted() {
                debug!("interrupted, committing a final abort");
                cave = cave.step(Action::Abort);
                moves.push(Action::Abort);
                break;
            }
            let targets = self.select_targets(&cave, &failed);
            if targets.is_empty() {
                debug!("no targets left, aborting");
                cave = cave.step(Action::Abort);
                moves.push(Action::Abort);
                break;
            }
            let mut progressed = false;
            for target in &targets {
                if let Some((next, segment)) = self.attempt(&cave, target) {
                    debug!(kind = ?target.kind, goal = %target.goal, len = segment.len(), "target reached");
                    cave = next;
                    moves.extend(segment);
                    failed.clear();
                    panics = 0;
                    progressed = true;
                    break;
                }
                if let Some(i) = cave.grid().index_of(target.goal) {
                    failed.insert(i);
                }
            }
            if progressed {
                continue;
            }
            panics += 1;
            if panics > PANIC_LIMIT.get() {
                debug!("stuck after {panics} panic probes, aborting");
                cave = cave.step(Action::Abort);
                moves.push(Action::Abort);
                break;
            }
            match self.panic_probe(&cave) {
                Some(action) => {
                    debug!(%action, "panic probe");
                    cave = cave.step(action);
                    moves.push(action);
                    failed.clear();
                }
                None => {
                    cave = cave.step(Action::Abort);
                    moves.push(Action::Abort);
                    break;
                }
            }
        }
        Plan { cave, moves }
    }

    /// Builds the ordered target list for the current cave. Earlier entries
    /// are attempted first.
    fn select_targets(&self, cave: &Cave, failed: &FixedBitSet) -> Vec<Target> {
        let grid = cave.grid();
        let robot = cave.robot_pos();
        let fresh = |p: Pos| grid.index_of(p).is_some_and(|i| !failed.contains(i));
        let lift_dist = |p: Pos| cave.lift_pos().map_or(0, |l| p.manhattan(l));
        let mut targets = Vec::new();

        // lambdas first, ordered by the strategy heuristic; lambdas without
        // a route sink to the back so they are only attempted (and marked
        // failed) when nothing better is left
        let mut lambdas: Vec<(Pos, Option<u32>)> = cave
            .lambdas()
            .iter()
            .copied()
            .filter(|&p| fresh(p))
            .map(|p| (p, find_path(cave, robot, p).map(|(_, cost)| cost)))
            .collect_vec();
        if self.strategy.from_below {
            lambdas.sort_by_key(|&(p, _)| (p.y, robot.manhattan(p), std::cmp::Reverse(lift_dist(p))));
        } else {
            lambdas.sort_by_key(|&(p, _)| {
                (robot.manhattan(p), (p.y - robot.y).abs(), std::cmp::Reverse(lift_dist(p)))
            });
        }
        lambdas.sort_by_key(|&(_, cost)| cost.is_none());
        targets.extend(lambdas.iter().map(|&(p, _)| Target {
            kind: TargetKind::Lambda,
            goal: p,
        }));

        // unreachable lambdas may be freed by letting a blocking rock fall
        for &(lambda, cost) in &lambdas {
            if cost.is_none() {
                if let Some(clear) = clearing_target(cave, lambda, &fresh) {
                    targets.push(clear);
                }
            }
        }

        // lambda-rocks: stand on a removable cell beside one and push it
        // into open space so it falls and cracks
        for &rock in cave.lambda_rocks() {
            for dx in [1, -1] {
                let stand = rock.moved(-dx, 0);
                let dest = rock.moved(dx, 0);
                if matches!(cave.at(stand), Cell::Dirt | Cell::Razor)
                    && cave.at(dest) == Cell::Empty
                    && fresh(stand)
                {
                    let push = if dx > 0 { Action::Right } else { Action::Left };
                    targets.push(Target {
                        kind: TargetKind::Push(push),
                        goal: stand,
                    });
                }
            }
        }

        // with no lambda-related work and rocks still in motion, let the
        // world settle before deciding anything else
        if targets.is_empty() && cave.rock_movement() {
            targets.push(Target {
                kind: TargetKind::Settle,
                goal: robot,
            });
        }

        // trampolines whose landing has a route to some lambda
        if !cave.lambdas().is_empty() {
            for (pad, landing) in cave.jumps().jumps() {
                if !fresh(pad) {
                    continue;
                }
                let worthwhile = cave
                    .lambdas()
                    .iter()
                    .any(|&l| find_path(cave, landing, l).is_some());
                if worthwhile {
                    targets.push(Target {
                        kind: TargetKind::Jump(landing),
                        goal: pad,
                    });
                }
            }
        }

        if cave.lift_open() {
            if let Some(lift) = cave.lift_pos() {
                if fresh(lift) {
                    targets.push(Target {
                        kind: TargetKind::Lift,
                        goal: lift,
                    });
                }
            }
        }

        targets
    }

    /// Tries to reach a target on a clone of `cave`. Returns the resulting
    /// cave and move segment on success, `None` when the target has to be
    /// given up (no route, replan limit exhausted, or the robot would die).
    fn attempt(&self, cave: &Cave, target: &Target) -> Option<(Cave, Vec<Action>)> {
        if target.kind == TargetKind::Settle {
            let next = cave.step(Action::Wait);
            if next.end_state() == Some(EndState::Lose) {
                return None;
            }
            return Some((next, vec![Action::Wait]));
        }

        let mut cur = cave.clone();
        let mut moves = Vec::new();
        let mut replans = 0;
        let (mut path, _) = find_path(&cur, cur.robot_pos(), target.goal)?;
        let mut next_i = 1;

        while !arrived(&cur, target) {
            if self.interrupted() {
                let aborted = cur.step(Action::Abort);
                moves.push(Action::Abort);
                return Some((aborted, moves));
            }
            let Some(&next_cell) = path.get(next_i) else {
                return None; // walked the whole route without arriving
            };
            let robot = cur.robot_pos();
            let action = if cur.at(next_cell) == Cell::Beard {
                Action::Shave
            } else {
                direction(robot, next_cell)
            };
            cur = cur.step(action);
            moves.push(action);
            match cur.end_state() {
                Some(EndState::Win) => return Some((cur, moves)),
                Some(_) => return None,
                None => {}
            }
            if arrived(&cur, target) {
                break;
            }
            if action == Action::Shave {
                if cur.at(next_cell) == Cell::Beard {
                    return None; // the shave did not clear the way
                }
                continue;
            }
            let on_route = cur.robot_pos() == next_cell;
            if on_route {
                next_i += 1;
            }
            if cur.rock_movement() || !on_route {
                replans += 1;
                if replans > REPLAN_LIMIT.get() {
                    return None;
                }
                let (p, _) = find_path(&cur, cur.robot_pos(), target.goal)?;
                debug!(goal = %target.goal, replans, "route invalidated, replanning");
                path = p;
                next_i = 1;
            }
        }

        // a push target still has to shove the lambda-rock once in position
        if let TargetKind::Push(push) = target.kind {
            cur = cur.step(push);
            moves.push(push);
            if cur.end_state() == Some(EndState::Lose) {
                return None;
            }
        }
        Some((cur, moves))
    }

    /// Probes the fixed action order and returns the first move that is
    /// legal and does not kill the robot.
    fn panic_probe(&self, cave: &Cave) -> Option<Action> {
        let robot = cave.robot_pos();
        let probes = [
            Action::Up,
            Action::Left,
            Action::Right,
            Action::Down,
            Action::Shave,
        ];
        for action in probes {
            let viable = match action {
                Action::Shave => {
                    cave.razors() > 0
                        && robot.neighbours8().iter().any(|&n| cave.at(n) == Cell::Beard)
                }
                _ => {
                    let (dx, dy) = action.delta();
                    step_cost(cave, robot, robot.moved(dx, dy)).is_some()
                }
            };
            if viable && cave.step(action).end_state() != Some(EndState::Lose) {
                return Some(action);
            }
        }
        None
    }
}

fn arrived(cave: &Cave, target: &Target) -> bool {
    match target.kind {
        TargetKind::Jump(landing) => cave.robot_pos() == landing,
        _ => cave.robot_pos() == target.goal,
    }
}

/// Picks a removable cell whose consumption lets a rock blocking `lambda`
/// move. Only the first candidate is proposed per lambda.
fn clearing_target(cave: &Cave, lambda: Pos, fresh: &impl Fn(Pos) -> bool) -> Option<Target> {
    for rock in lambda.neighbours4() {
        if !cave.at(rock).is_rock() {
            continue;
        }
        for cell in rock.neighbours4() {
            if cell == lambda {
                continue;
            }
            if matches!(cave.at(cell), Cell::Dirt | Cell::Lambda | Cell::Razor) && fresh(cell) {
                return Some(Target {
                    kind: TargetKind::Clear,
                    goal: cell,
                });
            }
        }
    }
    None
}

fn direction(from: Pos, to: Pos) -> Action {
    if to.x > from.x {
        Action::Right
    } else if to.x < from.x {
        Action::Left
    } else if to.y > from.y {
        Action::Up
    } else if to.y < from.y {
        Action::Down
    } else {
        Action::Wait
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planner(from_below: bool) -> Planner {
        Planner::new(
            Strategy { from_below },
            Arc::new(AtomicBool::new(false)),
        )
    }

    fn cave(map: &str) -> Cave {
        Cave::parse(map).unwrap()
    }

    #[test]
    fn derives_directions_between_cells() {
        let p = Pos::new(3, 3);
        assert_eq!(direction(p, Pos::new(4, 3)), Action::Right);
        assert_eq!(direction(p, Pos::new(2, 3)), Action::Left);
        assert_eq!(direction(p, Pos::new(3, 4)), Action::Up);
        assert_eq!(direction(p, Pos::new(3, 2)), Action::Down);
        assert_eq!(direction(p, p), Action::Wait);
    }

    #[test]
    fn wins_a_straight_corridor() {
        let plan = planner(true).solve(cave("########\n#R.\\..L#\n########"));
        assert_eq!(plan.cave.end_state(), Some(EndState::Win));
        assert_eq!(plan.route(), "RRRRR");
        assert_eq!(plan.score(), 70);
    }

    #[test]
    fn aborts_when_nothing_is_reachable() {
        let plan = planner(false).solve(cave("#####\n#R#\\#\n#####"));
        assert_eq!(plan.cave.end_state(), Some(EndState::Abort));
        assert_eq!(plan.route(), "A");
        assert_eq!(plan.score(), 0);
    }

    #[test]
    fn interrupt_commits_an_immediate_abort() {
        let flag = Arc::new(AtomicBool::new(true));
        let planner = Planner::new(Strategy::default(), flag);
        let plan = planner.solve(cave("########\n#R.\\..L#\n########"));
        assert_eq!(plan.cave.end_state(), Some(EndState::Abort));
        assert_eq!(plan.route(), "A");
    }

    #[test]
    fn from_below_prefers_the_lower_lambda() {
        // both lambdas are two moves away; only the from_below strategy is
        // guaranteed to take the bottom one first
        let c = cave("#####\n#.\\.#\n#R..#\n#.\\.#\n#####");
        let planner = planner(true);
        let targets = planner.select_targets(&c, &FixedBitSet::with_capacity(c.grid().cell_count()));
        assert_eq!(targets[0].goal, Pos::new(2, 1));
        assert_eq!(targets[0].kind, TargetKind::Lambda);
    }

    #[test]
    fn settling_is_proposed_while_rocks_move() {
        // no lambdas at all, but a rock is in flight after the first step
        let c = cave("#####\n#.*.#\n#   #\n#R..#\n#####").step(Action::Wait);
        assert!(c.rock_movement());
        let planner = planner(false);
        let targets = planner.select_targets(&c, &FixedBitSet::with_capacity(c.grid().cell_count()));
        assert_eq!(targets.first().map(|t| t.kind), Some(TargetKind::Settle));
    }

    #[test]
    fn open_lift_is_targeted_when_reachable() {
        let c = cave("#####\n#R.O#\n#####");
        let planner = planner(false);
        let targets = planner.select_targets(&c, &FixedBitSet::with_capacity(c.grid().cell_count()));
        assert_eq!(targets.last().map(|t| t.kind), Some(TargetKind::Lift));
        let plan = planner.solve(c);
        assert_eq!(plan.cave.end_state(), Some(EndState::Win));
        assert_eq!(plan.route(), "RR");
    }
}
