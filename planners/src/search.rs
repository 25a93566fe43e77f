//! Grid routing for the planner.
//!
//! Routing is plain A* over grid cells with a move-cost function that
//! mirrors what the robot may legally do: walk into occupiable cells, shave
//! through beards when a razor is carried, push rocks at a premium. Costs
//! reflect the cave the route is computed in; the planner replans when the
//! world diverges while the route is walked.

use lift_sim::{Cave, Cell, Pos};
use pathfinding::directed::astar::astar;
use smallvec::SmallVec;

use crate::params::{LIFT_BLOCK_COST, ROCK_PUSH_COST};

/// Cost of moving the robot from `from` onto the adjacent cell `to`, or
/// `None` when the move is impossible.
pub fn step_cost(cave: &Cave, from: Pos, to: Pos) -> Option<u32> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    debug_assert_eq!(dx.abs() + dy.abs(), 1);
    // stepping down from under a rock frees it to fall on the robot's head
    if dy < 0 && cave.at(from.moved(0, 1)).is_rock() {
        return None;
    }
    match cave.at(to) {
        Cell::Empty | Cell::Dirt | Cell::Lambda | Cell::Razor | Cell::OpenLift => Some(1),
        Cell::Trampoline(_) => Some(1),
        Cell::Beard if cave.razors() > 0 => Some(2), // shave, then walk in
        c if c.is_rock() && dy == 0 => {
            let dest = to.moved(dx, 0);
            if cave.at(dest) != Cell::Empty {
                return None;
            }
            if cave.lift_pos().is_some_and(|lift| dest.is_adjacent4(lift)) {
                Some(LIFT_BLOCK_COST.get())
            } else {
                Some(ROCK_PUSH_COST.get())
            }
        }
        _ => None,
    }
}

fn successors(cave: &Cave, p: Pos) -> SmallVec<[(Pos, u32); 4]> {
    p.neighbours4()
        .into_iter()
        .filter_map(|n| step_cost(cave, p, n).map(|cost| (n, cost)))
        .collect()
}

/// A* route from `start` to `goal`: the full cell sequence including both
/// endpoints, together with its cost. `None` when the goal is unreachable.
pub fn find_path(cave: &Cave, start: Pos, goal: Pos) -> Option<(Vec<Pos>, u32)> {
    astar(
        &start,
        |&p| successors(cave, p),
        |p| p.manhattan(goal),
        |&p| p == goal,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lift_sim::Cave;

    fn cave(map: &str) -> Cave {
        Cave::parse(map).unwrap()
    }

    #[test]
    fn routes_through_a_corridor() {
        let c = cave("######\n#R..\\#\n######");
        let (path, cost) = find_path(&c, c.robot_pos(), Pos::new(4, 1)).unwrap();
        assert_eq!(cost, 3);
        assert_eq!(path.first(), Some(&Pos::new(1, 1)));
        assert_eq!(path.last(), Some(&Pos::new(4, 1)));
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn walls_are_impassable() {
        let c = cave("#####\n#R#\\#\n#####");
        assert!(find_path(&c, c.robot_pos(), Pos::new(3, 1)).is_none());
    }

    #[test]
    fn descending_from_under_a_rock_is_refused() {
        let c = cave("#####\n#.*.#\n#.R.#\n#. .#\n#####");
        assert_eq!(step_cost(&c, c.robot_pos(), Pos::new(2, 1)), None);
        // sideways is fine
        assert_eq!(step_cost(&c, c.robot_pos(), Pos::new(1, 2)), Some(1));
    }

    #[test]
    fn pushing_a_rock_costs_more() {
        let c = cave("######\n#R*  #\n######");
        assert_eq!(step_cost(&c, c.robot_pos(), Pos::new(2, 1)), Some(3));
        // no room behind the rock
        let c = cave("######\n#R*# #\n######");
        assert_eq!(step_cost(&c, c.robot_pos(), Pos::new(2, 1)), None);
    }

    #[test]
    fn pushing_next_to_the_lift_is_penalised() {
        let c = cave("######\n#R* L#\n######");
        // the rock would land at (3, 1), adjacent to the lift at (4, 1)
        assert_eq!(step_cost(&c, c.robot_pos(), Pos::new(2, 1)), Some(1000));
    }

    #[test]
    fn beards_cost_a_shave_when_a_razor_is_carried() {
        let c = cave("#####\n#RW.#\n#####\nRazors 1");
        assert_eq!(step_cost(&c, c.robot_pos(), Pos::new(2, 1)), Some(2));
        let bare = cave("#####\n#RW.#\n#####");
        assert_eq!(step_cost(&bare, bare.robot_pos(), Pos::new(2, 1)), None);
    }
}
