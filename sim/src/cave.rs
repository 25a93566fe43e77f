use crate::cell::Cell;
use crate::grid::{Grid, Pos};

const SCORE_MOVE: i32 = -1;
const SCORE_LAMBDA: i32 = 25;
const SCORE_ABORT_PER_LAMBDA: i32 = 25;
const SCORE_WIN_PER_LAMBDA: i32 = 50;

/// A robot action. The seven actions form a closed set; `delta` gives the
/// attempted displacement (zero for `Wait`, `Shave` and `Abort`).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Wait,
    Shave,
    Abort,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::Wait,
        Action::Shave,
        Action::Abort,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
            Action::Up => (0, 1),
            Action::Down => (0, -1),
            Action::Wait | Action::Shave | Action::Abort => (0, 0),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Action::Left => 'L',
            Action::Right => 'R',
            Action::Up => 'U',
            Action::Down => 'D',
            Action::Wait => 'W',
            Action::Shave => 'S',
            Action::Abort => 'A',
        }
    }

    pub fn from_char(c: char) -> Option<Action> {
        Action::ALL.into_iter().find(|a| a.to_char() == c)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Renders a move sequence as the wire format printed on stdout.
pub fn format_route(route: &[Action]) -> String {
    route.iter().map(|a| a.to_char()).collect()
}

/// Parses a move string, or `None` if it contains a foreign character.
pub fn parse_route(s: &str) -> Option<Vec<Action>> {
    s.chars().map(Action::from_char).collect()
}

/// Terminal state of a cave. Once set it never changes and further `step`
/// calls return the cave unchanged.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EndState {
    Win,
    Lose,
    Abort,
}

/// Flooding state. Cells with `y <= level` are submerged.
#[derive(Copy, Clone, Debug)]
pub struct Water {
    /// y coordinate of the water surface.
    pub level: i32,
    /// Ticks between two rises of the level; 0 disables flooding.
    pub flood_rate: u32,
    /// Ticks since the last rise.
    pub flood_step: u32,
    /// How many consecutive submerged ticks the robot survives.
    pub waterproof: u32,
    /// Consecutive ticks the robot has already spent underwater.
    pub underwater: u32,
}

impl Default for Water {
    fn default() -> Water {
        Water {
            level: -1,
            flood_rate: 0,
            flood_step: 0,
            waterproof: 10,
            underwater: 0,
        }
    }
}

/// Beard growth state. A growth tick happens when `countdown` is zero at tick
/// entry; the countdown then resets to `growth - 1`.
#[derive(Copy, Clone, Debug)]
pub struct Beard {
    pub growth: u32,
    pub countdown: u32,
}

impl Default for Beard {
    fn default() -> Beard {
        Beard {
            growth: 25,
            countdown: 24,
        }
    }
}

/// Trampoline jump tables: letter -> target digit, letter -> pad position,
/// digit -> landing position. All constant after load, copied in bulk.
#[derive(Clone, Debug, Default)]
pub struct Jumps {
    to_target: [Option<u8>; 9],
    pads: [Option<Pos>; 9],
    landings: [Option<Pos>; 9],
}

impl Jumps {
    pub fn declare(&mut self, letter: u8, digit: u8) {
        debug_assert!(letter < 9 && (1..=9).contains(&digit));
        self.to_target[letter as usize] = Some(digit);
    }

    pub fn place_pad(&mut self, letter: u8, pos: Pos) {
        self.pads[letter as usize] = Some(pos);
    }

    pub fn place_landing(&mut self, digit: u8, pos: Pos) {
        self.landings[(digit - 1) as usize] = Some(pos);
    }

    pub fn target_of(&self, letter: u8) -> Option<u8> {
        self.to_target[letter as usize]
    }

    pub fn landing_of(&self, digit: u8) -> Option<Pos> {
        self.landings[(digit - 1) as usize]
    }

    /// Pad positions of every trampoline letter wired to the given target.
    pub fn pads_to(&self, digit: u8) -> impl Iterator<Item = Pos> + '_ {
        (0..9u8).filter_map(move |letter| match self.to_target[letter as usize] {
            Some(d) if d == digit => self.pads[letter as usize],
            _ => None,
        })
    }

    /// All fully wired jumps as (pad position, landing position) pairs.
    pub fn jumps(&self) -> impl Iterator<Item = (Pos, Pos)> + '_ {
        (0..9u8).filter_map(move |letter| {
            let digit = self.to_target[letter as usize]?;
            Some((self.pads[letter as usize]?, self.landing_of(digit)?))
        })
    }
}

/// The whole simulated world at one discrete time step.
///
/// `step` is the only mutator and it returns a fresh cave, leaving the
/// receiver untouched; the planner relies on this to explore hypothetical
/// futures on clones. The world update inside `step` uses snapshot
/// semantics: every rule reads the pre-update grid and writes into the next
/// one, so no rule observes the partial effects of another.
#[derive(Clone, Debug)]
pub struct Cave {
    pub(crate) grid: Grid,
    pub(crate) robot: Pos,
    pub(crate) lift: Option<Pos>,
    pub(crate) lift_open: bool,
    pub(crate) lambdas: Vec<Pos>,
    pub(crate) lambda_rocks: Vec<Pos>,
    pub(crate) collected: u32,
    pub(crate) score: i32,
    pub(crate) end: Option<EndState>,
    pub(crate) water: Water,
    pub(crate) beard: Beard,
    pub(crate) razors: u32,
    pub(crate) rock_moved: bool,
    pub(crate) jumps: Jumps,
}

impl Cave {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn at(&self, p: Pos) -> Cell {
        self.grid.get(p)
    }

    pub fn robot_pos(&self) -> Pos {
        self.robot
    }

    pub fn lift_pos(&self) -> Option<Pos> {
        self.lift
    }

    pub fn lift_open(&self) -> bool {
        self.lift_open
    }

    pub fn lambdas(&self) -> &[Pos] {
        &self.lambdas
    }

    pub fn lambda_rocks(&self) -> &[Pos] {
        &self.lambda_rocks
    }

    pub fn lambdas_collected(&self) -> u32 {
        self.collected
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn end_state(&self) -> Option<EndState> {
        self.end
    }

    pub fn is_terminal(&self) -> bool {
        self.end.is_some()
    }

    pub fn water(&self) -> Water {
        self.water
    }

    pub fn razors(&self) -> u32 {
        self.razors
    }

    /// True iff any rock (lambda-rocks included) moved during the last tick.
    pub fn rock_movement(&self) -> bool {
        self.rock_moved
    }

    pub fn jumps(&self) -> &Jumps {
        &self.jumps
    }

    /// Applies a robot action followed by one world-update tick and returns
    /// the resulting cave. A terminal cave is returned unchanged.
    pub fn step(&self, action: Action) -> Cave {
        if self.end.is_some() {
            return self.clone();
        }
        let mut next = self.clone();
        if action == Action::Abort {
            next.score += SCORE_ABORT_PER_LAMBDA * next.collected as i32;
            next.end = Some(EndState::Abort);
            return next;
        }
        next.score += SCORE_MOVE;
        next.rock_moved = false;

        let (dx, dy) = action.delta();
        let target = self.robot.moved(dx, dy);
        match self.grid.get(target) {
            Cell::Empty | Cell::Dirt => next.walk_to(target),
            Cell::Lambda => {
                next.walk_to(target);
                next.lambdas.retain(|&p| p != target);
                next.collected += 1;
                next.score += SCORE_LAMBDA;
                if next.lambdas.is_empty() && next.lambda_rocks.is_empty() {
                    next.lift_open = true;
                }
            }
            Cell::Razor => {
                next.walk_to(target);
                next.razors += 1;
            }
            Cell::OpenLift => {
                next.walk_to(target);
                next.score += SCORE_WIN_PER_LAMBDA * next.collected as i32;
                next.end = Some(EndState::Win);
                // winning short-circuits the world update
                return next;
            }
            c if c.is_rock() && dy == 0 && dx != 0 => {
                let dest = target.moved(dx, 0);
                if self.grid.get(dest) == Cell::Empty {
                    next.grid.set(dest, c);
                    if c == Cell::LambdaRock {
                        relocate(&mut next.lambda_rocks, target, dest);
                    }
                    next.walk_to(target);
                }
            }
            Cell::Trampoline(letter) => next.jump(target, letter),
            // wall, closed lift, beard, bare target digit, unpushable rock:
            // the robot stays put but the move is still consumed
            _ => {}
        }

        if action == Action::Shave && next.razors > 0 {
            next.razors -= 1;
            for n in next.robot.neighbours8() {
                if next.grid.get(n) == Cell::Beard {
                    next.grid.set(n, Cell::Empty);
                }
            }
        }

        next.update()
    }

    fn walk_to(&mut self, to: Pos) {
        self.grid.set(self.robot, Cell::Empty);
        self.grid.set(to, Cell::Robot);
        self.robot = to;
    }

    /// Teleports through a trampoline pad. Every pad wired to the same
    /// target is consumed by the jump.
    fn jump(&mut self, pad: Pos, letter: u8) {
        let Some(digit) = self.jumps.target_of(letter) else {
            return; // unwired pad behaves like a wall
        };
        let Some(landing) = self.jumps.landing_of(digit) else {
            return;
        };
        self.grid.set(self.robot, Cell::Empty);
        for other_pad in self.jumps.pads_to(digit).collect::<Vec<_>>() {
            self.grid.set(other_pad, Cell::Empty);
        }
        debug_assert_eq!(self.grid.get(pad), Cell::Empty);
        self.grid.set(landing, Cell::Robot);
        self.robot = landing;
    }

    /// One world-update tick: water, beard countdown, then the cell pass
    /// over a frozen snapshot of the grid.
    fn update(mut self) -> Cave {
        // water runs before the cell pass
        if self.robot.y > self.water.level {
            self.water.underwater = 0;
        }
        if self.water.flood_rate > 0 {
            self.water.flood_step += 1;
            if self.water.flood_step >= self.water.flood_rate {
                self.water.flood_step = 0;
                self.water.level += 1;
            }
        }
        if self.robot.y <= self.water.level {
            self.water.underwater += 1;
            if self.water.underwater > self.water.waterproof {
                tracing::trace!(robot = %self.robot, "robot drowned");
                self.end = Some(EndState::Lose);
                return self;
            }
        }

        let growing = self.beard.countdown == 0;
        if growing {
            self.beard.countdown = self.beard.growth.saturating_sub(1);
        } else {
            self.beard.countdown -= 1;
        }

        let before = self.grid.clone();

        // Beards grow first so that a rock arriving in the same cell wins;
        // both passes read only the frozen snapshot, keeping the result
        // independent of the iteration order.
        if growing {
            for pos in before.positions() {
                if before.get(pos) == Cell::Beard {
                    for n in pos.neighbours8() {
                        if before.get(n) == Cell::Empty {
                            self.grid.set(n, Cell::Beard);
                        }
                    }
                }
            }
        }

        let mut crushed = false;
        for pos in before.positions() {
            match before.get(pos) {
                c if c.is_rock() => {
                    let Some(dest) = fall_destination(&before, pos) else {
                        continue;
                    };
                    self.grid.set(pos, Cell::Empty);
                    // a lambda-rock cracks open when it lands on something solid
                    let cracks =
                        c == Cell::LambdaRock && before.get(dest.moved(0, -1)) != Cell::Empty;
                    if cracks {
                        self.grid.set(dest, Cell::Lambda);
                        self.lambda_rocks.retain(|&p| p != pos);
                        self.lambdas.push(dest);
                    } else {
                        self.grid.set(dest, c);
                        if c == Cell::LambdaRock {
                            relocate(&mut self.lambda_rocks, pos, dest);
                        }
                    }
                    self.rock_moved = true;
                    if dest == self.robot.moved(0, 1) {
                        crushed = true;
                    }
                }
                Cell::ClosedLift if self.lift_open => {
                    self.grid.set(pos, Cell::OpenLift);
                }
                _ => {}
            }
        }

        if crushed {
            tracing::trace!(robot = %self.robot, "robot crushed by a falling rock");
            self.end = Some(EndState::Lose);
        }
        self
    }
}

impl std::fmt::Display for Cave {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.grid)
    }
}

fn relocate(set: &mut [Pos], from: Pos, to: Pos) {
    if let Some(slot) = set.iter_mut().find(|p| **p == from) {
        *slot = to;
    }
}

/// Where a rock at `p` moves this tick, or `None` if it rests. The first
/// matching rule wins: straight fall, slide right off a rock, slide left off
/// a rock, slide right off a lambda.
fn fall_destination(g: &Grid, p: Pos) -> Option<Pos> {
    let below = g.get(p.moved(0, -1));
    if below == Cell::Empty {
        return Some(p.moved(0, -1));
    }
    let right_free = g.get(p.moved(1, 0)) == Cell::Empty && g.get(p.moved(1, -1)) == Cell::Empty;
    if below.is_rock() && right_free {
        return Some(p.moved(1, -1));
    }
    let left_free = g.get(p.moved(-1, 0)) == Cell::Empty && g.get(p.moved(-1, -1)) == Cell::Empty;
    if below.is_rock() && left_free {
        return Some(p.moved(-1, -1));
    }
    if below == Cell::Lambda && right_free {
        return Some(p.moved(1, -1));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cave(map: &str) -> Cave {
        Cave::parse(map).unwrap()
    }

    fn run(map: &str, route: &str) -> Cave {
        let actions = parse_route(route).unwrap();
        actions
            .into_iter()
            .fold(cave(map), |c, a| c.step(a))
    }

    #[test]
    fn walking_eats_dirt_and_costs_one_point() {
        let c = cave("#####\n#R..#\n#####");
        let next = c.step(Action::Right);
        assert_eq!(next.robot_pos(), Pos::new(2, 1));
        assert_eq!(next.at(Pos::new(1, 1)), Cell::Empty);
        assert_eq!(next.at(Pos::new(2, 1)), Cell::Robot);
        assert_eq!(next.score(), c.score() - 1);
        assert!(next.end_state().is_none());
    }

    #[test]
    fn blocked_moves_are_still_consumed() {
        let c = cave("#####\n#R..#\n#####");
        let next = c.step(Action::Up);
        assert_eq!(next.robot_pos(), Pos::new(1, 1));
        assert_eq!(next.score(), -1);
    }

    #[test]
    fn wait_leaves_a_settled_cave_unchanged() {
        let c = cave("#####\n#R..#\n#.*.#\n#####");
        let next = c.step(Action::Wait);
        assert_eq!(next.to_string(), c.to_string());
        assert!(!next.rock_movement());
    }

    #[test]
    fn terminal_caves_absorb_moves() {
        let c = cave("#####\n#R..#\n#####").step(Action::Abort);
        assert_eq!(c.end_state(), Some(EndState::Abort));
        let again = c.step(Action::Right);
        assert_eq!(again.robot_pos(), c.robot_pos());
        assert_eq!(again.score(), c.score());
    }

    #[test]
    fn collecting_the_last_lambda_opens_the_lift() {
        let c = run("########\n#R.\\..L#\n########", "RR");
        assert_eq!(c.lambdas_collected(), 1);
        assert!(c.lambdas().is_empty());
        assert!(c.lift_open());
        assert_eq!(c.at(Pos::new(6, 1)), Cell::OpenLift);
        // two moves at -1 each plus one lambda
        assert_eq!(c.score(), 23);
    }

    #[test]
    fn entering_the_open_lift_wins() {
        let c = run("########\n#R.\\..L#\n########", "RRRRR");
        assert_eq!(c.end_state(), Some(EndState::Win));
        assert_eq!(c.robot_pos(), Pos::new(6, 1));
        // -5 moves, +25 lambda, +50 win bonus
        assert_eq!(c.score(), 70);
    }

    #[test]
    fn abort_banks_the_lambda_bonus() {
        let c = run("########\n#R.\\..L#\n########", "RR");
        let aborted = c.step(Action::Abort);
        assert_eq!(aborted.end_state(), Some(EndState::Abort));
        assert_eq!(aborted.score(), c.score() + 25 * c.lambdas_collected() as i32);
    }

    #[test]
    fn closed_lift_blocks_the_robot() {
        let c = run("#####\n#R\\L#\n#####", "R");
        // the lambda is collected, the lift opens during the same tick
        assert!(c.lift_open());
        let blocked = cave("#####\n#RL\\#\n#####").step(Action::Right);
        assert_eq!(blocked.robot_pos(), Pos::new(1, 1));
    }

    #[test]
    fn rocks_fall_straight_down() {
        let c = cave("#####\n#.*.#\n#   #\n#R..#\n#####").step(Action::Wait);
        assert_eq!(c.at(Pos::new(2, 3)), Cell::Empty);
        assert_eq!(c.at(Pos::new(2, 2)), Cell::Rock);
        assert!(c.rock_movement());
        // it now rests on the dirt below
        let c = c.step(Action::Wait);
        assert_eq!(c.at(Pos::new(2, 2)), Cell::Rock);
        assert!(!c.rock_movement());
    }

    #[test]
    fn rock_on_rock_slides_right() {
        let c = cave("######\n#.*  #\n#.*  #\n#R...#\n######").step(Action::Wait);
        assert_eq!(c.at(Pos::new(2, 3)), Cell::Empty);
        assert_eq!(c.at(Pos::new(3, 2)), Cell::Rock);
        assert_eq!(c.at(Pos::new(2, 2)), Cell::Rock);
    }

    #[test]
    fn rock_on_rock_slides_left_when_right_is_blocked() {
        let c = cave("######\n# *#.#\n# *#.#\n#...R#\n######").step(Action::Wait);
        assert_eq!(c.at(Pos::new(2, 3)), Cell::Empty);
        assert_eq!(c.at(Pos::new(1, 2)), Cell::Rock);
    }

    #[test]
    fn rock_on_lambda_slides_right_only() {
        let c = cave("######\n#.*  #\n#.\\  #\n#R...#\n######").step(Action::Wait);
        assert_eq!(c.at(Pos::new(3, 2)), Cell::Rock);
        assert_eq!(c.at(Pos::new(2, 2)), Cell::Lambda);
        // blocked on the right, a rock on a lambda stays put
        let c = cave("######\n#.*#.#\n#.\\#.#\n#R...#\n######").step(Action::Wait);
        assert_eq!(c.at(Pos::new(2, 3)), Cell::Rock);
        assert!(!c.rock_movement());
    }

    #[test]
    fn pushing_a_rock_horizontally() {
        let c = cave("######\n#R*  #\n######").step(Action::Right);
        assert_eq!(c.robot_pos(), Pos::new(2, 1));
        assert_eq!(c.at(Pos::new(3, 1)), Cell::Rock);
        // no room behind the rock: the push fails, the move is consumed
        let c = cave("######\n#R*#.#\n######").step(Action::Right);
        assert_eq!(c.robot_pos(), Pos::new(1, 1));
        assert_eq!(c.at(Pos::new(2, 1)), Cell::Rock);
        assert_eq!(c.score(), -1);
    }

    #[test]
    fn rocks_cannot_be_pushed_vertically() {
        let c = cave("#####\n#.*.#\n#.R.#\n#####").step(Action::Up);
        assert_eq!(c.robot_pos(), Pos::new(2, 1));
        assert_eq!(c.at(Pos::new(2, 2)), Cell::Rock);
    }

    #[test]
    fn falling_rock_crushes_the_robot() {
        let c = cave("#####\n#.*.#\n#   #\n#.R.#\n#####").step(Action::Wait);
        assert_eq!(c.at(Pos::new(2, 2)), Cell::Rock);
        assert_eq!(c.end_state(), Some(EndState::Lose));
    }

    #[test]
    fn resting_rock_does_not_crush() {
        // the rock sits directly on the robot's head and never moved
        let c = cave("#####\n#.*.#\n#.R.#\n#####").step(Action::Wait);
        assert!(c.end_state().is_none());
    }

    #[test]
    fn lambda_rock_cracks_when_it_lands() {
        // pushing the lambda-rock over the ledge makes it fall one cell and
        // land on the wall below, cracking it open
        let c = cave("#####\n#R@ #\n#.  #\n#####").step(Action::Right);
        assert_eq!(c.robot_pos(), Pos::new(2, 2));
        assert_eq!(c.at(Pos::new(3, 1)), Cell::Lambda);
        assert!(c.lambda_rocks().is_empty());
        assert_eq!(c.lambdas(), &[Pos::new(3, 1)]);
        assert!(c.rock_movement());
    }

    #[test]
    fn lambda_rock_keeps_falling_without_cracking() {
        let c = cave("#####\n#.@.#\n#   #\n#   #\n#R..#\n#####").step(Action::Wait);
        // still mid-air: the cell below the destination was empty
        assert_eq!(c.at(Pos::new(2, 3)), Cell::LambdaRock);
        assert_eq!(c.lambda_rocks(), &[Pos::new(2, 3)]);
        let c = c.step(Action::Wait);
        assert_eq!(c.at(Pos::new(2, 2)), Cell::Lambda);
        assert!(c.lambda_rocks().is_empty());
    }

    #[test]
    fn collecting_all_lambdas_requires_lambda_rocks_gone() {
        let c = run("######\n#R\\@ #\n#... #\n######", "R");
        assert_eq!(c.lambdas_collected(), 1);
        assert!(!c.lift_open());
    }

    #[test]
    fn razor_pickup_and_shaving() {
        let c = run("#####\n#R!W#\n#####", "R");
        assert_eq!(c.razors(), 1);
        assert_eq!(c.robot_pos(), Pos::new(2, 1));
        let shaved = c.step(Action::Shave);
        assert_eq!(shaved.razors(), 0);
        assert_eq!(shaved.at(Pos::new(3, 1)), Cell::Empty);
    }

    #[test]
    fn shaving_without_a_razor_is_a_no_op() {
        let c = cave("#####\n#RW.#\n#####").step(Action::Shave);
        assert_eq!(c.razors(), 0);
        assert_eq!(c.at(Pos::new(2, 1)), Cell::Beard);
        assert_eq!(c.score(), -1);
    }

    #[test]
    fn beard_grows_on_the_growth_tick() {
        let map = "######\n#R.  #\n#  W #\n#    #\n######\nGrowth 2";
        let c = cave(map).step(Action::Wait);
        // first tick only counts down
        assert_eq!(c.at(Pos::new(2, 2)), Cell::Empty);
        let c = c.step(Action::Wait);
        // second tick grows into every empty neighbour
        assert_eq!(c.at(Pos::new(2, 2)), Cell::Beard);
        assert_eq!(c.at(Pos::new(4, 2)), Cell::Beard);
        assert_eq!(c.at(Pos::new(2, 1)), Cell::Beard);
        assert_eq!(c.at(Pos::new(3, 1)), Cell::Beard);
        assert_eq!(c.at(Pos::new(4, 1)), Cell::Beard);
        assert_eq!(c.at(Pos::new(3, 3)), Cell::Beard);
        assert_eq!(c.at(Pos::new(4, 3)), Cell::Beard);
        // dirt is not overgrown
        assert_eq!(c.at(Pos::new(2, 3)), Cell::Dirt);
    }

    #[test]
    fn flooding_rises_on_the_flood_rate_tick() {
        let map = "#####\n#R..#\n#...#\n#####\nWater 1\nFlooding 8";
        let mut c = cave(map);
        for _ in 0..7 {
            c = c.step(Action::Wait);
            assert_eq!(c.water().level, 0);
        }
        c = c.step(Action::Wait);
        assert_eq!(c.water().level, 1);
    }

    #[test]
    fn drowning_after_waterproof_runs_out() {
        let map = "#####\n#R..#\n#####\nWater 2\nWaterproof 5";
        let mut c = cave(map);
        for _ in 0..5 {
            c = c.step(Action::Wait);
            assert!(c.end_state().is_none());
        }
        c = c.step(Action::Wait);
        assert_eq!(c.end_state(), Some(EndState::Lose));
    }

    #[test]
    fn surfacing_resets_the_underwater_count() {
        let map = "#####\n#.. #\n#R..#\n#####\nWater 2\nWaterproof 2";
        let mut c = cave(map);
        c = c.step(Action::Wait);
        c = c.step(Action::Wait);
        assert_eq!(c.water().underwater, 2);
        // climb above the surface: the counter resets on the next tick
        c = c.step(Action::Up);
        assert_eq!(c.robot_pos(), Pos::new(1, 2));
        c = c.step(Action::Down);
        assert_eq!(c.water().underwater, 1);
        assert!(c.end_state().is_none());
    }

    #[test]
    fn trampoline_jump_consumes_every_pad_of_the_target() {
        let map = "#######\n#R.A..#\n#B...1#\n#######\nTrampoline A targets 1\nTrampoline B targets 1";
        let c = run(map, "RR");
        assert_eq!(c.robot_pos(), Pos::new(5, 1));
        assert_eq!(c.at(Pos::new(5, 1)), Cell::Robot);
        assert_eq!(c.at(Pos::new(3, 2)), Cell::Empty);
        assert_eq!(c.at(Pos::new(1, 1)), Cell::Empty);
    }

    #[test]
    fn bare_target_digits_block_the_robot() {
        let map = "#####\n#R1.#\n#####\nTrampoline A targets 1";
        let c = cave(map).step(Action::Right);
        assert_eq!(c.robot_pos(), Pos::new(1, 1));
    }

    #[test]
    fn wait_scoring_identity() {
        let c = cave("#####\n#R..#\n#####");
        assert_eq!(c.step(Action::Wait).score(), c.score() - 1);
    }
}
