use crate::cell::Cell;

/// A grid coordinate. `x` grows rightward, `y` grows upward (row 0 is the
/// bottom of the cave). Coordinates are signed so that neighbour arithmetic
/// never needs special casing: reads outside the grid yield `Wall`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub fn new(x: i32, y: i32) -> Pos {
        Pos { x, y }
    }

    pub fn moved(self, dx: i32, dy: i32) -> Pos {
        Pos {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn manhattan(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The four orthogonal neighbours.
    pub fn neighbours4(self) -> [Pos; 4] {
        [
            self.moved(-1, 0),
            self.moved(1, 0),
            self.moved(0, -1),
            self.moved(0, 1),
        ]
    }

    /// The eight surrounding cells.
    pub fn neighbours8(self) -> [Pos; 8] {
        [
            self.moved(-1, -1),
            self.moved(0, -1),
            self.moved(1, -1),
            self.moved(-1, 0),
            self.moved(1, 0),
            self.moved(-1, 1),
            self.moved(0, 1),
            self.moved(1, 1),
        ]
    }

    pub fn is_adjacent4(self, other: Pos) -> bool {
        self.manhattan(other) == 1
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A rectangular cave grid stored as a flat row-major buffer, bottom row
/// first. The flat layout keeps `Clone` a bulk copy, which matters because
/// the planner clones caves for every speculative target.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds a grid from rows ordered bottom to top. Rows must already be
    /// padded to a common width.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Grid {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.len() as i32);
        debug_assert!(rows.iter().all(|r| r.len() as i32 == width));
        Grid {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Flat index of an in-bounds position, usable as a compact set key.
    pub fn index_of(&self, p: Pos) -> Option<usize> {
        if p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height {
            Some((p.y * self.width + p.x) as usize)
        } else {
            None
        }
    }

    /// Reads a cell; anything outside the grid is solid wall.
    pub fn get(&self, p: Pos) -> Cell {
        match self.index_of(p) {
            Some(i) => self.cells[i],
            None => Cell::Wall,
        }
    }

    /// Writes a cell. Out-of-range writes are ignored.
    pub fn set(&mut self, p: Pos, c: Cell) {
        if let Some(i) = self.index_of(p) {
            self.cells[i] = c;
        }
    }

    /// All positions, bottom-to-top then left-to-right.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Pos { x, y }))
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                write!(f, "{}", self.get(Pos { x, y }))?;
            }
            if y > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
