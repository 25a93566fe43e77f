//! Map-file loading.
//!
//! A map file mixes grid lines (drawn from the cell alphabet, shorter lines
//! right-padded with empty cells) with metadata directives such as
//! `Water 1` or `Trampoline A targets 1`. Lines that are neither are
//! ignored. The topmost grid line of the file is the highest row of the
//! cave.

use crate::cave::{Beard, Cave, Jumps, Water};
use crate::cell::Cell;
use crate::grid::Grid;
use thiserror::Error;

/// A malformed map. Loading fails fast; everything that happens after a
/// successful load is expressed through the cave's end state instead.
#[derive(Copy, Clone, Debug, Error, Eq, PartialEq)]
pub enum MapError {
    #[error("the map contains no grid lines")]
    NoGridLines,
    #[error("the map contains no robot")]
    NoRobot,
    #[error("the map contains more than one robot")]
    MultipleRobots,
}

enum Directive {
    Water(u32),
    Flooding(u32),
    Waterproof(u32),
    Growth(u32),
    Razors(u32),
    Trampoline(u8, u8),
}

fn parse_directive(line: &str) -> Option<Directive> {
    let mut words = line.split_whitespace();
    let head = words.next()?;
    let directive = match head {
        "Water" | "Flooding" | "Waterproof" | "Growth" | "Razors" => {
            let n: u32 = words.next()?.parse().ok()?;
            match head {
                "Water" => Directive::Water(n),
                "Flooding" => Directive::Flooding(n),
                "Waterproof" => Directive::Waterproof(n),
                "Growth" => Directive::Growth(n),
                _ => Directive::Razors(n),
            }
        }
        "Trampoline" => {
            let pad = words.next()?;
            let letter = match pad.chars().next() {
                Some(c @ 'A'..='I') if pad.len() == 1 => c as u8 - b'A',
                _ => return None,
            };
            if words.next()? != "targets" {
                return None;
            }
            let target = words.next()?;
            let digit = match target.chars().next() {
                Some(c @ '1'..='9') if target.len() == 1 => c as u8 - b'0',
                _ => return None,
            };
            Directive::Trampoline(letter, digit)
        }
        _ => return None,
    };
    // trailing words disqualify the line
    if words.next().is_some() {
        return None;
    }
    Some(directive)
}

fn parse_grid_row(line: &str) -> Option<Vec<Cell>> {
    if line.is_empty() {
        return None;
    }
    line.chars().map(Cell::from_char).collect()
}

impl Cave {
    /// Parses a map file into the initial cave state.
    pub fn parse(text: &str) -> Result<Cave, MapError> {
        let mut rows: Vec<Vec<Cell>> = Vec::new();
        let mut water = Water::default();
        let mut beard = Beard::default();
        let mut jumps = Jumps::default();
        let mut razors = 0;

        for line in text.lines() {
            if let Some(directive) = parse_directive(line) {
                match directive {
                    Directive::Water(n) => water.level = n as i32 - 1,
                    Directive::Flooding(n) => water.flood_rate = n,
                    Directive::Waterproof(n) => water.waterproof = n,
                    Directive::Growth(n) => {
                        beard.growth = n;
                        beard.countdown = n.saturating_sub(1);
                    }
                    Directive::Razors(n) => razors = n,
                    Directive::Trampoline(letter, digit) => jumps.declare(letter, digit),
                }
            } else if let Some(row) = parse_grid_row(line) {
                rows.push(row);
            }
        }

        if rows.is_empty() {
            return Err(MapError::NoGridLines);
        }
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, Cell::Empty);
        }
        // the first line of the file is the top of the cave
        rows.reverse();
        let grid = Grid::from_rows(rows);

        let mut robot = None;
        let mut lift = None;
        let mut lift_open = false;
        let mut lambdas = Vec::new();
        let mut lambda_rocks = Vec::new();
        for pos in grid.positions() {
            match grid.get(pos) {
                Cell::Robot => {
                    if robot.replace(pos).is_some() {
                        return Err(MapError::MultipleRobots);
                    }
                }
                Cell::ClosedLift => lift = Some(pos),
                Cell::OpenLift => {
                    lift = Some(pos);
                    lift_open = true;
                }
                Cell::Lambda => lambdas.push(pos),
                Cell::LambdaRock => lambda_rocks.push(pos),
                Cell::Trampoline(letter) => jumps.place_pad(letter, pos),
                Cell::Target(digit) => jumps.place_landing(digit, pos),
                _ => {}
            }
        }
        let robot = robot.ok_or(MapError::NoRobot)?;

        Ok(Cave {
            grid,
            robot,
            lift,
            lift_open,
            lambdas,
            lambda_rocks,
            collected: 0,
            score: 0,
            end: None,
            water,
            beard,
            razors,
            rock_moved: false,
            jumps,
        })
    }
}
