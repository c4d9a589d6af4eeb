//! Board model: a flat 9x9 array of cells plus coordinate helpers.
//!
//! Cells are addressed either by `(row, col)` or by a row-major index
//! `row * N + col`. All helpers here are pure.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{CELLS, CODE_BLACK, CODE_EMPTY, CODE_WHITE, DELTA, N, PASS_COORD};

/// A cell index into the flat board array.
pub type Point = usize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Wire code of this color (1 = black, 2 = white).
    pub fn code(self) -> u8 {
        match self {
            Color::Black => CODE_BLACK,
            Color::White => CODE_WHITE,
        }
    }

    pub fn from_code(code: u8) -> Option<Color> {
        match code {
            CODE_BLACK => Some(Color::Black),
            CODE_WHITE => Some(Color::White),
            _ => None,
        }
    }
}

/// Row-major index of `(row, col)`.
#[inline]
pub fn index(row: usize, col: usize) -> Point {
    row * N + col
}

/// Inverse of [`index`].
#[inline]
pub fn coords(idx: Point) -> (usize, usize) {
    (idx / N, idx % N)
}

/// Whether `(row, col)` lies on the board.
#[inline]
pub fn in_bounds(row: i32, col: i32) -> bool {
    (0..N as i32).contains(&row) && (0..N as i32).contains(&col)
}

/// The up to four orthogonal neighbors of a cell.
pub fn neighbors(idx: Point) -> impl Iterator<Item = Point> {
    let (row, col) = coords(idx);
    DELTA.iter().filter_map(move |&(dr, dc)| {
        let (r, c) = (row as i32 + dr, col as i32 + dc);
        in_bounds(r, c).then(|| index(r as usize, c as usize))
    })
}

/// A set of board points backed by a single 128-bit mask.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PointSet(u128);

impl PointSet {
    pub fn new() -> Self {
        Self(0)
    }

    /// Add a point, returning `true` if it was not already present.
    #[inline]
    pub fn insert(&mut self, pt: Point) -> bool {
        let bit = 1u128 << pt;
        let fresh = self.0 & bit == 0;
        self.0 |= bit;
        fresh
    }

    #[inline]
    pub fn contains(&self, pt: Point) -> bool {
        self.0 & (1u128 << pt) != 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn union(&mut self, other: &PointSet) {
        self.0 |= other.0;
    }

    /// Iterate over members in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let pt = bits.trailing_zeros() as Point;
            bits &= bits - 1;
            Some(pt)
        })
    }
}

/// A move: a stone placement at `(row, col)` or a pass.
///
/// Placement coordinates are kept signed so that off-board requests survive
/// decoding and are rejected by the legality check instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Move {
    Pass,
    Place { row: i32, col: i32 },
}

impl Move {
    /// Decode a wire `(row, col)` pair; `(-1, -1)` is a pass.
    pub fn from_wire(row: i32, col: i32) -> Move {
        if row == PASS_COORD && col == PASS_COORD {
            Move::Pass
        } else {
            Move::Place { row, col }
        }
    }

    /// Placement at a board index.
    pub fn at(idx: Point) -> Move {
        let (row, col) = coords(idx);
        Move::Place {
            row: row as i32,
            col: col as i32,
        }
    }

    pub fn to_wire(self) -> (i32, i32) {
        match self {
            Move::Pass => (PASS_COORD, PASS_COORD),
            Move::Place { row, col } => (row, col),
        }
    }

    /// Board index of a placement, if it is on the board.
    pub fn point(self) -> Option<Point> {
        match self {
            Move::Place { row, col } if in_bounds(row, col) => {
                Some(index(row as usize, col as usize))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Pass => f.write_str("pass"),
            Move::Place { row, col } => write!(f, "({row}, {col})"),
        }
    }
}

/// A 9x9 board. `None` is an empty cell.
///
/// Boards are small `Copy` values, so every simulation works on its own copy.
/// Equality is an element-wise comparison of the cell arrays, which is what
/// the ko check relies on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Color>; CELLS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [None; CELLS],
        }
    }

    pub fn from_cells(cells: [Option<Color>; CELLS]) -> Self {
        Self { cells }
    }

    #[inline]
    pub fn get(&self, idx: Point) -> Option<Color> {
        self.cells[idx]
    }

    #[inline]
    pub fn set(&mut self, idx: Point, cell: Option<Color>) {
        self.cells[idx] = cell;
    }

    /// Cell at `(row, col)`, or `None` when off the board.
    pub fn at(&self, row: i32, col: i32) -> Option<Color> {
        if !in_bounds(row, col) {
            return None;
        }
        self.cells[index(row as usize, col as usize)]
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    pub fn cells(&self) -> &[Option<Color>; CELLS] {
        &self.cells
    }

    /// Number of stones of `color` on the board.
    pub fn count(&self, color: Color) -> usize {
        self.cells.iter().filter(|&&c| c == Some(color)).count()
    }

    /// Wire encoding: 0 = empty, 1 = black, 2 = white, row-major.
    pub fn to_codes(&self) -> Vec<u8> {
        self.cells
            .iter()
            .map(|c| c.map_or(CODE_EMPTY, Color::code))
            .collect()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardParseError {
    #[error("expected {expected} cells, found {found}")]
    CellCount { expected: usize, found: usize },

    #[error("unexpected character '{0}'")]
    Character(char),
}

/// Parses a diagram of `X` (black), `O` (white), and `.` (empty).
/// Whitespace is ignored.
impl FromStr for Board {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = [None; CELLS];
        let mut found = 0;
        for ch in s.chars().filter(|c| !c.is_whitespace()) {
            let cell = match ch {
                'X' | 'x' => Some(Color::Black),
                'O' | 'o' => Some(Color::White),
                '.' | '+' => None,
                other => return Err(BoardParseError::Character(other)),
            };
            if found < CELLS {
                cells[found] = cell;
            }
            found += 1;
        }
        if found != CELLS {
            return Err(BoardParseError::CellCount {
                expected: CELLS,
                found,
            });
        }
        Ok(Self { cells })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..N {
            for col in 0..N {
                let ch = match self.cells[index(row, col)] {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
