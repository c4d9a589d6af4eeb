//! Static evaluation: territory flood-fill plus captures and komi.
//!
//! Scores are from White's point of view; White is the engine's side.

use std::collections::VecDeque;

use crate::board::{Board, Color, PointSet, neighbors};
use crate::constants::CELLS;
use crate::rules::Captures;

/// Per-color totals of territory, prisoners, and komi.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Score {
    pub black: f64,
    pub white: f64,
}

impl Score {
    /// `white - black`; positive favors White.
    pub fn margin(&self) -> f64 {
        self.white - self.black
    }
}

/// Count empty points enclosed by a single color as `(black, white)`.
///
/// Each maximal empty region is credited in full to the one color bordering
/// it. Regions touching both colors, or no stones at all, count for nobody.
pub fn territory(board: &Board) -> (u32, u32) {
    let mut black = 0;
    let mut white = 0;
    let mut visited = PointSet::new();

    for start in 0..CELLS {
        if board.get(start).is_some() || !visited.insert(start) {
            continue;
        }

        let mut size = 0;
        let mut touches_black = false;
        let mut touches_white = false;
        let mut queue = VecDeque::from([start]);

        while let Some(pt) = queue.pop_front() {
            size += 1;
            for n in neighbors(pt) {
                match board.get(n) {
                    None => {
                        if visited.insert(n) {
                            queue.push_back(n);
                        }
                    }
                    Some(Color::Black) => touches_black = true,
                    Some(Color::White) => touches_white = true,
                }
            }
        }

        match (touches_black, touches_white) {
            (true, false) => black += size,
            (false, true) => white += size,
            _ => {}
        }
    }

    (black, white)
}

/// Score both sides: territory plus enemy stones captured, komi to White.
pub fn score(board: &Board, captures: &Captures, komi: f64) -> Score {
    let (black_territory, white_territory) = territory(board);
    Score {
        black: f64::from(black_territory) + f64::from(captures.by(Color::Black)),
        white: f64::from(white_territory) + f64::from(captures.by(Color::White)) + komi,
    }
}

/// Signed evaluation, `white - black`.
pub fn evaluate(board: &Board, captures: &Captures, komi: f64) -> f64 {
    score(board, captures, komi).margin()
}
