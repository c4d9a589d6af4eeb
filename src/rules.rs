//! Capture resolution, legality checking, and move enumeration.
//!
//! Every check here simulates on a private copy of the board; the caller's
//! board is only mutated by [`apply_move`].

use thiserror::Error;

use crate::board::{Board, Color, Move, Point, PointSet, neighbors};
use crate::constants::CELLS;
use crate::group::find_group;

/// Reason a placement was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("point ({row}, {col}) is off the board")]
    OutOfBounds { row: i32, col: i32 },

    #[error("point is not empty")]
    Occupied,

    #[error("suicide")]
    Suicide,

    #[error("retakes ko")]
    Ko,
}

/// Cumulative prisoners, tracked by the color of the stones removed.
///
/// Counts only ever grow. The value is `Copy` so each search branch
/// naturally carries its own tally.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Captures {
    black_lost: u32,
    white_lost: u32,
}

impl Captures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally with `black_lost` black stones and `white_lost` white stones removed.
    pub fn from_lost(black_lost: u32, white_lost: u32) -> Self {
        Self {
            black_lost,
            white_lost,
        }
    }

    /// Stones of `color` removed from the board so far.
    pub fn lost(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.black_lost,
            Color::White => self.white_lost,
        }
    }

    /// Enemy stones removed by `color` so far.
    pub fn by(&self, color: Color) -> u32 {
        self.lost(color.opponent())
    }

    /// Credit `capturer` with `count` enemy stones. Saturates at `u32::MAX`.
    pub fn credit(&mut self, capturer: Color, count: u32) {
        let tally = match capturer {
            Color::Black => &mut self.white_lost,
            Color::White => &mut self.black_lost,
        };
        *tally = tally.saturating_add(count);
    }
}

/// Remove every opponent group left without liberties after `just_played`
/// placed a stone. Returns the number of stones removed.
///
/// Scans the whole board rather than only the neighbors of the last move.
pub fn remove_captured(board: &mut Board, just_played: Color) -> u32 {
    let opponent = just_played.opponent();
    let mut checked = PointSet::new();
    let mut dead = PointSet::new();

    for pt in 0..CELLS {
        if board.get(pt) != Some(opponent) || checked.contains(pt) {
            continue;
        }
        let group = find_group(board, pt);
        checked.union(&group.stones);
        if group.liberties == 0 {
            dead.union(&group.stones);
        }
    }

    for pt in dead.iter() {
        board.set(pt, None);
    }
    dead.len() as u32
}

/// Outcome of a simulated placement.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub board: Board,
    pub captured: u32,
}

/// Simulate `color` playing `mv` and report the resulting position, or why
/// the move is illegal. A pass always succeeds and leaves the board as is.
///
/// `last` is the position to compare against for ko; `None` disables the
/// ko check.
pub fn try_play(
    board: &Board,
    mv: Move,
    color: Color,
    last: Option<&Board>,
) -> Result<Placement, MoveError> {
    let (row, col) = match mv {
        Move::Pass => {
            return Ok(Placement {
                board: *board,
                captured: 0,
            });
        }
        Move::Place { row, col } => (row, col),
    };
    let pt = mv.point().ok_or(MoveError::OutOfBounds { row, col })?;
    if board.get(pt).is_some() {
        return Err(MoveError::Occupied);
    }

    let mut sim = *board;
    let captured = place(&mut sim, pt, color);

    if find_group(&sim, pt).liberties == 0 {
        return Err(MoveError::Suicide);
    }
    if last.is_some_and(|prev| *prev == sim) {
        return Err(MoveError::Ko);
    }

    Ok(Placement {
        board: sim,
        captured,
    })
}

/// Like [`try_play`], discarding the resulting position.
pub fn check_move(
    board: &Board,
    mv: Move,
    color: Color,
    last: Option<&Board>,
) -> Result<(), MoveError> {
    try_play(board, mv, color, last).map(|_| ())
}

pub fn is_legal(board: &Board, mv: Move, color: Color, last: Option<&Board>) -> bool {
    check_move(board, mv, color, last).is_ok()
}

/// Place a stone and resolve captures, crediting them to `color`.
///
/// No legality check is done; the caller has already vetted the move.
/// Off-board placements and passes leave the board untouched.
pub fn apply_move(board: &mut Board, captures: &mut Captures, mv: Move, color: Color) -> u32 {
    let Some(pt) = mv.point() else {
        return 0;
    };
    let captured = place(board, pt, color);
    captures.credit(color, captured);
    captured
}

fn place(board: &mut Board, pt: Point, color: Color) -> u32 {
    board.set(pt, Some(color));
    remove_captured(board, color)
}

/// Candidate moves for `color`, pass always last.
///
/// On an empty board every point is a candidate. Otherwise only empty points
/// touching a stone are considered, and only the legal ones are kept.
/// Candidates are produced in ascending board index order.
pub fn generate_moves(board: &Board, color: Color, last: Option<&Board>) -> Vec<Move> {
    if board.is_empty() {
        let mut moves: Vec<Move> = (0..CELLS).map(Move::at).collect();
        moves.push(Move::Pass);
        return moves;
    }

    let mut candidates = PointSet::new();
    for pt in (0..CELLS).filter(|&pt| board.get(pt).is_some()) {
        for n in neighbors(pt) {
            if board.get(n).is_none() {
                candidates.insert(n);
            }
        }
    }

    let mut moves: Vec<Move> = candidates
        .iter()
        .map(Move::at)
        .filter(|&mv| is_legal(board, mv, color, last))
        .collect();
    moves.push(Move::Pass);
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::index;

    fn board(diagram: &str) -> Board {
        diagram.parse().unwrap()
    }

    fn place_at(row: i32, col: i32) -> Move {
        Move::Place { row, col }
    }

    #[test]
    fn test_captures_tally() {
        let mut caps = Captures::new();
        caps.credit(Color::Black, 2);
        caps.credit(Color::White, 1);
        caps.credit(Color::Black, 1);
        assert_eq!(caps.by(Color::Black), 3);
        assert_eq!(caps.lost(Color::White), 3);
        assert_eq!(caps.by(Color::White), 1);
        assert_eq!(caps, Captures::from_lost(1, 3));
    }

    #[test]
    fn test_captures_tally_saturates() {
        let mut caps = Captures::from_lost(u32::MAX - 1, u32::MAX);
        caps.credit(Color::White, 5);
        caps.credit(Color::Black, 1);
        assert_eq!(caps.lost(Color::Black), u32::MAX);
        assert_eq!(caps.lost(Color::White), u32::MAX);
    }

    #[test]
    fn test_remove_captured_single_stone() {
        let mut b = board(
            "
            . . . . . . . . .
            . . . X . . . . .
            . . X O X . . . .
            . . . X . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            ",
        );
        assert_eq!(remove_captured(&mut b, Color::Black), 1);
        assert_eq!(b.get(index(2, 3)), None);
        assert_eq!(b.count(Color::Black), 4);
    }

    #[test]
    fn test_remove_captured_keeps_group_with_liberty() {
        let mut b = board(
            "
            . . . . . . . . .
            . . . X . . . . .
            . . X O . . . . .
            . . . X . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            ",
        );
        let before = b;
        assert_eq!(remove_captured(&mut b, Color::Black), 0);
        assert_eq!(b, before);
    }

    #[test]
    fn test_remove_captured_ignores_own_color() {
        // The black corner stone has no liberties, but only white groups are
        // candidates when black has just played.
        let mut b = board(
            "
            X O . . . . . . .
            O . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            ",
        );
        assert_eq!(remove_captured(&mut b, Color::Black), 0);
        assert_eq!(b.get(index(0, 0)), Some(Color::Black));

        assert_eq!(remove_captured(&mut b, Color::White), 1);
        assert_eq!(b.get(index(0, 0)), None);
    }

    #[test]
    fn test_remove_captured_multiple_groups() {
        let mut b = board(
            "
            O X . . . . . X O
            X . . . . . . . X
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            ",
        );
        assert_eq!(remove_captured(&mut b, Color::Black), 2);
        assert_eq!(b.count(Color::White), 0);
    }

    #[test]
    fn test_pass_always_legal() {
        let full = board(&"X".repeat(CELLS));
        assert!(is_legal(&full, Move::Pass, Color::White, Some(&full)));
        assert!(is_legal(&Board::new(), Move::Pass, Color::Black, None));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let b = Board::new();
        assert_eq!(
            check_move(&b, place_at(9, 0), Color::Black, None),
            Err(MoveError::OutOfBounds { row: 9, col: 0 })
        );
        assert!(!is_legal(&b, place_at(0, -1), Color::Black, None));
        assert!(!is_legal(&b, place_at(-1, 3), Color::Black, None));
    }

    #[test]
    fn test_occupied_rejected() {
        let mut b = Board::new();
        b.set(index(4, 4), Some(Color::White));
        assert_eq!(
            check_move(&b, place_at(4, 4), Color::Black, None),
            Err(MoveError::Occupied)
        );
    }

    #[test]
    fn test_suicide_rejected() {
        let b = board(
            "
            . X . . . . . . .
            X . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            ",
        );
        assert_eq!(
            check_move(&b, place_at(0, 0), Color::White, None),
            Err(MoveError::Suicide)
        );
        // Black filling its own eye still leaves the group liberties.
        assert!(is_legal(&b, place_at(0, 0), Color::Black, None));
    }

    #[test]
    fn test_capture_is_not_suicide() {
        // White at (0,0) has a single liberty at (0,1); black playing there
        // has no liberties of its own until the capture is resolved.
        let b = board(
            "
            O . O . . . . . .
            X O . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            ",
        );
        // (0,1) is surrounded by white (0,0), (0,2), (1,1)
        let played = try_play(&b, place_at(0, 1), Color::Black, None).unwrap();
        assert_eq!(played.captured, 1);
        assert_eq!(played.board.get(index(0, 0)), None);
        assert_eq!(played.board.get(index(0, 1)), Some(Color::Black));
    }

    #[test]
    fn test_legality_check_does_not_mutate() {
        let b = board(
            "
            . . . . . . . . .
            . . . X . . . . .
            . . X O X . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            ",
        );
        let before = b;
        assert!(is_legal(&b, place_at(3, 3), Color::Black, None));
        assert_eq!(b, before);
    }

    const KO_BEFORE: &str = "
        . X O . . . . . .
        X O . O . . . . .
        . X O . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
    ";

    #[test]
    fn test_ko_recapture_rejected() {
        // Black captures the white stone at (1,1) by playing (1,2).
        let before = board(KO_BEFORE);
        let taken = try_play(&before, place_at(1, 2), Color::Black, None).unwrap();
        assert_eq!(taken.captured, 1);

        // White retaking at (1,1) would recreate `before` exactly.
        assert_eq!(
            check_move(&taken.board, place_at(1, 1), Color::White, Some(&before)),
            Err(MoveError::Ko)
        );

        // Once the position has moved on, the same recapture is legal.
        let mut later = taken.board;
        later.set(index(6, 6), Some(Color::Black));
        let mut later_prev = taken.board;
        later_prev.set(index(7, 7), Some(Color::White));
        assert!(is_legal(&later, place_at(1, 1), Color::White, Some(&later_prev)));
    }

    #[test]
    fn test_apply_move_credits_captures() {
        let mut b = board(KO_BEFORE);
        let mut caps = Captures::new();
        let n = apply_move(&mut b, &mut caps, place_at(1, 2), Color::Black);
        assert_eq!(n, 1);
        assert_eq!(caps.by(Color::Black), 1);
        assert_eq!(caps.lost(Color::White), 1);
        assert_eq!(b.get(index(1, 1)), None);

        let before = b;
        assert_eq!(apply_move(&mut b, &mut caps, Move::Pass, Color::White), 0);
        assert_eq!(b, before);
    }

    #[test]
    fn test_generate_moves_empty_board() {
        let moves = generate_moves(&Board::new(), Color::White, None);
        assert_eq!(moves.len(), CELLS + 1);
        assert_eq!(moves.first(), Some(&place_at(0, 0)));
        assert_eq!(moves.last(), Some(&Move::Pass));
    }

    #[test]
    fn test_generate_moves_adjacent_only() {
        let mut b = Board::new();
        b.set(index(4, 4), Some(Color::Black));
        let moves = generate_moves(&b, Color::White, None);
        assert_eq!(
            moves,
            vec![
                place_at(3, 4),
                place_at(4, 3),
                place_at(4, 5),
                place_at(5, 4),
                Move::Pass
            ]
        );
    }

    #[test]
    fn test_generate_moves_filters_illegal() {
        let b = board(
            "
            . X . . . . . . .
            X . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            ",
        );
        let white = generate_moves(&b, Color::White, None);
        assert!(!white.contains(&place_at(0, 0)), "suicide must be filtered");
        let black = generate_moves(&b, Color::Black, None);
        assert!(black.contains(&place_at(0, 0)));
        assert_eq!(white.last(), Some(&Move::Pass));
    }
}
