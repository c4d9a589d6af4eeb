//! Stone group discovery and liberty counting.

use std::collections::VecDeque;

use crate::board::{Board, Point, PointSet, neighbors};

/// A maximal 4-connected set of same-colored stones and its liberties.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Group {
    pub stones: PointSet,
    /// Distinct empty cells adjacent to any member.
    pub liberties: usize,
}

impl Group {
    pub fn is_empty(&self) -> bool {
        self.stones.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stones.len()
    }
}

/// Flood-fill the group containing `start`.
///
/// An empty seed yields an empty group with zero liberties. Liberties shared
/// by several members are counted once.
pub fn find_group(board: &Board, start: Point) -> Group {
    let Some(color) = board.get(start) else {
        return Group::default();
    };

    let mut stones = PointSet::new();
    let mut liberties = PointSet::new();
    let mut queue = VecDeque::from([start]);
    stones.insert(start);

    while let Some(pt) = queue.pop_front() {
        for n in neighbors(pt) {
            match board.get(n) {
                None => {
                    liberties.insert(n);
                }
                Some(c) if c == color => {
                    if stones.insert(n) {
                        queue.push_back(n);
                    }
                }
                Some(_) => {}
            }
        }
    }

    Group {
        stones,
        liberties: liberties.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Color, index};
    use crate::constants::CELLS;

    fn board(diagram: &str) -> Board {
        diagram.parse().unwrap()
    }

    #[test]
    fn test_empty_cell_is_sentinel() {
        let b = Board::new();
        for pt in 0..CELLS {
            let g = find_group(&b, pt);
            assert!(g.is_empty());
            assert_eq!(g.liberties, 0);
        }
    }

    #[test]
    fn test_single_stone_liberties() {
        let mut b = Board::new();
        b.set(index(4, 4), Some(Color::Black));
        b.set(index(0, 0), Some(Color::White));
        b.set(index(0, 4), Some(Color::White));

        assert_eq!(find_group(&b, index(4, 4)).liberties, 4);
        assert_eq!(find_group(&b, index(0, 0)).liberties, 2);
        assert_eq!(find_group(&b, index(0, 4)).liberties, 3);
    }

    #[test]
    fn test_shared_liberties_not_double_counted() {
        // An L-shaped group: (3,3) (3,4) (4,4). The cell (4,3) touches both
        // (3,3) and (4,4) but is one liberty.
        let b = board(
            "
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . X X . . . .
            . . . . X . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            ",
        );
        let g = find_group(&b, index(3, 3));
        assert_eq!(g.len(), 3);
        assert_eq!(g.liberties, 7);
        assert!(g.stones.contains(index(4, 4)));
    }

    #[test]
    fn test_group_stops_at_other_color() {
        let b = board(
            "
            X X O . . . . . .
            O O . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            ",
        );
        let black = find_group(&b, index(0, 0));
        assert_eq!(black.len(), 2);
        assert_eq!(black.liberties, 0);

        let white = find_group(&b, index(1, 0));
        assert_eq!(white.len(), 2);
        assert_eq!(white.liberties, 3);
    }

    #[test]
    fn test_seed_order_does_not_matter() {
        let b = board(
            "
            . . . . . . . . .
            . O O O . . . . .
            . O . O . . . . .
            . O O O . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            ",
        );
        let a = find_group(&b, index(1, 1));
        let z = find_group(&b, index(3, 3));
        assert_eq!(a, z);
        assert_eq!(a.len(), 8);
        // 12 outside liberties plus the enclosed center point
        assert_eq!(a.liberties, 13);
    }
}
