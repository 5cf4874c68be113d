//! Compass directions used by the wall follower and the phase coordinator.
//!
//! The algorithm works on the index (0=NORTH, 1=EAST, 2=SOUTH, 3=WEST) so that
//! turning is modular arithmetic. The human-readable label is only for
//! renderers and never feeds back into control flow.

use serde::{Deserialize, Serialize};

use crate::Position;

// Row deltas: [NORTH, EAST, SOUTH, WEST] = [-1, 0, +1, 0]
const ROW_DELTAS: [isize; 4] = [-1, 0, 1, 0];
// Col deltas: [NORTH, EAST, SOUTH, WEST] = [0, +1, 0, -1]
const COL_DELTAS: [isize; 4] = [0, 1, 0, -1];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All four directions in index order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// Direction for an index, wrapping modulo 4.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    pub fn turn_right(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn turn_left(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    pub fn reverse(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// `(row_delta, col_delta)` of one step in this direction.
    pub fn delta(self) -> (isize, isize) {
        (ROW_DELTAS[self.index()], COL_DELTAS[self.index()])
    }

    /// The cell one step away, or `None` if that would underflow.
    ///
    /// Upper bounds are not checked here; the grid treats anything past its
    /// edge as wall.
    pub fn step_from(self, (row, col): Position) -> Option<Position> {
        let (dr, dc) = self.delta();
        let row = row.checked_add_signed(dr)?;
        let col = col.checked_add_signed(dc)?;
        Some((row, col))
    }

    /// Direction of a single orthogonal move from `from` to `to`.
    ///
    /// Column movement wins over row movement; `None` when the positions are equal.
    pub fn between(from: Position, to: Position) -> Option<Self> {
        let dc = to.1 as isize - from.1 as isize;
        let dr = to.0 as isize - from.0 as isize;

        if dc > 0 {
            Some(Direction::East)
        } else if dc < 0 {
            Some(Direction::West)
        } else if dr > 0 {
            Some(Direction::South)
        } else if dr < 0 {
            Some(Direction::North)
        } else {
            None
        }
    }

    /// Display label for renderers.
    pub fn label(self) -> &'static str {
        match self {
            Direction::North => "up",
            Direction::East => "right",
            Direction::South => "down",
            Direction::West => "left",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turns_cycle() {
        for dir in Direction::ALL {
            assert_eq!(dir.turn_right().turn_left(), dir);
            assert_eq!(dir.reverse().reverse(), dir);
            assert_eq!(dir.turn_right().turn_right(), dir.reverse());
        }
        assert_eq!(Direction::East.turn_right(), Direction::South);
        assert_eq!(Direction::North.turn_left(), Direction::West);
    }

    #[test]
    fn test_step_from() {
        assert_eq!(Direction::North.step_from((3, 3)), Some((2, 3)));
        assert_eq!(Direction::East.step_from((3, 3)), Some((3, 4)));
        assert_eq!(Direction::South.step_from((3, 3)), Some((4, 3)));
        assert_eq!(Direction::West.step_from((3, 3)), Some((3, 2)));
        assert_eq!(Direction::North.step_from((0, 3)), None);
        assert_eq!(Direction::West.step_from((3, 0)), None);
    }

    #[test]
    fn test_between() {
        assert_eq!(Direction::between((1, 1), (1, 2)), Some(Direction::East));
        assert_eq!(Direction::between((1, 1), (0, 1)), Some(Direction::North));
        assert_eq!(Direction::between((1, 1), (1, 1)), None);
    }

    #[test]
    fn test_labels() {
        let labels: Vec<&str> = Direction::ALL.iter().map(|d| d.label()).collect();
        assert_eq!(labels, ["up", "right", "down", "left"]);
    }
}
