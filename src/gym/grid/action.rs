use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, FromRepr};

use crate::error::EnvError;

/// The four moves of every grid environment, in action-id order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    EnumCount,
    Display,
    FromRepr,
)]
#[strum(serialize_all = "UPPERCASE")]
#[repr(usize)]
pub enum GridAction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl GridAction {
    /// `(d_row, d_col)` of the move before wind and clamping.
    pub fn offset(self) -> (i64, i64) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    pub fn id(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for GridAction {
    type Error = EnvError;

    fn try_from(action: usize) -> Result<Self, Self::Error> {
        Self::from_repr(action).ok_or(EnvError::InvalidAction {
            action,
            n: Self::COUNT,
        })
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn ids_round_trip_and_out_of_range_fails() {
        for action in GridAction::iter() {
            assert_eq!(GridAction::try_from(action.id()).ok(), Some(action));
        }
        assert!(matches!(
            GridAction::try_from(4),
            Err(EnvError::InvalidAction { action: 4, n: 4 })
        ));
    }

    #[test]
    fn parses_canonical_names() {
        assert_eq!("RIGHT".parse::<GridAction>().ok(), Some(GridAction::Right));
        assert_eq!(GridAction::Up.to_string(), "UP");
    }
}
