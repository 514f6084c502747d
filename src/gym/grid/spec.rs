use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    error::{EnvError, GymResult},
    gym::Reward,
};

/// A cell coordinate `(row, col)` inside a grid of `rows × cols`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major index into a grid with `cols` columns.
    pub fn flat_index(&self, cols: usize) -> usize {
        self.row * cols + self.col
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A cell carrying a fixed reward distinct from the default step reward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub position: Position,
    pub reward: Reward,
}

/// Static geometry and reward configuration of a grid environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub rows: usize,
    pub cols: usize,
    pub start: Position,
    pub goal: Position,

    /// Reward for entering the goal cell.
    pub goal_reward: Reward,

    /// Reward for entering any cell that is neither the goal nor a hazard.
    pub step_reward: Reward,

    pub hazards: Vec<Hazard>,

    /// Upward displacement per column, applied to every move. Length must equal `cols`.
    pub wind: Option<Vec<usize>>,
}

impl GridSpec {
    /// Berry Patch: a `side_len × side_len` field with the berry in the far corner.
    ///
    /// Snakes sit at `(0,1)`, `(2,0)`, `(2,1)`, `(2,2)` and need `side_len >= 4`.
    pub fn berry_patch(side_len: usize, has_snakes: bool) -> Self {
        let corner = side_len.saturating_sub(1);
        let hazards = if has_snakes {
            [(0, 1), (2, 0), (2, 1), (2, 2)]
                .into_iter()
                .map(|cell| Hazard {
                    position: cell.into(),
                    reward: Reward(-10.0),
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            rows: side_len,
            cols: side_len,
            start: Position::new(0, 0),
            goal: Position::new(corner, corner),
            goal_reward: Reward(50.0),
            step_reward: Reward(-1.0),
            hazards,
            wind: None,
        }
    }

    /// Windy Gridworld: 7 × 10, start `(3,0)`, goal `(3,7)`, `-1` on every step.
    pub fn windy_gridworld() -> Self {
        Self {
            rows: 7,
            cols: 10,
            start: Position::new(3, 0),
            goal: Position::new(3, 7),
            goal_reward: Reward(-1.0),
            step_reward: Reward(-1.0),
            hazards: Vec::new(),
            wind: Some(vec![0, 0, 0, 1, 1, 1, 2, 2, 1, 0]),
        }
    }

    pub fn n_cells(&self) -> usize {
        self.rows * self.cols
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Wind strength of `col`, zero when the grid is calm.
    pub fn wind_at(&self, col: usize) -> usize {
        self.wind
            .as_ref()
            .and_then(|w| w.get(col).copied())
            .unwrap_or(0)
    }

    pub fn is_goal(&self, pos: Position) -> bool {
        pos == self.goal
    }

    pub fn validate(&self) -> GymResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(invalid(format!(
                "grid must have at least one cell, got {}x{}",
                self.rows, self.cols
            )));
        }

        for (label, pos) in [("start", self.start), ("goal", self.goal)] {
            if !self.contains(pos) {
                return Err(invalid(format!(
                    "{label} {pos} outside {}x{} grid",
                    self.rows, self.cols
                )));
            }
        }

        for hazard in &self.hazards {
            if !self.contains(hazard.position) {
                return Err(invalid(format!(
                    "hazard {} outside {}x{} grid",
                    hazard.position, self.rows, self.cols
                )));
            }
            if hazard.position == self.goal {
                return Err(invalid(format!("hazard {} overlaps the goal", hazard.position)));
            }
        }

        if let Some(dup) = self.hazards.iter().map(|h| h.position).duplicates().next() {
            return Err(invalid(format!("hazard {dup} listed twice")));
        }

        if let Some(wind) = &self.wind
            && wind.len() != self.cols
        {
            return Err(invalid(format!(
                "wind has {} entries for {} columns",
                wind.len(),
                self.cols
            )));
        }

        Ok(())
    }
}

fn invalid(msg: String) -> crate::error::GymError {
    EnvError::InvalidConfig(msg).into()
}
