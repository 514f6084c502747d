use std::collections::HashMap;

use crate::gym::{
    Reward,
    grid::spec::{GridSpec, Position},
};

/// Static cell -> reward lookup built once from a [`GridSpec`].
#[derive(Debug, Clone)]
pub struct RewardTable {
    default: Reward,
    cells: HashMap<Position, Reward>,
}

impl RewardTable {
    pub fn from_spec(spec: &GridSpec) -> Self {
        let mut cells: HashMap<Position, Reward> = spec
            .hazards
            .iter()
            .map(|h| (h.position, h.reward))
            .collect();
        cells.insert(spec.goal, spec.goal_reward);

        Self {
            default: spec.step_reward,
            cells,
        }
    }

    /// Reward for entering `pos`.
    pub fn reward(&self, pos: Position) -> Reward {
        self.cells.get(&pos).copied().unwrap_or(self.default)
    }
}
