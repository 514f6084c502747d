use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

use crate::{
    error::{EnvError, GymResult},
    gym::grid::spec::GridSpec,
};

// ================================================================================================
// Preset Environment Configurations
// ================================================================================================

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
    Display,
    EnumIter,
    IntoStaticStr,
    EnumCount,
)]
pub enum GridPreset {
    /// **Berry Patch**
    ///
    /// * **Grid:** 4 × 4, start `(0,0)`, berry `(3,3)` worth `+50`.
    /// * **Hazards:** snakes at `(0,1)`, `(2,0)`, `(2,1)`, `(2,2)` worth `-10`.
    /// * **Observation:** one-hot over the 16 cells.
    BerryPatch,

    /// **Berry Patch** without snakes.
    BerryPatchNoSnakes,

    /// **Windy Gridworld**
    ///
    /// * **Grid:** 7 × 10, start `(3,0)`, goal `(3,7)`.
    /// * **Wind:** `[0, 0, 0, 1, 1, 1, 2, 2, 1, 0]` per column.
    /// * **Reward:** `-1` on every step; reaching the goal only terminates.
    WindyGridworld,
}

impl From<GridPreset> for GridEnvConfig {
    fn from(preset: GridPreset) -> Self {
        let spec = match preset {
            GridPreset::BerryPatch => GridSpec::berry_patch(4, true),
            GridPreset::BerryPatchNoSnakes => GridSpec::berry_patch(4, false),
            GridPreset::WindyGridworld => GridSpec::windy_gridworld(),
        };
        GridEnvConfig::new(spec)
    }
}

/// Configuration blueprint for building a grid environment.
///
/// # Example
///
/// ```
/// # use mdpgym::prelude::*;
/// # fn example() -> GymResult<()> {
/// let cfg = GridEnvConfig::from(GridPreset::WindyGridworld)
///     .with_max_episode_steps(200)
///     .with_seed(7);
/// let mut env = WindyGridworldEnv::from_config(cfg)?;
/// let start = env.reset()?;
/// assert_eq!(start, Position::new(3, 0));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridEnvConfig {
    spec: GridSpec,

    /// Step cap after which a non-terminal episode is truncated. `None` runs until the goal.
    max_episode_steps: Option<u32>,

    /// Seed of the environment's random source. `None` draws one from entropy.
    seed: Option<u64>,
}

impl Default for GridEnvConfig {
    fn default() -> Self {
        GridPreset::BerryPatch.into()
    }
}

impl GridEnvConfig {
    pub fn new(spec: GridSpec) -> Self {
        Self {
            spec,
            max_episode_steps: None,
            seed: None,
        }
    }

    pub fn with_max_episode_steps(self, max_episode_steps: u32) -> Self {
        Self {
            max_episode_steps: Some(max_episode_steps),
            ..self
        }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    pub fn max_episode_steps(&self) -> Option<u32> {
        self.max_episode_steps
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Deterministic fingerprint of this configuration.
    pub fn hash(&self) -> GymResult<String> {
        let mut hasher = blake3::Hasher::new();
        let bytes = postcard::to_stdvec(self).map_err(EnvError::Encoding)?;
        hasher.update(&bytes);
        Ok(format!("{}", hasher.finalize()))
    }

    pub fn validate(&self) -> GymResult<()> {
        if self.max_episode_steps == Some(0) {
            return Err(EnvError::InvalidConfig("max_episode_steps must be > 0".into()).into());
        }
        self.spec.validate()
    }
}
