use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
    error::GymResult,
    gym::space::{BoxSpace, Discrete},
    impl_accumulate_primitive, impl_from_primitive,
};

pub mod customer;
pub mod episode;
pub mod grid;
pub mod space;

/// Scalar reward returned by a single `step()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Reward(pub f64);
impl_from_primitive!(Reward, f64);
impl_accumulate_primitive!(Reward, f64);

/// Represents the lifecycle status of an environment.
///
/// ```md
/// Current State             | Action  | Next State | Notes
/// --------------------------|---------|------------|---------------------------------------
/// `Running` (terminal step) | step()  | Done       | Goal reached, horizon or step cap hit
/// `Running`                 | step()  | Running    | Continue within episode
/// `Ready`                   | step()  | Ready      | Fails with `NotStarted`
/// `Done`                    | step()  | Done       | Fails with `EpisodeFinished`
/// any                       | reset() | Running    | Discards the previous episode
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvStatus {
    /// Initial state. The environment is waiting for `reset()` to be called.
    #[default]
    Ready,

    /// An episode is active and the environment accepts `step()` calls.
    Running,

    /// The active episode has reached a terminal state.
    Done,
}

impl EnvStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    InProgress,
    /// goal reached / horizon of the MDP reached
    Terminated,
    /// step cap hit before a terminal state
    Truncated,
}

impl StepOutcome {
    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated)
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated)
    }

    /// The `done` flag of the classic 4-tuple.
    pub fn is_terminal(&self) -> bool {
        self.is_terminated() || self.is_truncated()
    }
}

/// Auxiliary diagnostics returned alongside each step. Empty unless noted otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info(pub BTreeMap<String, serde_json::Value>);

impl Info {
    pub const TRUNCATED: &'static str = "TimeLimit.truncated";

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Human,
}

/// `(observation, reward, outcome, info)`; `done` is `outcome.is_terminal()`.
pub type StepResult<O> = (O, Reward, StepOutcome, Info);

/// The agent/environment contract implemented by every environment variant.
pub trait Env {
    type Observation;

    /// Starts a new episode, discarding any previous one, and returns the initial observation.
    fn reset(&mut self) -> GymResult<Self::Observation>;

    /// Advances the episode by one action id.
    fn step(&mut self, action: usize) -> GymResult<StepResult<Self::Observation>>;

    /// Reseeds the environment's random source and returns the resolved seed.
    ///
    /// `None` draws a fresh seed from OS-backed entropy.
    fn seed(&mut self, seed: Option<u64>) -> Vec<u64>;

    fn render(&self, mode: RenderMode) -> GymResult<()>;

    fn close(&mut self) {}

    fn action_space(&self) -> Discrete;

    fn observation_space(&self) -> BoxSpace;

    /// Draws a uniformly random valid action id from the environment's own random source.
    fn sample_action(&mut self) -> usize;

    fn status(&self) -> EnvStatus;
}

/// Resolves an optional user seed the way `seed()` documents it.
pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
    use rand::Rng;
    seed.unwrap_or_else(|| rand::rng().random())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewards_accumulate_over_an_episode() {
        let mut total = Reward::default();
        total += Reward(-1.0);
        total += 50.0;
        assert_eq!(total, Reward(49.0));

        let summed: Reward = [Reward(-10.0), Reward(-1.0), Reward(50.0)].into_iter().sum();
        assert_eq!(summed, Reward(39.0));
        assert_eq!(f64::from(summed + 1.0), 40.0);
    }
}
