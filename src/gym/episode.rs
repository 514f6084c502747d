use tracing::warn;

use crate::{
    error::{EnvError, GymResult},
    gym::{EnvStatus, Info, StepOutcome},
};

/// Lifecycle bookkeeping shared by every environment: status, step counter and an
/// optional step cap.
#[derive(Debug, Clone, Default)]
pub struct EpisodeController {
    status: EnvStatus,
    steps: u32,
    max_episode_steps: Option<u32>,
}

impl EpisodeController {
    pub fn new(max_episode_steps: Option<u32>) -> Self {
        Self {
            status: EnvStatus::Ready,
            steps: 0,
            max_episode_steps,
        }
    }

    pub fn status(&self) -> EnvStatus {
        self.status
    }

    /// Number of steps taken in the current episode.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn max_episode_steps(&self) -> Option<u32> {
        self.max_episode_steps
    }

    /// Starts a fresh episode from any status.
    pub fn begin(&mut self) {
        self.steps = 0;
        self.status = EnvStatus::Running;
    }

    pub fn check_step(&self) -> GymResult<()> {
        use EnvStatus::*;
        match self.status {
            Running => Ok(()),
            Ready => Err(EnvError::NotStarted.into()),
            Done => Err(EnvError::EpisodeFinished { steps: self.steps }.into()),
        }
    }

    /// Counts the step just taken and resolves its outcome.
    ///
    /// A terminal transition wins over the step cap; a cap hit on a non-terminal transition
    /// truncates the episode and is flagged in `info`.
    pub fn advance(&mut self, terminated: bool, info: &mut Info) -> StepOutcome {
        self.steps += 1;

        let outcome = if terminated {
            StepOutcome::Terminated
        } else if self.max_episode_steps.is_some_and(|cap| self.steps >= cap) {
            warn!(steps = self.steps, "Step cap reached, truncating episode");
            info.insert(Info::TRUNCATED, true);
            StepOutcome::Truncated
        } else {
            StepOutcome::InProgress
        };

        if outcome.is_terminal() {
            self.status = EnvStatus::Done;
        }
        outcome
    }
}
