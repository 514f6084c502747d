use std::marker::PhantomData;

use rand::{SeedableRng, rngs::StdRng};
use strum::EnumCount;
use tracing::{debug, info};

use crate::{
    error::GymResult,
    gym::{
        Env, EnvStatus, Info, RenderMode, StepResult,
        episode::EpisodeController,
        grid::{
            action::GridAction,
            config::GridEnvConfig,
            observation::ObservationEncoder,
            reward::RewardTable,
            spec::{GridSpec, Position},
            transition::transition,
        },
        resolve_seed,
        space::{BoxSpace, Discrete},
    },
};

/// A grid-world environment whose observation format is chosen by `E`.
///
/// The dynamics are fully deterministic; the random source only backs
/// [`Env::sample_action`].
#[derive(Debug)]
pub struct GridEnv<E> {
    spec: GridSpec,
    rewards: RewardTable,

    /// Current cell of the agent. Meaningless until the first `reset()`.
    position: Position,

    episode: EpisodeController,
    rng: StdRng,
    _encoder: PhantomData<E>,
}

impl<E: ObservationEncoder> GridEnv<E> {
    pub fn from_config(cfg: GridEnvConfig) -> GymResult<Self> {
        cfg.validate()?;
        let seed = resolve_seed(cfg.seed());
        info!(
            config_hash = %cfg.hash()?,
            rows = cfg.spec().rows,
            cols = cfg.spec().cols,
            seed,
            "Grid environment built"
        );

        let spec = cfg.spec().clone();
        Ok(Self {
            rewards: RewardTable::from_spec(&spec),
            position: spec.start,
            spec,
            episode: EpisodeController::new(cfg.max_episode_steps()),
            rng: StdRng::seed_from_u64(seed),
            _encoder: PhantomData,
        })
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Steps taken in the current episode.
    pub fn steps(&self) -> u32 {
        self.episode.steps()
    }

    fn observe(&self) -> E::Observation {
        E::encode(&self.spec, self.position)
    }
}

impl<E: ObservationEncoder> Env for GridEnv<E> {
    type Observation = E::Observation;

    #[tracing::instrument(skip(self), fields(start = %self.spec.start))]
    fn reset(&mut self) -> GymResult<Self::Observation> {
        self.position = self.spec.start;
        self.episode.begin();
        info!("Episode started");
        Ok(self.observe())
    }

    fn step(&mut self, action: usize) -> GymResult<StepResult<Self::Observation>> {
        self.episode.check_step()?;
        let action = GridAction::try_from(action)?;

        let from = self.position;
        self.position = transition(&self.spec, from, action);
        let reward = self.rewards.reward(self.position);

        let mut info = Info::default();
        let outcome = self
            .episode
            .advance(self.spec.is_goal(self.position), &mut info);

        debug!(
            %action,
            %from,
            to = %self.position,
            reward = reward.0,
            ?outcome,
            step = self.episode.steps(),
            "Grid step"
        );

        Ok((self.observe(), reward, outcome, info))
    }

    fn seed(&mut self, seed: Option<u64>) -> Vec<u64> {
        let seed = resolve_seed(seed);
        self.rng = StdRng::seed_from_u64(seed);
        vec![seed]
    }

    fn render(&self, mode: RenderMode) -> GymResult<()> {
        debug!(%mode, position = %self.position, "Render requested (no-op)");
        Ok(())
    }

    fn action_space(&self) -> Discrete {
        Discrete::new(GridAction::COUNT)
    }

    fn observation_space(&self) -> BoxSpace {
        E::space(&self.spec)
    }

    fn sample_action(&mut self) -> usize {
        self.action_space().sample(&mut self.rng)
    }

    fn status(&self) -> EnvStatus {
        self.episode.status()
    }
}
