use std::sync::Arc;

use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info};

use crate::{
    error::GymResult,
    gym::{
        Env, EnvStatus, Info, RenderMode, Reward, StepResult,
        customer::{
            action::CampaignAction, config::CustomerSimConfig, data::InitialStateTable,
            response::ResponseModel, state::CustomerState,
        },
        episode::EpisodeController,
        resolve_seed,
        space::{BoxSpace, Discrete},
    },
};

/// The customer-response simulator.
///
/// `reset()` draws a customer from the initial-state table; every `step()` asks the
/// [`ResponseModel`] whether that customer donates, pays out the donation as reward and
/// rolls the customer's features forward. Episodes end after `horizon` periods.
///
/// Every instance owns its random stream; use [`CustomerSimEnv::fork`] to get another
/// environment over the same dataset and predictors.
#[derive(Debug)]
pub struct CustomerSimEnv {
    // === Shared, read-only ===
    initial_states: InitialStateTable,
    model: Arc<ResponseModel>,

    // === Configurable ===
    horizon: u32,

    // === Internal only ===
    /// Current customer. Meaningless until the first `reset()`.
    state: CustomerState,
    episode: EpisodeController,
    rng: StdRng,
}

impl CustomerSimEnv {
    pub const OBSERVATION_HIGH: f64 = 100_000.0;

    /// Builds an environment around already loaded collaborators, seeded with
    /// [`CustomerSimConfig::DEFAULT_SEED`] and running [`CustomerSimConfig::DEFAULT_HORIZON`]
    /// periods.
    pub fn new(initial_states: InitialStateTable, model: Arc<ResponseModel>) -> Self {
        Self {
            initial_states,
            model,
            horizon: CustomerSimConfig::DEFAULT_HORIZON,
            state: CustomerState::default(),
            episode: EpisodeController::new(None),
            rng: StdRng::seed_from_u64(CustomerSimConfig::DEFAULT_SEED),
        }
    }

    /// Loads the dataset and both predictors from the paths in `cfg`.
    pub fn from_config(cfg: &CustomerSimConfig) -> GymResult<Self> {
        cfg.validate()?;
        let initial_states = cfg.load_initial_states()?;
        let model = Arc::new(cfg.load_response_model()?);
        let seed = resolve_seed(cfg.seed());

        info!(
            config_hash = %cfg.hash()?,
            customers = initial_states.len(),
            horizon = cfg.horizon(),
            seed,
            "Customer simulator built"
        );

        let env = Self::new(initial_states, model)
            .with_horizon(cfg.horizon())
            .with_seed(seed);
        Ok(match cfg.max_episode_steps() {
            Some(cap) => env.with_max_episode_steps(cap),
            None => env,
        })
    }

    /// Creates an independent environment that shares this one's dataset and predictors.
    pub fn fork(&self, seed: u64) -> Self {
        Self {
            initial_states: self.initial_states.clone(),
            model: Arc::clone(&self.model),
            horizon: self.horizon,
            state: CustomerState::default(),
            episode: EpisodeController::new(self.episode.max_episode_steps()),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..self
        }
    }

    /// # Panics
    /// Panics if `horizon` is zero.
    pub fn with_horizon(self, horizon: u32) -> Self {
        assert!(horizon > 0, "horizon must be > 0");
        Self { horizon, ..self }
    }

    /// Truncates episodes after `cap` steps if the horizon has not ended them first.
    ///
    /// # Panics
    /// Panics if `cap` is zero.
    pub fn with_max_episode_steps(self, cap: u32) -> Self {
        assert!(cap > 0, "max_episode_steps must be > 0");
        Self {
            episode: EpisodeController::new(Some(cap)),
            ..self
        }
    }

    pub fn state(&self) -> &CustomerState {
        &self.state
    }

    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    /// Periods elapsed in the current episode.
    pub fn steps(&self) -> u32 {
        self.episode.steps()
    }
}

impl Env for CustomerSimEnv {
    type Observation = CustomerState;

    #[tracing::instrument(skip(self), fields(horizon = self.horizon))]
    fn reset(&mut self) -> GymResult<Self::Observation> {
        self.state = self.initial_states.sample(&mut self.rng);
        self.episode.begin();
        info!(
            recency = self.state.recency,
            frequency = self.state.frequency,
            monetary = self.state.monetary,
            "Episode started"
        );
        Ok(self.state)
    }

    fn step(&mut self, action: usize) -> GymResult<StepResult<Self::Observation>> {
        self.episode.check_step()?;
        let action = CampaignAction::try_from(action)?;

        let response = self.model.respond(&mut self.rng, &self.state, action)?;
        self.state = self.state.next(action, response);
        let reward = Reward(response.magnitude);

        let mut info = Info::default();
        let reached_horizon = self.episode.steps() + 1 >= self.horizon;
        let outcome = self.episode.advance(reached_horizon, &mut info);

        debug!(
            %action,
            occurred = response.occurred,
            reward = reward.0,
            ?outcome,
            period = self.episode.steps(),
            "Customer step"
        );

        Ok((self.state, reward, outcome, info))
    }

    fn seed(&mut self, seed: Option<u64>) -> Vec<u64> {
        let seed = resolve_seed(seed);
        self.rng = StdRng::seed_from_u64(seed);
        vec![seed]
    }

    fn render(&self, mode: RenderMode) -> GymResult<()> {
        debug!(%mode, period = self.episode.steps(), "Render requested (no-op)");
        Ok(())
    }

    fn action_space(&self) -> Discrete {
        Discrete::new(CampaignAction::COUNT)
    }

    fn observation_space(&self) -> BoxSpace {
        BoxSpace::new(0.0, Self::OBSERVATION_HIGH, CustomerState::N_FEATURES)
    }

    fn sample_action(&mut self) -> usize {
        self.action_space().sample(&mut self.rng)
    }

    fn status(&self) -> EnvStatus {
        self.episode.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{EnvError, GymError},
        gym::{StepOutcome, customer::response::tests::model},
    };

    fn table() -> InitialStateTable {
        InitialStateTable::new(vec![
            CustomerState::from_features([3.0, 0.0, 0.0, 2.0, 0.0, 1.0, 45.0, 4.0, 2.0]),
            CustomerState::from_features([0.0, 2.0, 20.0, 0.0, 5.0, 0.0, 70.0, 6.0, 8.0]),
        ])
        .unwrap()
    }

    fn env(p: f64, amount: f64) -> CustomerSimEnv {
        CustomerSimEnv::new(table(), Arc::new(model(p, amount)))
    }

    #[test]
    fn step_before_reset_fails() {
        let mut env = env(0.5, 10.0);
        assert!(matches!(env.step(0), Err(GymError::Env(EnvError::NotStarted))));
    }

    #[test]
    fn episode_ends_exactly_at_the_horizon() {
        let mut env = env(0.5, 10.0);
        env.reset().unwrap();

        for t in 1..=18 {
            let (_, _, outcome, _) = env.step(t % 12).unwrap();
            if t < 18 {
                assert_eq!(outcome, StepOutcome::InProgress, "ended early at step {t}");
            } else {
                assert_eq!(outcome, StepOutcome::Terminated);
            }
        }
        assert!(matches!(
            env.step(0),
            Err(GymError::Env(EnvError::EpisodeFinished { steps: 18 }))
        ));
    }

    #[test]
    fn reset_mid_episode_restarts_the_clock() {
        let mut env = env(0.5, 10.0);
        env.reset().unwrap();
        for _ in 0..5 {
            env.step(1).unwrap();
        }
        assert_eq!(env.steps(), 5);

        let fresh = env.reset().unwrap();
        assert_eq!(env.steps(), 0);
        assert!(table().get(0) == Some(&fresh) || table().get(1) == Some(&fresh));
    }

    #[test]
    fn invalid_action_fails_fast() {
        let mut env = env(0.5, 10.0);
        let before = env.reset().unwrap();
        assert!(matches!(
            env.step(12),
            Err(GymError::Env(EnvError::InvalidAction { action: 12, n: 12 }))
        ));
        assert_eq!(*env.state(), before);
        assert_eq!(env.steps(), 0);
    }

    #[test]
    fn no_donation_pays_nothing() {
        let mut env = env(0.0, 55.0);
        let s0 = env.reset().unwrap();
        let (s1, reward, _, info) = env.step(4).unwrap();

        assert_eq!(reward, Reward(0.0));
        assert_eq!(s1.frequency, s0.frequency);
        assert_eq!(s1.recency, s0.recency + 1.0);
        assert_eq!(s1.interaction_recency, 0.0);
        assert!(info.is_empty());
    }

    #[test]
    fn same_seed_same_trajectory() {
        let run = |seed: u64| {
            let mut env = env(0.3, 17.4).with_seed(seed);
            let mut trace = vec![(env.reset().unwrap(), Reward::default())];
            for t in 0..18 {
                let (s, r, _, _) = env.step(t % 12).unwrap();
                trace.push((s, r));
            }
            trace
        };
        assert_eq!(run(9), run(9));
    }

    #[test]
    fn forks_share_loaded_models() {
        let base = env(0.3, 5.0);
        let a = base.fork(1);
        let b = base.fork(1);
        assert!(Arc::ptr_eq(&a.model, &b.model));
        assert!(Arc::ptr_eq(&a.model, &base.model));
    }

    #[test]
    fn step_cap_truncates_before_the_horizon() {
        let mut env = env(0.5, 10.0).with_max_episode_steps(4);
        env.reset().unwrap();
        for _ in 0..3 {
            assert_eq!(env.step(2).unwrap().2, StepOutcome::InProgress);
        }
        let (_, _, outcome, info) = env.step(2).unwrap();
        assert_eq!(outcome, StepOutcome::Truncated);
        assert_eq!(info.get(Info::TRUNCATED), Some(&serde_json::Value::Bool(true)));
        assert!(env.status().is_done());
    }

    #[test]
    fn envs_can_run_on_separate_threads() {
        let base = env(0.4, 20.0);
        let totals: Vec<f64> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let mut env = base.fork(i);
                    s.spawn(move || {
                        env.reset().unwrap();
                        let mut total = Reward::default();
                        loop {
                            let (_, r, outcome, _) = env.step(1).unwrap();
                            total += r;
                            if outcome.is_terminal() {
                                break total.0;
                            }
                        }
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(totals.len(), 4);
        assert!(totals.iter().all(|t| *t >= 0.0 && t % 20.0 == 0.0));
    }

    fn trajectory_step(env: &mut CustomerSimEnv, t: usize) -> (CustomerState, Reward) {
        let (s, r, _, _) = env.step(t % 12).unwrap();
        (s, r)
    }

    #[test]
    fn forks_draw_from_independent_streams() {
        let base = env(0.3, 17.0);
        let mut a = base.fork(1);
        let mut b = base.fork(2);
        let mut solo = base.fork(2);

        let mut trace_a = vec![(a.reset().unwrap(), Reward::default())];
        let mut trace_b = vec![(b.reset().unwrap(), Reward::default())];
        let mut trace_solo = vec![(solo.reset().unwrap(), Reward::default())];
        for t in 0..18 {
            trace_a.push(trajectory_step(&mut a, t));
            trace_b.push(trajectory_step(&mut b, t));
        }
        for t in 0..18 {
            trace_solo.push(trajectory_step(&mut solo, t));
        }

        assert_ne!(trace_a, trace_b, "differently seeded forks replayed the same draws");
        assert_eq!(
            trace_b, trace_solo,
            "stepping a sibling fork changed this fork's draws"
        );
    }

    #[test]
    #[should_panic(expected = "max_episode_steps must be > 0")]
    fn zero_step_cap_is_rejected() {
        let _ = env(0.5, 10.0).with_max_episode_steps(0);
    }

    #[test]
    fn spaces_match_the_simulator() {
        let mut env = env(0.3, 5.0);
        assert_eq!(env.action_space(), Discrete::new(12));
        let obs = env.reset().unwrap();
        assert!(env.observation_space().contains(obs.to_array().view()));
    }
}
