#![allow(dead_code)]

use std::path::PathBuf;

use mdpgym::prelude::*;

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn customer_config() -> CustomerSimConfig {
    let dir = fixtures_dir();
    CustomerSimConfig::new(dir.join("kdd_tuples.csv"), dir.join("models"))
}

pub fn setup_customer_env() -> CustomerSimEnv {
    CustomerSimEnv::from_config(&customer_config()).expect("fixture customer env should load")
}

/// Plays `actions` from a fresh reset and returns every step result.
pub fn play<E: Env>(env: &mut E, actions: &[usize]) -> Vec<StepResult<E::Observation>> {
    env.reset().expect("reset should succeed");
    actions
        .iter()
        .map(|a| env.step(*a).expect("step should succeed"))
        .collect()
}

/// Runs one episode with random actions and returns `(steps, total reward, last outcome)`.
pub fn random_episode<E: Env>(env: &mut E) -> (u32, Reward, StepOutcome) {
    env.reset().expect("reset should succeed");
    let mut total = Reward::default();
    let mut steps = 0;
    loop {
        let action = env.sample_action();
        let (_, reward, outcome, _) = env.step(action).expect("step should succeed");
        total += reward;
        steps += 1;
        if outcome.is_terminal() {
            return (steps, total, outcome);
        }
    }
}
