mod common;

use std::sync::Arc;

use mdpgym::prelude::*;

#[test]
fn fixture_models_and_data_load() {
    let cfg = common::customer_config();

    let table = cfg.load_initial_states().unwrap();
    assert_eq!(table.len(), 4, "only period-1 rows seed episodes");
    assert_eq!(
        table.get(1).unwrap().features(),
        [0.0, 4.0, 22.5, 0.0, 9.0, 0.0, 37.0, 6.0, 2.0]
    );

    let model = cfg.load_response_model().unwrap();
    assert_eq!(model.sampling(), SamplingConfig::default());
}

#[test]
fn classifier_fixture_computes_the_expected_probability() {
    let clf = Mlp::load(&common::customer_config().classifier_path()).unwrap();
    let out = clf.predict(ndarray::Array2::zeros((1, 10)).view()).unwrap();

    // logits [0, 0.5] -> softmax
    let p = 1.0 / (1.0 + (-0.5f64).exp());
    assert!((out[[0, 1]] - p).abs() < 1e-12);
    assert!((out.row(0).sum() - 1.0).abs() < 1e-12);
}

#[test]
fn episode_lasts_eighteen_periods() {
    let mut env = common::setup_customer_env();
    env.reset().unwrap();

    for t in 1..=18u32 {
        let (_, reward, outcome, _) = env.step((t as usize) % 12).unwrap();
        assert!(
            reward == Reward(0.0) || reward == Reward(12.0),
            "regressor fixture pays 12.4, rounded: got {reward:?}"
        );
        assert_eq!(outcome.is_terminal(), t == 18, "wrong done flag at period {t}");
    }
    assert!(env.status().is_done());
}

#[test]
fn state_follows_the_response() {
    let mut env = common::setup_customer_env();
    let mut prev = env.reset().unwrap();

    for _ in 0..18 {
        let (next, reward, _, _) = env.step(4).unwrap();
        if reward.0 > 0.0 {
            assert_eq!(next.recency, 0.0);
            assert_eq!(next.frequency, prev.frequency + 1.0);
        } else {
            assert_eq!(next.recency, prev.recency + 1.0);
            assert_eq!(next.frequency, prev.frequency);
        }
        assert_eq!(next.interaction_recency, 0.0);
        assert_eq!(next.interaction_frequency, prev.interaction_frequency + 1.0);
        assert_eq!(next.age, prev.age);
        prev = next;
    }
}

#[test]
fn same_seed_reproduces_the_trajectory() {
    let rollout = |seed: u64| {
        let cfg = common::customer_config().with_seed(seed);
        let mut env = CustomerSimEnv::from_config(&cfg).unwrap();
        common::play(&mut env, &[1, 0, 3, 3, 7, 11, 0, 2, 5])
            .into_iter()
            .map(|(s, r, _, _)| (s, r))
            .collect::<Vec<_>>()
    };
    assert_eq!(rollout(47), rollout(47));
}

#[test]
fn forked_envs_share_loaded_collaborators() {
    let base = common::setup_customer_env();
    let mut envs: Vec<CustomerSimEnv> = (0..3).map(|i| base.fork(i)).collect();

    for env in &mut envs {
        let (steps, total, outcome) = common::random_episode(env);
        assert_eq!(steps, 18);
        assert_eq!(outcome, StepOutcome::Terminated);
        assert_eq!(total.0 % 12.0, 0.0);
    }
}

#[test]
fn hand_built_model_plugs_in() {
    let cfg = common::customer_config();
    let table = cfg.load_initial_states().unwrap();
    let classifier = Arc::new(Mlp::load(&cfg.classifier_path()).unwrap());
    let regressor = Arc::new(Mlp::load(&cfg.regressor_path()).unwrap());

    // Swapping the roles breaks the output-width contract.
    assert!(
        ResponseModel::new(regressor.clone(), classifier.clone(), SamplingConfig::default())
            .is_err()
    );

    let model = ResponseModel::new(classifier, regressor, SamplingConfig::default()).unwrap();
    let mut env = CustomerSimEnv::new(table, Arc::new(model)).with_horizon(3);
    let results = common::play(&mut env, &[0, 0, 0]);
    assert!(results[2].2.is_terminated());
}

#[test]
fn missing_dataset_is_a_construction_error() {
    let cfg = CustomerSimConfig::new(
        common::fixtures_dir().join("does_not_exist.csv"),
        common::fixtures_dir().join("models"),
    );
    assert!(CustomerSimEnv::from_config(&cfg).is_err());
}
