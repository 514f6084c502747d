use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{EnvError, GymResult},
    gym::customer::{
        data::InitialStateTable,
        predictor::Mlp,
        response::{ResponseModel, SamplingConfig},
    },
};

/// Configuration blueprint for building a [`CustomerSimEnv`](super::env::CustomerSimEnv)
/// from files on disk.
///
/// # Example
///
/// ```no_run
/// # use mdpgym::prelude::*;
/// # fn example() -> GymResult<()> {
/// let cfg = CustomerSimConfig::new("data/kdd1998tuples.csv", "models")
///     .with_seed(47)
///     .with_horizon(18);
/// let mut env = CustomerSimEnv::from_config(&cfg)?;
/// let customer = env.reset()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSimConfig {
    /// Headerless customer-tuple CSV.
    data_file: PathBuf,

    /// Directory holding both predictor artifacts.
    model_dir: PathBuf,

    classifier_file: String,
    regressor_file: String,

    /// Seed of the environment's random source. `None` draws one from entropy.
    seed: Option<u64>,

    /// Number of periods in an episode.
    horizon: u32,

    sampling: SamplingConfig,

    /// Optional hard cap on steps; hitting it before the horizon truncates the episode.
    max_episode_steps: Option<u32>,
}

impl Default for CustomerSimConfig {
    fn default() -> Self {
        Self::new("data/kdd1998tuples.csv", "models")
    }
}

impl CustomerSimConfig {
    pub const DEFAULT_SEED: u64 = 47;
    pub const DEFAULT_HORIZON: u32 = 18;
    pub const CLASSIFIER_FILE: &'static str = "kdd98_propagation_classifier_best.json";
    pub const REGRESSOR_FILE: &'static str = "kdd98_propagation_regressor_best.json";

    pub fn new(data_file: impl Into<PathBuf>, model_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            model_dir: model_dir.into(),
            classifier_file: Self::CLASSIFIER_FILE.to_string(),
            regressor_file: Self::REGRESSOR_FILE.to_string(),
            seed: Some(Self::DEFAULT_SEED),
            horizon: Self::DEFAULT_HORIZON,
            sampling: SamplingConfig::default(),
            max_episode_steps: None,
        }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    /// Draw the seed from entropy at construction time.
    pub fn with_random_seed(self) -> Self {
        Self { seed: None, ..self }
    }

    pub fn with_horizon(self, horizon: u32) -> Self {
        Self { horizon, ..self }
    }

    pub fn with_sampling(self, sampling: SamplingConfig) -> Self {
        Self { sampling, ..self }
    }

    pub fn with_max_episode_steps(self, cap: u32) -> Self {
        Self {
            max_episode_steps: Some(cap),
            ..self
        }
    }

    pub fn with_model_files(
        self,
        classifier_file: impl Into<String>,
        regressor_file: impl Into<String>,
    ) -> Self {
        Self {
            classifier_file: classifier_file.into(),
            regressor_file: regressor_file.into(),
            ..self
        }
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn classifier_path(&self) -> PathBuf {
        self.model_dir.join(&self.classifier_file)
    }

    pub fn regressor_path(&self) -> PathBuf {
        self.model_dir.join(&self.regressor_file)
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    pub fn sampling(&self) -> SamplingConfig {
        self.sampling
    }

    pub fn max_episode_steps(&self) -> Option<u32> {
        self.max_episode_steps
    }

    /// Stable fingerprint of the configuration, used to tag log lines.
    pub fn hash(&self) -> GymResult<String> {
        let bytes = postcard::to_stdvec(self).map_err(EnvError::from)?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }

    pub fn validate(&self) -> GymResult<()> {
        if self.max_episode_steps == Some(0) {
            return Err(EnvError::InvalidConfig("max_episode_steps must be > 0".into()).into());
        }
        if self.horizon == 0 {
            return Err(EnvError::InvalidConfig("horizon must be > 0".into()).into());
        }
        if self.sampling.trials == 0 {
            return Err(EnvError::InvalidConfig("sampling trials must be > 0".into()).into());
        }
        Ok(())
    }

    pub fn load_initial_states(&self) -> GymResult<InitialStateTable> {
        InitialStateTable::from_csv(&self.data_file)
    }

    /// Loads both predictors and checks they fit the simulator's feature layout.
    pub fn load_response_model(&self) -> GymResult<ResponseModel> {
        let classifier = Mlp::load(&self.classifier_path())?;
        let regressor = Mlp::load(&self.regressor_path())?;
        ResponseModel::new(Arc::new(classifier), Arc::new(regressor), self.sampling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_kdd_setup() {
        let cfg = CustomerSimConfig::new("tuples.csv", "models");
        assert_eq!(cfg.seed(), Some(47));
        assert_eq!(cfg.horizon(), 18);
        assert_eq!(
            cfg.classifier_path(),
            Path::new("models").join("kdd98_propagation_classifier_best.json")
        );
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn hash_tracks_every_field() {
        let base = CustomerSimConfig::new("tuples.csv", "models");
        assert_eq!(base.hash().unwrap(), base.clone().hash().unwrap());
        assert_ne!(
            base.hash().unwrap(),
            base.clone().with_seed(48).hash().unwrap()
        );
        assert_ne!(
            base.hash().unwrap(),
            base.clone().with_max_episode_steps(5).hash().unwrap()
        );
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let cfg = CustomerSimConfig::new("tuples.csv", "models").with_horizon(0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_model_is_a_construction_error() {
        let cfg = CustomerSimConfig::new("tuples.csv", "/definitely/not/here");
        assert!(cfg.load_response_model().is_err());
    }
}
