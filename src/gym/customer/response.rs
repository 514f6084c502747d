use std::sync::Arc;

use ndarray::Array2;
use rand::Rng;
use rand_distr::{Binomial, Distribution};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    error::{GymResult, ModelError},
    gym::customer::{action::CampaignAction, predictor::Predictor, state::CustomerState},
};

/// Realized customer reaction to one campaign action.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    pub occurred: bool,
    /// Donation amount, zero whenever `occurred` is false.
    pub magnitude: f64,
}

impl Response {
    pub fn new(occurred: bool, magnitude: f64) -> Self {
        Self {
            occurred,
            magnitude: if occurred { magnitude } else { 0.0 },
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

/// Parameters of the occurrence sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Success probability of the reference draw `X`.
    pub threshold: f64,

    /// Number of Bernoulli trials in each of the two binomial draws.
    pub trials: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            threshold: 0.275,
            trials: 8,
        }
    }
}

/// Turns `(state, action)` into a stochastic [`Response`] using a donation classifier and a
/// donation-amount regressor.
///
/// # Occurrence
///
/// With `p` the classifier's donation probability, the response draws
/// $X \sim \mathrm{Bin}(n, \text{threshold})$ and then $Y \sim \mathrm{Bin}(n, p)$ and a
/// donation occurs iff $X < Y$. Compared to a single `Bernoulli(p)` draw this is nearly
/// certain far from the threshold and most volatile around it.
///
/// # Magnitude
///
/// The regressor output, multiplied by the occurrence indicator and rounded half-to-even.
#[derive(Debug, Clone)]
pub struct ResponseModel {
    classifier: Arc<dyn Predictor>,
    regressor: Arc<dyn Predictor>,
    sampling: SamplingConfig,
    /// `Bin(trials, threshold)`, fixed for the model's lifetime.
    reference: Binomial,
}

impl ResponseModel {
    /// Number of features the predictors consume: the state plus the action id.
    pub const INPUT_DIM: usize = CustomerState::N_FEATURES + 1;

    pub fn new(
        classifier: Arc<dyn Predictor>,
        regressor: Arc<dyn Predictor>,
        sampling: SamplingConfig,
    ) -> GymResult<Self> {
        check_dims("classifier", classifier.as_ref(), 2)?;
        check_dims("regressor", regressor.as_ref(), 1)?;
        if !(0.0..=1.0).contains(&sampling.threshold) {
            return Err(ModelError::InvalidProbability(sampling.threshold).into());
        }
        let reference =
            Binomial::new(sampling.trials, sampling.threshold).map_err(ModelError::from)?;

        Ok(Self {
            classifier,
            regressor,
            sampling,
            reference,
        })
    }

    pub fn sampling(&self) -> SamplingConfig {
        self.sampling
    }

    /// Builds the single-row `[state ‖ action]` feature batch.
    pub fn features(state: &CustomerState, action: CampaignAction) -> Array2<f64> {
        let f = state.features();
        Array2::from_shape_fn((1, Self::INPUT_DIM), |(_, j)| {
            f.get(j).copied().unwrap_or(action.feature())
        })
    }

    pub fn respond(
        &self,
        rng: &mut impl Rng,
        state: &CustomerState,
        action: CampaignAction,
    ) -> GymResult<Response> {
        let input = Self::features(state, action);

        let p = self.classifier.predict(input.view())?[[0, 1]];
        let occurred = self.sample_occurrence(rng, p)?;

        let raw = self.regressor.predict(input.view())?[[0, 0]];
        let indicator = if occurred { 1.0 } else { 0.0 };
        let magnitude = (raw * indicator).round_ties_even();

        trace!(p, raw, occurred, magnitude, %action, "Customer response");
        Ok(Response::new(occurred, magnitude))
    }

    /// Draws the reference count first, then the customer count.
    pub fn sample_occurrence(&self, rng: &mut impl Rng, p: f64) -> GymResult<bool> {
        if !(0.0..=1.0).contains(&p) {
            return Err(ModelError::InvalidProbability(p).into());
        }
        let customer = Binomial::new(self.sampling.trials, p).map_err(ModelError::from)?;

        let x = self.reference.sample(rng);
        let y = customer.sample(rng);
        Ok(x < y)
    }
}

fn check_dims(role: &str, model: &dyn Predictor, output_dim: usize) -> GymResult<()> {
    if model.input_dim() != ResponseModel::INPUT_DIM || model.output_dim() != output_dim {
        return Err(ModelError::Incompatible {
            model: role.to_string(),
            msg: format!(
                "expected {} -> {output_dim}, got {} -> {}",
                ResponseModel::INPUT_DIM,
                model.input_dim(),
                model.output_dim()
            ),
        }
        .into());
    }
    Ok(())
}
