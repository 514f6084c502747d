use std::{fmt::Debug, fs, path::Path};

use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::info;

use crate::error::{GymResult, IoError, ModelError};

/// A black-box batch predictor: `batch × input_dim` features in, `batch × output_dim` out.
///
/// Implementations must be free of side effects so one loaded model can serve many
/// environments at once.
pub trait Predictor: Debug + Send + Sync {
    fn predict(&self, features: ArrayView2<f64>) -> GymResult<Array2<f64>>;

    fn input_dim(&self) -> usize;

    fn output_dim(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Activation {
    Linear,
    Relu,
    Sigmoid,
    /// Row-wise softmax.
    Softmax,
}

impl Activation {
    fn apply(self, x: &mut Array2<f64>) {
        match self {
            Self::Linear => {}
            Self::Relu => x.mapv_inplace(|v| v.max(0.0)),
            Self::Sigmoid => x.mapv_inplace(|v| 1.0 / (1.0 + (-v).exp())),
            Self::Softmax => {
                for mut row in x.axis_iter_mut(Axis(0)) {
                    let max = row.fold(f64::NEG_INFINITY, |m, v| m.max(*v));
                    row.mapv_inplace(|v| (v - max).exp());
                    let sum = row.sum();
                    row.mapv_inplace(|v| v / sum);
                }
            }
        }
    }
}

/// Fully connected layer computing `activation(x · W + b)`, with `W` stored `in × out`.
#[derive(Debug, Clone)]
pub struct Dense {
    weights: Array2<f64>,
    bias: Array1<f64>,
    activation: Activation,
}

impl Dense {
    pub fn new(weights: Array2<f64>, bias: Array1<f64>, activation: Activation) -> GymResult<Self> {
        if weights.ncols() != bias.len() {
            return Err(incompatible(
                "dense",
                format!(
                    "bias has {} entries for {} output units",
                    bias.len(),
                    weights.ncols()
                ),
            ));
        }
        Ok(Self {
            weights,
            bias,
            activation,
        })
    }

    pub fn input_dim(&self) -> usize {
        self.weights.nrows()
    }

    pub fn output_dim(&self) -> usize {
        self.weights.ncols()
    }

    fn forward(&self, x: ArrayView2<f64>) -> Array2<f64> {
        let mut out = x.dot(&self.weights) + &self.bias;
        self.activation.apply(&mut out);
        out
    }
}

/// On-disk layout of one layer in a JSON weight artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerArtifact {
    /// Row-major `in × out` weight matrix.
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    pub activation: Activation,
}

/// On-disk layout of a whole network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpArtifact {
    pub layers: Vec<LayerArtifact>,
}

impl TryFrom<LayerArtifact> for Dense {
    type Error = crate::error::GymError;

    fn try_from(layer: LayerArtifact) -> Result<Self, Self::Error> {
        let rows = layer.weights.len();
        let cols = layer.weights.first().map_or(0, Vec::len);
        if layer.weights.iter().any(|r| r.len() != cols) {
            return Err(incompatible("dense", "ragged weight matrix".to_string()));
        }

        let flat: Vec<f64> = layer.weights.into_iter().flatten().collect();
        let weights = Array2::from_shape_vec((rows, cols), flat).map_err(ModelError::from)?;
        Dense::new(weights, Array1::from(layer.bias), layer.activation)
    }
}

/// Feed-forward stack of dense layers.
#[derive(Debug, Clone)]
pub struct Mlp {
    name: String,
    layers: Vec<Dense>,
}

impl Mlp {
    pub fn new(name: impl Into<String>, layers: Vec<Dense>) -> GymResult<Self> {
        let name = name.into();
        if layers.is_empty() {
            return Err(incompatible(&name, "network has no layers".to_string()));
        }
        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].output_dim() != pair[1].input_dim() {
                return Err(incompatible(
                    &name,
                    format!(
                        "layer {i} outputs {} units but layer {} expects {}",
                        pair[0].output_dim(),
                        i + 1,
                        pair[1].input_dim()
                    ),
                ));
            }
        }
        Ok(Self { name, layers })
    }

    pub fn from_artifact(name: impl Into<String>, artifact: MlpArtifact) -> GymResult<Self> {
        let layers = artifact
            .layers
            .into_iter()
            .map(Dense::try_from)
            .collect::<GymResult<Vec<_>>>()?;
        Self::new(name, layers)
    }

    /// Loads a network from a JSON weight artifact.
    pub fn load(path: &Path) -> GymResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| IoError::ReadFailed {
            path: path.display().to_string(),
            msg: e.to_string(),
        })?;
        let artifact: MlpArtifact = serde_json::from_str(&raw).map_err(IoError::from)?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mlp = Self::from_artifact(name, artifact)?;

        info!(
            model = %mlp.name,
            layers = mlp.layers.len(),
            input_dim = mlp.input_dim(),
            output_dim = mlp.output_dim(),
            "Loaded predictor"
        );
        Ok(mlp)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Predictor for Mlp {
    fn predict(&self, features: ArrayView2<f64>) -> GymResult<Array2<f64>> {
        if features.ncols() != self.input_dim() {
            return Err(incompatible(
                &self.name,
                format!(
                    "expected {} input features, got {}",
                    self.input_dim(),
                    features.ncols()
                ),
            ));
        }

        let mut x = self.layers[0].forward(features);
        for layer in &self.layers[1..] {
            x = layer.forward(x.view());
        }
        Ok(x)
    }

    fn input_dim(&self) -> usize {
        self.layers[0].input_dim()
    }

    fn output_dim(&self) -> usize {
        self.layers[self.layers.len() - 1].output_dim()
    }
}

fn incompatible(model: &str, msg: String) -> crate::error::GymError {
    ModelError::Incompatible {
        model: model.to_string(),
        msg,
    }
    .into()
}
