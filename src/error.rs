use thiserror::Error;

pub type GymResult<T> = Result<T, GymError>;

#[derive(Debug, Error)]
pub enum GymError {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Io(#[from] IoError),
}

/// Errors related to the environment configuration and the episode lifecycle.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("Invalid action {action}: expected an id in 0..{n}")]
    InvalidAction { action: usize, n: usize },

    #[error("Environment is not started. Call `reset()` before stepping.")]
    NotStarted,

    #[error("Episode is finished after {steps} steps. Call `reset()` before stepping.")]
    EpisodeFinished { steps: u32 },

    #[error("Invalid environment configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to encode environment configuration")]
    Encoding(#[from] postcard::Error),
}

/// Errors related to loading and validating the initial-state dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Data frame error: {0}")]
    DataFrame(String),

    #[error("Missing value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("No initial states found: {0}")]
    NoInitialStates(String),
}

/// Errors related to the predictive models driving the customer simulator.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Incompatible model '{model}': {msg}")]
    Incompatible { model: String, msg: String },

    #[error("Shape mismatch: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Invalid occurrence probability {0}: expected a value in [0, 1]")]
    InvalidProbability(f64),

    #[error("Failed to build sampling distribution: {0}")]
    Distribution(#[from] rand_distr::BinomialError),
}

/// Errors related to file I/O and artifact deserialization.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("Deserialization failed")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read {path}: {msg}")]
    ReadFailed { path: String, msg: String },
}
