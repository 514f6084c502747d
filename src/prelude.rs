// 1. Traits
pub use crate::gym::Env;
pub use crate::gym::customer::predictor::Predictor;
pub use crate::gym::grid::observation::ObservationEncoder;

// 2. The Core "Loop" Types
pub use crate::gym::{EnvStatus, Info, RenderMode, Reward, StepOutcome, StepResult};
pub use crate::gym::space::{BoxSpace, Discrete};

// 3. Grid Worlds
pub use crate::gym::grid::{
    BerryPatchEnv, WindyGridworldEnv,
    action::GridAction,
    config::{GridEnvConfig, GridPreset},
    env::GridEnv,
    observation::{Coordinates, OneHot},
    spec::{GridSpec, Hazard, Position},
};

// 4. Customer Simulator
pub use crate::gym::customer::{
    action::CampaignAction,
    config::CustomerSimConfig,
    data::InitialStateTable,
    env::CustomerSimEnv,
    predictor::{Activation, Dense, Mlp},
    response::{Response, ResponseModel, SamplingConfig},
    state::CustomerState,
};

// 5. Errors
pub use crate::error::{DataError, EnvError, GymError, GymResult, IoError, ModelError};
