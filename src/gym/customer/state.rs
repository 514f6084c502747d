use ndarray::Array1;
use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, IntoStaticStr};

use crate::gym::customer::{action::CampaignAction, response::Response};

/// The nine state columns, in feature-vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, IntoStaticStr)]
pub enum StateCol {
    #[strum(serialize = "r0")]
    Recency,
    #[strum(serialize = "f0")]
    Frequency,
    #[strum(serialize = "m0")]
    Monetary,
    #[strum(serialize = "ir0")]
    InteractionRecency,
    #[strum(serialize = "if0")]
    InteractionFrequency,
    #[strum(serialize = "gender")]
    Gender,
    #[strum(serialize = "age")]
    Age,
    #[strum(serialize = "income")]
    Income,
    #[strum(serialize = "zip_region")]
    ZipRegion,
}

/// Recency/frequency/monetary features of one customer plus static demographics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CustomerState {
    /// Periods since the last donation.
    pub recency: f64,
    /// Number of donations so far.
    pub frequency: f64,
    /// Average donation amount.
    pub monetary: f64,
    /// Periods since the last non-null campaign action.
    pub interaction_recency: f64,
    /// Number of non-null campaign actions so far.
    pub interaction_frequency: f64,

    // Carried through unchanged for the whole episode.
    pub gender: f64,
    pub age: f64,
    pub income: f64,
    pub zip_region: f64,
}

impl CustomerState {
    pub const N_FEATURES: usize = StateCol::COUNT;

    pub fn from_features(f: [f64; Self::N_FEATURES]) -> Self {
        let [
            recency,
            frequency,
            monetary,
            interaction_recency,
            interaction_frequency,
            gender,
            age,
            income,
            zip_region,
        ] = f;
        Self {
            recency,
            frequency,
            monetary,
            interaction_recency,
            interaction_frequency,
            gender,
            age,
            income,
            zip_region,
        }
    }

    pub fn features(&self) -> [f64; Self::N_FEATURES] {
        [
            self.recency,
            self.frequency,
            self.monetary,
            self.interaction_recency,
            self.interaction_frequency,
            self.gender,
            self.age,
            self.income,
            self.zip_region,
        ]
    }

    pub fn to_array(&self) -> Array1<f64> {
        Array1::from(self.features().to_vec())
    }

    /// Rolls the customer forward one period given the action taken and the realized response.
    pub fn next(&self, action: CampaignAction, response: Response) -> Self {
        let occurred = response.occurred;

        let recency = if occurred { 0.0 } else { self.recency + 1.0 };
        let frequency = if occurred {
            self.frequency + 1.0
        } else {
            self.frequency
        };
        let monetary = if frequency > 0.0 {
            (self.monetary * self.frequency + response.magnitude) / frequency
        } else {
            0.0
        };

        let (interaction_recency, interaction_frequency) = if action.is_null() {
            (self.interaction_recency + 1.0, self.interaction_frequency)
        } else {
            (0.0, self.interaction_frequency + 1.0)
        };

        Self {
            recency,
            frequency,
            monetary,
            interaction_recency,
            interaction_frequency,
            ..*self
        }
    }
}
