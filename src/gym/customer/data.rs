use std::{path::Path, sync::Arc};

use polars::prelude::{
    DataFrame, DataType, Expr, Field, LazyCsvReader, LazyFileListReader, PlPath, Schema, col,
    lit,
};
use rand::Rng;
use strum::IntoEnumIterator;
use tracing::info;

use crate::{
    error::{DataError, GymResult},
    gym::customer::state::{CustomerState, StateCol},
};

/// Columns of the headerless `(s, a, r, s')` customer-tuple file, in file order.
pub const TUPLE_COLUMNS: [&str; 26] = [
    "customer",
    "period",
    "r0",
    "f0",
    "m0",
    "ir0",
    "if0",
    "gender",
    "age",
    "income",
    "zip_region",
    "zip_la",
    "zip_lo",
    "a",
    "rew",
    "r1",
    "f1",
    "m1",
    "ir1",
    "if1",
    "gender1",
    "age1",
    "income1",
    "zip_region1",
    "zip_la1",
    "zip_lo1",
];

/// Only rows from the first period seed new episodes.
const INITIAL_PERIOD: f64 = 1.0;

/// Pool of customer states that `reset()` samples from uniformly.
#[derive(Debug, Clone)]
pub struct InitialStateTable {
    states: Arc<[CustomerState]>,
}

impl InitialStateTable {
    pub fn new(states: Vec<CustomerState>) -> GymResult<Self> {
        if states.is_empty() {
            return Err(DataError::NoInitialStates("initial-state table is empty".into()).into());
        }
        Ok(Self {
            states: states.into(),
        })
    }

    /// Loads the tuple file and keeps the state columns of every `period == 1` row.
    pub fn from_csv(path: &Path) -> GymResult<Self> {
        let uri = path.to_str().ok_or_else(|| {
            DataError::DataFrame(format!("non UTF-8 path: {}", path.display()))
        })?;

        let df = LazyCsvReader::new(PlPath::new(uri))
            .with_has_header(false)
            .with_schema(Some(Arc::new(tuple_schema())))
            .finish()
            .map_err(|e| DataError::DataFrame(e.to_string()))?
            .filter(col("period").eq(lit(INITIAL_PERIOD)))
            .select(state_exprs())
            .collect()
            .map_err(|e| DataError::DataFrame(e.to_string()))?;

        if df.height() == 0 {
            return Err(DataError::NoInitialStates(format!(
                "no rows with period == 1 in {}",
                path.display()
            ))
            .into());
        }
        let table = Self::from_df(&df)?;

        info!(
            path = %path.display(),
            customers = table.len(),
            "Loaded initial customer states"
        );
        Ok(table)
    }

    /// Builds the table from a frame holding the nine state columns.
    pub fn from_df(df: &DataFrame) -> GymResult<Self> {
        let columns = StateCol::iter()
            .map(|c| {
                let name: &'static str = c.into();
                df.column(name)
                    .and_then(|s| s.f64().cloned())
                    .map_err(|e| DataError::DataFrame(format!("column '{name}': {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut states = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            let mut features = [0.0; CustomerState::N_FEATURES];
            for ((slot, column), c) in features.iter_mut().zip(&columns).zip(StateCol::iter()) {
                *slot = column.get(row).ok_or_else(|| DataError::MissingValue {
                    column: <&'static str>::from(c).to_string(),
                    row,
                })?;
            }
            states.push(CustomerState::from_features(features));
        }

        Self::new(states)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&CustomerState> {
        self.states.get(idx)
    }

    /// Draws one customer uniformly at random.
    pub fn sample(&self, rng: &mut impl Rng) -> CustomerState {
        self.states[rng.random_range(0..self.states.len())]
    }
}

fn tuple_schema() -> Schema {
    Schema::from_iter(
        TUPLE_COLUMNS
            .iter()
            .map(|name| Field::new((*name).into(), DataType::Float64)),
    )
}

fn state_exprs() -> Vec<Expr> {
    StateCol::iter()
        .map(|c| col(<&'static str>::from(c)))
        .collect()
}
