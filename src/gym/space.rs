use ndarray::{Array1, ArrayView1};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Discrete space `{0, 1, ..., n-1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrete {
    pub n: usize,
}

impl Discrete {
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    pub fn contains(&self, action: usize) -> bool {
        action < self.n
    }

    pub fn sample(&self, rng: &mut impl Rng) -> usize {
        rng.random_range(0..self.n)
    }
}

/// Flat box space with a uniform lower and upper bound on every element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpace {
    pub low: f64,
    pub high: f64,
    pub len: usize,
}

impl BoxSpace {
    pub fn new(low: f64, high: f64, len: usize) -> Self {
        Self { low, high, len }
    }

    pub fn shape(&self) -> [usize; 1] {
        [self.len]
    }

    pub fn contains(&self, value: ArrayView1<f64>) -> bool {
        value.len() == self.len && value.iter().all(|v| (self.low..=self.high).contains(v))
    }

    pub fn sample(&self, rng: &mut impl Rng) -> Array1<f64> {
        Array1::from_shape_fn(self.len, |_| rng.random_range(self.low..=self.high))
    }
}
