//! Grid-world environments: a deterministic transition model with boundary clamping and
//! per-column wind, a static reward table, and the episode loop around them.

pub mod action;
pub mod config;
pub mod env;
pub mod observation;
pub mod reward;
pub mod spec;
pub mod transition;

use crate::gym::grid::{
    env::GridEnv,
    observation::{Coordinates, OneHot},
};

/// Berry Patch: one-hot observations, snakes as hazard cells.
pub type BerryPatchEnv = GridEnv<OneHot>;

/// Windy Gridworld: raw `(row, col)` observations, column wind.
pub type WindyGridworldEnv = GridEnv<Coordinates>;
