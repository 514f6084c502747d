//! Small Markov-decision-process environments behind a Gym-style [`gym::Env`] trait.
//!
//! - [`gym::grid`]: Berry Patch and Windy Gridworld, deterministic grid worlds.
//! - [`gym::customer`]: a direct-marketing customer simulator driven by learned predictors.

pub mod error;
pub mod gym;
mod macros;
pub mod prelude;
