//! Direct-marketing customer simulator.
//!
//! Each step the agent picks one of twelve campaign actions for a customer; two learned
//! predictors decide whether the customer donates and how much, and the customer's
//! recency/frequency/monetary features are rolled forward.

pub mod action;
pub mod config;
pub mod data;
pub mod env;
pub mod predictor;
pub mod response;
pub mod state;
