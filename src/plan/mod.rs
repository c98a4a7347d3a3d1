//! Planning pipelines.
//!
//! A plan runs the whole chain for one district: initial assignment,
//! rebalancing of unplaced houses, wiring, optional optimization and cable
//! placement. The [`Strategy`] picks which variant of each step runs.

mod config;
mod runner;

pub use config::{PlanConfig, Strategy};
pub use runner::{Plan, Planner};
