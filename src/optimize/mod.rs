//! Swap-based layout optimization.
//!
//! A single-solution trajectory search over assignments: each move trades
//! one house between two batteries and rebuilds their trees. Hill climbing
//! keeps only improvements; annealing also keeps worsening moves with a
//! probability that decays over the run, allowing the search to escape
//! local optima. The reported result is always the best layout seen.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

mod config;
mod runner;
mod types;

pub use config::{CoolingSchedule, OptimizerConfig, SearchMode};
pub use runner::{improvement, Optimizer};
pub use types::{OptimizeResult, Solution};
