//! Solutions and run statistics.

use crate::cost::Cost;
use crate::layout::Layout;
use crate::model::Assignment;

/// An assignment together with the layout derived from it.
#[derive(Debug, Clone)]
pub struct Solution {
    pub assignment: Assignment,
    pub layout: Layout,
    pub cost: Cost,
}

/// Result of an optimizer run.
#[derive(Debug, Clone)]
pub struct OptimizeResult {
    /// The best solution found. The district is left in this state.
    pub best: Solution,

    /// Cost of the best solution.
    pub best_cost: Cost,

    /// Cost of the starting layout.
    pub initial_cost: Cost,

    /// Total number of iterations, skipped swaps included.
    pub iterations: usize,

    /// Swaps that were performed and priced.
    pub evaluated_moves: usize,

    /// Swaps skipped because a battery was empty or could not absorb the
    /// demand difference.
    pub skipped_moves: usize,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of improving moves.
    pub improving_moves: usize,

    /// Acceptance probability when the run stopped.
    pub final_acceptance: f64,

    /// Cost of the working layout after every accepted move.
    pub cost_history: Vec<Cost>,

    /// Best cost after every iteration.
    pub best_history: Vec<Cost>,
}
