//! Pipeline configuration.

use crate::cost::CostModel;
use crate::error::Result;
use crate::optimize::OptimizerConfig;
use crate::rebalance::RebalanceConfig;
use crate::routing::RoutingConfig;

/// Which pipeline the planner runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// Nearest-first assignment, one direct cable per house, no optimization.
    Individual,
    /// Nearest-first assignment, merged trees, hill climbing.
    #[default]
    Shared,
    /// Random first-fit assignment, merged trees, annealing.
    Annealing,
}

/// Configuration for a full planning run.
///
/// # Examples
///
/// ```
/// use u_smartgrid::plan::{PlanConfig, Strategy};
/// use u_smartgrid::optimize::OptimizerConfig;
///
/// let config = PlanConfig::default()
///     .with_strategy(Strategy::Annealing)
///     .with_optimizer(OptimizerConfig::default().with_iterations(200))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlanConfig {
    pub strategy: Strategy,

    /// Search settings. The mode is overridden by the strategy.
    pub optimizer: OptimizerConfig,

    pub rebalance: RebalanceConfig,

    pub routing: RoutingConfig,

    pub cost: CostModel,

    /// Seed for random assignment, and for the optimizer when it has none
    /// of its own.
    pub seed: Option<u64>,
}

impl PlanConfig {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn with_rebalance(mut self, rebalance: RebalanceConfig) -> Self {
        self.rebalance = rebalance;
        self
    }

    pub fn with_routing(mut self, routing: RoutingConfig) -> Self {
        self.routing = routing;
        self
    }

    pub fn with_cost(mut self, cost: CostModel) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates every nested configuration.
    pub fn validate(&self) -> Result<()> {
        self.optimizer.validate()?;
        self.rebalance.validate()?;
        self.routing.validate()?;
        self.cost.validate()
    }
}
