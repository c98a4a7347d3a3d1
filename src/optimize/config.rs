//! Optimizer configuration and acceptance schedules.

use crate::error::{Error, Result};

/// Which worsening moves the optimizer may keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Only strictly improving swaps are kept.
    #[default]
    HillClimbing,
    /// Worsening swaps are kept with the current acceptance probability.
    Annealing,
}

/// How the acceptance probability decays.
///
/// The probability moves once per evaluated swap; skipped iterations do
/// not advance it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoolingSchedule {
    /// Geometric decay: `p_{k+1} = alpha * p_k`.
    Geometric {
        /// Decay factor in (0, 1). Higher = slower cooling.
        alpha: f64,
    },

    /// Linear decay from the initial probability to zero over the
    /// iteration budget.
    Linear,
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.99 }
    }
}

/// Configuration for the swap optimizer.
///
/// # Examples
///
/// ```
/// use u_smartgrid::optimize::{CoolingSchedule, OptimizerConfig, SearchMode};
///
/// let config = OptimizerConfig::default()
///     .with_iterations(500)
///     .with_mode(SearchMode::Annealing)
///     .with_cooling(CoolingSchedule::Geometric { alpha: 0.98 })
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    /// Iteration budget, skipped swaps included.
    pub iterations: usize,

    pub mode: SearchMode,

    /// Acceptance probability before the first evaluated swap.
    pub initial_acceptance: f64,

    pub cooling: CoolingSchedule,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            mode: SearchMode::default(),
            initial_acceptance: 1.0,
            cooling: CoolingSchedule::default(),
            seed: None,
        }
    }
}

impl OptimizerConfig {
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_initial_acceptance(mut self, p: f64) -> Self {
        self.initial_acceptance = p;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.initial_acceptance) {
            return Err(Error::InvalidConfig(format!(
                "initial_acceptance must be in [0, 1], got {}",
                self.initial_acceptance
            )));
        }
        if let CoolingSchedule::Geometric { alpha } = self.cooling {
            if alpha <= 0.0 || alpha >= 1.0 {
                return Err(Error::InvalidConfig(format!(
                    "geometric alpha must be in (0, 1), got {alpha}"
                )));
            }
        }
        Ok(())
    }

    /// Acceptance probability after `evaluated` swaps, given the previous one.
    pub(crate) fn cool(&self, acceptance: f64, evaluated: usize) -> f64 {
        match self.cooling {
            CoolingSchedule::Geometric { alpha } => acceptance * alpha,
            CoolingSchedule::Linear => {
                if self.iterations == 0 {
                    0.0
                } else {
                    let left = 1.0 - evaluated as f64 / self.iterations as f64;
                    (self.initial_acceptance * left).max(0.0)
                }
            }
        }
    }
}
