//! Swap optimizer execution loop.

use rand::rngs::StdRng;
use rand::seq::{index, IndexedRandom};
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::config::{OptimizerConfig, SearchMode};
use super::types::{OptimizeResult, Solution};
use crate::cost::{Cost, CostModel};
use crate::error::Result;
use crate::grid::{BatteryId, HouseId, SpatialIndex};
use crate::layout::Layout;
use crate::model::District;
use crate::routing::RoutingConfig;

/// Improves a layout by swapping houses between batteries.
///
/// Every iteration is a transaction on the district: two batteries trade
/// one house each, only their two trees are rebuilt, and the swap is
/// either kept or rolled back from a partial snapshot. When the run ends
/// the district and layout hold the best solution seen.
#[derive(Debug, Clone, Default)]
pub struct Optimizer {
    config: OptimizerConfig,
    cost_model: CostModel,
    routing: RoutingConfig,
}

impl Optimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_cost_model(mut self, cost_model: CostModel) -> Self {
        self.cost_model = cost_model;
        self
    }

    pub fn with_routing(mut self, routing: RoutingConfig) -> Self {
        self.routing = routing;
        self
    }

    /// Runs the configured number of iterations.
    ///
    /// `grid` must hold the houses and batteries but no cables; routes only
    /// dodge batteries, so each battery's tree can be rebuilt on its own.
    pub fn run<G: SpatialIndex>(
        &self,
        district: &mut District,
        layout: &mut Layout,
        grid: &G,
    ) -> Result<OptimizeResult> {
        self.config.validate()?;

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let mut current_cost = self.cost_model.cost(district, layout);
        let initial_cost = current_cost;
        let mut best = Solution {
            assignment: district.assignment(),
            layout: layout.clone(),
            cost: current_cost,
        };

        let mut acceptance = self.config.initial_acceptance;
        let mut evaluated = 0usize;
        let mut skipped = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut cost_history = Vec::new();
        let mut best_history = Vec::with_capacity(self.config.iterations);

        let batteries = district.batteries().len();
        if batteries < 2 {
            warn!(batteries, "nothing to swap, optimizer needs two batteries");
            return Ok(OptimizeResult {
                best_cost: best.cost,
                best,
                initial_cost,
                iterations: 0,
                evaluated_moves: 0,
                skipped_moves: 0,
                accepted_moves: 0,
                improving_moves: 0,
                final_acceptance: acceptance,
                cost_history,
                best_history,
            });
        }

        info!(
            iterations = self.config.iterations,
            mode = ?self.config.mode,
            initial = %initial_cost,
            "optimizer started"
        );

        for _ in 0..self.config.iterations {
            let Some((a, ha, b, hb)) = self.pick_swap(district, &mut rng)? else {
                skipped += 1;
                best_history.push(best.cost);
                continue;
            };

            let snapshot = district.snapshot(&[a, b])?;
            district.unassign(ha)?;
            district.unassign(hb)?;
            district.assign(ha, b)?;
            district.assign(hb, a)?;
            let previous = match layout.rebuild(district, grid, self.routing, &[a, b]) {
                Ok(previous) => previous,
                Err(e) => {
                    warn!(error = %e, battery_a = %a, battery_b = %b, "swap could not be wired");
                    district.restore(&best.assignment)?;
                    layout.clone_from(&best.layout);
                    return Err(e);
                }
            };
            let new_cost = self.cost_model.cost(district, layout);

            evaluated += 1;
            acceptance = self.config.cool(acceptance, evaluated);

            let improving = new_cost < current_cost;
            let accept = improving
                || (self.config.mode == SearchMode::Annealing
                    && rng.random::<f64>() < acceptance);

            if accept {
                current_cost = new_cost;
                accepted_moves += 1;
                if improving {
                    improving_moves += 1;
                }
                cost_history.push(new_cost);

                if new_cost < best.cost {
                    debug!(cost = %new_cost, evaluated, "new best layout");
                    best = Solution {
                        assignment: district.assignment(),
                        layout: layout.clone(),
                        cost: new_cost,
                    };
                }
            } else {
                district.restore_batteries(&snapshot)?;
                for old in previous {
                    layout.replace(old)?;
                }
            }

            best_history.push(best.cost);
        }

        district.restore(&best.assignment)?;
        layout.clone_from(&best.layout);

        info!(
            best = %best.cost,
            evaluated,
            skipped,
            accepted = accepted_moves,
            "optimizer finished"
        );

        Ok(OptimizeResult {
            best_cost: best.cost,
            best,
            initial_cost,
            iterations: self.config.iterations,
            evaluated_moves: evaluated,
            skipped_moves: skipped,
            accepted_moves,
            improving_moves,
            final_acceptance: acceptance,
            cost_history,
            best_history,
        })
    }

    /// Two distinct batteries and one house from each, or `None` when the
    /// swap is impossible.
    fn pick_swap<R: Rng>(
        &self,
        district: &District,
        rng: &mut R,
    ) -> Result<Option<(BatteryId, HouseId, BatteryId, HouseId)>> {
        let picked = index::sample(rng, district.batteries().len(), 2);
        let (a, b) = (BatteryId(picked.index(0)), BatteryId(picked.index(1)));

        let ha = district.battery(a)?.houses().choose(rng).copied();
        let hb = district.battery(b)?.houses().choose(rng).copied();
        let (Some(ha), Some(hb)) = (ha, hb) else {
            return Ok(None);
        };

        let da = district.house(ha)?.demand;
        let db = district.house(hb)?.demand;
        if district.battery(a)?.fits(db - da) && district.battery(b)?.fits(da - db) {
            Ok(Some((a, ha, b, hb)))
        } else {
            Ok(None)
        }
    }
}

/// Cost difference between two feasible costs, for reporting.
pub fn improvement(from: Cost, to: Cost) -> Option<u64> {
    Some(from.value()?.saturating_sub(to.value()?))
}
