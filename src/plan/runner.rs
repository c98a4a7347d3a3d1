//! End-to-end planning of one district.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use super::config::{PlanConfig, Strategy};
use crate::assign::{AssignmentEngine, AssignmentStrategy};
use crate::cost::Cost;
use crate::error::Result;
use crate::grid::{HouseId, SpatialIndex};
use crate::layout::{CableMode, Layout};
use crate::model::District;
use crate::optimize::{improvement, OptimizeResult, Optimizer, SearchMode};
use crate::rebalance::{RebalanceReport, Rebalancer};
use crate::report::DistrictReport;

/// Outcome of a planning run.
#[derive(Debug, Clone)]
pub struct Plan {
    pub strategy: Strategy,
    pub layout: Layout,
    pub cost: Cost,
    /// Houses no battery could take. Non-empty means `cost` is infeasible.
    pub unplaced: Vec<HouseId>,
    pub rebalance: RebalanceReport,
    /// Optimizer statistics, absent for [`Strategy::Individual`].
    pub optimization: Option<OptimizeResult>,
}

impl Plan {
    pub fn is_feasible(&self) -> bool {
        self.cost.is_feasible()
    }

    /// Output records for the planned district.
    pub fn report(&self, district: &District) -> Result<DistrictReport> {
        DistrictReport::new(district, &self.layout, self.cost)
    }
}

/// Runs assignment, rebalancing, wiring and optimization in order.
pub struct Planner;

impl Planner {
    /// Plans `district` on an empty `grid`.
    ///
    /// Houses and batteries are placed on the grid first; the final cables
    /// are placed once the layout is settled. Unplaceable houses do not
    /// fail the run, they make the plan infeasible.
    pub fn solve<G: SpatialIndex>(
        district: &mut District,
        grid: &mut G,
        config: &PlanConfig,
    ) -> Result<Plan> {
        config.validate()?;
        info!(
            district = district.id(),
            strategy = ?config.strategy,
            houses = district.houses().len(),
            batteries = district.batteries().len(),
            "planning started"
        );

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        district.place_on(grid);

        let assignment = match config.strategy {
            Strategy::Individual | Strategy::Shared => AssignmentStrategy::Nearest,
            Strategy::Annealing => AssignmentStrategy::Random,
        };
        let unplaced = AssignmentEngine::run(district, assignment, &mut rng)?;
        let rebalance = Rebalancer::new(config.rebalance).repair(district, &unplaced)?;
        if !rebalance.unplaced.is_empty() {
            warn!(
                unplaced = rebalance.unplaced.len(),
                "district stays infeasible after rebalancing"
            );
        }

        let mode = match config.strategy {
            Strategy::Individual => CableMode::Individual,
            Strategy::Shared | Strategy::Annealing => CableMode::Shared,
        };
        let mut layout = Layout::build(district, &*grid, mode, config.routing)?;

        let search = match config.strategy {
            Strategy::Individual => None,
            Strategy::Shared => Some(SearchMode::HillClimbing),
            Strategy::Annealing => Some(SearchMode::Annealing),
        };
        let optimization = match search {
            Some(search) => {
                let mut optimizer = config.optimizer.clone().with_mode(search);
                if optimizer.seed.is_none() {
                    optimizer.seed = Some(rng.random());
                }
                let result = Optimizer::new(optimizer)
                    .with_cost_model(config.cost)
                    .with_routing(config.routing)
                    .run(district, &mut layout, &*grid)?;
                Some(result)
            }
            None => None,
        };

        layout.materialize(grid);
        let cost = config.cost.cost(district, &layout);

        info!(
            district = district.id(),
            cost = %cost,
            saved = ?optimization
                .as_ref()
                .and_then(|r| improvement(r.initial_cost, r.best_cost)),
            "planning finished"
        );

        Ok(Plan {
            strategy: config.strategy,
            layout,
            cost,
            unplaced: rebalance.unplaced.clone(),
            rebalance,
            optimization,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{MultiGrid, Occupant, Point};
    use crate::model::{BatteryRecord, HouseRecord};
    use crate::optimize::OptimizerConfig;

    fn district() -> District {
        let houses: Vec<_> = (0..24)
            .map(|i| HouseRecord {
                id: i,
                x: (i * 5 % 30) as i32,
                y: (i * 7 % 30) as i32 + 2,
                demand: 20.0 + (i % 3) as f64 * 10.0,
            })
            .collect();
        let batteries = [
            BatteryRecord::new(1, 0, 0, 300.0),
            BatteryRecord::new(2, 30, 0, 300.0),
            BatteryRecord::new(3, 15, 40, 300.0),
        ];
        District::new(1, &houses, &batteries).unwrap()
    }

    fn config(strategy: Strategy) -> PlanConfig {
        PlanConfig::default()
            .with_strategy(strategy)
            .with_optimizer(OptimizerConfig::default().with_iterations(60))
            .with_seed(11)
    }

    #[test]
    fn test_individual_plan() {
        let mut d = district();
        let mut grid = MultiGrid::new();
        let plan = Planner::solve(&mut d, &mut grid, &config(Strategy::Individual)).unwrap();

        assert!(plan.is_feasible());
        assert!(plan.optimization.is_none());
        assert_eq!(plan.layout.mode(), CableMode::Individual);
        let manhattan: usize = d
            .houses()
            .iter()
            .map(|h| {
                let b = d.battery(h.battery.unwrap()).unwrap();
                h.position.manhattan(b.position) as usize
            })
            .sum();
        assert_eq!(plan.layout.cable_count(), manhattan);
    }

    #[test]
    fn test_shared_plan_beats_individual() {
        let mut d = district();
        let mut grid = MultiGrid::new();
        let individual = Planner::solve(&mut d, &mut grid, &config(Strategy::Individual)).unwrap();

        let mut d = district();
        let mut grid = MultiGrid::new();
        let shared = Planner::solve(&mut d, &mut grid, &config(Strategy::Shared)).unwrap();

        assert!(shared.is_feasible());
        assert!(shared.cost < individual.cost);
        let result = shared.optimization.as_ref().unwrap();
        assert_eq!(result.accepted_moves, result.improving_moves);
        assert_eq!(shared.cost, result.best_cost);
    }

    #[test]
    fn test_annealing_plan_is_reproducible() {
        let run = || {
            let mut d = district();
            let mut grid = MultiGrid::new();
            let plan = Planner::solve(&mut d, &mut grid, &config(Strategy::Annealing)).unwrap();
            (plan.cost, d.assignment())
        };
        let (cost, assignment) = run();
        assert!(cost.is_feasible());
        assert_eq!(run(), (cost, assignment));
    }

    #[test]
    fn test_cables_are_materialized() {
        let mut d = district();
        let mut grid = MultiGrid::new();
        let plan = Planner::solve(&mut d, &mut grid, &config(Strategy::Shared)).unwrap();

        let b0 = &plan.layout.batteries()[0];
        let cell = b0.cables[0];
        assert!(grid.at(cell).contains(&Occupant::Cable(b0.battery)));
        assert_eq!(grid.at(Point::new(0, 0)), &[Occupant::Battery(b0.battery)]);
    }

    #[test]
    fn test_insufficient_capacity_gives_infeasible_plan() {
        let houses = [
            HouseRecord { id: 1, x: 0, y: 0, demand: 40.0 },
            HouseRecord { id: 2, x: 1, y: 0, demand: 40.0 },
            HouseRecord { id: 3, x: 2, y: 0, demand: 40.0 },
        ];
        let batteries = [BatteryRecord::new(1, 5, 5, 100.0)];
        let mut d = District::new(1, &houses, &batteries).unwrap();
        let mut grid = MultiGrid::new();

        let plan = Planner::solve(&mut d, &mut grid, &config(Strategy::Shared)).unwrap();

        assert_eq!(plan.cost, Cost::Infeasible);
        assert_eq!(plan.unplaced.len(), 1);
        assert!(plan.report(&d).is_ok());
    }

    #[test]
    fn test_second_battery_makes_plan_feasible() {
        let houses = [
            HouseRecord { id: 1, x: 0, y: 0, demand: 40.0 },
            HouseRecord { id: 2, x: 1, y: 0, demand: 40.0 },
            HouseRecord { id: 3, x: 2, y: 0, demand: 40.0 },
        ];
        let batteries = [
            BatteryRecord::new(1, 5, 5, 100.0),
            BatteryRecord::new(2, 9, 9, 100.0),
        ];
        let mut d = District::new(1, &houses, &batteries).unwrap();
        let mut grid = MultiGrid::new();

        let plan = Planner::solve(&mut d, &mut grid, &config(Strategy::Shared)).unwrap();

        assert!(plan.is_feasible());
        assert!(plan.unplaced.is_empty());
        let report = plan.report(&d).unwrap();
        let placed: usize = report.batteries.iter().map(|b| b.houses.len()).sum();
        assert_eq!(placed, 3);
    }
}
