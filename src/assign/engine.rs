//! Initial house-to-battery assignment.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::priority::placement_order;
use crate::error::Result;
use crate::grid::{BatteryId, HouseId};
use crate::model::District;

/// How the initial assignment picks batteries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssignmentStrategy {
    /// Urgent houses first, each to the nearest battery with room.
    #[default]
    Nearest,
    /// Shuffled houses, each to the first battery with room in a fresh
    /// random battery order.
    Random,
}

/// Greedy assignment of unassigned houses.
///
/// Houses that fit nowhere are left unassigned and returned; they are a
/// job for the [`crate::rebalance::Rebalancer`], not an error.
pub struct AssignmentEngine;

impl AssignmentEngine {
    /// Runs the chosen strategy and returns the houses left unplaced.
    pub fn run<R: Rng>(
        district: &mut District,
        strategy: AssignmentStrategy,
        rng: &mut R,
    ) -> Result<Vec<HouseId>> {
        match strategy {
            AssignmentStrategy::Nearest => Self::assign_all(district),
            AssignmentStrategy::Random => Self::assign_random(district, rng),
        }
    }

    /// Nearest-battery assignment in descending priority order.
    pub fn assign_all(district: &mut District) -> Result<Vec<HouseId>> {
        let mut unplaced = Vec::new();
        for house in placement_order(district) {
            match Self::nearest_with_room(district, house)? {
                Some(battery) => district.assign(house, battery)?,
                None => unplaced.push(house),
            }
        }
        debug!(unplaced = unplaced.len(), "nearest assignment finished");
        Ok(unplaced)
    }

    /// Random first-fit assignment.
    pub fn assign_random<R: Rng>(district: &mut District, rng: &mut R) -> Result<Vec<HouseId>> {
        let mut houses = district.unassigned();
        houses.shuffle(rng);
        let mut batteries: Vec<BatteryId> = district.batteries().iter().map(|b| b.id).collect();

        let mut unplaced = Vec::new();
        for house in houses {
            batteries.shuffle(rng);
            let mut target = None;
            for &b in &batteries {
                if district.can_host(b, house)? {
                    target = Some(b);
                    break;
                }
            }
            match target {
                Some(b) => district.assign(house, b)?,
                None => unplaced.push(house),
            }
        }
        debug!(unplaced = unplaced.len(), "random assignment finished");
        Ok(unplaced)
    }

    /// Nearest battery with room for the house; first in id order on ties.
    pub fn nearest_with_room(district: &District, house: HouseId) -> Result<Option<BatteryId>> {
        let h = district.house(house)?;
        let mut best: Option<(BatteryId, u32)> = None;
        for b in district.batteries() {
            if !b.fits(h.demand) {
                continue;
            }
            let d = h.position.manhattan(b.position);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((b.id, d));
            }
        }
        Ok(best.map(|(id, _)| id))
    }
}
