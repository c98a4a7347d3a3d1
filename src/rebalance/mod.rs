//! Repair of houses the initial assignment could not place.
//!
//! For each unplaced house the battery with the most room becomes the
//! destination. Its lowest-priority houses (the most recently added) are
//! first moved to helper batteries that can take them; if that does not
//! free enough room, destination and helper trade houses, always picking
//! the trade that frees the most room, until no trade helps. This is a
//! local repair: a house can stay unplaced, which is reported, not raised.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::grid::{BatteryId, HouseId};
use crate::model::District;

/// Rebalancing limits.
///
/// # Examples
///
/// ```
/// use u_smartgrid::rebalance::RebalanceConfig;
///
/// let config = RebalanceConfig::default().with_lookahead(5);
/// assert_eq!(config.lookahead, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebalanceConfig {
    /// How many of a battery's most recently added houses are candidates
    /// for moves and trades.
    pub lookahead: usize,
}

impl Default for RebalanceConfig {
    fn default() -> Self {
        Self { lookahead: 10 }
    }
}

impl RebalanceConfig {
    pub fn with_lookahead(mut self, n: usize) -> Self {
        self.lookahead = n;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.lookahead == 0 {
            return Err(Error::InvalidConfig("lookahead must be at least 1".into()));
        }
        Ok(())
    }
}

/// Outcome of a repair pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebalanceReport {
    /// Houses that found a battery.
    pub placed: Vec<HouseId>,
    /// Houses still without a battery.
    pub unplaced: Vec<HouseId>,
    /// Houses moved from a destination to a helper.
    pub moves: usize,
    /// Pairwise trades between destination and helper.
    pub swaps: usize,
}

/// Makes room for unplaced houses by shuffling assigned ones.
#[derive(Debug, Clone, Default)]
pub struct Rebalancer {
    config: RebalanceConfig,
}

impl Rebalancer {
    pub fn new(config: RebalanceConfig) -> Self {
        Self { config }
    }

    /// Tries to place every house in `unplaced`, in order.
    pub fn repair(&self, district: &mut District, unplaced: &[HouseId]) -> Result<RebalanceReport> {
        let mut report = RebalanceReport::default();
        for &house in unplaced {
            if self.place(district, house, &mut report)? {
                report.placed.push(house);
            } else {
                warn!(house = %house, "no feasible trade found, house stays unplaced");
                report.unplaced.push(house);
            }
        }
        debug!(
            placed = report.placed.len(),
            unplaced = report.unplaced.len(),
            moves = report.moves,
            swaps = report.swaps,
            "rebalancing finished"
        );
        Ok(report)
    }

    fn place(&self, district: &mut District, house: HouseId, report: &mut RebalanceReport) -> Result<bool> {
        let mut order: Vec<BatteryId> = district.batteries().iter().map(|b| b.id).collect();
        order.sort_by(|a, b| {
            let ra = district.batteries()[a.0].remaining();
            let rb = district.batteries()[b.0].remaining();
            rb.total_cmp(&ra)
        });
        let Some((&destination, helpers)) = order.split_first() else {
            return Ok(false);
        };

        if district.can_host(destination, house)? {
            district.assign(house, destination)?;
            return Ok(true);
        }

        for &helper in helpers {
            for candidate in self.low_priority(district, destination)? {
                let demand = district.house(candidate)?.demand;
                if !district.battery(helper)?.fits(demand) {
                    continue;
                }
                district.unassign(candidate)?;
                district.assign(candidate, helper)?;
                report.moves += 1;

                if district.can_host(destination, house)? {
                    district.assign(house, destination)?;
                    return Ok(true);
                }
            }
        }

        for &helper in helpers {
            while let Some((d, h)) = self.best_trade(district, destination, helper)? {
                district.unassign(d)?;
                district.unassign(h)?;
                district.assign(d, helper)?;
                district.assign(h, destination)?;
                report.swaps += 1;
            }

            if district.can_host(destination, house)? {
                district.assign(house, destination)?;
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Trade that frees the most room in `destination` while fitting in
    /// `helper`, or `None` at a fixed point.
    fn best_trade(
        &self,
        district: &District,
        destination: BatteryId,
        helper: BatteryId,
    ) -> Result<Option<(HouseId, HouseId)>> {
        let room = district.battery(helper)?.remaining();
        let ours = self.low_priority(district, destination)?;
        let theirs = self.low_priority(district, helper)?;

        let mut best = None;
        let mut best_gain = 0.0;
        for &d in &ours {
            let dd = district.house(d)?.demand;
            for &h in &theirs {
                let gain = dd - district.house(h)?.demand;
                if gain > best_gain && gain <= room {
                    best_gain = gain;
                    best = Some((d, h));
                }
            }
        }
        Ok(best)
    }

    /// The battery's most recently added houses, newest first.
    fn low_priority(&self, district: &District, battery: BatteryId) -> Result<Vec<HouseId>> {
        Ok(district
            .battery(battery)?
            .houses()
            .iter()
            .rev()
            .take(self.config.lookahead)
            .copied()
            .collect())
    }
}
