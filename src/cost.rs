//! Layout cost.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::model::District;

/// Cost of a layout, or the marker for a district with unplaced houses.
///
/// `Infeasible` compares greater than every feasible cost, so "lower is
/// better" comparisons work across both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cost {
    Feasible(u64),
    Infeasible,
}

impl Cost {
    /// The numeric cost, if feasible.
    pub fn value(self) -> Option<u64> {
        match self {
            Cost::Feasible(v) => Some(v),
            Cost::Infeasible => None,
        }
    }

    pub fn is_feasible(self) -> bool {
        matches!(self, Cost::Feasible(_))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Cost::Feasible(a), Cost::Feasible(b)) => a.cmp(b),
            (Cost::Feasible(_), Cost::Infeasible) => Ordering::Less,
            (Cost::Infeasible, Cost::Feasible(_)) => Ordering::Greater,
            (Cost::Infeasible, Cost::Infeasible) => Ordering::Equal,
        }
    }
}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Feasible(v) => write!(f, "{v}"),
            Cost::Infeasible => f.write_str("infeasible"),
        }
    }
}

/// Prices a layout: `cable_cost` per cable plus every battery's fixed cost.
///
/// # Examples
///
/// ```
/// use u_smartgrid::cost::CostModel;
///
/// let model = CostModel::default();
/// assert_eq!(model.cable_cost, 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostModel {
    pub cable_cost: u64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self { cable_cost: 9 }
    }
}

impl CostModel {
    pub fn with_cable_cost(mut self, cost: u64) -> Self {
        self.cable_cost = cost;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.cable_cost == 0 {
            return Err(Error::InvalidConfig("cable_cost must be positive".into()));
        }
        Ok(())
    }

    /// Total cost, or [`Cost::Infeasible`] if any house lacks a battery.
    pub fn cost(&self, district: &District, layout: &Layout) -> Cost {
        if !district.is_fully_assigned() {
            return Cost::Infeasible;
        }
        let cables = layout.cable_count() as u64 * self.cable_cost;
        let batteries: u64 = district.batteries().iter().map(|b| b.fixed_cost).sum();
        Cost::Feasible(cables + batteries)
    }
}
