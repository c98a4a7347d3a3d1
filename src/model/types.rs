//! Input records and the house/battery entities.

use crate::grid::{BatteryId, HouseId, Point};

/// Fixed cost charged for a battery read from plain input records.
pub const DEFAULT_BATTERY_COST: u64 = 5000;

/// Slack used in every capacity comparison.
///
/// Demands are fractional; removing and re-adding them during swaps must
/// not turn a feasible move into a rejected one through rounding.
pub const CAPACITY_EPSILON: f64 = 1e-9;

/// A house as supplied by an external loader.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HouseRecord {
    pub id: u32,
    pub x: i32,
    pub y: i32,
    pub demand: f64,
}

/// A battery as supplied by an external loader or placement collaborator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatteryRecord {
    pub id: u32,
    pub x: i32,
    pub y: i32,
    pub capacity: f64,
    pub fixed_cost: u64,
}

impl BatteryRecord {
    /// Record with the default fixed cost.
    pub fn new(id: u32, x: i32, y: i32, capacity: f64) -> Self {
        Self {
            id,
            x,
            y,
            capacity,
            fixed_cost: DEFAULT_BATTERY_COST,
        }
    }

    /// Record sized and priced by a tier.
    pub fn from_tier(id: u32, x: i32, y: i32, tier: BatteryTier) -> Self {
        Self {
            id,
            x,
            y,
            capacity: tier.capacity(),
            fixed_cost: tier.cost(),
        }
    }
}

/// Battery sizes a placement collaborator can choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BatteryTier {
    Large,
    Medium,
    Small,
}

impl BatteryTier {
    pub fn capacity(self) -> f64 {
        match self {
            BatteryTier::Large => 1800.0,
            BatteryTier::Medium => 900.0,
            BatteryTier::Small => 450.0,
        }
    }

    pub fn cost(self) -> u64 {
        match self {
            BatteryTier::Large => 1800,
            BatteryTier::Medium => 1350,
            BatteryTier::Small => 900,
        }
    }

    /// Smallest tier whose capacity covers `output`, or `Large`.
    pub fn for_output(output: f64) -> Self {
        if output > BatteryTier::Medium.capacity() {
            BatteryTier::Large
        } else if output > BatteryTier::Small.capacity() {
            BatteryTier::Medium
        } else {
            BatteryTier::Small
        }
    }
}

/// A house in the district.
#[derive(Debug, Clone, PartialEq)]
pub struct House {
    pub id: HouseId,
    /// Id from the input record.
    pub label: u32,
    pub position: Point,
    pub demand: f64,
    /// Back-reference to the battery the house draws from.
    pub battery: Option<BatteryId>,
}

/// A battery in the district.
///
/// The battery owns the assignment relation: the ordered list of houses it
/// serves and its remaining capacity. Insertion order matters, since later
/// houses are treated as lower priority by the rebalancer and seed the
/// stub paths of the cable tree in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct Battery {
    pub id: BatteryId,
    pub label: u32,
    pub position: Point,
    pub capacity: f64,
    pub fixed_cost: u64,
    pub(crate) remaining: f64,
    pub(crate) houses: Vec<HouseId>,
}

impl Battery {
    pub(crate) fn new(id: BatteryId, record: &BatteryRecord) -> Self {
        Self {
            id,
            label: record.id,
            position: Point::new(record.x, record.y),
            capacity: record.capacity,
            fixed_cost: record.fixed_cost,
            remaining: record.capacity,
            houses: Vec::new(),
        }
    }

    /// Capacity minus the demand of every assigned house.
    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Assigned houses, in assignment order.
    pub fn houses(&self) -> &[HouseId] {
        &self.houses
    }

    /// True when a demand fits into the remaining capacity.
    pub fn fits(&self, demand: f64) -> bool {
        self.remaining + CAPACITY_EPSILON >= demand
    }
}
