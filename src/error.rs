//! Crate error type.
//!
//! Only genuine misuse surfaces here. Houses that cannot be placed,
//! infeasible swaps and rebalancing dead ends are ordinary outcomes and are
//! reported as values (see [`crate::cost::Cost::Infeasible`]).

use thiserror::Error;

use crate::grid::{BatteryId, HouseId, Point};

/// Errors raised by the smart-grid engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// An input record is malformed (non-finite demand, duplicate id, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A house id does not belong to the district.
    #[error("unknown house {0}")]
    UnknownHouse(HouseId),

    /// A battery id does not belong to the district.
    #[error("unknown battery {0}")]
    UnknownBattery(BatteryId),

    /// The house is already connected to a battery.
    #[error("house {house} is already assigned to battery {battery}")]
    AlreadyAssigned { house: HouseId, battery: BatteryId },

    /// The house has no battery to be removed from.
    #[error("house {0} has no battery")]
    Unassigned(HouseId),

    /// The house is not connected to the battery it was removed from.
    #[error("house {house} is not assigned to battery {battery}")]
    NotAssigned { house: HouseId, battery: BatteryId },

    /// Assigning the house would exceed the battery's capacity.
    #[error("battery {battery} has {remaining} left, house {house} needs {demand}")]
    CapacityExceeded {
        battery: BatteryId,
        house: HouseId,
        remaining: f64,
        demand: f64,
    },

    /// Every elbow offset within the detour bound crosses a foreign battery.
    ///
    /// This means the grid is too crowded for the configured
    /// `max_detour`, not that the route search is wrong.
    #[error("no unobstructed route from {from} to {to} within {max_detour} detour rows")]
    RouteBlocked {
        from: Point,
        to: Point,
        max_detour: i32,
    },
}

/// Shorthand for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
