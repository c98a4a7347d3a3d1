//! District model: houses, batteries and their assignment.
//!
//! Houses and batteries are plain data. Nothing is placed on a grid as a
//! side effect of construction; see [`District::place_on`].

mod district;
mod types;

pub use district::{Assignment, BatterySnapshot, District};
pub use types::{
    Battery, BatteryRecord, BatteryTier, House, HouseRecord, CAPACITY_EPSILON,
    DEFAULT_BATTERY_COST,
};
