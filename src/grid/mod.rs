//! Grid primitives and the spatial index contract.
//!
//! Everything in the engine lives on an integer lattice. The spatial index
//! is the only place that knows what occupies a cell; routing asks it about
//! batteries and layouts hand it finished cables.

mod index;
mod types;

pub use index::{MultiGrid, SpatialIndex};
pub use types::{BatteryId, HouseId, Occupant, Point};
