//! Initial assignment of houses to batteries.
//!
//! Houses with few nearby batteries are placed first, each on the nearest
//! battery that still has room.

mod engine;
mod priority;

pub use engine::{AssignmentEngine, AssignmentStrategy};
pub use priority::{placement_order, priority, PRIORITY_RANK};
