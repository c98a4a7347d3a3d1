//! Smart-grid cable layout engine.
//!
//! Connects every house of a district to a capacity-limited battery and
//! lays the cables as cheaply as possible:
//!
//! - **Assignment**: houses with few nearby batteries are placed first,
//!   each on the nearest battery with room (or first-fit in random order).
//! - **Rebalancing**: houses left over are squeezed in by moving and
//!   trading already-assigned houses between batteries.
//! - **Routing**: L-shaped cable walks that shift their elbow row to dodge
//!   foreign batteries.
//! - **Trees**: per battery, stub paths are merged greedily by nearest
//!   pair until one shared cable tree remains.
//! - **Optimization**: pairwise house swaps between batteries, either hill
//!   climbing or annealing with a decaying acceptance probability.
//!
//! # Architecture
//!
//! A [`model::District`] owns houses, batteries and the assignment between
//! them. A [`layout::Layout`] is always derived from that assignment and
//! never feeds back into it. The grid ([`grid::SpatialIndex`]) is only
//! written by explicit placement calls. [`plan::Planner`] runs the whole
//! chain for one district.

pub mod assign;
pub mod cost;
pub mod error;
pub mod grid;
pub mod layout;
pub mod model;
pub mod optimize;
pub mod plan;
pub mod rebalance;
pub mod report;
pub mod routing;
pub mod tree;

pub use error::{Error, Result};
