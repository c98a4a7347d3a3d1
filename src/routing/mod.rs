//! Cable routing between grid cells.
//!
//! [`path_distance`] finds the closest pair of cells between two paths and
//! [`PathFinder`] connects such a pair with an L-shaped walk that steers
//! clear of foreign batteries.

mod distance;
mod finder;

pub use distance::{min_distance_to_any, path_distance, Closest};
pub use finder::{direct_cells, elbow_cells, Anchor, PathFinder, Route, RoutingConfig};
