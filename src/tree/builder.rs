//! Greedy nearest-pair merging of stub paths.

use std::collections::HashSet;

use tracing::debug;

use super::stubs::{StubKey, StubSet};
use crate::error::{Error, Result};
use crate::grid::{BatteryId, Point, SpatialIndex};
use crate::routing::{path_distance, Closest, PathFinder, RoutingConfig};

/// A finished cable tree of one battery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    /// Every cell of the tree once, in order of first appearance.
    pub final_path: Vec<Point>,
    /// Number of merge steps taken to build it.
    pub merges: usize,
}

/// Merges a battery's stub paths into a single tree.
///
/// Each step joins the two closest stubs with a routed connector. This is
/// a Prim-like greedy pass and gives no Steiner-optimality guarantee.
#[derive(Debug)]
pub struct TreeBuilder<'g, G> {
    finder: PathFinder<'g, G>,
    owner: BatteryId,
}

impl<'g, G: SpatialIndex> TreeBuilder<'g, G> {
    pub fn new(grid: &'g G, owner: BatteryId) -> Self {
        Self {
            finder: PathFinder::new(grid, owner),
            owner,
        }
    }

    pub fn with_routing(mut self, config: RoutingConfig) -> Self {
        self.finder = self.finder.with_config(config);
        self
    }

    /// Builds the tree connecting `battery` with every house position.
    pub fn build<I>(&self, battery: Point, houses: I) -> Result<Tree>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut stubs = StubSet::seeded(battery, houses);
        let merges = self.merge_all(&mut stubs)?;
        let path = stubs.into_single().unwrap_or_else(|| vec![battery]);
        Ok(Tree {
            final_path: dedup_path(&path),
            merges,
        })
    }

    /// Merges until at most one stub is left and returns the merge count.
    pub fn merge_all(&self, stubs: &mut StubSet) -> Result<usize> {
        let mut merges = 0;
        while stubs.len() > 1 {
            self.merge_step(stubs)?;
            merges += 1;
        }
        Ok(merges)
    }

    /// Joins the closest pair of stubs.
    ///
    /// Pairs are scanned in key order (`i < j`) and the first pair with the
    /// smallest distance wins. Fails when no pair has a distance, which only
    /// happens if an empty path was pushed.
    pub fn merge_step(&self, stubs: &mut StubSet) -> Result<()> {
        let Some((first, second, closest)) = closest_pair(stubs) else {
            return Err(Error::InvalidInput(format!(
                "no mergeable stub pair for battery {}, a stub path is empty",
                self.owner
            )));
        };

        let route = {
            let open: Vec<&[Point]> = stubs
                .iter()
                .filter(|(k, _)| *k != first && *k != second)
                .map(|(_, path)| path)
                .collect();
            self.finder.route(closest.a, closest.b, &open)?
        };

        debug!(
            battery = %self.owner,
            distance = closest.distance,
            offset = route.offset,
            remaining = stubs.len() - 1,
            "merged stub paths"
        );
        stubs.merge(first, second, route.cells);
        Ok(())
    }
}

/// Closest pair of stubs over all unordered pairs.
fn closest_pair(stubs: &StubSet) -> Option<(StubKey, StubKey, Closest)> {
    let keys = stubs.keys();
    let mut best: Option<(StubKey, StubKey, Closest)> = None;

    for (i, &ki) in keys.iter().enumerate() {
        let a = stubs.get(ki)?;
        for &kj in &keys[i + 1..] {
            let b = stubs.get(kj)?;
            let Some(c) = path_distance(a, b) else {
                continue;
            };
            if best.is_none_or(|(_, _, bc)| c.distance < bc.distance) {
                best = Some((ki, kj, c));
            }
        }
    }

    best
}

/// Drops repeated cells, keeping the first occurrence of each.
pub fn dedup_path(path: &[Point]) -> Vec<Point> {
    let mut seen = HashSet::with_capacity(path.len());
    path.iter().copied().filter(|p| seen.insert(*p)).collect()
}
