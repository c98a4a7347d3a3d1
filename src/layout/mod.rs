//! Cable layouts derived from an assignment.
//!
//! A layout is recomputed from the district's assignment; it never feeds
//! back into it. Cables only reach the spatial index through
//! [`Layout::materialize`], after the trees are final.

use std::collections::{HashMap, HashSet, VecDeque};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::grid::{BatteryId, HouseId, Occupant, Point, SpatialIndex};
use crate::model::District;
use crate::routing::{direct_cells, RoutingConfig};
use crate::tree::{dedup_path, TreeBuilder};

/// How houses are wired to their battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CableMode {
    /// One merged tree per battery; houses share cable cells.
    #[default]
    Shared,
    /// Every house gets its own horizontal-then-vertical cable.
    Individual,
}

/// Cable cells that carry one house's power to its battery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseRoute {
    pub house: HouseId,
    /// From the house cell up to, not including, the battery cell.
    pub cables: Vec<Point>,
}

/// Finished wiring of one battery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatteryLayout {
    pub battery: BatteryId,
    pub position: Point,
    pub mode: CableMode,
    /// Unique cells of the battery's wiring, battery cell included.
    pub final_path: Vec<Point>,
    /// One entry per cable. Never contains the battery cell.
    pub cables: Vec<Point>,
    /// Merge steps spent on the tree (zero in individual mode).
    pub merges: usize,
}

impl BatteryLayout {
    /// Merged tree over the battery's current houses.
    pub fn shared<G: SpatialIndex>(
        district: &District,
        battery: BatteryId,
        grid: &G,
        routing: RoutingConfig,
    ) -> Result<Self> {
        let b = district.battery(battery)?;
        let houses = b
            .houses()
            .iter()
            .map(|&h| district.house(h).map(|h| h.position))
            .collect::<Result<Vec<_>>>()?;

        let tree = TreeBuilder::new(grid, battery)
            .with_routing(routing)
            .build(b.position, houses)?;
        let cables = tree
            .final_path
            .iter()
            .copied()
            .filter(|&c| c != b.position)
            .collect();

        Ok(Self {
            battery,
            position: b.position,
            mode: CableMode::Shared,
            final_path: tree.final_path,
            cables,
            merges: tree.merges,
        })
    }

    /// Separate direct cable per house, no merging, no obstacle checks.
    pub fn individual(district: &District, battery: BatteryId) -> Result<Self> {
        let b = district.battery(battery)?;
        let mut all = vec![b.position];
        let mut cables = Vec::new();
        for &h in b.houses() {
            let cells = direct_cells(district.house(h)?.position, b.position);
            cables.extend(cells.iter().copied().filter(|&c| c != b.position));
            all.extend(cells);
        }

        Ok(Self {
            battery,
            position: b.position,
            mode: CableMode::Individual,
            final_path: dedup_path(&all),
            cables,
            merges: 0,
        })
    }

    pub fn cable_count(&self) -> usize {
        self.cables.len()
    }

    /// Cable cells attributed to each assigned house.
    ///
    /// In shared mode a house's cables are the tree cells on the walk from
    /// the house to the battery; cells near the battery therefore appear
    /// under several houses.
    pub fn house_routes(&self, district: &District) -> Result<Vec<HouseRoute>> {
        let b = district.battery(self.battery)?;
        match self.mode {
            CableMode::Individual => b
                .houses()
                .iter()
                .map(|&h| {
                    let cells = direct_cells(district.house(h)?.position, self.position);
                    Ok(HouseRoute {
                        house: h,
                        cables: cells.into_iter().filter(|&c| c != self.position).collect(),
                    })
                })
                .collect(),
            CableMode::Shared => {
                let parents = self.spanning_parents();
                b.houses()
                    .iter()
                    .map(|&h| {
                        let start = district.house(h)?.position;
                        Ok(HouseRoute {
                            house: h,
                            cables: self.walk_to_battery(start, &parents),
                        })
                    })
                    .collect()
            }
        }
    }

    /// Breadth-first parent links over the tree cells, rooted at the battery.
    fn spanning_parents(&self) -> HashMap<Point, Point> {
        const STEPS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

        let cells: HashSet<Point> = self.final_path.iter().copied().collect();
        let mut parents = HashMap::with_capacity(cells.len());
        let mut queue = VecDeque::from([self.position]);
        parents.insert(self.position, self.position);

        while let Some(cell) = queue.pop_front() {
            for (dx, dy) in STEPS {
                let next = Point::new(cell.x + dx, cell.y + dy);
                if cells.contains(&next) && !parents.contains_key(&next) {
                    parents.insert(next, cell);
                    queue.push_back(next);
                }
            }
        }
        parents
    }

    fn walk_to_battery(&self, start: Point, parents: &HashMap<Point, Point>) -> Vec<Point> {
        let mut walk = Vec::new();
        let mut cell = start;
        while cell != self.position {
            let Some(&parent) = parents.get(&cell) else {
                return Vec::new();
            };
            walk.push(cell);
            cell = parent;
        }
        walk
    }
}

/// Wiring of every battery in a district.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    mode: CableMode,
    batteries: Vec<BatteryLayout>,
}

impl Layout {
    /// Builds the wiring of every battery for the current assignment.
    ///
    /// Trees of different batteries are independent; with the `parallel`
    /// feature they are built concurrently.
    pub fn build<G: SpatialIndex>(
        district: &District,
        grid: &G,
        mode: CableMode,
        routing: RoutingConfig,
    ) -> Result<Self> {
        let one = |id: BatteryId| match mode {
            CableMode::Shared => BatteryLayout::shared(district, id, grid, routing),
            CableMode::Individual => BatteryLayout::individual(district, id),
        };

        #[cfg(feature = "parallel")]
        let batteries = district
            .batteries()
            .par_iter()
            .map(|b| one(b.id))
            .collect::<Result<Vec<_>>>()?;

        #[cfg(not(feature = "parallel"))]
        let batteries = district
            .batteries()
            .iter()
            .map(|b| one(b.id))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { mode, batteries })
    }

    /// Rebuilds the wiring of `ids` and returns the layouts it replaced.
    ///
    /// Every new layout is built before any is swapped in, so on error the
    /// layout is unchanged.
    pub fn rebuild<G: SpatialIndex>(
        &mut self,
        district: &District,
        grid: &G,
        routing: RoutingConfig,
        ids: &[BatteryId],
    ) -> Result<Vec<BatteryLayout>> {
        let mut fresh = Vec::with_capacity(ids.len());
        for &id in ids {
            if id.0 >= self.batteries.len() {
                return Err(Error::UnknownBattery(id));
            }
            fresh.push(match self.mode {
                CableMode::Shared => BatteryLayout::shared(district, id, grid, routing)?,
                CableMode::Individual => BatteryLayout::individual(district, id)?,
            });
        }
        fresh.into_iter().map(|l| self.replace(l)).collect()
    }

    /// Swaps in a battery layout and returns the previous one.
    pub fn replace(&mut self, layout: BatteryLayout) -> Result<BatteryLayout> {
        let slot = self
            .batteries
            .get_mut(layout.battery.0)
            .ok_or(Error::UnknownBattery(layout.battery))?;
        Ok(std::mem::replace(slot, layout))
    }

    pub fn mode(&self) -> CableMode {
        self.mode
    }

    pub fn batteries(&self) -> &[BatteryLayout] {
        &self.batteries
    }

    pub fn battery(&self, id: BatteryId) -> Option<&BatteryLayout> {
        self.batteries.get(id.0)
    }

    /// Total number of cables, summed per battery.
    pub fn cable_count(&self) -> usize {
        self.batteries.iter().map(BatteryLayout::cable_count).sum()
    }

    /// Places one cable occupant per cable on the grid.
    pub fn materialize<G: SpatialIndex>(&self, grid: &mut G) {
        for b in &self.batteries {
            for &cell in &b.cables {
                grid.place(Occupant::Cable(b.battery), cell);
            }
        }
    }
}
