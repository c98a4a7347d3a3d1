//! Spatial index contract and a sparse multi-occupant grid.

use std::collections::HashMap;

use super::types::{BatteryId, Occupant, Point};

/// Query/place contract the engine needs from a spatial grid.
///
/// The storage behind it is up to the implementor. Routing only calls
/// [`SpatialIndex::occupants_at`]; the only writers are
/// [`crate::model::District::place_on`] and
/// [`crate::layout::Layout::materialize`].
pub trait SpatialIndex: Send + Sync {
    /// Returns the occupants of each requested cell, in request order.
    fn occupants_at(&self, cells: &[Point]) -> Vec<Vec<Occupant>>;

    /// Places an occupant on a cell. Cells may hold several occupants.
    fn place(&mut self, occupant: Occupant, cell: Point);

    /// True when any cell holds a battery other than `owner`.
    fn has_foreign_battery(&self, cells: &[Point], owner: BatteryId) -> bool {
        self.occupants_at(cells)
            .iter()
            .flatten()
            .any(|o| o.battery().is_some_and(|id| id != owner))
    }
}

/// Sparse, unbounded grid where every cell holds a list of occupants.
#[derive(Debug, Clone, Default)]
pub struct MultiGrid {
    cells: HashMap<Point, Vec<Occupant>>,
}

impl MultiGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Occupants of a single cell.
    pub fn at(&self, cell: Point) -> &[Occupant] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of cells holding at least one occupant.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Removes every cable, keeping houses and batteries.
    pub fn clear_cables(&mut self) {
        self.cells.retain(|_, occupants| {
            occupants.retain(|o| !matches!(o, Occupant::Cable(_)));
            !occupants.is_empty()
        });
    }
}

impl SpatialIndex for MultiGrid {
    fn occupants_at(&self, cells: &[Point]) -> Vec<Vec<Occupant>> {
        cells.iter().map(|c| self.at(*c).to_vec()).collect()
    }

    fn place(&mut self, occupant: Occupant, cell: Point) {
        self.cells.entry(cell).or_default().push(occupant);
    }
}
