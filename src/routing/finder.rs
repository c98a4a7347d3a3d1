//! Obstacle-avoiding elbow routes.
//!
//! A route between two cells is an L-shaped walk: a vertical rise at the
//! lower point's column up to an elbow row, a horizontal run along that
//! row, and a vertical climb at the upper point's column. The elbow row
//! starts at one end of the y-span and shifts one row per retry while the
//! walk crosses a battery other than the one the tree belongs to.

use super::distance::min_distance_to_any;
use crate::error::{Error, Result};
use crate::grid::{BatteryId, Point, SpatialIndex};

/// Routing limits.
///
/// # Examples
///
/// ```
/// use u_smartgrid::routing::RoutingConfig;
///
/// let config = RoutingConfig::default().with_max_detour(8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingConfig {
    /// How many rows past the y-span the elbow may move before giving up.
    pub max_detour: i32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self { max_detour: 32 }
    }
}

impl RoutingConfig {
    pub fn with_max_detour(mut self, rows: i32) -> Self {
        self.max_detour = rows;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_detour < 0 {
            return Err(Error::InvalidConfig(format!(
                "max_detour must be non-negative, got {}",
                self.max_detour
            )));
        }
        Ok(())
    }
}

/// Which end of the y-span the elbow starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Elbow row starts at the lower point's row and moves up.
    Lower,
    /// Elbow row starts at the upper point's row and moves down.
    Upper,
}

/// A routed cable walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Cells from the lower endpoint to the upper one, both included.
    pub cells: Vec<Point>,
    /// Number of rows the elbow was shifted to dodge batteries.
    pub offset: i32,
    pub anchor: Anchor,
}

/// Routes cable walks for the tree of one battery.
#[derive(Debug)]
pub struct PathFinder<'g, G> {
    grid: &'g G,
    owner: BatteryId,
    config: RoutingConfig,
}

impl<'g, G: SpatialIndex> PathFinder<'g, G> {
    /// Finder for routes belonging to `owner`'s tree.
    pub fn new(grid: &'g G, owner: BatteryId) -> Self {
        Self {
            grid,
            owner,
            config: RoutingConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RoutingConfig) -> Self {
        self.config = config;
        self
    }

    /// Routes between `p1` and `p2`.
    ///
    /// With other stub paths still open, both elbow placements are built
    /// and the one closer to any open path is kept (the lower-anchored one
    /// on a tie). Otherwise the lower-anchored walk is returned directly.
    pub fn route(&self, p1: Point, p2: Point, open: &[&[Point]]) -> Result<Route> {
        let lower = self.elbow(p1, p2, Anchor::Lower);
        if open.is_empty() && lower.is_ok() {
            return lower;
        }

        match (lower, self.elbow(p1, p2, Anchor::Upper)) {
            (Ok(l), Ok(u)) => {
                let dl = min_distance_to_any(&l.cells, open.iter().copied());
                let du = min_distance_to_any(&u.cells, open.iter().copied());
                if du < dl {
                    Ok(u)
                } else {
                    Ok(l)
                }
            }
            (Ok(r), Err(_)) | (Err(_), Ok(r)) => Ok(r),
            (Err(e), Err(_)) => Err(e),
        }
    }

    /// First unobstructed elbow walk for one anchor.
    pub fn elbow(&self, p1: Point, p2: Point, anchor: Anchor) -> Result<Route> {
        let (from, to) = if p1.y < p2.y { (p1, p2) } else { (p2, p1) };
        let span = to.y - from.y;

        for offset in 0..=span + self.config.max_detour {
            let row = match anchor {
                Anchor::Lower => from.y + offset,
                Anchor::Upper => to.y - offset,
            };
            let cells = elbow_cells(from, to, row);
            if !self.grid.has_foreign_battery(&cells, self.owner) {
                return Ok(Route {
                    cells,
                    offset,
                    anchor,
                });
            }
        }

        Err(Error::RouteBlocked {
            from,
            to,
            max_detour: self.config.max_detour,
        })
    }
}

/// Contiguous walk `from` -> (`from.x`, `row`) -> (`to.x`, `row`) -> `to`.
///
/// Consecutive cells are 4-neighbours and no cell repeats when `row` lies
/// inside the y-span.
pub fn elbow_cells(from: Point, to: Point, row: i32) -> Vec<Point> {
    let mut cells = Vec::with_capacity(from.manhattan(to) as usize + 1);

    let step = (row - from.y).signum();
    let mut y = from.y;
    while y != row {
        cells.push(Point::new(from.x, y));
        y += step;
    }

    let step = (to.x - from.x).signum();
    let mut x = from.x;
    cells.push(Point::new(x, row));
    while x != to.x {
        x += step;
        cells.push(Point::new(x, row));
    }

    let step = (to.y - row).signum();
    let mut y = row;
    while y != to.y {
        y += step;
        cells.push(Point::new(to.x, y));
    }

    cells
}

/// Horizontal run at the house's row, then vertical run to the battery.
///
/// This is the unmerged, unobstructed cable of the individual-cable mode.
pub fn direct_cells(house: Point, battery: Point) -> Vec<Point> {
    let mut cells = Vec::with_capacity(house.manhattan(battery) as usize + 1);

    let step = (battery.x - house.x).signum();
    let mut x = house.x;
    cells.push(house);
    while x != battery.x {
        x += step;
        cells.push(Point::new(x, house.y));
    }

    let step = (battery.y - house.y).signum();
    let mut y = house.y;
    while y != battery.y {
        y += step;
        cells.push(Point::new(battery.x, y));
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{MultiGrid, Occupant};
    use proptest::prelude::*;

    fn is_walk(cells: &[Point]) -> bool {
        cells.windows(2).all(|w| w[0].manhattan(w[1]) == 1)
    }

    #[test]
    fn test_straight_vertical_route() {
        let grid = MultiGrid::new();
        let finder = PathFinder::new(&grid, BatteryId(0));
        let r = finder
            .route(Point::new(0, 8), Point::new(0, 4), &[])
            .unwrap();

        assert_eq!(r.cells.len(), 5);
        assert_eq!(r.cells[0], Point::new(0, 4));
        assert_eq!(r.cells[4], Point::new(0, 8));
        assert_eq!(r.cells.len() as u32 - 1, Point::new(0, 4).manhattan(Point::new(0, 8)));
        assert_eq!(r.offset, 0);
    }

    #[test]
    fn test_lower_and_upper_elbows() {
        let from = Point::new(0, 0);
        let to = Point::new(2, 2);

        let lower = elbow_cells(from, to, 0);
        assert_eq!(
            lower,
            vec![
                Point::new(0, 0),
                Point::new(1, 0),
                Point::new(2, 0),
                Point::new(2, 1),
                Point::new(2, 2),
            ]
        );

        let upper = elbow_cells(from, to, 2);
        assert_eq!(
            upper,
            vec![
                Point::new(0, 0),
                Point::new(0, 1),
                Point::new(0, 2),
                Point::new(1, 2),
                Point::new(2, 2),
            ]
        );
    }

    #[test]
    fn test_route_avoids_foreign_battery() {
        let mut grid = MultiGrid::new();
        grid.place(Occupant::Battery(BatteryId(0)), Point::new(4, 4));
        grid.place(Occupant::Battery(BatteryId(1)), Point::new(2, 0));

        let finder = PathFinder::new(&grid, BatteryId(0));
        let r = finder
            .route(Point::new(0, 0), Point::new(4, 4), &[])
            .unwrap();

        assert!(r.offset >= 1);
        assert!(!r.cells.contains(&Point::new(2, 0)));
        assert!(r.cells.contains(&Point::new(4, 4)));
        assert!(is_walk(&r.cells));
    }

    #[test]
    fn test_own_battery_does_not_block() {
        let mut grid = MultiGrid::new();
        grid.place(Occupant::Battery(BatteryId(0)), Point::new(2, 0));

        let finder = PathFinder::new(&grid, BatteryId(0));
        let r = finder
            .route(Point::new(0, 0), Point::new(4, 4), &[])
            .unwrap();
        assert_eq!(r.offset, 0);
    }

    #[test]
    fn test_same_row_detour() {
        let mut grid = MultiGrid::new();
        grid.place(Occupant::Battery(BatteryId(1)), Point::new(2, 3));

        let finder = PathFinder::new(&grid, BatteryId(0));
        let r = finder
            .elbow(Point::new(0, 3), Point::new(4, 3), Anchor::Lower)
            .unwrap();

        assert_eq!(r.offset, 1);
        assert!(!r.cells.contains(&Point::new(2, 3)));
        assert!(is_walk(&r.cells));
        // Equal rows: the second argument is treated as the lower point.
        assert_eq!(r.cells.first(), Some(&Point::new(4, 3)));
        assert_eq!(r.cells.last(), Some(&Point::new(0, 3)));
    }

    #[test]
    fn test_route_blocked_is_error() {
        let mut grid = MultiGrid::new();
        // Batteries directly above and below the start wall off the column.
        grid.place(Occupant::Battery(BatteryId(1)), Point::new(0, 1));
        grid.place(Occupant::Battery(BatteryId(2)), Point::new(0, -1));
        grid.place(Occupant::Battery(BatteryId(3)), Point::new(1, 0));

        let finder = PathFinder::new(&grid, BatteryId(0))
            .with_config(RoutingConfig::default().with_max_detour(3));
        let err = finder
            .route(Point::new(0, 0), Point::new(4, 0), &[])
            .unwrap_err();
        assert!(matches!(err, Error::RouteBlocked { max_detour: 3, .. }));
    }

    #[test]
    fn test_route_picks_elbow_closer_to_open_paths() {
        let grid = MultiGrid::new();
        let finder = PathFinder::new(&grid, BatteryId(0));

        // An open path near the top-left corner favours the upper elbow.
        let open = vec![Point::new(0, 6)];
        let r = finder
            .route(Point::new(0, 0), Point::new(4, 4), &[open.as_slice()])
            .unwrap();
        assert_eq!(r.anchor, Anchor::Upper);

        // Equal distances keep the lower elbow.
        let open = vec![Point::new(10, 10)];
        let r = finder
            .route(Point::new(0, 0), Point::new(4, 4), &[open.as_slice()])
            .unwrap();
        assert_eq!(r.anchor, Anchor::Lower);
    }

    #[test]
    fn test_direct_cells() {
        let cells = direct_cells(Point::new(3, 3), Point::new(1, 0));
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Point::new(3, 3));
        assert_eq!(cells[2], Point::new(1, 3));
        assert_eq!(cells[5], Point::new(1, 0));
        assert!(is_walk(&cells));
    }

    proptest! {
        #[test]
        fn prop_unobstructed_route_is_shortest_walk(
            x1 in -15i32..15, y1 in -15i32..15, x2 in -15i32..15, y2 in -15i32..15,
        ) {
            let grid = MultiGrid::new();
            let finder = PathFinder::new(&grid, BatteryId(0));
            let (p1, p2) = (Point::new(x1, y1), Point::new(x2, y2));
            let r = finder.route(p1, p2, &[]).unwrap();

            prop_assert_eq!(r.offset, 0);
            prop_assert_eq!(r.cells.len() as u32, p1.manhattan(p2) + 1);
            prop_assert!(is_walk(&r.cells));
            let ends = [r.cells[0], r.cells[r.cells.len() - 1]];
            prop_assert!(ends.contains(&p1) && ends.contains(&p2));
        }
    }
}
