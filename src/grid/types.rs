//! Points, handles and grid occupants.

use std::fmt;

/// Integer grid coordinate.
///
/// The derived ordering is lexicographic on `(x, y)` and exists only so
/// collections iterate deterministically. It carries no geometric meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance `|dx| + |dy|`.
    #[inline]
    pub fn manhattan(self, other: Point) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Dense handle of a house inside a [`crate::model::District`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HouseId(pub usize);

/// Dense handle of a battery inside a [`crate::model::District`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatteryId(pub usize);

impl fmt::Display for HouseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

impl fmt::Display for BatteryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

/// Something that sits on a grid cell.
///
/// A cable is tagged with the battery whose tree it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occupant {
    House(HouseId),
    Battery(BatteryId),
    Cable(BatteryId),
}

impl Occupant {
    /// Returns the battery id if this occupant is a battery.
    pub fn battery(self) -> Option<BatteryId> {
        match self {
            Occupant::Battery(id) => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan() {
        assert_eq!(Point::new(0, 0).manhattan(Point::new(3, -4)), 7);
        assert_eq!(Point::new(2, 2).manhattan(Point::new(2, 2)), 0);
    }

    #[test]
    fn test_display_matches_report_format() {
        assert_eq!(Point::new(12, 7).to_string(), "12,7");
    }

    #[test]
    fn test_occupant_battery() {
        assert_eq!(
            Occupant::Battery(BatteryId(3)).battery(),
            Some(BatteryId(3))
        );
        assert_eq!(Occupant::Cable(BatteryId(3)).battery(), None);
    }
}
