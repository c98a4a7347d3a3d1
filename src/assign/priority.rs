//! Placement urgency of houses.

use crate::grid::{HouseId, Point};
use crate::model::District;

/// Rank of the battery whose distance is compared with the nearest one.
pub const PRIORITY_RANK: usize = 4;

/// Distance to the fifth-nearest battery minus distance to the nearest.
///
/// A large gap means few batteries are close, so the house should be
/// placed before those batteries fill up. With fewer than five batteries
/// the farthest one stands in.
pub fn priority(district: &District, position: Point) -> u32 {
    let mut distances: Vec<u32> = district
        .batteries()
        .iter()
        .map(|b| position.manhattan(b.position))
        .collect();
    if distances.is_empty() {
        return 0;
    }
    distances.sort_unstable();
    let rank = PRIORITY_RANK.min(distances.len() - 1);
    distances[rank] - distances[0]
}

/// Unassigned houses ordered by descending priority.
///
/// The sort is stable; equal priorities keep id order.
pub fn placement_order(district: &District) -> Vec<HouseId> {
    let mut ranked: Vec<(HouseId, u32)> = district
        .houses()
        .iter()
        .filter(|h| h.battery.is_none())
        .map(|h| (h.id, priority(district, h.position)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().map(|(id, _)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BatteryRecord, HouseRecord};

    fn district() -> District {
        let houses = [
            // Surrounded by batteries: small gap.
            HouseRecord { id: 1, x: 10, y: 10, demand: 1.0 },
            // Next to one battery, far from the rest: large gap.
            HouseRecord { id: 2, x: 0, y: 1, demand: 1.0 },
            HouseRecord { id: 3, x: 10, y: 10, demand: 1.0 },
        ];
        let batteries: Vec<_> = [(0, 0), (10, 5), (5, 10), (15, 10), (10, 15)]
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| BatteryRecord::new(i as u32, x, y, 100.0))
            .collect();
        District::new(1, &houses, &batteries).unwrap()
    }

    #[test]
    fn test_priority_gap() {
        let d = district();
        assert_eq!(priority(&d, Point::new(10, 10)), 20 - 5);
        assert_eq!(priority(&d, Point::new(0, 1)), 24 - 1);
    }

    #[test]
    fn test_placement_order_is_descending_and_stable() {
        let d = district();
        assert_eq!(
            placement_order(&d),
            vec![HouseId(1), HouseId(0), HouseId(2)]
        );
    }

    #[test]
    fn test_priority_with_few_batteries() {
        let houses = [HouseRecord { id: 1, x: 0, y: 0, demand: 1.0 }];
        let batteries = [
            BatteryRecord::new(1, 3, 0, 10.0),
            BatteryRecord::new(2, 0, 7, 10.0),
        ];
        let d = District::new(1, &houses, &batteries).unwrap();
        assert_eq!(priority(&d, Point::new(0, 0)), 4);
    }
}
