//! The district: houses, batteries and the assignment between them.

use std::collections::HashSet;

use super::types::{Battery, BatteryRecord, House, HouseRecord};
use crate::error::{Error, Result};
use crate::grid::{BatteryId, HouseId, Occupant, SpatialIndex};

/// Saved assignment state of one battery.
#[derive(Debug, Clone, PartialEq)]
pub struct BatterySnapshot {
    battery: BatteryId,
    remaining: f64,
    houses: Vec<HouseId>,
}

/// Saved assignment state of a whole district.
///
/// Restoring it puts every battery's house list, remaining capacity and
/// every house's back-reference exactly where they were.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    batteries: Vec<BatterySnapshot>,
}

impl Assignment {
    /// Houses assigned to `battery` in this snapshot.
    pub fn houses_of(&self, battery: BatteryId) -> &[HouseId] {
        self.batteries
            .get(battery.0)
            .map(|s| s.houses.as_slice())
            .unwrap_or(&[])
    }
}

/// A neighbourhood to wire up.
#[derive(Debug, Clone)]
pub struct District {
    id: u32,
    houses: Vec<House>,
    batteries: Vec<Battery>,
}

impl District {
    /// Builds a district from validated loader output.
    ///
    /// Handles are dense indices in input order.
    pub fn new(id: u32, houses: &[HouseRecord], batteries: &[BatteryRecord]) -> Result<Self> {
        if batteries.is_empty() {
            return Err(Error::InvalidInput("district has no batteries".into()));
        }

        let mut seen = HashSet::new();
        for h in houses {
            if !h.demand.is_finite() || h.demand <= 0.0 {
                return Err(Error::InvalidInput(format!(
                    "house {} has demand {}",
                    h.id, h.demand
                )));
            }
            if !seen.insert(h.id) {
                return Err(Error::InvalidInput(format!("duplicate house id {}", h.id)));
            }
        }

        let mut seen = HashSet::new();
        for b in batteries {
            if !b.capacity.is_finite() || b.capacity <= 0.0 {
                return Err(Error::InvalidInput(format!(
                    "battery {} has capacity {}",
                    b.id, b.capacity
                )));
            }
            if !seen.insert(b.id) {
                return Err(Error::InvalidInput(format!(
                    "duplicate battery id {}",
                    b.id
                )));
            }
        }

        let houses = houses
            .iter()
            .enumerate()
            .map(|(i, r)| House {
                id: HouseId(i),
                label: r.id,
                position: (r.x, r.y).into(),
                demand: r.demand,
                battery: None,
            })
            .collect();
        let batteries = batteries
            .iter()
            .enumerate()
            .map(|(i, r)| Battery::new(BatteryId(i), r))
            .collect();

        Ok(Self {
            id,
            houses,
            batteries,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn houses(&self) -> &[House] {
        &self.houses
    }

    pub fn batteries(&self) -> &[Battery] {
        &self.batteries
    }

    pub fn house(&self, id: HouseId) -> Result<&House> {
        self.houses.get(id.0).ok_or(Error::UnknownHouse(id))
    }

    pub fn battery(&self, id: BatteryId) -> Result<&Battery> {
        self.batteries.get(id.0).ok_or(Error::UnknownBattery(id))
    }

    /// Places every house and battery on the grid.
    pub fn place_on<G: SpatialIndex>(&self, grid: &mut G) {
        for h in &self.houses {
            grid.place(Occupant::House(h.id), h.position);
        }
        for b in &self.batteries {
            grid.place(Occupant::Battery(b.id), b.position);
        }
    }

    /// True when `battery` has room for `house`.
    pub fn can_host(&self, battery: BatteryId, house: HouseId) -> Result<bool> {
        let demand = self.house(house)?.demand;
        Ok(self.battery(battery)?.fits(demand))
    }

    /// Connects an unassigned house to a battery with room for it.
    pub fn assign(&mut self, house: HouseId, battery: BatteryId) -> Result<()> {
        let h = self.house(house)?;
        if let Some(current) = h.battery {
            return Err(Error::AlreadyAssigned {
                house,
                battery: current,
            });
        }
        let demand = h.demand;
        let b = self
            .batteries
            .get_mut(battery.0)
            .ok_or(Error::UnknownBattery(battery))?;
        if !b.fits(demand) {
            return Err(Error::CapacityExceeded {
                battery,
                house,
                remaining: b.remaining,
                demand,
            });
        }
        b.remaining -= demand;
        b.houses.push(house);
        self.houses[house.0].battery = Some(battery);
        Ok(())
    }

    /// Disconnects a house from its battery and returns that battery.
    pub fn unassign(&mut self, house: HouseId) -> Result<BatteryId> {
        let h = self.house(house)?;
        let demand = h.demand;
        let Some(battery) = h.battery else {
            return Err(Error::Unassigned(house));
        };
        let b = &mut self.batteries[battery.0];
        let Some(pos) = b.houses.iter().position(|&id| id == house) else {
            return Err(Error::NotAssigned { house, battery });
        };
        b.houses.remove(pos);
        b.remaining += demand;
        self.houses[house.0].battery = None;
        Ok(battery)
    }

    /// Houses without a battery, in id order.
    pub fn unassigned(&self) -> Vec<HouseId> {
        self.houses
            .iter()
            .filter(|h| h.battery.is_none())
            .map(|h| h.id)
            .collect()
    }

    /// True when every house has a battery.
    pub fn is_fully_assigned(&self) -> bool {
        self.houses.iter().all(|h| h.battery.is_some())
    }

    /// Saves the assignment state of the given batteries.
    pub fn snapshot(&self, batteries: &[BatteryId]) -> Result<Vec<BatterySnapshot>> {
        batteries
            .iter()
            .map(|&id| {
                let b = self.battery(id)?;
                Ok(BatterySnapshot {
                    battery: id,
                    remaining: b.remaining,
                    houses: b.houses.clone(),
                })
            })
            .collect()
    }

    /// Puts the given batteries back into a saved state.
    ///
    /// Houses currently on those batteries are released first, then the
    /// saved members are re-attached, so back-references stay consistent
    /// as long as the snapshots cover every battery a house moved between.
    /// Snapshots naming a battery or house this district does not have are
    /// rejected before anything changes.
    pub fn restore_batteries(&mut self, snapshots: &[BatterySnapshot]) -> Result<()> {
        for snap in snapshots {
            self.battery(snap.battery)?;
            for &h in &snap.houses {
                self.house(h)?;
            }
        }

        for snap in snapshots {
            for &h in &self.batteries[snap.battery.0].houses {
                self.houses[h.0].battery = None;
            }
        }
        for snap in snapshots {
            let b = &mut self.batteries[snap.battery.0];
            b.remaining = snap.remaining;
            b.houses.clone_from(&snap.houses);
            for &h in &snap.houses {
                self.houses[h.0].battery = Some(snap.battery);
            }
        }
        Ok(())
    }

    /// Saves the full assignment.
    pub fn assignment(&self) -> Assignment {
        Assignment {
            batteries: self
                .batteries
                .iter()
                .map(|b| BatterySnapshot {
                    battery: b.id,
                    remaining: b.remaining,
                    houses: b.houses.clone(),
                })
                .collect(),
        }
    }

    /// Replaces the current assignment with a saved one.
    pub fn restore(&mut self, assignment: &Assignment) -> Result<()> {
        for snap in &assignment.batteries {
            self.battery(snap.battery)?;
            for &h in &snap.houses {
                self.house(h)?;
            }
        }
        for h in &mut self.houses {
            h.battery = None;
        }
        self.restore_batteries(&assignment.batteries)
    }

    /// Checks that no house shares a cell with a battery.
    ///
    /// [`District::new`] accepts such input as given; a house on a foreign
    /// battery's cell cannot be wired and later surfaces as
    /// [`Error::RouteBlocked`]. Call this to reject it up front.
    pub fn check_sites(&self) -> Result<()> {
        let sites: HashSet<_> = self.batteries.iter().map(|b| b.position).collect();
        match self.houses.iter().find(|h| sites.contains(&h.position)) {
            Some(h) => Err(Error::InvalidInput(format!(
                "house {} sits on a battery at {}",
                h.label, h.position
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{MultiGrid, Point};

    fn district() -> District {
        let houses = [
            HouseRecord { id: 1, x: 0, y: 0, demand: 40.0 },
            HouseRecord { id: 2, x: 1, y: 0, demand: 40.0 },
            HouseRecord { id: 3, x: 2, y: 0, demand: 40.0 },
        ];
        let batteries = [
            BatteryRecord::new(1, 5, 5, 100.0),
            BatteryRecord::new(2, 9, 9, 100.0),
        ];
        District::new(1, &houses, &batteries).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_records() {
        let bad_demand = [HouseRecord { id: 1, x: 0, y: 0, demand: f64::NAN }];
        let batteries = [BatteryRecord::new(1, 0, 0, 10.0)];
        assert!(District::new(1, &bad_demand, &batteries).is_err());
        assert!(District::new(1, &[], &[]).is_err());

        let dup = [BatteryRecord::new(1, 0, 0, 10.0), BatteryRecord::new(1, 1, 1, 10.0)];
        assert!(matches!(
            District::new(1, &[], &dup),
            Err(Error::InvalidInput(_))
        ));

    }

    #[test]
    fn test_house_on_battery_cell_is_opt_in_error() {
        let houses = [HouseRecord { id: 7, x: 0, y: 0, demand: 1.0 }];
        let batteries = [BatteryRecord::new(1, 0, 0, 10.0)];
        let d = District::new(1, &houses, &batteries).unwrap();
        assert!(matches!(d.check_sites(), Err(Error::InvalidInput(_))));
        assert!(district().check_sites().is_ok());
    }

    #[test]
    fn test_assign_updates_both_sides() {
        let mut d = district();
        d.assign(HouseId(0), BatteryId(0)).unwrap();

        assert_eq!(d.house(HouseId(0)).unwrap().battery, Some(BatteryId(0)));
        assert_eq!(d.battery(BatteryId(0)).unwrap().houses(), &[HouseId(0)]);
        assert!((d.battery(BatteryId(0)).unwrap().remaining() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_assign_respects_capacity() {
        let mut d = district();
        d.assign(HouseId(0), BatteryId(0)).unwrap();
        d.assign(HouseId(1), BatteryId(0)).unwrap();
        let err = d.assign(HouseId(2), BatteryId(0)).unwrap_err();
        assert!(matches!(err, Error::CapacityExceeded { .. }));
        assert_eq!(d.unassigned(), vec![HouseId(2)]);
    }

    #[test]
    fn test_assign_twice_fails() {
        let mut d = district();
        d.assign(HouseId(0), BatteryId(0)).unwrap();
        assert!(matches!(
            d.assign(HouseId(0), BatteryId(1)),
            Err(Error::AlreadyAssigned { .. })
        ));
    }

    #[test]
    fn test_unassign_frees_capacity() {
        let mut d = district();
        d.assign(HouseId(0), BatteryId(0)).unwrap();
        assert_eq!(d.unassign(HouseId(0)).unwrap(), BatteryId(0));
        assert!((d.battery(BatteryId(0)).unwrap().remaining() - 100.0).abs() < 1e-9);
        assert!(d.unassign(HouseId(0)).is_err());
    }

    #[test]
    fn test_snapshot_restore_after_swap() {
        let mut d = district();
        d.assign(HouseId(0), BatteryId(0)).unwrap();
        d.assign(HouseId(1), BatteryId(0)).unwrap();
        d.assign(HouseId(2), BatteryId(1)).unwrap();
        let snap = d.snapshot(&[BatteryId(0), BatteryId(1)]).unwrap();

        d.unassign(HouseId(0)).unwrap();
        d.unassign(HouseId(2)).unwrap();
        d.assign(HouseId(2), BatteryId(0)).unwrap();
        d.assign(HouseId(0), BatteryId(1)).unwrap();

        d.restore_batteries(&snap).unwrap();
        assert_eq!(
            d.battery(BatteryId(0)).unwrap().houses(),
            &[HouseId(0), HouseId(1)]
        );
        assert_eq!(d.battery(BatteryId(1)).unwrap().houses(), &[HouseId(2)]);
        assert_eq!(d.house(HouseId(2)).unwrap().battery, Some(BatteryId(1)));
        assert_eq!(d.house(HouseId(0)).unwrap().battery, Some(BatteryId(0)));
    }

    #[test]
    fn test_full_restore() {
        let mut d = district();
        d.assign(HouseId(0), BatteryId(0)).unwrap();
        let saved = d.assignment();

        d.assign(HouseId(1), BatteryId(1)).unwrap();
        d.restore(&saved).unwrap();

        assert_eq!(d.unassigned(), vec![HouseId(1), HouseId(2)]);
        assert_eq!(saved.houses_of(BatteryId(0)), &[HouseId(0)]);
    }

    #[test]
    fn test_foreign_snapshot_is_rejected_unchanged() {
        let houses = [
            HouseRecord { id: 1, x: 0, y: 0, demand: 10.0 },
            HouseRecord { id: 2, x: 1, y: 0, demand: 10.0 },
            HouseRecord { id: 3, x: 2, y: 0, demand: 10.0 },
            HouseRecord { id: 4, x: 3, y: 0, demand: 10.0 },
        ];
        let batteries = [
            BatteryRecord::new(1, 5, 5, 100.0),
            BatteryRecord::new(2, 9, 9, 100.0),
            BatteryRecord::new(3, 7, 7, 100.0),
        ];
        let mut bigger = District::new(2, &houses, &batteries).unwrap();
        bigger.assign(HouseId(3), BatteryId(2)).unwrap();
        let foreign = bigger.assignment();

        let mut d = district();
        d.assign(HouseId(0), BatteryId(0)).unwrap();
        let before = d.assignment();

        assert!(matches!(
            d.restore_batteries(&foreign.batteries),
            Err(Error::UnknownBattery(BatteryId(2)))
        ));
        assert!(matches!(
            d.restore(&foreign),
            Err(Error::UnknownBattery(BatteryId(2)))
        ));
        assert_eq!(d.assignment(), before);
    }

    #[test]
    fn test_place_on_grid() {
        let d = district();
        let mut grid = MultiGrid::new();
        d.place_on(&mut grid);
        assert_eq!(grid.at(Point::new(5, 5)), &[Occupant::Battery(BatteryId(0))]);
        assert_eq!(grid.at(Point::new(1, 0)), &[Occupant::House(HouseId(1))]);
    }
}
