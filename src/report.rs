//! Output records for a finished district.
//!
//! Locations are rendered as `"x,y"` strings.

use crate::cost::Cost;
use crate::error::Result;
use crate::layout::{CableMode, Layout};
use crate::model::District;

/// One house with the cables that carry its output.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HouseReport {
    pub location: String,
    pub output: f64,
    pub cables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatteryReport {
    pub location: String,
    pub capacity: f64,
    pub houses: Vec<HouseReport>,
}

/// Everything needed to draw or check a district's wiring.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistrictReport {
    pub district: u32,
    pub mode: CableMode,
    pub cost: Cost,
    pub batteries: Vec<BatteryReport>,
}

impl DistrictReport {
    /// Collects the report from a district and its layout.
    pub fn new(district: &District, layout: &Layout, cost: Cost) -> Result<Self> {
        let batteries = layout
            .batteries()
            .iter()
            .map(|bl| {
                let battery = district.battery(bl.battery)?;
                let houses = bl
                    .house_routes(district)?
                    .into_iter()
                    .map(|route| {
                        let house = district.house(route.house)?;
                        Ok(HouseReport {
                            location: house.position.to_string(),
                            output: house.demand,
                            cables: route.cables.iter().map(ToString::to_string).collect(),
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(BatteryReport {
                    location: battery.position.to_string(),
                    capacity: battery.capacity,
                    houses,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            district: district.id(),
            mode: layout.mode(),
            cost,
            batteries,
        })
    }
}
