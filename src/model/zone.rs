//! Garden zones
//!
//! A zone is modelled as a circle of the given area around its centre.

use crate::model::profile::SunExposure;
use crate::utils::geometry::{radius_from_area, Point};
use serde::{Deserialize, Serialize};

/// Planning region with its own soil, sun and water characteristics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GardenZone {
    pub id: String,
    pub name: String,
    /// Area (m²)
    pub area: f64,
    pub soil_type: String,
    pub ph: f64,
    pub sun_exposure: SunExposure,
    /// Daily water budget (litres/day)
    pub water_availability: f64,
    /// Elevation (m)
    #[serde(default)]
    pub elevation: f64,
    /// Slope (degrees)
    #[serde(default)]
    pub slope: f64,
    pub center: Point,
}

impl GardenZone {
    /// Effective radius: √(area/π)
    pub fn radius(&self) -> f64 {
        radius_from_area(self.area)
    }

    /// Distance to centre ≤ radius
    pub fn contains(&self, point: &Point) -> bool {
        self.center.distance_to(point) <= self.radius()
    }
}

/// First zone containing the point
pub fn zone_containing<'a>(point: &Point, zones: &'a [GardenZone]) -> Option<&'a GardenZone> {
    zones.iter().find(|z| z.contains(point))
}

/// Sum of zone areas (m²)
pub fn total_area(zones: &[GardenZone]) -> f64 {
    zones.iter().map(|z| z.area.max(0.0)).sum()
}


#[cfg(test)]
mod tests {
    use super::fixtures::zone;
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_membership_boundary() {
        let z = zone("a", std::f64::consts::PI * 4.0, Point::new(1.0, 1.0));
        assert_relative_eq!(z.radius(), 2.0, epsilon = 1e-12);
        assert!(z.contains(&Point::new(3.0, 1.0)));
        assert!(z.contains(&Point::new(1.0, 1.0)));
        assert!(!z.contains(&Point::new(3.01, 1.0)));
    }

    #[test]
    fn test_first_match_wins() {
        let zones = vec![
            zone("a", 10.0, Point::new(0.0, 0.0)),
            zone("b", 10.0, Point::new(0.5, 0.0)),
        ];
        let found = zone_containing(&Point::new(0.2, 0.0), &zones).map(|z| z.id.as_str());
        assert_eq!(found, Some("a"));
        assert!(zone_containing(&Point::new(50.0, 0.0), &zones).is_none());
        assert_relative_eq!(total_area(&zones), 20.0);
    }
}
