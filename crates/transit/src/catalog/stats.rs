//! Query results produced by the catalog.

use crate::identifiers::{BusIdentifier, StopIdentifier};

/// Metrics of a single bus route
#[derive(Clone, Debug, PartialEq)]
pub struct BusStats {
    pub name: BusIdentifier,
    /// Stops visited on one full run (`2N - 1` for linear routes)
    pub stop_count: usize,
    pub unique_stop_count: usize,
    /// Route length over great-circle legs, meters
    pub geo_length: f64,
    /// Route length over recorded road distances, meters; `None` when some
    /// leg has no distance in either direction
    pub road_length: Option<f64>,
}

impl BusStats {
    /// Road length when known, great-circle length otherwise.
    pub fn route_length(&self) -> f64 {
        self.road_length.unwrap_or(self.geo_length)
    }

    /// Ratio of road length to great-circle length.
    ///
    /// `None` without a road length or when the geometric length is zero.
    pub fn curvature(&self) -> Option<f64> {
        let road = self.road_length?;
        (self.geo_length > 0.0).then(|| road / self.geo_length)
    }
}

/// Buses passing through a stop, sorted by name
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StopStats {
    pub name: StopIdentifier,
    pub buses: Vec<BusIdentifier>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(geo_length: f64, road_length: Option<f64>) -> BusStats {
        BusStats {
            name: BusIdentifier::new("750"),
            stop_count: 5,
            unique_stop_count: 3,
            geo_length,
            road_length,
        }
    }

    #[test]
    fn test_route_length_prefers_road() {
        assert_eq!(stats(100.0, Some(130.0)).route_length(), 130.0);
        assert_eq!(stats(100.0, None).route_length(), 100.0);
    }

    #[test]
    fn test_curvature() {
        assert_eq!(stats(100.0, Some(130.0)).curvature(), Some(1.3));
        assert_eq!(stats(100.0, None).curvature(), None);
        assert_eq!(stats(0.0, Some(0.0)).curvature(), None);
    }
}
