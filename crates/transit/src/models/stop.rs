//! Geo-located stop with its directed road distance table.

use std::collections::HashMap;

use geo::Point;

use crate::identifiers::StopIdentifier;

/// A bus stop.
///
/// The location is stored as a `geo::Point` with `x = longitude` and
/// `y = latitude`, both in degrees. Road distances are directed: an entry
/// recorded on `A` towards `B` says nothing about the `B -> A` direction.
#[derive(Clone, Debug, PartialEq)]
pub struct Stop {
    pub name: StopIdentifier,
    pub location: Point,
    road_distances: HashMap<StopIdentifier, f64>,
}

impl Stop {
    pub fn new(name: impl Into<StopIdentifier>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            location: Point::new(longitude, latitude),
            road_distances: HashMap::new(),
        }
    }

    /// Builder-style variant of [`Stop::add_road_distance`].
    pub fn with_road_distance(mut self, to: impl Into<StopIdentifier>, meters: f64) -> Self {
        self.add_road_distance(to, meters);
        self
    }

    pub fn latitude(&self) -> f64 {
        self.location.y()
    }

    pub fn longitude(&self) -> f64 {
        self.location.x()
    }

    /// Record the road distance from this stop to `to`.
    ///
    /// The first value recorded for a destination is kept.
    pub fn add_road_distance(&mut self, to: impl Into<StopIdentifier>, meters: f64) {
        self.road_distances.entry(to.into()).or_insert(meters);
    }

    /// Road distance recorded on this stop towards `to`, if any.
    pub fn road_distance_to(&self, to: &str) -> Option<f64> {
        self.road_distances.get(to).copied()
    }

    pub fn road_distances(&self) -> impl Iterator<Item = (&StopIdentifier, f64)> {
        self.road_distances.iter().map(|(name, meters)| (name, *meters))
    }

    /// Merge a newer record for the same stop into this one.
    ///
    /// Coordinates are replaced; every directed distance listed by `newer`
    /// overwrites the old value while unlisted destinations are kept.
    pub fn update_from(&mut self, newer: Stop) {
        self.location = newer.location;
        self.road_distances.extend(newer.road_distances);
    }
}
