//! In-memory catalog of stops and bus routes.
//!
//! The catalog owns every [`Stop`] and [`Bus`] of a run and keeps a
//! secondary index from stop name to the sorted set of buses serving it.
//! Index entries are created lazily, so stops and buses may be added in
//! any order.

pub mod stats;

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::distance::{GreatCircle, Metric, RoadDistance};
use crate::identifiers::*;
use crate::models::{Bus, Result, Stop, TransitError};

pub use stats::{BusStats, StopStats};

/// Index entry for one stop name.
///
/// `stop` stays `None` while the name is only known from bus routes.
#[derive(Clone, Debug, Default)]
struct StopEntry {
    stop: Option<Stop>,
    buses: BTreeSet<BusIdentifier>,
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    stops: HashMap<StopIdentifier, StopEntry>,
    buses: HashMap<BusIdentifier, Bus>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from raw data, stops first
    pub fn from_data(stops: Vec<Stop>, buses: Vec<Bus>) -> Self {
        let mut catalog = Self::new();
        for stop in stops {
            catalog.add_stop(stop);
        }
        for bus in buses {
            catalog.add_bus(bus);
        }
        catalog
    }

    /// Insert a stop, or merge it into an existing record of the same name.
    ///
    /// Bus membership already recorded for the name is kept.
    pub fn add_stop(&mut self, stop: Stop) {
        debug!(stop = %stop.name, lat = stop.latitude(), lon = stop.longitude(), "adding stop");
        let entry = self.stops.entry(stop.name.clone()).or_default();
        if let Some(existing) = &mut entry.stop {
            existing.update_from(stop);
        } else {
            entry.stop = Some(stop);
        }
    }

    /// Insert a bus and register it with every stop on its route.
    ///
    /// Re-adding a bus name replaces the old route, including its index
    /// entries.
    pub fn add_bus(&mut self, bus: Bus) {
        debug!(bus = %bus.name, stops = bus.stops.len(), roundtrip = bus.is_roundtrip(), "adding bus");
        if let Some(previous) = self.buses.remove(&bus.name) {
            for stop in &previous.stops {
                if let Some(entry) = self.stops.get_mut(stop) {
                    entry.buses.remove(&previous.name);
                }
            }
        }

        for stop in &bus.stops {
            self.stops
                .entry(stop.clone())
                .or_default()
                .buses
                .insert(bus.name.clone());
        }
        self.buses.insert(bus.name.clone(), bus);
    }

    // ---- Lookups ----

    pub fn stop(&self, name: &str) -> Option<&Stop> {
        self.stops.get(name).and_then(|entry| entry.stop.as_ref())
    }

    pub fn bus(&self, name: &str) -> Option<&Bus> {
        self.buses.get(name)
    }

    /// Number of stops with known coordinates
    pub fn num_stops(&self) -> usize {
        self.stops.values().filter(|entry| entry.stop.is_some()).count()
    }

    pub fn num_buses(&self) -> usize {
        self.buses.len()
    }

    fn require_bus(&self, name: &str) -> Result<&Bus> {
        self.bus(name).ok_or_else(|| TransitError::BusNotFound(BusIdentifier::new(name)))
    }

    fn require_route_stop(&self, name: &StopIdentifier) -> Result<&Stop> {
        self.stop(name.as_str())
            .ok_or_else(|| TransitError::UndefinedStop(name.clone()))
    }

    // ---- Route metrics ----

    /// Length of one full run of `name` under `metric`, in meters.
    ///
    /// Linear routes add the return trip leg by leg, never by doubling, so
    /// asymmetric metrics are honoured.
    pub fn route_length<M: Metric>(&self, name: &str, metric: &M) -> Result<f64> {
        let bus = self.require_bus(name)?;
        bus.legs().try_fold(0.0, |total, (from, to)| {
            let from = self.require_route_stop(from)?;
            let to = self.require_route_stop(to)?;
            Ok(total + metric.measure(from, to)?)
        })
    }

    pub fn route_stop_count(&self, name: &str) -> Result<usize> {
        Ok(self.require_bus(name)?.stop_count())
    }

    pub fn unique_stop_count(&self, name: &str) -> Result<usize> {
        Ok(self.require_bus(name)?.unique_stop_count())
    }

    /// Road length divided by great-circle length.
    pub fn curvature(&self, name: &str) -> Result<f64> {
        let road = self.route_length(name, &RoadDistance)?;
        let geo = self.route_length(name, &GreatCircle)?;
        Ok(road / geo)
    }

    // ---- Queries ----

    /// All metrics of a bus.
    ///
    /// A missing road distance does not fail the query: the stats then carry
    /// no road length.
    pub fn query_bus(&self, name: &str) -> Result<BusStats> {
        let bus = self.require_bus(name)?;
        let geo_length = self.route_length(name, &GreatCircle)?;
        let road_length = match self.route_length(name, &RoadDistance) {
            Ok(length) => Some(length),
            Err(TransitError::MissingDistance { from, to }) => {
                tracing::warn!(bus = name, %from, %to, "no road distance, reporting great-circle length");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(BusStats {
            name: bus.name.clone(),
            stop_count: bus.stop_count(),
            unique_stop_count: bus.unique_stop_count(),
            geo_length,
            road_length,
        })
    }

    /// Buses through a stop.
    ///
    /// A stop that was added but has no buses yields an empty list; a name
    /// that was never added as a stop is not found, even when some bus
    /// route mentions it.
    pub fn query_stop(&self, name: &str) -> Result<StopStats> {
        match self.stops.get(name) {
            Some(StopEntry { stop: Some(stop), buses }) => Ok(StopStats {
                name: stop.name.clone(),
                buses: buses.iter().cloned().collect(),
            }),
            _ => Err(TransitError::StopNotFound(StopIdentifier::new(name))),
        }
    }
}
