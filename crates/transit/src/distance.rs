//! Distance metrics between stops.
//!
//! Two metrics are available:
//! - **Great-circle**: geometric distance over a spherical Earth, from the
//!   spherical law of cosines.
//! - **Road**: explicitly recorded, possibly asymmetric distances.

use crate::models::{Result, Stop, TransitError};

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two stops in meters.
///
/// The `acos` argument is clamped to `[-1, 1]`: rounding can push it just
/// outside that range for identical or antipodal points.
pub fn great_circle_distance(from: &Stop, to: &Stop) -> f64 {
    // sin² + cos² can round just below 1 and yield a few centimeters
    if from.location == to.location {
        return 0.0;
    }

    let lat1 = from.latitude().to_radians();
    let lat2 = to.latitude().to_radians();
    let delta_lon = (from.longitude() - to.longitude()).abs().to_radians();

    let cosine = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * delta_lon.cos();
    cosine.clamp(-1.0, 1.0).acos() * EARTH_RADIUS_M
}

/// Recorded road distance from `from` to `to` in meters.
///
/// Looks at `from`'s table first, then falls back to the distance recorded
/// on `to` in the opposite direction.
pub fn road_distance(from: &Stop, to: &Stop) -> Result<f64> {
    from.road_distance_to(to.name.as_str())
        .or_else(|| to.road_distance_to(from.name.as_str()))
        .ok_or_else(|| TransitError::MissingDistance {
            from: from.name.clone(),
            to: to.name.clone(),
        })
}

/// A way of measuring one leg of a route.
pub trait Metric {
    fn measure(&self, from: &Stop, to: &Stop) -> Result<f64>;
}

/// [`great_circle_distance`] as a [`Metric`].
#[derive(Clone, Copy, Debug, Default)]
pub struct GreatCircle;

impl Metric for GreatCircle {
    fn measure(&self, from: &Stop, to: &Stop) -> Result<f64> {
        Ok(great_circle_distance(from, to))
    }
}

/// [`road_distance`] as a [`Metric`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RoadDistance;

impl Metric for RoadDistance {
    fn measure(&self, from: &Stop, to: &Stop) -> Result<f64> {
        road_distance(from, to)
    }
}
