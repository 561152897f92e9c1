//! # transit-catalog
//!
//! In-memory bus catalog answering route and stop queries.
//!
//! ## Features
//!
//! - **Two distance metrics**: great-circle distance from coordinates and
//!   recorded, possibly asymmetric road distances
//! - **Route topology**: roundtrip loops and linear out-and-back routes
//! - **Stop index**: sorted set of buses per stop, built in any ingestion order
//! - **Two protocols**: structured value documents and the legacy line format
//!
//! ## Example
//!
//! ```
//! use transit_catalog::prelude::*;
//!
//! let catalog = Catalog::from_data(
//!     vec![
//!         Stop::new("Tolstopaltsevo", 55.611087, 37.20829).with_road_distance("Marushkino", 3900.0),
//!         Stop::new("Marushkino", 55.595884, 37.209755),
//!     ],
//!     vec![Bus::new("750", ["Tolstopaltsevo", "Marushkino"], RouteKind::Linear)],
//! );
//!
//! let stats = catalog.query_bus("750").unwrap();
//! assert_eq!(stats.stop_count, 3);
//! assert_eq!(stats.route_length(), 7800.0);
//! assert!(stats.curvature().unwrap() > 1.0);
//!
//! let stop = catalog.query_stop("Marushkino").unwrap();
//! assert_eq!(stop.buses, vec![BusIdentifier::new("750")]);
//! ```

pub mod catalog;
pub mod distance;
pub mod identifiers;
pub mod models;
pub mod requests;
pub mod value;

// Re-exports for convenience
pub mod prelude {
    pub use crate::catalog::{BusStats, Catalog, StopStats};
    pub use crate::distance::{great_circle_distance, road_distance, GreatCircle, Metric, RoadDistance};
    pub use crate::identifiers::*;
    pub use crate::models::*;
    pub use crate::requests::{process_document, process_lines, Batch};
    pub use crate::value::{Value, WriteOptions};
}

pub use prelude::*;
