//! Catalog data models and types.

pub mod bus;
pub mod stop;
pub mod types;

// Re-exports for convenience
pub use bus::Bus;
pub use stop::Stop;
pub use types::{Result, RouteKind, TransitError};
