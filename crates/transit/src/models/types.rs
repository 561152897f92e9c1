//! Core data types and enums for catalog data.

use crate::identifiers::*;

// ============================================================================
// Enums
// ============================================================================

/// Route topology of a bus
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteKind {
    /// Closed loop: visits the listed stops once and returns to the start
    /// without reversing.
    Roundtrip,
    /// Out-and-back: travels the listed stops forward, then in reverse.
    Linear,
}

impl RouteKind {
    pub fn from_roundtrip_flag(is_roundtrip: bool) -> Self {
        if is_roundtrip {
            Self::Roundtrip
        } else {
            Self::Linear
        }
    }

    pub fn is_roundtrip(self) -> bool {
        self == Self::Roundtrip
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Unknown request type: {0}")]
    UnknownRequestType(String),

    #[error("Bus not found: {0}")]
    BusNotFound(BusIdentifier),

    #[error("Stop not found: {0}")]
    StopNotFound(StopIdentifier),

    #[error("No road distance between {from} and {to}")]
    MissingDistance {
        from: StopIdentifier,
        to: StopIdentifier,
    },

    #[error("Stop {0} is used by a route but was never defined")]
    UndefinedStop(StopIdentifier),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransitError {
    /// True for the query-time errors that are answered per request
    /// instead of aborting the batch.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BusNotFound(_) | Self::StopNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, TransitError>;
