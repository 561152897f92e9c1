//! Request orchestration.
//!
//! Both input protocols decode into a [`Batch`]: ingestion requests
//! ("base requests") and queries ("stat requests"). Execution is two-phase.
//! Every base request is applied, in order, before the first query is
//! answered. Responses come back in query order.
//!
//! - [`document`]: structured value documents (`base_requests` /
//!   `stat_requests`).
//! - [`lines`]: the legacy line-oriented text protocol.

pub mod document;
pub mod lines;

use tracing::info;

use crate::catalog::{BusStats, Catalog, StopStats};
use crate::models::{Bus, Result, Stop, TransitError};

pub use document::process_document;
pub use lines::process_lines;

/// Entity a request refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestType {
    Bus,
    Stop,
}

impl RequestType {
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "Bus" => Ok(Self::Bus),
            "Stop" => Ok(Self::Stop),
            other => Err(TransitError::UnknownRequestType(other.to_owned())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bus => "Bus",
            Self::Stop => "Stop",
        }
    }
}

/// An ingestion command
#[derive(Clone, Debug, PartialEq)]
pub enum BaseRequest {
    Stop(Stop),
    Bus(Bus),
}

/// A query command
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatRequest {
    /// Caller-supplied id, echoed in the response. The legacy protocol has
    /// none.
    pub id: Option<i64>,
    pub request_type: RequestType,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Bus(BusStats),
    Stop(StopStats),
    NotFound { request_type: RequestType, name: String },
}

/// The answer to one [`StatRequest`]
#[derive(Clone, Debug, PartialEq)]
pub struct StatResponse {
    pub id: Option<i64>,
    pub outcome: Outcome,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Batch {
    pub base_requests: Vec<BaseRequest>,
    pub stat_requests: Vec<StatRequest>,
}

impl Batch {
    /// Build a catalog from the base requests, in listed order.
    pub fn build_catalog(&self) -> Catalog {
        let mut catalog = Catalog::new();
        for request in &self.base_requests {
            match request {
                BaseRequest::Stop(stop) => catalog.add_stop(stop.clone()),
                BaseRequest::Bus(bus) => catalog.add_bus(bus.clone()),
            }
        }
        info!(
            stops = catalog.num_stops(),
            buses = catalog.num_buses(),
            "catalog built"
        );
        catalog
    }

    /// Ingest everything, then answer every query.
    pub fn execute(&self) -> Result<Vec<StatResponse>> {
        let catalog = self.build_catalog();
        let responses = self
            .stat_requests
            .iter()
            .map(|request| answer(&catalog, request))
            .collect::<Result<Vec<_>>>()?;
        info!(queries = responses.len(), "queries answered");
        Ok(responses)
    }
}

/// Answer a single query.
///
/// Unknown buses and stops become a [`Outcome::NotFound`] response; any
/// other error aborts.
pub fn answer(catalog: &Catalog, request: &StatRequest) -> Result<StatResponse> {
    let result = match request.request_type {
        RequestType::Bus => catalog.query_bus(&request.name).map(Outcome::Bus),
        RequestType::Stop => catalog.query_stop(&request.name).map(Outcome::Stop),
    };

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) if e.is_not_found() => Outcome::NotFound {
            request_type: request.request_type,
            name: request.name.clone(),
        },
        Err(e) => return Err(e),
    };

    Ok(StatResponse {
        id: request.id,
        outcome,
    })
}
