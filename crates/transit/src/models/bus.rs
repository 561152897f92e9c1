//! Bus routes.

use std::collections::HashSet;

use crate::identifiers::{BusIdentifier, StopIdentifier};
use crate::models::types::RouteKind;

/// A bus route: an ordered list of stop names plus its topology.
///
/// Stop names may repeat; order is significant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bus {
    pub name: BusIdentifier,
    pub stops: Vec<StopIdentifier>,
    pub kind: RouteKind,
}

impl Bus {
    pub fn new<S>(name: impl Into<BusIdentifier>, stops: impl IntoIterator<Item = S>, kind: RouteKind) -> Self
    where
        S: Into<StopIdentifier>,
    {
        Self {
            name: name.into(),
            stops: stops.into_iter().map(Into::into).collect(),
            kind,
        }
    }

    pub fn is_roundtrip(&self) -> bool {
        self.kind.is_roundtrip()
    }

    /// Stops visited on one full run.
    ///
    /// A linear route passes its far end once, so it counts `2N - 1`.
    pub fn stop_count(&self) -> usize {
        let listed = self.stops.len();
        match self.kind {
            RouteKind::Roundtrip => listed,
            RouteKind::Linear => (2 * listed).saturating_sub(1),
        }
    }

    pub fn unique_stop_count(&self) -> usize {
        self.stops.iter().collect::<HashSet<_>>().len()
    }

    /// Consecutive `(from, to)` pairs of one full run, in travel order.
    ///
    /// Linear routes yield the reversed pairs after the forward ones, so
    /// direction-dependent metrics see every leg as it is actually driven.
    pub fn legs(&self) -> impl Iterator<Item = (&StopIdentifier, &StopIdentifier)> + '_ {
        let forward = self.stops.windows(2).map(|pair| (&pair[0], &pair[1]));
        let backward = self
            .stops
            .windows(2)
            .rev()
            .map(|pair| (&pair[1], &pair[0]))
            .take_while(move |_| !self.is_roundtrip());
        forward.chain(backward)
    }
}
