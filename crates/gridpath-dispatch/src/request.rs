//! Request and delivery vocabulary.

use gridpath_core::Point;
use gridpath_search::PathResult;

/// The two flavours of path request.
///
/// Previews are cheap, debounced and step-limited; finals pre-empt
/// everything and run to completion.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RequestKind {
    Preview,
    Final,
}

/// A dispatched search request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Request {
    pub kind: RequestKind,
    /// Where the path should lead. The origin is always the store's
    /// start marker at dispatch time.
    pub target: Point,
    /// Staleness tag: strictly increasing across all requests of a
    /// coordinator, both kinds drawing from the same counter.
    pub generation: u64,
}

/// A delivered search outcome.
///
/// Subscribers only ever see fresh events: the coordinator drops stale
/// and cancelled results before they get here.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathEvent {
    pub kind: RequestKind,
    pub generation: u64,
    pub result: PathResult,
}
