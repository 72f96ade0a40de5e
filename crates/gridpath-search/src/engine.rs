use std::collections::VecDeque;

use gridpath_core::Point;

/// Sentinel parent index meaning "no predecessor".
pub(crate) const NO_PARENT: usize = usize::MAX;

/// Tuning knobs for [`PathEngine`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Grids with more cells than this are not searched at all; the
    /// engine answers [`PathResult::NotFound`] without touching them.
    pub max_cells: usize,
    /// How many dequeues happen between cancellation polls. Values below
    /// 1 are treated as 1.
    pub cancel_check_interval: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_cells: 10_000,
            cancel_check_interval: 64,
        }
    }
}

/// Outcome of a search.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathResult {
    /// Complete path from start to target, inclusive (length >= 1).
    Found(Vec<Point>),
    /// A bounded search ran out of budget: a best-effort prefix from the
    /// start toward the target, ending at the newest frontier node.
    Partial(Vec<Point>),
    /// No path exists (or the search refused to run).
    NotFound,
    /// Cancellation was observed mid-search. The dispatch layer discards
    /// these without emitting anything.
    Cancelled,
}

impl PathResult {
    /// The points of a [`Found`](Self::Found) or
    /// [`Partial`](Self::Partial) path.
    pub fn points(&self) -> Option<&[Point]> {
        match self {
            PathResult::Found(p) | PathResult::Partial(p) => Some(p),
            PathResult::NotFound | PathResult::Cancelled => None,
        }
    }

    /// Whether this is a complete start-to-target path.
    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, PathResult::Found(_))
    }
}

/// Breadth-first search engine owning its scratch buffers.
///
/// The visited bitmap, back-pointer array and frontier queue are resized
/// to the grid on each search and their allocations reused across
/// searches, so a long-lived engine (one per worker) stops allocating
/// once it has seen the largest grid it will be asked about.
pub struct PathEngine {
    pub(crate) config: EngineConfig,
    pub(crate) visited: Vec<bool>,
    pub(crate) parent: Vec<usize>,
    pub(crate) queue: VecDeque<usize>,
}

impl PathEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            visited: Vec::new(),
            parent: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    /// The engine's configuration.
    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Reset the scratch buffers for a grid of `len` cells.
    pub(crate) fn prepare(&mut self, len: usize) {
        self.visited.clear();
        self.visited.resize(len, false);
        self.parent.clear();
        self.parent.resize(len, NO_PARENT);
        self.queue.clear();
    }

    /// Walk back-pointers from `tail` to the search origin, returning
    /// the path in start-to-tail order.
    pub(crate) fn reconstruct(&self, width: i32, tail: usize) -> Vec<Point> {
        let w = width as usize;
        let mut path = Vec::new();
        let mut idx = tail;
        while idx != NO_PARENT {
            path.push(Point::new((idx % w) as i32, (idx / w) as i32));
            idx = self.parent[idx];
        }
        path.reverse();
        path
    }
}

impl Default for PathEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn engine_config_fills_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());

        let config: EngineConfig = serde_json::from_str(r#"{"max_cells": 400}"#).unwrap();
        assert_eq!(config.max_cells, 400);
        assert_eq!(config.cancel_check_interval, 64);
    }
}
