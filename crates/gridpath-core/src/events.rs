//! Typed change notification over mpsc channels.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::cell::MarkerKind;
use crate::geom::Point;

/// A change notification from a [`GridStore`](crate::GridStore).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridEvent {
    /// Cell contents changed (walls regenerated, marker stamped or
    /// reverted, grid reinitialized). Subscribers re-read the grid.
    Changed,
    /// A marker moved or was cleared. `at` is the new coordinate, `None`
    /// when the marker was removed.
    Marker {
        kind: MarkerKind,
        at: Option<Point>,
    },
}

impl GridEvent {
    /// Shorthand for a marker event.
    #[inline]
    pub const fn marker(kind: MarkerKind, at: Option<Point>) -> Self {
        GridEvent::Marker { kind, at }
    }
}

/// Fan-out of cloned events to any number of mpsc subscribers.
///
/// Emission never blocks and never fails: subscribers whose receiver has
/// been dropped are pruned on the next emit. A hub with no subscribers
/// swallows events, so emitters need no special empty-case handling.
#[derive(Debug, Default)]
pub struct EventHub<E> {
    senders: Vec<Sender<E>>,
}

impl<E: Clone> EventHub<E> {
    /// Create a hub with no subscribers.
    pub fn new() -> Self {
        Self {
            senders: Vec::new(),
        }
    }

    /// Register a new subscriber and return its receiving end.
    pub fn subscribe(&mut self) -> Receiver<E> {
        let (tx, rx) = mpsc::channel();
        self.senders.push(tx);
        rx
    }

    /// Number of live subscribers as of the last emit.
    #[inline]
    pub fn subscriber_count(&self) -> usize {
        self.senders.len()
    }

    /// Send a clone of `event` to every live subscriber, dropping the
    /// ones that have disconnected.
    pub fn emit(&mut self, event: E) {
        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
