//! Grid data model for an interactive pathfinder.
//!
//! This crate holds the pieces every other layer builds on:
//!
//! - [`Point`]: integer grid coordinate.
//! - [`CellKind`]: what a cell is (`Empty`, `Wall`, `Start`, `End`).
//! - [`Grid`]: the pure cell container; cheap to clone, which is how
//!   snapshots are handed to background searches.
//! - [`GridStore`]: the event-emitting owner of a [`Grid`] plus the
//!   optional start/end markers; all mutation goes through it.
//! - [`EventHub`] / [`GridEvent`]: typed change notification over mpsc
//!   channels.
//! - [`CancelToken`]: cooperative cancellation shared between the
//!   interactive context and background searches.
//!
//! The store enforces the marker invariants (at most one start, one end,
//! both on empty cells); the grid itself is plain data and enforces only
//! its bounds.

mod cell;
mod context;
mod events;
mod geom;
mod grid;
mod store;

pub use cell::{CellKind, MarkerKind};
pub use context::CancelToken;
pub use events::{EventHub, GridEvent};
pub use geom::Point;
pub use grid::{Grid, MAX_GRID_DIM, MIN_GRID_DIM};
pub use store::{DEFAULT_WALL_PROBABILITY, GridStore};
