//! Shortest-path search for the gridpath workspace.
//!
//! The search is plain unweighted breadth-first search over the four
//! cardinal neighbours, with two properties the interactive layer leans
//! on:
//!
//! - **Cooperative cancellation**: the engine polls a
//!   [`CancelToken`](gridpath_core::CancelToken) at a configurable cadence
//!   and abandons a search that nobody wants anymore
//!   ([`PathResult::Cancelled`]).
//! - **Step budgets**: preview searches run through
//!   [`PathEngine::bfs_path_bounded`], which gives up after a fixed number
//!   of dequeues and returns a best-effort [`PathResult::Partial`] prefix
//!   instead of blocking the slot.
//!
//! All searches run through [`PathEngine`], which owns and reuses its
//! scratch buffers so repeated queries incur no allocations after
//! warm-up.

mod bfs;
mod distance;
mod engine;

pub use distance::manhattan;
pub use engine::{EngineConfig, PathEngine, PathResult};
