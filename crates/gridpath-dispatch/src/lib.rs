//! Request coordination for interactive pathfinding.
//!
//! Pointer movement produces path requests far faster than anyone wants
//! to run searches, and the searches run off-thread, so results can come
//! back after the world has moved on. This crate is the discipline
//! around that:
//!
//! - **Debounce**: preview requests coalesce for a short window
//!   ([`CoordinatorConfig::debounce`]); only the latest target is
//!   dispatched.
//! - **Generations**: every dispatched search carries a monotonically
//!   increasing generation. A result is delivered only while its
//!   generation is still the latest of its kind; anything older is
//!   dropped without a trace.
//! - **Pre-emption**: a final request cancels the pending debounce and
//!   whatever occupies the background slot, then dispatches immediately.
//!   Cancellation is cooperative; cancelled searches are discarded, never
//!   surfaced.
//!
//! The [`Coordinator`] lives on the interactive thread and is driven by
//! [`poll`](Coordinator::poll); one background worker thread executes the
//! searches. Delivered results arrive as [`PathEvent`]s on subscriber
//! channels.

mod coordinator;
mod request;
mod worker;

pub use coordinator::{Coordinator, CoordinatorConfig, Phase};
pub use request::{PathEvent, Request, RequestKind};
