//! Per-thread message buffers.
//!
//! A [`ContextStore`] gives every calling thread its own ordered list of
//! strings. Threads never see each other's lists; a list is created empty on
//! first use and dropped with its thread.

pub mod errors;
pub mod context;
mod slots;
mod snapshot;
mod store;

pub use context::BufferOptions;
pub use errors::{BufferError, Result};
pub use slots::StoreId;
pub use snapshot::Snapshot;
pub use store::ContextStore;
