//! Moderation queue for submitted ideas.
//!
//! Each admin works on an in-memory working set loaded from the idea store.
//! Filtering is pure and runs over that set; approve/reject/feature/unfeature
//! go to the store first and only touch the working set once confirmed.

pub mod filter;
pub mod preview;
pub mod queue;
pub mod registry;
pub mod store;

pub use filter::{CategoryFilter, FeaturedFilter, IdeaFilter};
pub use preview::PreviewKind;
pub use queue::{ModerationError, ModerationQueue, QueueView};
pub use registry::QueueRegistry;
pub use store::{IdeaStore, PgStore, ProfileStore, StoreError, StoreFailure};
