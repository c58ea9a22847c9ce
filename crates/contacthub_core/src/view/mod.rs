//! Derived contact views for display.
//!
//! # Responsibility
//! - Compute the filtered, searched and sorted contact sequence.
//! - Provide sidebar aggregates and group lookups with display fallbacks.
//!
//! # Invariants
//! - Views are recomputed from scratch and never persisted.
//! - Pipeline order is group filter, then search, then sort.

mod pipeline;
mod summary;

pub use pipeline::{derive_view, SortMode, ViewQuery};
pub use summary::{group_color, group_counts, group_name, GroupCounts};
