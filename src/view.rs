//! The filtered, sorted view of the canonical list.
//!
//! [`project`] is a pure function of the bookmarks, the [`MetadataTable`]
//! and the user's [`Criteria`]. It is re-run by the service whenever one of
//! those inputs changes; nothing here holds state between calls.
//!
//! [`MetadataTable`]: crate::metadata::MetadataTable

pub mod criteria;
pub mod projection;

pub use criteria::{CategoryFilter, Criteria, SortMode};
pub use projection::{EmptyState, ProjectedBookmark, Projection, project};
