//! Bucket key listing for s3lite.
//!
//! Implements `ListObjects` pagination over any ordered key source:
//! prefix filtering, resuming after a marker, rolling keys up into common
//! prefixes at a delimiter, and truncating at `max-keys` (capped at 1000).
//!
//! Storage backends only provide a [`KeySource`]; the paging rules live in
//! [`ListingPaginator`] and are shared by every backend.
//!
//! Listing never fails: an empty bucket or a prefix that matches nothing
//! yields an empty, non-truncated page.

mod entry;
mod paginator;
mod source;

pub use entry::{ListEntry, ObjectMetadata, ObjectSummary};
pub use paginator::{ListingPaginator, ListingQuery, ListingResult, list_keys};
pub use source::{KeySource, MemoryKeySource};
