//! Byte-range algebra for s3lite.
//!
//! This crate turns an HTTP `Range` request header into concrete byte spans
//! of an object:
//!
//! - [`ByteRange`] is a single inclusive span in closed, open-ended or suffix
//!   form, resolved against an object length with [`ByteRange::resolve`].
//! - [`RangeSet`] keeps ranges sorted and merged (overlapping or adjacent
//!   ranges collapse into one).
//! - [`parse_range_header`] parses `bytes=a-b,c-` values.
//! - [`RangeReader`] exposes only the bytes of a resolved range from any
//!   [`std::io::Read`] source.
//!
//! # Example
//!
//! ```
//! use s3lite_range::parse_range_header;
//!
//! let set = parse_range_header("bytes=500-600,601-999").unwrap();
//! assert_eq!(set.len(), 1);
//!
//! let resolved = set.resolve(10_000).unwrap();
//! assert_eq!(resolved.total_length(), Some(500));
//! ```

mod error;
mod header;
mod range;
mod reader;
mod set;

pub use error::RangeError;
pub use header::{parse_range_header, resolve_range_header};
pub use range::ByteRange;
pub use reader::RangeReader;
pub use set::RangeSet;
