use tracing::debug;

use crate::error::RangeError;
use crate::range::ByteRange;
use crate::set::RangeSet;

/// Parse an HTTP `Range` header value such as `bytes=0-499,1000-`.
///
/// Each comma-separated token is `start-end` or `start-`. Suffix tokens
/// (`-N`) are rejected with [`RangeError::NotImplemented`]; anything else
/// malformed fails with [`RangeError::InvalidRange`].
///
/// # Examples
///
/// ```
/// use s3lite_range::{parse_range_header, RangeError};
///
/// let set = parse_range_header("bytes=0-99,100-").unwrap();
/// assert_eq!(set.len(), 1);
///
/// assert!(matches!(
///     parse_range_header("bytes=-500"),
///     Err(RangeError::NotImplemented(_))
/// ));
/// ```
pub fn parse_range_header(value: &str) -> Result<RangeSet, RangeError> {
    let specs = value
        .trim()
        .strip_prefix("bytes=")
        .ok_or_else(|| RangeError::InvalidRange(format!("missing bytes= unit: {value}")))?;

    let mut set = RangeSet::new();
    for token in specs.split(',') {
        set.add(parse_range_spec(token.trim(), value)?);
    }
    Ok(set)
}

/// Parse and resolve a `Range` header for a single-range response.
///
/// # Examples
///
/// ```
/// use s3lite_range::resolve_range_header;
///
/// let range = resolve_range_header("bytes=500-", 1000).unwrap();
/// assert_eq!(range.content_range(1000), "bytes 500-999/1000");
/// ```
pub fn resolve_range_header(value: &str, length: u64) -> Result<ByteRange, RangeError> {
    let range = parse_range_header(value)?.resolve(length)?.single()?;
    debug!(header = value, length, range = %range, "resolved range header");
    Ok(range)
}

fn parse_range_spec(token: &str, header: &str) -> Result<ByteRange, RangeError> {
    if token.starts_with('-') {
        return Err(RangeError::NotImplemented(format!(
            "suffix byte ranges are not supported: {token}"
        )));
    }

    let invalid = || RangeError::InvalidRange(header.to_owned());
    let (start, end) = token.split_once('-').ok_or_else(invalid)?;
    let start = parse_offset(start).ok_or_else(invalid)?;

    if end.is_empty() {
        return Ok(ByteRange::open_ended(start));
    }

    let end = parse_offset(end).ok_or_else(invalid)?;
    if start > end {
        return Err(invalid());
    }
    Ok(ByteRange::closed(start, end))
}

fn parse_offset(text: &str) -> Option<i64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
