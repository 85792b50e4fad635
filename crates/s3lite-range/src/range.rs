use std::fmt;

use tracing::debug;

use crate::error::RangeError;

/// An inclusive byte span of an object.
///
/// A range takes one of three forms:
///
/// - closed: `start` and `end` are both concrete offsets,
/// - open-ended: `end` is [`ByteRange::OPEN_ENDED`] ("from `start` to the end"),
/// - suffix: `start` is negative and means "the last `|start|` bytes".
///
/// A range is resolved once `start >= 0` and `end` is concrete; resolving
/// needs the absolute content length.
///
/// # Examples
///
/// ```
/// use s3lite_range::ByteRange;
///
/// let range = ByteRange::open_ended(9500).resolve(10_000).unwrap();
/// assert_eq!((range.start(), range.end()), (9500, 9999));
/// assert_eq!(range.length(), Some(500));
///
/// // Closed ranges past the end are squeezed, not rejected.
/// let range = ByteRange::closed(5, 20).resolve(10).unwrap();
/// assert_eq!(range.end(), 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    start: i64,
    end: i64,
}

impl ByteRange {
    /// Sentinel `end` of an open-ended range.
    pub const OPEN_ENDED: i64 = i64::MAX;

    /// A closed range `[start, end]`.
    #[must_use]
    pub fn closed(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// A range from `start` to the end of the content.
    #[must_use]
    pub fn open_ended(start: i64) -> Self {
        Self {
            start,
            end: Self::OPEN_ENDED,
        }
    }

    /// The last `count` bytes of the content.
    #[must_use]
    pub fn suffix(count: i64) -> Self {
        Self {
            start: -count.abs(),
            end: Self::OPEN_ENDED,
        }
    }

    /// First offset, or the negated suffix length for suffix ranges.
    #[must_use]
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Last offset (inclusive), or [`ByteRange::OPEN_ENDED`].
    #[must_use]
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Whether this range has concrete, non-negative bounds.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.start >= 0 && self.end != Self::OPEN_ENDED
    }

    /// Resolve this range against an absolute content length.
    ///
    /// Suffix ranges become `[max(0, length - n), length - 1]`, open ends
    /// become `length - 1`, and closed ends past the content are squeezed to
    /// `length - 1`. A start at or beyond `length` is not satisfiable.
    pub fn resolve(self, length: u64) -> Result<Self, RangeError> {
        let len = i64::try_from(length).unwrap_or(i64::MAX);
        let mut start = self.start;
        let mut end = self.end;

        if start < 0 {
            start = len.saturating_add(start).max(0);
            end = len - 1;
        }
        if start >= len {
            debug!(start = self.start, length, "range not satisfiable");
            return Err(RangeError::RangeNotSatisfiable {
                start: self.start,
                length,
            });
        }
        if end == Self::OPEN_ENDED || end >= len {
            end = len - 1;
        }

        Ok(Self { start, end })
    }

    /// Number of bytes covered, or `None` while unresolved.
    #[must_use]
    pub fn length(&self) -> Option<u64> {
        if !self.is_resolved() || self.end < self.start {
            return None;
        }
        u64::try_from(self.end - self.start + 1).ok()
    }

    /// Whether `index` lies inside this range.
    #[must_use]
    pub fn includes(&self, index: i64) -> bool {
        self.start <= index && index <= self.end
    }

    /// Whether `other` overlaps or directly touches this range.
    ///
    /// Holds when an endpoint of either range falls inside the other, or when
    /// the two are exactly adjacent. The relation is symmetric.
    #[must_use]
    pub fn combinable(&self, other: &Self) -> bool {
        self.includes(other.start)
            || self.includes(other.end)
            || other.includes(self.start)
            || other.includes(self.end)
            || self.end.checked_add(1) == Some(other.start)
            || other.end.checked_add(1) == Some(self.start)
    }

    /// The smallest range covering both, or `None` when they are not combinable.
    #[must_use]
    pub fn combine(&self, other: &Self) -> Option<Self> {
        self.combinable(other).then(|| Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        })
    }

    /// `Content-Range` header value for this range of a `total`-byte object.
    #[must_use]
    pub fn content_range(&self, total: u64) -> String {
        format!("bytes {}-{}/{total}", self.start, self.end)
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start < 0, self.end == Self::OPEN_ENDED) {
            (true, _) => write!(f, "{}", self.start),
            (false, true) => write!(f, "{}-", self.start),
            (false, false) => write!(f, "{}-{}", self.start, self.end),
        }
    }
}
