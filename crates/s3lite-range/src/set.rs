use tracing::debug;

use crate::error::RangeError;
use crate::range::ByteRange;

/// Sorted set of pairwise non-combinable byte ranges.
///
/// Members are ordered by start offset, and no two members overlap or touch:
/// [`RangeSet::add`] merges a new range with every member it combines with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet {
    ranges: Vec<ByteRange>,
}

impl RangeSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a range, merging it with any member it overlaps or touches.
    pub fn add(&mut self, range: ByteRange) {
        let mut candidate = range;
        while let Some(index) = self.ranges.iter().position(|r| r.combinable(&candidate)) {
            let member = self.ranges.remove(index);
            if let Some(merged) = member.combine(&candidate) {
                candidate = merged;
            }
        }
        let at = self.ranges.partition_point(|r| r.start() < candidate.start());
        self.ranges.insert(at, candidate);
    }

    /// Resolve every member against `length`.
    ///
    /// Members starting at or beyond `length` are dropped and the survivors
    /// are merged again. Fails when nothing survives.
    pub fn resolve(&self, length: u64) -> Result<Self, RangeError> {
        let mut resolved = Self::new();
        for range in &self.ranges {
            match range.resolve(length) {
                Ok(r) => resolved.add(r),
                Err(RangeError::RangeNotSatisfiable { .. }) => {
                    debug!(range = %range, length, "dropping unsatisfiable range");
                }
                Err(e) => return Err(e),
            }
        }

        match resolved.ranges.first() {
            Some(_) => Ok(resolved),
            None => Err(RangeError::RangeNotSatisfiable {
                start: self.ranges.first().map_or(0, ByteRange::start),
                length,
            }),
        }
    }

    /// Sum of member lengths, or `None` when any member is unresolved.
    #[must_use]
    pub fn total_length(&self) -> Option<u64> {
        self.ranges.iter().map(ByteRange::length).sum()
    }

    /// Whether any member covers `index`.
    #[must_use]
    pub fn includes(&self, index: i64) -> bool {
        self.ranges.iter().any(|r| r.includes(index))
    }

    /// The only member of a single-range set.
    ///
    /// Multi-range responses are not served, so more than one member is
    /// reported as [`RangeError::NotImplemented`].
    pub fn single(&self) -> Result<ByteRange, RangeError> {
        match self.ranges.as_slice() {
            [range] => Ok(*range),
            [] => Err(RangeError::InvalidRange("empty range set".to_owned())),
            _ => Err(RangeError::NotImplemented(format!(
                "multiple ranges ({}) in one request",
                self.ranges.len()
            ))),
        }
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Members in ascending start order.
    pub fn iter(&self) -> std::slice::Iter<'_, ByteRange> {
        self.ranges.iter()
    }
}

impl FromIterator<ByteRange> for RangeSet {
    fn from_iter<I: IntoIterator<Item = ByteRange>>(iter: I) -> Self {
        let mut set = Self::new();
        for range in iter {
            set.add(range);
        }
        set
    }
}

impl<'a> IntoIterator for &'a RangeSet {
    type Item = &'a ByteRange;
    type IntoIter = std::slice::Iter<'a, ByteRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
