use std::io::{self, Read};

use crate::error::RangeError;
use crate::range::ByteRange;

/// A reader that yields only the bytes of a resolved range.
///
/// Bytes before the range start are skipped on the first read and reads past
/// the range end return end-of-stream. The reader can be pointed at a later
/// range with [`RangeReader::set_range`], but it never rewinds.
///
/// # Examples
///
/// ```
/// use std::io::Read;
/// use s3lite_range::{ByteRange, RangeReader};
///
/// let mut reader = RangeReader::new(&b"hello world"[..], ByteRange::closed(6, 10)).unwrap();
/// let mut out = String::new();
/// reader.read_to_string(&mut out).unwrap();
/// assert_eq!(out, "world");
/// ```
#[derive(Debug)]
pub struct RangeReader<R> {
    inner: R,
    position: u64,
    start: u64,
    end: u64,
}

impl<R: Read> RangeReader<R> {
    /// Wrap `inner`, positioned at offset 0, exposing `range`.
    pub fn new(inner: R, range: ByteRange) -> Result<Self, RangeError> {
        let (start, end) = bounds(range)?;
        Ok(Self {
            inner,
            position: 0,
            start,
            end,
        })
    }

    /// Point the reader at a new range.
    ///
    /// Fails with [`RangeError::InvalidState`] when the new range starts
    /// before the current position.
    pub fn set_range(&mut self, range: ByteRange) -> Result<(), RangeError> {
        let (start, end) = bounds(range)?;
        if self.position > start {
            return Err(RangeError::InvalidState(format!(
                "cannot move back to offset {start}, reader is at {}",
                self.position
            )));
        }
        self.start = start;
        self.end = end;
        Ok(())
    }

    /// Offset of the next byte the underlying source will produce.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Consume the reader, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn skip_to_start(&mut self) -> io::Result<()> {
        if self.position < self.start {
            let wanted = self.start - self.position;
            let skipped = io::copy(&mut (&mut self.inner).take(wanted), &mut io::sink())?;
            self.position += skipped;
        }
        Ok(())
    }
}

impl<R: Read> Read for RangeReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.skip_to_start()?;
        if self.position < self.start || self.position > self.end || buf.is_empty() {
            return Ok(0);
        }

        let remaining = self.end - self.position + 1;
        let limit = usize::try_from(remaining).map_or(buf.len(), |r| r.min(buf.len()));
        let n = self.inner.read(&mut buf[..limit])?;
        self.position += n as u64;
        Ok(n)
    }
}

fn bounds(range: ByteRange) -> Result<(u64, u64), RangeError> {
    let unresolved = || RangeError::InvalidState(format!("range {range} is not resolved"));
    if !range.is_resolved() {
        return Err(unresolved());
    }
    let start = u64::try_from(range.start()).map_err(|_| unresolved())?;
    let end = u64::try_from(range.end()).map_err(|_| unresolved())?;
    Ok((start, end))
}
