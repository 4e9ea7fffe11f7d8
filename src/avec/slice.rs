//! Slice-based decoder implementation.

use thiserror::Error;

use crate::sans::{
    buffer::BufferMeta,
    header::RecordError,
    sample::{SampleStreamError, SentinelError},
};

use super::{FromSamples, SentinelPolicy, Source};

/// Errors occurring while decoding from a slice.
#[derive(Debug, Error)]
pub enum Error {
    /// Unexpectedly reached the end of the slice.
    #[error("Unexpectedly reached the end of the slice.")]
    UnexpectedEof,
    /// Found a nonzero sentinel word under the strict policy.
    #[error("Corrupt sample: {0}")]
    CorruptSample(#[from] SentinelError),
    /// Found a header record that cannot be decoded.
    #[error("Invalid header record: {0}")]
    Record(#[from] RecordError),
    /// Found a sample block that cannot be decoded.
    #[error("Invalid sample block: {0}")]
    Stream(#[from] SampleStreamError),
}

/// Decode a document from a slice, publishing to a receiver.
///
/// Returns the buffer metadata used to size the sample block. Bytes following
/// the sample block are ignored. A slice too short for the declared sample
/// count fails before any sample is published.
///
/// This method is also re-exported as `tercet::avec::decode_slice`.
pub fn decode(
    r: &[u8],
    o: &mut impl FromSamples,
    policy: SentinelPolicy,
) -> Result<BufferMeta, Error> {
    super::decode(&mut SliceSource { r, i: 0 }, o, policy)
}

struct SliceSource<'a> {
    r: &'a [u8],
    /// Offset of the next unread byte.
    i: usize,
}

impl Source for SliceSource<'_> {
    type Error = Error;

    /// Take an exact number of bytes from the offset, advancing the offset.
    fn take<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let s = self.i;
        let e = s.checked_add(N).ok_or(Error::UnexpectedEof)?;

        let bytes = self.r.get(s..e).ok_or(Error::UnexpectedEof)?;
        self.i = e;

        Ok(bytes.try_into().unwrap())
    }

    fn skip(&mut self, n: usize) -> Result<(), Error> {
        let e = self.i.checked_add(n).ok_or(Error::UnexpectedEof)?;

        if e > self.r.len() {
            Err(Error::UnexpectedEof)?;
        }

        self.i = e;
        Ok(())
    }

    fn require(&self, n: usize) -> Result<(), Error> {
        if self.r.len() - self.i < n {
            Err(Error::UnexpectedEof)?;
        }

        Ok(())
    }
}
