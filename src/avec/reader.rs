//! Reader-based decoder implementation.
//!
//! _Requires Cargo feature `std`._

use std::io::{self, Read};

use thiserror::Error;

use crate::sans::{
    buffer::BufferMeta,
    header::RecordError,
    sample::{SampleStreamError, SentinelError},
};

use super::{FromSamples, SentinelPolicy, Source};

/// Errors occurring while decoding from a reader.
#[derive(Debug, Error)]
pub enum Error {
    /// The reader ended in the middle of a record or sample.
    #[error("Unexpectedly reached the end of the stream.")]
    UnexpectedEof,
    /// An error from the supplied reader.
    #[error(transparent)]
    Io(io::Error),
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

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => Self::UnexpectedEof,
            _ => Self::Io(err),
        }
    }
}

/// Decode a document from a reader, publishing to a receiver.
///
/// Reads no further than the end of the sample block. The reader is read
/// sequentially and never rewound, so consider wrapping unbuffered sources in
/// a [`std::io::BufReader`].
///
/// This method is also re-exported as `tercet::avec::decode_reader`.
///
/// _Requires Cargo feature `std`._
pub fn decode(
    r: &mut impl Read,
    o: &mut impl FromSamples,
    policy: SentinelPolicy,
) -> Result<BufferMeta, Error> {
    super::decode(&mut ReaderSource(r), o, policy)
}

struct ReaderSource<'a, R>(&'a mut R);

impl<R: Read> Source for ReaderSource<'_, R> {
    type Error = Error;

    fn take<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut buf = [0; N];
        self.0.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn skip(&mut self, n: usize) -> Result<(), Error> {
        let n = n as u64;
        let skipped = io::copy(&mut Read::take(&mut *self.0, n), &mut io::sink())?;

        if skipped != n {
            Err(Error::UnexpectedEof)?;
        }

        Ok(())
    }
}
