//! Convenience interfaces for common decoding patterns.
//!
//! The functions in this module decode documents from readers and data
//! slices, publishing to the [`FromSamples`] trait. A
//! [`GridBuilder`](crate::grid::GridBuilder) is the usual receiver:
//!
//! ```
//! let mut builder = GridBuilder::default();
//! let meta = tercet::avec::decode_slice(&data, &mut builder, SentinelPolicy::Strict)?;
//! let grid = builder.finish()?;
//! ```

use either::Either::{Left, Right};
use log::{debug, info, warn};

use crate::sans::{
    Decoder,
    buffer::BufferMeta,
    header::{AnyRecord, RecordError, RecordTag, Skip},
    sample::{
        CHANNEL_WORDS, CHANNELS, SAMPLE_LEN, SampleStream, SampleStreamError, SentinelError,
    },
};

#[cfg(feature = "std")]
pub mod reader;
pub mod slice;

#[cfg(feature = "std")]
pub use reader::decode as decode_reader;
pub use slice::decode as decode_slice;

/// What to do on a nonzero sentinel word in the sample block.
///
/// A nonzero sentinel most likely means the sample block is misaligned, in
/// which case every later value is garbage. Under [`SentinelPolicy::Lenient`]
/// the sentinel is logged and decoding continues from the same position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SentinelPolicy {
    /// Fail before publishing any value of the affected channel block.
    #[default]
    Strict,
    /// Log a warning and publish the channel block as read.
    Lenient,
}

/// Receive header records and sample values for a document.
///
/// Values are published as raw words. Header records arrive in document
/// order, followed by a single call to [`FromSamples::begin`], followed by the
/// samples in order.
///
/// The default implementation of each method ignores received values.
#[allow(unused_variables)]
pub trait FromSamples {
    /// Note a header record, including containers, as it is scanned.
    fn add_record(&mut self, tag: RecordTag) {}
    /// Add the metadata of a buffer header record.
    fn add_buffer_meta(&mut self, meta: BufferMeta) {}
    /// Begin the sample block, sized by the metadata in effect.
    fn begin(&mut self, meta: BufferMeta) {}
    /// Add the main level of each channel for a sample.
    fn add_main_levels(&mut self, sample: u32, levels: [i16; CHANNELS]) {}
    /// Add the band levels and totals of a channel for a sample.
    fn add_bands(&mut self, sample: u32, channel: u8, values: [i16; CHANNEL_WORDS]) {}
}

/// A source of document bytes, read front to back.
trait Source {
    type Error: From<RecordError> + From<SampleStreamError> + From<SentinelError>;

    /// Take an exact number of bytes from the source.
    fn take<const N: usize>(&mut self) -> Result<[u8; N], Self::Error>;

    /// Discard an exact number of bytes from the source.
    fn skip(&mut self, n: usize) -> Result<(), Self::Error>;

    /// Fail early if a source of known length holds fewer than `n` more bytes.
    #[allow(unused_variables)]
    fn require(&self, n: usize) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Decode a document from a source, publishing to a receiver.
///
/// Returns the buffer metadata used to size the sample block.
fn decode<S: Source>(
    r: &mut S,
    o: &mut impl FromSamples,
    policy: SentinelPolicy,
) -> Result<BufferMeta, S::Error> {
    let (stream, meta) = decode_headers(r, o)?;

    let meta = meta.unwrap_or_else(|| {
        let meta = BufferMeta::default();
        warn!("No buffer header found, assuming {meta:?}");
        meta
    });

    if let Ok(samples) = usize::try_from(meta.sample_count) {
        r.require(samples.saturating_mul(SAMPLE_LEN))?;
    }

    o.begin(meta);
    decode_samples(stream, meta, r, o, policy)?;

    info!(
        "Decoded {} samples at {} ms intervals",
        meta.sample_count, meta.step_millis
    );

    Ok(meta)
}

/// Walk the header records up to the sample block.
fn decode_headers<S: Source>(
    r: &mut S,
    o: &mut impl FromSamples,
) -> Result<(SampleStream, Option<BufferMeta>), S::Error> {
    let mut record_header = Decoder::advance(r.take()?);
    let mut meta = None;

    let stream = loop {
        let (tag, successor) = record_header.advance(r.take()?);

        o.add_record(tag);

        let body = match successor {
            Left(state) => {
                debug!("Entering container {tag}");
                record_header = state.advance(r.take()?);
                continue;
            }
            Right(Left(state)) => state.advance(r.take()?)?,
            Right(Right(state)) => state,
        };

        debug!("Record {tag} of {} words", body.length());

        record_header = match body.dispatch()? {
            AnyRecord::Buffer(state) => {
                let (m, state) = state.advance(r.take()?);
                info!(
                    "Buffer header: {} samples at {} ms intervals",
                    m.sample_count, m.step_millis
                );
                o.add_buffer_meta(m);
                meta = Some(m);
                skip(r, state)?
            }
            AnyRecord::Other(state) => skip(r, state)?,
            AnyRecord::Spectrum(state) => break skip(r, state)?,
        };
    };

    Ok((stream, meta))
}

/// Walk the sample block.
fn decode_samples<S: Source>(
    stream: SampleStream,
    meta: BufferMeta,
    r: &mut S,
    o: &mut impl FromSamples,
    policy: SentinelPolicy,
) -> Result<(), S::Error> {
    let mut main_levels = stream.advance(meta.sample_count)?;

    while let Some(state) = main_levels {
        let sample = state.sample();
        let (levels, mut sentinel) = state.advance(r.take()?);

        o.add_main_levels(sample, levels);

        main_levels = loop {
            let (check, bands) = sentinel.advance(r.take()?);

            if let Err(err) = check {
                match policy {
                    SentinelPolicy::Strict => Err(err)?,
                    SentinelPolicy::Lenient => warn!("{err}"),
                }
            }

            let channel = bands.channel();
            let (values, successor) = bands.advance(r.take()?);

            o.add_bands(sample, channel, values);

            sentinel = match successor {
                Left(state) => state,
                Right(state) => break state,
            };
        };
    }

    Ok(())
}

fn skip<S: Source, T>(r: &mut S, state: Skip<T>) -> Result<T, S::Error> {
    r.skip(state.len())?;
    Ok(state.advance())
}
