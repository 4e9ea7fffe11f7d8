//! States processing the buffer header record.

use zerocopy::FromBytes;

use super::{
    header::{AnyRecord, RecordBody, RecordError, RecordHeader, Skip},
    word::{read_signed_long, read_signed_word},
};

/// Words of a buffer header body holding extracted fields.
const FIXED_WORDS: u16 = 7;

/// Measurement step interval and sample count of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferMeta {
    /// Interval between consecutive samples, in milliseconds.
    pub step_millis: i16,
    /// Number of samples in the sample block.
    pub sample_count: i32,
}

impl Default for BufferMeta {
    /// Values assumed for a document without a buffer header.
    fn default() -> Self {
        Self {
            step_millis: 100,
            sample_count: 160,
        }
    }
}

/// State token to decode the body of a buffer header.
#[derive(Debug)]
pub struct BufferHeader {
    pub(super) words: u16,
}

impl BufferHeader {
    pub(super) fn from_body(body: RecordBody) -> Result<AnyRecord, RecordError> {
        let words = body.words();

        if words < FIXED_WORDS {
            Err(RecordError::InvalidLength {
                tag: body.tag(),
                length: body.length(),
            })?;
        }

        Ok(AnyRecord::Buffer(BufferHeader { words }))
    }

    /// Transition to another state by decoding the fixed fields of a buffer
    /// header.
    ///
    /// Returns the buffer metadata, and a successor state token skipping the
    /// remainder of the record.
    pub fn advance(self, r: [u8; 14]) -> (BufferMeta, Skip<RecordHeader>) {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct Body {
            _reserved: [u8; 4],
            step: [u8; 2],
            _reserved_alt: [u8; 4],
            samples: [u8; 4],
        }

        let Body { step, samples, .. } = zerocopy::transmute!(r);

        let meta = BufferMeta {
            step_millis: read_signed_word(step),
            sample_count: read_signed_long(samples),
        };

        let successor = Skip::new(self.words - FIXED_WORDS, RecordHeader(()));

        (meta, successor)
    }
}
