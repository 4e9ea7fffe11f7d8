//! States processing the file preamble and header records.

use core::fmt;

use either::Either::{self, Left, Right};
use thiserror::Error;
use zerocopy::FromBytes;

use super::{buffer::BufferHeader, sample::SampleStream, word::read_unsigned_word};

/// Size of the opaque preamble opening every document, in bytes.
pub const PREAMBLE_LEN: usize = 32;

/// Tags of records wrapping nested records.
pub const CONTAINER_TAGS: [u8; 2] = [0x07, 0x09];

/// Tag of the record carrying the step interval and sample count.
pub const BUFFER_HEADER: u8 = 0x18;

/// Tag of the record preceding the sample block.
pub const SPECTRUM_BUFFER_HEADER: u8 = 0x21;

/// An error advancing over a header record.
#[derive(Debug, Error)]
pub enum RecordError {
    /// A record length too short to hold the record's own fields.
    #[error("Record {tag} declares a length of {length} words.")]
    InvalidLength { tag: RecordTag, length: u16 },
}

/// A header record tag.
///
/// Tags missing from the known table are carried as [`RecordTag::Unknown`],
/// and are skipped by their declared length like any other record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordTag {
    FileHeader,
    UnitHeader,
    UserText,
    GlobalSettings,
    ChannelSettingsHardware,
    ChannelSettingsSoftware,
    ProfileSettings,
    OctavesSettings,
    OctavesSettingsInChannels,
    BufferHeader,
    VectorSettings,
    SpectrumBufferHeader,
    TriggerEventSettings,
    CrossSpectrumSettings,
    Unknown(u8),
}

impl RecordTag {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0x01 => Self::FileHeader,
            0x02 => Self::UnitHeader,
            0x03 => Self::UserText,
            0x04 => Self::GlobalSettings,
            0x05 => Self::ChannelSettingsHardware,
            0x07 => Self::ChannelSettingsSoftware,
            0x08 => Self::ProfileSettings,
            0x09 => Self::OctavesSettings,
            0x0A => Self::OctavesSettingsInChannels,
            BUFFER_HEADER => Self::BufferHeader,
            0x1E => Self::VectorSettings,
            SPECTRUM_BUFFER_HEADER => Self::SpectrumBufferHeader,
            0x31 => Self::TriggerEventSettings,
            0x34 => Self::CrossSpectrumSettings,
            other => Self::Unknown(other),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            Self::FileHeader => 0x01,
            Self::UnitHeader => 0x02,
            Self::UserText => 0x03,
            Self::GlobalSettings => 0x04,
            Self::ChannelSettingsHardware => 0x05,
            Self::ChannelSettingsSoftware => 0x07,
            Self::ProfileSettings => 0x08,
            Self::OctavesSettings => 0x09,
            Self::OctavesSettingsInChannels => 0x0A,
            Self::BufferHeader => BUFFER_HEADER,
            Self::VectorSettings => 0x1E,
            Self::SpectrumBufferHeader => SPECTRUM_BUFFER_HEADER,
            Self::TriggerEventSettings => 0x31,
            Self::CrossSpectrumSettings => 0x34,
            Self::Unknown(v) => *v,
        }
    }

    /// Human-readable name of the record kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FileHeader => "file header",
            Self::UnitHeader => "unit header",
            Self::UserText => "user text",
            Self::GlobalSettings => "global settings",
            Self::ChannelSettingsHardware => "channel settings (hardware)",
            Self::ChannelSettingsSoftware => "channel settings (software)",
            Self::ProfileSettings => "profile settings",
            Self::OctavesSettings => "octaves settings",
            Self::OctavesSettingsInChannels => "octaves settings in channels",
            Self::BufferHeader => "buffer header",
            Self::VectorSettings => "vector settings",
            Self::SpectrumBufferHeader => "spectrum buffer header",
            Self::TriggerEventSettings => "trigger event settings",
            Self::CrossSpectrumSettings => "cross spectrum settings",
            Self::Unknown(_) => "unknown",
        }
    }

    /// Whether records with this tag wrap nested records.
    pub fn is_container(&self) -> bool {
        CONTAINER_TAGS.contains(&self.as_u8())
    }
}

impl fmt::Display for RecordTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x} ({})", self.as_u8(), self.name())
    }
}

/// State token to skip the document preamble.
#[derive(Debug)]
pub struct Preamble;

impl Preamble {
    /// Transition to another state by skipping the document preamble.
    ///
    /// The preamble is opaque. Returns the successor state token.
    pub fn advance(_r: [u8; PREAMBLE_LEN]) -> RecordHeader {
        RecordHeader(())
    }
}

/// State token to decode a record header.
#[derive(Debug)]
pub struct RecordHeader(pub(super) ());

impl RecordHeader {
    /// Transition to another state by decoding a record tag and length byte.
    ///
    /// Returns the record tag, and a successor state token: a container
    /// marker, an extended length word, or the record body.
    pub fn advance(
        self,
        r: [u8; 2],
    ) -> (RecordTag, Either<ContainerBody, Either<ExtendedLength, RecordBody>>) {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct Header {
            tag: u8,
            length: u8,
        }

        let Header { tag, length } = zerocopy::transmute!(r);

        let tag = RecordTag::from_u8(tag);

        let successor = if tag.is_container() {
            Left(ContainerBody(()))
        } else if length == 0 {
            Right(Left(ExtendedLength { tag }))
        } else {
            Right(Right(RecordBody {
                tag,
                length: length.into(),
            }))
        };

        (tag, successor)
    }
}

/// State token to skip the marker of a container record.
///
/// Containers wrap nested records, which are decoded as if they were not
/// nested. Their own length field is not meaningful.
#[derive(Debug)]
pub struct ContainerBody(pub(super) ());

impl ContainerBody {
    /// Transition to another state by skipping a container marker.
    ///
    /// Returns the successor state token.
    pub fn advance(self, _r: [u8; 2]) -> RecordHeader {
        RecordHeader(())
    }
}

/// State token to decode an extended record length.
#[derive(Debug)]
pub struct ExtendedLength {
    pub(super) tag: RecordTag,
}

impl ExtendedLength {
    /// Transition to another state by decoding an extended length word.
    ///
    /// Returns the successor state token, or an error if the extended length
    /// leaves no room for the length word itself.
    pub fn advance(self, r: [u8; 2]) -> Result<RecordBody, RecordError> {
        let extended = read_unsigned_word(r);

        match extended.checked_sub(1) {
            Some(length) if length != 0 => Ok(RecordBody {
                tag: self.tag,
                length,
            }),
            _ => Err(RecordError::InvalidLength {
                tag: self.tag,
                length: extended,
            }),
        }
    }
}

/// State token for the body of a record with a known length.
///
/// The length counts words, including one for the length itself.
#[derive(Debug)]
pub struct RecordBody {
    pub(super) tag: RecordTag,
    pub(super) length: u16,
}

/// Handler for the body of a record with a given tag.
type Handler = fn(RecordBody) -> Result<AnyRecord, RecordError>;

/// Records requiring more than a skip over their body.
const HANDLERS: [(u8, Handler); 2] = [
    (BUFFER_HEADER, BufferHeader::from_body),
    (SPECTRUM_BUFFER_HEADER, spectrum_buffer_header),
];

impl RecordBody {
    pub fn tag(&self) -> RecordTag {
        self.tag
    }

    /// Length of the record in words, including the length word.
    pub fn length(&self) -> u16 {
        self.length
    }

    /// Number of words following the length word.
    pub(super) fn words(&self) -> u16 {
        self.length - 1
    }

    /// Transition to another state by selecting a handler for the record tag.
    ///
    /// Records without a dedicated handler are skipped by their length.
    pub fn dispatch(self) -> Result<AnyRecord, RecordError> {
        let tag = self.tag.as_u8();

        let handler = HANDLERS
            .iter()
            .find(|(t, _)| *t == tag)
            .map_or(skip as Handler, |(_, h)| *h);

        handler(self)
    }
}

fn skip(body: RecordBody) -> Result<AnyRecord, RecordError> {
    Ok(AnyRecord::Other(Skip::new(body.words(), RecordHeader(()))))
}

fn spectrum_buffer_header(body: RecordBody) -> Result<AnyRecord, RecordError> {
    Ok(AnyRecord::Spectrum(Skip::new(body.words(), SampleStream(()))))
}

/// A state token for the body of a record.
#[derive(Debug)]
pub enum AnyRecord {
    /// The buffer header, carrying the sample count.
    Buffer(BufferHeader),
    /// The spectrum buffer header, after which the sample block begins.
    Spectrum(Skip<SampleStream>),
    /// Any other record.
    Other(Skip<RecordHeader>),
}

/// State token to skip a number of words not holding any extracted data.
#[derive(Debug)]
pub struct Skip<T> {
    words: u16,
    successor: T,
}

impl<T> Skip<T> {
    pub(super) fn new(words: u16, successor: T) -> Self {
        Self { words, successor }
    }

    /// Number of bytes to skip before advancing.
    pub fn len(&self) -> usize {
        2 * self.words as usize
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// Transition to another state once [`Skip::len`] bytes have been skipped.
    ///
    /// Returns the successor state token.
    pub fn advance(self) -> T {
        self.successor
    }
}
