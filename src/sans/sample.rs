//! States processing the sample block.

use either::Either::{self, Left, Right};
use thiserror::Error;

use super::word::read_signed_word;

/// Number of measurement channels.
pub const CHANNELS: usize = 3;

/// Number of one-third-octave bands per channel.
pub const BANDS: usize = 45;

/// Number of aggregate totals per channel.
pub const TOTALS: usize = 3;

/// Number of band and total words following each channel sentinel.
pub const CHANNEL_WORDS: usize = BANDS + TOTALS;

/// Size of one sample in bytes: the main levels, then a sentinel and band
/// block per channel.
pub const SAMPLE_LEN: usize = 2 * CHANNELS + CHANNELS * 2 * (1 + CHANNEL_WORDS);

/// An error entering the sample block.
#[derive(Debug, Error)]
pub enum SampleStreamError {
    /// The buffer header declared a negative sample count.
    #[error("Negative sample count ({0}).")]
    NegativeCount(i32),
}

/// A nonzero sentinel word opening a channel's band block.
#[derive(Debug, Error)]
#[error("Sentinel of channel {channel} in sample {sample} is {found}, not zero.")]
pub struct SentinelError {
    pub sample: u32,
    pub channel: u8,
    pub found: i16,
}

/// State token to begin decoding the sample block.
#[derive(Debug)]
pub struct SampleStream(pub(super) ());

impl SampleStream {
    /// Transition to another state by sizing the sample block.
    ///
    /// Returns a successor state token, or `None` for an empty block.
    pub fn advance(self, sample_count: i32) -> Result<Option<MainLevels>, SampleStreamError> {
        let samples = u32::try_from(sample_count)
            .map_err(|_| SampleStreamError::NegativeCount(sample_count))?;

        Ok((samples != 0).then_some(MainLevels { sample: 0, samples }))
    }
}

/// State token to decode the main level of every channel for one sample.
#[derive(Debug)]
pub struct MainLevels {
    sample: u32,
    samples: u32,
}

impl MainLevels {
    /// Index of the sample being decoded.
    pub fn sample(&self) -> u32 {
        self.sample
    }

    /// Transition to another state by decoding the main levels.
    ///
    /// Returns the raw level of each channel, and a successor state token.
    pub fn advance(self, r: [u8; 2 * CHANNELS]) -> ([i16; CHANNELS], Sentinel) {
        let words: [[u8; 2]; CHANNELS] = zerocopy::transmute!(r);

        let successor = Sentinel {
            sample: self.sample,
            samples: self.samples,
            channel: 0,
        };

        (words.map(read_signed_word), successor)
    }
}

/// State token to check the sentinel word opening a channel's band block.
#[derive(Debug)]
pub struct Sentinel {
    sample: u32,
    samples: u32,
    channel: u8,
}

impl Sentinel {
    /// Index of the sample being decoded.
    pub fn sample(&self) -> u32 {
        self.sample
    }

    /// Index of the channel whose bands follow.
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Transition to another state by decoding a sentinel word.
    ///
    /// Returns an error if the sentinel is not zero, and a successor state
    /// token. The error does not prevent advancing, as the position in the
    /// document is unaffected by the sentinel's value.
    pub fn advance(self, r: [u8; 2]) -> (Result<(), SentinelError>, Bands) {
        let found = read_signed_word(r);

        let check = if found == 0 {
            Ok(())
        } else {
            Err(SentinelError {
                sample: self.sample,
                channel: self.channel,
                found,
            })
        };

        let successor = Bands {
            sample: self.sample,
            samples: self.samples,
            channel: self.channel,
        };

        (check, successor)
    }
}

/// State token to decode the band levels and totals of one channel.
#[derive(Debug)]
pub struct Bands {
    sample: u32,
    samples: u32,
    channel: u8,
}

impl Bands {
    /// Index of the sample being decoded.
    pub fn sample(&self) -> u32 {
        self.sample
    }

    /// Index of the channel being decoded.
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Transition to another state by decoding band levels and totals.
    ///
    /// Returns the raw values, bands followed by totals, and a successor state
    /// token: the next channel's sentinel, the next sample's main levels, or
    /// `None` at the end of the block.
    pub fn advance(
        self,
        r: [u8; 2 * CHANNEL_WORDS],
    ) -> ([i16; CHANNEL_WORDS], Either<Sentinel, Option<MainLevels>>) {
        let words: [[u8; 2]; CHANNEL_WORDS] = zerocopy::transmute!(r);

        let channel = self.channel + 1;
        let sample = self.sample + 1;

        let successor = if usize::from(channel) < CHANNELS {
            Left(Sentinel {
                sample: self.sample,
                samples: self.samples,
                channel,
            })
        } else if sample < self.samples {
            Right(Some(MainLevels {
                sample,
                samples: self.samples,
            }))
        } else {
            Right(None)
        };

        (words.map(read_signed_word), successor)
    }
}
