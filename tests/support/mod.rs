#![allow(dead_code)]

//! Synthetic documents for tests.

use tercet::{
    avec::{FromSamples, SentinelPolicy},
    grid::{GridBuilder, MeasurementGrid},
    sans::{
        buffer::BufferMeta,
        header::{BUFFER_HEADER, RecordTag, SPECTRUM_BUFFER_HEADER},
        sample::{CHANNEL_WORDS, CHANNELS},
    },
};

/// Builder for a document, starting with its preamble.
pub struct Document(Vec<u8>);

impl Document {
    pub fn new() -> Self {
        Self((0..32).map(|i| 0xA0 ^ i).collect())
    }

    /// A record with a one-byte declared length.
    pub fn record(mut self, tag: u8, body: &[u16]) -> Self {
        self.0.push(tag);
        self.0.push((body.len() + 1).try_into().unwrap());
        self.words(body)
    }

    /// A record with a zero length byte, followed by an extended length word.
    pub fn extended(mut self, tag: u8, body: &[u16]) -> Self {
        self.0.push(tag);
        self.0.push(0);
        let extended: u16 = (body.len() + 2).try_into().unwrap();
        self.0.extend_from_slice(&extended.to_le_bytes());
        self.words(body)
    }

    /// A container marker, whose length byte is not meaningful.
    pub fn container(mut self, tag: u8) -> Self {
        self.0.extend_from_slice(&[tag, 0x42, 0x13, 0x37]);
        self
    }

    /// A buffer header, with `extra` words following the fixed fields.
    pub fn buffer_header(self, step_millis: i16, sample_count: i32, extra: usize) -> Self {
        let samples = sample_count.to_le_bytes();

        let mut body = vec![
            0x1111,
            0x2222,
            step_millis as u16,
            0x3333,
            0x4444,
            u16::from_le_bytes([samples[0], samples[1]]),
            u16::from_le_bytes([samples[2], samples[3]]),
        ];
        body.extend((0..extra).map(|i| 0x5500 + i as u16));

        self.record(BUFFER_HEADER, &body)
    }

    pub fn spectrum_marker(self, body: &[u16]) -> Self {
        self.record(SPECTRUM_BUFFER_HEADER, body)
    }

    /// A sample with zero sentinels.
    pub fn sample(self, main: [i16; CHANNELS], bands: [[i16; CHANNEL_WORDS]; CHANNELS]) -> Self {
        self.sample_with_sentinels(main, [0; CHANNELS], bands)
    }

    pub fn sample_with_sentinels(
        mut self,
        main: [i16; CHANNELS],
        sentinels: [i16; CHANNELS],
        bands: [[i16; CHANNEL_WORDS]; CHANNELS],
    ) -> Self {
        for level in main {
            self.0.extend_from_slice(&level.to_le_bytes());
        }

        for (sentinel, values) in sentinels.into_iter().zip(bands) {
            self.0.extend_from_slice(&sentinel.to_le_bytes());

            for value in values {
                self.0.extend_from_slice(&value.to_le_bytes());
            }
        }

        self
    }

    /// Samples generated by [`main_levels`] and [`band_values`].
    pub fn samples(self, count: usize) -> Self {
        (0..count).fold(self, |doc, s| doc.sample(main_levels(s), band_values(s)))
    }

    /// Arbitrary bytes, such as a truncated or malformed structure.
    pub fn append(mut self, bytes: &[u8]) -> Self {
        self.0.extend_from_slice(bytes);
        self
    }

    fn words(mut self, words: &[u16]) -> Self {
        for word in words {
            self.0.extend_from_slice(&word.to_le_bytes());
        }

        self
    }

    pub fn build(self) -> Vec<u8> {
        self.0
    }
}

/// Raw main levels of a generated sample.
pub fn main_levels(sample: usize) -> [i16; CHANNELS] {
    core::array::from_fn(|c| 1000 + 10 * sample as i16 + c as i16)
}

/// Raw band levels and totals of a generated sample, including negatives.
pub fn band_values(sample: usize) -> [[i16; CHANNEL_WORDS]; CHANNELS] {
    core::array::from_fn(|c| {
        core::array::from_fn(|k| 100 * c as i16 + k as i16 - 50 + 7 * sample as i16)
    })
}

/// A well-formed document of generated samples.
pub fn document(step_millis: i16, samples: usize) -> Vec<u8> {
    Document::new()
        .record(0x01, &[0x2021, 0x0A0B, 0x0C0D])
        .container(0x07)
        .record(0x05, &[1, 2, 3, 4])
        .buffer_header(step_millis, samples as i32, 2)
        .spectrum_marker(&[0xFFFF, 0x0001])
        .samples(samples)
        .build()
}

pub fn decode_grid(data: &[u8], policy: SentinelPolicy) -> (BufferMeta, MeasurementGrid) {
    let mut builder = GridBuilder::default();
    let meta = tercet::avec::decode_slice(data, &mut builder, policy).unwrap();
    (meta, builder.finish().unwrap())
}

/// A receiver logging every call it receives.
#[derive(Debug, Default)]
pub struct Log {
    pub records: Vec<RecordTag>,
    pub metas: Vec<BufferMeta>,
    pub begun: Option<BufferMeta>,
    pub main_levels: Vec<(u32, [i16; CHANNELS])>,
    pub bands: Vec<(u32, u8, [i16; CHANNEL_WORDS])>,
}

impl FromSamples for Log {
    fn add_record(&mut self, tag: RecordTag) {
        self.records.push(tag);
    }

    fn add_buffer_meta(&mut self, meta: BufferMeta) {
        self.metas.push(meta);
    }

    fn begin(&mut self, meta: BufferMeta) {
        self.begun = Some(meta);
    }

    fn add_main_levels(&mut self, sample: u32, levels: [i16; CHANNELS]) {
        self.main_levels.push((sample, levels));
    }

    fn add_bands(&mut self, sample: u32, channel: u8, values: [i16; CHANNEL_WORDS]) {
        self.bands.push((sample, channel, values));
    }
}
