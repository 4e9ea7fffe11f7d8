//! The decoded measurement grid and its read-only views.
//!
//! A grid holds one level per channel, row and sample. Row 0 is the main
//! level, rows 1 to 45 the one-third-octave band levels in the order of
//! [`FREQUENCIES`], and rows 46 to 48 the totals in the order of [`Total`].

use alloc::{collections::TryReserveError, vec::Vec};

use thiserror::Error;

use crate::{
    avec::FromSamples,
    sans::{
        buffer::BufferMeta,
        sample::{BANDS, CHANNEL_WORDS, CHANNELS, TOTALS},
    },
};

/// Number of rows per channel: the main level, the bands, and the totals.
pub const ROWS: usize = 1 + BANDS + TOTALS;

/// Center frequencies of the one-third-octave bands, in hertz.
pub const FREQUENCIES: [f64; BANDS] = [
    0.8, 1.0, 1.25, 1.6, 2.0, 2.5, 3.15, 4.0, 5.0, 6.3, //
    8.0, 10.0, 12.5, 16.0, 20.0, 25.0, 31.5, 40.0, 50.0, 63.0, //
    80.0, 100.0, 125.0, 160.0, 200.0, 250.0, 315.0, 400.0, 500.0, 630.0, //
    800.0, 1000.0, 1250.0, 1600.0, 2000.0, 2500.0, 3150.0, 4000.0, 5000.0, 6300.0, //
    8000.0, 10000.0, 12500.0, 16000.0, 20000.0,
];

/// Main levels are stored in twentieths of a decibel.
const MAIN_SCALE: f64 = 20.0;

/// Band levels and totals are stored in tenths of a decibel.
const BAND_SCALE: f64 = 10.0;

/// An aggregate level computed across all bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Total {
    /// A-weighted.
    A,
    /// C-weighted.
    C,
    /// Unweighted.
    Lin,
}

impl Total {
    pub const ALL: [Total; TOTALS] = [Total::A, Total::C, Total::Lin];

    /// The grid row holding this total.
    pub fn row(self) -> usize {
        1 + BANDS + self as usize
    }
}

/// Errors occurring while querying a grid.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Channel {0} is out of range.")]
    ChannelOutOfRange(usize),
}

/// Errors occurring while building a grid.
#[derive(Debug, Error)]
pub enum GridError {
    /// The decoder never reached the sample block.
    #[error("No sample block was decoded.")]
    NotStarted,
    /// Decoding stopped before the end of the sample block.
    #[error("Decoded {decoded} of {samples} samples.")]
    Incomplete { samples: usize, decoded: usize },
    /// The decoded samples do not fit in memory.
    #[error("Cannot allocate a grid for {samples} samples: {source}")]
    Allocation {
        samples: usize,
        source: TryReserveError,
    },
}

/// A slice of the grid to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    /// The main level of a channel.
    Main,
    /// The band levels of a channel.
    Tercets,
    /// The totals of a channel.
    Totals,
    /// The entire grid.
    All,
}

impl From<&str> for Query {
    /// Select a slice by name. Any unrecognized name selects the entire grid.
    fn from(s: &str) -> Self {
        match s {
            "main" => Self::Main,
            "tercets" => Self::Tercets,
            "totals" => Self::Totals,
            _ => Self::All,
        }
    }
}

/// Levels indexed by channel, row and sample.
///
/// The shape is fixed at construction to `(3, 49, samples)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementGrid {
    samples: usize,
    data: Vec<f64>,
}

impl MeasurementGrid {
    /// The grid dimensions: channels, rows, and samples.
    pub fn shape(&self) -> [usize; 3] {
        [CHANNELS, ROWS, self.samples]
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// All levels, channel-major then row-major.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, channel: usize, row: usize, sample: usize) -> Option<f64> {
        if channel < CHANNELS && row < ROWS && sample < self.samples {
            Some(self.data[self.offset(channel, row, sample)])
        } else {
            None
        }
    }

    fn offset(&self, channel: usize, row: usize, sample: usize) -> usize {
        (channel * ROWS + row) * self.samples + sample
    }

    /// Center frequency of a band row, in hertz.
    pub fn frequency(row: usize) -> Option<f64> {
        row.checked_sub(1).and_then(|band| FREQUENCIES.get(band).copied())
    }

    /// Select a read-only view of the grid.
    ///
    /// The main level of a channel is a sequence of `samples` levels, the
    /// band levels are `45 × samples`, and the totals `3 × samples`. With
    /// `transpose`, the two axes of a band or total view are swapped.
    ///
    /// [`Query::All`] returns the entire `3 × 49 × samples` grid, ignoring
    /// both `channel` and `transpose`. Since unrecognized names convert to
    /// [`Query::All`], this includes queries for unknown slices.
    pub fn query(
        &self,
        kind: impl Into<Query>,
        channel: usize,
        transpose: bool,
    ) -> Result<View<'_>, QueryError> {
        let n = self.samples;

        let (first, rows) = match kind.into() {
            Query::Main => (0, None),
            Query::Tercets => (1, Some(BANDS)),
            Query::Totals => (1 + BANDS, Some(TOTALS)),
            Query::All => {
                return Ok(View {
                    data: &self.data,
                    offset: 0,
                    shape: [CHANNELS, ROWS, n],
                    strides: [ROWS * n, n, 1],
                    ndim: 3,
                });
            }
        };

        if channel >= CHANNELS {
            Err(QueryError::ChannelOutOfRange(channel))?;
        }

        let offset = self.offset(channel, first, 0);

        let (shape, strides, ndim) = match rows {
            None => ([n, 0, 0], [1, 0, 0], 1),
            Some(rows) if transpose => ([n, rows, 0], [1, n, 0], 2),
            Some(rows) => ([rows, n, 0], [n, 1, 0], 2),
        };

        Ok(View {
            data: &self.data,
            offset,
            shape,
            strides,
            ndim,
        })
    }
}

/// A strided, read-only view of a grid.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    data: &'a [f64],
    offset: usize,
    shape: [usize; 3],
    strides: [usize; 3],
    ndim: usize,
}

impl<'a> View<'a> {
    pub fn shape(&self) -> &[usize] {
        &self.shape[..self.ndim]
    }

    /// Number of levels in the view.
    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the level at an index with one coordinate per axis.
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        if index.len() != self.ndim || index.iter().zip(self.shape()).any(|(i, n)| i >= n) {
            return None;
        }

        let offset = index
            .iter()
            .zip(&self.strides)
            .fold(self.offset, |acc, (i, s)| acc + i * s);

        Some(self.data[offset])
    }

    /// Iterate over the levels, last axis fastest.
    pub fn iter(self) -> impl Iterator<Item = f64> + 'a {
        (0..self.len()).map(move |k| self.data[self.position(k)])
    }

    /// Iterate over the lanes along the last axis.
    ///
    /// A one-dimensional view has a single lane.
    pub fn rows(self) -> impl Iterator<Item = Vec<f64>> + 'a {
        let (outer, last) = self.shape().split_at(self.ndim - 1);
        let outer: usize = outer.iter().product();
        let m = last[0];

        (0..outer).map(move |j| {
            (0..m)
                .map(|c| self.data[self.position(j * m + c)])
                .collect()
        })
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }

    /// Data offset of the `k`-th level in iteration order.
    fn position(&self, mut k: usize) -> usize {
        let mut offset = self.offset;

        for axis in (0..self.ndim).rev() {
            let n = self.shape[axis];
            offset += (k % n) * self.strides[axis];
            k /= n;
        }

        offset
    }
}

/// Levels of one sample across every channel and row.
const SAMPLE_LEVELS: usize = CHANNELS * ROWS;

/// A receiver building a grid from decoded samples.
///
/// Storage grows with the samples actually decoded, never with the declared
/// sample count. The grid can only be taken once every declared sample has
/// been decoded.
#[derive(Debug, Default)]
pub struct GridBuilder {
    state: Option<Result<Staged, GridError>>,
}

/// Levels decoded so far, sample-major.
#[derive(Debug)]
struct Staged {
    samples: usize,
    complete: usize,
    levels: Vec<f64>,
}

impl GridBuilder {
    /// Take the completed grid.
    pub fn finish(self) -> Result<MeasurementGrid, GridError> {
        let Staged {
            samples,
            complete,
            levels,
        } = self.state.unwrap_or(Err(GridError::NotStarted))?;

        if complete != samples {
            Err(GridError::Incomplete {
                samples,
                decoded: complete,
            })?;
        }

        let mut data = Vec::new();
        data.try_reserve_exact(levels.len())
            .map_err(|source| GridError::Allocation { samples, source })?;
        data.extend(
            (0..SAMPLE_LEVELS)
                .flat_map(|i| levels.iter().skip(i).step_by(SAMPLE_LEVELS).copied()),
        );

        Ok(MeasurementGrid { samples, data })
    }

    /// The levels of a sample which has already been started.
    fn sample_mut(&mut self, sample: u32) -> Option<&mut [f64]> {
        let Some(Ok(staged)) = &mut self.state else {
            return None;
        };

        let start = (sample as usize).checked_mul(SAMPLE_LEVELS)?;
        staged.levels.get_mut(start..start.checked_add(SAMPLE_LEVELS)?)
    }
}

impl FromSamples for GridBuilder {
    fn begin(&mut self, meta: BufferMeta) {
        self.state = Some(Ok(Staged {
            samples: usize::try_from(meta.sample_count).unwrap_or(0),
            complete: 0,
            levels: Vec::new(),
        }));
    }

    fn add_main_levels(&mut self, sample: u32, levels: [i16; CHANNELS]) {
        let Some(Ok(staged)) = &mut self.state else {
            return;
        };

        let samples = staged.samples;
        let started = staged.levels.len() / SAMPLE_LEVELS;

        if sample as usize == started && started < samples {
            if let Err(source) = staged.levels.try_reserve(SAMPLE_LEVELS) {
                self.state = Some(Err(GridError::Allocation { samples, source }));
                return;
            }

            staged.levels.resize(staged.levels.len() + SAMPLE_LEVELS, 0.0);
        }

        if let Some(block) = self.sample_mut(sample) {
            for (channel, level) in levels.into_iter().enumerate() {
                block[channel * ROWS] = f64::from(level) / MAIN_SCALE;
            }
        }
    }

    fn add_bands(&mut self, sample: u32, channel: u8, values: [i16; CHANNEL_WORDS]) {
        let row = usize::from(channel) * ROWS + 1;

        let Some(slots) = self
            .sample_mut(sample)
            .and_then(|block| block.get_mut(row..row + CHANNEL_WORDS))
        else {
            return;
        };

        for (slot, value) in slots.iter_mut().zip(values) {
            *slot = f64::from(value) / BAND_SCALE;
        }

        if usize::from(channel) == CHANNELS - 1 {
            if let Some(Ok(staged)) = &mut self.state {
                staged.complete = staged.complete.max(sample as usize + 1);
            }
        }
    }
}
