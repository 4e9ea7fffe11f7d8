//! A parser holding the most recently loaded recording.
//!
//! _Requires Cargo feature `std`._

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};

use log::info;
use thiserror::Error;

use crate::{
    avec::{self, SentinelPolicy},
    grid::{GridBuilder, GridError, MeasurementGrid, Query, QueryError, View},
    sans::buffer::BufferMeta,
};

/// Errors occurring while loading a recording.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Decode(#[from] avec::reader::Error),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Options applied to every load.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    pub policy: SentinelPolicy,
}

/// A decoded document.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub meta: BufferMeta,
    pub grid: MeasurementGrid,
}

impl Recording {
    /// Decode a recording from a reader.
    pub fn decode(r: &mut impl Read, policy: SentinelPolicy) -> Result<Self, LoadError> {
        let mut builder = GridBuilder::default();
        let meta = avec::decode_reader(r, &mut builder, policy)?;
        let grid = builder.finish()?;

        Ok(Self { meta, grid })
    }

    /// Select a read-only view of the grid. See [`MeasurementGrid::query`].
    pub fn query(
        &self,
        kind: impl Into<Query>,
        channel: usize,
        transpose: bool,
    ) -> Result<View<'_>, QueryError> {
        self.grid.query(kind, channel, transpose)
    }

    /// Time of each sample since the start of the recording, in milliseconds.
    pub fn time_axis(&self) -> impl Iterator<Item = i64> + '_ {
        let step = i64::from(self.meta.step_millis);
        (0..self.grid.samples() as i64).map(move |sample| sample * step)
    }
}

/// A parser holding the most recently loaded recording.
///
/// Each load decodes into a fresh [`Recording`], which replaces the previous
/// one only once decoding has succeeded. Readers holding the previous
/// recording are unaffected.
#[derive(Debug, Default)]
pub struct Parser {
    options: Options,
    current: RwLock<Option<Arc<Recording>>>,
}

impl Parser {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            current: RwLock::new(None),
        }
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// Load and decode a file, publishing it as the current recording.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Arc<Recording>, LoadError> {
        let path = path.as_ref();
        let mut file = BufReader::new(File::open(path).map_err(avec::reader::Error::from)?);

        let recording = self.load_from(&mut file)?;

        info!("Loaded {}", path.display());

        Ok(recording)
    }

    /// Decode a document from a reader, publishing it as the current
    /// recording.
    pub fn load_from(&self, r: &mut impl Read) -> Result<Arc<Recording>, LoadError> {
        let recording = Arc::new(Recording::decode(r, self.options.policy)?);

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(recording.clone());

        Ok(recording)
    }

    /// The most recently loaded recording, if any.
    pub fn recording(&self) -> Option<Arc<Recording>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
