#![no_std]

//! A decoder for the tagged-binary buffer files recorded by sound and
//! vibration meters.
//!
//! A file holds a fixed preamble, a sequence of tagged and length-prefixed
//! header records, and a block of samples. Each sample carries a main level
//! for three channels, followed per channel by 45 one-third-octave band levels
//! and three totals. Tercet decodes these into a [`grid::MeasurementGrid`].
//!
//! Most users should begin with [`session::Parser`], or with the functions in
//! the [`avec`] module. If these prove insufficient, consider driving the
//! states in the [`sans`] module directly.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `std`: enable the reader-based decoder, the parser session and CSV export
//!   (default).
//! - `cli`: build the `tercet` command line tool (default).

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod avec;
pub mod grid;
pub mod sans;

#[cfg(feature = "std")]
pub mod export;
#[cfg(feature = "std")]
pub mod session;
