//! Internal finite-state machine for implementing decoders.
//!
//! This module is intended for applications that need fine control over
//! decoder internals. See [`crate::avec`] for implementations covering common
//! decoding patterns.
//!
//! # Architecture
//!
//! All states are represented by a non-copy token. Once enough bytes are
//! ready, transition to another state by calling the token's `advance` method.
//! This will return a successor state token, along with any extracted data.
//!
//! A document is decoded in two phases. The first walks the header records:
//!
//! ```text
//! Preamble ─▶ RecordHeader ─┬─▶ ContainerBody ─────────────────▶ RecordHeader
//!                           ├─▶ ExtendedLength ─▶ RecordBody ─┐
//!                           └─▶ RecordBody ───────────────────┤
//!                                                             ▼
//!                         dispatch: BufferHeader │ Skip<RecordHeader> │ Skip<SampleStream>
//! ```
//!
//! The second, entered through [`sample::SampleStream`], walks the sample
//! block sized by the [`buffer::BufferMeta`] seen during the first:
//!
//! ```text
//! MainLevels ─▶ (Sentinel ─▶ Bands) × 3 ─▶ MainLevels │ end
//! ```
//!
//! Only the initial state, re-exported for convenience as [`Decoder`], can be
//! constructed.
//!
//! Some areas of the decoding process are not represented in the finite-state
//! machine and must be carefully written:
//!
//! - Reading bytes from the correct place in the document, including skipping
//! the variable number of bytes described by a [`header::Skip`] token.
//!
//! - Deciding what a nonzero sample sentinel means. The states report it, but
//! leave escalation to the caller.
//!
//! Note that the format has no checksums. A record whose declared length is
//! wrong desynchronizes every later state, and is only noticed once a read
//! runs past the end of the document or a sentinel mismatches.
//!
//! Implementers are recommended to begin by studying and modifying a decoder
//! from the [`crate::avec`] module.

pub mod buffer;
pub mod header;
pub mod sample;
pub mod word;

/// Entrypoint to the finite-state machine.
pub type Decoder = header::Preamble;
