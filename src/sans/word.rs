//! Fixed-width words and packed bit-fields.
//!
//! All multi-byte values in the format are little-endian.

use tartan_bitfield::bitfield;

/// Decode a little-endian two's-complement word.
pub fn read_signed_word(r: [u8; 2]) -> i16 {
    i16::from_le_bytes(r)
}

/// Decode a little-endian unsigned word.
pub fn read_unsigned_word(r: [u8; 2]) -> u16 {
    u16::from_le_bytes(r)
}

/// Decode a little-endian two's-complement double word.
pub fn read_signed_long(r: [u8; 4]) -> i32 {
    i32::from_le_bytes(r)
}

/// A time of day at two-second resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl TimeOfDay {
    /// Unpack a time of day from a word counting two-second ticks since
    /// midnight.
    pub fn from_word(word: u16) -> Self {
        const TICKS_PER_MINUTE: u16 = 30;
        const TICKS_PER_HOUR: u16 = 60 * TICKS_PER_MINUTE;

        Self {
            hour: (word / TICKS_PER_HOUR) as u8,
            minute: ((word / TICKS_PER_MINUTE) % 60) as u8,
            second: ((word % TICKS_PER_MINUTE) * 2) as u8,
        }
    }
}

/// A calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date {
    pub day: u8,
    pub month: u8,
    pub year: u16,
}

impl Date {
    /// Unpack a date from a word holding day, month and years since 2000.
    pub fn from_word(word: u16) -> Self {
        bitfield! {
            struct PackedDate(u16) {
                [0..5] day: u8,
                [5..9] month: u8,
                [9..16] year: u8,
            }
        }

        let date = PackedDate(word);

        Self {
            day: date.day(),
            month: date.month(),
            year: 2000 + u16::from(date.year()),
        }
    }
}
