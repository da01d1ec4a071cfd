//! Timestamp parsing
//!
//! ECMA-167 1/7.3 timestamps are 12 bytes: a type and timezone word
//! followed by calendar fields down to microseconds.

use crate::error::Result;
use crate::utils::cursor::{u16_at, u8_at};

/// Recorded timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timestamp {
    /// Type in bits 12-15, signed timezone offset in bits 0-11
    pub type_and_timezone: u16,

    /// Year (1-9999)
    pub year: i16,

    /// Month (1-12)
    pub month: u8,

    /// Day (1-31)
    pub day: u8,

    /// Hour (0-23)
    pub hour: u8,

    /// Minute (0-59)
    pub minute: u8,

    /// Second (0-59)
    pub second: u8,

    /// Centiseconds (0-99)
    pub centiseconds: u8,

    /// Hundreds of microseconds (0-99)
    pub hundreds_of_microseconds: u8,

    /// Microseconds (0-99)
    pub microseconds: u8,
}

impl Timestamp {
    /// On-disk size
    pub const SIZE: usize = 12;

    /// Timezone value meaning "not specified"
    pub const TIMEZONE_UNSPECIFIED: i16 = -2047;

    /// Parse from `data` at `offset`
    pub fn parse(data: &[u8], offset: usize) -> Result<Self> {
        Ok(Self {
            type_and_timezone: u16_at(data, offset)?,
            year: u16_at(data, offset + 2)? as i16,
            month: u8_at(data, offset + 4)?,
            day: u8_at(data, offset + 5)?,
            hour: u8_at(data, offset + 6)?,
            minute: u8_at(data, offset + 7)?,
            second: u8_at(data, offset + 8)?,
            centiseconds: u8_at(data, offset + 9)?,
            hundreds_of_microseconds: u8_at(data, offset + 10)?,
            microseconds: u8_at(data, offset + 11)?,
        })
    }

    /// Timestamp type (1 = local time)
    pub fn kind(&self) -> u8 {
        (self.type_and_timezone >> 12) as u8
    }

    /// Offset from UTC in minutes, if recorded
    pub fn timezone_minutes(&self) -> Option<i16> {
        // sign-extend the 12-bit field
        let raw = ((self.type_and_timezone << 4) as i16) >> 4;
        if raw == Self::TIMEZONE_UNSPECIFIED || self.kind() != 1 {
            None
        } else {
            Some(raw)
        }
    }

    /// Sub-second part in nanoseconds
    pub fn nanosecond(&self) -> u32 {
        u32::from(self.centiseconds) * 10_000_000
            + u32::from(self.hundreds_of_microseconds) * 100_000
            + u32::from(self.microseconds) * 1_000
    }

    /// All fields zero
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }

    /// Encode back to the on-disk layout
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0..2].copy_from_slice(&self.type_and_timezone.to_le_bytes());
        out[2..4].copy_from_slice(&self.year.to_le_bytes());
        out[4] = self.month;
        out[5] = self.day;
        out[6] = self.hour;
        out[7] = self.minute;
        out[8] = self.second;
        out[9] = self.centiseconds;
        out[10] = self.hundreds_of_microseconds;
        out[11] = self.microseconds;
        out
    }
}
