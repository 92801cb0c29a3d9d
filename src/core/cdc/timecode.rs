// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Sector header timecode encoding
//!
//! Every buffered sector is prefixed with a 4-byte header:
//!
//! ```text
//! Byte 0: Minute (BCD)
//! Byte 1: Second (BCD, 0-59)
//! Byte 2: Frame  (BCD, 0-74) - 75 frames per second
//! Byte 3: Mode
//! ```

/// Sectors (frames) per second
pub const FRAMES_PER_SECOND: u32 = 75;

/// Sectors per minute
pub const FRAMES_PER_MINUTE: u32 = FRAMES_PER_SECOND * 60;

/// Mode byte written into every header
///
/// Unverified against hardware; games only ever observe this value.
pub const HEADER_MODE: u8 = 0x01;

/// Minute:Second:Frame timecode of a linear sector index
///
/// All values are stored as decimal (not BCD).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timecode {
    /// Minute
    pub minute: u32,
    /// Second (0-59)
    pub second: u8,
    /// Frame (0-74)
    pub frame: u8,
}

impl Timecode {
    /// Split a linear sector index into minute, second and frame
    pub fn from_sector(sector: u32) -> Self {
        Self {
            minute: sector / FRAMES_PER_MINUTE,
            second: ((sector / FRAMES_PER_SECOND) % 60) as u8,
            frame: (sector % FRAMES_PER_SECOND) as u8,
        }
    }

    /// Convert back to a linear sector index
    pub fn to_sector(&self) -> u32 {
        self.minute * FRAMES_PER_MINUTE + self.second as u32 * FRAMES_PER_SECOND + self.frame as u32
    }
}

/// Encode the 4-byte header for a sector
///
/// Minutes of 100 or more do not occur on real discs; only the lower two
/// decimal digits are kept.
///
/// # Example
///
/// ```
/// use megacd_cdc::core::cdc::timecode::sector_header;
///
/// // 2 minutes, 3 seconds, 4 frames
/// let sector = 2 * 4500 + 3 * 75 + 4;
/// assert_eq!(sector_header(sector), [0x02, 0x03, 0x04, 0x01]);
/// ```
pub fn sector_header(sector: u32) -> [u8; 4] {
    let timecode = Timecode::from_sector(sector);

    [
        dec_to_bcd((timecode.minute % 100) as u8),
        dec_to_bcd(timecode.second),
        dec_to_bcd(timecode.frame),
        HEADER_MODE,
    ]
}

/// Decode a header produced by [`sector_header`] back to its timecode
///
/// The mode byte is ignored.
pub fn decode_header(header: [u8; 4]) -> Timecode {
    Timecode {
        minute: bcd_to_dec(header[0]) as u32,
        second: bcd_to_dec(header[1]),
        frame: bcd_to_dec(header[2]),
    }
}

/// Convert BCD (Binary-Coded Decimal) to decimal
///
/// BCD format: each nibble (4 bits) represents a decimal digit (0-9).
/// Example: 0x23 (BCD) = 23 (decimal)
#[inline]
pub fn bcd_to_dec(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0F)
}

/// Convert decimal (0-99) to BCD (Binary-Coded Decimal)
#[inline]
pub fn dec_to_bcd(dec: u8) -> u8 {
    (((dec / 10) % 10) << 4) | (dec % 10)
}
