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

//! Sector ring buffer
//!
//! Circular store of assembled sectors. Each slot holds the 2-word header
//! followed by the sector payload as big-endian 16-bit words.
//!
//! Slots outside `[read_index, read_index + len)` (mod [`CAPACITY`]) are
//! logically empty.

use super::{CAPACITY, HEADER_WORDS, SECTOR_SIZE, WORDS_PER_SECTOR};

/// One buffered sector (header + payload words)
pub type SectorWords = [u16; WORDS_PER_SECTOR];

/// Fixed-capacity ring of buffered sectors
#[derive(Debug, Clone)]
pub struct SectorBuffer {
    /// Sector slots
    pub(super) sectors: Box<[SectorWords; CAPACITY]>,

    /// Slot the next host read binds to
    pub(super) read_index: usize,

    /// Slot the next refilled sector is written to
    pub(super) write_index: usize,

    /// Number of occupied slots
    pub(super) total: usize,
}

impl SectorBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self {
            sectors: Box::new([[0; WORDS_PER_SECTOR]; CAPACITY]),
            read_index: 0,
            write_index: 0,
            total: 0,
        }
    }

    /// Empty the buffer and rewind both indices
    ///
    /// Slot contents are left in place; they are unreachable once empty.
    pub fn clear(&mut self) {
        self.read_index = 0;
        self.write_index = 0;
        self.total = 0;
    }

    /// Number of buffered sectors
    pub fn len(&self) -> usize {
        self.total
    }

    /// True when no sector is buffered
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// True when every slot is occupied
    pub fn is_full(&self) -> bool {
        self.total == CAPACITY
    }

    /// Index of the oldest buffered sector
    pub fn read_index(&self) -> usize {
        self.read_index
    }

    /// Index of the next free slot
    pub fn write_index(&self) -> usize {
        self.write_index
    }

    /// Contents of a slot
    pub fn sector(&self, index: usize) -> &SectorWords {
        &self.sectors[index]
    }

    /// Pack a header and payload into the next free slot
    ///
    /// The caller checks [`is_full`](Self::is_full) first.
    pub(crate) fn push(&mut self, header: [u8; 4], payload: &[u8; SECTOR_SIZE]) {
        debug_assert!(!self.is_full(), "sector buffer overflow");

        let slot = &mut self.sectors[self.write_index];

        slot[0] = u16::from_be_bytes([header[0], header[1]]);
        slot[1] = u16::from_be_bytes([header[2], header[3]]);

        for (word, bytes) in slot[HEADER_WORDS..]
            .iter_mut()
            .zip(payload.chunks_exact(2))
        {
            *word = u16::from_be_bytes([bytes[0], bytes[1]]);
        }

        self.write_index = (self.write_index + 1) % CAPACITY;
        self.total += 1;
    }

    /// Release the oldest buffered sector
    ///
    /// The caller guarantees the buffer is not empty.
    pub(crate) fn consume(&mut self) {
        debug_assert!(!self.is_empty(), "sector buffer underflow");

        self.total -= 1;
        self.read_index = (self.read_index + 1) % CAPACITY;
    }
}

impl Default for SectorBuffer {
    fn default() -> Self {
        Self::new()
    }
}
