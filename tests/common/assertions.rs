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

//! Custom assertions for CDC testing

use megacd_cdc::core::cdc::{timecode, Cdc, CAPACITY, SECTOR_SIZE, WORDS_PER_SECTOR};

/// Assert a header value decodes to the expected sector number
#[allow(dead_code)]
pub fn assert_header_sector(header: u32, expected: u32) {
    let actual = timecode::decode_header(header.to_be_bytes()).to_sector();
    assert_eq!(
        actual, expected,
        "Header 0x{:08X} mismatch: expected sector {}, got {}",
        header, expected, actual
    );
    assert_eq!(header & 0xFF, 0x01, "Header mode byte must be 0x01");
}

/// Assert drained words carry the header and then the payload big-endian
#[allow(dead_code)]
pub fn assert_sector_words(words: &[u16], header: u32, payload: &[u8; SECTOR_SIZE]) {
    assert_eq!(words.len(), WORDS_PER_SECTOR);
    assert_eq!(words[0], (header >> 16) as u16, "Header high word mismatch");
    assert_eq!(words[1], header as u16, "Header low word mismatch");

    for (k, pair) in payload.chunks_exact(2).enumerate() {
        let expected = u16::from_be_bytes([pair[0], pair[1]]);
        assert_eq!(
            words[k + 2],
            expected,
            "Payload word {} mismatch: expected 0x{:04X}, got 0x{:04X}",
            k,
            expected,
            words[k + 2]
        );
    }
}

/// Assert the ring buffer indices are consistent with its occupancy
#[allow(dead_code)]
pub fn assert_ring_consistent(cdc: &Cdc) {
    let buffer = cdc.buffer();
    assert!(buffer.len() <= CAPACITY, "Buffer over capacity");
    assert_eq!(
        buffer.write_index(),
        (buffer.read_index() + buffer.len()) % CAPACITY,
        "Write index mismatch"
    );
}
