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

//! Sector ring buffer and refill tests

use super::*;

#[test]
fn test_push_packs_header_and_payload() {
    let mut buffer = SectorBuffer::new();
    let mut payload = [0u8; SECTOR_SIZE];
    payload[0] = 0x12;
    payload[1] = 0x34;
    payload[SECTOR_SIZE - 2] = 0xAB;
    payload[SECTOR_SIZE - 1] = 0xCD;

    buffer.push([0x01, 0x23, 0x45, 0x01], &payload);

    let words = buffer.sector(0);
    assert_eq!(words[0], 0x0123);
    assert_eq!(words[1], 0x4501);
    assert_eq!(words[HEADER_WORDS], 0x1234);
    assert_eq!(words[WORDS_PER_SECTOR - 1], 0xABCD);
    assert_eq!(buffer.len(), 1);
    assert_eq!(buffer.write_index(), 1);
    assert_eq!(buffer.read_index(), 0);
}

#[test]
fn test_indices_wrap_around() {
    let mut buffer = SectorBuffer::new();
    let payload = [0u8; SECTOR_SIZE];

    for _ in 0..CAPACITY {
        buffer.push([0; 4], &payload);
    }
    assert!(buffer.is_full());
    assert_eq!(buffer.write_index(), 0);

    for _ in 0..3 {
        buffer.consume();
    }
    assert_eq!(buffer.read_index(), 3);
    assert_eq!(buffer.len(), CAPACITY - 3);

    buffer.push([0; 4], &payload);
    assert_eq!(buffer.write_index(), 1);
    assert_eq!(buffer.len(), CAPACITY - 2);
}

#[test]
fn test_clear() {
    let mut buffer = SectorBuffer::new();
    buffer.push([0; 4], &[0; SECTOR_SIZE]);
    buffer.push([0; 4], &[0; SECTOR_SIZE]);
    buffer.consume();

    buffer.clear();

    assert!(buffer.is_empty());
    assert_eq!(buffer.read_index(), 0);
    assert_eq!(buffer.write_index(), 0);
}

#[test]
fn test_bounded_run_stops_reading() {
    let mut source = pattern_source();
    let mut cdc = Cdc::new();

    cdc.seek(&mut source, 0, 3);
    assert_eq!(source.position(), 0);

    cdc.start(&mut source);

    assert_eq!(cdc.buffer().len(), 3);
    assert!(!cdc.is_reading());
    assert_eq!(cdc.sectors_remaining(), 0);

    // A further poll buffers nothing
    assert!(cdc.stat(&mut source));
    assert_eq!(cdc.buffer().len(), 3);
    assert_eq!(source.position(), 3);
}

#[test]
fn test_bounded_run_longer_than_capacity() {
    let mut source = pattern_source();
    let mut cdc = buffered_cdc(&mut source, 0, 10);

    assert!(cdc.buffer().is_full());
    assert!(cdc.is_reading());
    assert_eq!(cdc.sectors_remaining(), 2);

    for _ in 0..4 {
        cdc.read(&mut source).unwrap();
        cdc.ack();
        assert_ring_invariant(&cdc);
    }

    // Only the 2 remaining sectors are refilled
    assert!(cdc.stat(&mut source));
    assert_eq!(cdc.buffer().len(), CAPACITY - 2);
    assert!(!cdc.is_reading());
    assert_eq!(cdc.current_sector(), 10);
}

#[test]
fn test_unbounded_run_keeps_reading() {
    let mut source = pattern_source();
    let mut cdc = buffered_cdc(&mut source, 0, 0);

    for _ in 0..3 * CAPACITY {
        cdc.read(&mut source).unwrap();
        cdc.ack();
        assert_ring_invariant(&cdc);
    }

    assert!(cdc.is_reading());
    assert!(cdc.stat(&mut source));
    assert!(cdc.buffer().is_full());
    assert_eq!(cdc.current_sector(), 4 * CAPACITY as u32);
}

#[test]
fn test_seek_does_not_clear_buffer() {
    let mut source = pattern_source();
    let mut cdc = buffered_cdc(&mut source, 0, 0);
    cdc.read(&mut source).unwrap();
    cdc.ack();
    cdc.stop();

    cdc.seek(&mut source, 500, 1);

    assert_eq!(cdc.buffer().len(), CAPACITY - 1);
    assert_eq!(cdc.current_sector(), 500);
    assert_eq!(cdc.sectors_remaining(), 1);
    assert_ring_invariant(&cdc);
}

#[test]
fn test_seek_then_start_reads_new_run() {
    let mut source = pattern_source();
    let mut cdc = buffered_cdc(&mut source, 0, 2);
    for _ in 0..2 {
        cdc.read(&mut source).unwrap();
        cdc.ack();
    }
    assert!(!cdc.stat(&mut source));

    source.seek_to(300);
    cdc.seek(&mut source, 300, 2);
    assert!(cdc.buffer().is_empty());

    cdc.start(&mut source);

    assert_eq!(cdc.buffer().len(), 2);
    assert_eq!(cdc.current_sector(), 302);
    assert!(!cdc.is_reading());

    // 300 = 00:04:00
    assert_eq!(cdc.read(&mut source), Ok(0x0004_0001));
    assert_eq!(cdc.host_data(HostCpu::Sub), 0x0004);
    assert_eq!(cdc.host_data(HostCpu::Sub), 0x0001);
    assert_eq!(cdc.host_data(HostCpu::Sub), pattern_word(300, 0));
}

#[test]
fn test_ack_releases_slot_for_refill() {
    let mut source = pattern_source();
    let mut cdc = buffered_cdc(&mut source, 0, 0);

    cdc.read(&mut source).unwrap();
    cdc.ack();

    assert_eq!(cdc.buffer().len(), CAPACITY - 1);
    assert_eq!(cdc.buffer().read_index(), 1);

    // Next refill writes into the freed slot
    assert!(cdc.stat(&mut source));
    assert!(cdc.buffer().is_full());
    assert_eq!(cdc.buffer().write_index(), 1);
    assert_eq!(cdc.buffer().sector(0)[HEADER_WORDS], pattern_word(8, 0));
}

#[test]
fn test_seek_with_buffered_sectors_logs_warning() {
    let mut source = pattern_source();
    let mut cdc = buffered_cdc(&mut source, 0, 0);

    let records = capture_logs(|| cdc.seek(&mut source, 500, 4));

    let warned = warnings(&records);
    assert_eq!(warned.len(), 1);
    assert!(warned[0].contains("Seek to sector 500"));
    assert!(warned[0].contains("8 sectors still buffered"));

    // Seeking an empty buffer is silent
    let mut empty = Cdc::new();
    let records = capture_logs(|| empty.seek(&mut source, 500, 4));
    assert!(warnings(&records).is_empty());
}
