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

//! Test fixtures for disc images and CDC sessions

use megacd_cdc::core::cdc::{Cdc, HostCpu, SECTOR_SIZE, WORDS_PER_SECTOR};
use megacd_cdc::core::disc::DiscImage;
use std::path::PathBuf;
use tempfile::TempDir;

/// Raw sector size in a .bin image
pub const RAW_SECTOR_SIZE: usize = 2352;

/// User data of sector `n`: byte `i` is `n + i` truncated to 8 bits
#[allow(dead_code)]
pub fn sector_payload(sector: u32) -> [u8; SECTOR_SIZE] {
    let mut data = [0u8; SECTOR_SIZE];
    for (i, byte) in data.iter_mut().enumerate() {
        *byte = (sector as usize + i) as u8;
    }
    data
}

/// Raw Mode 1 sector wrapping [`sector_payload`]
#[allow(dead_code)]
pub fn raw_sector(sector: u32) -> Vec<u8> {
    let mut raw = vec![0u8; RAW_SECTOR_SIZE];
    raw[1..11].fill(0xFF);
    raw[15] = 0x01;
    raw[16..16 + SECTOR_SIZE].copy_from_slice(&sector_payload(sector));
    raw
}

/// Write a cue/bin pair with `sectors` raw sectors into a temp directory
///
/// Returns the directory guard and the path of the .cue sheet.
#[allow(dead_code)]
pub fn write_cue_bin(sectors: u32) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let bin: Vec<u8> = (0..sectors).flat_map(raw_sector).collect();
    std::fs::write(dir.path().join("disc.bin"), bin).expect("Failed to write bin");

    let cue = dir.path().join("disc.cue");
    std::fs::write(
        &cue,
        "FILE \"disc.bin\" BINARY\n  TRACK 01 MODE1/2352\n    INDEX 01 00:00:00\n",
    )
    .expect("Failed to write cue");

    (dir, cue)
}

/// Write a 2048-byte-per-sector .iso image into a temp directory
#[allow(dead_code)]
pub fn write_iso(sectors: u32) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let data: Vec<u8> = (0..sectors).flat_map(sector_payload).collect();
    let iso = dir.path().join("disc.iso");
    std::fs::write(&iso, data).expect("Failed to write iso");

    (dir, iso)
}

/// Drain one sector the way the host CPU does: read, 1026 words, ack
///
/// Returns the header from `read` and all words delivered.
#[allow(dead_code)]
pub fn drain_sector(cdc: &mut Cdc, disc: &mut DiscImage, cpu: HostCpu) -> (u32, Vec<u16>) {
    let header = cdc.read(disc).expect("Read failed");
    let words = (0..WORDS_PER_SECTOR).map(|_| cdc.host_data(cpu)).collect();
    cdc.ack();
    (header, words)
}
