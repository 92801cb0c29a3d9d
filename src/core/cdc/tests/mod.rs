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

//! Unit tests for the CDC organized by category

mod ring_buffer;

use super::*;
use std::cell::{Cell, RefCell};

/// Logger that records messages emitted on the calling thread
struct CaptureLogger;

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
    static CAPTURED: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        CAPTURING.with(|c| c.get())
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            CAPTURED.with(|c| {
                c.borrow_mut()
                    .push((record.level(), record.args().to_string()))
            });
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

/// Run `f` and return the log records it emitted on this thread
pub(super) fn capture_logs<F: FnOnce()>(f: F) -> Vec<(log::Level, String)> {
    // Another test may have installed it already
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(log::LevelFilter::Trace);

    CAPTURED.with(|c| c.borrow_mut().clear());
    CAPTURING.with(|c| c.set(true));
    f();
    CAPTURING.with(|c| c.set(false));

    CAPTURED.with(|c| c.take())
}

/// Messages logged at warn level
pub(super) fn warnings(records: &[(log::Level, String)]) -> Vec<&str> {
    records
        .iter()
        .filter(|(level, _)| *level == log::Level::Warn)
        .map(|(_, msg)| msg.as_str())
        .collect()
}

/// Source whose payload word `k` of sector `n` is `(n & 0xFF) << 8 | (k & 0xFF)`
pub(super) fn pattern_source() -> FnSectorSource<impl FnMut(u32) -> [u8; SECTOR_SIZE]> {
    FnSectorSource::new(|sector| {
        let mut data = [0u8; SECTOR_SIZE];
        for (i, byte) in data.iter_mut().enumerate() {
            *byte = if i % 2 == 0 { sector as u8 } else { (i / 2) as u8 };
        }
        data
    })
}

/// Expected payload word `k` of sector `n` from [`pattern_source`]
pub(super) fn pattern_word(sector: u32, k: usize) -> u16 {
    ((sector as u8 as u16) << 8) | (k as u8 as u16)
}

/// CDC with `count` sectors from `start` already buffered
pub(super) fn buffered_cdc<S: SectorSource>(source: &mut S, start: u32, count: u32) -> Cdc {
    let mut cdc = Cdc::new();
    cdc.seek(source, start, count);
    cdc.start(source);
    cdc
}

/// Assert the ring buffer index invariant
pub(super) fn assert_ring_invariant(cdc: &Cdc) {
    let buffer = cdc.buffer();
    assert!(buffer.len() <= CAPACITY);
    assert_eq!(
        buffer.write_index(),
        (buffer.read_index() + buffer.len()) % CAPACITY,
        "write index must follow read index + occupancy"
    );
}
