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

//! Sector streaming sessions
//!
//! Drives the CDC the way the sub CPU BIOS does: program the device
//! destination, seek, start, then read, drain and acknowledge one sector
//! at a time. A session can also pick up from a save state, including one
//! taken in the middle of a host transfer.

use crate::core::cdc::{timecode, Cdc, DeviceDestination, HostCpu, WORDS_PER_SECTOR};
use crate::core::config::SessionConfig;
use crate::core::disc::DiscImage;
use crate::core::error::Result;
use crate::core::save_state::SaveState;

/// One sector as delivered through the host data register
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamedSector {
    /// Header value returned by the read request
    pub header: u32,

    /// Every word read from the host data register, header words first
    pub words: Vec<u16>,
}

impl StreamedSector {
    /// Sector number encoded in the header
    pub fn sector(&self) -> u32 {
        timecode::decode_header(self.header.to_be_bytes()).to_sector()
    }

    /// Payload bytes without the header words
    pub fn payload(&self) -> Vec<u8> {
        self.words[2..].iter().flat_map(|w| w.to_be_bytes()).collect()
    }
}

/// A CDC reading from a disc image on behalf of one host CPU
pub struct Session {
    cdc: Cdc,
    disc: DiscImage,
    host_cpu: HostCpu,
}

impl Session {
    /// Start a fresh run of `sector_count` sectors at `start_sector`
    pub fn new(config: &SessionConfig, mut disc: DiscImage) -> Self {
        warn_if_unrouted(config);

        let mut cdc = Cdc::new();
        cdc.set_device_destination(config.device_destination);

        disc.seek_to(config.start_sector);
        cdc.seek(&mut disc, config.start_sector, config.sector_count);
        cdc.start(&mut disc);

        Self {
            cdc,
            disc,
            host_cpu: config.host_cpu,
        }
    }

    /// Continue from a save state
    ///
    /// A transfer interrupted mid-sector is drained and acknowledged first.
    /// An unfinished run carries on; sectors it already buffered are
    /// delivered before anything else. Once the saved run is complete a new
    /// run of `sector_count` sectors starts where it ended.
    pub fn resume(config: &SessionConfig, mut disc: DiscImage, state: &SaveState) -> Result<Self> {
        warn_if_unrouted(config);

        let mut cdc = Cdc::new();
        state.apply_to(&mut cdc)?;
        disc.seek_to(cdc.current_sector());

        if cdc.transfer().is_bound() {
            let target = cdc.transfer().target();
            let remaining = WORDS_PER_SECTOR - cdc.transfer().word_index();
            for _ in 0..remaining {
                cdc.host_data(target);
            }
            cdc.ack();

            log::info!(
                "Session: Finished interrupted transfer ({} words discarded)",
                remaining
            );
        }

        cdc.set_device_destination(config.device_destination);

        if cdc.is_reading() || cdc.sectors_remaining() != 0 {
            cdc.start(&mut disc);
        } else if cdc.buffer().is_empty() {
            let sector = cdc.current_sector();
            cdc.seek(&mut disc, sector, config.sector_count);
            cdc.start(&mut disc);
        } else {
            log::info!(
                "Session: Draining {} sectors left from the saved run",
                cdc.buffer().len()
            );
        }

        Ok(Self {
            cdc,
            disc,
            host_cpu: config.host_cpu,
        })
    }

    /// Read, drain and acknowledge the next buffered sector
    ///
    /// Returns None once the run is over and the buffer is empty.
    pub fn next_sector(&mut self) -> Result<Option<StreamedSector>> {
        if !self.cdc.stat(&mut self.disc) {
            return Ok(None);
        }

        let header = self.cdc.read(&mut self.disc)?;

        let cpu = self.host_cpu;
        let words = (0..WORDS_PER_SECTOR)
            .map(|_| self.cdc.host_data(cpu))
            .collect();
        self.cdc.ack();

        // Unbounded runs end with the image
        if self.cdc.is_reading() && self.disc.position() >= self.disc.sector_count() {
            self.cdc.stop();
        }

        Ok(Some(StreamedSector { header, words }))
    }

    /// Capture the controller for a later [`resume`](Self::resume)
    pub fn save_state(&self) -> SaveState {
        let title = self.disc.title().unwrap_or_default();
        SaveState::from_cdc(&self.cdc, &title)
    }

    pub fn cdc(&self) -> &Cdc {
        &self.cdc
    }

    pub fn disc(&self) -> &DiscImage {
        &self.disc
    }
}

fn warn_if_unrouted(config: &SessionConfig) {
    let routed = DeviceDestination::from_code(config.device_destination)
        .and_then(DeviceDestination::host_cpu);

    if routed != Some(config.host_cpu) {
        log::warn!(
            "Session: Device destination {} does not route data to the {:?} CPU",
            config.device_destination,
            config.host_cpu
        );
    }
}
