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

//! Host data transfer state
//!
//! A host read is either idle or bound to one buffered sector. While bound,
//! the target CPU drains the sector one word at a time through the host
//! data register.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::WORDS_PER_SECTOR;

/// The two host processors that can drain CDC data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostCpu {
    /// 68000 on the console side
    Main,
    /// 68000 on the Mega-CD side
    Sub,
}

/// Device destination (DD) codes of the CDC mode register
///
/// | Code | Destination    |
/// |------|----------------|
/// | 2    | Main CPU read  |
/// | 3    | Sub CPU read   |
/// | 4    | PCM RAM DMA    |
/// | 5    | PRG RAM DMA    |
/// | 7    | Word RAM DMA   |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceDestination {
    MainCpuRead,
    SubCpuRead,
    PcmRamDma,
    PrgRamDma,
    WordRamDma,
}

impl DeviceDestination {
    /// Decode a raw DD code
    ///
    /// Returns None for codes with no hardware meaning.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            2 => Some(Self::MainCpuRead),
            3 => Some(Self::SubCpuRead),
            4 => Some(Self::PcmRamDma),
            5 => Some(Self::PrgRamDma),
            7 => Some(Self::WordRamDma),
            _ => None,
        }
    }

    /// Raw DD code
    pub fn code(self) -> u16 {
        match self {
            Self::MainCpuRead => 2,
            Self::SubCpuRead => 3,
            Self::PcmRamDma => 4,
            Self::PrgRamDma => 5,
            Self::WordRamDma => 7,
        }
    }

    /// CPU allowed to read the host data register for this destination
    ///
    /// DMA destinations are serviced through the sub CPU side. PCM RAM
    /// transfers are not supported and return None.
    pub fn host_cpu(self) -> Option<HostCpu> {
        match self {
            Self::MainCpuRead => Some(HostCpu::Main),
            Self::SubCpuRead | Self::PrgRamDma | Self::WordRamDma => Some(HostCpu::Sub),
            Self::PcmRamDma => None,
        }
    }
}

bitflags! {
    /// CDC mode register flags as seen by the host
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModeFlags: u16 {
        /// EDT: the last word of the sector is next (or already read)
        const END_OF_DATA_TRANSFER = 1 << 15;
        /// DSR: bound data is waiting in the host data register
        const DATA_SET_READY = 1 << 14;
    }
}

/// State of the single in-flight host read
#[derive(Debug, Clone)]
pub struct HostTransfer {
    /// A read has been issued and not yet acknowledged
    pub(super) bound: bool,

    /// Buffer slot captured when the read was bound
    pub(super) sector_index: usize,

    /// Next word to deliver; `WORDS_PER_SECTOR` when nothing is pending
    pub(super) word_index: usize,

    /// CPU allowed to read the bound data
    pub(super) target: HostCpu,
}

impl HostTransfer {
    pub fn new() -> Self {
        Self {
            bound: false,
            sector_index: 0,
            word_index: WORDS_PER_SECTOR,
            target: HostCpu::Main,
        }
    }

    /// Bind a buffered slot for the given CPU
    pub(super) fn bind(&mut self, sector_index: usize, target: HostCpu) {
        self.target = target;
        self.sector_index = sector_index;
        self.word_index = 0;
        self.bound = true;
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn target(&self) -> HostCpu {
        self.target
    }

    pub fn sector_index(&self) -> usize {
        self.sector_index
    }

    pub fn word_index(&self) -> usize {
        self.word_index
    }

    /// EDT: next read delivers the final word, or the sector is drained
    pub fn end_of_data_transfer(&self) -> bool {
        self.word_index >= WORDS_PER_SECTOR - 1
    }

    /// DSR: words remain to be delivered
    pub fn data_set_ready(&self) -> bool {
        self.word_index != WORDS_PER_SECTOR
    }

    /// Flags reported to the target CPU
    pub fn mode_flags(&self) -> ModeFlags {
        let mut flags = ModeFlags::empty();

        if self.end_of_data_transfer() {
            flags |= ModeFlags::END_OF_DATA_TRANSFER;
        }

        if self.data_set_ready() {
            flags |= ModeFlags::DATA_SET_READY;
        }

        flags
    }
}

impl Default for HostTransfer {
    fn default() -> Self {
        Self::new()
    }
}
