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

//! CD Data Controller (CDC) emulation for the Mega-CD
//!
//! The CDC streams sectors from the disc into an on-chip ring of sector
//! buffers and hands them to the main or sub CPU through the host data
//! register.
//!
//! # Host Read Protocol
//!
//! | Step | Operation                  | Register access              |
//! |------|----------------------------|------------------------------|
//! | 1    | [`Cdc::seek`]              | CDD seek command             |
//! | 2    | [`Cdc::start`]             | CDC start                    |
//! | 3    | [`Cdc::stat`]              | Poll for a decoded sector    |
//! | 4    | [`Cdc::read`]              | Bind the oldest sector       |
//! | 5    | [`Cdc::host_data`]         | Host data register, per word |
//! | 6    | [`Cdc::ack`]               | Release the sector           |
//!
//! The mode register ([`Cdc::mode`]) reports EDT/DSR while the sector is
//! drained. Reads past the last word repeat it until the sector is
//! acknowledged.
//!
//! # Buffering
//!
//! Every operation that touches the drive (start, stat, read, seek) first
//! runs a refill pass, which fills free slots as fast as the caller asks.
//! Reading is not paced to the 75 sectors/second of a real drive.
//!
//! # Example
//!
//! ```
//! use megacd_cdc::core::cdc::{Cdc, FnSectorSource, HostCpu, SECTOR_SIZE};
//!
//! let mut source = FnSectorSource::new(|_| [0x5A; SECTOR_SIZE]);
//! let mut cdc = Cdc::new();
//!
//! cdc.seek(&mut source, 0, 1);
//! cdc.start(&mut source);
//! assert!(cdc.stat(&mut source));
//!
//! let header = cdc.read(&mut source).unwrap();
//! assert_eq!(header, 0x0000_0001);
//! assert_eq!(cdc.host_data(HostCpu::Sub), 0x0000);
//! assert_eq!(cdc.host_data(HostCpu::Sub), 0x0001);
//! assert_eq!(cdc.host_data(HostCpu::Sub), 0x5A5A);
//! cdc.ack();
//! ```

mod buffer;
mod state;
pub mod timecode;
mod transfer;
#[cfg(test)]
mod tests;

pub use buffer::{SectorBuffer, SectorWords};
pub use transfer::{DeviceDestination, HostCpu, HostTransfer, ModeFlags};

use crate::core::error::CdcError;

/// User data bytes per sector
pub const SECTOR_SIZE: usize = 2048;

/// Header words preceding the payload in each buffered sector
pub const HEADER_WORDS: usize = 2;

/// Words per buffered sector (header + payload)
pub const WORDS_PER_SECTOR: usize = HEADER_WORDS + SECTOR_SIZE / 2;

/// Number of sector slots in the buffer RAM
pub const CAPACITY: usize = 8;

/// Device destination selected at power-on (sub CPU read)
pub const DEFAULT_DEVICE_DESTINATION: u16 = 3;

/// Supplier of raw sector bytes
///
/// Returns the next sequential sector on every call. The source owns its
/// own position; the CDC never seeks it.
pub trait SectorSource {
    fn next_sector(&mut self) -> &[u8; SECTOR_SIZE];
}

/// [`SectorSource`] backed by a closure of the sector number
///
/// Numbers sectors from zero in call order. Useful for tests and for
/// feeding synthetic data.
pub struct FnSectorSource<F> {
    read: F,
    next: u32,
    data: [u8; SECTOR_SIZE],
}

impl<F: FnMut(u32) -> [u8; SECTOR_SIZE]> FnSectorSource<F> {
    pub fn new(read: F) -> Self {
        Self {
            read,
            next: 0,
            data: [0; SECTOR_SIZE],
        }
    }

    /// Start numbering from `sector` on the next call
    pub fn seek_to(&mut self, sector: u32) {
        self.next = sector;
    }

    /// Number of sectors supplied so far (plus the starting offset)
    pub fn position(&self) -> u32 {
        self.next
    }
}

impl<F: FnMut(u32) -> [u8; SECTOR_SIZE]> SectorSource for FnSectorSource<F> {
    fn next_sector(&mut self) -> &[u8; SECTOR_SIZE] {
        self.data = (self.read)(self.next);
        self.next = self.next.wrapping_add(1);
        &self.data
    }
}

/// CD Data Controller
///
/// Owns the sector buffer and the host transfer state. All access is
/// through `&mut self`; the driver serializes main and sub CPU accesses.
pub struct Cdc {
    /// Sector the next refill reads from the disc
    pub(super) current_sector: u32,

    /// Sectors left in the current run (0 = unbounded)
    pub(super) sectors_remaining: u32,

    /// Refill passes may pull new sectors
    pub(super) reading: bool,

    /// Buffered sectors
    pub(super) buffer: SectorBuffer,

    /// In-flight host read
    pub(super) transfer: HostTransfer,

    /// Raw DD code, validated when a read is bound
    pub(super) device_destination: u16,

    /// DMA address register (stored only)
    pub(super) dma_address: u16,
}

impl Cdc {
    /// Create a CDC in its power-on state
    ///
    /// The buffer is empty, reading is stopped and no host read is bound.
    pub fn new() -> Self {
        Self {
            current_sector: 0,
            sectors_remaining: 0,
            reading: false,
            buffer: SectorBuffer::new(),
            transfer: HostTransfer::new(),
            device_destination: DEFAULT_DEVICE_DESTINATION,
            dma_address: 0,
        }
    }

    /// Return to the power-on state
    pub fn reset(&mut self) {
        self.current_sector = 0;
        self.sectors_remaining = 0;
        self.reading = false;
        self.buffer.clear();
        self.transfer = HostTransfer::new();
        self.device_destination = DEFAULT_DEVICE_DESTINATION;
        self.dma_address = 0;

        log::debug!("CDC: Reset");
    }

    /// Fill free buffer slots from the sector source
    ///
    /// Stops when the buffer is full or the current run of sectors ends.
    fn refill<S: SectorSource + ?Sized>(&mut self, source: &mut S) {
        if !self.reading {
            return;
        }

        let first_sector = self.current_sector;

        while !self.buffer.is_full() {
            let header = timecode::sector_header(self.current_sector);
            self.buffer.push(header, source.next_sector());

            self.current_sector = self.current_sector.wrapping_add(1);

            if self.sectors_remaining != 0 {
                self.sectors_remaining -= 1;

                if self.sectors_remaining == 0 {
                    self.reading = false;
                    log::debug!("CDC: Sector run complete at sector {}", self.current_sector);
                    break;
                }
            }
        }

        if self.current_sector != first_sector {
            log::trace!(
                "CDC: Buffered sectors {}..{} ({} buffered)",
                first_sector,
                self.current_sector,
                self.buffer.len()
            );
        }
    }

    /// Start decoding sectors into the buffer
    pub fn start<S: SectorSource + ?Sized>(&mut self, source: &mut S) {
        self.reading = true;
        log::debug!("CDC: Start at sector {}", self.current_sector);

        self.refill(source);
    }

    /// Stop decoding sectors
    ///
    /// Buffered sectors and a bound host read are left untouched.
    pub fn stop(&mut self) {
        self.reading = false;
        log::debug!("CDC: Stop");
    }

    /// Refill, then report whether a sector is buffered
    pub fn stat<S: SectorSource + ?Sized>(&mut self, source: &mut S) -> bool {
        self.refill(source);

        !self.buffer.is_empty()
    }

    /// Bind the oldest buffered sector to the host data register
    ///
    /// Returns the sector header as a 32-bit value on success. Fails without
    /// changing any state when no sector is buffered, when a read is already
    /// bound, or when the device destination cannot be read by a host CPU.
    pub fn read<S: SectorSource + ?Sized>(&mut self, source: &mut S) -> Result<u32, CdcError> {
        self.refill(source);

        if self.buffer.is_empty() {
            return Err(CdcError::NoSectorBuffered);
        }

        if self.transfer.is_bound() {
            return Err(CdcError::AlreadyBound);
        }

        let target = DeviceDestination::from_code(self.device_destination)
            .and_then(DeviceDestination::host_cpu);

        let Some(target) = target else {
            log::warn!(
                "CDC: Read requested with invalid device destination 0x{:X}",
                self.device_destination
            );
            return Err(CdcError::InvalidDeviceDestination(self.device_destination));
        };

        let sector_index = self.buffer.read_index();
        self.transfer.bind(sector_index, target);

        let words = self.buffer.sector(sector_index);
        let header = (words[0] as u32) << 16 | words[1] as u32;

        log::trace!(
            "CDC: Bound slot {} for {:?} CPU, header 0x{:08X}",
            sector_index,
            target,
            header
        );

        Ok(header)
    }

    /// Read the host data register
    ///
    /// Delivers the bound sector one word at a time. A CPU other than the
    /// target, or a read with nothing bound, reads 0. Once the sector is
    /// drained the final word repeats until [`ack`](Self::ack).
    pub fn host_data(&mut self, cpu: HostCpu) -> u16 {
        if cpu != self.transfer.target {
            return 0;
        }

        if !self.transfer.bound {
            return 0;
        }

        let words = self.buffer.sector(self.transfer.sector_index);

        if !self.transfer.data_set_ready() {
            return words[self.transfer.word_index - 1];
        }

        let value = words[self.transfer.word_index];
        self.transfer.word_index += 1;

        value
    }

    /// Acknowledge the bound read and release its sector
    pub fn ack(&mut self) {
        if !self.transfer.bound {
            return;
        }

        self.transfer.bound = false;
        self.buffer.consume();

        log::trace!("CDC: Acknowledged, {} sectors buffered", self.buffer.len());
    }

    /// Position the drive at `sector` and read `total_sectors` from there
    ///
    /// A total of 0 reads without limit. The buffer is not cleared; callers
    /// seek once the buffer has been drained.
    pub fn seek<S: SectorSource + ?Sized>(
        &mut self,
        source: &mut S,
        sector: u32,
        total_sectors: u32,
    ) {
        if !self.buffer.is_empty() {
            log::warn!(
                "CDC: Seek to sector {} with {} sectors still buffered",
                sector,
                self.buffer.len()
            );
        }

        self.current_sector = sector;
        self.sectors_remaining = total_sectors;
        log::debug!("CDC: Seek to sector {} ({} sectors)", sector, total_sectors);

        self.refill(source);
    }

    /// Read the mode register from the given CPU
    ///
    /// A CPU other than the transfer target always sees EDT alone.
    pub fn mode(&self, cpu: HostCpu) -> ModeFlags {
        if cpu != self.transfer.target {
            return ModeFlags::END_OF_DATA_TRANSFER;
        }

        self.transfer.mode_flags()
    }

    /// Set the device destination code
    ///
    /// The code is validated when the next read is bound.
    pub fn set_device_destination(&mut self, code: u16) {
        self.device_destination = code;
    }

    /// Set the DMA address register
    pub fn set_dma_address(&mut self, address: u16) {
        self.dma_address = address;
    }

    pub fn device_destination(&self) -> u16 {
        self.device_destination
    }

    pub fn dma_address(&self) -> u16 {
        self.dma_address
    }

    pub fn current_sector(&self) -> u32 {
        self.current_sector
    }

    pub fn sectors_remaining(&self) -> u32 {
        self.sectors_remaining
    }

    pub fn is_reading(&self) -> bool {
        self.reading
    }

    pub fn buffer(&self) -> &SectorBuffer {
        &self.buffer
    }

    pub fn transfer(&self) -> &HostTransfer {
        &self.transfer
    }
}

impl Default for Cdc {
    fn default() -> Self {
        Self::new()
    }
}
