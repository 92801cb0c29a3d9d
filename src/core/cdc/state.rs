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

//! Save state support for the CDC

use super::{Cdc, HostCpu, HostTransfer, SectorBuffer, CAPACITY, WORDS_PER_SECTOR};
use crate::core::error::{CdcError, Result};
use crate::core::save_state::{CdcState, StateSave};

impl StateSave for Cdc {
    type State = CdcState;

    fn to_state(&self) -> CdcState {
        CdcState {
            current_sector: self.current_sector,
            sectors_remaining: self.sectors_remaining,
            reading: self.reading,
            sectors: self.buffer.sectors.iter().map(|s| s.to_vec()).collect(),
            read_index: self.buffer.read_index as u32,
            write_index: self.buffer.write_index as u32,
            buffered: self.buffer.total as u32,
            bound: self.transfer.bound,
            bound_sector_index: self.transfer.sector_index as u32,
            word_index: self.transfer.word_index as u32,
            target_sub_cpu: self.transfer.target == HostCpu::Sub,
            device_destination: self.device_destination,
            dma_address: self.dma_address,
        }
    }

    fn restore_from_state(&mut self, state: &CdcState) -> Result<()> {
        validate(state)?;

        let mut buffer = SectorBuffer::new();
        for (slot, saved) in buffer.sectors.iter_mut().zip(&state.sectors) {
            slot.copy_from_slice(saved);
        }
        buffer.read_index = state.read_index as usize;
        buffer.write_index = state.write_index as usize;
        buffer.total = state.buffered as usize;

        let transfer = HostTransfer {
            bound: state.bound,
            sector_index: state.bound_sector_index as usize,
            word_index: state.word_index as usize,
            target: if state.target_sub_cpu {
                HostCpu::Sub
            } else {
                HostCpu::Main
            },
        };

        self.current_sector = state.current_sector;
        self.sectors_remaining = state.sectors_remaining;
        self.reading = state.reading;
        self.buffer = buffer;
        self.transfer = transfer;
        self.device_destination = state.device_destination;
        self.dma_address = state.dma_address;

        log::debug!(
            "CDC: Restored state at sector {} ({} buffered)",
            self.current_sector,
            self.buffer.len()
        );

        Ok(())
    }
}

/// Check the buffer and transfer invariants of a saved state
fn validate(state: &CdcState) -> std::result::Result<(), CdcError> {
    let invalid = |msg: String| -> std::result::Result<(), CdcError> {
        Err(CdcError::InvalidState(msg))
    };

    if state.sectors.len() != CAPACITY {
        return invalid(format!(
            "{} sector slots (expected {})",
            state.sectors.len(),
            CAPACITY
        ));
    }

    if let Some(slot) = state.sectors.iter().find(|s| s.len() != WORDS_PER_SECTOR) {
        return invalid(format!(
            "sector slot of {} words (expected {})",
            slot.len(),
            WORDS_PER_SECTOR
        ));
    }

    let capacity = CAPACITY as u32;

    if state.buffered > capacity {
        return invalid(format!("{} sectors buffered", state.buffered));
    }

    if state.read_index >= capacity
        || state.write_index >= capacity
        || state.bound_sector_index >= capacity
    {
        return invalid(format!(
            "buffer index out of range (read {}, write {}, bound {})",
            state.read_index, state.write_index, state.bound_sector_index
        ));
    }

    if state.write_index != (state.read_index + state.buffered) % capacity {
        return invalid(format!(
            "write index {} does not follow read index {} + {}",
            state.write_index, state.read_index, state.buffered
        ));
    }

    if state.word_index > WORDS_PER_SECTOR as u32 {
        return invalid(format!("word index {}", state.word_index));
    }

    if state.bound && (state.buffered == 0 || state.bound_sector_index != state.read_index) {
        return invalid(format!(
            "bound slot {} is not the oldest buffered sector",
            state.bound_sector_index
        ));
    }

    Ok(())
}
