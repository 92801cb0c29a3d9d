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

//! Save state serialization for the CDC
//!
//! Captures the complete controller state, including every buffered
//! sector, so a session can be resumed in the middle of a host transfer.
//!
//! # Save State Format
//!
//! Save states are serialized using bincode for efficient binary encoding.
//! The state includes:
//! - Metadata (timestamp, disc title)
//! - Drive position (current sector, sectors remaining, reading flag)
//! - Sector buffer (slots, read/write indices, occupancy)
//! - Host transfer (bound flag, bound slot, word index, target CPU)
//! - Mode registers (device destination, DMA address)
//!
//! # Version Compatibility
//!
//! Save states include a version number to ensure compatibility.
//! Loading a save state with a different version will fail with an error.
//!
//! # Example
//!
//! ```no_run
//! use megacd_cdc::core::cdc::Cdc;
//! use megacd_cdc::core::save_state::SaveState;
//!
//! let cdc = Cdc::new();
//!
//! let state = SaveState::from_cdc(&cdc, "SONIC CD");
//! state.save_to_file("cdc.state").unwrap();
//!
//! let loaded = SaveState::load_from_file("cdc.state").unwrap();
//! let mut restored = Cdc::new();
//! loaded.apply_to(&mut restored).unwrap();
//! ```

use bincode::{config, Decode, Encode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::core::cdc::Cdc;
use crate::core::error::{EmulatorError, Result};

/// Save state version for compatibility checking
///
/// This version number should be incremented whenever the save state format changes
/// in a way that breaks backward compatibility.
pub const SAVE_STATE_VERSION: u32 = 1;

/// Upper bound on bytes a save state may claim while decoding
///
/// A full buffer is 8 slots of 1026 words, well under this.
pub const MAX_SAVE_STATE_SIZE: usize = 1 << 20;

/// Complete CDC save state
#[derive(Serialize, Deserialize, Encode, Decode)]
pub struct SaveState {
    /// Version number for compatibility checking
    pub version: u32,

    /// Save state metadata
    pub metadata: SaveStateMetadata,

    /// Controller state
    pub cdc: CdcState,
}

/// Save state metadata
///
/// Contains information about when and where the save state was created.
#[derive(Serialize, Deserialize, Encode, Decode)]
#[bincode(encode_bounds = "", decode_bounds = "")]
pub struct SaveStateMetadata {
    /// Timestamp when the save state was created
    #[bincode(with_serde)]
    pub timestamp: DateTime<Utc>,

    /// Title of the disc being read
    pub disc_title: String,
}

/// CDC state
///
/// Indices are stored as u32 so the format does not depend on the host
/// pointer width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct CdcState {
    /// Sector the next refill reads
    pub current_sector: u32,

    /// Sectors left in the current run (0 = unbounded)
    pub sectors_remaining: u32,

    /// Refill passes may pull new sectors
    pub reading: bool,

    /// Buffer slots, header words first
    pub sectors: Vec<Vec<u16>>,

    /// Oldest buffered slot
    pub read_index: u32,

    /// Next free slot
    pub write_index: u32,

    /// Occupied slots
    pub buffered: u32,

    /// Host read bound
    pub bound: bool,

    /// Slot captured by the bound read
    pub bound_sector_index: u32,

    /// Next word to deliver
    pub word_index: u32,

    /// Transfer target is the sub CPU
    pub target_sub_cpu: bool,

    /// Raw device destination code
    pub device_destination: u16,

    /// DMA address register
    pub dma_address: u16,
}

impl SaveState {
    /// Capture the current state of a CDC
    ///
    /// # Arguments
    ///
    /// * `cdc` - Controller to save
    /// * `disc_title` - Title recorded in the metadata
    pub fn from_cdc(cdc: &Cdc, disc_title: &str) -> Self {
        Self {
            version: SAVE_STATE_VERSION,
            metadata: SaveStateMetadata {
                timestamp: Utc::now(),
                disc_title: disc_title.to_string(),
            },
            cdc: cdc.to_state(),
        }
    }

    /// Restore a CDC from this save state
    ///
    /// The controller is left untouched if the saved state is inconsistent.
    pub fn apply_to(&self, cdc: &mut Cdc) -> Result<()> {
        cdc.restore_from_state(&self.cdc)
    }

    /// Save state to file
    ///
    /// Serializes the save state to a binary file using bincode.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be created
    /// - Serialization fails
    /// - Write operation fails
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config = config::standard();
        let encoded = bincode::encode_to_vec(self, config)
            .map_err(|e| EmulatorError::SaveState(e.to_string()))?;
        let mut file = File::create(path)?;
        file.write_all(&encoded)?;
        Ok(())
    }

    /// Load state from file
    ///
    /// Deserializes a save state from a binary file and verifies version compatibility.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be opened
    /// - File cannot be read
    /// - Deserialization fails
    /// - Version is incompatible
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;

        let config = config::standard().with_limit::<MAX_SAVE_STATE_SIZE>();
        let (state, _): (SaveState, usize) = bincode::decode_from_slice(&buffer, config)
            .map_err(|e| EmulatorError::SaveState(e.to_string()))?;

        // Version check
        if state.version != SAVE_STATE_VERSION {
            return Err(EmulatorError::SaveState(format!(
                "Incompatible save state version: expected {}, got {}",
                SAVE_STATE_VERSION, state.version
            )));
        }

        Ok(state)
    }
}

/// Trait for components that support save states
pub trait StateSave {
    /// The state type for this component
    type State: Serialize + for<'de> Deserialize<'de>;

    /// Convert this component to a saveable state
    fn to_state(&self) -> Self::State;

    /// Restore this component from a saved state
    ///
    /// # Errors
    ///
    /// Fails without modifying the component if the state is invalid.
    fn restore_from_state(&mut self, state: &Self::State) -> Result<()>;
}
