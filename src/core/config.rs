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

//! Session configuration
//!
//! Describes one streaming run through the CDC: which disc to read, where
//! to start, how many sectors, and which host CPU drains them.
//!
//! ```toml
//! disc = "game.cue"
//! start_sector = 16
//! sector_count = 4
//! device_destination = 3
//! host_cpu = "sub"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::cdc::{HostCpu, DEFAULT_DEVICE_DESTINATION};
use crate::core::error::{EmulatorError, Result};

/// Streaming session settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Disc image path (.cue, .bin or .iso)
    pub disc: Option<PathBuf>,

    /// First sector to read
    pub start_sector: u32,

    /// Number of sectors to read
    pub sector_count: u32,

    /// Device destination code programmed before each read
    pub device_destination: u16,

    /// CPU that drains the host data register
    pub host_cpu: HostCpu,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            disc: None,
            start_sector: 0,
            sector_count: 1,
            device_destination: DEFAULT_DEVICE_DESTINATION,
            host_cpu: HostCpu::Sub,
        }
    }
}

impl SessionConfig {
    /// Load configuration from TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| EmulatorError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| EmulatorError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
