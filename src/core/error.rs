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

/// Emulator error types
use thiserror::Error;

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, EmulatorError>;

/// Main error type for the emulator
#[derive(Error, Debug)]
pub enum EmulatorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CDC error: {0}")]
    Cdc(#[from] CdcError),

    #[error("Disc error: {0}")]
    Disc(#[from] DiscError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Save state error: {0}")]
    SaveState(String),
}

/// CDC-specific error types
///
/// Only the host read request can fail; every other register access
/// returns a value instead of an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CdcError {
    #[error("No sector buffered")]
    NoSectorBuffered,

    #[error("Host data already bound")]
    AlreadyBound,

    #[error("Invalid device destination: {0:#X}")]
    InvalidDeviceDestination(u16),

    #[error("Invalid CDC state: {0}")]
    InvalidState(String),
}

/// Disc image error types
#[derive(Error, Debug)]
pub enum DiscError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid cue sheet: {0}")]
    InvalidCue(String),

    #[error("Unsupported track type: {0}")]
    UnsupportedTrack(String),

    #[error("Invalid image size: {size} bytes is not a multiple of {sector_size}")]
    InvalidImageSize { size: usize, sector_size: usize },
}
