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

//! Core emulation components
//!
//! This module contains the CD data path of the Mega-CD:
//! - CDC (CD Data Controller): sector buffering and host transfers
//! - Disc image loading
//! - Session configuration
//! - Save states
//! - Streaming sessions driving the CDC from a disc image

pub mod cdc;
pub mod config;
pub mod disc;
pub mod error;
pub mod save_state;
pub mod session;

// Re-export commonly used types
pub use cdc::{Cdc, HostCpu, ModeFlags, SectorSource};
pub use config::SessionConfig;
pub use disc::DiscImage;
pub use error::{CdcError, DiscError, EmulatorError, Result};
pub use session::{Session, StreamedSector};
