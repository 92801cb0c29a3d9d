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

//! Mega-CD CD Data Controller emulation core
//!
//! This library emulates the CDC of the Sega Mega-CD: the chip that buffers
//! sectors read from the disc and hands them to the main and sub CPUs
//! through the host data register.
//!
//! # Example
//!
//! ```
//! use megacd_cdc::core::cdc::{Cdc, FnSectorSource, HostCpu, SECTOR_SIZE};
//!
//! let mut source = FnSectorSource::new(|sector| [sector as u8; SECTOR_SIZE]);
//! let mut cdc = Cdc::new();
//!
//! cdc.seek(&mut source, 0, 2);
//! cdc.start(&mut source);
//!
//! while cdc.stat(&mut source) {
//!     cdc.read(&mut source)?;
//!     for _ in 0..1026 {
//!         cdc.host_data(HostCpu::Sub);
//!     }
//!     cdc.ack();
//! }
//! # Ok::<(), megacd_cdc::core::error::CdcError>(())
//! ```
//!
//! # Modules
//!
//! - [`core::cdc`]: Sector buffer and host transfer state machine
//! - [`core::disc`]: Disc image loading (.cue/.bin/.iso)
//! - [`core::config`]: Session configuration (TOML)
//! - [`core::save_state`]: Save state serialization
//! - [`core::session`]: Streaming sessions over a disc image, with resume
//!
//! # Error Handling
//!
//! All fallible operations return [`core::error::Result<T>`] which is an alias for
//! `Result<T, EmulatorError>`. Register accesses from the emulated CPUs never
//! fail; only [`core::cdc::Cdc::read`] reports a [`core::error::CdcError`].

pub mod core;

// Re-export commonly used types
pub use core::error::{EmulatorError, Result};
