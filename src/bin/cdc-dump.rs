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

//! Stream sectors from a disc image through the CDC
//!
//! Drives the controller the way the sub CPU BIOS does: program the
//! device destination, seek, start, then read/drain/acknowledge each
//! sector. The drained payload goes to `--output`, otherwise the sector
//! headers are printed.

use clap::Parser;
use log::{error, info};
use megacd_cdc::core::cdc::timecode;
use megacd_cdc::core::config::SessionConfig;
use megacd_cdc::core::disc::DiscImage;
use megacd_cdc::core::error::{EmulatorError, Result};
use megacd_cdc::core::save_state::SaveState;
use megacd_cdc::core::session::Session;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Mega-CD CDC sector dump tool
#[derive(Parser)]
#[command(name = "cdc-dump")]
#[command(about = "Stream disc sectors through the Mega-CD CDC", long_about = None)]
struct Args {
    /// Path to disc image (.cue, .bin or .iso)
    disc: Option<PathBuf>,

    /// Session configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// First sector to read
    #[arg(short = 's', long)]
    start: Option<u32>,

    /// Number of sectors to read
    #[arg(short = 'n', long)]
    count: Option<u32>,

    /// Device destination code (2 = main CPU, 3 = sub CPU)
    #[arg(short = 'd', long)]
    destination: Option<u16>,

    /// Write drained sector payloads to this file
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Restore a save state before streaming
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Write a save state after streaming
    #[arg(long)]
    save_state: Option<PathBuf>,
}

impl Args {
    /// Merge command-line flags over the configuration file
    fn session(&self) -> Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading config from: {}", path.display());
                SessionConfig::load(path)?
            }
            None => SessionConfig::default(),
        };

        if let Some(disc) = &self.disc {
            config.disc = Some(disc.clone());
        }
        if let Some(start) = self.start {
            config.start_sector = start;
        }
        if let Some(count) = self.count {
            config.sector_count = count;
        }
        if let Some(destination) = self.destination {
            config.device_destination = destination;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    // Optional .env for RUST_LOG
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("cdc-dump v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = args.session()?;

    let Some(disc_path) = config.disc.clone() else {
        error!("No disc image given (pass a path or set 'disc' in the config)");
        return Err(EmulatorError::Config("no disc image".to_string()));
    };

    info!("Loading disc from: {}", disc_path.display());
    let disc = DiscImage::load(&disc_path).map_err(|e| {
        error!("Failed to load disc: {}", e);
        EmulatorError::Disc(e)
    })?;

    if let Some(title) = disc.title() {
        info!("Disc title: {}", title);
    }

    let mut session = match &args.resume {
        Some(path) => {
            info!("Resuming from: {}", path.display());
            let state = SaveState::load_from_file(path)?;
            Session::resume(&config, disc, &state)?
        }
        None => Session::new(&config, disc),
    };

    let mut output = match &args.output {
        Some(path) => Some(BufWriter::new(File::create(path)?)),
        None => None,
    };

    let mut sectors = 0u32;

    while let Some(sector) = session.next_sector()? {
        match output.as_mut() {
            Some(out) => out.write_all(&sector.payload())?,
            None => {
                let position = timecode::decode_header(sector.header.to_be_bytes());
                println!(
                    "{:6}  {:02}:{:02}:{:02}  header {:08X}",
                    position.to_sector(),
                    position.minute,
                    position.second,
                    position.frame,
                    sector.header
                );
            }
        }

        sectors += 1;
    }

    if let Some(mut out) = output {
        out.flush()?;
    }

    info!("Streamed {} sectors", sectors);

    if let Some(path) = &args.save_state {
        session.save_state().save_to_file(path)?;
        info!("Save state written to: {}", path.display());
    }

    Ok(())
}
