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

//! Disc image loading
//!
//! Loads Mega-CD disc images (.cue/.bin, raw .bin or .iso) and supplies the
//! user data of the first data track to the CDC one sector at a time.

use std::path::Path;

use crate::core::cdc::{SectorSource, SECTOR_SIZE};
use crate::core::error::DiscError;

/// Bytes per raw sector (sync + header + user data + EDC/ECC)
pub const RAW_SECTOR_SIZE: usize = 2352;

/// Offset of the user data inside a raw Mode 1 sector
const RAW_DATA_OFFSET: usize = 16;

/// Domestic (Japanese) title in the first sector of the disc
const DOMESTIC_TITLE: std::ops::Range<usize> = 0x120..0x150;

/// Overseas title in the first sector of the disc
const OVERSEAS_TITLE: std::ops::Range<usize> = 0x150..0x180;

/// Disc image track information
#[derive(Debug, Clone)]
pub struct Track {
    /// Track number (1-99)
    pub number: u8,

    /// Track type
    pub track_type: TrackType,

    /// Start sector from the INDEX 01 entry
    pub start_sector: u32,
}

/// Track type
///
/// Specifies the format of data stored in a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackType {
    /// Data track, 2048 bytes of user data per sector
    Mode1_2048,
    /// Data track, raw 2352-byte sectors
    Mode1_2352,
    /// CD-DA audio, 2352 bytes per sector
    Audio,
}

impl TrackType {
    /// Bytes per sector in the image file
    pub fn sector_stride(self) -> usize {
        match self {
            Self::Mode1_2048 => SECTOR_SIZE,
            Self::Mode1_2352 | Self::Audio => RAW_SECTOR_SIZE,
        }
    }

    /// Offset of the user data inside each sector
    fn data_offset(self) -> usize {
        match self {
            Self::Mode1_2048 => 0,
            Self::Mode1_2352 | Self::Audio => RAW_DATA_OFFSET,
        }
    }
}

/// Disc image with a sequential read cursor
///
/// Implements [`SectorSource`]: every call returns the user data of the
/// sector at the cursor and advances it. Reads past the end of the data
/// track return zero-filled sectors.
///
/// # Example
///
/// ```no_run
/// use megacd_cdc::core::cdc::SectorSource;
/// use megacd_cdc::core::disc::DiscImage;
///
/// let mut disc = DiscImage::load("game.cue").unwrap();
/// disc.seek_to(16);
/// let sector = disc.next_sector();
/// assert_eq!(sector.len(), 2048);
/// ```
#[derive(Debug)]
pub struct DiscImage {
    /// Tracks on the disc
    tracks: Vec<Track>,

    /// Image bytes
    data: Vec<u8>,

    /// Format of the first data track
    track_type: TrackType,

    /// Next sector returned by `next_sector`
    position: u32,

    /// Last sector handed out
    sector: [u8; SECTOR_SIZE],
}

impl DiscImage {
    /// Load a disc image
    ///
    /// `.cue` sheets are parsed for their data track; `.iso` files are read
    /// as 2048-byte sectors and any other file as raw 2352-byte sectors.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DiscError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("cue") => Self::load_cue(path),
            Some("iso") => Self::from_bytes(std::fs::read(path)?, TrackType::Mode1_2048),
            _ => Self::from_bytes(std::fs::read(path)?, TrackType::Mode1_2352),
        }
    }

    /// Build a single-track image from bytes already in memory
    pub fn from_bytes(data: Vec<u8>, track_type: TrackType) -> Result<Self, DiscError> {
        let tracks = vec![Track {
            number: 1,
            track_type,
            start_sector: 0,
        }];

        Self::new(tracks, data)
    }

    fn new(tracks: Vec<Track>, data: Vec<u8>) -> Result<Self, DiscError> {
        let track_type = tracks
            .first()
            .map(|t| t.track_type)
            .ok_or_else(|| DiscError::InvalidCue("no tracks".to_string()))?;

        if track_type == TrackType::Audio {
            return Err(DiscError::UnsupportedTrack(
                "first track is audio".to_string(),
            ));
        }

        let stride = track_type.sector_stride();
        if data.len() % stride != 0 {
            return Err(DiscError::InvalidImageSize {
                size: data.len(),
                sector_size: stride,
            });
        }

        log::info!(
            "Loaded disc image: {} tracks, {} sectors ({:?})",
            tracks.len(),
            data.len() / stride,
            track_type
        );

        Ok(Self {
            tracks,
            data,
            track_type,
            position: 0,
            sector: [0; SECTOR_SIZE],
        })
    }

    fn load_cue(cue_path: &Path) -> Result<Self, DiscError> {
        let cue_data = std::fs::read_to_string(cue_path)?;
        let bin_path = Self::get_bin_path_from_cue(cue_path, &cue_data)?;
        let tracks = Self::parse_cue(&cue_data)?;

        let data = std::fs::read(&bin_path).map_err(|e| {
            DiscError::InvalidCue(format!(
                "Failed to read bin file '{}': {}",
                bin_path.display(),
                e
            ))
        })?;

        Self::new(tracks, data)
    }

    /// Resolve the FILE directive relative to the cue sheet
    fn get_bin_path_from_cue(
        cue_path: &Path,
        cue_data: &str,
    ) -> Result<std::path::PathBuf, DiscError> {
        for line in cue_data.lines() {
            let line = line.trim();
            if !line.starts_with("FILE") {
                continue;
            }

            let Some(start) = line.find('"') else {
                continue;
            };
            let Some(end) = line[start + 1..].find('"') else {
                continue;
            };

            let bin_filename = &line[start + 1..start + 1 + end];
            return Ok(match cue_path.parent() {
                Some(parent) => parent.join(bin_filename),
                None => std::path::PathBuf::from(bin_filename),
            });
        }

        Err(DiscError::InvalidCue(
            "No FILE directive found in .cue file".to_string(),
        ))
    }

    /// Parse .cue file content to extract track information
    pub(crate) fn parse_cue(cue_data: &str) -> Result<Vec<Track>, DiscError> {
        let mut tracks = Vec::new();
        let mut current_track: Option<Track> = None;

        for line in cue_data.lines() {
            let line = line.trim();

            if line.starts_with("TRACK") {
                if let Some(track) = current_track.take() {
                    tracks.push(track);
                }

                let parts: Vec<&str> = line.split_whitespace().collect();
                let number = parts
                    .get(1)
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| DiscError::InvalidCue(format!("Invalid track: '{}'", line)))?;
                let track_type = Self::parse_track_type(parts.get(2).copied().unwrap_or(""))?;

                current_track = Some(Track {
                    number,
                    track_type,
                    start_sector: 0,
                });
            } else if line.starts_with("INDEX 01") {
                if let Some(ref mut track) = current_track {
                    let parts: Vec<&str> = line.split_whitespace().collect();
                    if let Some(time_str) = parts.get(2) {
                        track.start_sector = Self::parse_msf(time_str)?;
                    }
                }
            }
        }

        if let Some(track) = current_track {
            tracks.push(track);
        }

        Ok(tracks)
    }

    /// Parse an MM:SS:FF time string into a sector count
    pub(crate) fn parse_msf(msf: &str) -> Result<u32, DiscError> {
        let parts: Vec<u32> = msf
            .split(':')
            .map(|p| p.parse::<u32>())
            .collect::<Result<_, _>>()
            .map_err(|_| DiscError::InvalidCue(format!("Invalid MSF format: '{}'", msf)))?;

        let invalid = || DiscError::InvalidCue(format!("Invalid MSF format: '{}'", msf));

        match parts.as_slice() {
            &[minute, second, frame] if second < 60 && frame < 75 => minute
                .checked_mul(60 * 75)
                .and_then(|sectors| sectors.checked_add(second * 75 + frame))
                .ok_or_else(invalid),
            _ => Err(invalid()),
        }
    }

    fn parse_track_type(s: &str) -> Result<TrackType, DiscError> {
        match s {
            "MODE1/2048" => Ok(TrackType::Mode1_2048),
            "MODE1/2352" => Ok(TrackType::Mode1_2352),
            "AUDIO" => Ok(TrackType::Audio),
            other => Err(DiscError::UnsupportedTrack(other.to_string())),
        }
    }

    /// Move the read cursor
    pub fn seek_to(&mut self, sector: u32) {
        self.position = sector;
    }

    /// Sector returned by the next read
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Number of sectors in the image
    pub fn sector_count(&self) -> u32 {
        (self.data.len() / self.track_type.sector_stride()) as u32
    }

    /// Number of tracks on the disc
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Track information by track number
    pub fn get_track(&self, number: u8) -> Option<&Track> {
        self.tracks.iter().find(|t| t.number == number)
    }

    /// User data of a sector, or None past the end of the image
    pub fn read_sector(&self, sector: u32) -> Option<&[u8]> {
        sector_data(&self.data, self.track_type, sector)
    }

    /// Game title from the system area of the first sector
    ///
    /// Prefers the overseas title and falls back to the domestic one.
    pub fn title(&self) -> Option<String> {
        let header = self.read_sector(0)?;

        [OVERSEAS_TITLE, DOMESTIC_TITLE]
            .into_iter()
            .map(|range| {
                header[range]
                    .iter()
                    .map(|&b| b as char)
                    .filter(|c| c.is_ascii_graphic() || *c == ' ')
                    .collect::<String>()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .find(|title| !title.is_empty())
    }
}

/// Slice the user data of `sector` out of the image bytes
fn sector_data(data: &[u8], track_type: TrackType, sector: u32) -> Option<&[u8]> {
    let offset = (sector as usize)
        .checked_mul(track_type.sector_stride())?
        .checked_add(track_type.data_offset())?;

    data.get(offset..offset.checked_add(SECTOR_SIZE)?)
}

impl SectorSource for DiscImage {
    fn next_sector(&mut self) -> &[u8; SECTOR_SIZE] {
        match sector_data(&self.data, self.track_type, self.position) {
            Some(data) => self.sector.copy_from_slice(data),
            None => {
                log::warn!("Disc: Read past end of image at sector {}", self.position);
                self.sector.fill(0);
            }
        }

        self.position = self.position.wrapping_add(1);
        &self.sector
    }
}
