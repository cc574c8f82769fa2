// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use chrono::{DateTime, FixedOffset, TimeDelta};

use crate::error::MetadataError;
use crate::feed::Episode;
use crate::metadata::{EpisodeMetadata, MetadataSource};

use super::location::PublicLocation;

/// Publication dates for one run: episode `n` is published `n - 1` seconds
/// after the anchor
///
/// The dates only exist so podcast clients keep the episodes in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PubDateLadder {
    anchor: DateTime<FixedOffset>,
}

impl PubDateLadder {
    pub fn new(anchor: DateTime<FixedOffset>) -> Self {
        Self { anchor }
    }

    pub fn anchor(&self) -> DateTime<FixedOffset> {
        self.anchor
    }

    /// Publication date of a 1-based episode number
    pub fn date_for(&self, episode_number: u32) -> DateTime<FixedOffset> {
        let offset = i64::from(episode_number.saturating_sub(1));
        self.anchor + TimeDelta::seconds(offset)
    }
}

/// Build the episode for one audio file
///
/// Combines extracted metadata with the file size, the public URL and the
/// position-derived publication date and episode number.
pub fn build_episode<S: MetadataSource + ?Sized>(
    source: &S,
    location: &PublicLocation,
    path: &Path,
    pub_date: DateTime<FixedOffset>,
    episode_number: u32,
) -> Result<Episode, MetadataError> {
    let file_size = std::fs::metadata(path)
        .map_err(|e| MetadataError::StatFailed {
            path: path.to_path_buf(),
            source: e,
        })?
        .len();

    let raw = source.extract(path)?;
    let metadata = EpisodeMetadata::resolve(raw, path);

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();

    Ok(Episode {
        title: metadata.title,
        description: metadata.description,
        file_path: path.to_path_buf(),
        duration: metadata.duration,
        file_size,
        pub_date,
        url: location.url_for(&filename),
        episode_number,
    })
}
