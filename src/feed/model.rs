// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use url::Url;

use crate::episode::format_duration;
use crate::media::audio_mime_type;

/// A podcast assembled from one directory
#[derive(Debug, Clone)]
pub struct Podcast {
    pub title: String,
    pub description: String,
    /// Ordered by filename, publication date and episode number alike
    pub episodes: Vec<Episode>,
    pub cover_art_url: Option<Url>,
}

impl Podcast {
    /// Assemble a podcast from already built episodes
    ///
    /// The title is the directory's base name and the description is derived
    /// from it.
    pub fn assemble(
        title: impl Into<String>,
        episodes: Vec<Episode>,
        cover_art_url: Option<Url>,
    ) -> Self {
        let title = title.into();
        let description = format!("Audiobook podcast for {title}");

        Self {
            title,
            description,
            episodes,
            cover_art_url,
        }
    }
}

/// A single episode, built from one audio file
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    pub title: String,
    pub description: String,
    pub file_path: PathBuf,
    /// Zero when the length is unknown
    pub duration: Duration,
    pub file_size: u64,
    pub pub_date: DateTime<FixedOffset>,
    pub url: Url,
    /// 1-based position in the sorted file list
    pub episode_number: u32,
}

impl Episode {
    /// MIME type announced in the enclosure
    pub fn mime_type(&self) -> &'static str {
        audio_mime_type(&self.file_path)
    }

    /// The enclosure URL doubles as the episode's GUID
    pub fn guid(&self) -> &str {
        self.url.as_str()
    }

    /// Display form of the duration, `None` when it is zero
    pub fn display_duration(&self) -> Option<String> {
        (!self.duration.is_zero()).then(|| format_duration(self.duration))
    }
}
