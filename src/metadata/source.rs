// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use crate::error::MetadataError;

use super::probe::FfprobeDuration;
use super::tags::read_tags;

/// Unresolved metadata of one audio file
///
/// `title` and `comment` are empty when the file carries no such tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMetadata {
    pub title: String,
    pub comment: String,
    pub duration: Duration,
}

/// Metadata extraction abstraction for testability
pub trait MetadataSource {
    /// Read tags and duration of a single audio file
    fn extract(&self, path: &Path) -> Result<RawMetadata, MetadataError>;
}

/// Default metadata source: embedded tags via id3 and symphonia, duration via ffprobe
#[derive(Debug, Clone, Default)]
pub struct SystemMetadataSource {
    probe: FfprobeDuration,
}

impl SystemMetadataSource {
    /// Create a source that runs `ffprobe` from `PATH`
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source with a custom ffprobe binary
    pub fn with_ffprobe(program: impl Into<OsString>) -> Self {
        Self {
            probe: FfprobeDuration::with_program(program),
        }
    }
}

impl MetadataSource for SystemMetadataSource {
    fn extract(&self, path: &Path) -> Result<RawMetadata, MetadataError> {
        let tags = read_tags(path)?;
        let duration = self.probe.probe(path)?;

        Ok(RawMetadata {
            title: tags.title,
            comment: tags.comment,
            duration,
        })
    }
}
