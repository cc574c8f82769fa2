// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ScanError;
use crate::media::{MediaKind, classify};

/// Files discovered in the input directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryListing {
    /// The scanned directory
    pub directory: PathBuf,
    /// Audio filenames (without path), sorted byte-lexicographically
    pub audio_files: Vec<String>,
    /// Filename of the cover art, if any supported image was found
    pub cover_art: Option<String>,
}

impl DirectoryListing {
    /// Full path of an audio file in this listing
    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.directory.join(filename)
    }

    pub fn is_empty(&self) -> bool {
        self.audio_files.is_empty()
    }
}

/// List the immediate entries of a directory and classify them
///
/// Subdirectories and unsupported extensions are ignored. The audio filenames
/// are sorted, which makes them the ordering authority for episode numbers and
/// publication dates. The cover art is the first supported image in the order
/// the filesystem lists entries, which is not stable across filesystems.
pub fn scan_directory(dir: &Path) -> Result<DirectoryListing, ScanError> {
    let entries = std::fs::read_dir(dir).map_err(|e| ScanError::ReadDirectoryFailed {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut audio_files = Vec::new();
    let mut cover_art = None;

    for entry in entries {
        let entry = entry.map_err(|e| ScanError::ReadEntryFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let file_type = entry.file_type().map_err(|e| ScanError::ReadEntryFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;
        if file_type.is_dir() {
            continue;
        }

        let path = entry.path();
        match classify(&path) {
            MediaKind::Audio => {
                let filename = entry
                    .file_name()
                    .into_string()
                    .map_err(|_| ScanError::InvalidFileName(path.clone()))?;
                audio_files.push(filename);
            }
            MediaKind::Image if cover_art.is_none() => match entry.file_name().into_string() {
                Ok(filename) => cover_art = Some(filename),
                Err(_) => debug!(path = %path.display(), "skipping image with non UTF-8 name"),
            },
            MediaKind::Image | MediaKind::Ignored => {
                debug!(path = %path.display(), "ignoring entry");
            }
        }
    }

    audio_files.sort();

    Ok(DirectoryListing {
        directory: dir.to_path_buf(),
        audio_files,
        cover_art,
    })
}
