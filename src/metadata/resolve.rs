// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;
use std::time::Duration;

use super::source::RawMetadata;

/// Comment some encoders write to mark gapless playback data
pub const GAPLESS_PLACEHOLDER_COMMENT: &str = "iTunPGAP";

/// Title, description and duration of an episode, after fallbacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeMetadata {
    pub title: String,
    pub description: String,
    pub duration: Duration,
}

impl EpisodeMetadata {
    /// Apply the title and description fallbacks to raw metadata
    pub fn resolve(raw: RawMetadata, path: &Path) -> Self {
        let title = resolve_title(&raw.title, path);
        let description = resolve_description(&raw.comment, &title);

        Self {
            title,
            description,
            duration: raw.duration,
        }
    }
}

/// The trimmed tag title, or the filename without its extension
pub fn resolve_title(tag_title: &str, path: &Path) -> String {
    let title = tag_title.trim();
    if !title.is_empty() {
        return title.to_string();
    }

    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The trimmed tag comment, or the title when the comment is empty or a placeholder
pub fn resolve_description(comment: &str, title: &str) -> String {
    let comment = comment.trim();
    if comment.is_empty() || comment == GAPLESS_PLACEHOLDER_COMMENT {
        title.to_string()
    } else {
        comment.to_string()
    }
}
