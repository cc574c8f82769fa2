// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fs::File;
use std::path::Path;

use id3::TagLike;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::{MetadataOptions, MetadataRevision, StandardTagKey};
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::error::MetadataError;

/// Title and comment read from a file's embedded tags
///
/// Missing tags are represented by empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddedTags {
    pub title: String,
    pub comment: String,
}

impl EmbeddedTags {
    /// Fill still-empty fields from a metadata revision
    fn merge(&mut self, revision: &MetadataRevision) {
        for tag in revision.tags() {
            let slot = match tag.std_key {
                Some(StandardTagKey::TrackTitle) => &mut self.title,
                Some(StandardTagKey::Comment) => &mut self.comment,
                _ => continue,
            };

            if slot.is_empty() {
                *slot = clean_tag_value(&tag.value.to_string());
            }
        }
    }

    /// Fill still-empty fields from an ID3v2 tag
    ///
    /// The first comment frame counts. Its content description names the
    /// comment when set (`iTunPGAP`, `iTunNORM`), otherwise its text is used.
    fn merge_id3v2(&mut self, tag: &id3::Tag) {
        if self.title.is_empty()
            && let Some(title) = tag.title()
        {
            self.title = clean_tag_value(title);
        }

        if self.comment.is_empty()
            && let Some(comment) = tag.comments().next()
        {
            let description = clean_tag_value(&comment.description);
            self.comment = if description.is_empty() {
                clean_tag_value(&comment.text)
            } else {
                description
            };
        }
    }
}

fn clean_tag_value(value: &str) -> String {
    value
        .trim_matches(|c: char| c.is_whitespace() || c == '\0')
        .to_string()
}

/// ID3v2 tag at the start of a file, if one can be read
fn read_id3v2(path: &Path) -> Option<id3::Tag> {
    match id3::Tag::read_from_path(path) {
        Ok(tag) => Some(tag),
        Err(e) => {
            if !matches!(e.kind, id3::ErrorKind::NoTag) {
                debug!(path = %path.display(), error = %e, "unreadable ID3v2 tag");
            }
            e.partial_tag
        }
    }
}

/// Read the embedded title and comment tags of an audio file
///
/// Tags found ahead of the container (ID3v2 on MP3) take precedence over
/// tags stored inside it. A file whose container cannot be recognized fails,
/// a recognized file without tags yields empty fields.
pub fn read_tags(path: &Path) -> Result<EmbeddedTags, MetadataError> {
    let file = File::open(path).map_err(|e| MetadataError::OpenFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    let id3v2 = read_id3v2(path);
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let mut probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| MetadataError::TagsUnreadable {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut tags = EmbeddedTags::default();

    // symphonia's own ID3v2 reader drops comment descriptions
    if let Some(id3v2) = &id3v2 {
        tags.merge_id3v2(id3v2);
    } else if let Some(metadata) = probed.metadata.get()
        && let Some(revision) = metadata.current()
    {
        tags.merge(revision);
    }

    if let Some(revision) = probed.format.metadata().current() {
        tags.merge(revision);
    }

    debug!(path = %path.display(), title = %tags.title, comment = %tags.comment, "read tags");

    Ok(tags)
}
