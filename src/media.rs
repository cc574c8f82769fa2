// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

/// How the scanner treats a directory entry, based on its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Image,
    Ignored,
}

/// MIME type used when an extension is not in the lookup table
pub const DEFAULT_AUDIO_MIME_TYPE: &str = "audio/mpeg";

/// Lowercased extension of a path, if it has one that is valid UTF-8
fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Check if a (lowercase) extension is a supported audio format
fn is_audio_extension(ext: &str) -> bool {
    matches!(ext, "mp3" | "m4a" | "m4b" | "aac" | "flac" | "ogg")
}

/// Check if a (lowercase) extension is a supported cover art format
fn is_image_extension(ext: &str) -> bool {
    matches!(ext, "jpg" | "jpeg" | "png")
}

/// Classify a file by its extension (case-insensitive)
pub fn classify(path: &Path) -> MediaKind {
    match lowercase_extension(path) {
        Some(ext) if is_audio_extension(&ext) => MediaKind::Audio,
        Some(ext) if is_image_extension(&ext) => MediaKind::Image,
        _ => MediaKind::Ignored,
    }
}

/// Map an audio file's extension to the MIME type announced in the enclosure
///
/// Unknown extensions fall back to `audio/mpeg`.
pub fn audio_mime_type(path: &Path) -> &'static str {
    match lowercase_extension(path).as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("m4a" | "m4b") => "audio/mp4",
        Some("aac") => "audio/aac",
        Some("flac") => "audio/flac",
        Some("ogg") => "audio/ogg",
        _ => DEFAULT_AUDIO_MIME_TYPE,
    }
}
