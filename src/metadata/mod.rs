// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod probe;
mod resolve;
mod source;
mod tags;

pub use probe::{DEFAULT_FFPROBE, FfprobeDuration, parse_probe_output};
pub use resolve::{
    EpisodeMetadata, GAPLESS_PLACEHOLDER_COMMENT, resolve_description, resolve_title,
};
pub use source::{MetadataSource, RawMetadata, SystemMetadataSource};
pub use tags::{EmbeddedTags, read_tags};
