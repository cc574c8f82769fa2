// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

use crate::error::UsageError;

/// Bytes escaped inside one path segment
///
/// Everything except unreserved characters and the sub-delimiters
/// `$ & + : = @` is escaped, so `/`, `%`, brackets, parentheses and quotes
/// never reach the URL raw.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b':')
    .remove(b'=')
    .remove(b'@');

/// Where the scanned directory will be reachable once it is hosted
///
/// Public URLs are `<base>/<directory>/<filename>`, with the directory name
/// and the filename percent-encoded as independent path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicLocation {
    base_url: Url,
    directory_name: String,
}

impl PublicLocation {
    /// Parse the base URL and pair it with the directory's base name
    pub fn new(base_url: &str, directory_name: impl Into<String>) -> Result<Self, UsageError> {
        let parsed = Url::parse(base_url).map_err(|e| UsageError::InvalidBaseUrl {
            url: base_url.to_string(),
            source: e,
        })?;

        if parsed.cannot_be_a_base() {
            return Err(UsageError::CannotBeABase(base_url.to_string()));
        }

        Ok(Self {
            base_url: parsed,
            directory_name: directory_name.into(),
        })
    }

    pub fn directory_name(&self) -> &str {
        &self.directory_name
    }

    /// Public URL of a file inside the directory
    pub fn url_for(&self, filename: &str) -> Url {
        let mut url = self.base_url.clone();
        let base_path = url.path().strip_suffix('/').unwrap_or(url.path());
        let path = format!(
            "{base_path}/{}/{}",
            utf8_percent_encode(&self.directory_name, PATH_SEGMENT),
            utf8_percent_encode(filename, PATH_SEGMENT)
        );
        // already escaped, so set_path keeps every `%` as it is
        url.set_path(&path);
        url
    }
}
