// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

use tracing::debug;

use crate::error::MetadataError;

/// Program used to probe durations when no other is configured
pub const DEFAULT_FFPROBE: &str = "ffprobe";

/// Determines the playback duration of a file by running `ffprobe`
#[derive(Debug, Clone)]
pub struct FfprobeDuration {
    program: OsString,
}

impl FfprobeDuration {
    /// Use `ffprobe` from `PATH`
    pub fn new() -> Self {
        Self::with_program(DEFAULT_FFPROBE)
    }

    /// Use a specific ffprobe binary
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Probe the duration of a single file
    ///
    /// Fails if the program cannot be started, exits unsuccessfully, or prints
    /// something other than a non-negative number of seconds.
    pub fn probe(&self, path: &Path) -> Result<Duration, MetadataError> {
        debug!(program = %self.program_name(), path = %path.display(), "probing duration");

        let output = Command::new(&self.program)
            .args([
                "-v",
                "quiet",
                "-show_entries",
                "format=duration",
                "-of",
                "csv=p=0",
            ])
            .arg(path)
            .output()
            .map_err(|e| MetadataError::ProbeFailed {
                program: self.program_name(),
                path: path.to_path_buf(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(MetadataError::ProbeExited {
                program: self.program_name(),
                path: path.to_path_buf(),
                status: output.status,
            });
        }

        parse_probe_output(path, &String::from_utf8_lossy(&output.stdout))
    }
}

impl Default for FfprobeDuration {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the single floating-point seconds value printed by the probe
pub fn parse_probe_output(path: &Path, output: &str) -> Result<Duration, MetadataError> {
    let value = output.trim();
    if value.is_empty() {
        return Err(MetadataError::MissingDuration {
            path: path.to_path_buf(),
        });
    }

    let invalid = |reason: String| MetadataError::InvalidDuration {
        path: path.to_path_buf(),
        value: value.to_string(),
        reason,
    };

    let seconds: f64 = value.parse().map_err(|e| invalid(format!("{e}")))?;
    Duration::try_from_secs_f64(seconds).map_err(|e| invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(output: &str) -> Result<Duration, MetadataError> {
        parse_probe_output(Path::new("chapter01.mp3"), output)
    }

    #[test]
    fn parses_fractional_seconds() {
        assert_eq!(parse("3725.500000\n").unwrap(), Duration::from_millis(3_725_500));
    }

    #[test]
    fn parses_whole_seconds() {
        assert_eq!(parse("42").unwrap(), Duration::from_secs(42));
    }

    #[test]
    fn rejects_empty_output() {
        assert!(matches!(parse(""), Err(MetadataError::MissingDuration { .. })));
        assert!(matches!(parse(" \n"), Err(MetadataError::MissingDuration { .. })));
    }

    #[test]
    fn rejects_non_numeric_output() {
        assert!(matches!(
            parse("N/A"),
            Err(MetadataError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn rejects_negative_and_non_finite_values() {
        assert!(matches!(
            parse("-1.5"),
            Err(MetadataError::InvalidDuration { .. })
        ));
        assert!(matches!(
            parse("NaN"),
            Err(MetadataError::InvalidDuration { .. })
        ));
        assert!(matches!(
            parse("inf"),
            Err(MetadataError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn missing_program_is_a_probe_failure() {
        let probe = FfprobeDuration::with_program("dir2cast-no-such-ffprobe-binary");
        let result = probe.probe(Path::new("chapter01.mp3"));

        assert!(matches!(result, Err(MetadataError::ProbeFailed { .. })));
    }
}
