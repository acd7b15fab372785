//! File metadata captured at generation time

use std::fs::Metadata;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Config;

/// Mode, modification time and size of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileStat {
    /// Permission bits (`0o7777` mask).
    pub mode: u32,
    /// Seconds relative to the Unix epoch; negative before it.
    pub mod_secs: i64,
    /// Sub-second part, always added forward in time.
    pub mod_nanos: u32,
    pub size: u64,
}

impl FileStat {
    /// Stat a file, following symlinks.
    ///
    /// # Errors
    /// Returns an error if the file cannot be stat'ed.
    pub fn read<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path.as_ref())?;
        let (mod_secs, mod_nanos) = meta.modified().map(split_time).unwrap_or((0, 0));
        Ok(Self {
            mode: permission_bits(&meta),
            mod_secs,
            mod_nanos,
            size: meta.len(),
        })
    }
}

#[cfg(unix)]
fn permission_bits(meta: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(meta: &Metadata) -> u32 {
    if meta.permissions().readonly() { 0o444 } else { 0o666 }
}

/// Split a timestamp into whole seconds and forward nanoseconds.
fn split_time(time: SystemTime) -> (i64, u32) {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => (after.as_secs() as i64, after.subsec_nanos()),
        Err(err) => {
            let before = err.duration();
            let nanos = before.subsec_nanos();
            if nanos == 0 {
                (-(before.as_secs() as i64), 0)
            } else {
                (-(before.as_secs() as i64) - 1, 1_000_000_000 - nanos)
            }
        }
    }
}

/// Where an asset's mode and modification time come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataSource {
    /// One configured value for every asset.
    Fixed,
    /// Captured from each file.
    PerFile,
    /// Not tracked; reported as zero / the epoch.
    Zero,
}

/// Resolve the mode policy for a configuration.
pub fn mode_source(config: &Config) -> MetadataSource {
    if config.mode > 0 {
        MetadataSource::Fixed
    } else if config.metadata {
        MetadataSource::PerFile
    } else {
        MetadataSource::Zero
    }
}

/// Resolve the modification-time policy for a configuration.
pub fn mod_time_source(config: &Config) -> MetadataSource {
    if config.mod_time > 0 {
        MetadataSource::Fixed
    } else if config.metadata {
        MetadataSource::PerFile
    } else {
        MetadataSource::Zero
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_split_time() {
        assert_eq!(split_time(UNIX_EPOCH + Duration::new(5, 7)), (5, 7));
        assert_eq!(split_time(UNIX_EPOCH - Duration::new(5, 0)), (-5, 0));
        assert_eq!(
            split_time(UNIX_EPOCH - Duration::new(5, 250_000_000)),
            (-6, 750_000_000)
        );
    }

    #[test]
    fn test_policies() {
        let fixed = Config {
            mode: 0o600,
            mod_time: 1_600_000_000,
            metadata: true,
            ..Config::default()
        };
        assert_eq!(mode_source(&fixed), MetadataSource::Fixed);
        assert_eq!(mod_time_source(&fixed), MetadataSource::Fixed);

        let captured = Config {
            metadata: true,
            ..Config::default()
        };
        assert_eq!(mode_source(&captured), MetadataSource::PerFile);
        assert_eq!(mod_time_source(&captured), MetadataSource::PerFile);

        assert_eq!(mode_source(&Config::default()), MetadataSource::Zero);
        assert_eq!(mod_time_source(&Config::default()), MetadataSource::Zero);
    }

    #[cfg(unix)]
    #[test]
    fn test_read_captures_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("run.sh");
        std::fs::write(&path, b"#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o751)).unwrap();

        let stat = FileStat::read(&path).unwrap();
        assert_eq!(stat.mode, 0o751);
        assert_eq!(stat.size, 10);
        assert!(stat.mod_secs > 0);
    }
}
