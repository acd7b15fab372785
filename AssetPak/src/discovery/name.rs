//! Logical name derivation

use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::{clean_path, normalize_path};

/// Derive the public name of a file found during a walk.
///
/// * `joined` - the entry path built from the walked directory (absolute
///   when a prefix is in effect)
/// * `dir` - the directory argument exactly as the caller passed it
/// * `file_name` - the entry's own name
/// * `prefix` - absolute prefix to strip, if any
pub(crate) fn derive_name(
    joined: &Path,
    dir: &Path,
    file_name: &str,
    prefix: Option<&Path>,
) -> Result<String> {
    let name = match prefix {
        None => normalize_path(joined),
        Some(prefix) => {
            if let Ok(rest) = joined.strip_prefix(prefix) {
                normalize_path(rest)
            } else if dir.ends_with(file_name) {
                // The caller passed a file path as the directory.
                normalize_path(clean_path(dir))
            } else {
                normalize_path(clean_path(dir.join(file_name)))
            }
        }
    };

    let name = name.trim_start_matches('/');
    if name.is_empty() || name == "." {
        return Err(Error::InvalidFile {
            path: joined.to_path_buf(),
        });
    }
    Ok(name.to_string())
}
