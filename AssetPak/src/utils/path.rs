//! Path utilities

use std::path::{Component, Path, PathBuf};

/// Normalize path separators to forward slashes (for asset names)
pub fn normalize_path<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().replace('\\', "/")
}

/// Lexically clean a path: drop `.` components, fold `..` into the
/// preceding normal component and collapse repeated separators.
///
/// The filesystem is never consulted, so symlinks are not resolved.
/// An empty result becomes `.`.
pub fn clean_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                // `..` directly under the root stays at the root
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Make a path absolute against the current directory and clean it.
///
/// # Errors
/// Returns an error if the current directory cannot be determined.
pub fn absolute<P: AsRef<Path>>(path: P) -> std::io::Result<PathBuf> {
    std::path::absolute(path.as_ref()).map(clean_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("./data//a.txt"), PathBuf::from("data/a.txt"));
        assert_eq!(clean_path("data/sub/../b.txt"), PathBuf::from("data/b.txt"));
        assert_eq!(clean_path("../x"), PathBuf::from("../x"));
        assert_eq!(clean_path("/../x"), PathBuf::from("/x"));
        assert_eq!(clean_path("."), PathBuf::from("."));
        assert_eq!(clean_path("a/.."), PathBuf::from("."));
    }

    #[test]
    fn test_absolute_is_clean() {
        let abs = absolute("data/./sub/..").unwrap();
        assert!(abs.is_absolute());
        assert!(abs.ends_with("data"));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(r"data\sub\b.txt"), "data/sub/b.txt");
    }
}
