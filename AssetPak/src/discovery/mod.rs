//! Asset discovery
//!
//! Walks the configured input roots depth-first and builds the ordered
//! table of [`Asset`] descriptors the generator renders. Directory entries
//! are visited in byte-wise name order so repeated runs over the same tree
//! produce the same table.
//!
//! Symlinks are followed through their own path, so a linked file is named
//! after the link. Every directory entered and every link target followed
//! is recorded in a per-input visited set; a link pointing at something
//! already visited (itself, an ancestor, a directory seen through another
//! link) is skipped, which keeps cyclic trees finite.

mod name;

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Plan;
use crate::error::{Error, Result};
use crate::hash::{encode_hash, hash_file, qualify_name};
use crate::utils::{absolute, clean_path};

use name::derive_name;

/// One file to embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Absolute path of the source bytes.
    pub path: PathBuf,
    /// Lookup key in the generated table (hash-qualified when hashing is on).
    pub name: String,
    /// Name before hash qualification; `None` when hashing is off.
    pub original_name: Option<String>,
    /// Content digest; `None` when hashing is off.
    pub hash: Option<Vec<u8>>,
}

/// State shared by one recursive walk.
struct TraversalContext<'a> {
    plan: &'a Plan,
    visited: HashSet<PathBuf>,
}

impl<'a> TraversalContext<'a> {
    fn new(plan: &'a Plan) -> Self {
        Self {
            plan,
            visited: HashSet::new(),
        }
    }

    /// Record a path in both lexical and canonical form.
    fn mark(&mut self, path: &Path) {
        if let Ok(canonical) = fs::canonicalize(path) {
            self.visited.insert(canonical);
        }
        self.visited.insert(path.to_path_buf());
    }

    /// Whether a link leads somewhere already entered, judged by its
    /// lexical target and by the fully resolved link path.
    fn seen(&self, link: &Path, target: &Path) -> bool {
        self.visited.contains(target)
            || fs::canonicalize(link).is_ok_and(|canonical| self.visited.contains(&canonical))
    }
}

/// A directory entry as listed, before any symlink is followed.
struct Entry {
    name: OsString,
    is_dir: bool,
    is_symlink: bool,
}

/// Discover every asset named by the plan's inputs, in input order.
///
/// # Errors
/// Returns [`Error::Fs`] on the first failing filesystem call and
/// [`Error::InvalidFile`] if a file would get an empty name.
pub fn discover(plan: &Plan) -> Result<Vec<Asset>> {
    let mut toc = Vec::new();

    for input in &plan.config.inputs {
        tracing::info!("Scanning {:?} (recursive: {})", input.path, input.recursive);

        let prefix = input.prefix.as_ref().or(plan.config.prefix.as_ref());
        let before = toc.len();
        find_files_into(plan, &input.path, prefix.map(PathBuf::as_path), input.recursive, &mut toc)?;

        tracing::debug!("{:?} contributed {} assets", input.path, toc.len() - before);
    }

    tracing::info!("Found {} assets", toc.len());
    Ok(toc)
}

/// Walk a single root with a fresh visited set.
///
/// # Errors
/// See [`discover`].
pub fn find_files(
    plan: &Plan,
    dir: &Path,
    prefix: Option<&Path>,
    recursive: bool,
) -> Result<Vec<Asset>> {
    let mut toc = Vec::new();
    find_files_into(plan, dir, prefix, recursive, &mut toc)?;
    Ok(toc)
}

fn find_files_into(
    plan: &Plan,
    dir: &Path,
    prefix: Option<&Path>,
    recursive: bool,
    toc: &mut Vec<Asset>,
) -> Result<()> {
    let prefix = prefix
        .map(|p| absolute(p).map_err(|e| Error::fs("stat", p, e)))
        .transpose()?;

    let mut ctx = TraversalContext::new(plan);
    walk(&mut ctx, dir, prefix.as_deref(), recursive, toc)
}

fn walk(
    ctx: &mut TraversalContext<'_>,
    dir: &Path,
    prefix: Option<&Path>,
    recursive: bool,
    toc: &mut Vec<Asset>,
) -> Result<()> {
    let dir_abs = absolute(dir).map_err(|e| Error::fs("stat", dir, e))?;
    // Entry paths are absolute only when a prefix has to be matched against them.
    let root = if prefix.is_some() {
        dir_abs.clone()
    } else {
        clean_path(dir)
    };

    let meta = fs::metadata(&root).map_err(|e| Error::fs("stat", &root, e))?;

    let (dirpath, list) = if meta.is_dir() {
        ctx.mark(&dir_abs);
        let list = read_sorted(&root)?;
        (root, list)
    } else {
        let Some(file_name) = root.file_name() else {
            return Err(Error::InvalidFile { path: root });
        };
        let entry = Entry {
            name: file_name.to_os_string(),
            is_dir: false,
            is_symlink: false,
        };
        let parent = root
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        (parent, vec![entry])
    };

    for entry in list {
        let joined = clean_path(dirpath.join(&entry.name));

        if ctx.plan.ignore.is_ignored(&joined) {
            tracing::debug!("Ignoring {:?}", joined);
            continue;
        }

        if entry.is_dir {
            if !recursive {
                continue;
            }
            let abs = absolute(&joined).map_err(|e| Error::fs("stat", &joined, e))?;
            ctx.mark(&abs);
            walk(ctx, &dir.join(&entry.name), prefix, recursive, toc)?;
            continue;
        }

        if entry.is_symlink {
            follow_link(ctx, &joined, prefix, recursive, toc)?;
            continue;
        }

        let file_name = entry.name.to_string_lossy();
        let name = derive_name(&joined, dir, &file_name, prefix)?;
        let path = absolute(&joined).map_err(|e| Error::fs("stat", &joined, e))?;
        toc.push(make_asset(ctx.plan, path, name)?);
    }

    Ok(())
}

/// Recurse into a symlink through its own path unless its target was visited.
fn follow_link(
    ctx: &mut TraversalContext<'_>,
    link: &Path,
    prefix: Option<&Path>,
    recursive: bool,
    toc: &mut Vec<Asset>,
) -> Result<()> {
    let link_abs = absolute(link).map_err(|e| Error::fs("stat", link, e))?;
    let target = resolve_link(&link_abs)?;

    if target == link_abs || ctx.seen(&link_abs, &target) {
        tracing::debug!("Skipping {:?}: {:?} already visited", link, target);
        return Ok(());
    }

    let meta = fs::metadata(link).map_err(|e| Error::fs("stat", link, e))?;
    if meta.is_dir() && !recursive {
        return Ok(());
    }

    ctx.mark(&target);
    if let Ok(canonical) = fs::canonicalize(&link_abs) {
        ctx.visited.insert(canonical);
    }
    tracing::debug!("Following {:?} -> {:?}", link, target);
    walk(ctx, link, prefix, recursive, toc)
}

/// Absolute, lexically cleaned target of a symlink.
fn resolve_link(link_abs: &Path) -> Result<PathBuf> {
    let target = fs::read_link(link_abs).map_err(|e| Error::fs("readlink", link_abs, e))?;
    if target.is_absolute() {
        return Ok(clean_path(target));
    }
    let base = link_abs.parent().unwrap_or(link_abs);
    Ok(clean_path(base.join(target)))
}

/// List a directory sorted by name. The handle is closed before returning.
fn read_sorted(dir: &Path) -> Result<Vec<Entry>> {
    let mut list = Vec::new();

    for entry in fs::read_dir(dir).map_err(|e| Error::fs("open", dir, e))? {
        let entry = entry.map_err(|e| Error::fs("readdir", dir, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| Error::fs("stat", entry.path(), e))?;
        list.push(Entry {
            name: entry.file_name(),
            is_dir: file_type.is_dir(),
            is_symlink: file_type.is_symlink(),
        });
    }

    list.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(list)
}

fn make_asset(plan: &Plan, path: PathBuf, name: String) -> Result<Asset> {
    let format = plan.config.hash_format;
    if !format.is_enabled() {
        return Ok(Asset {
            path,
            name,
            original_name: None,
            hash: None,
        });
    }

    let hash = hash_file(&path).map_err(|e| Error::fs("open", &path, e))?;
    let encoded = encode_hash(&hash, plan.config.hash_encoding, plan.config.hash_length);
    let hashed = qualify_name(&name, &encoded, format);
    tracing::trace!("Hashed {} -> {}", name, hashed);

    Ok(Asset {
        path,
        name: hashed,
        original_name: Some(name),
        hash: Some(hash),
    })
}
