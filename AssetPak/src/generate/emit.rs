//! Rust source emission
//!
//! Each function writes one section of the generated file. Which sections
//! and struct fields appear is decided from the [`Plan`] flags; there is no
//! template language in between.

use std::io::{self, Write};

use crate::config::Plan;
use crate::encode::{escape, escape_gzip};
use crate::error::{Error, Result};

use super::metadata::{FileStat, MetadataSource, mod_time_source, mode_source};
use super::table::AssetTable;

/// Struct fields are indented two levels inside the `ASSETS` array.
const FIELD_INDENT: &str = "        ";

pub(super) fn header<W: Write>(out: &mut W, plan: &Plan, table: &AssetTable) -> io::Result<()> {
    writeln!(out, "// Code generated by assetpak {}. DO NOT EDIT.", crate::VERSION)?;
    if plan.config.compress {
        writeln!(out, "// Compressed payloads: the including crate must depend on `flate2`.")?;
    }
    writeln!(out, "// sources:")?;
    for asset in table.iter() {
        writeln!(out, "// {}", asset.name)?;
    }
    writeln!(out)
}

pub(super) fn asset_info<W: Write>(out: &mut W, plan: &Plan) -> io::Result<()> {
    let config = &plan.config;

    writeln!(out, "/// Metadata for one embedded asset.")?;
    writeln!(out, "#[derive(Debug)]")?;
    writeln!(out, "pub struct AssetInfo {{")?;
    writeln!(out, "    name: &'static str,")?;
    if plan.asset_name {
        writeln!(out, "    original_name: &'static str,")?;
    }
    writeln!(out, "    data: &'static [u8],")?;
    if config.compress {
        writeln!(out, "    size: u64,")?;
    }
    if plan.emit_mode {
        writeln!(out, "    mode: u32,")?;
    }
    if plan.emit_mod_time {
        writeln!(out, "    mod_time: (i64, u32),")?;
    }
    if config.hash_format.is_enabled() {
        writeln!(out, "    hash: &'static [u8],")?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "impl AssetInfo {{")?;
    writeln!(out, "    /// Base name of the asset.")?;
    writeln!(out, "    pub fn name(&self) -> &'static str {{")?;
    writeln!(out, "        self.name")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    /// Size of the decoded contents in bytes.")?;
    writeln!(out, "    pub fn size(&self) -> u64 {{")?;
    if config.compress {
        writeln!(out, "        self.size")?;
    } else {
        writeln!(out, "        self.data.len() as u64")?;
    }
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    /// Permission bits.")?;
    writeln!(out, "    pub fn mode(&self) -> u32 {{")?;
    match mode_source(config) {
        MetadataSource::Fixed => writeln!(out, "        0o{:04o}", config.mode)?,
        MetadataSource::PerFile => writeln!(out, "        self.mode")?,
        MetadataSource::Zero => writeln!(out, "        0")?,
    }
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    /// Modification time.")?;
    writeln!(out, "    pub fn mod_time(&self) -> std::time::SystemTime {{")?;
    match mod_time_source(config) {
        MetadataSource::Fixed => writeln!(out, "        unix_time({}, 0)", config.mod_time)?,
        MetadataSource::PerFile => {
            writeln!(out, "        unix_time(self.mod_time.0, self.mod_time.1)")?;
        }
        MetadataSource::Zero => writeln!(out, "        std::time::UNIX_EPOCH")?,
    }
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    /// Always false: only files are embedded.")?;
    writeln!(out, "    pub fn is_dir(&self) -> bool {{")?;
    writeln!(out, "        false")?;
    writeln!(out, "    }}")?;

    if config.hash_format.is_enabled() {
        writeln!(out)?;
        writeln!(out, "    /// Name the asset had before hash qualification.")?;
        writeln!(out, "    pub fn original_name(&self) -> &'static str {{")?;
        writeln!(out, "        self.original_name")?;
        writeln!(out, "    }}")?;
        writeln!(out)?;
        writeln!(out, "    /// Content digest.")?;
        writeln!(out, "    pub fn hash(&self) -> &'static [u8] {{")?;
        writeln!(out, "        self.hash")?;
        writeln!(out, "    }}")?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;

    if mod_time_source(config) != MetadataSource::Zero {
        writeln!(out, "fn unix_time(secs: i64, nanos: u32) -> std::time::SystemTime {{")?;
        writeln!(out, "    let whole = std::time::Duration::from_secs(secs.unsigned_abs());")?;
        writeln!(out, "    let base = if secs < 0 {{")?;
        writeln!(out, "        std::time::UNIX_EPOCH - whole")?;
        writeln!(out, "    }} else {{")?;
        writeln!(out, "        std::time::UNIX_EPOCH + whole")?;
        writeln!(out, "    }};")?;
        writeln!(out, "    base + std::time::Duration::from_nanos(u64::from(nanos))")?;
        writeln!(out, "}}")?;
        writeln!(out)?;
    }

    Ok(())
}

/// Emit the `ASSETS` array, reading every source file.
///
/// `progress` is called once per asset with its position and name.
pub(super) fn assets<W: Write>(
    out: &mut W,
    plan: &Plan,
    table: &AssetTable,
    progress: &dyn Fn(usize, usize, &str),
) -> Result<u64> {
    let config = &plan.config;
    let total = table.len();
    let mut bytes_in = 0u64;

    writeln!(out, "static ASSETS: [AssetInfo; {total}] = [")?;

    for (i, asset) in table.iter().enumerate() {
        progress(i + 1, total, &asset.name);

        let data = std::fs::read(&asset.path).map_err(|source| Error::AssetRead {
            name: asset.name.clone(),
            source,
        })?;
        bytes_in += data.len() as u64;

        let payload = if config.compress {
            escape_gzip(&data, config.compression_level, &config.indent, config.wrap_width)
                .map_err(|source| Error::Compression {
                    name: asset.name.clone(),
                    source,
                })?
        } else {
            escape(&data, &config.indent, config.wrap_width)
        };

        let base_name = asset.name.rsplit('/').next().unwrap_or(&asset.name);

        writeln!(out, "    AssetInfo {{")?;
        writeln!(out, "{FIELD_INDENT}name: {base_name:?},")?;
        if plan.asset_name {
            let original = asset.original_name.as_deref().unwrap_or(&asset.name);
            writeln!(out, "{FIELD_INDENT}original_name: {original:?},")?;
        }
        writeln!(out, "{FIELD_INDENT}data: b\"\\\n{}{payload}\",", config.indent)?;
        if config.compress {
            writeln!(out, "{FIELD_INDENT}size: {},", data.len())?;
        }

        if plan.emit_mode || plan.emit_mod_time {
            let stat = FileStat::read(&asset.path).map_err(|source| Error::AssetRead {
                name: asset.name.clone(),
                source,
            })?;
            if plan.emit_mode {
                writeln!(out, "{FIELD_INDENT}mode: 0o{:04o},", stat.mode)?;
            }
            if plan.emit_mod_time {
                writeln!(
                    out,
                    "{FIELD_INDENT}mod_time: ({}, {}),",
                    stat.mod_secs, stat.mod_nanos
                )?;
            }
        }

        if config.hash_format.is_enabled() {
            let hash = asset.hash.as_deref().unwrap_or_default();
            let encoded = escape(hash, &config.indent, config.wrap_width);
            writeln!(out, "{FIELD_INDENT}hash: b\"\\\n{}{encoded}\",", config.indent)?;
        }
        writeln!(out, "    }},")?;
    }

    writeln!(out, "];")?;
    writeln!(out)?;
    Ok(bytes_in)
}

pub(super) fn lookup<W: Write>(out: &mut W, table: &AssetTable) -> io::Result<()> {
    let mut index: Vec<(&str, usize)> = table
        .iter()
        .enumerate()
        .map(|(i, asset)| (asset.name.as_str(), i))
        .collect();
    index.sort_unstable_by(|a, b| a.0.cmp(b.0));

    writeln!(out, "/// Asset names in byte order, with their slot in `ASSETS`.")?;
    writeln!(out, "static INDEX: [(&str, usize); {}] = [", index.len())?;
    for (name, slot) in &index {
        writeln!(out, "    ({name:?}, {slot}),")?;
    }
    writeln!(out, "];")?;
    writeln!(out)?;

    writeln!(out, "fn lookup(name: &str) -> Option<&'static AssetInfo> {{")?;
    writeln!(out, "    let name = name.replace('\\\\', \"/\");")?;
    writeln!(out, "    INDEX")?;
    writeln!(out, "        .binary_search_by(|(key, _)| (*key).cmp(name.as_str()))")?;
    writeln!(out, "        .ok()")?;
    writeln!(out, "        .map(|found| &ASSETS[INDEX[found].1])")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "fn not_found(name: &str) -> std::io::Error {{")?;
    writeln!(out, "    std::io::Error::new(")?;
    writeln!(out, "        std::io::ErrorKind::NotFound,")?;
    writeln!(out, "        format!(\"open {{name}}: asset does not exist\"),")?;
    writeln!(out, "    )")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "/// Names of all embedded assets, in byte order.")?;
    writeln!(out, "pub fn asset_names() -> impl Iterator<Item = &'static str> {{")?;
    writeln!(out, "    INDEX.iter().map(|(name, _)| *name)")?;
    writeln!(out, "}}")?;
    writeln!(out)
}

pub(super) fn accessors<W: Write>(out: &mut W, plan: &Plan) -> io::Result<()> {
    writeln!(out, "/// Returns a copy of the named asset's contents and its metadata.")?;
    writeln!(out, "///")?;
    writeln!(out, "/// Backslashes in `name` are treated as forward slashes.")?;
    writeln!(out, "pub fn fetch(name: &str) -> std::io::Result<(Vec<u8>, &'static AssetInfo)> {{")?;
    writeln!(out, "    let info = lookup(name).ok_or_else(|| not_found(name))?;")?;
    if plan.config.compress {
        writeln!(out, "    let mut data = Vec::with_capacity(usize::try_from(info.size).unwrap_or(0));")?;
        writeln!(out, "    std::io::Read::read_to_end(&mut flate2::read::GzDecoder::new(info.data), &mut data)")?;
        writeln!(out, "        .map_err(|err| std::io::Error::new(err.kind(), format!(\"read {{name:?}}: {{err}}\")))?;")?;
        writeln!(out, "    Ok((data, info))")?;
    } else {
        writeln!(out, "    Ok((info.data.to_vec(), info))")?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;

    if plan.view_read {
        writeln!(out, "/// Borrows the named asset's contents without copying.")?;
        writeln!(out, "///")?;
        writeln!(out, "/// The slice points into read-only storage compiled into the binary.")?;
        writeln!(out, "pub fn fetch_view(name: &str) -> std::io::Result<(&'static [u8], &'static AssetInfo)> {{")?;
        writeln!(out, "    let info = lookup(name).ok_or_else(|| not_found(name))?;")?;
        writeln!(out, "    Ok((info.data, info))")?;
        writeln!(out, "}}")?;
        writeln!(out)?;
    }

    Ok(())
}

pub(super) fn hash_names<W: Write>(out: &mut W, table: &AssetTable) -> io::Result<()> {
    let mut names: Vec<(&str, &str)> = table.hash_names().collect();
    names.sort_unstable_by(|a, b| a.0.cmp(b.0));

    writeln!(out, "/// Original names in byte order, with their hash-qualified names.")?;
    writeln!(out, "static HASH_NAMES: [(&str, &str); {}] = [", names.len())?;
    for (original, hashed) in &names {
        writeln!(out, "    ({original:?}, {hashed:?}),")?;
    }
    writeln!(out, "];")?;
    writeln!(out)?;

    writeln!(out, "/// Returns the hash-qualified name for an original asset name.")?;
    writeln!(out, "pub fn resolve_name(name: &str) -> std::io::Result<&'static str> {{")?;
    writeln!(out, "    let key = name.replace('\\\\', \"/\");")?;
    writeln!(out, "    HASH_NAMES")?;
    writeln!(out, "        .binary_search_by(|(original, _)| (*original).cmp(key.as_str()))")?;
    writeln!(out, "        .map(|found| HASH_NAMES[found].1)")?;
    writeln!(out, "        .map_err(|_| not_found(name))")?;
    writeln!(out, "}}")?;
    writeln!(out)
}

pub(super) fn restore<W: Write>(out: &mut W, plan: &Plan) -> io::Result<()> {
    let config = &plan.config;
    let set_mode = mode_source(config) != MetadataSource::Zero;
    let set_time = mod_time_source(config) != MetadataSource::Zero;

    writeln!(out, "/// Writes the named asset below `dir`, creating parent directories.")?;
    writeln!(out, "pub fn restore_asset(dir: &std::path::Path, name: &str) -> std::io::Result<()> {{")?;
    if set_mode || set_time {
        writeln!(out, "    let (data, info) = fetch(name)?;")?;
    } else {
        writeln!(out, "    let (data, _) = fetch(name)?;")?;
    }
    writeln!(out, "    let path = dir.join(name.replace('\\\\', \"/\"));")?;
    writeln!(out, "    if let Some(parent) = path.parent() {{")?;
    writeln!(out, "        std::fs::create_dir_all(parent)?;")?;
    writeln!(out, "    }}")?;
    writeln!(out, "    std::fs::write(&path, &data)?;")?;
    // The timestamp goes first: a read-only mode would refuse the open.
    if set_time {
        writeln!(out, "    std::fs::File::options()")?;
        writeln!(out, "        .write(true)")?;
        writeln!(out, "        .open(&path)?")?;
        writeln!(out, "        .set_modified(info.mod_time())?;")?;
    }
    if set_mode {
        writeln!(out, "    set_mode(&path, info.mode())?;")?;
    }
    writeln!(out, "    Ok(())")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "/// Restores every asset at or below `name`; an empty `name` restores all.")?;
    writeln!(out, "pub fn restore_assets(dir: &std::path::Path, name: &str) -> std::io::Result<()> {{")?;
    writeln!(out, "    let name = name.replace('\\\\', \"/\");")?;
    writeln!(out, "    let root = name.trim_end_matches('/');")?;
    writeln!(out, "    let mut found = false;")?;
    writeln!(out, "    for asset in asset_names() {{")?;
    writeln!(out, "        let inside = root.is_empty()")?;
    writeln!(out, "            || asset == root")?;
    writeln!(out, "            || asset.strip_prefix(root).is_some_and(|rest| rest.starts_with('/'));")?;
    writeln!(out, "        if inside {{")?;
    writeln!(out, "            restore_asset(dir, asset)?;")?;
    writeln!(out, "            found = true;")?;
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out, "    if found {{ Ok(()) }} else {{ Err(not_found(&name)) }}")?;
    writeln!(out, "}}")?;

    if set_mode {
        writeln!(out)?;
        writeln!(out, "#[cfg(unix)]")?;
        writeln!(out, "fn set_mode(path: &std::path::Path, mode: u32) -> std::io::Result<()> {{")?;
        writeln!(out, "    use std::os::unix::fs::PermissionsExt;")?;
        writeln!(out, "    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))")?;
        writeln!(out, "}}")?;
        writeln!(out)?;
        writeln!(out, "#[cfg(not(unix))]")?;
        writeln!(out, "fn set_mode(_path: &std::path::Path, _mode: u32) -> std::io::Result<()> {{")?;
        writeln!(out, "    Ok(())")?;
        writeln!(out, "}}")?;
    }

    Ok(())
}
