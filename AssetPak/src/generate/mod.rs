//! Code generation
//!
//! Renders a discovered [`AssetTable`] into a self-contained Rust source
//! file. The generated file declares:
//!
//! - `AssetInfo` with `name`, `size`, `mode`, `mod_time`, `is_dir` and, when
//!   names are hash-qualified, `original_name` and `hash`
//! - `fetch(name)`, returning a copy of the bytes (decompressed when the
//!   payloads are GZIP'd) or an `io::ErrorKind::NotFound` error
//! - `fetch_view(name)` when payloads are stored raw and copying was not
//!   forced; it returns the `&'static [u8]` baked into the binary
//! - `asset_names()`
//! - `resolve_name(original)` when names are hash-qualified
//! - `restore_asset(dir, name)` / `restore_assets(dir, name)` on request
//!
//! The file has no inner attributes so it can be pulled in with `include!`.

mod emit;
pub mod metadata;
pub mod table;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::{Config, Plan};
use crate::discovery::discover;
use crate::error::Result;

pub use metadata::{FileStat, MetadataSource};
pub use table::AssetTable;

/// Progress callback: `(current, total, asset name)`.
pub type ProgressCallback<'a> = &'a dyn Fn(usize, usize, &str);

/// Outcome of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Assets written to the table.
    pub assets: usize,
    /// Source bytes read.
    pub bytes_in: u64,
    /// Where the source was written.
    pub output: PathBuf,
}

/// Renders asset tables under one validated plan.
pub struct Generator<'a> {
    plan: &'a Plan,
}

impl<'a> Generator<'a> {
    pub fn new(plan: &'a Plan) -> Self {
        Self { plan }
    }

    /// Render the table to a string.
    ///
    /// # Errors
    /// Returns [`Error::AssetRead`] or [`Error::Compression`] naming the
    /// asset that failed.
    ///
    /// [`Error::AssetRead`]: crate::Error::AssetRead
    /// [`Error::Compression`]: crate::Error::Compression
    pub fn render(&self, table: &AssetTable) -> Result<String> {
        let mut out = Vec::new();
        self.write(table, &mut out, &|_, _, _| {})?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Render the table into `out`, returning the number of source bytes read.
    ///
    /// # Errors
    /// See [`Generator::render`]; also fails if `out` does.
    pub fn write<W: Write>(
        &self,
        table: &AssetTable,
        mut out: W,
        progress: ProgressCallback,
    ) -> Result<u64> {
        let plan = self.plan;

        emit::header(&mut out, plan, table)?;
        emit::asset_info(&mut out, plan)?;
        let bytes_in = emit::assets(&mut out, plan, table, progress)?;
        emit::lookup(&mut out, table)?;
        emit::accessors(&mut out, plan)?;
        if plan.asset_name {
            emit::hash_names(&mut out, table)?;
        }
        if plan.config.restore {
            emit::restore(&mut out, plan)?;
        }

        out.flush()?;
        Ok(bytes_in)
    }

    /// Render the table into a file, creating parent directories.
    ///
    /// # Errors
    /// See [`Generator::write`].
    pub fn write_to<P: AsRef<Path>>(
        &self,
        table: &AssetTable,
        output: P,
        progress: ProgressCallback,
    ) -> Result<u64> {
        let output = output.as_ref();
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let writer = BufWriter::new(File::create(output)?);
        let bytes_in = self.write(table, writer, progress)?;
        tracing::info!("Wrote {} assets to {:?}", table.len(), output);
        Ok(bytes_in)
    }
}

/// Validate `config`, discover its inputs and write the generated source
/// to `config.output`.
///
/// # Errors
/// Any configuration, discovery or generation error; nothing partial is
/// reported as success.
pub fn generate(config: &Config) -> Result<GenerateSummary> {
    generate_with_progress(config, &|_, _, _| {})
}

/// [`generate`] with a per-asset progress callback.
///
/// # Errors
/// See [`generate`].
pub fn generate_with_progress(config: &Config, progress: ProgressCallback) -> Result<GenerateSummary> {
    let plan = config.validate()?;
    let table: AssetTable = discover(&plan)?.into_iter().collect();

    let bytes_in = Generator::new(&plan).write_to(&table, &config.output, progress)?;

    Ok(GenerateSummary {
        assets: table.len(),
        bytes_in,
        output: config.output.clone(),
    })
}
