//! # AssetPak
//!
//! Embeds a directory tree into a Rust program as generated source with a
//! runtime lookup API.
//!
//! ## Quick Start
//!
//! ### From a build script
//!
//! ```no_run
//! use assetpak::config::{Config, InputConfig};
//!
//! let out_dir = std::env::var("OUT_DIR").unwrap_or_else(|_| ".".into());
//! let config = Config {
//!     output: std::path::Path::new(&out_dir).join("assets.rs"),
//!     prefix: Some("assets".into()),
//!     compress: true,
//!     ..Config::default()
//! }
//! .with_input(InputConfig::new("assets", true));
//!
//! let summary = assetpak::generate(&config)?;
//! println!("embedded {} assets", summary.assets);
//! # Ok::<(), assetpak::Error>(())
//! ```
//!
//! The consumer then pulls the table in with
//! `include!(concat!(env!("OUT_DIR"), "/assets.rs"))` and calls
//! `fetch("some/file.txt")`. Compressed tables need `flate2` in the
//! consuming crate.
//!
//! ### Inspecting what would be embedded
//!
//! ```no_run
//! use assetpak::prelude::*;
//!
//! let plan = Config::default()
//!     .with_input(InputConfig::parse("public/..."))
//!     .validate()?;
//! for asset in discover(&plan)? {
//!     println!("{} <- {}", asset.name, asset.path.display());
//! }
//! # Ok::<(), assetpak::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `assetpak` command-line binary

pub mod config;
pub mod discovery;
pub mod encode;
pub mod error;
pub mod generate;
pub mod hash;
pub mod utils;

pub use error::{Error, Result};
pub use generate::{GenerateSummary, generate, generate_with_progress};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{Config, HashEncoding, HashFormat, IgnoreSet, InputConfig, Plan};
    pub use crate::discovery::{Asset, discover, find_files};
    pub use crate::error::{Error, Result};
    pub use crate::generate::{
        AssetTable, FileStat, GenerateSummary, Generator, generate, generate_with_progress,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
