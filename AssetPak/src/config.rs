//! Generation configuration
//!
//! [`Config`] is what callers fill in (from code, a TOML file or CLI flags).
//! [`Config::validate`] checks it once and produces a [`Plan`]: the same
//! settings with ignore patterns compiled and the code-shape switches the
//! generator branches on worked out up front.

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Default number of escaped bytes per generated source line.
pub const DEFAULT_WRAP_WIDTH: usize = 24;

/// Default number of encoded hash characters kept in a hashed name.
pub const DEFAULT_HASH_LENGTH: usize = 16;

/// Highest GZIP level accepted by `compression_level`.
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// How asset names are qualified with the content hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashFormat {
    /// No hashing: names are derived from paths only.
    #[default]
    NoHash,
    /// Hash the content but keep the name as is.
    NameUnchanged,
    /// `dir/<hash>/name.ext`
    DirHash,
    /// `dir/name-<hash>.ext`
    NameHashSuffix,
    /// `dir/<hash>.ext`
    HashWithExt,
}

impl HashFormat {
    /// Whether content hashes are computed at all.
    #[must_use]
    pub fn is_enabled(self) -> bool {
        self != HashFormat::NoHash
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            HashFormat::NoHash => "none",
            HashFormat::NameUnchanged => "unchanged",
            HashFormat::DirHash => "dir",
            HashFormat::NameHashSuffix => "namehashext",
            HashFormat::HashWithExt => "hashext",
        }
    }
}

impl std::str::FromStr for HashFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "no-hash" => Ok(HashFormat::NoHash),
            "unchanged" | "name-unchanged" => Ok(HashFormat::NameUnchanged),
            "dir" | "dir-hash" => Ok(HashFormat::DirHash),
            "namehashext" | "name-hash-suffix" => Ok(HashFormat::NameHashSuffix),
            "hashext" | "hash-with-ext" => Ok(HashFormat::HashWithExt),
            _ => Err(format!(
                "Invalid hash format '{s}'. Valid values: none, unchanged, dir, namehashext, hashext"
            )),
        }
    }
}

/// Text encoding of the digest when it is spliced into a name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashEncoding {
    #[default]
    Hex,
    Base32,
    Base64,
}

impl std::str::FromStr for HashEncoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hex" => Ok(HashEncoding::Hex),
            "base32" => Ok(HashEncoding::Base32),
            "base64" => Ok(HashEncoding::Base64),
            _ => Err(format!(
                "Invalid hash encoding '{s}'. Valid values: hex, base32, base64"
            )),
        }
    }
}

/// One root to embed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    /// File or directory to scan.
    pub path: PathBuf,
    /// Descend into subdirectories.
    #[serde(default)]
    pub recursive: bool,
    /// Prefix stripped from names under this root; overrides [`Config::prefix`].
    #[serde(default)]
    pub prefix: Option<PathBuf>,
}

impl InputConfig {
    pub fn new(path: impl Into<PathBuf>, recursive: bool) -> Self {
        Self {
            path: path.into(),
            recursive,
            prefix: None,
        }
    }

    /// Parse a command-line input. A trailing `/...` marks it recursive.
    #[must_use]
    pub fn parse(arg: &str) -> Self {
        let trimmed = arg
            .strip_suffix("/...")
            .or_else(|| arg.strip_suffix("\\..."));
        match trimmed {
            Some("") => Self::new("/", true),
            Some(path) => Self::new(path, true),
            None if arg == "..." => Self::new(".", true),
            None => Self::new(arg, false),
        }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

/// Everything that shapes one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Roots to embed, in order.
    #[serde(rename = "input")]
    pub inputs: Vec<InputConfig>,
    /// Where the generated source is written.
    pub output: PathBuf,
    /// Prefix stripped from every asset name.
    pub prefix: Option<PathBuf>,
    /// Regular expressions; a path matching any of them is skipped.
    pub ignore: Vec<String>,
    /// GZIP payloads and decompress at access time.
    pub compress: bool,
    /// GZIP level, 0 (store) to 9 (best).
    pub compression_level: u32,
    /// Never hand out views into the embedded storage, always copy.
    pub mem_copy: bool,
    /// Capture per-file mode and modification time.
    pub metadata: bool,
    /// Fixed permission bits for every asset (0 = unset).
    pub mode: u32,
    /// Fixed modification time in Unix seconds for every asset (0 = unset).
    pub mod_time: i64,
    /// Emit `restore_asset` / `restore_assets`.
    pub restore: bool,
    pub hash_format: HashFormat,
    pub hash_encoding: HashEncoding,
    /// Encoded hash characters kept in names (0 = all).
    pub hash_length: usize,
    /// Escaped bytes per line of generated payload (0 = no wrapping).
    pub wrap_width: usize,
    /// Indentation for continuation lines of payload literals.
    pub indent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: PathBuf::from("assets.rs"),
            prefix: None,
            ignore: Vec::new(),
            compress: false,
            compression_level: 6,
            mem_copy: false,
            metadata: false,
            mode: 0,
            mod_time: 0,
            restore: false,
            hash_format: HashFormat::NoHash,
            hash_encoding: HashEncoding::Hex,
            hash_length: DEFAULT_HASH_LENGTH,
            wrap_width: DEFAULT_WRAP_WIDTH,
            indent: "            ".to_string(),
        }
    }
}

impl Config {
    /// Parse a TOML configuration document.
    ///
    /// # Errors
    /// Returns [`Error::ConfigParse`] if the document is malformed or has unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a TOML configuration file.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the file cannot be read, or [`Error::ConfigParse`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    #[must_use]
    pub fn with_input(mut self, input: InputConfig) -> Self {
        self.inputs.push(input);
        self
    }

    /// Check the configuration and derive the generation plan.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPattern`] for a bad ignore regex and
    /// [`Error::InvalidConfig`] for any other inconsistent setting.
    pub fn validate(&self) -> Result<Plan> {
        if self.inputs.is_empty() {
            return Err(Error::InvalidConfig("no input paths given".to_string()));
        }
        if self.compression_level > MAX_COMPRESSION_LEVEL {
            return Err(Error::InvalidConfig(format!(
                "compression level {} out of range 0-{MAX_COMPRESSION_LEVEL}",
                self.compression_level
            )));
        }
        if self.mode > 0o7777 {
            return Err(Error::InvalidConfig(format!(
                "mode {:o} has bits outside 0o7777",
                self.mode
            )));
        }
        if self.mod_time < 0 {
            return Err(Error::InvalidConfig(format!(
                "mod_time {} is negative",
                self.mod_time
            )));
        }
        // Continuation lines rely on the literal skipping leading whitespace.
        if !self.indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(Error::InvalidConfig(
                "indent must contain only spaces and tabs".to_string(),
            ));
        }

        let ignore = IgnoreSet::new(&self.ignore)?;

        Ok(Plan {
            config: self.clone(),
            ignore,
            asset_name: self.hash_format.is_enabled(),
            view_read: !self.compress && !self.mem_copy,
            emit_mode: self.metadata && self.mode == 0,
            emit_mod_time: self.metadata && self.mod_time == 0,
        })
    }
}

/// Compiled ignore predicates.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    patterns: Vec<Regex>,
}

impl IgnoreSet {
    /// Compile the given patterns in order.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPattern`] naming the first pattern that fails.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p.as_ref()).map_err(|source| Error::InvalidPattern {
                    pattern: p.as_ref().to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// True if any pattern matches the path.
    pub fn is_ignored(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let text = path.to_string_lossy();
        self.patterns.iter().any(|re| re.is_match(&text))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// A validated configuration plus the switches derived from it.
#[derive(Debug, Clone)]
pub struct Plan {
    pub config: Config,
    pub ignore: IgnoreSet,
    /// Names are hash-qualified: keep original names and emit `resolve_name`.
    pub asset_name: bool,
    /// Uncompressed and not forced to copy: emit the `fetch_view` accessor.
    pub view_read: bool,
    /// Each asset carries its own captured mode.
    pub emit_mode: bool,
    /// Each asset carries its own captured modification time.
    pub emit_mod_time: bool,
}
