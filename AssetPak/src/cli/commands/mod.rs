use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, HashEncoding, HashFormat, InputConfig};

pub mod execute;
pub mod generate;
pub mod list;

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a Rust source file embedding the inputs
    Generate {
        #[command(flatten)]
        scan: ScanArgs,

        /// Output file (default: assets.rs)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// GZIP the embedded payloads
        #[arg(long)]
        compress: bool,

        /// GZIP level, 0-9
        #[arg(long, value_name = "LEVEL")]
        compression_level: Option<u32>,

        /// Always copy on access, never emit `fetch_view`
        #[arg(long)]
        mem_copy: bool,

        /// Capture file mode and modification time
        #[arg(long)]
        metadata: bool,

        /// Fixed octal permission bits for every asset (e.g. 644)
        #[arg(long, value_parser = parse_octal)]
        mode: Option<u32>,

        /// Fixed modification time (Unix seconds) for every asset
        #[arg(long)]
        mod_time: Option<i64>,

        /// Emit restore_asset / restore_assets
        #[arg(long)]
        restore: bool,

        /// Escaped bytes per payload line (0 disables wrapping)
        #[arg(long, value_name = "N")]
        wrap_width: Option<usize>,
    },

    /// List the assets that would be embedded
    List {
        #[command(flatten)]
        scan: ScanArgs,
    },
}

/// Options shared by every command that scans inputs.
#[derive(Args)]
pub struct ScanArgs {
    /// Input paths; append `/...` to recurse (e.g. `assets/...`)
    pub inputs: Vec<String>,

    /// TOML configuration file; flags given here override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Prefix stripped from asset names
    #[arg(long)]
    pub prefix: Option<PathBuf>,

    /// Regex of paths to skip (repeatable)
    #[arg(long, value_name = "REGEX")]
    pub ignore: Vec<String>,

    /// Hash-qualified naming (none, unchanged, dir, namehashext, hashext)
    #[arg(long, value_name = "FORMAT")]
    pub hash_format: Option<HashFormat>,

    /// Hash encoding in names (hex, base32, base64)
    #[arg(long, value_name = "ENCODING")]
    pub hash_encoding: Option<HashEncoding>,

    /// Encoded hash characters kept in names (0 = all)
    #[arg(long, value_name = "N")]
    pub hash_length: Option<usize>,
}

impl ScanArgs {
    /// Load the config file, if any, and apply the scan flags on top.
    pub fn to_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if !self.inputs.is_empty() {
            config.inputs = self.inputs.iter().map(|arg| InputConfig::parse(arg)).collect();
        }
        if let Some(prefix) = &self.prefix {
            config.prefix = Some(prefix.clone());
        }
        config.ignore.extend(self.ignore.iter().cloned());
        if let Some(format) = self.hash_format {
            config.hash_format = format;
        }
        if let Some(encoding) = self.hash_encoding {
            config.hash_encoding = encoding;
        }
        if let Some(length) = self.hash_length {
            config.hash_length = length;
        }

        Ok(config)
    }
}

fn parse_octal(s: &str) -> Result<u32, String> {
    let digits = s.strip_prefix("0o").unwrap_or(s);
    u32::from_str_radix(digits, 8).map_err(|e| format!("Invalid octal mode '{s}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Commands,
    }

    #[test]
    fn test_parse_octal() {
        assert_eq!(parse_octal("644"), Ok(0o644));
        assert_eq!(parse_octal("0o7755"), Ok(0o7755));
        assert!(parse_octal("9").is_err());
    }

    #[test]
    fn test_scan_flags_build_config() {
        let cli = TestCli::parse_from([
            "assetpak",
            "list",
            "public/...",
            "README.md",
            "--prefix",
            "public",
            "--ignore",
            "\\.git",
            "--hash-format",
            "namehashext",
            "--hash-length",
            "8",
        ]);
        let Commands::List { scan } = cli.command else {
            panic!("expected list");
        };

        let config = scan.to_config().unwrap();
        assert_eq!(
            config.inputs,
            vec![InputConfig::new("public", true), InputConfig::new("README.md", false)]
        );
        assert_eq!(config.prefix, Some(PathBuf::from("public")));
        assert_eq!(config.ignore, vec!["\\.git".to_string()]);
        assert_eq!(config.hash_format, HashFormat::NameHashSuffix);
        assert_eq!(config.hash_length, 8);
    }

    #[test]
    fn test_flags_override_config_file() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("assetpak.toml");
        std::fs::write(
            &file,
            "ignore = [\"~$\"]\nhash_length = 4\n\n[[input]]\npath = \"static\"\nrecursive = true\n",
        )
        .unwrap();

        let cli = TestCli::parse_from([
            "assetpak",
            "list",
            "--config",
            file.to_str().unwrap(),
            "--ignore",
            "\\.tmp$",
        ]);
        let Commands::List { scan } = cli.command else {
            panic!("expected list");
        };

        let config = scan.to_config().unwrap();
        assert_eq!(config.inputs, vec![InputConfig::new("static", true)]);
        assert_eq!(config.ignore, vec!["~$".to_string(), "\\.tmp$".to_string()]);
        assert_eq!(config.hash_length, 4);
    }
}
