//! Build script embedding `assets/` twice: a plain table with captured
//! metadata and restore helpers, and a compressed hash-named table.

use std::path::PathBuf;

use assetpak::config::{Config, HashFormat, InputConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);
    let assets = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?).join("assets");

    let base = Config {
        prefix: Some(assets.clone()),
        ignore: vec!["~$".to_string()],
        ..Config::default()
    }
    .with_input(InputConfig::new(&assets, true));

    assetpak::generate(&Config {
        output: out_dir.join("plain.rs"),
        metadata: true,
        restore: true,
        ..base.clone()
    })?;

    assetpak::generate(&Config {
        output: out_dir.join("packed.rs"),
        compress: true,
        compression_level: 9,
        hash_format: HashFormat::NameHashSuffix,
        hash_length: 8,
        ..base
    })?;

    println!("cargo:rerun-if-changed=assets");
    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
