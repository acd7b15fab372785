//! AssetPak CLI binary

fn main() -> anyhow::Result<()> {
    assetpak::cli::run_cli()
}
