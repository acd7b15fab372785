//! CLI command for generating the embedded asset source

use std::time::Instant;

use crate::cli::progress::{DISK, LOOKING_GLASS, PACKAGE, print_done, print_step, simple_bar};
use crate::config::Config;
use crate::discovery::discover;
use crate::generate::{AssetTable, Generator};

pub fn execute(config: &Config, quiet: bool) -> anyhow::Result<()> {
    let started = Instant::now();
    let plan = config.validate()?;

    if !quiet {
        print_step(1, 3, LOOKING_GLASS, "Scanning inputs...");
    }
    let table: AssetTable = discover(&plan)?.into_iter().collect();

    if !quiet {
        print_step(2, 3, PACKAGE, &format!("Encoding {} assets...", table.len()));
    }
    let pb = (!quiet).then(|| simple_bar(table.len() as u64, "Encoding"));
    let progress = |current: usize, _total: usize, _name: &str| {
        if let Some(pb) = &pb {
            pb.set_position(current as u64);
        }
    };
    let bytes_in = Generator::new(&plan).write_to(&table, &config.output, &progress)?;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    if !quiet {
        print_step(
            3,
            3,
            DISK,
            &format!(
                "Wrote {} ({} assets, {} source bytes)",
                config.output.display(),
                table.len(),
                bytes_in
            ),
        );
        print_done(started.elapsed());
    }
    Ok(())
}
