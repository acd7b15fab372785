//! CLI command for listing discovered assets

use crate::config::Config;
use crate::discovery::discover;
use crate::generate::AssetTable;

pub fn execute(config: &Config) -> anyhow::Result<()> {
    let plan = config.validate()?;
    let table: AssetTable = discover(&plan)?.into_iter().collect();

    for asset in table.iter() {
        match &asset.original_name {
            Some(original) => println!("{}  ({original})  {}", asset.name, asset.path.display()),
            None => println!("{}  {}", asset.name, asset.path.display()),
        }
    }
    println!("{} assets", table.len());
    Ok(())
}
