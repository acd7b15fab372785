//! Command execution implementations

use super::{Commands, generate, list};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self, quiet: bool) -> anyhow::Result<()> {
        match self {
            Commands::Generate {
                scan,
                output,
                compress,
                compression_level,
                mem_copy,
                metadata,
                mode,
                mod_time,
                restore,
                wrap_width,
            } => {
                let mut config = scan.to_config()?;
                if let Some(output) = output {
                    config.output.clone_from(output);
                }
                config.compress |= *compress;
                config.mem_copy |= *mem_copy;
                config.metadata |= *metadata;
                config.restore |= *restore;
                if let Some(level) = compression_level {
                    config.compression_level = *level;
                }
                if let Some(mode) = mode {
                    config.mode = *mode;
                }
                if let Some(mod_time) = mod_time {
                    config.mod_time = *mod_time;
                }
                if let Some(width) = wrap_width {
                    config.wrap_width = *width;
                }
                generate::execute(&config, quiet)
            }
            Commands::List { scan } => list::execute(&scan.to_config()?),
        }
    }
}
