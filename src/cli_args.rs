use std::path::PathBuf;

use clap::Parser;

/// Serves the book catalogue over HTTP.
#[derive(Parser)]
#[command(author, about, version)]
pub struct CliArgs {
    /// Path to the YAML configuration file.
    #[clap(long, env = "CONFIG_FILE", default_value = "config.yaml")]
    pub config_file: String,

    /// CSV file to import at startup. Overrides `seed_csv` from the configuration file.
    #[clap(long, env = "SEED_CSV")]
    pub seed_csv: Option<PathBuf>,
}
