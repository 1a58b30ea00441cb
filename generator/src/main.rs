//! Wilayah CLI - generate the static region API
//!
//! ```bash
//! wilayah                                  # data/*.csv -> api/
//! wilayah --data-dir raw --output public   # custom locations
//! wilayah --with-headers                   # inputs have header rows
//! ```

use clap::Parser;
use std::path::PathBuf;
use wilayah::logs::{log_error, LOGGER};
use wilayah::{run, GeneratorOptions, LoadOptions};

#[derive(Parser)]
#[command(name = "wilayah")]
#[command(about = "Generate a static JSON API from region CSV files", long_about = None)]
struct Cli {
    /// Directory containing provinces.csv, regencies.csv, districts.csv and villages.csv
    #[arg(long, env = "WILAYAH_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Output directory for the generated API
    #[arg(short, long, env = "WILAYAH_OUTPUT_DIR", default_value = "api")]
    output: PathBuf,

    /// CSV delimiter (single ASCII character)
    #[arg(short, long, default_value = ",", value_parser = parse_delimiter)]
    delimiter: u8,

    /// Inputs have a header row; resolve columns by name
    #[arg(long)]
    with_headers: bool,

    /// Only print errors
    #[arg(short, long)]
    quiet: bool,
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    let s = if s == "\\t" { "\t" } else { s };
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(format!("delimiter must be a single ASCII character, got '{}'", s)),
    }
}

impl From<Cli> for GeneratorOptions {
    fn from(cli: Cli) -> Self {
        Self {
            data_dir: cli.data_dir,
            output_dir: cli.output,
            load: LoadOptions { delimiter: cli.delimiter },
            with_headers: cli.with_headers,
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    LOGGER.set_quiet(cli.quiet);

    let options = GeneratorOptions::from(cli);
    if let Err(e) = run(&options).await {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
