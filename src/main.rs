use std::fs::OpenOptions;

use clap::Parser;
use log::LevelFilter;

use insurance_reporter::pipeline::{self, Paths, DEFAULT_CLIENT};

const LOG_FILE: &str = "report.log";

/// Generates a per-client insurance report from `data/insurance.csv`.
///
/// Each run writes two chart PNGs and `<CLIENT_NAME>_Report.pdf` under
/// `output/`, overwriting any previous artifacts, and appends its outcome to
/// `report.log`.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Client the report is generated for.
    #[arg(default_value = DEFAULT_CLIENT)]
    client_name: String,
}

fn init_logging() {
    let mut builder = env_logger::Builder::default();
    builder.filter_level(LevelFilter::Info);

    match OpenOptions::new().create(true).append(true).open(LOG_FILE) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(err) => {
            eprintln!("cannot open {LOG_FILE} ({err}); logging to stderr");
        }
    }

    builder.init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    pipeline::run(&cli.client_name, &Paths::default());
}
