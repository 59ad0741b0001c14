//! comdirect Identify - CLI tool reporting which files are comdirect exports
//! and how they would be filed.

use clap::Parser;
use comdirect_importer::{ComdirectImporter, Importer, ImporterConfig, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "comdirect_identify")]
#[command(about = "Identify comdirect checking account exports", long_about = None)]
struct Cli {
    /// Files to check
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Account number expected in the file name (content-only detection when absent)
    #[arg(long = "account-number")]
    account_number: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "comdirect_importer=info".into()),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => ImporterConfig::from_json_file(path)?,
        None => ImporterConfig::new("Assets:Comdirect:Checking", "").with_filename_check(false),
    };
    if let Some(number) = cli.account_number {
        config.account_number = number;
        config.require_account_number_in_filename = true;
    }
    let importer = ComdirectImporter::new(config);

    for path in &cli.files {
        if !importer.identify(path) {
            println!("{}: not recognized", path.display());
            continue;
        }

        // A recognized file may still lack a usable header; report and go on.
        let date = match importer.effective_date(path) {
            Ok(Some(date)) => date.to_string(),
            Ok(None) => "-".to_string(),
            Err(e) => format!("unknown ({})", e),
        };
        println!(
            "{}: account={} date={} name={}",
            path.display(),
            importer.account_for(path),
            date,
            importer.canonical_name(path)
        );
    }

    Ok(())
}
