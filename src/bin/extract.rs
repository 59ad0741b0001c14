//! comdirect Extract - CLI tool turning a comdirect export into ledger entries.

use clap::Parser;
use comdirect_importer::{
    ComdirectImporter, Extraction, Importer, ImporterConfig, OutputFormat, Result,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "comdirect_extract")]
#[command(
    about = "Extract ledger entries from a comdirect checking account export",
    long_about = None
)]
struct Cli {
    /// Export file to read
    file: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ledger account to book to
    #[arg(short, long)]
    account: Option<String>,

    /// Account number expected in the file name
    #[arg(long = "account-number")]
    account_number: Option<String>,

    /// Account currency
    #[arg(long)]
    currency: Option<String>,

    /// Detect by file contents only, ignoring the file name
    #[arg(long = "content-only")]
    content_only: bool,

    /// Output format (beancount, json)
    #[arg(short, long, default_value = "beancount")]
    format: String,

    /// Output file path (or stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "comdirect_importer=info".into()),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn build_config(cli: &Cli) -> Result<ImporterConfig> {
    let mut config = match cli.config {
        Some(ref path) => ImporterConfig::from_json_file(path)?,
        None => ImporterConfig::new("Assets:Comdirect:Checking", ""),
    };

    if let Some(ref account) = cli.account {
        config.account = account.clone();
    }
    if let Some(ref number) = cli.account_number {
        config.account_number = number.clone();
    }
    if let Some(ref currency) = cli.currency {
        config = config.with_currency(currency.as_str());
    }
    if cli.content_only || config.account_number.is_empty() {
        config.require_account_number_in_filename = false;
    }

    Ok(config)
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.format.parse::<OutputFormat>()?;
    let importer = ComdirectImporter::new(build_config(&cli)?);

    let entries = match importer.extract(&cli.file)? {
        Extraction::Parsed(statement) => statement.entries,
        Extraction::Skipped { reason } => {
            tracing::warn!("nothing extracted: {}", reason);
            return Ok(());
        }
    };

    if let Some(ref output_path) = cli.output {
        let mut writer = BufWriter::new(File::create(output_path)?);
        format.write_entries(&mut writer, &entries)?;
        writer.flush()?;
    } else {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        format.write_entries(&mut writer, &entries)?;
    }

    Ok(())
}
