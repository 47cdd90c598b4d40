use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use festival_scraping::api::FestivalClient;
use festival_scraping::config::{ScrapeConfig, OUTPUT_PATH};
use festival_scraping::data_collector::run;
use log::LevelFilter;

/// Scrapes the monthly festival tables of kalnirnay.co.in into a CSV file.
#[derive(Parser)]
struct Opts {
    /// Where to write the CSV file.  An existing file is overwritten.
    #[arg(long, default_value = OUTPUT_PATH)]
    output: PathBuf,
    /// Exit with an error if any month could not be scraped.
    #[arg(long)]
    strict: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let opts = Opts::parse();
    let config = ScrapeConfig::builder().output_path(opts.output).build();
    let client = FestivalClient::new(&config.retry)?;
    let summary = run(&client, &config).await?;
    if opts.strict && summary.has_failures() {
        bail!("{} month(s) failed to be scraped", summary.failed.len());
    }
    Ok(())
}
