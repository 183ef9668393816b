//! CLI entry point for the katunog tool.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use katunog_core::{
    ArchiveExtractor, DownloadOptions, KatunogApi, MediaDownloader, Pagination, ServiceConfig,
    instrument_rows,
};
use serde_json::Value;
use tracing::{debug, info};

mod cli;

use cli::{Args, Command, PageArgs};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let config = ServiceConfig::new(&args.base_url)?.with_verify_tls(!args.insecure);

    match args.command {
        Command::Instruments { page, filter } => {
            let api = KatunogApi::connect(&config)?;
            print_json(&api.instruments(pagination(page), &filter).await?)?;
        }
        Command::Table { page, filter } => {
            let api = KatunogApi::connect(&config)?;
            let response = api.instruments(pagination(page), &filter).await?;
            let mut stdout = io::stdout().lock();
            for row in instrument_rows(&response) {
                serde_json::to_writer(&mut stdout, &row)?;
                stdout.write_all(b"\n")?;
            }
        }
        Command::Locations { page } => {
            let api = KatunogApi::connect(&config)?;
            print_json(&api.locations(pagination(page)).await?)?;
        }
        Command::Descriptions { page } => {
            let api = KatunogApi::connect(&config)?;
            print_json(&api.descriptions(pagination(page)).await?)?;
        }
        Command::Media { page } => {
            let api = KatunogApi::connect(&config)?;
            print_json(&api.media_files(pagination(page)).await?)?;
        }
        Command::Instrument { id } => {
            let api = KatunogApi::connect(&config)?;
            print_json(&api.instrument_by_id(&id).await?)?;
        }
        Command::Regions => {
            let api = KatunogApi::connect(&config)?;
            print_json(&api.regions().await?)?;
        }
        Command::Provinces => {
            let api = KatunogApi::connect(&config)?;
            print_json(&api.provinces().await?)?;
        }
        Command::Download {
            page,
            output,
            file_type,
            concurrency,
            pages,
        } => {
            let options = DownloadOptions::new(output)
                .with_file_type(file_type)
                .with_concurrency(usize::from(concurrency));
            let downloader = MediaDownloader::connect(&config, options)?;
            let report = downloader
                .download_pages(pagination(page), Some(pages))
                .await?;
            info!(
                downloaded = report.downloaded,
                failed = report.failed,
                skipped = report.skipped_existing,
                "Download complete"
            );
        }
        Command::Unzip { zip_dir, output } => {
            let extractor = ArchiveExtractor::new(&zip_dir, &output)
                .with_context(|| format!("cannot prepare {}", output.display()))?;
            let summary = extractor.extract_all()?;
            info!(
                extracted = summary.extracted.len(),
                failed = summary.failed.len(),
                "Extraction complete"
            );
        }
    }

    Ok(())
}

fn pagination(args: PageArgs) -> Pagination {
    Pagination::new(args.page, args.limit)
}

fn print_json(value: &Value) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(json.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}
