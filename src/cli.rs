//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use katunog_core::config::DEFAULT_BASE_URL;
use katunog_core::query::{DEFAULT_FILTER, DEFAULT_LIMIT, DEFAULT_PAGE};
use katunog_core::{DEFAULT_CONCURRENCY, DEFAULT_FILE_TYPE};

/// Query the Katunog musical instrument archive and download its media.
#[derive(Parser, Debug)]
#[command(name = "katunog")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Service base URL
    #[arg(long, default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Page selection shared by listing commands.
#[derive(ClapArgs, Debug, Clone, Copy)]
pub struct PageArgs {
    /// Page number (1-based)
    #[arg(short, long, default_value_t = DEFAULT_PAGE, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Objects per page
    #[arg(short, long, default_value_t = DEFAULT_LIMIT, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: u32,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List full instrument records
    Instruments {
        #[command(flatten)]
        page: PageArgs,
        /// Catalog filter
        #[arg(long, default_value = DEFAULT_FILTER)]
        filter: String,
    },
    /// List instruments as summary rows (one JSON object per line)
    Table {
        #[command(flatten)]
        page: PageArgs,
        /// Catalog filter
        #[arg(long, default_value = DEFAULT_FILTER)]
        filter: String,
    },
    /// List instrument locations
    Locations {
        #[command(flatten)]
        page: PageArgs,
    },
    /// List instrument descriptions
    Descriptions {
        #[command(flatten)]
        page: PageArgs,
    },
    /// List instrument media files
    Media {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one instrument
    Instrument {
        /// Service identifier of the instrument
        id: String,
    },
    /// List regions and islands
    Regions,
    /// List provinces
    Provinces,
    /// Download media archives for listed instruments
    Download {
        #[command(flatten)]
        page: PageArgs,
        /// Directory receiving the archives
        #[arg(short, long, default_value = "downloads")]
        output: PathBuf,
        /// Media type to request
        #[arg(long, default_value = DEFAULT_FILE_TYPE)]
        file_type: String,
        /// Downloads per batch (1-100)
        #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=100))]
        concurrency: u8,
        /// Number of consecutive pages to process
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },
    /// Extract downloaded archives
    Unzip {
        /// Directory holding .zip files
        #[arg(default_value = "downloads")]
        zip_dir: PathBuf,
        /// Directory receiving the extracted files
        #[arg(default_value = "extracted")]
        output: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_listing_defaults() {
        let args = Args::try_parse_from(["katunog", "instruments"]).unwrap();
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert!(!args.insecure);
        assert_eq!(args.base_url, DEFAULT_BASE_URL);
        match args.command {
            Command::Instruments { page, filter } => {
                assert_eq!(page.page, 1);
                assert_eq!(page.limit, 10);
                assert_eq!(filter, "katunog");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["katunog", "-vv", "regions"]).unwrap();
        assert_eq!(args.verbose, 2);

        let args = Args::try_parse_from(["katunog", "provinces", "--verbose"]).unwrap();
        assert_eq!(args.verbose, 1);
    }

    #[test]
    fn test_cli_download_defaults() {
        let args = Args::try_parse_from(["katunog", "download"]).unwrap();
        match args.command {
            Command::Download {
                page,
                output,
                file_type,
                concurrency,
                pages,
            } => {
                assert_eq!(page.page, 1);
                assert_eq!(output, PathBuf::from("downloads"));
                assert_eq!(file_type, "audio");
                assert_eq!(concurrency, 5);
                assert_eq!(pages, 1);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_concurrency_range() {
        assert!(Args::try_parse_from(["katunog", "download", "-c", "0"]).is_err());
        assert!(Args::try_parse_from(["katunog", "download", "-c", "101"]).is_err());
        let args = Args::try_parse_from(["katunog", "download", "-c", "100"]).unwrap();
        assert!(matches!(args.command, Command::Download { concurrency: 100, .. }));
    }

    #[test]
    fn test_cli_page_must_be_positive() {
        let result = Args::try_parse_from(["katunog", "locations", "--page", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_instrument_requires_id() {
        let result = Args::try_parse_from(["katunog", "instrument"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_cli_insecure_and_base_url() {
        let args = Args::try_parse_from([
            "katunog",
            "--insecure",
            "--base-url",
            "http://localhost:9000",
            "provinces",
        ])
        .unwrap();
        assert!(args.insecure);
        assert_eq!(args.base_url, "http://localhost:9000");
    }
}
