mod export;
mod scrape;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::export::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "orgscrape-cli")]
#[command(about = "Scrape public company pages into flat profile exports")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape company pages and export their profiles and posts
    Scrape {
        /// Company page URL; repeat to scrape several. Overrides the targets file.
        #[arg(long = "target", value_name = "URL")]
        targets: Vec<String>,
        /// YAML targets file (defaults to ORGSCRAPE_TARGETS_PATH)
        #[arg(long)]
        targets_file: Option<PathBuf>,
        /// Posts to load per company (defaults to ORGSCRAPE_POST_TARGET)
        #[arg(long)]
        posts: Option<usize>,
        /// Write the export here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Export format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// List what would be scraped without launching a browser
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate and list the configured targets
    Targets {
        /// YAML targets file (defaults to ORGSCRAPE_TARGETS_PATH)
        #[arg(long)]
        targets_file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = orgscrape_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Scrape {
            targets,
            targets_file,
            posts,
            output,
            format,
            dry_run,
        }) => {
            let request = scrape::ScrapeRequest {
                targets,
                targets_file,
                posts,
                output,
                format,
                dry_run,
            };
            scrape::run_scrape(&config, request).await?;
        }
        Some(Commands::Targets { targets_file }) => {
            scrape::run_list_targets(&config, targets_file.as_deref())?;
        }
        None => println!("no command given; see `orgscrape-cli --help`"),
    }

    Ok(())
}
