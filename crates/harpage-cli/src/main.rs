use anyhow::Result;
use clap::{Parser, Subcommand};
use harpage_cli::{OutputFormat, commands};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "harpage")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Per-page size and load time analysis for HTTP Archive (HAR) files",
    long_about = "harpage breaks a HAR capture down by page: how many bytes each content type \
                  contributed and how long the page took to load once parallel requests are \
                  accounted for."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// List the pages recorded in a HAR file
    Pages {
        /// Path to the HAR file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Report sizes and load times for one page
    Report {
        /// Path to the HAR file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page id (see `harpage pages`)
        #[arg(short, long)]
        page: String,

        /// Number of slowest requests to list
        #[arg(long, default_value_t = 5)]
        top: usize,
    },

    /// List a page's entries matching regex criteria, with their load time
    Filter {
        /// Path to the HAR file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page id (see `harpage pages`)
        #[arg(short, long)]
        page: String,

        /// Regex searched in the request method
        #[arg(long)]
        method: Option<String>,

        /// Regex searched in the Content-Type response header
        #[arg(long)]
        content_type: Option<String>,

        /// Regex searched in the status code (e.g. "2.." or "^30")
        #[arg(long)]
        status: Option<String>,

        /// Sum request times instead of merging parallel requests
        #[arg(long)]
        serial: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    tracing::debug!("Output format: {}", cli.format.as_str());

    match cli.command {
        Commands::Pages { file } => commands::pages::execute(&file, cli.format),
        Commands::Report { file, page, top } => {
            commands::report::execute(&file, &page, top, cli.format)
        }
        Commands::Filter {
            file,
            page,
            method,
            content_type,
            status,
            serial,
        } => commands::filter::execute(
            &file,
            &page,
            commands::filter::Criteria {
                method,
                content_type,
                status,
            },
            serial,
            cli.format,
        ),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("harpage=debug,harpage_cli=debug,harpage_core=debug")
    } else {
        EnvFilter::new("harpage=info,harpage_core=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
