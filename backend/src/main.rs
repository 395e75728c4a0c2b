//! Cascades CLI - serve the troupe website and inspect its feeds
//!
//! # Main Command
//!
//! ```bash
//! cascades serve                       # Serve site + JSON feeds (port 3000)
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! cascades shows                       # Print upcoming shows as JSON
//! cascades photos                      # Print the photo feed as JSON
//! cascades members                     # Print troupe members as JSON
//! cascades parse export.csv            # Dump CSV records as JSON
//! cascades normalize <url>             # Show how an image URL is rewritten
//! ```

use clap::{Parser, Subcommand};
use cascades::api::logs::{log_error, log_info};
use cascades::config::resolve_data_dir;
use cascades::{normalize_src, parse_records, Feed, FeedConfig};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cascades")]
#[command(about = "Serve the Cascades website and its show/photo feeds", long_about = None)]
struct Cli {
    /// Data directory holding feeds.json and the bundled fallbacks
    /// (default: $CASCADES_DATA_DIR, then <site-root>/data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Site root with the static pages
    #[arg(long, global = true, default_value = ".")]
    site_root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Print upcoming shows as JSON
    Shows,

    /// Print the photo feed as JSON
    Photos,

    /// Print troupe members as JSON
    Members,

    /// Parse a CSV export and output its records as JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the embeddable form of an image URL
    Normalize {
        /// Image URL or path as pasted in the sheet
        src: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir, &cli.site_root);

    let result = match cli.command {
        Commands::Serve { port } => cmd_serve(&data_dir, &cli.site_root, port).await,
        Commands::Shows => cmd_shows(&data_dir).await,
        Commands::Photos => cmd_photos(&data_dir).await,
        Commands::Members => cmd_members(&data_dir).await,
        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),
        Commands::Normalize { src } => {
            println!("{}", normalize_src(&src));
            Ok(())
        }
    };

    if let Err(e) = result {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

fn load_feed(data_dir: &Path) -> Feed {
    let config = FeedConfig::load_or_default(data_dir);
    log_info(format!("Data directory: {}", data_dir.display()));
    if let Some(ref url) = config.shows_csv {
        log_info(format!("Shows sheet: {}", url));
    }
    if let Some(ref url) = config.photos_csv {
        log_info(format!("Photos sheet: {}", url));
    }
    Feed::new(config, data_dir)
}

async fn cmd_serve(data_dir: &Path, site_root: &Path, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let feed = load_feed(data_dir);
    cascades::server::start_server(feed, port, site_root).await?;
    Ok(())
}

async fn cmd_shows(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let shows = load_feed(data_dir).get_shows().await;
    if shows.is_empty() {
        log_info("No shows booked just yet.");
    }
    println!("{}", serde_json::to_string_pretty(&shows)?);
    Ok(())
}

async fn cmd_photos(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let feed = load_feed(data_dir).get_photo_feed().await;
    println!("{}", serde_json::to_string_pretty(&feed)?);
    Ok(())
}

async fn cmd_members(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let members = load_feed(data_dir).get_members().await;
    println!("{}", serde_json::to_string_pretty(&members)?);
    Ok(())
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    log_info(format!("Parsing CSV: {}", input.display()));

    let bytes = fs::read(input)?;
    let records = parse_records(&cascades::decode_body(&bytes));

    if let Some(first) = records.first() {
        log_info(format!("Columns: {}", first.keys().collect::<Vec<_>>().join(", ")));
    }
    log_info(format!("Parsed {} records", records.len()));

    let json = serde_json::to_string_pretty(&records)?;
    write_output(&json, output)
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            log_info(format!("Output written to: {}", p.display()));
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
