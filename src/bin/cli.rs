//! datavisit CLI
//!
//! Browse datasets published on FAIR Data Points and compose data access
//! requests from the command line.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use datavisit::{
    config::Config,
    error::{AppError, Result},
    models::{Dataset, Endpoint, FetchOutcome},
    pipeline::{self, BrowseQuery, RequestFile},
    services::{DatasetService, FdpClient},
};

/// datavisit - FAIR Data Point dataset discovery
#[derive(Parser, Debug)]
#[command(
    name = "datavisit",
    version,
    about = "Discover datasets across FAIR Data Points and compose access requests"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "datavisit.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch one endpoint and show its metadata
    Endpoint {
        /// Endpoint URI
        uri: String,
    },

    /// Fetch every endpoint an index links to
    Discover {
        /// Index endpoint URI
        index: String,
    },

    /// List datasets from the configured endpoints
    Datasets {
        /// Endpoint URI to use instead of the configured ones (repeatable)
        #[arg(long = "endpoint")]
        endpoints: Vec<String>,

        /// Keep datasets with this theme URI
        #[arg(long)]
        theme: Option<String>,

        /// Keep datasets whose title, description or keywords contain this
        #[arg(long)]
        keyword: Option<String>,

        /// Ranked free-text search
        #[arg(long)]
        search: Option<String>,

        /// List available themes instead of datasets
        #[arg(long)]
        themes: bool,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Compose request emails from a TOML request file
    Compose {
        /// Request file with requester details and dataset URIs
        request: PathBuf,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging from the configured level; `--verbose` forces debug.
fn init_logging(level: &str, verbose: bool) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };
    config.apply_env();
    init_logging(&config.logging.level, cli.verbose);

    if cli.config.exists() {
        log::debug!("Loaded configuration from {}", cli.config.display());
    } else {
        log::debug!("No config at {}, using defaults", cli.config.display());
    }

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    match cli.command {
        Command::Endpoint { uri } => {
            let client = FdpClient::new(&config.client)?;
            let endpoint = client.fetch_endpoint(&uri).await?;
            print_endpoint(&endpoint);
        }

        Command::Discover { index } => {
            let client = FdpClient::new(&config.client)?;
            let outcome = pipeline::run_discover(&client, &index).await?;
            for endpoint in &outcome.items {
                print_endpoint(endpoint);
                println!();
            }
            print_failures(&outcome);
            println!("{}", outcome.summary());
        }

        Command::Datasets {
            endpoints,
            theme,
            keyword,
            search,
            themes,
            json,
        } => {
            let client = FdpClient::new(&config.client)?;
            let endpoints = if endpoints.is_empty() {
                pipeline::resolve_endpoints(&client, &config.endpoints, &config.indexes).await
            } else {
                endpoints
            };
            if endpoints.is_empty() {
                return Err(AppError::config(
                    "No endpoints configured; add `endpoints` to the config or pass --endpoint",
                ));
            }

            let service = DatasetService::new(client);
            let query = BrowseQuery {
                theme,
                keyword,
                search,
            };
            let outcome = pipeline::run_browse(&service, &endpoints, &query).await?;

            if themes {
                let available = DatasetService::get_available_themes(&outcome.items);
                if json {
                    println!("{}", serde_json::to_string_pretty(&available)?);
                } else {
                    for theme in &available {
                        println!("{} ({})  {}", theme.label, theme.count, theme.uri);
                    }
                }
            } else if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                for dataset in &outcome.items {
                    print_dataset(dataset);
                }
                print_failures(&outcome);
                println!("{} datasets", outcome.items.len());
            }
        }

        Command::Compose { request, json } => {
            let file = RequestFile::load(&request)?;
            let client = FdpClient::new(&config.client)?;
            let endpoints =
                pipeline::resolve_endpoints(&client, &config.endpoints, &config.indexes).await;
            let service = DatasetService::new(client);
            let available = service.get_all_datasets(&endpoints).await?;

            let emails = pipeline::run_compose(file, &available.items)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&emails)?);
            } else {
                for email in &emails {
                    println!("To: {}", email.recipients.join(", "));
                    println!("Subject: {}", email.subject);
                    println!();
                    println!("{}", email.body);
                    println!();
                    println!("{}", email.mailto_link());
                    println!("{}", "-".repeat(72));
                }
            }
        }

        Command::Validate => {
            log::info!(
                "✓ Config OK ({} endpoints, {} indexes)",
                config.endpoints.len(),
                config.indexes.len()
            );
        }
    }

    Ok(())
}

fn print_endpoint(endpoint: &Endpoint) {
    println!("{}", endpoint.title);
    println!("  URI: {}", endpoint.uri);
    if let Some(description) = &endpoint.description {
        println!("  Description: {description}");
    }
    if let Some(publisher) = &endpoint.publisher {
        println!("  Publisher: {publisher}");
    }
    println!("  Catalogs: {}", endpoint.catalog_uris.len());
    if endpoint.is_index {
        println!("  Linked endpoints: {}", endpoint.linked_endpoint_uris.len());
        for uri in &endpoint.linked_endpoint_uris {
            println!("    {uri}");
        }
    }
}

fn print_dataset(dataset: &Dataset) {
    println!("{}", dataset.title);
    println!("  URI: {}", dataset.uri);
    println!("  Source: {}", dataset.parent_endpoint_title);
    let labels: Vec<&str> = dataset.themes().map(|(_, label)| label).collect();
    if !labels.is_empty() {
        println!("  Themes: {}", labels.join(", "));
    }
    if !dataset.keywords.is_empty() {
        println!("  Keywords: {}", dataset.keywords.join(", "));
    }
    match dataset.contact_email() {
        Some(email) => println!("  Contact: {email}"),
        None => println!("  Contact: none (cannot be requested)"),
    }
}

fn print_failures<T>(outcome: &FetchOutcome<T>) {
    for failure in &outcome.failures {
        eprintln!("! {}: {}", failure.error.reason(), failure.uri);
    }
}
