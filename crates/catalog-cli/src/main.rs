mod commands;
mod terminal;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "catalog")]
#[command(about = "Product catalog manager")]
struct Cli {
    /// Overrides `CATALOG_API_BASE_URL`.
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List every product.
    List,
    /// Show one product as loaded into the edit form.
    Show { id: i64 },
    /// Create a product.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Edit an existing product; omitted fields keep their current values.
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete a product after confirmation.
    Delete {
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Upload or replace a product image with progress output.
    UploadImage { id: i64, path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = catalog_core::load_app_config_with_api_base(cli.api_base.as_deref())?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, api_base = %config.api_base_url, "configuration loaded");

    let client = catalog_client::CatalogClient::from_config(&config)?;

    match cli.command {
        Commands::List => commands::run_list(client).await,
        Commands::Show { id } => commands::run_show(client, id).await,
        Commands::Create { name, price, image } => {
            commands::run_create(client, name, price, image).await
        }
        Commands::Edit {
            id,
            name,
            price,
            image,
        } => commands::run_edit(client, id, name, price, image).await,
        Commands::Delete { id, yes } => commands::run_delete(client, id, yes).await,
        Commands::UploadImage { id, path } => commands::run_upload_image(client, id, &path).await,
    }
}
