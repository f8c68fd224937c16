use anyhow::Result;
use clap::{Parser, Subcommand};
use edurec_core::persist::{save_model, CachePaths};
use edurec_core::{load_catalog, CatalogIndex};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "edurec-trainer")]
#[command(about = "Prebuild the TF-IDF model cache from a resource catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the vector space model over the catalog and write cache artifacts
    Build {
        /// Catalog CSV path (Grade Level, Subject, Topic Keywords, URL)
        #[arg(long)]
        catalog: String,
        /// Output cache directory
        #[arg(long)]
        cache: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { catalog, cache } => build_cache(&catalog, &cache),
    }
}

fn build_cache(catalog: &str, cache: &str) -> Result<()> {
    let entries = load_catalog(catalog)?;
    tracing::info!(catalog, resources = entries.len(), "loaded catalog");

    let (model, index) = CatalogIndex::from_entries(entries);
    let vectors: Vec<_> = index.all().iter().map(|ie| ie.vector.clone()).collect();

    let paths = CachePaths::new(cache);
    save_model(&paths, &model, &vectors)?;
    tracing::info!(
        cache,
        resources = index.len(),
        terms = model.vocab_size(),
        "model cache written"
    );
    Ok(())
}
