//! CLI module for the retrieval service
//!
//! Thin wrappers over the retrieval core:
//! - `import`: bulk-load documents from a JSON file
//! - `search`: run a similarity query and print normalized results
//! - `store`: store one piece of domain knowledge

pub mod import;
pub mod search;
pub mod store;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;
use crate::RetrievalService;

/// Semantic retrieval over interchangeable vector stores
#[derive(Parser)]
#[command(name = "vector-retrieval-service")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import documents from a JSON file
    Import(import::ImportArgs),

    /// Search the active backend
    Search(search::SearchArgs),

    /// Store domain knowledge
    Store(store::StoreArgs),
}

/// Shared startup: environment, configuration, logging, and an initialized
/// service against the configured backend.
async fn bootstrap() -> anyhow::Result<RetrievalService> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    init_logging(&config.logging);

    let service = RetrievalService::from_config(&config);
    service.initialize().await?;

    Ok(service)
}
