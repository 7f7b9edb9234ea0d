//! Import command - bulk-load documents from a JSON file

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::domain::Document;

#[derive(Args)]
pub struct ImportArgs {
    /// Path to a JSON file containing an array of documents
    /// (`[{"id"?, "text", "source", "metadata"?}]`)
    #[arg(long)]
    pub file: PathBuf,
}

pub async fn run(args: ImportArgs) -> anyhow::Result<()> {
    let service = super::bootstrap().await?;

    let content = std::fs::read_to_string(&args.file)?;
    let documents: Vec<Document> = serde_json::from_str(&content)?;

    info!(
        count = documents.len(),
        file = %args.file.display(),
        "Importing documents"
    );

    let report = service.upsert(documents).await?;

    info!(
        documents = report.documents,
        batches = report.batches,
        "Import complete"
    );

    Ok(())
}
