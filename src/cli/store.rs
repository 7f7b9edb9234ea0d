//! Store command - store one piece of domain knowledge

use std::collections::HashMap;

use clap::Args;
use tracing::info;

#[derive(Args)]
pub struct StoreArgs {
    /// The knowledge content to store
    #[arg(long)]
    pub content: String,

    /// The knowledge domain this belongs to
    #[arg(long)]
    pub domain: String,

    /// Source of this knowledge
    #[arg(long)]
    pub source: Option<String>,
}

pub async fn run(args: StoreArgs) -> anyhow::Result<()> {
    let service = super::bootstrap().await?;

    let mut metadata = HashMap::new();
    if let Some(source) = args.source {
        metadata.insert("source".to_string(), serde_json::json!(source));
    }

    let id = service
        .store_domain_knowledge(&args.content, &args.domain, metadata)
        .await?;

    info!(document_id = %id, domain = %args.domain, "Knowledge stored");
    println!("{id}");

    Ok(())
}
