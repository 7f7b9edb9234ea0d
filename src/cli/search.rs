//! Search command - run a similarity query and print results as JSON

use clap::Args;

use crate::domain::SearchParams;

#[derive(Args)]
pub struct SearchArgs {
    /// The search query
    pub query: String,

    /// Number of results to retrieve
    #[arg(long, default_value_t = 3)]
    pub limit: usize,

    /// Minimum similarity score threshold (0-1)
    #[arg(long, default_value_t = 0.7)]
    pub score_threshold: f32,
}

pub async fn run(args: SearchArgs) -> anyhow::Result<()> {
    let service = super::bootstrap().await?;

    let params = SearchParams::new()
        .with_limit(args.limit)
        .with_score_threshold(args.score_threshold);
    let results = service.search(&args.query, params).await?;

    println!("{}", serde_json::to_string_pretty(&results)?);

    Ok(())
}
