use clap::Parser;
use vector_retrieval_service::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Import(args) => cli::import::run(args).await,
        Command::Search(args) => cli::search::run(args).await,
        Command::Store(args) => cli::store::run(args).await,
    }
}
