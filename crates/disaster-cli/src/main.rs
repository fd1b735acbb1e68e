mod pipeline;
mod scrape;

use clap::{Parser, Subcommand};
use disaster_scraper::CrawlMode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "disaster-cli")]
#[command(about = "DisasterAssist disaster declaration collector")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl the DisasterAssist listing and persist every declaration found
    Scrape {
        /// `full` fetches every disaster; `rescrape` skips ones already closed
        #[arg(long, default_value_t = CrawlMode::Full)]
        mode: CrawlMode,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = disaster_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool = disaster_db::connect_pool_from_config(&config).await?;
    disaster_db::ping(&pool).await?;

    match cli.command {
        Commands::Scrape { mode } => scrape::run_scrape(&pool, &config, mode).await?,
        Commands::Db { command } => match command {
            DbCommands::Ping => tracing::info!("database is reachable"),
            DbCommands::Migrate => {
                let applied = disaster_db::run_migrations(&pool).await?;
                tracing::info!(applied, "migrations complete");
            }
        },
    }

    Ok(())
}
