use clap::{Parser, Subcommand};

mod runs;
mod sync;

#[derive(Debug, Parser)]
#[command(name = "lovetrip-cli")]
#[command(about = "LoveTrip data pipeline command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl the Tour API and upsert date & travel places
    Sync {
        /// Preview the task plan without network or database access
        #[arg(long)]
        dry_run: bool,
    },
    /// Show recent sync runs
    Runs {
        /// Maximum number of runs to show
        #[arg(long, default_value = "20")]
        limit: i64,
    },
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = lovetrip_core::load_app_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sync { dry_run } => {
            if dry_run {
                sync::print_task_plan();
                return Ok(());
            }
            let pool = connect(&config).await?;
            sync::run_sync(&pool, &config).await
        }
        Commands::Runs { limit } => {
            let pool = connect(&config).await?;
            runs::run_list_runs(&pool, limit).await
        }
        Commands::Migrate => {
            let pool = connect(&config).await?;
            let applied = lovetrip_db::run_migrations(&pool).await?;
            println!("applied {applied} migrations");
            Ok(())
        }
    }
}

async fn connect(config: &lovetrip_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool = lovetrip_db::connect_pool(
        &config.database_url,
        lovetrip_db::PoolConfig::from_app_config(config),
    )
    .await?;
    Ok(pool)
}
