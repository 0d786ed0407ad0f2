mod check;
mod tiers;

use clap::{Parser, Subcommand};
use giftbooster_core::{LineItem, ShopDomain};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use crate::tiers::TiersCommands;

#[derive(Debug, Parser)]
#[command(name = "giftbooster-cli")]
#[command(about = "Gift Booster command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Inspect or replace a shop's gift tiers
    Tiers {
        #[command(subcommand)]
        command: TiersCommands,
    },
    /// Evaluate a cart against a shop's stored tiers
    Check {
        #[arg(long, value_parser = parse_shop)]
        shop: ShopDomain,

        /// Cart subtotal
        #[arg(long)]
        total: Decimal,

        /// Cart line as PRODUCT:VARIANT; either side may be empty
        #[arg(long = "item", value_parser = check::parse_line_item)]
        items: Vec<LineItem>,
    },
    /// Print the analytics summary for a shop
    Analytics {
        #[arg(long, value_parser = parse_shop)]
        shop: ShopDomain,

        /// Reporting window in days (1-365)
        #[arg(long)]
        days: Option<i64>,
    },
}

pub(crate) fn parse_shop(raw: &str) -> Result<ShopDomain, String> {
    ShopDomain::parse(raw).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("giftbooster-cli: run with --help to list commands");
        return Ok(());
    };

    let config = giftbooster_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pool_config = giftbooster_db::PoolConfig::from_app_config(&config);
    let pool = giftbooster_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Migrate => {
            let applied = giftbooster_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        Commands::Tiers { command } => {
            giftbooster_db::run_migrations(&pool).await?;
            tiers::run(&pool, command).await?;
        }
        Commands::Check { shop, total, items } => {
            giftbooster_db::run_migrations(&pool).await?;
            check::run_check(&pool, &shop, total, items).await?;
        }
        Commands::Analytics { shop, days } => {
            giftbooster_db::run_migrations(&pool).await?;
            let days = giftbooster_core::normalize_period_days(days);
            let summary = giftbooster_db::summarize_analytics(&pool, &shop, days).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    pool.close().await;
    Ok(())
}
