//! `tiers` sub-commands.

use std::path::PathBuf;

use clap::Subcommand;
use giftbooster_core::ShopDomain;
use sqlx::SqlitePool;

use crate::parse_shop;

/// Sub-commands available under `tiers`.
#[derive(Debug, Subcommand)]
pub enum TiersCommands {
    /// Print the shop's tiers as JSON
    List {
        #[arg(long, value_parser = parse_shop)]
        shop: ShopDomain,
    },
    /// Validate a YAML tier file and replace the shop's tiers with it
    Import {
        #[arg(long, value_parser = parse_shop)]
        shop: ShopDomain,

        #[arg(long)]
        file: PathBuf,
    },
}

/// # Errors
///
/// Returns an error if the tier file is invalid or a database call fails.
pub(crate) async fn run(pool: &SqlitePool, command: TiersCommands) -> anyhow::Result<()> {
    match command {
        TiersCommands::List { shop } => {
            let tiers = giftbooster_db::list_gift_tiers(pool, &shop).await?;
            println!("{}", serde_json::to_string_pretty(&tiers)?);
        }
        TiersCommands::Import { shop, file } => {
            let drafts = giftbooster_core::load_tier_file(&file)?;
            let saved = giftbooster_db::replace_gift_tiers(pool, &shop, &drafts).await?;
            tracing::info!(
                shop = %shop,
                tiers = saved.len(),
                path = %file.display(),
                "imported gift tiers"
            );
            println!("{}", serde_json::to_string_pretty(&saved)?);
        }
    }
    Ok(())
}
