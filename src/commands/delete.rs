//! `assetlib delete`: delete an asset, then re-fetch the listing's current page.

use anyhow::{Context, Result};

use assetlib::config::Config;
use assetlib::listing::{ListingDriver, paged_asset_source};
use assetlib::ui::terminal::TableRenderer;

/// Execute the delete command.
///
/// A failed delete is reported and nothing is re-fetched.
pub async fn execute(config: &Config, asset_id: &str) -> Result<()> {
    super::check_config(config)?;

    let client = config.client()?;
    client
        .delete(asset_id)
        .await
        .with_context(|| format!("Failed to delete asset {asset_id}"))?;
    println!("Deleted {asset_id}\n");

    let source = paged_asset_source(client);
    let mut driver = ListingDriver::new(&source);
    let mut controller = super::listing(config, config.listing.page_size, TableRenderer::default())?;
    let ticket = controller.on_deleted(asset_id);
    super::run_ticket(&mut driver, &mut controller, ticket).await
}
