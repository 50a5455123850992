//! `assetlib lock` / `assetlib unlock`.

use anyhow::{Context, Result};

use assetlib::config::Config;
use assetlib::listing::{ListingDriver, paged_asset_source};
use assetlib::ui::terminal::TableRenderer;

/// Execute the lock or unlock command.
///
/// The asset is located by walking the listing page by page, newest first,
/// then updated and shown on the page it was found on.
pub async fn execute(config: &Config, asset_id: &str, locked: bool) -> Result<()> {
    super::check_config(config)?;

    let client = config.client()?;
    let source = paged_asset_source(client.clone());
    let mut driver = ListingDriver::new(&source);
    let mut controller = super::listing(config, config.listing.page_size, TableRenderer::quiet())?;

    let Some(record) = driver
        .find_asset(&mut controller, asset_id)
        .await
        .context("Failed to load the asset listing")?
    else {
        anyhow::bail!("Asset not found: {asset_id}");
    };

    if record.locked == locked {
        println!(
            "{} is already {}",
            record.display_name,
            if locked { "locked" } else { "unlocked" }
        );
        return Ok(());
    }

    let updated = client
        .set_locked(&record, locked)
        .await
        .with_context(|| format!("Failed to update lock on {asset_id}"))?;
    controller.on_lock_changed(updated);
    print!("{}", controller.renderer().last());
    Ok(())
}
