//! `assetlib list`: print one page of assets.
//!
//! Flags are replayed as the user actions they stand for, in the order a
//! person would click them: sort toggles, then the filter, then the page.
//! Only the final ticket is executed.

use anyhow::Result;

use assetlib::config::Config;
use assetlib::constants::ALL_FILTER_LABEL;
use assetlib::listing::{ListingDriver, paged_asset_source};
use assetlib::ui::terminal::TableRenderer;

use crate::ListArgs;

/// Execute the list command.
pub async fn execute(config: &Config, args: &ListArgs) -> Result<()> {
    super::check_config(config)?;

    let source = paged_asset_source(config.client()?);
    let mut driver = ListingDriver::new(&source);
    let page_size = args.page_size.unwrap_or(config.listing.page_size);
    let mut controller = super::listing(config, page_size, TableRenderer::default())?;

    let mut ticket = controller.start();
    for sort in &args.sort {
        ticket = controller.toggle_sort(sort.column())?;
    }
    if args.filter != ALL_FILTER_LABEL {
        ticket = controller.select_filter(&args.filter);
    }
    let page = args.page.saturating_sub(1);
    if page > 0 {
        ticket = controller.set_page(page);
    }

    super::run_ticket(&mut driver, &mut controller, ticket).await
}
