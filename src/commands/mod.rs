//! CLI command implementations.
//!
//! - [`list`] - Print one page of the listing
//! - [`upload`] - Chunked upload of one or more files
//! - [`delete`] - Delete an asset and show the refreshed page
//! - [`lock`] - Lock or unlock an asset
//! - [`show_config`] - Print the effective configuration

pub mod delete;
pub mod list;
pub mod lock;
pub mod show_config;
pub mod upload;

use anyhow::Result;

use assetlib::FetchTicket;
use assetlib::config::Config;
use assetlib::listing::{Applied, AssetListController, ListingDriver, SortFilterState};
use assetlib::paging::PageFetcher;
use assetlib::ui::AssetListRenderer;
use assetlib::ui::terminal::{TerminalLoading, TracingAnalytics};

/// Listing controller wired to terminal collaborators.
pub type Listing<R> = AssetListController<R, TerminalLoading, TracingAnalytics>;

/// Validate the configuration, logging any warnings.
pub fn check_config(config: &Config) -> Result<()> {
    let result = config.validate()?;
    for warning in &result.warnings {
        tracing::warn!("{warning}");
    }
    Ok(())
}

/// Build a listing controller from configuration.
pub fn listing<R: AssetListRenderer>(
    config: &Config,
    page_size: usize,
    renderer: R,
) -> Result<Listing<R>> {
    let mut controller = AssetListController::new(
        SortFilterState::for_assets(page_size),
        renderer,
        TerminalLoading::default(),
        TracingAnalytics,
    )
    .with_types(config.type_filters()?);
    if let Some(course) = &config.server.course_id {
        controller = controller.with_course(course.clone());
    }
    Ok(controller)
}

/// Execute one ticket and apply its result.
///
/// # Errors
///
/// Fails if the fetch failed; the cause has already been logged.
pub async fn run_ticket<F: PageFetcher, R: AssetListRenderer>(
    driver: &mut ListingDriver<'_, F>,
    controller: &mut Listing<R>,
    ticket: FetchTicket,
) -> Result<()> {
    driver.submit(ticket);
    let applied = driver.drain(controller).await;
    if applied.contains(&Applied::Failed) {
        anyhow::bail!("Failed to load the asset listing");
    }
    Ok(())
}

