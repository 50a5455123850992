//! `assetlib upload`: chunked upload of one or more files.

use std::path::PathBuf;

use anyhow::{Context, Result};

use assetlib::config::Config;
use assetlib::constants::MAX_FILES_PER_UPLOAD;
use assetlib::listing::{ListingDriver, paged_asset_source};
use assetlib::ui::terminal::{TableRenderer, TerminalNotifier, TerminalUploadView};
use assetlib::upload::{SelectedFile, UploadController};
use assetlib::utils::{format_bytes, plural};

/// Execute the upload command.
///
/// Each file is uploaded on its own; a failure does not stop the rest. After
/// any success the first page (newest first) is fetched and printed.
pub async fn execute(config: &Config, files: &[PathBuf]) -> Result<()> {
    super::check_config(config)?;

    if files.len() > MAX_FILES_PER_UPLOAD {
        anyhow::bail!(
            "Too many files: {} selected, at most {MAX_FILES_PER_UPLOAD} per upload",
            files.len()
        );
    }

    let mut selected = Vec::with_capacity(files.len());
    for path in files {
        let file = SelectedFile::from_path(path)
            .await
            .with_context(|| format!("Cannot upload {}", path.display()))?;
        tracing::debug!(file = %file.info.name, size = %format_bytes(file.info.size), "Selected file");
        selected.push(file);
    }

    let client = config.client()?;
    let source = paged_asset_source(client.clone());
    let mut driver = ListingDriver::new(&source);
    let mut listing = super::listing(config, config.listing.page_size, TableRenderer::quiet())?;

    let mut uploader = UploadController::new(
        client,
        TerminalUploadView::default(),
        TerminalNotifier::default(),
        config.upload_settings(),
    );
    uploader.open();
    let report = uploader.upload_all(selected, &mut listing).await?;
    uploader.close();

    if let Some(ticket) = report.refresh.clone() {
        super::run_ticket(&mut driver, &mut listing, ticket).await?;
        print!("\n{}", listing.renderer().last());
    }

    let failed = report.failed();
    println!(
        "\n{} uploaded, {} failed",
        plural(report.succeeded(), "file", "files"),
        failed
    );
    if failed > 0 {
        anyhow::bail!("{} could not be uploaded", plural(failed, "file", "files"));
    }
    Ok(())
}
