//! Collaborator interfaces the controllers talk to.
//!
//! Controllers hold these as generic parameters and only ever push view
//! models into them; nothing here feeds state back into a controller.
//! [`terminal`] provides the implementations the CLI uses.

pub mod terminal;

use crate::listing::ListingView;

/// Loading indicator shown while a listing fetch is outstanding.
pub trait LoadingIndicator {
    fn show(&mut self);
    fn hide(&mut self);
}

/// Modal chrome around the upload affordance.
pub trait Modal {
    fn show(&mut self);
    fn hide(&mut self);
}

/// Dismissible notifications.
pub trait Notifier {
    /// Show an error notification.
    fn error(&mut self, title: &str, message: &str);
    /// Dismiss the current notification, if any.
    fn dismiss(&mut self);
}

/// Projects a listing view model to output.
pub trait AssetListRenderer {
    fn render(&mut self, view: &ListingView);
}

/// Upload progress surface.
///
/// Every call replaces what the previous call displayed.
pub trait UploadView: Modal {
    /// Clear any previous upload's progress, file name and result.
    fn reset(&mut self);
    /// A file passed validation and its transfer is starting.
    fn started(&mut self, filename: &str);
    /// Progress in percent, 0 through 100.
    fn progress(&mut self, percent: u8);
    /// Terminal success at 100%: the asset's portable URL and the server
    /// message.
    fn finished(&mut self, portable_url: &str, message: &str, again_label: &str);
    /// Terminal failure. Progress is shown as 0%.
    fn failed(&mut self, message: &str, again_label: &str);
}

/// Analytics sink.
pub trait Analytics {
    fn track(&mut self, event: &str, properties: serde_json::Value);
}

/// Translation lookup for user-facing text.
///
/// Keys are the English message ids; placeholders in `{braces}` survive
/// translation and are substituted by the caller.
pub trait Translate: Send + Sync {
    fn t(&self, key: &str) -> String;
}

/// Translator that returns the message id unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Translate for Passthrough {
    fn t(&self, key: &str) -> String {
        key.to_string()
    }
}

/// No-op loading indicator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLoading;

impl LoadingIndicator for NoLoading {
    fn show(&mut self) {}
    fn hide(&mut self) {}
}
