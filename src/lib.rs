//! Client library for paged course-asset libraries.
//!
//! The crate is split into a pure state/controller layer and the pieces that
//! talk to the outside world:
//!
//! - [`asset`] - Asset records, type derivation and filter buckets
//! - [`paging`] - Generic paged fetching ([`paging::Paginator`])
//! - [`listing`] - Sort/filter state and the asset list controller
//! - [`upload`] - Chunked upload sessions and the upload controller
//! - [`client`] - HTTP transport for listing, upload, delete and lock requests
//! - [`ui`] - Collaborator traits and their terminal implementations
//! - [`config`] - `assetlib.toml` loading and validation
//!
//! Controllers never perform I/O themselves. Listing mutations hand back a
//! [`listing::FetchTicket`] that a driver executes and feeds back through
//! [`listing::AssetListController::apply_fetch`]; only the most recently
//! issued ticket is ever rendered.

pub mod asset;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod listing;
pub mod paging;
pub mod ui;
pub mod upload;
pub mod utils;

pub use asset::{AssetRecord, asset_type};
pub use client::StudioClient;
pub use error::{Error, Result};
pub use listing::{AssetListController, FetchTicket, SortFilterState};
pub use paging::{Page, PageMeta, PageParams, Paginator};
pub use upload::{UploadController, UploadSession, UploadState};
