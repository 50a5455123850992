//! Paged, sortable, filterable asset listing.
//!
//! - [`state`] holds sort column, direction, filter and page.
//! - [`source`] binds the generic paginator to the asset endpoint.
//! - [`controller`] turns user actions into fetch tickets and applies results.
//! - [`driver`] runs tickets concurrently.
//! - [`view`] is the model handed to renderers.

pub mod controller;
pub mod driver;
pub mod source;
pub mod state;
pub mod view;

pub use controller::{Applied, AssetListController, AssetSink, FetchTicket};
pub use driver::ListingDriver;
pub use source::{PagedAssetSource, asset_profile, paged_asset_source};
pub use state::{DATE_COLUMN, NAME_COLUMN, SortColumn, SortFilterState};
pub use view::{AssetRow, ListingView};
