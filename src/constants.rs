//! Shared defaults and protocol constants.

/// Rows requested per listing page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Upper bound on the configured page size before validation warns.
pub const LARGE_PAGE_SIZE: usize = 500;

/// Default chunk size for uploads, in MB.
pub const DEFAULT_CHUNK_SIZE_MB: u64 = 10;

/// Default maximum upload size, in MB.
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 10;

/// The server counts megabytes in decimal units.
pub const BYTES_PER_MB: u64 = 1000 * 1000;

/// Files accepted per upload action.
pub const MAX_FILES_PER_UPLOAD: usize = 100;

/// Value of the fixed `format` listing parameter.
pub const LISTING_FORMAT: &str = "json";

/// Sentinel filter value meaning "no filter".
pub const ALL_FILTER_LABEL: &str = "ALL";

/// HTTP request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Configuration file looked up in the working and config directories.
pub const CONFIG_FILE_NAME: &str = "assetlib.toml";

/// Analytics event emitted after a delete.
pub const EVENT_DELETED_ASSET: &str = "Deleted Asset";

/// Analytics event emitted after a successful upload.
pub const EVENT_UPLOADED_FILE: &str = "Uploaded a File";
