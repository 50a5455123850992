//! Configuration for the asset library client.
//!
//! Settings are read from `assetlib.toml`. Every section is optional and
//! falls back to defaults, so an empty file (or no file at all) yields a
//! usable configuration once `server.base_url` is provided:
//!
//! - [`Config`] - Root configuration struct
//! - [`ServerConfig`] - Endpoint and timeouts
//! - [`ListingConfig`] - Listing page size
//! - [`UploadConfig`] - Chunk and file size limits
//!
//! The file is looked up at an explicit path, then in the working
//! directory, then under the user's config directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::asset::TypeFilterTable;
use crate::client::StudioClient;
use crate::constants;
use crate::upload::{UploadLimits, UploadSettings};

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Non-fatal warnings that should be logged but don't prevent operation.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if there are any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// assetlib.toml configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    /// Extension overrides per type bucket, keyed by bucket label.
    #[serde(default)]
    pub filters: BTreeMap<String, Vec<String>>,
}

/// Where the asset endpoint lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_assets_path")]
    pub assets_path: String,
    /// Course identifier attached to analytics events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            assets_path: default_assets_path(),
            course_id: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Upload limits in decimal megabytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_chunk_size_mb")]
    pub chunk_size_mb: u64,
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
    /// Where to send users whose file exceeds the limit. Empty disables it.
    #[serde(default)]
    pub max_file_size_redirect_url: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            chunk_size_mb: default_chunk_size_mb(),
            max_file_size_mb: default_max_file_size_mb(),
            max_file_size_redirect_url: String::new(),
        }
    }
}

fn default_assets_path() -> String {
    "/assets/".to_string()
}

fn default_timeout_secs() -> u64 {
    constants::DEFAULT_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    constants::DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_page_size() -> usize {
    constants::DEFAULT_PAGE_SIZE
}

fn default_chunk_size_mb() -> u64 {
    constants::DEFAULT_CHUNK_SIZE_MB
}

fn default_max_file_size_mb() -> u64 {
    constants::DEFAULT_MAX_FILE_SIZE_MB
}

impl Config {
    /// Load configuration from the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (IO error)
    /// - The file contains invalid TOML syntax
    /// - Fields have invalid types
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Locate and load the configuration.
    ///
    /// An explicit path must exist. Otherwise the first existing file among
    /// [`Config::search_paths`] is used, or the defaults when none exists.
    /// Returns the path that was loaded, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be read or parsed.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load_from(path)?, Some(path.to_path_buf())));
        }

        for path in Self::search_paths() {
            if path.is_file() {
                tracing::debug!(path = %path.display(), "Loading configuration");
                return Ok((Self::load_from(&path)?, Some(path)));
            }
        }

        tracing::debug!("No configuration file found, using defaults");
        Ok((Self::default(), None))
    }

    /// Implicit config locations, in lookup order.
    #[must_use]
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(constants::CONFIG_FILE_NAME)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("assetlib").join(constants::CONFIG_FILE_NAME));
        }
        paths
    }

    /// Validate configuration with comprehensive checks.
    ///
    /// Returns a `ValidationResult` containing any non-fatal warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails with one or more errors:
    /// - Empty or unparsable base URL
    /// - Zero page size, chunk size or maximum file size
    /// - Unparsable redirect URL
    /// - Unknown filter buckets
    pub fn validate(&self) -> Result<ValidationResult> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        // 1. Server
        if self.server.base_url.is_empty() {
            errors.push(
                "server.base_url cannot be empty\n  \
                 Example: base_url = \"https://studio.example.com\""
                    .to_string(),
            );
        } else if let Err(e) = Url::parse(&self.server.base_url) {
            errors.push(format!(
                "server.base_url is not a valid URL: {} ({e})",
                self.server.base_url
            ));
        }

        if !self.server.assets_path.starts_with('/') {
            errors.push(format!(
                "server.assets_path must start with '/' (got: '{}')",
                self.server.assets_path
            ));
        } else if !self.server.assets_path.ends_with('/') {
            warnings.push(format!(
                "server.assets_path '{}' has no trailing '/'\n  \
                 Asset ids are appended directly to it",
                self.server.assets_path
            ));
        }

        if self.server.timeout_secs == 0 {
            errors.push("server.timeout_secs cannot be 0".to_string());
        }

        // 2. Listing
        if self.listing.page_size == 0 {
            errors.push(format!(
                "listing.page_size cannot be 0. Set a positive number (default: {})",
                constants::DEFAULT_PAGE_SIZE
            ));
        } else if self.listing.page_size > constants::LARGE_PAGE_SIZE {
            warnings.push(format!(
                "listing.page_size {} is very high (> {})\n  \
                 Large pages make every listing request slower",
                self.listing.page_size,
                constants::LARGE_PAGE_SIZE
            ));
        }

        // 3. Upload
        if self.upload.chunk_size_mb == 0 {
            errors.push("upload.chunk_size_mb cannot be 0".to_string());
        }
        if self.upload.max_file_size_mb == 0 {
            errors.push("upload.max_file_size_mb cannot be 0".to_string());
        }
        if self.upload.chunk_size_mb > self.upload.max_file_size_mb
            && self.upload.max_file_size_mb > 0
        {
            warnings.push(format!(
                "upload.chunk_size_mb ({}) is larger than upload.max_file_size_mb ({})\n  \
                 Every accepted file will be sent as a single chunk",
                self.upload.chunk_size_mb, self.upload.max_file_size_mb
            ));
        }
        let redirect = &self.upload.max_file_size_redirect_url;
        if !redirect.is_empty()
            && let Err(e) = Url::parse(redirect)
        {
            errors.push(format!(
                "upload.max_file_size_redirect_url is not a valid URL: {redirect} ({e})"
            ));
        }

        // 4. Filters
        if let Err(e) = TypeFilterTable::with_overrides(&self.filters) {
            errors.push(format!("filters: {e}"));
        }

        if !errors.is_empty() {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }

        Ok(ValidationResult { warnings })
    }

    /// Upload limits and redirect derived from the `[upload]` section.
    #[must_use]
    pub fn upload_settings(&self) -> UploadSettings {
        let redirect = &self.upload.max_file_size_redirect_url;
        UploadSettings {
            limits: UploadLimits::from_megabytes(
                self.upload.chunk_size_mb,
                self.upload.max_file_size_mb,
            ),
            redirect_url: (!redirect.is_empty()).then(|| redirect.clone()),
        }
    }

    /// The extension table with `[filters]` applied.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown bucket names.
    pub fn type_filters(&self) -> Result<TypeFilterTable> {
        TypeFilterTable::with_overrides(&self.filters).context("Invalid [filters] section")
    }

    /// HTTP client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the client cannot be built.
    pub fn client(&self) -> Result<StudioClient> {
        StudioClient::with_timeouts(
            &self.server.base_url,
            &self.server.assets_path,
            Duration::from_secs(self.server.timeout_secs),
            Duration::from_secs(self.server.connect_timeout_secs),
        )
        .with_context(|| {
            format!(
                "Failed to create client for {}{}",
                self.server.base_url, self.server.assets_path
            )
        })
    }
}
