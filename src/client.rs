//! HTTP client for the course asset endpoint.
//!
//! One [`StudioClient`] serves listing fetches ([`PageFetcher`]), chunked
//! uploads ([`UploadTransport`]), deletes and lock toggles. Timeouts come
//! from configuration and are enforced by reqwest; nothing here retries.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_DISPOSITION, CONTENT_RANGE};
use reqwest::multipart::{Form, Part};
use tracing::debug;
use url::Url;

use crate::asset::AssetRecord;
use crate::constants::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};
use crate::error::{Error, Result};
use crate::paging::PageFetcher;
use crate::upload::{ChunkRange, FileInfo, UploadResponse, UploadTransport};

const JSON: &str = "application/json";

/// Client bound to one course's asset endpoint.
#[derive(Debug, Clone)]
pub struct StudioClient {
    http: reqwest::Client,
    assets_url: Url,
}

impl StudioClient {
    /// Client for `{base_url}{assets_path}` with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`] if the URL does not parse, or
    /// [`Error::Config`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, assets_path: &str) -> Result<Self> {
        Self::with_timeouts(
            base_url,
            assets_path,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    }

    /// Client with explicit request and connect timeouts.
    ///
    /// # Errors
    ///
    /// Same as [`StudioClient::new`].
    pub fn with_timeouts(
        base_url: &str,
        assets_path: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let assets_url = Url::parse(base_url)?.join(assets_path)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { http, assets_url })
    }

    /// The listing and upload URL.
    #[must_use]
    pub fn assets_url(&self) -> &Url {
        &self.assets_url
    }

    /// URL addressing one asset. Asset keys are appended verbatim, since
    /// they commonly contain `:` and `@`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`] if the result does not parse.
    pub fn asset_url(&self, asset_id: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}{asset_id}", self.assets_url))?)
    }

    /// Delete an asset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] on network failure or a non-success
    /// status.
    pub async fn delete(&self, asset_id: &str) -> Result<()> {
        let url = self.asset_url(asset_id)?;
        debug!(url = %url, "Deleting asset");
        let response = self
            .http
            .delete(url)
            .header(ACCEPT, JSON)
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;
        check_status(response).await?;
        Ok(())
    }

    /// Lock or unlock an asset and return the server's updated record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] on network failure or a non-success
    /// status, and [`Error::MalformedResponse`] if the body is not an asset.
    pub async fn set_locked(&self, record: &AssetRecord, locked: bool) -> Result<AssetRecord> {
        let url = self.asset_url(record.key())?;
        debug!(url = %url, locked, "Updating asset lock");
        let response = self
            .http
            .post(url)
            .header(ACCEPT, JSON)
            .json(&record.with_locked(locked))
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;
        let response = check_status(response).await?;
        response.json().await.map_err(Error::malformed)
    }
}

#[async_trait]
impl PageFetcher for StudioClient {
    async fn get_json(&self, query: &[(&'static str, String)]) -> Result<serde_json::Value> {
        let response = self
            .http
            .get(self.assets_url.clone())
            .query(query)
            .header(ACCEPT, JSON)
            .send()
            .await
            .map_err(Error::fetch)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::fetch(server_message(status, &body)));
        }
        response.json().await.map_err(Error::malformed)
    }
}

#[async_trait]
impl UploadTransport for StudioClient {
    async fn send_chunk(
        &self,
        file: &FileInfo,
        chunk: &ChunkRange,
        data: Bytes,
    ) -> Result<Option<UploadResponse>> {
        let part = Part::bytes(data.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| Error::transport(e.to_string()))?;
        let form = Form::new().part("file", part);

        let mut request = self
            .http
            .post(self.assets_url.clone())
            .header(ACCEPT, JSON)
            .header(CONTENT_DISPOSITION, content_disposition(&file.name))
            .multipart(form);
        if let Some(range) = chunk.content_range() {
            request = request.header(CONTENT_RANGE, range);
        }

        debug!(file = %file.name, chunk = chunk.index, start = chunk.start, end = chunk.end, total = chunk.total, "Sending chunk");
        let response = request
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;
        let response = check_status(response).await?;

        if !chunk.is_last() {
            return Ok(None);
        }
        let body = response
            .json::<UploadResponse>()
            .await
            .map_err(|e| Error::transport(format!("invalid upload response: {e}")))?;
        Ok(Some(body))
    }
}

/// Pass a success response through; turn anything else into a transport
/// error carrying the server's message.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::transport(server_message(status, &body)))
}

/// The server's `error` or `msg` field when the body carries one, otherwise
/// the status line.
fn server_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["error", "msg"]
                .iter()
                .find_map(|k| v.get(k).and_then(|m| m.as_str()).map(str::to_string))
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.to_string())
}

fn content_disposition(filename: &str) -> String {
    let escaped = filename.replace('\\', "\\\\").replace('"', "\\\"");
    format!("attachment; filename=\"{escaped}\"")
}
