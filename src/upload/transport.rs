//! Chunk plan and the transport seam.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;

use crate::asset::AssetRecord;
use crate::error::Result;

use super::session::FileInfo;

/// One byte range of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    pub index: usize,
    /// First byte offset.
    pub start: u64,
    /// One past the last byte.
    pub end: u64,
    /// Size of the whole file.
    pub total: u64,
}

impl ChunkRange {
    #[must_use]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.end == self.total
    }

    /// `Content-Range` header value with an inclusive end, or `None` for an
    /// empty file where no byte range exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use assetlib::upload::ChunkRange;
    ///
    /// let chunk = ChunkRange { index: 0, start: 0, end: 10, total: 25 };
    /// assert_eq!(chunk.content_range().as_deref(), Some("bytes 0-9/25"));
    /// ```
    #[must_use]
    pub fn content_range(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(format!("bytes {}-{}/{}", self.start, self.end - 1, self.total))
    }
}

/// Body of the final chunk's response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    pub asset: AssetRecord,
    #[serde(default)]
    pub msg: String,
}

/// Sends upload chunks.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    /// Send one chunk.
    ///
    /// Returns `Some` with the completion payload for the final chunk and
    /// `None` for intermediate ones.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Transport`] with a user-facing message on any
    /// network failure or non-success response.
    async fn send_chunk(
        &self,
        file: &FileInfo,
        chunk: &ChunkRange,
        data: Bytes,
    ) -> Result<Option<UploadResponse>>;
}
