//! Per-file upload state machine.
//!
//! ```text
//! Idle -> Validating -> Uploading -> Succeeded
//!              |             |
//!              +-> Failed <--+
//! ```
//!
//! Transport callbacks (`on_progress`, `on_done`, `on_fail`) are the only way
//! out of `Uploading`. Anything driven out of order is rejected with
//! [`Error::InvalidTransition`] and leaves the session untouched.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::asset::AssetRecord;
use crate::constants::{BYTES_PER_MB, DEFAULT_CHUNK_SIZE_MB, DEFAULT_MAX_FILE_SIZE_MB};
use crate::error::{Error, Result};

use super::Phase;
use super::transport::{ChunkRange, UploadResponse};

/// Name, size and MIME type of a file to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub content_type: String,
}

impl FileInfo {
    /// Describe a file, guessing the MIME type from its name.
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        let name = name.into();
        let content_type = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            name,
            size,
            content_type,
        }
    }
}

/// Where a selected file's bytes come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    Memory(Bytes),
}

/// A file chosen for upload.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub info: FileInfo,
    pub source: FileSource,
}

impl SelectedFile {
    /// Select a file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be inspected.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| Error::io(format!("reading {}", path.display()), e))?;
        if !metadata.is_file() {
            return Err(Error::io(
                format!("reading {}", path.display()),
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            info: FileInfo::new(name, metadata.len()),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// Select in-memory content.
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            info: FileInfo::new(name, data.len() as u64),
            source: FileSource::Memory(data),
        }
    }

    /// Read the bytes of one chunk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, including when it
    /// shrank since it was selected.
    pub async fn read_chunk(&self, chunk: &ChunkRange) -> Result<Bytes> {
        match &self.source {
            FileSource::Memory(data) => {
                let start = usize::try_from(chunk.start).unwrap_or(usize::MAX);
                let end = usize::try_from(chunk.end).unwrap_or(usize::MAX);
                if end > data.len() || start > end {
                    return Err(Error::io(
                        format!("reading {}", self.info.name),
                        std::io::ErrorKind::UnexpectedEof.into(),
                    ));
                }
                Ok(data.slice(start..end))
            },
            FileSource::Path(path) => {
                let context = || format!("reading {}", path.display());
                let mut file = tokio::fs::File::open(path)
                    .await
                    .map_err(|e| Error::io(context(), e))?;
                file.seek(std::io::SeekFrom::Start(chunk.start))
                    .await
                    .map_err(|e| Error::io(context(), e))?;
                let len = usize::try_from(chunk.len())
                    .map_err(|_| Error::io(context(), std::io::ErrorKind::InvalidInput.into()))?;
                let mut buf = vec![0u8; len];
                file.read_exact(&mut buf)
                    .await
                    .map_err(|e| Error::io(context(), e))?;
                Ok(Bytes::from(buf))
            },
        }
    }
}

/// Size limits applied to each upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub chunk_size_bytes: u64,
    pub max_file_size_bytes: u64,
    /// Limit as configured, for messages.
    pub max_file_size_mb: u64,
}

impl UploadLimits {
    /// Limits from megabyte settings (1 MB = 1000 × 1000 bytes).
    #[must_use]
    pub fn from_megabytes(chunk_size_mb: u64, max_file_size_mb: u64) -> Self {
        Self {
            chunk_size_bytes: chunk_size_mb.saturating_mul(BYTES_PER_MB),
            max_file_size_bytes: max_file_size_mb.saturating_mul(BYTES_PER_MB),
            max_file_size_mb,
        }
    }
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self::from_megabytes(DEFAULT_CHUNK_SIZE_MB, DEFAULT_MAX_FILE_SIZE_MB)
    }
}

/// Upload state with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Validating,
    Uploading,
    Succeeded { asset: AssetRecord, msg: String },
    Failed { message: String },
}

impl UploadState {
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            Self::Idle => Phase::Idle,
            Self::Validating => Phase::Validating,
            Self::Uploading => Phase::Uploading,
            Self::Succeeded { .. } => Phase::Succeeded,
            Self::Failed { .. } => Phase::Failed,
        }
    }
}

/// One file's upload.
#[derive(Debug, Clone)]
pub struct UploadSession {
    limits: UploadLimits,
    file: Option<SelectedFile>,
    state: UploadState,
    percent: u8,
    history: Vec<Phase>,
}

impl UploadSession {
    #[must_use]
    pub fn new(limits: UploadLimits) -> Self {
        Self {
            limits,
            file: None,
            state: UploadState::Idle,
            percent: 0,
            history: vec![Phase::Idle],
        }
    }

    /// Choose the file. Idle → Validating.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] unless the session is idle.
    pub fn select(&mut self, file: SelectedFile) -> Result<()> {
        self.expect_phase(Phase::Idle, Phase::Validating)?;
        self.file = Some(file);
        self.enter(UploadState::Validating);
        Ok(())
    }

    /// Check the selected file against the size limit. Validating →
    /// Uploading, or Validating → Failed for an oversized file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileTooLarge`] when the file exceeds the limit (the
    /// session is then Failed), or [`Error::InvalidTransition`] when not
    /// validating.
    pub fn validate(&mut self) -> Result<()> {
        let Some(file) = self.file.as_ref().filter(|_| self.phase() == Phase::Validating) else {
            return Err(Error::InvalidTransition {
                from: self.phase(),
                to: Phase::Uploading,
            });
        };

        if file.info.size > self.limits.max_file_size_bytes {
            let err = Error::FileTooLarge {
                filename: file.info.name.clone(),
                max_mb: self.limits.max_file_size_mb,
            };
            tracing::debug!(file = %file.info.name, size = file.info.size, "Rejected oversized file");
            self.enter(UploadState::Failed {
                message: err.to_string(),
            });
            return Err(err);
        }

        self.enter(UploadState::Uploading);
        Ok(())
    }

    /// Byte ranges to send, in order. An empty file is one empty chunk.
    #[must_use]
    pub fn chunks(&self) -> Vec<ChunkRange> {
        let total = self.file.as_ref().map_or(0, |f| f.info.size);
        if total == 0 {
            return vec![ChunkRange {
                index: 0,
                start: 0,
                end: 0,
                total: 0,
            }];
        }

        let step = if self.limits.chunk_size_bytes == 0 {
            total
        } else {
            self.limits.chunk_size_bytes
        };
        let mut chunks = Vec::new();
        let mut start = 0;
        while start < total {
            let end = start.saturating_add(step).min(total);
            chunks.push(ChunkRange {
                index: chunks.len(),
                start,
                end,
                total,
            });
            start = end;
        }
        chunks
    }

    /// Record cumulative bytes transferred and return the percentage shown.
    ///
    /// Reports that would move progress backwards are ignored, as are
    /// reports outside `Uploading`.
    pub fn on_progress(&mut self, loaded: u64) -> u8 {
        if self.phase() != Phase::Uploading {
            return self.percent;
        }
        let total = self.file.as_ref().map_or(0, |f| f.info.size);
        self.percent = self.percent.max(percent(loaded, total));
        self.percent
    }

    /// Final chunk accepted. Uploading → Succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] unless uploading.
    pub fn on_done(&mut self, response: UploadResponse) -> Result<()> {
        self.expect_phase(Phase::Uploading, Phase::Succeeded)?;
        self.percent = 100;
        self.enter(UploadState::Succeeded {
            asset: response.asset,
            msg: response.msg,
        });
        Ok(())
    }

    /// Transfer failed. Uploading → Failed, keeping the message verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] unless uploading.
    pub fn on_fail(&mut self, message: impl Into<String>) -> Result<()> {
        self.expect_phase(Phase::Uploading, Phase::Failed)?;
        self.percent = 0;
        self.enter(UploadState::Failed {
            message: message.into(),
        });
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> &UploadState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    #[must_use]
    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    #[must_use]
    pub fn percent_complete(&self) -> u8 {
        self.percent
    }

    /// Failure message, if the session failed.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            UploadState::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Every phase entered so far, starting with `Idle`.
    #[must_use]
    pub fn transitions(&self) -> &[Phase] {
        &self.history
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase(), Phase::Succeeded | Phase::Failed)
    }

    fn expect_phase(&self, from: Phase, to: Phase) -> Result<()> {
        if self.phase() == from {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                from: self.phase(),
                to,
            })
        }
    }

    fn enter(&mut self, state: UploadState) {
        let phase = state.phase();
        tracing::trace!(from = %self.phase(), to = %phase, "Upload transition");
        self.state = state;
        self.history.push(phase);
    }
}

/// `floor(100 * loaded / total)`, capped at 100. An empty file is complete.
fn percent(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let loaded = u128::from(loaded.min(total));
    let pct = loaded * 100 / u128::from(total);
    u8::try_from(pct).unwrap_or(100)
}
