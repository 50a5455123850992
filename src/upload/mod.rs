//! Chunked uploads.
//!
//! [`UploadSession`] is the per-file state machine, [`UploadTransport`] sends
//! one chunk, and [`UploadController`] drives sessions for a batch of files
//! and reflects them on an [`crate::ui::UploadView`].

pub mod controller;
pub mod session;
pub mod transport;

use std::fmt;

pub use controller::{UploadController, UploadReport, UploadSettings};
pub use session::{FileInfo, FileSource, SelectedFile, UploadLimits, UploadSession, UploadState};
pub use transport::{ChunkRange, UploadResponse, UploadTransport};

/// Upload state without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Validating,
    Uploading,
    Succeeded,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Uploading => "uploading",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}
