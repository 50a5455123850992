//! Drives upload sessions for a batch of files.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::constants::MAX_FILES_PER_UPLOAD;
use crate::error::{Error, Result};
use crate::listing::{AssetSink, FetchTicket};
use crate::ui::{Notifier, Passthrough, Translate, UploadView};

use super::session::{SelectedFile, UploadLimits, UploadSession, UploadState};
use super::transport::UploadTransport;

const MSG_COULD_NOT_UPLOAD: &str = "Your file could not be uploaded";
const MSG_TOO_LARGE: &str = "File {filename} exceeds maximum size of {maxFileSizeInMBs} MB";
const MSG_REDIRECT: &str =
    "Please follow the instructions here to upload a file elsewhere and link to it: {maxFileSizeRedirectUrl}";
const MSG_MAX_EXCEEDED: &str = "Max file size exceeded";
const MSG_LOAD_ANOTHER: &str = "Load Another File";
const MSG_NO_RESPONSE: &str = "Upload finished without a response from the server";

/// Upload limits plus where to send users whose file is too large.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSettings {
    pub limits: UploadLimits,
    /// Empty or `None` disables the redirect sentence.
    pub redirect_url: Option<String>,
}

/// Outcome of one upload action.
#[derive(Debug)]
pub struct UploadReport {
    /// One terminal session per file, in selection order.
    pub sessions: Vec<UploadSession>,
    /// Listing refresh issued by the last successful upload.
    pub refresh: Option<FetchTicket>,
}

impl UploadReport {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.sessions
            .iter()
            .filter(|s| matches!(s.state(), UploadState::Succeeded { .. }))
            .count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.sessions.len() - self.succeeded()
    }
}

pub struct UploadController<T, V, N> {
    transport: T,
    view: V,
    notifier: N,
    settings: UploadSettings,
    i18n: Arc<dyn Translate>,
}

impl<T, V, N> UploadController<T, V, N>
where
    T: UploadTransport,
    V: UploadView,
    N: Notifier,
{
    pub fn new(transport: T, view: V, notifier: N, settings: UploadSettings) -> Self {
        Self {
            transport,
            view,
            notifier,
            settings,
            i18n: Arc::new(Passthrough),
        }
    }

    #[must_use]
    pub fn with_translator(mut self, i18n: Arc<dyn Translate>) -> Self {
        self.i18n = i18n;
        self
    }

    /// Open the upload view with no trace of a previous upload.
    pub fn open(&mut self) {
        self.view.reset();
        self.notifier.dismiss();
        self.view.show();
    }

    pub fn close(&mut self) {
        self.view.hide();
    }

    /// Upload each file in turn.
    ///
    /// Every file ends in a terminal session; per-file failures are reported
    /// on the view and in the returned sessions, not as an `Err`. Each
    /// success is handed to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooManyFiles`] before anything starts when more than
    /// [`MAX_FILES_PER_UPLOAD`] files are given.
    pub async fn upload_all<S: AssetSink>(
        &mut self,
        files: Vec<SelectedFile>,
        sink: &mut S,
    ) -> Result<UploadReport> {
        if files.len() > MAX_FILES_PER_UPLOAD {
            return Err(Error::TooManyFiles {
                count: files.len(),
                max: MAX_FILES_PER_UPLOAD,
            });
        }

        let mut sessions = Vec::with_capacity(files.len());
        let mut refresh = None;
        for file in files {
            let (session, ticket) = self.upload_one(file, sink).await?;
            if ticket.is_some() {
                refresh = ticket;
            }
            sessions.push(session);
        }
        Ok(UploadReport { sessions, refresh })
    }

    /// The size-limit notification body for a file.
    #[must_use]
    pub fn size_error_message(&self, filename: &str) -> String {
        let mut message = self
            .i18n
            .t(MSG_TOO_LARGE)
            .replace("{filename}", filename)
            .replace(
                "{maxFileSizeInMBs}",
                &self.settings.limits.max_file_size_mb.to_string(),
            );
        if let Some(url) = self.settings.redirect_url.as_deref()
            && !url.is_empty()
        {
            message.push(' ');
            message.push_str(&self.i18n.t(MSG_REDIRECT).replace("{maxFileSizeRedirectUrl}", url));
        }
        message
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn upload_one<S: AssetSink>(
        &mut self,
        file: SelectedFile,
        sink: &mut S,
    ) -> Result<(UploadSession, Option<FetchTicket>)> {
        let mut session = UploadSession::new(self.settings.limits);
        session.select(file.clone())?;

        match session.validate() {
            Ok(()) => {},
            Err(Error::FileTooLarge { filename, .. }) => {
                let title = self.i18n.t(MSG_COULD_NOT_UPLOAD);
                let body = self.size_error_message(&filename);
                self.notifier.error(&title, &body);
                self.view
                    .failed(&self.i18n.t(MSG_MAX_EXCEEDED), &self.i18n.t(MSG_LOAD_ANOTHER));
                return Ok((session, None));
            },
            Err(e) => return Err(e),
        }

        self.view.started(&file.info.name);
        self.view.progress(0);
        debug!(file = %file.info.name, size = file.info.size, "Starting upload");

        let mut completion = None;
        for chunk in session.chunks() {
            let sent = match file.read_chunk(&chunk).await {
                Ok(data) => self.transport.send_chunk(&file.info, &chunk, data).await,
                Err(e) => Err(e),
            };
            match sent {
                Ok(response) => {
                    let percent = session.on_progress(chunk.end);
                    self.view.progress(percent);
                    if chunk.is_last() {
                        completion = response;
                    }
                },
                Err(e) => {
                    warn!(file = %file.info.name, chunk = chunk.index, error = %e, "Upload failed");
                    session.on_fail(e.to_string())?;
                    self.view.failed(&e.to_string(), &self.i18n.t(MSG_LOAD_ANOTHER));
                    return Ok((session, None));
                },
            }
        }

        let Some(response) = completion else {
            let message = self.i18n.t(MSG_NO_RESPONSE);
            warn!(file = %file.info.name, "{message}");
            session.on_fail(message.clone())?;
            self.view.failed(&message, &self.i18n.t(MSG_LOAD_ANOTHER));
            return Ok((session, None));
        };

        let asset = response.asset.clone();
        session.on_done(response)?;
        // `finished` implies 100%.
        if let UploadState::Succeeded { msg, .. } = session.state() {
            self.view
                .finished(&asset.portable_url, msg, &self.i18n.t(MSG_LOAD_ANOTHER));
        }
        info!(file = %file.info.name, url = %asset.url, "Upload complete");
        let ticket = sink.add_asset(asset);
        Ok((session, Some(ticket)))
    }
}
