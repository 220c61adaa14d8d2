//! Asset panel state: the image list the user can add from, and a pending upload.
//!
//! ERROR HANDLING
//! ==============
//! Listing and upload are remote calls made by the browser shell (`net`).
//! Their results are folded in here. A failed listing is logged and shows an
//! empty list. A failed upload is logged and changes nothing: the chosen file
//! stays pending so the user can retry. Neither failure is ever surfaced as
//! a modal or aborts the session.

#[cfg(test)]
#[path = "assets_test.rs"]
mod assets_test;

use serde::Deserialize;

use crate::consts::CHOOSE_IMAGE_LABEL;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("response could not be decoded: {0}")]
    Decode(String),
    #[error("upload was not accepted")]
    Rejected,
}

/// Body returned by the upload endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    pub file: Option<serde_json::Value>,
}

impl UploadResponse {
    /// What the server reported storing, or `Rejected` when it stored nothing.
    ///
    /// A string is returned as-is; any other non-empty value as its JSON text.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` when `file` is absent, null, false, zero, or empty.
    pub fn into_locator(self) -> Result<String, AssetError> {
        use serde_json::Value;

        match self.file {
            None | Some(Value::Null | Value::Bool(false)) => Err(AssetError::Rejected),
            Some(Value::String(s)) if s.is_empty() => Err(AssetError::Rejected),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Err(AssetError::Rejected),
            Some(Value::String(s)) => Ok(s),
            Some(other) => Ok(other.to_string()),
        }
    }
}

/// A file chosen for upload, with the handle the shell needs to send it.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingUpload<F> {
    pub name: String,
    pub file: F,
}

/// What the shell should do after an upload result is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Stored; re-fetch the asset list.
    Refresh,
    /// Failed; pending file kept for retry.
    Retained,
}

#[derive(Debug, Clone)]
pub struct AssetPanel<F> {
    assets: Vec<String>,
    pending: Option<PendingUpload<F>>,
    /// Bumped on every chooser change; ties an upload result to its file.
    choice: u64,
}

impl<F> Default for AssetPanel<F> {
    fn default() -> Self {
        Self { assets: Vec::new(), pending: None, choice: 0 }
    }
}

impl<F> AssetPanel<F> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the asset list with a listing result. Failure degrades to empty.
    pub fn apply_listing(&mut self, result: Result<Vec<String>, AssetError>) {
        match result {
            Ok(assets) => {
                log::debug!("fetched {} assets", assets.len());
                self.assets = assets;
            }
            Err(e) => {
                log::warn!("error fetching assets: {e}");
                self.assets.clear();
            }
        }
    }

    /// Record the file picked in the chooser, or clear it with `None`.
    pub fn choose_file(&mut self, choice: Option<PendingUpload<F>>) {
        self.pending = choice;
        self.choice = self.choice.wrapping_add(1);
    }

    #[must_use]
    pub fn pending(&self) -> Option<&PendingUpload<F>> {
        self.pending.as_ref()
    }

    /// Token for the current chooser state, passed back to [`Self::apply_upload`].
    #[must_use]
    pub fn choice(&self) -> u64 {
        self.choice
    }

    /// Chooser label: the pending file name, or the default prompt.
    #[must_use]
    pub fn file_label(&self) -> &str {
        self.pending.as_ref().map_or(CHOOSE_IMAGE_LABEL, |p| p.name.as_str())
    }

    /// Fold in the result of uploading the file chosen under `choice`.
    ///
    /// The pending file is cleared only if the user has not picked another
    /// one while the upload was in flight.
    pub fn apply_upload(&mut self, choice: u64, result: Result<String, AssetError>) -> UploadOutcome {
        match result {
            Ok(locator) => {
                log::info!("uploaded asset {locator}");
                if self.choice == choice {
                    self.pending = None;
                } else {
                    log::debug!("file chosen during upload of {locator} stays pending");
                }
                UploadOutcome::Refresh
            }
            Err(e) => {
                log::error!("error uploading image: {e}");
                UploadOutcome::Retained
            }
        }
    }

    #[must_use]
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    /// Locator of the asset at `index` in the current list.
    #[must_use]
    pub fn asset(&self, index: usize) -> Option<&str> {
        self.assets.get(index).map(String::as_str)
    }
}
