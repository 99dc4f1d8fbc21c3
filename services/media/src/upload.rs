//! Upload session controller
//!
//! Collects photos from a picker together with a caption and privacy flags,
//! validates the whole selection locally, and sends it to the backend as a
//! single request. Failed uploads keep the selection so they can be retried.

use api::{
    CapsuleApi,
    models::{PhotoUpload, UploadPhotosRequest},
};
use auth::{IdentityProvider, Navigation, Route, fresh_token};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::{
    error::{MediaResult, UploadError, UploadResult},
    models::{PhotoFile, PrivacyFlags},
    picker::PhotoPicker,
    validator::{DEFAULT_MAX_SIZE_MB, validate_batch},
};

/// Where the upload session stands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadState {
    #[default]
    Idle,
    Selecting,
    Validating,
    Uploading,
    Done,
    /// Last action failed with this message; the selection is kept
    Failed(String),
}

impl fmt::Display for UploadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadState::Idle => f.write_str("idle"),
            UploadState::Selecting => f.write_str("selecting"),
            UploadState::Validating => f.write_str("validating"),
            UploadState::Uploading => f.write_str("uploading"),
            UploadState::Done => f.write_str("done"),
            UploadState::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Photo upload flow for one trip collection
pub struct UploadController {
    api: Arc<dyn CapsuleApi>,
    identity: Arc<dyn IdentityProvider>,
    picker: Arc<dyn PhotoPicker>,
    max_size_mb: u64,
    collection_id: Option<String>,
    selection: Vec<PhotoFile>,
    caption: String,
    privacy: PrivacyFlags,
    state: UploadState,
}

impl UploadController {
    pub fn new(
        api: Arc<dyn CapsuleApi>,
        identity: Arc<dyn IdentityProvider>,
        picker: Arc<dyn PhotoPicker>,
    ) -> Self {
        Self {
            api,
            identity,
            picker,
            max_size_mb: DEFAULT_MAX_SIZE_MB,
            collection_id: None,
            selection: Vec::new(),
            caption: String::new(),
            privacy: PrivacyFlags::default(),
            state: UploadState::Idle,
        }
    }

    pub fn with_max_size_mb(mut self, max_size_mb: u64) -> Self {
        self.max_size_mb = max_size_mb;
        self
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn selection(&self) -> &[PhotoFile] {
        &self.selection
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn privacy(&self) -> PrivacyFlags {
        self.privacy
    }

    pub fn collection_id(&self) -> Option<&str> {
        self.collection_id.as_deref()
    }

    /// Trip collection the photos are uploaded to
    pub fn set_collection(&mut self, collection_id: impl Into<String>) {
        let collection_id = collection_id.into();
        self.collection_id = Some(collection_id).filter(|id| !id.trim().is_empty());
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    pub fn set_only_you_can_view(&mut self, value: bool) {
        self.privacy.set_only_you_can_view(value);
    }

    pub fn set_only_you_can_share(&mut self, value: bool) {
        self.privacy.set_only_you_can_share(value);
    }

    /// Add photos from the library to the selection
    ///
    /// Returns how many photos were added; zero when the user cancelled.
    pub async fn pick_from_library(&mut self, multiple: bool) -> UploadResult<usize> {
        self.ensure_not_uploading()?;
        self.state = UploadState::Selecting;
        let picked = self.picker.select_photos(multiple).await;
        self.append(picked)
    }

    /// Add a camera capture to the selection
    pub async fn take_photo(&mut self) -> UploadResult<usize> {
        self.ensure_not_uploading()?;
        self.state = UploadState::Selecting;
        let picked = self.picker.take_photo().await;
        self.append(picked)
    }

    /// Drop one photo from the selection
    pub fn remove_photo(&mut self, index: usize) -> UploadResult<PhotoFile> {
        self.ensure_not_uploading()?;
        if index >= self.selection.len() {
            return Err(UploadError::NoSuchPhoto(index));
        }

        let removed = self.selection.remove(index);
        self.state = UploadState::Selecting;
        info!(filename = %removed.filename(), remaining = self.selection.len(), "Photo removed");
        Ok(removed)
    }

    /// Request body for the current selection
    pub fn build_request(&self) -> UploadResult<UploadPhotosRequest> {
        let collection_id = self
            .collection_id
            .clone()
            .ok_or(UploadError::MissingCollection)?;
        if self.selection.is_empty() {
            return Err(UploadError::EmptySelection);
        }

        let caption = self.caption.trim();
        let description = (!caption.is_empty()).then(|| caption.to_string());

        let photos = self
            .selection
            .iter()
            .map(|photo| PhotoUpload {
                file: photo.encoded_payload().to_string(),
                filename: photo.filename().to_string(),
                name: Some(photo.display_name().to_string()),
                description: description.clone(),
                available_for_others: self.privacy.available_for_others(),
                available_to_share: self.privacy.available_to_share(),
            })
            .collect();

        Ok(UploadPhotosRequest {
            collection_id,
            photos,
        })
    }

    /// Validate and upload the selection
    ///
    /// On success the selection, caption and privacy flags are reset and the
    /// returned navigation asks the trip screen to refresh.
    #[instrument(skip(self), fields(collection_id = ?self.collection_id, photos = self.selection.len()))]
    pub async fn submit(&mut self) -> UploadResult<Navigation> {
        if self.state == UploadState::Uploading {
            return Err(UploadError::Busy);
        }

        self.state = UploadState::Validating;
        if let Err(e) = validate_batch(&self.selection, self.max_size_mb) {
            return Err(self.fail(e.into()));
        }
        if self.selection.is_empty() {
            return Err(self.fail(UploadError::EmptySelection));
        }
        let Some(collection_id) = self.collection_id.clone() else {
            return Err(self.fail(UploadError::MissingCollection));
        };

        self.state = UploadState::Uploading;

        // Token first, then the body, then the call
        let token = match fresh_token(self.identity.as_ref()).await {
            Ok(token) => token,
            Err(e) => return Err(self.fail(e.into())),
        };
        let request = match self.build_request() {
            Ok(request) => request,
            Err(e) => return Err(self.fail(e)),
        };

        match self.api.upload_photos(&request, token.as_str()).await {
            Ok(response) => {
                info!(
                    uploaded = request.photos.len(),
                    message = %response.message,
                    "Photos uploaded"
                );
                self.reset();
                self.state = UploadState::Done;
                Ok(Navigation::to(Route::Trip { id: collection_id }).with_refresh())
            }
            Err(e) => {
                error!(status = e.status, "Photo upload failed: {}", e.message);
                Err(self.fail(e.into()))
            }
        }
    }

    /// Abandon the session, clearing selection, caption and privacy flags
    ///
    /// `submit` holds the controller exclusively, so `Uploading` seen here
    /// means its future was dropped; that state is discarded too.
    pub fn cancel(&mut self) -> UploadResult<()> {
        if self.state == UploadState::Uploading {
            warn!("Discarding interrupted upload");
        }
        self.reset();
        self.state = UploadState::Idle;
        Ok(())
    }

    fn ensure_not_uploading(&self) -> UploadResult<()> {
        match self.state {
            UploadState::Uploading => Err(UploadError::Busy),
            _ => Ok(()),
        }
    }

    fn append(&mut self, picked: MediaResult<Vec<PhotoFile>>) -> UploadResult<usize> {
        match picked {
            Ok(photos) => {
                let added = photos.len();
                self.selection.extend(photos);
                info!(added, total = self.selection.len(), "Photos selected");
                Ok(added)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    fn fail(&mut self, err: UploadError) -> UploadError {
        warn!("Upload session failed: {}", err);
        self.state = UploadState::Failed(err.to_string());
        err
    }

    fn reset(&mut self) {
        self.selection.clear();
        self.caption.clear();
        self.privacy = PrivacyFlags::default();
    }
}
