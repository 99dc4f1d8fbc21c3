//! Photo edit and report forms

use api::models::Photo;
use serde::Serialize;
use tracing::info;

use crate::{error::FormError, models::PrivacyFlags};

const MAX_NAME_LENGTH: usize = 120;
const MAX_CAPTION_LENGTH: usize = 2000;
const MAX_REASON_LENGTH: usize = 1000;

/// Changes to save for an existing photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoChanges {
    pub photo_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub available_for_others: bool,
    pub available_to_share: bool,
}

/// Edit form seeded from a stored photo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoEditForm {
    photo_id: String,
    name: String,
    caption: String,
    privacy: PrivacyFlags,
}

impl PhotoEditForm {
    pub fn from_photo(photo: &Photo) -> Self {
        Self {
            photo_id: photo.id.clone(),
            name: photo.name.clone(),
            caption: String::new(),
            privacy: PrivacyFlags::from_availability(
                photo.available_for_others,
                photo.available_to_share,
            ),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn privacy(&self) -> PrivacyFlags {
        self.privacy
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
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

    /// Validated changes ready to send
    pub fn submit(&self) -> Result<PhotoChanges, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::Required("Photo name"));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(FormError::TooLong {
                field: "Photo name",
                max: MAX_NAME_LENGTH,
            });
        }

        let caption = self.caption.trim();
        if caption.chars().count() > MAX_CAPTION_LENGTH {
            return Err(FormError::TooLong {
                field: "Caption",
                max: MAX_CAPTION_LENGTH,
            });
        }

        info!(photo_id = %self.photo_id, "Photo changes prepared");
        Ok(PhotoChanges {
            photo_id: self.photo_id.clone(),
            name: name.to_string(),
            description: (!caption.is_empty()).then(|| caption.to_string()),
            available_for_others: self.privacy.available_for_others(),
            available_to_share: self.privacy.available_to_share(),
        })
    }
}

/// A report against a photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoReport {
    pub photo_id: String,
    pub reason: String,
}

/// Report form; a report needs a non-blank reason
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoReportForm {
    photo_id: String,
    reason: String,
    submitted: bool,
}

impl PhotoReportForm {
    pub fn new(photo_id: impl Into<String>) -> Self {
        Self {
            photo_id: photo_id.into(),
            ..Default::default()
        }
    }

    pub fn set_reason(&mut self, reason: impl Into<String>) {
        self.reason = reason.into();
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn submit(&mut self) -> Result<PhotoReport, FormError> {
        let reason = self.reason.trim();
        if reason.is_empty() {
            return Err(FormError::Required("Report reason"));
        }
        if reason.chars().count() > MAX_REASON_LENGTH {
            return Err(FormError::TooLong {
                field: "Report reason",
                max: MAX_REASON_LENGTH,
            });
        }

        self.submitted = true;
        info!(photo_id = %self.photo_id, "Photo report prepared");
        Ok(PhotoReport {
            photo_id: self.photo_id.clone(),
            reason: reason.to_string(),
        })
    }
}
