//! Photo records and privacy settings

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::reader::mime_for_path;

/// A selected photo, encoded and ready to upload
///
/// Created at selection time and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    filename: String,
    mime_type: String,
    size_bytes: u64,
    encoded_payload: String,
}

impl PhotoFile {
    /// Create a photo from an already base64-encoded payload
    pub fn new(
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: u64,
        encoded_payload: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            size_bytes,
            encoded_payload: encoded_payload.into(),
        }
    }

    /// Create a photo from a `data:<mime>;base64,<payload>` URL
    ///
    /// The MIME type comes from the URL when present, otherwise from the
    /// filename. Input without a comma is taken as a bare payload.
    pub fn from_data_url(filename: impl Into<String>, data_url: &str, size_bytes: u64) -> Self {
        let filename = filename.into();

        let (mime_type, payload) = match data_url.split_once(',') {
            Some((header, payload)) => {
                let mime = header
                    .strip_prefix("data:")
                    .and_then(|rest| rest.split(';').next())
                    .filter(|mime| !mime.is_empty())
                    .map(str::to_string);
                (mime, payload)
            }
            None => (None, data_url),
        };

        let mime_type =
            mime_type.unwrap_or_else(|| mime_for_path(Path::new(&filename)).to_string());
        Self::new(filename, mime_type, size_bytes, payload)
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Base64 payload without a data-URL prefix
    pub fn encoded_payload(&self) -> &str {
        &self.encoded_payload
    }

    /// Display name: the filename without its extension
    pub fn display_name(&self) -> &str {
        Path::new(&self.filename)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&self.filename)
    }
}

/// "Only you can view" / "only you can share" switches
///
/// Turning view-restriction on also restricts sharing, turning it off lifts
/// the share restriction, and the share switch stays off while viewing is
/// unrestricted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyFlags {
    only_you_can_view: bool,
    only_you_can_share: bool,
}

impl PrivacyFlags {
    /// Flags as stored on an existing photo, taken as-is
    pub fn from_availability(available_for_others: bool, available_to_share: bool) -> Self {
        Self {
            only_you_can_view: !available_for_others,
            only_you_can_share: !available_to_share,
        }
    }

    pub fn only_you_can_view(&self) -> bool {
        self.only_you_can_view
    }

    pub fn only_you_can_share(&self) -> bool {
        self.only_you_can_share
    }

    pub fn set_only_you_can_view(&mut self, value: bool) {
        self.only_you_can_view = value;
        self.only_you_can_share = value;
    }

    pub fn set_only_you_can_share(&mut self, value: bool) {
        self.only_you_can_share = self.only_you_can_view && value;
    }

    /// Wire value of `availableForOthers`
    pub fn available_for_others(&self) -> bool {
        !self.only_you_can_view
    }

    /// Wire value of `availableToShare`
    pub fn available_to_share(&self) -> bool {
        !self.only_you_can_share
    }
}
