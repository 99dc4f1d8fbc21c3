//! Photo selection, validation and upload for capsule trips
//!
//! Files are read and base64-encoded at selection time, checked against the
//! size/type policy before any network call, and uploaded to a trip
//! collection in one all-or-nothing request.

pub mod edit;
pub mod error;
pub mod models;
pub mod picker;
pub mod reader;
pub mod upload;
pub mod validator;

pub use edit::{PhotoChanges, PhotoEditForm, PhotoReport, PhotoReportForm};
pub use error::{FormError, MediaError, MediaResult, UploadError, UploadResult, ValidationError};
pub use models::{PhotoFile, PrivacyFlags};
#[cfg(feature = "native-picker")]
pub use picker::NativePicker;
pub use picker::{PathPicker, PhotoPicker};
pub use reader::{mime_for_path, read_batch, read_photo};
pub use upload::{UploadController, UploadState};
pub use validator::{ALLOWED_TYPES, DEFAULT_MAX_SIZE_MB, validate_batch, validate_photo};
