//! Error types for photo reading, validation and upload

use api::ApiError;
use auth::AuthError;
use std::io;
use thiserror::Error;

/// Failure to turn a selected file into a photo
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Failed to read {filename}: {source}")]
    Read {
        filename: String,
        #[source]
        source: io::Error,
    },

    #[error("{filename} is not a file")]
    NotAFile { filename: String },

    #[error("Photo selection failed: {0}")]
    Picker(String),
}

pub type MediaResult<T> = Result<T, MediaError>;

/// A photo rejected by the size/type policy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{filename}: {reason}")]
pub struct ValidationError {
    pub filename: String,
    pub reason: String,
}

/// Failure of an upload controller action
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("An upload is already in progress")]
    Busy,

    #[error("No photos selected")]
    EmptySelection,

    #[error("No trip selected for the upload")]
    MissingCollection,

    #[error("No photo at position {0}")]
    NoSuchPhoto(usize),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Backend(#[from] ApiError),
}

pub type UploadResult<T> = Result<T, UploadError>;

/// A photo edit or report form that cannot be submitted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} must be at most {max} characters long")]
    TooLong { field: &'static str, max: usize },
}
