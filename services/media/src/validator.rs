//! Size and type policy for photos

use tracing::warn;

use crate::{error::ValidationError, models::PhotoFile};

/// Default upper bound on a single photo
pub const DEFAULT_MAX_SIZE_MB: u64 = 50;

/// Accepted MIME types
pub const ALLOWED_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Check a single photo against the size limit and the type allow-list
pub fn validate_photo(photo: &PhotoFile, max_size_mb: u64) -> Result<(), ValidationError> {
    let max_size_bytes = max_size_mb.saturating_mul(BYTES_PER_MB);
    if photo.size_bytes() > max_size_bytes {
        return Err(ValidationError {
            filename: photo.filename().to_string(),
            reason: format!(
                "File size ({:.2}MB) exceeds maximum allowed size ({}MB)",
                photo.size_bytes() as f64 / BYTES_PER_MB as f64,
                max_size_mb
            ),
        });
    }

    let mime_type = photo.mime_type().to_ascii_lowercase();
    if !ALLOWED_TYPES.contains(&mime_type.as_str()) {
        return Err(ValidationError {
            filename: photo.filename().to_string(),
            reason: format!(
                "File type {} is not supported. Allowed types: {}",
                photo.mime_type(),
                ALLOWED_TYPES.join(", ")
            ),
        });
    }

    Ok(())
}

/// Check every photo, reporting the first failure
pub fn validate_batch(photos: &[PhotoFile], max_size_mb: u64) -> Result<(), ValidationError> {
    for photo in photos {
        if let Err(e) = validate_photo(photo, max_size_mb) {
            warn!(filename = %e.filename, "Photo rejected: {}", e.reason);
            return Err(e);
        }
    }
    Ok(())
}
