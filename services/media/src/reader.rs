//! Turn files on disk into encoded photo records

use base64::{Engine as _, engine::general_purpose::STANDARD};
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::{
    error::{MediaError, MediaResult},
    models::PhotoFile,
};

/// MIME type guessed from the file extension
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

fn filename_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read one file into a [`PhotoFile`]
pub async fn read_photo(path: impl AsRef<Path>) -> MediaResult<PhotoFile> {
    let path = path.as_ref();
    let filename = filename_of(path);

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|source| MediaError::Read {
            filename: filename.clone(),
            source,
        })?;
    if !metadata.is_file() {
        return Err(MediaError::NotAFile { filename });
    }

    let bytes = tokio::fs::read(path).await.map_err(|source| {
        error!("Failed to read photo {}: {}", path.display(), source);
        MediaError::Read {
            filename: filename.clone(),
            source,
        }
    })?;

    debug!(%filename, size = bytes.len(), "Photo read");
    Ok(PhotoFile::new(
        filename,
        mime_for_path(path),
        bytes.len() as u64,
        STANDARD.encode(&bytes),
    ))
}

/// Read several files concurrently
///
/// Fails as a whole on the first file that cannot be read.
pub async fn read_batch(paths: &[PathBuf]) -> MediaResult<Vec<PhotoFile>> {
    let photos = try_join_all(paths.iter().map(read_photo)).await?;
    info!("Read {} photo(s)", photos.len());
    Ok(photos)
}
