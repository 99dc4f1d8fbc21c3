//! Photo selection
//!
//! A picker resolves with zero photos when the user cancels. Files of one
//! invocation are read concurrently and the invocation fails as a whole if any
//! of them cannot be read.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;

use crate::{
    error::{MediaError, MediaResult},
    models::PhotoFile,
    reader::read_batch,
};

/// Source of user-selected photos
#[async_trait]
pub trait PhotoPicker: Send + Sync {
    /// Pick photos from the library; `multiple` allows more than one
    async fn select_photos(&self, multiple: bool) -> MediaResult<Vec<PhotoFile>>;

    /// Capture a photo with the camera
    async fn take_photo(&self) -> MediaResult<Vec<PhotoFile>>;
}

/// Picker over paths chosen ahead of time, such as command-line arguments
///
/// Each path is handed out once; later invocations resolve empty.
#[derive(Debug, Default)]
pub struct PathPicker {
    pending: Mutex<Vec<PathBuf>>,
}

impl PathPicker {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            pending: Mutex::new(paths),
        }
    }

    fn take(&self, multiple: bool) -> MediaResult<Vec<PathBuf>> {
        let mut pending = self
            .pending
            .lock()
            .map_err(|_| MediaError::Picker("Path picker state is poisoned".to_string()))?;

        let count = if multiple {
            pending.len()
        } else {
            pending.len().min(1)
        };
        Ok(pending.drain(..count).collect())
    }
}

#[async_trait]
impl PhotoPicker for PathPicker {
    async fn select_photos(&self, multiple: bool) -> MediaResult<Vec<PhotoFile>> {
        let paths = self.take(multiple)?;
        if paths.is_empty() {
            info!("No photos selected");
            return Ok(Vec::new());
        }
        read_batch(&paths).await
    }

    async fn take_photo(&self) -> MediaResult<Vec<PhotoFile>> {
        self.select_photos(false).await
    }
}

/// Picker backed by the operating system file dialog
#[cfg(feature = "native-picker")]
#[derive(Debug, Default)]
pub struct NativePicker;

#[cfg(feature = "native-picker")]
impl NativePicker {
    fn dialog() -> rfd::AsyncFileDialog {
        rfd::AsyncFileDialog::new()
            .set_title("Select photos")
            .add_filter("Images", &["jpg", "jpeg", "png", "webp"])
    }
}

#[cfg(feature = "native-picker")]
#[async_trait]
impl PhotoPicker for NativePicker {
    async fn select_photos(&self, multiple: bool) -> MediaResult<Vec<PhotoFile>> {
        let handles = if multiple {
            Self::dialog().pick_files().await.unwrap_or_default()
        } else {
            Self::dialog().pick_file().await.into_iter().collect()
        };

        let paths: Vec<PathBuf> = handles
            .iter()
            .map(|handle| handle.path().to_path_buf())
            .collect();
        if paths.is_empty() {
            info!("Photo selection cancelled");
            return Ok(Vec::new());
        }
        read_batch(&paths).await
    }

    // Desktop dialogs have no camera source; fall back to a single pick
    async fn take_photo(&self) -> MediaResult<Vec<PhotoFile>> {
        self.select_photos(false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_path_picker_hands_out_each_path_once() {
        let dir = tempdir().unwrap();
        let paths: Vec<PathBuf> = ["a.jpg", "b.jpg"]
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                std::fs::write(&path, b"jpeg").unwrap();
                path
            })
            .collect();
        let picker = PathPicker::new(paths);

        assert_eq!(picker.take_photo().await.unwrap().len(), 1);
        let rest = picker.select_photos(true).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].filename(), "b.jpg");

        assert!(picker.select_photos(true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_path_fails_invocation() {
        let dir = tempdir().unwrap();
        let picker = PathPicker::new(vec![dir.path().join("gone.jpg")]);
        assert!(picker.select_photos(true).await.is_err());
    }
}
