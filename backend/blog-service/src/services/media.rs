/// Local storage for post images
///
/// Files live under `MEDIA_ROOT/posts_images/` with a random name; the post
/// row stores the key relative to the media root.
use crate::config::MediaConfig;
use crate::error::{AppError, Result};
use image::ImageFormat;
use std::path::PathBuf;
use uuid::Uuid;

const IMAGE_DIR: &str = "posts_images";

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    max_upload_bytes: usize,
}

impl MediaStore {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            root: config.root.clone(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Accept only payloads that decode as an image.
    pub fn validate_image(&self, bytes: &[u8]) -> Result<ImageFormat> {
        if bytes.is_empty() {
            return Err(AppError::BadRequest("No image data provided".into()));
        }
        if bytes.len() > self.max_upload_bytes {
            return Err(AppError::BadRequest(format!(
                "Image exceeds maximum size of {} bytes",
                self.max_upload_bytes
            )));
        }

        let format = image::guess_format(bytes)
            .map_err(|_| AppError::BadRequest("Unsupported image format".into()))?;
        image::load_from_memory_with_format(bytes, format)
            .map_err(|e| AppError::BadRequest(format!("Invalid image: {}", e)))?;

        Ok(format)
    }

    /// Validate and write an image; returns its storage key.
    pub async fn store_image(&self, bytes: &[u8]) -> Result<String> {
        let format = self.validate_image(bytes)?;
        let extension = format.extensions_str().first().copied().unwrap_or("img");
        let key = format!("{}/{}.{}", IMAGE_DIR, Uuid::new_v4(), extension);

        let dir = self.root.join(IMAGE_DIR);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create media directory: {}", e)))?;
        tokio::fs::write(self.root.join(&key), bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write image: {}", e)))?;

        tracing::debug!(%key, size = bytes.len(), "image stored");
        Ok(key)
    }

    /// Best-effort removal of a replaced image.
    pub async fn remove(&self, key: &str) {
        if let Err(err) = tokio::fs::remove_file(self.root.join(key)).await {
            tracing::warn!(%key, error = %err, "failed to remove old image");
        }
    }
}
