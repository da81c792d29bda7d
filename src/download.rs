//! Saving generated images to disk.

use crate::models::ImageLocator;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// File name offered for the image at 1-based `index`.
pub fn download_name(index: usize) -> String {
    format!("youtube_thumbnail_{}.jpg", index)
}

async fn fetch_bytes(locator: &ImageLocator, http: &reqwest::Client) -> Result<Vec<u8>> {
    if locator.is_data_url() {
        let (_, bytes) = locator.decode_data_url()?;
        return Ok(bytes);
    }

    let url = locator.as_str();
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(Error::InvalidLocator(format!(
            "unsupported scheme in '{}'",
            locator
        )));
    }

    let response = http.get(url).send().await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

/// Writes every image to `dir` as `youtube_thumbnail_{n}.jpg`, in order.
pub async fn save_images(
    images: &[ImageLocator],
    dir: &Path,
    http: &reqwest::Client,
) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir).await?;

    let mut paths = Vec::with_capacity(images.len());
    for (i, locator) in images.iter().enumerate() {
        let bytes = fetch_bytes(locator, http).await?;
        let path = dir.join(download_name(i + 1));
        tokio::fs::write(&path, &bytes).await?;
        info!("Saved {} ({} bytes)", path.display(), bytes.len());
        paths.push(path);
    }

    Ok(paths)
}
