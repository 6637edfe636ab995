// Image storage module: resolves the canonical URL of a stored image from
// its key and requested size, and downloads the bytes to a local file.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Host serving the stored images, distinct from the API host.
const STORAGE_URL: &str = "https://d1cuyjsrcm0gby.cloudfront.net";

/// Return the URL of an image in the Mapillary storage, scaled to `size`
/// pixels.
pub fn image_url(key: &str, size: u32) -> String {
    format!("{}/{}/thumb-{}.jpg", STORAGE_URL, key, size)
}

/// Download an image from the Mapillary storage into a file at
/// `destination`, overwriting any existing file there.
///
/// The response body is copied verbatim, with no validation of its
/// contents. If the copy fails partway the file is left as is.
pub fn download_image(key: &str, size: u32, destination: &Path) -> Result<()> {
    download_to(&image_url(key, size), destination)
}

fn download_to(url: &str, destination: &Path) -> Result<()> {
    debug!(url, "downloading image");
    let mut response = reqwest::blocking::get(url)
        .with_context(|| format!("Failed to request image at {}", url))?;
    let mut file = File::create(destination)
        .with_context(|| format!("Failed to create {}", destination.display()))?;
    response
        .copy_to(&mut file)
        .context("Failed to write image contents")?;
    Ok(())
}
