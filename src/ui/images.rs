use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

/// Posters above this size are refused before they reach the database.
const MAX_IMAGE_BYTES: u64 = 16 * 1024 * 1024;

/// Read an image file into memory for storage. The bytes are kept as-is;
/// nothing is decoded or resized.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let metadata = fs::metadata(path)
        .with_context(|| format!("Image file {} not found.", path.display()))?;
    if !metadata.is_file() {
        bail!("{} is not a file.", path.display());
    }
    if metadata.len() > MAX_IMAGE_BYTES {
        bail!(
            "{} is larger than {} MiB.",
            path.display(),
            MAX_IMAGE_BYTES / (1024 * 1024)
        );
    }
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}
