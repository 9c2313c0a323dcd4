//! PNG persistence for captured frames.

pub mod errors;

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use image::RgbImage;
use tracing::info;

use crate::capture::Frame;

pub use errors::StorageError;

/// Milliseconds since the Unix epoch, the timestamp embedded in
/// artifact filenames.
pub fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Filename for one hotkey-triggered capture:
/// `{position}_{label}_{epochMillis}_{sequence:04}.png`.
pub fn artifact_filename(position: u8, label: &str, epoch_millis: u64, sequence: u64) -> String {
    format!("{position}_{label}_{epoch_millis}_{sequence:04}.png")
}

/// Filename for one frame of a timed capture loop.
pub fn interval_filename(epoch_millis: u64, index: u64) -> String {
    format!("capture_{epoch_millis}_{index:04}.png")
}

/// Create the output directory, parents included.
pub fn ensure_dir(path: &Path) -> Result<(), StorageError> {
    std::fs::create_dir_all(path).map_err(|source| StorageError::DirectoryCreation {
        path: path.display().to_string(),
        source,
    })
}

/// Write a frame as a three-channel PNG. The in-memory frame is BGR and
/// the file is RGB, so the channels are swapped on the way out.
pub fn save_frame(frame: &Frame, path: &Path) -> Result<(), StorageError> {
    let expected = Frame::expected_len(frame.width, frame.height);
    if frame.data.len() != expected {
        return Err(StorageError::InvalidFrame {
            expected,
            actual: frame.data.len(),
        });
    }

    let mut rgb = frame.data.clone();
    for px in rgb.chunks_exact_mut(3) {
        px.swap(0, 2);
    }

    let image = RgbImage::from_raw(frame.width, frame.height, rgb).ok_or(
        StorageError::InvalidFrame {
            expected,
            actual: frame.data.len(),
        },
    )?;

    image.save(path).map_err(|source| StorageError::ImageWrite {
        path: path.display().to_string(),
        source,
    })?;

    info!(
        event = "core.storage.frame_saved",
        path = path.display().to_string().as_str(),
        width = frame.width,
        height = frame.height
    );
    Ok(())
}
