use tracing::info;

use super::FrameSource;
use super::errors::CaptureError;
use super::types::Frame;
use crate::window::BoundingBox;

/// Capture backend that copies the window's client rectangle from the
/// composited screen. The region is validated up front; a stale or zero
/// box never reaches the blit.
#[derive(Debug)]
pub struct RegionCapture {
    bbox: BoundingBox,
}

impl RegionCapture {
    pub fn new(bbox: BoundingBox) -> Result<Self, CaptureError> {
        if !bbox.is_usable() {
            return Err(CaptureError::InvalidBoundingBox {
                width: bbox.width,
                height: bbox.height,
            });
        }
        info!(
            event = "core.capture.region_source_opened",
            left = bbox.left,
            top = bbox.top,
            width = bbox.width,
            height = bbox.height
        );
        Ok(RegionCapture { bbox })
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }
}

impl FrameSource for RegionCapture {
    #[cfg(windows)]
    fn grab(&mut self) -> Result<Frame, CaptureError> {
        super::gdi::copy_screen_region(self.bbox)
    }

    #[cfg(not(windows))]
    fn grab(&mut self) -> Result<Frame, CaptureError> {
        Err(CaptureError::UnsupportedPlatform)
    }

    fn describe(&self) -> &'static str {
        "region-copy"
    }
}
