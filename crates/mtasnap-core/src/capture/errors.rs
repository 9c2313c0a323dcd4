use crate::errors::SnapError;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Capture region has no usable extent ({width}x{height})")]
    InvalidBoundingBox { width: i32, height: i32 },

    #[error("Window client area is empty, the window may be minimized")]
    EmptyClientArea,

    #[error("Window refused to render into an off-screen surface")]
    PrintWindowFailed,

    #[error("GDI call failed: {call}")]
    GdiFailure { call: &'static str },

    #[error("Screen capture is only supported on Windows")]
    UnsupportedPlatform,
}

impl SnapError for CaptureError {
    fn error_code(&self) -> &'static str {
        match self {
            CaptureError::InvalidBoundingBox { .. } => "CAPTURE_INVALID_BOUNDING_BOX",
            CaptureError::EmptyClientArea => "CAPTURE_EMPTY_CLIENT_AREA",
            CaptureError::PrintWindowFailed => "CAPTURE_PRINT_WINDOW_FAILED",
            CaptureError::GdiFailure { .. } => "CAPTURE_GDI_FAILURE",
            CaptureError::UnsupportedPlatform => "CAPTURE_UNSUPPORTED_PLATFORM",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            CaptureError::InvalidBoundingBox { .. }
                | CaptureError::EmptyClientArea
                | CaptureError::UnsupportedPlatform
        )
    }
}
