use crate::errors::SnapError;

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("Window enumeration failed: {message}")]
    EnumerationFailed { message: String },

    #[error("Window operations are only supported on Windows")]
    UnsupportedPlatform,
}

impl SnapError for WindowError {
    fn error_code(&self) -> &'static str {
        match self {
            WindowError::EnumerationFailed { .. } => "WINDOW_ENUMERATION_FAILED",
            WindowError::UnsupportedPlatform => "WINDOW_UNSUPPORTED_PLATFORM",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, WindowError::UnsupportedPlatform)
    }
}
