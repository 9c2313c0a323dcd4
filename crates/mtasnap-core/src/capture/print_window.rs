use tracing::info;

use super::FrameSource;
use super::errors::CaptureError;
use super::types::Frame;
use crate::window::WindowHandle;

/// Capture backend that asks the window to render itself off-screen, so
/// the target can be fully covered by other windows. The client extent is
/// re-read on every grab because the window may resize between captures.
#[derive(Debug)]
pub struct PrintWindowCapture {
    handle: WindowHandle,
}

impl PrintWindowCapture {
    pub fn new(handle: WindowHandle) -> Self {
        info!(
            event = "core.capture.print_window_source_opened",
            handle = handle.0
        );
        PrintWindowCapture { handle }
    }

    pub fn handle(&self) -> WindowHandle {
        self.handle
    }
}

impl FrameSource for PrintWindowCapture {
    #[cfg(windows)]
    fn grab(&mut self) -> Result<Frame, CaptureError> {
        super::gdi::render_window_client(self.handle)
    }

    #[cfg(not(windows))]
    fn grab(&mut self) -> Result<Frame, CaptureError> {
        Err(CaptureError::UnsupportedPlatform)
    }

    fn describe(&self) -> &'static str {
        "off-screen-render"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_reports_backend_name() {
        let source = PrintWindowCapture::new(WindowHandle(42));
        assert_eq!(source.describe(), "off-screen-render");
        assert_eq!(source.handle(), WindowHandle(42));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_grab_unsupported_off_windows() {
        use crate::errors::SnapError;

        let mut source = PrintWindowCapture::new(WindowHandle(42));
        let result = source.grab();
        assert_eq!(
            result.unwrap_err().error_code(),
            "CAPTURE_UNSUPPORTED_PLATFORM"
        );
    }
}
