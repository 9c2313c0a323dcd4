pub mod errors;
#[cfg(windows)]
mod gdi;
pub mod print_window;
pub mod region;
pub mod types;

use std::time::{Duration, Instant};

use tracing::info;

use crate::window::WindowInfo;

pub use errors::CaptureError;
pub use print_window::PrintWindowCapture;
pub use region::RegionCapture;
pub use types::{Backend, BenchReport, Frame};

/// A source of captured frames. Grabs are fallible per frame; one failed
/// grab never poisons the source.
pub trait FrameSource: Send {
    fn grab(&mut self) -> Result<Frame, CaptureError>;

    /// Stable backend name for logs and CLI output.
    fn describe(&self) -> &'static str;
}

/// Open the capture source for a located window.
pub fn open_source(
    backend: Backend,
    window: &WindowInfo,
) -> Result<Box<dyn FrameSource>, CaptureError> {
    match backend {
        Backend::RegionCopy => Ok(Box::new(RegionCapture::new(window.client_bbox)?)),
        Backend::OffScreenRender => Ok(Box::new(PrintWindowCapture::new(window.handle))),
    }
}

/// Grab frames as fast as the source allows for the given duration and
/// report the sustained rate.
pub fn benchmark(
    source: &mut dyn FrameSource,
    duration: Duration,
) -> Result<BenchReport, CaptureError> {
    info!(
        event = "core.capture.benchmark_started",
        backend = source.describe(),
        seconds = duration.as_secs_f64()
    );

    let start = Instant::now();
    let mut frames = 0u64;
    while start.elapsed() < duration {
        source.grab()?;
        frames += 1;
    }

    let elapsed_secs = start.elapsed().as_secs_f64();
    let fps = if elapsed_secs > 0.0 {
        frames as f64 / elapsed_secs
    } else {
        0.0
    };

    info!(event = "core.capture.benchmark_completed", frames, fps);
    Ok(BenchReport {
        frames,
        elapsed_secs,
        fps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubSource {
        grabs: u64,
    }

    impl FrameSource for StubSource {
        fn grab(&mut self) -> Result<Frame, CaptureError> {
            self.grabs += 1;
            Ok(Frame {
                width: 2,
                height: 2,
                data: vec![0; Frame::expected_len(2, 2)],
            })
        }

        fn describe(&self) -> &'static str {
            "stub"
        }
    }

    struct FailingSource;

    impl FrameSource for FailingSource {
        fn grab(&mut self) -> Result<Frame, CaptureError> {
            Err(CaptureError::PrintWindowFailed)
        }

        fn describe(&self) -> &'static str {
            "failing"
        }
    }

    #[test]
    fn test_benchmark_counts_frames() {
        let mut source = StubSource { grabs: 0 };
        let report = benchmark(&mut source, Duration::from_millis(20)).unwrap();

        assert!(report.frames > 0);
        assert_eq!(report.frames, source.grabs);
        assert!(report.fps > 0.0);
        assert!(report.elapsed_secs >= 0.02);
    }

    #[test]
    fn test_benchmark_propagates_grab_failure() {
        let mut source = FailingSource;
        let result = benchmark(&mut source, Duration::from_millis(20));
        assert!(result.is_err());
    }
}
