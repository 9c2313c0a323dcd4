/// Which capture pipeline to use.
///
/// `RegionCopy` copies the window's client rectangle from the composited
/// screen, so the window must be frontmost and unobstructed.
/// `OffScreenRender` asks the window to paint itself into an off-screen
/// surface and works while the window is covered by others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    RegionCopy,
    OffScreenRender,
}

impl Backend {
    pub fn parse(name: &str) -> Option<Backend> {
        match name {
            "region-copy" => Some(Backend::RegionCopy),
            "off-screen-render" => Some(Backend::OffScreenRender),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::RegionCopy => "region-copy",
            Backend::OffScreenRender => "off-screen-render",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One captured image: tightly packed BGR rows, top-down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    pub const BYTES_PER_PIXEL: usize = 3;

    pub fn expected_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * Self::BYTES_PER_PIXEL
    }
}

/// Result of a timed capture loop.
#[derive(Debug, Clone)]
pub struct BenchReport {
    pub frames: u64,
    pub elapsed_secs: f64,
    pub fps: f64,
}
