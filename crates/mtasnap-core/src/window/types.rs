use serde::Serialize;

/// Opaque top-level window handle.
///
/// Stored as the raw pointer value so the type stays `Send` and
/// platform-neutral; Win32 calls rebuild the native handle from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowHandle(pub isize);

/// Client-area rectangle in screen coordinates.
///
/// The all-zero box is the "geometry unreadable" sentinel: lookups never
/// fail on geometry, the bad box is rejected at capture time instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub const ZERO: BoundingBox = BoundingBox {
        left: 0,
        top: 0,
        width: 0,
        height: 0,
    };

    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A box is usable for capture only with strictly positive extent.
    pub fn is_usable(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Immutable snapshot of the located target window.
///
/// Not kept in sync with the live window; callers re-query if the window
/// may have moved or resized.
#[derive(Debug, Clone, Serialize)]
pub struct WindowInfo {
    pub handle: WindowHandle,
    pub title: String,
    pub pid: u32,
    pub is_visible: bool,
    pub is_minimized: bool,
    pub client_bbox: BoundingBox,
}

/// Raw enumeration record, input to the pure selection rule and the
/// `list windows` surface.
#[derive(Debug, Clone, Serialize)]
pub struct WindowSnapshot {
    pub handle: WindowHandle,
    pub title: String,
    pub pid: u32,
    pub is_visible: bool,
    pub is_minimized: bool,
}
