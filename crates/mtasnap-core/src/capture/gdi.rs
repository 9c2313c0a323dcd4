//! Shared GDI plumbing for both capture backends.
//!
//! Everything here deals in raw device contexts and DIB sections; the
//! guards keep the acquire/release pairs honest across early returns.

use tracing::debug;
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Gdi::{
    BI_RGB, BITMAPINFO, BITMAPINFOHEADER, BitBlt, CreateCompatibleBitmap, CreateCompatibleDC,
    DIB_RGB_COLORS, DeleteDC, DeleteObject, GetDC, GetDIBits, HBITMAP, HDC, HGDIOBJ, ReleaseDC,
    SRCCOPY, SelectObject,
};
use windows::Win32::UI::WindowsAndMessaging::{GetClientRect, PRINT_WINDOW_FLAGS, PrintWindow};

use super::errors::CaptureError;
use super::types::Frame;
use crate::window::{BoundingBox, WindowHandle};

/// Display DC for the whole virtual screen.
struct ScreenDc(HDC);

impl ScreenDc {
    fn acquire() -> Result<Self, CaptureError> {
        let dc = unsafe { GetDC(None) };
        if dc.is_invalid() {
            return Err(CaptureError::GdiFailure { call: "GetDC" });
        }
        Ok(ScreenDc(dc))
    }
}

impl Drop for ScreenDc {
    fn drop(&mut self) {
        unsafe {
            ReleaseDC(None, self.0);
        }
    }
}

/// DC belonging to one window.
struct WindowDc {
    hwnd: HWND,
    dc: HDC,
}

impl WindowDc {
    fn acquire(hwnd: HWND) -> Result<Self, CaptureError> {
        let dc = unsafe { GetDC(hwnd) };
        if dc.is_invalid() {
            return Err(CaptureError::GdiFailure { call: "GetDC" });
        }
        Ok(WindowDc { hwnd, dc })
    }
}

impl Drop for WindowDc {
    fn drop(&mut self) {
        unsafe {
            ReleaseDC(self.hwnd, self.dc);
        }
    }
}

/// Memory DC with a 32-bit bitmap selected into it, the render target for
/// both `BitBlt` and `PrintWindow`.
struct DibSurface {
    mem_dc: HDC,
    bitmap: HBITMAP,
    old_bitmap: HGDIOBJ,
}

impl DibSurface {
    fn new(reference_dc: HDC, width: i32, height: i32) -> Result<Self, CaptureError> {
        let mem_dc = unsafe { CreateCompatibleDC(reference_dc) };
        if mem_dc.is_invalid() {
            return Err(CaptureError::GdiFailure {
                call: "CreateCompatibleDC",
            });
        }

        let bitmap = unsafe { CreateCompatibleBitmap(reference_dc, width, height) };
        if bitmap.is_invalid() {
            unsafe {
                let _ = DeleteDC(mem_dc);
            }
            return Err(CaptureError::GdiFailure {
                call: "CreateCompatibleBitmap",
            });
        }

        let old_bitmap = unsafe { SelectObject(mem_dc, bitmap) };
        Ok(DibSurface {
            mem_dc,
            bitmap,
            old_bitmap,
        })
    }

    /// Read the surface back as tightly packed BGR, dropping the unused
    /// alpha channel.
    fn read_bgr(&self, width: i32, height: i32) -> Result<Vec<u8>, CaptureError> {
        let mut info = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width,
                // Negative height requests a top-down DIB
                biHeight: -height,
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            },
            ..Default::default()
        };

        let mut raw = vec![0u8; width as usize * height as usize * 4];
        let copied = unsafe {
            GetDIBits(
                self.mem_dc,
                self.bitmap,
                0,
                height as u32,
                Some(raw.as_mut_ptr() as *mut _),
                &mut info,
                DIB_RGB_COLORS,
            )
        };
        if copied == 0 {
            return Err(CaptureError::GdiFailure { call: "GetDIBits" });
        }

        let mut data = Vec::with_capacity(Frame::expected_len(width as u32, height as u32));
        for px in raw.chunks_exact(4) {
            data.extend_from_slice(&px[..3]);
        }
        Ok(data)
    }
}

impl Drop for DibSurface {
    fn drop(&mut self) {
        unsafe {
            SelectObject(self.mem_dc, self.old_bitmap);
            let _ = DeleteObject(self.bitmap);
            let _ = DeleteDC(self.mem_dc);
        }
    }
}

/// Copy a screen-space rectangle out of the composited desktop.
pub fn copy_screen_region(bbox: BoundingBox) -> Result<Frame, CaptureError> {
    let screen = ScreenDc::acquire()?;
    let surface = DibSurface::new(screen.0, bbox.width, bbox.height)?;

    unsafe {
        BitBlt(
            surface.mem_dc,
            0,
            0,
            bbox.width,
            bbox.height,
            screen.0,
            bbox.left,
            bbox.top,
            SRCCOPY,
        )
    }
    .map_err(|_| CaptureError::GdiFailure { call: "BitBlt" })?;

    let data = surface.read_bgr(bbox.width, bbox.height)?;
    Ok(Frame {
        width: bbox.width as u32,
        height: bbox.height as u32,
        data,
    })
}

/// Current client-area extent in pixels.
pub fn client_size(handle: WindowHandle) -> Result<(i32, i32), CaptureError> {
    let hwnd = HWND(handle.0 as *mut _);
    let mut rect = windows::Win32::Foundation::RECT::default();
    unsafe { GetClientRect(hwnd, &mut rect) }.map_err(|_| CaptureError::GdiFailure {
        call: "GetClientRect",
    })?;
    Ok((rect.right - rect.left, rect.bottom - rect.top))
}

/// Ask the window to paint itself into an off-screen surface.
///
/// Direct3D-backed windows only answer to the full-content render flag,
/// older ones to the legacy flags, so each is tried in turn.
pub fn render_window_client(handle: WindowHandle) -> Result<Frame, CaptureError> {
    let hwnd = HWND(handle.0 as *mut _);

    let (width, height) = client_size(handle)?;
    if width <= 0 || height <= 0 {
        return Err(CaptureError::EmptyClientArea);
    }

    let window_dc = WindowDc::acquire(hwnd)?;

    for flags in [
        PRINT_WINDOW_FLAGS(3),
        PRINT_WINDOW_FLAGS(2),
        PRINT_WINDOW_FLAGS(1),
    ] {
        let surface = DibSurface::new(window_dc.dc, width, height)?;
        if unsafe { PrintWindow(hwnd, surface.mem_dc, flags) }.as_bool() {
            debug!(event = "core.capture.print_window_rendered", flags = flags.0);
            let data = surface.read_bgr(width, height)?;
            return Ok(Frame {
                width: width as u32,
                height: height as u32,
                data,
            });
        }
        debug!(event = "core.capture.print_window_flag_rejected", flags = flags.0);
    }

    Err(CaptureError::PrintWindowFailed)
}
