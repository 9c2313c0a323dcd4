use std::time::Duration;

use tracing::{debug, info, warn};

use super::errors::WindowError;
use super::types::{WindowHandle, WindowInfo, WindowSnapshot};

/// Select one window from an enumeration by case-insensitive title substring.
///
/// Preference order: first visible, non-minimized match in enumeration
/// order; otherwise the first match regardless of state. Returns the index
/// into `windows`, or `None` when nothing matches.
pub fn select_window(windows: &[WindowSnapshot], title_contains: &str) -> Option<usize> {
    let needle = title_contains.to_lowercase();

    let matches: Vec<usize> = windows
        .iter()
        .enumerate()
        .filter(|(_, w)| w.title.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect();

    matches
        .iter()
        .copied()
        .find(|&i| windows[i].is_visible && !windows[i].is_minimized)
        .or_else(|| matches.first().copied())
}

/// List all top-level windows, optionally filtered by title substring
/// (case-insensitive).
pub fn list_windows(filter: Option<&str>) -> Result<Vec<WindowSnapshot>, WindowError> {
    info!(event = "core.window.list_started", filter = ?filter);

    let windows = platform::snapshot_windows()?;

    let result: Vec<WindowSnapshot> = match filter {
        Some(needle) => {
            let needle = needle.to_lowercase();
            windows
                .into_iter()
                .filter(|w| w.title.to_lowercase().contains(&needle))
                .collect()
        }
        None => windows,
    };

    info!(event = "core.window.list_completed", count = result.len());
    Ok(result)
}

/// Locate the target window by title substring.
///
/// Returns an immutable snapshot including the client-area bounding box in
/// screen coordinates, or `None` when no title matches. Geometry failures
/// do not error here: they yield the all-zero box, which the capture
/// preconditions reject later.
pub fn find_window(title_contains: &str) -> Option<WindowInfo> {
    info!(event = "core.window.find_started", title = title_contains);

    let windows = match platform::snapshot_windows() {
        Ok(windows) => windows,
        Err(e) => {
            warn!(event = "core.window.find_enumeration_failed", error = %e);
            return None;
        }
    };

    let index = select_window(&windows, title_contains)?;
    let snapshot = &windows[index];

    let client_bbox = platform::client_bbox_screen(snapshot.handle);
    if !client_bbox.is_usable() {
        debug!(
            event = "core.window.geometry_unreadable",
            handle = snapshot.handle.0,
            title = snapshot.title.as_str()
        );
    }

    let info = WindowInfo {
        handle: snapshot.handle,
        title: snapshot.title.clone(),
        pid: snapshot.pid,
        is_visible: snapshot.is_visible,
        is_minimized: snapshot.is_minimized,
        client_bbox,
    };

    info!(
        event = "core.window.find_completed",
        title = info.title.as_str(),
        pid = info.pid,
        visible = info.is_visible,
        minimized = info.is_minimized
    );
    Some(info)
}

/// Try to bring the window to the foreground, restoring it if minimized.
///
/// Retries a bounded number of times with a short pause between attempts
/// and reports success as a flag; activation failure is never fatal.
pub fn ensure_foreground(handle: WindowHandle) -> bool {
    ensure_foreground_with(handle, 5, Duration::from_millis(50))
}

pub fn ensure_foreground_with(handle: WindowHandle, retries: u32, pause: Duration) -> bool {
    let activated = platform::force_foreground(handle, retries, pause);
    if activated {
        info!(event = "core.window.foreground_activated", handle = handle.0);
    } else {
        warn!(event = "core.window.foreground_failed", handle = handle.0);
    }
    activated
}

#[cfg(windows)]
mod platform {
    use std::sync::Once;
    use std::time::Duration;

    use windows::Win32::Foundation::{BOOL, HWND, LPARAM, POINT, RECT};
    use windows::Win32::UI::HiDpi::SetProcessDPIAware;
    use windows::Win32::UI::WindowsAndMessaging::{
        EnumWindows, GetClientRect, GetForegroundWindow, GetWindowTextW,
        GetWindowThreadProcessId, IsIconic, IsWindowVisible, SW_RESTORE, SetForegroundWindow,
        ShowWindow,
    };
    use windows::Win32::Graphics::Gdi::ClientToScreen;

    use super::super::errors::WindowError;
    use super::super::types::{BoundingBox, WindowHandle, WindowSnapshot};

    static DPI_AWARE: Once = Once::new();

    /// Geometry reads are in physical pixels; mark the process DPI-aware
    /// once so the coordinates are not virtualized.
    fn set_dpi_aware() {
        DPI_AWARE.call_once(|| unsafe {
            let _ = SetProcessDPIAware();
        });
    }

    unsafe extern "system" fn enum_windows_cb(hwnd: HWND, lparam: LPARAM) -> BOOL {
        let handles = unsafe { &mut *(lparam.0 as *mut Vec<isize>) };
        handles.push(hwnd.0 as isize);
        BOOL::from(true)
    }

    fn window_title(hwnd: HWND) -> String {
        let mut buf = [0u16; 512];
        let len = unsafe { GetWindowTextW(hwnd, &mut buf) };
        if len <= 0 {
            return String::new();
        }
        String::from_utf16_lossy(&buf[..len as usize])
    }

    pub fn snapshot_windows() -> Result<Vec<WindowSnapshot>, WindowError> {
        set_dpi_aware();

        let mut handles: Vec<isize> = Vec::new();
        unsafe {
            EnumWindows(
                Some(enum_windows_cb),
                LPARAM(&mut handles as *mut Vec<isize> as isize),
            )
        }
        .map_err(|e| WindowError::EnumerationFailed {
            message: e.to_string(),
        })?;

        let snapshots = handles
            .into_iter()
            .map(|raw| {
                let hwnd = HWND(raw as *mut _);
                let mut pid = 0u32;
                unsafe {
                    GetWindowThreadProcessId(hwnd, Some(&mut pid));
                }
                WindowSnapshot {
                    handle: WindowHandle(raw),
                    title: window_title(hwnd),
                    pid,
                    is_visible: unsafe { IsWindowVisible(hwnd) }.as_bool(),
                    is_minimized: unsafe { IsIconic(hwnd) }.as_bool(),
                }
            })
            .collect();

        Ok(snapshots)
    }

    /// Convert the window's local client rectangle to a screen-space box.
    /// Any failure along the way yields the zero box.
    pub fn client_bbox_screen(handle: WindowHandle) -> BoundingBox {
        set_dpi_aware();
        let hwnd = HWND(handle.0 as *mut _);

        let mut rect = RECT::default();
        if unsafe { GetClientRect(hwnd, &mut rect) }.is_err() {
            return BoundingBox::ZERO;
        }

        let mut upper_left = POINT {
            x: rect.left,
            y: rect.top,
        };
        let mut lower_right = POINT {
            x: rect.right,
            y: rect.bottom,
        };
        if !unsafe { ClientToScreen(hwnd, &mut upper_left) }.as_bool() {
            return BoundingBox::ZERO;
        }
        if !unsafe { ClientToScreen(hwnd, &mut lower_right) }.as_bool() {
            return BoundingBox::ZERO;
        }

        BoundingBox {
            left: upper_left.x,
            top: upper_left.y,
            width: lower_right.x - upper_left.x,
            height: lower_right.y - upper_left.y,
        }
    }

    pub fn force_foreground(handle: WindowHandle, retries: u32, pause: Duration) -> bool {
        let hwnd = HWND(handle.0 as *mut _);

        for _ in 0..retries {
            unsafe {
                if IsIconic(hwnd).as_bool() {
                    let _ = ShowWindow(hwnd, SW_RESTORE);
                }
                let _ = SetForegroundWindow(hwnd);
            }
            std::thread::sleep(pause);
            if unsafe { GetForegroundWindow() } == hwnd {
                return true;
            }
        }
        false
    }
}

#[cfg(not(windows))]
mod platform {
    use std::time::Duration;

    use super::super::errors::WindowError;
    use super::super::types::{BoundingBox, WindowHandle, WindowSnapshot};

    pub fn snapshot_windows() -> Result<Vec<WindowSnapshot>, WindowError> {
        Err(WindowError::UnsupportedPlatform)
    }

    pub fn client_bbox_screen(_handle: WindowHandle) -> BoundingBox {
        BoundingBox::ZERO
    }

    pub fn force_foreground(_handle: WindowHandle, _retries: u32, _pause: Duration) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(title: &str, visible: bool, minimized: bool) -> WindowSnapshot {
        WindowSnapshot {
            handle: WindowHandle(0),
            title: title.to_string(),
            pid: 0,
            is_visible: visible,
            is_minimized: minimized,
        }
    }

    #[test]
    fn test_select_window_matches_substring_case_insensitive() {
        let windows = vec![
            snapshot("Foo", true, false),
            snapshot("MTA: San Andreas - Server", true, false),
            snapshot("Bar", true, false),
        ];

        assert_eq!(select_window(&windows, "MTA"), Some(1));
        assert_eq!(select_window(&windows, "mta"), Some(1));
        assert_eq!(select_window(&windows, "san andreas"), Some(1));
    }

    #[test]
    fn test_select_window_no_match_returns_none() {
        let windows = vec![snapshot("Foo", true, false), snapshot("Bar", true, false)];
        assert_eq!(select_window(&windows, "MTA"), None);
    }

    #[test]
    fn test_select_window_prefers_visible_non_minimized() {
        let windows = vec![
            snapshot("MTA: San Andreas (old)", false, false),
            snapshot("MTA: San Andreas (tray)", true, true),
            snapshot("MTA: San Andreas", true, false),
        ];

        assert_eq!(select_window(&windows, "MTA"), Some(2));
    }

    #[test]
    fn test_select_window_falls_back_to_first_match() {
        // All matches hidden or minimized: keep enumeration order
        let windows = vec![
            snapshot("Foo", true, false),
            snapshot("MTA: San Andreas (hidden)", false, false),
            snapshot("MTA: San Andreas (tray)", true, true),
        ];

        assert_eq!(select_window(&windows, "MTA"), Some(1));
    }

    #[test]
    fn test_select_window_empty_needle_matches_first() {
        let windows = vec![snapshot("Anything", true, false)];
        assert_eq!(select_window(&windows, ""), Some(0));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_list_windows_unsupported_off_windows() {
        use crate::errors::SnapError;

        let result = list_windows(None);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().error_code(),
            "WINDOW_UNSUPPORTED_PLATFORM"
        );
    }

    #[cfg(not(windows))]
    #[test]
    fn test_find_window_returns_none_off_windows() {
        assert!(find_window("MTA").is_none());
    }
}
