//! Background thread hosting the low-level keyboard hook.
//!
//! The hook callback runs on the listener thread's message loop and must
//! return quickly, so it only maps the key and pushes the event onto a
//! bounded queue; all capture work happens on the dispatcher side.

use std::sync::mpsc::Receiver;
use std::thread::JoinHandle;

use tracing::info;

use super::errors::HotkeyError;
use super::types::KeyEvent;

/// Capacity of the listener-to-dispatcher queue. Events arriving while
/// the dispatcher is busy past this depth are dropped with a warning.
pub const QUEUE_CAPACITY: usize = 64;

/// Handle to the keyboard-hook thread.
pub struct Listener {
    thread: Option<JoinHandle<()>>,
    thread_id: u32,
}

impl Listener {
    /// Install the global keyboard hook on a dedicated thread and return
    /// the queue of recognized events. Fails if the hook cannot be
    /// installed.
    pub fn spawn() -> Result<(Listener, Receiver<KeyEvent>), HotkeyError> {
        platform::spawn()
    }

    /// Ask the listener thread to leave its message loop and wait for it.
    pub fn stop(mut self) {
        platform::request_stop(self.thread_id);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        info!(event = "core.hotkey.listener_stopped");
    }
}

#[cfg(windows)]
mod platform {
    use std::sync::Mutex;
    use std::sync::mpsc::{Receiver, SyncSender, sync_channel};

    use tracing::{info, warn};
    use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
    use windows::Win32::System::Threading::GetCurrentThreadId;
    use windows::Win32::UI::WindowsAndMessaging::{
        CallNextHookEx, GetMessageW, KBDLLHOOKSTRUCT, MSG, PostThreadMessageW, SetWindowsHookExW,
        UnhookWindowsHookEx, WH_KEYBOARD_LL, WM_KEYDOWN, WM_QUIT, WM_SYSKEYDOWN,
    };

    use super::super::errors::HotkeyError;
    use super::super::types::{KeyEvent, map_virtual_key};
    use super::{Listener, QUEUE_CAPACITY};

    // The hook callback is a free function, so the queue handle lives in
    // a process-wide slot for the lifetime of the listener thread.
    static SENDER: Mutex<Option<SyncSender<KeyEvent>>> = Mutex::new(None);

    unsafe extern "system" fn keyboard_hook(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
        if code >= 0 {
            let msg = wparam.0 as u32;
            // Alt arrives as a system key-down
            if msg == WM_KEYDOWN || msg == WM_SYSKEYDOWN {
                let input = unsafe { &*(lparam.0 as *const KBDLLHOOKSTRUCT) };
                if let Some(event) = map_virtual_key(input.vkCode) {
                    deliver(event);
                }
            }
        }
        unsafe { CallNextHookEx(None, code, wparam, lparam) }
    }

    fn deliver(event: KeyEvent) {
        let guard = SENDER.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(sender) = guard.as_ref() {
            if sender.try_send(event).is_err() {
                warn!(event = "core.hotkey.queue_full", key = event.label);
            }
        }
    }

    pub fn spawn() -> Result<(Listener, Receiver<KeyEvent>), HotkeyError> {
        let (tx, rx) = sync_channel(QUEUE_CAPACITY);
        *SENDER.lock().unwrap_or_else(|e| e.into_inner()) = Some(tx);

        // Startup handshake: the hook must be confirmed installed before
        // the caller starts waiting on the queue
        let (ready_tx, ready_rx) = std::sync::mpsc::channel::<Result<u32, HotkeyError>>();

        let thread = std::thread::spawn(move || {
            let hook = match unsafe { SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_hook), None, 0) }
            {
                Ok(hook) => hook,
                Err(e) => {
                    let _ = ready_tx.send(Err(HotkeyError::HookInstallFailed {
                        message: e.to_string(),
                    }));
                    return;
                }
            };
            let _ = ready_tx.send(Ok(unsafe { GetCurrentThreadId() }));

            let mut msg = MSG::default();
            while unsafe { GetMessageW(&mut msg, None, 0, 0) }.0 > 0 {}

            unsafe {
                let _ = UnhookWindowsHookEx(hook);
            }
            *SENDER.lock().unwrap_or_else(|e| e.into_inner()) = None;
        });

        let thread_id = match ready_rx.recv() {
            Ok(Ok(thread_id)) => thread_id,
            Ok(Err(e)) => {
                let _ = thread.join();
                return Err(e);
            }
            Err(_) => {
                let _ = thread.join();
                return Err(HotkeyError::ListenerStartupFailed);
            }
        };

        info!(event = "core.hotkey.listener_started", thread_id);
        Ok((
            Listener {
                thread: Some(thread),
                thread_id,
            },
            rx,
        ))
    }

    pub fn request_stop(thread_id: u32) {
        unsafe {
            let _ = PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
        }
    }
}

#[cfg(not(windows))]
mod platform {
    use std::sync::mpsc::Receiver;

    use super::super::errors::HotkeyError;
    use super::super::types::KeyEvent;
    use super::Listener;

    pub fn spawn() -> Result<(Listener, Receiver<KeyEvent>), HotkeyError> {
        Err(HotkeyError::UnsupportedPlatform)
    }

    pub fn request_stop(_thread_id: u32) {}
}

#[cfg(test)]
mod tests {
    #[cfg(not(windows))]
    #[test]
    fn test_spawn_unsupported_off_windows() {
        use crate::errors::SnapError;

        let result = super::Listener::spawn();
        assert_eq!(
            result.err().unwrap().error_code(),
            "HOTKEY_UNSUPPORTED_PLATFORM"
        );
    }
}
