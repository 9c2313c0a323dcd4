use crate::errors::SnapError;

#[derive(Debug, thiserror::Error)]
pub enum HotkeyError {
    #[error("Failed to install keyboard hook: {message}")]
    HookInstallFailed { message: String },

    #[error("Listener thread ended before reporting its state")]
    ListenerStartupFailed,

    #[error("Global hotkeys are only supported on Windows")]
    UnsupportedPlatform,
}

impl SnapError for HotkeyError {
    fn error_code(&self) -> &'static str {
        match self {
            HotkeyError::HookInstallFailed { .. } => "HOTKEY_HOOK_INSTALL_FAILED",
            HotkeyError::ListenerStartupFailed => "HOTKEY_LISTENER_STARTUP_FAILED",
            HotkeyError::UnsupportedPlatform => "HOTKEY_UNSUPPORTED_PLATFORM",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, HotkeyError::UnsupportedPlatform)
    }
}
