//! Common error behavior shared by all module error types.

/// Trait implemented by every error enum in this crate.
///
/// `error_code` gives a stable machine-readable identifier for log
/// consumers; `is_user_error` distinguishes problems the user can fix
/// (wrong title, minimized window) from internal failures.
pub trait SnapError: std::error::Error {
    fn error_code(&self) -> &'static str;

    fn is_user_error(&self) -> bool;
}
