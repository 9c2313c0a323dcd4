pub mod errors;
pub mod handler;
pub mod types;

pub use errors::WindowError;
pub use handler::{ensure_foreground, find_window, list_windows, select_window};
pub use types::{BoundingBox, WindowHandle, WindowInfo, WindowSnapshot};
