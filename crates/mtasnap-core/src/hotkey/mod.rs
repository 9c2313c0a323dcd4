pub mod debounce;
pub mod dispatcher;
pub mod errors;
pub mod listener;
pub mod types;

pub use debounce::{DEBOUNCE_THRESHOLD, Debouncer};
pub use dispatcher::{Dispatcher, DispatcherConfig, Outcome};
pub use errors::HotkeyError;
pub use listener::Listener;
pub use types::{KeyAction, KeyEvent, map_virtual_key};
