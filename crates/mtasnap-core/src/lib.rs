//! mtasnap-core: Core library for hotkey-driven game window capture
//!
//! This library locates the game client window, captures its client area
//! through one of two interchangeable strategies, and drives the capture
//! cycle that labels screenshots taken in bursts of hotkey presses. It is
//! used by the `mtasnap` CLI.
//!
//! # Main Entry Points
//!
//! - [`window`] - Locate the target window and its client-area bounding box
//! - [`capture`] - Grab BGR frames via region copy or off-screen render
//! - [`cycle`] - Track the 1-4 capture-cycle position and save policies
//! - [`hotkey`] - Global key listener, debounce, and the dispatch loop
//! - [`storage`] - Artifact naming and PNG persistence

pub mod capture;
pub mod cycle;
pub mod errors;
pub mod events;
pub mod hotkey;
pub mod logging;
pub mod storage;
pub mod window;

// Re-export commonly used types at crate root for convenience
pub use capture::{Backend, CaptureError, Frame, FrameSource};
pub use cycle::{CycleEvent, CycleStamp, CycleTracker, SavePolicy};
pub use hotkey::{Dispatcher, DispatcherConfig, KeyAction, KeyEvent, Outcome};
pub use window::{BoundingBox, WindowInfo};

// Re-export logging initialization
pub use logging::init_logging;
