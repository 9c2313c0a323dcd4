pub mod policy;
pub mod tracker;
pub mod types;

pub use policy::{CropRegion, SavePolicy};
pub use tracker::CycleTracker;
pub use types::{CycleEvent, CycleStamp};
