/// Logical key events the cycle tracker understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleEvent {
    /// Begin a new cycle at position 1.
    Start,
    /// Move to the next position within the current cycle.
    Advance,
}

/// Labeling data for one accepted capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleStamp {
    /// Ordinal position within the repeating cycle, 1 through 4.
    pub position: u8,
    /// Monotonically increasing save counter, shared across all keys.
    pub sequence: u64,
}
