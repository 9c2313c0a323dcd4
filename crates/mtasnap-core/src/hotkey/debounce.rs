use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Events of the same logical key closer together than this are
/// key-repeat noise, not intent.
pub const DEBOUNCE_THRESHOLD: Duration = Duration::from_millis(80);

/// Per-key debounce over logical key labels.
///
/// Only accepted events refresh the timestamp, so a burst of repeats
/// passes exactly one event per threshold window. Labels are tracked
/// independently; an `alt` press never suppresses a `q`.
#[derive(Debug)]
pub struct Debouncer {
    threshold: Duration,
    last_accepted: HashMap<&'static str, Instant>,
}

impl Debouncer {
    pub fn new(threshold: Duration) -> Self {
        Debouncer {
            threshold,
            last_accepted: HashMap::new(),
        }
    }

    pub fn accept(&mut self, label: &'static str) -> bool {
        self.accept_at(label, Instant::now())
    }

    fn accept_at(&mut self, label: &'static str, now: Instant) -> bool {
        if let Some(&last) = self.last_accepted.get(label) {
            if now.duration_since(last) < self.threshold {
                return false;
            }
        }
        self.last_accepted.insert(label, now);
        true
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Debouncer::new(DEBOUNCE_THRESHOLD)
    }
}
