use std::sync::Mutex;

use super::types::{CycleEvent, CycleStamp};

#[derive(Debug, Default)]
struct CycleState {
    position: u8,
    total: u64,
}

/// Position state machine for the repeating capture cycle.
///
/// Starts idle at position 0. A `Start` event always resets to 1. An
/// `Advance` event steps forward through 2, 3, 4 and wraps back to 2:
/// position 1 is reserved for an explicit cycle start, so an advance
/// with no preceding start resumes mid-cycle at 2 rather than claiming
/// the start slot.
#[derive(Debug, Default)]
pub struct CycleTracker {
    state: Mutex<CycleState>,
}

impl CycleTracker {
    pub fn new() -> Self {
        CycleTracker::default()
    }

    /// Apply one event and return the stamp used to label the capture.
    /// Exactly one event mutates the state at a time; the returned stamp
    /// has no other side effect.
    pub fn advance(&self, event: CycleEvent) -> CycleStamp {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        state.position = match event {
            CycleEvent::Start => 1,
            CycleEvent::Advance => match state.position + 1 {
                p @ 2..=4 => p,
                _ => 2,
            },
        };
        state.total += 1;

        CycleStamp {
            position: state.position,
            sequence: state.total,
        }
    }

    pub fn position(&self) -> u8 {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).position
    }

    pub fn total(&self) -> u64 {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_always_resets_to_one() {
        let tracker = CycleTracker::new();

        assert_eq!(tracker.advance(CycleEvent::Start).position, 1);

        tracker.advance(CycleEvent::Advance);
        tracker.advance(CycleEvent::Advance);
        assert_eq!(tracker.advance(CycleEvent::Start).position, 1);

        // Reset from every reachable position
        for _ in 0..7 {
            tracker.advance(CycleEvent::Advance);
            assert_eq!(tracker.advance(CycleEvent::Start).position, 1);
        }
    }

    #[test]
    fn test_full_cycle_after_start() {
        let tracker = CycleTracker::new();

        let positions: Vec<u8> = [
            CycleEvent::Start,
            CycleEvent::Advance,
            CycleEvent::Advance,
            CycleEvent::Advance,
        ]
        .into_iter()
        .map(|e| tracker.advance(e).position)
        .collect();

        assert_eq!(positions, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_bare_advances_cycle_without_claiming_start_slot() {
        let tracker = CycleTracker::new();

        let positions: Vec<u8> = (0..7)
            .map(|_| tracker.advance(CycleEvent::Advance).position)
            .collect();

        assert_eq!(positions, vec![2, 3, 4, 2, 3, 4, 2]);
    }

    #[test]
    fn test_wrap_after_four_resumes_at_two() {
        let tracker = CycleTracker::new();

        tracker.advance(CycleEvent::Start);
        tracker.advance(CycleEvent::Advance);
        tracker.advance(CycleEvent::Advance);
        tracker.advance(CycleEvent::Advance);
        assert_eq!(tracker.position(), 4);

        assert_eq!(tracker.advance(CycleEvent::Advance).position, 2);
    }

    #[test]
    fn test_sequence_strictly_increases_across_all_events() {
        let tracker = CycleTracker::new();

        let mut last = 0;
        for event in [
            CycleEvent::Start,
            CycleEvent::Advance,
            CycleEvent::Start,
            CycleEvent::Advance,
            CycleEvent::Advance,
        ] {
            let stamp = tracker.advance(event);
            assert!(stamp.sequence > last);
            last = stamp.sequence;
        }
        assert_eq!(tracker.total(), 5);
    }

    #[test]
    fn test_concurrent_advances_never_lose_counts() {
        use std::sync::Arc;

        let tracker = Arc::new(CycleTracker::new());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let tracker = Arc::clone(&tracker);
            handles.push(std::thread::spawn(move || {
                for _ in 0..50 {
                    let stamp = tracker.advance(CycleEvent::Advance);
                    assert!((2..=4).contains(&stamp.position));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(tracker.total(), 200);
    }
}
