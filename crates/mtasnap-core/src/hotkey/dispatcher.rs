use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use tracing::{info, warn};

use super::debounce::{DEBOUNCE_THRESHOLD, Debouncer};
use super::types::{KeyAction, KeyEvent};
use crate::capture::FrameSource;
use crate::cycle::{CycleEvent, CycleTracker, SavePolicy};
use crate::storage;

#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub out_dir: PathBuf,
    /// Pause after key acceptance before grabbing, to let on-screen
    /// state settle.
    pub settle_delay: Duration,
    pub policy: SavePolicy,
    pub debounce: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        DispatcherConfig {
            out_dir: PathBuf::from("screenshots"),
            settle_delay: Duration::ZERO,
            policy: SavePolicy::SaveAll,
            debounce: DEBOUNCE_THRESHOLD,
        }
    }
}

/// What became of one delivered key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Saved {
        path: PathBuf,
        position: u8,
        sequence: u64,
    },
    /// Key-repeat noise, discarded silently.
    Debounced,
    /// The post-capture policy dropped this position.
    Skipped { position: u8, sequence: u64 },
    /// Grab or save failed; logged and the loop continues.
    Dropped,
    Quit,
}

/// Consumes key events one at a time and turns accepted ones into saved
/// artifacts. All capture and I/O failures are contained per event; the
/// cycle state only ever moves forward.
pub struct Dispatcher {
    source: Box<dyn FrameSource>,
    tracker: CycleTracker,
    debouncer: Debouncer,
    config: DispatcherConfig,
}

impl Dispatcher {
    pub fn new(source: Box<dyn FrameSource>, config: DispatcherConfig) -> Self {
        let debouncer = Debouncer::new(config.debounce);
        Dispatcher {
            source,
            tracker: CycleTracker::new(),
            debouncer,
            config,
        }
    }

    /// Handle one delivered event.
    pub fn handle(&mut self, event: KeyEvent) -> Outcome {
        if event.action == KeyAction::Quit {
            info!(event = "core.hotkey.quit_requested", key = event.label);
            return Outcome::Quit;
        }

        if !self.debouncer.accept(event.label) {
            return Outcome::Debounced;
        }

        if !self.config.settle_delay.is_zero() {
            std::thread::sleep(self.config.settle_delay);
        }

        // Position and counter move before the grab and are not rolled
        // back if it fails
        let cycle_event = if event.action == KeyAction::CycleStart {
            CycleEvent::Start
        } else {
            CycleEvent::Advance
        };
        let stamp = self.tracker.advance(cycle_event);

        let frame = match self.source.grab() {
            Ok(frame) => frame,
            Err(e) => {
                warn!(
                    event = "core.hotkey.capture_failed",
                    key = event.label,
                    position = stamp.position,
                    error = %e
                );
                return Outcome::Dropped;
            }
        };

        let Some(frame) = self.config.policy.apply(stamp.position, frame) else {
            info!(
                event = "core.hotkey.position_skipped",
                key = event.label,
                position = stamp.position
            );
            return Outcome::Skipped {
                position: stamp.position,
                sequence: stamp.sequence,
            };
        };

        let filename = storage::artifact_filename(
            stamp.position,
            event.label,
            storage::epoch_millis(),
            stamp.sequence,
        );
        let path = self.config.out_dir.join(filename);

        if let Err(e) = storage::save_frame(&frame, &path) {
            warn!(
                event = "core.hotkey.save_failed",
                key = event.label,
                position = stamp.position,
                error = %e
            );
            return Outcome::Dropped;
        }

        info!(
            event = "core.hotkey.frame_saved",
            key = event.label,
            position = stamp.position,
            sequence = stamp.sequence,
            path = path.display().to_string().as_str()
        );
        Outcome::Saved {
            path,
            position: stamp.position,
            sequence: stamp.sequence,
        }
    }

    /// Drain the queue until a quit key arrives or the listener side
    /// goes away.
    pub fn run(&mut self, events: Receiver<KeyEvent>) {
        info!(event = "core.hotkey.dispatch_loop_started");
        for event in events {
            if self.handle(event) == Outcome::Quit {
                break;
            }
        }
        info!(event = "core.hotkey.dispatch_loop_stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{CaptureError, Frame};
    use crate::cycle::CropRegion;

    struct StubSource;

    impl FrameSource for StubSource {
        fn grab(&mut self) -> Result<Frame, CaptureError> {
            Ok(Frame {
                width: 4,
                height: 4,
                data: vec![7; Frame::expected_len(4, 4)],
            })
        }

        fn describe(&self) -> &'static str {
            "stub"
        }
    }

    struct FailingSource;

    impl FrameSource for FailingSource {
        fn grab(&mut self) -> Result<Frame, CaptureError> {
            Err(CaptureError::PrintWindowFailed)
        }

        fn describe(&self) -> &'static str {
            "failing"
        }
    }

    const ALT: KeyEvent = KeyEvent {
        action: KeyAction::CycleStart,
        label: "alt",
    };
    const Q: KeyEvent = KeyEvent {
        action: KeyAction::Advance,
        label: "q",
    };
    const ESC: KeyEvent = KeyEvent {
        action: KeyAction::Quit,
        label: "esc",
    };

    fn test_config(out_dir: PathBuf) -> DispatcherConfig {
        DispatcherConfig {
            out_dir,
            // Tests deliver events back to back; disable the repeat filter
            debounce: Duration::ZERO,
            ..DispatcherConfig::default()
        }
    }

    #[test]
    fn test_alt_q_q_q_labels_positions_one_through_four() {
        let tmp = tempfile::tempdir().unwrap();
        let mut dispatcher = Dispatcher::new(
            Box::new(StubSource),
            test_config(tmp.path().to_path_buf()),
        );

        let mut positions = Vec::new();
        let mut last_sequence = 0;
        for event in [ALT, Q, Q, Q] {
            match dispatcher.handle(event) {
                Outcome::Saved {
                    path,
                    position,
                    sequence,
                } => {
                    assert!(path.is_file());
                    assert!(sequence > last_sequence);
                    last_sequence = sequence;
                    positions.push(position);
                }
                other => panic!("expected a save, got {other:?}"),
            }
        }

        assert_eq!(positions, vec![1, 2, 3, 4]);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 4);
    }

    #[test]
    fn test_quit_short_circuits_without_capturing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut dispatcher = Dispatcher::new(
            Box::new(StubSource),
            test_config(tmp.path().to_path_buf()),
        );

        assert_eq!(dispatcher.handle(ESC), Outcome::Quit);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_key_repeat_is_debounced() {
        let tmp = tempfile::tempdir().unwrap();
        let config = DispatcherConfig {
            out_dir: tmp.path().to_path_buf(),
            debounce: Duration::from_secs(60),
            ..DispatcherConfig::default()
        };
        let mut dispatcher = Dispatcher::new(Box::new(StubSource), config);

        assert!(matches!(dispatcher.handle(Q), Outcome::Saved { .. }));
        assert_eq!(dispatcher.handle(Q), Outcome::Debounced);
        // Another label is not suppressed
        assert!(matches!(dispatcher.handle(ALT), Outcome::Saved { .. }));
    }

    #[test]
    fn test_capture_failure_drops_event_but_keeps_counter_moving() {
        let tmp = tempfile::tempdir().unwrap();
        let mut dispatcher = Dispatcher::new(
            Box::new(FailingSource),
            test_config(tmp.path().to_path_buf()),
        );

        assert_eq!(dispatcher.handle(ALT), Outcome::Dropped);
        assert_eq!(dispatcher.handle(Q), Outcome::Dropped);
        // The failed events still consumed positions 1 and 2
        assert_eq!(dispatcher.tracker.position(), 2);
        assert_eq!(dispatcher.tracker.total(), 2);
    }

    #[test]
    fn test_policy_skip_consumes_position_without_saving() {
        let tmp = tempfile::tempdir().unwrap();
        let config = DispatcherConfig {
            out_dir: tmp.path().to_path_buf(),
            debounce: Duration::ZERO,
            policy: SavePolicy::CropAndSkip {
                region: CropRegion {
                    x: 0,
                    y: 0,
                    width: 2,
                    height: 2,
                },
                skip_position: 4,
            },
            ..DispatcherConfig::default()
        };
        let mut dispatcher = Dispatcher::new(Box::new(StubSource), config);

        dispatcher.handle(ALT);
        dispatcher.handle(Q);
        dispatcher.handle(Q);
        let outcome = dispatcher.handle(Q);

        assert_eq!(
            outcome,
            Outcome::Skipped {
                position: 4,
                sequence: 4
            }
        );
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 3);
    }

    #[test]
    fn test_run_drains_queue_until_quit() {
        let tmp = tempfile::tempdir().unwrap();
        let mut dispatcher = Dispatcher::new(
            Box::new(StubSource),
            test_config(tmp.path().to_path_buf()),
        );

        let (tx, rx) = std::sync::mpsc::sync_channel(16);
        for event in [ALT, Q, ESC, Q] {
            tx.try_send(event).unwrap();
        }

        dispatcher.run(rx);

        // The event after quit is never processed
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_run_stops_when_listener_disconnects() {
        let tmp = tempfile::tempdir().unwrap();
        let mut dispatcher = Dispatcher::new(
            Box::new(StubSource),
            test_config(tmp.path().to_path_buf()),
        );

        let (tx, rx) = std::sync::mpsc::sync_channel(16);
        tx.try_send(ALT).unwrap();
        drop(tx);

        dispatcher.run(rx);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }
}
