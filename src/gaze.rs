//! Eye-tracking collaborator contract.
//!
//! A gaze source runs at its own pace and pushes samples through a channel;
//! the tick loop drains the channel into the telemetry gaze log, so every
//! sample is preserved without rate limiting. The source's device may take
//! a while to come online, so attachment is polled (see the gaze attach
//! task in the app shell) and a session without any source just leaves the
//! gaze log empty.

use std::sync::mpsc::Sender;

use crate::game::telemetry::GazeSample;

/// An external eye-tracking sample producer.
pub trait GazeSource {
    /// Polled until the source's device is ready. Cheap and non-blocking.
    fn try_attach(&mut self) -> bool;

    /// Begins streaming. Called exactly once, after
    /// [`try_attach`](Self::try_attach) first returns `true`. The source
    /// keeps the sender and pushes rounded screen coordinates with epoch-ms
    /// timestamps until it is dropped.
    fn start(&mut self, sink: Sender<GazeSample>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    /// A scripted source used to exercise the attach-then-start protocol.
    struct ScriptedSource {
        attach_after: u32,
        polls: u32,
        samples: Vec<GazeSample>,
    }

    impl GazeSource for ScriptedSource {
        fn try_attach(&mut self) -> bool {
            self.polls += 1;
            self.polls > self.attach_after
        }

        fn start(&mut self, sink: Sender<GazeSample>) {
            for sample in self.samples.drain(..) {
                let _ = sink.send(sample);
            }
        }
    }

    #[test]
    fn test_source_streams_after_attach() {
        let (tx, rx) = mpsc::channel();
        let mut source = ScriptedSource {
            attach_after: 2,
            polls: 0,
            samples: vec![
                GazeSample {
                    timestamp: 1,
                    x: 100,
                    y: 200,
                },
                GazeSample {
                    timestamp: 2,
                    x: 101,
                    y: 199,
                },
            ],
        };

        assert!(!source.try_attach());
        assert!(!source.try_attach());
        assert!(source.try_attach());
        source.start(tx);

        let received: Vec<GazeSample> = rx.try_iter().collect();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].x, 100);
    }
}
