//! Cooperative timed tasks with explicit cancellation.
//!
//! The tick loop owns a handful of timers: a one-shot delay that tears the
//! intro overlay down, and a polling retry that waits for the eye-tracking
//! source to come online. Both are plain state machines polled once per
//! tick, and both carry a [`CancellationToken`] so session teardown can
//! stop them deterministically instead of leaving a dangling interval.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One-shot delay: fires exactly once when its deadline passes, unless
/// cancelled first.
#[derive(Debug)]
pub struct DelayTask {
    deadline: Instant,
    token: CancellationToken,
    fired: bool,
}

impl DelayTask {
    pub fn new(delay: Duration) -> Self {
        Self {
            deadline: Instant::now() + delay,
            token: CancellationToken::new(),
            fired: false,
        }
    }

    /// Returns `true` on the single poll where the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.fired || self.token.is_cancelled() || now < self.deadline {
            return false;
        }
        self.fired = true;
        true
    }

    pub fn cancel(&mut self) {
        self.token.cancel();
    }
}

/// Polling retry: reports a due attempt every `interval`, until cancelled.
#[derive(Debug)]
pub struct PollTask {
    interval: Duration,
    next_attempt: Instant,
    token: CancellationToken,
}

impl PollTask {
    /// A poll task whose first attempt is due immediately.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_attempt: Instant::now(),
            token: CancellationToken::new(),
        }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Whether an attempt is due. Consumes the attempt and schedules the
    /// next one.
    pub fn due(&mut self, now: Instant) -> bool {
        if self.token.is_cancelled() || now < self.next_attempt {
            return false;
        }
        self.next_attempt = now + self.interval;
        true
    }

    pub fn cancel(&mut self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_fires_once() {
        let mut task = DelayTask::new(Duration::from_millis(100));
        let start = Instant::now();
        assert!(!task.poll(start));
        let later = start + Duration::from_millis(150);
        assert!(task.poll(later));
        assert!(!task.poll(later + Duration::from_millis(1)));
    }

    #[test]
    fn test_cancelled_delay_never_fires() {
        let mut task = DelayTask::new(Duration::from_millis(1));
        task.cancel();
        assert!(!task.poll(Instant::now() + Duration::from_secs(1)));
    }

    #[test]
    fn test_poll_task_spacing() {
        let mut task = PollTask::new(Duration::from_millis(500));
        let start = Instant::now();
        assert!(task.due(start));
        assert!(!task.due(start + Duration::from_millis(100)));
        assert!(task.due(start + Duration::from_millis(600)));
    }

    #[test]
    fn test_cancel_through_cloned_token() {
        let mut task = PollTask::new(Duration::from_millis(1));
        let token = task.token();
        token.cancel();
        assert!(task.is_cancelled());
        assert!(!task.due(Instant::now() + Duration::from_secs(1)));
    }
}
