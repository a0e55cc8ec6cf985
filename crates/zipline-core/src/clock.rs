use jiff::{SignedDuration, Timestamp};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A source of the current time.
///
/// The services take their clock through this trait so that expiry
/// behavior can be exercised with simulated time in tests.
pub trait Clock: Send + Sync + 'static {
    /// Returns the current time of the clock.
    fn now(&self) -> Timestamp;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A hand-driven clock for tests.
///
/// Cloning shares the underlying state, so a clone handed to a service
/// observes every `advance` made through the original.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            inner: Arc::new(Mutex::new(now)),
        }
    }

    /// Starts the clock at the unix epoch.
    pub fn at_epoch() -> Self {
        Self::new(Timestamp::UNIX_EPOCH)
    }

    /// Moves the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        let mut now = self
            .inner
            .lock()
            .expect("manual clock lock should not be poisoned");
        *now = *now + SignedDuration::from_secs(duration.as_secs() as i64);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self
            .inner
            .lock()
            .expect("manual clock lock should not be poisoned")
    }
}
