use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Custom epoch: Wednesday, January 1, 2025 00:00:00 UTC
pub const CUSTOM_EPOCH: Duration = Duration::from_millis(1_735_689_600_000);

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: Duration = Duration::from_millis(1_288_834_974_657);

/// Standard UNIX epoch: Thursday, January 1, 1970 00:00:00 UTC
pub const UNIX_EPOCH_MILLIS: Duration = Duration::from_millis(0);

/// A source of millisecond timestamps relative to some origin.
///
/// Plug in [`SystemClock`] for real use or a fixed/mocked time in tests.
///
/// # Example
///
/// ```
/// use shardid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> u64;
}

/// Wall-clock time in milliseconds since a configurable epoch.
///
/// A system time earlier than the epoch reads as `0`. Wall clocks can step
/// backwards; generators built on this clock wait for it to catch up rather
/// than reuse a timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemClock {
    epoch: Duration,
}

impl SystemClock {
    pub const fn with_epoch(epoch: Duration) -> Self {
        Self { epoch }
    }

    pub const fn epoch(&self) -> Duration {
        self.epoch
    }
}

impl Default for SystemClock {
    /// Constructs a clock aligned to [`CUSTOM_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(CUSTOM_EPOCH)
    }
}

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .saturating_sub(self.epoch)
            .as_millis() as u64
    }
}
