//! Time utilities for stamping log lines and request targets.
use jiff::Timestamp;

/// A source of wall-clock instants.
///
/// The client asks its clock for the current time right before every send, so that each
/// request target carries a fresh `now` parameter.
///
/// Notable implementations of this trait are [`SystemClock`], which reads the system clock, and
/// any function pointer with the appropriate signature.
pub trait Clock: Send + Sync + 'static {
    /// Returns the current instant.
    fn now(&self) -> Timestamp;
}

/// Returns a new [`SystemClock`].
///
/// This is equivalent to calling
/// ```rust
/// # fn clock() -> logdna::time::SystemClock {
/// logdna::time::SystemClock::default()
/// # }
/// ```
pub fn system() -> SystemClock {
    SystemClock
}

/// Retrieve the current wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

impl Clock for fn() -> Timestamp {
    fn now(&self) -> Timestamp {
        (*self)()
    }
}

/// Milliseconds since the Unix epoch, truncated toward zero.
///
/// Sub-millisecond precision is discarded, never rounded: `-1.5ms` becomes `-1`.
pub fn unix_millis(timestamp: Timestamp) -> i64 {
    // |i128 ns| / 1e6 always fits in an i64
    (timestamp.as_nanosecond() / 1_000_000) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_sub_millisecond_precision() {
        let ts = Timestamp::from_nanosecond(1_700_000_000_123_999_999).unwrap();
        assert_eq!(unix_millis(ts), 1_700_000_000_123);
    }

    #[test]
    fn truncates_toward_zero_before_epoch() {
        let ts = Timestamp::from_nanosecond(-1_500_000).unwrap();
        assert_eq!(unix_millis(ts), -1);
    }

    #[test]
    fn epoch_is_zero() {
        assert_eq!(unix_millis(Timestamp::UNIX_EPOCH), 0);
    }

    #[test]
    fn function_pointer_clock() {
        fn fixed() -> Timestamp {
            Timestamp::from_millisecond(42).unwrap()
        }
        let clock: fn() -> Timestamp = fixed;
        assert_eq!(unix_millis(Clock::now(&clock)), 42);
    }
}
