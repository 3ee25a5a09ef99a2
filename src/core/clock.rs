//! Injected time source.
//!
//! The demo-validity window makes stage derivation time-dependent, so
//! the calculator, guard, and resolver take their notion of "now" from
//! a [`Clock`] instead of sampling the wall clock inline. Production
//! code uses [`SystemClock`]; tests pin an instant with [`FixedClock`].

use chrono::{DateTime, Utc};

/// Source of the current instant.
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time. The default for every component.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a fixed instant.
///
/// # Example
///
/// ```rust
/// use dealflow::core::{Clock, FixedClock};
/// use chrono::Utc;
///
/// let instant = Utc::now();
/// let clock = FixedClock(instant);
/// assert_eq!(clock.now(), instant);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn fixed_clock_returns_its_instant() {
        let instant = Utc::now() - Duration::days(3);
        let clock = FixedClock(instant);

        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn system_clock_is_monotone_enough_for_tests() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
