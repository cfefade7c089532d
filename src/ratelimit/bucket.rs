//! Rate limit bucket implementation.

use std::time::Duration;
use tokio::time::Instant;

use super::rules::{RateLimitRule, ServerLimits};

/// Accounting for one `limit:window` rule.
///
/// A window opens on its first use and closes exactly `window` later,
/// regardless of how many requests it saw.
#[derive(Debug, Clone)]
struct WindowCounter {
    rule: RateLimitRule,
    count: u64,
    started: Option<Instant>,
}

impl WindowCounter {
    fn new(rule: RateLimitRule) -> Self {
        Self {
            rule,
            count: 0,
            started: None,
        }
    }

    fn is_open(&self, now: Instant) -> bool {
        match self.started {
            Some(started) => now.saturating_duration_since(started) < self.rule.window,
            None => false,
        }
    }

    fn current_count(&self, now: Instant) -> u64 {
        if self.is_open(now) {
            self.count
        } else {
            0
        }
    }

    /// Time until one more request fits, or `None` if it fits now.
    fn wait(&self, now: Instant) -> Option<Duration> {
        if self.current_count(now) < self.rule.limit {
            return None;
        }
        match self.started {
            Some(started) if self.is_open(now) => {
                Some((started + self.rule.window).saturating_duration_since(now))
            }
            // A zero limit never admits anything; retry after a full window.
            _ => Some(self.rule.window),
        }
    }

    fn increment(&mut self, now: Instant) {
        if !self.is_open(now) {
            self.count = 0;
            self.started = Some(now);
        }
        self.count += 1;
    }
}

/// Tracks the request budget of one (scope, key) pair across all of its rules.
///
/// The bucket holds no lock of its own; the registry serializes access.
#[derive(Debug, Clone)]
pub struct RateLimitBucket {
    windows: Vec<WindowCounter>,
    blocked_until: Option<Instant>,
    confirmed: bool,
}

impl RateLimitBucket {
    /// Create a bucket with provisional rules.
    pub fn new(rules: Vec<RateLimitRule>) -> Self {
        Self {
            windows: rules.into_iter().map(WindowCounter::new).collect(),
            blocked_until: None,
            confirmed: false,
        }
    }

    /// How long until a call may proceed, or `None` if it may proceed now.
    ///
    /// When several rules are violated the longest wait wins.
    pub fn check(&self, now: Instant) -> Option<Duration> {
        let blocked = self
            .blocked_until
            .filter(|until| *until > now)
            .map(|until| until.saturating_duration_since(now));

        self.windows
            .iter()
            .filter_map(|w| w.wait(now))
            .chain(blocked)
            .max()
    }

    /// Count one call against every rule. Callers must `check` first.
    pub fn commit(&mut self, now: Instant) {
        for window in &mut self.windows {
            window.increment(now);
        }
    }

    /// Check and count in one step.
    pub fn try_acquire(&mut self, now: Instant) -> Result<(), Duration> {
        if let Some(wait) = self.check(now) {
            return Err(wait);
        }
        self.commit(now);
        Ok(())
    }

    /// Replace rules with the ones the server reported and merge its counts.
    ///
    /// A window whose length is already tracked and still open keeps its
    /// origin and the higher of the local and reported counts; a reported
    /// count may predate slots granted while the response was in flight.
    /// A new window length opens at `now` if the server reports any usage.
    pub fn record_server_limits(&mut self, limits: &ServerLimits, now: Instant) {
        let windows = limits
            .rules
            .iter()
            .map(|rule| {
                let reported = limits.count_for(rule.window);
                let open = self
                    .windows
                    .iter()
                    .find(|w| w.rule.window == rule.window && w.is_open(now));
                match open {
                    Some(previous) => WindowCounter {
                        rule: *rule,
                        count: previous.count.max(reported),
                        started: previous.started,
                    },
                    None => WindowCounter {
                        rule: *rule,
                        count: reported,
                        started: (reported > 0).then_some(now),
                    },
                }
            })
            .collect();

        self.windows = windows;
        self.confirmed = true;
    }

    /// Refuse every call until `until`. An earlier deadline never shortens a later one.
    pub fn block_until(&mut self, until: Instant) {
        self.blocked_until = Some(match self.blocked_until {
            Some(current) if current > until => current,
            _ => until,
        });
    }

    /// The rules currently enforced.
    pub fn rules(&self) -> Vec<RateLimitRule> {
        self.windows.iter().map(|w| w.rule).collect()
    }

    /// Requests counted in the open window of the given length.
    pub fn current_count(&self, window: Duration, now: Instant) -> Option<u64> {
        self.windows
            .iter()
            .find(|w| w.rule.window == window)
            .map(|w| w.current_count(now))
    }

    /// Smallest remaining quota across all rules.
    pub fn remaining(&self, now: Instant) -> u64 {
        self.windows
            .iter()
            .map(|w| w.rule.limit.saturating_sub(w.current_count(now)))
            .min()
            .unwrap_or(u64::MAX)
    }

    /// Whether the rules came from the server rather than configuration.
    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::rules::WindowCount;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_acquire_within_limit() {
        let now = Instant::now();
        let mut bucket = RateLimitBucket::new(vec![RateLimitRule::new(10, 1)]);

        assert!(bucket.try_acquire(now).is_ok());
        assert_eq!(bucket.current_count(secs(1), now), Some(1));
        assert_eq!(bucket.remaining(now), 9);
    }

    #[test]
    fn test_acquire_exceeds_limit() {
        let now = Instant::now();
        let mut bucket = RateLimitBucket::new(vec![RateLimitRule::new(5, 10)]);

        for _ in 0..5 {
            assert!(bucket.try_acquire(now).is_ok());
        }

        // The 6th request has to wait out the rest of the window
        let later = now + secs(4);
        assert_eq!(bucket.try_acquire(later), Err(secs(6)));
        assert_eq!(bucket.current_count(secs(10), later), Some(5));
    }

    #[test]
    fn test_window_rolls_over_from_first_use() {
        let start = Instant::now();
        let mut bucket = RateLimitBucket::new(vec![RateLimitRule::new(2, 10)]);

        // The window opens at the first acquisition, not at bucket creation
        let first = start + secs(3);
        assert!(bucket.try_acquire(first).is_ok());
        assert!(bucket.try_acquire(first + secs(1)).is_ok());
        assert_eq!(bucket.try_acquire(first + secs(9)), Err(secs(1)));

        assert!(bucket.try_acquire(first + secs(10)).is_ok());
        assert_eq!(bucket.current_count(secs(10), first + secs(10)), Some(1));
    }

    #[test]
    fn test_strictest_rule_governs() {
        let now = Instant::now();
        let mut bucket =
            RateLimitBucket::new(vec![RateLimitRule::new(20, 1), RateLimitRule::new(3, 120)]);

        for _ in 0..3 {
            assert!(bucket.try_acquire(now).is_ok());
        }
        assert_eq!(bucket.check(now + secs(2)), Some(secs(118)));
    }

    #[test]
    fn test_longest_wait_across_violated_rules() {
        let now = Instant::now();
        let mut bucket =
            RateLimitBucket::new(vec![RateLimitRule::new(1, 1), RateLimitRule::new(1, 60)]);

        assert!(bucket.try_acquire(now).is_ok());
        assert_eq!(bucket.check(now), Some(secs(60)));
    }

    #[test]
    fn test_never_exceeds_limit_in_window() {
        let start = Instant::now();
        let mut bucket = RateLimitBucket::new(vec![RateLimitRule::new(7, 2)]);

        let mut granted = Vec::new();
        for step in 0..200u64 {
            let now = start + Duration::from_millis(step * 50);
            if bucket.try_acquire(now).is_ok() {
                granted.push(now);
            }
        }

        // Any window-length interval starting at a grant holds at most `limit` grants
        for (i, opened) in granted.iter().enumerate() {
            let in_window = granted[i..]
                .iter()
                .take_while(|t| t.duration_since(*opened) < secs(2))
                .count();
            assert!(in_window <= 7);
        }
        assert!(granted.len() >= 7 * 4);
    }

    #[test]
    fn test_server_limits_replace_provisional_rules() {
        let now = Instant::now();
        let mut bucket = RateLimitBucket::new(vec![RateLimitRule::new(100, 10)]);
        assert!(!bucket.is_confirmed());

        let limits = ServerLimits {
            rules: vec![RateLimitRule::new(2, 10)],
            counts: vec![WindowCount {
                count: 2,
                window: secs(10),
            }],
        };
        bucket.record_server_limits(&limits, now);

        assert!(bucket.is_confirmed());
        assert_eq!(bucket.rules(), vec![RateLimitRule::new(2, 10)]);
        assert_eq!(bucket.try_acquire(now), Err(secs(10)));
    }

    #[test]
    fn test_server_limits_keep_existing_window_origin() {
        let now = Instant::now();
        let mut bucket = RateLimitBucket::new(vec![RateLimitRule::new(5, 10)]);
        bucket.try_acquire(now).unwrap();

        let limits = ServerLimits {
            rules: vec![RateLimitRule::new(3, 10)],
            counts: vec![WindowCount {
                count: 3,
                window: secs(10),
            }],
        };
        bucket.record_server_limits(&limits, now + secs(4));

        assert_eq!(bucket.check(now + secs(4)), Some(secs(6)));
    }

    #[test]
    fn test_stale_server_count_never_lowers_open_window() {
        let now = Instant::now();
        let mut bucket = RateLimitBucket::new(vec![RateLimitRule::new(2, 10)]);
        bucket.try_acquire(now).unwrap();
        bucket.try_acquire(now).unwrap();

        // The slower response was counted before the second grant
        let stale = ServerLimits {
            rules: vec![RateLimitRule::new(2, 10)],
            counts: vec![WindowCount {
                count: 1,
                window: secs(10),
            }],
        };
        bucket.record_server_limits(&stale, now + secs(1));

        assert_eq!(bucket.current_count(secs(10), now + secs(1)), Some(2));
        assert_eq!(bucket.try_acquire(now + secs(2)), Err(secs(8)));
    }

    #[test]
    fn test_server_count_raises_open_window() {
        let now = Instant::now();
        let mut bucket = RateLimitBucket::new(vec![RateLimitRule::new(5, 10)]);
        bucket.try_acquire(now).unwrap();

        let limits = ServerLimits {
            rules: vec![RateLimitRule::new(5, 10)],
            counts: vec![WindowCount {
                count: 4,
                window: secs(10),
            }],
        };
        bucket.record_server_limits(&limits, now + secs(1));

        assert_eq!(bucket.current_count(secs(10), now + secs(1)), Some(4));
        assert_eq!(bucket.remaining(now + secs(1)), 1);
    }

    #[test]
    fn test_block_until() {
        let now = Instant::now();
        let mut bucket = RateLimitBucket::new(vec![RateLimitRule::new(100, 1)]);

        bucket.block_until(now + secs(5));
        bucket.block_until(now + secs(2));

        assert_eq!(bucket.check(now), Some(secs(5)));
        assert_eq!(bucket.check(now + secs(5)), None);
    }
}
