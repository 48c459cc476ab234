//! Rolling-window rate limiting for outgoing requests.
//!
//! Tile servers meter clients by requests per time window, so the
//! downloader funnels every fetch through a [`Throttle`]: at most
//! `limit` admissions per rolling `interval`, excess callers delayed
//! (never rejected) and admitted in arrival order. One instance is shared
//! across a whole batch; admission decisions are serialized internally, so
//! the limit holds under concurrent use.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Default maximum admissions per interval.
pub const DEFAULT_LIMIT: u32 = 100;

/// Default admission interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// Throttle configuration: at most `limit` admissions per `interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleConfig {
    /// Maximum number of calls admitted per interval. Must be > 0.
    pub limit: u32,
    /// Length of the rolling window. Must be non-zero.
    pub interval: Duration,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            interval: DEFAULT_INTERVAL,
        }
    }
}

/// Rolling-window admission limiter.
///
/// Tracks the instants of the most recent admissions; a caller is admitted
/// immediately while fewer than `limit` admissions fall inside the current
/// window, and otherwise sleeps until the oldest one expires. Waiters queue
/// fairly, so admission follows arrival order.
#[derive(Debug)]
pub struct Throttle {
    limit: usize,
    interval: Duration,
    admissions: Mutex<VecDeque<Instant>>,
}

impl Throttle {
    /// Creates a throttle from its configuration.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is 0 or `interval` is zero; neither admits
    /// anything, which is a contract violation rather than a rate.
    pub fn new(config: ThrottleConfig) -> Self {
        assert!(config.limit > 0, "throttle limit must be > 0");
        assert!(
            !config.interval.is_zero(),
            "throttle interval must be non-zero"
        );

        Self {
            limit: config.limit as usize,
            interval: config.interval,
            admissions: Mutex::new(VecDeque::with_capacity(config.limit as usize)),
        }
    }

    /// Waits until this caller may proceed under the rate limit.
    ///
    /// Returns as soon as an admission slot is available. The wait is held
    /// inside the admission lock, so queued callers are admitted strictly
    /// in the order they arrived.
    pub async fn acquire(&self) {
        let mut admissions = self.admissions.lock().await;

        loop {
            let now = Instant::now();

            // Drop admissions that have aged out of the window.
            while admissions
                .front()
                .is_some_and(|&t| now.duration_since(t) >= self.interval)
            {
                admissions.pop_front();
            }

            if admissions.len() < self.limit {
                admissions.push_back(now);
                return;
            }

            // Window is full; the oldest admission leaves it first.
            let reopens_at = *admissions.front().expect("window is full") + self.interval;
            sleep(reopens_at - now).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(limit: u32, interval_ms: u64) -> ThrottleConfig {
        ThrottleConfig {
            limit,
            interval: Duration::from_millis(interval_ms),
        }
    }

    #[test]
    fn test_default_config() {
        let config = ThrottleConfig::default();
        assert_eq!(config.limit, 100);
        assert_eq!(config.interval, Duration::from_millis(1000));
    }

    #[test]
    #[should_panic(expected = "limit must be > 0")]
    fn test_zero_limit_panics() {
        Throttle::new(config(0, 1000));
    }

    #[test]
    #[should_panic(expected = "interval must be non-zero")]
    fn test_zero_interval_panics() {
        Throttle::new(config(5, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_admissions_under_limit_are_immediate() {
        let throttle = Throttle::new(config(3, 1000));
        let start = Instant::now();

        for _ in 0..3 {
            throttle.acquire().await;
        }

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_excess_admissions_wait_for_the_window() {
        let throttle = Throttle::new(config(2, 1000));
        let start = Instant::now();
        let mut admitted_at = Vec::new();

        for _ in 0..5 {
            throttle.acquire().await;
            admitted_at.push(start.elapsed());
        }

        assert_eq!(admitted_at[0], Duration::ZERO);
        assert_eq!(admitted_at[1], Duration::ZERO);
        assert!(admitted_at[2] >= Duration::from_millis(1000));
        assert!(admitted_at[3] >= Duration::from_millis(1000));
        assert!(admitted_at[4] >= Duration::from_millis(2000));

        // No half-open window of one interval holds more than two admissions.
        for (i, &t) in admitted_at.iter().enumerate() {
            let in_window = admitted_at[i..]
                .iter()
                .filter(|&&u| u - t < Duration::from_millis(1000))
                .count();
            assert!(in_window <= 2, "window starting at {:?} holds {}", t, in_window);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_reopens_after_idle_period() {
        let throttle = Throttle::new(config(2, 1000));

        throttle.acquire().await;
        throttle.acquire().await;
        tokio::time::advance(Duration::from_millis(1500)).await;

        let start = Instant::now();
        throttle.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_are_admitted_in_order() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let throttle = Arc::new(Throttle::new(config(1, 100)));
        let next = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for i in 0..4 {
            let throttle = Arc::clone(&throttle);
            let next = Arc::clone(&next);
            handles.push(tokio::spawn(async move {
                throttle.acquire().await;
                // Arrival order is spawn order on the paused current-thread
                // runtime; admission order must match it.
                assert_eq!(next.fetch_add(1, Ordering::SeqCst), i);
            }));
            // Let the task reach the throttle before spawning the next one.
            tokio::task::yield_now().await;
        }

        for handle in handles {
            handle.await.expect("throttled task panicked");
        }
    }
}
