use chrono::{Local, NaiveDate, TimeZone, Utc};

/// Wall-clock source for the timer and the calendar's "today".
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;

    /// Local calendar date at `now_ms`.
    fn today(&self) -> NaiveDate {
        Local
            .timestamp_millis_opt(self.now_ms())
            .single()
            .map(|dt| dt.date_naive())
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Wall time at construction advanced by tokio's monotonic clock.
///
/// Follows `tokio::time::pause`/`advance`, so tests can drive the timer
/// through simulated minutes.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    base_ms: i64,
    anchor: tokio::time::Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            base_ms: Utc::now().timestamp_millis(),
            anchor: tokio::time::Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> i64 {
        self.base_ms + self.anchor.elapsed().as_millis() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn monotonic_clock_follows_paused_time() {
        let clock = MonotonicClock::new();
        let start = clock.now_ms();
        tokio::time::advance(Duration::from_secs(90)).await;
        assert_eq!(clock.now_ms() - start, 90_000);
    }

    #[test]
    fn system_clock_today_matches_local_date() {
        let today = SystemClock.today();
        let local = Local::now().date_naive();
        assert!((local - today).num_days().abs() <= 1);
    }
}
