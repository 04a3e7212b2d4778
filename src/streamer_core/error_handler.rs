use std::time::Duration;
use tokio::time::sleep;

/// Reconnect delay policy: doubles per attempt, capped, bounded attempts
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    initial_delay: Duration,
    max_delay: Duration,
    max_retries: u32,
    current_attempt: u32,
}

#[derive(Debug)]
pub struct MaxRetriesExceeded;

impl std::fmt::Display for MaxRetriesExceeded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Maximum retry attempts exceeded")
    }
}

impl std::error::Error for MaxRetriesExceeded {}

impl ExponentialBackoff {
    pub fn new(initial: Duration, max: Duration, retries: u32) -> Self {
        Self {
            initial_delay: initial,
            max_delay: max,
            max_retries: retries,
            current_attempt: 0,
        }
    }

    /// Policy used for the timeline stream: 5s, 10s, 20s, 40s, then 60s, 10 attempts
    pub fn for_stream() -> Self {
        Self::new(Duration::from_secs(5), Duration::from_secs(60), 10)
    }

    /// Delay before the next attempt, or an error once attempts are used up
    pub fn next_delay(&mut self) -> Result<Duration, MaxRetriesExceeded> {
        if self.current_attempt >= self.max_retries {
            return Err(MaxRetriesExceeded);
        }

        let factor = 2u32.checked_pow(self.current_attempt).unwrap_or(u32::MAX);
        let delay = self
            .initial_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay));

        self.current_attempt += 1;
        Ok(delay)
    }

    pub async fn sleep(&mut self) -> Result<(), MaxRetriesExceeded> {
        let delay = self.next_delay()?;

        log::warn!(
            "⏳ Retry attempt {} of {} in {}s",
            self.current_attempt,
            self.max_retries,
            delay.as_secs_f64()
        );

        sleep(delay).await;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.current_attempt = 0;
    }

    pub fn attempts(&self) -> u32 {
        self.current_attempt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays_double_and_cap() {
        let mut backoff = ExponentialBackoff::for_stream();
        let delays: Vec<u64> = (0..6)
            .map(|_| backoff.next_delay().unwrap().as_secs())
            .collect();
        assert_eq!(delays, vec![5, 10, 20, 40, 60, 60]);
    }

    #[test]
    fn test_retries_exhausted() {
        let mut backoff = ExponentialBackoff::new(
            Duration::from_millis(1),
            Duration::from_millis(4),
            2,
        );
        assert!(backoff.next_delay().is_ok());
        assert!(backoff.next_delay().is_ok());
        assert!(backoff.next_delay().is_err());
    }

    #[test]
    fn test_reset_starts_over() {
        let mut backoff = ExponentialBackoff::new(
            Duration::from_secs(1),
            Duration::from_secs(30),
            3,
        );
        backoff.next_delay().unwrap();
        backoff.next_delay().unwrap();
        backoff.reset();

        assert_eq!(backoff.attempts(), 0);
        assert_eq!(backoff.next_delay().unwrap(), Duration::from_secs(1));
    }

    #[test]
    fn test_large_attempt_counts_do_not_overflow() {
        let mut backoff = ExponentialBackoff::new(
            Duration::from_secs(5),
            Duration::from_secs(60),
            100,
        );
        for _ in 0..99 {
            assert!(backoff.next_delay().unwrap() <= Duration::from_secs(60));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_waits_for_delay() {
        let mut backoff = ExponentialBackoff::new(
            Duration::from_secs(5),
            Duration::from_secs(60),
            1,
        );
        let start = tokio::time::Instant::now();

        backoff.sleep().await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(5));
        assert!(backoff.sleep().await.is_err());
    }
}
