//! Request throttle for the TMDB API.

use std::time::Duration;

use tokio::time::Instant;

/// Default minimum spacing between requests (~40 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Spaces consecutive requests at least `min_interval` apart.
///
/// TMDB allows roughly 40 requests per second per client. Catalog
/// fan-out (all home categories at once) can exceed that without spacing.
#[derive(Debug)]
pub struct RequestThrottle {
    min_interval: Duration,
    next_slot: Option<Instant>,
}

impl RequestThrottle {
    /// Creates a throttle with the given minimum interval.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: None,
        }
    }

    /// Creates a throttle with the default interval (25ms).
    pub(crate) const fn with_default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Waits for the next free slot and reserves the one after it.
    ///
    /// Returns how long the caller was delayed.
    pub async fn acquire(&mut self) -> Duration {
        let now = Instant::now();
        let slot = self.next_slot.map_or(now, |next| next.max(now));
        let delay = slot.saturating_duration_since(now);

        if !delay.is_zero() {
            tokio::time::sleep_until(slot).await;
        }

        self.next_slot = slot.checked_add(self.min_interval);
        delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_acquire_does_not_wait() {
        // Arrange
        let mut throttle = RequestThrottle::new(Duration::from_secs(1));

        // Act
        let delay = throttle.acquire().await;

        // Assert
        assert_eq!(delay, Duration::ZERO);
        assert!(throttle.next_slot.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_acquire_waits_for_interval() {
        // Arrange
        let mut throttle = RequestThrottle::new(Duration::from_millis(50));
        let start = Instant::now();

        // Act
        throttle.acquire().await;
        let delay = throttle.acquire().await;

        // Assert
        assert_eq!(delay, Duration::from_millis(50));
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_period_resets_spacing() {
        // Arrange
        let mut throttle = RequestThrottle::new(Duration::from_millis(50));
        throttle.acquire().await;
        tokio::time::sleep(Duration::from_millis(200)).await;

        // Act
        let delay = throttle.acquire().await;

        // Assert
        assert_eq!(delay, Duration::ZERO);
    }

    #[test]
    fn test_default_interval() {
        // Arrange & Act
        let throttle = RequestThrottle::with_default_interval();

        // Assert
        assert_eq!(throttle.min_interval, Duration::from_millis(25));
    }
}
