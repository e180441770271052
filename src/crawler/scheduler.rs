//! Request scheduling for the HTTP fetcher
//!
//! This module handles:
//! - Global concurrency limiting via a semaphore
//! - Per-origin spacing: requests to one origin are given time slots at least
//!   `request-delay-ms` apart, in the order they asked for one

use crate::config::CrawlerConfig;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{AcquireError, Semaphore, SemaphorePermit};
use tokio::time::Instant;
use url::Url;

/// Permission to send one request
///
/// Holds a concurrency slot until dropped.
pub struct ScheduledRequest<'a> {
    _permit: SemaphorePermit<'a>,
}

/// Throttles requests by concurrency and per-origin delay
pub struct OriginThrottle {
    /// Global semaphore for limiting concurrent fetches
    permits: Semaphore,

    /// Minimum time between two requests to the same origin
    delay: Duration,

    /// Earliest instant the next request to each origin may start
    next_slot: Mutex<HashMap<String, Instant>>,
}

impl OriginThrottle {
    /// Creates a throttle allowing `parallelism` requests in flight
    pub fn new(parallelism: usize, delay: Duration) -> Self {
        Self {
            permits: Semaphore::new(parallelism.max(1)),
            delay,
            next_slot: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a throttle from the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(
            config.parallelism as usize,
            Duration::from_millis(config.request_delay_ms),
        )
    }

    /// Waits until a request to `url` may be sent
    ///
    /// A concurrency slot is taken first, then a time slot for the URL's
    /// origin is reserved and slept until. The returned guard must be held
    /// for the duration of the request.
    pub async fn acquire(&self, url: &Url) -> Result<ScheduledRequest<'_>, AcquireError> {
        let permit = self.permits.acquire().await?;

        let slot = self.reserve(&origin_key(url), Instant::now());
        if slot > Instant::now() {
            tracing::trace!("Delaying request to {} by {:?}", url, slot - Instant::now());
            tokio::time::sleep_until(slot).await;
        }

        Ok(ScheduledRequest { _permit: permit })
    }

    /// Reserves the next time slot for `origin`
    ///
    /// Returns the instant the request may start: `now` if the origin has been
    /// quiet for at least the delay, otherwise the end of the last reservation.
    fn reserve(&self, origin: &str, now: Instant) -> Instant {
        let mut slots = self.next_slot.lock().unwrap_or_else(PoisonError::into_inner);

        let slot = match slots.get(origin) {
            Some(&next) if next > now => next,
            _ => now,
        };
        slots.insert(origin.to_string(), slot + self.delay);

        slot
    }

    /// Returns the number of requests that may start right now
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }
}

/// Returns the key requests are spaced by: scheme, host and port
fn origin_key(url: &Url) -> String {
    url.origin().ascii_serialization()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_origin_key_ignores_path_and_query() {
        assert_eq!(
            origin_key(&url("https://psnprofiles.com/guides/popular?page=2")),
            origin_key(&url("https://psnprofiles.com/guide/1-game"))
        );
        assert_ne!(
            origin_key(&url("https://psnprofiles.com/")),
            origin_key(&url("http://psnprofiles.com/"))
        );
    }

    #[tokio::test]
    async fn test_reservations_are_spaced_per_origin() {
        let throttle = OriginThrottle::new(4, Duration::from_millis(100));
        let now = Instant::now();

        let first = throttle.reserve("https://a.example", now);
        let second = throttle.reserve("https://a.example", now);
        let third = throttle.reserve("https://a.example", now);
        let other = throttle.reserve("https://b.example", now);

        assert_eq!(first, now);
        assert_eq!(second, now + Duration::from_millis(100));
        assert_eq!(third, now + Duration::from_millis(200));
        assert_eq!(other, now);
    }

    #[tokio::test]
    async fn test_quiet_origin_is_not_delayed() {
        let throttle = OriginThrottle::new(1, Duration::from_millis(100));
        let start = Instant::now();

        throttle.reserve("https://a.example", start);
        let later = start + Duration::from_millis(500);
        assert_eq!(throttle.reserve("https://a.example", later), later);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_waits_for_slot() {
        let throttle = OriginThrottle::new(2, Duration::from_secs(4));
        let target = url("https://psnprofiles.com/guide/1");
        let start = Instant::now();

        drop(throttle.acquire(&target).await.unwrap());
        let _second = throttle.acquire(&target).await.unwrap();

        assert!(start.elapsed() >= Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_permit_limits_concurrency() {
        let throttle = OriginThrottle::new(1, Duration::ZERO);
        let target = url("https://psnprofiles.com/guide/1");

        let held = throttle.acquire(&target).await.unwrap();
        assert_eq!(throttle.available_permits(), 0);
        drop(held);
        assert_eq!(throttle.available_permits(), 1);
    }
}
