use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Spaces out requests so that at most `per_second` are issued each second.
pub struct Throttle {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn per_second(per_second: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / per_second.max(1),
            last: Mutex::new(None),
        }
    }

    /// Waits until the next request slot is free and claims it.
    pub async fn wait(&self) {
        let mut last = self.last.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.interval {
                let remaining = self.interval - elapsed;
                debug!(?remaining, "Throttling request");
                tokio::time::sleep(remaining).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_second_request_waits_for_interval() {
        let throttle = Throttle::per_second(2);
        let start = Instant::now();

        throttle.wait().await;
        assert!(start.elapsed() < Duration::from_millis(1));

        throttle.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_interval_passed() {
        let throttle = Throttle::per_second(2);
        throttle.wait().await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        let before = Instant::now();
        throttle.wait().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }
}
