use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{Semaphore, SemaphorePermit};
use tokio::task::JoinHandle;
use tokio::time::interval;

/// Hands out at most `limit` request slots across all workers.
#[derive(Debug)]
pub(super) struct RequestLimiter {
    limit: u64,
    counter: AtomicU64,
}

impl RequestLimiter {
    pub(super) const fn new(limit: u64) -> Self {
        Self {
            limit,
            counter: AtomicU64::new(0),
        }
    }

    pub(super) fn try_reserve(&self) -> bool {
        loop {
            let current = self.counter.load(Ordering::Relaxed);
            if current >= self.limit {
                return false;
            }
            let Some(next) = current.checked_add(1) else {
                return false;
            };
            if self
                .counter
                .compare_exchange(current, next, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                return true;
            }
        }
    }
}

/// Fixed requests-per-second budget, refilled once per second.
pub(super) struct RateLimiter {
    permits: Arc<Semaphore>,
    refill: JoinHandle<()>,
}

impl RateLimiter {
    pub(super) fn per_second(rate: u64) -> Self {
        let permits = Arc::new(Semaphore::new(0));
        let refill = spawn_fixed_rate_controller(permits.clone(), rate);
        Self { permits, refill }
    }

    pub(super) async fn acquire(&self) -> bool {
        self.permits
            .acquire()
            .await
            .map(SemaphorePermit::forget)
            .is_ok()
    }
}

impl Drop for RateLimiter {
    fn drop(&mut self) {
        self.refill.abort();
    }
}

fn spawn_fixed_rate_controller(limiter: Arc<Semaphore>, rate: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let rate_per_sec = usize::try_from(rate.max(1)).unwrap_or(Semaphore::MAX_PERMITS);
        let rate_per_sec = rate_per_sec.min(Semaphore::MAX_PERMITS);
        let mut rate_tick = interval(Duration::from_secs(1));
        loop {
            rate_tick.tick().await;
            let available = limiter.available_permits();
            if available < rate_per_sec {
                limiter.add_permits(rate_per_sec.saturating_sub(available));
            }
        }
    })
}
