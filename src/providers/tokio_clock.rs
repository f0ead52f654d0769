use async_trait::async_trait;
use std::time::{Duration, Instant};

use crate::traits::Clock;

/// Wall-clock [`Clock`] for the bootstrap binary.
///
/// Settle delays and receipt polling sleep on the tokio timer, so a paused
/// test runtime can advance through them without waiting.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl TokioClock {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn now(&self) -> Instant {
        Instant::now()
    }
}
