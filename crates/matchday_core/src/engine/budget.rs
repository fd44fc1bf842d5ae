use std::time::Duration;
use tokio::time::Instant;

/// Wall-clock budget for one paced run.
///
/// Pacing already sizes the per-minute delay to fit the budget; this catches
/// the remainder (slow progress callbacks, a stalled runtime). Once exceeded,
/// the runner stops suspending and plays the remaining minutes back to back.
#[derive(Debug, Clone)]
pub struct RunBudget {
    start_time: Instant,
    max_wall_ms: u64,
    minutes_done: u16,
}

impl RunBudget {
    pub fn new(max_wall_ms: u64) -> Self {
        Self { start_time: Instant::now(), max_wall_ms, minutes_done: 0 }
    }

    /// Count a played minute and report whether pacing may continue.
    #[inline]
    pub fn tick_minute(&mut self) -> bool {
        self.minutes_done += 1;
        !self.is_timeout()
    }

    #[inline]
    pub fn is_timeout(&self) -> bool {
        self.start_time.elapsed() > Duration::from_millis(self.max_wall_ms)
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    pub fn exceeded_reason(&self) -> Option<String> {
        if self.is_timeout() {
            Some(format!(
                "Wall clock cap: {}ms > {}ms after {} minutes",
                self.elapsed_ms(),
                self.max_wall_ms,
                self.minutes_done
            ))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_budget_times_out_after_cap() {
        let mut budget = RunBudget::new(1_000);
        assert!(budget.tick_minute());
        assert!(budget.exceeded_reason().is_none());

        tokio::time::advance(Duration::from_millis(600)).await;
        assert!(budget.tick_minute());
        assert_eq!(budget.elapsed_ms(), 600);

        tokio::time::advance(Duration::from_millis(500)).await;
        assert!(!budget.tick_minute());
        assert!(budget.exceeded_reason().unwrap().contains("after 3 minutes"));
    }
}
