//! Paced playback on the tokio runtime.
//!
//! The engine itself never waits. This driver calls `step`, reports each
//! minute and then suspends for the pacing delay, racing the delay against a
//! [`CancelToken`]. Cancelling drops the partial match and returns
//! [`EngineError::Cancelled`].

use tokio::sync::watch;

use crate::engine::budget::RunBudget;
use crate::engine::clock::{MinuteTick, Step};
use crate::engine::rng::RandomSource;
use crate::engine::MatchEngine;
use crate::error::{EngineError, Result};
use crate::models::SimulationResult;

/// Sender half: flips the shared flag once, waking every waiting token.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn token(&self) -> CancelToken {
        CancelToken { rx: self.tx.subscribe() }
    }
}

#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled. Never resolves if the handle was dropped
    /// without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

impl<R: RandomSource> MatchEngine<R> {
    /// Paced run that can't be cancelled from outside.
    pub async fn run(self, on_progress: impl FnMut(&MinuteTick)) -> Result<SimulationResult> {
        let (_handle, token) = cancel_pair();
        self.run_with_cancel(on_progress, &token).await
    }

    pub async fn run_with_cancel(
        mut self,
        mut on_progress: impl FnMut(&MinuteTick),
        cancel: &CancelToken,
    ) -> Result<SimulationResult> {
        let delay = self.pacing_delay();
        let duration = self.settings().duration;
        let mut budget = RunBudget::new(self.tuning().pacing.max_wall_ms);
        let mut paced = true;
        tracing::info!(delay_ms = delay.as_millis() as u64, duration, "paced run started");

        loop {
            if cancel.is_cancelled() {
                return Err(self.cancelled());
            }
            let tick = match self.step() {
                Step::Minute(tick) => tick,
                Step::Finished => break,
            };
            on_progress(&tick);

            if !budget.tick_minute() && paced {
                if let Some(reason) = budget.exceeded_reason() {
                    tracing::warn!(%reason, "pacing dropped for the rest of the match");
                }
                paced = false;
            }
            if !paced || tick.minute >= duration {
                continue;
            }

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel.cancelled() => return Err(self.cancelled()),
            }
        }

        let result = self.finish()?;
        tracing::info!(score = %result.score, match_rating = result.match_rating, "paced run finished");
        Ok(result)
    }

    fn cancelled(&self) -> EngineError {
        let minute = self.clock().minute();
        tracing::info!(minute, "match cancelled");
        EngineError::Cancelled { minute }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::models::{Player, PlayerSkills, Position, SimulationSettings};

    fn roster() -> Vec<Player> {
        [Position::GK, Position::CB, Position::CM, Position::CAM, Position::ST]
            .iter()
            .enumerate()
            .map(|(i, &pos)| Player::new(format!("P{}", i), pos, PlayerSkills::uniform(65)))
            .collect()
    }

    fn settings(duration: u16) -> SimulationSettings {
        SimulationSettings { duration, game_speed: 10, ..Default::default() }
    }

    #[tokio::test(start_paused = true)]
    async fn test_paced_run_sleeps_between_minutes() {
        let roster = roster();
        let engine = MatchEngine::with_seed(&roster, settings(5), 7).unwrap();
        assert_eq!(engine.pacing_delay(), Duration::from_millis(100));

        let start = tokio::time::Instant::now();
        let mut seen = Vec::new();
        let result = engine.run(|tick| seen.push((tick.minute, start.elapsed()))).await.unwrap();

        let minutes: Vec<u16> = seen.iter().map(|(m, _)| *m).collect();
        assert_eq!(minutes, vec![1, 2, 3, 4, 5]);
        for window in seen.windows(2) {
            assert!(window[1].1 - window[0].1 >= Duration::from_millis(100));
        }
        // No pause after the final whistle
        assert!(start.elapsed() < Duration::from_millis(500));
        assert_eq!(result.duration, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wall_time_scales_with_game_speed() {
        let roster = roster();
        let mut elapsed = Vec::new();
        for game_speed in [10, 5] {
            let settings = SimulationSettings { duration: 45, game_speed, ..Default::default() };
            let engine = MatchEngine::with_seed(&roster, settings, 1).unwrap();
            let start = tokio::time::Instant::now();
            engine.run(|_| {}).await.unwrap();
            elapsed.push(start.elapsed());
        }
        // 44 pauses of 100ms, then of 200ms
        assert!(elapsed[0] >= Duration::from_millis(4_400) && elapsed[0] < Duration::from_millis(4_500));
        assert!(elapsed[1] >= Duration::from_millis(8_800) && elapsed[1] < Duration::from_millis(8_900));
    }

    #[tokio::test(start_paused = true)]
    async fn test_paced_and_instant_runs_agree() {
        let roster = roster();
        let paced = MatchEngine::with_seed(&roster, settings(90), 42).unwrap().run(|_| {}).await.unwrap();
        let instant = MatchEngine::with_seed(&roster, settings(90), 42)
            .unwrap()
            .run_instant(|_| {})
            .unwrap();
        assert_eq!(paced, instant);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_from_callback() {
        let roster = roster();
        let engine = MatchEngine::with_seed(&roster, settings(90), 3).unwrap();
        let (handle, token) = cancel_pair();
        let mut last = 0;
        let err = engine
            .run_with_cancel(
                |tick| {
                    last = tick.minute;
                    if tick.minute == 3 {
                        handle.cancel();
                    }
                },
                &token,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Cancelled { minute: 3 }));
        assert_eq!(last, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_pause() {
        let roster = roster();
        let engine = MatchEngine::with_seed(&roster, settings(90), 3).unwrap();
        let (handle, token) = cancel_pair();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(250)).await;
            handle.cancel();
        });

        let mut notified = 0;
        let err = engine.run_with_cancel(|_| notified += 1, &token).await.unwrap_err();
        // Minutes at 0, 100 and 200ms; the cancel lands in the third pause
        assert!(matches!(err, EngineError::Cancelled { minute: 3 }));
        assert_eq!(notified, 3);
    }

    #[tokio::test]
    async fn test_dropped_handle_never_cancels() {
        let (handle, token) = cancel_pair();
        drop(handle);
        assert!(!token.is_cancelled());
        let waited = tokio::time::timeout(Duration::from_millis(20), token.cancelled()).await;
        assert!(waited.is_err());
    }

    #[test]
    fn test_token_from_handle_sees_cancel() {
        let (handle, _token) = cancel_pair();
        let extra = handle.token();
        handle.cancel();
        assert!(extra.is_cancelled());
    }
}
