//! Simulated-time clock.
//!
//! `Idle -> Running(1..=duration) -> Completed`. The clock only counts
//! minutes; the engine decides what happens in each one and the driver
//! (instant or paced) decides how long to wait between them.

use std::time::Duration;

use crate::engine::config::PacingConfig;
use crate::models::settings::MIN_GAME_SPEED;
use crate::models::{GameEvent, Score};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Idle,
    Running { minute: u16 },
    Completed,
}

#[derive(Debug, Clone)]
pub struct MatchClock {
    duration: u16,
    state: ClockState,
}

impl MatchClock {
    pub fn new(duration: u16) -> Self {
        Self { duration, state: ClockState::Idle }
    }

    /// Move to the next minute. Returns `None` once the clock has completed.
    pub fn advance(&mut self) -> Option<u16> {
        let next = match self.state {
            ClockState::Idle => 1,
            ClockState::Running { minute } => minute.saturating_add(1),
            ClockState::Completed => return None,
        };
        if next > self.duration {
            self.state = ClockState::Completed;
            None
        } else {
            self.state = ClockState::Running { minute: next };
            Some(next)
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Last minute played, 0 before kick-off.
    pub fn minute(&self) -> u16 {
        match self.state {
            ClockState::Idle => 0,
            ClockState::Running { minute } => minute,
            ClockState::Completed => self.duration,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.state == ClockState::Completed
    }
}

/// Progress notification for one simulated minute.
#[derive(Debug, Clone, PartialEq)]
pub struct MinuteTick {
    pub minute: u16,
    /// Events generated this minute: none, one, or a goal followed by its assist.
    pub events: Vec<GameEvent>,
    /// Score after this minute.
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Minute(MinuteTick),
    Finished,
}

/// Wall-clock pause between two minutes of paced playback.
///
/// `max(min_delay, base_delay / game_speed)`, shortened when needed so a whole
/// match never exceeds `max_wall_ms`. `SimTuning::validate` keeps that cap at
/// or above `min_delay` for every valid duration.
pub fn pacing_delay(game_speed: u8, duration: u16, pacing: &PacingConfig) -> Duration {
    let speed = game_speed.max(MIN_GAME_SPEED) as u64;
    let paced = (pacing.base_delay_ms / speed).max(pacing.min_delay_ms);
    let capped = if duration == 0 { paced } else { paced.min(pacing.max_wall_ms / duration as u64) };
    Duration::from_millis(capped)
}
