//! Tuning configuration.
//!
//! All probability tables and rating weights live here so balance changes
//! never touch engine logic.
//!
//! ```rust
//! use matchday_core::engine::SimTuning;
//!
//! let tuning = SimTuning::default();
//! assert!(tuning.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

use crate::error::{EngineError, Result};
use crate::models::settings::MAX_DURATION;
use crate::models::EventTag;

/// Environment variable naming a tuning file (JSON or YAML).
pub const TUNING_PATH_ENV: &str = "MATCHDAY_TUNING_PATH";

pub const BASE_EVENT_PROBABILITY: f32 = 0.15;
pub const LATE_SURGE_AFTER_MINUTE: u16 = 80;
pub const LATE_SURGE_MULTIPLIER: f32 = 1.5;
/// Exclusive bounds of the post-restart surge window.
pub const RESTART_WINDOW: (u16, u16) = (45, 50);
pub const RESTART_MULTIPLIER: f32 = 1.3;

pub const GOAL_ACTIVATION: f32 = 0.30;
pub const MISS_ACTIVATION: f32 = 0.20;
pub const SAVE_ACTIVATION: f32 = 0.15;
pub const CARD_ACTIVATION: f32 = 0.10;
pub const INJURY_ACTIVATION: f32 = 0.05;

pub const ASSIST_PROBABILITY: f32 = 0.70;

pub const MIN_DELAY_MS: u64 = 50;
pub const BASE_DELAY_MS: u64 = 1000;
pub const MAX_WALL_MS: u64 = 60_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimTuning {
    pub event_rates: EventRates,
    pub kind_activation: KindActivation,
    /// Chance a home goal carries an assist.
    pub assist_probability: f32,
    pub rating: RatingWeights,
    pub pacing: PacingConfig,
}

impl Default for SimTuning {
    fn default() -> Self {
        Self {
            event_rates: EventRates::default(),
            kind_activation: KindActivation::default(),
            assist_probability: ASSIST_PROBABILITY,
            rating: RatingWeights::default(),
            pacing: PacingConfig::default(),
        }
    }
}

/// Outer per-minute roll.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EventRates {
    pub base_probability: f32,
    pub late_surge_after: u16,
    pub late_surge_mult: f32,
    pub restart_window: (u16, u16),
    pub restart_mult: f32,
}

impl Default for EventRates {
    fn default() -> Self {
        Self {
            base_probability: BASE_EVENT_PROBABILITY,
            late_surge_after: LATE_SURGE_AFTER_MINUTE,
            late_surge_mult: LATE_SURGE_MULTIPLIER,
            restart_window: RESTART_WINDOW,
            restart_mult: RESTART_MULTIPLIER,
        }
    }
}

impl EventRates {
    /// Probability that anything happens in `minute`.
    pub fn probability_at(&self, minute: u16) -> f32 {
        let mut p = self.base_probability;
        if minute > self.late_surge_after {
            p *= self.late_surge_mult;
        }
        let (open, close) = self.restart_window;
        if minute > open && minute < close {
            p *= self.restart_mult;
        }
        p
    }
}

/// Inner per-kind gate. Applied after the outer roll fired and a kind was
/// picked uniformly; the two stages compound.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KindActivation {
    pub goal: f32,
    pub miss: f32,
    pub save: f32,
    pub card: f32,
    pub injury: f32,
}

impl Default for KindActivation {
    fn default() -> Self {
        Self {
            goal: GOAL_ACTIVATION,
            miss: MISS_ACTIVATION,
            save: SAVE_ACTIVATION,
            card: CARD_ACTIVATION,
            injury: INJURY_ACTIVATION,
        }
    }
}

impl KindActivation {
    /// Kinds the generator can roll directly. Assists only follow goals.
    pub const ROLLABLE: [EventTag; 5] =
        [EventTag::Goal, EventTag::Miss, EventTag::Save, EventTag::Card, EventTag::Injury];

    pub fn probability(&self, tag: EventTag) -> f32 {
        match tag {
            EventTag::Goal => self.goal,
            EventTag::Miss => self.miss,
            EventTag::Save => self.save,
            EventTag::Card => self.card,
            EventTag::Injury => self.injury,
            EventTag::Assist => 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RatingWeights {
    pub base: f32,
    pub goal: f32,
    pub assist: f32,
    pub save: f32,
    pub card: f32,
    pub miss: f32,
    /// Half-width of the uniform noise added to every player.
    pub noise: f32,
    pub attribute_pivot: f32,
    pub attribute_scale: f32,
    pub match_base: f32,
    pub match_goal_diff: f32,
    pub match_per_event: f32,
}

impl Default for RatingWeights {
    fn default() -> Self {
        Self {
            base: 6.0,
            goal: 1.0,
            assist: 0.5,
            save: 0.3,
            card: -0.5,
            miss: -0.3,
            noise: 1.0,
            attribute_pivot: 70.0,
            attribute_scale: 30.0,
            match_base: 5.0,
            match_goal_diff: 0.5,
            match_per_event: 0.1,
        }
    }
}

impl RatingWeights {
    pub fn delta(&self, tag: EventTag) -> f32 {
        match tag {
            EventTag::Goal => self.goal,
            EventTag::Assist => self.assist,
            EventTag::Save => self.save,
            EventTag::Card => self.card,
            EventTag::Miss => self.miss,
            EventTag::Injury => 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PacingConfig {
    pub min_delay_ms: u64,
    pub base_delay_ms: u64,
    /// Upper bound on total paced playback, whatever the game speed.
    pub max_wall_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self { min_delay_ms: MIN_DELAY_MS, base_delay_ms: BASE_DELAY_MS, max_wall_ms: MAX_WALL_MS }
    }
}

impl SimTuning {
    pub fn validate(&self) -> Result<()> {
        let probabilities = [
            ("event_rates.base_probability", self.event_rates.base_probability),
            ("kind_activation.goal", self.kind_activation.goal),
            ("kind_activation.miss", self.kind_activation.miss),
            ("kind_activation.save", self.kind_activation.save),
            ("kind_activation.card", self.kind_activation.card),
            ("kind_activation.injury", self.kind_activation.injury),
            ("assist_probability", self.assist_probability),
        ];
        for (name, value) in probabilities {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(EngineError::InvalidTuning(format!("{name} must be in [0, 1], got {value}")));
            }
        }

        let multipliers = [
            ("event_rates.late_surge_mult", self.event_rates.late_surge_mult),
            ("event_rates.restart_mult", self.event_rates.restart_mult),
        ];
        for (name, value) in multipliers {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidTuning(format!("{name} must be >= 0, got {value}")));
            }
        }

        if !self.rating.noise.is_finite() || self.rating.noise < 0.0 {
            return Err(EngineError::InvalidTuning(format!(
                "rating.noise must be >= 0, got {}",
                self.rating.noise
            )));
        }
        if !self.rating.attribute_scale.is_finite() || self.rating.attribute_scale <= 0.0 {
            return Err(EngineError::InvalidTuning(format!(
                "rating.attribute_scale must be > 0, got {}",
                self.rating.attribute_scale
            )));
        }
        if self.pacing.max_wall_ms == 0 {
            return Err(EngineError::InvalidTuning("pacing.max_wall_ms must be > 0".to_string()));
        }
        // The longest match must still fit min_delay_ms between every minute
        let floor_budget = self.pacing.min_delay_ms.saturating_mul(MAX_DURATION as u64);
        if self.pacing.max_wall_ms < floor_budget {
            return Err(EngineError::InvalidTuning(format!(
                "pacing.max_wall_ms must be >= {} ({}ms x {} minutes), got {}",
                floor_budget, self.pacing.min_delay_ms, MAX_DURATION, self.pacing.max_wall_ms
            )));
        }
        Ok(())
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let tuning: SimTuning = serde_json::from_str(content)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let tuning: SimTuning = serde_yaml::from_str(content)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load by extension: `.yaml`/`.yml` as YAML, anything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|source| EngineError::TuningIo { path: path.to_path_buf(), source })?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);
        if is_yaml {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    /// Defaults unless [`TUNING_PATH_ENV`] names a file.
    pub fn from_env() -> Result<Self> {
        let Ok(path) = env::var(TUNING_PATH_ENV) else {
            return Ok(Self::default());
        };
        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }
        tracing::info!(path, "loading tuning from {}", TUNING_PATH_ENV);
        Self::load(path)
    }
}
