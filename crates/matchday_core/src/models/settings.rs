use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const MIN_GAME_SPEED: u8 = 1;
pub const MAX_GAME_SPEED: u8 = 10;
pub const MAX_DURATION: u16 = 120;

/// Per-match settings. Immutable for the lifetime of one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate, JsonSchema)]
pub struct SimulationSettings {
    /// Playback pacing, 1-10. Higher means faster wall-clock playback.
    #[validate(range(min = 1, max = 10))]
    pub game_speed: u8,
    /// Simulated minutes.
    #[validate(range(min = 1, max = 120))]
    pub duration: u16,
    pub difficulty: Difficulty,
    #[validate(range(min = 30.0, max = 100.0))]
    pub opponent_strength: f32,
    pub weather: Weather,
    pub pitch: PitchCondition,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            game_speed: 5,
            duration: 90,
            difficulty: Difficulty::Medium,
            opponent_strength: 60.0,
            weather: Weather::Sunny,
            pitch: PitchCondition::Good,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Sunny,
    Rainy,
    Windy,
    Snow,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PitchCondition {
    Excellent,
    #[default]
    Good,
    Poor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(SimulationSettings::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_fields_rejected() {
        let mut settings = SimulationSettings { game_speed: 0, ..Default::default() };
        assert!(settings.validate().is_err());

        settings.game_speed = MAX_GAME_SPEED;
        settings.duration = MAX_DURATION + 1;
        assert!(settings.validate().is_err());

        settings.duration = 45;
        settings.opponent_strength = 12.0;
        let errors = settings.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("opponent_strength"));
    }

    #[test]
    fn test_settings_json_shape() {
        let json = r#"{
            "game_speed": 10,
            "duration": 90,
            "difficulty": "medium",
            "opponent_strength": 75,
            "weather": "sunny",
            "pitch": "excellent"
        }"#;
        let settings: SimulationSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.pitch, PitchCondition::Excellent);
        assert_eq!(settings.opponent_strength, 75.0);
        assert!(settings.validate().is_ok());
    }
}
