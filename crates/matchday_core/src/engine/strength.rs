//! Team strength and environmental modifiers.
//!
//! All functions are pure - they take roster/settings as input and return
//! scalars. The engine evaluates them once per run.

use crate::models::{Difficulty, PitchCondition, Player, SimulationSettings, Weather};

pub const MIN_TEAM_STRENGTH: f32 = 30.0;
pub const MAX_TEAM_STRENGTH: f32 = 100.0;
/// Strength assumed for an empty roster.
pub const DEFAULT_TEAM_STRENGTH: f32 = 50.0;

/// Mean overall rating of the roster, clamped to `[30, 100]`.
pub fn team_strength(roster: &[Player]) -> f32 {
    if roster.is_empty() {
        return DEFAULT_TEAM_STRENGTH;
    }
    let total: f32 = roster.iter().map(Player::weight).sum();
    (total / roster.len() as f32).clamp(MIN_TEAM_STRENGTH, MAX_TEAM_STRENGTH)
}

pub fn weather_factor(weather: Weather) -> f32 {
    match weather {
        Weather::Sunny => 1.0,
        Weather::Rainy => 0.9,
        Weather::Windy => 0.85,
        Weather::Snow => 0.8,
    }
}

pub fn pitch_factor(pitch: PitchCondition) -> f32 {
    match pitch {
        PitchCondition::Excellent => 1.0,
        PitchCondition::Good => 0.95,
        PitchCondition::Poor => 0.85,
    }
}

pub fn difficulty_factor(difficulty: Difficulty) -> f32 {
    match difficulty {
        Difficulty::Easy => 1.2,
        Difficulty::Medium => 1.0,
        Difficulty::Hard => 0.8,
    }
}

/// Strength snapshot for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrengthModel {
    pub team_strength: f32,
    pub opponent_strength: f32,
    pub weather: f32,
    pub pitch: f32,
    pub difficulty: f32,
}

impl StrengthModel {
    pub fn new(roster: &[Player], settings: &SimulationSettings) -> Self {
        Self {
            team_strength: team_strength(roster),
            opponent_strength: settings.opponent_strength,
            weather: weather_factor(settings.weather),
            pitch: pitch_factor(settings.pitch),
            difficulty: difficulty_factor(settings.difficulty),
        }
    }

    /// Bernoulli parameter for "this event favours the home side". Fixed for
    /// the whole run.
    pub fn home_advantage(&self) -> f32 {
        let denom = self.team_strength + self.opponent_strength;
        if denom <= 0.0 {
            return 0.5;
        }
        (self.team_strength / denom * self.weather * self.pitch * self.difficulty).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerSkills, Position};

    fn player(position: Position, overall: u8) -> Player {
        let mut p = Player::new(format!("{position}-{overall}"), position, PlayerSkills::uniform(overall));
        p.overall = overall;
        p
    }

    #[test]
    fn test_empty_roster_defaults_to_fifty() {
        assert_eq!(team_strength(&[]), DEFAULT_TEAM_STRENGTH);
    }

    #[test]
    fn test_team_strength_is_clamped_mean() {
        assert_eq!(team_strength(&[player(Position::GK, 90)]), 90.0);
        assert_eq!(team_strength(&[player(Position::CB, 60), player(Position::ST, 80)]), 70.0);
        assert_eq!(team_strength(&[player(Position::CM, 0)]), MIN_TEAM_STRENGTH);
    }

    #[test]
    fn test_lookup_tables() {
        assert_eq!(weather_factor(Weather::Windy), 0.85);
        assert_eq!(weather_factor(Weather::Snow), 0.8);
        assert_eq!(pitch_factor(PitchCondition::Good), 0.95);
        assert_eq!(difficulty_factor(Difficulty::Easy), 1.2);
        assert_eq!(difficulty_factor(Difficulty::Hard), 0.8);
    }

    #[test]
    fn test_home_advantage_formula() {
        let settings = SimulationSettings {
            opponent_strength: 75.0,
            difficulty: Difficulty::Medium,
            weather: Weather::Sunny,
            pitch: PitchCondition::Excellent,
            ..Default::default()
        };
        let model = StrengthModel::new(&[], &settings);
        assert!((model.home_advantage() - 50.0 / 125.0).abs() < 1e-6);

        let settings = SimulationSettings {
            opponent_strength: 30.0,
            difficulty: Difficulty::Easy,
            weather: Weather::Rainy,
            pitch: PitchCondition::Poor,
            ..Default::default()
        };
        let model = StrengthModel::new(&[player(Position::GK, 90)], &settings);
        let expected = 90.0 / 120.0 * 0.9 * 0.85 * 1.2;
        assert!((model.home_advantage() - expected).abs() < 1e-6);
    }
}
