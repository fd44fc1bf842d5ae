use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::match_result::PlayerMatchStats;

pub type PlayerId = Uuid;

/// Highest value any skill attribute (and the overall rating) may take.
pub const MAX_SKILL: u8 = 99;

/// Roster entry as supplied by the team manager.
///
/// The engine only ever reads players. Career accumulators are updated by the
/// calling layer after a run via [`Player::record_match`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    pub skills: PlayerSkills,
    /// Derived summary of `skills` (0-99), used as the selection weight.
    pub overall: u8,
    #[serde(default)]
    pub career: CareerRecord,
}

impl Player {
    /// Create a player with a fresh id and an overall derived from `skills`.
    pub fn new(name: impl Into<String>, position: Position, skills: PlayerSkills) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            position,
            overall: skills.overall(),
            skills,
            career: CareerRecord::default(),
        }
    }

    /// Overall rating as a selection weight. Out-of-range roster data is clamped.
    pub fn weight(&self) -> f32 {
        self.overall.min(MAX_SKILL) as f32
    }

    /// Fold one match worth of statistics into the career accumulators.
    pub fn record_match(&mut self, stats: &PlayerMatchStats) {
        debug_assert_eq!(stats.player_id, self.id);
        self.career.appearances += 1;
        self.career.goals += stats.goals;
        self.career.assists += stats.assists;
    }
}

/// Six skill attributes, each 0-99.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
pub struct PlayerSkills {
    pub mobility: u8,
    pub finishing: u8,
    pub passing: u8,
    pub control: u8,
    pub marking: u8,
    pub power: u8,
}

impl PlayerSkills {
    pub fn new(mobility: u8, finishing: u8, passing: u8, control: u8, marking: u8, power: u8) -> Self {
        Self {
            mobility: mobility.min(MAX_SKILL),
            finishing: finishing.min(MAX_SKILL),
            passing: passing.min(MAX_SKILL),
            control: control.min(MAX_SKILL),
            marking: marking.min(MAX_SKILL),
            power: power.min(MAX_SKILL),
        }
    }

    /// Same value for every attribute.
    pub fn uniform(value: u8) -> Self {
        Self::new(value, value, value, value, value, value)
    }

    /// Rounded mean of the six attributes.
    pub fn overall(&self) -> u8 {
        let sum: u32 = [self.mobility, self.finishing, self.passing, self.control, self.marking, self.power]
            .iter()
            .map(|&v| v.min(MAX_SKILL) as u32)
            .sum();
        ((sum as f32 / 6.0).round() as u8).min(MAX_SKILL)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
pub struct CareerRecord {
    pub goals: u32,
    pub assists: u32,
    pub appearances: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    GK,
    CB,
    LB,
    RB,
    CDM,
    CM,
    CAM,
    LW,
    RW,
    ST,
}

impl Position {
    pub const ALL: [Position; 10] = [
        Position::GK,
        Position::CB,
        Position::LB,
        Position::RB,
        Position::CDM,
        Position::CM,
        Position::CAM,
        Position::LW,
        Position::RW,
        Position::ST,
    ];

    pub fn group(&self) -> PositionGroup {
        match self {
            Position::GK => PositionGroup::Goalkeeper,
            Position::CB | Position::LB | Position::RB => PositionGroup::Defender,
            Position::CDM | Position::CM | Position::CAM => PositionGroup::Midfielder,
            Position::LW | Position::RW | Position::ST => PositionGroup::Attacker,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::GK => "GK",
            Position::CB => "CB",
            Position::LB => "LB",
            Position::RB => "RB",
            Position::CDM => "CDM",
            Position::CM => "CM",
            Position::CAM => "CAM",
            Position::LW => "LW",
            Position::RW => "RW",
            Position::ST => "ST",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown position: {}", s))
    }
}

/// Coarse role buckets used to narrow participant selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PositionGroup {
    Attacker,
    Midfielder,
    Defender,
    Goalkeeper,
}

impl PositionGroup {
    pub fn positions(&self) -> &'static [Position] {
        match self {
            PositionGroup::Attacker => &[Position::LW, Position::RW, Position::ST],
            PositionGroup::Midfielder => &[Position::CDM, Position::CM, Position::CAM],
            PositionGroup::Defender => &[Position::CB, Position::LB, Position::RB],
            PositionGroup::Goalkeeper => &[Position::GK],
        }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.group() == *self
    }
}
