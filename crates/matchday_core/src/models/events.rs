use serde::{Deserialize, Serialize};
use std::fmt;

use super::player::{Player, PlayerId};

/// One entry of the match timeline.
///
/// Events are append-only and ordered by `minute`; within a minute they keep
/// generation order (a goal is always followed by its assist).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameEvent {
    pub minute: u16,
    pub is_home_team: bool,
    pub description: String,
    #[serde(flatten)]
    pub kind: EventKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    /// Away goals carry no scorer.
    Goal { scorer: Option<Participant> },
    Assist { provider: Participant },
    Miss { shooter: Participant },
    Save { keeper: Participant },
    Card { player: Participant },
    Injury { player: Participant },
}

/// Discriminant of [`EventKind`] without the payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventTag {
    Goal,
    Assist,
    Miss,
    Save,
    Card,
    Injury,
}

impl EventTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventTag::Goal => "goal",
            EventTag::Assist => "assist",
            EventTag::Miss => "miss",
            EventTag::Save => "save",
            EventTag::Card => "card",
            EventTag::Injury => "injury",
        }
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub id: PlayerId,
    pub name: String,
}

impl From<&Player> for Participant {
    fn from(player: &Player) -> Self {
        Self { id: player.id, name: player.name.clone() }
    }
}

impl GameEvent {
    pub fn home_goal(minute: u16, scorer: &Player) -> Self {
        Self {
            minute,
            is_home_team: true,
            description: format!("{}' GOAL! {} scores", minute, scorer.name),
            kind: EventKind::Goal { scorer: Some(scorer.into()) },
        }
    }

    pub fn away_goal(minute: u16) -> Self {
        Self {
            minute,
            is_home_team: false,
            description: format!("{}' Goal for the opposition", minute),
            kind: EventKind::Goal { scorer: None },
        }
    }

    pub fn assist(minute: u16, provider: &Player, scorer: &Player) -> Self {
        Self {
            minute,
            is_home_team: true,
            description: format!("{}' Assist by {} for {}", minute, provider.name, scorer.name),
            kind: EventKind::Assist { provider: provider.into() },
        }
    }

    pub fn miss(minute: u16, shooter: &Player) -> Self {
        Self {
            minute,
            is_home_team: true,
            description: format!("{}' {} shoots wide", minute, shooter.name),
            kind: EventKind::Miss { shooter: shooter.into() },
        }
    }

    pub fn save(minute: u16, keeper: &Player) -> Self {
        Self {
            minute,
            is_home_team: true,
            description: format!("{}' Great save by {}", minute, keeper.name),
            kind: EventKind::Save { keeper: keeper.into() },
        }
    }

    pub fn card(minute: u16, player: &Player) -> Self {
        Self {
            minute,
            is_home_team: true,
            description: format!("{}' Yellow card for {}", minute, player.name),
            kind: EventKind::Card { player: player.into() },
        }
    }

    pub fn injury(minute: u16, player: &Player) -> Self {
        Self {
            minute,
            is_home_team: true,
            description: format!("{}' {} goes down injured", minute, player.name),
            kind: EventKind::Injury { player: player.into() },
        }
    }

    pub fn tag(&self) -> EventTag {
        match self.kind {
            EventKind::Goal { .. } => EventTag::Goal,
            EventKind::Assist { .. } => EventTag::Assist,
            EventKind::Miss { .. } => EventTag::Miss,
            EventKind::Save { .. } => EventTag::Save,
            EventKind::Card { .. } => EventTag::Card,
            EventKind::Injury { .. } => EventTag::Injury,
        }
    }

    pub fn participant(&self) -> Option<&Participant> {
        match &self.kind {
            EventKind::Goal { scorer } => scorer.as_ref(),
            EventKind::Assist { provider } => Some(provider),
            EventKind::Miss { shooter } => Some(shooter),
            EventKind::Save { keeper } => Some(keeper),
            EventKind::Card { player } | EventKind::Injury { player } => Some(player),
        }
    }

    pub fn is_goal(&self) -> bool {
        matches!(self.kind, EventKind::Goal { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerSkills, Position};

    #[test]
    fn test_away_goal_is_unattributed() {
        let event = GameEvent::away_goal(33);
        assert!(event.is_goal());
        assert!(!event.is_home_team);
        assert!(event.participant().is_none());
    }

    #[test]
    fn test_event_serializes_with_kind_tag() {
        let keeper = Player::new("Oblak", Position::GK, PlayerSkills::uniform(85));
        let event = GameEvent::save(12, &keeper);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["kind"], "save");
        assert_eq!(value["minute"], 12);
        assert_eq!(value["keeper"]["name"], "Oblak");

        let back: GameEvent = serde_json::from_value(value).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.tag(), EventTag::Save);
    }

    #[test]
    fn test_participant_matches_kind_payload() {
        let player = Player::new("Son", Position::LW, PlayerSkills::uniform(88));
        let events = [
            GameEvent::home_goal(1, &player),
            GameEvent::miss(2, &player),
            GameEvent::card(3, &player),
            GameEvent::injury(4, &player),
        ];
        for event in &events {
            assert_eq!(event.participant().map(|p| p.id), Some(player.id));
        }
    }
}
