//! Match result data structures.
//!
//! `SimulationResult` is the sink of one engine run. `MatchRecord` is the
//! condensed form the calling layer appends to its match history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::events::{EventTag, GameEvent};
use super::player::PlayerId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Score {
    pub home: u16,
    pub away: u16,
}

impl Score {
    /// Home minus away.
    pub fn goal_difference(&self) -> i32 {
        self.home as i32 - self.away as i32
    }

    pub fn outcome(&self) -> MatchOutcome {
        match self.home.cmp(&self.away) {
            std::cmp::Ordering::Greater => MatchOutcome::Win,
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
            std::cmp::Ordering::Less => MatchOutcome::Loss,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} - {}", self.home, self.away)
    }
}

/// Outcome from the home side's point of view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Win,
    Draw,
    Loss,
}

/// Per-player line of the final result. One per roster entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerMatchStats {
    pub player_id: PlayerId,
    pub name: String,
    pub goals: u32,
    pub assists: u32,
    /// 1.0-10.0
    pub rating: f32,
    pub minutes_played: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationResult {
    pub score: Score,
    pub events: Vec<GameEvent>,
    pub player_stats: Vec<PlayerMatchStats>,
    /// 1.0-10.0
    pub match_rating: f32,
    pub duration: u16,
}

impl SimulationResult {
    pub fn count(&self, tag: EventTag) -> usize {
        self.events.iter().filter(|e| e.tag() == tag).count()
    }

    pub fn home_goal_events(&self) -> usize {
        self.events.iter().filter(|e| e.is_goal() && e.is_home_team).count()
    }

    /// Goals with no named scorer: every away goal, plus home goals scored
    /// with an empty roster.
    pub fn unattributed_goals(&self) -> usize {
        self.events.iter().filter(|e| e.is_goal() && e.participant().is_none()).count()
    }

    pub fn stats_for(&self, id: PlayerId) -> Option<&PlayerMatchStats> {
        self.player_stats.iter().find(|s| s.player_id == id)
    }

    /// Highest-rated player, first roster entry wins ties.
    pub fn player_of_the_match(&self) -> Option<&PlayerMatchStats> {
        self.player_stats.iter().fold(None, |best: Option<&PlayerMatchStats>, s| match best {
            Some(b) if b.rating >= s.rating => Some(b),
            _ => Some(s),
        })
    }
}

/// History entry appended by the calling layer after a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchRecord {
    pub opponent: String,
    pub played_on: NaiveDate,
    pub score: Score,
    pub outcome: MatchOutcome,
    pub match_rating: f32,
    pub players: Vec<PlayerSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerSnapshot {
    pub player_id: PlayerId,
    pub name: String,
    pub goals: u32,
    pub assists: u32,
    pub rating: f32,
}

impl MatchRecord {
    pub fn from_result(opponent: impl Into<String>, played_on: NaiveDate, result: &SimulationResult) -> Self {
        Self {
            opponent: opponent.into(),
            played_on,
            score: result.score,
            outcome: result.score.outcome(),
            match_rating: result.match_rating,
            players: result
                .player_stats
                .iter()
                .map(|s| PlayerSnapshot {
                    player_id: s.player_id,
                    name: s.name.clone(),
                    goals: s.goals,
                    assists: s.assists,
                    // One decimal is what history views show
                    rating: (s.rating * 10.0).round() / 10.0,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn stats(name: &str, rating: f32) -> PlayerMatchStats {
        PlayerMatchStats {
            player_id: Uuid::new_v4(),
            name: name.to_string(),
            goals: 1,
            assists: 0,
            rating,
            minutes_played: 90,
        }
    }

    #[test]
    fn test_score_outcome() {
        assert_eq!(Score { home: 2, away: 1 }.outcome(), MatchOutcome::Win);
        assert_eq!(Score { home: 0, away: 0 }.outcome(), MatchOutcome::Draw);
        assert_eq!(Score { home: 1, away: 3 }.outcome(), MatchOutcome::Loss);
        assert_eq!(Score { home: 1, away: 3 }.goal_difference(), -2);
        assert_eq!(Score { home: 4, away: 2 }.to_string(), "4 - 2");
    }

    #[test]
    fn test_player_of_the_match_prefers_first_on_tie() {
        let result = SimulationResult {
            score: Score::default(),
            events: Vec::new(),
            player_stats: vec![stats("A", 7.5), stats("B", 8.25), stats("C", 8.25)],
            match_rating: 5.0,
            duration: 90,
        };
        assert_eq!(result.player_of_the_match().map(|s| s.name.as_str()), Some("B"));
    }

    #[test]
    fn test_match_record_rounds_ratings() {
        let result = SimulationResult {
            score: Score { home: 1, away: 1 },
            events: Vec::new(),
            player_stats: vec![stats("A", 7.46)],
            match_rating: 5.2,
            duration: 90,
        };
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let record = MatchRecord::from_result("Rovers", date, &result);
        assert_eq!(record.outcome, MatchOutcome::Draw);
        assert_eq!(record.players.len(), 1);
        assert!((record.players[0].rating - 7.5).abs() < 1e-6);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["played_on"], "2026-03-14");
    }
}
