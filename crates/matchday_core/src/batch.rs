//! Many seeded matches in parallel, summarised.
//!
//! Run `i` uses seed `base_seed + i`, so a batch is reproducible no matter
//! how rayon schedules it.

use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::engine::{MatchEngine, SimTuning};
use crate::error::Result;
use crate::models::{MatchOutcome, Player, PlayerId, SimulationResult, SimulationSettings};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct BatchSummary {
    pub runs: u32,
    pub base_seed: u64,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub mean_home_goals: f32,
    pub mean_away_goals: f32,
    pub mean_match_rating: f32,
    pub mean_events: f32,
    pub top_scorer: Option<TopScorer>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct TopScorer {
    pub player_id: PlayerId,
    pub name: String,
    pub goals: u32,
}

impl BatchSummary {
    pub fn win_rate(&self) -> f32 {
        if self.runs == 0 {
            0.0
        } else {
            self.wins as f32 / self.runs as f32
        }
    }
}

pub fn simulate_batch(
    roster: &[Player],
    settings: &SimulationSettings,
    tuning: &SimTuning,
    base_seed: u64,
    runs: u32,
) -> Result<BatchSummary> {
    // Surface bad input once instead of from every worker
    MatchEngine::builder(roster, settings.clone()).tuning(tuning.clone()).seed(base_seed).build()?;

    let results: Vec<SimulationResult> = (0..runs)
        .into_par_iter()
        .map(|i| {
            MatchEngine::builder(roster, settings.clone())
                .tuning(tuning.clone())
                .seed(base_seed.wrapping_add(i as u64))
                .build()?
                .run_instant(|_| {})
        })
        .collect::<Result<_>>()?;

    let summary = summarise(roster, &results, base_seed);
    tracing::info!(
        runs,
        base_seed,
        wins = summary.wins,
        draws = summary.draws,
        losses = summary.losses,
        "batch finished"
    );
    Ok(summary)
}

fn summarise(roster: &[Player], results: &[SimulationResult], base_seed: u64) -> BatchSummary {
    let mut summary = BatchSummary { runs: results.len() as u32, base_seed, ..Default::default() };
    if results.is_empty() {
        return summary;
    }

    let mut goals_by_player: HashMap<PlayerId, u32> = HashMap::new();
    let (mut home, mut away, mut rating, mut events) = (0u64, 0u64, 0f64, 0u64);
    for result in results {
        match result.score.outcome() {
            MatchOutcome::Win => summary.wins += 1,
            MatchOutcome::Draw => summary.draws += 1,
            MatchOutcome::Loss => summary.losses += 1,
        }
        home += result.score.home as u64;
        away += result.score.away as u64;
        rating += result.match_rating as f64;
        events += result.events.len() as u64;
        for line in &result.player_stats {
            *goals_by_player.entry(line.player_id).or_default() += line.goals;
        }
    }

    let n = results.len() as f64;
    summary.mean_home_goals = (home as f64 / n) as f32;
    summary.mean_away_goals = (away as f64 / n) as f32;
    summary.mean_match_rating = (rating / n) as f32;
    summary.mean_events = (events as f64 / n) as f32;

    // Roster order breaks ties
    let mut top: Option<TopScorer> = None;
    for player in roster {
        let goals = goals_by_player.get(&player.id).copied().unwrap_or(0);
        if goals > 0 && top.as_ref().map_or(true, |t| goals > t.goals) {
            top = Some(TopScorer { player_id: player.id, name: player.name.clone(), goals });
        }
    }
    summary.top_scorer = top;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::{PlayerSkills, Position};

    fn roster() -> Vec<Player> {
        vec![
            Player::new("Keeper", Position::GK, PlayerSkills::uniform(70)),
            Player::new("Back", Position::CB, PlayerSkills::uniform(70)),
            Player::new("Mid", Position::CM, PlayerSkills::uniform(75)),
            Player::new("Nine", Position::ST, PlayerSkills::uniform(85)),
        ]
    }

    #[test]
    fn test_batch_is_reproducible() {
        let roster = roster();
        let settings = SimulationSettings::default();
        let tuning = SimTuning::default();
        let a = simulate_batch(&roster, &settings, &tuning, 500, 64).unwrap();
        let b = simulate_batch(&roster, &settings, &tuning, 500, 64).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.wins + a.draws + a.losses, 64);
    }

    #[test]
    fn test_batch_matches_sequential_runs() {
        let roster = roster();
        let settings = SimulationSettings::default();
        let tuning = SimTuning::default();
        let summary = simulate_batch(&roster, &settings, &tuning, 10, 8).unwrap();

        let results: Vec<SimulationResult> = (0..8)
            .map(|i| {
                MatchEngine::with_seed(&roster, settings.clone(), 10 + i).unwrap().run_instant(|_| {}).unwrap()
            })
            .collect();
        let home: u32 = results.iter().map(|r| r.score.home as u32).sum();
        assert!((summary.mean_home_goals - home as f32 / 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_top_scorer_is_only_attacker() {
        // Only the striker is in the attacker group, so only they can score
        let roster = roster();
        let summary =
            simulate_batch(&roster, &SimulationSettings::default(), &SimTuning::default(), 1, 200).unwrap();
        let top = summary.top_scorer.unwrap();
        assert_eq!(top.name, "Nine");
        assert!((top.goals as f32 / 200.0 - summary.mean_home_goals).abs() < 1e-5);
    }

    #[test]
    fn test_zero_runs() {
        let summary =
            simulate_batch(&roster(), &SimulationSettings::default(), &SimTuning::default(), 1, 0).unwrap();
        assert_eq!(summary.runs, 0);
        assert_eq!(summary.win_rate(), 0.0);
        assert!(summary.top_scorer.is_none());
    }

    #[test]
    fn test_invalid_settings_fail_fast() {
        let settings = SimulationSettings { game_speed: 0, ..Default::default() };
        let err = simulate_batch(&roster(), &settings, &SimTuning::default(), 1, 10).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSettings(_)));
    }
}
