use std::collections::HashMap;

use crate::engine::config::RatingWeights;
use crate::engine::rng::RandomSource;
use crate::models::{EventTag, GameEvent, Player, PlayerId, PlayerMatchStats, Score};

pub const MIN_RATING: f32 = 1.0;
pub const MAX_RATING: f32 = 10.0;

/// Turns the finished timeline into per-player lines and a match rating.
pub struct StatsAggregator<'a> {
    weights: &'a RatingWeights,
}

impl<'a> StatsAggregator<'a> {
    pub fn new(weights: &'a RatingWeights) -> Self {
        Self { weights }
    }

    /// One record per roster entry, in roster order.
    ///
    /// Only home events with a participant move a rating. Every player then
    /// gets uniform noise and an attribute bonus before clamping to `[1, 10]`.
    pub fn aggregate<R: RandomSource + ?Sized>(
        &self,
        roster: &[Player],
        events: &[GameEvent],
        duration: u16,
        rng: &mut R,
    ) -> Vec<PlayerMatchStats> {
        let mut stats: Vec<PlayerMatchStats> = roster
            .iter()
            .map(|p| PlayerMatchStats {
                player_id: p.id,
                name: p.name.clone(),
                goals: 0,
                assists: 0,
                rating: self.weights.base,
                minutes_played: duration,
            })
            .collect();
        let index: HashMap<PlayerId, usize> =
            roster.iter().enumerate().map(|(i, p)| (p.id, i)).collect();

        for event in events.iter().filter(|e| e.is_home_team) {
            let Some(participant) = event.participant() else {
                continue;
            };
            let Some(&slot) = index.get(&participant.id) else {
                tracing::warn!(player = %participant.id, "event names a player outside the roster");
                continue;
            };
            let line = &mut stats[slot];
            let tag = event.tag();
            line.rating += self.weights.delta(tag);
            match tag {
                EventTag::Goal => line.goals += 1,
                EventTag::Assist => line.assists += 1,
                _ => {}
            }
        }

        for (line, player) in stats.iter_mut().zip(roster) {
            let noise = rng.uniform(-self.weights.noise, self.weights.noise);
            let bonus = (player.weight() - self.weights.attribute_pivot) / self.weights.attribute_scale;
            line.rating = clamp_rating(line.rating + noise + bonus);
        }

        stats
    }

    pub fn match_rating(&self, score: Score, event_count: usize) -> f32 {
        clamp_rating(
            self.weights.match_base
                + score.goal_difference() as f32 * self.weights.match_goal_diff
                + event_count as f32 * self.weights.match_per_event,
        )
    }
}

fn clamp_rating(value: f32) -> f32 {
    if !value.is_finite() {
        return MIN_RATING;
    }
    value.clamp(MIN_RATING, MAX_RATING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::testing::ScriptedSource;
    use crate::models::{PlayerSkills, Position};

    fn player(name: &str, position: Position, overall: u8) -> Player {
        let mut p = Player::new(name, position, PlayerSkills::uniform(overall));
        p.overall = overall;
        p
    }

    #[test]
    fn test_deltas_and_counters() {
        let striker = player("Striker", Position::ST, 70);
        let mid = player("Mid", Position::CM, 70);
        let keeper = player("Keeper", Position::GK, 70);
        let roster = vec![striker.clone(), mid.clone(), keeper.clone()];
        let events = vec![
            GameEvent::home_goal(10, &striker),
            GameEvent::assist(10, &mid, &striker),
            GameEvent::miss(20, &striker),
            GameEvent::save(30, &keeper),
            GameEvent::card(40, &mid),
            GameEvent::away_goal(50),
        ];
        let weights = RatingWeights::default();
        // 0.5 draw -> zero noise; overall 70 -> zero bonus
        let mut rng = ScriptedSource::new([0.5]);
        let stats = StatsAggregator::new(&weights).aggregate(&roster, &events, 90, &mut rng);

        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].goals, 1);
        assert!((stats[0].rating - 6.7).abs() < 1e-5);
        assert_eq!(stats[1].assists, 1);
        assert!((stats[1].rating - 6.0).abs() < 1e-5);
        assert!((stats[2].rating - 6.3).abs() < 1e-5);
        assert!(stats.iter().all(|s| s.minutes_played == 90));
    }

    #[test]
    fn test_attribute_bonus_and_noise() {
        let roster = vec![player("Star", Position::ST, 99), player("Weak", Position::CB, 10)];
        let weights = RatingWeights::default();
        // first player +1 noise ceiling, second -1 noise floor
        let mut rng = ScriptedSource::new([0.999_999, 0.0]);
        let stats = StatsAggregator::new(&weights).aggregate(&roster, &[], 45, &mut rng);

        // 6 + ~1 + 29/30
        assert!((stats[0].rating - 7.9667).abs() < 1e-3);
        // 6 - 1 - 2 = 3
        assert!((stats[1].rating - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_ratings_are_clamped() {
        let hero = player("Hero", Position::ST, 99);
        let villain = player("Villain", Position::CB, 0);
        let roster = vec![hero.clone(), villain.clone()];
        let mut events: Vec<GameEvent> = (1..=10).map(|m| GameEvent::home_goal(m, &hero)).collect();
        events.extend((11..=20).map(|m| GameEvent::card(m, &villain)));
        let weights = RatingWeights::default();
        let mut rng = ScriptedSource::new([0.5]);
        let stats = StatsAggregator::new(&weights).aggregate(&roster, &events, 90, &mut rng);
        assert_eq!(stats[0].rating, MAX_RATING);
        assert_eq!(stats[1].rating, MIN_RATING);
    }

    #[test]
    fn test_match_rating_formula() {
        let weights = RatingWeights::default();
        let agg = StatsAggregator::new(&weights);
        assert!((agg.match_rating(Score { home: 2, away: 1 }, 6) - 6.1).abs() < 1e-5);
        assert_eq!(agg.match_rating(Score { home: 0, away: 20 }, 0), MIN_RATING);
        assert_eq!(agg.match_rating(Score { home: 9, away: 0 }, 40), MAX_RATING);
    }

    #[test]
    fn test_empty_roster_has_no_lines() {
        let weights = RatingWeights::default();
        let mut rng = ScriptedSource::new([0.5]);
        let stats = StatsAggregator::new(&weights).aggregate(&[], &[GameEvent::away_goal(3)], 90, &mut rng);
        assert!(stats.is_empty());
        assert_eq!(rng.consumed(), 0);
    }
}
