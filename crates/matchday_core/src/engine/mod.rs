//! Match simulation engine.
//!
//! One [`MatchEngine`] simulates exactly one match:
//!
//! ```text
//! MatchEngine::builder(roster, settings).build()
//!        │
//!        ▼
//!  step() ── MatchClock ── EventGenerator ── WeightedSelector
//!        │                       │
//!        │                       └── StrengthModel (home advantage)
//!        ▼
//!  finish() ── StatsAggregator ── invariant check ──► SimulationResult
//! ```
//!
//! `step` advances one simulated minute with no waiting. Drivers decide the
//! pacing: [`MatchEngine::run_instant`] for tests and batch work, the async
//! `run` family (feature `async`) for paced playback.

pub mod clock;
pub mod config;
pub mod event_generator;
pub mod rng;
pub mod selection;
pub mod stats;
pub mod strength;

#[cfg(feature = "async")]
pub mod budget;
#[cfg(feature = "async")]
pub mod runner;

pub use clock::{pacing_delay, ClockState, MatchClock, MinuteTick, Step};
pub use config::SimTuning;
pub use event_generator::{EventGenerator, GeneratedEvent};
pub use rng::{RandomSource, SimRng};
pub use selection::WeightedSelector;
pub use stats::StatsAggregator;
pub use strength::StrengthModel;

#[cfg(feature = "async")]
pub use budget::RunBudget;
#[cfg(feature = "async")]
pub use runner::{cancel_pair, CancelHandle, CancelToken};

use rand::SeedableRng;
use std::collections::HashSet;
use std::time::Duration;
use validator::Validate;

use crate::error::{EngineError, Result};
use crate::models::{GameEvent, Player, Score, SimulationResult, SimulationSettings};

/// Roster preconditions applied at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunPolicy {
    /// Reject an empty roster instead of simulating with default strength.
    pub require_players: bool,
}

impl RunPolicy {
    pub fn permissive() -> Self {
        Self { require_players: false }
    }

    pub fn strict() -> Self {
        Self { require_players: true }
    }
}

pub struct EngineBuilder<'r> {
    roster: &'r [Player],
    settings: SimulationSettings,
    tuning: SimTuning,
    policy: RunPolicy,
    seed: Option<u64>,
}

impl<'r> EngineBuilder<'r> {
    pub fn tuning(mut self, tuning: SimTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn policy(mut self, policy: RunPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build with a ChaCha8 RNG: seeded if a seed was given, from OS entropy otherwise.
    pub fn build(self) -> Result<MatchEngine<SimRng>> {
        let rng = match self.seed {
            Some(seed) => SimRng::seed_from_u64(seed),
            None => SimRng::from_entropy(),
        };
        self.build_with_rng(rng)
    }

    /// Build with a caller-supplied random source. Any seed is ignored.
    pub fn build_with_rng<R: RandomSource>(self, rng: R) -> Result<MatchEngine<R>> {
        self.settings.validate()?;
        self.tuning.validate()?;
        validate_roster(self.roster, self.policy)?;

        let strength = StrengthModel::new(self.roster, &self.settings);
        tracing::debug!(
            players = self.roster.len(),
            team_strength = strength.team_strength,
            home_advantage = strength.home_advantage(),
            "match engine ready"
        );

        Ok(MatchEngine {
            roster: self.roster.to_vec(),
            clock: MatchClock::new(self.settings.duration),
            settings: self.settings,
            tuning: self.tuning,
            strength,
            score: Score::default(),
            events: Vec::new(),
            rng,
        })
    }
}

fn validate_roster(roster: &[Player], policy: RunPolicy) -> Result<()> {
    if policy.require_players && roster.is_empty() {
        return Err(EngineError::InvalidRoster("roster has no players".to_string()));
    }
    let mut seen = HashSet::with_capacity(roster.len());
    for player in roster {
        if !seen.insert(player.id) {
            return Err(EngineError::InvalidRoster(format!(
                "duplicate player id {} ({})",
                player.id, player.name
            )));
        }
    }
    Ok(())
}

pub struct MatchEngine<R = SimRng> {
    roster: Vec<Player>,
    settings: SimulationSettings,
    tuning: SimTuning,
    strength: StrengthModel,
    clock: MatchClock,
    score: Score,
    events: Vec<GameEvent>,
    rng: R,
}

impl MatchEngine<SimRng> {
    pub fn builder(roster: &[Player], settings: SimulationSettings) -> EngineBuilder<'_> {
        EngineBuilder {
            roster,
            settings,
            tuning: SimTuning::default(),
            policy: RunPolicy::default(),
            seed: None,
        }
    }

    /// Permissive engine with default tuning and an entropy-seeded RNG.
    pub fn new(roster: &[Player], settings: SimulationSettings) -> Result<Self> {
        Self::builder(roster, settings).build()
    }

    pub fn with_seed(roster: &[Player], settings: SimulationSettings, seed: u64) -> Result<Self> {
        Self::builder(roster, settings).seed(seed).build()
    }
}

impl<R: RandomSource> MatchEngine<R> {
    /// Advance one simulated minute.
    pub fn step(&mut self) -> Step {
        let Some(minute) = self.clock.advance() else {
            return Step::Finished;
        };

        let generator = EventGenerator::new(&self.roster, &self.tuning, self.strength);
        let first_new = self.events.len();
        if let Some(generated) = generator.maybe_event(minute, &mut self.score, &mut self.rng) {
            self.events.extend(generated.into_events());
        }

        Step::Minute(MinuteTick {
            minute,
            events: self.events[first_new..].to_vec(),
            score: self.score,
        })
    }

    /// Run every minute back to back, notifying once per minute.
    pub fn run_instant(
        mut self,
        mut on_progress: impl FnMut(&MinuteTick),
    ) -> Result<SimulationResult> {
        while let Step::Minute(tick) = self.step() {
            on_progress(&tick);
        }
        self.finish()
    }

    /// Aggregate the result. Any minutes not yet played are simulated first
    /// without notifications.
    pub fn finish(mut self) -> Result<SimulationResult> {
        while let Step::Minute(_) = self.step() {}

        let aggregator = StatsAggregator::new(&self.tuning.rating);
        let player_stats =
            aggregator.aggregate(&self.roster, &self.events, self.settings.duration, &mut self.rng);
        let match_rating = aggregator.match_rating(self.score, self.events.len());

        let result = SimulationResult {
            score: self.score,
            events: self.events,
            player_stats,
            match_rating,
            duration: self.settings.duration,
        };
        verify_result(&self.roster, &result)?;

        tracing::debug!(
            score = %result.score,
            events = result.events.len(),
            match_rating = result.match_rating,
            "match finished"
        );
        Ok(result)
    }

    pub fn roster(&self) -> &[Player] {
        &self.roster
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn tuning(&self) -> &SimTuning {
        &self.tuning
    }

    pub fn strength(&self) -> &StrengthModel {
        &self.strength
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn clock(&self) -> &MatchClock {
        &self.clock
    }

    /// Wall-clock pause between minutes for paced playback.
    pub fn pacing_delay(&self) -> Duration {
        pacing_delay(self.settings.game_speed, self.settings.duration, &self.tuning.pacing)
    }
}

/// Post-run consistency check. A failure is an engine defect.
fn verify_result(roster: &[Player], result: &SimulationResult) -> Result<()> {
    let fail = |msg: String| {
        tracing::error!(%msg, "simulation result failed verification");
        Err(EngineError::InvariantViolation(msg))
    };

    if result.player_stats.len() != roster.len() {
        return fail(format!(
            "{} stat lines for {} players",
            result.player_stats.len(),
            roster.len()
        ));
    }
    if result.player_stats.iter().zip(roster).any(|(s, p)| s.player_id != p.id) {
        return fail("stat lines out of roster order".to_string());
    }

    let home_goals = result.home_goal_events();
    if home_goals != result.score.home as usize {
        return fail(format!("{} home goal events for home score {}", home_goals, result.score.home));
    }
    let away_goals = result.events.iter().filter(|e| e.is_goal() && !e.is_home_team).count();
    if away_goals != result.score.away as usize {
        return fail(format!("{} away goal events for away score {}", away_goals, result.score.away));
    }

    let mut previous = 1;
    for event in &result.events {
        if event.minute < previous || event.minute > result.duration {
            return fail(format!("event at minute {} out of order or range", event.minute));
        }
        previous = event.minute;
    }

    let ratings_ok = std::iter::once(result.match_rating)
        .chain(result.player_stats.iter().map(|s| s.rating))
        .all(|r| (stats::MIN_RATING..=stats::MAX_RATING).contains(&r));
    if !ratings_ok {
        return fail("rating outside [1, 10]".to_string());
    }
    Ok(())
}
