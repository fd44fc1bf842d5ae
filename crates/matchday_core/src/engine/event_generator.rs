//! Per-minute stochastic event generation.
//!
//! Each minute runs a two-stage roll:
//! 1. the outer roll fires with `EventRates::probability_at(minute)`;
//! 2. a kind is chosen uniformly from goal/miss/save/card/injury and must then
//!    pass its own activation roll from `KindActivation`.
//!
//! The stages compound, so the effective per-minute rate of any kind is
//! `outer * (1/5) * activation`. Both tables live in `SimTuning`.
//!
//! Home goals name a scorer (attacker group) and usually an assister
//! (midfielder group). Away goals only move the score: they are emitted
//! without a participant, so per-player goal sums never include them.

use crate::engine::config::{KindActivation, SimTuning};
use crate::engine::rng::RandomSource;
use crate::engine::selection::WeightedSelector;
use crate::engine::strength::StrengthModel;
use crate::models::{EventKind, EventTag, GameEvent, Player, PositionGroup, Score};

/// Events produced by one minute. An assist only ever rides along a home goal.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedEvent {
    pub event: GameEvent,
    pub assist: Option<GameEvent>,
}

impl GeneratedEvent {
    fn single(event: GameEvent) -> Self {
        Self { event, assist: None }
    }

    pub fn into_events(self) -> impl Iterator<Item = GameEvent> {
        std::iter::once(self.event).chain(self.assist)
    }
}

pub struct EventGenerator<'a> {
    roster: &'a [Player],
    tuning: &'a SimTuning,
    strength: StrengthModel,
}

impl<'a> EventGenerator<'a> {
    pub fn new(roster: &'a [Player], tuning: &'a SimTuning, strength: StrengthModel) -> Self {
        Self { roster, tuning, strength }
    }

    /// Roll for an event in `minute`, updating `score` for goals.
    pub fn maybe_event<R: RandomSource + ?Sized>(
        &self,
        minute: u16,
        score: &mut Score,
        rng: &mut R,
    ) -> Option<GeneratedEvent> {
        let probability = self.tuning.event_rates.probability_at(minute);
        if !rng.chance(probability) {
            return None;
        }

        let kinds = KindActivation::ROLLABLE;
        let tag = kinds[rng.index(kinds.len())];
        if !rng.chance(self.tuning.kind_activation.probability(tag)) {
            tracing::trace!(minute, %tag, "outer roll fired, kind gate closed");
            return None;
        }

        let generated = match tag {
            EventTag::Goal => Some(self.goal(minute, score, rng)),
            EventTag::Miss => {
                self.attributed(Some(PositionGroup::Attacker), rng, |p| GameEvent::miss(minute, p))
            }
            EventTag::Save => {
                self.attributed(Some(PositionGroup::Goalkeeper), rng, |p| GameEvent::save(minute, p))
            }
            EventTag::Card => self.attributed(None, rng, |p| GameEvent::card(minute, p)),
            EventTag::Injury => self.attributed(None, rng, |p| GameEvent::injury(minute, p)),
            EventTag::Assist => None,
        };

        if let Some(generated) = &generated {
            tracing::debug!(
                minute,
                tag = %generated.event.tag(),
                home = generated.event.is_home_team,
                assisted = generated.assist.is_some(),
                "{}",
                generated.event.description
            );
        }
        generated
    }

    fn goal<R: RandomSource + ?Sized>(
        &self,
        minute: u16,
        score: &mut Score,
        rng: &mut R,
    ) -> GeneratedEvent {
        let home_advantage = self.strength.home_advantage();
        if !rng.chance(home_advantage) {
            score.away += 1;
            return GeneratedEvent::single(GameEvent::away_goal(minute));
        }

        score.home += 1;
        let Some(scorer) = self.pick(Some(PositionGroup::Attacker), rng) else {
            // Empty roster: the goal still counts for the home side
            return GeneratedEvent::single(GameEvent {
                minute,
                is_home_team: true,
                description: format!("{}' GOAL!", minute),
                kind: EventKind::Goal { scorer: None },
            });
        };

        let assist = if rng.chance(self.tuning.assist_probability) {
            self.pick(Some(PositionGroup::Midfielder), rng)
                .map(|provider| GameEvent::assist(minute, provider, scorer))
        } else {
            None
        };

        GeneratedEvent { event: GameEvent::home_goal(minute, scorer), assist }
    }

    fn attributed<R: RandomSource + ?Sized>(
        &self,
        group: Option<PositionGroup>,
        rng: &mut R,
        build: impl FnOnce(&Player) -> GameEvent,
    ) -> Option<GeneratedEvent> {
        self.pick(group, rng).map(|p| GeneratedEvent::single(build(p)))
    }

    fn pick<R: RandomSource + ?Sized>(
        &self,
        group: Option<PositionGroup>,
        rng: &mut R,
    ) -> Option<&'a Player> {
        WeightedSelector::select(self.roster, group, rng)
    }
}
