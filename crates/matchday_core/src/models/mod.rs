pub mod events;
pub mod match_result;
pub mod player;
pub mod settings;

pub use events::{EventKind, EventTag, GameEvent, Participant};
pub use match_result::{
    MatchOutcome, MatchRecord, PlayerMatchStats, PlayerSnapshot, Score, SimulationResult,
};
pub use player::{CareerRecord, Player, PlayerId, PlayerSkills, Position, PositionGroup};
pub use settings::{Difficulty, PitchCondition, SimulationSettings, Weather};
