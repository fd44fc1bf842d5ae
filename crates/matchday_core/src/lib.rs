//! # matchday_core - Minute-stepped Football Match Simulation
//!
//! Simulates one match for a single home roster against a rating-only
//! opponent. Every simulated minute may produce one event (goal, miss, save,
//! card, injury); home goals may carry an assist. After the final minute the
//! timeline is turned into per-player ratings and a match rating.
//!
//! ## Features
//! - Seeded runs are fully deterministic (ChaCha8)
//! - Instant or paced playback with cooperative cancellation (feature `async`)
//! - Tunable probabilities and rating weights (`SimTuning`, JSON or YAML)
//! - Parallel seeded batches for balance checks

pub mod batch;
pub mod engine;
pub mod error;
pub mod models;

pub use batch::{simulate_batch, BatchSummary, TopScorer};
pub use engine::{
    ClockState, EngineBuilder, MatchEngine, MinuteTick, RandomSource, RunPolicy, SimRng,
    SimTuning, Step,
};
#[cfg(feature = "async")]
pub use engine::{cancel_pair, CancelHandle, CancelToken};
pub use error::{EngineError, Result};
pub use models::{
    CareerRecord, Difficulty, EventKind, EventTag, GameEvent, MatchOutcome, MatchRecord,
    Participant, PitchCondition, Player, PlayerId, PlayerMatchStats, PlayerSkills, Position,
    PositionGroup, Score, SimulationResult, SimulationSettings, Weather,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
