//! Matchday CLI Library
//!
//! Input loading and console formatting for the `matchday` binary.

use anyhow::{Context, Result};
use matchday_core::batch::BatchSummary;
use matchday_core::{
    EngineError, GameEvent, MatchRecord, Player, SimTuning, SimulationResult, SimulationSettings,
};
use std::fs;
use std::path::Path;

/// Read a roster file: a JSON array of players.
pub fn load_roster(path: &Path) -> Result<Vec<Player>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse roster file: {}", path.display()))
}

pub fn load_settings(path: &Path) -> Result<SimulationSettings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings file: {}", path.display()))
}

/// Explicit tuning file first, then `MATCHDAY_TUNING_PATH`, then defaults.
pub fn load_tuning(path: Option<&Path>) -> Result<SimTuning> {
    let tuning = match path {
        Some(path) => SimTuning::load(path)?,
        None => SimTuning::from_env()?,
    };
    Ok(tuning)
}

pub fn format_event(event: &GameEvent) -> String {
    let side = if event.is_home_team { "HOME" } else { "AWAY" };
    format!("[{:>3}'] {:<6} {:<4} {}", event.minute, event.tag().as_str(), side, event.description)
}

pub fn format_result(result: &SimulationResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("\nFull time: {}\n", result.score));
    out.push_str(&format!("Match rating: {:.1}\n", result.match_rating));
    if result.player_stats.is_empty() {
        return out;
    }

    out.push_str(&format!("\n{:<24} {:>5} {:>7} {:>6} {:>4}\n", "Player", "Goals", "Assists", "Rating", "Min"));
    for line in &result.player_stats {
        out.push_str(&format!(
            "{:<24} {:>5} {:>7} {:>6.1} {:>4}\n",
            line.name, line.goals, line.assists, line.rating, line.minutes_played
        ));
    }
    if let Some(best) = result.player_of_the_match() {
        out.push_str(&format!("\nPlayer of the match: {} ({:.1})\n", best.name, best.rating));
    }
    out
}

pub fn format_summary(summary: &BatchSummary) -> String {
    let mut out = format!(
        "Runs: {} (seeds {}..{})\n",
        summary.runs,
        summary.base_seed,
        summary.base_seed.wrapping_add(summary.runs as u64)
    );
    out.push_str(&format!(
        "W/D/L: {}/{}/{} (win rate {:.1}%)\n",
        summary.wins,
        summary.draws,
        summary.losses,
        summary.win_rate() * 100.0
    ));
    out.push_str(&format!(
        "Mean score: {:.2} - {:.2}\n",
        summary.mean_home_goals, summary.mean_away_goals
    ));
    out.push_str(&format!("Mean match rating: {:.2}\n", summary.mean_match_rating));
    out.push_str(&format!("Mean events: {:.2}\n", summary.mean_events));
    if let Some(top) = &summary.top_scorer {
        out.push_str(&format!("Top scorer: {} ({} goals)\n", top.name, top.goals));
    }
    out
}

/// Append a match to a JSON history file, creating it if needed.
pub fn append_record(path: &Path, record: MatchRecord) -> Result<usize> {
    let mut history: Vec<MatchRecord> = if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read history file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse history file: {}", path.display()))?
    } else {
        Vec::new()
    };
    history.push(record);

    let json = serde_json::to_string_pretty(&history)?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write history file: {}", path.display()))?;
    Ok(history.len())
}

/// Process exit code for a failed command: 2 when the input (roster,
/// settings, tuning) needs fixing, 1 for everything else.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    let input_error = err.chain().any(|cause| {
        cause
            .downcast_ref::<EngineError>()
            .is_some_and(EngineError::is_input_error)
    });
    if input_error {
        2
    } else {
        1
    }
}

/// JSON Schemas for the roster and settings inputs.
pub fn input_schemas() -> Result<String> {
    let schemas = serde_json::json!({
        "roster": schemars::schema_for!(Vec<Player>),
        "settings": schemars::schema_for!(SimulationSettings),
    });
    Ok(serde_json::to_string_pretty(&schemas)?)
}
