//! Weighted participant selection.
//!
//! Candidates are drawn with probability proportional to their overall
//! rating using cumulative-weight sampling.

use crate::engine::rng::RandomSource;
use crate::models::{Player, PositionGroup};

pub struct WeightedSelector;

impl WeightedSelector {
    /// Pick one player, optionally restricted to `group`.
    ///
    /// An empty group falls back to the full roster. When every candidate has
    /// zero weight the first roster entry is returned. `None` only for an
    /// empty roster.
    pub fn select<'a, R: RandomSource + ?Sized>(
        roster: &'a [Player],
        group: Option<PositionGroup>,
        rng: &mut R,
    ) -> Option<&'a Player> {
        let first = roster.first()?;

        let mut pool: Vec<&Player> = match group {
            Some(group) => roster.iter().filter(|p| group.contains(p.position)).collect(),
            None => roster.iter().collect(),
        };
        if pool.is_empty() {
            tracing::debug!(?group, "no players in group, selecting from full roster");
            pool = roster.iter().collect();
        }

        let total: f32 = pool.iter().map(|p| p.weight()).sum();
        if total <= 0.0 {
            return Some(first);
        }

        let mut remaining = rng.next_unit() * total;
        let mut last_weighted = first;
        for candidate in pool {
            let weight = candidate.weight();
            if weight <= 0.0 {
                continue;
            }
            last_weighted = candidate;
            remaining -= weight;
            if remaining <= 0.0 {
                return Some(candidate);
            }
        }

        // Float rounding can leave a sliver of remainder
        Some(last_weighted)
    }
}
