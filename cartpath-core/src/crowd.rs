//! Simulated live crowd levels
//!
//! Combines a slow per-section oscillation, a little random jitter and
//! coarse rush-hour multipliers. Output is a live signal: callers should
//! re-sample periodically instead of caching the result indefinitely.

use chrono::{DateTime, Local, TimeZone, Timelike};
use hashbrown::HashMap;
use rand::Rng;

use crate::StoreGraph;

/// Live crowd factor per section id
pub type CrowdLevels = HashMap<String, f64>;

const OSCILLATION_AMPLITUDE: f64 = 0.3;
const OSCILLATION_PERIOD_MS: f64 = 60_000.0;
const JITTER_SPAN: f64 = 0.2;

/// Multiplier applied during the lunch and evening rush
fn rush_multiplier(hour: u32) -> f64 {
    match hour {
        17..=19 => 1.4,
        11..=13 => 1.2,
        _ => 1.0,
    }
}

/// Samples crowd levels for every section at `at` using `rng` for jitter
///
/// The oscillation follows the absolute instant (epoch milliseconds) while
/// rush hours are read from the wall clock of `at`'s time zone. Every
/// returned factor is at least 1.0.
#[allow(clippy::cast_precision_loss)]
pub fn sample_crowd_levels<Tz: TimeZone, R: Rng>(
    graph: &StoreGraph,
    at: &DateTime<Tz>,
    rng: &mut R,
) -> CrowdLevels {
    let millis = at.timestamp_millis() as f64;
    let rush = rush_multiplier(at.hour());

    graph
        .sections()
        .iter()
        .map(|section| {
            let wave = (millis / OSCILLATION_PERIOD_MS + section.x).sin() * OSCILLATION_AMPLITUDE;
            let jitter = (rng.r#gen::<f64>() - 0.5) * JITTER_SPAN;
            let factor = section.crowd_factor * rush + wave + jitter;

            (section.id.clone(), factor.max(1.0))
        })
        .collect()
}

/// Samples crowd levels for now, with rush hours in the local time zone
pub fn current_crowd_levels(graph: &StoreGraph) -> CrowdLevels {
    sample_crowd_levels(graph, &Local::now(), &mut rand::thread_rng())
}

impl StoreGraph {
    /// See [`current_crowd_levels`]
    pub fn current_crowd_levels(&self) -> CrowdLevels {
        current_crowd_levels(self)
    }

    /// See [`sample_crowd_levels`]
    pub fn crowd_levels_at<Tz: TimeZone, R: Rng>(
        &self,
        at: &DateTime<Tz>,
        rng: &mut R,
    ) -> CrowdLevels {
        sample_crowd_levels(self, at, rng)
    }
}
