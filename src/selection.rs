//! Filters, scores, and picks venues from candidate lists.
//!
//! Jitter keeps the top pick from being identical on every request; it lives
//! behind a trait so tests can inject a deterministic source.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::scoring::{score_venue, ScoreContext};
use crate::types::Venue;

/// Default number of top-scored candidates entering the jitter round.
pub const DEFAULT_TOP_N: usize = 5;

/// Source of the random noise added to top-candidate scores before the final
/// ranking.
pub trait JitterSource: Send + Sync {
    /// Uniform sample in `[0, 10)`.
    fn sample(&mut self) -> f64;
}

/// Production jitter over the thread-local RNG.
#[derive(Debug, Default)]
pub struct ThreadRngJitter;

impl JitterSource for ThreadRngJitter {
    fn sample(&mut self) -> f64 {
        rand::thread_rng().gen_range(0.0..10.0)
    }
}

/// Seeded jitter for deterministic tests.
#[derive(Debug)]
pub struct SeededJitter {
    rng: StdRng,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl JitterSource for SeededJitter {
    fn sample(&mut self) -> f64 {
        self.rng.gen_range(0.0..10.0)
    }
}

/// Zero jitter; ranking falls back to raw scores.
#[derive(Debug, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn sample(&mut self) -> f64 {
        0.0
    }
}

/// Pick the best venue from `candidates`, excluding ids in `exclude` and any
/// venue without usable coordinates. Returns `None` when nothing remains
/// after filtering; callers treat that as "skip," not as an error.
pub fn select_best(
    candidates: &[Venue],
    ctx: &ScoreContext,
    exclude: &HashSet<String>,
    top_n: usize,
    jitter: &mut dyn JitterSource,
) -> Option<Venue> {
    let mut scored: Vec<(f64, &Venue)> = candidates
        .iter()
        .filter(|v| !exclude.contains(&v.id) && v.coordinates().is_some())
        .map(|v| (score_venue(v, ctx).total, v))
        .collect();
    if scored.is_empty() {
        return None;
    }
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_n.min(scored.len()).max(1));

    let mut finalists: Vec<(f64, &Venue)> = scored
        .into_iter()
        .map(|(score, v)| (score + jitter.sample(), v))
        .collect();
    finalists.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let (score, winner) = finalists[0];
    debug!(
        target: "datecraft::selection",
        venue = %winner.id,
        score,
        "selected venue"
    );
    Some(winner.clone())
}

/// Pick up to `count` venues, growing the exclusion set with each pick and
/// moving the proximity anchor to the last pick so later choices stay close.
/// Stops early once no candidate is found.
pub fn select_multiple(
    candidates: &[Venue],
    ctx: &ScoreContext,
    count: usize,
    exclude: &HashSet<String>,
    jitter: &mut dyn JitterSource,
) -> Vec<Venue> {
    let mut picks = Vec::with_capacity(count);
    let mut exclude = exclude.clone();
    let mut ctx = ctx.clone();
    for _ in 0..count {
        match select_best(candidates, &ctx, &exclude, DEFAULT_TOP_N, jitter) {
            Some(venue) => {
                exclude.insert(venue.id.clone());
                if let Some(coords) = venue.coordinates() {
                    ctx.previous_stop = Some(coords);
                }
                picks.push(venue);
            }
            None => break,
        }
    }
    picks
}
