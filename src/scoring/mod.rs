//! Multi-factor scoring of a single venue against caller preferences.
//!
//! Six independently bounded subscores sum to a total of at most 100. The
//! function is pure: identical inputs always produce the identical breakdown.
//! Randomness (jitter) belongs to selection, never to scoring.

pub mod synonyms;

use serde::{Deserialize, Serialize};

use crate::geo;
use crate::types::{BudgetRange, Occasion, TimeOfDay, Venue};

/// Everything scoring needs to know about the request.
#[derive(Debug, Clone)]
pub struct ScoreContext {
    /// Normalized (lowercased) desired vibes
    pub vibes: Vec<String>,
    pub budget: BudgetRange,
    pub time_of_day: Option<TimeOfDay>,
    pub occasion: Option<Occasion>,
    /// Coordinates of the previously placed stop, for proximity awareness
    pub previous_stop: Option<(f64, f64)>,
}

/// Per-factor contributions to a venue's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub vibe_match: f64,
    pub budget_fit: f64,
    pub romantic: f64,
    pub proximity: f64,
    pub time_of_day_fit: f64,
    pub occasion_fit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueScore {
    pub total: f64,
    pub breakdown: ScoreBreakdown,
}

/// Score a venue against the request context.
pub fn score_venue(venue: &Venue, ctx: &ScoreContext) -> VenueScore {
    let breakdown = ScoreBreakdown {
        vibe_match: vibe_match(venue, &ctx.vibes),
        budget_fit: budget_fit(venue, ctx.budget),
        romantic: f64::from(venue.romantic_score) * 3.0,
        proximity: proximity_bonus(venue, ctx.previous_stop),
        time_of_day_fit: time_of_day_fit(venue, ctx.time_of_day),
        occasion_fit: occasion_fit(venue, ctx.occasion),
    };
    let total = breakdown.vibe_match
        + breakdown.budget_fit
        + breakdown.romantic
        + breakdown.proximity
        + breakdown.time_of_day_fit
        + breakdown.occasion_fit;
    VenueScore { total, breakdown }
}

/// 0-30. Match ratio counts direct tag hits at full weight and synonym hits
/// at half weight, over the number of desired vibes.
fn vibe_match(venue: &Venue, vibes: &[String]) -> f64 {
    if vibes.is_empty() {
        return 15.0;
    }
    let mut hits = 0.0;
    for vibe in vibes {
        if venue.vibe_tags.iter().any(|t| t == vibe) {
            hits += 1.0;
            continue;
        }
        let related = synonyms::related_tags(vibe);
        if venue
            .vibe_tags
            .iter()
            .any(|t| related.iter().any(|r| t.contains(r)))
        {
            hits += 0.5;
        }
    }
    let ratio = hits / vibes.len() as f64;
    if ratio >= 0.75 {
        30.0
    } else if ratio >= 0.5 {
        22.0
    } else if ratio >= 0.25 {
        15.0
    } else if ratio > 0.0 {
        8.0
    } else {
        3.0
    }
}

/// 0-20, decreasing with the gap between desired and venue price tiers.
fn budget_fit(venue: &Venue, budget: BudgetRange) -> f64 {
    let diff = i16::from(budget.tier()).abs_diff(i16::from(venue.price_tier()));
    match diff {
        0 => 20.0,
        1 => 12.0,
        2 => 5.0,
        _ => 2.0,
    }
}

/// 0-15, banded on haversine distance to the previous stop. Neutral 8 when
/// there is no previous stop or the venue has no coordinates.
fn proximity_bonus(venue: &Venue, previous_stop: Option<(f64, f64)>) -> f64 {
    let (prev, here) = match (previous_stop, venue.coordinates()) {
        (Some(p), Some(h)) => (p, h),
        _ => return 8.0,
    };
    let km = geo::distance_km(prev, here);
    if km < 0.3 {
        15.0
    } else if km < 0.5 {
        12.0
    } else if km < 1.0 {
        10.0
    } else if km < 1.5 {
        7.0
    } else if km < 2.5 {
        4.0
    } else {
        1.0
    }
}

/// 0-10. Adjacent day periods earn partial credit.
fn time_of_day_fit(venue: &Venue, time_of_day: Option<TimeOfDay>) -> f64 {
    let tod = match time_of_day {
        Some(t) => t,
        None => return 5.0,
    };
    if venue.best_time_tags.is_empty() {
        return 5.0;
    }
    let wanted = match tod {
        TimeOfDay::Morning => "morning",
        TimeOfDay::Afternoon => "afternoon",
        TimeOfDay::Evening => "evening",
        TimeOfDay::Night => "night",
        TimeOfDay::FullDay => return 5.0,
    };
    if venue.best_time_tags.iter().any(|t| t == wanted) {
        return 10.0;
    }
    let adjacent = match tod {
        TimeOfDay::Morning => &["afternoon"][..],
        TimeOfDay::Afternoon => &["morning", "evening"][..],
        TimeOfDay::Evening => &["afternoon"][..],
        _ => &[][..],
    };
    if venue
        .best_time_tags
        .iter()
        .any(|t| adjacent.iter().any(|a| t == a))
    {
        6.0
    } else {
        2.0
    }
}

/// 0-10, substring lookup against the venue's "good for" tags.
fn occasion_fit(venue: &Venue, occasion: Option<Occasion>) -> f64 {
    let occasion = match occasion {
        Some(o) => o,
        None => return 5.0,
    };
    if venue.good_for_tags.is_empty() {
        return 5.0;
    }
    let keywords = occasion.good_for_keywords();
    if venue
        .good_for_tags
        .iter()
        .any(|tag| keywords.iter().any(|k| tag.contains(k)))
    {
        10.0
    } else {
        3.0
    }
}
