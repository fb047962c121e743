//! Graceful-degradation candidate filtering.
//!
//! Accommodation filters narrow the pool only when they leave at least one
//! candidate, so a non-empty pool is never filtered down to zero by them.
//! Explicit restrictions (downtown-only, under-21) are hard filters. The
//! chain is an ordered list of predicates over one combinator, so individual
//! steps stay testable on their own.

use crate::types::{DatePreferences, SlotKind, TimeOfDay, Venue};

/// How much of the preference chain to honor. Swap's fallback cascade relaxes
/// filters stage by stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Every preference filter
    Full,
    /// Everything except the downtown-only restriction
    RelaxedDowntown,
    /// Only the under-21 exclusion
    AgeOnly,
}

/// Keep the narrowed pool only if it is non-empty; otherwise keep the input.
pub fn narrow<F>(pool: Vec<Venue>, predicate: F) -> Vec<Venue>
where
    F: Fn(&Venue) -> bool,
{
    let narrowed: Vec<Venue> = pool.iter().filter(|v| predicate(v)).cloned().collect();
    if narrowed.is_empty() {
        pool
    } else {
        narrowed
    }
}

/// Apply the ordered preference chain to a slot's candidate pool.
pub fn preference_filters(
    pool: Vec<Venue>,
    prefs: &DatePreferences,
    slot_kind: Option<SlotKind>,
    mode: FilterMode,
) -> Vec<Venue> {
    let mut pool = pool;

    if mode == FilterMode::AgeOnly {
        if !prefs.twenty_one_plus {
            pool.retain(|v| !v.is_twenty_one_plus());
        }
        return pool;
    }

    if prefs.with_dog {
        pool = narrow(pool, |v| v.pet_friendly);
    }
    if prefs.with_young_children {
        pool = narrow(pool, |v| v.kid_friendly && !v.is_twenty_one_plus());
    }
    if prefs.needs_wheelchair_access {
        pool = narrow(pool, |v| v.wheelchair_accessible);
    }
    if prefs.avoid_stairs {
        pool = narrow(pool, |v| !v.has_stairs || v.has_elevator);
    }
    if prefs.needs_wifi {
        pool = narrow(pool, |v| v.has_wifi);
    }
    if slot_kind == Some(SlotKind::Drinks)
        && matches!(prefs.time_of_day, TimeOfDay::Evening | TimeOfDay::Night)
    {
        pool = narrow(pool, |v| !exclusively_daytime(v));
    }
    // Explicit restrictions are hard filters: the caller asked for them, so
    // an empty pool (and a dropped slot) beats a venue that breaks them.
    if prefs.downtown_only && mode != FilterMode::RelaxedDowntown {
        pool.retain(|v| v.is_downtown);
    }
    if !prefs.twenty_one_plus {
        pool.retain(|v| !v.is_twenty_one_plus());
    }

    if prefs.time_of_day == TimeOfDay::Morning {
        pool = boost_morning(pool);
    }
    pool
}

/// Whether every "best time" tag on the venue is a daytime period.
fn exclusively_daytime(venue: &Venue) -> bool {
    !venue.best_time_tags.is_empty()
        && venue
            .best_time_tags
            .iter()
            .all(|t| matches!(t.as_str(), "morning" | "afternoon" | "daytime"))
}

/// Soft boost: venues tagged "morning" move to the front. A reorder only;
/// nothing is excluded.
pub fn boost_morning(pool: Vec<Venue>) -> Vec<Venue> {
    let (morning, rest): (Vec<Venue>, Vec<Venue>) = pool
        .into_iter()
        .partition(|v| v.best_time_tags.iter().any(|t| t == "morning"));
    let mut ordered = morning;
    ordered.extend(rest);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BudgetRange, Occasion};

    fn venue(id: &str) -> Venue {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": id,
            "category": "food",
            "latitude": 47.25,
            "longitude": -122.44,
        }))
        .unwrap()
    }

    fn prefs() -> DatePreferences {
        DatePreferences {
            occasion: Occasion::CasualHangout,
            budget: BudgetRange::Moderate,
            vibes: vec![],
            duration_hours: 3.0,
            time_of_day: TimeOfDay::Evening,
            activity_level: 3,
            with_dog: false,
            with_young_children: false,
            needs_wheelchair_access: false,
            avoid_stairs: false,
            needs_wifi: false,
            downtown_only: false,
            military_access: false,
            twenty_one_plus: true,
            exclude_venue_ids: vec![],
            anchor_event_id: None,
        }
    }

    #[test]
    fn narrow_keeps_pool_when_it_would_empty() {
        let pool = vec![venue("a"), venue("b")];
        let narrowed = narrow(pool.clone(), |v| v.pet_friendly);
        assert_eq!(narrowed.len(), 2);
    }

    #[test]
    fn narrow_applies_when_result_nonempty() {
        let mut a = venue("a");
        a.pet_friendly = true;
        let pool = vec![a, venue("b")];
        let narrowed = narrow(pool, |v| v.pet_friendly);
        assert_eq!(narrowed.len(), 1);
        assert_eq!(narrowed[0].id, "a");
    }

    #[test]
    fn pet_filter_degrades_gracefully() {
        let mut p = prefs();
        p.with_dog = true;
        let pool = vec![venue("a"), venue("b")];
        let out = preference_filters(pool, &p, None, FilterMode::Full);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn kids_filter_excludes_age_restricted() {
        let mut bar = venue("bar");
        bar.subcategory = Some("bar".into());
        bar.kid_friendly = true;
        let mut park = venue("park");
        park.kid_friendly = true;
        let mut p = prefs();
        p.with_young_children = true;
        let out = preference_filters(vec![bar, park], &p, None, FilterMode::Full);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "park");
    }

    #[test]
    fn stairs_allowed_with_elevator() {
        let mut stairs = venue("stairs");
        stairs.has_stairs = true;
        let mut lifted = venue("lifted");
        lifted.has_stairs = true;
        lifted.has_elevator = true;
        let mut p = prefs();
        p.avoid_stairs = true;
        let out = preference_filters(vec![stairs, lifted], &p, None, FilterMode::Full);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "lifted");
    }

    #[test]
    fn night_drinks_drop_daytime_only_venues() {
        let mut day_bar = venue("day");
        day_bar.best_time_tags = vec!["morning".into(), "afternoon".into()];
        let mut night_bar = venue("night");
        night_bar.best_time_tags = vec!["evening".into()];
        let p = prefs();
        let out = preference_filters(
            vec![day_bar, night_bar],
            &p,
            Some(SlotKind::Drinks),
            FilterMode::Full,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "night");
    }

    #[test]
    fn downtown_relaxed_mode_skips_downtown_filter() {
        let mut p = prefs();
        p.downtown_only = true;
        let mut downtown = venue("downtown");
        downtown.is_downtown = true;
        let suburb = venue("suburb");
        let pool = vec![downtown, suburb];

        let full = preference_filters(pool.clone(), &p, None, FilterMode::Full);
        assert_eq!(full.len(), 1);

        let relaxed = preference_filters(pool, &p, None, FilterMode::RelaxedDowntown);
        assert_eq!(relaxed.len(), 2);
    }

    #[test]
    fn age_only_mode_keeps_just_the_age_rule() {
        let mut p = prefs();
        p.twenty_one_plus = false;
        p.downtown_only = true;
        p.with_dog = true;
        let mut bar = venue("bar");
        bar.subcategory = Some("nightclub".into());
        let cafe = venue("cafe");
        let out = preference_filters(vec![bar, cafe], &p, None, FilterMode::AgeOnly);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "cafe");
    }

    #[test]
    fn morning_boost_reorders_without_excluding() {
        let mut p = prefs();
        p.time_of_day = TimeOfDay::Morning;
        let mut early = venue("early");
        early.best_time_tags = vec!["morning".into()];
        let late = venue("late");
        let out = preference_filters(vec![late, early], &p, None, FilterMode::Full);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, "early");
    }
}
