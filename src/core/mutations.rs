//! Post-generation edits: swapping a stop for an alternative and inserting a
//! new stop. Both reuse selection; swap walks an ordered list of fallback
//! stages that is interpreted lazily, so later (broader) queries only run
//! when earlier ones come up empty.

use std::collections::HashSet;

use chrono::Duration;
use tracing::{debug, warn};

use super::generator::PlanEngine;
use crate::error::Result;
use crate::filters::{preference_filters, FilterMode};
use crate::geo;
use crate::scoring::ScoreContext;
use crate::selection::select_best;
use crate::store::{EventFilter, VenueFilter};
use crate::types::{DatePreferences, DateStop, TimeOfDay, Venue, VenueCategory};

/// One stage of the venue-swap fallback cascade.
#[derive(Debug, Clone)]
struct SwapStage {
    categories: Option<Vec<VenueCategory>>,
    mode: FilterMode,
    label: &'static str,
}

/// Categories tried when the stop's own category has no alternative left.
fn related_categories(category: VenueCategory) -> &'static [VenueCategory] {
    use VenueCategory::*;
    match category {
        Food => &[Drink, Entertainment],
        Drink => &[Food, Entertainment],
        Entertainment => &[Drink, Food],
        Activity => &[Nature, Entertainment],
        Nature => &[Activity],
        Culture => &[Activity, Entertainment],
        Shopping => &[Culture, Food],
    }
}

fn swap_stages(category: VenueCategory) -> Vec<SwapStage> {
    let mut stages = vec![SwapStage {
        categories: Some(vec![category]),
        mode: FilterMode::Full,
        label: "same category",
    }];
    for related in related_categories(category) {
        stages.push(SwapStage {
            categories: Some(vec![*related]),
            mode: FilterMode::Full,
            label: "related category",
        });
    }
    stages.push(SwapStage {
        categories: None,
        mode: FilterMode::Full,
        label: "any category",
    });
    stages.push(SwapStage {
        categories: None,
        mode: FilterMode::RelaxedDowntown,
        label: "any category, downtown relaxed",
    });
    stages.push(SwapStage {
        categories: None,
        mode: FilterMode::AgeOnly,
        label: "any category, age restriction only",
    });
    stages
}

impl PlanEngine {
    /// Find an alternative for one stop of an existing plan. Returns `None`
    /// when every fallback stage is exhausted; that is an expected outcome
    /// the caller reports as "no alternative found."
    pub async fn swap_stop(
        &self,
        stop: &DateStop,
        all_stops: &[DateStop],
        prefs: &DatePreferences,
    ) -> Result<Option<DateStop>> {
        if stop.venue.is_none() {
            if let Some(event) = stop.event.as_ref() {
                return self.swap_event_stop(stop, all_stops, &event.id).await;
            }
            return Ok(None);
        }

        let mut exclude: HashSet<String> = prefs.exclude_venue_ids.iter().cloned().collect();
        if let Some(id) = stop.venue_id() {
            exclude.insert(id.to_string());
        }
        for other in all_stops {
            if let Some(id) = other.venue_id() {
                exclude.insert(id.to_string());
            }
        }

        // Score proximity against the rest of the plan rather than one
        // neighbor, so the replacement lands near the overall route.
        let other_coords: Vec<(f64, f64)> = all_stops
            .iter()
            .filter(|s| s.order != stop.order)
            .filter_map(|s| s.coordinates())
            .collect();
        let ctx = ScoreContext {
            vibes: prefs.normalized_vibes(),
            budget: prefs.budget,
            time_of_day: Some(prefs.time_of_day),
            occasion: Some(prefs.occasion),
            previous_stop: (!other_coords.is_empty()).then(|| geo::centroid(&other_coords)),
        };

        let category = match stop.venue.as_ref() {
            Some(v) => v.category,
            None => return Ok(None),
        };
        for (index, stage) in swap_stages(category).into_iter().enumerate() {
            let pool = self
                .store()
                .query_venues(&VenueFilter {
                    categories: stage.categories.clone(),
                    max_price_tier: Some(prefs.budget.tier().saturating_add(1).min(4)),
                    require_coordinates: true,
                })
                .await?;
            let pool = preference_filters(pool, prefs, None, stage.mode);
            let picked = {
                let mut jitter = self.jitter();
                select_best(&pool, &ctx, &exclude, self.top_n(), jitter.as_mut())
            };
            if let Some(venue) = picked {
                if index > 0 {
                    warn!(
                        target: "datecraft::mutations",
                        stage = stage.label,
                        venue = %venue.id,
                        "swap fell back past the first stage"
                    );
                }
                return Ok(Some(replacement_stop(stop, venue)));
            }
            debug!(
                target: "datecraft::mutations",
                stage = stage.label,
                "swap stage exhausted"
            );
        }
        Ok(None)
    }

    /// Event stops swap over widening date windows: the original slot window,
    /// then the same day, then the next seven days.
    async fn swap_event_stop(
        &self,
        stop: &DateStop,
        all_stops: &[DateStop],
        current_event_id: &str,
    ) -> Result<Option<DateStop>> {
        let current = match stop.event.as_ref() {
            Some(e) => e.clone(),
            None => return Ok(None),
        };
        let mut exclude: HashSet<String> = HashSet::new();
        exclude.insert(current_event_id.to_string());
        for other in all_stops {
            if let Some(e) = other.event.as_ref() {
                exclude.insert(e.id.clone());
            }
        }

        let day_start = current
            .start_time
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc())
            .unwrap_or(current.start_time);
        let windows = [
            (current.start_time, current.end_time),
            (day_start, day_start + Duration::days(1)),
            (day_start, day_start + Duration::days(7)),
        ];

        for window in windows {
            let events = self
                .store()
                .query_events(&EventFilter {
                    window: Some(window),
                    venue_id: None,
                    event_id: None,
                })
                .await?;
            if let Some(event) = events.into_iter().find(|e| !exclude.contains(&e.id)) {
                let mut replacement = stop.clone();
                replacement.activity = event.title.clone();
                replacement.duration_minutes = event.duration_minutes().max(30);
                replacement.notes = event.description.clone().unwrap_or_default();
                replacement.travel_tip = None;
                replacement.event = Some(event);
                return Ok(Some(replacement));
            }
        }
        Ok(None)
    }

    /// Insert a new stop after the given index. The target categories are
    /// inferred from what the plan already covers; an unfiltered any-venue
    /// pool is the last resort.
    pub async fn add_stop(
        &self,
        insert_after: usize,
        all_stops: &[DateStop],
        prefs: &DatePreferences,
    ) -> Result<Option<DateStop>> {
        let mut exclude: HashSet<String> = prefs.exclude_venue_ids.iter().cloned().collect();
        for stop in all_stops {
            if let Some(id) = stop.venue_id() {
                exclude.insert(id.to_string());
            }
        }

        let previous_stop = all_stops
            .get(insert_after)
            .and_then(|s| s.coordinates())
            .or_else(|| {
                let coords: Vec<(f64, f64)> =
                    all_stops.iter().filter_map(|s| s.coordinates()).collect();
                (!coords.is_empty()).then(|| geo::centroid(&coords))
            });
        let ctx = ScoreContext {
            vibes: prefs.normalized_vibes(),
            budget: prefs.budget,
            time_of_day: Some(prefs.time_of_day),
            occasion: Some(prefs.occasion),
            previous_stop,
        };

        let categories = infer_add_categories(all_stops, prefs);
        debug!(
            target: "datecraft::mutations",
            ?categories,
            insert_after,
            "inferred categories for added stop"
        );

        let pool = self
            .store()
            .query_venues(&VenueFilter {
                categories: Some(categories),
                max_price_tier: Some(prefs.budget.tier().saturating_add(1).min(4)),
                require_coordinates: true,
            })
            .await?;
        let pool = preference_filters(pool, prefs, None, FilterMode::Full);
        let picked = {
            let mut jitter = self.jitter();
            select_best(&pool, &ctx, &exclude, self.top_n(), jitter.as_mut())
        };
        if let Some(venue) = picked {
            return Ok(Some(added_stop(insert_after, venue)));
        }

        // Fallback: any venue at all.
        let pool = self
            .store()
            .query_venues(&VenueFilter {
                categories: None,
                max_price_tier: None,
                require_coordinates: true,
            })
            .await?;
        let picked = {
            let mut jitter = self.jitter();
            select_best(&pool, &ctx, &exclude, self.top_n(), jitter.as_mut())
        };
        Ok(picked.map(|venue| added_stop(insert_after, venue)))
    }
}

/// Pick what kind of stop the plan is missing.
fn infer_add_categories(all_stops: &[DateStop], prefs: &DatePreferences) -> Vec<VenueCategory> {
    use VenueCategory::*;
    let categories: Vec<VenueCategory> = all_stops
        .iter()
        .filter_map(|s| s.venue.as_ref())
        .map(|v| v.category)
        .collect();
    let has_meal = categories.contains(&Food);
    let has_drink = categories.contains(&Drink);
    let has_activity = categories
        .iter()
        .any(|c| matches!(c, Activity | Nature | Culture | Entertainment));

    if !has_meal {
        return vec![Food];
    }
    if !has_drink
        && prefs.twenty_one_plus
        && matches!(prefs.time_of_day, TimeOfDay::Evening | TimeOfDay::Night)
    {
        return vec![Drink];
    }
    if !has_activity {
        return vec![Activity, Nature, Culture, Entertainment];
    }
    match prefs.time_of_day {
        TimeOfDay::Morning | TimeOfDay::Afternoon => vec![Activity, Nature, Culture, Shopping],
        TimeOfDay::Evening | TimeOfDay::Night => vec![Drink, Entertainment, Food],
        TimeOfDay::FullDay => vec![Activity, Entertainment],
    }
}

fn activity_label(category: VenueCategory) -> &'static str {
    use VenueCategory::*;
    match category {
        Food => "Grab a Bite",
        Drink => "Drinks",
        Activity => "Something Active",
        Nature => "Get Outside",
        Culture => "Soak Up Some Culture",
        Entertainment => "Catch a Show",
        Shopping => "Browse the Shops",
    }
}

fn replacement_stop(original: &DateStop, venue: Venue) -> DateStop {
    let duration = venue
        .typical_duration_minutes
        .unwrap_or(original.duration_minutes);
    let cost = venue.average_cost.unwrap_or(original.estimated_cost);
    DateStop {
        order: original.order,
        activity: if venue.category
            == original
                .venue
                .as_ref()
                .map(|v| v.category)
                .unwrap_or(venue.category)
        {
            original.activity.clone()
        } else {
            activity_label(venue.category).to_string()
        },
        duration_minutes: duration,
        estimated_cost: cost,
        notes: String::new(),
        travel_tip: None,
        happening_nearby: None,
        event: None,
        venue: Some(venue),
    }
}

fn added_stop(insert_after: usize, venue: Venue) -> DateStop {
    let duration = venue.typical_duration_minutes.unwrap_or(60);
    let cost = venue.average_cost.unwrap_or(20.0);
    DateStop {
        // Caller renumbers the surrounding stops after insertion
        order: insert_after as u32 + 2,
        activity: activity_label(venue.category).to_string(),
        duration_minutes: duration,
        estimated_cost: cost,
        notes: String::new(),
        travel_tip: None,
        happening_nearby: None,
        event: None,
        venue: Some(venue),
    }
}
