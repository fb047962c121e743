use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Duration, Utc};
use tracing::{debug, info};

use crate::error::Result;
use crate::filters::{preference_filters, FilterMode};
use crate::geo;
use crate::scoring::ScoreContext;
use crate::selection::{select_best, JitterSource, ThreadRngJitter, DEFAULT_TOP_N};
use crate::store::{EventFilter, VenueFilter, VenueStore};
use crate::template::build_slots;
use crate::types::{
    AnchorEvent, DatePlan, DatePreferences, DateStop, Occasion, PlanDebug, SlotKind, TimeOfDay,
    TimeSlot, Venue, VenueCategory,
};

/// Grace period past the requested duration before optional slots are
/// skipped.
const OPTIONAL_SLOT_GRACE_MINUTES: u32 = 60;

/// The itinerary engine. Holds the data-access seam and the jitter source;
/// everything else is per-call state.
pub struct PlanEngine {
    store: Arc<dyn VenueStore>,
    jitter: Mutex<Box<dyn JitterSource>>,
    top_n: usize,
    enrich_with_events: bool,
    include_debug: bool,
}

impl PlanEngine {
    pub fn new(store: Arc<dyn VenueStore>) -> Self {
        Self {
            store,
            jitter: Mutex::new(Box::new(ThreadRngJitter)),
            top_n: DEFAULT_TOP_N,
            enrich_with_events: true,
            include_debug: false,
        }
    }

    /// Replace the jitter source; tests use a seeded or zero source.
    pub fn with_jitter(mut self, jitter: impl JitterSource + 'static) -> Self {
        self.jitter = Mutex::new(Box::new(jitter));
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n.max(1);
        self
    }

    pub fn with_event_enrichment(mut self, enabled: bool) -> Self {
        self.enrich_with_events = enabled;
        self
    }

    pub fn with_debug_counters(mut self, enabled: bool) -> Self {
        self.include_debug = enabled;
        self
    }

    pub(crate) fn store(&self) -> &Arc<dyn VenueStore> {
        &self.store
    }

    pub(crate) fn top_n(&self) -> usize {
        self.top_n
    }

    pub(crate) fn jitter(&self) -> MutexGuard<'_, Box<dyn JitterSource>> {
        // A poisoned lock only means another call panicked mid-sample; the
        // jitter state is still usable.
        self.jitter.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Generate a full itinerary from caller preferences.
    pub async fn generate_plan(&self, prefs: &DatePreferences) -> Result<DatePlan> {
        prefs.validate()?;

        let anchor = self.fetch_anchor(prefs).await?;
        let slots = build_slots(prefs, anchor.as_ref());
        let pool = self.fetch_pool(prefs, &slots).await?;
        info!(
            target: "datecraft::generator",
            slots = slots.len(),
            pool = pool.len(),
            anchored = anchor.is_some(),
            "assembling plan"
        );

        let mut ctx = ScoreContext {
            vibes: prefs.normalized_vibes(),
            budget: prefs.budget,
            time_of_day: Some(prefs.time_of_day),
            occasion: Some(prefs.occasion),
            previous_stop: None,
        };
        let mut exclude: HashSet<String> = prefs.exclude_venue_ids.iter().cloned().collect();
        let mut running_duration: u32 = 0;
        let mut stops: Vec<DateStop> = Vec::new();
        let mut counters = PlanDebug {
            candidate_pool_size: pool.len(),
            slots_considered: slots.len(),
            ..PlanDebug::default()
        };
        let target_minutes = prefs.duration_minutes();

        for slot in &slots {
            if slot.kind == SlotKind::Event {
                if let Some(event) = anchor.as_ref() {
                    let stop = event_stop(stops.len() as u32 + 1, slot, event);
                    if let Some(coords) = event.coordinates() {
                        ctx.previous_stop = Some(coords);
                    }
                    running_duration += stop.duration_minutes;
                    stops.push(stop);
                    counters.slots_filled += 1;
                }
                continue;
            }

            if !slot.required && running_duration > target_minutes + OPTIONAL_SLOT_GRACE_MINUTES {
                debug!(
                    target: "datecraft::generator",
                    slot = %slot.label,
                    running_duration,
                    "skipping optional slot, over time budget"
                );
                counters.slots_skipped += 1;
                continue;
            }

            let candidates: Vec<_> = pool
                .iter()
                .filter(|v| slot.categories.contains(&v.category))
                .cloned()
                .collect();
            let candidates =
                preference_filters(candidates, prefs, Some(slot.kind), FilterMode::Full);

            let picked = {
                let mut jitter = self.jitter();
                select_best(&candidates, &ctx, &exclude, self.top_n, jitter.as_mut())
            };
            match picked {
                Some(venue) => {
                    exclude.insert(venue.id.clone());
                    if let Some(coords) = venue.coordinates() {
                        ctx.previous_stop = Some(coords);
                    }
                    let stop = venue_stop(stops.len() as u32 + 1, slot, venue);
                    running_duration += stop.duration_minutes;
                    stops.push(stop);
                    counters.slots_filled += 1;
                }
                None => {
                    // Expected outcome: the slot is dropped, never an error.
                    debug!(
                        target: "datecraft::generator",
                        slot = %slot.label,
                        "no candidate found, dropping slot"
                    );
                    counters.slots_skipped += 1;
                }
            }
        }

        attach_travel_tips(&mut stops);

        let mut plan = DatePlan {
            id: plan_id(),
            title: plan_title(prefs),
            stops,
            total_duration_minutes: 0,
            estimated_cost: 0.0,
            tips: plan_tips(prefs),
            debug: self.include_debug.then_some(counters),
        };
        plan.recompute_totals();

        if self.enrich_with_events {
            self.enrich_with_nearby_events(&mut plan, anchor.as_ref())
                .await?;
        }

        info!(
            target: "datecraft::generator",
            plan = %plan.id,
            stops = plan.stops.len(),
            duration = plan.total_duration_minutes,
            "plan assembled"
        );
        Ok(plan)
    }

    async fn fetch_anchor(&self, prefs: &DatePreferences) -> Result<Option<AnchorEvent>> {
        let id = match prefs.anchor_event_id.as_ref() {
            Some(id) => id,
            None => return Ok(None),
        };
        let events = self
            .store
            .query_events(&EventFilter {
                event_id: Some(id.clone()),
                ..EventFilter::default()
            })
            .await?;
        Ok(events.into_iter().next())
    }

    /// Fetch the venue pool once, wide enough for every slot in the template.
    async fn fetch_pool(
        &self,
        prefs: &DatePreferences,
        slots: &[TimeSlot],
    ) -> Result<Vec<Venue>> {
        let mut categories: Vec<VenueCategory> = Vec::new();
        for slot in slots {
            for cat in &slot.categories {
                if !categories.contains(cat) {
                    categories.push(*cat);
                }
            }
        }
        self.store
            .query_venues(&VenueFilter {
                categories: Some(categories),
                max_price_tier: Some(prefs.budget.tier().saturating_add(1).min(4)),
                require_coordinates: true,
            })
            .await
    }

    /// Attach venue-scoped events that overlap each stop's visit window.
    async fn enrich_with_nearby_events(
        &self,
        plan: &mut DatePlan,
        anchor: Option<&AnchorEvent>,
    ) -> Result<()> {
        // The plan carries no absolute date of its own; anchor plans hang
        // their timeline off the event's start time (pre-event stops count
        // backward from it), unanchored plans assume "starting now."
        let mut cursor = match anchor {
            Some(event) => {
                let lead: i64 = plan
                    .stops
                    .iter()
                    .take_while(|s| s.event.as_ref().map(|e| &e.id) != Some(&event.id))
                    .map(|s| i64::from(s.duration_minutes))
                    .sum();
                event.start_time - Duration::minutes(lead)
            }
            None => Utc::now(),
        };
        for stop in &mut plan.stops {
            let window_start = cursor;
            cursor = cursor + Duration::minutes(i64::from(stop.duration_minutes));
            let venue_id = match stop.venue.as_ref() {
                Some(v) => v.id.clone(),
                None => continue,
            };
            let nearby = self
                .store
                .query_events(&EventFilter {
                    window: Some((window_start, cursor)),
                    venue_id: Some(venue_id),
                    event_id: None,
                })
                .await?;
            if !nearby.is_empty() {
                if !stop.notes.is_empty() {
                    stop.notes.push(' ');
                }
                stop.notes
                    .push_str("Something's happening here during your visit!");
                stop.happening_nearby = Some(nearby);
            }
        }
        Ok(())
    }
}

fn venue_stop(order: u32, slot: &TimeSlot, venue: Venue) -> DateStop {
    let duration = venue
        .typical_duration_minutes
        .unwrap_or(slot.duration_minutes);
    let cost = venue.average_cost.unwrap_or(slot.default_cost);
    DateStop {
        order,
        activity: slot.label.clone(),
        duration_minutes: duration,
        estimated_cost: cost,
        notes: String::new(),
        travel_tip: None,
        happening_nearby: None,
        event: None,
        venue: Some(venue),
    }
}

fn event_stop(order: u32, slot: &TimeSlot, event: &AnchorEvent) -> DateStop {
    DateStop {
        order,
        venue: None,
        event: Some(event.clone()),
        activity: slot.label.clone(),
        duration_minutes: slot.duration_minutes,
        estimated_cost: slot.default_cost,
        notes: event.description.clone().unwrap_or_default(),
        travel_tip: None,
        happening_nearby: None,
    }
}

/// Fill in transition tips between consecutive coordinate-bearing stops.
fn attach_travel_tips(stops: &mut [DateStop]) {
    for i in 0..stops.len().saturating_sub(1) {
        let here = stops[i].coordinates();
        let next = stops[i + 1].coordinates();
        if let (Some(a), Some(b)) = (here, next) {
            stops[i].travel_tip = Some(geo::travel_tip(geo::distance_km(a, b)));
        }
    }
}

/// Reorder stops greedily by proximity, keeping the first stop fixed, then
/// renumber and refresh travel tips. Used by callers that prefer the least
/// back-and-forth over the template's meal ordering.
pub fn optimize_stop_order(stops: Vec<DateStop>) -> Vec<DateStop> {
    let coords: Option<Vec<(f64, f64)>> = stops.iter().map(|s| s.coordinates()).collect();
    let mut stops = stops;
    if let Some(points) = coords {
        let order = geo::nearest_neighbor_order(&points);
        let mut reordered: Vec<DateStop> = order.into_iter().map(|i| stops[i].clone()).collect();
        for (i, stop) in reordered.iter_mut().enumerate() {
            stop.order = i as u32 + 1;
            stop.travel_tip = None;
        }
        attach_travel_tips(&mut reordered);
        return reordered;
    }
    stops.iter_mut().enumerate().for_each(|(i, s)| {
        s.order = i as u32 + 1;
    });
    stops
}

fn plan_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("plan-{millis}")
}

fn plan_title(prefs: &DatePreferences) -> String {
    let when = match prefs.time_of_day {
        TimeOfDay::Morning => "Morning",
        TimeOfDay::Afternoon => "Afternoon",
        TimeOfDay::Evening => "Evening",
        TimeOfDay::Night => "Late Night",
        TimeOfDay::FullDay => "All-Day",
    };
    let what = match prefs.occasion {
        Occasion::FirstDate => "First Date",
        Occasion::SecondDate => "Second Date",
        Occasion::Anniversary => "Anniversary Date",
        Occasion::Birthday => "Birthday Outing",
        Occasion::CasualHangout => "Hangout",
        Occasion::SpecialCelebration => "Celebration",
        Occasion::DayDate => "Day Date",
        Occasion::NightOut => "Night Out",
    };
    format!("{when} {what}")
}

fn plan_tips(prefs: &DatePreferences) -> Vec<String> {
    let mut tips = vec![
        "Check venue hours before you head out; they can change seasonally.".to_string(),
    ];
    if matches!(prefs.time_of_day, TimeOfDay::Evening | TimeOfDay::FullDay) {
        tips.push("Dinner spots fill up on weekends; a reservation is worth it.".to_string());
    }
    if prefs.downtown_only {
        tips.push("Downtown parking is easiest in the garages off the main strip.".to_string());
    }
    if prefs.with_dog {
        tips.push("Bring water for your dog; not every patio has a bowl out.".to_string());
    }
    tips
}
