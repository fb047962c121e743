use std::sync::Arc;

use chrono::{TimeZone, Utc};
use datecraft::{
    AnchorEvent, BudgetRange, DatePreferences, DateStop, InMemoryStore, NoJitter, Occasion,
    PlanEngine, TimeOfDay, Venue, VenueCategory,
};

fn venue(id: &str, category: &str) -> Venue {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": id,
        "category": category,
        "latitude": 47.2520,
        "longitude": -122.4440,
    }))
    .unwrap()
}

fn stop(order: u32, venue: Venue) -> DateStop {
    DateStop {
        order,
        venue: Some(venue),
        event: None,
        activity: "Stop".into(),
        duration_minutes: 60,
        estimated_cost: 20.0,
        notes: String::new(),
        travel_tip: None,
        happening_nearby: None,
    }
}

fn event_stop(order: u32, event: AnchorEvent) -> DateStop {
    DateStop {
        order,
        venue: None,
        event: Some(event),
        activity: "Show".into(),
        duration_minutes: 90,
        estimated_cost: 25.0,
        notes: String::new(),
        travel_tip: None,
        happening_nearby: None,
    }
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

fn engine(venues: Vec<Venue>, events: Vec<AnchorEvent>) -> PlanEngine {
    PlanEngine::new(Arc::new(InMemoryStore::new(venues, events))).with_jitter(NoJitter)
}

fn event(id: &str, day: u32, hour: u32) -> AnchorEvent {
    AnchorEvent {
        id: id.into(),
        title: format!("Event {id}"),
        start_time: Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap(),
        end_time: Utc.with_ymd_and_hms(2025, 6, day, hour + 2, 0, 0).unwrap(),
        venue_id: None,
        latitude: None,
        longitude: None,
        description: None,
        category_tags: vec![],
    }
}

#[tokio::test]
async fn swap_prefers_the_same_category() {
    let engine = engine(
        vec![venue("bistro", "food"), venue("trattoria", "food")],
        vec![],
    );
    let current = stop(1, venue("bistro", "food"));
    let replacement = engine
        .swap_stop(&current, &[current.clone()], &prefs())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replacement.venue.as_ref().unwrap().id, "trattoria");
    assert_eq!(
        replacement.venue.as_ref().unwrap().category,
        VenueCategory::Food
    );
    // Same category keeps the original activity label
    assert_eq!(replacement.activity, "Stop");
}

#[tokio::test]
async fn swap_falls_back_to_related_categories() {
    // No other food venue exists, so the cascade lands on drink.
    let engine = engine(
        vec![venue("bistro", "food"), venue("wine-bar", "drink")],
        vec![],
    );
    let current = stop(1, venue("bistro", "food"));
    let replacement = engine
        .swap_stop(&current, &[current.clone()], &prefs())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replacement.venue.as_ref().unwrap().id, "wine-bar");
    assert_eq!(replacement.activity, "Drinks");
}

#[tokio::test]
async fn swap_never_reuses_plan_venues() {
    let engine = engine(
        vec![
            venue("bistro", "food"),
            venue("trattoria", "food"),
            venue("wine-bar", "drink"),
        ],
        vec![],
    );
    let target = stop(1, venue("bistro", "food"));
    let other = stop(2, venue("trattoria", "food"));
    let all = vec![target.clone(), other];
    let replacement = engine
        .swap_stop(&target, &all, &prefs())
        .await
        .unwrap()
        .unwrap();
    let id = replacement.venue.as_ref().unwrap().id.clone();
    assert_ne!(id, "bistro");
    assert_ne!(id, "trattoria");
}

#[tokio::test]
async fn swap_returns_none_when_every_stage_fails() {
    let engine = engine(vec![venue("bistro", "food")], vec![]);
    let current = stop(1, venue("bistro", "food"));
    let replacement = engine
        .swap_stop(&current, &[current.clone()], &prefs())
        .await
        .unwrap();
    assert!(replacement.is_none());
}

#[tokio::test]
async fn swap_relaxes_downtown_as_a_late_stage() {
    let mut p = prefs();
    p.downtown_only = true;
    // The only alternative is outside downtown; the cascade still finds it
    // once the downtown restriction is relaxed.
    let suburb = venue("suburb-cafe", "food");
    let engine = engine(vec![venue("bistro", "food"), suburb], vec![]);
    let current = stop(1, venue("bistro", "food"));
    let replacement = engine
        .swap_stop(&current, &[current.clone()], &p)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replacement.venue.as_ref().unwrap().id, "suburb-cafe");
}

#[tokio::test]
async fn event_swap_widens_the_window() {
    // e2 is on a later day within the week, so only the widest window
    // finds it.
    let engine = engine(vec![], vec![event("e1", 7, 19), event("e2", 10, 19)]);
    let current = event_stop(1, event("e1", 7, 19));
    let replacement = engine
        .swap_stop(&current, &[current.clone()], &prefs())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replacement.event.as_ref().unwrap().id, "e2");
    assert_eq!(replacement.activity, "Event e2");
}

#[tokio::test]
async fn event_swap_returns_none_without_alternatives() {
    let engine = engine(vec![], vec![event("e1", 7, 19)]);
    let current = event_stop(1, event("e1", 7, 19));
    let replacement = engine
        .swap_stop(&current, &[current.clone()], &prefs())
        .await
        .unwrap();
    assert!(replacement.is_none());
}

#[tokio::test]
async fn add_fills_the_missing_meal_first() {
    let engine = engine(
        vec![venue("wine-bar", "drink"), venue("bistro", "food")],
        vec![],
    );
    let stops = vec![stop(1, venue("wine-bar", "drink"))];
    let added = engine.add_stop(0, &stops, &prefs()).await.unwrap().unwrap();
    assert_eq!(added.venue.as_ref().unwrap().id, "bistro");
    assert_eq!(added.activity, "Grab a Bite");
    assert_eq!(added.order, 2);
}

#[tokio::test]
async fn add_falls_back_to_any_venue() {
    let mut p = prefs();
    p.time_of_day = TimeOfDay::Afternoon;
    // The plan already covers meal, drink, and activity; the afternoon
    // inference asks for activity-like categories, but the only unused venue
    // is another bar, so the unfiltered fallback has to find it.
    let engine = engine(
        vec![
            venue("bistro", "food"),
            venue("wine-bar", "drink"),
            venue("climbing-gym", "activity"),
            venue("taproom", "drink"),
        ],
        vec![],
    );
    let stops = vec![
        stop(1, venue("bistro", "food")),
        stop(2, venue("wine-bar", "drink")),
        stop(3, venue("climbing-gym", "activity")),
    ];
    let added = engine.add_stop(2, &stops, &p).await.unwrap().unwrap();
    assert_eq!(added.venue.as_ref().unwrap().id, "taproom");
}

#[tokio::test]
async fn add_returns_none_when_catalog_is_exhausted() {
    let engine = engine(vec![venue("bistro", "food")], vec![]);
    let stops = vec![stop(1, venue("bistro", "food"))];
    let added = engine.add_stop(0, &stops, &prefs()).await.unwrap();
    assert!(added.is_none());
}
