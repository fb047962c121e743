//! Builds the ordered list of abstract slots an itinerary should fill.
//!
//! Pure function of the preferences plus an optional anchor event; venue
//! selection never happens here.

use crate::types::{AnchorEvent, DatePreferences, SlotKind, TimeOfDay, TimeSlot, VenueCategory};
use VenueCategory::{Activity, Culture, Drink, Entertainment, Food, Nature, Shopping};

/// Requested duration above which the shorter templates include their
/// optional extra slots.
const EXTRA_SLOT_THRESHOLD_HOURS: f64 = 4.0;

/// Assumed event duration when the anchor has no usable end time.
const DEFAULT_EVENT_MINUTES: u32 = 90;

/// Build the slot sequence for one generation call.
pub fn build_slots(prefs: &DatePreferences, anchor: Option<&AnchorEvent>) -> Vec<TimeSlot> {
    match anchor {
        Some(event) if prefs.time_of_day != TimeOfDay::FullDay => anchored_slots(event),
        _ => template_slots(prefs),
    }
}

/// Short pre-activity / event / post-activity sequence built around the
/// anchor, keyed off the period the event starts in.
fn anchored_slots(event: &AnchorEvent) -> Vec<TimeSlot> {
    let mut duration = event.duration_minutes();
    if duration == 0 {
        duration = DEFAULT_EVENT_MINUTES;
    }
    let event_slot = TimeSlot::new(SlotKind::Event, &event.title, &[], duration, 20.0, true);

    match event.start_period() {
        TimeOfDay::Morning => vec![
            TimeSlot::new(SlotKind::Meal, "Coffee Before", &[Food], 45, 10.0, true),
            event_slot,
            TimeSlot::new(SlotKind::Meal, "Lunch After", &[Food], 60, 20.0, true),
        ],
        TimeOfDay::Afternoon => vec![
            TimeSlot::new(SlotKind::Meal, "Lunch Before", &[Food], 60, 20.0, true),
            event_slot,
            TimeSlot::new(
                SlotKind::Dessert,
                "Coffee & Dessert After",
                &[Food],
                45,
                12.0,
                true,
            ),
        ],
        // Evening and night anchors both get the dinner-first treatment
        _ => vec![
            TimeSlot::new(SlotKind::Meal, "Dinner Before", &[Food], 75, 35.0, true),
            event_slot,
            TimeSlot::new(SlotKind::Drinks, "Drinks After", &[Drink], 60, 25.0, true),
            TimeSlot::new(SlotKind::Drinks, "Nightcap", &[Drink], 45, 18.0, false),
        ],
    }
}

/// Fixed per-time-of-day slot tables. FullDay is the superset.
fn template_slots(prefs: &DatePreferences) -> Vec<TimeSlot> {
    let wants_extras = prefs.duration_hours >= EXTRA_SLOT_THRESHOLD_HOURS;
    match prefs.time_of_day {
        TimeOfDay::FullDay => full_day_slots(),
        TimeOfDay::Morning => {
            let mut slots = vec![
                TimeSlot::new(SlotKind::Meal, "Breakfast & Coffee", &[Food], 60, 15.0, true),
                TimeSlot::new(
                    SlotKind::Activity,
                    "Morning Activity",
                    &[Activity, Nature],
                    90,
                    15.0,
                    true,
                ),
            ];
            if wants_extras {
                slots.push(TimeSlot::new(
                    SlotKind::Activity,
                    "Museum or Gallery",
                    &[Culture],
                    90,
                    20.0,
                    false,
                ));
                slots.push(TimeSlot::new(
                    SlotKind::Meal,
                    "Lunch",
                    &[Food],
                    60,
                    20.0,
                    false,
                ));
            }
            slots
        }
        TimeOfDay::Afternoon => {
            let mut slots = vec![
                TimeSlot::new(SlotKind::Meal, "Lunch", &[Food], 60, 20.0, true),
                TimeSlot::new(
                    SlotKind::Activity,
                    "Afternoon Adventure",
                    &[Activity, Nature, Entertainment],
                    90,
                    25.0,
                    true,
                ),
            ];
            if wants_extras {
                slots.push(TimeSlot::new(
                    SlotKind::Activity,
                    "Browse Local Shops",
                    &[Shopping],
                    45,
                    10.0,
                    false,
                ));
                slots.push(TimeSlot::new(
                    SlotKind::Dessert,
                    "Coffee & Dessert Break",
                    &[Food],
                    45,
                    12.0,
                    false,
                ));
            }
            slots
        }
        TimeOfDay::Evening => {
            let mut slots = vec![
                TimeSlot::new(SlotKind::Meal, "Dinner", &[Food], 90, 40.0, true),
                TimeSlot::new(SlotKind::Drinks, "Evening Drinks", &[Drink], 60, 25.0, true),
            ];
            if wants_extras {
                slots.push(TimeSlot::new(
                    SlotKind::Activity,
                    "Live Entertainment",
                    &[Entertainment],
                    90,
                    30.0,
                    false,
                ));
                slots.push(TimeSlot::new(
                    SlotKind::Dessert,
                    "Late-Night Dessert",
                    &[Food],
                    45,
                    12.0,
                    false,
                ));
            }
            slots
        }
        TimeOfDay::Night => {
            let mut slots = vec![
                TimeSlot::new(SlotKind::Drinks, "Night Drinks", &[Drink], 60, 25.0, true),
                TimeSlot::new(
                    SlotKind::Activity,
                    "Night Entertainment",
                    &[Entertainment],
                    90,
                    30.0,
                    true,
                ),
            ];
            if wants_extras {
                slots.push(TimeSlot::new(
                    SlotKind::Meal,
                    "Late-Night Bite",
                    &[Food],
                    45,
                    15.0,
                    false,
                ));
                slots.push(TimeSlot::new(
                    SlotKind::Drinks,
                    "Nightcap",
                    &[Drink],
                    45,
                    18.0,
                    false,
                ));
            }
            slots
        }
    }
}

/// The full-day itinerary, breakfast through nightcap.
fn full_day_slots() -> Vec<TimeSlot> {
    vec![
        TimeSlot::new(SlotKind::Meal, "Breakfast & Coffee", &[Food], 60, 15.0, true),
        TimeSlot::new(
            SlotKind::Activity,
            "Morning Walk",
            &[Nature, Activity],
            60,
            0.0,
            false,
        ),
        TimeSlot::new(
            SlotKind::Activity,
            "Museum or Gallery",
            &[Culture],
            90,
            20.0,
            false,
        ),
        TimeSlot::new(SlotKind::Meal, "Lunch", &[Food], 60, 20.0, true),
        TimeSlot::new(
            SlotKind::Activity,
            "Afternoon Adventure",
            &[Activity, Nature, Entertainment],
            90,
            25.0,
            true,
        ),
        TimeSlot::new(
            SlotKind::Activity,
            "Browse Local Shops",
            &[Shopping],
            45,
            10.0,
            false,
        ),
        TimeSlot::new(
            SlotKind::Dessert,
            "Coffee & Dessert Break",
            &[Food],
            45,
            12.0,
            false,
        ),
        TimeSlot::new(SlotKind::Meal, "Dinner", &[Food], 90, 40.0, true),
        TimeSlot::new(SlotKind::Drinks, "Evening Drinks", &[Drink], 60, 25.0, true),
        TimeSlot::new(
            SlotKind::Activity,
            "Live Entertainment",
            &[Entertainment],
            90,
            30.0,
            false,
        ),
        TimeSlot::new(SlotKind::Drinks, "Nightcap", &[Drink], 45, 18.0, false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BudgetRange, Occasion};
    use chrono::{TimeZone, Utc};

    fn prefs(time_of_day: TimeOfDay, duration_hours: f64) -> DatePreferences {
        DatePreferences {
            occasion: Occasion::CasualHangout,
            budget: BudgetRange::Moderate,
            vibes: vec![],
            duration_hours,
            time_of_day,
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

    fn evening_event() -> AnchorEvent {
        AnchorEvent {
            id: "e1".into(),
            title: "Symphony Night".into(),
            start_time: Utc.with_ymd_and_hms(2025, 6, 7, 19, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2025, 6, 7, 21, 0, 0).unwrap(),
            venue_id: None,
            latitude: None,
            longitude: None,
            description: None,
            category_tags: vec![],
        }
    }

    #[test]
    fn full_day_template_shape() {
        let slots = build_slots(&prefs(TimeOfDay::FullDay, 10.0), None);
        assert!(slots.len() >= 10);
        let breakfast: Vec<_> = slots
            .iter()
            .filter(|s| s.label == "Breakfast & Coffee" && s.required)
            .collect();
        let dinner: Vec<_> = slots
            .iter()
            .filter(|s| s.label == "Dinner" && s.required)
            .collect();
        assert_eq!(breakfast.len(), 1);
        assert_eq!(dinner.len(), 1);
    }

    #[test]
    fn short_evening_skips_extras() {
        let short = build_slots(&prefs(TimeOfDay::Evening, 3.0), None);
        let long = build_slots(&prefs(TimeOfDay::Evening, 5.0), None);
        assert_eq!(short.len(), 2);
        assert_eq!(long.len(), 4);
        assert!(short.iter().all(|s| s.required));
    }

    #[test]
    fn anchor_branch_wraps_the_event() {
        let event = evening_event();
        let slots = build_slots(&prefs(TimeOfDay::Evening, 4.0), Some(&event));
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[0].label, "Dinner Before");
        assert_eq!(slots[1].kind, SlotKind::Event);
        assert_eq!(slots[1].duration_minutes, 120);
        assert_eq!(slots[2].label, "Drinks After");
    }

    #[test]
    fn full_day_ignores_anchor_branch() {
        let event = evening_event();
        let slots = build_slots(&prefs(TimeOfDay::FullDay, 10.0), Some(&event));
        assert!(slots.len() >= 10);
        assert!(slots.iter().all(|s| s.kind != SlotKind::Event));
    }

    #[test]
    fn morning_anchor_gets_coffee_and_lunch() {
        let mut event = evening_event();
        event.start_time = Utc.with_ymd_and_hms(2025, 6, 7, 9, 0, 0).unwrap();
        event.end_time = Utc.with_ymd_and_hms(2025, 6, 7, 10, 30, 0).unwrap();
        let slots = build_slots(&prefs(TimeOfDay::Morning, 3.0), Some(&event));
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].label, "Coffee Before");
        assert_eq!(slots[2].label, "Lunch After");
    }
}
