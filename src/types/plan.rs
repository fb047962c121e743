use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::event::AnchorEvent;
use super::venue::{Venue, VenueCategory};

/// What kind of stop a template position calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Meal,
    Activity,
    Event,
    Drinks,
    Dessert,
}

/// An abstract, unfilled placeholder in an itinerary template. Ephemeral;
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TimeSlot {
    pub kind: SlotKind,
    /// Human-readable label, e.g. "Dinner" or "Evening Drinks"
    pub label: String,
    /// Venue categories this slot accepts
    pub categories: Vec<VenueCategory>,
    pub duration_minutes: u32,
    /// Cost assumed when the chosen venue has no average cost of its own
    pub default_cost: f64,
    pub required: bool,
}

impl TimeSlot {
    pub fn new(
        kind: SlotKind,
        label: &str,
        categories: &[VenueCategory],
        duration_minutes: u32,
        default_cost: f64,
        required: bool,
    ) -> Self {
        Self {
            kind,
            label: label.to_string(),
            categories: categories.to_vec(),
            duration_minutes,
            default_cost,
            required,
        }
    }
}

/// One stop in a finished plan.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DateStop {
    /// 1-based position within the plan
    pub order: u32,
    #[serde(default)]
    pub venue: Option<Venue>,
    #[serde(default)]
    pub event: Option<AnchorEvent>,
    /// What to do at this stop, e.g. "Dinner"
    pub activity: String,
    pub duration_minutes: u32,
    pub estimated_cost: f64,
    #[serde(default)]
    pub notes: String,
    /// How to get to the next stop, when both ends have coordinates
    #[serde(default)]
    pub travel_tip: Option<String>,
    /// Events at this venue during the visit window, if any were found
    #[serde(default)]
    pub happening_nearby: Option<Vec<AnchorEvent>>,
}

impl DateStop {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.venue
            .as_ref()
            .and_then(|v| v.coordinates())
            .or_else(|| self.event.as_ref().and_then(|e| e.coordinates()))
    }

    pub fn venue_id(&self) -> Option<&str> {
        self.venue.as_ref().map(|v| v.id.as_str())
    }
}

/// Per-generation counters surfaced for debugging.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PlanDebug {
    pub candidate_pool_size: usize,
    pub slots_considered: usize,
    pub slots_filled: usize,
    pub slots_skipped: usize,
}

/// Top-level generation output.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DatePlan {
    pub id: String,
    pub title: String,
    pub stops: Vec<DateStop>,
    /// Always the exact sum of stop durations
    pub total_duration_minutes: u32,
    /// Always the exact sum of stop costs
    pub estimated_cost: f64,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<PlanDebug>,
}

impl DatePlan {
    /// Recompute the aggregate totals from the stops. The orchestrator calls
    /// this after assembly instead of trusting its running accumulators.
    pub fn recompute_totals(&mut self) {
        self.total_duration_minutes = self.stops.iter().map(|s| s.duration_minutes).sum();
        self.estimated_cost = self.stops.iter().map(|s| s.estimated_cost).sum();
    }

    /// Ids of all venues used by the plan's stops.
    pub fn venue_ids(&self) -> Vec<&str> {
        self.stops.iter().filter_map(|s| s.venue_id()).collect()
    }
}
