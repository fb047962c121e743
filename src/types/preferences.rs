use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Symbolic budget level, mapped to an integer tier 1-4 for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BudgetRange {
    Budget,
    Moderate,
    Upscale,
    Luxury,
}

impl BudgetRange {
    pub fn tier(&self) -> u8 {
        match self {
            BudgetRange::Budget => 1,
            BudgetRange::Moderate => 2,
            BudgetRange::Upscale => 3,
            BudgetRange::Luxury => 4,
        }
    }

    /// Parse the "$".."$$$$" shorthand used by the API layer.
    pub fn from_symbol(symbol: &str) -> Option<BudgetRange> {
        match symbol {
            "$" => Some(BudgetRange::Budget),
            "$$" => Some(BudgetRange::Moderate),
            "$$$" => Some(BudgetRange::Upscale),
            "$$$$" => Some(BudgetRange::Luxury),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
    FullDay,
}

/// Occasion the itinerary is planned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Occasion {
    FirstDate,
    SecondDate,
    Anniversary,
    Birthday,
    CasualHangout,
    SpecialCelebration,
    DayDate,
    NightOut,
}

impl Occasion {
    /// Substrings matched against a venue's "good for" tags when scoring
    /// occasion fit.
    pub fn good_for_keywords(&self) -> &'static [&'static str] {
        match self {
            Occasion::FirstDate => &["first date", "casual", "conversation", "coffee"],
            Occasion::SecondDate => &["date", "casual", "fun"],
            Occasion::Anniversary => &["anniversary", "romantic", "special", "upscale"],
            Occasion::Birthday => &["birthday", "celebration", "group", "fun"],
            Occasion::CasualHangout => &["casual", "hangout", "relaxed", "friends"],
            Occasion::SpecialCelebration => &["celebration", "special", "upscale"],
            Occasion::DayDate => &["daytime", "casual", "outdoor", "date"],
            Occasion::NightOut => &["nightlife", "lively", "drinks", "dancing"],
        }
    }
}

/// Caller input driving generation, swap, and add.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DatePreferences {
    pub occasion: Occasion,
    pub budget: BudgetRange,
    /// Desired mood/style labels, matched softly via a synonym table
    #[serde(default)]
    pub vibes: Vec<String>,
    /// Total desired length of the outing, in hours
    pub duration_hours: f64,
    pub time_of_day: TimeOfDay,
    /// 1 (low-key) to 5 (high energy)
    #[serde(default = "default_activity_level")]
    pub activity_level: u8,
    #[serde(default)]
    pub with_dog: bool,
    #[serde(default)]
    pub with_young_children: bool,
    #[serde(default)]
    pub needs_wheelchair_access: bool,
    #[serde(default)]
    pub avoid_stairs: bool,
    #[serde(default)]
    pub needs_wifi: bool,
    #[serde(default)]
    pub downtown_only: bool,
    #[serde(default)]
    pub military_access: bool,
    /// Whether everyone in the party is 21 or older
    #[serde(default)]
    pub twenty_one_plus: bool,
    /// Venue ids to keep out of this plan, for cross-session variety
    #[serde(default)]
    pub exclude_venue_ids: Vec<String>,
    /// Event to build the itinerary around, if any
    #[serde(default)]
    pub anchor_event_id: Option<String>,
}

fn default_activity_level() -> u8 {
    3
}

impl DatePreferences {
    /// Hard validation of caller input. Optional fields default to neutral
    /// values instead; this is the only error surface in the engine.
    pub fn validate(&self) -> Result<()> {
        if !self.duration_hours.is_finite() || self.duration_hours <= 0.0 {
            return Err(PlannerError::InvalidPreferences(
                "duration_hours must be a positive number".to_string(),
            ));
        }
        if self.duration_hours > 24.0 {
            return Err(PlannerError::InvalidPreferences(
                "duration_hours cannot exceed 24".to_string(),
            ));
        }
        if self.activity_level == 0 || self.activity_level > 5 {
            return Err(PlannerError::InvalidPreferences(
                "activity_level must be between 1 and 5".to_string(),
            ));
        }
        Ok(())
    }

    /// Desired duration in minutes.
    pub fn duration_minutes(&self) -> u32 {
        (self.duration_hours * 60.0).round() as u32
    }

    /// Lowercased vibes for matching.
    pub fn normalized_vibes(&self) -> Vec<String> {
        self.vibes
            .iter()
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty())
            .collect()
    }
}
