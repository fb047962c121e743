use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Fixed set of venue categories used throughout the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VenueCategory {
    Food,
    Drink,
    Activity,
    Nature,
    Culture,
    Entertainment,
    Shopping,
}

impl VenueCategory {
    /// All categories, in a stable order.
    pub const ALL: [VenueCategory; 7] = [
        VenueCategory::Food,
        VenueCategory::Drink,
        VenueCategory::Activity,
        VenueCategory::Nature,
        VenueCategory::Culture,
        VenueCategory::Entertainment,
        VenueCategory::Shopping,
    ];
}

/// Read-only venue snapshot supplied by the data-access layer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub category: VenueCategory,
    #[serde(default)]
    pub subcategory: Option<String>,
    /// Latitude in decimal degrees; absent for venues without a mapped location
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Price tier 0-4; `None` is treated as neutral tier 2 when scoring
    #[serde(default)]
    pub price_level: Option<u8>,
    /// Typical spend per person for one visit
    #[serde(default)]
    pub average_cost: Option<f64>,
    /// Typical visit length in minutes
    #[serde(default)]
    pub typical_duration_minutes: Option<u32>,
    /// 1-5 rating of how date-appropriate the venue feels
    #[serde(default = "default_romantic_score")]
    pub romantic_score: u8,
    /// Mood/style labels, e.g. "cozy" or "lively"
    #[serde(default, deserialize_with = "lenient_tags")]
    pub vibe_tags: Vec<String>,
    /// Occasion labels, e.g. "first date" or "celebration"
    #[serde(default, deserialize_with = "lenient_tags")]
    pub good_for_tags: Vec<String>,
    /// Day-period labels, e.g. "morning" or "evening"
    #[serde(default, deserialize_with = "lenient_tags")]
    pub best_time_tags: Vec<String>,
    #[serde(default)]
    pub pet_friendly: bool,
    #[serde(default)]
    pub kid_friendly: bool,
    #[serde(default)]
    pub wheelchair_accessible: bool,
    #[serde(default)]
    pub has_stairs: bool,
    #[serde(default)]
    pub has_elevator: bool,
    #[serde(default)]
    pub has_wifi: bool,
    #[serde(default)]
    pub is_downtown: bool,
    /// Venue only exists for the duration of a specific event
    #[serde(default)]
    pub event_only: bool,
}

fn default_romantic_score() -> u8 {
    3
}

impl Venue {
    /// Coordinates as a (lat, lng) pair, when both are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }

    /// Price tier with the neutral default applied.
    pub fn price_tier(&self) -> u8 {
        self.price_level.unwrap_or(2)
    }

    /// Whether the venue is age-restricted (bars, breweries, clubs).
    pub fn is_twenty_one_plus(&self) -> bool {
        const RESTRICTED: [&str; 6] = [
            "bar", "brewery", "nightclub", "winery", "cocktail", "distillery",
        ];
        self.subcategory
            .as_deref()
            .map(|sub| {
                let sub = sub.to_lowercase();
                RESTRICTED.iter().any(|r| sub.contains(r))
            })
            .unwrap_or(false)
    }
}

/// Accepts a JSON array, a JSON-encoded array string, or a comma-separated
/// string. Unparsable values degrade to an empty set, never an error.
fn lenient_tags<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(parse_tags(&raw))
}

fn parse_tags(raw: &serde_json::Value) -> Vec<String> {
    match raw {
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect(),
        serde_json::Value::String(text) => {
            if let Ok(serde_json::Value::Array(items)) = serde_json::from_str(text) {
                return items
                    .iter()
                    .filter_map(|item| item.as_str())
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            text.split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_parse_from_array() {
        let raw = serde_json::json!(["Cozy", " quiet "]);
        assert_eq!(parse_tags(&raw), vec!["cozy", "quiet"]);
    }

    #[test]
    fn tags_parse_from_json_string() {
        let raw = serde_json::json!("[\"romantic\",\"upscale\"]");
        assert_eq!(parse_tags(&raw), vec!["romantic", "upscale"]);
    }

    #[test]
    fn tags_parse_from_comma_string() {
        let raw = serde_json::json!("lively, fun");
        assert_eq!(parse_tags(&raw), vec!["lively", "fun"]);
    }

    #[test]
    fn malformed_tags_degrade_to_empty() {
        assert!(parse_tags(&serde_json::json!(42)).is_empty());
        assert!(parse_tags(&serde_json::json!(null)).is_empty());
    }

    #[test]
    fn venue_defaults_apply() {
        let venue: Venue = serde_json::from_value(serde_json::json!({
            "id": "v1",
            "name": "Test Cafe",
            "category": "food"
        }))
        .unwrap();
        assert_eq!(venue.romantic_score, 3);
        assert_eq!(venue.price_tier(), 2);
        assert!(venue.coordinates().is_none());
        assert!(!venue.pet_friendly);
    }

    #[test]
    fn age_restriction_from_subcategory() {
        let venue: Venue = serde_json::from_value(serde_json::json!({
            "id": "v2",
            "name": "Hop House",
            "category": "drink",
            "subcategory": "Brewery"
        }))
        .unwrap();
        assert!(venue.is_twenty_one_plus());
    }
}
