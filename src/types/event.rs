use chrono::{DateTime, Timelike, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::preferences::TimeOfDay;

/// A scheduled happening an itinerary can be built around, or that can be
/// attached to a stop as a "happening nearby."
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnchorEvent {
    pub id: String,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub venue_id: Option<String>,
    /// Coordinates of the linked venue, when known
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_tags: Vec<String>,
}

impl AnchorEvent {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }

    /// Day period the event starts in, used to pick the surrounding slots.
    pub fn start_period(&self) -> TimeOfDay {
        match self.start_time.hour() {
            0..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    /// Duration in whole minutes, floored at zero.
    pub fn duration_minutes(&self) -> u32 {
        (self.end_time - self.start_time).num_minutes().max(0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn start_period_bands() {
        let mut event = AnchorEvent {
            id: "e1".into(),
            title: "Market".into(),
            start_time: Utc.with_ymd_and_hms(2025, 6, 7, 9, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2025, 6, 7, 11, 0, 0).unwrap(),
            venue_id: None,
            latitude: None,
            longitude: None,
            description: None,
            category_tags: vec![],
        };
        assert_eq!(event.start_period(), TimeOfDay::Morning);
        assert_eq!(event.duration_minutes(), 120);

        event.start_time = Utc.with_ymd_and_hms(2025, 6, 7, 19, 30, 0).unwrap();
        assert_eq!(event.start_period(), TimeOfDay::Evening);

        event.start_time = Utc.with_ymd_and_hms(2025, 6, 7, 22, 0, 0).unwrap();
        assert_eq!(event.start_period(), TimeOfDay::Night);
    }
}
