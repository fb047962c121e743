//! Data-access seam. The engine never touches persistence directly; it asks
//! a [`VenueStore`] for already-filtered candidate lists and works over the
//! plain records it gets back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{AnchorEvent, Venue, VenueCategory};

/// Candidate-venue query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VenueFilter {
    /// Restrict to these categories; `None` means any
    pub categories: Option<Vec<VenueCategory>>,
    /// Inclusive upper bound on price tier
    pub max_price_tier: Option<u8>,
    /// Drop venues with no usable coordinates
    pub require_coordinates: bool,
}

/// Event query over a time window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventFilter {
    /// Events overlapping this window; `None` means any time
    pub window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    /// Restrict to events at a specific venue
    pub venue_id: Option<String>,
    /// Look up one event by id
    pub event_id: Option<String>,
}

/// The engine's only I/O contract.
#[async_trait]
pub trait VenueStore: Send + Sync {
    async fn query_venues(&self, filter: &VenueFilter) -> Result<Vec<Venue>>;
    async fn query_events(&self, filter: &EventFilter) -> Result<Vec<AnchorEvent>>;
}

/// Simple in-memory store backing the CLI and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    venues: Vec<Venue>,
    events: Vec<AnchorEvent>,
}

impl InMemoryStore {
    pub fn new(venues: Vec<Venue>, events: Vec<AnchorEvent>) -> Self {
        Self { venues, events }
    }
}

#[async_trait]
impl VenueStore for InMemoryStore {
    async fn query_venues(&self, filter: &VenueFilter) -> Result<Vec<Venue>> {
        Ok(self
            .venues
            .iter()
            .filter(|v| {
                filter
                    .categories
                    .as_ref()
                    .map(|cats| cats.contains(&v.category))
                    .unwrap_or(true)
            })
            .filter(|v| {
                filter
                    .max_price_tier
                    .map(|max| v.price_tier() <= max)
                    .unwrap_or(true)
            })
            .filter(|v| !filter.require_coordinates || v.coordinates().is_some())
            .cloned()
            .collect())
    }

    async fn query_events(&self, filter: &EventFilter) -> Result<Vec<AnchorEvent>> {
        Ok(self
            .events
            .iter()
            .filter(|e| {
                filter
                    .event_id
                    .as_ref()
                    .map(|id| &e.id == id)
                    .unwrap_or(true)
            })
            .filter(|e| {
                filter
                    .venue_id
                    .as_ref()
                    .map(|id| e.venue_id.as_ref() == Some(id))
                    .unwrap_or(true)
            })
            .filter(|e| {
                filter
                    .window
                    .map(|(start, end)| e.start_time < end && e.end_time > start)
                    .unwrap_or(true)
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn venue(id: &str, category: &str, price: u8) -> Venue {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": id,
            "category": category,
            "price_level": price,
            "latitude": 47.25,
            "longitude": -122.44,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn venue_filter_applies_all_clauses() {
        let mut pricey = venue("pricey", "food", 4);
        pricey.latitude = None;
        let store = InMemoryStore::new(vec![venue("cafe", "food", 1), pricey], vec![]);

        let hits = store
            .query_venues(&VenueFilter {
                categories: Some(vec![VenueCategory::Food]),
                max_price_tier: Some(2),
                require_coordinates: true,
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "cafe");
    }

    #[tokio::test]
    async fn event_window_overlap() {
        let event = AnchorEvent {
            id: "e1".into(),
            title: "Show".into(),
            start_time: Utc.with_ymd_and_hms(2025, 6, 7, 19, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2025, 6, 7, 21, 0, 0).unwrap(),
            venue_id: Some("v1".into()),
            latitude: None,
            longitude: None,
            description: None,
            category_tags: vec![],
        };
        let store = InMemoryStore::new(vec![], vec![event]);

        let overlapping = store
            .query_events(&EventFilter {
                window: Some((
                    Utc.with_ymd_and_hms(2025, 6, 7, 20, 0, 0).unwrap(),
                    Utc.with_ymd_and_hms(2025, 6, 7, 22, 0, 0).unwrap(),
                )),
                venue_id: Some("v1".into()),
                event_id: None,
            })
            .await
            .unwrap();
        assert_eq!(overlapping.len(), 1);

        let disjoint = store
            .query_events(&EventFilter {
                window: Some((
                    Utc.with_ymd_and_hms(2025, 6, 8, 0, 0, 0).unwrap(),
                    Utc.with_ymd_and_hms(2025, 6, 8, 2, 0, 0).unwrap(),
                )),
                venue_id: None,
                event_id: None,
            })
            .await
            .unwrap();
        assert!(disjoint.is_empty());
    }
}
