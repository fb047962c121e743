//! datecraft: itinerary generation and venue scoring for local date planning
//!
//! The engine turns caller preferences (occasion, budget, vibes, time of day,
//! accommodations) into an ordered plan of venue and event stops. Candidate
//! venues and events come from a data-access layer behind the
//! [`store::VenueStore`] trait; the engine itself is pure computation over
//! those records, apart from a small dose of selection jitter.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use datecraft::{InMemoryStore, PlanEngine};
//! use datecraft::types::{BudgetRange, DatePreferences, Occasion, TimeOfDay};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(InMemoryStore::new(vec![], vec![]));
//!     let engine = PlanEngine::new(store);
//!
//!     let prefs = DatePreferences {
//!         occasion: Occasion::FirstDate,
//!         budget: BudgetRange::Moderate,
//!         vibes: vec!["cozy".into()],
//!         duration_hours: 3.0,
//!         time_of_day: TimeOfDay::Evening,
//!         activity_level: 3,
//!         with_dog: false,
//!         with_young_children: false,
//!         needs_wheelchair_access: false,
//!         avoid_stairs: false,
//!         needs_wifi: false,
//!         downtown_only: false,
//!         military_access: false,
//!         twenty_one_plus: true,
//!         exclude_venue_ids: vec![],
//!         anchor_event_id: None,
//!     };
//!     let plan = engine.generate_plan(&prefs).await?;
//!     println!("{}", serde_json::to_string_pretty(&plan)?);
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod error;
pub mod filters;
pub mod geo;
pub mod scoring;
pub mod selection;
pub mod store;
pub mod template;
pub mod types;

pub use crate::core::{optimize_stop_order, PlanEngine};
pub use error::{PlannerError, Result};
pub use scoring::{score_venue, ScoreBreakdown, ScoreContext, VenueScore};
pub use selection::{select_best, select_multiple, JitterSource, NoJitter, SeededJitter};
pub use store::{EventFilter, InMemoryStore, VenueFilter, VenueStore};
pub use template::build_slots;
pub use types::{
    AnchorEvent, BudgetRange, DatePlan, DatePreferences, DateStop, Occasion, SlotKind, TimeOfDay,
    TimeSlot, Venue, VenueCategory,
};

#[cfg(feature = "cli")]
pub mod cli;
