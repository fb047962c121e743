pub mod event;
pub mod plan;
pub mod preferences;
pub mod venue;

pub use event::AnchorEvent;
pub use plan::{DatePlan, DateStop, PlanDebug, SlotKind, TimeSlot};
pub use preferences::{BudgetRange, DatePreferences, Occasion, TimeOfDay};
pub use venue::{Venue, VenueCategory};
