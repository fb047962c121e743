pub mod generator;
pub mod mutations;

pub use generator::{optimize_stop_order, PlanEngine};
