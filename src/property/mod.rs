//! Property records, catalog loading and off-plan payment plans

mod data;
mod plan;
pub mod loader;

pub use data::{ConstructionPhase, PropertyKind, PropertyRecord};
pub use plan::{off_plan_schedule, OffPlanPlan, ScheduledPayment};
pub use loader::{load_properties, load_properties_from_reader};
