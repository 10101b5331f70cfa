//! Mortgage financing: amortization schedules and affordability ratios

mod schedule;
mod engine;
pub mod affordability;

pub use schedule::{AmortizationPolicy, AmortizationRow, FinancingSimulation, ScheduleYear};
pub use engine::{constant_amortization, constant_payment, level_payment, LoanTerms, MAX_TERM_YEARS};
pub use affordability::AcquisitionCosts;
