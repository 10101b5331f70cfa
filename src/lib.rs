//! Property Analytics - Financing and investment-return engine for residential real estate
//!
//! This library provides:
//! - Amortization schedules under constant-amortization (SAC) and constant-payment (PRICE) policies
//! - Affordability ratios (payment-to-income, LTV, approximate effective cost)
//! - Point-in-time investment metrics (cap rate, yields, cash-on-cash, break-even occupancy)
//! - Year-by-year cash-flow projections and an IRR solver
//! - Weighted housing / investment suitability scores
//! - Batch analysis of a property catalog driven by user preferences
//!
//! Every calculation is a pure function of its inputs.

pub mod error;
pub mod financing;
pub mod investment;
pub mod scoring;
pub mod preferences;
pub mod property;
pub mod analysis;

// Re-export commonly used types
pub use error::{EngineError, EngineResult, LoadError};
pub use financing::{AmortizationPolicy, AmortizationRow, FinancingSimulation};
pub use investment::{analyze_investment, project_cash_flow, solve_irr, CashFlowYear, InvestmentAnalysis};
pub use scoring::{housing_score, investment_score, HousingWeights, InvestmentWeights};
pub use preferences::Preferences;
pub use property::PropertyRecord;
pub use analysis::{MarketContext, PropertyAnalyzer, PropertyReport};
