//! Rental investment analysis: point-in-time metrics, yearly projections and IRR

mod metrics;
mod projection;
mod irr;

pub use metrics::{
    analyze_investment, net_cap_rate, payback_period, return_on_investment,
    InvestmentAnalysis, InvestmentInputs, NetCapRateInputs,
};
pub use projection::{
    project_cash_flow, project_leveraged_cash_flow, CashFlowProjection, CashFlowYear,
    LeveragedCashFlowYear, LeveragedProjectionInputs, MAX_HORIZON_YEARS,
};
pub use irr::{net_present_value, solve_irr, solve_irr_with, IrrConfig};
