//! Suitability scoring for housing and investment decisions
//!
//! Scores blend normalized sub-scores with caller-supplied weights and are always
//! reported on a 0-100 scale.

mod weights;
mod score;
mod quality;

pub use weights::{HousingWeights, InvestmentWeights};
pub use score::{
    housing_score, investment_score, HousingScoreInputs, InvestmentScoreInputs,
    CAP_RATE_CEILING, IRR_CEILING, MAX_PAYMENT_TO_INCOME,
};
pub use quality::{
    assess_investment_risk, compare_values, housing_pros_and_cons, normalize, quality_score,
    Comparison, HousingProfile, ProsAndCons, RiskInputs, RiskLevel, NEGATIVE_TAGS, POSITIVE_TAGS,
};
