//! Weighted housing and investment scores

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, EngineResult};
use super::weights::{HousingWeights, InvestmentWeights};

/// Payment-to-income ratio (percent) at which financial fitness reaches zero
pub const MAX_PAYMENT_TO_INCOME: f64 = 35.0;

/// Net cap rate (percent) treated as excellent
pub const CAP_RATE_CEILING: f64 = 8.0;

/// IRR (percent) treated as excellent
pub const IRR_CEILING: f64 = 15.0;

/// Sub-metrics of the housing score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HousingScoreInputs {
    /// Installment over monthly income, in percent
    pub payment_to_income_ratio: f64,
    /// Monthly housing cost over budget (1.0 = exactly on budget)
    pub total_cost_vs_budget: f64,
    /// 0 = most expensive condo fee, 1 = cheapest
    pub condo_fee_rank: f64,
    /// Tag-based quality in [0, 1]
    pub quality_score: f64,
}

/// Sub-metrics of the investment score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentScoreInputs {
    /// Net cap rate in percent
    pub net_cap_rate: f64,
    /// IRR in percent
    pub irr: f64,
    /// 0 = high risk, 1 = low risk
    pub risk_score: f64,
    /// 0 = illiquid, 1 = very liquid
    pub liquidity_score: f64,
    /// 0 = no discount to market, 1 = deep discount
    pub discount_score: f64,
}

/// Housing fit on a 0-100 scale
pub fn housing_score(inputs: &HousingScoreInputs, weights: &HousingWeights) -> EngineResult<f64> {
    let ratio = ensure_finite("payment-to-income ratio", inputs.payment_to_income_ratio)?;
    let cost = ensure_finite("total cost vs budget", inputs.total_cost_vs_budget)?;
    let condo_fee_rank = ensure_finite("condo fee rank", inputs.condo_fee_rank)?;
    let quality = ensure_finite("quality score", inputs.quality_score)?;
    let w = weights.normalized()?;

    let financial_fitness = (1.0 - ratio / MAX_PAYMENT_TO_INCOME).max(0.0);
    let cost_fitness = (2.0 - cost).max(0.0);

    let blended = financial_fitness * w[0] + cost_fitness * w[1] + condo_fee_rank * w[2] + quality * w[3];
    Ok(to_scale(blended))
}

/// Investment attractiveness on a 0-100 scale
pub fn investment_score(inputs: &InvestmentScoreInputs, weights: &InvestmentWeights) -> EngineResult<f64> {
    let cap_rate = ensure_finite("net cap rate", inputs.net_cap_rate)?;
    let irr = ensure_finite("irr", inputs.irr)?;
    let risk = ensure_finite("risk score", inputs.risk_score)?;
    let liquidity = ensure_finite("liquidity score", inputs.liquidity_score)?;
    let discount = ensure_finite("discount score", inputs.discount_score)?;
    let w = weights.normalized()?;

    let cap_rate_norm = (cap_rate / CAP_RATE_CEILING).min(1.0);
    let irr_norm = (irr / IRR_CEILING).min(1.0);

    let blended = cap_rate_norm * w[0] + irr_norm * w[1] + risk * w[2] + liquidity * w[3] + discount * w[4];
    Ok(to_scale(blended))
}

/// Scale a blended [0, 1] value to [0, 100], clamping overshoot either way
fn to_scale(blended: f64) -> f64 {
    (blended * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn comfortable_home() -> HousingScoreInputs {
        HousingScoreInputs {
            payment_to_income_ratio: 17.5,
            total_cost_vs_budget: 1.0,
            condo_fee_rank: 0.5,
            quality_score: 0.5,
        }
    }

    fn decent_rental() -> InvestmentScoreInputs {
        InvestmentScoreInputs {
            net_cap_rate: 4.0,
            irr: 7.5,
            risk_score: 0.5,
            liquidity_score: 0.5,
            discount_score: 0.5,
        }
    }

    #[test]
    fn test_housing_score_with_unit_weights() {
        // 0.5*0.4 + 1.0*0.2 + 0.5*0.2 + 0.5*0.2 = 0.6
        let score = housing_score(&comfortable_home(), &HousingWeights::default()).unwrap();
        assert_relative_eq!(score, 60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_housing_score_with_unnormalized_weights() {
        let doubled = HousingWeights {
            financial_fitness: 0.8,
            total_cost: 0.4,
            condo_fee: 0.4,
            quality: 0.4,
        };
        let score = housing_score(&comfortable_home(), &doubled).unwrap();
        assert_relative_eq!(score, 60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_investment_score_with_unit_weights() {
        // Every sub-score at 0.5
        let score = investment_score(&decent_rental(), &InvestmentWeights::default()).unwrap();
        assert_relative_eq!(score, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_investment_score_with_unnormalized_weights() {
        let weights = InvestmentWeights {
            net_cap_rate: 1.0,
            irr: 0.0,
            risk: 0.0,
            liquidity: 0.0,
            discount: 1.0,
        };
        let inputs = InvestmentScoreInputs {
            net_cap_rate: 8.0,
            discount_score: 0.0,
            ..decent_rental()
        };
        // Two weights summing to 2 become 0.5 each: 1.0*0.5 + 0.0*0.5
        let score = investment_score(&inputs, &weights).unwrap();
        assert_relative_eq!(score, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_extremes_are_clamped() {
        let cheap = HousingScoreInputs {
            payment_to_income_ratio: 0.0,
            total_cost_vs_budget: 0.0,
            condo_fee_rank: 1.0,
            quality_score: 1.0,
        };
        assert_eq!(housing_score(&cheap, &HousingWeights::default()).unwrap(), 100.0);

        let terrible = InvestmentScoreInputs {
            net_cap_rate: -50.0,
            irr: -90.0,
            risk_score: 0.0,
            liquidity_score: 0.0,
            discount_score: 0.0,
        };
        assert_eq!(investment_score(&terrible, &InvestmentWeights::default()).unwrap(), 0.0);
    }

    #[test]
    fn test_non_finite_inputs_rejected() {
        let inputs = HousingScoreInputs {
            payment_to_income_ratio: f64::INFINITY,
            ..comfortable_home()
        };
        assert!(housing_score(&inputs, &HousingWeights::default()).is_err());

        let inputs = InvestmentScoreInputs {
            irr: f64::NAN,
            ..decent_rental()
        };
        assert!(investment_score(&inputs, &InvestmentWeights::default()).is_err());
    }

    proptest! {
        #[test]
        fn prop_housing_score_bounded_and_monotone(
            ratio in -100.0f64..200.0,
            cost in -5.0f64..5.0,
            rank in -2.0f64..3.0,
            quality in -2.0f64..3.0,
            bump in 0.0f64..10.0,
            w in proptest::array::uniform4(0.01f64..5.0),
        ) {
            let weights = HousingWeights {
                financial_fitness: w[0],
                total_cost: w[1],
                condo_fee: w[2],
                quality: w[3],
            };
            let base = HousingScoreInputs {
                payment_to_income_ratio: ratio,
                total_cost_vs_budget: cost,
                condo_fee_rank: rank,
                quality_score: quality,
            };
            let score = housing_score(&base, &weights).unwrap();
            prop_assert!((0.0..=100.0).contains(&score));

            // Lower ratio and cost, higher rank and quality never hurt
            let improved = [
                HousingScoreInputs { payment_to_income_ratio: ratio - bump, ..base },
                HousingScoreInputs { total_cost_vs_budget: cost - bump, ..base },
                HousingScoreInputs { condo_fee_rank: rank + bump, ..base },
                HousingScoreInputs { quality_score: quality + bump, ..base },
            ];
            for better in improved {
                prop_assert!(housing_score(&better, &weights).unwrap() >= score - 1e-9);
            }
        }

        #[test]
        fn prop_investment_score_bounded_and_monotone(
            cap in -50.0f64..50.0,
            irr in -100.0f64..200.0,
            subs in proptest::array::uniform3(-2.0f64..3.0),
            bump in 0.0f64..10.0,
            w in proptest::array::uniform5(0.01f64..5.0),
        ) {
            let weights = InvestmentWeights {
                net_cap_rate: w[0],
                irr: w[1],
                risk: w[2],
                liquidity: w[3],
                discount: w[4],
            };
            let base = InvestmentScoreInputs {
                net_cap_rate: cap,
                irr,
                risk_score: subs[0],
                liquidity_score: subs[1],
                discount_score: subs[2],
            };
            let score = investment_score(&base, &weights).unwrap();
            prop_assert!((0.0..=100.0).contains(&score));

            let improved = [
                InvestmentScoreInputs { net_cap_rate: cap + bump, ..base },
                InvestmentScoreInputs { irr: irr + bump, ..base },
                InvestmentScoreInputs { risk_score: subs[0] + bump, ..base },
                InvestmentScoreInputs { liquidity_score: subs[1] + bump, ..base },
                InvestmentScoreInputs { discount_score: subs[2] + bump, ..base },
            ];
            for better in improved {
                prop_assert!(investment_score(&better, &weights).unwrap() >= score - 1e-9);
            }
        }
    }
}
