//! Score weight sets
//!
//! Weights are normalized by their sum before use, so `{0.4, 0.2, 0.2, 0.2}` and
//! `{2, 1, 1, 1}` score identically. A set must be finite, non-negative and have a
//! positive sum.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, EngineError, EngineResult};

/// Weights of the housing-fit score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HousingWeights {
    /// Installment vs income
    pub financial_fitness: f64,
    /// Monthly housing cost vs budget
    pub total_cost: f64,
    /// Condo fee and property tax burden
    pub condo_fee: f64,
    /// Subjective quality from tags
    pub quality: f64,
}

impl Default for HousingWeights {
    fn default() -> Self {
        Self {
            financial_fitness: 0.4,
            total_cost: 0.2,
            condo_fee: 0.2,
            quality: 0.2,
        }
    }
}

impl HousingWeights {
    /// Weights scaled to sum to one, in field order
    pub fn normalized(&self) -> EngineResult<[f64; 4]> {
        normalize_weights(
            ["financial fitness", "total cost", "condo fee", "quality"],
            [self.financial_fitness, self.total_cost, self.condo_fee, self.quality],
        )
    }

    pub fn sum(&self) -> f64 {
        self.financial_fitness + self.total_cost + self.condo_fee + self.quality
    }
}

/// Weights of the investment-attractiveness score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestmentWeights {
    pub net_cap_rate: f64,
    pub irr: f64,
    pub risk: f64,
    pub liquidity: f64,
    pub discount: f64,
}

impl Default for InvestmentWeights {
    fn default() -> Self {
        Self {
            net_cap_rate: 0.3,
            irr: 0.3,
            risk: 0.2,
            liquidity: 0.1,
            discount: 0.1,
        }
    }
}

impl InvestmentWeights {
    /// Weights scaled to sum to one, in field order
    pub fn normalized(&self) -> EngineResult<[f64; 5]> {
        normalize_weights(
            ["net cap rate", "irr", "risk", "liquidity", "discount"],
            [self.net_cap_rate, self.irr, self.risk, self.liquidity, self.discount],
        )
    }

    pub fn sum(&self) -> f64 {
        self.net_cap_rate + self.irr + self.risk + self.liquidity + self.discount
    }
}

fn normalize_weights<const N: usize>(names: [&str; N], weights: [f64; N]) -> EngineResult<[f64; N]> {
    for (name, &weight) in names.iter().zip(weights.iter()) {
        ensure_non_negative(&format!("{name} weight"), weight)?;
    }

    let sum: f64 = weights.iter().sum();
    if !sum.is_finite() || sum <= 0.0 {
        return Err(EngineError::invalid_input(format!(
            "score weights must have a positive finite sum, got {sum}"
        )));
    }

    Ok(weights.map(|w| w / sum))
}
