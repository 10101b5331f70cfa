//! User preferences: default rates, score weights, budget and tax settings
//!
//! Loaded from JSON. Any field missing from the file keeps its default, so an empty
//! object `{}` is a valid preferences file.

use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{
    ensure_growth_rate, ensure_non_negative, ensure_percent, EngineError, EngineResult, LoadError,
};
use crate::financing::{AcquisitionCosts, MAX_TERM_YEARS};
use crate::investment::MAX_HORIZON_YEARS;
use crate::scoring::{HousingWeights, InvestmentWeights};

/// Defaults and weights applied when a property record leaves a value unset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    // Default rates
    /// Annual nominal financing rate, percent
    pub interest_rate_percent: f64,
    /// Effective total cost (CET) quoted by the lender, annual percent; informational
    pub cet_percent: f64,
    pub maintenance_percent: f64,
    pub vacancy_rate_percent: f64,
    pub appreciation_rate_percent: f64,
    pub rent_increase_rate_percent: f64,
    /// Index the rent follows (e.g. IGPM); informational
    pub rent_increase_index: Option<String>,

    // Score weights
    pub housing_weights: HousingWeights,
    pub investment_weights: InvestmentWeights,

    // Budget and income
    pub monthly_budget: f64,
    pub monthly_income: f64,
    /// Installment ceiling, percent of income, for the affordability check
    pub max_payment_to_income_percent: f64,
    pub monthly_insurance: f64,

    // Taxes
    /// Transfer tax (ITBI), percent of price
    pub transfer_tax_percent: f64,
    pub capital_gains_tax_percent: f64,

    // Deal structure
    pub financing_term_years: u32,
    pub housing_down_payment_percent: f64,
    pub investment_down_payment_percent: f64,
    /// Monthly rent estimate as a percent of price, when a record has no rent
    pub rent_estimate_percent: f64,
    pub projection_horizon_years: u32,

    /// Display currency code; informational
    pub currency: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            interest_rate_percent: 10.5,
            cet_percent: 11.2,
            maintenance_percent: 5.0,
            vacancy_rate_percent: 5.0,
            appreciation_rate_percent: 5.0,
            rent_increase_rate_percent: 0.0,
            rent_increase_index: Some("IGPM".to_string()),
            housing_weights: HousingWeights::default(),
            investment_weights: InvestmentWeights::default(),
            monthly_budget: 0.0,
            monthly_income: 0.0,
            max_payment_to_income_percent: 35.0,
            monthly_insurance: 0.0,
            transfer_tax_percent: 3.0,
            capital_gains_tax_percent: 15.0,
            financing_term_years: 30,
            housing_down_payment_percent: 20.0,
            investment_down_payment_percent: 30.0,
            rent_estimate_percent: 0.5,
            projection_horizon_years: 10,
            currency: "BRL".to_string(),
        }
    }
}

impl Preferences {
    /// Load preferences from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let prefs = Self::from_json_str(&std::fs::read_to_string(path)?)?;
        info!("Loaded preferences from {}", path.display());
        Ok(prefs)
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check every rate, weight set and horizon before running analyses
    pub fn validate(&self) -> EngineResult<()> {
        ensure_non_negative("interest rate", self.interest_rate_percent)?;
        ensure_non_negative("CET", self.cet_percent)?;
        ensure_percent("maintenance", self.maintenance_percent)?;
        ensure_percent("vacancy rate", self.vacancy_rate_percent)?;
        ensure_growth_rate("appreciation rate", self.appreciation_rate_percent)?;
        ensure_growth_rate("rent increase rate", self.rent_increase_rate_percent)?;

        self.housing_weights.normalized()?;
        self.investment_weights.normalized()?;

        ensure_non_negative("monthly budget", self.monthly_budget)?;
        ensure_non_negative("monthly income", self.monthly_income)?;
        ensure_percent("max payment-to-income", self.max_payment_to_income_percent)?;
        ensure_non_negative("monthly insurance", self.monthly_insurance)?;
        ensure_percent("transfer tax", self.transfer_tax_percent)?;
        ensure_percent("capital gains tax", self.capital_gains_tax_percent)?;

        if self.financing_term_years == 0 || self.financing_term_years > MAX_TERM_YEARS {
            return Err(EngineError::InvalidTerm {
                term_years: self.financing_term_years,
            });
        }
        ensure_percent("housing down payment", self.housing_down_payment_percent)?;
        ensure_percent("investment down payment", self.investment_down_payment_percent)?;
        // The investment down payment is the IRR outlay
        if self.investment_down_payment_percent == 0.0 {
            return Err(EngineError::invalid_input("investment down payment must be above 0%"));
        }
        ensure_percent("rent estimate", self.rent_estimate_percent)?;
        if self.projection_horizon_years == 0 || self.projection_horizon_years > MAX_HORIZON_YEARS {
            return Err(EngineError::invalid_input(format!(
                "projection horizon must be 1-{} years, got {}",
                MAX_HORIZON_YEARS, self.projection_horizon_years
            )));
        }
        Ok(())
    }

    /// Upfront costs implied by the tax settings
    pub fn acquisition_costs(&self) -> AcquisitionCosts {
        AcquisitionCosts::with_transfer_tax(self.transfer_tax_percent)
    }

    pub fn housing_down_payment(&self, price: f64) -> f64 {
        price * self.housing_down_payment_percent / 100.0
    }

    pub fn investment_down_payment(&self, price: f64) -> f64 {
        price * self.investment_down_payment_percent / 100.0
    }

    /// Rent to assume when a property has no estimate of its own
    pub fn estimated_rent(&self, price: f64) -> f64 {
        price * self.rent_estimate_percent / 100.0
    }

    /// Tax due on a sale gain; losses owe nothing
    pub fn capital_gains_tax(&self, gain: f64) -> f64 {
        gain.max(0.0) * self.capital_gains_tax_percent / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let prefs = Preferences::default();
        assert!(prefs.validate().is_ok());
        assert_eq!(prefs.interest_rate_percent, 10.5);
        assert_eq!(prefs.financing_term_years, 30);
        assert_eq!(prefs.housing_down_payment(500_000.0), 100_000.0);
        assert_eq!(prefs.investment_down_payment(500_000.0), 150_000.0);
        assert_eq!(prefs.estimated_rent(400_000.0), 2_000.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "monthly_income": 15000,
            "interest_rate_percent": 9.0,
            "housing_weights": { "quality": 0.5 }
        }"#;
        let prefs = Preferences::from_json_str(json).unwrap();

        assert_eq!(prefs.monthly_income, 15_000.0);
        assert_eq!(prefs.interest_rate_percent, 9.0);
        assert_eq!(prefs.housing_weights.quality, 0.5);
        assert_eq!(prefs.housing_weights.financial_fitness, 0.4);
        assert_eq!(prefs.vacancy_rate_percent, 5.0);
        assert_eq!(prefs.currency, "BRL");
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(Preferences::from_json_str("{}").unwrap(), Preferences::default());
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            Preferences::from_json_str(r#"{"monthly_income": "lots"}"#),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let prefs = Preferences {
            financing_term_years: 0,
            ..Preferences::default()
        };
        assert!(matches!(prefs.validate(), Err(EngineError::InvalidTerm { term_years: 0 })));

        let prefs = Preferences {
            vacancy_rate_percent: 120.0,
            ..Preferences::default()
        };
        assert!(prefs.validate().is_err());

        let prefs = Preferences {
            investment_weights: InvestmentWeights {
                net_cap_rate: 0.0,
                irr: 0.0,
                risk: 0.0,
                liquidity: 0.0,
                discount: 0.0,
            },
            ..Preferences::default()
        };
        assert!(prefs.validate().is_err());
    }

    #[test]
    fn test_capital_gains_tax() {
        let prefs = Preferences::default();
        assert_eq!(prefs.capital_gains_tax(100_000.0), 15_000.0);
        assert_eq!(prefs.capital_gains_tax(-5_000.0), 0.0);
    }
}
