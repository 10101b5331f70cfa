//! Affordability ratios and acquisition costs around a mortgage

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ensure_non_negative, ensure_positive, EngineError, EngineResult};

/// Share of monthly income taken by the installment, in percent
pub fn payment_to_income_ratio(payment: f64, monthly_income: f64) -> EngineResult<f64> {
    ensure_non_negative("payment", payment)?;
    ensure_positive("monthly income", monthly_income)?;
    Ok(payment / monthly_income * 100.0)
}

/// Largest installment that keeps the ratio at `max_ratio_percent`
pub fn max_payment(monthly_income: f64, max_ratio_percent: f64) -> EngineResult<f64> {
    ensure_non_negative("monthly income", monthly_income)?;
    ensure_non_negative("max payment-to-income ratio", max_ratio_percent)?;
    Ok(monthly_income * max_ratio_percent / 100.0)
}

/// Loan-to-value in percent
pub fn loan_to_value(loan_amount: f64, property_value: f64) -> EngineResult<f64> {
    ensure_non_negative("loan amount", loan_amount)?;
    ensure_positive("property value", property_value)?;
    Ok(loan_amount / property_value * 100.0)
}

/// Approximate effective total cost (CET) as an annual percent.
///
/// Monthly rate = (total cost / financed)^(1/n) - 1, annualized linearly.
pub fn effective_cost_rate(
    financed_amount: f64,
    total_paid: f64,
    months: u32,
    additional_costs: f64,
) -> EngineResult<f64> {
    ensure_positive("financed amount", financed_amount)?;
    ensure_non_negative("total paid", total_paid)?;
    ensure_non_negative("additional costs", additional_costs)?;
    if months == 0 {
        return Err(EngineError::invalid_input("months must be at least 1"));
    }

    let total_cost = total_paid + additional_costs;
    let monthly_rate = (total_cost / financed_amount).powf(1.0 / months as f64) - 1.0;
    Ok(monthly_rate * 12.0 * 100.0)
}

/// Present value of `periods` level payments at a periodic decimal rate
pub fn present_value(payment: f64, rate: f64, periods: u32) -> EngineResult<f64> {
    ensure_finite("payment", payment)?;
    check_periodic_rate(rate)?;
    if rate == 0.0 {
        return Ok(payment * periods as f64);
    }
    Ok(payment * (1.0 - (1.0 + rate).powi(-(periods as i32))) / rate)
}

/// Future value of `periods` level payments at a periodic decimal rate
pub fn future_value(payment: f64, rate: f64, periods: u32) -> EngineResult<f64> {
    ensure_finite("payment", payment)?;
    check_periodic_rate(rate)?;
    if rate == 0.0 {
        return Ok(payment * periods as f64);
    }
    Ok(payment * ((1.0 + rate).powi(periods as i32) - 1.0) / rate)
}

fn check_periodic_rate(rate: f64) -> EngineResult<f64> {
    ensure_finite("rate", rate)?;
    if rate <= -1.0 {
        return Err(EngineError::invalid_input(format!("rate must exceed -100%, got {rate}")));
    }
    Ok(rate)
}

/// Installment plus the recurring costs of owning the home
pub fn monthly_housing_cost(
    payment: f64,
    condo_fee: f64,
    annual_property_tax: f64,
    monthly_insurance: f64,
) -> EngineResult<f64> {
    ensure_non_negative("payment", payment)?;
    ensure_non_negative("condo fee", condo_fee)?;
    ensure_non_negative("annual property tax", annual_property_tax)?;
    ensure_non_negative("monthly insurance", monthly_insurance)?;
    Ok(payment + condo_fee + annual_property_tax / 12.0 + monthly_insurance)
}

/// One-off costs paid at purchase on top of the down payment
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionCosts {
    /// Transfer tax (ITBI) as a percent of the price
    pub transfer_tax_percent: f64,
    pub registry_fees: f64,
    pub appraisal_fee: f64,
    pub bank_fees: f64,
    pub renovation_costs: f64,
}

impl AcquisitionCosts {
    /// Only the transfer tax, at the given rate
    pub fn with_transfer_tax(transfer_tax_percent: f64) -> Self {
        Self {
            transfer_tax_percent,
            ..Default::default()
        }
    }

    pub fn transfer_tax(&self, price: f64) -> f64 {
        price * self.transfer_tax_percent / 100.0
    }

    /// Sum of every upfront cost for a property at `price`
    pub fn upfront_total(&self, price: f64) -> EngineResult<f64> {
        ensure_positive("price", price)?;
        ensure_non_negative("transfer tax rate", self.transfer_tax_percent)?;
        ensure_non_negative("registry fees", self.registry_fees)?;
        ensure_non_negative("appraisal fee", self.appraisal_fee)?;
        ensure_non_negative("bank fees", self.bank_fees)?;
        ensure_non_negative("renovation costs", self.renovation_costs)?;

        Ok(self.transfer_tax(price)
            + self.registry_fees
            + self.appraisal_fee
            + self.bank_fees
            + self.renovation_costs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_payment_to_income() {
        assert_relative_eq!(payment_to_income_ratio(3_000.0, 10_000.0).unwrap(), 30.0);
        assert!(payment_to_income_ratio(3_000.0, 0.0).is_err());
        assert_relative_eq!(max_payment(10_000.0, 35.0).unwrap(), 3_500.0);
    }

    #[test]
    fn test_loan_to_value() {
        assert_relative_eq!(loan_to_value(320_000.0, 400_000.0).unwrap(), 80.0);
        assert!(loan_to_value(320_000.0, 0.0).is_err());
    }

    #[test]
    fn test_effective_cost_rate() {
        // Paying back 1.01^12 times the loan over 12 months is exactly 1% a month
        let total = 100_000.0 * 1.01f64.powi(12);
        let cet = effective_cost_rate(100_000.0, total, 12, 0.0).unwrap();
        assert_relative_eq!(cet, 12.0, epsilon = 1e-9);

        let with_fees = effective_cost_rate(100_000.0, total, 12, 2_000.0).unwrap();
        assert!(with_fees > cet);
    }

    #[test]
    fn test_annuity_values() {
        assert_relative_eq!(present_value(100.0, 0.0, 12).unwrap(), 1_200.0);
        assert_relative_eq!(future_value(100.0, 0.0, 12).unwrap(), 1_200.0);

        let pv = present_value(1_000.0, 0.01, 12).unwrap();
        assert_relative_eq!(pv, 11_255.08, epsilon = 0.01);
        let fv = future_value(1_000.0, 0.01, 12).unwrap();
        assert_relative_eq!(fv, 12_682.50, epsilon = 0.01);
        assert!(present_value(1_000.0, -1.0, 12).is_err());
    }

    #[test]
    fn test_housing_cost_and_acquisition() {
        let cost = monthly_housing_cost(3_000.0, 800.0, 2_400.0, 50.0).unwrap();
        assert_relative_eq!(cost, 4_050.0);

        let costs = AcquisitionCosts {
            transfer_tax_percent: 3.0,
            registry_fees: 2_500.0,
            appraisal_fee: 3_000.0,
            bank_fees: 1_000.0,
            renovation_costs: 0.0,
        };
        assert_relative_eq!(costs.upfront_total(500_000.0).unwrap(), 21_500.0);
        assert!(AcquisitionCosts::with_transfer_tax(-1.0).upfront_total(100.0).is_err());
    }
}
