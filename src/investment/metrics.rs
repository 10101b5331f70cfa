//! Point-in-time profitability ratios for a rental property

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ensure_non_negative, ensure_percent, ensure_positive, EngineResult};

/// Raw inputs for [`analyze_investment`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentInputs {
    pub property_price: f64,
    pub monthly_rent: f64,
    pub condo_fee: f64,
    pub annual_property_tax: f64,
    /// Maintenance reserve as a percent of rent
    pub maintenance_percent: f64,
    /// Expected vacancy as a percent of rent
    pub vacancy_rate_percent: f64,
    /// Annual appreciation of the property value, percent
    pub appreciation_rate_percent: f64,
    /// Own capital put into the deal (usually the down payment)
    pub initial_cash_invested: f64,
}

impl InvestmentInputs {
    /// Monthly operating costs: condo + tax/12 + maintenance + vacancy loss
    pub fn monthly_expenses(&self) -> f64 {
        let monthly_maintenance = self.monthly_rent * self.maintenance_percent / 100.0;
        let monthly_vacancy_loss = self.monthly_rent * self.vacancy_rate_percent / 100.0;
        self.condo_fee + self.annual_property_tax / 12.0 + monthly_maintenance + monthly_vacancy_loss
    }

    fn validate(&self) -> EngineResult<()> {
        ensure_positive("property price", self.property_price)?;
        ensure_positive("monthly rent", self.monthly_rent)?;
        ensure_positive("initial cash invested", self.initial_cash_invested)?;
        ensure_non_negative("condo fee", self.condo_fee)?;
        ensure_non_negative("annual property tax", self.annual_property_tax)?;
        ensure_percent("maintenance", self.maintenance_percent)?;
        ensure_percent("vacancy rate", self.vacancy_rate_percent)?;
        ensure_finite("appreciation rate", self.appreciation_rate_percent)?;
        Ok(())
    }
}

/// Investment metrics. Percentage fields are in percent units (6.5 = 6.5%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentAnalysis {
    pub property_price: f64,
    pub monthly_rent: f64,
    pub annual_rent: f64,
    /// Annual operating expenses
    pub operating_expenses: f64,
    pub net_operating_income: f64,
    pub cap_rate: f64,
    pub gross_yield: f64,
    pub net_yield: f64,
    /// Share of potential rent needed to cover costs; above 100 never breaks even
    pub break_even_occupancy: f64,
    pub cash_on_cash_return: f64,
    /// One year of appreciation on the purchase price
    pub estimated_appreciation: f64,
    /// NOI plus appreciation
    pub total_return: f64,
}

/// Compute cap rate, yields, break-even occupancy and cash-on-cash for one property
pub fn analyze_investment(inputs: &InvestmentInputs) -> EngineResult<InvestmentAnalysis> {
    inputs.validate()?;

    let monthly_expenses = inputs.monthly_expenses();
    let annual_rent = inputs.monthly_rent * 12.0;
    let annual_expenses = monthly_expenses * 12.0;
    let net_operating_income = annual_rent - annual_expenses;

    let estimated_appreciation = inputs.property_price * inputs.appreciation_rate_percent / 100.0;

    Ok(InvestmentAnalysis {
        property_price: inputs.property_price,
        monthly_rent: inputs.monthly_rent,
        annual_rent,
        operating_expenses: annual_expenses,
        net_operating_income,
        cap_rate: net_operating_income / inputs.property_price * 100.0,
        gross_yield: annual_rent / inputs.property_price * 100.0,
        net_yield: (inputs.monthly_rent - monthly_expenses) * 12.0 / inputs.property_price * 100.0,
        break_even_occupancy: monthly_expenses / inputs.monthly_rent * 100.0,
        cash_on_cash_return: net_operating_income / inputs.initial_cash_invested * 100.0,
        estimated_appreciation,
        total_return: net_operating_income + estimated_appreciation,
    })
}

/// Inputs for the itemized net cap rate, which also counts insurance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetCapRateInputs {
    pub monthly_rent: f64,
    pub purchase_price: f64,
    pub condo_fee: f64,
    pub annual_property_tax: f64,
    /// Maintenance in currency per month
    pub monthly_maintenance: f64,
    pub monthly_insurance: f64,
}

/// ((annual rent - annual costs) / price) * 100
pub fn net_cap_rate(inputs: &NetCapRateInputs) -> EngineResult<f64> {
    ensure_positive("purchase price", inputs.purchase_price)?;
    ensure_non_negative("monthly rent", inputs.monthly_rent)?;
    ensure_non_negative("condo fee", inputs.condo_fee)?;
    ensure_non_negative("annual property tax", inputs.annual_property_tax)?;
    ensure_non_negative("monthly maintenance", inputs.monthly_maintenance)?;
    ensure_non_negative("monthly insurance", inputs.monthly_insurance)?;

    let annual_rent = inputs.monthly_rent * 12.0;
    let annual_costs = inputs.condo_fee * 12.0
        + inputs.annual_property_tax
        + inputs.monthly_maintenance * 12.0
        + inputs.monthly_insurance * 12.0;

    Ok((annual_rent - annual_costs) / inputs.purchase_price * 100.0)
}

/// Simple payback in years; `None` when the investment is never recovered
pub fn payback_period(initial_investment: f64, annual_cash_flow: f64) -> EngineResult<Option<f64>> {
    ensure_positive("initial investment", initial_investment)?;
    ensure_finite("annual cash flow", annual_cash_flow)?;
    if annual_cash_flow <= 0.0 {
        return Ok(None);
    }
    Ok(Some(initial_investment / annual_cash_flow))
}

/// ROI in percent: (gain - investment) / investment
pub fn return_on_investment(total_gain: f64, initial_investment: f64) -> EngineResult<f64> {
    ensure_finite("total gain", total_gain)?;
    ensure_positive("initial investment", initial_investment)?;
    Ok((total_gain - initial_investment) / initial_investment * 100.0)
}
