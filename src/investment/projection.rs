//! Year-by-year cash-flow projections for a rental property
//!
//! Rent compounds at the rent-increase rate and the property value at the appreciation
//! rate. Operating expenses stay at their nominal starting value for the whole horizon:
//! this is a modeling assumption, not an inflation forecast.

use serde::{Deserialize, Serialize};

use crate::error::{
    ensure_growth_rate, ensure_non_negative, ensure_percent, ensure_positive, EngineError, EngineResult,
};

/// Longest projection horizon accepted, in years
pub const MAX_HORIZON_YEARS: u32 = 50;

/// One projected year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlowYear {
    /// Projection year (1-indexed)
    pub year: u32,
    /// Gross rent collected over the year
    pub rent: f64,
    pub expenses: f64,
    pub net_income: f64,
    /// Value gained by the property during the year
    pub appreciation: f64,
    /// Net income plus appreciation
    pub total_return: f64,
    /// Running sum of total return up to and including this year
    pub cumulative_return: f64,
}

/// Complete projection, ordered by year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowProjection {
    pub years: Vec<CashFlowYear>,
    /// Property value at the end of the last year
    pub final_property_value: f64,
}

impl CashFlowProjection {
    pub fn horizon(&self) -> u32 {
        self.years.len() as u32
    }

    pub fn total_net_income(&self) -> f64 {
        self.years.iter().map(|y| y.net_income).sum()
    }

    pub fn total_appreciation(&self) -> f64 {
        self.years.iter().map(|y| y.appreciation).sum()
    }

    pub fn cumulative_return(&self) -> f64 {
        self.years.last().map(|y| y.cumulative_return).unwrap_or(0.0)
    }

    /// Yearly total returns, the periodic flows fed to the IRR solver
    pub fn total_returns(&self) -> Vec<f64> {
        self.years.iter().map(|y| y.total_return).collect()
    }
}

/// Project rent, flat expenses and appreciation over `horizon_years`
pub fn project_cash_flow(
    property_price: f64,
    monthly_rent: f64,
    monthly_expenses: f64,
    appreciation_rate_percent: f64,
    rent_increase_rate_percent: f64,
    horizon_years: u32,
) -> EngineResult<CashFlowProjection> {
    ensure_horizon(horizon_years)?;
    ensure_positive("property price", property_price)?;
    ensure_non_negative("monthly rent", monthly_rent)?;
    ensure_non_negative("monthly expenses", monthly_expenses)?;
    ensure_growth_rate("appreciation rate", appreciation_rate_percent)?;
    ensure_growth_rate("rent increase rate", rent_increase_rate_percent)?;

    let mut years = Vec::with_capacity(horizon_years as usize);
    let mut current_rent = monthly_rent;
    let mut current_value = property_price;
    let mut cumulative_return = 0.0;

    // Expenses are not inflated
    let annual_expenses = monthly_expenses * 12.0;

    for year in 1..=horizon_years {
        let annual_rent = current_rent * 12.0;
        let net_income = annual_rent - annual_expenses;

        let appreciation = current_value * appreciation_rate_percent / 100.0;
        current_value += appreciation;

        let total_return = net_income + appreciation;
        cumulative_return += total_return;

        years.push(CashFlowYear {
            year,
            rent: annual_rent,
            expenses: annual_expenses,
            net_income,
            appreciation,
            total_return,
            cumulative_return,
        });

        // Grow rent for next year
        current_rent *= 1.0 + rent_increase_rate_percent / 100.0;
    }

    Ok(CashFlowProjection {
        years,
        final_property_value: current_value,
    })
}

/// Inputs for a financed rental projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeveragedProjectionInputs {
    pub purchase_price: f64,
    pub monthly_rent: f64,
    pub vacancy_rate_percent: f64,
    pub condo_fee: f64,
    pub annual_property_tax: f64,
    /// Percent of gross rent
    pub maintenance_percent: f64,
    pub monthly_insurance: f64,
    /// Property manager fee, percent of gross rent
    pub management_fee_percent: f64,
    pub rent_increase_rate_percent: f64,
    pub appreciation_rate_percent: f64,
    /// Monthly mortgage installment (level)
    pub mortgage_payment: f64,
    pub horizon_years: u32,
}

/// One year of a financed rental projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeveragedCashFlowYear {
    pub year: u32,
    /// Rent actually collected after vacancy
    pub effective_rent: f64,
    pub expenses: f64,
    pub mortgage_service: f64,
    pub net_cash_flow: f64,
    /// Property value at the start of the year
    pub property_value: f64,
}

/// Project collected rent, itemized expenses and debt service year by year
pub fn project_leveraged_cash_flow(
    inputs: &LeveragedProjectionInputs,
) -> EngineResult<Vec<LeveragedCashFlowYear>> {
    ensure_horizon(inputs.horizon_years)?;
    ensure_positive("purchase price", inputs.purchase_price)?;
    ensure_non_negative("monthly rent", inputs.monthly_rent)?;
    ensure_percent("vacancy rate", inputs.vacancy_rate_percent)?;
    ensure_non_negative("condo fee", inputs.condo_fee)?;
    ensure_non_negative("annual property tax", inputs.annual_property_tax)?;
    ensure_percent("maintenance", inputs.maintenance_percent)?;
    ensure_non_negative("monthly insurance", inputs.monthly_insurance)?;
    ensure_percent("management fee", inputs.management_fee_percent)?;
    ensure_growth_rate("rent increase rate", inputs.rent_increase_rate_percent)?;
    ensure_growth_rate("appreciation rate", inputs.appreciation_rate_percent)?;
    ensure_non_negative("mortgage payment", inputs.mortgage_payment)?;

    let mut projection = Vec::with_capacity(inputs.horizon_years as usize);
    let mut rent = inputs.monthly_rent;
    let mut property_value = inputs.purchase_price;
    let mortgage_service = inputs.mortgage_payment * 12.0;

    for year in 1..=inputs.horizon_years {
        let gross_rent = rent * 12.0;
        let effective_rent = gross_rent * (1.0 - inputs.vacancy_rate_percent / 100.0);

        let maintenance = gross_rent * inputs.maintenance_percent / 100.0;
        let management_fee = gross_rent * inputs.management_fee_percent / 100.0;
        let expenses = inputs.condo_fee * 12.0
            + inputs.annual_property_tax
            + maintenance
            + inputs.monthly_insurance * 12.0
            + management_fee;

        projection.push(LeveragedCashFlowYear {
            year,
            effective_rent,
            expenses,
            mortgage_service,
            net_cash_flow: effective_rent - expenses - mortgage_service,
            property_value,
        });

        rent *= 1.0 + inputs.rent_increase_rate_percent / 100.0;
        property_value *= 1.0 + inputs.appreciation_rate_percent / 100.0;
    }

    Ok(projection)
}

fn ensure_horizon(horizon_years: u32) -> EngineResult<u32> {
    if horizon_years == 0 || horizon_years > MAX_HORIZON_YEARS {
        return Err(EngineError::invalid_input(format!(
            "projection horizon must be between 1 and {MAX_HORIZON_YEARS} years, got {horizon_years}"
        )));
    }
    Ok(horizon_years)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_flat_projection() {
        let projection = project_cash_flow(300_000.0, 1_500.0, 300.0, 0.0, 0.0, 10).unwrap();
        assert_eq!(projection.horizon(), 10);

        let first = projection.years[0];
        assert_abs_diff_eq!(first.net_income, 14_400.0, epsilon = 1e-9);
        for (idx, year) in projection.years.iter().enumerate() {
            assert_eq!(year.year, idx as u32 + 1);
            assert_abs_diff_eq!(year.net_income, first.net_income, epsilon = 1e-9);
            assert_abs_diff_eq!(
                year.cumulative_return,
                (idx as f64 + 1.0) * first.total_return,
                epsilon = 1e-6
            );
        }
        assert_eq!(projection.final_property_value, 300_000.0);
    }

    #[test]
    fn test_growth_compounds() {
        let projection = project_cash_flow(200_000.0, 1_000.0, 200.0, 5.0, 10.0, 3).unwrap();
        let years = &projection.years;

        assert_abs_diff_eq!(years[0].rent, 12_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(years[1].rent, 13_200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(years[2].rent, 14_520.0, epsilon = 1e-6);

        // Expenses held flat
        assert!(years.iter().all(|y| y.expenses == 2_400.0));

        assert_abs_diff_eq!(years[0].appreciation, 10_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(years[1].appreciation, 10_500.0, epsilon = 1e-9);
        assert_abs_diff_eq!(projection.final_property_value, 231_525.0, epsilon = 1e-6);

        assert_abs_diff_eq!(years[0].cumulative_return, years[0].total_return);
        assert_abs_diff_eq!(
            years[2].cumulative_return,
            years[1].cumulative_return + years[2].total_return,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(projection.cumulative_return(), years[2].cumulative_return);
        assert_eq!(projection.total_returns().len(), 3);
    }

    #[test]
    fn test_invalid_horizon() {
        assert!(matches!(
            project_cash_flow(200_000.0, 1_000.0, 200.0, 5.0, 3.0, 0),
            Err(EngineError::InvalidInput { .. })
        ));
        assert!(project_cash_flow(200_000.0, 1_000.0, 200.0, 5.0, 3.0, 51).is_err());
        assert!(project_cash_flow(200_000.0, 1_000.0, 200.0, -100.0, 3.0, 5).is_err());
    }

    #[test]
    fn test_leveraged_projection() {
        let inputs = LeveragedProjectionInputs {
            purchase_price: 400_000.0,
            monthly_rent: 2_000.0,
            vacancy_rate_percent: 10.0,
            condo_fee: 500.0,
            annual_property_tax: 1_200.0,
            maintenance_percent: 5.0,
            monthly_insurance: 50.0,
            management_fee_percent: 8.0,
            rent_increase_rate_percent: 5.0,
            appreciation_rate_percent: 3.0,
            mortgage_payment: 1_000.0,
            horizon_years: 2,
        };
        let years = project_leveraged_cash_flow(&inputs).unwrap();
        assert_eq!(years.len(), 2);

        // 24000 gross, 21600 collected; expenses 6000 + 1200 + 1200 + 600 + 1920
        assert_abs_diff_eq!(years[0].effective_rent, 21_600.0, epsilon = 1e-9);
        assert_abs_diff_eq!(years[0].expenses, 10_920.0, epsilon = 1e-9);
        assert_abs_diff_eq!(years[0].net_cash_flow, -1_320.0, epsilon = 1e-9);
        assert_eq!(years[0].property_value, 400_000.0);
        assert_abs_diff_eq!(years[1].property_value, 412_000.0, epsilon = 1e-9);
        assert!(years[1].effective_rent > years[0].effective_rent);
    }
}
