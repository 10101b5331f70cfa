//! Property analyzer for batch evaluation of a catalog
//!
//! Holds the user's preferences once, then evaluates each property independently:
//! financing under both amortization policies, investment metrics, the cash-flow
//! projection with its IRR, and the housing / investment scores.

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::financing::affordability::{monthly_housing_cost, payment_to_income_ratio};
use crate::financing::{constant_amortization, constant_payment, AmortizationPolicy, FinancingSimulation};
use crate::investment::{
    analyze_investment, net_cap_rate, payback_period, project_cash_flow, return_on_investment,
    solve_irr, CashFlowProjection, InvestmentAnalysis, InvestmentInputs, NetCapRateInputs,
};
use crate::preferences::Preferences;
use crate::property::{PropertyKind, PropertyRecord};
use crate::scoring::{
    assess_investment_risk, housing_pros_and_cons, housing_score, investment_score, normalize,
    quality_score, HousingProfile, HousingScoreInputs, InvestmentScoreInputs, ProsAndCons,
    RiskInputs, RiskLevel,
};

/// Liquidity assumed when a record has no score of its own
const DEFAULT_LIQUIDITY_SCORE: f64 = 0.5;

/// Market reference values taken from the catalog being analyzed
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketContext {
    /// `None` when no record has a usable price per m²
    pub median_price_per_sqm: Option<f64>,
    pub median_condo_fee: Option<f64>,
    pub min_condo_fee: f64,
    pub max_condo_fee: f64,
}

impl MarketContext {
    pub fn from_properties(properties: &[PropertyRecord]) -> Self {
        let prices: Vec<f64> = properties
            .iter()
            .filter_map(PropertyRecord::effective_price_per_sqm)
            .filter(|p| p.is_finite())
            .collect();
        let fees: Vec<f64> = properties
            .iter()
            .map(|p| p.condo_fee)
            .filter(|f| f.is_finite())
            .collect();

        let (min_condo_fee, max_condo_fee) = if fees.is_empty() {
            (0.0, 0.0)
        } else {
            (
                fees.iter().copied().fold(f64::INFINITY, f64::min),
                fees.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            )
        };

        Self {
            median_price_per_sqm: median(prices),
            median_condo_fee: median(fees),
            min_condo_fee,
            max_condo_fee,
        }
    }
}

fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Headline figures of one amortization policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancingSummary {
    pub policy: AmortizationPolicy,
    pub down_payment: f64,
    pub financed_amount: f64,
    pub first_payment: f64,
    pub last_payment: f64,
    pub total_interest: f64,
    pub total_paid: f64,
    /// First installment over monthly income, percent; `None` without an income
    pub payment_to_income: Option<f64>,
}

impl FinancingSummary {
    fn from_simulation(sim: &FinancingSimulation, monthly_income: f64) -> EngineResult<Self> {
        let payment_to_income = if monthly_income > 0.0 {
            Some(payment_to_income_ratio(sim.first_payment(), monthly_income)?)
        } else {
            None
        };

        Ok(Self {
            policy: sim.policy(),
            down_payment: sim.down_payment(),
            financed_amount: sim.financed_amount(),
            first_payment: sim.first_payment(),
            last_payment: sim.last_payment(),
            total_interest: sim.total_interest(),
            total_paid: sim.total_paid(),
            payment_to_income,
        })
    }
}

/// Full evaluation of one property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyReport {
    pub id: String,
    pub name: String,
    pub total_price: f64,
    pub price_per_sqm: Option<f64>,
    /// Rent used in the analysis (record value or the preferences estimate)
    pub monthly_rent: f64,
    /// Transfer tax and fees due at purchase
    pub upfront_costs: f64,

    pub constant_amortization: FinancingSummary,
    pub constant_payment: FinancingSummary,

    pub investment: InvestmentAnalysis,
    pub net_cap_rate: f64,
    pub projection: CashFlowProjection,
    pub payback_years: Option<f64>,
    /// Return on the investment down payment over the projection horizon, percent
    pub horizon_roi: f64,
    /// `None` when the projected returns admit no IRR
    pub irr: Option<f64>,

    pub risk_level: RiskLevel,
    pub quality_score: f64,
    pub pros_and_cons: ProsAndCons,
    /// First SAC installment within the preferred share of income; `None` without an income
    pub within_payment_limit: Option<bool>,
    /// `None` without a monthly income and budget
    pub housing_score: Option<f64>,
    pub investment_score: f64,
}

/// Flat per-property row for CSV export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub id: String,
    pub name: String,
    pub total_price: f64,
    pub monthly_rent: f64,
    pub sac_first_payment: f64,
    pub price_payment: f64,
    pub cap_rate: f64,
    pub net_cap_rate: f64,
    pub cash_on_cash_return: f64,
    pub payback_years: Option<f64>,
    pub irr: Option<f64>,
    pub risk_level: RiskLevel,
    pub quality_score: f64,
    pub housing_score: Option<f64>,
    pub investment_score: f64,
}

impl PropertyReport {
    pub fn summary_row(&self) -> ReportRow {
        ReportRow {
            id: self.id.clone(),
            name: self.name.clone(),
            total_price: self.total_price,
            monthly_rent: self.monthly_rent,
            sac_first_payment: self.constant_amortization.first_payment,
            price_payment: self.constant_payment.first_payment,
            cap_rate: self.investment.cap_rate,
            net_cap_rate: self.net_cap_rate,
            cash_on_cash_return: self.investment.cash_on_cash_return,
            payback_years: self.payback_years,
            irr: self.irr,
            risk_level: self.risk_level,
            quality_score: self.quality_score,
            housing_score: self.housing_score,
            investment_score: self.investment_score,
        }
    }
}

/// Evaluates properties against one set of preferences
#[derive(Debug, Clone)]
pub struct PropertyAnalyzer {
    preferences: Preferences,
}

impl PropertyAnalyzer {
    /// Validates the preferences up front so every analysis can rely on them
    pub fn new(preferences: Preferences) -> EngineResult<Self> {
        preferences.validate()?;
        Ok(Self { preferences })
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Run every calculation for one property
    pub fn analyze(&self, record: &PropertyRecord, market: &MarketContext) -> EngineResult<PropertyReport> {
        let prefs = &self.preferences;
        let price = record.total_price()?;
        let monthly_rent = record.monthly_rent.unwrap_or_else(|| prefs.estimated_rent(price));

        // Financing as a home buyer
        let housing_down = prefs.housing_down_payment(price);
        let sac = constant_amortization(price, housing_down, prefs.interest_rate_percent, prefs.financing_term_years)?;
        let level = constant_payment(price, housing_down, prefs.interest_rate_percent, prefs.financing_term_years)?;
        let sac_summary = FinancingSummary::from_simulation(&sac, prefs.monthly_income)?;
        let level_summary = FinancingSummary::from_simulation(&level, prefs.monthly_income)?;

        // Investment view
        let investment_down = prefs.investment_down_payment(price);
        let inputs = InvestmentInputs {
            property_price: price,
            monthly_rent,
            condo_fee: record.condo_fee,
            annual_property_tax: record.annual_property_tax,
            maintenance_percent: prefs.maintenance_percent,
            vacancy_rate_percent: prefs.vacancy_rate_percent,
            appreciation_rate_percent: prefs.appreciation_rate_percent,
            initial_cash_invested: investment_down,
        };
        let investment = analyze_investment(&inputs)?;
        let net_cap = net_cap_rate(&NetCapRateInputs {
            monthly_rent,
            purchase_price: price,
            condo_fee: record.condo_fee,
            annual_property_tax: record.annual_property_tax,
            monthly_maintenance: monthly_rent * prefs.maintenance_percent / 100.0,
            monthly_insurance: prefs.monthly_insurance,
        })?;

        let projection = project_cash_flow(
            price,
            monthly_rent,
            inputs.monthly_expenses(),
            prefs.appreciation_rate_percent,
            prefs.rent_increase_rate_percent,
            prefs.projection_horizon_years,
        )?;
        let payback_years = payback_period(investment_down, investment.net_operating_income)?;
        let horizon_roi = return_on_investment(investment_down + projection.cumulative_return(), investment_down)?;

        let irr = match solve_irr(investment_down, &projection.total_returns()) {
            Ok(irr) => Some(irr),
            Err(EngineError::NoConvergence { iterations, reason }) => {
                debug!("{}: no IRR after {} iterations ({})", record.id, iterations, reason);
                None
            }
            Err(e) => return Err(e),
        };

        // Qualitative scores
        let construction_phase = match record.kind {
            PropertyKind::OffPlan => record.construction_phase,
            PropertyKind::Ready => None,
        };
        let risk_level = assess_investment_risk(&RiskInputs {
            construction_phase,
            developer_rating: record.developer_rating,
            net_cap_rate: net_cap,
            vacancy_rate_percent: prefs.vacancy_rate_percent,
        });
        let quality = quality_score(&record.tags);

        let investment_score = investment_score(
            &InvestmentScoreInputs {
                net_cap_rate: net_cap,
                irr: irr.unwrap_or(0.0),
                risk_score: risk_level.score(),
                liquidity_score: record.liquidity_score.unwrap_or(DEFAULT_LIQUIDITY_SCORE),
                discount_score: record.discount_score.unwrap_or(0.0),
            },
            &prefs.investment_weights,
        )?;

        // Housing view, judged on the most demanding SAC installment
        let monthly_cost = monthly_housing_cost(
            sac.first_payment(),
            record.condo_fee,
            record.annual_property_tax,
            prefs.monthly_insurance,
        )?;
        let total_cost_vs_budget = if prefs.monthly_budget > 0.0 {
            Some(monthly_cost / prefs.monthly_budget)
        } else {
            None
        };

        // Unknown market values compare equal to the property itself
        let price_per_sqm = record.effective_price_per_sqm();
        let (own_price_per_sqm, median_price_per_sqm) = match price_per_sqm {
            Some(p) => (p, market.median_price_per_sqm.unwrap_or(p)),
            None => (0.0, 0.0),
        };
        let pros_and_cons = housing_pros_and_cons(&HousingProfile {
            price_per_sqm: own_price_per_sqm,
            median_price_per_sqm,
            condo_fee: record.condo_fee,
            median_condo_fee: market.median_condo_fee.unwrap_or(record.condo_fee),
            payment_to_income_ratio: sac_summary.payment_to_income,
            total_cost_vs_budget,
            tags: &record.tags,
        });

        let housing_score = match (sac_summary.payment_to_income, total_cost_vs_budget) {
            (Some(ratio), Some(cost)) => Some(housing_score(
                &HousingScoreInputs {
                    payment_to_income_ratio: ratio,
                    total_cost_vs_budget: cost,
                    condo_fee_rank: 1.0 - normalize(record.condo_fee, market.min_condo_fee, market.max_condo_fee),
                    quality_score: quality,
                },
                &prefs.housing_weights,
            )?),
            _ => None,
        };

        Ok(PropertyReport {
            id: record.id.clone(),
            name: record.name.clone(),
            total_price: price,
            price_per_sqm,
            monthly_rent,
            upfront_costs: prefs.acquisition_costs().upfront_total(price)?,
            constant_amortization: sac_summary,
            constant_payment: level_summary,
            investment,
            net_cap_rate: net_cap,
            projection,
            payback_years,
            horizon_roi,
            irr,
            risk_level,
            quality_score: quality,
            pros_and_cons,
            within_payment_limit: sac_summary
                .payment_to_income
                .map(|ratio| ratio <= prefs.max_payment_to_income_percent),
            housing_score,
            investment_score,
        })
    }

    /// Analyze a whole catalog in parallel, keyed by property id.
    ///
    /// Market medians are taken from the same catalog. A failing property does not
    /// stop the others.
    pub fn analyze_batch(&self, properties: &[PropertyRecord]) -> Vec<(String, EngineResult<PropertyReport>)> {
        let market = MarketContext::from_properties(properties);

        let results: Vec<(String, EngineResult<PropertyReport>)> = properties
            .par_iter()
            .map(|record| (record.id.clone(), self.analyze(record, &market)))
            .collect();

        let failed = results.iter().filter(|(_, r)| r.is_err()).count();
        for (id, result) in &results {
            if let Err(e) = result {
                warn!("Property {} skipped: {}", id, e);
            }
        }
        info!("Analyzed {} properties ({} failed)", results.len(), failed);

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::ConstructionPhase;
    use approx::assert_relative_eq;

    fn catalog() -> Vec<PropertyRecord> {
        let mut garden = PropertyRecord::ready("p1", "Garden flat", 400_000.0, 80.0);
        garden.condo_fee = 600.0;
        garden.annual_property_tax = 1_200.0;
        garden.monthly_rent = Some(2_400.0);
        garden.tags = vec!["near transit".to_string(), "balcony".to_string()];

        let mut tower = PropertyRecord::off_plan("p2", "Tower B", 9_000.0, 60.0, ConstructionPhase::Launch);
        tower.condo_fee = 900.0;
        tower.developer_rating = Some(4.0);

        let mut loft = PropertyRecord::ready("p3", "Loft", 300_000.0, 50.0);
        loft.condo_fee = 300.0;

        vec![garden, tower, loft]
    }

    fn analyzer() -> PropertyAnalyzer {
        PropertyAnalyzer::new(Preferences {
            monthly_income: 20_000.0,
            monthly_budget: 6_000.0,
            ..Preferences::default()
        })
        .unwrap()
    }

    #[test]
    fn test_market_context() {
        let market = MarketContext::from_properties(&catalog());
        // Price/m²: 5000, 9000, 6000
        assert_eq!(market.median_price_per_sqm, Some(6_000.0));
        assert_eq!(market.median_condo_fee, Some(600.0));
        assert_eq!(market.min_condo_fee, 300.0);
        assert_eq!(market.max_condo_fee, 900.0);

        let empty = MarketContext::from_properties(&[]);
        assert_eq!(empty.median_price_per_sqm, None);
        assert_eq!(empty.min_condo_fee, 0.0);
    }

    #[test]
    fn test_analyze_ready_property() {
        let properties = catalog();
        let market = MarketContext::from_properties(&properties);
        let report = analyzer().analyze(&properties[0], &market).unwrap();

        assert_eq!(report.total_price, 400_000.0);
        assert_eq!(report.monthly_rent, 2_400.0);
        assert_eq!(report.constant_amortization.down_payment, 80_000.0);
        assert_eq!(report.constant_amortization.policy, AmortizationPolicy::ConstantAmortization);
        assert!(report.constant_amortization.first_payment > report.constant_payment.first_payment);
        assert_eq!(report.projection.years.len(), 10);

        // Annual rent 28,800; expenses (600 + 100 + 120 + 120) * 12 = 11,280
        assert_relative_eq!(report.investment.net_operating_income, 17_520.0, epsilon = 1e-9);
        assert_relative_eq!(report.payback_years.unwrap(), 120_000.0 / 17_520.0, epsilon = 1e-9);
        assert!(report.irr.is_some());

        assert_eq!(report.risk_level, RiskLevel::Low);
        assert_relative_eq!(report.quality_score, 0.7, epsilon = 1e-12);
        assert!(report.pros_and_cons.pros.iter().any(|p| p.contains("below the area median")));

        assert_eq!(report.within_payment_limit, Some(true));

        let housing = report.housing_score.unwrap();
        assert!((0.0..=100.0).contains(&housing));
        assert!((0.0..=100.0).contains(&report.investment_score));
        assert_relative_eq!(report.upfront_costs, 12_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rent_and_risk_defaults_for_off_plan() {
        let properties = catalog();
        let market = MarketContext::from_properties(&properties);
        let report = analyzer().analyze(&properties[1], &market).unwrap();

        assert_eq!(report.total_price, 540_000.0);
        // 0.5% of price a month
        assert_relative_eq!(report.monthly_rent, 2_700.0, epsilon = 1e-9);
        // Launch phase and a weak developer
        assert_ne!(report.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_housing_score_needs_income_and_budget() {
        let properties = catalog();
        let market = MarketContext::from_properties(&properties);
        let analyzer = PropertyAnalyzer::new(Preferences::default()).unwrap();
        let report = analyzer.analyze(&properties[2], &market).unwrap();

        assert_eq!(report.housing_score, None);
        assert_eq!(report.constant_payment.payment_to_income, None);
        assert_eq!(report.within_payment_limit, None);
    }

    #[test]
    fn test_payment_limit_follows_preferences() {
        let properties = catalog();
        let market = MarketContext::from_properties(&properties);
        // First SAC installment on the garden flat is about 3,689, 18.4% of 20,000
        let strict = PropertyAnalyzer::new(Preferences {
            monthly_income: 20_000.0,
            max_payment_to_income_percent: 15.0,
            ..Preferences::default()
        })
        .unwrap();
        let report = strict.analyze(&properties[0], &market).unwrap();
        assert_eq!(report.within_payment_limit, Some(false));
    }

    #[test]
    fn test_batch_keeps_going_after_failure() {
        let mut properties = catalog();
        properties.push(PropertyRecord::ready("bad", "No price", 0.0, 40.0));

        let results = analyzer().analyze_batch(&properties);
        assert_eq!(results.len(), 4);
        assert_eq!(results[3].0, "bad");
        assert!(matches!(results[3].1, Err(EngineError::InvalidInput { .. })));
        assert!(results[..3].iter().all(|(_, r)| r.is_ok()));
    }

    #[test]
    fn test_invalid_preferences_rejected() {
        let prefs = Preferences {
            projection_horizon_years: 0,
            ..Preferences::default()
        };
        assert!(PropertyAnalyzer::new(prefs).is_err());
    }

    #[test]
    fn test_summary_row() {
        let properties = catalog();
        let market = MarketContext::from_properties(&properties);
        let report = analyzer().analyze(&properties[0], &market).unwrap();
        let row = report.summary_row();
        assert_eq!(row.id, "p1");
        assert_eq!(row.sac_first_payment, report.constant_amortization.first_payment);
        assert_eq!(row.irr, report.irr);
    }
}
