//! Amortization engine for SAC and PRICE mortgage schedules

use crate::error::{ensure_non_negative, ensure_positive, EngineError, EngineResult};
use super::schedule::{AmortizationPolicy, AmortizationRow, FinancingSimulation};

/// Longest financing term accepted, in years
pub const MAX_TERM_YEARS: u32 = 100;

/// Validated loan inputs shared by both amortization policies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanTerms {
    pub total_price: f64,
    pub down_payment: f64,
    /// Annual nominal rate in percent (9.5 = 9.5% a year)
    pub annual_rate_percent: f64,
    pub term_years: u32,
}

impl LoanTerms {
    /// Validate raw loan inputs.
    ///
    /// The term is checked first so a zero term always reports `InvalidTerm`.
    pub fn new(
        total_price: f64,
        down_payment: f64,
        annual_rate_percent: f64,
        term_years: u32,
    ) -> EngineResult<Self> {
        if term_years == 0 || term_years > MAX_TERM_YEARS {
            return Err(EngineError::InvalidTerm { term_years });
        }
        ensure_positive("total price", total_price)?;
        ensure_non_negative("down payment", down_payment)?;
        ensure_non_negative("annual interest rate", annual_rate_percent)?;
        if down_payment > total_price {
            return Err(EngineError::invalid_input(format!(
                "down payment {down_payment} exceeds total price {total_price}"
            )));
        }

        Ok(Self {
            total_price,
            down_payment,
            annual_rate_percent,
            term_years,
        })
    }

    pub fn financed_amount(&self) -> f64 {
        self.total_price - self.down_payment
    }

    /// Monthly rate as a decimal: annual % / 100 / 12
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 100.0 / 12.0
    }

    pub fn term_months(&self) -> u32 {
        self.term_years * 12
    }

    /// Run the given policy on these terms.
    ///
    /// Fails when the rate is too extreme for the schedule to stay finite and amortize.
    pub fn simulate(&self, policy: AmortizationPolicy) -> EngineResult<FinancingSimulation> {
        match policy {
            AmortizationPolicy::ConstantAmortization => {
                let fixed_principal = self.financed_amount() / self.term_months() as f64;
                build_schedule(self, policy, |_interest| fixed_principal)
            }
            AmortizationPolicy::ConstantPayment => {
                let payment = level_payment(
                    self.financed_amount(),
                    self.monthly_rate(),
                    self.term_months(),
                );
                build_schedule(self, policy, |interest| payment - interest)
            }
        }
    }
}

impl FinancingSimulation {
    /// Validate inputs and simulate the requested policy
    pub fn simulate(
        policy: AmortizationPolicy,
        total_price: f64,
        down_payment: f64,
        annual_rate_percent: f64,
        term_years: u32,
    ) -> EngineResult<Self> {
        let terms = LoanTerms::new(total_price, down_payment, annual_rate_percent, term_years)?;
        terms.simulate(policy)
    }
}

/// Constant amortization (SAC): fixed principal, declining payments
pub fn constant_amortization(
    total_price: f64,
    down_payment: f64,
    annual_rate_percent: f64,
    term_years: u32,
) -> EngineResult<FinancingSimulation> {
    FinancingSimulation::simulate(
        AmortizationPolicy::ConstantAmortization,
        total_price,
        down_payment,
        annual_rate_percent,
        term_years,
    )
}

/// Constant payment (PRICE): one level installment for the whole term
pub fn constant_payment(
    total_price: f64,
    down_payment: f64,
    annual_rate_percent: f64,
    term_years: u32,
) -> EngineResult<FinancingSimulation> {
    FinancingSimulation::simulate(
        AmortizationPolicy::ConstantPayment,
        total_price,
        down_payment,
        annual_rate_percent,
        term_years,
    )
}

/// Level annuity installment.
///
/// PMT = P * i / (1 - (1 + i)^-n), or P / n when i = 0.
/// Equivalent to P * i * (1 + i)^n / ((1 + i)^n - 1) without overflowing for large n.
pub fn level_payment(principal: f64, monthly_rate: f64, months: u32) -> f64 {
    if months == 0 {
        return 0.0;
    }
    if monthly_rate == 0.0 {
        return principal / months as f64;
    }
    let discount = (1.0 + monthly_rate).powi(-(months as i32));
    principal * monthly_rate / (1.0 - discount)
}

/// Largest closing balance accepted, as a share of the financed amount
const MAX_RESIDUAL_SHARE: f64 = 1e-3;

/// Walk the loan month by month.
///
/// `principal_for` receives the month's interest and returns the principal repaid.
fn build_schedule<F>(
    terms: &LoanTerms,
    policy: AmortizationPolicy,
    principal_for: F,
) -> EngineResult<FinancingSimulation>
where
    F: Fn(f64) -> f64,
{
    let monthly_rate = terms.monthly_rate();
    let months = terms.term_months();

    let mut schedule = Vec::with_capacity(months as usize);
    let mut balance = terms.financed_amount();
    let mut cumulative_paid = terms.down_payment;

    for month in 1..=months {
        let interest = balance * monthly_rate;
        let principal = principal_for(interest);
        let payment = principal + interest;

        balance -= principal;
        cumulative_paid += payment;

        if !payment.is_finite() || !balance.is_finite() {
            return Err(EngineError::invalid_input(format!(
                "{} schedule is not finite at month {} ({}% a year over {} years)",
                policy, month, terms.annual_rate_percent, terms.term_years
            )));
        }

        schedule.push(AmortizationRow {
            month,
            payment,
            principal,
            interest,
            balance: balance.max(0.0),
            cumulative_paid,
        });
    }

    let financed = terms.financed_amount();
    if balance.abs() > financed * MAX_RESIDUAL_SHARE {
        return Err(EngineError::invalid_input(format!(
            "{} schedule leaves {:.2} of {:.2} unpaid at {}% a year",
            policy, balance, financed, terms.annual_rate_percent
        )));
    }

    Ok(FinancingSimulation::from_schedule(
        policy,
        terms.total_price,
        terms.down_payment,
        monthly_rate,
        schedule,
    ))
}
