//! Amortization schedule output structures

use serde::{Deserialize, Serialize};

/// Amortization policy for a mortgage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmortizationPolicy {
    /// SAC: fixed principal per month, declining payment
    ConstantAmortization,
    /// PRICE (French system): fixed payment per month
    ConstantPayment,
}

impl AmortizationPolicy {
    pub const ALL: [AmortizationPolicy; 2] = [
        AmortizationPolicy::ConstantAmortization,
        AmortizationPolicy::ConstantPayment,
    ];

    /// Short market name of the policy
    pub fn label(&self) -> &'static str {
        match self {
            AmortizationPolicy::ConstantAmortization => "SAC",
            AmortizationPolicy::ConstantPayment => "PRICE",
        }
    }
}

impl std::fmt::Display for AmortizationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for AmortizationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sac" | "constant-amortization" => Ok(AmortizationPolicy::ConstantAmortization),
            "price" | "constant-payment" => Ok(AmortizationPolicy::ConstantPayment),
            other => Err(format!("Unknown amortization policy: {}", other)),
        }
    }
}

/// A single month of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Month number (1-indexed)
    pub month: u32,
    /// Total installment (principal + interest)
    pub payment: f64,
    /// Principal repaid this month
    pub principal: f64,
    /// Interest charged on the opening balance
    pub interest: f64,
    /// Outstanding balance after this month, never negative
    pub balance: f64,
    /// Down payment plus every installment paid so far
    pub cumulative_paid: f64,
}

/// Complete financing simulation for one policy.
///
/// Built once by the amortization engine and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancingSimulation {
    policy: AmortizationPolicy,
    total_price: f64,
    down_payment: f64,
    financed_amount: f64,
    /// Monthly rate as a decimal (0.01 = 1% a month)
    monthly_rate: f64,
    term_months: u32,
    schedule: Vec<AmortizationRow>,
    total_interest: f64,
    total_paid: f64,
    first_payment: f64,
    last_payment: f64,
}

impl FinancingSimulation {
    /// Assemble the simulation and its totals from a finished schedule
    pub(super) fn from_schedule(
        policy: AmortizationPolicy,
        total_price: f64,
        down_payment: f64,
        monthly_rate: f64,
        schedule: Vec<AmortizationRow>,
    ) -> Self {
        let financed_amount = total_price - down_payment;
        let total_paid = schedule.last().map(|r| r.cumulative_paid).unwrap_or(down_payment);
        let first_payment = schedule.first().map(|r| r.payment).unwrap_or(0.0);
        let last_payment = schedule.last().map(|r| r.payment).unwrap_or(0.0);

        Self {
            policy,
            total_price,
            down_payment,
            financed_amount,
            monthly_rate,
            term_months: schedule.len() as u32,
            total_interest: total_paid - down_payment - financed_amount,
            total_paid,
            first_payment,
            last_payment,
            schedule,
        }
    }

    pub fn policy(&self) -> AmortizationPolicy {
        self.policy
    }

    pub fn total_price(&self) -> f64 {
        self.total_price
    }

    pub fn down_payment(&self) -> f64 {
        self.down_payment
    }

    pub fn financed_amount(&self) -> f64 {
        self.financed_amount
    }

    pub fn monthly_rate(&self) -> f64 {
        self.monthly_rate
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }

    /// Month-by-month rows, ordered by month
    pub fn schedule(&self) -> &[AmortizationRow] {
        &self.schedule
    }

    /// Interest paid over the whole term
    pub fn total_interest(&self) -> f64 {
        self.total_interest
    }

    /// Down payment plus all installments
    pub fn total_paid(&self) -> f64 {
        self.total_paid
    }

    pub fn first_payment(&self) -> f64 {
        self.first_payment
    }

    pub fn last_payment(&self) -> f64 {
        self.last_payment
    }

    /// Financed share of the price, in percent
    pub fn loan_to_value(&self) -> f64 {
        self.financed_amount / self.total_price * 100.0
    }

    /// Yearly totals of payments, principal and interest
    pub fn yearly_summary(&self) -> Vec<ScheduleYear> {
        self.schedule
            .chunks(12)
            .enumerate()
            .map(|(idx, rows)| ScheduleYear {
                year: idx as u32 + 1,
                payments: rows.iter().map(|r| r.payment).sum(),
                principal: rows.iter().map(|r| r.principal).sum(),
                interest: rows.iter().map(|r| r.interest).sum(),
                closing_balance: rows.last().map(|r| r.balance).unwrap_or(0.0),
            })
            .collect()
    }
}

/// Aggregated schedule for one loan year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleYear {
    pub year: u32,
    pub payments: f64,
    pub principal: f64,
    pub interest: f64,
    pub closing_balance: f64,
}
