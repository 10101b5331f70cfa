//! Off-plan payment plans: down payment, monthly installments, balance at delivery

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, EngineError, EngineResult};

/// Developer payment plan for a unit bought off-plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffPlanPlan {
    pub down_payment: f64,
    pub installment_value: f64,
    pub installment_count: u32,
    /// Lump sum due when the keys are handed over
    pub balance_at_delivery: f64,
    pub delivery_date: NaiveDate,
    /// Index used to correct installments (e.g. INCC)
    pub correction_index: Option<String>,
}

impl OffPlanPlan {
    /// Nominal total before index correction
    pub fn nominal_total(&self) -> f64 {
        self.down_payment + self.installment_value * self.installment_count as f64 + self.balance_at_delivery
    }
}

/// One dated entry of an off-plan schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPayment {
    pub due_date: NaiveDate,
    pub description: String,
    pub amount: f64,
    /// Subject to index correction until paid
    pub index_corrected: bool,
}

/// Lay out the plan from `start`: down payment on `start`, installment i on `start + i months`,
/// balance on the delivery date
pub fn off_plan_schedule(plan: &OffPlanPlan, start: NaiveDate) -> EngineResult<Vec<ScheduledPayment>> {
    ensure_non_negative("down payment", plan.down_payment)?;
    ensure_non_negative("installment value", plan.installment_value)?;
    ensure_non_negative("balance at delivery", plan.balance_at_delivery)?;
    if plan.delivery_date < start {
        return Err(EngineError::invalid_input(format!(
            "delivery date {} precedes schedule start {}",
            plan.delivery_date, start
        )));
    }

    let mut schedule = Vec::with_capacity(plan.installment_count as usize + 2);

    schedule.push(ScheduledPayment {
        due_date: start,
        description: "Down payment".to_string(),
        amount: plan.down_payment,
        index_corrected: false,
    });

    for i in 1..=plan.installment_count {
        let due_date = start.checked_add_months(Months::new(i)).ok_or_else(|| {
            EngineError::invalid_input(format!("installment {} falls outside the calendar", i))
        })?;
        schedule.push(ScheduledPayment {
            due_date,
            description: format!("Installment {}/{}", i, plan.installment_count),
            amount: plan.installment_value,
            index_corrected: true,
        });
    }

    schedule.push(ScheduledPayment {
        due_date: plan.delivery_date,
        description: "Balance at delivery".to_string(),
        amount: plan.balance_at_delivery,
        index_corrected: false,
    });

    Ok(schedule)
}
