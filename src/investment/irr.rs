//! Internal Rate of Return (IRR) solver
//!
//! Newton-Raphson from a 10% guess, with a bracketed bisection fallback when the
//! derivative vanishes, the iterate leaves the valid domain, or the iteration budget
//! runs out. The result is only ever a finite rate or a `NoConvergence` error.

use log::debug;

use crate::error::{ensure_finite, ensure_positive, EngineError, EngineResult};

/// Bracket searched by the bisection fallback (periodic decimal rates)
const BISECTION_LOW: f64 = -0.99;
const BISECTION_HIGH: f64 = 10.0;
const MAX_BISECTION_ITERATIONS: u32 = 200;

/// Solver settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrrConfig {
    /// Newton-Raphson iteration budget
    pub max_iterations: u32,
    /// Stop once |NPV| falls below this amount (currency units)
    pub tolerance: f64,
    /// Starting rate as a decimal
    pub initial_guess: f64,
}

impl Default for IrrConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 0.01,
            initial_guess: 0.10,
        }
    }
}

/// IRR in percent with the default settings
pub fn solve_irr(initial_outlay: f64, periodic_cash_flows: &[f64]) -> EngineResult<f64> {
    solve_irr_with(initial_outlay, periodic_cash_flows, &IrrConfig::default())
}

/// IRR in percent for an outlay at t=0 followed by flows at t=1..N
pub fn solve_irr_with(
    initial_outlay: f64,
    periodic_cash_flows: &[f64],
    config: &IrrConfig,
) -> EngineResult<f64> {
    ensure_positive("initial outlay", initial_outlay)?;
    ensure_positive("tolerance", config.tolerance)?;
    if periodic_cash_flows.is_empty() {
        return Err(EngineError::invalid_input("at least one periodic cash flow is required"));
    }
    for &cf in periodic_cash_flows {
        ensure_finite("cash flow", cf)?;
    }

    // The outlay is the only outflow at t=0, so a root needs a later inflow
    if !periodic_cash_flows.iter().any(|&cf| cf > 1e-10) {
        return Err(EngineError::no_convergence(
            0,
            "cash flows never change sign, no finite IRR exists",
        ));
    }

    let mut rate = config.initial_guess;
    for iteration in 0..config.max_iterations {
        let (npv, dnpv) = npv_and_derivative(initial_outlay, periodic_cash_flows, rate);

        if npv.abs() < config.tolerance {
            return Ok(rate * 100.0);
        }

        if !dnpv.is_finite() || dnpv.abs() < 1e-20 {
            debug!("IRR: derivative vanished at iteration {}, rate {:.6}", iteration, rate);
            return bisection(initial_outlay, periodic_cash_flows, config.tolerance);
        }

        let next = rate - npv / dnpv;
        if !next.is_finite() || next <= -1.0 {
            debug!("IRR: Newton step left the domain at iteration {} ({})", iteration, next);
            return bisection(initial_outlay, periodic_cash_flows, config.tolerance);
        }
        rate = next;
    }

    // Accept the last iterate if it happens to satisfy the tolerance
    let npv = net_present_value(initial_outlay, periodic_cash_flows, rate);
    if npv.abs() < config.tolerance {
        return Ok(rate * 100.0);
    }

    debug!(
        "IRR: Newton did not converge in {} iterations (npv {:.4}), falling back to bisection",
        config.max_iterations, npv
    );
    bisection(initial_outlay, periodic_cash_flows, config.tolerance)
}

/// NPV at a periodic decimal rate: -outlay + Σ cf_p / (1 + r)^p for p = 1..N
pub fn net_present_value(initial_outlay: f64, periodic_cash_flows: &[f64], rate: f64) -> f64 {
    periodic_cash_flows
        .iter()
        .enumerate()
        .map(|(idx, &cf)| cf / (1.0 + rate).powi(idx as i32 + 1))
        .sum::<f64>()
        - initial_outlay
}

/// NPV and dNPV/dr = -Σ p * cf_p / (1 + r)^(p+1)
fn npv_and_derivative(initial_outlay: f64, periodic_cash_flows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = -initial_outlay;
    let mut dnpv = 0.0;

    for (idx, &cf) in periodic_cash_flows.iter().enumerate() {
        let p = idx as i32 + 1;
        npv += cf / (1.0 + rate).powi(p);
        dnpv -= p as f64 * cf / (1.0 + rate).powi(p + 1);
    }

    (npv, dnpv)
}

fn bisection(initial_outlay: f64, periodic_cash_flows: &[f64], tolerance: f64) -> EngineResult<f64> {
    let mut low = BISECTION_LOW;
    let mut high = BISECTION_HIGH;

    let mut npv_low = net_present_value(initial_outlay, periodic_cash_flows, low);
    let npv_high = net_present_value(initial_outlay, periodic_cash_flows, high);

    // Far ends of long series may overflow to infinity; only the sign matters
    if npv_low.is_nan() || npv_high.is_nan() || npv_low.signum() == npv_high.signum() {
        return Err(EngineError::no_convergence(
            0,
            format!(
                "no root between {:.0}% and {:.0}% (npv {:.4e} / {:.4e})",
                low * 100.0,
                high * 100.0,
                npv_low,
                npv_high
            ),
        ));
    }

    for iteration in 1..=MAX_BISECTION_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = net_present_value(initial_outlay, periodic_cash_flows, mid);

        if npv_mid.abs() < tolerance {
            debug!("IRR: bisection converged after {} iterations", iteration);
            return Ok(mid * 100.0);
        }
        if (high - low) / 2.0 < 1e-12 {
            return Err(EngineError::no_convergence(
                iteration,
                format!("bracket collapsed at {:.6}% with npv {:.4e}", mid * 100.0, npv_mid),
            ));
        }

        if npv_mid.signum() != npv_low.signum() {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    Err(EngineError::no_convergence(
        MAX_BISECTION_ITERATIONS,
        "bisection exhausted its iteration budget",
    ))
}
