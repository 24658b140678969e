//! Pot-odds and expected-value arithmetic.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

fn non_negative(name: &str, value: f64) -> EngineResult<()> {
    if value.is_nan() || value < 0.0 {
        return Err(EngineError::InvalidArgument(format!(
            "{} must be a non-negative number, got {}",
            name, value
        )));
    }
    Ok(())
}

fn probability(name: &str, value: f64) -> EngineResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(EngineError::InvalidArgument(format!(
            "{} must lie in [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

/// Fraction of the final pot the caller contributes:
/// `to_call / (pot + to_call)`. Zero when there is nothing to call.
pub fn pot_odds(pot: f64, to_call: f64) -> EngineResult<f64> {
    non_negative("pot", pot)?;
    non_negative("to_call", to_call)?;
    if to_call == 0.0 {
        return Ok(0.0);
    }
    Ok(to_call / (pot + to_call))
}

/// Break-even equity for a call. Same quantity as [`pot_odds`].
pub fn required_equity(pot: f64, to_call: f64) -> EngineResult<f64> {
    pot_odds(pot, to_call)
}

/// EV of calling: `equity * pot_after_call - (1 - equity) * call`.
///
/// `pot_after_call` is the amount won when the call succeeds.
pub fn expected_value(equity: f64, pot_after_call: f64, call: f64) -> EngineResult<f64> {
    probability("equity", equity)?;
    non_negative("pot_after_call", pot_after_call)?;
    non_negative("call", call)?;
    Ok(equity * pot_after_call - (1.0 - equity) * call)
}

/// True when `equity` meets the break-even threshold for the call.
pub fn should_call(equity: f64, pot: f64, to_call: f64) -> EngineResult<bool> {
    probability("equity", equity)?;
    Ok(equity >= required_equity(pot, to_call)?)
}

/// Binomial coefficient C(n, k), saturating at `u64::MAX`.
pub fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        acc = acc * (n - i) as u128 / (i + 1) as u128;
        if acc > u64::MAX as u128 {
            return u64::MAX;
        }
    }
    acc as u64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotOddsReport {
    pub pot: f64,
    pub to_call: f64,
    /// Break-even equity, 0-1.
    pub required_equity: f64,
    /// Pot-to-call ratio as "X.XX:1".
    pub ratio: String,
    /// Size of the pot once the call goes in.
    pub pot_after_call: f64,
}

impl PotOddsReport {
    pub fn percentage(&self) -> f64 {
        self.required_equity * 100.0
    }
}

impl fmt::Display for PotOddsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Calling {:.2} into {:.2}: {} odds, need {:.1}% equity",
            self.to_call,
            self.pot,
            self.ratio,
            self.percentage()
        )
    }
}

pub fn pot_odds_report(pot: f64, to_call: f64) -> EngineResult<PotOddsReport> {
    let required = pot_odds(pot, to_call)?;
    let ratio = if to_call == 0.0 {
        "free".to_string()
    } else {
        format!("{:.2}:1", pot / to_call)
    };
    Ok(PotOddsReport {
        pot,
        to_call,
        required_equity: required,
        ratio,
        pot_after_call: pot + to_call,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn half_pot_bet() {
        assert_abs_diff_eq!(pot_odds(100.0, 50.0).unwrap(), 1.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn free_check() {
        assert_eq!(pot_odds(100.0, 0.0).unwrap(), 0.0);
        assert_eq!(pot_odds_report(100.0, 0.0).unwrap().ratio, "free");
    }

    #[test]
    fn negative_inputs_rejected() {
        assert!(pot_odds(-1.0, 10.0).is_err());
        assert!(pot_odds(10.0, -1.0).is_err());
        assert!(pot_odds(f64::NAN, 10.0).is_err());
        assert!(expected_value(1.5, 100.0, 10.0).is_err());
        assert!(expected_value(f64::NAN, 100.0, 10.0).is_err());
    }

    #[test]
    fn ev_sign() {
        // 25% to win 150 for a 50 call is break-even.
        assert_abs_diff_eq!(expected_value(0.25, 150.0, 50.0).unwrap(), 0.0, epsilon = 1e-9);
        assert!(expected_value(0.4, 150.0, 50.0).unwrap() > 0.0);
        assert!(expected_value(0.1, 150.0, 50.0).unwrap() < 0.0);
    }

    #[test]
    fn call_decision() {
        assert!(should_call(0.34, 100.0, 50.0).unwrap());
        assert!(!should_call(0.30, 100.0, 50.0).unwrap());
    }

    #[test]
    fn report_fields() {
        let r = pot_odds_report(100.0, 50.0).unwrap();
        assert_eq!(r.ratio, "2.00:1");
        assert_eq!(r.pot_after_call, 150.0);
        assert_abs_diff_eq!(r.percentage(), 33.333, epsilon = 1e-2);
    }

    #[test]
    fn binomials() {
        assert_eq!(binomial(52, 5), 2_598_960);
        assert_eq!(binomial(46, 2), 1035);
        assert_eq!(binomial(5, 0), 1);
        assert_eq!(binomial(3, 4), 0);
    }
}
