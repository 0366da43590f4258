//! Bonus strategies that turn a base pay into a final pay.

use serde::Serialize;

use crate::error::{PayrollError, PayrollResult};

/// The policy used to compute a work type's final pay.
///
/// `NoBonus` is the degenerate case of `Percentage(0.0)`; both produce the
/// same final pay. The distinction is kept so that a zero bonus stays visibly
/// "no bonus" in the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "percent", rename_all = "snake_case")]
pub enum BonusStrategy {
    /// Final pay equals base pay.
    NoBonus,
    /// Final pay is base pay increased by the given percentage.
    Percentage(f64),
}

impl BonusStrategy {
    /// Builds a percentage strategy, rejecting negative percentages.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::BonusStrategy;
    ///
    /// let strategy = BonusStrategy::percentage(10.0).unwrap();
    /// assert!((strategy.compute_pay(200.0) - 220.0).abs() < 1e-9);
    /// assert!(BonusStrategy::percentage(-1.0).is_err());
    /// ```
    pub fn percentage(percent: f64) -> PayrollResult<Self> {
        if !(percent >= 0.0) || !percent.is_finite() {
            return Err(PayrollError::invalid_rate("bonus percent must be >= 0"));
        }
        Ok(Self::Percentage(percent))
    }

    /// Selects the strategy for a bonus percentage: zero maps to `NoBonus`,
    /// anything else to `Percentage`.
    pub fn for_percent(percent: f64) -> PayrollResult<Self> {
        if percent == 0.0 {
            Ok(Self::NoBonus)
        } else {
            Self::percentage(percent)
        }
    }

    /// Computes the final pay for a base pay.
    pub fn compute_pay(&self, base_pay: f64) -> f64 {
        match self {
            Self::NoBonus => base_pay,
            Self::Percentage(percent) => base_pay * (1.0 + percent / 100.0),
        }
    }
}
