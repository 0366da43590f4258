//! The work type value.
//!
//! A [`WorkType`] is validated once at construction and never mutated
//! afterwards. Editing a work type means building a replacement.

use serde::Serialize;

use super::BonusStrategy;
use crate::error::{PayrollError, PayrollResult};

/// A named pay category with a base pay, a bonus percentage and the
/// strategy that turns them into a final pay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkType {
    name: String,
    base_pay: f64,
    bonus_percent: f64,
    strategy: BonusStrategy,
}

impl WorkType {
    /// Creates a validated work type.
    ///
    /// Fails with [`PayrollError::InvalidRate`] when the name is empty, the
    /// base pay is not strictly positive, or either the bonus percentage or
    /// the strategy's own percentage is negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{BonusStrategy, WorkType};
    ///
    /// let work = WorkType::new("Welding", 1000.0, 10.0, BonusStrategy::Percentage(10.0)).unwrap();
    /// assert_eq!(work.name(), "Welding");
    /// assert!((work.final_pay() - 1100.0).abs() < 1e-9);
    ///
    /// assert!(WorkType::new("", 1000.0, 0.0, BonusStrategy::NoBonus).is_err());
    /// ```
    pub fn new(
        name: impl Into<String>,
        base_pay: f64,
        bonus_percent: f64,
        strategy: BonusStrategy,
    ) -> PayrollResult<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(PayrollError::invalid_rate("name must not be empty"));
        }
        if !(base_pay > 0.0) || !base_pay.is_finite() {
            return Err(PayrollError::invalid_rate("base pay must be > 0"));
        }
        if !(bonus_percent >= 0.0) || !bonus_percent.is_finite() {
            return Err(PayrollError::invalid_rate("bonus >= 0"));
        }
        if let BonusStrategy::Percentage(percent) = strategy {
            BonusStrategy::percentage(percent)?;
        }

        Ok(Self {
            name,
            base_pay,
            bonus_percent,
            strategy,
        })
    }

    /// Creates a work type whose strategy is chosen from the bonus percentage.
    pub fn with_bonus(
        name: impl Into<String>,
        base_pay: f64,
        bonus_percent: f64,
    ) -> PayrollResult<Self> {
        let strategy = BonusStrategy::for_percent(bonus_percent)?;
        Self::new(name, base_pay, bonus_percent, strategy)
    }

    /// The unique name of this work type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The base pay before any bonus.
    pub fn base_pay(&self) -> f64 {
        self.base_pay
    }

    /// The bonus percentage.
    pub fn bonus_percent(&self) -> f64 {
        self.bonus_percent
    }

    /// The strategy bound at construction.
    pub fn strategy(&self) -> BonusStrategy {
        self.strategy
    }

    /// The bonus-adjusted pay.
    pub fn final_pay(&self) -> f64 {
        self.strategy.compute_pay(self.base_pay)
    }
}
