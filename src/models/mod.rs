//! Core data models for the payroll engine.
//!
//! This module contains the work type value and the bonus strategies that
//! compute its final pay.

mod bonus_strategy;
mod work_type;

pub use bonus_strategy::BonusStrategy;
pub use work_type::WorkType;
