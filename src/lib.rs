//! Payroll engine for a catalogue of work types.
//!
//! This crate provides a validated in-memory catalogue of work types, each
//! with a base pay and a bonus percentage that determine its final pay, and a
//! SQLite-backed store with transactional bulk import and export.

#![warn(missing_docs)]

pub mod config;
pub mod department;
pub mod error;
pub mod interchange;
pub mod models;
pub mod storage;
pub mod sync;
