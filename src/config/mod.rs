//! Configuration loading for the payroll engine.
//!
//! This module loads the engine configuration from a YAML file. Only the
//! storage layer is configurable today.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./payroll.yaml").unwrap();
//! println!("Database: {}", config.storage.path.display());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{DEFAULT_DATABASE_PATH, PayrollConfig, StorageConfig};
